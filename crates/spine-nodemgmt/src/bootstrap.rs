use spine_dispatch::Sender;
use spine_protocol::{Datagram, FeatureAddress, FunctionData};

/// The client-role first-connection sequence (§4.5): once a Session
/// reaches DATA, issue, in order, a DetailedDiscovery read, a UseCase
/// read, and a Subscription call for the node-management feature itself
/// (so the peer will notify this side about future subscription changes).
pub fn first_connection_datagrams(sender: &mut Sender, local_device: &str, remote_device: &str) -> Vec<Datagram> {
    let local_nm = FeatureAddress::node_management(local_device.to_owned());
    let remote_nm = FeatureAddress::node_management(remote_device.to_owned());

    let discovery = sender.read(
        local_nm.clone(),
        remote_nm.clone(),
        FunctionData::DetailedDiscoveryData(spine_protocol::DetailedDiscoveryData {
            entities: Vec::new(),
            features: Vec::new(),
        }),
    );
    let use_cases = sender.read(
        local_nm.clone(),
        remote_nm.clone(),
        FunctionData::UseCaseData(spine_protocol::UseCaseData {
            entity_address: local_nm.entity_address(),
            use_cases: Vec::new(),
        }),
    );
    let subscribe = sender.call_subscribe(
        remote_device,
        remote_nm,
        local_nm,
        spine_protocol::FeatureType::NodeManagement.wire_name().to_owned(),
    );

    vec![discovery, use_cases, subscribe]
}

#[cfg(test)]
mod tests {
    use super::*;
    use spine_protocol::CmdClassifier;

    #[test]
    fn first_connection_issues_discovery_then_usecase_then_subscribe_call() {
        let mut sender = Sender::new("local".to_owned(), 0);
        let datagrams = first_connection_datagrams(&mut sender, "local", "peer");
        assert_eq!(datagrams.len(), 3);
        assert!(matches!(
            datagrams[0].commands[0].data,
            FunctionData::DetailedDiscoveryData(_)
        ));
        assert!(matches!(datagrams[1].commands[0].data, FunctionData::UseCaseData(_)));
        assert!(matches!(
            datagrams[2].commands[0].data,
            FunctionData::SubscriptionRequestCall(_)
        ));
        assert_eq!(datagrams[2].header.cmd_classifier, CmdClassifier::Call);
    }
}
