use spine_protocol::function::{
    BindingDeleteCall, BindingRequestCall, PartialFeatureAddress, ResultData, SubscriptionDeleteCall,
    SubscriptionRequestCall,
};
use spine_protocol::{CmdClassifier, Command, Datagram, EebusError, FeatureAddress, FunctionData, Header, SPEC_VERSION};

/// Maintains the per-Session monotonically increasing `msg_counter` and
/// builds outbound datagrams (§4.3).
pub struct Sender {
    local_device: String,
    counter: u64,
}

impl Sender {
    /// `initial_counter` is implementation-defined; tests may seed it.
    pub fn new(local_device: String, initial_counter: u64) -> Self {
        Sender {
            local_device,
            counter: initial_counter,
        }
    }

    fn next_counter(&mut self) -> u64 {
        let c = self.counter;
        self.counter = self.counter.wrapping_add(1);
        c
    }

    fn header(&mut self, src: FeatureAddress, dest: FeatureAddress, classifier: CmdClassifier) -> Header {
        Header {
            spec_version: SPEC_VERSION.to_owned(),
            src_addr: src,
            dest_addr: dest,
            msg_counter: self.next_counter(),
            msg_counter_ref: None,
            cmd_classifier: classifier,
            ack_request: None,
        }
    }

    pub fn read(&mut self, src: FeatureAddress, dst: FeatureAddress, data: FunctionData) -> Datagram {
        Datagram {
            header: self.header(src, dst, CmdClassifier::Read),
            commands: vec![Command::new(data)],
        }
    }

    pub fn reply(&mut self, request_header: &Header, src: FeatureAddress, data: FunctionData) -> Datagram {
        let mut header = self.header(src, request_header.src_addr.clone(), CmdClassifier::Reply);
        header.msg_counter_ref = Some(request_header.msg_counter);
        Datagram {
            header,
            commands: vec![Command::new(data)],
        }
    }

    pub fn notify(&mut self, src: FeatureAddress, dst: FeatureAddress, data: FunctionData) -> Datagram {
        Datagram {
            header: self.header(src, dst, CmdClassifier::Notify),
            commands: vec![Command::new(data)],
        }
    }

    pub fn write(&mut self, src: FeatureAddress, dst: FeatureAddress, data: FunctionData) -> Datagram {
        let mut header = self.header(src, dst, CmdClassifier::Write);
        header.ack_request = Some(true);
        Datagram {
            header,
            commands: vec![Command::new(data)],
        }
    }

    fn node_management_call(
        &mut self,
        local_device: &str,
        remote_device: &str,
        data: FunctionData,
    ) -> Datagram {
        let src = FeatureAddress::node_management(local_device.to_owned());
        let dst = FeatureAddress::node_management(remote_device.to_owned());
        let mut header = self.header(src, dst, CmdClassifier::Call);
        header.ack_request = Some(true);
        Datagram {
            header,
            commands: vec![Command::new(data)],
        }
    }

    pub fn call_subscribe(
        &mut self,
        remote_device: &str,
        server_address: FeatureAddress,
        client_address: FeatureAddress,
        server_feature_type: String,
    ) -> Datagram {
        let local_device = self.local_device.clone();
        self.node_management_call(
            &local_device,
            remote_device,
            FunctionData::SubscriptionRequestCall(SubscriptionRequestCall {
                server_address,
                client_address,
                server_feature_type,
            }),
        )
    }

    pub fn call_unsubscribe(
        &mut self,
        remote_device: &str,
        server_address: PartialFeatureAddress,
        client_address: PartialFeatureAddress,
    ) -> Datagram {
        let local_device = self.local_device.clone();
        self.node_management_call(
            &local_device,
            remote_device,
            FunctionData::SubscriptionDeleteCall(SubscriptionDeleteCall {
                server_address,
                client_address,
            }),
        )
    }

    pub fn call_bind(
        &mut self,
        remote_device: &str,
        server_address: FeatureAddress,
        client_address: FeatureAddress,
        server_feature_type: String,
    ) -> Datagram {
        let local_device = self.local_device.clone();
        self.node_management_call(
            &local_device,
            remote_device,
            FunctionData::BindingRequestCall(BindingRequestCall {
                server_address,
                client_address,
                server_feature_type,
            }),
        )
    }

    pub fn call_unbind(
        &mut self,
        remote_device: &str,
        server_address: PartialFeatureAddress,
        client_address: PartialFeatureAddress,
    ) -> Datagram {
        let local_device = self.local_device.clone();
        self.node_management_call(
            &local_device,
            remote_device,
            FunctionData::BindingDeleteCall(BindingDeleteCall {
                server_address,
                client_address,
            }),
        )
    }

    pub fn result_success(&mut self, request_header: &Header, src: FeatureAddress) -> Datagram {
        let mut header = self.header(src, request_header.src_addr.clone(), CmdClassifier::Result);
        header.msg_counter_ref = Some(request_header.msg_counter);
        Datagram {
            header,
            commands: vec![Command::new(FunctionData::ResultData(ResultData {
                error_number: 0,
                description: None,
            }))],
        }
    }

    pub fn result_error(&mut self, request_header: &Header, src: FeatureAddress, error: &EebusError) -> Datagram {
        let mut header = self.header(src, request_header.src_addr.clone(), CmdClassifier::Result);
        header.msg_counter_ref = Some(request_header.msg_counter);
        Datagram {
            header,
            commands: vec![Command::new(FunctionData::ResultData(ResultData {
                error_number: error_number_for(error),
                description: Some(error.to_string()),
            }))],
        }
    }
}

fn error_number_for(error: &EebusError) -> u32 {
    match error {
        EebusError::Init => 1,
        EebusError::InputArgument => 2,
        EebusError::InputArgumentNull => 3,
        EebusError::InputArgumentOutOfRange => 4,
        EebusError::Parse(_) => 5,
        EebusError::Communication => 6,
        EebusError::CommunicationBusy => 7,
        EebusError::Memory => 8,
        EebusError::MemoryAllocate => 9,
        EebusError::NotImplemented => 10,
        EebusError::NotSupported => 11,
        EebusError::NotAvailable => 12,
        EebusError::Timeout => 13,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(feature: u32) -> FeatureAddress {
        FeatureAddress {
            device: "dev-1".to_owned(),
            entity: vec![0],
            feature,
        }
    }

    fn opaque() -> FunctionData {
        FunctionData::Other {
            key: "opaque".to_owned(),
            value: serde_json::json!({}),
        }
    }

    #[test]
    fn counter_is_fresh_on_every_outbound_datagram() {
        let mut sender = Sender::new("dev-1".to_owned(), 5);
        let a = sender.read(addr(0), addr(0), opaque());
        let b = sender.read(addr(0), addr(0), opaque());
        assert_eq!(a.header.msg_counter, 5);
        assert_eq!(b.header.msg_counter, 6);
    }

    #[test]
    fn reply_echoes_request_counter_as_ref() {
        let mut sender = Sender::new("dev-1".to_owned(), 42);
        let request_header = Header {
            spec_version: SPEC_VERSION.to_owned(),
            src_addr: addr(0),
            dest_addr: addr(0),
            msg_counter: 7,
            msg_counter_ref: None,
            cmd_classifier: CmdClassifier::Read,
            ack_request: None,
        };
        let reply = sender.reply(&request_header, addr(0), opaque());
        assert_eq!(reply.header.msg_counter_ref, Some(7));
        assert_eq!(reply.header.cmd_classifier, CmdClassifier::Reply);
    }

    #[test]
    fn write_requests_an_ack() {
        let mut sender = Sender::new("dev-1".to_owned(), 0);
        let datagram = sender.write(addr(0), addr(0), opaque());
        assert_eq!(datagram.header.ack_request, Some(true));
    }
}
