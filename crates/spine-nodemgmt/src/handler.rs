use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use spine_dispatch::{FeatureHandler, HandlerOutcome};
use spine_links::{BindingManager, SubscriptionManager};
use spine_protocol::{
    CmdClassifier, DestinationEntry, DestinationListData, DeviceAddress, DeviceLocal, DeviceRemote, FunctionData,
    Header, UseCaseData, UseCaseSupportWire,
};

use crate::discovery::{apply_detailed_discovery_data, build_detailed_discovery_data};
use crate::events::NodeEvent;

/// The Node-Management feature every device exposes at `entity=[0],
/// feature=0` with role=special (§4.5). One instance per Peer, scoped to
/// the traffic of that one remote device.
pub struct NodeManagementHandler {
    local_device: Arc<Mutex<DeviceLocal>>,
    remote_device: Arc<Mutex<DeviceRemote>>,
    subscriptions: Arc<Mutex<SubscriptionManager>>,
    bindings: Arc<Mutex<BindingManager>>,
    remote_device_address: DeviceAddress,
    local_ship_id: String,
    events: Vec<NodeEvent>,
}

impl NodeManagementHandler {
    pub fn new(
        local_device: Arc<Mutex<DeviceLocal>>,
        remote_device: Arc<Mutex<DeviceRemote>>,
        subscriptions: Arc<Mutex<SubscriptionManager>>,
        bindings: Arc<Mutex<BindingManager>>,
        remote_device_address: DeviceAddress,
        local_ship_id: String,
    ) -> Self {
        NodeManagementHandler {
            local_device,
            remote_device,
            subscriptions,
            bindings,
            remote_device_address,
            local_ship_id,
            events: Vec::new(),
        }
    }

    /// Drains the change events accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<NodeEvent> {
        std::mem::take(&mut self.events)
    }

    fn handle_use_case_data(&mut self, header: &Header, data: UseCaseData) -> HandlerOutcome {
        match header.cmd_classifier {
            CmdClassifier::Read => {
                let local = self.local_device.lock();
                let Some(entity) = local.entity(&header.dest_addr.entity) else {
                    debug!(entity = ?header.dest_addr.entity, "use case read for an entity this device doesn't have");
                    return HandlerOutcome::Error(spine_protocol::EebusError::NotAvailable);
                };
                HandlerOutcome::Reply(FunctionData::UseCaseData(UseCaseData {
                    entity_address: entity.address.clone(),
                    use_cases: entity.use_cases.iter().map(UseCaseSupportWire::from).collect(),
                }))
            }
            CmdClassifier::Reply | CmdClassifier::Notify => {
                let mut remote = self.remote_device.lock();
                if let Some(entity) = remote.entity_mut(&data.entity_address.entity) {
                    entity.use_cases = data.use_cases.into_iter().map(Into::into).collect();
                }
                HandlerOutcome::NoReply
            }
            _ => HandlerOutcome::NoReply,
        }
    }

    fn handle_destination_list(&mut self, header: &Header) -> HandlerOutcome {
        if header.cmd_classifier != CmdClassifier::Read {
            return HandlerOutcome::NoReply;
        }
        let device_address = self.local_device.lock().address.clone();
        HandlerOutcome::Reply(FunctionData::DestinationListData(DestinationListData {
            entries: vec![DestinationEntry {
                device_address,
                ship_id: self.local_ship_id.clone(),
            }],
        }))
    }
}

impl FeatureHandler for NodeManagementHandler {
    fn handle(&mut self, header: &Header, data: FunctionData) -> HandlerOutcome {
        match data {
            FunctionData::DetailedDiscoveryData(discovery) => match header.cmd_classifier {
                CmdClassifier::Read => {
                    let data = build_detailed_discovery_data(&self.local_device.lock());
                    HandlerOutcome::Reply(FunctionData::DetailedDiscoveryData(data))
                }
                CmdClassifier::Reply | CmdClassifier::Notify => {
                    let mut remote = self.remote_device.lock();
                    let events = apply_detailed_discovery_data(&mut remote, &discovery);
                    self.events.extend(events);
                    HandlerOutcome::NoReply
                }
                _ => HandlerOutcome::NoReply,
            },
            FunctionData::SubscriptionData(_) => {
                let entries = self
                    .subscriptions
                    .lock()
                    .create_subscription_data(&self.remote_device_address);
                HandlerOutcome::Reply(FunctionData::SubscriptionData(spine_protocol::SubscriptionData {
                    entries,
                }))
            }
            FunctionData::BindingData(_) => {
                let entries = self.bindings.lock().create_binding_data(&self.remote_device_address);
                HandlerOutcome::Reply(FunctionData::BindingData(spine_protocol::BindingData { entries }))
            }
            FunctionData::SubscriptionRequestCall(request) => {
                let local = self.local_device.lock();
                let remote = self.remote_device.lock();
                let (_outcome, event) = self.subscriptions.lock().add_subscription(
                    &local,
                    &remote,
                    &request.server_address,
                    &request.client_address,
                    &request.server_feature_type,
                );
                if let Some(event) = event {
                    self.events.push(NodeEvent::Link(event));
                }
                HandlerOutcome::NoReply
            }
            FunctionData::SubscriptionDeleteCall(delete) => {
                let local = self.local_device.lock();
                let remote = self.remote_device.lock();
                let (_removed, event) = self.subscriptions.lock().remove_subscription(
                    &local,
                    &remote,
                    &delete.server_address,
                    &delete.client_address,
                );
                if let Some(event) = event {
                    self.events.push(NodeEvent::Link(event));
                }
                HandlerOutcome::NoReply
            }
            FunctionData::BindingRequestCall(request) => {
                let local = self.local_device.lock();
                let remote = self.remote_device.lock();
                let (_outcome, event) = self.bindings.lock().add_binding(
                    &local,
                    &remote,
                    &request.server_address,
                    &request.client_address,
                    &request.server_feature_type,
                );
                if let Some(event) = event {
                    self.events.push(NodeEvent::Link(event));
                }
                HandlerOutcome::NoReply
            }
            FunctionData::BindingDeleteCall(delete) => {
                let local = self.local_device.lock();
                let remote = self.remote_device.lock();
                let (_removed, event) = self.bindings.lock().remove_binding(
                    &local,
                    &remote,
                    &delete.server_address,
                    &delete.client_address,
                );
                if let Some(event) = event {
                    self.events.push(NodeEvent::Link(event));
                }
                HandlerOutcome::NoReply
            }
            FunctionData::UseCaseData(use_case_data) => self.handle_use_case_data(header, use_case_data),
            FunctionData::DestinationListData(_) => self.handle_destination_list(header),
            FunctionData::ResultData(_) | FunctionData::Other { .. } => HandlerOutcome::NoReply,
        }
    }
}
