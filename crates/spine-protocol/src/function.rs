//! SPINE function data: each command in a datagram's payload carries
//! exactly one of these, tagged by `FunctionType`. The Node-Management
//! functions (§4.5) are modelled as full typed variants since this crate
//! implements their semantics; every other use case's function data is
//! carried opaquely (`Other`) since individual use-case business logic is
//! out of scope (spec.md §1 Non-goals) — it is still passed through
//! untouched so subscriptions/bindings/caching work for it.

use crate::address::{DeviceAddress, FeatureAddress};
use crate::feature::{FeatureRole, UseCaseSupport};
use serde::{Deserialize, Serialize};

/// Identifies which function data a command carries. Not itself
/// serialised: on the wire the function type is the command object's one
/// key (see `spine-protocol::command`), not a field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionType {
    NodeManagementDetailedDiscoveryData,
    NodeManagementSubscriptionData,
    NodeManagementSubscriptionRequestCall,
    NodeManagementSubscriptionDeleteCall,
    NodeManagementBindingData,
    NodeManagementBindingRequestCall,
    NodeManagementBindingDeleteCall,
    NodeManagementUseCaseData,
    NodeManagementDestinationListData,
    /// Common to every feature, not node-management-specific: carries the
    /// outcome of a `call`/`write` as classifier `result`.
    ResultData,
    /// Any function type this core does not itself interpret.
    Other(String),
}

impl FunctionType {
    pub fn wire_key(&self) -> String {
        match self {
            FunctionType::NodeManagementDetailedDiscoveryData => {
                "nodeManagementDetailedDiscoveryData".to_owned()
            }
            FunctionType::NodeManagementSubscriptionData => {
                "nodeManagementSubscriptionData".to_owned()
            }
            FunctionType::NodeManagementSubscriptionRequestCall => {
                "nodeManagementSubscriptionRequestCall".to_owned()
            }
            FunctionType::NodeManagementSubscriptionDeleteCall => {
                "nodeManagementSubscriptionDeleteCall".to_owned()
            }
            FunctionType::NodeManagementBindingData => "nodeManagementBindingData".to_owned(),
            FunctionType::NodeManagementBindingRequestCall => {
                "nodeManagementBindingRequestCall".to_owned()
            }
            FunctionType::NodeManagementBindingDeleteCall => {
                "nodeManagementBindingDeleteCall".to_owned()
            }
            FunctionType::NodeManagementUseCaseData => "nodeManagementUseCaseData".to_owned(),
            FunctionType::NodeManagementDestinationListData => {
                "nodeManagementDestinationListData".to_owned()
            }
            FunctionType::ResultData => "resultData".to_owned(),
            FunctionType::Other(key) => key.clone(),
        }
    }

    pub fn from_wire_key(key: &str) -> Self {
        match key {
            "nodeManagementDetailedDiscoveryData" => {
                FunctionType::NodeManagementDetailedDiscoveryData
            }
            "nodeManagementSubscriptionData" => FunctionType::NodeManagementSubscriptionData,
            "nodeManagementSubscriptionRequestCall" => {
                FunctionType::NodeManagementSubscriptionRequestCall
            }
            "nodeManagementSubscriptionDeleteCall" => {
                FunctionType::NodeManagementSubscriptionDeleteCall
            }
            "nodeManagementBindingData" => FunctionType::NodeManagementBindingData,
            "nodeManagementBindingRequestCall" => FunctionType::NodeManagementBindingRequestCall,
            "nodeManagementBindingDeleteCall" => FunctionType::NodeManagementBindingDeleteCall,
            "nodeManagementUseCaseData" => FunctionType::NodeManagementUseCaseData,
            "nodeManagementDestinationListData" => {
                FunctionType::NodeManagementDestinationListData
            }
            "resultData" => FunctionType::ResultData,
            other => FunctionType::Other(other.to_owned()),
        }
    }
}

/// A `FeatureAddress` with an optional device component, as used by the
/// delete-call variants where the device defaults to the caller's remote
/// device or this side's local device (§4.4's defaulting rules).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialFeatureAddress {
    pub device: Option<DeviceAddress>,
    pub entity: Vec<u32>,
    pub feature: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInformation {
    pub description: crate::address::EntityAddress,
    pub entity_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureInformation {
    pub description: FeatureAddress,
    pub role: FeatureRoleWire,
    pub feature_type: FeatureTypeWire,
}

/// Wire-serialisable mirror of `FeatureRole` (kept distinct so this crate's
/// internal enum can evolve without touching the wire shape).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureRoleWire {
    Client,
    Server,
    Special,
}

impl From<FeatureRole> for FeatureRoleWire {
    fn from(r: FeatureRole) -> Self {
        match r {
            FeatureRole::Client => FeatureRoleWire::Client,
            FeatureRole::Server => FeatureRoleWire::Server,
            FeatureRole::Special => FeatureRoleWire::Special,
        }
    }
}

impl From<FeatureRoleWire> for FeatureRole {
    fn from(r: FeatureRoleWire) -> Self {
        match r {
            FeatureRoleWire::Client => FeatureRole::Client,
            FeatureRoleWire::Server => FeatureRole::Server,
            FeatureRoleWire::Special => FeatureRole::Special,
        }
    }
}

pub type FeatureTypeWire = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedDiscoveryData {
    pub entities: Vec<EntityInformation>,
    pub features: Vec<FeatureInformation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntryWire {
    pub id: u64,
    pub server_address: FeatureAddress,
    pub client_address: FeatureAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionData {
    pub entries: Vec<LinkEntryWire>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequestCall {
    pub server_address: FeatureAddress,
    pub client_address: FeatureAddress,
    pub server_feature_type: FeatureTypeWire,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDeleteCall {
    pub server_address: PartialFeatureAddress,
    pub client_address: PartialFeatureAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingData {
    pub entries: Vec<LinkEntryWire>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingRequestCall {
    pub server_address: FeatureAddress,
    pub client_address: FeatureAddress,
    pub server_feature_type: FeatureTypeWire,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingDeleteCall {
    pub server_address: PartialFeatureAddress,
    pub client_address: PartialFeatureAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseData {
    pub entity_address: crate::address::EntityAddress,
    pub use_cases: Vec<UseCaseSupportWire>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseSupportWire {
    pub actor: String,
    pub use_case_name: String,
    pub version: String,
    pub sub_revision: String,
    pub available: bool,
    pub scenario_ids: Vec<u32>,
}

impl From<&UseCaseSupport> for UseCaseSupportWire {
    fn from(u: &UseCaseSupport) -> Self {
        UseCaseSupportWire {
            actor: u.actor.clone(),
            use_case_name: u.use_case_name.clone(),
            version: u.version.clone(),
            sub_revision: u.sub_revision.clone(),
            available: u.available,
            scenario_ids: u.scenario_ids.clone(),
        }
    }
}

impl From<UseCaseSupportWire> for UseCaseSupport {
    fn from(u: UseCaseSupportWire) -> Self {
        UseCaseSupport {
            actor: u.actor,
            use_case_name: u.use_case_name,
            version: u.version,
            sub_revision: u.sub_revision,
            available: u.available,
            scenario_ids: u.scenario_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationEntry {
    pub device_address: DeviceAddress,
    pub ship_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationListData {
    pub entries: Vec<DestinationEntry>,
}

/// The outcome of a `call`/`write`, carried as classifier `result`.
/// `error_number` 0 is success; a non-zero value pairs with `description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultData {
    pub error_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionData {
    DetailedDiscoveryData(DetailedDiscoveryData),
    SubscriptionData(SubscriptionData),
    SubscriptionRequestCall(SubscriptionRequestCall),
    SubscriptionDeleteCall(SubscriptionDeleteCall),
    BindingData(BindingData),
    BindingRequestCall(BindingRequestCall),
    BindingDeleteCall(BindingDeleteCall),
    UseCaseData(UseCaseData),
    DestinationListData(DestinationListData),
    ResultData(ResultData),
    /// Any use-case-specific payload this core only forwards/caches, kept
    /// under its real wire key so re-encoding doesn't corrupt the envelope.
    Other { key: String, value: serde_json::Value },
}

impl FunctionData {
    pub fn function_type(&self) -> FunctionType {
        match self {
            FunctionData::DetailedDiscoveryData(_) => {
                FunctionType::NodeManagementDetailedDiscoveryData
            }
            FunctionData::SubscriptionData(_) => FunctionType::NodeManagementSubscriptionData,
            FunctionData::SubscriptionRequestCall(_) => {
                FunctionType::NodeManagementSubscriptionRequestCall
            }
            FunctionData::SubscriptionDeleteCall(_) => {
                FunctionType::NodeManagementSubscriptionDeleteCall
            }
            FunctionData::BindingData(_) => FunctionType::NodeManagementBindingData,
            FunctionData::BindingRequestCall(_) => FunctionType::NodeManagementBindingRequestCall,
            FunctionData::BindingDeleteCall(_) => FunctionType::NodeManagementBindingDeleteCall,
            FunctionData::UseCaseData(_) => FunctionType::NodeManagementUseCaseData,
            FunctionData::DestinationListData(_) => FunctionType::NodeManagementDestinationListData,
            FunctionData::ResultData(_) => FunctionType::ResultData,
            FunctionData::Other { key, .. } => FunctionType::Other(key.clone()),
        }
    }
}
