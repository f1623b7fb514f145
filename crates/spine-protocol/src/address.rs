use serde::{Deserialize, Serialize};

/// Opaque string assigned at pairing time. Equality is structural.
pub type DeviceAddress = String;

/// A DeviceAddress plus an ordered sequence of entity identifiers;
/// hierarchical, e.g. `[1, 2]` is child `2` of entity `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityAddress {
    pub device: DeviceAddress,
    pub entity: Vec<u32>,
}

/// An EntityAddress plus a feature identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureAddress {
    pub device: DeviceAddress,
    pub entity: Vec<u32>,
    pub feature: u32,
}

impl FeatureAddress {
    pub fn entity_address(&self) -> EntityAddress {
        EntityAddress {
            device: self.device.clone(),
            entity: self.entity.clone(),
        }
    }

    /// The Node-Management feature every device exposes: `entity=[0],
    /// feature=0`.
    pub fn node_management(device: DeviceAddress) -> Self {
        FeatureAddress {
            device,
            entity: vec![0],
            feature: 0,
        }
    }

    pub fn is_node_management(&self) -> bool {
        self.entity == [0] && self.feature == 0
    }
}
