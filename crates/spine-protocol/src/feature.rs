use crate::address::{DeviceAddress, EntityAddress, FeatureAddress};
use crate::function::{FunctionData, FunctionType};
use std::collections::HashMap;

/// Grounded 1:1 on the `kRoleType*` enumeration in
/// `spine/model/feature_types.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureRole {
    Client,
    Server,
    Special,
}

/// Grounded on the `kFeatureTypeType*` enumeration in
/// `spine/model/feature_types.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureType {
    ActuatorLevel,
    ActuatorSwitch,
    Alarm,
    DataTunneling,
    DeviceClassification,
    DeviceDiagnosis,
    DirectControl,
    ElectricalConnection,
    Generic,
    Hvac,
    LoadControl,
    Measurement,
    Messaging,
    NetworkManagement,
    NodeManagement,
    OperatingConstraints,
    PowerSequences,
    Sensing,
    Setpoint,
    SmartEnergyManagementPs,
    TaskManagement,
    Threshold,
    TimeInformation,
    TimeTable,
    DeviceConfiguration,
    SupplyCondition,
    TimeSeries,
    TariffInformation,
    IncentiveTable,
    Bill,
    Identification,
    StateInformation,
}

impl FeatureType {
    pub fn wire_name(self) -> &'static str {
        match self {
            FeatureType::ActuatorLevel => "ActuatorLevel",
            FeatureType::ActuatorSwitch => "ActuatorSwitch",
            FeatureType::Alarm => "Alarm",
            FeatureType::DataTunneling => "DataTunneling",
            FeatureType::DeviceClassification => "DeviceClassification",
            FeatureType::DeviceDiagnosis => "DeviceDiagnosis",
            FeatureType::DirectControl => "DirectControl",
            FeatureType::ElectricalConnection => "ElectricalConnection",
            FeatureType::Generic => "Generic",
            FeatureType::Hvac => "HVAC",
            FeatureType::LoadControl => "LoadControl",
            FeatureType::Measurement => "Measurement",
            FeatureType::Messaging => "Messaging",
            FeatureType::NetworkManagement => "NetworkManagement",
            FeatureType::NodeManagement => "NodeManagement",
            FeatureType::OperatingConstraints => "OperatingConstraints",
            FeatureType::PowerSequences => "PowerSequences",
            FeatureType::Sensing => "Sensing",
            FeatureType::Setpoint => "Setpoint",
            FeatureType::SmartEnergyManagementPs => "SmartEnergyManagementPs",
            FeatureType::TaskManagement => "TaskManagement",
            FeatureType::Threshold => "Threshold",
            FeatureType::TimeInformation => "TimeInformation",
            FeatureType::TimeTable => "TimeTable",
            FeatureType::DeviceConfiguration => "DeviceConfiguration",
            FeatureType::SupplyCondition => "SupplyCondition",
            FeatureType::TimeSeries => "TimeSeries",
            FeatureType::TariffInformation => "TariffInformation",
            FeatureType::IncentiveTable => "IncentiveTable",
            FeatureType::Bill => "Bill",
            FeatureType::Identification => "Identification",
            FeatureType::StateInformation => "StateInformation",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Some(match name {
            "ActuatorLevel" => FeatureType::ActuatorLevel,
            "ActuatorSwitch" => FeatureType::ActuatorSwitch,
            "Alarm" => FeatureType::Alarm,
            "DataTunneling" => FeatureType::DataTunneling,
            "DeviceClassification" => FeatureType::DeviceClassification,
            "DeviceDiagnosis" => FeatureType::DeviceDiagnosis,
            "DirectControl" => FeatureType::DirectControl,
            "ElectricalConnection" => FeatureType::ElectricalConnection,
            "Generic" => FeatureType::Generic,
            "HVAC" => FeatureType::Hvac,
            "LoadControl" => FeatureType::LoadControl,
            "Measurement" => FeatureType::Measurement,
            "Messaging" => FeatureType::Messaging,
            "NetworkManagement" => FeatureType::NetworkManagement,
            "NodeManagement" => FeatureType::NodeManagement,
            "OperatingConstraints" => FeatureType::OperatingConstraints,
            "PowerSequences" => FeatureType::PowerSequences,
            "Sensing" => FeatureType::Sensing,
            "Setpoint" => FeatureType::Setpoint,
            "SmartEnergyManagementPs" => FeatureType::SmartEnergyManagementPs,
            "TaskManagement" => FeatureType::TaskManagement,
            "Threshold" => FeatureType::Threshold,
            "TimeInformation" => FeatureType::TimeInformation,
            "TimeTable" => FeatureType::TimeTable,
            "DeviceConfiguration" => FeatureType::DeviceConfiguration,
            "SupplyCondition" => FeatureType::SupplyCondition,
            "TimeSeries" => FeatureType::TimeSeries,
            "TariffInformation" => FeatureType::TariffInformation,
            "IncentiveTable" => FeatureType::IncentiveTable,
            "Bill" => FeatureType::Bill,
            "Identification" => FeatureType::Identification,
            "StateInformation" => FeatureType::StateInformation,
            _ => return None,
        })
    }
}

/// A feature this side owns: authoritative for its own functions, caching
/// the last known value it has published for each.
pub struct FeatureLocal {
    pub address: FeatureAddress,
    pub role: FeatureRole,
    pub feature_type: FeatureType,
    cache: HashMap<FunctionType, FunctionData>,
}

impl FeatureLocal {
    pub fn new(address: FeatureAddress, role: FeatureRole, feature_type: FeatureType) -> Self {
        FeatureLocal {
            address,
            role,
            feature_type,
            cache: HashMap::new(),
        }
    }

    pub fn update_cache(&mut self, data: FunctionData) {
        self.cache.insert(data.function_type(), data);
    }

    pub fn cached(&self, function_type: FunctionType) -> Option<&FunctionData> {
        self.cache.get(&function_type)
    }
}

/// The mirror of a peer's feature, populated from discovery/read replies.
pub struct FeatureRemote {
    pub address: FeatureAddress,
    pub role: FeatureRole,
    pub feature_type: FeatureType,
    cache: HashMap<FunctionType, FunctionData>,
}

impl FeatureRemote {
    pub fn new(address: FeatureAddress, role: FeatureRole, feature_type: FeatureType) -> Self {
        FeatureRemote {
            address,
            role,
            feature_type,
            cache: HashMap::new(),
        }
    }

    pub fn update_cache(&mut self, data: FunctionData) {
        self.cache.insert(data.function_type(), data);
    }

    pub fn cached(&self, function_type: FunctionType) -> Option<&FunctionData> {
        self.cache.get(&function_type)
    }
}

pub struct EntityLocal {
    pub address: EntityAddress,
    pub entity_type: String,
    pub features: Vec<FeatureLocal>,
    pub use_cases: Vec<UseCaseSupport>,
}

impl EntityLocal {
    pub fn new(address: EntityAddress, entity_type: impl Into<String>) -> Self {
        EntityLocal {
            address,
            entity_type: entity_type.into(),
            features: Vec::new(),
            use_cases: Vec::new(),
        }
    }

    pub fn feature(&self, feature_id: u32) -> Option<&FeatureLocal> {
        self.features.iter().find(|f| f.address.feature == feature_id)
    }

    pub fn feature_mut(&mut self, feature_id: u32) -> Option<&mut FeatureLocal> {
        self.features
            .iter_mut()
            .find(|f| f.address.feature == feature_id)
    }

    /// Insert or replace a use-case support record, enforcing "at most one
    /// record per (actor, useCaseName)".
    pub fn set_use_case(&mut self, record: UseCaseSupport) {
        if let Some(existing) = self
            .use_cases
            .iter_mut()
            .find(|u| u.actor == record.actor && u.use_case_name == record.use_case_name)
        {
            *existing = record;
        } else {
            self.use_cases.push(record);
        }
    }
}

pub struct EntityRemote {
    pub address: EntityAddress,
    pub entity_type: String,
    pub features: Vec<FeatureRemote>,
    pub use_cases: Vec<UseCaseSupport>,
}

impl EntityRemote {
    pub fn new(address: EntityAddress, entity_type: impl Into<String>) -> Self {
        EntityRemote {
            address,
            entity_type: entity_type.into(),
            features: Vec::new(),
            use_cases: Vec::new(),
        }
    }

    pub fn feature(&self, feature_id: u32) -> Option<&FeatureRemote> {
        self.features.iter().find(|f| f.address.feature == feature_id)
    }

    pub fn feature_mut(&mut self, feature_id: u32) -> Option<&mut FeatureRemote> {
        self.features
            .iter_mut()
            .find(|f| f.address.feature == feature_id)
    }

    pub fn feature_or_insert(
        &mut self,
        address: FeatureAddress,
        role: FeatureRole,
        feature_type: FeatureType,
    ) -> &mut FeatureRemote {
        if let Some(pos) = self.features.iter().position(|f| f.address.feature == address.feature) {
            return &mut self.features[pos];
        }
        self.features.push(FeatureRemote::new(address, role, feature_type));
        self.features.last_mut().expect("just pushed")
    }

    pub fn remove_feature(&mut self, feature_id: u32) {
        self.features.retain(|f| f.address.feature != feature_id);
    }
}

pub struct DeviceLocal {
    pub address: DeviceAddress,
    pub entities: Vec<EntityLocal>,
}

impl DeviceLocal {
    pub fn new(address: DeviceAddress) -> Self {
        DeviceLocal {
            address,
            entities: Vec::new(),
        }
    }

    pub fn entity(&self, path: &[u32]) -> Option<&EntityLocal> {
        self.entities.iter().find(|e| e.address.entity == path)
    }

    pub fn entity_mut(&mut self, path: &[u32]) -> Option<&mut EntityLocal> {
        self.entities.iter_mut().find(|e| e.address.entity == path)
    }

    pub fn feature(&self, addr: &FeatureAddress) -> Option<&FeatureLocal> {
        self.entity(&addr.entity)?.feature(addr.feature)
    }

    pub fn feature_mut(&mut self, addr: &FeatureAddress) -> Option<&mut FeatureLocal> {
        self.entity_mut(&addr.entity)?.feature_mut(addr.feature)
    }
}

pub struct DeviceRemote {
    pub address: DeviceAddress,
    pub entities: Vec<EntityRemote>,
}

impl DeviceRemote {
    pub fn new(address: DeviceAddress) -> Self {
        DeviceRemote {
            address,
            entities: Vec::new(),
        }
    }

    pub fn entity(&self, path: &[u32]) -> Option<&EntityRemote> {
        self.entities.iter().find(|e| e.address.entity == path)
    }

    pub fn entity_mut(&mut self, path: &[u32]) -> Option<&mut EntityRemote> {
        self.entities.iter_mut().find(|e| e.address.entity == path)
    }

    pub fn feature(&self, addr: &FeatureAddress) -> Option<&FeatureRemote> {
        self.entity(&addr.entity)?.feature(addr.feature)
    }

    pub fn remove_entity(&mut self, path: &[u32]) {
        self.entities.retain(|e| e.address.entity != path);
    }

    pub fn entity_or_insert(&mut self, address: EntityAddress, entity_type: impl Into<String>) -> &mut EntityRemote {
        if let Some(pos) = self.entities.iter().position(|e| e.address.entity == address.entity) {
            self.entities[pos].entity_type = entity_type.into();
            return &mut self.entities[pos];
        }
        self.entities.push(EntityRemote::new(address, entity_type));
        self.entities.last_mut().expect("just pushed")
    }
}

/// `(actor, useCaseName, version, subRevision, available, scenarioIds)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseCaseSupport {
    pub actor: String,
    pub use_case_name: String,
    pub version: String,
    pub sub_revision: String,
    pub available: bool,
    pub scenario_ids: Vec<u32>,
}
