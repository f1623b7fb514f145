//! SPINE data model: addresses, the device/entity/feature tree, function
//! data, and the datagram header/payload shape (§3, §4.3, §6).

pub mod address;
pub mod command;
pub mod datagram;
pub mod error;
pub mod feature;
pub mod function;

pub use address::{DeviceAddress, EntityAddress, FeatureAddress};
pub use command::Command;
pub use datagram::{CmdClassifier, Datagram, Header, SPEC_VERSION};
pub use error::EebusError;
pub use feature::{
    DeviceLocal, DeviceRemote, EntityLocal, EntityRemote, FeatureLocal, FeatureRemote, FeatureRole,
    FeatureType, UseCaseSupport,
};
pub use function::{
    BindingData, BindingDeleteCall, BindingRequestCall, DestinationEntry, DestinationListData,
    DetailedDiscoveryData, EntityInformation, FeatureInformation, FunctionData, FunctionType,
    LinkEntryWire, PartialFeatureAddress, ResultData, SubscriptionData, SubscriptionDeleteCall,
    SubscriptionRequestCall, UseCaseData, UseCaseSupportWire,
};
