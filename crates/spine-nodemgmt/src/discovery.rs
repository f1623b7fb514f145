use spine_protocol::{
    DetailedDiscoveryData, DeviceLocal, DeviceRemote, EntityInformation, FeatureInformation, FeatureType,
};

use crate::events::NodeEvent;

/// Serves the local device's entity-feature tree as `DetailedDiscoveryData`
/// (§4.5: "serves the local device's entity-feature tree").
pub fn build_detailed_discovery_data(device: &DeviceLocal) -> DetailedDiscoveryData {
    let mut entities = Vec::new();
    let mut features = Vec::new();
    for entity in &device.entities {
        entities.push(EntityInformation {
            description: entity.address.clone(),
            entity_type: entity.entity_type.clone(),
        });
        for feature in &entity.features {
            features.push(FeatureInformation {
                description: feature.address.clone(),
                role: feature.role.into(),
                feature_type: feature.feature_type.wire_name().to_owned(),
            });
        }
    }
    DetailedDiscoveryData { entities, features }
}

/// Applies an inbound `DetailedDiscoveryData` to the peer's `DeviceRemote`,
/// adding or updating EntityRemote/FeatureRemote subtrees and returning the
/// resulting change events (§4.5). Entities/features present in `remote`
/// but absent from `data` are removed.
pub fn apply_detailed_discovery_data(
    remote: &mut DeviceRemote,
    data: &DetailedDiscoveryData,
) -> Vec<NodeEvent> {
    let mut events = Vec::new();

    let seen_entities: Vec<Vec<u32>> = data.entities.iter().map(|e| e.description.entity.clone()).collect();
    remote.entities.retain(|e| {
        let keep = seen_entities.contains(&e.address.entity);
        if !keep {
            events.push(NodeEvent::EntityRemoved(e.address.clone()));
        }
        keep
    });

    for entity_info in &data.entities {
        let is_new = remote.entity(&entity_info.description.entity).is_none();
        let entity = remote.entity_or_insert(entity_info.description.clone(), entity_info.entity_type.clone());
        if is_new {
            events.push(NodeEvent::EntityAdded(entity.address.clone()));
        }
    }

    for entity_info in &data.entities {
        let path = &entity_info.description.entity;
        let seen_features: Vec<u32> = data
            .features
            .iter()
            .filter(|f| &f.description.entity == path)
            .map(|f| f.description.feature)
            .collect();
        if let Some(entity) = remote.entity_mut(path) {
            let removed: Vec<_> = entity
                .features
                .iter()
                .filter(|f| !seen_features.contains(&f.address.feature))
                .map(|f| f.address.clone())
                .collect();
            for address in removed {
                entity.remove_feature(address.feature);
                events.push(NodeEvent::FeatureRemoved(address));
            }
        }
    }

    for feature_info in &data.features {
        let Some(entity) = remote.entity_mut(&feature_info.description.entity) else {
            continue;
        };
        let is_new = entity.feature(feature_info.description.feature).is_none();
        let feature_type = FeatureType::from_wire_name(&feature_info.feature_type).unwrap_or(FeatureType::Generic);
        let feature = entity.feature_or_insert(
            feature_info.description.clone(),
            feature_info.role.into(),
            feature_type,
        );
        if is_new {
            events.push(NodeEvent::FeatureAdded(feature.address.clone()));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use spine_protocol::{EntityAddress, EntityLocal, FeatureAddress, FeatureLocal, FeatureRole};

    fn local_fixture() -> DeviceLocal {
        let mut device = DeviceLocal::new("local".to_owned());
        let mut entity = EntityLocal::new(
            EntityAddress {
                device: "local".to_owned(),
                entity: vec![1],
            },
            "EVSE",
        );
        entity.features.push(FeatureLocal::new(
            FeatureAddress {
                device: "local".to_owned(),
                entity: vec![1],
                feature: 0,
            },
            FeatureRole::Server,
            FeatureType::Measurement,
        ));
        device.entities.push(entity);
        device
    }

    #[test]
    fn discovery_data_reflects_local_tree() {
        let device = local_fixture();
        let data = build_detailed_discovery_data(&device);
        assert_eq!(data.entities.len(), 1);
        assert_eq!(data.entities[0].entity_type, "EVSE");
        assert_eq!(data.features.len(), 1);
        assert_eq!(data.features[0].feature_type, "Measurement");
    }

    #[test]
    fn applying_discovery_data_adds_entities_and_features_once() {
        let device = local_fixture();
        let data = build_detailed_discovery_data(&device);
        let mut remote = DeviceRemote::new("peer".to_owned());

        let events = apply_detailed_discovery_data(&mut remote, &data);
        assert_eq!(events.len(), 2);
        assert_eq!(remote.entities.len(), 1);
        assert_eq!(remote.entities[0].features.len(), 1);

        let events_again = apply_detailed_discovery_data(&mut remote, &data);
        assert!(events_again.is_empty());
    }

    #[test]
    fn applying_a_shrunk_tree_removes_stale_subtrees() {
        let device = local_fixture();
        let data = build_detailed_discovery_data(&device);
        let mut remote = DeviceRemote::new("peer".to_owned());
        apply_detailed_discovery_data(&mut remote, &data);

        let empty = DetailedDiscoveryData {
            entities: Vec::new(),
            features: Vec::new(),
        };
        let events = apply_detailed_discovery_data(&mut remote, &empty);
        assert!(events.contains(&NodeEvent::EntityRemoved(EntityAddress {
            device: "peer".to_owned(),
            entity: vec![1],
        })));
        assert!(remote.entities.is_empty());
    }
}
