use spine_protocol::FeatureAddress;

/// A `(id, serverFeature, clientFeature)` tuple (§3 "Links"). Ids are
/// monotonic and unique within their container; both addresses are
/// non-owning references into the DeviceLocal/DeviceRemote graph — the
/// DeviceLocal lock is what keeps the referenced features alive for the
/// lifetime of any link observed outside that lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: u64,
    pub server_address: FeatureAddress,
    pub client_address: FeatureAddress,
}

/// Shared storage for the Subscription and Binding Managers — each owns
/// exactly one of these (§3, §4.4).
#[derive(Debug, Default)]
pub struct LinkContainer {
    next_id: u64,
    entries: Vec<Link>,
}

impl LinkContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, server: &FeatureAddress, client: &FeatureAddress) -> Option<&Link> {
        self.entries
            .iter()
            .find(|l| &l.server_address == server && &l.client_address == client)
    }

    pub fn find_by_server(&self, server: &FeatureAddress) -> Option<&Link> {
        self.entries.iter().find(|l| &l.server_address == server)
    }

    /// Allocate the next id and insert a new link. Callers are expected to
    /// have already checked whatever uniqueness rule applies.
    pub fn insert(&mut self, server: FeatureAddress, client: FeatureAddress) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Link {
            id,
            server_address: server,
            client_address: client,
        });
        id
    }

    pub fn remove(&mut self, server: &FeatureAddress, client: &FeatureAddress) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|l| !(&l.server_address == server && &l.client_address == client));
        self.entries.len() != before
    }

    /// Remove every link whose client feature belongs to `device` (or, if
    /// `entity` is given, to that specific remote entity), returning the
    /// removed links so callers can publish Remove events for each.
    pub fn remove_client_device(&mut self, device: &str) -> Vec<Link> {
        self.remove_where(|l| l.client_address.device == device)
    }

    pub fn remove_client_entity(&mut self, device: &str, entity: &[u32]) -> Vec<Link> {
        self.remove_where(|l| l.client_address.device == device && l.client_address.entity == entity)
    }

    fn remove_where(&mut self, pred: impl Fn(&Link) -> bool) -> Vec<Link> {
        let mut removed = Vec::new();
        self.entries.retain(|l| {
            if pred(l) {
                removed.push(l.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// All links whose client feature belongs to `device`, in container
    /// order. Used to build the node-management reply structure — the
    /// output index is a running counter over matches, not the container's
    /// own index (Open Question (i): the source writes to `array[i]` where
    /// `i` is the loop index over the *whole* container, which leaves gaps
    /// for non-matching entries; this implementation pushes matches onto a
    /// fresh `Vec` instead).
    pub fn for_client_device(&self, device: &str) -> Vec<&Link> {
        self.entries
            .iter()
            .filter(|l| l.client_address.device == device)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(device: &str, feature: u32) -> FeatureAddress {
        FeatureAddress {
            device: device.to_owned(),
            entity: vec![1],
            feature,
        }
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let mut c = LinkContainer::new();
        let a = c.insert(addr("local", 1), addr("remote", 2));
        let b = c.insert(addr("local", 1), addr("remote", 3));
        assert!(b > a);
    }

    #[test]
    fn for_client_device_uses_a_running_index_not_container_index() {
        let mut c = LinkContainer::new();
        c.insert(addr("local", 1), addr("other-remote", 9));
        c.insert(addr("local", 1), addr("remote", 2));
        c.insert(addr("local", 1), addr("other-remote", 9));
        c.insert(addr("local", 1), addr("remote", 3));

        let matches = c.for_client_device("remote");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].client_address.feature, 2);
        assert_eq!(matches[1].client_address.feature, 3);
    }
}
