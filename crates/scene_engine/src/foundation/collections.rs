//! Stable keys for the scene's arenas
//!
//! Nodes, models and materials live in slot maps so that a parent and its
//! children can refer to one another by key instead of by pointer. A key stays
//! valid until its slot is removed, after which lookups return `None`.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Key of a node inside a scene graph arena
    pub struct NodeId;

    /// Key of a model in the scene's resource table
    pub struct ModelId;

    /// Key of a material in the scene's resource table
    pub struct MaterialId;
}

/// Slot map paired with a name index, for resources addressed both ways
#[derive(Debug)]
pub struct NamedSlotMap<K: slotmap::Key, V> {
    items: SlotMap<K, V>,
    names: std::collections::HashMap<String, K>,
}

impl<K: slotmap::Key, V> Default for NamedSlotMap<K, V> {
    fn default() -> Self {
        Self {
            items: SlotMap::with_key(),
            names: std::collections::HashMap::new(),
        }
    }
}

impl<K: slotmap::Key, V> NamedSlotMap<K, V> {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under `name`. Returns `None` if the name is already taken.
    pub fn insert(&mut self, name: &str, value: V) -> Option<K> {
        if self.names.contains_key(name) {
            return None;
        }
        let key = self.items.insert(value);
        self.names.insert(name.to_owned(), key);
        Some(key)
    }

    /// Look up by key
    #[must_use]
    pub fn get(&self, key: K) -> Option<&V> {
        self.items.get(key)
    }

    /// Mutable lookup by key
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.items.get_mut(key)
    }

    /// Look up a key by name
    #[must_use]
    pub fn key_of(&self, name: &str) -> Option<K> {
        self.names.get(name).copied()
    }

    /// Look up a value by name
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&V> {
        self.key_of(name).and_then(|key| self.items.get(key))
    }

    /// Number of stored values
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the map is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over all values
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.items.values()
    }

    /// Remove everything, yielding the values so their owners can release them
    pub fn drain(&mut self) -> impl Iterator<Item = V> + '_ {
        self.names.clear();
        self.items.drain().map(|(_, value)| value)
    }
}
