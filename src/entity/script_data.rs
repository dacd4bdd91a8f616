use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Per-creature storage for script state, one slot per Rust type.
///
/// Each sensor owns a state type and is the only writer of its slot. Readers
/// ask for the type they need and get `None` when no script ever wrote it.
#[derive(Default)]
pub struct ScriptData {
    slots: HashMap<TypeId, Box<dyn Any>>,
}

impl ScriptData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, replacing any previous value of the same type.
    pub fn insert<T: 'static>(&mut self, value: T) {
        self.slots.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast_ref::<T>())
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.slots
            .get_mut(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast_mut::<T>())
    }

    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.slots
            .remove(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl std::fmt::Debug for ScriptData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptData")
            .field("slots", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);

    #[derive(Debug, PartialEq)]
    struct Label(&'static str);

    #[test]
    fn slots_are_keyed_by_type() {
        let mut data = ScriptData::new();
        data.insert(Counter(1));
        data.insert(Label("home"));
        assert_eq!(data.get::<Counter>(), Some(&Counter(1)));
        assert_eq!(data.get::<Label>(), Some(&Label("home")));
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn insert_replaces_and_get_mut_updates() {
        let mut data = ScriptData::new();
        data.insert(Counter(1));
        data.insert(Counter(5));
        if let Some(c) = data.get_mut::<Counter>() {
            c.0 += 1;
        }
        assert_eq!(data.get::<Counter>(), Some(&Counter(6)));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn missing_slot_reads_none() {
        let mut data = ScriptData::new();
        assert!(data.get::<Counter>().is_none());
        assert!(!data.contains::<Counter>());
        data.insert(Counter(2));
        assert_eq!(data.remove::<Counter>(), Some(Counter(2)));
        assert!(data.is_empty());
    }
}
