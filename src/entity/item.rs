use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::CreatureId;
use crate::util::geometry::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    Head,
    Body,
    MainHand,
    OffHand,
    Finger,
}

impl Slot {
    pub fn name(self) -> &'static str {
        match self {
            Slot::Head => "head",
            Slot::Body => "body",
            Slot::MainHand => "main hand",
            Slot::OffHand => "off hand",
            Slot::Finger => "finger",
        }
    }
}

/// Creature statistics that equipment can modify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Defense,
    Melee,
    HealthMax,
    Speed,
}

/// Additive bonus applied while the item is worn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifier {
    pub attribute: Attribute,
    pub amount: i32,
}

impl Modifier {
    pub const fn new(attribute: Attribute, amount: i32) -> Self {
        Self { attribute, amount }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseEffect {
    /// Restore health, then the item is consumed.
    Heal(i32),
}

/// Immutable description shared by every item of one kind.
#[derive(Debug, PartialEq, Eq)]
pub struct ItemTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub glyph: char,
    pub description: &'static str,
    /// Slots the item may be worn in. Empty for items that cannot be equipped.
    pub slots: &'static [Slot],
    pub modifiers: &'static [Modifier],
    pub use_effect: Option<UseEffect>,
}

impl ItemTemplate {
    /// Fold this item's modifiers for `attribute` into `value`.
    pub fn modify(&self, attribute: Attribute, value: i32) -> i32 {
        self.modifiers
            .iter()
            .filter(|m| m.attribute == attribute)
            .fold(value, |v, m| v + m.amount)
    }

    pub fn is_equipment(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn fits(&self, slot: Slot) -> bool {
        self.slots.contains(&slot)
    }
}

/// Where an item currently lives. Exactly one location at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Ground(Coord),
    Inventory(CreatureId),
    Equipment(CreatureId, Slot),
}

#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub template: &'static ItemTemplate,
    /// `None` only between detaching from one location and attaching to the next.
    pub owner: Option<Owner>,
}

impl Item {
    pub fn name(&self) -> &'static str {
        self.template.name
    }

    /// The creature holding or wearing this item, if any.
    pub fn holder(&self) -> Option<CreatureId> {
        match self.owner {
            Some(Owner::Inventory(c)) | Some(Owner::Equipment(c, _)) => Some(c),
            _ => None,
        }
    }

    /// Where the item lies, if it is on the ground.
    pub fn ground_position(&self) -> Option<Coord> {
        match self.owner {
            Some(Owner::Ground(c)) => Some(c),
            _ => None,
        }
    }
}

/// Arena of every live item in a world, addressed by id.
#[derive(Debug, Default)]
pub struct Items {
    items: BTreeMap<ItemId, Item>,
    next_id: u64,
}

impl Items {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unplaced item. The caller attaches it somewhere.
    pub fn create(&mut self, template: &'static ItemTemplate) -> ItemId {
        self.next_id += 1;
        let id = ItemId(self.next_id);
        self.items.insert(
            id,
            Item {
                id,
                template,
                owner: None,
            },
        );
        id
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        self.items.remove(&id)
    }

    pub fn set_owner(&mut self, id: ItemId, owner: Option<Owner>) {
        if let Some(item) = self.items.get_mut(&id) {
            item.owner = owner;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CLOAK: ItemTemplate = ItemTemplate {
        key: "cloak",
        name: "cloak",
        glyph: '[',
        description: "A warm cloak.",
        slots: &[Slot::Body],
        modifiers: &[
            Modifier::new(Attribute::Defense, 1),
            Modifier::new(Attribute::Speed, -5),
            Modifier::new(Attribute::Defense, 1),
        ],
        use_effect: None,
    };

    #[test]
    fn modifiers_fold_per_attribute() {
        assert_eq!(CLOAK.modify(Attribute::Defense, 2), 4);
        assert_eq!(CLOAK.modify(Attribute::Speed, 100), 95);
        assert_eq!(CLOAK.modify(Attribute::Melee, 3), 3);
        assert!(CLOAK.is_equipment());
        assert!(CLOAK.fits(Slot::Body));
        assert!(!CLOAK.fits(Slot::Head));
    }

    #[test]
    fn ids_are_unique_and_never_reused() {
        let mut items = Items::new();
        let a = items.create(&CLOAK);
        let b = items.create(&CLOAK);
        assert_ne!(a, b);
        items.remove(b);
        let c = items.create(&CLOAK);
        assert_ne!(b, c);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn holder_follows_owner() {
        let mut items = Items::new();
        let id = items.create(&CLOAK);
        assert_eq!(items.get(id).and_then(|i| i.holder()), None);
        items.set_owner(id, Some(Owner::Equipment(CreatureId(4), Slot::Body)));
        assert_eq!(items.get(id).and_then(|i| i.holder()), Some(CreatureId(4)));
        items.set_owner(id, Some(Owner::Ground(Coord::new(1, 1))));
        assert_eq!(items.get(id).and_then(|i| i.holder()), None);
    }
}
