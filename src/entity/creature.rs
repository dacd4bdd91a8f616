use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::behavior::Behavior;
use crate::entity::item::{Attribute, ItemId, ItemTemplate, Items, Owner, Slot};
use crate::entity::script_data::ScriptData;
use crate::util::geometry::Coord;
use crate::util::table::RollMany;
use crate::world::script::CreatureScript;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Monster,
    Wildlife,
    Neutral,
}

impl Faction {
    /// Guards and chasers only pick targets this returns true for.
    pub fn is_hostile_to(self, other: Faction) -> bool {
        matches!(
            (self, other),
            (Faction::Player, Faction::Monster) | (Faction::Monster, Faction::Player)
        )
    }

    /// Whether the mere presence of `other` nearby is alarming.
    pub fn fears(self, other: Faction) -> bool {
        match self {
            Faction::Wildlife => matches!(other, Faction::Player | Faction::Monster),
            _ => self.is_hostile_to(other),
        }
    }
}

pub type BehaviorFactory = fn() -> Box<dyn Behavior>;

/// Immutable description of one kind of creature.
///
/// Scripts run in the listed order for every hook. Sensors that read other
/// sensors' data must come after them.
pub struct CreatureType {
    pub key: &'static str,
    pub name: &'static str,
    pub glyph: char,
    pub faction: Faction,
    pub defense: i32,
    pub melee: i32,
    pub health_max: i32,
    pub speed: i32,
    pub behavior: Option<BehaviorFactory>,
    pub scripts: &'static [&'static dyn CreatureScript],
    /// Items created in the inventory on spawn.
    pub kit: &'static [&'static ItemTemplate],
    /// Rolled on death; results are dropped where the creature fell.
    pub loot: RollMany<&'static ItemTemplate>,
}

impl CreatureType {
    pub fn base(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Defense => self.defense,
            Attribute::Melee => self.melee,
            Attribute::HealthMax => self.health_max,
            Attribute::Speed => self.speed,
        }
    }
}

impl std::fmt::Debug for CreatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatureType")
            .field("key", &self.key)
            .field("faction", &self.faction)
            .field("scripts", &self.scripts.iter().map(|s| s.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl PartialEq for CreatureType {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

#[derive(Debug)]
pub struct Creature {
    pub id: CreatureId,
    pub kind: &'static CreatureType,
    /// Stored health. Never negative and never above the computed maximum.
    pub health: i32,
    pub position: Coord,
    /// Accumulates speed every turn; each decision spends a fixed cost.
    pub initiative: i32,
    pub inventory: Vec<ItemId>,
    pub equipment: BTreeMap<Slot, ItemId>,
    pub script_data: ScriptData,
}

impl Creature {
    pub fn new(id: CreatureId, kind: &'static CreatureType, position: Coord) -> Self {
        Self {
            id,
            kind,
            health: kind.health_max,
            position,
            initiative: 0,
            inventory: Vec::new(),
            equipment: BTreeMap::new(),
            script_data: ScriptData::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name
    }

    pub fn faction(&self) -> Faction {
        self.kind.faction
    }

    pub fn is_hostile_to(&self, other: &Creature) -> bool {
        self.faction().is_hostile_to(other.faction())
    }

    /// Base value folded through every equipped item's modifiers.
    pub fn attribute(&self, attribute: Attribute, items: &Items) -> i32 {
        self.equipment
            .values()
            .filter_map(|id| items.get(*id))
            .fold(self.kind.base(attribute), |value, item| {
                item.template.modify(attribute, value)
            })
    }

    pub fn health_max(&self, items: &Items) -> i32 {
        self.attribute(Attribute::HealthMax, items).max(1)
    }

    pub fn is_dead(&self) -> bool {
        self.health < 1
    }

    /// Subtract up to `amount` health and return how much was actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let lost = amount.clamp(0, self.health.max(0));
        self.health -= lost;
        lost
    }

    /// Restore up to `amount` health and return how much was gained.
    pub fn heal(&mut self, amount: i32, items: &Items) -> i32 {
        let max = self.health_max(items);
        let gained = amount.clamp(0, (max - self.health).max(0));
        self.health += gained;
        gained
    }

    pub fn owns(&self, item: ItemId) -> bool {
        self.inventory.contains(&item) || self.equipped_slot(item).is_some()
    }

    pub fn equipped_slot(&self, item: ItemId) -> Option<Slot> {
        self.equipment
            .iter()
            .find(|(_, id)| **id == item)
            .map(|(slot, _)| *slot)
    }

    /// Move `item` from the inventory into `slot`, or into the first free slot
    /// it fits when `slot` is `None`. Returns false, changing nothing, when
    /// the item is not carried, does not fit, or the slot is taken.
    pub fn equip(&mut self, items: &mut Items, item: ItemId, slot: Option<Slot>) -> bool {
        if !self.inventory.contains(&item) {
            return false;
        }
        let Some(template) = items.get(item).map(|i| i.template) else {
            return false;
        };
        let slot = match slot {
            Some(s) if template.fits(s) => s,
            Some(_) => return false,
            None => match template
                .slots
                .iter()
                .find(|s| !self.equipment.contains_key(*s))
            {
                Some(s) => *s,
                None => return false,
            },
        };
        if self.equipment.contains_key(&slot) {
            return false;
        }
        self.inventory.retain(|id| *id != item);
        self.equipment.insert(slot, item);
        items.set_owner(item, Some(Owner::Equipment(self.id, slot)));
        true
    }

    /// Move an equipped item back into the inventory. Returns false if it
    /// was not equipped. Health is clamped to the reduced maximum.
    pub fn unequip(&mut self, items: &mut Items, item: ItemId) -> bool {
        let Some(slot) = self.equipped_slot(item) else {
            return false;
        };
        self.equipment.remove(&slot);
        self.inventory.push(item);
        items.set_owner(item, Some(Owner::Inventory(self.id)));
        self.health = self.health.min(self.health_max(items));
        true
    }

    /// Every item this creature carries or wears.
    pub fn belongings(&self) -> Vec<ItemId> {
        let mut all = self.inventory.clone();
        all.extend(self.equipment.values().copied());
        all
    }
}
