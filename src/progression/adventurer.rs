//! Rewards receivers
//!
//! Whoever defeats an enemy or picks up loot is a `Looter`. Looters are
//! found by `PlayerId` through a `LooterDirectory`, never held directly.

use std::collections::{BTreeMap, HashMap};

use super::xp::{level_title, Experience};
use crate::items::{Inventory, ItemStore, PlayerStats};
use crate::world::PlayerId;

/// Receives experience, gold and items
pub trait Looter {
    /// Returns the number of levels gained
    fn grant_experience(&mut self, amount: u32) -> u32;

    /// Returns the new gold total
    fn add_gold(&mut self, amount: u32) -> u32;

    fn store(&self) -> &dyn ItemStore;

    fn store_mut(&mut self) -> &mut dyn ItemStore;
}

/// Mutable lookup of looters by player
pub trait LooterDirectory {
    fn looter_mut(&mut self, id: PlayerId) -> Option<&mut dyn Looter>;
}

impl<L: Looter> LooterDirectory for BTreeMap<PlayerId, L> {
    fn looter_mut(&mut self, id: PlayerId) -> Option<&mut dyn Looter> {
        self.get_mut(&id).map(|l| l as &mut dyn Looter)
    }
}

impl<L: Looter> LooterDirectory for HashMap<PlayerId, L> {
    fn looter_mut(&mut self, id: PlayerId) -> Option<&mut dyn Looter> {
        self.get_mut(&id).map(|l| l as &mut dyn Looter)
    }
}

/// A player character as far as the loot economy cares
#[derive(Debug, Default)]
pub struct Adventurer {
    pub name: String,
    pub experience: Experience,
    pub stats: PlayerStats,
    pub inventory: Inventory,
}

impl Adventurer {
    pub fn new(name: impl Into<String>, inventory: Inventory) -> Self {
        Self {
            name: name.into(),
            experience: Experience::new(),
            stats: PlayerStats { level: 1, ..PlayerStats::default() },
            inventory,
        }
    }

    pub fn title(&self) -> &'static str {
        level_title(self.experience.level)
    }
}

impl Looter for Adventurer {
    fn grant_experience(&mut self, amount: u32) -> u32 {
        let gained = self.experience.add_xp(amount);
        if gained > 0 {
            self.stats.level = self.experience.level;
            log::info!("{} reached level {} ({})", self.name, self.experience.level, self.title());
        }
        gained
    }

    fn add_gold(&mut self, amount: u32) -> u32 {
        self.inventory.add_gold(amount);
        self.inventory.gold()
    }

    fn store(&self) -> &dyn ItemStore {
        &self.inventory
    }

    fn store_mut(&mut self) -> &mut dyn ItemStore {
        &mut self.inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_up_syncs_stats() {
        let mut hero = Adventurer::new("Hero", Inventory::new(4));
        assert_eq!(hero.grant_experience(100), 1);
        assert_eq!(hero.stats.level, 2);
        assert_eq!(hero.title(), "Novice");
    }

    #[test]
    fn test_directory_lookup() {
        let mut party = BTreeMap::new();
        party.insert(PlayerId(1), Adventurer::new("Hero", Inventory::new(4)));

        let looter = party.looter_mut(PlayerId(1)).unwrap();
        assert_eq!(looter.add_gold(25), 25);
        assert_eq!(looter.store().capacity(), 4);
        assert!(party.looter_mut(PlayerId(2)).is_none());
        assert_eq!(party[&PlayerId(1)].inventory.gold(), 25);
    }
}
