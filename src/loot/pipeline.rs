//! Drop pipeline
//!
//! Turns an enemy death into rewards: experience for the killer, gold
//! straight into their purse, and one loot entity per rolled item scattered
//! around the body.

use glam::Vec3;
use hecs::Entity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::field::LootField;
use crate::config::DropConfig;
use crate::events::{CombatEvent, EconomyEvent, EventBus, Notification, Severity};
use crate::items::{DropRollProvider, Item, ItemSummary};
use crate::progression::{xp_reward_for, LooterDirectory};
use crate::world::PlayerId;

/// A defeated enemy
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyDeath {
    pub name: String,
    pub level: u32,
    pub position: Vec3,
    pub killer: Option<PlayerId>,
    /// Overrides the level-based reward
    pub experience: Option<u32>,
}

impl EnemyDeath {
    pub fn new(name: impl Into<String>, level: u32, position: Vec3) -> Self {
        Self {
            name: name.into(),
            level: level.max(1),
            position,
            killer: None,
            experience: None,
        }
    }

    pub fn killed_by(mut self, player: PlayerId) -> Self {
        self.killer = Some(player);
        self
    }

    pub fn with_experience(mut self, amount: u32) -> Self {
        self.experience = Some(amount);
        self
    }
}

/// Everything one death produced
#[derive(Debug, Clone, PartialEq)]
pub struct DropRecord {
    pub source: String,
    pub position: Vec3,
    pub boss: bool,
    pub experience: u32,
    pub items: Vec<ItemSummary>,
    pub gold: u32,
    /// Spawned loot, in the same order as `items`
    pub entities: Vec<Entity>,
}

impl DropRecord {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.gold == 0
    }
}

/// Runs on every enemy death
pub struct DropPipeline<P: DropRollProvider> {
    provider: P,
    config: DropConfig,
    rng: StdRng,
    bus: EventBus,
}

impl<P: DropRollProvider> DropPipeline<P> {
    /// An invalid `config` is replaced by the defaults, keeping its seed
    pub fn new(provider: P, config: DropConfig, bus: EventBus) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("Rejected drop config ({}), using defaults", e);
                DropConfig { seed: config.seed, ..DropConfig::default() }
            }
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { provider, config, rng, bus }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn config(&self) -> &DropConfig {
        &self.config
    }

    pub fn on_enemy_death(
        &mut self,
        death: &EnemyDeath,
        field: &mut LootField,
        looters: &mut dyn LooterDirectory,
    ) -> DropRecord {
        let boss = self.config.is_boss_name(&death.name);
        let experience = death
            .experience
            .unwrap_or_else(|| xp_reward_for(death.level, boss));

        self.bus.publish(CombatEvent::EnemyDefeated {
            name: death.name.clone(),
            level: death.level,
            position: death.position,
            experience,
            boss,
        });
        log::info!(
            "{} (level {}{}) defeated, {} XP",
            death.name,
            death.level,
            if boss { ", boss" } else { "" },
            experience
        );

        let mut killer = death.killer.and_then(|id| looters.looter_mut(id).map(|l| (id, l)));
        if let Some((_, looter)) = killer.as_mut() {
            if looter.grant_experience(experience) > 0 {
                self.bus.publish(Notification::new("Level up!", Severity::Success).with_duration(3.0));
            }
        }

        let items = if boss {
            self.provider.roll_boss_loot(death.level)
        } else {
            self.provider.roll_for_loot(death.level)
        };

        let gold = self.provider.gold_range(death.level, boss).sample(&mut self.rng);
        if gold > 0 {
            match killer {
                Some((player, looter)) => {
                    let total = looter.add_gold(gold);
                    self.bus.publish(EconomyEvent::GoldCollected { player, amount: gold, total });
                    self.bus.publish(
                        Notification::new(format!("+{} gold", gold), Severity::Info).with_color((255, 215, 0)),
                    );
                }
                None => log::debug!("{} gold from {} went unclaimed", gold, death.name),
            }
        }

        let summaries: Vec<ItemSummary> = items.iter().map(Item::summary).collect();
        self.bus.publish(EconomyEvent::LootDropped {
            source: death.name.clone(),
            position: death.position,
            items: summaries.clone(),
            gold,
        });

        let entities = items
            .into_iter()
            .map(|item| self.spawn_drop(item, death.position, field))
            .collect();

        DropRecord {
            source: death.name.clone(),
            position: death.position,
            boss,
            experience,
            items: summaries,
            gold,
            entities,
        }
    }

    fn spawn_drop(&mut self, item: Item, origin: Vec3, field: &mut LootField) -> Entity {
        let cfg = &self.config;
        let rng = &mut self.rng;

        let offset = Vec3::new(
            symmetric(rng, cfg.jitter),
            cfg.vertical_offset,
            symmetric(rng, cfg.jitter),
        );
        let direction = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(cfg.upward_bias..=1.0),
            rng.gen_range(-1.0..=1.0),
        )
        .normalize_or_zero();
        let velocity = direction * cfg.impulse * cfg.impulse_reduction;
        let spin = Vec3::new(
            symmetric(rng, cfg.torque),
            symmetric(rng, cfg.torque),
            symmetric(rng, cfg.torque),
        );

        let mut loot = field
            .prepare(item, origin + offset)
            .with_velocity(velocity)
            .with_angular_velocity(spin);
        loot.arm_grounding_guard(cfg.grounding_check_delay, cfg.grounding_check_count);
        field.spawn(loot)
    }
}

/// Uniform in `[-extent, extent]`
fn symmetric(rng: &mut StdRng, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-extent..=extent)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::LootConfig;
    use crate::events::{GameEvent, Topic};
    use crate::items::{GoldRange, Inventory, ItemType, Rarity};
    use crate::progression::Adventurer;

    /// Hands out a fixed list every time
    struct FixedDrops {
        items: Vec<Item>,
        gold: GoldRange,
        boss_rolls: u32,
    }

    impl DropRollProvider for FixedDrops {
        fn roll_for_loot(&mut self, _level: u32) -> Vec<Item> {
            self.items.clone()
        }

        fn roll_boss_loot(&mut self, level: u32) -> Vec<Item> {
            self.boss_rolls += 1;
            self.roll_for_loot(level)
        }

        fn gold_range(&self, _level: u32, _boss: bool) -> GoldRange {
            self.gold
        }
    }

    fn setup(items: Vec<Item>, gold: GoldRange) -> (DropPipeline<FixedDrops>, LootField, EventBus) {
        let bus = EventBus::new();
        let field = LootField::new(LootConfig::default(), bus.clone());
        let config = DropConfig { seed: Some(11), ..DropConfig::default() };
        let provider = FixedDrops { items, gold, boss_rolls: 0 };
        (DropPipeline::new(provider, config, bus.clone()), field, bus)
    }

    fn party() -> BTreeMap<PlayerId, Adventurer> {
        let mut party = BTreeMap::new();
        party.insert(PlayerId(1), Adventurer::new("Hero", Inventory::new(10)));
        party
    }

    #[test]
    fn test_death_spawns_one_entity_per_item() {
        let items = vec![
            Item::new("sword", "Sword", ItemType::Weapon, 3).with_rarity(Rarity::Rare),
            Item::new("ore", "Iron Ore", ItemType::Material, 3).with_stack(50, 2),
        ];
        let (mut pipeline, mut field, bus) = setup(items, GoldRange::new(10, 10));
        let rx = bus.subscribe_all();
        let mut party = party();
        let origin = Vec3::new(5.0, 0.0, 5.0);

        let death = EnemyDeath::new("Ghoul", 3, origin).killed_by(PlayerId(1));
        let record = pipeline.on_enemy_death(&death, &mut field, &mut party);

        assert!(!record.boss);
        assert_eq!(record.gold, 10);
        assert_eq!(record.experience, 25);
        assert_eq!(record.entities.len(), 2);
        assert_eq!(field.len(), 2);
        assert_eq!(party[&PlayerId(1)].inventory.gold(), 10);
        assert_eq!(party[&PlayerId(1)].experience.current_xp, 25);

        for entity in &record.entities {
            let loot = field.get(*entity).unwrap();
            let offset = loot.position() - origin;
            assert!(offset.x.abs() <= 0.5 && offset.z.abs() <= 0.5);
            assert!((offset.y - 0.5).abs() < 1e-6);
            assert!(loot.body().velocity.y > 0.0);
            assert!(loot.body().velocity.length() <= 2.0 + 1e-4);
            assert!(loot.timers().grounding_guard.is_some());
        }

        let events = rx.drain();
        let order: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Combat(CombatEvent::EnemyDefeated { .. }) => Some("defeated"),
                GameEvent::Economy(EconomyEvent::GoldCollected { .. }) => Some("gold"),
                GameEvent::Economy(EconomyEvent::LootDropped { .. }) => Some("dropped"),
                _ => None,
            })
            .collect();
        assert_eq!(order, ["defeated", "gold", "dropped"]);
    }

    #[test]
    fn test_boss_name_uses_boss_roll() {
        let (mut pipeline, mut field, _bus) = setup(Vec::new(), GoldRange::none());
        let mut party = party();

        let death = EnemyDeath::new("The Bone BOSS", 5, Vec3::ZERO).killed_by(PlayerId(1));
        let record = pipeline.on_enemy_death(&death, &mut field, &mut party);

        assert!(record.boss);
        assert_eq!(record.experience, xp_reward_for(5, true));
        assert_eq!(pipeline.provider().boss_rolls, 1);
        assert!(record.is_empty());
        assert!(field.is_empty());
    }

    #[test]
    fn test_invalid_upward_bias_falls_back() {
        let bus = EventBus::new();
        let mut field = LootField::new(LootConfig::default(), bus.clone());
        let provider = FixedDrops {
            items: vec![Item::new("ring", "Bone Ring", ItemType::Ring, 2)],
            gold: GoldRange::none(),
            boss_rolls: 0,
        };
        let config = DropConfig { upward_bias: 1.5, seed: Some(4), ..DropConfig::default() };
        let mut pipeline = DropPipeline::new(provider, config, bus);
        assert_eq!(pipeline.config().upward_bias, DropConfig::default().upward_bias);
        assert_eq!(pipeline.config().seed, Some(4));

        let mut party = party();
        let death = EnemyDeath::new("Ghoul", 2, Vec3::ZERO).killed_by(PlayerId(1));
        let record = pipeline.on_enemy_death(&death, &mut field, &mut party);

        assert_eq!(record.entities.len(), 1);
        let loot = field.get(record.entities[0]).unwrap();
        assert!(loot.body().velocity.y > 0.0);
    }

    #[test]
    fn test_gold_without_killer_is_not_credited() {
        let (mut pipeline, mut field, bus) = setup(Vec::new(), GoldRange::new(3, 7));
        let rx = bus.subscribe(&[Topic::Economy]);
        let mut party = party();

        let death = EnemyDeath::new("Rat", 1, Vec3::ZERO).with_experience(1);
        let record = pipeline.on_enemy_death(&death, &mut field, &mut party);

        assert!((3..=7).contains(&record.gold));
        assert_eq!(record.experience, 1);
        assert_eq!(party[&PlayerId(1)].inventory.gold(), 0);
        let events = rx.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], GameEvent::Economy(EconomyEvent::LootDropped { gold, .. }) if *gold == record.gold));
    }
}
