//! Loot field
//!
//! Owns every dropped item in the scene as a hecs entity and drives them
//! through one fixed step at a time: player presence events, body contacts,
//! entity ticks, pickup triggers, then removal of destroyed entities.

use std::sync::Arc;

use glam::Vec3;
use hecs::{Entity, World};

use super::collect::{CollectReceipt, Rejection};
use super::entity::{Contact, LootEntity, TickContext, BODY_RADIUS};
use super::state::LootState;
use crate::config::LootConfig;
use crate::events::{EventBus, EventReceiver, GameEvent, Topic};
use crate::items::Item;
use crate::progression::LooterDirectory;
use crate::world::{PlayerDirectory, PlayerId, Terrain};

/// What happened during one field tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldReport {
    pub collected: usize,
    pub expired: usize,
    /// Entities removed from the world
    pub despawned: usize,
}

/// Player currently standing inside an entity's pickup trigger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TriggerOccupant(Option<PlayerId>);

/// All loot entities in the current scene
pub struct LootField {
    world: World,
    config: Arc<LootConfig>,
    bus: EventBus,
    player_events: EventReceiver,
}

impl LootField {
    /// An invalid `config` is replaced by the defaults
    pub fn new(config: LootConfig, bus: EventBus) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("Rejected loot config ({}), using defaults", e);
                LootConfig::default()
            }
        };
        let player_events = bus.subscribe(&[Topic::Player]);
        Self {
            world: World::new(),
            config: Arc::new(config),
            bus,
            player_events,
        }
    }

    pub fn config(&self) -> &LootConfig {
        &self.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Build an entity sharing this field's tunables, without spawning it
    pub fn prepare(&self, item: Item, position: Vec3) -> LootEntity {
        LootEntity::new(item, position, Arc::clone(&self.config))
    }

    pub fn spawn(&mut self, loot: LootEntity) -> Entity {
        log::debug!("Spawned {} at {:?}", loot.name(), loot.position());
        self.world.spawn((loot, TriggerOccupant::default()))
    }

    /// Drop an item at rest velocity
    pub fn spawn_item(&mut self, item: Item, position: Vec3) -> Entity {
        let loot = self.prepare(item, position);
        self.spawn(loot)
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    pub fn get(&self, entity: Entity) -> Option<hecs::Ref<'_, LootEntity>> {
        self.world.get::<&LootEntity>(entity).ok()
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<hecs::RefMut<'_, LootEntity>> {
        self.world.get::<&mut LootEntity>(entity).ok()
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.world.iter().map(|e| e.entity()).collect()
    }

    pub fn count_in_state(&mut self, state: LootState) -> usize {
        self.world
            .query_mut::<&LootEntity>()
            .into_iter()
            .filter(|(_, loot)| loot.state() == state)
            .count()
    }

    /// Ask a specific entity to be picked up, e.g. from an interact key
    pub fn request_collection(
        &mut self,
        entity: Entity,
        player: PlayerId,
        looters: &mut dyn LooterDirectory,
    ) -> Result<CollectReceipt, Rejection> {
        let bus = self.bus.clone();
        let mut loot = self.get_mut(entity).ok_or(Rejection::Terminal)?;
        loot.request_collection(player, looters, &bus)
    }

    /// Advance every entity by `dt` seconds
    pub fn tick(
        &mut self,
        dt: f32,
        players: &dyn PlayerDirectory,
        terrain: &dyn Terrain,
        looters: &mut dyn LooterDirectory,
    ) -> FieldReport {
        self.forward_player_events();
        self.resolve_body_contacts();

        let mut report = FieldReport::default();
        let mut ctx = TickContext {
            players,
            terrain,
            looters,
            bus: &self.bus,
        };
        let pickup_distance = self.config.pickup_distance;

        for (_, (loot, occupant)) in self.world.query_mut::<(&mut LootEntity, &mut TriggerOccupant)>() {
            let before = loot.state();
            loot.tick(dt, &mut ctx);

            // the trigger fires on enter, not while a player stays inside
            let inside = players
                .nearest(loot.position())
                .filter(|(_, at)| at.distance(loot.position()) <= pickup_distance)
                .map(|(player, _)| player);
            if let Some(player) = inside.filter(|p| occupant.0 != Some(*p)) {
                if loot.body().collider && !loot.state().is_terminal() {
                    if let Err(reason) = loot.on_trigger(player, ctx.looters, ctx.bus) {
                        log::trace!("{} trigger pickup failed: {}", loot.name(), reason);
                    }
                }
            }
            occupant.0 = inside;

            let after = loot.state();
            if after != before {
                match after {
                    LootState::Collected => report.collected += 1,
                    LootState::Expired => report.expired += 1,
                    _ => {}
                }
            }
        }

        let destroyed: Vec<Entity> = self
            .world
            .query_mut::<&LootEntity>()
            .into_iter()
            .filter(|(_, loot)| loot.is_destroyed())
            .map(|(entity, _)| entity)
            .collect();
        for entity in destroyed {
            if self.world.despawn(entity).is_ok() {
                report.despawned += 1;
            }
        }

        if report != FieldReport::default() {
            log::trace!("Loot field tick: {:?}", report);
        }
        report
    }

    fn forward_player_events(&mut self) {
        let events = self.player_events.drain();
        if events.is_empty() {
            return;
        }
        for (_, loot) in self.world.query_mut::<&mut LootEntity>() {
            for event in &events {
                if let GameEvent::Player(event) = event {
                    loot.handle_player_event(event);
                }
            }
        }
    }

    /// Pairwise overlap test between dynamic bodies
    fn resolve_body_contacts(&mut self) {
        let bodies: Vec<(Entity, Vec3)> = self
            .world
            .query_mut::<&LootEntity>()
            .into_iter()
            .filter(|(_, loot)| loot.is_dynamic())
            .map(|(entity, loot)| (entity, loot.position()))
            .collect();

        let reach = BODY_RADIUS * 2.0;
        let mut contacts = Vec::new();
        for (i, &(a, pa)) in bodies.iter().enumerate() {
            for &(b, pb) in &bodies[i + 1..] {
                let offset = pa - pb;
                if offset.length_squared() < reach * reach {
                    let normal = offset.try_normalize().unwrap_or(Vec3::X);
                    contacts.push((a, normal));
                    contacts.push((b, -normal));
                }
            }
        }

        for (entity, normal) in contacts {
            if let Ok(mut loot) = self.world.get::<&mut LootEntity>(entity) {
                loot.on_contact(Contact::Dynamic { normal });
            }
        }
    }
}
