//! Player directory
//!
//! Loot entities never hold a player directly. They cache a `PlayerId` and
//! look positions up through a `PlayerDirectory` each time they need one.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;

use crate::events::{EventBus, PlayerEvent};

/// Stable handle for a player in the current scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Read-only lookup of player positions
pub trait PlayerDirectory {
    fn position_of(&self, id: PlayerId) -> Option<Vec3>;

    /// Closest player to `from`, ties broken by lowest id
    fn nearest(&self, from: Vec3) -> Option<(PlayerId, Vec3)>;
}

/// The players present in the current scene.
///
/// Every change is announced on the event bus so cached references elsewhere
/// can be dropped or refreshed.
pub struct PlayerRoster {
    players: BTreeMap<PlayerId, Vec3>,
    next_id: u32,
    scene: String,
    bus: EventBus,
}

impl PlayerRoster {
    pub fn new(bus: EventBus) -> Self {
        Self {
            players: BTreeMap::new(),
            next_id: 1,
            scene: String::from("start"),
            bus,
        }
    }

    pub fn spawn(&mut self, position: Vec3) -> PlayerId {
        let id = PlayerId(self.next_id);
        self.next_id += 1;
        self.players.insert(id, position);
        log::info!("Spawned {} at {:?}", id, position);
        self.bus.publish(PlayerEvent::Spawned { player: id, position });
        id
    }

    pub fn despawn(&mut self, id: PlayerId) -> bool {
        if self.players.remove(&id).is_none() {
            return false;
        }
        log::info!("Despawned {}", id);
        self.bus.publish(PlayerEvent::Destroyed { player: id });
        true
    }

    /// Move a player. Movement is frequent and not announced.
    pub fn move_to(&mut self, id: PlayerId, position: Vec3) -> bool {
        match self.players.get_mut(&id) {
            Some(slot) => {
                *slot = position;
                true
            }
            None => false,
        }
    }

    /// Leave the current scene; every player is removed
    pub fn change_scene(&mut self, scene: impl Into<String>) {
        self.scene = scene.into();
        self.players.clear();
        log::info!("Scene transition to {}", self.scene);
        self.bus.publish(PlayerEvent::SceneTransition { scene: self.scene.clone() });
    }

    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.keys().copied()
    }
}

impl PlayerDirectory for PlayerRoster {
    fn position_of(&self, id: PlayerId) -> Option<Vec3> {
        self.players.get(&id).copied()
    }

    fn nearest(&self, from: Vec3) -> Option<(PlayerId, Vec3)> {
        self.players
            .iter()
            .map(|(id, pos)| (*id, *pos, pos.distance_squared(from)))
            .min_by(|a, b| a.2.total_cmp(&b.2).then(a.0.cmp(&b.0)))
            .map(|(id, pos, _)| (id, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{GameEvent, Topic};

    #[test]
    fn test_nearest_player() {
        let mut roster = PlayerRoster::new(EventBus::new());
        let far = roster.spawn(Vec3::new(10.0, 0.0, 0.0));
        let near = roster.spawn(Vec3::new(2.0, 0.0, 0.0));

        assert_eq!(roster.nearest(Vec3::ZERO).map(|(id, _)| id), Some(near));
        assert_eq!(roster.nearest(Vec3::new(9.0, 0.0, 0.0)).map(|(id, _)| id), Some(far));
        assert!(PlayerRoster::new(EventBus::new()).nearest(Vec3::ZERO).is_none());
    }

    #[test]
    fn test_changes_are_published() {
        let bus = EventBus::new();
        let rx = bus.subscribe(&[Topic::Player]);
        let mut roster = PlayerRoster::new(bus);

        let id = roster.spawn(Vec3::ZERO);
        assert!(roster.move_to(id, Vec3::ONE));
        assert!(roster.despawn(id));
        assert!(!roster.despawn(id));
        roster.change_scene("crypt");

        let events = rx.drain();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], GameEvent::Player(PlayerEvent::Spawned { player, .. }) if player == id));
        assert!(matches!(events[1], GameEvent::Player(PlayerEvent::Destroyed { .. })));
        assert!(matches!(&events[2], GameEvent::Player(PlayerEvent::SceneTransition { scene }) if scene == "crypt"));
    }

    #[test]
    fn test_scene_change_clears_players() {
        let mut roster = PlayerRoster::new(EventBus::new());
        let id = roster.spawn(Vec3::ZERO);
        roster.change_scene("town");
        assert!(roster.is_empty());
        assert!(roster.position_of(id).is_none());
    }
}
