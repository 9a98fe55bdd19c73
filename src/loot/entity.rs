//! Loot entity
//!
//! One dropped item in the world. It falls, lands, settles, idles, homes in
//! on a nearby player and is finally collected, or expires if nobody comes
//! for it. All timed behaviour is countdown state advanced by [`LootEntity::tick`].

use std::sync::Arc;

use glam::Vec3;

use super::collect::{collect, CollectReceipt, Rejection};
use super::state::LootState;
use super::timers::{fire, Countdown, GroundingGuard, LootTimers, Stabilization};
use super::visual::VisualState;
use crate::config::LootConfig;
use crate::events::{EventBus, PlayerEvent};
use crate::items::Item;
use crate::progression::LooterDirectory;
use crate::world::{PlayerDirectory, PlayerId, Terrain};

/// Collision radius of a dropped item
pub const BODY_RADIUS: f32 = 0.25;

/// Horizontal velocity kept per ground contact
const GROUND_FRICTION: f32 = 0.5;

/// Simulated body state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Driven by animation instead of physics
    pub kinematic: bool,
    pub gravity: bool,
    pub collider: bool,
}

impl RigidBody {
    pub fn dynamic(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            kinematic: false,
            gravity: true,
            collider: true,
        }
    }

    fn freeze(&mut self) {
        self.kinematic = true;
        self.gravity = false;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    fn release(&mut self) {
        self.kinematic = false;
        self.gravity = true;
        self.collider = true;
    }
}

/// A physical contact reported to a loot entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Static ground; `point` is on the surface
    Static { point: Vec3 },
    /// Another dynamic body; `normal` points from it toward this entity
    Dynamic { normal: Vec3 },
}

/// Collaborators a loot entity needs during a tick
pub struct TickContext<'a> {
    pub players: &'a dyn PlayerDirectory,
    pub terrain: &'a dyn Terrain,
    pub looters: &'a mut dyn LooterDirectory,
    pub bus: &'a EventBus,
}

/// Cached result of the last player lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedPlayer {
    pub id: PlayerId,
    pub position: Vec3,
    pub distance: f32,
}

/// A dropped item in the world
#[derive(Debug)]
pub struct LootEntity {
    item: Option<Item>,
    name: String,
    state: LootState,
    /// Set first thing on a pickup; every later request is a no-op
    picked_up: bool,
    destroyed: bool,
    body: RigidBody,
    anchor: Option<Vec3>,
    age: f32,
    tracked: Option<TrackedPlayer>,
    timers: LootTimers,
    visual: VisualState,
    config: Arc<LootConfig>,
}

impl LootEntity {
    /// Wrap an item at `position`. Rarity visuals are set up here.
    pub fn new(item: Item, position: Vec3, config: Arc<LootConfig>) -> Self {
        let timers = LootTimers {
            player_refresh: Some(Countdown::immediate()),
            ..LootTimers::default()
        };
        Self {
            name: item.name.clone(),
            visual: VisualState::new(item.rarity),
            item: Some(item),
            state: LootState::Falling,
            picked_up: false,
            destroyed: false,
            body: RigidBody::dynamic(position),
            anchor: None,
            age: 0.0,
            tracked: None,
            timers,
            config,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.body.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.body.angular_velocity = angular_velocity;
        self
    }

    /// Re-probe the terrain `checks` times, `interval` seconds apart
    pub fn arm_grounding_guard(&mut self, interval: f32, checks: u32) {
        if checks == 0 {
            return;
        }
        self.timers.grounding_guard = Some(GroundingGuard {
            countdown: Countdown::new(interval),
            interval,
            checks_left: checks,
        });
    }

    pub fn state(&self) -> LootState {
        self.state
    }

    /// The wrapped item, `None` once it has been handed to an inventory
    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn anchor(&self) -> Option<Vec3> {
        self.anchor
    }

    pub fn visual(&self) -> &VisualState {
        &self.visual
    }

    pub fn timers(&self) -> &LootTimers {
        &self.timers
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn tracked_player(&self) -> Option<TrackedPlayer> {
        self.tracked
    }

    pub fn is_picked_up(&self) -> bool {
        self.picked_up
    }

    /// Ready to be removed from the world
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_fading(&self) -> bool {
        !self.state.is_terminal() && self.age > self.config.fade_start()
    }

    /// Simulated by physics and able to touch other bodies
    pub fn is_dynamic(&self) -> bool {
        !self.state.is_terminal() && !self.body.kinematic && self.body.collider
    }

    /// Advance one simulation step
    pub fn tick(&mut self, dt: f32, ctx: &mut TickContext<'_>) {
        if self.destroyed {
            return;
        }
        if self.state == LootState::Collected {
            if fire(&mut self.timers.destroy, dt) {
                self.destroyed = true;
            }
            return;
        }
        if self.state.is_terminal() {
            return;
        }

        self.age += dt;
        if self.age >= self.config.lifetime {
            self.expire("lifetime elapsed");
            return;
        }
        self.update_fade();

        self.track_player(dt, ctx.players);
        self.check_despawn_distance(dt, ctx.players);
        if self.state.is_terminal() {
            return;
        }

        fire(&mut self.timers.reattract, dt);
        self.run_grounding_guard(dt, ctx.terrain);

        match self.state {
            LootState::Falling => self.step_physics(dt, ctx.terrain),
            LootState::Landed => {
                self.step_physics(dt, ctx.terrain);
                self.stabilize(dt, ctx.terrain);
            }
            LootState::Idle if !self.body.kinematic => self.step_physics(dt, ctx.terrain),
            LootState::Idle => self.animate_idle(dt),
            LootState::Attracting => self.home(dt, ctx),
            LootState::Collected | LootState::Expired => {}
        }

        if self.state.can_attract() {
            self.try_start_attracting();
        }
        self.run_auto_pickup(dt, ctx);
    }

    /// React to a physical contact
    pub fn on_contact(&mut self, contact: Contact) {
        if self.state.is_terminal() || self.body.kinematic || !self.body.collider {
            return;
        }

        match contact {
            Contact::Static { point } => {
                self.body.velocity.y = self.body.velocity.y.max(0.0);
                self.body.velocity.x *= GROUND_FRICTION;
                self.body.velocity.z *= GROUND_FRICTION;
                if matches!(self.state, LootState::Falling | LootState::Idle) {
                    self.land(point);
                }
            }
            Contact::Dynamic { normal } => {
                let normal = normal.normalize_or_zero();
                let approach = self.body.velocity.dot(normal);
                if approach < 0.0 {
                    self.body.velocity -= (1.0 + self.config.restitution) * approach * normal;
                }
            }
        }
    }

    /// A player walked into the pickup trigger
    pub fn on_trigger(
        &mut self,
        player: PlayerId,
        looters: &mut dyn LooterDirectory,
        bus: &EventBus,
    ) -> Result<CollectReceipt, Rejection> {
        if !self.body.collider {
            return Err(Rejection::Terminal);
        }
        self.request_collection(player, looters, bus)
    }

    /// Entry point shared by every pickup signal
    pub fn request_collection(
        &mut self,
        player: PlayerId,
        looters: &mut dyn LooterDirectory,
        bus: &EventBus,
    ) -> Result<CollectReceipt, Rejection> {
        if self.picked_up || self.state.is_terminal() {
            log::trace!("Ignoring pickup request for {} ({})", self.name, self.state);
            return Err(Rejection::Terminal);
        }
        let looter = looters.looter_mut(player).ok_or(Rejection::NoInventory(player))?;
        collect(self, player, looter.store_mut(), bus)
    }

    /// Invalidate or refresh the cached player on presence changes
    pub fn handle_player_event(&mut self, event: &PlayerEvent) {
        if self.state.is_terminal() {
            return;
        }
        match event {
            PlayerEvent::Spawned { .. } => {
                self.timers.player_refresh = Some(Countdown::immediate());
            }
            PlayerEvent::Destroyed { player } => {
                if self.tracked.is_some_and(|t| t.id == *player) {
                    self.drop_target();
                }
            }
            PlayerEvent::SceneTransition { .. } => self.drop_target(),
        }
    }

    fn drop_target(&mut self) {
        self.tracked = None;
        self.timers.despawn_check = None;
        self.timers.player_refresh = Some(Countdown::immediate());
        self.abort_homing();
    }

    fn update_fade(&mut self) {
        let fade_start = self.config.fade_start();
        if self.age <= fade_start {
            return;
        }
        let span = self.config.lifetime - fade_start;
        self.visual.opacity = if span > 0.0 {
            (1.0 - (self.age - fade_start) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    fn track_player(&mut self, dt: f32, players: &dyn PlayerDirectory) {
        let due = match self.timers.player_refresh.as_mut() {
            Some(countdown) => countdown.tick(dt),
            None => true,
        };
        if !due {
            return;
        }

        let position = self.body.position;
        let found = if self.state == LootState::Attracting {
            // keep homing on the same player
            self.tracked
                .and_then(|t| players.position_of(t.id).map(|p| (t.id, p)))
        } else {
            players.nearest(position)
        };
        self.tracked = found.map(|(id, p)| TrackedPlayer {
            id,
            position: p,
            distance: p.distance(position),
        });

        let interval = if self.tracked.is_some() {
            self.config.player_refresh_interval
        } else {
            self.config.player_reacquire_interval
        };
        self.timers.player_refresh = Some(Countdown::new(interval));
    }

    fn check_despawn_distance(&mut self, dt: f32, players: &dyn PlayerDirectory) {
        let limit = self.config.despawn_distance;
        let far = self.tracked.is_some_and(|t| t.distance > limit);

        if self.timers.despawn_check.is_none() {
            if far {
                self.timers.despawn_check = Some(Countdown::new(self.config.despawn_recheck_delay));
            }
            return;
        }
        if !far {
            self.timers.despawn_check = None;
            return;
        }
        if fire(&mut self.timers.despawn_check, dt) {
            let position = self.body.position;
            let still_far = self
                .tracked
                .and_then(|t| players.position_of(t.id))
                .is_some_and(|p| p.distance(position) > limit);
            if still_far {
                self.expire("player out of range");
            }
        }
    }

    fn step_physics(&mut self, dt: f32, terrain: &dyn Terrain) {
        if self.body.kinematic {
            return;
        }

        // grounded bodies are supported; only the fall itself can sink them
        let body = &mut self.body;
        if body.gravity && self.state != LootState::Landed {
            body.velocity.y -= self.config.gravity * dt;
        }
        body.velocity *= (1.0 - self.config.drag * dt).max(0.0);
        body.position += body.velocity * dt;
        body.angular_velocity *= (1.0 - self.config.angular_damping * dt).max(0.0);
        self.visual.rotation =
            (self.visual.rotation + body.angular_velocity.y * dt).rem_euclid(std::f32::consts::TAU);

        let position = self.body.position;
        if let Some(height) = terrain.ground_height(position.x, position.z) {
            if position.y <= height + self.config.rest_height && self.body.velocity.y <= 0.0 {
                self.on_contact(Contact::Static {
                    point: Vec3::new(position.x, height, position.z),
                });
            }
        }
    }

    fn land(&mut self, point: Vec3) {
        log::debug!("{} landed at {:?} (surface {:.2})", self.name, self.body.position, point.y);
        self.state = LootState::Landed;
        self.anchor = Some(self.body.position);
        self.timers.stabilization = Some(Stabilization::Grace(Countdown::new(self.config.stabilize_grace)));
        if self.config.auto_pickup && self.timers.auto_pickup.is_none() {
            self.timers.auto_pickup = Some(Countdown::new(self.config.auto_pickup_delay));
        }
    }

    fn stabilize(&mut self, dt: f32, terrain: &dyn Terrain) {
        let (settling, done) = match self.timers.stabilization.as_mut() {
            None => return,
            Some(Stabilization::Grace(countdown)) => (false, countdown.tick(dt)),
            Some(Stabilization::Settle(countdown)) => (true, countdown.tick(dt)),
        };
        if !done {
            return;
        }

        if settling {
            self.timers.stabilization = None;
            self.body.freeze();
            self.anchor = Some(self.body.position);
            self.state = LootState::Idle;
            log::trace!("{} settled", self.name);
        } else {
            self.correct_penetration(terrain);
            self.timers.stabilization = Some(Stabilization::Settle(Countdown::new(self.config.stabilize_settle)));
        }
    }

    /// Probe down and lift the item back to rest height if it sank.
    /// Returns true if a correction was applied.
    fn correct_penetration(&mut self, terrain: &dyn Terrain) -> bool {
        let resting = if self.body.kinematic {
            self.anchor.unwrap_or(self.body.position)
        } else {
            self.body.position
        };
        let origin = resting + Vec3::Y * self.config.probe_height;
        let Some(contact) = terrain.probe_down(origin, self.config.probe_height + self.config.probe_distance) else {
            return false;
        };

        let rest_y = contact.y + self.config.rest_height;
        let depth = rest_y - resting.y;
        if depth <= self.config.penetration_tolerance {
            return false;
        }

        log::debug!("Grounding correction: {} sank {:.3} below rest height", self.name, depth);
        let corrected = Vec3::new(resting.x, rest_y, resting.z);
        self.body.position = corrected;
        self.body.velocity = Vec3::ZERO;
        if self.anchor.is_some() {
            self.anchor = Some(corrected);
        }
        true
    }

    fn run_grounding_guard(&mut self, dt: f32, terrain: &dyn Terrain) {
        if self.state == LootState::Attracting {
            return;
        }
        let Some(guard) = self.timers.grounding_guard.as_mut() else {
            return;
        };
        if !guard.countdown.tick(dt) {
            return;
        }

        guard.checks_left = guard.checks_left.saturating_sub(1);
        if guard.checks_left == 0 {
            self.timers.grounding_guard = None;
        } else {
            guard.countdown = Countdown::new(guard.interval);
        }
        self.correct_penetration(terrain);
    }

    fn animate_idle(&mut self, dt: f32) {
        let config = &self.config;
        self.visual.animate(
            dt,
            config.rotate_speed,
            (config.bob_height, config.bob_speed),
            (config.pulse_amount, config.pulse_speed),
        );
        if let Some(anchor) = self.anchor {
            self.body.position = anchor + Vec3::Y * self.visual.bob_offset;
        }
    }

    fn try_start_attracting(&mut self) -> bool {
        if !self.state.can_attract() || self.picked_up || self.timers.reattract.is_some() {
            return false;
        }
        let Some(target) = self.tracked else {
            return false;
        };
        if target.distance > self.config.magnet_distance {
            return false;
        }

        log::debug!("{} attracted to {} at {:.2}", self.name, target.id, target.distance);
        self.state = LootState::Attracting;
        self.timers.stabilization = None;
        self.body.freeze();
        self.body.collider = false;
        self.visual.rest();
        true
    }

    fn home(&mut self, dt: f32, ctx: &mut TickContext<'_>) {
        let Some(target) = self.tracked else {
            self.abort_homing();
            return;
        };
        let Some(player_pos) = ctx.players.position_of(target.id) else {
            self.tracked = None;
            self.abort_homing();
            return;
        };

        let position = self.body.position;
        let distance = player_pos.distance(position);
        self.tracked = Some(TrackedPlayer { id: target.id, position: player_pos, distance });
        if distance > self.config.abort_distance() {
            self.abort_homing();
            return;
        }

        let goal = player_pos + Vec3::Y * self.config.attract_height_offset;
        let to_goal = goal - position;
        let remaining = to_goal.length();
        let multiplier = if self.config.smart_attraction {
            (remaining / self.config.pickup_distance).clamp(0.5, 2.0)
        } else {
            1.0
        };
        let step = self.config.attract_speed * multiplier * dt;
        self.body.position = if step >= remaining {
            goal
        } else {
            position + to_goal / remaining * step
        };
        self.visual.rotation =
            (self.visual.rotation + self.config.rotate_speed * 2.0 * dt).rem_euclid(std::f32::consts::TAU);

        if self.body.position.distance(goal) <= self.config.homing_completion_distance {
            if let Err(reason) = self.request_collection(target.id, ctx.looters, ctx.bus) {
                log::trace!("{} not collected on arrival: {}", self.name, reason);
            }
        }
    }

    fn run_auto_pickup(&mut self, dt: f32, ctx: &mut TickContext<'_>) {
        if !fire(&mut self.timers.auto_pickup, dt) {
            return;
        }
        if let Some(target) = self.tracked {
            if target.distance <= self.config.magnet_distance {
                if let Err(reason) = self.request_collection(target.id, ctx.looters, ctx.bus) {
                    log::trace!("{} auto pickup skipped: {}", self.name, reason);
                }
            }
        }
        if !self.picked_up && !self.state.is_terminal() {
            self.timers.auto_pickup = Some(Countdown::new(self.config.auto_pickup_delay));
        }
    }

    /// Give up homing and hand the body back to physics
    fn abort_homing(&mut self) {
        if self.state != LootState::Attracting {
            return;
        }
        log::debug!("{} stopped homing", self.name);
        self.state = LootState::Idle;
        self.body.release();
    }

    fn expire(&mut self, reason: &str) {
        if self.state.is_terminal() {
            return;
        }
        log::debug!("{} expired: {}", self.name, reason);
        self.state = LootState::Expired;
        self.timers.cancel_all();
        self.body.collider = false;
        self.visual.opacity = 0.0;
        self.destroyed = true;
    }

    /// Claim the item for a transfer. Sets the terminal flag before anything
    /// else happens.
    pub(crate) fn begin_pickup(&mut self) -> Option<Item> {
        if self.picked_up || self.state.is_terminal() {
            return None;
        }
        self.picked_up = true;
        let item = self.item.take();
        if item.is_none() {
            self.picked_up = false;
        }
        item
    }

    /// The inventory accepted the item
    pub(crate) fn complete_pickup(&mut self) {
        self.state = LootState::Collected;
        self.timers.cancel_all();
        self.timers.destroy = Some(Countdown::new(self.config.collect_settle_delay));
        self.body.freeze();
        self.body.collider = false;
    }

    /// The inventory refused the item after the pre-check passed
    pub(crate) fn rollback_pickup(&mut self, item: Item) {
        self.item = Some(item);
        self.picked_up = false;
        self.reject_pickup();
    }

    /// Stay on the ground and hold off homing for a while
    pub(crate) fn reject_pickup(&mut self) {
        self.abort_homing();
        self.timers.reattract = Some(Countdown::new(self.config.reattract_cooldown));
    }
}
