//! Lootfall - Entry Point
//!
//! Headless demo: a hero clears a small room, then walks over the drops
//! while the loot field runs at a fixed 60 Hz step.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::Vec3;

use lootfall::events::{GameEvent, Topic};
use lootfall::items::{ItemCatalog, ItemCategory};
use lootfall::world::FlatTerrain;
use lootfall::{
    Adventurer, DropPipeline, EnemyDeath, EventBus, GameConfig, Inventory, LootField, LootState, PlayerDirectory,
    PlayerId, PlayerRoster, TableDropRoller,
};

/// Fixed simulation step
const TICK_RATE: u32 = 60;
/// Hero walking speed in units per second
const WALK_SPEED: f32 = 5.0;
/// Give up collecting after this many seconds
const MAX_SIM_SECONDS: f32 = 60.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Lootfall v{}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(GameConfig::user_path)
        .context("no config path given and no user config directory available")?;
    let config = GameConfig::load_or_default(&config_path);
    let catalog = ItemCatalog::load_or_default(&config_path.with_file_name("items.ron"));
    log::info!("{} item templates available", catalog.len());

    let bus = EventBus::new();
    let notifications = bus.subscribe(&[Topic::Ui, Topic::Economy]);

    let mut roster = PlayerRoster::new(bus.clone());
    let mut field = LootField::new(config.loot.clone(), bus.clone());
    let seed = config.drop.seed.unwrap_or_else(rand::random);
    let mut pipeline = DropPipeline::new(TableDropRoller::new(catalog, seed), config.drop.clone(), bus.clone());

    let hero = roster.spawn(Vec3::ZERO);
    let mut party: BTreeMap<PlayerId, Adventurer> = BTreeMap::new();
    party.insert(hero, Adventurer::new("Hero", Inventory::default()));

    let enemies = [
        ("Ghoul", 2, Vec3::new(6.0, 0.0, 2.0)),
        ("Cave Rat", 1, Vec3::new(-4.0, 0.0, 7.0)),
        ("Ghoul", 3, Vec3::new(9.0, 0.0, -5.0)),
        ("Bone Boss", 5, Vec3::new(14.0, 0.0, 10.0)),
    ];
    for (name, level, position) in enemies {
        let death = EnemyDeath::new(name, level, position).killed_by(hero);
        let record = pipeline.on_enemy_death(&death, &mut field, &mut party);
        log::info!("{} dropped {} item(s) and {} gold", record.source, record.items.len(), record.gold);
    }

    let terrain = FlatTerrain::default();
    let dt = 1.0 / TICK_RATE as f32;
    let mut elapsed = 0.0;
    while !field.is_empty() && elapsed < MAX_SIM_SECONDS {
        walk_toward_nearest_drop(&mut roster, hero, &field, dt);
        field.tick(dt, &roster, &terrain, &mut party);
        elapsed += dt;

        for event in notifications.drain() {
            if let GameEvent::Notification(note) = event {
                log::info!("[{:?}] {}", note.severity, note.message);
            }
        }
    }
    let idle = field.count_in_state(LootState::Idle);
    log::info!("Simulation ended after {:.1}s, {} drop(s) left ({} idle)", elapsed, field.len(), idle);

    report(party.get_mut(&hero).context("hero left the party")?);
    Ok(())
}

/// Step the hero toward the closest drop still lying around
fn walk_toward_nearest_drop(roster: &mut PlayerRoster, hero: PlayerId, field: &LootField, dt: f32) {
    let Some(from) = roster.position_of(hero) else {
        return;
    };
    let target = field
        .entities()
        .into_iter()
        .filter_map(|e| field.get(e).filter(|l| !l.state().is_terminal()).map(|l| l.position()))
        .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)));

    if let Some(target) = target {
        let mut to_target = target - from;
        to_target.y = 0.0;
        let step = (WALK_SPEED * dt).min(to_target.length());
        roster.move_to(hero, from + to_target.normalize_or_zero() * step);
    }
}

fn report(hero: &mut Adventurer) {
    hero.inventory.sort();
    log::info!(
        "{} is level {} ({}) with {} gold",
        hero.name,
        hero.experience.level,
        hero.title(),
        hero.inventory.gold()
    );
    for item in hero.inventory.items() {
        log::info!("  {} [{}] worth {}", item.display_name(), item.rarity.name(), item.stack_value());
    }

    let potion = hero
        .inventory
        .items_of_category(ItemCategory::Consumable)
        .first()
        .map(|item| item.id.clone());
    if let Some(id) = potion {
        if let Some(used) = hero.inventory.consume(&id) {
            log::info!("Drank a potion: {:?}, {} left", used.restore, used.remaining);
        }
    }
    log::info!("Inventory value: {} gold", hero.inventory.total_value());
}
