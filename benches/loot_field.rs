//! Loot field tick throughput.
//!
//! Run with: cargo bench --bench loot_field

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use glam::Vec3;

use lootfall::items::ItemType;
use lootfall::world::FlatTerrain;
use lootfall::{Adventurer, EventBus, Inventory, Item, LootConfig, LootField, PlayerId, PlayerRoster};

const DT: f32 = 1.0 / 60.0;

/// `count` drops in a loose grid, one player standing off to the side
fn populated(count: usize) -> (LootField, PlayerRoster, BTreeMap<PlayerId, Adventurer>) {
    let bus = EventBus::new();
    let mut roster = PlayerRoster::new(bus.clone());
    let mut field = LootField::new(LootConfig::default(), bus);
    let hero = roster.spawn(Vec3::new(-20.0, 0.0, 0.0));

    let mut party = BTreeMap::new();
    party.insert(hero, Adventurer::new("Hero", Inventory::new(64)));

    for i in 0..count {
        let x = (i % 16) as f32 * 0.4;
        let z = (i / 16) as f32 * 0.4;
        let item = Item::new("ore", "Iron Ore", ItemType::Material, 1).with_stack(50, 1);
        field.spawn_item(item, Vec3::new(x, 1.0 + (i % 3) as f32 * 0.3, z));
    }
    (field, roster, party)
}

fn bench_field_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("loot_field_tick");
    let terrain = FlatTerrain::default();

    for count in [16usize, 64, 256].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}_drops", count)), count, |b, &count| {
            b.iter_batched(
                || populated(count),
                |(mut field, roster, mut party)| {
                    // one simulated second: falling, landing, settling
                    for _ in 0..60 {
                        black_box(field.tick(DT, &roster, &terrain, &mut party));
                    }
                    field
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_field_tick);
criterion_main!(benches);
