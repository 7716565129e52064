//! Seeded random weekly instances for solver tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slotplan_core::Schedule;

use crate::builders::{bucket, order, schedule};

/// Shape of a generated instance.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub orders: usize,
    pub riders: usize,
    pub days: u32,
    pub capacity: i64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            orders: 40,
            riders: 3,
            days: 5,
            capacity: 4,
            seed: 7,
        }
    }
}

const SKILLS: [&str; 3] = ["GENERAL", "COLD", "HEAVY"];

/// Generates a reproducible week around a single city.
///
/// Every rider works every day. Roughly a third of orders are movable.
pub fn weekly_schedule(config: &GeneratorConfig) -> Schedule {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let orders = (0..config.orders)
        .map(|i| {
            let first = rng.random_range(1..=config.days);
            let mut days = vec![first];
            if rng.random_bool(0.35) && first < config.days {
                days.push(first + 1);
            }
            let mut o = order(&format!("O-{:03}", i), &days)
                .location(
                    52.0 + rng.random_range(-0.05..0.05),
                    4.0 + rng.random_range(-0.05..0.05),
                )
                .weight(rng.random_range(1.0..25.0))
                .volume(rng.random_range(0.05..0.8));
            if rng.random_bool(0.15) {
                o = o.required_skill(SKILLS[rng.random_range(1..SKILLS.len())]);
            }
            o
        })
        .collect();

    let mut buckets = Vec::new();
    for r in 0..config.riders {
        let skills: Vec<&str> = SKILLS
            .iter()
            .copied()
            .filter(|_| rng.random_bool(0.6))
            .collect();
        for d in 1..=config.days {
            buckets.push(
                bucket(&format!("R{}-D{}", r, d), &format!("R{}", r), d, config.capacity)
                    .depot(52.0, 4.0)
                    .rider_skill("GENERAL")
                    .rider_skills(skills.iter().copied())
                    .vehicle(120.0, 6.0)
                    .buffer_ratio(0.1)
                    .movable_occupation_ratio_threshold(0.5),
            );
        }
    }

    schedule(orders, buckets)
}
