//! End-to-end solver tests.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slotplan_config::{
    AcceptorConfig, ConstructionHeuristicConfig, EnvironmentMode, LocalSearchConfig,
    MoveThreadCount, PhaseConfig, SolverConfig, TabuSearchConfig, TerminationConfig,
};
use slotplan_core::{HardSoftScore, SlotPlanError};
use slotplan_scoring::constraint_set::names;
use slotplan_test::builders::{bucket, order, schedule};
use slotplan_test::generator::{weekly_schedule, GeneratorConfig};
use slotplan_test::scenarios;

use crate::{FirstFitPhase, Phase, SearchScore, Solver, StepCountTermination, TerminationLevel};

fn stepped_config(acceptor: AcceptorConfig, steps: u64) -> SolverConfig {
    SolverConfig::new()
        .with_random_seed(3)
        .with_phase(PhaseConfig::ConstructionHeuristic(
            ConstructionHeuristicConfig::default(),
        ))
        .with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
            acceptor: Some(acceptor),
            termination: Some(TerminationConfig {
                step_count_limit: Some(steps),
                ..TerminationConfig::default()
            }),
            ..LocalSearchConfig::default()
        }))
}

fn tabu() -> AcceptorConfig {
    AcceptorConfig::TabuSearch(TabuSearchConfig::default())
}

#[test]
fn test_from_config_presets() {
    let solver = Solver::from_config(&SolverConfig::default_preset(5)).unwrap();
    assert_eq!(solver.phase_count(), 2);

    let fallback = Solver::from_config(&SolverConfig::new()).unwrap();
    assert_eq!(fallback.phase_count(), 2);
}

#[test]
fn test_from_config_rejects_unbounded_local_search() {
    let config = SolverConfig::new().with_phase(PhaseConfig::LocalSearch(LocalSearchConfig::default()));
    let err = Solver::from_config(&config).unwrap_err();
    assert!(matches!(err, SlotPlanError::Config(_)));

    // A global limit is enough.
    Solver::from_config(&config.with_termination_seconds(1)).unwrap();
}

#[test]
fn test_local_search_places_overflow_order() {
    let solver =
        Solver::from_config(&stepped_config(AcceptorConfig::HillClimbing, 20)).unwrap();
    let result = solver.solve(scenarios::over_subscribed_day()).unwrap();

    assert_eq!(result.unassigned, 0);
    // One order over capacity breaks both capacity rules.
    assert_eq!(result.score, HardSoftScore::of(-2, result.score.soft()));
    assert_eq!(
        result.explanation.score_of(names::EFFECTIVE_CAPACITY).hard(),
        -1
    );
    assert_eq!(result.explanation.score_of(names::BUFFER_CAPACITY).hard(), -1);
    assert!(!result.is_feasible());
    assert!(!result.terminated_early);
}

#[test]
fn test_explanation_and_indictments_match_score() {
    let solver = Solver::from_config(&stepped_config(tabu(), 200)).unwrap();
    let result = solver.solve(scenarios::mixed_week()).unwrap();

    assert_eq!(result.explanation.score, result.score);
    assert_eq!(result.schedule.score(), Some(result.score));
    assert_eq!(result.explanation.constraints.len(), 12);
    assert_eq!(result.indictments.len(), result.schedule.assigned_count());
    assert!(result
        .indictments
        .windows(2)
        .all(|pair| pair[0].score <= pair[1].score));
}

#[test]
fn test_returns_best_not_last() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let solver = Solver::from_config(&stepped_config(tabu(), 300))
        .unwrap()
        .with_best_solution_listener(move |event| {
            sink.lock().unwrap().push(event.score);
        });
    let result = solver.solve(weekly_schedule(&GeneratorConfig::default())).unwrap();

    let seen = seen.lock().unwrap();
    assert!(seen.len() >= 2);
    assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
    let last = seen.last().copied().unwrap();
    assert_eq!(last, SearchScore::new(result.unassigned, result.score));
    assert_eq!(result.statistics.improvement_count(), seen.len());
}

#[test]
fn test_preset_flag_returns_initial_schedule() {
    let flag = Arc::new(AtomicBool::new(true));
    let phases: Vec<Box<dyn Phase>> = vec![Box::new(FirstFitPhase::new())];
    let input = scenarios::mixed_week();
    let initial = input.assignments();
    let result = Solver::new(phases)
        .with_terminate_early_flag(flag)
        .solve(input)
        .unwrap();

    assert!(result.terminated_early);
    assert_eq!(result.schedule.assignments(), initial);
    assert_eq!(result.unassigned, initial.iter().filter(|a| a.is_none()).count());
    assert_eq!(result.statistics.total_step_count, 0);
    assert_eq!(result.schedule.score(), Some(result.score));
}

#[test]
fn test_seed_makes_runs_repeatable() {
    let run = |threads| {
        let config = stepped_config(tabu(), 150).with_move_thread_count(threads);
        Solver::from_config(&config)
            .unwrap()
            .solve(weekly_schedule(&GeneratorConfig::default()))
            .unwrap()
    };

    let first = run(MoveThreadCount::None);
    let second = run(MoveThreadCount::None);
    let parallel = run(MoveThreadCount::Count(3));

    assert_eq!(first.schedule.assignments(), second.schedule.assignments());
    assert_eq!(first.score, second.score);
    assert_eq!(first.schedule.assignments(), parallel.schedule.assignments());
}

#[test]
fn test_reproducible_mode_without_seed() {
    let run = || {
        let mut config = stepped_config(AcceptorConfig::HillClimbing, 100)
            .with_environment_mode(EnvironmentMode::Reproducible);
        config.random_seed = None;
        Solver::from_config(&config)
            .unwrap()
            .solve(weekly_schedule(&GeneratorConfig::default()))
            .unwrap()
            .schedule
            .assignments()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_full_assert_mode() {
    let config =
        stepped_config(tabu(), 100).with_environment_mode(EnvironmentMode::FullAssert);
    let result = Solver::from_config(&config)
        .unwrap()
        .solve(scenarios::mixed_week())
        .unwrap();
    assert_eq!(result.unassigned, 0);
}

/// A seeded week with spare room: every order fits somewhere without a hard
/// cost, but skills and allowed days still rule out most buckets.
fn roomy_week(seed: u64) -> slotplan_core::Schedule {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let orders = (0..50)
        .map(|i| {
            let first = rng.random_range(1..=4);
            let days = if rng.random_bool(0.4) {
                vec![first, first + 1]
            } else {
                vec![first]
            };
            let mut o = order(&format!("O-{:02}", i), &days)
                .location(
                    52.0 + rng.random_range(-0.05..0.05),
                    4.0 + rng.random_range(-0.05..0.05),
                )
                .weight(rng.random_range(1.0..20.0))
                .volume(rng.random_range(0.05..0.5));
            if rng.random_bool(0.25) {
                o = o.required_skill(if rng.random_bool(0.5) { "COLD" } else { "HEAVY" });
            }
            o
        })
        .collect();

    let mut buckets = Vec::new();
    for rider in 0..4 {
        for d in 1..=5 {
            let mut b = bucket(&format!("R{}-D{}", rider, d), &format!("R{}", rider), d, 12)
                .depot(52.0, 4.0)
                .rider_skill("GENERAL")
                .vehicle(1_000.0, 50.0)
                .buffer_ratio(0.25);
            if rider >= 2 {
                b = b.rider_skills(["COLD", "HEAVY"]);
            }
            buckets.push(b);
        }
    }
    schedule(orders, buckets)
}

#[test]
fn test_feasible_result_respects_hard_rules() {
    for seed in [1, 2, 3] {
        let result = Solver::from_config(&stepped_config(tabu(), 200))
            .unwrap()
            .solve(roomy_week(seed))
            .unwrap();
        assert_eq!(result.unassigned, 0);
        assert_eq!(result.score.hard(), 0);

        let schedule = &result.schedule;
        for b in 0..schedule.bucket_count() {
            let bucket = schedule.bucket(b);
            let load = schedule.orders_in_bucket(b).count() as i64;
            assert!(load <= bucket.effective_capacity(), "{} holds {}", bucket.id(), load);

            for o in schedule.orders_in_bucket(b) {
                let order = schedule.order(o);
                assert!(bucket.has_skills(order.required_skills()), "{} on {}", order.id(), bucket.id());
                assert!(order.is_allowed_on(bucket.date()), "{} on {}", order.id(), bucket.id());
            }
        }
    }
}

#[test]
fn test_no_orders() {
    let phases: Vec<Box<dyn Phase>> = vec![Box::new(FirstFitPhase::new())];
    let result = Solver::new(phases)
        .with_termination(Box::new(StepCountTermination::new(10, TerminationLevel::Solver)))
        .solve(schedule(vec![], vec![bucket("B-1", "R-1", 1, 3)]))
        .unwrap();

    assert_eq!(result.score, HardSoftScore::ZERO);
    assert_eq!(result.unassigned, 0);
    assert_eq!(result.statistics.total_step_count, 0);
    assert!(result.indictments.is_empty());
}
