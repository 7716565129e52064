use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use slotplan_config::ConstructionHeuristicConfig;
use slotplan_test::{bucket, order, scenarios, schedule};

use super::*;

fn construction_only() -> SolverConfig {
    SolverConfig::new()
        .with_random_seed(1)
        .with_phase(PhaseConfig::ConstructionHeuristic(
            ConstructionHeuristicConfig::default(),
        ))
}

fn quick() -> SolverConfig {
    SolverConfig::default_preset(1).with_random_seed(1)
}

#[test]
fn test_construction_leaves_overflow_unassigned() {
    let solved = solve(scenarios::over_subscribed_day(), &construction_only()).unwrap();

    assert_eq!(solved.summary.assigned, 2);
    assert_eq!(solved.summary.unassigned, 1);
    assert!(solved.score.hard() >= 0);
    assert_eq!(solved.explanation.score_of(names::EFFECTIVE_CAPACITY), HardSoftScore::ZERO);
    assert_eq!(solved.bucket_of("O-1"), Some("B-1"));
    assert_eq!(solved.bucket_of("O-3"), None);
}

#[test]
fn test_forced_skill_violation() {
    let forced = schedule(
        vec![order("O-1", &[1]).required_skill("ELECTRICAL").assigned_bucket(0)],
        vec![bucket("B-1", "R-1", 1, 5).rider_skill("GENERAL")],
    );
    let solved = solve(forced, &construction_only()).unwrap();

    assert_eq!(solved.score.hard(), -1);
    assert_eq!(
        solved.explanation.score_of(names::RIDER_SKILLS),
        HardSoftScore::of_hard(-1)
    );
    let other_hard: i64 = solved
        .explanation
        .hard_constraints()
        .filter(|c| c.name() != names::RIDER_SKILLS)
        .map(|c| c.score.hard())
        .sum();
    assert_eq!(other_hard, 0);
    assert_eq!(solved.indictments[0].order_id, "O-1");
    assert_eq!(solved.indictments[0].score.hard(), -1);
}

#[test]
fn test_clustering_bonus_follows_shared_bucket() {
    let together = solve(scenarios::nearby_pair(), &construction_only()).unwrap();
    assert_eq!(together.bucket_of("O-1"), together.bucket_of("O-2"));
    assert_eq!(
        together.explanation.score_of(names::CLUSTERING),
        HardSoftScore::of_soft(10)
    );

    let apart = schedule(
        vec![
            order("O-1", &[1]).location(52.0, 4.0).assigned_bucket(0),
            order("O-2", &[1]).location(52.009, 4.0).assigned_bucket(1),
        ],
        vec![
            bucket("B-1", "R-1", 1, 5).depot(52.0, 4.0),
            bucket("B-2", "R-2", 1, 5).depot(52.0, 4.0),
        ],
    );
    let apart = solve(apart, &construction_only()).unwrap();
    assert_eq!(apart.explanation.score_of(names::CLUSTERING), HardSoftScore::ZERO);
}

#[test]
fn test_overweight_pair_is_reported() {
    let solved = solve(scenarios::heavy_pair(), &quick()).unwrap();

    assert_eq!(solved.summary.unassigned, 0);
    assert!(!solved.is_feasible());
    assert!(solved.explanation.score_of(names::VEHICLE_WEIGHT).hard() < 0);
    assert_eq!(solved.summary.riders[0].orders, 2);
    assert!((solved.summary.riders[0].weight - 120.0).abs() < 1e-9);
}

#[test]
fn test_best_solution_callback() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let options = SolveOptions {
        on_best_solution: Some(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })),
        terminate_flag: None,
    };

    let solved = solve_with(scenarios::mixed_week(), &quick(), options).unwrap();
    assert_eq!(
        calls.load(Ordering::SeqCst),
        solved.statistics.improvement_count()
    );
    assert_eq!(solved.summary.total, 8);
    assert_eq!(solved.summary.unassigned, 0);
}

#[test]
fn test_stop_flag_set_before_solving() {
    let options = SolveOptions {
        on_best_solution: None,
        terminate_flag: Some(Arc::new(AtomicBool::new(true))),
    };
    let input = scenarios::mixed_week();
    let initial = input.assignments();
    let solved = solve_with(input, &quick(), options).unwrap();

    assert!(solved.terminated_early);
    assert_eq!(solved.schedule.assignments(), initial);
    assert_eq!(solved.statistics.total_step_count, 0);
    assert_eq!(solved.summary.unassigned, initial.iter().filter(|a| a.is_none()).count());
}

#[test]
fn test_invalid_config_fails_before_solving() {
    let config = SolverConfig::new().with_phase(PhaseConfig::LocalSearch(LocalSearchConfig::default()));
    assert!(matches!(
        solve(scenarios::mixed_week(), &config),
        Err(SlotPlanError::Config(_))
    ));
}

#[test]
fn test_summary_of_mixed_week() {
    let s = scenarios::mixed_week();
    let summary = ScheduleSummary::of(&s);

    assert_eq!(summary.total, 8);
    assert_eq!(summary.assigned, 0);
    assert_eq!(summary.assignment_rate, 0.0);
    // O-01, O-03, O-05 and O-07 allow more than one day.
    assert_eq!(summary.movable, 4);
    assert_eq!(summary.buckets.len(), 4);
    assert_eq!(summary.riders.len(), 2);
    // B-2 keeps 3 of its 4 slots after a 0.25 buffer.
    assert_eq!(summary.buckets[1].effective_capacity, 3);
    assert_eq!(summary.over_capacity().count(), 0);
}

#[test]
fn test_summary_counts_assigned_orders() {
    let s = schedule(
        vec![
            order("O-1", &[1, 2]).weight(3.0).assigned_bucket(0),
            order("O-2", &[1]).weight(2.0).assigned_bucket(0),
            order("O-3", &[1]),
        ],
        vec![bucket("B-1", "R-1", 1, 1), bucket("B-2", "R-2", 2, 2)],
    );
    let summary = ScheduleSummary::of(&s);

    assert_eq!(summary.assigned, 2);
    assert_eq!(summary.unassigned, 1);
    assert_eq!(summary.movable, 1);
    assert_eq!(summary.buckets[0].count, 2);
    assert!(summary.buckets[0].is_over_capacity());
    assert_eq!(summary.riders[0].active_days, 1);
    assert_eq!(summary.riders[1].orders, 0);
    assert!((summary.riders[0].weight - 5.0).abs() < 1e-9);
    assert!(summary.to_string().starts_with("2/3 orders assigned (66.7%)"));
}
