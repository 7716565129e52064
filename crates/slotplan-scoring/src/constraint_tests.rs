//! Rule-by-rule checks of the slot assignment constraints.

use slotplan_core::{HardSoftScore, Schedule};
use slotplan_test::{bucket, order, scenarios, schedule, time};

use crate::constraint_set::names;
use crate::{IncrementalScoreDirector, ScoreDirector, ScoreExplanation};

fn explain(schedule: Schedule, assignments: &[(&str, &str)]) -> ScoreExplanation {
    let mut director = IncrementalScoreDirector::for_schedule(schedule).unwrap();
    for (order_id, bucket_id) in assignments {
        let o = director.working_schedule().find_order(order_id).unwrap();
        let b = director.working_schedule().find_bucket(bucket_id).unwrap();
        director.change_bucket(o, Some(b));
    }
    director.explain()
}

#[test]
fn test_breakdown_lists_all_twelve_constraints() {
    let explanation = explain(scenarios::mixed_week(), &[]);
    assert_eq!(explanation.constraints.len(), 12);
    assert_eq!(explanation.hard_constraints().count(), 6);
    assert_eq!(explanation.soft_constraints().count(), 6);
    assert_eq!(explanation.score, HardSoftScore::ZERO);
}

#[test]
fn test_unassigned_orders_contribute_nothing() {
    let explanation = explain(scenarios::mixed_week(), &[]);
    assert!(explanation.broken().next().is_none());
    assert!(explanation.constraints.iter().all(|c| c.match_count == 0));
}

#[test]
fn test_allowed_day_violation() {
    let s = schedule(
        vec![order("O-1", &[1, 2])],
        vec![bucket("B-3", "R-1", 3, 5)],
    );
    let explanation = explain(s, &[("O-1", "B-3")]);
    assert_eq!(explanation.score_of(names::ALLOWED_DAY), HardSoftScore::of_hard(-1));
    // Day 3 is two days after the earliest allowed day.
    assert_eq!(explanation.score_of(names::EARLIEST_DAY), HardSoftScore::of_soft(-2));
}

#[test]
fn test_missing_skill_is_one_hard_point() {
    let explanation = explain(scenarios::missing_skill(), &[("O-1", "B-1")]);
    assert_eq!(explanation.score_of(names::RIDER_SKILLS), HardSoftScore::of_hard(-1));
    assert_eq!(explanation.score.hard(), -1);
    for c in explanation.hard_constraints() {
        if c.name() != names::RIDER_SKILLS {
            assert_eq!(c.score, HardSoftScore::ZERO, "{}", c.name());
        }
    }
}

#[test]
fn test_skill_superset_is_satisfied() {
    let s = schedule(
        vec![order("O-1", &[1]).required_skill("COLD")],
        vec![bucket("B-1", "R-1", 1, 5).rider_skills(["COLD", "HEAVY"])],
    );
    let explanation = explain(s, &[("O-1", "B-1")]);
    assert_eq!(explanation.score_of(names::RIDER_SKILLS), HardSoftScore::ZERO);
}

#[test]
fn test_capacity_is_penalized_twice() {
    let explanation = explain(
        scenarios::over_subscribed_day(),
        &[("O-1", "B-1"), ("O-2", "B-1"), ("O-3", "B-1")],
    );
    assert_eq!(explanation.score_of(names::EFFECTIVE_CAPACITY), HardSoftScore::of_hard(-1));
    assert_eq!(explanation.score_of(names::BUFFER_CAPACITY), HardSoftScore::of_hard(-1));
    assert_eq!(explanation.score.hard(), -2);
}

#[test]
fn test_capacity_uses_buffered_ceiling() {
    // floor(4 * 0.75) = 3
    let s = schedule(
        vec![order("A", &[1]), order("B", &[1]), order("C", &[1]), order("D", &[1])],
        vec![bucket("B-1", "R-1", 1, 4).buffer_ratio(0.25)],
    );
    let explanation = explain(
        s,
        &[("A", "B-1"), ("B", "B-1"), ("C", "B-1"), ("D", "B-1")],
    );
    assert_eq!(explanation.score_of(names::EFFECTIVE_CAPACITY), HardSoftScore::of_hard(-1));
}

#[test]
fn test_weight_overload() {
    let explanation = explain(scenarios::heavy_pair(), &[("O-1", "B-1"), ("O-2", "B-1")]);
    assert_eq!(explanation.score_of(names::VEHICLE_WEIGHT), HardSoftScore::of_hard(-20));
    assert_eq!(explanation.score.hard(), -20);
}

#[test]
fn test_weight_rounds_each_order() {
    // 50.4 + 50.4 rounds to 50 + 50, exactly at the limit.
    let s = schedule(
        vec![order("A", &[1]).weight(50.4), order("B", &[1]).weight(50.4)],
        vec![bucket("B-1", "R-1", 1, 5).vehicle(100.0, 10.0)],
    );
    let explanation = explain(s, &[("A", "B-1"), ("B", "B-1")]);
    assert_eq!(explanation.score_of(names::VEHICLE_WEIGHT), HardSoftScore::ZERO);
}

#[test]
fn test_volume_overload_in_tenths() {
    // round(22.6) = 23 tenths against a 20 tenth limit: ceil(2.3 - 2.0) = 1
    let s = schedule(
        vec![order("A", &[1]).volume(2.26)],
        vec![bucket("B-1", "R-1", 1, 5).vehicle(500.0, 2.0)],
    );
    let explanation = explain(s, &[("A", "B-1")]);
    assert_eq!(explanation.score_of(names::VEHICLE_VOLUME), HardSoftScore::of_hard(-1));
}

#[test]
fn test_movable_ratio_uses_raw_capacity() {
    // floor(0.34 * 3) = 1 movable order allowed
    let s = schedule(
        vec![order("A", &[1, 2]), order("B", &[1, 3]), order("C", &[1])],
        vec![bucket("B-1", "R-1", 1, 3).movable_occupation_ratio_threshold(0.34)],
    );
    let explanation = explain(s, &[("A", "B-1"), ("B", "B-1"), ("C", "B-1")]);
    assert_eq!(explanation.score_of(names::MOVABLE_RATIO), HardSoftScore::of_soft(-1));
    assert_eq!(explanation.get(names::MOVABLE_RATIO).unwrap().match_count, 1);
}

#[test]
fn test_depot_distance_rounds_kilometres() {
    // 0.1 degrees of latitude is about 11.1 km
    let s = schedule(
        vec![order("A", &[1]).location(52.1, 4.0)],
        vec![bucket("B-1", "R-1", 1, 5).depot(52.0, 4.0)],
    );
    let explanation = explain(s, &[("A", "B-1")]);
    assert_eq!(explanation.score_of(names::DEPOT_DISTANCE), HardSoftScore::of_soft(-11));
}

#[test]
fn test_workload_counts_only_busy_riders() {
    let s = schedule(
        vec![order("A", &[1]), order("B", &[2])],
        vec![
            bucket("B-1", "R-1", 1, 5),
            bucket("B-2", "R-1", 2, 5),
            bucket("B-3", "R-2", 1, 5),
        ],
    );
    let explanation = explain(s, &[("A", "B-1"), ("B", "B-2")]);
    // R-1 carries 2 orders across two days; idle R-2 is not penalized.
    assert_eq!(explanation.score_of(names::WORKLOAD_BALANCE), HardSoftScore::of_soft(-10));
    assert_eq!(explanation.get(names::WORKLOAD_BALANCE).unwrap().match_count, 1);
}

#[test]
fn test_clustering_reward_follows_bucket() {
    let together = explain(scenarios::nearby_pair(), &[("O-1", "B-1"), ("O-2", "B-1")]);
    assert_eq!(together.score_of(names::CLUSTERING), HardSoftScore::of_soft(10));

    let apart = explain(scenarios::nearby_pair(), &[("O-1", "B-1"), ("O-2", "B-2")]);
    assert_eq!(apart.score_of(names::CLUSTERING), HardSoftScore::ZERO);
}

#[test]
fn test_time_window_half_hours() {
    let s = schedule(
        vec![
            order("late", &[1]).time_window(time(10, 0), time(12, 0)),
            order("early", &[1]).time_window(time(6, 0), time(7, 45)),
            order("inside", &[1]).time_window(time(8, 0), time(9, 30)),
            order("partial", &[1]).time_window(time(9, 29), time(11, 0)),
        ],
        vec![bucket("B-1", "R-1", 1, 5)],
    );
    let explanation = explain(
        s,
        &[("late", "B-1"), ("early", "B-1"), ("inside", "B-1"), ("partial", "B-1")],
    );
    // 60 min -> 2, 75 min -> 2, inside -> 0, 29 min -> 0
    assert_eq!(explanation.score_of(names::TIME_WINDOW), HardSoftScore::of_soft(-4));
    assert_eq!(explanation.get(names::TIME_WINDOW).unwrap().match_count, 2);
}

#[test]
fn test_breakdown_sums_to_total() {
    let mut director = IncrementalScoreDirector::for_schedule(scenarios::mixed_week()).unwrap();
    let bucket_count = director.bucket_count();
    for o in 0..director.order_count() {
        director.change_bucket(o, Some(o % bucket_count));
    }
    let explanation = director.explain();
    let sum: HardSoftScore = explanation.constraints.iter().map(|c| c.score).sum();
    assert_eq!(sum, explanation.score);
    assert_eq!(explanation.score, director.calculate_score());
    assert!(explanation.to_string().starts_with("Score: "));
}
