use slotplan_core::{DomainError, HardSoftScore, Order, Schedule, ShiftBucket};
use slotplan_test::{day, scenarios, weekly_schedule, GeneratorConfig};

use super::*;
use crate::constraint_set::{slot_constraints, ConstraintSet};

fn director(schedule: Schedule) -> IncrementalScoreDirector {
    IncrementalScoreDirector::for_schedule(schedule).unwrap()
}

#[test]
fn test_lazy_initialization() {
    let mut d = director(scenarios::heavy_pair());
    assert!(!d.is_initialized());
    assert_eq!(d.score(), HardSoftScore::ZERO);

    d.change_bucket(0, Some(0));
    d.change_bucket(1, Some(0));
    let score = d.calculate_score();
    assert!(d.is_initialized());
    assert_eq!(score.hard(), -20);
    assert_eq!(d.calculation_count(), 1);
}

#[test]
fn test_full_score_is_deterministic() {
    let mut d = director(scenarios::mixed_week());
    let buckets = d.bucket_count();
    for o in 0..d.order_count() {
        d.change_bucket(o, Some((o * 3) % buckets));
    }
    let first = d.full_score();
    assert_eq!(first, d.full_score());
    assert_eq!(first, slot_constraints().evaluate_all(d.working_schedule()));
}

#[test]
fn test_every_reassignment_matches_full_recalculation() {
    let mut d = director(scenarios::mixed_week());
    d.calculate_score();

    let buckets = d.bucket_count();
    let targets: Vec<Option<usize>> = (0..buckets).map(Some).chain([None]).collect();
    for o in 0..d.order_count() {
        for &target in &targets {
            let before = d.calculate_score();
            let expected_delta = {
                let mut scratch = d.clone();
                scratch.change_bucket(o, target);
                scratch.calculate_score() - before
            };
            d.change_bucket(o, target);
            let after = d.calculate_score();
            assert_eq!(after, before + expected_delta);
            assert_eq!(after, d.full_score(), "order {o} -> {target:?}");
        }
    }
}

#[test]
fn test_swaps_match_full_recalculation() {
    let mut d = director(weekly_schedule(&GeneratorConfig::default()));
    let buckets = d.bucket_count();
    for o in 0..d.order_count() {
        d.change_bucket(o, Some((o * 7) % buckets));
    }
    d.calculate_score();

    let n = d.order_count();
    for a in 0..n {
        let b = (a * 13 + 5) % n;
        let ba = d.working_schedule().assigned_bucket(a);
        let bb = d.working_schedule().assigned_bucket(b);
        d.change_bucket(a, bb);
        d.change_bucket(b, ba);
        assert_eq!(d.calculate_score(), d.full_score());
    }
    d.assert_score_consistent().unwrap();
}

#[test]
fn test_recording_director_undo() {
    let mut d = director(scenarios::nearby_pair());
    d.change_bucket(0, Some(0));
    let original = d.calculate_score();
    let original_assignments = d.working_schedule().assignments();

    {
        let mut recording = RecordingScoreDirector::new(&mut d);
        recording.change_bucket(1, Some(0));
        recording.change_bucket(0, Some(1));
        recording.change_bucket(0, Some(1));
        assert_eq!(recording.change_count(), 2);
        assert_ne!(recording.calculate_score(), original);
        recording.undo_changes();
        assert!(recording.is_empty());
    }

    assert_eq!(d.calculate_score(), original);
    assert_eq!(d.working_schedule().assignments(), original_assignments);
}

#[test]
fn test_change_to_same_bucket_is_noop() {
    let mut d = director(scenarios::heavy_pair());
    d.change_bucket(0, Some(0));
    let score = d.calculate_score();
    assert_eq!(d.change_bucket(0, Some(0)), Some(0));
    assert_eq!(d.calculate_score(), score);
}

#[test]
fn test_refuses_dangling_assignment() {
    let order = Order::builder("O-1")
        .allowed_day(day(1))
        .assigned_bucket(0)
        .build()
        .unwrap();
    // Schedule::new already rejects it; a bucketless schedule is the only way in.
    let err = Schedule::new(vec![order], Vec::<ShiftBucket>::new()).unwrap_err();
    assert!(matches!(err, DomainError::InvalidAssignment { .. }));
}

#[test]
fn test_indictments_blame_overloaded_orders() {
    let mut d = director(scenarios::heavy_pair());
    d.change_bucket(0, Some(0));
    d.change_bucket(1, Some(0));

    let indictments = d.indictments();
    assert_eq!(indictments.len(), 2);
    // Removing either order removes the whole 20 kg overload.
    assert!(indictments.iter().all(|i| i.score.hard() == -20));
    // Probing must not disturb the director.
    assert_eq!(d.calculate_score(), d.full_score());
}

#[test]
fn test_restore_assignments_resets_state() {
    let mut d = director(scenarios::over_subscribed_day());
    d.restore_assignments(&[Some(0), Some(0), Some(0)]).unwrap();
    assert!(!d.is_initialized());
    assert_eq!(d.calculate_score().hard(), -2);
    assert!(d.restore_assignments(&[Some(3)]).is_err());
}

#[test]
fn test_failed_restore_keeps_incremental_state() {
    let mut d = director(scenarios::over_subscribed_day());
    d.change_bucket(0, Some(0));
    d.change_bucket(1, Some(0));
    let before = d.calculate_score();

    assert!(d.restore_assignments(&[Some(0), Some(0), Some(7)]).is_err());
    assert!(d.restore_assignments(&[None, None]).is_err());
    assert_eq!(d.working_schedule().assignments(), vec![Some(0), Some(0), None]);
    assert_eq!(d.unassigned_count(), 1);
    assert_eq!(d.calculate_score(), before);

    d.change_bucket(0, None);
    assert_eq!(d.calculate_score(), d.full_score());
}

#[test]
fn test_take_schedule_stores_score() {
    let mut d = director(scenarios::missing_skill());
    d.change_bucket(0, Some(0));
    let schedule = d.take_schedule();
    assert_eq!(schedule.score(), Some(HardSoftScore::of(-1, -11)));
    assert_eq!(schedule.assigned_bucket(0), Some(0));
}

#[test]
fn test_unassigned_count_follows_changes() {
    let mut d = director(scenarios::over_subscribed_day());
    assert_eq!(d.unassigned_count(), 3);

    d.change_bucket(0, Some(0));
    d.change_bucket(1, Some(0));
    assert_eq!(d.unassigned_count(), 1);

    {
        let mut recording = RecordingScoreDirector::new(&mut d);
        recording.change_bucket(2, Some(0));
        assert_eq!(recording.unassigned_count(), 0);
        recording.undo_changes();
    }
    assert_eq!(d.unassigned_count(), 1);

    d.change_bucket(0, None);
    assert_eq!(d.unassigned_count(), 2);
    assert_eq!(d.unassigned_count(), d.working_schedule().unassigned_count());
}
