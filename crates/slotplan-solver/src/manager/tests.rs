use std::time::Duration;

use slotplan_config::{SolverConfig, TerminationConfig};
use slotplan_core::SlotPlanError;
use slotplan_test::generator::{weekly_schedule, GeneratorConfig};
use slotplan_test::scenarios;

use super::*;

fn quick_config() -> SolverConfig {
    SolverConfig::default_preset(1).with_random_seed(11)
}

#[test]
fn test_job_ids_are_sequential() {
    let manager = SolverManager::new(quick_config()).unwrap();
    let (first, _) = manager.solve(scenarios::missing_skill()).unwrap();
    let (second, _) = manager.solve(scenarios::heavy_pair()).unwrap();

    assert_eq!(first, JobId(1));
    assert_eq!(second, JobId(2));
    assert_eq!(second.to_string(), "job-2");

    manager.join(first).unwrap();
    manager.join(second).unwrap();
    assert_eq!(manager.active_job_count(), 0);
}

#[test]
fn test_updates_end_with_the_returned_best() {
    let manager = SolverManager::new(quick_config()).unwrap();
    let (id, mut updates) = manager.solve(scenarios::mixed_week()).unwrap();

    let mut last = None;
    while let Some(update) = updates.blocking_recv() {
        assert_eq!(update.job_id, id);
        if let Some(previous) = last.as_ref().map(|u: &BestSolutionUpdate| u.score) {
            assert!(update.score > previous);
        }
        last = Some(update);
    }

    let result = manager.join(id).unwrap();
    let last = last.unwrap();
    assert_eq!(last.score.score(), result.score);
    assert_eq!(last.schedule.assignments(), result.schedule.assignments());
}

#[test]
fn test_terminate_early() {
    let config = SolverConfig::default_preset(60);
    let manager = SolverManager::new(config).unwrap();
    let schedule = weekly_schedule(&GeneratorConfig::default());
    let (id, mut updates) = manager.solve(schedule).unwrap();

    // Construction has produced something once the first update arrives.
    assert!(updates.blocking_recv().is_some());
    assert!(manager.terminate_early(id));

    while !manager.status(id).is_some_and(|status| status.is_finished()) {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(manager.status(id), Some(JobStatus::TerminatedEarly));
    assert_eq!(manager.active_job_count(), 0);
    assert!(!manager.terminate_early(id));

    let result = manager.join(id).unwrap();
    assert!(result.terminated_early);
}

#[test]
fn test_join_twice_fails() {
    let manager = SolverManager::new(quick_config()).unwrap();
    let (id, _) = manager.solve(scenarios::heavy_pair()).unwrap();
    manager.join(id).unwrap();

    let err = manager.join(id).unwrap_err();
    assert!(matches!(err, SlotPlanError::InvalidState(_)));
    assert!(matches!(
        manager.join(JobId(99)),
        Err(SlotPlanError::InvalidState(_))
    ));
    assert_eq!(manager.status(JobId(99)), None);
}

#[test]
fn test_join_forgets_the_job() {
    let manager = SolverManager::new(quick_config()).unwrap();
    let ids: Vec<_> = (0..3)
        .map(|_| manager.solve(scenarios::heavy_pair()).unwrap().0)
        .collect();
    assert_eq!(manager.job_count(), 3);

    for (joined, id) in ids.iter().enumerate() {
        manager.join(*id).unwrap();
        assert_eq!(manager.status(*id), None);
        assert_eq!(manager.job_count(), ids.len() - joined - 1);
    }
    assert!(!manager.terminate_early(ids[0]));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SolverConfig::new().with_termination(TerminationConfig {
        best_score_limit: Some("not a score".to_string()),
        ..TerminationConfig::default()
    });
    assert!(matches!(
        SolverManager::new(config),
        Err(SlotPlanError::Config(_))
    ));
}

#[tokio::test]
async fn test_updates_from_async_context() {
    let manager = SolverManager::new(quick_config()).unwrap();
    let (id, mut updates) = manager.solve(scenarios::over_subscribed_day()).unwrap();

    let first = tokio::time::timeout(Duration::from_secs(5), updates.recv())
        .await
        .ok()
        .flatten()
        .unwrap();
    assert_eq!(first.job_id, id);

    let mut best = first.score;
    while let Some(update) = updates.recv().await {
        best = update.score;
    }
    assert!(best.is_initialized());
    assert_eq!(best.score().hard(), -2);
}
