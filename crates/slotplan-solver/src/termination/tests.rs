use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use slotplan_config::TerminationConfig;
use slotplan_core::HardSoftScore;
use slotplan_scoring::ScoreDirector;
use slotplan_test::scenarios;

use super::*;
use crate::scope::{PhaseScope, SolverScope};
use crate::SlotDirector;

fn solver_scope() -> SolverScope {
    let director = SlotDirector::for_schedule(scenarios::nearby_pair()).unwrap();
    let mut scope = SolverScope::new(director).with_seed(1);
    scope.start_solving();
    scope
}

#[test]
fn test_time_termination() {
    let mut scope = solver_scope();
    let phase = PhaseScope::new(&mut scope, 0, "Test");

    assert!(TimeTermination::millis(0, TerminationLevel::Phase).is_terminated(&phase));
    assert!(!TimeTermination::seconds(60, TerminationLevel::Solver).is_terminated(&phase));
}

#[test]
fn test_unimproved_time_termination() {
    let mut scope = solver_scope();
    let phase = PhaseScope::new(&mut scope, 0, "Test");

    assert!(UnimprovedTimeTermination::millis(0, TerminationLevel::Phase).is_terminated(&phase));
    assert!(
        !UnimprovedTimeTermination::seconds(60, TerminationLevel::Phase).is_terminated(&phase)
    );
}

#[test]
fn test_unimproved_clock_restarts_with_improvement() {
    let mut scope = solver_scope();
    std::thread::sleep(Duration::from_millis(30));
    let term = UnimprovedTimeTermination::millis(20, TerminationLevel::Solver);
    {
        let phase = PhaseScope::new(&mut scope, 0, "Test");
        assert!(term.is_terminated(&phase));
    }

    assert!(scope.update_best_solution());
    let phase = PhaseScope::new(&mut scope, 1, "Test");
    assert!(!term.is_terminated(&phase));
}

#[test]
fn test_best_score_termination_requires_full_assignment() {
    let mut scope = solver_scope();
    let term = BestScoreTermination::new(HardSoftScore::of(0, -1000));
    {
        let phase = PhaseScope::new(&mut scope, 0, "Test");
        assert!(!term.is_terminated(&phase));
    }

    // Both orders unassigned: 0hard/0soft, but not initialized.
    scope.update_best_solution();
    {
        let phase = PhaseScope::new(&mut scope, 0, "Test");
        assert!(!term.is_terminated(&phase));
    }

    scope.score_director_mut().change_bucket(0, Some(0));
    scope.score_director_mut().change_bucket(1, Some(0));
    assert!(scope.update_best_solution());
    let phase = PhaseScope::new(&mut scope, 0, "Test");
    assert!(term.is_terminated(&phase));
    assert!(BestScoreTermination::feasible().is_terminated(&phase));
}

#[test]
fn test_step_count_termination() {
    let mut scope = solver_scope();
    scope.increment_step_count();
    let mut phase = PhaseScope::new(&mut scope, 0, "Test");
    let term = StepCountTermination::new(2, TerminationLevel::Phase);

    assert!(!term.is_terminated(&phase));
    phase.increment_step_count();
    assert!(!term.is_terminated(&phase));
    phase.increment_step_count();
    assert!(term.is_terminated(&phase));
    assert_eq!(phase.step_count_at(TerminationLevel::Solver), 3);
}

#[test]
fn test_or_termination() {
    let mut scope = solver_scope();
    let phase = PhaseScope::new(&mut scope, 0, "Test");

    let never = OrTermination::new(vec![
        Box::new(TimeTermination::seconds(60, TerminationLevel::Phase)),
        Box::new(StepCountTermination::new(10, TerminationLevel::Phase)),
    ]);
    assert!(!never.is_terminated(&phase));

    let mut now = never;
    now.push(Box::new(TimeTermination::millis(0, TerminationLevel::Phase)));
    assert_eq!(now.len(), 3);
    assert!(now.is_terminated(&phase));
    assert!(!OrTermination::default().is_terminated(&phase));
}

#[test]
fn test_terminate_early_flag() {
    let flag = Arc::new(AtomicBool::new(false));
    let director = SlotDirector::for_schedule(scenarios::nearby_pair()).unwrap();
    let mut scope = SolverScope::new(director).with_terminate_early_flag(Arc::clone(&flag));
    let phase = PhaseScope::new(&mut scope, 0, "Test");

    assert!(!phase.is_terminated(None));
    flag.store(true, Ordering::SeqCst);
    assert!(phase.is_terminated(None));
}

#[test]
fn test_solver_termination_applies_inside_phases() {
    let director = SlotDirector::for_schedule(scenarios::nearby_pair()).unwrap();
    let mut scope = SolverScope::new(director)
        .with_termination(Box::new(StepCountTermination::new(1, TerminationLevel::Solver)));
    scope.increment_step_count();
    let phase = PhaseScope::new(&mut scope, 0, "Test");
    assert!(phase.is_terminated(None));
}

#[test]
fn test_build_termination_from_config() {
    let none = build_termination(&TerminationConfig::default(), TerminationLevel::Phase).unwrap();
    assert!(none.is_none());

    let config = TerminationConfig {
        millis_spent_limit: Some(0),
        step_count_limit: Some(100),
        ..TerminationConfig::default()
    };
    let term = build_termination(&config, TerminationLevel::Phase)
        .unwrap()
        .unwrap();
    let mut scope = solver_scope();
    let phase = PhaseScope::new(&mut scope, 0, "Test");
    assert!(term.is_terminated(&phase));

    let bad = TerminationConfig {
        best_score_limit: Some("-1hard".to_string()),
        ..TerminationConfig::default()
    };
    assert!(build_termination(&bad, TerminationLevel::Solver).is_err());
}
