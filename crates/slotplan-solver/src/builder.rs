//! Builds a [`Solver`] from a [`SolverConfig`].

use slotplan_config::{
    AcceptorConfig, ConfigError, ConstructionHeuristicType, MoveThreadCount, PhaseConfig,
    SolverConfig,
};
use slotplan_core::SlotPlanError;

use crate::heuristic::MoveSelector;
use crate::phase::construction::FirstFitPhase;
use crate::phase::localsearch::{
    AcceptedCountForager, Acceptor, HillClimbingAcceptor, LocalSearchPhase, TabuSearchAcceptor,
};
use crate::phase::Phase;
use crate::solver::Solver;
use crate::termination::{build_termination, TerminationLevel};

/// Budget of the preset used when a configuration lists no phases.
pub const DEFAULT_SECONDS: u64 = 30;

fn config_error(e: ConfigError) -> SlotPlanError {
    SlotPlanError::Config(e.to_string())
}

impl Solver {
    /// Builds a solver from configuration.
    ///
    /// An empty phase list falls back to
    /// [`SolverConfig::default_preset`] with a 30 second budget.
    ///
    /// ```
    /// use slotplan_config::SolverConfig;
    /// use slotplan_solver::Solver;
    ///
    /// let solver = Solver::from_config(&SolverConfig::progress_preset(8)).unwrap();
    /// assert_eq!(solver.phase_count(), 4);
    /// ```
    pub fn from_config(config: &SolverConfig) -> Result<Self, SlotPlanError> {
        config.validate().map_err(config_error)?;

        let thread_count = move_thread_count(&config.move_thread_count);
        let fallback;
        let phase_configs = if config.phases.is_empty() {
            fallback = SolverConfig::default_preset(DEFAULT_SECONDS).phases;
            &fallback
        } else {
            &config.phases
        };
        let phases = phase_configs
            .iter()
            .map(|p| build_phase(p, thread_count))
            .collect::<Result<Vec<_>, _>>()
            .map_err(config_error)?;

        let mut solver = Solver::new(phases).with_environment_mode(config.environment_mode);
        if let Some(seed) = config.random_seed {
            solver = solver.with_random_seed(seed);
        }
        if let Some(termination) = &config.termination {
            if let Some(t) =
                build_termination(termination, TerminationLevel::Solver).map_err(config_error)?
            {
                solver = solver.with_termination(t);
            }
        }
        Ok(solver)
    }
}

/// Resolves the configured thread count; 1 means sequential evaluation.
pub fn move_thread_count(config: &MoveThreadCount) -> usize {
    match config {
        MoveThreadCount::None => 1,
        MoveThreadCount::Auto => rayon::current_num_threads().max(1),
        MoveThreadCount::Count(n) => (*n).max(1),
    }
}

fn build_phase(config: &PhaseConfig, thread_count: usize) -> Result<Box<dyn Phase>, ConfigError> {
    let termination = match config.termination() {
        Some(t) => build_termination(t, TerminationLevel::Phase)?,
        None => None,
    };

    match config {
        PhaseConfig::ConstructionHeuristic(ch) => match ch.construction_heuristic_type {
            ConstructionHeuristicType::FirstFit => {
                let mut phase = FirstFitPhase::new();
                if let Some(t) = termination {
                    phase = phase.with_termination(t);
                }
                Ok(Box::new(phase))
            }
        },
        PhaseConfig::LocalSearch(ls) => {
            let acceptor: Box<dyn Acceptor> = match &ls.acceptor {
                None | Some(AcceptorConfig::HillClimbing) => Box::new(HillClimbingAcceptor::new()),
                Some(AcceptorConfig::TabuSearch(tabu)) => {
                    if tabu.aspiration() {
                        Box::new(TabuSearchAcceptor::new(tabu.tabu_tenure()))
                    } else {
                        Box::new(TabuSearchAcceptor::without_aspiration(tabu.tabu_tenure()))
                    }
                }
            };
            let limit = ls
                .forager
                .as_ref()
                .and_then(|f| f.accepted_count_limit)
                .unwrap_or_else(|| acceptor.default_accepted_count_limit());
            let selector = ls
                .move_selector
                .as_ref()
                .map(MoveSelector::from_config)
                .unwrap_or_default();

            let mut phase = LocalSearchPhase::new(selector, acceptor, AcceptedCountForager::new(limit))
                .with_move_thread_count(thread_count);
            if let Some(t) = termination {
                phase = phase.with_termination(t);
            }
            Ok(Box::new(phase))
        }
    }
}
