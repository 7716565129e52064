//! Configuration system for slotplan.
//!
//! Load solver configuration from TOML or YAML to control termination,
//! phases, neighborhoods and acceptors without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use slotplan_config::SolverConfig;
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [[phases]]
//!     type = "construction_heuristic"
//!
//!     [[phases]]
//!     type = "local_search"
//!     [phases.acceptor]
//!     type = "tabu_search"
//!     tabu_tenure = 9
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.phases.len(), 2);
//! ```
//!
//! Use the default preset when a file is missing:
//!
//! ```
//! use slotplan_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml")
//!     .unwrap_or_else(|_| SolverConfig::default_preset(30));
//! assert_eq!(config.phases.len(), 2);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use slotplan_core::HardSoftScore;
use thiserror::Error;


/// Default tabu tenure in steps.
pub const DEFAULT_TABU_TENURE: usize = 7;

/// Default number of random moves sampled per step.
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Number of threads for parallel move evaluation.
    #[serde(default)]
    pub move_thread_count: MoveThreadCount,

    /// Global termination, checked between and inside phases.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Phases, run in order.
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

impl SolverConfig {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// First-fit construction followed by hill climbing.
    ///
    /// The local search phase gets `seconds` in total and stops early after
    /// a quarter of that without improvement.
    pub fn default_preset(seconds: u64) -> Self {
        Self::new()
            .with_phase(PhaseConfig::ConstructionHeuristic(
                ConstructionHeuristicConfig::default(),
            ))
            .with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
                acceptor: Some(AcceptorConfig::HillClimbing),
                termination: Some(TerminationConfig {
                    seconds_spent_limit: Some(seconds),
                    unimproved_millis_spent_limit: Some(seconds * 250),
                    ..TerminationConfig::default()
                }),
                ..LocalSearchConfig::default()
            }))
    }

    /// Construction followed by short hill climbing, tabu search and hill
    /// climbing bursts of `phase_seconds` each, for frequent progress updates.
    pub fn progress_preset(phase_seconds: u64) -> Self {
        let burst = |acceptor| {
            PhaseConfig::LocalSearch(LocalSearchConfig {
                acceptor: Some(acceptor),
                termination: Some(TerminationConfig {
                    seconds_spent_limit: Some(phase_seconds),
                    ..TerminationConfig::default()
                }),
                ..LocalSearchConfig::default()
            })
        };

        Self::new()
            .with_phase(PhaseConfig::ConstructionHeuristic(
                ConstructionHeuristicConfig::default(),
            ))
            .with_phase(burst(AcceptorConfig::HillClimbing))
            .with_phase(burst(AcceptorConfig::TabuSearch(TabuSearchConfig::default())))
            .with_phase(burst(AcceptorConfig::HillClimbing))
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Sets the global termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Replaces the global termination.
    pub fn with_termination(mut self, termination: TerminationConfig) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_move_thread_count(mut self, count: MoveThreadCount) -> Self {
        self.move_thread_count = count;
        self
    }

    /// Adds a phase configuration.
    pub fn with_phase(mut self, phase: PhaseConfig) -> Self {
        self.phases.push(phase);
        self
    }

    /// Returns the global time limit, if configured.
    ///
    /// ```
    /// use slotplan_config::SolverConfig;
    /// use std::time::Duration;
    ///
    /// let config = SolverConfig::new().with_termination_seconds(30);
    /// assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
    /// ```
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Checks the configuration for mistakes that would only surface mid-solve.
    ///
    /// Every local search phase must be able to stop: either through its own
    /// termination or the global one. Score limits must parse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(t) = &self.termination {
            t.best_score_limit()?;
        }

        let global_stops = self.termination.as_ref().is_some_and(|t| t.is_bounded());
        for (index, phase) in self.phases.iter().enumerate() {
            if let Some(t) = phase.termination() {
                t.best_score_limit()?;
            }
            if let PhaseConfig::LocalSearch(ls) = phase {
                let phase_stops = ls.termination.as_ref().is_some_and(|t| t.is_bounded());
                if !phase_stops && !global_stops {
                    return Err(ConfigError::Invalid(format!(
                        "local search phase {} has no termination and no global termination is set",
                        index
                    )));
                }
                if let Some(AcceptorConfig::TabuSearch(tabu)) = &ls.acceptor {
                    if tabu.tabu_tenure == Some(0) {
                        return Err(ConfigError::Invalid(format!(
                            "local search phase {} has a tabu tenure of 0",
                            index
                        )));
                    }
                }
                if let Some(selector) = &ls.move_selector {
                    if !selector.include_reassign && !selector.include_swap {
                        return Err(ConfigError::Invalid(format!(
                            "local search phase {} selects no move types",
                            index
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Non-reproducible mode with minimal overhead.
    #[default]
    NonReproducible,

    /// Reproducible mode: a fixed seed is used when none is given.
    Reproducible,

    /// Every step verifies the incremental score against a full recalculation.
    FullAssert,
}

/// Move thread count configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveThreadCount {
    /// Use the rayon pool's thread count.
    Auto,

    /// No parallel move evaluation.
    #[default]
    None,

    /// Specific number of threads.
    Count(usize),
}

/// Termination configuration.
///
/// All limits are optional; whichever fires first ends the phase or solve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend.
    pub seconds_spent_limit: Option<u64>,

    /// Additional milliseconds to spend.
    pub millis_spent_limit: Option<u64>,

    /// Target best score to achieve (as string, e.g., "0hard/-100soft").
    pub best_score_limit: Option<String>,

    /// Maximum number of steps.
    pub step_count_limit: Option<u64>,

    /// Maximum seconds without improvement.
    pub unimproved_seconds_spent_limit: Option<u64>,

    /// Additional milliseconds without improvement.
    pub unimproved_millis_spent_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        combine(self.seconds_spent_limit, self.millis_spent_limit)
    }

    /// Returns the unimproved time limit as a Duration, if any.
    pub fn unimproved_time_limit(&self) -> Option<Duration> {
        combine(
            self.unimproved_seconds_spent_limit,
            self.unimproved_millis_spent_limit,
        )
    }

    /// Parses the best score limit, if any.
    pub fn best_score_limit(&self) -> Result<Option<HardSoftScore>, ConfigError> {
        self.best_score_limit
            .as_deref()
            .map(|s| {
                s.parse::<HardSoftScore>()
                    .map_err(|e| ConfigError::Invalid(e.to_string()))
            })
            .transpose()
    }

    /// Returns true if any limit is set.
    pub fn is_bounded(&self) -> bool {
        self.time_limit().is_some()
            || self.unimproved_time_limit().is_some()
            || self.step_count_limit.is_some()
            || self.best_score_limit.is_some()
    }
}

fn combine(seconds: Option<u64>, millis: Option<u64>) -> Option<Duration> {
    if seconds.is_none() && millis.is_none() {
        return None;
    }
    Some(Duration::from_secs(seconds.unwrap_or(0)) + Duration::from_millis(millis.unwrap_or(0)))
}

/// Phase configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseConfig {
    /// Construction heuristic phase.
    ConstructionHeuristic(ConstructionHeuristicConfig),

    /// Local search phase.
    LocalSearch(LocalSearchConfig),
}

impl PhaseConfig {
    /// The phase's own termination, if any.
    pub fn termination(&self) -> Option<&TerminationConfig> {
        match self {
            PhaseConfig::ConstructionHeuristic(c) => c.termination.as_ref(),
            PhaseConfig::LocalSearch(c) => c.termination.as_ref(),
        }
    }
}

/// Construction heuristic configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConstructionHeuristicConfig {
    /// Type of construction heuristic.
    #[serde(default)]
    pub construction_heuristic_type: ConstructionHeuristicType,

    /// Phase termination configuration.
    pub termination: Option<TerminationConfig>,
}

/// Construction heuristic types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionHeuristicType {
    /// Orders by ascending id, each into the first bucket that adds no hard penalty.
    #[default]
    FirstFit,
}

/// Local search configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LocalSearchConfig {
    /// Acceptor configuration. Defaults to hill climbing.
    pub acceptor: Option<AcceptorConfig>,

    /// Forager configuration.
    pub forager: Option<ForagerConfig>,

    /// Move selector configuration.
    pub move_selector: Option<MoveSelectorConfig>,

    /// Phase termination configuration.
    pub termination: Option<TerminationConfig>,
}

/// Acceptor configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcceptorConfig {
    /// Accept moves that do not worsen the last step score.
    HillClimbing,

    /// Tabu search acceptor.
    TabuSearch(TabuSearchConfig),
}

/// Tabu search configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TabuSearchConfig {
    /// Steps during which a reversing move stays forbidden.
    pub tabu_tenure: Option<usize>,

    /// Whether a tabu move that reaches a new best score is still accepted.
    pub aspiration: Option<bool>,
}

impl TabuSearchConfig {
    pub fn tabu_tenure(&self) -> usize {
        self.tabu_tenure.unwrap_or(DEFAULT_TABU_TENURE)
    }

    pub fn aspiration(&self) -> bool {
        self.aspiration.unwrap_or(true)
    }
}

/// Forager configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ForagerConfig {
    /// Maximum number of accepted moves to consider per step.
    pub accepted_count_limit: Option<usize>,
}

/// Which moves a local search phase generates and how it walks them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MoveSelectorConfig {
    /// Single-order reassignment, including unassigning.
    #[serde(default = "default_true")]
    pub include_reassign: bool,

    /// Pairwise bucket exchange.
    #[serde(default = "default_true")]
    pub include_swap: bool,

    #[serde(default)]
    pub selection_order: SelectionOrder,

    /// Moves sampled per step under random selection.
    pub sample_size: Option<usize>,
}

impl Default for MoveSelectorConfig {
    fn default() -> Self {
        Self {
            include_reassign: true,
            include_swap: true,
            selection_order: SelectionOrder::default(),
            sample_size: None,
        }
    }
}

impl MoveSelectorConfig {
    pub fn sample_size(&self) -> usize {
        self.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE)
    }
}

fn default_true() -> bool {
    true
}

/// Move selection order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrder {
    /// Every move, in order index then bucket index order.
    Original,

    /// A seeded random sample of moves each step.
    #[default]
    Random,
}
