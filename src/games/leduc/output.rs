//! Solution output and export utilities.
//!
//! This module turns strategy profiles into labelled, serializable reports
//! for printing or JSON export, and reads saved strategy reports back into
//! profiles so they can be scored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use super::action::{Action, NUM_ACTIONS};
use super::state::{LeducState, FIRST_ROUND_STATES, NUM_STATES};
use crate::cfr::{
    BestResponse, Exploitability, ExploitabilityPoint, Result, SolverError, Strategy,
    StrategyProfile,
};

/// Strategy entry for a single info state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyEntry {
    /// Dense state index
    pub index: usize,
    /// Readable label, e.g. `Q|K:rb/c`
    pub label: String,
    /// Acting player (0 or 1)
    pub player: usize,
    /// Betting round (0 or 1)
    pub round: usize,
    /// Probability per legal action, keyed by action name
    pub strategy: BTreeMap<String, f64>,
}

impl StrategyEntry {
    fn new(state: LeducState, profile: &StrategyProfile) -> Self {
        let strategy = profile.strategy(&state);
        Self {
            index: state.index(),
            label: state.to_string(),
            player: state.acting_player(),
            round: state.round(),
            strategy: state
                .legal_actions()
                .iter()
                .map(|a| (action_name(&state, a).to_string(), strategy[a]))
                .collect(),
        }
    }

    /// One-line rendering, e.g. `K:r            -> call:0.5000 fold:0.0000 raise:0.5000`.
    pub fn summary(&self) -> String {
        let probs: Vec<String> = self
            .strategy
            .iter()
            .map(|(name, p)| format!("{name}:{p:.4}"))
            .collect();
        format!("{:<14} -> {}", self.label, probs.join(" "))
    }
}

/// Name of `action` in context: a check facing a bet is a fold, a bet is a call.
fn action_name(state: &LeducState, action: Action) -> &'static str {
    match action {
        Action::Check if state.is_fold(action) => "fold",
        Action::Check => "check",
        Action::Bet => "call",
        Action::Raise if state.raises() == 0 => "bet",
        Action::Raise => "raise",
    }
}

/// Solver metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Number of iterations
    pub iterations: u64,
    /// Number of info sets
    pub num_info_sets: usize,
    /// Best-response values, if measured
    pub exploitability: Option<Exploitability>,
    /// Exploitability checkpoints taken during training
    #[serde(default)]
    pub exploitability_history: Vec<ExploitabilityPoint>,
}

/// Complete strategy report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyReport {
    /// Solver metadata
    pub metadata: ReportMetadata,
    /// One entry per state, in index order
    pub entries: Vec<StrategyEntry>,
}

impl StrategyReport {
    /// Build a report for `profile`.
    pub fn new(
        profile: &StrategyProfile,
        exploitability: Option<Exploitability>,
        iterations: u64,
    ) -> Self {
        let entries: Vec<StrategyEntry> = LeducState::all()
            .map(|state| StrategyEntry::new(state, profile))
            .collect();

        Self {
            metadata: ReportMetadata {
                iterations,
                num_info_sets: entries.len(),
                exploitability,
                exploitability_history: Vec::new(),
            },
            entries,
        }
    }

    /// Attach the exploitability checkpoints of a training run.
    pub fn with_history(mut self, history: &[ExploitabilityPoint]) -> Self {
        self.metadata.exploitability_history = history.to_vec();
        self
    }

    /// Entries of the first betting round.
    pub fn first_round(&self) -> &[StrategyEntry] {
        &self.entries[..FIRST_ROUND_STATES]
    }

    /// Look up an entry by label.
    pub fn get(&self, label: &str) -> Option<&StrategyEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Save to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        write_json(&self.to_json()?, path)
    }

    /// Parse a report from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a report saved with [`save_json`](Self::save_json).
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Rebuild the strategy profile the report was made from.
    ///
    /// Entries are matched to states by label. Every state needs an entry
    /// with a non-negative probability for each of its legal actions;
    /// probabilities are renormalized over the legal actions.
    pub fn profile(&self) -> Result<StrategyProfile> {
        let mut strategies: Vec<Option<Strategy>> = vec![None; NUM_STATES];

        for entry in &self.entries {
            let state: LeducState = entry.label.parse()?;
            let legal = state.legal_actions();

            let mut weights = [0.0; NUM_ACTIONS];
            for action in legal.iter() {
                let name = action_name(&state, action);
                weights[action.index()] = entry
                    .strategy
                    .get(name)
                    .copied()
                    .filter(|p| p.is_finite() && *p >= 0.0)
                    .ok_or_else(|| SolverError::InvalidProbability {
                        label: entry.label.clone(),
                        action: name,
                    })?;
            }
            strategies[state.index()] = Some(Strategy::from_weights(weights, legal));
        }

        strategies
            .into_iter()
            .enumerate()
            .map(|(i, strategy)| {
                strategy.ok_or_else(|| {
                    SolverError::MissingState(LeducState::from_index(i).to_string())
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(StrategyProfile::from_vec)
    }

    /// Print the first-round strategies and exploitability.
    pub fn print_summary(&self) {
        println!("Leduc strategy after {} iterations", self.metadata.iterations);
        println!("{}", "=".repeat(50));
        for entry in self.first_round() {
            println!("{}", entry.summary());
        }
        if let Some(last) = self.metadata.exploitability_history.last() {
            println!(
                "Checkpoints: {} (last at iteration {})",
                self.metadata.exploitability_history.len(),
                last.iteration
            );
        }
        if let Some(e) = self.metadata.exploitability {
            println!("{}", "-".repeat(50));
            println!(
                "Exploitability: {:.6} chips/hand ({:.3} mbb/hand)",
                e.total(),
                e.mbb_per_hand()
            );
        }
    }
}

/// Best-response strategies for both seats against one profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestResponseReport {
    /// Best-response value for each seat
    pub values: [f64; 2],
    /// Each seat's responding strategy at the states it owns
    pub responses: [Vec<StrategyEntry>; 2],
}

impl BestResponseReport {
    /// Collect both solved best responses. `responses[p]` must have been
    /// computed for player `p`.
    pub fn new(responses: &[BestResponse; 2]) -> Self {
        let entries = |player: usize| -> Vec<StrategyEntry> {
            LeducState::all()
                .filter(|s| s.acting_player() == player)
                .map(|s| StrategyEntry::new(s, responses[player].strategy()))
                .collect()
        };

        Self {
            values: [responses[0].value(), responses[1].value()],
            responses: [entries(0), entries(1)],
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Save every responder state, both rounds, to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        write_json(&self.to_json()?, path)
    }

    /// Print both responders' first-round decisions.
    pub fn print_summary(&self) {
        for player in 0..2 {
            println!(
                "Best response for player {player}: {:.6} chips/hand",
                self.values[player]
            );
            for entry in self.responses[player].iter().filter(|e| e.round == 0) {
                println!("  {}", entry.summary());
            }
        }
    }
}

fn write_json<P: AsRef<Path>>(json: &str, path: P) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())
}
