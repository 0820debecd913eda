//! Hidden Markov model over the BMES tag set.
//!
//! Start and transition log-probabilities are fixed constants trained on a
//! large corpus; only the emission table (state, character) is loaded from
//! a resource file. All probabilities are natural logarithms, and every
//! miss falls back to the model's floor ([`MIN_PROB`] unless the
//! configuration overrides it) so scores stay finite and additive.
//!
//! The emission file groups records by state: a line holding the single
//! character `B`, `M`, `E` or `S` opens a group, and each following
//! `char<TAB>log_p` line belongs to it. Values are stored as-is.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::{DictError, Result};

/// Default floor log-probability for missing start / transition / emission
/// entries.
pub const MIN_PROB: f64 = -3.14e100;

/// Character-level segmentation tags: begin, middle, end, single.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    B,
    M,
    E,
    S,
}

impl State {
    /// All states, in the order used by the trellis columns.
    pub const ALL: [State; 4] = [State::B, State::M, State::E, State::S];

    /// Legal predecessors of a state. A decoded sequence is valid only if
    /// every adjacent pair respects this relation. The order matters to
    /// callers that break score ties by position in this list.
    pub fn prev_states(self) -> [State; 2] {
        match self {
            State::B => [State::E, State::S],
            State::M => [State::M, State::B],
            State::S => [State::S, State::E],
            State::E => [State::B, State::M],
        }
    }

    /// Column index in the emission table.
    pub fn index(self) -> usize {
        match self {
            State::B => 0,
            State::M => 1,
            State::E => 2,
            State::S => 3,
        }
    }

    fn from_marker(ch: char) -> Option<Self> {
        match ch {
            'B' => Some(State::B),
            'M' => Some(State::M),
            'E' => Some(State::E),
            'S' => Some(State::S),
            _ => None,
        }
    }
}

/// Immutable BMES model: fixed start/transition tables plus a loaded
/// emission table and the floor handed out on misses.
#[derive(Debug)]
pub struct HmmModel {
    emit: [HashMap<char, f64>; 4],
    floor: f64,
}

impl Default for HmmModel {
    fn default() -> Self {
        Self {
            emit: Default::default(),
            floor: MIN_PROB,
        }
    }
}

impl HmmModel {
    /// A model with no emission data. Start and transition probabilities
    /// still answer, but an empty emission table means the Viterbi fallback
    /// has nothing to score; callers treat it as disabled.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the emission table from a reader in `prob_emit.txt` format.
    pub fn from_emit_reader<R: BufRead>(reader: R, source_name: &str) -> Result<Self> {
        let mut model = Self::empty();
        let mut current: Option<State> = None;
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let first = fields.next().unwrap_or("");
            match fields.next() {
                None => {
                    // group marker line
                    let mut chars = first.chars();
                    match (chars.next().and_then(State::from_marker), chars.next()) {
                        (Some(state), None) => current = Some(state),
                        _ => {
                            eprintln!(
                                "warning: {}: skipping unrecognized group marker {:?}",
                                source_name, line
                            );
                        }
                    }
                }
                Some(value) => {
                    let state = match current {
                        Some(s) => s,
                        None => {
                            return Err(DictError::format(
                                source_name,
                                "emission record before any state marker",
                            ))
                        }
                    };
                    let mut chars = first.chars();
                    let ch = match (chars.next(), chars.next()) {
                        (Some(c), None) => c,
                        _ => {
                            eprintln!(
                                "warning: {}: skipping non-single-character record {:?}",
                                source_name, line
                            );
                            continue;
                        }
                    };
                    match value.parse::<f64>() {
                        Ok(p) => model.insert_emit(state, ch, p),
                        Err(_) => {
                            eprintln!(
                                "warning: {}: skipping unparsable record {:?}",
                                source_name, line
                            );
                        }
                    }
                }
            }
        }
        Ok(model)
    }

    /// Load the emission table from a file path.
    pub fn from_emit_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_emit_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Insert a single emission log-probability.
    pub fn insert_emit(&mut self, state: State, ch: char, log_p: f64) {
        self.emit[state.index()].insert(ch, log_p);
    }

    /// Override the floor returned for missing entries.
    pub fn set_floor(&mut self, floor: f64) {
        self.floor = floor;
    }

    /// The floor returned for missing entries.
    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Start log-probability of a state. `M` and `E` cannot open a
    /// sequence and sit at the floor.
    pub fn start(&self, state: State) -> f64 {
        match state {
            State::B => -0.26268660809250016,
            State::E => self.floor,
            State::M => self.floor,
            State::S => -1.4652633398537678,
        }
    }

    /// Transition log-probability; pairs outside the legal topology sit at
    /// the floor.
    pub fn trans(&self, from: State, to: State) -> f64 {
        match (from, to) {
            (State::B, State::E) => -0.5108,
            (State::B, State::M) => -0.9163,
            (State::E, State::B) => -0.5897,
            (State::E, State::S) => -0.8085,
            (State::M, State::E) => -0.3334,
            (State::M, State::M) => -1.2604,
            (State::S, State::B) => -0.7212,
            (State::S, State::S) => -0.6659,
            _ => self.floor,
        }
    }

    /// Emission log-probability of `ch` under `state`, floored on a miss.
    pub fn emit(&self, state: State, ch: char) -> f64 {
        self.emit[state.index()].get(&ch).copied().unwrap_or(self.floor)
    }

    /// True when at least one emission record was loaded.
    pub fn has_emissions(&self) -> bool {
        self.emit.iter().any(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn start_and_trans_constants() {
        let m = HmmModel::empty();
        assert_eq!(m.start(State::B), -0.26268660809250016);
        assert_eq!(m.start(State::S), -1.4652633398537678);
        assert_eq!(m.start(State::M), MIN_PROB);
        assert_eq!(m.start(State::E), MIN_PROB);

        assert_eq!(m.trans(State::B, State::E), -0.5108);
        assert_eq!(m.trans(State::B, State::M), -0.9163);
        assert_eq!(m.trans(State::E, State::B), -0.5897);
        assert_eq!(m.trans(State::E, State::S), -0.8085);
        assert_eq!(m.trans(State::M, State::E), -0.3334);
        assert_eq!(m.trans(State::M, State::M), -1.2604);
        assert_eq!(m.trans(State::S, State::B), -0.7212);
        assert_eq!(m.trans(State::S, State::S), -0.6659);
        // everything off-topology floors
        assert_eq!(m.trans(State::B, State::B), MIN_PROB);
        assert_eq!(m.trans(State::E, State::M), MIN_PROB);
    }

    #[test]
    fn predecessor_topology() {
        assert_eq!(State::B.prev_states(), [State::E, State::S]);
        assert_eq!(State::M.prev_states(), [State::M, State::B]);
        assert_eq!(State::S.prev_states(), [State::S, State::E]);
        assert_eq!(State::E.prev_states(), [State::B, State::M]);
    }

    #[test]
    fn emission_file_grouping() {
        let text = "B\n中\t-1.5\n国\t-2.5\nS\n了\t-0.5\n";
        let m = HmmModel::from_emit_reader(Cursor::new(text.to_string()), "emit").unwrap();
        assert!(m.has_emissions());
        assert_eq!(m.emit(State::B, '中'), -1.5);
        assert_eq!(m.emit(State::B, '国'), -2.5);
        assert_eq!(m.emit(State::S, '了'), -0.5);
        // misses floor
        assert_eq!(m.emit(State::B, '了'), MIN_PROB);
        assert_eq!(m.emit(State::E, '中'), MIN_PROB);
    }

    #[test]
    fn emission_record_before_marker_is_structural() {
        let text = "中\t-1.5\n";
        let r = HmmModel::from_emit_reader(Cursor::new(text.to_string()), "emit");
        assert!(matches!(r, Err(DictError::InvalidFormat { .. })));
    }

    #[test]
    fn malformed_emission_lines_are_skipped() {
        let text = "B\n中\t-1.5\n国中\t-9.9\n华\tNaNope\nS\n了\t-0.5\n";
        let m = HmmModel::from_emit_reader(Cursor::new(text.to_string()), "emit").unwrap();
        assert_eq!(m.emit(State::B, '中'), -1.5);
        assert_eq!(m.emit(State::B, '华'), MIN_PROB);
        assert_eq!(m.emit(State::S, '了'), -0.5);
    }

    #[test]
    fn empty_model_reports_no_emissions() {
        assert!(!HmmModel::empty().has_emissions());
    }

    #[test]
    fn floor_is_configurable() {
        let mut m = HmmModel::empty();
        assert_eq!(m.floor(), MIN_PROB);
        m.set_floor(-50.0);
        assert_eq!(m.emit(State::B, '中'), -50.0);
        assert_eq!(m.start(State::M), -50.0);
        assert_eq!(m.trans(State::B, State::B), -50.0);
        // trained constants are unaffected
        assert_eq!(m.start(State::B), -0.26268660809250016);
        assert_eq!(m.trans(State::B, State::E), -0.5108);
    }
}
