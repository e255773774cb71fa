//! Test strings for the syntactic filter.
//!
//! A [`TestSuite`] holds words the target language must accept (positive) and
//! must reject (negative). The initial suite comes from a Myhill–Nerode style
//! construction over the minimal target automaton: one access string per
//! state, its one-symbol extensions, and a distinguishing suffix for every
//! ordered pair of states. Counterexamples mined by the oracle are added later;
//! strings are never removed.

use std::collections::BTreeSet;

use log::debug;

use crate::dfa::Dfa;
use crate::nfa::Nfa;

/// Result of running a candidate against the test strings.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Filter {
    Pass,
    /// Some positive string is rejected.
    MissesPositive,
    /// All positive strings are accepted, but some negative one is too.
    MatchesNegative,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TestSuite {
    positive: BTreeSet<String>,
    negative: BTreeSet<String>,
}

impl TestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the initial suite for `target`, which should be minimal (every
    /// state reachable).
    pub fn myhill_nerode(target: &Dfa) -> Self {
        // Shortest word reaching each state.
        let access: Vec<String> = target
            .states()
            .filter_map(|s| target.with_sole_accepting(s).shortest_accepted())
            .collect();

        let mut prefixes = BTreeSet::new();
        for word in &access {
            prefixes.insert(word.clone());
            for &c in target.alphabet() {
                let mut extended = word.clone();
                extended.push(c);
                prefixes.insert(extended);
            }
        }

        let mut suffixes = BTreeSet::from([String::new()]);
        for i in target.states() {
            let from_i = target.with_initial(i);
            for j in target.states().filter(|&j| j != i) {
                if let Some(word) = from_i.difference(&target.with_initial(j)).shortest_accepted() {
                    suffixes.insert(word);
                }
            }
        }

        let mut suite = TestSuite::new();
        for prefix in &prefixes {
            for suffix in &suffixes {
                let word = format!("{}{}", prefix, suffix);
                if target.accepts(&word) {
                    suite.add_positive(word);
                } else {
                    suite.add_negative(word);
                }
            }
        }

        debug!(
            "myhill_nerode: {} states, {} prefixes, {} suffixes -> {} positive, {} negative",
            target.num_states(),
            prefixes.len(),
            suffixes.len(),
            suite.positive.len(),
            suite.negative.len()
        );
        suite
    }

    /// Returns `true` if the string was not already present.
    pub fn add_positive(&mut self, word: String) -> bool {
        debug_assert!(!self.negative.contains(&word), "{:?} is already negative", word);
        self.positive.insert(word)
    }

    /// Returns `true` if the string was not already present.
    pub fn add_negative(&mut self, word: String) -> bool {
        debug_assert!(!self.positive.contains(&word), "{:?} is already positive", word);
        self.negative.insert(word)
    }

    pub fn positive(&self) -> &BTreeSet<String> {
        &self.positive
    }

    pub fn negative(&self) -> &BTreeSet<String> {
        &self.negative
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `candidate` against the suite, positives first.
    pub fn check(&self, candidate: &Nfa) -> Filter {
        if !self.positive.iter().all(|w| candidate.accepts(w)) {
            Filter::MissesPositive
        } else if self.negative.iter().any(|w| candidate.accepts(w)) {
            Filter::MatchesNegative
        } else {
            Filter::Pass
        }
    }
}
