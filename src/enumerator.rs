//! Breadth-first search driver.
//!
//! The [`Enumerator`] keeps a single FIFO frontier that serves both as the BFS
//! work queue and as the sequence of candidates to test. A cursor walks the
//! frontier front to back, filtering each candidate against the current
//! [`TestSuite`]; whenever the cursor reaches the tail, the head is popped and
//! its successors are appended. Every candidate is therefore filtered exactly
//! once and expanded exactly once, whether or not it passed the filter.
//!
//! Candidates that pass the filter are escalated to the [`Oracle`]. A failed
//! check yields a counterexample that is added to the suite, so later
//! candidates are filtered more precisely.
//!
//! # Examples
//!
//! ```
//! use regex_repair::enumerator::Enumerator;
//!
//! let mut search = Enumerator::new("b", "a").unwrap();
//! let answer = search.next_validated().unwrap();
//! assert_eq!(answer.render(), "a");
//! assert_eq!(answer.distance(), 1);
//! ```

use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::oracle::{Oracle, Verdict};
use crate::parser::{parse, ParseError};
use crate::regex::Regex;
use crate::tree::Tree;
use crate::types::Symbol;
use crate::witness::{Filter, TestSuite};

/// Bounds on the search. Without bounds the search may not terminate.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SearchConfig {
    /// Successors farther than this from the seed are not enqueued.
    pub max_distance: Option<usize>,
    /// Expansion stops once the frontier holds this many candidates.
    pub max_frontier: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_distance: None,
            max_frontier: 1 << 20,
        }
    }
}

impl SearchConfig {
    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    pub fn with_max_frontier(mut self, max_frontier: usize) -> Self {
        self.max_frontier = max_frontier;
        self
    }
}

pub struct Enumerator {
    oracle: Oracle,
    target: Dfa,
    alphabet: Vec<Symbol>,
    tests: TestSuite,
    frontier: VecDeque<Regex>,
    cursor: usize,
    testing_counter: usize,
    validation_counter: usize,
    largest_distance: usize,
    config: SearchConfig,
}

impl Enumerator {
    /// Parses `seed` and `target` and prepares a search with default bounds.
    pub fn new(seed: &str, target: &str) -> Result<Self, ParseError> {
        let seed = Regex::new(seed)?;
        let target = parse(target)?;
        Ok(Self::from_parts(seed, &target, SearchConfig::default()))
    }

    /// Prepares a search from an already constructed seed. The seed's
    /// alphabet is extended with the target's symbols.
    pub fn from_parts(seed: Regex, target: &Tree, config: SearchConfig) -> Self {
        let seed = seed.with_alphabet(target.symbols());
        let alphabet = seed.alphabet().to_vec();
        let oracle = Oracle::new(alphabet.iter().copied());
        let target = oracle.compile_tree(target);
        let tests = TestSuite::myhill_nerode(&target);

        info!(
            "Searching from {} over {:?}: target has {} states, {} initial tests",
            seed,
            alphabet,
            target.num_states(),
            tests.len()
        );

        Enumerator {
            oracle,
            target,
            alphabet,
            tests,
            frontier: VecDeque::from([seed]),
            cursor: 0,
            testing_counter: 0,
            validation_counter: 0,
            largest_distance: 0,
            config,
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Merged alphabet, epsilon first.
    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    pub fn oracle(&self) -> &Oracle {
        &self.oracle
    }

    /// Minimal automaton of the target language.
    pub fn target(&self) -> &Dfa {
        &self.target
    }

    pub fn tests(&self) -> &TestSuite {
        &self.tests
    }

    /// Number of candidates visited by the cursor.
    pub fn testing_counter(&self) -> usize {
        self.testing_counter
    }

    /// Number of candidates submitted to the oracle.
    pub fn validation_counter(&self) -> usize {
        self.validation_counter
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Moves the cursor to the next candidate, expanding the head of the
    /// frontier as many times as needed. Returns its index in the frontier.
    fn advance(&mut self) -> Option<usize> {
        while self.cursor == self.frontier.len() {
            if self.frontier.len() >= self.config.max_frontier {
                warn!(
                    "Frontier reached {} candidates, stopping after {} tested",
                    self.frontier.len(),
                    self.testing_counter
                );
                return None;
            }
            let Some(head) = self.frontier.pop_front() else {
                info!("Search space exhausted after {} tested", self.testing_counter);
                return None;
            };
            self.cursor -= 1;

            if self.config.max_distance.is_some_and(|max| head.distance() >= max) {
                continue;
            }
            self.frontier.extend(head.generate_successors());
        }

        let index = self.cursor;
        self.cursor += 1;
        self.testing_counter += 1;

        let distance = self.frontier[index].distance();
        if distance > self.largest_distance {
            self.largest_distance = distance;
            info!("Reached distance {} after {} tested", distance, self.testing_counter);
        }
        Some(index)
    }

    /// Runs the candidate at `index` against the test suite and records
    /// whether it accepts every positive string.
    fn filter(&mut self, index: usize) -> Filter {
        let nfa = Nfa::from_tree(self.frontier[index].tree());
        let verdict = self.tests.check(&nfa);
        self.frontier[index].set_ready_to_refine(verdict != Filter::MissesPositive);
        verdict
    }

    fn next_passing_index(&mut self) -> Option<usize> {
        loop {
            let index = self.advance()?;
            if self.filter(index) == Filter::Pass {
                return Some(index);
            }
        }
    }

    /// Next candidate in the frontier, without filtering.
    pub fn next_raw(&mut self) -> Option<&Regex> {
        let index = self.advance()?;
        Some(&self.frontier[index])
    }

    /// Next candidate that passes the current test suite.
    pub fn next_filter_passing(&mut self) -> Option<&Regex> {
        let index = self.next_passing_index()?;
        Some(&self.frontier[index])
    }

    /// Next candidate equivalent to the target. Candidates that pass the
    /// filter but fail the oracle contribute a counterexample to the suite.
    pub fn next_validated(&mut self) -> Option<Regex> {
        loop {
            let index = self.next_passing_index()?;
            self.validation_counter += 1;

            let candidate = &self.frontier[index];
            let dfa = self.oracle.compile_tree(candidate.tree());
            debug!("Validating {} (distance {})", candidate, candidate.distance());

            match self.oracle.check(&self.target, &dfa) {
                Verdict::Equivalent => {
                    info!(
                        "Found {} at distance {} ({} tested, {} validated)",
                        candidate,
                        candidate.distance(),
                        self.testing_counter,
                        self.validation_counter
                    );
                    return Some(candidate.clone());
                }
                Verdict::Missing(word) => {
                    debug!("{} rejects {:?}, adding positive test", candidate, word);
                    self.tests.add_positive(word);
                }
                Verdict::Extra(word) => {
                    debug!("{} accepts {:?}, adding negative test", candidate, word);
                    self.tests.add_negative(word);
                }
            }
        }
    }
}
