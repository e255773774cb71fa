//! End-to-end tests for the repair search.
//!
//! Tests cover the search driver, the test-string refinement loop, and the
//! language effect of each edit family.

use test_log::test;

use regex_repair::enumerator::{Enumerator, SearchConfig};
use regex_repair::oracle::Oracle;
use regex_repair::parser::ParseError;
use regex_repair::regex::Regex;

fn repair(seed: &str, target: &str) -> (Regex, Enumerator) {
    let mut search = Enumerator::new(seed, target).unwrap();
    let answer = search.next_validated().unwrap();
    (answer, search)
}

fn assert_equivalent(search: &Enumerator, answer: &Regex) {
    let dfa = search.oracle().compile_tree(answer.tree());
    assert!(search.oracle().equivalent(search.target(), &dfa), "{} is not equivalent to the target", answer);
}

// ─── Search Results ────────────────────────────────────────────────────────────

#[test]
fn substitute_single_literal() {
    let (answer, search) = repair("b", "a");
    assert_eq!(answer.render(), "a");
    assert_eq!(answer.distance(), 1);
    // "b" and "ε" are rejected by the filter, "a" goes to the oracle.
    assert_eq!(search.testing_counter(), 3);
    assert_eq!(search.validation_counter(), 1);
    assert!(search.tests().positive().contains("a"));
    assert!(search.tests().negative().contains("b"));
}

#[test]
fn seed_already_equivalent() {
    let (answer, search) = repair("ab", "ab");
    assert_eq!(answer.render(), "ab");
    assert_eq!(answer.distance(), 0);
    assert_eq!(search.testing_counter(), 1);
    assert_eq!(search.validation_counter(), 1);
}

#[test]
fn repeat_literal() {
    let (answer, search) = repair("a", "a*");
    assert_eq!(answer.render(), "a*");
    assert_eq!(answer.distance(), 1);
    assert_equivalent(&search, &answer);
}

#[test]
fn extend_literal() {
    let (answer, search) = repair("a", "a|b");
    assert_eq!(answer.render(), "a|b");
    assert_eq!(answer.distance(), 1);
    assert_equivalent(&search, &answer);
}

#[test]
fn extend_under_star() {
    let (answer, search) = repair("a*", "(a|b)*");
    assert_eq!(answer.render(), "(a|b)*");
    assert_eq!(answer.distance(), 1);
    assert_equivalent(&search, &answer);
}

#[test]
fn prune_alternative() {
    let (answer, search) = repair("a|b|c", "a|b");
    assert_eq!(answer.render(), "a|b");
    assert_eq!(answer.distance(), 1);
    // The seed, then the three prune successors in order.
    assert_eq!(search.testing_counter(), 4);
    assert_equivalent(&search, &answer);
}

#[test]
fn two_insertions() {
    let (answer, search) = repair("a", "abc");
    assert_eq!(answer.render(), "abc");
    assert_eq!(answer.distance(), 2);
    assert_equivalent(&search, &answer);
}

#[test]
fn repair_is_deterministic() {
    let (first, s1) = repair("ab", "a*b");
    let (second, s2) = repair("ab", "a*b");
    assert_eq!(first.render(), second.render());
    assert_eq!(first.distance(), second.distance());
    assert_eq!(s1.testing_counter(), s2.testing_counter());
    assert_eq!(s1.validation_counter(), s2.validation_counter());
    assert_eq!(s1.tests(), s2.tests());
    assert_equivalent(&s1, &first);
}

#[test]
fn successive_answers_do_not_decrease_in_distance() {
    let config = SearchConfig::default().with_max_distance(2);
    let mut search = Enumerator::new("a", "a*").unwrap().with_config(config);
    let mut last = 0;
    let mut found = 0;
    while let Some(answer) = search.next_validated() {
        assert!(answer.distance() >= last);
        assert_equivalent(&search, &answer);
        last = answer.distance();
        found += 1;
    }
    assert!(found > 1);
}

// ─── Bounds ────────────────────────────────────────────────────────────────────

#[test]
fn bounded_search_gives_up() {
    let config = SearchConfig::default().with_max_distance(0);
    let mut search = Enumerator::new("b", "a").unwrap().with_config(config);
    assert!(search.next_validated().is_none());
    assert_eq!(search.testing_counter(), 1);
    assert_eq!(search.validation_counter(), 0);
}

#[test]
fn every_candidate_is_visited_once() {
    let config = SearchConfig::default().with_max_distance(2);
    let mut search = Enumerator::new("ab", "ba").unwrap().with_config(config);
    let mut visited = 0;
    // The seed, plus the successors of every candidate expanded below the bound.
    let mut enqueued = 1;
    while let Some(candidate) = search.next_raw() {
        if candidate.distance() < 2 {
            enqueued += candidate.generate_successors().len();
        }
        visited += 1;
        assert_eq!(search.testing_counter(), visited);
    }
    assert!(visited > 1);
    assert_eq!(visited, enqueued);
    assert_eq!(search.frontier_len(), 0);
}

#[test]
fn parse_errors_are_reported() {
    assert_eq!(Enumerator::new("(a", "a").err(), Some(ParseError::UnclosedGroup { position: 0 }));
    assert_eq!(Enumerator::new("a", "a)").err(), Some(ParseError::UnmatchedClose { position: 1 }));
}

// ─── Test Refinement ───────────────────────────────────────────────────────────

#[test]
fn tests_only_grow() {
    let config = SearchConfig::default().with_max_distance(2);
    let mut search = Enumerator::new("a", "a*").unwrap().with_config(config);
    let mut previous = search.tests().clone();
    while search.next_validated().is_some() {
        let current = search.tests();
        assert!(current.positive().is_superset(previous.positive()));
        assert!(current.negative().is_superset(previous.negative()));
        previous = current.clone();
    }
}

#[test]
fn filter_passing_candidates_satisfy_the_tests() {
    let config = SearchConfig::default().with_max_distance(2);
    let mut search = Enumerator::new("ab", "b*").unwrap().with_config(config);
    for _ in 0..10 {
        let Some(candidate) = search.next_filter_passing() else {
            break;
        };
        assert!(candidate.is_ready_to_refine());
        let candidate = candidate.clone();
        let dfa = search.oracle().compile_tree(candidate.tree());
        for w in search.tests().positive() {
            assert!(dfa.accepts(w), "{} rejects {:?}", candidate, w);
        }
        for w in search.tests().negative() {
            assert!(!dfa.accepts(w), "{} accepts {:?}", candidate, w);
        }
    }
}

// ─── Edit Families ─────────────────────────────────────────────────────────────

#[test]
fn prune_only_shrinks_the_language() {
    let oracle = Oracle::new("ab".chars());
    for pattern in ["a|b*", "(a|b)*", "(a|ab)*b", "a(b|ε)*"] {
        let mut re = Regex::new(pattern).unwrap();
        re.set_ready_to_refine(true);
        let before = oracle.compile_tree(re.tree());
        let pruned: Vec<Regex> = re
            .generate_successors()
            .into_iter()
            .filter(|s| s.is_refining_started())
            .collect();
        assert!(!pruned.is_empty(), "{}", pattern);
        for s in pruned {
            let after = oracle.compile_tree(s.tree());
            assert!(after.difference(&before).is_empty(), "{} -> {}", pattern, s);
        }
    }
}

#[test]
fn extend_only_grows_the_language() {
    let oracle = Oracle::new("ab".chars());
    let re = Regex::new("ab").unwrap();
    let before = oracle.compile_tree(re.tree());
    let extended: Vec<Regex> = re
        .generate_successors()
        .into_iter()
        .filter(|s| s.render().contains('|'))
        .collect();
    assert!(!extended.is_empty());
    for s in extended {
        let after = oracle.compile_tree(s.tree());
        assert!(before.difference(&after).is_empty(), "{}", s);
    }
}
