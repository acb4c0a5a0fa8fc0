// ============================================================
// ANSWER SET
// ============================================================
// How a raw `;`-separated choices cell becomes options or pairs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::question_type::{MULTIPLE_CHOICE, TRUE_FALSE_NOT_GIVEN, YES_NO_NOT_GIVEN};

/// Answer choices attached to a question. A record carries at most one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSet {
    /// Ordered list of selectable answers
    Options(Vec<String>),
    /// Matching pairs written as `key=value`
    Choices(BTreeMap<String, String>),
}

/// Derive the answer set for a canonical question type from the raw choices cell.
///
/// An empty cell means an open answer. True/False/Not Given and Yes/No/Not Given always
/// get their fixed enumeration, whatever the cell contains. Matching types switch to
/// key/value pairs as soon as one token contains `=`.
pub fn derive_answer_set(question_type: &str, raw_choices: &str) -> Option<AnswerSet> {
    let raw_choices = raw_choices.trim();
    if raw_choices.is_empty() {
        return None;
    }

    if question_type == MULTIPLE_CHOICE {
        return options(split_tokens(raw_choices));
    }
    if question_type == TRUE_FALSE_NOT_GIVEN {
        return options(fixed(&["TRUE", "FALSE", "NOT GIVEN"]));
    }
    if question_type == YES_NO_NOT_GIVEN {
        return options(fixed(&["YES", "NO", "NOT GIVEN"]));
    }
    if question_type.contains("Matching") {
        let tokens = split_tokens(raw_choices);
        if tokens.iter().any(|token| token.contains('=')) {
            return pairs(&tokens);
        }
        return options(tokens);
    }

    options(split_tokens(raw_choices))
}

fn split_tokens(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn fixed(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn options(values: Vec<String>) -> Option<AnswerSet> {
    if values.is_empty() {
        None
    } else {
        Some(AnswerSet::Options(values))
    }
}

fn pairs(tokens: &[String]) -> Option<AnswerSet> {
    let mut map = BTreeMap::new();
    for token in tokens {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }
        // later duplicates win
        map.insert(key.to_string(), value.to_string());
    }

    if map.is_empty() {
        None
    } else {
        Some(AnswerSet::Choices(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Option<AnswerSet> {
        Some(AnswerSet::Options(fixed(values)))
    }

    #[test]
    fn test_empty_cell_is_open_answer() {
        assert_eq!(derive_answer_set(MULTIPLE_CHOICE, ""), None);
        assert_eq!(derive_answer_set(TRUE_FALSE_NOT_GIVEN, "   "), None);
    }

    #[test]
    fn test_multiple_choice_split_and_trim() {
        assert_eq!(
            derive_answer_set(MULTIPLE_CHOICE, "A) one; B) two ;;C) three"),
            opts(&["A) one", "B) two", "C) three"])
        );
    }

    #[test]
    fn test_fixed_enumerations_ignore_cell() {
        assert_eq!(
            derive_answer_set(TRUE_FALSE_NOT_GIVEN, "x;y;z"),
            opts(&["TRUE", "FALSE", "NOT GIVEN"])
        );
        assert_eq!(
            derive_answer_set(YES_NO_NOT_GIVEN, "whatever"),
            opts(&["YES", "NO", "NOT GIVEN"])
        );
    }

    #[test]
    fn test_matching_with_pairs() {
        let mut expected = BTreeMap::new();
        expected.insert("A".to_string(), "1".to_string());
        expected.insert("B".to_string(), "2".to_string());
        assert_eq!(
            derive_answer_set("Matching Headings", "A=1;B=2"),
            Some(AnswerSet::Choices(expected))
        );
    }

    #[test]
    fn test_matching_without_pairs_becomes_options() {
        assert_eq!(
            derive_answer_set("Matching Features", "A;B;C"),
            opts(&["A", "B", "C"])
        );
    }

    #[test]
    fn test_matching_drops_incomplete_pairs_and_overwrites_duplicates() {
        let mut expected = BTreeMap::new();
        expected.insert("A".to_string(), "3".to_string());
        expected.insert("C".to_string(), "x=y".to_string());
        assert_eq!(
            derive_answer_set("Matching", "A=1; B ; =2; D= ;A=3;C=x=y"),
            Some(AnswerSet::Choices(expected))
        );
    }

    #[test]
    fn test_other_types_use_generic_split() {
        assert_eq!(
            derive_answer_set("Table Completion", "Monday;Meeting;9:00 AM"),
            opts(&["Monday", "Meeting", "9:00 AM"])
        );
    }

    #[test]
    fn test_only_separators_yields_nothing() {
        assert_eq!(derive_answer_set("Note Completion", ";;"), None);
    }
}
