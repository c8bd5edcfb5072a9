//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Vu.
//! The Vu project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Vu Intent Tests - Parser
//!
//! This module contains tests for the shorthand intent grammar: OR-group
//! splitting, filter syntax, wildcards, escapes, and failure modes.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test parser
//! ```

use std::collections::BTreeSet;

use proptest::prelude::*;
use vux::{VuError, VuFieldSpec, VuFilterOp, VuIntentParser};

/// Extracts the member set of a field for order-insensitive comparison.
fn members(field: &VuFieldSpec) -> BTreeSet<String> {
    match field {
        VuFieldSpec::Single(token) => [token.clone()].into_iter().collect(),
        VuFieldSpec::Any(set) => set.clone(),
        other => panic!("expected concrete field, got {other:?}"),
    }
}

/// Tests that an OR-group string yields one clause carrying a set, not one
/// clause per token.
#[test]
fn test_or_group_is_one_clause_with_set() {
    let clause = VuIntentParser::new().parse_item("A|B|C").unwrap();
    let expected: BTreeSet<String> =
        ["A", "B", "C"].into_iter().map(String::from).collect();
    assert_eq!(members(&clause.attribute), expected);
    assert!(!clause.is_filter());
}

/// Tests per-token whitespace trimming and duplicate collapse in OR-groups.
#[test]
fn test_or_group_trims_and_deduplicates() {
    let clause = VuIntentParser::new().parse_item(" A | B |A ").unwrap();
    let expected: BTreeSet<String> =
        ["A", "B"].into_iter().map(String::from).collect();
    assert_eq!(members(&clause.attribute), expected);
}

/// Tests the basic `attr=val` filter form.
#[test]
fn test_filter_shorthand() {
    let clause = VuIntentParser::new().parse_item("attr=val").unwrap();
    assert_eq!(clause.attribute, VuFieldSpec::Single("attr".to_string()));
    assert_eq!(clause.value, VuFieldSpec::Single("val".to_string()));
    assert_eq!(clause.filter_op, VuFilterOp::Eq);
}

/// Tests that the value side is recursively parsed for OR-group syntax.
#[test]
fn test_filter_value_or_group() {
    let clause = VuIntentParser::new()
        .parse_item("Region=New England|Southeast|Far West")
        .unwrap();
    assert_eq!(clause.attribute, VuFieldSpec::Single("Region".to_string()));
    let expected: BTreeSet<String> = ["New England", "Southeast", "Far West"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(members(&clause.value), expected);
}

/// Tests comparison operators beyond `=`, with longest-match precedence.
#[test]
fn test_comparison_operator_precedence() {
    let parser = VuIntentParser::new();
    assert_eq!(
        parser.parse_item("Year>=2000").unwrap().filter_op,
        VuFilterOp::GtEq
    );
    assert_eq!(
        parser.parse_item("Year>2000").unwrap().filter_op,
        VuFilterOp::Gt
    );
    assert_eq!(
        parser.parse_item("Year!=2000").unwrap().filter_op,
        VuFilterOp::NotEq
    );
}

/// Tests wildcard recognition in both field positions.
#[test]
fn test_wildcard_tokens() {
    let parser = VuIntentParser::new();
    assert!(parser.parse_item("?").unwrap().attribute.is_wildcard());
    assert!(parser.parse_item("Region=?").unwrap().value.is_wildcard());
}

/// Tests that a second unescaped `=` fails with a parse error naming the
/// offending token.
#[test]
fn test_double_equals_is_parse_error() {
    let err = VuIntentParser::new()
        .parse_item("Region=New England=Extra")
        .unwrap_err();
    match err {
        VuError::Parse { token, .. } => {
            assert_eq!(token, "Region=New England=Extra");
        }
        other => panic!("expected Parse, got {other:?}"),
    }
}

/// Tests that an empty attribute before an operator is rejected.
#[test]
fn test_empty_attribute_is_parse_error() {
    assert!(matches!(
        VuIntentParser::new().parse_item("=val"),
        Err(VuError::Parse { .. })
    ));
}

/// Tests that mixing the wildcard with concrete alternatives is a conflict.
#[test]
fn test_wildcard_in_or_group_is_conflict() {
    assert!(matches!(
        VuIntentParser::new().parse_item("?|Region"),
        Err(VuError::Conflict { .. })
    ));
}

/// Tests escaped metacharacters as literals.
#[test]
fn test_escapes() {
    let parser = VuIntentParser::new();
    let clause = parser.parse_item(r"Ratio=a\=b").unwrap();
    assert_eq!(clause.value, VuFieldSpec::Single("a=b".to_string()));

    let clause = parser.parse_item(r"Label=\?").unwrap();
    assert_eq!(clause.value, VuFieldSpec::Single("?".to_string()));
    assert!(!clause.value.is_wildcard());
}

/// Tests the list-of-strings form as an OR-group without `|` syntax.
#[test]
fn test_alternative_list_form() {
    let clause = VuIntentParser::new()
        .parse_alternatives(&["A".to_string(), "B".to_string(), "C".to_string()])
        .unwrap();
    let expected: BTreeSet<String> =
        ["A", "B", "C"].into_iter().map(String::from).collect();
    assert_eq!(members(&clause.attribute), expected);
}

proptest! {
    /// For all OR-group strings built from plain tokens, parsing yields one
    /// clause whose attribute set equals the input token set exactly,
    /// order-insensitive with duplicates collapsed.
    #[test]
    fn prop_or_group_set_equality(
        tokens in prop::collection::vec("[A-Za-z][A-Za-z0-9]{0,8}", 1..6)
    ) {
        let item = tokens.join("|");
        let clause = VuIntentParser::new().parse_item(&item).unwrap();
        let expected: BTreeSet<String> = tokens.into_iter().collect();
        prop_assert_eq!(members(&clause.attribute), expected);
    }

    /// A clause's description re-parses to a structurally equal clause.
    #[test]
    fn prop_description_round_trip(
        attr in "[A-Za-z][A-Za-z0-9]{0,8}",
        values in prop::collection::vec("[A-Za-z0-9 ]{1,8}", 1..4)
    ) {
        let item = format!(
            "{attr}={}",
            values
                .iter()
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .collect::<Vec<_>>()
                .join("|")
        );
        prop_assume!(!item.ends_with('='));

        let parser = VuIntentParser::new();
        if let Ok(clause) = parser.parse_item(&item) {
            let reparsed = parser.parse_item(&clause.description).unwrap();
            prop_assert_eq!(&reparsed.attribute, &clause.attribute);
            prop_assert_eq!(&reparsed.value, &clause.value);
            prop_assert_eq!(reparsed.filter_op, clause.filter_op);
        }
    }
}
