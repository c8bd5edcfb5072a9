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

//! # Vu Intent Tests - Session
//!
//! This module contains tests for the session's atomic intent replacement,
//! intent documents (JSON, YAML, files), and session-level enumeration.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test session
//! ```

use std::fs;

use vux::{
    VuDataType, VuError, VuIntentItem, VuSchema, VuSession,
};

fn items(specs: &[&str]) -> Vec<VuIntentItem> {
    specs.iter().map(|spec| VuIntentItem::from(*spec)).collect()
}

/// Tests the reference scenario: malformed input fails with a parse
/// rejection and leaves the previously set intent unchanged.
#[test]
fn test_failed_replacement_is_atomic() {
    let mut session = VuSession::new();
    session
        .set_intent(&items(&["MedianDebt", "Region=New England"]))
        .unwrap();

    let err = session
        .set_intent(&items(&["Region=New England=Extra"]))
        .unwrap_err();
    assert!(matches!(err, VuError::Rejected { .. }));

    let intent = session.current_intent().unwrap();
    assert_eq!(intent.len(), 2);
    assert_eq!(intent.clauses()[0].description, "MedianDebt");
    assert_eq!(intent.clauses()[1].description, "Region=New England");
}

/// Tests idempotence: setting the same intent twice produces identical
/// normalized clause lists.
#[test]
fn test_set_intent_idempotent() {
    let input = items(&["MedianDebt", "Region=Southeast|New England"]);
    let mut first_session = VuSession::new();
    let mut second_session = VuSession::new();
    let first = first_session.set_intent(&input).unwrap().clone();
    let second = second_session.set_intent(&input).unwrap().clone();
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

/// Tests that JSON and YAML intent documents produce the same intent as the
/// programmatic item list.
#[test]
fn test_document_forms_equivalent() {
    let mut programmatic = VuSession::new();
    programmatic
        .set_intent(&items(&["MedianDebt", "Region=New England|Southeast"]))
        .unwrap();

    let mut json = VuSession::new();
    json.set_intent_from_json(
        r#"["MedianDebt", "Region=New England|Southeast"]"#,
    )
    .unwrap();

    let mut yaml = VuSession::new();
    yaml.set_intent_from_yaml(
        "- MedianDebt\n- Region=New England|Southeast\n",
    )
    .unwrap();

    assert_eq!(programmatic.current_intent(), json.current_intent());
    assert_eq!(programmatic.current_intent(), yaml.current_intent());
}

/// Tests loading an intent document from a file, dispatched on extension.
#[test]
fn test_intent_from_file() {
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("intent.json");
    fs::write(&json_path, r#"["MedianDebt", ["A", "B"]]"#).unwrap();
    let mut session = VuSession::new();
    session.set_intent_from_file(&json_path).unwrap();
    assert_eq!(session.current_intent().unwrap().len(), 2);

    let text_path = dir.path().join("intent.vu");
    fs::write(
        &text_path,
        "# measures first\nMedianDebt\nRegion=New England\n",
    )
    .unwrap();
    session.set_intent_from_file(&text_path).unwrap();
    let intent = session.current_intent().unwrap();
    assert_eq!(intent.len(), 2);
    assert_eq!(intent.clauses()[1].description, "Region=New England");
}

/// Tests session-level enumeration against a schema snapshot.
#[test]
fn test_session_enumeration() {
    let mut session = VuSession::new();
    session
        .set_intent(&items(&["MedianDebt", "Region=New England|Southeast|Far West"]))
        .unwrap();

    let schema = VuSchema::from_pairs([
        ("MedianDebt", VuDataType::Quantitative),
        ("Region", VuDataType::Nominal),
    ]);
    let combos = session.enumerate(&schema).unwrap();
    assert_eq!(combos.len(), 3);
    assert_eq!(session.combination_count(&schema).unwrap(), 3);

    // A session without an intent yields no combinations.
    session.clear_intent();
    assert!(session.enumerate(&schema).unwrap().is_empty());
}

/// Tests that replacing the intent cancels an enumeration handle taken
/// before the replacement.
#[test]
fn test_replacement_cancels_stale_enumeration() {
    let mut session = VuSession::new();
    session.set_intent(&items(&["MedianDebt"])).unwrap();
    let stale = session.cancel_handle();

    session.set_intent(&items(&["Region=New England"])).unwrap();
    assert!(stale.is_cancelled());

    // The new intent enumerates normally under the fresh token.
    let schema = VuSchema::from_pairs([
        ("MedianDebt", VuDataType::Quantitative),
        ("Region", VuDataType::Nominal),
    ]);
    assert_eq!(session.enumerate(&schema).unwrap().len(), 1);
}
