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

//! # Vu Intent Tests - Normalizer
//!
//! This module contains tests for merging mixed intent items (shorthand
//! strings, string lists, explicit clause specs) into one ordered clause
//! list with aggregate failure reporting.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test normalizer
//! ```

use std::collections::BTreeSet;

use vux::{
    VuClauseSpec, VuDataType, VuError, VuFieldSpec, VuFilterOp, VuIntentItem,
    VuNormalizer,
};

/// Tests the reference scenario: a measure plus a filtered OR-group.
#[test]
fn test_measure_and_filter_scenario() {
    let intent = VuNormalizer::new()
        .normalize(&[
            VuIntentItem::from("MedianDebt"),
            VuIntentItem::from("Region=New England|Southeast|Far West"),
        ])
        .unwrap();

    assert_eq!(intent.len(), 2);

    let debt = &intent.clauses()[0];
    assert_eq!(debt.attribute, VuFieldSpec::Single("MedianDebt".to_string()));
    assert!(!debt.is_filter());

    let region = &intent.clauses()[1];
    assert_eq!(region.attribute, VuFieldSpec::Single("Region".to_string()));
    assert_eq!(region.filter_op, VuFilterOp::Eq);
    let expected: BTreeSet<String> = ["New England", "Southeast", "Far West"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(region.value, VuFieldSpec::Any(expected));
}

/// Tests that caller order is preserved exactly and duplicates retained.
#[test]
fn test_order_and_duplicates() {
    let intent = VuNormalizer::new()
        .normalize(&[
            VuIntentItem::from("B"),
            VuIntentItem::from("A"),
            VuIntentItem::from("B"),
        ])
        .unwrap();
    let order: Vec<_> = intent
        .iter()
        .map(|clause| clause.description.as_str())
        .collect();
    assert_eq!(order, vec!["B", "A", "B"]);
}

/// Tests that explicit clause specs pass through with defaults filled but
/// fields untouched.
#[test]
fn test_explicit_spec_default_filling() {
    let intent = VuNormalizer::new()
        .normalize(&[VuIntentItem::from(
            VuClauseSpec::on("Region").with_value("New England"),
        )])
        .unwrap();
    let clause = &intent.clauses()[0];
    assert_eq!(clause.filter_op, VuFilterOp::Eq);
    assert_eq!(clause.description, "Region=New England");
}

/// Tests mixing shorthand with a typed wildcard spec.
#[test]
fn test_mixed_shorthand_and_wildcard_spec() {
    let intent = VuNormalizer::new()
        .normalize(&[
            VuIntentItem::from("AverageCost"),
            VuIntentItem::from(
                VuClauseSpec::on("?").with_data_type(VuDataType::Quantitative),
            ),
        ])
        .unwrap();
    assert_eq!(intent.len(), 2);
    let wildcard = &intent.clauses()[1];
    assert!(wildcard.attribute.is_wildcard());
    assert_eq!(wildcard.data_type, Some(VuDataType::Quantitative));
}

/// Tests best-effort parsing: every bad item is reported, later items are
/// still checked, and no partial intent is produced.
#[test]
fn test_aggregate_rejection() {
    let err = VuNormalizer::new()
        .normalize(&[
            VuIntentItem::from("=broken"),
            VuIntentItem::from("Fine"),
            VuIntentItem::from("a=b=c"),
            VuIntentItem::from("AlsoFine"),
        ])
        .unwrap_err();
    match err {
        VuError::Rejected { failures } => {
            assert_eq!(failures.len(), 2);
            assert!(failures[0].contains("item 0"));
            assert!(failures[1].contains("item 2"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

/// Tests idempotence: normalizing the same input twice gives identical
/// clause lists.
#[test]
fn test_normalization_idempotent() {
    let items = [
        VuIntentItem::from("MedianDebt"),
        VuIntentItem::from("Region=New England|Southeast"),
        VuIntentItem::from(
            VuClauseSpec::on("?").with_data_type(VuDataType::Quantitative),
        ),
    ];
    let normalizer = VuNormalizer::new();
    let first = normalizer.normalize(&items).unwrap();
    let second = normalizer.normalize(&items).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

/// Tests that intent items deserialize from a JSON array mixing all three
/// surface forms.
#[test]
fn test_item_forms_from_json() {
    let items: Vec<VuIntentItem> = serde_json::from_str(
        r#"[
            "MedianDebt",
            ["A", "B"],
            {"attribute": "?", "data_type": "quantitative"}
        ]"#,
    )
    .unwrap();
    let intent = VuNormalizer::new().normalize(&items).unwrap();
    assert_eq!(intent.len(), 3);
    assert!(matches!(intent.clauses()[1].attribute, VuFieldSpec::Any(_)));
    assert!(intent.clauses()[2].attribute.is_wildcard());
}
