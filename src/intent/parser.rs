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

//! # Intent Shorthand Parser
//!
//! Converts one shorthand intent item into a [`VuClause`]. The grammar:
//!
//! - a plain token is an attribute clause (`"AverageCost"`);
//! - the first unescaped comparison operator splits attribute from value
//!   (`"Region=New England"`, `"Year>=2000"`); two-character operators
//!   (`>=`, `<=`, `!=`) take precedence at their position;
//! - either field may be an OR-group (`"A|B|C"`) or the wildcard `?`;
//! - a second unescaped `=` in the value, an empty attribute before an
//!   operator, or an empty value after one is a parse error;
//! - a list of strings is an OR-group over the attribute position without
//!   `|` syntax.

use crate::clause::{split_unescaped, VuClause, VuFieldSpec, VuFilterOp};
use crate::errors::{Result, VuError};

/// Parser for shorthand intent items.
///
/// Stateless; parse errors carry item position 0 and are re-anchored by the
/// normalizer to the item's index in the caller's list.
#[derive(Clone, Debug, Default)]
pub struct VuIntentParser;

impl VuIntentParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses one shorthand string into a clause.
    pub fn parse_item(&self, item: &str) -> Result<VuClause> {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            return Err(VuError::parse(item, 0, "empty intent item"));
        }

        let Some((op_idx, op, op_len)) = find_operator(trimmed) else {
            let attribute = VuFieldSpec::parse(trimmed)?;
            return VuClause::from_fields(
                attribute,
                VuFieldSpec::Unspecified,
                None,
                None,
                None,
                None,
                None,
            );
        };

        let lhs = trimmed[..op_idx].trim();
        let rhs = &trimmed[op_idx + op_len..];

        if lhs.is_empty() {
            return Err(VuError::parse(
                trimmed,
                0,
                format!("empty attribute before '{}'", op.as_str()),
            ));
        }
        if let Some((_, extra, _)) = find_operator(rhs) {
            return Err(VuError::parse(
                trimmed,
                0,
                format!(
                    "unexpected second '{}' in value (escape literal \
                     operators with a backslash)",
                    extra.as_str()
                ),
            ));
        }
        if rhs.trim().is_empty() {
            return Err(VuError::parse(
                trimmed,
                0,
                format!("empty value after '{}'", op.as_str()),
            ));
        }

        let attribute = VuFieldSpec::parse(lhs)?;
        let value = VuFieldSpec::parse(rhs)?;
        VuClause::from_fields(
            attribute,
            value,
            Some(op),
            None,
            None,
            None,
            None,
        )
    }

    /// Parses the list-of-strings form: each element is one attribute
    /// alternative of a single OR-group clause.
    ///
    /// Elements carry no filter syntax; an element containing an unescaped
    /// comparison operator is a parse error.
    pub fn parse_alternatives(&self, alternatives: &[String]) -> Result<VuClause> {
        if alternatives.is_empty() {
            return Err(VuError::parse("[]", 0, "empty alternative list"));
        }

        for alternative in alternatives {
            if find_operator(alternative).is_some() {
                return Err(VuError::parse(
                    alternative.as_str(),
                    0,
                    "alternative list entries may not contain filter syntax",
                ));
            }
        }

        // Joining on the OR separator reuses the field grammar's trimming,
        // duplicate collapse, and wildcard conflict checks.
        let joined = alternatives.join("|");
        let attribute = VuFieldSpec::parse(&joined)?;
        VuClause::from_fields(
            attribute,
            VuFieldSpec::Unspecified,
            None,
            None,
            None,
            None,
            None,
        )
    }
}

/// Locates the first unescaped comparison operator, returning its byte
/// offset, the operator, and its byte length. Two-character operators win
/// at their position; `!` not followed by `=` is an ordinary character.
fn find_operator(input: &str) -> Option<(usize, VuFilterOp, usize)> {
    let bytes = input.as_bytes();
    let mut escaped = false;
    for (idx, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' => return Some((idx, VuFilterOp::Eq, 1)),
            '<' => {
                return if bytes.get(idx + 1) == Some(&b'=') {
                    Some((idx, VuFilterOp::LtEq, 2))
                } else {
                    Some((idx, VuFilterOp::Lt, 1))
                };
            }
            '>' => {
                return if bytes.get(idx + 1) == Some(&b'=') {
                    Some((idx, VuFilterOp::GtEq, 2))
                } else {
                    Some((idx, VuFilterOp::Gt, 1))
                };
            }
            '!' => {
                if bytes.get(idx + 1) == Some(&b'=') {
                    return Some((idx, VuFilterOp::NotEq, 2));
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits a raw multi-clause shorthand on unescaped commas, for callers
/// that accept a whole intent in one string.
pub fn split_items(input: &str) -> Vec<String> {
    split_unescaped(input, ',')
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
