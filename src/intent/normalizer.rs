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

//! # Intent Normalizer
//!
//! Merges the mixed list of raw shorthand items and explicit clause specs
//! passed to `set_intent` into one ordered [`VuIntent`].
//!
//! Parsing is best-effort across items: one bad item does not stop the
//! remaining items from being checked, but any failure rejects the whole
//! call with a single aggregate [`VuError::Rejected`] listing every failed
//! item. No partial intent is ever produced.
//!
//! Caller order is preserved exactly and duplicates are retained — two
//! clauses naming the same attribute are both kept, since downstream
//! channel assignment and grouping rely on position and multiplicity.

use serde::{Deserialize, Serialize};

use crate::clause::{VuClause, VuClauseSpec};
use crate::errors::{Result, VuError};
use crate::intent::parser::VuIntentParser;

/// One element of a `set_intent` call: a shorthand string, a list of
/// alternative strings, or an explicit clause spec.
///
/// Serde-untagged, so a JSON/YAML intent document is simply an array of
/// strings, string arrays, and clause objects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VuIntentItem {
    /// Shorthand string, e.g. `"Region=New England|Southeast"`.
    Shorthand(String),
    /// OR-group over the attribute position without `|` syntax.
    Alternatives(Vec<String>),
    /// Explicit clause configuration.
    Clause(VuClauseSpec),
}

impl VuIntentItem {
    /// Short token identifying the item in error messages.
    fn token(&self) -> String {
        match self {
            VuIntentItem::Shorthand(item) => item.clone(),
            VuIntentItem::Alternatives(items) => items.join("|"),
            VuIntentItem::Clause(spec) => spec
                .description
                .clone()
                .or_else(|| spec.attribute.clone())
                .unwrap_or_else(|| "<clause>".to_string()),
        }
    }
}

impl From<&str> for VuIntentItem {
    fn from(item: &str) -> Self {
        VuIntentItem::Shorthand(item.to_string())
    }
}

impl From<String> for VuIntentItem {
    fn from(item: String) -> Self {
        VuIntentItem::Shorthand(item)
    }
}

impl From<Vec<String>> for VuIntentItem {
    fn from(items: Vec<String>) -> Self {
        VuIntentItem::Alternatives(items)
    }
}

impl From<VuClauseSpec> for VuIntentItem {
    fn from(spec: VuClauseSpec) -> Self {
        VuIntentItem::Clause(spec)
    }
}

/// Ordered sequence of clauses expressing one analytical interest.
///
/// Created atomically by one `set_intent` call; order is significant and
/// preserved end-to-end.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VuIntent {
    clauses: Vec<VuClause>,
}

impl VuIntent {
    /// Wraps an already-normalized clause list.
    pub fn new(clauses: Vec<VuClause>) -> Self {
        VuIntent { clauses }
    }

    /// The ordered clause list.
    pub fn clauses(&self) -> &[VuClause] {
        &self.clauses
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether the intent has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Iterates over the clauses in order.
    pub fn iter(&self) -> std::slice::Iter<'_, VuClause> {
        self.clauses.iter()
    }

    /// Serializes the intent to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VuError::internal(format!("failed to serialize intent: {e}")))
    }

    /// Deserializes an intent from JSON produced by [`VuIntent::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| VuError::Serde(format!("invalid intent JSON: {e}")))
    }
}

impl<'a> IntoIterator for &'a VuIntent {
    type Item = &'a VuClause;
    type IntoIter = std::slice::Iter<'a, VuClause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

/// Normalizes mixed intent items into one ordered clause list.
#[derive(Clone, Debug, Default)]
pub struct VuNormalizer {
    parser: VuIntentParser,
}

impl VuNormalizer {
    /// Creates a new normalizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces the ordered clause list for one `set_intent` call.
    ///
    /// Every item is checked even after a failure; the aggregate
    /// [`VuError::Rejected`] names each failed item with its position.
    pub fn normalize(&self, items: &[VuIntentItem]) -> Result<VuIntent> {
        let mut clauses = Vec::with_capacity(items.len());
        let mut failures = Vec::new();

        for (position, item) in items.iter().enumerate() {
            let parsed = match item {
                VuIntentItem::Shorthand(raw) => self.parser.parse_item(raw),
                VuIntentItem::Alternatives(raw) => {
                    self.parser.parse_alternatives(raw)
                }
                VuIntentItem::Clause(spec) => VuClause::from_spec(spec.clone()),
            };

            match parsed {
                Ok(clause) => clauses.push(clause),
                Err(err) => {
                    let err = err.at_position(position);
                    let entry = match &err {
                        VuError::Parse { .. } => err.to_string(),
                        _ => format!(
                            "item {position} ('{}'): {err}",
                            item.token()
                        ),
                    };
                    failures.push(entry);
                }
            }
        }

        if !failures.is_empty() {
            log::warn!(
                "intent rejected: {} of {} item(s) failed to parse",
                failures.len(),
                items.len()
            );
            return Err(VuError::Rejected { failures });
        }

        Ok(VuIntent::new(clauses))
    }
}
