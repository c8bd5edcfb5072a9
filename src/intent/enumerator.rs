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

//! # Intent Enumerator
//!
//! Expands a normalized clause list containing wildcards and OR-groups into
//! the concrete set of fully-resolved clause combinations, against an
//! immutable schema snapshot.
//!
//! ## Expansion Rules
//!
//! Per clause, the local candidate set is the cross product of its attribute
//! candidates and value candidates (attribute varies slower):
//!
//! - a single attribute/value is a singleton candidate set;
//! - OR-group members expand in their stored (lexicographic) order;
//! - an attribute wildcard expands to every schema attribute — restricted to
//!   the clause's `data_type` when set — minus attributes pinned elsewhere
//!   in the same intent;
//! - a value wildcard expands over the resolved attribute's declared domain.
//!
//! ## Ordering
//!
//! The overall combination space is the Cartesian product across clauses in
//! clause order, with the leftmost clause varying slowest. The ordering is
//! canonical: two runs over the same intent and schema produce combinations
//! in identical order, whether expansion runs sequentially or across rayon
//! workers (`parallel` feature).
//!
//! ## Guards
//!
//! The product size is computed up front with checked arithmetic; exceeding
//! the configured cap fails with [`VuError::EnumerationLimit`] reporting
//! both the size and the cap, never silently truncating. In-flight
//! expansion can be abandoned through a [`VuCancelToken`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::clause::{VuClause, VuFieldSpec};
use crate::errors::{Result, VuError};
use crate::schema::{VuAttribute, VuSchema};

/// One fully-resolved clause combination handed to the recommendation
/// engine.
pub type VuCombination = Vec<VuClause>;

/// Cloneable handle for cancelling an in-flight enumeration from another
/// thread. Cancellation discards stale work without corrupting the
/// session's current intent.
#[derive(Clone, Debug, Default)]
pub struct VuCancelToken {
    cancelled: Arc<AtomicBool>,
}

impl VuCancelToken {
    /// Creates a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; any enumeration holding this token fails with
    /// [`VuError::Cancelled`] at its next check.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Enumerator configuration.
///
/// - `max_combinations`: hard cap on the combination space; exceeding it is
///   an error rather than a truncation
/// - `parallel_threshold`: minimum combination count before expansion is
///   partitioned across rayon workers (`parallel` feature only)
#[derive(Clone, Copy, Debug)]
pub struct VuEnumeratorConfig {
    pub max_combinations: u64,
    pub parallel_threshold: usize,
}

impl Default for VuEnumeratorConfig {
    fn default() -> Self {
        VuEnumeratorConfig {
            max_combinations: 10_000,
            parallel_threshold: 1_024,
        }
    }
}

/// Expands wildcard/OR-group clauses into concrete combinations.
#[derive(Clone, Debug, Default)]
pub struct VuEnumerator {
    config: VuEnumeratorConfig,
}

impl VuEnumerator {
    /// Creates an enumerator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an enumerator with explicit configuration.
    pub fn with_config(config: VuEnumeratorConfig) -> Self {
        VuEnumerator { config }
    }

    /// Computes the combination-space size without materializing it.
    pub fn count(&self, intent: &[VuClause], schema: &VuSchema) -> Result<u128> {
        if intent.is_empty() {
            return Ok(0);
        }
        let lists = candidate_lists(intent, schema)?;
        Ok(space_size(&lists))
    }

    /// Expands the intent into all concrete combinations, leftmost clause
    /// varying slowest.
    pub fn enumerate(
        &self,
        intent: &[VuClause],
        schema: &VuSchema,
    ) -> Result<Vec<VuCombination>> {
        self.enumerate_with_cancel(intent, schema, &VuCancelToken::new())
    }

    /// Like [`VuEnumerator::enumerate`], but abandonable through `token`.
    pub fn enumerate_with_cancel(
        &self,
        intent: &[VuClause],
        schema: &VuSchema,
        token: &VuCancelToken,
    ) -> Result<Vec<VuCombination>> {
        if intent.is_empty() {
            return Ok(Vec::new());
        }

        let lists = candidate_lists(intent, schema)?;
        let size = space_size(&lists);
        if size > u128::from(self.config.max_combinations) {
            return Err(VuError::EnumerationLimit {
                size,
                cap: self.config.max_combinations,
            });
        }
        if size == 0 {
            return Ok(Vec::new());
        }

        let total = size as usize;
        log::debug!(
            "enumerating {total} combination(s) across {} clause(s)",
            lists.len()
        );

        #[cfg(feature = "parallel")]
        if total >= self.config.parallel_threshold {
            return (0..total)
                .into_par_iter()
                .map(|index| {
                    if token.is_cancelled() {
                        Err(VuError::Cancelled)
                    } else {
                        Ok(decode(&lists, index))
                    }
                })
                .collect();
        }

        let mut combinations = Vec::with_capacity(total);
        for index in 0..total {
            if token.is_cancelled() {
                return Err(VuError::Cancelled);
            }
            combinations.push(decode(&lists, index));
        }
        Ok(combinations)
    }
}

/// Size of the Cartesian product, saturating on overflow so the limit check
/// still fires.
fn space_size(lists: &[Vec<VuClause>]) -> u128 {
    lists.iter().fold(1u128, |acc, list| {
        acc.checked_mul(list.len() as u128).unwrap_or(u128::MAX)
    })
}

/// Decodes one mixed-radix index into a combination. Digits are taken
/// rightmost-first, which makes the leftmost clause vary slowest.
fn decode(lists: &[Vec<VuClause>], index: usize) -> VuCombination {
    let mut digits = vec![0usize; lists.len()];
    let mut rem = index;
    for position in (0..lists.len()).rev() {
        let len = lists[position].len();
        digits[position] = rem % len;
        rem /= len;
    }
    digits
        .into_iter()
        .zip(lists)
        .map(|(digit, list)| list[digit].clone())
        .collect()
}

/// Computes each clause's local candidate set of concrete clauses.
fn candidate_lists(
    intent: &[VuClause],
    schema: &VuSchema,
) -> Result<Vec<Vec<VuClause>>> {
    let pinned: HashSet<&str> = intent
        .iter()
        .flat_map(|clause| clause.attribute.pinned_names())
        .collect();

    intent
        .iter()
        .map(|clause| expand_clause(clause, schema, &pinned))
        .collect()
}

/// Expands one clause into concrete candidates, attribute varying slower
/// than value.
fn expand_clause(
    clause: &VuClause,
    schema: &VuSchema,
    pinned: &HashSet<&str>,
) -> Result<Vec<VuClause>> {
    let attributes = attribute_candidates(clause, schema, pinned)?;

    let mut candidates = Vec::new();
    for attribute in attributes {
        for value in value_candidates(clause, attribute)? {
            candidates.push(materialize(clause, attribute, value)?);
        }
    }
    Ok(candidates)
}

/// Resolves the attribute position against the schema.
fn attribute_candidates<'a>(
    clause: &VuClause,
    schema: &'a VuSchema,
    pinned: &HashSet<&str>,
) -> Result<Vec<&'a VuAttribute>> {
    match &clause.attribute {
        VuFieldSpec::Single(name) => {
            let attribute = lookup(schema, name)?;
            if let Some(required) = clause.data_type {
                if attribute.data_type != required {
                    return Err(VuError::schema(format!(
                        "attribute '{name}' is {}, clause requires {}",
                        attribute.data_type.as_str(),
                        required.as_str()
                    )));
                }
            }
            Ok(vec![attribute])
        }
        VuFieldSpec::Any(members) => {
            let mut resolved = Vec::with_capacity(members.len());
            for member in members {
                let attribute = lookup(schema, member)?;
                if clause
                    .data_type
                    .is_none_or(|required| attribute.data_type == required)
                {
                    resolved.push(attribute);
                }
            }
            if resolved.is_empty() {
                return Err(VuError::schema(format!(
                    "no member of OR-group '{}' matches the clause's data \
                     type constraint",
                    clause.attribute.render()
                )));
            }
            Ok(resolved)
        }
        VuFieldSpec::Wildcard => Ok(schema
            .list_attributes()
            .iter()
            .filter(|attribute| {
                clause
                    .data_type
                    .is_none_or(|required| attribute.data_type == required)
            })
            .filter(|attribute| !pinned.contains(attribute.name.as_str()))
            .collect()),
        VuFieldSpec::Unspecified => Err(VuError::internal(
            "clause without an attribute reached the enumerator",
        )),
    }
}

/// Resolves the value position for one concrete attribute choice. `None`
/// means the clause carries no filter.
fn value_candidates(
    clause: &VuClause,
    attribute: &VuAttribute,
) -> Result<Vec<Option<String>>> {
    match &clause.value {
        VuFieldSpec::Unspecified => Ok(vec![None]),
        VuFieldSpec::Single(value) => Ok(vec![Some(value.clone())]),
        VuFieldSpec::Any(members) => {
            Ok(members.iter().cloned().map(Some).collect())
        }
        VuFieldSpec::Wildcard => {
            let domain = attribute.domain.as_ref().ok_or_else(|| {
                VuError::schema(format!(
                    "attribute '{}' has no declared value domain for \
                     wildcard expansion",
                    attribute.name
                ))
            })?;
            Ok(domain.iter().cloned().map(Some).collect())
        }
    }
}

/// Builds the ephemeral concrete clause for one attribute/value choice.
/// The data type comes from the schema; aggregation defaults by that type
/// when the source clause left it unset; the description is re-derived.
fn materialize(
    clause: &VuClause,
    attribute: &VuAttribute,
    value: Option<String>,
) -> Result<VuClause> {
    let value_spec = match value {
        Some(value) => VuFieldSpec::Single(value),
        None => VuFieldSpec::Unspecified,
    };
    let filter_op = value_spec.is_specified().then_some(clause.filter_op);

    VuClause::from_fields(
        VuFieldSpec::Single(attribute.name.clone()),
        value_spec,
        filter_op,
        clause.channel,
        Some(attribute.data_type),
        clause.aggregation,
        None,
    )
}

fn lookup<'a>(schema: &'a VuSchema, name: &str) -> Result<&'a VuAttribute> {
    schema.get(name).ok_or_else(|| {
        VuError::schema(format!("attribute '{name}' is not in the schema"))
    })
}
