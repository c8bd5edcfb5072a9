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

//! # Vu Clause Module
//!
//! This module provides the core data structures for representing atomic
//! intent units in the Vu compiler. VuClause is the fundamental unit of
//! intent that flows through the parse → normalize → enumerate pipeline.
//!
//! ## Design Principles
//!
//! - **One clause, one field position each**: A clause carries one attribute
//!   specification and one value specification, each of which may be a single
//!   token, an OR-group of alternatives, a wildcard, or unspecified
//! - **Immutability**: Clauses are resolved once from a [`VuClauseSpec`] at
//!   construction time; the normalizer only reorders them and the enumerator
//!   only produces new ephemeral clauses
//! - **Traceability**: Every clause retains a shorthand `description` that
//!   re-parses to a structurally equal clause
//!
//! ## Usage Example
//!
//! ```rust
//! use vux::{VuClause, VuClauseSpec, VuDataType};
//!
//! // An attribute clause
//! let cost = VuClause::from_spec(VuClauseSpec::on("AverageCost")).unwrap();
//! assert_eq!(cost.description, "AverageCost");
//!
//! // A filter clause with an OR-group value
//! let region = VuClause::from_spec(
//!     VuClauseSpec::on("Region").with_value("New England|Southeast"),
//! )
//! .unwrap();
//!
//! // A typed wildcard clause
//! let any_measure = VuClause::from_spec(
//!     VuClauseSpec::on("?").with_data_type(VuDataType::Quantitative),
//! )
//! .unwrap();
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VuError};
use crate::schema::VuDataType;

/// Token requesting enumeration over all valid candidates for a field.
pub const WILDCARD_TOKEN: &str = "?";

/// Separator between alternatives of an OR-group field.
pub const OR_SEPARATOR: char = '|';

/// Characters that carry grammar meaning inside a field token and must be
/// backslash-escaped to be used literally.
const META_CHARS: &[char] = &['\\', '|', '?', '=', '<', '>', '!'];

/// One field position (attribute or value) of a clause.
///
/// Wildcard and OR-group are mutually exclusive: the field grammar rejects a
/// wildcard token mixed into a set of concrete alternatives.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VuFieldSpec {
    /// Field not given; for a value field this means "no filter".
    Unspecified,
    /// One concrete identifier or literal.
    Single(String),
    /// OR-group of alternatives. Duplicates are collapsed and members are
    /// kept in lexicographic order, which fixes the enumeration order.
    Any(BTreeSet<String>),
    /// The `?` marker, expanded by the enumerator.
    Wildcard,
}

impl VuFieldSpec {
    /// Parses one field token: OR-group split on unescaped `|`, per-token
    /// whitespace trimming, duplicate collapse, and wildcard recognition.
    ///
    /// A singleton OR-group collapses to [`VuFieldSpec::Single`]. Mixing the
    /// wildcard token with concrete alternatives is a conflict; an empty
    /// alternative (`"A||B"`) is a parse error.
    pub fn parse(token: &str) -> Result<Self> {
        let raw = token.trim();
        if raw.is_empty() {
            return Ok(VuFieldSpec::Unspecified);
        }

        let mut members = BTreeSet::new();
        let mut saw_wildcard = false;
        let mut alternatives = 0usize;

        for part in split_unescaped(raw, OR_SEPARATOR) {
            let part = part.trim();
            alternatives += 1;
            if part.is_empty() {
                return Err(VuError::parse(
                    raw,
                    0,
                    "empty alternative in OR-group",
                ));
            }
            if part == WILDCARD_TOKEN {
                saw_wildcard = true;
            } else {
                members.insert(unescape_token(part));
            }
        }

        if saw_wildcard {
            if alternatives > 1 {
                return Err(VuError::conflict(format!(
                    "field '{raw}' mixes a wildcard with concrete alternatives"
                )));
            }
            return Ok(VuFieldSpec::Wildcard);
        }

        if members.len() == 1 {
            let single = members.into_iter().next().unwrap_or_default();
            return Ok(VuFieldSpec::Single(single));
        }
        Ok(VuFieldSpec::Any(members))
    }

    /// Renders the field back into shorthand form, escaping grammar
    /// metacharacters so the output re-parses to an equal field.
    pub fn render(&self) -> String {
        match self {
            VuFieldSpec::Unspecified => String::new(),
            VuFieldSpec::Single(token) => escape_token(token),
            VuFieldSpec::Any(members) => members
                .iter()
                .map(|member| escape_token(member))
                .collect::<Vec<_>>()
                .join("|"),
            VuFieldSpec::Wildcard => WILDCARD_TOKEN.to_string(),
        }
    }

    /// Whether the field was given at all.
    pub fn is_specified(&self) -> bool {
        !matches!(self, VuFieldSpec::Unspecified)
    }

    /// Whether the field is the wildcard marker.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, VuFieldSpec::Wildcard)
    }

    /// Concrete names this field pins, used to exclude already-referenced
    /// attributes from wildcard expansion. Wildcards pin nothing.
    pub fn pinned_names(&self) -> Vec<&str> {
        match self {
            VuFieldSpec::Single(token) => vec![token.as_str()],
            VuFieldSpec::Any(members) => {
                members.iter().map(String::as_str).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for VuFieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Comparison operator of a filter clause. Defaults to `=` whenever a value
/// is present and no operator was named.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum VuFilterOp {
    #[default]
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
}

impl VuFilterOp {
    /// Shorthand symbol of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            VuFilterOp::Eq => "=",
            VuFilterOp::NotEq => "!=",
            VuFilterOp::Lt => "<",
            VuFilterOp::LtEq => "<=",
            VuFilterOp::Gt => ">",
            VuFilterOp::GtEq => ">=",
        }
    }
}

impl fmt::Display for VuFilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual-encoding slot a clause may be pinned to. Absent means the
/// recommendation engine decides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VuChannel {
    X,
    Y,
    Color,
}

/// Aggregation function applied to a clause's attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VuAggregation {
    /// Explicitly no aggregation.
    None,
    Mean,
    Sum,
    Min,
    Max,
    Count,
}

impl VuAggregation {
    /// Type-dependent default: quantitative attributes aggregate by mean,
    /// everything else is left unaggregated.
    pub fn default_for(data_type: VuDataType) -> Self {
        match data_type {
            VuDataType::Quantitative => VuAggregation::Mean,
            _ => VuAggregation::None,
        }
    }
}

/// Explicit clause configuration, the structured alternative to shorthand
/// strings at the `set_intent` boundary.
///
/// All fields default to unset. The `attribute` and `value` fields accept
/// the same shorthand syntax as string items (`|` OR-groups, `?` wildcard,
/// backslash escapes); they are parsed once when the spec is resolved by
/// [`VuClause::from_spec`].
///
/// # Defaults
///
/// - `filter_op`: `=` when a value is present
/// - `channel`: unset (recommendation engine decides)
/// - `data_type`: unset (wildcards expand over every attribute)
/// - `aggregation`: type-dependent (mean for quantitative, none otherwise)
/// - `description`: canonical shorthand rendering of the clause
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VuClauseSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_op: Option<VuFilterOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<VuChannel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<VuDataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<VuAggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VuClauseSpec {
    /// Creates an empty spec; resolving it without setting any field is a
    /// conflict error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a spec from attribute shorthand (`"AverageCost"`, `"A|B"`,
    /// `"?"`).
    pub fn on(attribute: impl Into<String>) -> Self {
        VuClauseSpec {
            attribute: Some(attribute.into()),
            ..Self::default()
        }
    }

    /// Sets the value shorthand, turning the clause into a filter.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the filter comparison operator.
    pub fn with_filter_op(mut self, filter_op: VuFilterOp) -> Self {
        self.filter_op = Some(filter_op);
        self
    }

    /// Pins the clause to a visual-encoding channel.
    pub fn with_channel(mut self, channel: VuChannel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Constrains wildcard expansion to one semantic type.
    pub fn with_data_type(mut self, data_type: VuDataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Overrides the type-dependent default aggregation.
    pub fn with_aggregation(mut self, aggregation: VuAggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    /// Overrides the auto-derived description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Canonical unit of intent: one attribute-or-value specification with
/// optional constraints.
///
/// Clauses are immutable once constructed. The normalizer only collects them
/// into an ordered list; the enumerator produces new ephemeral clauses when
/// expanding wildcards and OR-groups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VuClause {
    /// Attribute position of the clause.
    pub attribute: VuFieldSpec,

    /// Value position of the clause; specified only for filter clauses.
    pub value: VuFieldSpec,

    /// Comparison operator, meaningful when `value` is specified.
    pub filter_op: VuFilterOp,

    /// Optional visual-encoding channel pin.
    pub channel: Option<VuChannel>,

    /// Optional semantic-type constraint on wildcard expansion.
    pub data_type: Option<VuDataType>,

    /// Aggregation function; `None` means "not yet determinable" for
    /// wildcard clauses whose type is only known after expansion.
    pub aggregation: Option<VuAggregation>,

    /// Shorthand form this clause was derived from, retained for
    /// traceability. Re-parsing it yields a structurally equal clause.
    pub description: String,
}

impl VuClause {
    /// Resolves an explicit spec into an immutable clause, parsing the field
    /// shorthand and filling documented defaults exactly once.
    ///
    /// # Errors
    ///
    /// - `Conflict` when neither attribute nor value is given, when a value
    ///   is given without an attribute, when a filter operator is given
    ///   without a value, or when a field mixes wildcard and OR-group
    /// - `Parse` when the field shorthand is malformed
    pub fn from_spec(spec: VuClauseSpec) -> Result<Self> {
        let attribute = match &spec.attribute {
            Some(token) => VuFieldSpec::parse(token)?,
            None => VuFieldSpec::Unspecified,
        };
        let value = match &spec.value {
            Some(token) => VuFieldSpec::parse(token)?,
            None => VuFieldSpec::Unspecified,
        };

        Self::from_fields(
            attribute,
            value,
            spec.filter_op,
            spec.channel,
            spec.data_type,
            spec.aggregation,
            spec.description,
        )
    }

    /// Assembles a clause from already-parsed fields, applying the same
    /// validation and default-filling as [`VuClause::from_spec`]. Used by
    /// the shorthand parser and by the enumerator when materializing
    /// concrete expansions.
    pub fn from_fields(
        attribute: VuFieldSpec,
        value: VuFieldSpec,
        filter_op: Option<VuFilterOp>,
        channel: Option<VuChannel>,
        data_type: Option<VuDataType>,
        aggregation: Option<VuAggregation>,
        description: Option<String>,
    ) -> Result<Self> {
        if !attribute.is_specified() && !value.is_specified() {
            return Err(VuError::conflict(
                "clause specifies neither an attribute nor a value",
            ));
        }
        if value.is_specified() && !attribute.is_specified() {
            return Err(VuError::conflict(
                "filter value given without an attribute",
            ));
        }
        if filter_op.is_some() && !value.is_specified() {
            return Err(VuError::conflict(
                "filter operator given without a value",
            ));
        }

        let filter_op = filter_op.unwrap_or_default();
        let aggregation = match (aggregation, data_type) {
            (Some(explicit), _) => Some(explicit),
            (None, Some(data_type)) => Some(VuAggregation::default_for(data_type)),
            (None, None) => None,
        };

        let description = description.unwrap_or_else(|| {
            render_description(&attribute, &value, filter_op)
        });

        Ok(VuClause {
            attribute,
            value,
            filter_op,
            channel,
            data_type,
            aggregation,
            description,
        })
    }

    /// Whether the clause constrains values, i.e. acts as a filter.
    pub fn is_filter(&self) -> bool {
        self.value.is_specified()
    }

    /// Whether either field still needs enumeration (wildcard or OR-group).
    pub fn needs_enumeration(&self) -> bool {
        let open = |field: &VuFieldSpec| {
            matches!(field, VuFieldSpec::Wildcard | VuFieldSpec::Any(_))
        };
        open(&self.attribute) || open(&self.value)
    }

    /// Canonical shorthand rendering of the clause's fields, ignoring any
    /// caller-supplied description override.
    pub fn canonical_description(&self) -> String {
        render_description(&self.attribute, &self.value, self.filter_op)
    }
}

impl fmt::Display for VuClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Renders `attribute[ op value]` shorthand.
fn render_description(
    attribute: &VuFieldSpec,
    value: &VuFieldSpec,
    filter_op: VuFilterOp,
) -> String {
    if value.is_specified() {
        format!("{}{}{}", attribute.render(), filter_op.as_str(), value.render())
    } else {
        attribute.render()
    }
}

/// Splits on unescaped occurrences of `separator`, keeping escapes intact
/// for later [`unescape_token`] passes.
pub(crate) fn split_unescaped(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (idx, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
        } else if ch == separator {
            parts.push(&input[start..idx]);
            start = idx + ch.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Removes backslash escapes from a token.
pub(crate) fn unescape_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut escaped = false;
    for ch in token.chars() {
        if escaped {
            out.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else {
            out.push(ch);
        }
    }
    if escaped {
        out.push('\\');
    }
    out
}

/// Backslash-escapes grammar metacharacters in a token.
pub(crate) fn escape_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    for ch in token.chars() {
        if META_CHARS.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
