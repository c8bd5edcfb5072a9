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

//! # Vu Schema Module
//!
//! This module provides the dataset schema metadata consumed by the
//! enumerator when expanding wildcard clauses.
//!
//! ## Design Principles
//!
//! - **Snapshot semantics**: A [`VuSchema`] is an immutable snapshot supplied
//!   by the external data-storage collaborator. The compiler never caches a
//!   schema statefully; every enumeration call receives its own snapshot, so
//!   a dataset whose columns change between calls cannot produce stale
//!   expansions.
//! - **Order-preserving**: Attributes keep the dataset's column order, which
//!   in turn fixes the expansion order of attribute wildcards.
//! - **Optional domains**: An attribute may declare its categorical value
//!   universe. Value wildcards enumerate over that domain; attributes
//!   without one cannot satisfy a value wildcard.

use serde::{Deserialize, Serialize};

/// Semantic type category of a dataset attribute.
///
/// Wildcard clauses may constrain expansion to one category; the category
/// also drives the default aggregation of a clause that leaves it unset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VuDataType {
    /// Continuous numeric measures.
    Quantitative,
    /// Unordered categorical values.
    Nominal,
    /// Dates, times, and other temporal values.
    Temporal,
    /// Identifier columns, excluded from most recommendations.
    Id,
}

impl VuDataType {
    /// Stable lowercase name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            VuDataType::Quantitative => "quantitative",
            VuDataType::Nominal => "nominal",
            VuDataType::Temporal => "temporal",
            VuDataType::Id => "id",
        }
    }
}

/// One dataset column: name, semantic type, and optional value domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VuAttribute {
    /// Column name as it appears in the dataset.
    pub name: String,

    /// Semantic type category of the column.
    pub data_type: VuDataType,

    /// Known categorical value universe, when the data-storage collaborator
    /// supplies one. Required to expand a value wildcard on this attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Vec<String>>,
}

impl VuAttribute {
    /// Creates an attribute without a declared value domain.
    pub fn new(name: impl Into<String>, data_type: VuDataType) -> Self {
        VuAttribute {
            name: name.into(),
            data_type,
            domain: None,
        }
    }

    /// Attaches the categorical value universe of this attribute.
    pub fn with_domain<I, S>(mut self, domain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain = Some(domain.into_iter().map(Into::into).collect());
        self
    }
}

/// Immutable, ordered snapshot of a dataset's attribute metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VuSchema {
    attributes: Vec<VuAttribute>,
}

impl VuSchema {
    /// Builds a schema snapshot from an ordered attribute list.
    pub fn new(attributes: Vec<VuAttribute>) -> Self {
        VuSchema { attributes }
    }

    /// Convenience constructor from `(name, data_type)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, VuDataType)>,
        S: Into<String>,
    {
        VuSchema {
            attributes: pairs
                .into_iter()
                .map(|(name, data_type)| VuAttribute::new(name, data_type))
                .collect(),
        }
    }

    /// Ordered attribute metadata, preserving dataset column order.
    pub fn list_attributes(&self) -> &[VuAttribute] {
        &self.attributes
    }

    /// Looks up one attribute by name.
    pub fn get(&self, name: &str) -> Option<&VuAttribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Whether the schema contains an attribute with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Attributes of one semantic type, in schema order.
    pub fn attributes_of_type(
        &self,
        data_type: VuDataType,
    ) -> impl Iterator<Item = &VuAttribute> {
        self.attributes
            .iter()
            .filter(move |attr| attr.data_type == data_type)
    }

    /// Number of attributes in the snapshot.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the snapshot has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
