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

//! # Intent Module
//!
//! This module provides the intent compilation pipeline of the Vu framework.
//! It turns heterogeneous shorthand intent descriptions into a canonical
//! ordered clause list and expands wildcard/OR-group clauses into the
//! concrete combination space evaluated by the recommendation engine.
//!
//! ## Architecture
//!
//! The intent system consists of three components, applied in order:
//! - **Parser** ([parser]): Converts one shorthand item (a string or a list
//!   of alternative strings) into a [`crate::VuClause`]
//! - **Normalizer** ([normalizer]): Merges shorthand items and explicit
//!   clause specs into one ordered [`VuIntent`], preserving caller order and
//!   reporting all per-item failures as a single aggregate error
//! - **Enumerator** ([enumerator]): Expands wildcards and OR-groups against
//!   an immutable schema snapshot into fully concrete clause combinations
//!
//! ## Shorthand Forms Supported
//!
//! - plain attribute: `"AverageCost"`
//! - filter: `"Region=New England"` (also `!=`, `<`, `<=`, `>`, `>=`)
//! - OR-group: `"A|B|C"` or `"Region=X|Y|Z"`
//! - list form: `["A", "B", "C"]` (OR-group without `|` syntax)
//! - wildcard: `"?"` in attribute or value position
//! - escapes: `\|`, `\?`, `\=` for literal metacharacters
//!
//! ## Usage Example
//!
//! ```rust
//! use vux::{VuIntentItem, VuNormalizer, VuEnumerator, VuSchema, VuDataType};
//!
//! let intent = VuNormalizer::new()
//!     .normalize(&[
//!         VuIntentItem::from("MedianDebt"),
//!         VuIntentItem::from("Region=New England|Southeast|Far West"),
//!     ])
//!     .unwrap();
//!
//! let schema = VuSchema::from_pairs([
//!     ("MedianDebt", VuDataType::Quantitative),
//!     ("Region", VuDataType::Nominal),
//! ]);
//! let combinations =
//!     VuEnumerator::new().enumerate(intent.clauses(), &schema).unwrap();
//! assert_eq!(combinations.len(), 3);
//! ```

pub mod enumerator;
pub mod normalizer;
pub mod parser;

pub use enumerator::{
    VuCancelToken, VuCombination, VuEnumerator, VuEnumeratorConfig,
};
pub use normalizer::{VuIntent, VuIntentItem, VuNormalizer};
pub use parser::VuIntentParser;
