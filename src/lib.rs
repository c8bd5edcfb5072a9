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

//! # Vu Core Library
//!
//! This is the main library entry point for the Vu intent compiler. It turns
//! shorthand analytical-intent descriptions into a canonical clause list and
//! expands wildcards and OR-groups into the concrete combination space
//! consumed by a visualization-recommendation engine.
//!
//! ## Module Overview
//!
//! - **clause**: VuClause and related data structures for intent
//!   representation
//! - **schema**: Immutable dataset schema snapshots consumed by enumeration
//! - **intent**: The parse → normalize → enumerate pipeline
//! - **session**: Per-session intent ownership with atomic replacement
//! - **errors**: The VuError taxonomy
//!
//! ## Feature Flags
//!
//! - `parallel`: Partitions large enumeration spaces across rayon workers
//!   with no change to output ordering (enabled by default)
//!
//! ## Quick Start
//!
//! ```rust
//! use vux::{VuIntentItem, VuSession, VuSchema, VuDataType};
//!
//! let mut session = VuSession::new();
//! session
//!     .set_intent(&[
//!         VuIntentItem::from("MedianDebt"),
//!         VuIntentItem::from("Region=New England|Southeast|Far West"),
//!     ])
//!     .unwrap();
//!
//! let schema = VuSchema::from_pairs([
//!     ("MedianDebt", VuDataType::Quantitative),
//!     ("Region", VuDataType::Nominal),
//! ]);
//! let combinations = session.enumerate(&schema).unwrap();
//! assert_eq!(combinations.len(), 3);
//! ```
//!
//! ## Architecture
//!
//! Vu follows a pure, synchronous pipeline architecture:
//! 1. **Parser**: Shorthand strings become [`VuClause`] values
//! 2. **Normalizer**: Mixed items merge into one ordered [`VuIntent`]
//! 3. **Enumerator**: Wildcards/OR-groups expand against a schema snapshot
//! 4. **Session**: Owns the current intent; replacement is atomic and
//!    cancels stale enumerations
//!
//! ## Error Handling
//!
//! All operations return `Result<T, VuError>` for explicit error handling.
//! Every error is recoverable; a failed `set_intent` leaves the previous
//! intent untouched.

pub mod clause;
pub mod errors;
pub mod intent;
pub mod schema;
pub mod session;

pub use clause::{
    VuAggregation, VuChannel, VuClause, VuClauseSpec, VuFieldSpec, VuFilterOp,
};
pub use errors::{Result, VuError};
pub use intent::{
    VuCancelToken, VuCombination, VuEnumerator, VuEnumeratorConfig, VuIntent,
    VuIntentItem, VuIntentParser, VuNormalizer,
};
pub use schema::{VuAttribute, VuDataType, VuSchema};
pub use session::VuSession;
