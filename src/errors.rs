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

//! # Vu Error Module
//!
//! This module defines the error types and utilities used throughout the Vu
//! intent compiler for consistent error handling and reporting.
//!
//! ## Error Handling Philosophy
//!
//! Vu uses a structured error approach with the following principles:
//!
//! - **Explicit Error Types**: Each error variant represents a specific category
//!   of failure, making it easier to handle errors appropriately
//! - **Context-Rich**: Errors include relevant context (offending token, item
//!   position, computed combination counts) to aid debugging
//! - **Recoverable**: Every error is recoverable — the caller adjusts the
//!   intent input and retries; no error corrupts prior session state
//! - **Serde Support**: Errors can be serialized/deserialized for logging,
//!   persistence, and network transmission
//!
//! ## Error Categories
//!
//! - **Parse**: Malformed shorthand syntax in one intent item
//! - **Rejected**: Aggregate of all per-item parse failures from one
//!   `set_intent` call
//! - **Conflict**: Contradictory constraints on a single clause
//! - **EnumerationLimit**: Combination space larger than the configured cap
//! - **Schema**: Enumeration requested data the schema snapshot does not carry
//! - **Cancelled**: Enumeration discarded through a cancel token
//! - **Io / Serde / Internal**: Ambient filesystem, serialization, and
//!   unexpected-failure categories

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Vu.
///
/// This is a type alias for `std::result::Result<T, VuError>` that provides
/// a more concise way to write function signatures that return Vu errors.
pub type Result<T> = std::result::Result<T, VuError>;

/// Canonical error enumeration for the Vu intent compiler.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum VuError {
    /// Malformed shorthand syntax in a single intent item.
    ///
    /// `token` is the offending input fragment and `position` is the
    /// zero-based index of the item in the caller's intent list.
    #[error("parse error at item {position} ('{token}'): {message}")]
    Parse {
        token: String,
        position: usize,
        message: String,
    },

    /// Aggregate failure for one `set_intent` call.
    ///
    /// Parsing is best-effort across items, so every failed item is listed;
    /// the previous intent is left untouched.
    #[error("intent rejected, {} item(s) failed to parse", .failures.len())]
    Rejected { failures: Vec<String> },

    /// Contradictory constraints on a single clause, such as a field that is
    /// both a wildcard and an OR-group.
    #[error("conflict error: {message}")]
    Conflict { message: String },

    /// The combination space exceeds the configured enumeration cap.
    ///
    /// Reports both the computed size and the cap so the caller can narrow
    /// the intent instead of guessing.
    #[error("enumeration space of {size} combinations exceeds cap of {cap}")]
    EnumerationLimit { size: u128, cap: u64 },

    /// The schema snapshot lacks data the enumeration needs, e.g. a value
    /// wildcard against an attribute with no declared domain.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// An in-flight enumeration was discarded through its cancel token.
    #[error("enumeration cancelled")]
    Cancelled,

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for VuError {
    fn from(err: io::Error) -> Self {
        VuError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VuError {
    fn from(err: serde_json::Error) -> Self {
        VuError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for VuError {
    fn from(err: serde_yaml::Error) -> Self {
        VuError::Serde(err.to_string())
    }
}

impl VuError {
    /// Helper to construct parse errors.
    pub fn parse(
        token: impl Into<String>,
        position: usize,
        message: impl Into<String>,
    ) -> Self {
        VuError::Parse {
            token: token.into(),
            position,
            message: message.into(),
        }
    }

    /// Helper to construct conflict errors.
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        VuError::Conflict {
            message: message.into(),
        }
    }

    /// Helper to construct schema errors.
    pub fn schema<T: Into<String>>(message: T) -> Self {
        VuError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        VuError::Internal(message.into())
    }

    /// Re-anchors the item position of a parse error.
    ///
    /// The field grammar reports position 0; the normalizer rewrites it to
    /// the item's index in the caller's intent list.
    pub fn at_position(self, position: usize) -> Self {
        match self {
            VuError::Parse { token, message, .. } => VuError::Parse {
                token,
                position,
                message,
            },
            other => other,
        }
    }
}
