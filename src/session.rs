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

//! # Vu Session Module
//!
//! This module provides [`VuSession`], the owner of an analytical session's
//! current intent.
//!
//! ## Semantics
//!
//! - **Atomic replacement**: `set_intent` replaces the whole intent or
//!   nothing; a rejected call leaves the previous intent untouched
//! - **Stale-work cancellation**: every successful replacement rotates the
//!   session's cancel token, so an enumeration started under the previous
//!   intent fails with [`VuError::Cancelled`] instead of delivering stale
//!   combinations
//! - **No internal locking**: the session is not thread-safe by itself;
//!   concurrent `set_intent` calls must be serialized by the caller, e.g.
//!   with one lock per session. Only the cancel token crosses threads.
//!
//! ## Intent Documents
//!
//! Besides the programmatic item list, a session accepts whole intent
//! documents: a JSON or YAML array whose elements are shorthand strings,
//! string arrays, or clause objects, plus a line-based plain-text form
//! (one shorthand item per line, `#`/`//` comments skipped).

use std::path::Path;

use crate::errors::{Result, VuError};
use crate::intent::enumerator::{VuCancelToken, VuCombination, VuEnumerator, VuEnumeratorConfig};
use crate::intent::normalizer::{VuIntent, VuIntentItem, VuNormalizer};
use crate::intent::parser::split_items;
use crate::schema::VuSchema;

/// Owner of one analytical session's current intent.
#[derive(Clone, Debug, Default)]
pub struct VuSession {
    intent: Option<VuIntent>,
    normalizer: VuNormalizer,
    enumerator: VuEnumerator,
    token: VuCancelToken,
}

impl VuSession {
    /// Creates a session with no intent and default enumerator limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with explicit enumerator configuration.
    pub fn with_enumerator_config(config: VuEnumeratorConfig) -> Self {
        VuSession {
            enumerator: VuEnumerator::with_config(config),
            ..Self::default()
        }
    }

    /// Replaces the session's intent atomically.
    ///
    /// Every item is parsed before anything is committed; if any item fails,
    /// the aggregate error is returned and the previous intent stays in
    /// place. A successful replacement cancels enumerations still running
    /// against the previous intent.
    pub fn set_intent(&mut self, items: &[VuIntentItem]) -> Result<&VuIntent> {
        let intent = self.normalizer.normalize(items)?;
        self.install(intent)
    }

    /// Sets the intent from comma-separated shorthand, e.g.
    /// `"MedianDebt, Region=New England|Southeast"`.
    pub fn set_intent_from_str(&mut self, source: &str) -> Result<&VuIntent> {
        let items: Vec<VuIntentItem> =
            split_items(source).into_iter().map(VuIntentItem::from).collect();
        self.set_intent(&items)
    }

    /// Sets the intent from a JSON document: an array of shorthand strings,
    /// string arrays, and clause objects.
    pub fn set_intent_from_json(&mut self, source: &str) -> Result<&VuIntent> {
        let items: Vec<VuIntentItem> = serde_json::from_str(source)
            .map_err(|e| VuError::Serde(format!("invalid intent JSON: {e}")))?;
        self.set_intent(&items)
    }

    /// Sets the intent from a YAML document with the same structure as the
    /// JSON form.
    pub fn set_intent_from_yaml(&mut self, source: &str) -> Result<&VuIntent> {
        let items: Vec<VuIntentItem> = serde_yaml::from_str(source)
            .map_err(|e| VuError::Serde(format!("invalid intent YAML: {e}")))?;
        self.set_intent(&items)
    }

    /// Sets the intent from a file, dispatching on extension: `.json`,
    /// `.yaml`/`.yml`, anything else as plain text (JSON if it starts with
    /// `[`, otherwise one shorthand item per line).
    pub fn set_intent_from_file(&mut self, path: &Path) -> Result<&VuIntent> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => self.set_intent_from_json(&content),
            "yaml" | "yml" => self.set_intent_from_yaml(&content),
            _ => {
                if content.trim_start().starts_with('[') {
                    self.set_intent_from_json(&content)
                } else {
                    self.set_intent_from_lines(&content)
                }
            }
        }
    }

    /// The session's current intent, if one has been set.
    pub fn current_intent(&self) -> Option<&VuIntent> {
        self.intent.as_ref()
    }

    /// Drops the current intent and cancels enumerations running against it.
    pub fn clear_intent(&mut self) {
        self.token.cancel();
        self.token = VuCancelToken::new();
        self.intent = None;
        log::debug!("intent cleared");
    }

    /// Cloneable handle tied to the current intent; cancelled automatically
    /// when the intent is replaced or cleared.
    pub fn cancel_handle(&self) -> VuCancelToken {
        self.token.clone()
    }

    /// Expands the current intent against a schema snapshot. A session
    /// without an intent yields no combinations.
    pub fn enumerate(&self, schema: &VuSchema) -> Result<Vec<VuCombination>> {
        match &self.intent {
            Some(intent) => self.enumerator.enumerate_with_cancel(
                intent.clauses(),
                schema,
                &self.token,
            ),
            None => Ok(Vec::new()),
        }
    }

    /// Combination-space size of the current intent without materializing it.
    pub fn combination_count(&self, schema: &VuSchema) -> Result<u128> {
        match &self.intent {
            Some(intent) => self.enumerator.count(intent.clauses(), schema),
            None => Ok(0),
        }
    }

    fn set_intent_from_lines(&mut self, content: &str) -> Result<&VuIntent> {
        let items: Vec<VuIntentItem> = content
            .lines()
            .map(str::trim)
            .filter(|line| {
                !line.is_empty()
                    && !line.starts_with('#')
                    && !line.starts_with("//")
            })
            .map(VuIntentItem::from)
            .collect();
        self.set_intent(&items)
    }

    fn install(&mut self, intent: VuIntent) -> Result<&VuIntent> {
        self.token.cancel();
        self.token = VuCancelToken::new();
        log::info!("intent replaced, {} clause(s)", intent.len());
        Ok(self.intent.insert(intent))
    }
}
