// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Policy failures and drop-time rejections.

use alloc::string::String;

/// A failure while evaluating policies for a zone.
///
/// The gate logs these and falls back to rejection (acceptance) or an empty edge set
/// (data); they never reach the resolver.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum PolicyError {
    /// A source policy failed.
    #[error("source policy `{tag}` failed: {message}")]
    Source {
        /// Tag the policy was resolved for.
        tag: String,
        /// What went wrong.
        message: String,
    },
    /// A destination policy failed.
    #[error("destination policy `{kind}` failed: {message}")]
    Destination {
        /// Destination kind the policy was resolved for.
        kind: String,
        /// What went wrong.
        message: String,
    },
    /// The destination context could not be built.
    #[error("destination context unavailable: {0}")]
    Context(String),
    /// The edge data producer failed.
    #[error("edge data failed: {0}")]
    EdgeData(String),
}

/// Why a drop was refused at drop time.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("drop rejected ({code}): {message}")]
pub struct DropRejection {
    /// Machine-readable reason.
    pub code: String,
    /// Human-readable detail.
    pub message: String,
}

impl DropRejection {
    /// Create a rejection.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
