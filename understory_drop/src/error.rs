// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by zone callbacks.
//!
//! Callback errors never abort resolution or dispatch. The dispatcher logs them and
//! collects them into a [`DispatchReport`](crate::dispatch::DispatchReport).

use alloc::string::String;

use crate::zone::ZoneCallback;

/// Failure of a single zone callback.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ZoneError {
    /// The handler returned an error.
    #[error("zone handler failed: {0}")]
    Handler(String),
    /// The handler panicked (only caught with the `std` feature).
    #[error("zone handler `{callback}` panicked")]
    Panicked {
        /// The callback that panicked.
        callback: ZoneCallback,
    },
}

impl ZoneError {
    /// Convenience constructor for [`ZoneError::Handler`].
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }
}
