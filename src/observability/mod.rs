// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for grammar compilation and normalization.
//!
//! Log lines are produced from message structs in [`messages`] rather than
//! ad-hoc format strings. Each message implements `Display` for the human
//! readable line and [`messages::StructuredLog`] for the field-level event.
//!
//! Messages are organized by subsystem:
//! * `messages::grammar` - grammar compilation and registry assembly
//! * `messages::engine` - classification, verbalization and batch runs
//! * `messages::validation` - configuration and lexicon validation
//!
//! # Usage
//!
//! ```rust
//! use semiotic_wfst::observability::messages::engine::NormalizationFailed;
//! use semiotic_wfst::observability::messages::StructuredLog;
//!
//! let msg = NormalizationFailed {
//!     input: "12:61",
//!     error: "no parse",
//! };
//! msg.log();
//! ```

pub mod messages;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter, e.g. `semiotic_wfst=debug`.
pub const LOG_ENV: &str = "SEMIOTIC_LOG";

const DEFAULT_FILTER: &str = "semiotic_wfst=info";

/// Installs a global fmt subscriber filtered by [`LOG_ENV`].
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
