// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Default bound on the states of any compiled grammar or merged automaton
pub const DEFAULT_MAX_STATES: usize = 5_000_000;
/// Default number of candidates returned by non-deterministic normalization
pub const DEFAULT_MAX_CANDIDATES: usize = 16;
/// Default number of search steps before candidate enumeration stops
pub const DEFAULT_MAX_EXPANSIONS: usize = 200_000;
/// Concurrency used when the host cannot report its parallelism
pub const FALLBACK_CONCURRENCY: usize = 4;
/// Weight added for each whitespace join between two tokens
pub const JOIN_WEIGHT: f32 = 1.1;

/// Worker count when none is configured.
pub fn default_max_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_CONCURRENCY)
}
