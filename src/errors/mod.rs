// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod algebra;
mod build;
mod config;
mod execution;

pub use algebra::AlgebraError;
pub use build::{BuildError, GrammarError};
pub use config::ConfigError;
pub use execution::{FailureStrategy, NormalizeError};
