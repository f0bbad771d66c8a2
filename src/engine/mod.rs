// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runtime side: classifying sentences, rewriting parses, verbalizing them.

pub mod classifier;
pub mod pipeline;
pub mod reorder;
pub mod verbalizer;

pub use classifier::{Candidates, Classifier};
pub use pipeline::{Normalizer, NormalizerOptions, Rescorer, Run, Stage, Step};
pub use reorder::{FieldOrderPass, TokenPass};
pub use verbalizer::{Rendering, Verbalizer};
