// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // config + runtime builder
pub mod engine;     // classify / verbalize / pipeline
pub mod errors;     // error handling
pub mod fst;        // weighted transducer algebra
pub mod grammar;    // grammar model + registry
pub mod grammars;   // per-language rule sets
pub mod lexicon;    // lexical tables
pub mod observability;
pub mod token;      // structured token model
