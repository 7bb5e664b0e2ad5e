//! Link handling: per-line substitution, corpus rewrite and bulk conversion.
//!
//! # Responsibility
//! - Keep regex-driven link surgery isolated in pure line functions.
//! - Apply them across the corpus with per-file failure isolation.

pub mod convert;
pub mod reference_rewriter;
pub mod rewrite;
