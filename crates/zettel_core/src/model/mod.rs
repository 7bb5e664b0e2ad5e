//! Domain model for vault files and their front matter.
//!
//! # Responsibility
//! - Define the path decomposition shared by catalog, rename and link code.
//! - Define the ordered, typed front-matter record used by every store.
//!
//! # Invariants
//! - A file carries at most one front-matter block, starting at its first
//!   non-empty line.

pub mod file_name;
pub mod front_matter;
