//! Core normalization logic for a Zettelkasten note vault.
//! This crate owns front-matter, renaming and link-rewrite invariants; the
//! CLI only parses arguments and asks for confirmation.

pub mod catalog;
pub mod config;
pub mod error;
pub mod links;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod text_io;

pub use catalog::{list_files, FileKind};
pub use config::{NormalizerConfig, PhaseToggles};
pub use error::{NormalizeError, NormalizeResult};
pub use links::convert::{convert_wikilinks, ConversionSummary};
pub use links::reference_rewriter::{ReferenceRewriter, RewriteReport};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::front_matter::{FieldKey, FieldValue, FrontMatter};
pub use service::front_matter_service::{FrontMatterNormalizer, FrontMatterSummary};
pub use service::identifier::{IdentifierAllocator, IdentifierScheme};
pub use service::pipeline::{Normalizer, RunSummary};
pub use service::rename_service::{RenameEngine, RenameSummary};
pub use store::{detect_format, store_for, FrontMatterError, FrontMatterFormat, FrontMatterStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
