//! `normalize-zettel` entry point.
//!
//! # Responsibility
//! - Parse arguments, validate paths and start logging in the vault root.
//! - Fold CLI overrides into the run configuration.
//! - Gate the run behind two confirmations unless `--yes` is given.

mod prompt;

use clap::{Parser, ValueEnum};
use log::{error, info};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use zettel_core::service::pipeline::validate_paths;
use zettel_core::{
    default_log_level, init_logging, FrontMatterFormat, IdentifierScheme, NormalizeError,
    Normalizer, NormalizerConfig, PhaseToggles, RunSummary,
};

/// Normalize a Zettelkasten vault: front matter, identifier names and links.
#[derive(Debug, Parser)]
#[command(name = "normalize-zettel", version, about)]
struct Cli {
    /// Vault root; links are resolved and the log is written here.
    root: PathBuf,

    /// File or folder to normalize; defaults to the root.
    #[arg(short, long)]
    target: Option<PathBuf>,

    /// Answer yes to every confirmation.
    #[arg(short, long)]
    yes: bool,

    /// Format for newly created front matter.
    #[arg(short = 'f', long = "format", value_enum)]
    format: Option<FormatArg>,

    /// TOML file with configuration overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    skip_frontmatter: bool,

    #[arg(long)]
    skip_rename_notes: bool,

    #[arg(long)]
    skip_rename_images: bool,

    /// Convert remaining wiki-links to Markdown links after renaming.
    #[arg(long)]
    convert_wikilinks: bool,

    /// Identifier shape for renamed files.
    #[arg(long, value_enum)]
    id_scheme: Option<IdSchemeArg>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Yaml,
    Toml,
    Json,
}

impl From<FormatArg> for FrontMatterFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Yaml => FrontMatterFormat::Yaml,
            FormatArg::Toml => FrontMatterFormat::Toml,
            FormatArg::Json => FrontMatterFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IdSchemeArg {
    Random,
    Timestamp,
}

impl From<IdSchemeArg> for IdentifierScheme {
    fn from(value: IdSchemeArg) -> Self {
        match value {
            IdSchemeArg::Random => IdentifierScheme::Random,
            IdSchemeArg::Timestamp => IdentifierScheme::Timestamp,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Abort the process");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    let target = cli.target.clone().unwrap_or_else(|| cli.root.clone());
    validate_paths(&cli.root, &target).map_err(|err| match err {
        NormalizeError::PathNotFound(path) => format!(
            "The specified path `{}` does not exist. See -h for usage.",
            path.display()
        ),
        other => other.to_string(),
    })?;

    let root = cli
        .root
        .canonicalize()
        .map_err(|err| format!("cannot resolve root `{}`: {err}", cli.root.display()))?;
    let target = target
        .canonicalize()
        .map_err(|err| format!("cannot resolve target `{}`: {err}", target.display()))?;
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, &root)?;

    let config = build_config(&cli).map_err(|err| {
        error!("event=config_load module=cli status=error error={err}");
        err.to_string()
    })?;

    info!(
        "event=cli_start module=cli root={} target={}",
        root.display(),
        target.display()
    );
    if !confirm(cli.yes, "Can I normalize these notes?")? {
        return Ok(ExitCode::SUCCESS);
    }

    log_phase_status(&config.phases, config.front_matter_format);
    if !confirm(cli.yes, "Are you sure you want to perform the above functions?")? {
        return Ok(ExitCode::SUCCESS);
    }

    let normalizer = Normalizer::new(config);
    match normalizer.run(&root, &target) {
        Ok(summary) => {
            log_summary(&summary);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!("event=run module=cli status=error error={err}");
            Err(err.to_string())
        }
    }
}

fn build_config(cli: &Cli) -> zettel_core::NormalizeResult<NormalizerConfig> {
    let mut config = match &cli.config {
        Some(path) => NormalizerConfig::load(path)?,
        None => NormalizerConfig::default(),
    };

    if let Some(format) = cli.format {
        config.front_matter_format = format.into();
    }
    if let Some(scheme) = cli.id_scheme {
        config.identifier_scheme = scheme.into();
    }
    if cli.skip_frontmatter {
        config.phases.front_matter = false;
    }
    if cli.skip_rename_notes {
        config.phases.rename_notes = false;
    }
    if cli.skip_rename_images {
        config.phases.rename_images = false;
    }
    if cli.convert_wikilinks {
        config.phases.convert_wikilinks = true;
    }
    Ok(config)
}

fn confirm(assume_yes: bool, question: &str) -> Result<bool, String> {
    if assume_yes {
        info!("event=confirm module=cli status=auto question={question:?}");
        return Ok(true);
    }

    let stdin = io::stdin();
    let accepted = prompt::query_yes_no(question, true, &mut stdin.lock(), &mut io::stdout())
        .map_err(|err| format!("failed to read confirmation: {err}"))?;
    if accepted {
        info!("event=confirm module=cli status=accepted");
    } else {
        info!("event=confirm module=cli status=declined");
    }
    Ok(accepted)
}

fn log_phase_status(phases: &PhaseToggles, format: FrontMatterFormat) {
    let on_off = |enabled: bool| if enabled { "ON" } else { "OFF" };
    info!(
        "- {} front matter formatting ...... {}",
        format.name().to_ascii_uppercase(),
        on_off(phases.front_matter)
    );
    info!(
        "- Rename notes to identifiers and update links ...... {}",
        on_off(phases.rename_notes)
    );
    info!(
        "- Rename images to identifiers and update links ...... {}",
        on_off(phases.rename_images)
    );
    info!(
        "- Convert remaining wiki-links to Markdown ...... {}",
        on_off(phases.convert_wikilinks)
    );
}

fn log_summary(summary: &RunSummary) {
    if let Some(front_matter) = summary.front_matter {
        info!(
            "event=summary module=cli phase=front_matter checked={} created={} updated={} skipped={}",
            front_matter.checked, front_matter.created, front_matter.updated, front_matter.skipped
        );
    }
    for (phase, rename) in [("rename_notes", summary.notes), ("rename_images", summary.images)] {
        if let Some(rename) = rename {
            info!(
                "event=summary module=cli phase={phase} renamed={} linked_files_updated={}",
                rename.renamed, rename.linked_files_updated
            );
        }
    }
    if let Some(conversion) = summary.conversion {
        info!(
            "event=summary module=cli phase=convert_wikilinks files_modified={} links_converted={}",
            conversion.files_modified, conversion.links_converted
        );
    }
    info!("Normalization finished");
}

#[cfg(test)]
mod tests {
    use super::{build_config, Cli};
    use clap::Parser;
    use zettel_core::{FrontMatterFormat, IdentifierScheme};

    #[test]
    fn overrides_fold_into_default_config() {
        let cli = Cli::parse_from([
            "normalize-zettel",
            "/vault",
            "-f",
            "toml",
            "--id-scheme",
            "timestamp",
            "--skip-rename-images",
            "--convert-wikilinks",
        ]);
        let config = build_config(&cli).expect("default config should build");

        assert_eq!(config.front_matter_format, FrontMatterFormat::Toml);
        assert_eq!(config.identifier_scheme, IdentifierScheme::Timestamp);
        assert!(config.phases.front_matter);
        assert!(config.phases.rename_notes);
        assert!(!config.phases.rename_images);
        assert!(config.phases.convert_wikilinks);
    }

    #[test]
    fn target_and_yes_flags_parse() {
        let cli = Cli::parse_from(["normalize-zettel", "/vault", "-t", "/vault/Inbox", "-y"]);
        assert!(cli.yes);
        assert_eq!(
            cli.target.as_deref(),
            Some(std::path::Path::new("/vault/Inbox"))
        );
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["normalize-zettel", "/vault", "-f", "xml"]).is_err());
    }
}
