use std::fs;
use std::path::{Path, PathBuf};
use zettel_core::model::file_name::FileName;
use zettel_core::service::identifier::is_identifier_stem;
use zettel_core::{
    list_files, store_for, FieldKey, FieldValue, FileKind, FrontMatterFormat, IdentifierScheme,
    NormalizeError, Normalizer, NormalizerConfig,
};

fn write(path: &Path, content: &str) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

#[test]
fn full_run_normalizes_renames_and_relinks() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(&root.join("Inbox/alpha.md"), "#idea\nLinks to [[beta]] and ![](pic.png)\n");
    write(&root.join("beta.md"), "Back to [[alpha | Alpha]]\n");
    write(&root.join("pic.png"), "png");
    write(&root.join("Backup/ignored.md"), "untouched [[alpha]]\n");

    let normalizer = Normalizer::new(NormalizerConfig::default());
    let summary = normalizer.run(root, root).expect("run should succeed");

    let front_matter = summary.front_matter.expect("front matter phase ran");
    assert_eq!(front_matter.created, 2);
    assert_eq!(summary.notes.expect("note phase ran").renamed, 2);
    assert_eq!(summary.images.expect("image phase ran").renamed, 1);
    assert!(summary.conversion.is_none());

    let config = normalizer.config();
    let notes = list_files(root, FileKind::Note, config);
    assert_eq!(notes.len(), 2);
    let names: Vec<FileName> = notes.iter().map(|note| FileName::from_path(note)).collect();
    for (note, name) in notes.iter().zip(&names) {
        assert_eq!(note.parent(), Some(root));
        assert!(is_identifier_stem(&name.stem));

        let content = fs::read_to_string(note).unwrap();
        let document = store_for(FrontMatterFormat::Yaml).parse(&content).unwrap();
        assert_eq!(
            document.front_matter.get(&FieldKey::Uid).map(FieldValue::plain_text),
            Some(name.stem.clone())
        );
    }

    let image = list_files(root, FileKind::Image, config);
    assert_eq!(image.len(), 1);
    let image_name = FileName::from_path(&image[0]).full_name;

    let contents: Vec<String> = notes
        .iter()
        .map(|note| fs::read_to_string(note).unwrap())
        .collect();
    let alpha = contents
        .iter()
        .find(|content| content.contains("title: alpha"))
        .expect("alpha keeps its title");
    let beta = contents
        .iter()
        .find(|content| content.contains("title: beta"))
        .expect("beta keeps its title");
    assert!(alpha.contains("draft: true"));
    assert!(alpha.contains("tags: [idea]"));
    assert!(beta.contains("draft: false"));
    assert!(alpha.contains(&format!("![]({image_name})")));
    assert!(!alpha.contains("[[beta]]"));
    assert!(!beta.contains("[[alpha"));
    assert!(beta.contains("Back to [Alpha]("));

    assert_eq!(
        fs::read_to_string(root.join("Backup/ignored.md")).unwrap(),
        "untouched [[alpha]]\n"
    );
}

#[test]
fn second_run_renames_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(&root.join("one.md"), "first\n");
    write(&root.join("img/two.png"), "png");

    let normalizer = Normalizer::new(NormalizerConfig::default());
    normalizer.run(root, root).expect("first run should succeed");
    let summary = normalizer.run(root, root).expect("second run should succeed");

    assert_eq!(summary.front_matter.unwrap().created, 0);
    assert_eq!(summary.notes.unwrap().renamed, 0);
    assert_eq!(summary.images.unwrap().renamed, 0);
}

#[test]
fn disabled_phases_do_not_run() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let note = write(&root.join("keep-name.md"), "[[other]]\n");

    let mut config = NormalizerConfig::default();
    config.phases.front_matter = false;
    config.phases.rename_notes = false;
    config.phases.rename_images = false;
    config.phases.convert_wikilinks = true;

    let summary = Normalizer::new(config).run(root, root).unwrap();
    assert!(summary.front_matter.is_none());
    assert!(summary.notes.is_none());
    assert!(summary.images.is_none());
    let conversion = summary.conversion.expect("conversion ran");
    assert_eq!(conversion.files_modified, 1);
    assert_eq!(conversion.links_converted, 1);
    assert_eq!(fs::read_to_string(&note).unwrap(), "[other](other.md)\n");
}

#[test]
fn target_subfolder_limits_work_but_links_span_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let target = root.join("Inbox");
    write(&target.join("fresh.md"), "new note\n");
    let outside = write(&root.join("Projects/linker.md"), "see [[fresh]]\n");

    let mut config = NormalizerConfig::default();
    config.identifier_scheme = IdentifierScheme::Timestamp;
    let summary = Normalizer::new(config).run(root, &target).unwrap();

    assert_eq!(summary.front_matter.unwrap().created, 1);
    assert_eq!(summary.notes.unwrap().renamed, 1);
    assert_eq!(fs::read_to_string(&outside).unwrap().matches("[fresh](").count(), 1);
    assert!(outside.exists());
}

#[test]
fn missing_paths_are_rejected_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let normalizer = Normalizer::new(NormalizerConfig::default());

    let err = normalizer.run(&root.join("nope"), root).unwrap_err();
    assert!(matches!(err, NormalizeError::PathNotFound(_)));

    let err = normalizer.run(root, &root.join("missing.md")).unwrap_err();
    assert!(matches!(err, NormalizeError::PathNotFound(_)));
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir.path().join("normalizer.toml"),
        "front_matter_format = \"json\"\n\
         identifier_scheme = \"timestamp\"\n\
         inbox_dirs = [\"Fleeting\"]\n\
         \n\
         [phases]\n\
         rename_images = false\n",
    );

    let config = NormalizerConfig::load(&path).expect("config should load");
    assert_eq!(config.front_matter_format, FrontMatterFormat::Json);
    assert_eq!(config.identifier_scheme, IdentifierScheme::Timestamp);
    assert!(config.is_inbox_dir("Fleeting"));
    assert!(!config.is_inbox_dir("Inbox"));
    assert!(config.phases.front_matter);
    assert!(!config.phases.rename_images);
    assert!(config.exclude_dirs.contains("Backup"));
}

#[test]
fn config_rejects_unknown_keys_and_bad_extensions() {
    let err = NormalizerConfig::from_toml_str("colour = \"blue\"\n").unwrap_err();
    assert!(matches!(err, NormalizeError::InvalidConfig(_)));

    let err = NormalizerConfig::from_toml_str("note_extensions = [\"md\"]\n").unwrap_err();
    assert!(matches!(err, NormalizeError::InvalidConfig(_)));
}
