use std::path::Path;

use argspec_core::{CommandSpec, OptionSpec};
use argspec_manifest::{ManifestError, ParserManifest};
use argspec_parser::{BufferConsole, ParseOutcome, StreamTarget, StreamTargets, Termination};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sample_manifest() -> ParserManifest {
    ParserManifest {
        program: Some("scaffold".to_string()),
        description: Some("Project scaffolding tool".to_string()),
        footer: Some("Report bugs upstream.".to_string()),
        strict: true,
        help: true,
        commands: vec![
            CommandSpec::new("init").with_help("Initialize a project"),
            CommandSpec::new("export")
                .with_help("Export the index")
                .with_usage("export <target>"),
        ],
        options: vec![
            OptionSpec::flag(Some('v'), Some("verbose")).with_help("Verbose output"),
            OptionSpec::with_value(Some('d'), Some("directory"))
                .in_command("init")
                .with_default("."),
            OptionSpec::with_value(Some('t'), Some("tag")).allow_repeats(),
        ],
        ..Default::default()
    }
}

fn write_file(path: &Path, text: &str) {
    std::fs::write(path, text).unwrap();
}

// ---------------------------------------------------------------------------
// Load and save
// ---------------------------------------------------------------------------

#[test]
fn test_yaml_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scaffold.yml");

    let manifest = sample_manifest();
    manifest.save(&path).unwrap();
    let loaded = ParserManifest::load(&path).unwrap();
    assert_eq!(loaded, manifest);
}

#[test]
fn test_json_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scaffold.json");

    let manifest = sample_manifest();
    manifest.save(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.trim_start().starts_with('{'));
    assert_eq!(ParserManifest::load(&path).unwrap(), manifest);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ParserManifest::load(dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, ManifestError::Io(_)));
}

#[test]
fn test_load_reports_format_errors() {
    let dir = tempfile::tempdir().unwrap();

    let yaml = dir.path().join("bad.yaml");
    write_file(&yaml, "options: 12\n");
    assert!(matches!(
        ParserManifest::load(&yaml),
        Err(ManifestError::Yaml(_))
    ));

    let json = dir.path().join("bad.json");
    write_file(&json, "{ \"strict\": \"yes\" }");
    assert!(matches!(
        ParserManifest::load(&json),
        Err(ManifestError::Json(_))
    ));
}

#[test]
fn test_usage_accepts_single_line_or_list() {
    let manifest = ParserManifest::from_yaml_str(
        r#"
commands:
  - identifier: one
    usage: "one <x>"
  - identifier: two
    usage:
      - "two <a>"
      - "two --all"
"#,
    )
    .unwrap();
    assert_eq!(manifest.commands[0].usage, vec!["one <x>"]);
    assert_eq!(manifest.commands[1].usage, vec!["two <a>", "two --all"]);
}

// ---------------------------------------------------------------------------
// Building parsers
// ---------------------------------------------------------------------------

#[test]
fn test_built_parser_applies_declarations() {
    let mut parser = sample_manifest()
        .build_parser_with(BufferConsole::new())
        .unwrap();

    let result = parser
        .parse(["scaffold", "init", "-v", "-t", "a", "--tag=b"])
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(result.command(), Some("init"));
    assert!(result.flag("verbose"));
    assert_eq!(result.value("directory"), Some("."));
    assert_eq!(result.list("tag").unwrap(), ["a", "b"]);
}

#[test]
fn test_built_parser_is_strict() {
    let mut parser = sample_manifest()
        .build_parser_with(BufferConsole::new())
        .unwrap();

    let outcome = parser.parse(["./scaffold", "--bogus"]).unwrap();
    assert_eq!(outcome, ParseOutcome::Terminate(Termination::UnknownOptions));
    assert_eq!(
        parser.console().error(),
        "scaffold: invalid option -- bogus\nTry 'scaffold --help' for more information.\n"
    );
}

#[test]
fn test_built_parser_renders_help() {
    let mut parser = sample_manifest()
        .build_parser_with(BufferConsole::new())
        .unwrap();

    let outcome = parser.parse(["scaffold", "help", "export"]).unwrap();
    assert_eq!(outcome.termination(), Some(Termination::Help));
    let output = parser.console().output();
    assert!(output.starts_with("Usage: scaffold export <target>\n\nExport the index\n"));
    assert!(output.ends_with("\nReport bugs upstream.\n"));
}

#[test]
fn test_duplicate_option_in_manifest() {
    let manifest = ParserManifest::from_yaml_str(
        r#"
options:
  - name: verbose
    short_name: v
  - name: version
    short_name: v
"#,
    )
    .unwrap();
    let err = manifest.build_parser_with(BufferConsole::new()).unwrap_err();
    assert!(matches!(err, ManifestError::Declaration(_)));
    assert!(err.to_string().contains("duplicate option 'v'"));
}

#[test]
fn test_file_stream_targets() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("help.txt");

    let manifest = ParserManifest {
        program: Some("tool".to_string()),
        help: true,
        streams: StreamTargets {
            output: StreamTarget::File(output.clone()),
            ..Default::default()
        },
        options: vec![OptionSpec::flag(Some('q'), Some("quiet")).with_help("Say less")],
        ..Default::default()
    };

    let mut parser = manifest.build_parser().unwrap();
    let outcome = parser.parse(["tool", "-h"]).unwrap();
    assert_eq!(outcome.termination(), Some(Termination::Help));

    let text = std::fs::read_to_string(output).unwrap();
    assert!(text.starts_with("Usage: tool [options]\n"));
    assert!(text.contains("  -q, --quiet  Say less\n"));
}
