use argspec_core::{CommandSpec, DeclarationError, OptionSpec, Value};
use argspec_parser::{
    BufferConsole, Console, Error, HelpSettings, ParseOutcome, Parser, Termination, Verbosity,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn buffered() -> Parser<BufferConsole> {
    Parser::with_console(BufferConsole::new())
}

/// Parser with the option set used throughout the cluster and multi-value
/// tests.
fn flags_parser() -> Parser<BufferConsole> {
    let mut parser = buffered();
    parser
        .add_options([
            OptionSpec::flag(Some('v'), Some("verbose")).with_help("Verbose output"),
            OptionSpec::flag(Some('x'), Some("create-default-index")),
            OptionSpec::with_value(Some('i'), Some("input")).with_value_label("file"),
            OptionSpec::with_value(Some('m'), Some("some-multi-option")).allow_repeats(),
        ])
        .unwrap();
    parser
}

/// Parser with `init`, `generate` and `export` commands.
fn command_parser() -> Parser<BufferConsole> {
    let mut parser = buffered();
    parser
        .add_commands([
            CommandSpec::new("init").with_help("Create a project"),
            CommandSpec::new("generate").with_help("Generate sources"),
            CommandSpec::new("export").with_help("Export the index"),
        ])
        .unwrap();
    parser
        .add_options([
            OptionSpec::flag(Some('v'), Some("verbose")).with_help("Verbose output"),
            OptionSpec::with_value(Some('d'), Some("directory"))
                .in_command("init")
                .with_help("Target directory"),
            OptionSpec::flag(Some('f'), Some("force")).in_command("init"),
        ])
        .unwrap();
    parser
}

fn parsed(parser: &mut Parser<BufferConsole>, tokens: &[&str]) -> argspec_core::ParseResult {
    parser
        .parse(tokens.iter().copied())
        .expect("parse failed")
        .into_result()
        .expect("parse terminated")
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

#[test]
fn test_option_without_any_name_rejected() {
    let mut parser = buffered();
    for spec in [
        OptionSpec::flag(None, None),
        OptionSpec::with_value(None, None).with_help("nameless"),
        OptionSpec::with_value(None, None).with_default("x"),
    ] {
        let err = parser.add_option(spec).unwrap_err();
        assert!(matches!(err, DeclarationError::Descriptor(_)));
    }
}

#[test]
fn test_duplicate_options_rejected_per_scope() {
    let mut parser = command_parser();

    let err = parser
        .add_option(OptionSpec::flag(Some('v'), Some("version")))
        .unwrap_err();
    assert!(matches!(err, DeclarationError::DuplicateOption { ref option, .. } if option == "v"));

    let err = parser
        .add_option(OptionSpec::flag(None, Some("force")).in_command("init"))
        .unwrap_err();
    assert!(matches!(err, DeclarationError::DuplicateOption { ref scope, .. } if scope == "init"));

    // Same names in another scope are fine.
    parser
        .add_option(OptionSpec::flag(Some('f'), Some("force")).in_command("export"))
        .unwrap();
}

#[test]
fn test_required_with_default_rejected() {
    let mut parser = buffered();
    let err = parser
        .add_option(
            OptionSpec::with_value(None, Some("output"))
                .mark_required()
                .with_default("out.txt"),
        )
        .unwrap_err();
    assert!(matches!(err, DeclarationError::Descriptor(_)));
}

#[test]
fn test_option_for_undeclared_command_rejected() {
    let mut parser = buffered();
    let err = parser
        .add_option(OptionSpec::flag(Some('f'), None).in_command("deploy"))
        .unwrap_err();
    assert_eq!(err, DeclarationError::UnknownCommand("deploy".to_string()));
}

#[test]
fn test_duplicate_command_rejected() {
    let mut parser = command_parser();
    let err = parser.add_command(CommandSpec::new("init")).unwrap_err();
    assert_eq!(err, DeclarationError::DuplicateCommand("init".to_string()));
}

// ---------------------------------------------------------------------------
// Long options
// ---------------------------------------------------------------------------

#[test]
fn test_long_option_with_value() {
    let mut parser = buffered();
    parser
        .add_option(OptionSpec::with_value(None, Some("input")))
        .unwrap();

    let result = parsed(&mut parser, &["app", "--input=val"]);
    assert_eq!(result.value("input"), Some("val"));
    assert_eq!(result.len(), 1);
    assert!(result.stand_alones().is_empty());
    assert!(result.unknowns().is_empty());
}

#[test]
fn test_long_option_takes_next_bare_token() {
    let mut parser = flags_parser();
    let result = parsed(&mut parser, &["app", "--input", "a.txt", "b.txt"]);

    assert_eq!(result.value("input"), Some("a.txt"));
    assert_eq!(result.stand_alones(), ["b.txt"]);
}

#[test]
fn test_long_option_missing_value() {
    let mut parser = flags_parser();
    let err = parser.parse(["app", "--input", "--verbose"]).unwrap_err();
    assert!(matches!(err, Error::MissingValue(ref name) if name == "--input"));

    let err = parser.parse(["app", "--input"]).unwrap_err();
    assert_eq!(err.to_string(), "option '--input' requires a value");
}

#[test]
fn test_missing_value_falls_back_to_default() {
    let mut parser = buffered();
    parser
        .add_option(OptionSpec::with_value(Some('l'), Some("level")).with_default("info"))
        .unwrap();

    let result = parsed(&mut parser, &["app", "--level"]);
    assert_eq!(result.value("level"), Some("info"));
}

#[test]
fn test_unknown_long_options_pass_through() {
    let mut parser = flags_parser();
    let result = parsed(&mut parser, &["app", "--color=auto", "--dry-run", "file"]);

    assert_eq!(result.value("color"), Some("auto"));
    assert!(result.flag("dry-run"));
    assert_eq!(result.unknowns(), ["color", "dry-run"]);
    assert_eq!(result.stand_alones(), ["file"]);
}

#[test]
fn test_unknown_reserved_keys_do_not_leak_into_result() {
    let mut parser = command_parser();

    let result = parsed(&mut parser, &["app", "--command=init"]);
    assert_eq!(result.command(), None);
    assert_eq!(result.unknowns(), ["command"]);
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({ "unknowns": ["command"] })
    );

    let result = parsed(
        &mut parser,
        &["app", "init", "--unknowns=x", "--command=evil", "--stand_alones"],
    );
    assert_eq!(result.command(), Some("init"));
    assert!(result.is_empty());
    assert_eq!(
        serde_json::to_string(&result).unwrap(),
        r#"{"command":"init","unknowns":["unknowns","command","stand_alones"]}"#
    );
}

// ---------------------------------------------------------------------------
// Short clusters
// ---------------------------------------------------------------------------

#[test]
fn test_short_cluster_decomposition() {
    let mut parser = flags_parser();
    let result = parsed(&mut parser, &["app", "-vxs", "stand_alone"]);

    assert!(result.flag("verbose"));
    assert!(result.flag("create-default-index"));
    assert!(result.flag("s"));
    assert_eq!(result.unknowns(), ["s"]);
    assert_eq!(result.stand_alones(), ["stand_alone"]);

    let keys: Vec<&str> = result.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["verbose", "create-default-index", "s"]);
}

#[test]
fn test_short_value_attached_and_separate() {
    let mut parser = flags_parser();

    let result = parsed(&mut parser, &["app", "-i/path"]);
    assert_eq!(result.value("input"), Some("/path"));

    let result = parsed(&mut parser, &["app", "-vi", "/other"]);
    assert!(result.flag("verbose"));
    assert_eq!(result.value("input"), Some("/other"));
}

#[test]
fn test_short_value_missing_at_cluster_end() {
    let mut parser = flags_parser();

    let err = parser.parse(["app", "-vi"]).unwrap_err();
    assert!(matches!(err, Error::MissingValue(ref name) if name == "--input"));

    let err = parser.parse(["app", "-i", "-v"]).unwrap_err();
    assert_eq!(err.to_string(), "option '--input' requires a value");
}

#[test]
fn test_short_value_falls_back_to_default() {
    let mut parser = buffered();
    parser
        .add_options([
            OptionSpec::flag(Some('q'), Some("quiet")),
            OptionSpec::with_value(Some('l'), Some("level")).with_default("info"),
        ])
        .unwrap();

    let result = parsed(&mut parser, &["app", "-l"]);
    assert_eq!(result.value("level"), Some("info"));

    let result = parsed(&mut parser, &["app", "-ql", "-q"]);
    assert!(result.flag("quiet"));
    assert_eq!(result.value("level"), Some("info"));
}

#[test]
fn test_multi_valued_accumulation() {
    let mut parser = flags_parser();
    let result = parsed(
        &mut parser,
        &[
            "app",
            "--some-multi-option=one",
            "--some-multi-option=two",
            "-mthree",
        ],
    );

    assert_eq!(
        result.get("some-multi-option"),
        Some(&Value::Multi(vec![
            "one".to_string(),
            "two".to_string(),
            "three".to_string()
        ]))
    );
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[test]
fn test_command_scoped_option() {
    let mut parser = command_parser();
    let result = parsed(&mut parser, &["app", "init", "--directory=./"]);

    assert_eq!(result.command(), Some("init"));
    assert_eq!(result.value("directory"), Some("./"));
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({ "command": "init", "directory": "./" })
    );
}

#[test]
fn test_command_option_unknown_outside_its_scope() {
    let mut parser = command_parser();
    let result = parsed(&mut parser, &["app", "export", "--directory=./"]);

    assert_eq!(result.command(), Some("export"));
    assert_eq!(result.unknowns(), ["directory"]);
}

#[test]
fn test_global_flags_recognized_inside_command() {
    let mut parser = command_parser();

    let result = parsed(&mut parser, &["app", "init", "--verbose", "-d", "src"]);
    assert!(result.flag("verbose"));
    assert_eq!(result.value("directory"), Some("src"));
    assert!(result.unknowns().is_empty());

    let result = parsed(&mut parser, &["app", "init", "-fvq"]);
    assert!(result.flag("force"));
    assert!(result.flag("verbose"));
    assert!(result.flag("q"));
    assert_eq!(result.unknowns(), ["q"]);
}

#[test]
fn test_unknown_reported_once_under_command() {
    let mut parser = command_parser();
    let result = parsed(&mut parser, &["app", "generate", "--nope", "-z"]);

    assert_eq!(result.unknowns(), ["nope", "z"]);
}

#[test]
fn test_default_scope_omits_command_key() {
    let mut parser = command_parser();
    let result = parsed(&mut parser, &["app", "-v"]);

    assert_eq!(result.command(), None);
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({ "verbose": true })
    );
}

// ---------------------------------------------------------------------------
// Defaults and required options
// ---------------------------------------------------------------------------

#[test]
fn test_defaults_fill_absent_options() {
    let mut parser = buffered();
    parser
        .add_options([
            OptionSpec::with_value(None, Some("format")).with_default("text"),
            OptionSpec::with_value(None, Some("tag"))
                .allow_repeats()
                .with_default("latest"),
        ])
        .unwrap();

    let result = parsed(&mut parser, &["app"]);
    assert_eq!(result.value("format"), Some("text"));
    assert_eq!(result.list("tag").unwrap(), ["latest"]);

    let result = parsed(&mut parser, &["app", "--format=json"]);
    assert_eq!(result.value("format"), Some("json"));
}

#[test]
fn test_missing_required_options_listed_together() {
    let mut parser = buffered();
    parser
        .add_options([
            OptionSpec::with_value(None, Some("input")).mark_required(),
            OptionSpec::with_value(Some('o'), None).mark_required(),
            OptionSpec::flag(Some('v'), Some("verbose")),
        ])
        .unwrap();

    let err = parser.parse(["app", "-v"]).unwrap_err();
    match err {
        Error::MissingRequiredOptions(names) => assert_eq!(names, vec!["input", "o"]),
        other => panic!("unexpected error: {other}"),
    }

    let err = parser.parse(["app"]).unwrap_err();
    assert_eq!(err.to_string(), "missing required options: input, o");

    let result = parsed(&mut parser, &["app", "--input=a", "-o", "b"]);
    assert_eq!(result.value("o"), Some("b"));
}

#[test]
fn test_required_command_option_only_checked_in_its_scope() {
    let mut parser = command_parser();
    parser
        .add_option(
            OptionSpec::with_value(None, Some("target"))
                .in_command("export")
                .mark_required(),
        )
        .unwrap();

    assert!(parser.parse(["app", "init"]).is_ok());
    assert!(matches!(
        parser.parse(["app", "export"]),
        Err(Error::MissingRequiredOptions(_))
    ));
}

// ---------------------------------------------------------------------------
// Strict mode
// ---------------------------------------------------------------------------

#[test]
fn test_strict_mode_reports_unknown_and_terminates() {
    let mut parser = flags_parser();
    parser.set_strict(true);
    parser.enable_help(HelpSettings::new()).unwrap();

    let outcome = parser.parse(["app", "--bogus"]).unwrap();
    assert_eq!(outcome, ParseOutcome::Terminate(Termination::UnknownOptions));
    assert!(outcome.result().is_none());
    assert_eq!(
        parser.console().error(),
        "app: invalid option -- bogus\nTry 'app --help' for more information.\n"
    );
    assert_eq!(parser.console().output(), "");
    assert_eq!(Termination::UnknownOptions.exit_code(), 1);
}

#[test]
fn test_strict_mode_without_help_has_no_hint() {
    let mut parser = flags_parser();
    parser.set_strict(true);

    let outcome = parser.parse(["app", "-vq", "--bogus"]).unwrap();
    assert_eq!(outcome.termination(), Some(Termination::UnknownOptions));
    assert_eq!(
        parser.console().error(),
        "app: invalid option -- q\napp: invalid option -- bogus\n"
    );
}

#[test]
fn test_strict_mode_accepts_known_options() {
    let mut parser = command_parser();
    parser.set_strict(true);

    let result = parsed(&mut parser, &["app", "init", "-fv", "--directory", "x"]);
    assert!(result.flag("force"));
    assert_eq!(parser.console().error(), "");
}

#[test]
fn test_quiet_console_still_shows_diagnostics() {
    let mut parser = flags_parser();
    parser.set_strict(true);
    parser.console_mut().verbosity().push(Verbosity::Quiet);

    parser.parse(["app", "--bogus"]).unwrap();
    assert_eq!(parser.console().error(), "app: invalid option -- bogus\n");
}

// ---------------------------------------------------------------------------
// Help
// ---------------------------------------------------------------------------

#[test]
fn test_help_flag_renders_global_help() {
    let mut parser = command_parser();
    parser
        .enable_help(
            HelpSettings::new()
                .with_description("Project tool")
                .with_footer("See the manual."),
        )
        .unwrap();

    let outcome = parser.parse(["app", "--help"]).unwrap();
    assert_eq!(outcome, ParseOutcome::Terminate(Termination::Help));
    assert_eq!(Termination::Help.exit_code(), 0);

    let output = parser.console().output();
    assert!(output.starts_with("Usage: app <command> [options]\n       app help <command>\n"));
    assert!(output.contains("\nProject tool\n"));
    assert!(output.contains("  init      Create a project\n"));
    assert!(output.contains("  help      Display help for a command\n"));
    assert!(output.contains("  -h, --help     Display this help text\n"));
    assert!(output.ends_with("\nSee the manual.\n"));
}

#[test]
fn test_help_flag_inside_command_renders_command_help() {
    let mut parser = command_parser();
    parser.enable_help(HelpSettings::new()).unwrap();

    let outcome = parser.parse(["app", "init", "-h"]).unwrap();
    assert_eq!(outcome.termination(), Some(Termination::Help));

    let output = parser.console().output();
    assert!(output.starts_with("Usage: app init [options]\n\nCreate a project\n"));
    assert!(output.contains("Options:\n  -d, --directory=<value>  Target directory\n"));
    assert!(output.contains("Global options:\n"));
}

#[test]
fn test_help_command_targets_named_command() {
    let mut parser = command_parser();
    parser
        .enable_help(HelpSettings::new().with_program_name("tool"))
        .unwrap();

    let outcome = parser.parse(["./bin/tool", "help", "export"]).unwrap();
    assert_eq!(outcome.termination(), Some(Termination::Help));
    assert!(
        parser
            .console()
            .output()
            .starts_with("Usage: tool export [options]\n\nExport the index\n")
    );

    parser.console_mut().clear();
    parser.parse(["./bin/tool", "help", "missing"]).unwrap();
    assert!(
        parser
            .console()
            .output()
            .starts_with("Usage: tool <command> [options]")
    );
}

#[test]
fn test_strict_unknowns_win_over_help() {
    let mut parser = flags_parser();
    parser.set_strict(true);
    parser.enable_help(HelpSettings::new()).unwrap();

    let outcome = parser.parse(["app", "--help", "--bogus"]).unwrap();
    assert_eq!(outcome.termination(), Some(Termination::UnknownOptions));
    assert_eq!(parser.console().output(), "");
}

#[test]
fn test_help_skips_required_check() {
    let mut parser = buffered();
    parser
        .add_option(OptionSpec::with_value(None, Some("input")).mark_required())
        .unwrap();
    parser.enable_help(HelpSettings::new()).unwrap();

    let outcome = parser.parse(["app", "--help"]).unwrap();
    assert_eq!(outcome.termination(), Some(Termination::Help));
    assert!(parser.console().output().contains("(required)"));
}

// ---------------------------------------------------------------------------
// Repeated parses
// ---------------------------------------------------------------------------

#[test]
fn test_parse_is_idempotent() {
    let mut parser = command_parser();
    let tokens = ["app", "init", "-fv", "--directory=./", "extra", "--unknown"];

    let first = parser.parse(tokens).unwrap();
    let second = parser.parse(tokens).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_reset_between_sessions() {
    let mut parser = command_parser();
    parser.reset();

    let result = parsed(&mut parser, &["app", "init", "--directory=./"]);
    assert_eq!(result.command(), None);
    assert_eq!(result.stand_alones(), ["init"]);
    assert_eq!(result.unknowns(), ["directory"]);
}
