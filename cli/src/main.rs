use std::path::{Path, PathBuf};

use argspec_core::ParseResult;
use argspec_manifest::ParserManifest;
use argspec_parser::{BufferConsole, Console, ParseOutcome, Prompt, StdConsole, Verbosity};
use clap::{Args, Parser, Subcommand};

const FALLBACK_PROGRAM: &str = "program";

/// Output encoding of a parse result.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argspec")]
#[command(about = "Parse command lines against declarative option manifests")]
#[command(version, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse arguments against a manifest and print the result map.
    Parse(ParseArgs),
    /// Print the help page a manifest describes.
    Help(HelpArgs),
    /// Validate one or more manifest files.
    Validate(ValidateArgs),
    /// Ask a question on the terminal and print the accepted answer.
    Prompt(PromptArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Manifest file (YAML, or JSON with a .json extension).
    #[arg(long)]
    manifest: PathBuf,
    /// Output format for the result map.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Suppress help text; diagnostics are still printed.
    #[arg(long)]
    quiet: bool,
    /// Arguments to parse, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Manifest file (YAML, or JSON with a .json extension).
    #[arg(long)]
    manifest: PathBuf,
    /// Command whose page to print (default: the global page).
    command: Option<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Manifest files to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct PromptArgs {
    /// Question text.
    #[arg(long)]
    question: String,
    /// Allowed answer; repeat for each one (default: any non-empty answer).
    #[arg(long = "answer")]
    answers: Vec<String>,
    /// Answer used for an empty line.
    #[arg(long)]
    default: Option<String>,
    /// Number of answers read before giving up.
    #[arg(long, default_value_t = 3)]
    attempts: usize,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args),
        Command::Validate(args) => run_validate(args),
        Command::Prompt(args) => run_prompt(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let manifest = load_manifest(&args.manifest)?;
    let mut parser = manifest.build_parser().map_err(|e| e.to_string())?;
    if args.quiet {
        parser.console_mut().verbosity().push(Verbosity::Quiet);
    }

    let program = program_name(&manifest, &args.manifest);
    let tokens = std::iter::once(program).chain(args.args);
    let outcome = parser.parse(tokens).map_err(|e| e.to_string())?;

    match outcome {
        ParseOutcome::Parsed(result) => {
            print!("{}", render_result(&result, args.format)?);
            Ok(())
        }
        ParseOutcome::Terminate(reason) => std::process::exit(reason.exit_code()),
    }
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let manifest = load_manifest(&args.manifest)?;
    let parser = manifest
        .build_parser_with(BufferConsole::new())
        .map_err(|e| e.to_string())?;

    if let Some(command) = args.command.as_deref() {
        if !parser.declarations().commands().contains(command) {
            return Err(format!(
                "'{}' does not declare a command named '{command}'",
                args.manifest.display()
            ));
        }
    }

    let program = program_name(&manifest, &args.manifest);
    print!("{}", parser.render_help(&program, args.command.as_deref()));
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut options = 0;
    let mut commands = 0;
    for path in &args.inputs {
        let manifest = load_manifest(path)?;
        manifest
            .build_parser_with(BufferConsole::new())
            .map_err(|e| format!("{}: {e}", path.display()))?;
        options += manifest.options.len();
        commands += manifest.commands.len();
    }

    println!(
        "Validated {} manifest(s) declaring {commands} command(s) and {options} option(s).",
        args.inputs.len()
    );
    Ok(())
}

fn run_prompt(args: PromptArgs) -> Result<(), String> {
    let mut prompt = Prompt::new(&args.question)
        .with_answers(args.answers)
        .with_max_attempts(args.attempts);
    if let Some(default) = args.default.as_deref() {
        prompt = prompt.with_default(default);
    }

    let mut console = StdConsole::new();
    let answer = prompt.ask(&mut console).map_err(|e| e.to_string())?;
    println!("{answer}");
    Ok(())
}

fn load_manifest(path: &Path) -> Result<ParserManifest, String> {
    ParserManifest::load(path).map_err(|e| format!("Failed to load '{}': {e}", path.display()))
}

/// Program name from the manifest, else the manifest's file stem.
fn program_name(manifest: &ParserManifest, path: &Path) -> String {
    manifest
        .program
        .clone()
        .or_else(|| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(String::from)
        })
        .unwrap_or_else(|| FALLBACK_PROGRAM.to_string())
}

fn render_result(result: &ParseResult, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(result)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| format!("Failed to serialize result: {e}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(result)
            .map_err(|e| format!("Failed to serialize result: {e}")),
    }
}
