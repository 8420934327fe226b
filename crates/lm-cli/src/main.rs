//! logmask - mask sensitive data in structured log context
//!
//! Reads JSON (or plain text) and writes a sanitized copy to stdout, and
//! exposes the engine's audit checks for configuration work.

use clap::{Args, Parser, Subcommand};
use lm_cli::exit_codes::ExitCode;
use lm_cli::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use lm_sanitize::{SanitizationConfig, SanitizeError, SanitizingService, Value};
use serde_json::{json, Value as JsonValue};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, error};

/// Mask sensitive data in structured log context
#[derive(Parser)]
#[command(name = "logmask")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Sanitizer configuration file (JSON)
    #[arg(long, global = true, env = "LOGMASK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level for stderr diagnostics
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format for stderr diagnostics (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sanitize JSON or text from a file or stdin
    Sanitize(SanitizeArgs),

    /// Report whether a single value is sensitive (exit 1 if it is)
    Check(CheckArgs),

    /// List prepared sensitive key variants
    Keys,

    /// List active sensitive value patterns
    Patterns,

    /// Validate the configuration
    Validate,
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct SanitizeArgs {
    /// Read from this file instead of stdin
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Mask token for this run (defaults to the configured token)
    #[arg(long, short = 't')]
    token: Option<String>,

    /// Treat each input line as a separate document
    #[arg(long)]
    lines: bool,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Value to check
    value: String,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    };

    let log_config = LogConfig::from_env(cli.global.log_level, cli.global.log_format);
    init_logging(&log_config);

    let exit_code = match load_config(&cli.global) {
        Ok(config) => run_command(SanitizingService::new(config), cli.command),
        Err(e) => config_failure(&e),
    };

    if exit_code.is_failure() {
        debug!(exit = %exit_code, "run failed");
    }
    std::process::exit(exit_code.as_i32());
}

fn load_config(global: &GlobalOpts) -> lm_sanitize::Result<SanitizationConfig> {
    match &global.config {
        Some(path) => {
            debug!(path = %path.display(), "loading sanitizer config");
            SanitizationConfig::load(path)
        }
        None => Ok(SanitizationConfig::default()),
    }
}

fn config_failure(err: &SanitizeError) -> ExitCode {
    error!(code = err.code(), kind = err.kind(), "configuration rejected");
    eprintln!("logmask: {err}");
    ExitCode::from(err)
}

/// `validate` reports a rejected configuration itself; every other command
/// needs a working service.
fn run_command(built: lm_sanitize::Result<SanitizingService>, command: Commands) -> ExitCode {
    match command {
        Commands::Validate => run_validate(built),
        Commands::Sanitize(args) => with_service(built, |service| run_sanitize(service, &args)),
        Commands::Check(args) => with_service(built, |service| run_check(service, &args)),
        Commands::Keys => with_service(built, |service| {
            emit(&json!(service.key_detector().prepared_keys()), false)
        }),
        Commands::Patterns => with_service(built, |service| {
            emit(&json!(service.pattern_detector().patterns()), false)
        }),
    }
}

fn with_service(
    built: lm_sanitize::Result<SanitizingService>,
    run: impl FnOnce(&SanitizingService) -> ExitCode,
) -> ExitCode {
    match built {
        Ok(service) => run(&service),
        Err(e) => config_failure(&e),
    }
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_sanitize(service: &SanitizingService, args: &SanitizeArgs) -> ExitCode {
    let input = match read_input(args.input.as_ref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("logmask sanitize: failed to read input: {e}");
            return ExitCode::IoError;
        }
    };
    let token = args.token.as_deref();

    if args.lines {
        let mut stdout = io::stdout().lock();
        for line in input.lines().filter(|line| !line.trim().is_empty()) {
            let sanitized = service.sanitize(&parse_document(line), token);
            if let Err(e) = writeln!(stdout, "{sanitized}") {
                eprintln!("logmask sanitize: failed to write output: {e}");
                return ExitCode::IoError;
            }
        }
        return ExitCode::Clean;
    }

    let document = parse_document(input.trim_end_matches(&['\n', '\r'][..]));
    emit(&service.sanitize(&document, token), args.compact)
}

fn run_check(service: &SanitizingService, args: &CheckArgs) -> ExitCode {
    let sensitive = service.is_sensitive(&Value::from(args.value.as_str()));
    match emit(&json!({ "sensitive": sensitive }), true) {
        ExitCode::Clean if sensitive => ExitCode::SensitiveFound,
        other => other,
    }
}

fn run_validate(built: lm_sanitize::Result<SanitizingService>) -> ExitCode {
    match built {
        Ok(service) => {
            let config = service.config();
            emit(
                &json!({
                    "status": "ok",
                    "schema_version": config.schema_version,
                    "max_depth": config.max_depth,
                    "default_mask_token": service.default_mask_token(),
                    "sensitive_keys": service.key_detector().len(),
                    "sensitive_patterns": service.pattern_detector().patterns().len(),
                    "custom_separators": config.separators.len(),
                }),
                false,
            )
        }
        Err(e) => {
            let report = json!({
                "status": "invalid",
                "error": {
                    "code": e.code(),
                    "kind": e.kind(),
                    "message": e.to_string(),
                }
            });
            match emit(&report, false) {
                ExitCode::Clean => ExitCode::from(&e),
                other => other,
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// JSON when it parses, otherwise the raw text as a single string.
fn parse_document(raw: &str) -> Value {
    match serde_json::from_str::<JsonValue>(raw) {
        Ok(json) => Value::from(json),
        Err(_) => Value::from(raw),
    }
}

fn emit(value: &JsonValue, compact: bool) -> ExitCode {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    let rendered = match rendered {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("logmask: failed to render output: {e}");
            return ExitCode::InternalError;
        }
    };
    match writeln!(io::stdout().lock(), "{rendered}") {
        Ok(()) => ExitCode::Clean,
        Err(e) => {
            eprintln!("logmask: failed to write output: {e}");
            ExitCode::IoError
        }
    }
}
