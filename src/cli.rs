use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::internal::config::LoggingConfig;
use crate::internal::logger::{Logger, Severity};

pub fn build_cli() -> Command {
    // Leak the version string to get a 'static lifetime
    let version: &'static str =
        Box::leak(crate::internal::config::get_version_info().into_boxed_str());

    Command::new("sevlog")
        .version(version)
        .about("Emit log lines and run checks through the sevlog facade")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to config file (default: ./sevlog.{yaml,toml,json})"),
        )
        .arg(
            Arg::new("stderrthreshold")
                .long("stderrthreshold")
                .global(true)
                .value_parser(clap::value_parser!(Severity))
                .help("Minimum severity to emit (info|warning|error|fatal or 0-3)"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .global(true)
                .help("Also write log lines to this file"),
        )
        .arg(
            Arg::new("append")
                .long("append")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Append to the log file instead of truncating it"),
        )
        .arg(
            Arg::new("no-console")
                .long("no-console")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Do not write to stderr (requires --log-file)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .global(true)
                .value_parser(["compact", "full", "json"])
                .help("Line format"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Disable ANSI colors on the console"),
        )
        .subcommand(
            Command::new("emit")
                .about("Emit one log line")
                .arg(
                    Arg::new("severity")
                        .required(true)
                        .value_parser(["info", "warning", "error", "fatal", "exit"]),
                )
                .arg(
                    Arg::new("shape")
                        .long("shape")
                        .value_parser(["plain", "ln"])
                        .default_value("ln")
                        .help("plain concatenates values, ln joins them with spaces"),
                )
                .arg(Arg::new("values").num_args(0..).trailing_var_arg(true)),
        )
        .subcommand(
            Command::new("check")
                .about("Run a check helper; a failed check terminates the process")
                .arg(
                    Arg::new("kind")
                        .required(true)
                        .value_parser(["cond", "eq", "ne", "lt", "gt", "le", "ge", "near"]),
                )
                .arg(Arg::new("operands").num_args(1..).required(true))
                .arg(
                    Arg::new("extra")
                        .long("extra")
                        .action(ArgAction::Append)
                        .help("Extra context appended to a failure diagnostic"),
                ),
        )
}

/// Load the logging configuration and apply CLI overrides.
pub fn parse_config(matches: &ArgMatches) -> Result<LoggingConfig, config::ConfigError> {
    let path = matches.get_one::<String>("config").map(|s| s.as_str());
    let mut cfg = LoggingConfig::load(path)?;
    cfg.apply_args(matches);
    cfg.validate()?;
    Ok(cfg)
}

#[derive(Debug, thiserror::Error)]
pub enum OperandError {
    #[error("check {kind} needs {needed} operands, got {got}")]
    Missing {
        kind: String,
        needed: usize,
        got: usize,
    },
    #[error("invalid number {value:?}: {source}")]
    Number {
        value: String,
        source: std::num::ParseFloatError,
    },
    #[error("invalid boolean {value:?}: {source}")]
    Bool {
        value: String,
        source: std::str::ParseBoolError,
    },
}

/// Dispatch a parsed command line to the facade.
pub fn run(logger: &Logger, matches: &ArgMatches) {
    match matches.subcommand() {
        Some(("emit", sub)) => run_emit(logger, sub),
        Some(("check", sub)) => run_check(logger, sub),
        _ => logger.exitln(&[&"no command given"]),
    }
}

fn strings<'a>(matches: &'a ArgMatches, id: &str) -> Vec<&'a str> {
    matches
        .get_many::<String>(id)
        .map(|values| values.map(|s| s.as_str()).collect())
        .unwrap_or_default()
}

fn run_emit(logger: &Logger, matches: &ArgMatches) {
    let values = strings(matches, "values");
    let values: Vec<&dyn std::fmt::Display> =
        values.iter().map(|v| v as &dyn std::fmt::Display).collect();
    let line = matches.get_one::<String>("shape").map(|s| s.as_str()) == Some("ln");

    match (matches.get_one::<String>("severity").map(|s| s.as_str()), line) {
        (Some("warning"), false) => logger.warning(&values),
        (Some("warning"), true) => logger.warningln(&values),
        (Some("error"), false) => logger.error(&values),
        (Some("error"), true) => logger.errorln(&values),
        (Some("fatal"), false) => logger.fatal(&values),
        (Some("fatal"), true) => logger.fatalln(&values),
        (Some("exit"), false) => logger.exit(&values),
        (Some("exit"), true) => logger.exitln(&values),
        (_, false) => logger.info(&values),
        (_, true) => logger.infoln(&values),
    }
}

fn run_check(logger: &Logger, matches: &ArgMatches) {
    let kind = matches
        .get_one::<String>("kind")
        .map(|s| s.as_str())
        .unwrap_or("cond");
    let operands = strings(matches, "operands");
    let extra = strings(matches, "extra");
    let extra: Vec<&dyn std::fmt::Display> =
        extra.iter().map(|v| v as &dyn std::fmt::Display).collect();

    let needed = match kind {
        "cond" => 1,
        "near" => 3,
        _ => 2,
    };
    if operands.len() < needed {
        logger.exitln(&[&OperandError::Missing {
            kind: kind.to_string(),
            needed,
            got: operands.len(),
        }]);
    }

    match kind {
        "cond" => {
            let cond = logger.exit_if(parse_bool(operands[0]));
            logger.check(cond, &extra);
        }
        "eq" | "ne" => check_equality(logger, kind, operands[0], operands[1], &extra),
        "near" => {
            let a = logger.exit_if(parse_number(operands[0]));
            let b = logger.exit_if(parse_number(operands[1]));
            let threshold = logger.exit_if(parse_number(operands[2]));
            logger.check_near(a, b, threshold, &extra);
        }
        ordering => {
            let a = logger.exit_if(parse_number(operands[0]));
            let b = logger.exit_if(parse_number(operands[1]));
            match ordering {
                "lt" => logger.check_lt(a, b, &extra),
                "gt" => logger.check_gt(a, b, &extra),
                "le" => logger.check_le(a, b, &extra),
                _ => logger.check_ge(a, b, &extra),
            }
        }
    }
}

/// Integers compare as integers; anything else compares as text.
fn check_equality(
    logger: &Logger,
    kind: &str,
    a: &str,
    b: &str,
    extra: &[&dyn std::fmt::Display],
) {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(a), Ok(b)) if kind == "eq" => logger.check_eq(a, b, extra),
        (Ok(a), Ok(b)) => logger.check_ne(a, b, extra),
        _ if kind == "eq" => logger.check_eq(a, b, extra),
        _ => logger.check_ne(a, b, extra),
    }
}

fn parse_number(value: &str) -> Result<f64, OperandError> {
    value.parse().map_err(|source| OperandError::Number {
        value: value.to_string(),
        source,
    })
}

fn parse_bool(value: &str) -> Result<bool, OperandError> {
    value.parse().map_err(|source| OperandError::Bool {
        value: value.to_string(),
        source,
    })
}
