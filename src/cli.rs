//! Command-line front end shared by the `mxm` and `mxm_bloc` binaries.
//!
//! ```text
//! mxm      [FLAGS] [n] [reps]
//! mxm_bloc [FLAGS] [n] [reps] [blockSize ...]
//! ```
//!
//! Flags may appear anywhere. A token starting with `-` that parses as an
//! integer is a value, so `mxm_bloc 256 2 -8 16` skips `-8` and runs 16.

use std::io::{self, Write};
use std::process::ExitCode;

use tracing::warn;

use crate::error::{invalid_argument, BenchError, Result};
use crate::harness::{self, ElapsedPolicy, Mode, RunConfig};
use crate::logging::{init_logging, LogConfig};
use crate::DEFAULT_BLOCK_SIZES;

/// Everything a binary needs to start a run.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub config: RunConfig,
    pub log: LogConfig,
    /// Block-size tokens dropped because they were not positive integers.
    pub skipped_blocks: Vec<String>,
}

/// Outcome of parsing the argument list.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(CliArgs),
    Help,
}

pub fn usage(mode: Mode) -> String {
    let (synopsis, defaults) = match mode {
        Mode::LoopOrder => (
            "mxm [FLAGS] [n] [reps]",
            "Compares the ijk and ikj loop orders on n x n f64 matrices.\n\
             Defaults: n = 1024, reps = 3.",
        ),
        Mode::Tiled => (
            "mxm_bloc [FLAGS] [n] [reps] [blockSize ...]",
            "Runs the tiled kernel once per block size on n x n f64 matrices.\n\
             Defaults: n = 512, reps = 2, block sizes 4 8 16 24 32 48 64 96 128.\n\
             Non-positive block sizes are skipped.",
        ),
    };
    format!(
        "usage: {synopsis}\n\n{defaults}\n\n\
         FLAGS:\n\
         \x20 -v, --verbose          more diagnostics on stderr (repeatable)\n\
         \x20 -q, --quiet            errors only on stderr\n\
         \x20     --no-color         no ANSI colours in diagnostics\n\
         \x20     --skip-unmeasurable drop rows whose elapsed time is below 1 ns\n\
         \x20 -h, --help             print this message\n"
    )
}

/// Parses the arguments that follow the program name.
pub fn parse_args<I, S>(mode: Mode, args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut verbosity: u8 = 0;
    let mut quiet = false;
    let mut ansi = true;
    let mut policy = ElapsedPolicy::Clamp;
    let mut positional: Vec<String> = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        match arg {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--verbose" => verbosity = verbosity.saturating_add(1),
            "-q" | "--quiet" => quiet = true,
            "--no-color" => ansi = false,
            "--skip-unmeasurable" => policy = ElapsedPolicy::Skip,
            _ if is_repeated_v(arg) => {
                verbosity = verbosity.saturating_add((arg.len() - 1) as u8)
            }
            _ if arg.starts_with('-') && arg.parse::<i64>().is_err() => {
                return Err(invalid_argument(format!("unknown flag '{arg}'")));
            }
            _ => positional.push(arg.to_string()),
        }
    }

    let mut values = positional.into_iter();
    let n = match values.next() {
        Some(token) => parse_positive("n", &token)?,
        None => mode.default_n(),
    };
    let reps = match values.next() {
        Some(token) => parse_positive("reps", &token)?,
        None => mode.default_reps(),
    };

    let mut skipped_blocks = Vec::new();
    let config = match mode {
        Mode::LoopOrder => {
            if let Some(extra) = values.next() {
                return Err(invalid_argument(format!("unexpected argument '{extra}'")));
            }
            RunConfig::loop_order(n, reps)?
        }
        Mode::Tiled => {
            let tokens: Vec<String> = values.collect();
            if tokens.is_empty() {
                RunConfig::tiled(n, reps, DEFAULT_BLOCK_SIZES)?
            } else {
                let mut blocks = Vec::with_capacity(tokens.len());
                for token in tokens {
                    match token.parse::<i64>() {
                        Ok(bs) if bs > 0 => blocks.push(bs as usize),
                        _ => skipped_blocks.push(token),
                    }
                }
                RunConfig::tiled(n, reps, blocks)?
            }
        }
    };

    let mut log = LogConfig::from_verbosity(verbosity, quiet);
    log.ansi = ansi;

    Ok(Command::Run(CliArgs {
        config: config.with_elapsed_policy(policy),
        log,
        skipped_blocks,
    }))
}

fn is_repeated_v(arg: &str) -> bool {
    arg.len() > 2 && arg.starts_with('-') && arg[1..].bytes().all(|b| b == b'v')
}

fn parse_positive(name: &str, token: &str) -> Result<usize> {
    match token.parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(invalid_argument(format!(
            "{name} must be a positive integer, got '{token}'"
        ))),
    }
}

/// Exit status for a fatal error: 2 for bad usage, 1 for everything else.
pub fn exit_code(error: &BenchError) -> u8 {
    match error {
        BenchError::InvalidArgument { .. } => 2,
        _ => 1,
    }
}

/// Entry point of both binaries.
pub fn main_with(mode: Mode, program: &str, args: impl IntoIterator<Item = String>) -> ExitCode {
    let cli = match parse_args(mode, args) {
        Ok(Command::Run(cli)) => cli,
        Ok(Command::Help) => {
            print!("{}", usage(mode));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{program}: {e}\n\n{}", usage(mode));
            return ExitCode::from(exit_code(&e));
        }
    };

    if let Err(e) = init_logging(&cli.log) {
        eprintln!("{program}: cannot install logger: {e}");
    }
    for token in &cli.skipped_blocks {
        warn!(block = %token, "skipping non-positive block size");
    }

    let stdout = io::stdout();
    match harness::run(&cli.config, stdout.lock()) {
        Ok(_) => match io::stdout().flush() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{program}: {}", BenchError::from(e));
                ExitCode::from(1)
            }
        },
        Err(e) => {
            eprintln!("{program}: {e}");
            ExitCode::from(exit_code(&e))
        }
    }
}
