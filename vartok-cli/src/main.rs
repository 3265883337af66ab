//! Command-line interface for vartok
//! This binary turns `[name]` markers in plain text or saved editor states into variable
//! nodes and prints the resulting document.
//!
//! Usage:
//!   vartok tokenize `<path|->` [--format `<format>`] [--config `<file>`]   - Tokenize a text file
//!   vartok normalize `<state.json>` [--format `<format>`] [--config `<file>`] - Re-run the rule over a saved state
//!   vartok formats                                                    - List output formats
//!
//! Logging goes to stderr. It is controlled by `VARTOK_LOG` (an env-filter directive,
//! `warn` when unset) or raised to `debug` with `--verbose`.

mod commands;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

use commands::{CliError, RunOptions};

fn path_arg(help: &'static str) -> Arg {
    Arg::new("path").help(help).required(true).index(1)
}

fn output_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (default: from configuration, treeviz unless changed)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults"),
        )
}

fn cli() -> Command {
    Command::new("vartok")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turns [name] markers into atomic variable nodes")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(output_args(
            Command::new("tokenize")
                .about("Tokenize a text file; blank lines separate paragraphs")
                .arg(path_arg("Path to the text file, or - for stdin")),
        ))
        .subcommand(output_args(
            Command::new("normalize")
                .about("Import a serialized editor state and run the rule over it")
                .arg(path_arg("Path to the editor state JSON, or - for stdin")),
        ))
        .subcommand(Command::new("formats").about("List available output formats"))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("VARTOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_options(matches: &ArgMatches) -> RunOptions {
    RunOptions {
        path: matches
            .get_one::<String>("path")
            .cloned()
            .unwrap_or_else(|| "-".to_string()),
        format: matches.get_one::<String>("format").cloned(),
        config: matches.get_one::<String>("config").cloned(),
    }
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    let result: Result<String, CliError> = match matches.subcommand() {
        Some(("tokenize", sub)) => commands::tokenize(&run_options(sub)),
        Some(("normalize", sub)) => commands::normalize(&run_options(sub)),
        Some(("formats", _)) => Ok(commands::formats()),
        _ => unreachable!("a subcommand is required"),
    };

    match result {
        Ok(output) if output.ends_with('\n') => print!("{}", output),
        Ok(output) => println!("{}", output),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        cli().debug_assert();
    }

    #[test]
    fn tokenize_args_parse() {
        let matches = cli()
            .try_get_matches_from(["vartok", "-v", "tokenize", "in.txt", "--format", "json"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "tokenize");
        let options = run_options(sub);
        assert_eq!(options.path, "in.txt");
        assert_eq!(options.format.as_deref(), Some("json"));
        assert_eq!(options.config, None);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(cli().try_get_matches_from(["vartok", "-v"]).is_err());
    }
}
