use calver::{CalVerError, Grammar, GrammarError, MatchError};
use clap::{Parser, Subcommand};
use std::cmp::Ordering;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Grammar(#[from] GrammarError),

    #[error("{0}")]
    Match(#[from] MatchError),
}

impl From<CalVerError> for CliError {
    fn from(err: CalVerError) -> Self {
        match err {
            CalVerError::Grammar(err) => CliError::Grammar(err),
            CalVerError::Match(err) => CliError::Match(err),
        }
    }
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Grammar(_) => 2,
            CliError::Match(_) => 1,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(arg_required_else_help(true))]
enum Commands {
    /// Validates that a version matches a format. Prints `true` and exits 0, or prints `false`
    /// and exits 1.
    Valid {
        /// The format string to validate against
        #[arg(short, long)]
        format: String,

        /// The version string to validate
        version: String,
    },

    /// Parses a version and prints it in the canonical form of its format.
    Render {
        /// The format string of the version
        #[arg(short, long)]
        format: String,

        /// The version string to render
        version: String,
    },

    /// Prints the smallest version of a format.
    #[command(name = "default")]
    DefaultVersion {
        /// The format string
        #[arg(short, long)]
        format: String,
    },

    /// Compares two versions of the same format. Prints `<`, `=`, or `>`.
    Compare {
        /// The format string of both versions
        #[arg(short, long)]
        format: String,

        /// The left-hand version
        a: String,

        /// The right-hand version
        b: String,
    },
}

type Output = (String, i32);

fn main() {
    let cli = Cli::parse();

    match do_work(cli) {
        Ok((output, exit_code)) => {
            println!("{output}");
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn do_work(cli: Cli) -> Result<Output, CliError> {
    match cli.command {
        Commands::Valid { format, version } => {
            let grammar = Grammar::compile(&format)?;
            Ok(if grammar.parse_version(&version).is_ok() {
                ("true".to_string(), 0)
            } else {
                ("false".to_string(), 1)
            })
        }
        Commands::Render { format, version } => {
            let version = calver::parse(&format, &version)?;
            Ok((version.render(), 0))
        }
        Commands::DefaultVersion { format } => {
            let version = calver::default_for(&format)?;
            Ok((version.render(), 0))
        }
        Commands::Compare { format, a, b } => {
            let grammar = Grammar::compile(&format)?;
            let a = grammar.parse_version(&a)?;
            let b = grammar.parse_version(&b)?;
            let symbol = match a.cmp(&b) {
                Ordering::Less => "<",
                Ordering::Equal => "=",
                Ordering::Greater => ">",
            };
            Ok((symbol.to_string(), 0))
        }
    }
}
