//! CLI definitions for kelp.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kelp",
    version,
    about = "Parse kelp sources and inspect their syntax trees",
    after_help = "Examples:\n  kelp tree src/Main.kt\n  kelp tree build.kts --script\n  kelp check src/*.kt\n  kelp tokens src/Main.kt"
)]
pub struct Cli {
    /// Show parser debug output.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    /// Configuration file (defaults to kelp.toml in the current directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the syntax tree of a file.
    Tree {
        /// Source file.
        file: PathBuf,
        /// Parse as a script (top-level statements allowed).
        #[arg(long)]
        script: bool,
    },
    /// Report syntax errors; exits with status 1 if any file has errors.
    Check {
        /// Source files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Parse every file as a script.
        #[arg(long)]
        script: bool,
    },
    /// Print the token stream of a file with its trivia flags.
    Tokens {
        /// Source file.
        file: PathBuf,
    },
}
