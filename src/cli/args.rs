#![forbid(unsafe_code)]

//! Command-line arguments for the `cmdtree` binary

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Inspect, document and dry-run command tree manifests
#[derive(Debug, Parser)]
#[command(name = "cmdtree", version, about)]
pub struct Cli {
    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a manifest, validate its tree and command names
    Check {
        /// Path to the TOML manifest
        manifest: PathBuf,
    },

    /// Print the usage block of a command
    Synopsis {
        /// Path to the TOML manifest
        manifest: PathBuf,
        /// Subcommand path, e.g. `pr list`; empty for the root
        path: Vec<String>,
    },

    /// Print the manual-style help page of a command
    Man {
        /// Path to the TOML manifest
        manifest: PathBuf,
        /// Subcommand path, e.g. `pr list`; empty for the root
        path: Vec<String>,
    },

    /// Dry-run dispatch of the tokens after `--`
    Resolve {
        /// Path to the TOML manifest
        manifest: PathBuf,
        /// Invocation tokens, as the program would receive them
        #[arg(last = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl From<ColorChoice> for termcolor::ColorChoice {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => termcolor::ColorChoice::Auto,
            ColorChoice::Always => termcolor::ColorChoice::Always,
            ColorChoice::Never => termcolor::ColorChoice::Never,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}
