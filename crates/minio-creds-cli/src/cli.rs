//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// minio-creds - check MinIO credential configuration offline
#[derive(Parser, Debug)]
#[command(name = "minio-creds")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate sample usernames from a template
    Username(UsernameArgs),

    /// Validate a root configuration file
    Validate(ValidateArgs),

    /// Parse role creation statements
    Statement(StatementArgs),
}

#[derive(Args, Debug)]
pub struct UsernameArgs {
    /// Username template (defaults to the built-in template)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Display name of the requesting token
    #[arg(long, default_value = "")]
    pub display_name: String,

    /// Role name the credential is issued for
    #[arg(long, default_value = "")]
    pub role_name: String,

    /// Number of usernames to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration file (.json, .yaml or .yml)
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatementArgs {
    /// Creation statements, one JSON object each
    pub statements: Vec<String>,
}
