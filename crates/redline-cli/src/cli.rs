use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "redline",
    about = "Verify that document edits are expressed as tracked changes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run every integrity check on an edited document
    Validate(ValidateArgs),
    /// Print the paragraph text of a document
    Project(ProjectArgs),
    /// Undo one author's tracked changes and write the result
    Revert(RevertArgs),
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Edited document: unpacked directory, XML part, or .docx
    pub edited: PathBuf,
    /// Original document to compare against
    #[arg(long)]
    pub original: PathBuf,
    /// Author whose tracked changes are reverted
    #[arg(short, long)]
    pub author: Option<String>,
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ProjectArgs {
    pub input: PathBuf,
    /// Revert this author's changes before projecting
    #[arg(short, long)]
    pub author: Option<String>,
}

#[derive(Args)]
pub struct RevertArgs {
    pub input: PathBuf,
    #[arg(short, long)]
    pub author: String,
    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
