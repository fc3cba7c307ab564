/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "citenote")]
#[command(about = "Create and link literature notes from a CSL-JSON export")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (.json, .toml, .yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Root directory of the notes vault
    #[arg(long, global = true, default_value = ".")]
    pub vault: PathBuf,

    /// CSL-JSON export, overriding citationExportPath
    #[arg(long, global = true)]
    pub export: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(about = "List library entries")]
    List {
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    #[command(about = "Print the note title for a citation key")]
    Title { citekey: String },

    #[command(about = "Print the vault-relative note path for a citation key")]
    Path { citekey: String },

    #[command(about = "Print the initial note content for a citation key")]
    Content { citekey: String },

    #[command(about = "Create the literature note if it does not exist")]
    Create { citekey: String },

    #[command(about = "Create if needed, then open the literature note")]
    Open {
        citekey: String,

        #[arg(long)]
        new_pane: bool,
    },

    #[command(about = "Create if needed, then insert a link to the note into a file")]
    Link {
        citekey: String,

        /// Markdown file to insert the link into
        #[arg(long)]
        into: PathBuf,

        /// Zero-based line; defaults to appending at the end
        #[arg(long, requires = "ch")]
        line: Option<usize>,

        /// Zero-based character offset within the line
        #[arg(long, requires = "line")]
        ch: Option<usize>,
    },

    #[command(about = "Compile the templates and load the export")]
    Check,

    #[command(about = "Write a configuration file with default values")]
    InitConfig {
        file: PathBuf,

        #[arg(long)]
        force: bool,
    },

    #[command(about = "Generate shell completion scripts")]
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    #[cfg(feature = "schema")]
    #[command(about = "Print the JSON schema of the configuration file")]
    Schema,
}

#[derive(Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
