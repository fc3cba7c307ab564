/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

mod cli;
mod host;

use anyhow::{bail, Context, Result};
use citenote_core::Config;
use citenote_processor::{FsVault, LiteratureNotes, Position};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, OutputFormat};
use host::{FileEditor, SystemOpener};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            return Ok(());
        }
        Command::InitConfig { file, force } => {
            if file.exists() && !force {
                bail!("{} already exists; pass --force to replace it", file.display());
            }
            Config::default()
                .save(file)
                .with_context(|| format!("writing {}", file.display()))?;
            println!("Wrote default configuration to {}", file.display());
            return Ok(());
        }
        #[cfg(feature = "schema")]
        Command::Schema => {
            let schema = schemars::schema_for!(Config);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli)?;
    let vault = Arc::new(FsVault::new(&cli.vault));
    let notes = LiteratureNotes::new(vault, config).context("compiling note templates")?;

    if let Command::Check = cli.command {
        let count = notes
            .reload_from_export()
            .await
            .context("loading citation export")?;
        println!("Templates: ok");
        println!("Library: {} entries", count);
        return Ok(());
    }

    notes.init().await.context("loading citation export")?;

    match cli.command {
        Command::List { format } => list(&notes, format)?,
        Command::Title { citekey } => println!("{}", notes.title_for(&citekey)?),
        Command::Path { citekey } => println!("{}", notes.path_for(&citekey)?),
        Command::Content { citekey } => print!("{}", notes.content_for(&citekey)?),
        Command::Create { citekey } => {
            let handle = notes
                .get_or_create_literature_note_file(&citekey)
                .await
                .with_context(|| format!("creating note for '{}'", citekey))?;
            println!("{}", handle.path().display());
        }
        Command::Open { citekey, new_pane } => {
            let workspace = SystemOpener::new(&cli.vault);
            notes
                .open_literature_note(&citekey, &workspace, new_pane)
                .await
                .with_context(|| format!("opening note for '{}'", citekey))?;
        }
        Command::Link {
            citekey,
            into,
            line,
            ch,
        } => {
            let cursor = line.zip(ch).map(|(line, ch)| Position::new(line, ch));
            let mut editor = FileEditor::open(&into, cursor)
                .await
                .with_context(|| format!("reading {}", into.display()))?;
            let link = notes
                .insert_literature_note_link(&citekey, &mut editor)
                .await
                .with_context(|| format!("linking '{}' into {}", citekey, into.display()))?;
            editor
                .save()
                .await
                .with_context(|| format!("writing {}", into.display()))?;
            println!("{}", link);
        }
        Command::Check
        | Command::Completions { .. }
        | Command::InitConfig { .. } => {}
        #[cfg(feature = "schema")]
        Command::Schema => {}
    }

    Ok(())
}

/// The configuration file, if any, with `--export` applied on top.
///
/// A relative export path from the configuration resolves against the vault;
/// one given on the command line resolves against the working directory.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            Config::load(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(export) = &cli.export {
        let export = std::path::absolute(export)
            .with_context(|| format!("resolving {}", export.display()))?;
        config.citation_export_path = Some(export);
    }
    Ok(config)
}

fn list(notes: &LiteratureNotes<FsVault>, format: OutputFormat) -> Result<()> {
    let library = notes.library();

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = library.iter().map(|e| e.template_context()).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Table => {
            use tabled::{settings::Style, Table, Tabled};

            #[derive(Tabled)]
            struct EntryRow {
                #[tabled(rename = "Citekey")]
                citekey: String,
                #[tabled(rename = "Authors")]
                authors: String,
                #[tabled(rename = "Year")]
                year: String,
                #[tabled(rename = "Title")]
                title: String,
            }

            let rows: Vec<EntryRow> = library
                .iter()
                .map(|entry| EntryRow {
                    citekey: entry.id.clone(),
                    authors: truncate(&entry.author_string, 30),
                    year: entry.year.map(|y| y.to_string()).unwrap_or_default(),
                    title: truncate(entry.title.as_deref().unwrap_or(""), 50),
                })
                .collect();

            let mut table = Table::new(rows);
            table.with(Style::modern());
            println!("{}", table);
        }
    }
    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Über lange Titel", 8), "Über ...");
    }

    #[test]
    fn test_export_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("citenote.toml");
        std::fs::write(&config_path, "citationExportPath = \"old.json\"\n").unwrap();
        let export = dir.path().join("new.json");

        let args: Vec<OsString> = vec![
            "citenote".into(),
            "check".into(),
            "--config".into(),
            config_path.clone().into(),
            "--export".into(),
            export.clone().into(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.citation_export_path, Some(export));
    }
}
