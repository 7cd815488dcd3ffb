//! Command-line surface.
//!
//! `run` drives the full pipeline for a new video; `history` inspects and
//! manages archived runs; `theme` reads or sets the persisted preference.

use crate::config::{self, GenerationConfig};
use crate::export::{self, ExportFormat};
use crate::generate::GeminiClient;
use crate::pipeline::{PipelineError, PipelineOrchestrator, SessionInputs, TracingObserver};
use crate::stage::STAGE_COUNT;
use crate::storage::{FileStore, HistoryArchive, KeyValueStore, RecordId, Theme};
use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "vidforge")]
#[command(about = "Seven-stage AI content pipeline for faceless video production", long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full seven-stage pipeline for a new video
    Run {
        /// Video title
        #[arg(long)]
        title: String,

        /// Script brief fed into the first stage
        #[arg(long)]
        brief: String,

        /// Export the finished run in the given format
        #[arg(long, value_enum)]
        export: Option<ExportArg>,

        /// Directory for exported documents (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Inspect and manage archived runs
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Show or set the persisted theme preference
    Theme {
        /// New theme token; prints the current one when omitted
        #[arg(value_enum)]
        theme: Option<ThemeArg>,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List archived runs, newest first
    List,
    /// Print one archived run's outputs
    Show { id: String },
    /// Delete an archived run
    Delete { id: String },
    /// Export an archived run
    Export {
        id: String,

        #[arg(long, value_enum, default_value_t = ExportArg::Txt)]
        format: ExportArg,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportArg {
    Txt,
    Md,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Txt => ExportFormat::PlainText,
            ExportArg::Md => ExportFormat::Markdown,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            title,
            brief,
            export,
            out,
        } => run_pipeline(title, brief, export, out).await,
        Commands::History { command } => run_history(command).await,
        Commands::Theme { theme } => run_theme(theme).await,
    }
}

fn open_store() -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::new(config::data_dir()))
}

async fn run_pipeline(
    title: String,
    brief: String,
    export: Option<ExportArg>,
    out: Option<PathBuf>,
) -> Result<()> {
    let store = open_store();
    let archive = Arc::new(HistoryArchive::load(store).await);
    let client = Arc::new(GeminiClient::new(GenerationConfig::default())?);
    let orchestrator = PipelineOrchestrator::new(client, archive)
        .with_observer(Arc::new(TracingObserver));

    println!("Starting the {STAGE_COUNT}-stage pipeline for \"{title}\"");
    let inputs = SessionInputs::new(title.clone(), brief);
    match orchestrator.start(inputs).await {
        Ok(results) => {
            println!("Run completed; all {STAGE_COUNT} stages archived.");
            if let Some(format) = export {
                let dir = match out {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                let path = export::write_export(&dir, &title, &results, format.into()).await?;
                println!("Exported to {}", path.display());
            }
            Ok(())
        }
        Err(PipelineError::Stage { stage, source }) => Err(anyhow!(
            "{} (stage {}/{STAGE_COUNT}: {source})",
            source.user_message(),
            stage.ordinal() + 1
        )),
        Err(err) => Err(err.into()),
    }
}

async fn run_history(command: HistoryCommands) -> Result<()> {
    let archive = HistoryArchive::load(open_store()).await;
    match command {
        HistoryCommands::List => {
            let records = archive.list().await;
            if records.is_empty() {
                println!("No archived runs.");
                return Ok(());
            }
            for record in records {
                println!(
                    "{}  {}  {}",
                    record.id,
                    record.created_at.format("%Y-%m-%d %H:%M"),
                    record.title
                );
            }
            Ok(())
        }
        HistoryCommands::Show { id } => {
            let record = find_record(&archive, id).await?;
            print!(
                "{}",
                export::render(&record.title, &record.results, ExportFormat::PlainText)
            );
            Ok(())
        }
        HistoryCommands::Delete { id } => {
            archive.remove(&RecordId::from_string(id.clone())).await?;
            println!("Removed {id} from the archive.");
            Ok(())
        }
        HistoryCommands::Export { id, format, out } => {
            let record = find_record(&archive, id).await?;
            let dir = match out {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let path =
                export::write_export(&dir, &record.title, &record.results, format.into()).await?;
            println!("Exported to {}", path.display());
            Ok(())
        }
    }
}

async fn find_record(
    archive: &HistoryArchive,
    id: String,
) -> Result<crate::storage::HistoryRecord> {
    match archive.get(&RecordId::from_string(id.clone())).await {
        Some(record) => Ok(record),
        None => bail!("no archived run with id {id}"),
    }
}

async fn run_theme(theme: Option<ThemeArg>) -> Result<()> {
    let store = open_store();
    match theme {
        Some(theme) => {
            let theme = Theme::from(theme);
            theme.save(store.as_ref()).await?;
            println!("Theme set to {}.", theme.as_token());
        }
        None => {
            let theme = Theme::load(store.as_ref()).await;
            println!("{}", theme.as_token());
        }
    }
    Ok(())
}
