//! Command-line front end.
//!
//! ```bash
//! # Export a saved editor document with its diagram into ./out/document.pdf
//! folio export notes.json --scene flow.excalidraw --out-dir out
//!
//! # Check a write-access grant against a team/file snapshot
//! folio grant request.json --state workspace.json
//! ```

use clap::{Parser, Subcommand};
use folio::access::{
    InMemoryFileStore, InMemoryTeamDirectory, Team, WriteAccessRequest, grant_write_access,
};
use folio::{ExportError, ExportPipelineBuilder, JsonDiagramSurface, JsonEditorSurface};
use folio::{EditorSurface, pipeline::save_to_dir};
use log::info;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Export editor documents and diagrams to PDF")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a saved editor document, optionally followed by a diagram
    Export {
        /// Saved editor output (JSON)
        editor: PathBuf,

        /// Saved drawing scene (Excalidraw JSON)
        #[arg(long)]
        scene: Option<PathBuf>,

        /// Export configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory the PDF is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Evaluate a write-access grant request
    Grant {
        /// Grant request body (JSON)
        request: PathBuf,

        /// Teams and file writers to evaluate against (JSON)
        #[arg(long)]
        state: PathBuf,
    },
}

/// Snapshot of the team and file stores for `folio grant`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorkspaceState {
    teams: Vec<Team>,
    files: BTreeMap<String, Vec<String>>,
}

async fn export(
    editor: PathBuf,
    scene: Option<PathBuf>,
    config: Option<PathBuf>,
    out_dir: PathBuf,
) -> Result<(), ExportError> {
    let mut builder = ExportPipelineBuilder::new();
    if let Some(config) = config {
        builder = builder.with_config_file(config)?;
    }
    let pipeline = builder.build()?;

    let editor = JsonEditorSurface::new(editor);
    let pdf = match scene {
        Some(scene) => {
            pipeline
                .export(&editor, &JsonDiagramSurface::new(scene))
                .await?
        }
        None => {
            let document = editor.save().await?;
            pipeline.export_document(&document, None).await?
        }
    };

    let path = save_to_dir(&pdf, &out_dir).await?;
    println!("{}", path.display());
    Ok(())
}

async fn grant(request: PathBuf, state: PathBuf) -> Result<(), ExportError> {
    let request: WriteAccessRequest =
        serde_json::from_str(&tokio::fs::read_to_string(&request).await?)?;
    let state: WorkspaceState = serde_json::from_str(&tokio::fs::read_to_string(&state).await?)?;

    let teams = InMemoryTeamDirectory::new();
    let files = InMemoryFileStore::new();
    let store_err = |e: folio::access::StoreError| ExportError::SourceUnavailable(e.to_string());
    for team in state.teams {
        teams.insert(team).map_err(store_err)?;
    }
    for (file_id, writers) in state.files {
        files.insert(file_id, writers).map_err(store_err)?;
    }

    let decision = grant_write_access(&request, &teams, &files).map_err(store_err)?;
    info!("Grant request decided with status {}", decision.status());
    println!("{} {}", decision.status(), decision.message());
    if let Some(file_id) = request.file_id.as_deref()
        && let Some(writers) = files.written_by(file_id)
    {
        println!("writtenBy: {}", writers.join(", "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export {
            editor,
            scene,
            config,
            out_dir,
        } => export(editor, scene, config, out_dir).await,
        Commands::Grant { request, state } => grant(request, state).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
