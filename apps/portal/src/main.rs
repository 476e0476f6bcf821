use std::{
    fs,
    io::{self, BufRead, Read, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    view, HttpPortalApi, PortalController, EMPTY_LIST_MESSAGE,
};
use shared::domain::{DocumentId, DocumentKind};

#[derive(Parser, Debug)]
#[command(about = "Terminal front end for the document-generation portal")]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send raw notes or Gherkin scenarios for AI-assisted structuring.
    Process {
        #[arg(long, value_enum)]
        kind: KindArg,
        /// File with the raw text; stdin when omitted.
        #[arg(long)]
        input_file: Option<PathBuf>,
        /// Persist the structured suggestion after rendering it.
        #[arg(long)]
        save: bool,
        /// Also write the rendered suggestion as an HTML fragment.
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// List saved documents.
    List,
    /// Display a saved document.
    View {
        id: i64,
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Delete a saved document (asks for confirmation unless --yes).
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Download a saved document as a .docx file.
    Export {
        id: i64,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    UserStory,
    AcceptanceTerm,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::UserStory => DocumentKind::UserStory,
            KindArg::AcceptanceTerm => DocumentKind::AcceptanceTerm,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    let api = Arc::new(HttpPortalApi::new(&cli.server_url));
    let controller = PortalController::new(api);

    match cli.command {
        Command::Process {
            kind,
            input_file,
            save,
            html,
        } => {
            let input = read_input(input_file)?;
            let kind = DocumentKind::from(kind);
            controller.open_form(kind);
            let suggestion = controller.process(kind, &input).await?;
            print!("{}", view::render_text(&suggestion));
            if let Some(path) = html {
                fs::write(&path, view::render_html(&suggestion))
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("HTML fragment written to {}", path.display());
            }
            if save {
                let id = controller.save().await?;
                println!("Saved as document {id}");
            }
        }
        Command::List => {
            let list = controller.refresh_list().await?;
            if list.is_empty() {
                println!("{EMPTY_LIST_MESSAGE}");
            } else {
                for entry in &list.entries {
                    println!("{:>6}  {}", entry.id, entry.label);
                }
            }
        }
        Command::View { id, html } => {
            let loaded = controller.view(DocumentId(id)).await?;
            print!("{}", view::render_text(&loaded.view));
            println!("Raw input: {}", loaded.input_placeholder);
            if let Some(path) = html {
                fs::write(&path, view::render_html(&loaded.view))
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("HTML fragment written to {}", path.display());
            }
        }
        Command::Delete { id, yes } => {
            let id = DocumentId(id);
            controller.request_delete(id);
            if !yes && !confirm_on_stdin(id)? {
                controller.cancel_delete();
                println!("Aborted; document {id} was not deleted.");
                return Ok(());
            }
            controller.confirm_delete().await?;
            println!("Document {id} deleted.");
        }
        Command::Export { id, out_dir } => {
            controller.view(DocumentId(id)).await?;
            let exported = controller.export().await?;
            let path = out_dir.join(&exported.filename);
            fs::write(&path, &exported.bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
    }

    Ok(())
}

fn read_input(input_file: Option<PathBuf>) -> Result<String> {
    match input_file {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn confirm_on_stdin(id: DocumentId) -> Result<bool> {
    print!("Delete document {id}? This cannot be undone. [y/N] ");
    io::stdout().flush().context("failed to flush stdout")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}
