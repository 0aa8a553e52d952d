//! # File Explorer CLI
//!
//! Command-line front end for a Remote Tree Service.
//!
//! One-shot subcommands run a single operation and print the refreshed
//! listing; `browse` opens an interactive shell with a breadcrumb prompt.
//!
//! ## Usage
//!
//! ```bash
//! # List the root folder
//! explorer-cli ls
//!
//! # Create a folder inside another one
//! explorer-cli mkdir Reports --parent 65f0c2a1
//!
//! # Upload a file with a progress bar
//! explorer-cli upload ./report.pdf --parent 65f0c2a1
//!
//! # Walk the tree interactively
//! explorer-cli browse
//! ```
//!
//! ## Configuration
//!
//! The service origin comes from `--api-url` or `FILE_EXPLORER_API_URL`
//! (default `http://localhost:5000`).

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use file_explorer::config::{API_URL_ENV, DEFAULT_API_URL};
use file_explorer::format::{created_label, describe, icon_for, size_label, type_label};
use file_explorer::{
    ExplorerClient, ExplorerConfig, Navigator, Node, NoticeKind, RemoteTree, UploadProgress,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit code indicating successful completion.
const EXIT_SUCCESS: u8 = 0;
/// Exit code indicating a general error occurred.
const EXIT_ERROR: u8 = 1;

// =============================================================================
// CLI Definition
// =============================================================================

#[derive(Parser)]
#[command(name = "explorer-cli")]
#[command(author, version, about = "File Explorer CLI - browse and manage a remote folder tree")]
#[command(
    long_about = "A command-line client for a remote file tree served under /api/files.\n\n\
Features:\n\
  - Breadcrumb navigation with an interactive shell\n\
  - Folder creation, rename and delete\n\
  - Single-file upload with progress\n\
  - File download"
)]
struct Cli {
    /// Enable verbose logging (can also use RUST_LOG env var)
    #[arg(short, long)]
    verbose: bool,

    /// Origin of the Remote Tree Service
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a folder (the root when no id is given)
    ///
    /// A folder given by id is shown on its own; use `browse` to walk the
    /// full path from the root.
    Ls {
        /// Folder id
        folder: Option<String>,
    },

    /// Create a folder
    Mkdir {
        /// Name of the new folder
        name: String,

        /// Parent folder id (defaults to the root)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Rename a file or folder
    Rename {
        /// Item id
        id: String,

        /// New name
        name: String,

        /// Folder holding the item (defaults to the root)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Delete a file or folder
    Rm {
        /// Item id
        id: String,

        /// Folder holding the item (defaults to the root)
        #[arg(short, long)]
        parent: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Upload a local file
    Upload {
        /// File to upload
        file: PathBuf,

        /// Destination folder id (defaults to the root)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Download a file
    Download {
        /// File id
        id: String,

        /// Local destination directory
        #[arg(short = 'o', long, default_value = "./downloads")]
        output: PathBuf,
    },

    /// Browse the tree interactively
    Browse,
}

/// Application entry point.
#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Main application logic.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("file_explorer=debug,explorer_cli=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("file_explorer=warn,explorer_cli=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let config = ExplorerConfig::new(&cli.api_url)?;
    let mut nav = Navigator::new(ExplorerClient::new(&config));

    match cli.command {
        Commands::Ls { folder } => {
            open(&mut nav, folder.as_deref()).await?;
            print_listing(&nav);
        }

        Commands::Mkdir { name, parent } => {
            open(&mut nav, parent.as_deref()).await?;
            let parent_id = current_id(&nav)?;
            let result = nav.create_folder(&name, &parent_id).await;
            flush_notices(&mut nav);
            let node = result.context("Error creating folder")?;
            println!("✓ Created folder: {} ({})", node.name, node.id);
            print_listing(&nav);
        }

        Commands::Rename { id, name, parent } => {
            open(&mut nav, parent.as_deref()).await?;
            let result = nav.rename(&id, &name).await;
            flush_notices(&mut nav);
            let node = result.context("Error renaming")?;
            println!("✓ Renamed: {id} -> {}", node.name);
            print_listing(&nav);
        }

        Commands::Rm { id, parent, yes } => {
            open(&mut nav, parent.as_deref()).await?;
            let label = nav
                .state()
                .folder()
                .and_then(|f| f.child(&id))
                .map(|n| n.name.clone())
                .unwrap_or_else(|| id.clone());

            let result = nav
                .delete_item(&id, |_| yes || confirm_blocking(&label))
                .await;
            flush_notices(&mut nav);
            if result.context("Error deleting")? {
                println!("✓ Deleted: {label}");
                print_listing(&nav);
            } else {
                println!("Aborted.");
            }
        }

        Commands::Upload { file, parent } => {
            if !file.is_file() {
                bail!("Not found: {}", file.display());
            }
            open(&mut nav, parent.as_deref()).await?;
            let parent_id = current_id(&nav)?;
            upload_with_bar(&mut nav, &file, &parent_id).await?;
            print_listing(&nav);
        }

        Commands::Download { id, output } => {
            let path = nav
                .download(&id, &output)
                .await
                .context("Error downloading")?;
            println!("✓ Downloaded {}", path.display());
        }

        Commands::Browse => browse(&mut nav).await?,
    }

    Ok(())
}

/// Loads the folder a one-shot command works in.
///
/// The service has no ancestor lookup, so a folder opened by id starts a
/// trail of its own rather than one rooted at the top of the tree.
async fn open<T: RemoteTree>(nav: &mut Navigator<T>, folder: Option<&str>) -> anyhow::Result<()> {
    let result = match folder {
        Some(id) => nav.navigate_to(id).await,
        None => nav.load_root().await,
    };
    nav.state_mut().notices.drain();
    result.context("Error loading folder")
}

fn current_id<T: RemoteTree>(nav: &Navigator<T>) -> anyhow::Result<String> {
    nav.state()
        .current_folder_id()
        .map(str::to_string)
        .context("No folder loaded")
}

fn flush_notices<T: RemoteTree>(nav: &mut Navigator<T>) {
    for notice in nav.state_mut().notices.drain() {
        match notice.kind {
            NoticeKind::Success => println!("✓ {}", notice.message),
            NoticeKind::Error => eprintln!("✗ {}", notice.message),
        }
    }
}

fn print_listing<T: RemoteTree>(nav: &Navigator<T>) {
    let state = nav.state();
    let Some(folder) = state.folder() else {
        return;
    };

    println!("\n📂 {}\n", state.trail().render(" / "));
    if folder.is_empty() {
        println!("This folder is empty\n");
        return;
    }

    println!("{:<4} {:<3} {:<40} {:<26} {}", "#", "", "Name", "Info", "Id");
    println!("{}", "-".repeat(100));
    for (i, node) in folder.children.iter().enumerate() {
        let marker = if state.selected().map(|s| s.id == node.id).unwrap_or(false) {
            "*"
        } else {
            " "
        };
        println!(
            "{:<4} {:<3} {:<40} {:<26} {}",
            format!("{}{marker}", i + 1),
            icon_for(node),
            node.name,
            describe(node),
            node.id
        );
    }
    println!();
}

fn confirm_blocking(label: &str) -> bool {
    eprint!("⚠️  Are you sure you want to delete '{label}'? Type 'yes' to confirm: ");
    let mut input = String::new();
    if std::io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    input.trim().eq_ignore_ascii_case("yes")
}

async fn upload_with_bar<T: RemoteTree>(
    nav: &mut Navigator<T>,
    file: &Path,
    parent_id: &str,
) -> anyhow::Result<Node> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("  Uploading: [{bar:40.cyan/blue}] {pos:>3}%")?
            .progress_chars("█▓░"),
    );

    let progress: UploadProgress = nav.progress().clone();
    let bar_clone = bar.clone();
    let ticker = tokio::spawn(async move {
        loop {
            bar_clone.set_position(u64::from(progress.get()));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    });

    let result = nav.upload_file(file, parent_id).await;
    ticker.abort();
    bar.set_position(u64::from(nav.progress().get()));
    bar.finish_and_clear();

    flush_notices(nav);
    let node = result.context("Error uploading")?;
    println!("✓ Uploaded {} ({})", node.name, node.display_size());
    Ok(node)
}

// =============================================================================
// Interactive Shell
// =============================================================================

const SHELL_HELP: &str = "\
Commands:
  ls                    List the current folder
  cd <n|id|name>        Enter a child folder
  cd ..                 Go to the parent folder
  cd /                  Go to the root folder
  select <n|id|name>    Select a file (folders are entered)
  info                  Show the selected item
  mkdir <name>          Create a folder here
  rename <n|id> <name>  Rename an item
  rm <n|id>             Delete an item (asks first)
  upload <path>         Upload a local file here
  get <n|id> [dir]      Download a file (default ./downloads)
  pwd                   Show the breadcrumb trail
  help                  Show this help
  quit                  Leave the shell";

/// Finds a child of the current folder by 1-based index, id or name.
fn resolve<T: RemoteTree>(nav: &Navigator<T>, arg: &str) -> Option<Node> {
    let children = nav.state().children();
    if let Ok(index) = arg.parse::<usize>() {
        if index >= 1 && index <= children.len() {
            return Some(children[index - 1].clone());
        }
    }
    children
        .iter()
        .find(|n| n.id == arg)
        .or_else(|| children.iter().find(|n| n.name == arg))
        .cloned()
}

async fn browse<T: RemoteTree>(nav: &mut Navigator<T>) -> anyhow::Result<()> {
    if nav.load_root().await.is_err() {
        flush_notices(nav);
        bail!("Could not load the root folder");
    }
    print_listing(nav);
    println!("Type 'help' for commands.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let prompt = format!("{}> ", nav.state().trail().render("/"));
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match cmd {
            "quit" | "exit" | "q" => break,
            "help" | "?" => println!("{SHELL_HELP}"),
            "pwd" => println!("{}", nav.state().trail().render(" / ")),
            "ls" => {
                if let Some(id) = nav.state().current_folder_id().map(str::to_string) {
                    let _ = nav.refresh(&id).await;
                }
                print_listing(nav);
            }
            "cd" => {
                let target = match rest {
                    "" | "/" => nav.state().trail().crumbs().first().map(|c| c.id.clone()),
                    ".." => nav.state().trail().parent().map(|c| c.id.clone()),
                    arg => match resolve(nav, arg) {
                        Some(node) if node.is_folder => Some(node.id),
                        Some(node) => {
                            println!("'{}' is not a folder", node.name);
                            None
                        }
                        None => nav
                            .state()
                            .trail()
                            .crumbs()
                            .iter()
                            .find(|c| c.id == arg || c.name == arg)
                            .map(|c| c.id.clone()),
                    },
                };
                match target {
                    Some(id) => {
                        if nav.navigate_to(&id).await.is_ok() {
                            print_listing(nav);
                        }
                    }
                    None => println!("No such folder: {rest}"),
                }
            }
            "select" => match resolve(nav, rest) {
                Some(node) => {
                    let _ = nav.activate(&node.id).await;
                    print_listing(nav);
                }
                None => println!("No such item: {rest}"),
            },
            "info" => match nav.state().selected() {
                Some(node) => {
                    println!("Name:    {}", node.name);
                    println!("Type:    {}", type_label(node));
                    println!("Size:    {}", size_label(node));
                    if let Some(created) = created_label(node) {
                        println!("Created: {created}");
                    }
                    println!("Id:      {}", node.id);
                }
                None => println!("Nothing selected"),
            },
            "mkdir" => {
                let Some(parent_id) = nav.state().current_folder_id().map(str::to_string) else {
                    continue;
                };
                if let Err(e) = nav.create_folder(rest, &parent_id).await {
                    if e.is_local() {
                        println!("{e}");
                    }
                }
            }
            "rename" => {
                let (target, name) = rest.split_once(' ').unwrap_or((rest, ""));
                match resolve(nav, target) {
                    Some(node) => {
                        if let Err(e) = nav.rename(&node.id, name).await {
                            if e.is_local() {
                                println!("{e}");
                            }
                        }
                    }
                    None => println!("No such item: {target}"),
                }
            }
            "rm" => match resolve(nav, rest) {
                Some(node) => {
                    eprint!("Delete '{}'? [y/N] ", node.name);
                    let answer = lines.next_line().await?.unwrap_or_default();
                    let confirmed = matches!(answer.trim(), "y" | "Y" | "yes");
                    match nav.delete_item(&node.id, |_| confirmed).await {
                        Ok(false) => println!("Aborted."),
                        Ok(true) | Err(_) => {}
                    }
                }
                None => println!("No such item: {rest}"),
            },
            "upload" => {
                let Some(parent_id) = nav.state().current_folder_id().map(str::to_string) else {
                    continue;
                };
                if let Err(e) = upload_with_bar(nav, Path::new(rest), &parent_id).await {
                    println!("{e:#}");
                }
            }
            "get" => {
                let (target, dir) = rest.split_once(' ').unwrap_or((rest, "./downloads"));
                match resolve(nav, target) {
                    Some(node) if !node.is_folder => {
                        match nav.download(&node.id, Path::new(dir.trim())).await {
                            Ok(path) => println!("✓ Downloaded {}", path.display()),
                            Err(e) => println!("✗ Download failed: {e}"),
                        }
                    }
                    Some(node) => println!("'{}' is a folder", node.name),
                    None => println!("No such item: {target}"),
                }
            }
            other => println!("Unknown command '{other}'. Type 'help' for commands."),
        }

        flush_notices(nav);
    }

    Ok(())
}
