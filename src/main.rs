mod config;
mod error;
mod executor;
mod matcher;
mod model;
mod registration;
mod startup;
mod state;
mod store;
mod tree;

use std::path::PathBuf;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use crate::config::load_config;
use crate::executor::SystemOpener;
use crate::state::AppState;
use crate::store::LauncherStore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the per-user one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Launcher data file to use instead of the configured one
    #[arg(short, long)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Auto-launch the startup launchers, then list everything
    Run,
    /// Show the launcher tree
    List {
        /// Only the startup launchers
        #[arg(long)]
        startup: bool,
    },
    /// Show launchers whose name contains QUERY
    Search { query: String },
    /// Create a folder
    AddFolder {
        name: String,
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Create a link to a URL or a path
    AddLink {
        name: String,
        target: String,
        #[arg(short, long)]
        parent: Option<String>,
        /// Also mark it as a startup launcher
        #[arg(long)]
        startup: bool,
    },
    /// Delete a launcher (folders with everything in them)
    Remove { path: String },
    /// Mark or unmark a launcher for auto-launch
    Startup { path: String, state: Switch },
    /// Open a launcher by path, or a raw URL / file path
    Launch { target: String },
    /// Start NexLaunch with the user session
    Autostart { action: AutostartAction },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Switch {
    On,
    Off,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AutostartAction {
    Status,
    Enable,
    Disable,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    // 1. Load Config
    let config = load_config(args.config.as_deref())?;
    let data_path = args
        .data
        .or_else(|| config.general.data_file.clone())
        .unwrap_or_else(store::default_data_path);

    // 2. Load launchers; corrupt data is reported but not fatal
    let (mut app, load_err) =
        AppState::open(LauncherStore::new(data_path), config.validation.duplicate_scope);
    if let Some(e) = load_err {
        eprintln!("warning: {}; starting with an empty list", e);
    }
    app.subscribe(|event| log::debug!("model event: {:?}", event));

    // 3. Dispatch
    match args.command.unwrap_or(Command::Run) {
        Command::Run => {
            if config.general.auto_launch {
                let report = startup::auto_launch_all(
                    app.startup_set(),
                    &SystemOpener,
                    config.startup.folder_launch,
                );
                if !report.is_clean() {
                    for (name, e) in &report.failed {
                        eprintln!("could not launch '{}': {}", name, e);
                    }
                }
            }
            if app.entities().is_empty() {
                println!("(no launchers)");
            } else {
                print!("{}", tree::render(&app.display_tree()));
            }
        }
        Command::List { startup } => {
            let root = if startup { app.startup_tree() } else { app.display_tree() };
            if root.children.is_empty() {
                println!("(no launchers)");
            } else {
                print!("{}", tree::render(&root));
            }
        }
        Command::Search { query } => {
            let root = app.search(&query);
            if root.children.is_empty() {
                println!("no results for '{}'", query);
            } else {
                print!("{}", tree::render(&root));
            }
        }
        Command::AddFolder { name, parent } => {
            app.add_folder(parent.as_deref(), &name)?;
            println!("folder '{}' created", name.trim());
        }
        Command::AddLink { name, target, parent, startup } => {
            app.add_link(parent.as_deref(), &name, &target, startup)?;
            println!("launcher '{}' created", name.trim());
        }
        Command::Remove { path } => {
            let removed = app.remove(&path)?;
            println!("removed '{}'", removed.name);
        }
        Command::Startup { path, state } => {
            app.toggle_startup(&path, matches!(state, Switch::On))?;
            println!("{} startup launchers", app.startup_set().len());
        }
        Command::Launch { target } => {
            let resolved = match app.find(&target) {
                Some(entity) if entity.is_folder() => {
                    bail!("'{}' is a folder; launch one of its links", target)
                }
                Some(entity) => entity.target().unwrap_or_default().to_string(),
                None => target,
            };
            executor::launch(&resolved, &SystemOpener)?;
        }
        Command::Autostart { action } => {
            let reg = registration::system();
            match action {
                AutostartAction::Status => {
                    let status = if reg.is_registered() { "enabled" } else { "disabled" };
                    println!("autostart {}", status);
                }
                AutostartAction::Enable => {
                    let exe = std::env::current_exe().context("locating the executable")?;
                    reg.register(&exe)?;
                    println!("autostart enabled");
                }
                AutostartAction::Disable => {
                    reg.unregister()?;
                    println!("autostart disabled");
                }
            }
        }
    }

    Ok(())
}
