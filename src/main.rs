use clap::Parser;
use eyre::Result;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tasklist::{Config, Filter, SequentialIds, Shell, TaskListStore, Theme};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "tasklist - In-memory to-do list with a terminal front end")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/tasklist/tasklist.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start in light or dark mode
    #[arg(short, long)]
    theme: Option<Theme>,

    /// Initial filter: all, completed or pending
    #[arg(short, long)]
    filter: Option<Filter>,

    /// Start with the demo tasks
    #[arg(long, conflicts_with = "empty")]
    seed: bool,

    /// Start with an empty list
    #[arg(long)]
    empty: bool,
}

fn main() -> Result<()> {
    // Setup tracing; stdout belongs to the rendered list
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let seed = if cli.seed {
        true
    } else if cli.empty {
        false
    } else {
        config.seed
    };

    let mut store = if seed {
        TaskListStore::seeded(SequentialIds::new())
    } else {
        TaskListStore::new()
    };
    store.set_theme(cli.theme.unwrap_or(config.theme));
    store.set_filter(cli.filter.unwrap_or(config.filter));

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut shell = Shell::new(store).with_prompt(interactive);
    shell.run(stdin.lock(), &mut io::stdout().lock())?;

    Ok(())
}
