// Line-oriented command shell driving a TaskListStore

use crate::filter::Filter;
use crate::id::IdGenerator;
use crate::store::{Counts, TaskListStore};
use crate::task::{Task, TaskId};
use crate::view;
use eyre::{Context, Result, eyre};
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

const HELP: &str = "\
Commands:
  add <text>        add a task
  delete <id>       delete a task (alias: rm)
  toggle <id>       mark a task done / not done
  edit <id>         start editing a task
  type <text>       replace the text being edited
  save              save the edit
  cancel            discard the edit
  filter <key>      show all, completed or pending tasks
  theme             switch light/dark
  list              show the list
  json              print visible tasks and counts as JSON
  help              show this help
  quit              leave (alias: exit)";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Delete(TaskId),
    Toggle(TaskId),
    Edit(TaskId),
    Type(String),
    Save,
    Cancel,
    Filter(String),
    Theme,
    List,
    Json,
    Help,
    Quit,
}

impl Command {
    /// Whether the command can change what the view shows
    pub fn mutates(&self) -> bool {
        !matches!(self, Command::List | Command::Json | Command::Help | Command::Quit)
    }
}

impl std::str::FromStr for Command {
    type Err = eyre::Report;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "add" => Command::Add(required(verb, rest, "text")?.to_string()),
            "delete" | "rm" => Command::Delete(parse_id(verb, rest)?),
            "toggle" => Command::Toggle(parse_id(verb, rest)?),
            "edit" => Command::Edit(parse_id(verb, rest)?),
            // Buffer may legitimately be blank; saving it discards the edit
            "type" => Command::Type(rest.to_string()),
            "save" => Command::Save,
            "cancel" => Command::Cancel,
            "filter" => Command::Filter(required(verb, rest, "filter key")?.to_string()),
            "theme" => Command::Theme,
            "list" | "ls" => Command::List,
            "json" => Command::Json,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => return Err(eyre!("Empty command")),
            other => return Err(eyre!("Unknown command '{}' (try 'help')", other)),
        };

        Ok(command)
    }
}

fn required<'a>(verb: &str, rest: &'a str, what: &str) -> Result<&'a str> {
    if rest.is_empty() {
        Err(eyre!("'{}' needs a {}", verb, what))
    } else {
        Ok(rest)
    }
}

fn parse_id(verb: &str, rest: &str) -> Result<TaskId> {
    let raw = required(verb, rest, "task id")?;
    raw.trim_start_matches('#')
        .parse()
        .wrap_err_with(|| format!("Invalid task id '{}'", raw))
}

/// JSON shape printed by the `json` command
#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    filter: Filter,
    tasks: Vec<&'a Task>,
    counts: Counts,
}

/// Interactive front end over a store
pub struct Shell<G: IdGenerator> {
    store: TaskListStore<G>,
    prompt: bool,
}

impl<G: IdGenerator> Shell<G> {
    pub fn new(store: TaskListStore<G>) -> Self {
        Self { store, prompt: false }
    }

    /// Print a `> ` prompt before each line (for interactive terminals)
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn store(&self) -> &TaskListStore<G> {
        &self.store
    }

    pub fn into_store(self) -> TaskListStore<G> {
        self.store
    }

    /// Read commands until `quit` or end of input
    ///
    /// Bad commands are reported on `output` and do not stop the loop.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> Result<()> {
        info!(tasks = self.store.tasks().len(), "Shell started");
        view::render(&self.store, output)?;

        let mut lines = input.lines();
        loop {
            if self.prompt {
                write!(output, "> ")?;
                output.flush()?;
            }

            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Failed to read command")?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(c) => c,
                Err(e) => {
                    warn!(line = %line, error = %e, "Rejected command");
                    writeln!(output, "error: {}", e)?;
                    continue;
                }
            };

            if command == Command::Quit {
                break;
            }

            if let Err(e) = self.execute(&command, output) {
                warn!(?command, error = %e, "Command failed");
                writeln!(output, "error: {}", e)?;
                continue;
            }

            if command.mutates() || command == Command::List {
                view::render(&self.store, output)?;
            }
        }

        info!(tasks = self.store.tasks().len(), "Shell finished");
        Ok(())
    }

    /// Apply one command to the store
    pub fn execute<W: Write>(&mut self, command: &Command, output: &mut W) -> Result<()> {
        debug!(?command, "Executing command");
        match command {
            Command::Add(text) => {
                self.store.add(text);
            }
            Command::Delete(id) => {
                self.store.delete(*id);
            }
            Command::Toggle(id) => {
                self.store.toggle_complete(*id);
            }
            Command::Edit(id) => {
                let text = self
                    .store
                    .get(*id)
                    .map(|t| t.text.clone())
                    .ok_or_else(|| eyre!("No task #{}", id))?;
                self.store.start_edit(*id, text);
            }
            Command::Type(text) => {
                if !self.store.update_edit_buffer(text.as_str()) {
                    return Err(eyre!("Not editing anything (use 'edit <id>' first)"));
                }
            }
            Command::Save => {
                self.store.save_edit();
            }
            Command::Cancel => self.store.cancel_edit(),
            Command::Filter(key) => {
                self.store.set_filter_key(key)?;
            }
            Command::Theme => {
                self.store.toggle_theme();
            }
            Command::List => {}
            Command::Json => {
                let snapshot = Snapshot {
                    filter: self.store.filter(),
                    tasks: self.store.visible_tasks(),
                    counts: self.store.counts(),
                };
                let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize tasks")?;
                writeln!(output, "{}", json)?;
            }
            Command::Help => writeln!(output, "{}", HELP)?,
            Command::Quit => {}
        }
        Ok(())
    }
}
