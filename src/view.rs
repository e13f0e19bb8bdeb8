// Terminal rendering of the store state

use crate::filter::Filter;
use crate::id::IdGenerator;
use crate::store::TaskListStore;
use crate::task::Task;
use crate::theme::Theme;
use colored::{ColoredString, Colorize};
use eyre::Result;
use std::io::Write;

const TITLE: &str = "Enhanced To-Do List";

/// Write the full view: title, filter bar, task rows, stats footer
pub fn render<G: IdGenerator, W: Write>(store: &TaskListStore<G>, out: &mut W) -> Result<()> {
    let theme = store.theme();

    writeln!(out, "{}", title(theme))?;
    writeln!(out, "{}", filter_bar(store))?;
    writeln!(out)?;

    let visible = store.visible_tasks();
    if visible.is_empty() {
        writeln!(out, "  {}", muted(store.filter().empty_message(), theme))?;
    } else {
        for task in visible {
            writeln!(out, "{}", task_row(store, task))?;
        }
    }

    if !store.is_empty() {
        let counts = store.counts();
        writeln!(out)?;
        writeln!(
            out,
            "  {} {}   {} {}   {} {}",
            counts.total.to_string().blue().bold(),
            muted("Total", theme),
            counts.completed.to_string().green().bold(),
            muted("Completed", theme),
            counts.pending.to_string().yellow().bold(),
            muted("Pending", theme),
        )?;
    }

    Ok(())
}

fn title(theme: Theme) -> ColoredString {
    let icon = if theme.is_dark() { "☾" } else { "☀" };
    match theme {
        Theme::Light => format!("{} {}", TITLE, icon).purple().bold(),
        Theme::Dark => format!("{} {}", TITLE, icon).bright_magenta().bold(),
    }
}

fn filter_bar<G: IdGenerator>(store: &TaskListStore<G>) -> String {
    let counts = store.counts();
    let buttons: Vec<String> = Filter::ALL
        .iter()
        .map(|&filter| {
            let label = format!("{} ({})", filter.label(), counts.for_filter(filter));
            if filter == store.filter() {
                format!("[{}]", label).blue().bold().to_string()
            } else {
                muted(&format!(" {} ", label), store.theme()).to_string()
            }
        })
        .collect();
    format!("Filter: {}", buttons.join(" "))
}

fn task_row<G: IdGenerator>(store: &TaskListStore<G>, task: &Task) -> String {
    let theme = store.theme();
    let check = if task.completed {
        "[x]".green().to_string()
    } else {
        "[ ]".to_string()
    };
    let id = muted(&format!("#{}", task.id), theme);

    match store.edit() {
        Some(session) if session.id == task.id => {
            format!("  {} {} {}_  {}", check, id, session.buffer.underline(), "(editing)".cyan())
        }
        _ => {
            let text = if task.completed {
                task.text.strikethrough().dimmed()
            } else if theme.is_dark() {
                task.text.bright_white()
            } else {
                task.text.normal()
            };
            format!("  {} {} {}", check, id, text)
        }
    }
}

fn muted(text: &str, theme: Theme) -> ColoredString {
    match theme {
        Theme::Light => text.bright_black(),
        Theme::Dark => text.white().dimmed(),
    }
}
