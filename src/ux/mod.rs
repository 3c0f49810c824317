use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::errors::ComposeError;
use crate::history::{HistoryEntry, SessionHistory};
use crate::registry::Registry;
use crate::wire::{ComposedPrompt, GenerationResult};

pub fn spinner(msg: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Without a dimension: every dimension and its value count. With one: the
/// values and their metadata.
pub fn show_options(registry: &Registry, dimension: Option<&str>) -> Result<(), ComposeError> {
    let Some(id) = dimension else {
        println!("\n{}", "=== OPTION DIMENSIONS ===".bold());
        for d in registry.dimensions() {
            println!("  {}  {} ({} values)", d.id.cyan().bold(), d.label, d.values.len());
        }
        println!();
        return Ok(());
    };

    let dim = registry.dimension(id)?;
    println!("\n{}", format!("=== {} ===", dim.label.to_uppercase()).bold());
    for v in &dim.values {
        println!("{}", v.id.green().bold());
        for (key, value) in v.metadata.iter() {
            println!("    {}: {}", key.dimmed(), value);
        }
    }
    println!();
    Ok(())
}

pub fn show_prompt(prompt: &ComposedPrompt) {
    let s = prompt.request().summary();
    println!(
        "\n{}",
        format!("=== PROMPT: {} / {} / {} ===", s.kind.label(), s.platform, s.topic).bold()
    );
    println!("{}\n", prompt.text());
}

pub fn show_compose_error(err: &ComposeError) {
    eprintln!("{} {}", "[INVALID REQUEST]".red().bold(), err);
}

pub fn show_entry(entry: &HistoryEntry) {
    let r = &entry.request;
    match &entry.result {
        GenerationResult::Generated { text } => {
            println!(
                "\n{}  {}",
                "[GENERATED]".green().bold(),
                format!("{} for {}: {}", r.kind.label(), r.platform, r.topic).bold()
            );
            println!("{}\n", text.trim_end());
        }
        GenerationResult::Failed(f) => {
            eprintln!(
                "\n{}  {} for {}: {}",
                "[FAILED]".red().bold(),
                r.kind.label(),
                r.platform,
                r.topic
            );
            eprintln!("{}\n", f.message.red());
        }
    }
}

/// Session summary, most recent attempt first.
pub fn show_history(history: &SessionHistory) {
    println!(
        "\n{}",
        "┏━━━━━━━━━━━━━━━━━━━━━━━ Session History ━━━━━━━━━━━━━━━━━━━━━━━┓".bold()
    );
    if history.is_empty() {
        println!("  No content generated yet.");
    }
    let ok = history.list_all().iter().filter(|e| e.result.is_success()).count();
    let total = history.len();
    for e in history.list_all().iter().rev() {
        let mark = if e.result.is_success() { "✔".green() } else { "✘".red() };
        println!(
            "  {} {} - {} - {} ({})",
            mark,
            e.request.kind.label(),
            e.request.platform,
            truncate(&e.request.topic, 50),
            e.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!(
        "  {}: {}   {}: {}",
        "Generated".green().bold(),
        ok,
        "Failed".red().bold(),
        total - ok
    );
    println!(
        "{}",
        "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold()
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max).collect();
    format!("{cut}...")
}
