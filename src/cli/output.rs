use colored::Colorize;
use std::fmt;

use tablesnap_core::{RunSummary, TableStatus};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn build_label(kind: MessageKind) -> (&'static str, &'static str) {
    match kind {
        MessageKind::Info => ("INFO", "[i]"),
        MessageKind::Success => ("SUCCESS", "[ok]"),
        MessageKind::Warning => ("WARNING", "[!]"),
        MessageKind::Error => ("ERROR", "[x]"),
        MessageKind::Section => ("INFO", ""),
    }
}

pub fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => {
            let (label, icon) = build_label(kind);
            format!("{label}: {icon} {text}")
        }
    };

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// One styled line per table followed by the totals.
pub fn summary_lines(title: &str, summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![apply_style(MessageKind::Section, title)];
    for outcome in summary.outcomes() {
        let kind = match outcome.status {
            TableStatus::Success { .. } => MessageKind::Success,
            TableStatus::Skipped(_) => MessageKind::Warning,
            TableStatus::Failed(_) => MessageKind::Error,
        };
        lines.push(apply_style(kind, outcome));
    }
    let totals = if summary.failed() > 0 {
        MessageKind::Error
    } else {
        MessageKind::Info
    };
    lines.push(apply_style(totals, summary));
    lines
}

pub fn print_summary(title: &str, summary: &RunSummary) {
    if summary.is_empty() {
        warning(format!("{title}: nothing to do"));
        return;
    }
    println!();
    for line in summary_lines(title, summary) {
        println!("{}", line);
    }
}
