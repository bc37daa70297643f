use colored::Colorize;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
}

fn emit(kind: MessageKind, message: impl fmt::Display) {
    let text = message.to_string();
    let line = match kind {
        MessageKind::Info => format!("INFO: [i] {text}").cyan(),
        MessageKind::Success => format!("SUCCESS: [ok] {text}").green(),
        MessageKind::Warning => format!("WARNING: [!] {text}").yellow(),
        MessageKind::Error => format!("ERROR: [x] {text}").red(),
    };
    println!("{line}");
}

pub fn info(message: impl fmt::Display) {
    emit(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    emit(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    emit(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    emit(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    println!();
    println!("{}", format!("=== {} ===", title).bold());
}

pub fn detail(message: impl fmt::Display) {
    println!("  {message}");
}
