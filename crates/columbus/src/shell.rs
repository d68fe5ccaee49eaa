// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `columbus chat` command implementation.
//!
//! Launches an interactive REPL with colored output and readline history.
//! Plain lines are sent with the pending attachments; lines starting with `/`
//! are shell commands.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use columbus_client::HttpTransport;
use columbus_config::{ColumbusConfig, ConfigError, closest_match};
use columbus_core::{ColumbusError, Role, TurnRecord};
use columbus_session::{ChatOrchestrator, ModeCatalog, SubmitOutcome};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::files;

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Message(String),
    Command(ShellCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Attach(Vec<String>),
    /// 1-based position as typed; `None` when missing or not a number.
    Remove(Option<usize>),
    Files,
    ClearFiles,
    Clear,
    Mode(Option<String>),
    Modes,
    History,
    Status,
    Help,
    Quit,
    Unknown(String),
}

const HELP: &[(&str, &str)] = &[
    ("/attach <paths...>", "add image files"),
    ("/remove <n>", "remove the n-th pending file"),
    ("/files", "list pending files"),
    ("/clear-files", "remove all pending files"),
    ("/clear", "clear the chat history and start a new session"),
    ("/mode [id]", "show or select the analysis mode"),
    ("/modes", "list available modes"),
    ("/history", "print the conversation"),
    ("/status", "show session details"),
    ("/help", "show this help"),
    ("/quit", "exit"),
];

/// Parses one line of REPL input.
pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Input::Message(trimmed.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<String> = parts.map(str::to_string).collect();

    let command = match name {
        "attach" | "a" => ShellCommand::Attach(args),
        "remove" | "rm" => {
            ShellCommand::Remove(args.first().and_then(|n| n.parse::<usize>().ok()))
        }
        "files" => ShellCommand::Files,
        "clear-files" => ShellCommand::ClearFiles,
        "clear" => ShellCommand::Clear,
        "mode" => ShellCommand::Mode(args.into_iter().next()),
        "modes" => ShellCommand::Modes,
        "history" => ShellCommand::History,
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => ShellCommand::Unknown(other.to_string()),
    };
    Input::Command(command)
}

/// Fails with a diagnostic naming `key` when `id` is not in the catalog.
pub fn check_mode(catalog: &ModeCatalog, key: &str, id: &str) -> Result<(), ConfigError> {
    if catalog.contains(id) {
        Ok(())
    } else {
        Err(ConfigError::unknown_mode(
            key,
            id,
            catalog.iter().map(|m| m.id.as_str()),
        ))
    }
}

/// Runs the `columbus chat` interactive REPL.
pub async fn run_chat(
    config: ColumbusConfig,
    mode: Option<String>,
    paths: Vec<PathBuf>,
) -> Result<(), ColumbusError> {
    let catalog = ModeCatalog::from_config(&config.session);
    if let Some(id) = &mode {
        check_mode(&catalog, "--mode", id).map_err(|e| ColumbusError::Config(e.to_string()))?;
    }

    let transport = Arc::new(HttpTransport::new(&config)?);
    let chat = ChatOrchestrator::from_config(transport, &config.session);
    if let Some(id) = mode {
        chat.set_mode(id);
    }
    attach(&chat, &paths);

    let mut rl = DefaultEditor::new()
        .map_err(|e| ColumbusError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "columbus chat".bold().green());
    println!(
        "Attach images with {}, then type a question. {} lists commands.\n",
        "/attach".yellow(),
        "/help".yellow()
    );

    let prompt = format!("{}> ", "columbus".green());
    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Message(text) => {
                let _ = rl.add_history_entry(&line);
                send(&chat, &text).await;
            }
            Input::Command(ShellCommand::Quit) => break,
            Input::Command(command) => {
                let _ = rl.add_history_entry(&line);
                run_command(&chat, &catalog, command);
            }
        }
    }

    Ok(())
}

async fn send(chat: &ChatOrchestrator, text: &str) {
    println!("{}", "analyzing...".dimmed());
    match chat.submit(text).await {
        Ok(SubmitOutcome::Answered(turn)) => print_turn(&turn),
        Ok(SubmitOutcome::Failed { turn, .. }) => println!("{}", turn.text.red()),
        Ok(SubmitOutcome::Discarded) => {}
        Err(rejection) if rejection.is_user_facing() => {
            println!("{}", rejection.to_string().yellow());
        }
        Err(rejection) => debug!(%rejection, "submission ignored"),
    }
}

fn run_command(chat: &ChatOrchestrator, catalog: &ModeCatalog, command: ShellCommand) {
    match command {
        ShellCommand::Attach(paths) if paths.is_empty() => {
            println!("{}", "usage: /attach <paths...>".yellow());
        }
        ShellCommand::Attach(paths) => attach(chat, &paths),
        ShellCommand::Remove(Some(n)) if n >= 1 => match chat.remove_attachment(n - 1) {
            Some(removed) => println!("removed {}", removed.display_name()),
            None => println!("{}", format!("no file #{n}").yellow()),
        },
        ShellCommand::Remove(_) => println!("{}", "usage: /remove <n>".yellow()),
        ShellCommand::Files => print_files(chat),
        ShellCommand::ClearFiles => {
            chat.clear_attachments();
            println!("pending files cleared");
        }
        ShellCommand::Clear => {
            chat.clear_transcript();
            println!("chat history cleared");
        }
        ShellCommand::Mode(None) => {
            let current = chat.mode();
            let name = catalog.get(&current).map(|m| m.name.as_str()).unwrap_or("");
            println!("mode: {} {}", current.bold(), name.dimmed());
        }
        ShellCommand::Mode(Some(id)) => match catalog.get(&id) {
            Some(mode) => {
                chat.set_mode(id.as_str());
                println!("mode set to {}", mode.name.bold());
            }
            None => {
                let hint = closest_match(&id, catalog.iter().map(|m| m.id.as_str()))
                    .map(|s| format!(" did you mean `{s}`?"))
                    .unwrap_or_else(|| " try /modes".to_string());
                println!("{}", format!("unknown mode `{id}`;{hint}").yellow());
            }
        },
        ShellCommand::Modes => print_modes(catalog, &chat.mode()),
        ShellCommand::History => {
            let transcript = chat.transcript();
            if transcript.is_empty() {
                println!("{}", "no messages yet".dimmed());
            }
            for turn in &transcript {
                print_turn(turn);
            }
        }
        ShellCommand::Status => {
            println!("transport:  {}", chat.transport_name());
            println!("mode:       {}", chat.mode());
            println!(
                "session:    {}",
                chat.session_id().unwrap_or_else(|| "(none)".to_string())
            );
            println!("messages:   {}", chat.transcript_len());
            println!("files:      {}", chat.attachment_count());
        }
        ShellCommand::Help => {
            for (usage, what) in HELP {
                println!("  {:<22} {}", usage.yellow(), what);
            }
        }
        ShellCommand::Quit => {}
        ShellCommand::Unknown(name) => {
            println!("{}", format!("unknown command /{name}; try /help").yellow());
        }
    }
}

fn attach<P: AsRef<std::path::Path>>(chat: &ChatOrchestrator, paths: &[P]) {
    let (attachments, errors) = files::read_images(paths);
    for err in &errors {
        eprintln!("{}: {err}", "error".red());
    }
    for attachment in &attachments {
        println!(
            "attached {} ({})",
            attachment.display_name().bold(),
            format_size(attachment.bytes().len() as u64)
        );
    }
    chat.add_attachments(attachments);
}

fn print_files(chat: &ChatOrchestrator) {
    let pending = chat.attachments();
    if pending.is_empty() {
        println!("{}", "no files attached".dimmed());
        return;
    }
    for (i, file) in pending.iter().enumerate() {
        println!(
            "  {}. {} {} {}",
            i + 1,
            file.display_name,
            file.media_type.dimmed(),
            format_size(file.size as u64).dimmed()
        );
    }
}

/// Prints the mode catalog, marking the selected mode.
pub fn print_modes(catalog: &ModeCatalog, selected: &str) {
    for mode in catalog.iter() {
        let marker = if mode.id == selected { "*" } else { " " };
        println!(
            "{} {:<10} {:<20} {}",
            marker,
            mode.id.bold(),
            mode.name,
            mode.description.dimmed()
        );
    }
}

fn print_turn(turn: &TurnRecord) {
    let time = turn.created_at.format("%H:%M:%S").to_string();
    match turn.role {
        Role::User => {
            println!("{} {} {}", time.dimmed(), "you:".blue().bold(), turn.text);
            for file in &turn.attachments {
                println!("    {} {}", "+".dimmed(), file.display_name.dimmed());
            }
        }
        Role::Assistant => {
            println!("{} {}", time.dimmed(), "columbus:".green().bold());
            println!("{}", turn.text);
        }
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else if b < KB * KB * KB {
        format!("{:.1} MB", b / (KB * KB))
    } else {
        format!("{:.1} GB", b / (KB * KB * KB))
    }
}
