//! `neurobot chat`: interactive support REPL.
//!
//! Each line is appended to the conversation and answered by the
//! assistant. `/voice <file>` transcribes a recording and sends the text.

use std::path::Path;
use std::sync::Arc;

use nb_domain::config::Config;
use nb_domain::media::InlineMedia;
use nb_domain::turn::Role;
use nb_providers::AiGateway;
use nb_sessions::ConversationManager;

use crate::bootstrap::{self, Runtime};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn chat(config: Arc<Config>) -> anyhow::Result<()> {
    let rt = bootstrap::build_runtime(config)?;
    let mut conversation = rt.conversation();

    let history_path = dirs::home_dir()
        .unwrap_or_default()
        .join(".neurobot")
        .join("chat_history.txt");
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    let _ = rl.load_history(&history_path);

    eprintln!("NeuroBOT asistente de soporte");
    match rt.profiles().and_then(|p| Ok(p.load()?)) {
        Ok(Some(profile)) => eprintln!("Sesión: {} <{}>", profile.name, profile.email),
        Ok(None) => eprintln!("Sin sesión iniciada (usa `neurobot login`)"),
        Err(e) => tracing::warn!(error = %e, "could not read stored profile"),
    }
    eprintln!("Type /help for commands, Ctrl+D to exit");
    eprintln!();
    if let Some(greeting) = conversation.last() {
        println!("bot> {}", greeting.text);
    }

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(&line).ok();

                if trimmed.starts_with('/') {
                    match handle_slash_command(trimmed, &rt, &mut conversation).await {
                        SlashOutcome::Exit => break,
                        SlashOutcome::Continue => continue,
                        SlashOutcome::Send(text) => send_message(&mut conversation, &text).await,
                    }
                    continue;
                }

                send_message(&mut conversation, trimmed).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    rl.save_history(&history_path).ok();
    eprintln!("¡Hasta luego!");
    Ok(())
}

async fn send_message(conversation: &mut ConversationManager, text: &str) {
    match conversation.send(text).await {
        Ok(reply) => println!("bot> {}", reply.text),
        Err(e) => eprintln!("\x1B[31merror: {e}\x1B[0m"),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

enum SlashOutcome {
    Exit,
    Continue,
    /// Send this text as the next user message.
    Send(String),
}

async fn handle_slash_command(
    input: &str,
    rt: &Runtime,
    conversation: &mut ConversationManager,
) -> SlashOutcome {
    let (cmd, arg) = split_command(input);

    match cmd {
        "/exit" | "/quit" => return SlashOutcome::Exit,

        "/voice" => {
            let Some(path) = arg else {
                eprintln!("Usage: /voice <audio file>");
                return SlashOutcome::Continue;
            };
            match transcribe_file(rt.google.as_ref(), Path::new(path)).await {
                Ok(text) if !text.trim().is_empty() => {
                    println!("you (voz)> {text}");
                    return SlashOutcome::Send(text);
                }
                Ok(_) => eprintln!("No se detectó voz en la grabación."),
                Err(e) => eprintln!("\x1B[31mtranscription failed: {e}\x1B[0m"),
            }
        }

        "/history" => {
            for turn in conversation.transcript() {
                let who = match turn.role {
                    Role::User => "you",
                    Role::Assistant => "bot",
                };
                println!("{who}> {}", turn.text);
            }
        }

        "/reset" => {
            *conversation = rt.conversation();
            eprintln!("Conversation reset.");
            if let Some(greeting) = conversation.last() {
                println!("bot> {}", greeting.text);
            }
        }

        "/clear" => {
            // ANSI escape: clear screen and move cursor to top-left.
            eprint!("\x1B[2J\x1B[1;1H");
        }

        "/help" => {
            eprintln!("Commands:");
            eprintln!("  /voice <file>    Transcribe a recording and send it");
            eprintln!("  /history         Print the conversation so far");
            eprintln!("  /reset           Start a new conversation");
            eprintln!("  /clear           Clear the screen");
            eprintln!("  /exit, /quit     Exit the chat");
            eprintln!("  /help            Show this help");
        }

        other => {
            eprintln!("Unknown command: {other}  (type /help for a list)");
        }
    }

    SlashOutcome::Continue
}

fn split_command(input: &str) -> (&str, Option<&str>) {
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|s| !s.is_empty());
    (cmd, arg)
}

pub(crate) async fn transcribe_file(gateway: &dyn AiGateway, path: &Path) -> anyhow::Result<String> {
    let audio = InlineMedia::from_path(path)?;
    Ok(gateway.transcribe_audio(&audio).await?)
}
