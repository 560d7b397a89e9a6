// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `confab shell` command implementation.
//!
//! Launches an interactive chat REPL backed by the same chat service the
//! gateway serves. History persists across sessions under the given user id
//! and is replayed on startup.

use std::sync::Arc;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use confab_chat::ChatService;
use confab_config::ConfabConfig;
use confab_core::ConfabError;
use confab_core::traits::{ImageGenerator, TextGenerator};
use confab_core::types::{ChatTurn, IMAGE_REPLY_PREFIX, TurnRole, UserIdentity};
use confab_gemini::GeminiGenerator;
use confab_huggingface::HuggingFaceGenerator;
use confab_storage::ChatStore;

/// Characters of a data URL shown before the preview cuts off.
const DATA_URL_PREVIEW_LEN: usize = 48;

/// Runs the `confab shell` interactive REPL.
///
/// Replays the user's stored history, then submits each line through the
/// chat service so the session is persisted exactly like gateway traffic.
pub async fn run_shell(config: ConfabConfig, user_id: &str) -> Result<(), ConfabError> {
    let store = Arc::new(ChatStore::open(&config.storage).await?);

    let text = GeminiGenerator::from_config(&config.gemini)?
        .map(|g| Arc::new(g) as Arc<dyn TextGenerator>);
    if text.is_none() {
        eprintln!(
            "{}",
            "no Gemini API key configured; text replies will use the fallback message".yellow()
        );
    }
    let image = HuggingFaceGenerator::from_config(&config.huggingface)?
        .map(|g| Arc::new(g) as Arc<dyn ImageGenerator>);

    let chat = ChatService::new(store.clone(), text, image);
    let user = UserIdentity::new(user_id);

    println!("{}", "confab shell".bold().green());
    println!(
        "Type {} to exit, {} to request an image.\n",
        "/quit".yellow(),
        "/imagine <prompt>".yellow()
    );

    // Replay stored history so the session picks up where it left off.
    let history = chat.history(&user).await?;
    if !history.is_empty() {
        println!("{}", format!("{} stored turns", history.len()).dimmed());
        for turn in &history {
            print_turn(turn);
        }
        println!();
    }

    let mut rl = DefaultEditor::new()
        .map_err(|e| ConfabError::Internal(format!("failed to initialize readline: {e}")))?;

    let prompt = format!("{}> ", "confab".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                // Presentation-only placeholder; erased before the reply
                // prints and never persisted.
                eprint!("{}", "thinking...".dimmed());
                std::io::Write::flush(&mut std::io::stderr()).ok();

                let result = chat.submit(&user, trimmed).await;
                eprint!("\r           \r");

                match result {
                    Ok(reply) => print_turn(&reply),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    store.close().await?;
    println!("{}", "goodbye".dimmed());
    Ok(())
}

/// Prints one turn with a role-colored prefix.
fn print_turn(turn: &ChatTurn) {
    let content = preview_content(&turn.content);
    match turn.role {
        TurnRole::User => println!("{} {content}", "you:".bold()),
        TurnRole::Model => println!("{} {content}", "confab:".bold().cyan()),
    }
}

/// Shortens image replies; a full data URL is unreadable in a terminal.
/// Counts characters, not bytes, so the cut never lands mid-character.
fn preview_content(content: &str) -> String {
    match content.strip_prefix(IMAGE_REPLY_PREFIX) {
        Some(data_url) => {
            let chars = data_url.chars().count();
            if chars <= DATA_URL_PREVIEW_LEN {
                return content.to_string();
            }
            let head: String = data_url.chars().take(DATA_URL_PREVIEW_LEN).collect();
            format!("{IMAGE_REPLY_PREFIX}{head}... ({chars} chars)")
        }
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_plain_replies() {
        assert_eq!(preview_content("hello there"), "hello there");
    }

    #[test]
    fn preview_keeps_short_image_replies() {
        let reply = format!("{IMAGE_REPLY_PREFIX}data:image/png;base64,UE5H");
        assert_eq!(preview_content(&reply), reply);
    }

    #[test]
    fn preview_truncates_long_data_urls() {
        let data_url = format!("data:image/png;base64,{}", "A".repeat(2000));
        let reply = format!("{IMAGE_REPLY_PREFIX}{data_url}");

        let preview = preview_content(&reply);
        assert!(preview.starts_with(IMAGE_REPLY_PREFIX));
        assert!(preview.len() < reply.len());
        assert!(preview.contains("... (2022 chars)"));
    }

    #[test]
    fn preview_keeps_short_multibyte_image_replies() {
        // 49 bytes of payload but only 17 characters; stays whole.
        let reply = format!("{IMAGE_REPLY_PREFIX}a{}", "€".repeat(16));
        assert_eq!(preview_content(&reply), reply);
    }

    #[test]
    fn preview_truncates_multibyte_data_urls() {
        let reply = format!("{IMAGE_REPLY_PREFIX}{}", "é".repeat(60));

        let preview = preview_content(&reply);
        let expected = format!("{IMAGE_REPLY_PREFIX}{}... (60 chars)", "é".repeat(48));
        assert_eq!(preview, expected);
    }

    #[test]
    fn preview_leaves_long_plain_replies_alone() {
        let reply = "B".repeat(2000);
        assert_eq!(preview_content(&reply), reply);
    }
}
