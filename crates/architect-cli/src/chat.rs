use std::io::{self, Write};

use anyhow::Result;
use architect_core::{ChatMessage, ChatRole, DialogueController};
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::icons::glyph;

pub fn render(message: &ChatMessage) -> String {
    match message.role {
        ChatRole::User => format!("{} {}", glyph("user").bold().cyan(), message.content),
        ChatRole::Assistant => format!("{} {}", glyph("bot").bold().green(), message.content),
    }
}

/// Ask a single question and return the assistant's reply text.
pub async fn ask(chat: &mut DialogueController, question: &str) -> Result<String> {
    chat.submit_user_message(question)?;
    Ok(chat
        .wait_reply()
        .await
        .map(|reply| reply.content.clone())
        .unwrap_or_default())
}

/// Interactive chat over stdin. `/reset` starts over, `/quit` or EOF exits.
pub async fn run_repl(mut chat: DialogueController) -> Result<()> {
    for message in chat.messages() {
        println!("{}", render(message));
    }
    println!("{}", "/reset — начать заново, /quit — выйти".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", glyph("send").dimmed());
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                chat.reset();
                for message in chat.messages() {
                    println!("{}", render(message));
                }
                continue;
            }
            _ => {}
        }

        if let Err(e) = chat.submit_user_message(&line) {
            eprintln!("{}: {}", "Error".red(), e);
            continue;
        }
        if let Some(reply) = chat.wait_reply().await {
            println!("{}", render(reply));
        }
    }

    Ok(())
}
