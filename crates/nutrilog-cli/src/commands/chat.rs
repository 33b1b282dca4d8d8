//! Coach chat. History lives only for the duration of the session.

use std::io::{BufRead, Write};

use nutrilog_core::ai::{ChatService, ChatTurn, DynAiService};
use nutrilog_core::UserProfile;

use super::{ai_service, open_store, CmdResult};

const GREETING: &str = "Hi! I'm **NutriAI**. Ask me anything about food, macros or fasting.";

async fn exchange(
    ai: &DynAiService,
    history: &mut Vec<ChatTurn>,
    message: &str,
    profile: Option<&UserProfile>,
) -> Result<String, Box<dyn std::error::Error>> {
    let reply = ai.reply(history, message, profile).await?;
    history.push(ChatTurn::user(message));
    history.push(ChatTurn::model(reply.clone()));
    Ok(reply)
}

pub async fn run(message: Option<String>) -> CmdResult {
    let store = open_store()?;
    let profile = store.profile()?;
    let ai = ai_service()?;
    let mut history = Vec::new();

    if let Some(message) = message {
        let reply = exchange(&ai, &mut history, &message, profile.as_ref()).await?;
        println!("{reply}");
        return Ok(());
    }

    println!("{GREETING}");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }
        let reply = exchange(&ai, &mut history, line, profile.as_ref()).await?;
        println!("{reply}");
    }
    Ok(())
}
