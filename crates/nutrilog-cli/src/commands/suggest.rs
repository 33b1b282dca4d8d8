use nutrilog_core::ai::EntryParser;

use super::{ai_service, print_json, CmdResult};

pub async fn run(query: &str) -> CmdResult {
    let suggestions = ai_service()?.suggest(query).await?;
    print_json(&suggestions)?;
    Ok(())
}
