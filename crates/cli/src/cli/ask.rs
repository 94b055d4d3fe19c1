//! `neurobot ask <message>`: one user turn, one assistant reply.

use std::sync::Arc;

use nb_domain::config::Config;

use crate::bootstrap;

pub async fn ask(config: Arc<Config>, message: String, json: bool) -> anyhow::Result<()> {
    let rt = bootstrap::build_runtime(config)?;
    let mut conversation = rt.conversation();

    let reply = conversation.send(&message).await?.text.clone();

    if json {
        println!("{}", serde_json::to_string_pretty(conversation.transcript())?);
    } else {
        println!("{reply}");
    }
    Ok(())
}
