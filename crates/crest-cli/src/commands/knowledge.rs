use anyhow::Result;
use colored::Colorize;

use crest_core::ChatBackend;

use super::{build_controller, env_token};

pub async fn search(query: &str) -> Result<()> {
    let mut controller = build_controller()?;
    controller.bootstrap(env_token()).await;

    // One-shot command: call the backend directly so failures surface
    // instead of being swallowed like the in-session affordance.
    let items = controller.backend().search_knowledge(query).await?;
    if items.is_empty() {
        println!("no results");
        return Ok(());
    }
    for item in &items {
        println!("{} {}", "·".cyan(), item.label);
    }
    Ok(())
}
