//! `dealerbot prompt` — show what the provider would be asked, without asking it.

use dealerbot_assistant::prompt;
use dealerbot_catalog::{AssetLibrary, Catalog, JsonWorkbook, MatchPolicy};
use std::sync::Arc;

use super::{load_config, open_store};

pub async fn run(user: &str, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let assets = AssetLibrary::from_config(&config.assets).with_policy(MatchPolicy::from(&config.catalog));
    let catalog = Catalog::new(
        Arc::new(JsonWorkbook::new(&config.catalog.workbook)),
        Arc::new(assets),
        &config.catalog,
    );
    let store = open_store(&config).await;

    let full_prompt = prompt::build_prompt(&config.assistant, &catalog, &store, user, message).await;
    let topic = store.topic(user).await;
    let greeted = store.is_greeted(user).await;
    let history = store.history(user).await;

    println!("{full_prompt}");
    println!();
    println!("---");
    println!("  Topic:    {}", topic.as_deref().unwrap_or("-"));
    println!("  Greeted:  {greeted}");
    println!("  History:  {} turn(s)", history.len());
    Ok(())
}
