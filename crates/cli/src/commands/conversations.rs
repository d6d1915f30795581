//! Conversation store maintenance: `greeting reset` and `topics`.

use chrono::Utc;

use super::{load_config, open_store};

pub async fn reset_greeting(user: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let store = open_store(&config).await;

    let cleared = store.reset_greeting(user.as_deref()).await;
    store.flush().await;

    match user {
        Some(user) if cleared == 0 => println!("ℹ️  {user} was not marked as greeted"),
        Some(user) => println!("✅ Greeting reset for {user}"),
        None => println!("✅ Greeting reset for {cleared} customer(s)"),
    }
    Ok(())
}

pub async fn topics() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let store = open_store(&config).await;
    let window = store.policy().topic_window;
    let now = Utc::now();

    let mut records = store.topics().await;
    if records.is_empty() {
        println!("No remembered topics.");
        return Ok(());
    }
    records.sort_by(|a, b| b.set_at.cmp(&a.set_at));

    println!("🧠 Remembered topics");
    println!("====================");
    for r in records {
        let age = now - r.set_at;
        let state = if age <= window { "active" } else { "expired" };
        println!(
            "  {:<28} {:<12} {:>4} min ago  ({state})",
            r.user_id,
            r.topic,
            age.num_minutes()
        );
    }
    Ok(())
}
