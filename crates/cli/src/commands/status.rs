//! `dealerbot status` and `dealerbot init`.

use dealerbot_catalog::AssetLibrary;
use dealerbot_config::AppConfig;
use dealerbot_core::memory::SnapshotKind;
use dealerbot_memory::FileSnapshotStore;

use super::load_config;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let assets = AssetLibrary::from_config(&config.assets);
    let snapshots = FileSnapshotStore::new(&config.memory.data_dir);

    println!("🏍️  dealerbot Status");
    println!("===================");
    println!("  Config dir:    {}", AppConfig::config_dir().display());
    println!("  Workbook:      {}", config.catalog.workbook.display());
    println!("  Cache expiry:  {} min", config.catalog.cache_expiry_minutes);
    println!(
        "  Matching:      accept > {:.2}, containment {:.2}",
        config.catalog.min_score, config.catalog.containment_floor
    );
    println!("  Motor folders: {} ({})", assets.motor_folders().len(), config.assets.motors_dir.display());
    println!(
        "  Price lists:   {} ({})",
        assets.price_list_files().len(),
        config.assets.price_lists_dir.display()
    );
    println!("  Data dir:      {}", config.memory.data_dir.display());
    println!(
        "  History:       {} turns / {} min, topics {} min",
        config.memory.max_history, config.memory.history_window_minutes, config.memory.topic_window_minutes
    );
    println!("  Persona:       {} ({})", config.assistant.persona_name, config.assistant.dealer_name);

    println!();
    if config.catalog.workbook.exists() {
        println!("  ✅ Workbook found");
    } else {
        println!("  ⚠️  Workbook missing — export the dealer spreadsheet to {}", config.catalog.workbook.display());
    }
    for kind in [SnapshotKind::Topics, SnapshotKind::Greeted] {
        let path = snapshots.path(kind);
        if path.exists() {
            println!("  ✅ {} snapshot: {}", kind.as_str(), path.display());
        } else {
            println!("  ⚠️  No {} snapshot yet", kind.as_str());
        }
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file — run `dealerbot init` to write one");
    }

    Ok(())
}

pub fn init(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = AppConfig::config_dir();
    let path = dir.join("config.toml");

    if path.exists() && !force {
        println!("⚠️  {} already exists (use --force to overwrite)", path.display());
        return Ok(());
    }

    std::fs::create_dir_all(&dir)?;
    std::fs::write(&path, AppConfig::default_toml())?;
    println!("✅ Wrote {}", path.display());
    Ok(())
}
