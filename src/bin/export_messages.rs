use std::env;
use valentui::config::Config;
use valentui::db::{Database, MessageStore};
use valentui::filter::MessageFilter;
use valentui::gate::AdminGate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <admin_password> [--pending|--fulfilled]", args[0]);
        eprintln!("Prints every stored message as JSON, newest first.");
        std::process::exit(1);
    }

    let filter = if args.iter().any(|a| a == "--pending") {
        MessageFilter::Pending
    } else if args.iter().any(|a| a == "--fulfilled") {
        MessageFilter::Fulfilled
    } else {
        MessageFilter::All
    };

    let config = Config::load();
    let mut gate = AdminGate::new(config.admin.secret.clone());
    if let Err(e) = gate.attempt_unlock(&args[1]) {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    let db = Database::new(
        &config.store.database_url,
        config.store.max_connections,
        config.store.timeout(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to open database: {}", e))?;

    let messages = db
        .list_messages()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list messages: {}", e))?;

    let selected = filter.apply(&messages);
    println!("{}", serde_json::to_string_pretty(&selected)?);

    Ok(())
}
