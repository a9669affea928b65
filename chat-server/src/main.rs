use chat_server::ChatServer;
use chat_server::config::{self, DEFAULT_CONFIG_PATH};
use clap::Parser;
use dotenvy::dotenv;
use tokio::signal;

#[derive(Parser)]
#[command(
    name = "chat-server",
    version,
    about = "Patient/doctor messaging API"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, env = "HMS_CONFIG", default_value = DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// SQLite database file, `:memory:` for a throw-away store
    #[arg(long, env = "HMS_DB_PATH", value_name = "FILE")]
    db: Option<String>,
    /// Address to listen on, overrides the config file
    #[arg(long, env = "HMS_LISTEN", value_name = "ADDR")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut server_config = config::load_config(&cli.config);
    if let Some(db) = cli.db {
        server_config.database_path = db;
    }
    if let Some(listen) = cli.listen {
        server_config.listen_addr = listen;
    }

    log::info!("Starting chat server...");
    let server = ChatServer::new(&server_config)?;

    tokio::select! {
        result = server.run() => {
            if let Err(err) = result {
                log::error!("Chat server error: {}", err);
            }
        }
        _ = signal::ctrl_c() => {
            log::info!("Received shutdown signal, stopping chat server...");
        }
    }

    log::info!("Final statistics: {} stored messages", server.stored_messages());

    Ok(())
}
