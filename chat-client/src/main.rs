use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use hms_chat::Role;
use tokio::sync::mpsc;

use chat_client::config::{self, DEFAULT_CONFIG_PATH};
use chat_client::network::{ApiClient, ApiWorker};
use chat_client::ui::{DoctorChatApp, PatientChatApp};

#[derive(Parser, Debug)]
#[command(name = "chat-client", about = "Doctor and patient chat views")]
struct Cli {
    /// Path to the client configuration file
    #[arg(long, env = "HMS_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Backend base URL, overrides the configuration file
    #[arg(long, env = "HMS_BACKEND_URL")]
    backend_url: Option<String>,

    /// Bearer token, overrides the configuration file
    #[arg(long, env = "HMS_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    view: View,
}

#[derive(Subcommand, Debug)]
enum View {
    /// Doctor dashboard with every patient conversation
    Doctor,
    /// Patient conversation with one doctor
    Patient {
        #[arg(long)]
        doctor_id: String,
    },
}

impl View {
    fn role(&self) -> Role {
        match self {
            View::Doctor => Role::Doctor,
            View::Patient { .. } => Role::Patient,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let mut config = config::load_config(&cli.config);
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }
    if let Some(token) = cli.token {
        config.token = token;
    }
    if config.token.is_empty() {
        log::warn!("No token configured; every request will be rejected");
    }

    // UI -> Network
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Network -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    let client = ApiClient::new(&config.backend_url, config.token, cli.view.role());
    tokio::spawn(ApiWorker::new(client, event_tx, cmd_rx).run());

    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let view = cli.view;

    eframe::run_native(
        "HMS Chat",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .ok_or("chat view initialized twice")?;

            let app: Box<dyn eframe::App> = match &view {
                View::Doctor => Box::new(DoctorChatApp::new(cc, cmd_tx.clone(), event_receiver)),
                View::Patient { doctor_id } => Box::new(PatientChatApp::new(
                    cc,
                    doctor_id.clone(),
                    cmd_tx.clone(),
                    event_receiver,
                )),
            };
            Ok(app)
        }),
    )?;

    Ok(())
}
