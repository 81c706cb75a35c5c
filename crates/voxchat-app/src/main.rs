//! VoxChat application binary - composition root.
//!
//! Ties together all VoxChat crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Build the HTTP clients for the responder and transcription services
//! 3. Wire the chat interaction controller over the speech adapter
//! 4. Run the interactive terminal loop (typed text, `/listen`, `/upload`)
//!
//! Speech recognition is a hard dependency: if the platform recognizer is
//! unavailable, the binary reports it and exits instead of degrading.

mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use voxchat_chat::{ChatController, DispatchOutcome, ToggleOutcome, UploadOutcome, GREETING};
use voxchat_client::{ResponderClient, TranscriptionClient};
use voxchat_core::config::VoxConfig;
use voxchat_core::types::{AudioSource, Role, Severity};
use voxchat_speech::{SpeechRecognizer, SystemRecognizer};

use cli::CliArgs;

const HELP: &str = "\
commands:
  /listen        toggle speech recognition on or off
  /upload PATH   transcribe an audio file into the input line
  /help          show this help
  /quit          exit
anything else is sent as a chat message";

/// Print conversation entries appended since the last render.
fn render_new_entries(controller: &ChatController, rendered: &mut usize) {
    let log = controller.conversation();
    for entry in &log[*rendered..] {
        let tag = match entry.sender {
            Role::User => "you",
            Role::Assistant => "bot",
            Role::Error => "err",
        };
        println!("[{tag}] {}", entry.text);
    }
    *rendered = log.len();
}

/// Print the pending notification, if any, and dismiss it.
fn render_notification(controller: &ChatController) {
    if let Some(n) = controller.notification() {
        let marker = match n.severity {
            Severity::Info => "*",
            Severity::Success => "+",
            Severity::Error => "!",
        };
        println!("({marker}) {}", n.message);
        controller.dismiss_notification();
    }
}

async fn run(controller: ChatController) -> Result<(), Box<dyn std::error::Error>> {
    let mut rendered = 0usize;
    // Welcome banner is decoration only; it never enters the log.
    println!("[bot] {GREETING}");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        // Surface any speech transcript mirrored into the buffer since the
        // last prompt, so the user sees what Enter would send.
        let pending = controller.input();
        if pending.is_empty() {
            stdout.write_all(b"> ").await?;
        } else {
            stdout
                .write_all(format!("> {pending}\n> ").as_bytes())
                .await?;
        }
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();

        match line.as_str() {
            "/quit" => break,
            "/help" => println!("{HELP}"),
            "/listen" => {
                match controller.toggle_listening() {
                    ToggleOutcome::Started | ToggleOutcome::Stopped => {}
                    ToggleOutcome::Ignored => {
                        tracing::debug!("Listen toggle had no effect");
                    }
                }
                render_notification(&controller);
            }
            _ if line.starts_with("/upload") => {
                let path = line.trim_start_matches("/upload").trim();
                if path.is_empty() {
                    println!("usage: /upload PATH");
                    continue;
                }
                match AudioSource::from_path(Path::new(path)) {
                    Ok(source) => {
                        let mut progress = controller.subscribe_progress();
                        let meter = tokio::spawn(async move {
                            while progress.changed().await.is_ok() {
                                let pct = *progress.borrow_and_update();
                                if pct > 0 {
                                    println!("uploading... {pct}%");
                                }
                            }
                        });
                        let outcome = controller.upload_audio(source).await;
                        meter.abort();
                        if outcome == UploadOutcome::Ignored {
                            println!("busy; try again when the current operation finishes");
                        }
                        render_notification(&controller);
                        render_new_entries(&controller, &mut rendered);
                    }
                    Err(e) => println!("cannot read {path}: {e}"),
                }
            }
            "" => {
                // Bare Enter sends whatever the buffer holds (typed earlier
                // or mirrored from speech).
                if controller.can_send() {
                    controller.send_message().await;
                    render_notification(&controller);
                    render_new_entries(&controller, &mut rendered);
                }
            }
            _ => {
                controller.set_input(line);
                if controller.send_message().await == DispatchOutcome::Ignored {
                    println!("busy; try again when the current operation finishes");
                }
                render_notification(&controller);
                render_new_entries(&controller, &mut rendered);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first so its log level can seed the filter.
    let config_file = args.resolve_config_path();
    let mut config = VoxConfig::load_or_default(&config_file);
    config.server.base_url = args.resolve_base_url(&config.server.base_url);

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting VoxChat v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");
    tracing::info!(base_url = %config.server.base_url, "Using chat server");

    // HTTP clients for the two consumed services.
    let responder = Arc::new(ResponderClient::new(&config.server.base_url)?);
    let transcriber = Arc::new(TranscriptionClient::new(
        &config.server.base_url,
        Duration::from_secs(config.upload.timeout_secs),
    )?);

    let recognizer: Arc<dyn SpeechRecognizer> = Arc::new(SystemRecognizer::new());
    let controller = ChatController::new(responder, transcriber, recognizer, &config);

    // Speech recognition is required, not optional.
    if !controller.speech_supported() {
        eprintln!("Speech recognition is not available on this platform.");
        eprintln!("VoxChat requires it; please run in a supported environment.");
        tracing::error!("Speech recognition unsupported; exiting");
        std::process::exit(1);
    }

    // Mirror the live transcript into the input buffer for the session.
    let mirror = controller.clone();
    tokio::spawn(async move {
        mirror.mirror_transcript().await;
    });

    run(controller).await
}
