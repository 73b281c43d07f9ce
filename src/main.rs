//! Formpilot: resume-driven form autofill for Chrome.
//!
//! The binary hosts the panel controller, a thin trigger/display layer in
//! front of the coordinator, plus the setup commands that own the stored
//! resume, credential and model selection.

mod cli;
mod panel;
mod resume;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use formpilot_coordinator::browser::ChromeTabHost;
use formpilot_coordinator::{Coordinator, FileStore, GeminiClient, Settings};
use formpilot_protocols::store::{keys, KeyValueStore};

use crate::cli::{Cli, Commands, KeyAction, ModelAction, ResumeAction};
use crate::panel::PanelController;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(settings.storage.resolve_dir()));

    match cli.command {
        Commands::Fill => cmd_fill(settings, store).await,
        Commands::Resume { action } => cmd_resume(action, store.as_ref()).await,
        Commands::Key { action } => cmd_key(action, store.as_ref()).await,
        Commands::Model { action } => cmd_model(action, &settings, store.as_ref()).await,
        Commands::Status => cmd_status(store.as_ref()).await,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

async fn cmd_fill(settings: Settings, store: Arc<dyn KeyValueStore>) -> Result<()> {
    let host = Arc::new(ChromeTabHost::new(settings.browser.cdp_url.clone()));
    let coordinator = Coordinator::spawn(host, store, settings);
    let panel = PanelController::new(coordinator);

    let outcome = panel.trigger_autofill().await;
    if outcome.success {
        println!("Form filled: {} field(s) updated.", outcome.filled_count);
        Ok(())
    } else {
        bail!(
            "{}",
            outcome.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }
}

async fn cmd_resume(action: ResumeAction, store: &dyn KeyValueStore) -> Result<()> {
    match action {
        ResumeAction::Set { file } => {
            let text = resume::extract_text(&file)?;
            let filename = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("resume")
                .to_string();
            store.set(keys::RESUME_TEXT, &text).await?;
            store.set(keys::RESUME_FILENAME, &filename).await?;
            println!("Stored resume from {filename} ({} characters).", text.len());
        }
        ResumeAction::Show => match store.get(keys::RESUME_TEXT).await? {
            Some(text) => println!("{text}"),
            None => println!("No resume stored."),
        },
        ResumeAction::Remove => {
            store.remove(keys::RESUME_TEXT).await?;
            store.remove(keys::RESUME_FILENAME).await?;
            println!("Resume removed.");
        }
    }
    Ok(())
}

async fn cmd_key(action: KeyAction, store: &dyn KeyValueStore) -> Result<()> {
    match action {
        KeyAction::Set { key } => {
            let key = key.trim().to_string();
            if key.is_empty() {
                bail!("the API key cannot be empty");
            }
            store.set(keys::API_KEY, &key).await?;
            println!("API key saved ({}).", mask_key(&key));
        }
        KeyAction::Remove => {
            store.remove(keys::API_KEY).await?;
            store.remove(keys::MODEL).await?;
            println!("API key removed.");
        }
    }
    Ok(())
}

async fn cmd_model(
    action: ModelAction,
    settings: &Settings,
    store: &dyn KeyValueStore,
) -> Result<()> {
    match action {
        ModelAction::List => {
            let Some(api_key) = store.get(keys::API_KEY).await? else {
                bail!("no API key stored; run `formpilot key set` first");
            };
            let client = GeminiClient::new(api_key, settings.inference.timeout())?
                .with_base_url(&settings.inference.base_url);
            let models = client.list_models().await?;

            let selected = store
                .get(keys::MODEL)
                .await?
                .unwrap_or_else(|| settings.inference.default_model.clone());
            for model in models {
                let marker = if model.id() == selected { "*" } else { " " };
                println!("{marker} {:<28} {}", model.id(), model.display_name);
            }
        }
        ModelAction::Set { model } => {
            store.set(keys::MODEL, &model).await?;
            println!("Model set to {model}.");
        }
        ModelAction::Reset => {
            store.remove(keys::MODEL).await?;
            println!(
                "Model override cleared; using {}.",
                settings.inference.default_model
            );
        }
    }
    Ok(())
}

async fn cmd_status(store: &dyn KeyValueStore) -> Result<()> {
    match store.get(keys::RESUME_FILENAME).await? {
        Some(name) => println!("Resume:  {name}"),
        None => println!("Resume:  not set"),
    }
    match store.get(keys::API_KEY).await? {
        Some(key) => println!("API key: {}", mask_key(&key)),
        None => println!("API key: not set"),
    }
    match store.get(keys::MODEL).await? {
        Some(model) => println!("Model:   {model}"),
        None => println!("Model:   default"),
    }
    Ok(())
}

/// First and last four characters with the middle elided.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 8 {
        return key.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
