//! CLI definitions for Formpilot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Formpilot CLI.
#[derive(Parser)]
#[command(name = "formpilot")]
#[command(about = "Resume-driven form autofill for Chrome")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Fill the form on the active browser tab
    Fill,

    /// Resume management commands
    Resume {
        #[command(subcommand)]
        action: ResumeAction,
    },

    /// API credential management commands
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Model selection commands
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show what is configured
    Status,
}

#[derive(Subcommand)]
pub(crate) enum ResumeAction {
    /// Extract text from a resume file (PDF or plain text) and store it
    Set {
        /// Path to the resume file
        file: PathBuf,
    },

    /// Print the stored resume text
    Show,

    /// Remove the stored resume
    Remove,
}

#[derive(Subcommand)]
pub(crate) enum KeyAction {
    /// Store the Gemini API key
    Set {
        /// The API key
        key: String,
    },

    /// Remove the stored key (and any model override)
    Remove,
}

#[derive(Subcommand)]
pub(crate) enum ModelAction {
    /// List models available to the stored credential
    List,

    /// Store a model override
    Set {
        /// Model identifier, e.g. gemini-2.5-flash
        model: String,
    },

    /// Clear the override and use the default model
    Reset,
}
