//! CLI definitions for Zegoop.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Zegoop CLI.
#[derive(Parser)]
#[command(name = "zegoop")]
#[command(about = "AI explanations for selected text")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the coordinator and the WebSocket channel (default)
    Run {
        /// Listen host (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Inspect or edit stored settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Show or switch AI mode
    Mode {
        #[arg(value_enum)]
        action: Option<ModeAction>,
    },

    /// Run the explain/simplify/define pipeline on some text
    Ask {
        /// Request type (explain, simplify, define, translate, tooltip)
        #[arg(short = 't', long = "type", default_value = "explain")]
        request_type: String,

        /// Text to send; words are joined with spaces
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Make one short call with a provider and key
    TestProvider {
        /// Provider id (openai, anthropic, gemini)
        provider: String,

        /// API key to test
        api_key: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum SettingsAction {
    /// Print the settings record (API keys masked)
    Show,

    /// Set one value; `key.field` edits a field of a nested object
    Set {
        key: String,

        /// JSON value, e.g. `true`, `"openai"`, `{"left":10,"top":20}`
        value: String,
    },

    /// Overwrite the record with factory defaults
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ModeAction {
    Toggle,
    On,
    Off,
}
