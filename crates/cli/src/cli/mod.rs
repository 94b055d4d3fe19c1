pub mod animate;
pub mod ask;
pub mod chat;
pub mod config;
pub mod login;
pub mod transcribe;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use nb_domain::ticket::{Category, Priority};

/// NeuroBOT helpdesk assistant.
#[derive(Debug, Parser)]
#[command(name = "neurobot", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive support chat (default when no subcommand is given).
    Chat,
    /// Send a single message to the assistant and print the reply.
    Ask {
        /// The message to send.
        message: String,
        /// Print the whole transcript as JSON instead of the reply text.
        #[arg(long)]
        json: bool,
    },
    /// Transcribe a recorded audio clip.
    Transcribe {
        /// Audio file (webm, ogg, mp3, wav, m4a).
        path: PathBuf,
    },
    /// Animate an incident screenshot into a short video.
    Animate {
        /// Image of the incident (png, jpg, webp, gif).
        image: PathBuf,
        /// Description of the problem, used to steer the animation.
        description: String,
        /// Directory the video is written to (defaults to `video.output_dir`).
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Also open a ticket for the incident and print it as JSON.
        #[arg(long)]
        ticket: bool,
        #[arg(long, value_enum, default_value = "medium")]
        priority: PriorityArg,
        #[arg(long, value_enum, default_value = "other")]
        category: CategoryArg,
    },
    /// Sign in with the email of the stored profile.
    Login {
        /// Personal or work email.
        email: Option<String>,
        /// Use the built-in demo account.
        #[arg(long, conflicts_with = "email")]
        demo: bool,
    },
    /// Create the local profile.
    Register(RegisterArgs),
    /// Remove the stored profile.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, clap::Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    /// Work email, used to sign in.
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "Employee")]
    pub role: String,
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub tax_id: String,
    #[arg(long)]
    pub office: String,
    #[arg(long, default_value = "")]
    pub department: String,
    #[arg(long, default_value = "")]
    pub phone: String,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
    /// Store the API key in the OS keychain.
    SetSecret,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
    Critical,
}

impl From<PriorityArg> for Priority {
    fn from(p: PriorityArg) -> Self {
        match p {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
            PriorityArg::Critical => Priority::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Hardware,
    Software,
    Network,
    Access,
    Other,
}

impl From<CategoryArg> for Category {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::Hardware => Category::Hardware,
            CategoryArg::Software => Category::Software,
            CategoryArg::Network => Category::Network,
            CategoryArg::Access => Category::Access,
            CategoryArg::Other => Category::Other,
        }
    }
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `NEUROBOT_CONFIG` (or
/// `config.toml` by default). A missing file yields the defaults.
pub fn load_config() -> anyhow::Result<(nb_domain::config::Config, String)> {
    let config_path =
        std::env::var("NEUROBOT_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = load_config_from(&config_path)?;
    Ok((config, config_path))
}

pub fn load_config_from(config_path: &str) -> anyhow::Result<nb_domain::config::Config> {
    if !std::path::Path::new(config_path).exists() {
        return Ok(nb_domain::config::Config::default());
    }
    let raw = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))
}
