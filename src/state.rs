use std::path::PathBuf;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::Level;

use crate::game::Games;

/// Process configuration, read from the environment (and `.env`).
pub struct BotConfig {
    pub token: String,
    /// Register commands to this guild only (instant) instead of globally.
    pub guild_id: Option<serenity::GuildId>,
    pub data_dir: PathBuf,
    /// Keep everything in process memory; nothing survives a restart.
    pub in_memory: bool,
    /// Newline-separated secret words; the built-in list when unset.
    pub words_path: Option<PathBuf>,
    pub log_level: Level,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();

        let token = dotenv::var("DISCORD_TOKEN").context("DISCORD_TOKEN required")?;
        let guild_id = dotenv::var("DISCORD_GUILD_ID")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(serenity::GuildId::new);
        let data_dir = dotenv::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/semantle"));
        let in_memory = dotenv::var("IN_MEMORY_STORE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let words_path = dotenv::var("SECRET_WORDS_PATH")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        let log_level = dotenv::var("LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse::<Level>().ok())
            .unwrap_or(Level::DEBUG);

        Ok(Self {
            token,
            guild_id,
            data_dir,
            in_memory,
            words_path,
            log_level,
        })
    }
}

pub struct AppState {
    pub games: Games,
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
