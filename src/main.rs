mod commands;
mod game;
mod kv;
mod render;
mod semantle;
mod state;

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use tracing::{error, info, warn};

use game::{Games, PuzzleClock, SystemClock, WordList};
use kv::{CnidariumStore, KvStore, MemoryStore};
use semantle::SemantleClient;
use state::{AppState, BotConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = BotConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    // Fatal before connecting: an empty rotation can never produce a puzzle
    let words = WordList::load(config.words_path.as_deref())?;
    info!(words = words.len(), "Secret word list loaded");

    let store: Arc<dyn KvStore> = if config.in_memory {
        warn!("Using in-memory game store; guesses are lost on restart");
        Arc::new(MemoryStore::new())
    } else {
        let store = CnidariumStore::new(&config.data_dir).await?;
        info!("Game store initialized at {:?}", config.data_dir);
        Arc::new(store)
    };

    let provider = Arc::new(SemantleClient::from_env()?);
    info!("Semantle client initialized");

    let clock = PuzzleClock::new(Arc::new(SystemClock), words);
    let today = clock.today()?;
    info!(
        day = today.day_index,
        puzzle = today.puzzle_number,
        "Puzzle rotation ready"
    );

    let app_state = AppState {
        games: Games::new(store, provider, clock),
    };

    let intents = serenity::GatewayIntents::GUILDS;
    let guild_id = config.guild_id;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: commands::all(),
            on_error: |err| Box::pin(commands::on_error(err)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                let commands = &framework.options().commands;
                info!("Registering {} command(s):", commands.len());
                for cmd in commands {
                    info!("  /{}", cmd.name);
                }

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(ctx, commands, gid).await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(ctx, commands).await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting Semantle Discord bot...");

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }

    Ok(())
}
