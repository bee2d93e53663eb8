mod bot;
mod models;
mod utils;

use std::env;
use std::sync::Arc;

use anyhow::anyhow;
use log::LevelFilter;
use poise::serenity_prelude as serenity;

use crate::bot::data::BotData;
use crate::utils::config::{ConfigManager, DEFAULT_CONFIG_PATH};
use crate::utils::logger::BotLogger;

#[tokio::main]
async fn main() -> Result<(), bot::Error> {
    dotenvy::dotenv().ok();

    // the logger reads its file and level from here, so errors before it exist go to stderr
    let config_path = env::var("BOT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config_manager =
        ConfigManager::new(&config_path).map_err(|e| anyhow!("Failed to load {}: {}", config_path, e))?;

    let level = config_manager
        .bot
        .log_level
        .parse()
        .unwrap_or(LevelFilter::Info);
    if let Err(e) = BotLogger::init(config_manager.bot.log_file.as_deref(), level) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let token =
        env::var("DISCORD_TOKEN").map_err(|_| anyhow!("Expected DISCORD_TOKEN in the environment"))?;

    let prefix = config_manager.bot.prefix.clone();
    let config = Arc::new(config_manager);

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_VOICE_STATES
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let setup_config = Arc::clone(&config);
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: crate::bot::commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            on_error: |error| {
                Box::pin(async move {
                    log::error!("Command error: {}", error);

                    if let poise::FrameworkError::Command { ctx, .. } = error {
                        if let Err(why) = ctx.say("Something went wrong.").await {
                            log::error!("Failed to send error message: {}", why);
                        }
                    } else if let Err(e) = poise::builtins::on_error(error).await {
                        log::error!("Error while handling error: {}", e);
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            let config = Arc::clone(&setup_config);
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                log::info!("{} connected to Discord.", ready.user.name);
                Ok(BotData { config })
            })
        })
        .build();

    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow!("Failed to create Discord client: {}", e))?;

    client
        .start()
        .await
        .map_err(|e| anyhow!("Client error: {}", e))?;

    Ok(())
}
