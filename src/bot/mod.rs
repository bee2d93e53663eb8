pub mod commands;
pub mod data;
pub mod platform;
pub mod reply;

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, data::BotData, Error>;

pub fn commands() -> Vec<poise::Command<data::BotData, Error>> {
    vec![
        commands::moderation::ban(),
        commands::moderation::kick(),
        commands::moderation::mute(),
        commands::moderation::unmute(),
        commands::moderation::deafen(),
        commands::moderation::undeafen(),
        commands::moderation::disconnect(),
        commands::moderation::blackout(),
        commands::moderation::summon(),
        commands::moderation::nickname(),
        commands::moderation::pin(),
        commands::moderation::unpin(),
        commands::moderation::orwell(),
        commands::social::bontibi(),
        commands::social::gaeree(),
        commands::social::momtibi(),
        commands::social::bruhvy(),
        commands::social::ree(),
        commands::help::help(),
    ]
}
