use crate::bot::reply::{Reply, send};
use crate::bot::{Context, Error};
use crate::utils::report::join_names;
use poise::serenity_prelude::{CreateMessage, Mentionable, User};

/// Who a social command is aimed at: the mentions, or the author when the
/// message has no arguments at all.
fn addressees(ctx: Context<'_>, args: Option<&str>) -> Result<Vec<String>, Reply> {
    let mentions: Vec<User> = match ctx {
        poise::Context::Prefix(prefix) => prefix.msg.mentions.clone(),
        _ => Vec::new(),
    };

    if !mentions.is_empty() {
        return Ok(mentions.iter().map(|user| user.mention().to_string()).collect());
    }
    if args.is_some_and(|text| !text.trim().is_empty()) {
        return Err(Reply::confused("Unrecognized user(s)."));
    }
    Ok(vec![ctx.author().mention().to_string()])
}

fn greeting(names: &[String]) -> String {
    match names {
        [one] => format!("Bontibi, {}!", one),
        _ => format!("Bonivobis, {}!", join_names(names)),
    }
}

fn insult(names: &[String]) -> String {
    match names {
        [one] => format!("{} is gaeree!", one),
        _ => format!("{} are gaeree!", join_names(names)),
    }
}

fn mom_insult(names: &[String]) -> String {
    match names {
        [one] => format!("{} momtibi gaeree lol", one),
        _ => format!("{} momsvobis gaeree lmfao", join_names(names)),
    }
}

async fn address(
    ctx: Context<'_>,
    args: Option<String>,
    render: fn(&[String]) -> String,
) -> Result<(), Error> {
    let reply = match addressees(ctx, args.as_deref()) {
        Ok(names) => Reply::say(render(&names)),
        Err(reply) => reply,
    };
    send(ctx, reply).await
}

async fn say_tts(ctx: Context<'_>, text: &str) -> Result<(), Error> {
    ctx.channel_id()
        .send_message(ctx.serenity_context(), CreateMessage::new().content(text).tts(true))
        .await?;
    Ok(())
}

/// Greets mentioned users, or you if nobody is mentioned.
#[poise::command(prefix_command, category = "Litwa")]
pub async fn bontibi(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    address(ctx, args, greeting).await
}

/// Insults mentioned users, or you if nobody is mentioned.
#[poise::command(prefix_command, category = "Litwa")]
pub async fn gaeree(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    address(ctx, args, insult).await
}

/// Insults mentioned users' mothers, or yours if nobody is mentioned.
#[poise::command(prefix_command, category = "Litwa")]
pub async fn momtibi(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    address(ctx, args, mom_insult).await
}

/// Bruhvy.
#[poise::command(prefix_command, category = "Litwa")]
pub async fn bruhvy(ctx: Context<'_>) -> Result<(), Error> {
    say_tts(ctx, "Bruhvy.").await
}

/// REE.
#[poise::command(prefix_command, category = "Litwa")]
pub async fn ree(ctx: Context<'_>) -> Result<(), Error> {
    say_tts(ctx, "REE-EEE-EEE-EEE-EEE-EEE!").await
}
