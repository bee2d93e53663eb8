use crate::bot::platform::{SerenityPlatform, resolve_actor, resolve_targets};
use crate::bot::reply::{Reply, describe, send};
use crate::bot::{Context, Error};
use crate::models::types::{
    Action, ActionKind, ActionRequest, Actor, Denial, MessageTarget, ModerationReport,
};
use crate::utils::moderation::{moderate, moderate_message};
use crate::utils::permission::{authorize, authorize_invoker};
use once_cell::sync::Lazy;
use poise::serenity_prelude::{self as serenity, ChannelType, CreateChannel, GuildId, UserId};
use regex::Regex;

static LEADING_MENTIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*<@!?\d+>)+\s*").expect("valid mention pattern"));
static MENTION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@!?(\d+)>").expect("valid mention pattern"));

/// The members a command was invoked by and on.
struct Invocation {
    guild_id: Option<GuildId>,
    invoker: Actor,
    targets: Vec<Actor>,
}

fn invoking_message<'a>(ctx: Context<'a>) -> Option<&'a serenity::Message> {
    match ctx {
        poise::Context::Prefix(prefix) => Some(prefix.msg),
        _ => None,
    }
}

fn has_arguments(args: Option<&str>) -> bool {
    args.is_some_and(|text| !text.trim().is_empty())
}

/// Resolve the author and every mentioned user of the invoking message.
async fn gather(ctx: Context<'_>) -> Result<Invocation, Error> {
    let author = ctx.author();
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(Invocation {
            guild_id: None,
            invoker: Actor::new(author.id, author.name.clone()),
            targets: Vec::new(),
        });
    };

    let mentions = invoking_message(ctx)
        .map(|msg| msg.mentions.clone())
        .unwrap_or_default();
    let invoker = resolve_actor(ctx, guild_id, author.id).await?;
    let targets = resolve_targets(ctx, guild_id, &mentions).await;

    Ok(Invocation {
        guild_id: Some(guild_id),
        invoker,
        targets,
    })
}

fn build_request(
    ctx: Context<'_>,
    action: Action,
    invocation: Invocation,
    had_arguments: bool,
) -> ActionRequest {
    let self_exempt = ctx.data().config.is_self_exempt(action.kind());
    ActionRequest::new(action, invocation.invoker, invocation.targets)
        .self_exempt(self_exempt)
        .in_guild(invocation.guild_id.is_some())
        .had_arguments(had_arguments)
}

async fn run_member_action(
    ctx: Context<'_>,
    action: Action,
    args: Option<String>,
) -> Result<(), Error> {
    let kind = action.kind();
    log::info!(
        "{} invoked {:?} in guild {:?}",
        ctx.author().name,
        kind,
        ctx.guild_id()
    );

    let invocation = gather(ctx).await?;
    let guild_id = invocation.guild_id;
    let request = build_request(ctx, action, invocation, has_arguments(args.as_deref()));

    let platform = SerenityPlatform::new(ctx.serenity_context(), guild_id);
    let report = moderate(&platform, &request).await;
    send(ctx, describe(kind, &report)).await
}

async fn run_message_action(ctx: Context<'_>, action: Action) -> Result<(), Error> {
    let kind = action.kind();
    let guild_id = ctx.guild_id();
    let author = ctx.author();
    let self_exempt = ctx.data().config.is_self_exempt(kind);

    let invoker = match guild_id {
        Some(guild_id) => resolve_actor(ctx, guild_id, author.id).await?,
        None => Actor::new(author.id, author.name.clone()),
    };

    // pin and unpin answer to the capability before looking at the reference
    if kind != ActionKind::Delete {
        if let Err(denial) = authorize_invoker(kind, &invoker, guild_id.is_some(), self_exempt) {
            return send(ctx, describe(kind, &ModerationReport::Unauthorized(denial))).await;
        }
    }

    let reference = invoking_message(ctx)
        .and_then(|msg| msg.message_reference.as_ref())
        .and_then(|reference| reference.message_id);
    let Some(message_id) = reference else {
        return send(ctx, Reply::confused("No message referenced.")).await;
    };

    let message = ctx
        .channel_id()
        .message(ctx.serenity_context(), message_id)
        .await?;

    let message_author = match guild_id {
        Some(guild_id) => match resolve_actor(ctx, guild_id, message.author.id).await {
            Ok(actor) => actor,
            // author may have left the server
            Err(_) => Actor::new(message.author.id, message.author.name.clone()),
        },
        None => Actor::new(message.author.id, message.author.name.clone()),
    };

    let target = MessageTarget {
        id: message.id,
        channel_id: message.channel_id,
        author: message_author,
        pinned: message.pinned,
    };
    let platform = SerenityPlatform::new(ctx.serenity_context(), guild_id);
    let report = moderate_message(
        &platform,
        action,
        invoker,
        &target,
        guild_id.is_some(),
        self_exempt,
    )
    .await;
    send(ctx, describe(kind, &report)).await
}

/// Bans mentioned users from the server.
///
/// Requires Ban Members.
#[poise::command(prefix_command, category = "Moderation")]
pub async fn ban(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    let delete_message_days = ctx.data().config.bot.ban_delete_message_days;
    run_member_action(ctx, Action::Ban { delete_message_days }, args).await
}

/// Kicks mentioned users from the server.
///
/// Requires Kick Members.
#[poise::command(prefix_command, category = "Moderation")]
pub async fn kick(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    run_member_action(ctx, Action::Kick, args).await
}

/// Server mutes mentioned users, or yourself if nobody is mentioned.
///
/// Requires Mute Members.
#[poise::command(prefix_command, category = "Moderation")]
pub async fn mute(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    run_member_action(ctx, Action::Mute, args).await
}

/// Server unmutes mentioned users.
///
/// Requires Mute Members.
#[poise::command(prefix_command, category = "Moderation")]
pub async fn unmute(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    run_member_action(ctx, Action::Unmute, args).await
}

/// Server deafens mentioned users, or yourself if nobody is mentioned.
///
/// Requires Deafen Members.
#[poise::command(prefix_command, category = "Moderation")]
pub async fn deafen(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    run_member_action(ctx, Action::Deafen, args).await
}

/// Server undeafens mentioned users.
///
/// Requires Deafen Members.
#[poise::command(prefix_command, category = "Moderation")]
pub async fn undeafen(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    run_member_action(ctx, Action::Undeafen, args).await
}

/// Disconnects mentioned users from voice, or yourself if nobody is mentioned.
///
/// Requires Move Members, except when disconnecting yourself.
#[poise::command(prefix_command, aliases("dc"), category = "Moderation")]
pub async fn disconnect(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    run_member_action(ctx, Action::Disconnect, args).await
}

/// Ends mentioned users' streams by bouncing them through a temporary channel.
///
/// Requires Move Members.
#[poise::command(
    prefix_command,
    aliases("bo", "sv", "stopvid", "stopvideo"),
    category = "Moderation"
)]
pub async fn blackout(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    let invocation = gather(ctx).await?;
    let guild_id = invocation.guild_id;
    let request = build_request(ctx, Action::Blackout, invocation, has_arguments(args.as_deref()));

    let mut platform = SerenityPlatform::new(ctx.serenity_context(), guild_id);
    let mut scratch = None;
    if let Some(guild_id) = guild_id {
        if authorize(&request).is_ok() && !request.targets.is_empty() {
            let name = ctx.data().config.bot.scratch_channel_name.clone();
            let channel = guild_id
                .create_channel(
                    ctx.serenity_context(),
                    CreateChannel::new(name).kind(ChannelType::Voice),
                )
                .await?;
            platform = platform.with_scratch(channel.id);
            scratch = Some(channel.id);
        }
    }

    let report = moderate(&platform, &request).await;

    if let Some(channel) = scratch {
        if let Err(e) = channel.delete(ctx.serenity_context()).await {
            log::error!("failed to delete scratch channel {}: {}", channel, e);
        }
    }

    send(ctx, describe(ActionKind::Blackout, &report)).await
}

/// Moves mentioned users into your voice channel.
///
/// Requires Move Members.
#[poise::command(prefix_command, aliases("drag"), category = "Moderation")]
pub async fn summon(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    if ctx.guild_id().is_none() {
        let report = ModerationReport::Unauthorized(Denial::NotInGuild);
        return send(ctx, describe(ActionKind::Move, &report)).await;
    }

    let invocation = gather(ctx).await?;
    let self_exempt = ctx.data().config.is_self_exempt(ActionKind::Move);
    if let Err(denial) = authorize_invoker(ActionKind::Move, &invocation.invoker, true, self_exempt) {
        let report = ModerationReport::Unauthorized(denial);
        return send(ctx, describe(ActionKind::Move, &report)).await;
    }

    let Some(voice) = invocation.invoker.voice else {
        return send(ctx, Reply::confused("You're not in a voice channel.")).await;
    };

    let guild_id = invocation.guild_id;
    let action = Action::Move {
        channel: voice.channel_id,
    };
    let request = build_request(ctx, action, invocation, has_arguments(args.as_deref()));
    let platform = SerenityPlatform::new(ctx.serenity_context(), guild_id);
    let report = moderate(&platform, &request).await;
    send(ctx, describe(ActionKind::Move, &report)).await
}

/// Changes the nickname of mentioned users, or your own if nobody is mentioned.
///
/// Usage: `nickname [@user...] <new nickname>`. Changing someone else's
/// nickname requires Manage Nicknames.
#[poise::command(prefix_command, aliases("nick"), category = "Moderation")]
pub async fn nickname(ctx: Context<'_>, #[rest] args: Option<String>) -> Result<(), Error> {
    let Some(text) = args.as_deref().filter(|text| !text.trim().is_empty()) else {
        return send(ctx, Reply::confused("No user mentioned.")).await;
    };

    let nick = strip_leading_mentions(text);
    if nick.is_empty() {
        return send(ctx, Reply::say("No new nickname provided.")).await;
    }

    let mut invocation = gather(ctx).await?;
    // mentions after the nickname are part of the nickname, not targets
    let leading = leading_mention_ids(text);
    invocation.targets = leading
        .iter()
        .filter_map(|id| invocation.targets.iter().find(|target| target.id == *id))
        .cloned()
        .collect();

    let guild_id = invocation.guild_id;
    let action = Action::Nickname {
        nick: nick.to_string(),
    };
    let request = build_request(ctx, action, invocation, !leading.is_empty());
    let platform = SerenityPlatform::new(ctx.serenity_context(), guild_id);
    let report = moderate(&platform, &request).await;
    send(ctx, describe(ActionKind::Nickname, &report)).await
}

/// User ids mentioned before the first non-mention token, in written order.
fn leading_mention_ids(text: &str) -> Vec<UserId> {
    let Some(found) = LEADING_MENTIONS.find(text) else {
        return Vec::new();
    };

    let mut ids: Vec<UserId> = Vec::new();
    for captures in MENTION_ID.captures_iter(found.as_str()) {
        let Ok(id) = captures[1].parse::<u64>() else {
            continue;
        };
        if id != 0 && !ids.iter().any(|known| known.get() == id) {
            ids.push(UserId::new(id));
        }
    }
    ids
}

fn strip_leading_mentions(text: &str) -> &str {
    match LEADING_MENTIONS.find(text) {
        Some(found) => text[found.end()..].trim(),
        None => text.trim(),
    }
}

/// Pins the message you replied to.
///
/// Requires Manage Messages.
#[poise::command(prefix_command, category = "Moderation")]
pub async fn pin(ctx: Context<'_>) -> Result<(), Error> {
    run_message_action(ctx, Action::Pin).await
}

/// Unpins the message you replied to.
///
/// Requires Manage Messages.
#[poise::command(prefix_command, category = "Moderation")]
pub async fn unpin(ctx: Context<'_>) -> Result<(), Error> {
    run_message_action(ctx, Action::Unpin).await
}

/// Deletes the message you replied to.
///
/// Your own messages can always be deleted; anyone else's requires Manage
/// Messages.
#[poise::command(prefix_command, rename = "1984", category = "Moderation")]
pub async fn orwell(ctx: Context<'_>) -> Result<(), Error> {
    run_message_action(ctx, Action::Delete).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_leading_mentions() {
        assert_eq!(strip_leading_mentions("<@123> Glop"), "Glop");
        assert_eq!(strip_leading_mentions("<@!123>  <@456> Big Glop "), "Big Glop");
        assert_eq!(strip_leading_mentions("Glop <@123>"), "Glop <@123>");
        assert_eq!(strip_leading_mentions("<@123>"), "");
    }

    #[test]
    fn test_leading_mention_ids() {
        assert_eq!(
            leading_mention_ids("<@1> <@!2> Glop <@5>"),
            vec![UserId::new(1), UserId::new(2)]
        );
        assert_eq!(leading_mention_ids("<@3> <@3> Glop"), vec![UserId::new(3)]);
    }

    #[test]
    fn test_mention_after_nickname_is_not_a_target() {
        let text = "Big Glop <@5>";
        assert!(leading_mention_ids(text).is_empty());
        assert_eq!(strip_leading_mentions(text), "Big Glop <@5>");
    }

    #[test]
    fn test_has_arguments() {
        assert!(!has_arguments(None));
        assert!(!has_arguments(Some("   ")));
        assert!(has_arguments(Some("@nobody")));
    }
}
