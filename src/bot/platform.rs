use poise::serenity_prelude::{
    self as serenity, ChannelId, EditMember, GuildId, Member, Permissions, UserId,
};

use crate::bot::{Context, Error};
use crate::models::types::{Action, Actor, MessageTarget, VoicePresence};
use crate::utils::executor::{ModerationPlatform, PlatformError};

/// Carries out moderation actions against one guild over serenity's HTTP client.
pub struct SerenityPlatform<'a> {
    ctx: &'a serenity::Context,
    guild_id: Option<GuildId>,
    scratch: Option<ChannelId>,
}

impl<'a> SerenityPlatform<'a> {
    pub fn new(ctx: &'a serenity::Context, guild_id: Option<GuildId>) -> Self {
        Self {
            ctx,
            guild_id,
            scratch: None,
        }
    }

    /// Voice channel that blackout bounces members through.
    pub fn with_scratch(mut self, channel: ChannelId) -> Self {
        self.scratch = Some(channel);
        self
    }

    fn guild(&self) -> Result<GuildId, PlatformError> {
        self.guild_id.ok_or(PlatformError::NotInGuild)
    }

    async fn edit(&self, user: UserId, builder: EditMember<'_>) -> Result<(), PlatformError> {
        self.guild()?.edit_member(self.ctx, user, builder).await?;
        Ok(())
    }
}

impl ModerationPlatform for SerenityPlatform<'_> {
    async fn perform(&self, action: &Action, target: &Actor) -> Result<(), PlatformError> {
        let user = target.id;
        match action {
            Action::Ban {
                delete_message_days,
            } => {
                self.guild()?
                    .ban(self.ctx, user, *delete_message_days)
                    .await?
            }
            Action::Kick => self.guild()?.kick(self.ctx, user).await?,
            Action::Mute => self.edit(user, EditMember::new().mute(true)).await?,
            Action::Unmute => self.edit(user, EditMember::new().mute(false)).await?,
            Action::Deafen => self.edit(user, EditMember::new().deafen(true)).await?,
            Action::Undeafen => self.edit(user, EditMember::new().deafen(false)).await?,
            Action::Disconnect => {
                self.edit(user, EditMember::new().disconnect_member())
                    .await?
            }
            Action::Move { channel } => {
                self.edit(user, EditMember::new().voice_channel(*channel))
                    .await?
            }
            Action::Blackout => {
                let scratch = self.scratch.ok_or(PlatformError::NoScratchChannel)?;
                let home = target
                    .voice
                    .map(|voice| voice.channel_id)
                    .ok_or(PlatformError::NotInVoice)?;
                self.edit(user, EditMember::new().voice_channel(scratch))
                    .await?;
                self.edit(user, EditMember::new().voice_channel(home))
                    .await?;
            }
            Action::Nickname { nick } => {
                self.edit(user, EditMember::new().nickname(nick.as_str()))
                    .await?
            }
            Action::Pin | Action::Unpin | Action::Delete => {
                return Err(PlatformError::Unsupported(action.kind()));
            }
        }
        Ok(())
    }

    async fn perform_on_message(
        &self,
        action: &Action,
        message: &MessageTarget,
    ) -> Result<(), PlatformError> {
        let channel = message.channel_id;
        match action {
            Action::Pin => channel.pin(self.ctx, message.id).await?,
            Action::Unpin => channel.unpin(self.ctx, message.id).await?,
            Action::Delete => channel.delete_message(self.ctx, message.id).await?,
            _ => return Err(PlatformError::Unsupported(action.kind())),
        }
        Ok(())
    }
}

/// Snapshot a guild member: permissions and voice state come from the cache.
pub async fn resolve_actor(
    ctx: Context<'_>,
    guild_id: GuildId,
    user_id: UserId,
) -> Result<Actor, Error> {
    let member = guild_id.member(ctx.serenity_context(), user_id).await?;
    Ok(actor_from_member(ctx, &member))
}

pub fn actor_from_member(ctx: Context<'_>, member: &Member) -> Actor {
    let user_id = member.user.id;
    let snapshot = ctx.guild().map(|guild| {
        let permissions = guild.member_permissions(member);
        let voice = guild.voice_states.get(&user_id).and_then(|state| {
            state.channel_id.map(|channel_id| VoicePresence {
                channel_id,
                server_mute: state.mute,
                server_deaf: state.deaf,
            })
        });
        (permissions, voice)
    });

    let (permissions, voice) = snapshot.unwrap_or_else(|| {
        log::warn!("guild {} missing from cache, treating {} as unprivileged", member.guild_id, user_id);
        (Permissions::empty(), None)
    });

    Actor {
        id: user_id,
        name: member.display_name().to_string(),
        nick: member.nick.clone(),
        permissions,
        voice,
    }
}

/// Resolve every user in `users`, in order, dropping the ones that cannot be
/// found in the guild.
pub async fn resolve_targets(
    ctx: Context<'_>,
    guild_id: GuildId,
    users: &[serenity::User],
) -> Vec<Actor> {
    let mut targets = Vec::with_capacity(users.len());
    for user in users {
        match resolve_actor(ctx, guild_id, user.id).await {
            Ok(actor) => targets.push(actor),
            Err(e) => log::warn!("could not resolve {} in guild {}: {}", user.name, guild_id, e),
        }
    }
    targets
}
