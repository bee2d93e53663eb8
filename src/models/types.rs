use poise::serenity_prelude::{ChannelId, MessageId, Permissions, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub prefix: String,
    pub log_file: Option<String>,
    pub log_level: String,
    pub scratch_channel_name: String, // temporary voice channel used by blackout
    pub ban_delete_message_days: u8,  // 0-7
    pub self_exempt: Vec<ActionKind>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: "$".to_string(),
            log_file: Some("bot.log".to_string()),
            log_level: "info".to_string(),
            scratch_channel_name: "TEMP".to_string(),
            ban_delete_message_days: 0,
            self_exempt: ActionKind::ALL
                .into_iter()
                .filter(|kind| kind.default_self_exempt())
                .collect(),
        }
    }
}

impl BotConfig {
    pub fn is_self_exempt(&self, kind: ActionKind) -> bool {
        self.self_exempt.contains(&kind)
    }
}

/// Every privileged operation the moderation commands can attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Ban,
    Kick,
    Mute,
    Unmute,
    Deafen,
    Undeafen,
    Disconnect,
    Blackout,
    Move,
    Nickname,
    Pin,
    Unpin,
    Delete,
}

impl ActionKind {
    pub const ALL: [ActionKind; 13] = [
        ActionKind::Ban,
        ActionKind::Kick,
        ActionKind::Mute,
        ActionKind::Unmute,
        ActionKind::Deafen,
        ActionKind::Undeafen,
        ActionKind::Disconnect,
        ActionKind::Blackout,
        ActionKind::Move,
        ActionKind::Nickname,
        ActionKind::Pin,
        ActionKind::Unpin,
        ActionKind::Delete,
    ];

    /// The guild permission a member needs to use this action on others.
    pub fn required_permission(self) -> Permissions {
        match self {
            ActionKind::Ban => Permissions::BAN_MEMBERS,
            ActionKind::Kick => Permissions::KICK_MEMBERS,
            ActionKind::Mute | ActionKind::Unmute => Permissions::MUTE_MEMBERS,
            ActionKind::Deafen | ActionKind::Undeafen => Permissions::DEAFEN_MEMBERS,
            ActionKind::Disconnect | ActionKind::Blackout | ActionKind::Move => {
                Permissions::MOVE_MEMBERS
            }
            ActionKind::Nickname => Permissions::MANAGE_NICKNAMES,
            ActionKind::Pin | ActionKind::Unpin | ActionKind::Delete => {
                Permissions::MANAGE_MESSAGES
            }
        }
    }

    pub fn guild_only(self) -> bool {
        true
    }

    /// Whether an empty target list means "apply to the invoker".
    pub fn supports_self_fallback(self) -> bool {
        matches!(
            self,
            ActionKind::Nickname | ActionKind::Mute | ActionKind::Deafen | ActionKind::Disconnect
        )
    }

    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            ActionKind::Mute
                | ActionKind::Unmute
                | ActionKind::Deafen
                | ActionKind::Undeafen
                | ActionKind::Nickname
                | ActionKind::Pin
                | ActionKind::Unpin
        )
    }

    pub fn default_self_exempt(self) -> bool {
        matches!(
            self,
            ActionKind::Disconnect | ActionKind::Nickname | ActionKind::Delete
        )
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            ActionKind::Ban => "banned",
            ActionKind::Kick => "kicked",
            ActionKind::Mute => "muted",
            ActionKind::Unmute => "unmuted",
            ActionKind::Deafen => "deafened",
            ActionKind::Undeafen => "undeafened",
            ActionKind::Disconnect => "disconnected",
            ActionKind::Blackout => "stopped",
            ActionKind::Move => "moved",
            ActionKind::Nickname => "renamed",
            ActionKind::Pin => "pinned",
            ActionKind::Unpin => "unpinned",
            ActionKind::Delete => "deleted",
        }
    }
}

/// An action together with whatever it needs to be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Ban { delete_message_days: u8 },
    Kick,
    Mute,
    Unmute,
    Deafen,
    Undeafen,
    Disconnect,
    Blackout,
    Move { channel: ChannelId },
    Nickname { nick: String },
    Pin,
    Unpin,
    Delete,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Ban { .. } => ActionKind::Ban,
            Action::Kick => ActionKind::Kick,
            Action::Mute => ActionKind::Mute,
            Action::Unmute => ActionKind::Unmute,
            Action::Deafen => ActionKind::Deafen,
            Action::Undeafen => ActionKind::Undeafen,
            Action::Disconnect => ActionKind::Disconnect,
            Action::Blackout => ActionKind::Blackout,
            Action::Move { .. } => ActionKind::Move,
            Action::Nickname { .. } => ActionKind::Nickname,
            Action::Pin => ActionKind::Pin,
            Action::Unpin => ActionKind::Unpin,
            Action::Delete => ActionKind::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoicePresence {
    pub channel_id: ChannelId,
    pub server_mute: bool,
    pub server_deaf: bool,
}

/// Snapshot of a guild member taken when a command is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub name: String,
    pub nick: Option<String>,
    pub permissions: Permissions,
    pub voice: Option<VoicePresence>,
}

impl Actor {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            nick: None,
            permissions: Permissions::empty(),
            voice: None,
        }
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_voice(mut self, voice: VoicePresence) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn with_nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = Some(nick.into());
        self
    }

    /// Administrator implies every other permission.
    pub fn has_permission(&self, required: Permissions) -> bool {
        self.permissions.administrator() || self.permissions.contains(required)
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    /// Toggle pre-check: true when the action would not change anything.
    pub fn already_in_state(&self, action: &Action) -> bool {
        match action {
            Action::Mute => self.voice.is_some_and(|v| v.server_mute),
            Action::Unmute => self.voice.is_some_and(|v| !v.server_mute),
            Action::Deafen => self.voice.is_some_and(|v| v.server_deaf),
            Action::Undeafen => self.voice.is_some_and(|v| !v.server_deaf),
            Action::Nickname { nick } => self.nick.as_deref() == Some(nick.as_str()),
            _ => false,
        }
    }
}

/// A message referenced by pin, unpin or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTarget {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub author: Actor,
    pub pinned: bool,
}

impl MessageTarget {
    pub fn already_in_state(&self, action: &Action) -> bool {
        match action {
            Action::Pin => self.pinned,
            Action::Unpin => !self.pinned,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub action: Action,
    pub invoker: Actor,
    pub targets: Vec<Actor>,
    pub self_exempt: bool,
    pub in_guild: bool,
    pub had_arguments: bool, // arguments were given but none resolved to a member
}

impl ActionRequest {
    pub fn new(action: Action, invoker: Actor, targets: Vec<Actor>) -> Self {
        let self_exempt = action.kind().default_self_exempt();
        Self {
            action,
            invoker,
            targets,
            self_exempt,
            in_guild: true,
            had_arguments: false,
        }
    }

    pub fn self_exempt(mut self, self_exempt: bool) -> Self {
        self.self_exempt = self_exempt;
        self
    }

    pub fn in_guild(mut self, in_guild: bool) -> Self {
        self.in_guild = in_guild;
        self
    }

    pub fn had_arguments(mut self, had_arguments: bool) -> Self {
        self.had_arguments = had_arguments;
        self
    }

    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded,
    AlreadyInState,
    Failed(String),
}

impl ActionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ActionOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: Actor,
    pub outcome: ActionOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Execution {
    pub outcomes: Vec<TargetOutcome>,
    pub self_directed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("command used outside of a guild")]
    NotInGuild,
    #[error("missing permission {0:?}")]
    MissingCapability(Permissions),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultReport {
    NoTargets,
    AllSucceeded {
        count: usize,
        unchanged: Vec<String>,
    },
    AllFailed {
        failed: Vec<String>,
    },
    Partial {
        succeeded: usize,
        failed: Vec<String>,
        unchanged: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationReport {
    Unauthorized(Denial),
    NoTargets,
    Unrecognized, // arguments given, none resolved
    SelfDirected {
        target: Actor,
        outcome: ActionOutcome,
    },
    Message(ActionOutcome),
    Report(ResultReport),
}
