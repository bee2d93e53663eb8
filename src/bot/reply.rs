use poise::serenity_prelude as serenity;

use crate::bot::{Context, Error};
use crate::models::types::{ActionKind, ActionOutcome, Actor, Denial, ModerationReport, ResultReport};
use crate::utils::report::join_names;

pub const DENIED: char = '\u{1F44E}';
pub const CONFUSED: char = '\u{1F615}';
pub const WARNING: char = '\u{26A0}';

/// What goes back to the channel: an optional reaction on the command
/// message and an optional text reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub reaction: Option<char>,
    pub content: Option<String>,
}

impl Reply {
    pub fn say(content: impl Into<String>) -> Self {
        Self {
            reaction: None,
            content: Some(content.into()),
        }
    }

    pub fn confused(content: impl Into<String>) -> Self {
        Self {
            reaction: Some(CONFUSED),
            content: Some(content.into()),
        }
    }

    fn react(reaction: char, content: impl Into<String>) -> Self {
        Self {
            reaction: Some(reaction),
            content: Some(content.into()),
        }
    }

    fn silent() -> Self {
        Self {
            reaction: None,
            content: None,
        }
    }
}

/// Turn a moderation report into the reply for `kind`.
pub fn describe(kind: ActionKind, report: &ModerationReport) -> Reply {
    match report {
        ModerationReport::Unauthorized(Denial::NotInGuild) => {
            Reply::confused("This command only works in a server.")
        }
        ModerationReport::Unauthorized(Denial::MissingCapability(_)) => {
            Reply::react(DENIED, "You lack this authority!")
        }
        ModerationReport::NoTargets => Reply::confused("No users mentioned."),
        ModerationReport::Unrecognized => Reply::confused("Unrecognized user mention(s)."),
        ModerationReport::SelfDirected { target, outcome } => describe_self(kind, target, outcome),
        ModerationReport::Message(outcome) => describe_message(kind, outcome),
        ModerationReport::Report(report) => describe_batch(kind, report),
    }
}

fn describe_self(kind: ActionKind, target: &Actor, outcome: &ActionOutcome) -> Reply {
    let past = kind.past_tense();
    match (kind, outcome) {
        (ActionKind::Disconnect, ActionOutcome::Failed(_)) => {
            Reply::confused("You were not in a voice channel.")
        }
        (ActionKind::Nickname, ActionOutcome::Succeeded) => {
            Reply::say(format!("Updated nickname for {}.", target.mention()))
        }
        (ActionKind::Nickname, ActionOutcome::AlreadyInState) => {
            Reply::confused("That's the same name.")
        }
        (ActionKind::Nickname, ActionOutcome::Failed(_)) => {
            Reply::confused("I don't have permission to do that.")
        }
        (_, ActionOutcome::Succeeded) => {
            Reply::say(format!("{} {}.", capitalize(past), target.mention()))
        }
        (_, ActionOutcome::AlreadyInState) => {
            Reply::confused(format!("{} is already {}.", target.mention(), past))
        }
        (_, ActionOutcome::Failed(_)) => {
            Reply::confused(format!("{} was not {}.", target.mention(), past))
        }
    }
}

fn describe_message(kind: ActionKind, outcome: &ActionOutcome) -> Reply {
    match (kind, outcome) {
        (ActionKind::Delete, ActionOutcome::Succeeded) => Reply::silent(),
        (ActionKind::Pin, ActionOutcome::AlreadyInState) => {
            Reply::confused("Message already pinned.")
        }
        (ActionKind::Unpin, ActionOutcome::AlreadyInState) => Reply::confused("Message not pinned."),
        (_, ActionOutcome::Succeeded) | (_, ActionOutcome::AlreadyInState) => {
            Reply::say(format!("Message {}.", kind.past_tense()))
        }
        (_, ActionOutcome::Failed(_)) => Reply::confused(format!(
            "Couldn't {} that message.",
            infinitive(kind)
        )),
    }
}

fn describe_batch(kind: ActionKind, report: &ResultReport) -> Reply {
    let past = kind.past_tense();
    let (all, some) = match kind {
        ActionKind::Blackout => ("video streams", "video stream(s)"),
        _ => ("users", "user(s)"),
    };

    match report {
        ResultReport::NoTargets => Reply::confused("No users mentioned."),
        ResultReport::AllSucceeded { count, unchanged } if unchanged.len() == *count => {
            Reply::confused(format!("Already {}: {}.", past, join_names(unchanged)))
        }
        ResultReport::AllSucceeded { unchanged, .. } => Reply::say(format!(
            "All {} successfully {}.{}",
            all,
            past,
            already_suffix(past, unchanged)
        )),
        ResultReport::AllFailed { .. } => Reply::confused(format!("No {} were {}.", all, past)),
        ResultReport::Partial {
            succeeded,
            failed,
            unchanged,
        } if unchanged.len() == *succeeded => Reply::react(
            WARNING,
            format!(
                "Skipped: {}. Already {}: {}.",
                join_names(failed),
                past,
                join_names(unchanged)
            ),
        ),
        ResultReport::Partial {
            failed, unchanged, ..
        } => Reply::react(
            WARNING,
            format!(
                "Some {} successfully {}. Skipped: {}.{}",
                some,
                past,
                join_names(failed),
                already_suffix(past, unchanged)
            ),
        ),
    }
}

fn already_suffix(past: &str, unchanged: &[String]) -> String {
    if unchanged.is_empty() {
        String::new()
    } else {
        format!(" Already {}: {}.", past, join_names(unchanged))
    }
}

fn infinitive(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::Pin => "pin",
        ActionKind::Unpin => "unpin",
        ActionKind::Delete => "delete",
        _ => "change",
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// React to the invoking message (prefix commands only) and send the text.
pub async fn send(ctx: Context<'_>, reply: Reply) -> Result<(), Error> {
    if let (Some(reaction), poise::Context::Prefix(prefix)) = (reply.reaction, ctx) {
        if let Err(e) = prefix
            .msg
            .react(ctx.serenity_context(), serenity::ReactionType::Unicode(reaction.to_string()))
            .await
        {
            log::warn!("failed to react to command message: {}", e);
        }
    }

    if let Some(content) = reply.content {
        ctx.say(content).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::member;
    use poise::serenity_prelude::Permissions;

    #[test]
    fn test_denial_replies() {
        let reply = describe(
            ActionKind::Ban,
            &ModerationReport::Unauthorized(Denial::MissingCapability(Permissions::BAN_MEMBERS)),
        );
        assert_eq!(reply.reaction, Some(DENIED));
        assert_eq!(reply.content.as_deref(), Some("You lack this authority!"));

        let reply = describe(ActionKind::Ban, &ModerationReport::Unauthorized(Denial::NotInGuild));
        assert_eq!(reply.reaction, Some(CONFUSED));
    }

    #[test]
    fn test_batch_replies() {
        let all = describe(
            ActionKind::Ban,
            &ModerationReport::Report(ResultReport::AllSucceeded {
                count: 2,
                unchanged: Vec::new(),
            }),
        );
        assert_eq!(all, Reply::say("All users successfully banned."));

        let none = describe(
            ActionKind::Kick,
            &ModerationReport::Report(ResultReport::AllFailed {
                failed: vec!["a".to_string()],
            }),
        );
        assert_eq!(none, Reply::confused("No users were kicked."));

        let some = describe(
            ActionKind::Move,
            &ModerationReport::Report(ResultReport::Partial {
                succeeded: 1,
                failed: vec!["bob".to_string(), "carol".to_string()],
                unchanged: Vec::new(),
            }),
        );
        assert_eq!(some.reaction, Some(WARNING));
        assert_eq!(
            some.content.as_deref(),
            Some("Some user(s) successfully moved. Skipped: bob and carol.")
        );
    }

    #[test]
    fn test_already_in_state_is_worded_apart() {
        let only_unchanged = describe(
            ActionKind::Mute,
            &ModerationReport::Report(ResultReport::AllSucceeded {
                count: 1,
                unchanged: vec!["alice".to_string()],
            }),
        );
        assert_eq!(only_unchanged, Reply::confused("Already muted: alice."));

        let mixed = describe(
            ActionKind::Mute,
            &ModerationReport::Report(ResultReport::AllSucceeded {
                count: 2,
                unchanged: vec!["alice".to_string()],
            }),
        );
        assert_eq!(
            mixed,
            Reply::say("All users successfully muted. Already muted: alice.")
        );
    }

    #[test]
    fn test_partial_with_already_in_state() {
        let mixed = describe(
            ActionKind::Mute,
            &ModerationReport::Report(ResultReport::Partial {
                succeeded: 2,
                failed: vec!["carol".to_string()],
                unchanged: vec!["alice".to_string()],
            }),
        );
        assert_eq!(mixed.reaction, Some(WARNING));
        assert_eq!(
            mixed.content.as_deref(),
            Some("Some user(s) successfully muted. Skipped: carol. Already muted: alice.")
        );

        let nothing_changed = describe(
            ActionKind::Mute,
            &ModerationReport::Report(ResultReport::Partial {
                succeeded: 1,
                failed: vec!["carol".to_string()],
                unchanged: vec!["alice".to_string()],
            }),
        );
        assert_eq!(nothing_changed.reaction, Some(WARNING));
        assert_eq!(
            nothing_changed.content.as_deref(),
            Some("Skipped: carol. Already muted: alice.")
        );
    }

    #[test]
    fn test_blackout_wording() {
        let reply = describe(
            ActionKind::Blackout,
            &ModerationReport::Report(ResultReport::AllSucceeded {
                count: 1,
                unchanged: Vec::new(),
            }),
        );
        assert_eq!(reply, Reply::say("All video streams successfully stopped."));
    }

    #[test]
    fn test_self_directed_replies() {
        let alice = member(7, "alice");
        let done = describe(
            ActionKind::Disconnect,
            &ModerationReport::SelfDirected {
                target: alice.clone(),
                outcome: ActionOutcome::Succeeded,
            },
        );
        assert_eq!(done, Reply::say("Disconnected <@7>."));

        let missed = describe(
            ActionKind::Disconnect,
            &ModerationReport::SelfDirected {
                target: alice.clone(),
                outcome: ActionOutcome::Failed("not connected to voice".to_string()),
            },
        );
        assert_eq!(missed, Reply::confused("You were not in a voice channel."));

        let same = describe(
            ActionKind::Nickname,
            &ModerationReport::SelfDirected {
                target: alice,
                outcome: ActionOutcome::AlreadyInState,
            },
        );
        assert_eq!(same, Reply::confused("That's the same name."));
    }

    #[test]
    fn test_message_replies() {
        assert_eq!(
            describe(ActionKind::Pin, &ModerationReport::Message(ActionOutcome::AlreadyInState)),
            Reply::confused("Message already pinned.")
        );
        assert_eq!(
            describe(ActionKind::Unpin, &ModerationReport::Message(ActionOutcome::Succeeded)),
            Reply::say("Message unpinned.")
        );
        assert_eq!(
            describe(ActionKind::Delete, &ModerationReport::Message(ActionOutcome::Succeeded)),
            Reply::silent()
        );
    }
}
