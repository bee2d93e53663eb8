use std::future::Future;

use poise::serenity_prelude as serenity;
use thiserror::Error;

use crate::models::types::{
    Action, ActionOutcome, ActionRequest, Actor, Execution, MessageTarget, TargetOutcome,
};

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Discord rejected the request: {0}")]
    Discord(#[from] serenity::Error),
    #[error("not in a guild")]
    NotInGuild,
    #[error("not connected to voice")]
    NotInVoice,
    #[error("no scratch channel to move through")]
    NoScratchChannel,
    #[error("{0:?} cannot be applied to this target")]
    Unsupported(crate::models::types::ActionKind),
}

/// The live side of a moderation action: one effectful call per target.
///
/// Implementations report failure through the returned `Result` and never
/// retry on their own.
pub trait ModerationPlatform {
    fn perform(
        &self,
        action: &Action,
        target: &Actor,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;

    fn perform_on_message(
        &self,
        action: &Action,
        message: &MessageTarget,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;
}

/// Apply `request.action` to every target in order.
///
/// A failing target never stops the batch and earlier successes are kept.
/// With no targets, actions that support it fall back to the invoker and the
/// execution is marked self-directed.
pub async fn apply<P: ModerationPlatform>(platform: &P, request: &ActionRequest) -> Execution {
    if request.targets.is_empty() {
        if !request.kind().supports_self_fallback() {
            return Execution::default();
        }

        let outcome = attempt(platform, &request.action, &request.invoker).await;
        return Execution {
            outcomes: vec![TargetOutcome {
                target: request.invoker.clone(),
                outcome,
            }],
            self_directed: true,
        };
    }

    let mut outcomes = Vec::with_capacity(request.targets.len());
    for target in &request.targets {
        let outcome = attempt(platform, &request.action, target).await;
        outcomes.push(TargetOutcome {
            target: target.clone(),
            outcome,
        });
    }

    Execution {
        outcomes,
        self_directed: false,
    }
}

/// Pin, unpin or delete a single message.
pub async fn apply_to_message<P: ModerationPlatform>(
    platform: &P,
    action: &Action,
    message: &MessageTarget,
) -> ActionOutcome {
    if message.already_in_state(action) {
        return ActionOutcome::AlreadyInState;
    }

    match platform.perform_on_message(action, message).await {
        Ok(()) => ActionOutcome::Succeeded,
        Err(e) => {
            log::warn!("{:?} failed on message {}: {}", action.kind(), message.id, e);
            ActionOutcome::Failed(e.to_string())
        }
    }
}

async fn attempt<P: ModerationPlatform>(
    platform: &P,
    action: &Action,
    target: &Actor,
) -> ActionOutcome {
    if action.kind().is_toggle() && target.already_in_state(action) {
        log::debug!("{:?} skipped for {}: already in state", action.kind(), target.name);
        return ActionOutcome::AlreadyInState;
    }

    // blackout has to know where to put the member back
    if *action == Action::Blackout && target.voice.is_none() {
        return ActionOutcome::Failed(PlatformError::NotInVoice.to_string());
    }

    match platform.perform(action, target).await {
        Ok(()) => ActionOutcome::Succeeded,
        Err(e) => {
            log::warn!("{:?} failed for {}: {}", action.kind(), target.name, e);
            ActionOutcome::Failed(e.to_string())
        }
    }
}
