use crate::models::types::{Action, ActionRequest, Actor, MessageTarget, ModerationReport};
use crate::utils::executor::{self, ModerationPlatform};
use crate::utils::permission::authorize;
use crate::utils::report::render;

/// Authorize, execute and classify one moderation command.
pub async fn moderate<P: ModerationPlatform>(
    platform: &P,
    request: &ActionRequest,
) -> ModerationReport {
    if let Err(denial) = authorize(request) {
        log::info!(
            "{} denied {:?}: {}",
            request.invoker.name,
            request.kind(),
            denial
        );
        return ModerationReport::Unauthorized(denial);
    }

    // unresolved arguments never fall back to the invoker
    if request.targets.is_empty() {
        if request.had_arguments {
            return ModerationReport::Unrecognized;
        }
        if !request.kind().supports_self_fallback() {
            return ModerationReport::NoTargets;
        }
    }

    let execution = executor::apply(platform, request).await;
    log::info!(
        "{} ran {:?} on {} target(s)",
        request.invoker.name,
        request.kind(),
        execution.outcomes.len()
    );

    if execution.self_directed {
        if let Some(single) = execution.outcomes.into_iter().next() {
            return ModerationReport::SelfDirected {
                target: single.target,
                outcome: single.outcome,
            };
        }
        return ModerationReport::NoTargets;
    }

    ModerationReport::Report(render(&execution.outcomes))
}

/// Same flow for pin, unpin and delete; the message author is the target.
pub async fn moderate_message<P: ModerationPlatform>(
    platform: &P,
    action: Action,
    invoker: Actor,
    message: &MessageTarget,
    in_guild: bool,
    self_exempt: bool,
) -> ModerationReport {
    let request = ActionRequest::new(action, invoker, vec![message.author.clone()])
        .in_guild(in_guild)
        .self_exempt(self_exempt);

    if let Err(denial) = authorize(&request) {
        log::info!(
            "{} denied {:?} on message {}: {}",
            request.invoker.name,
            request.kind(),
            message.id,
            denial
        );
        return ModerationReport::Unauthorized(denial);
    }

    ModerationReport::Message(executor::apply_to_message(platform, &request.action, message).await)
}
