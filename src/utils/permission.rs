use crate::models::types::{ActionKind, ActionRequest, Actor, Denial};

/// Decide whether the invoker of `request` may carry it out.
///
/// Holding the required permission is always enough. Without it, the request
/// only passes when self-exemption is on and every target is the invoker
/// (an empty target list counts as acting on oneself).
pub fn authorize(request: &ActionRequest) -> Result<(), Denial> {
    let kind = request.kind();
    if holds_capability(kind, &request.invoker, request.in_guild)? {
        return Ok(());
    }

    if request.self_exempt && targets_only_self(&request.invoker, &request.targets) {
        return Ok(());
    }

    Err(Denial::MissingCapability(kind.required_permission()))
}

/// Early check for commands that must answer before their targets are known.
///
/// Only denies when no choice of targets could pass `authorize`: outside a
/// guild, or without the capability when self-exemption is off.
pub fn authorize_invoker(
    kind: ActionKind,
    invoker: &Actor,
    in_guild: bool,
    self_exempt: bool,
) -> Result<(), Denial> {
    if holds_capability(kind, invoker, in_guild)? || self_exempt {
        return Ok(());
    }
    Err(Denial::MissingCapability(kind.required_permission()))
}

fn holds_capability(kind: ActionKind, invoker: &Actor, in_guild: bool) -> Result<bool, Denial> {
    if kind.guild_only() && !in_guild {
        return Err(Denial::NotInGuild);
    }
    Ok(invoker.has_permission(kind.required_permission()))
}

fn targets_only_self(invoker: &Actor, targets: &[Actor]) -> bool {
    targets.iter().all(|target| target.id == invoker.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::Action;
    use poise::serenity_prelude::{ChannelId, Permissions, UserId};

    fn member(id: u64, name: &str) -> Actor {
        Actor::new(UserId::new(id), name)
    }

    #[test]
    fn test_ban_without_permission_is_denied() {
        let invoker = member(1, "alice");
        let request = ActionRequest::new(
            Action::Ban {
                delete_message_days: 0,
            },
            invoker,
            vec![member(2, "bob")],
        );

        assert_eq!(
            authorize(&request),
            Err(Denial::MissingCapability(Permissions::BAN_MEMBERS))
        );
    }

    #[test]
    fn test_permission_holder_is_allowed() {
        let invoker = member(1, "alice").with_permissions(Permissions::KICK_MEMBERS);
        let request = ActionRequest::new(Action::Kick, invoker, vec![member(2, "bob")]);
        assert_eq!(authorize(&request), Ok(()));
    }

    #[test]
    fn test_administrator_implies_everything() {
        let invoker = member(1, "alice").with_permissions(Permissions::ADMINISTRATOR);
        let actions = [
            Action::Ban {
                delete_message_days: 0,
            },
            Action::Kick,
            Action::Mute,
            Action::Unmute,
            Action::Deafen,
            Action::Undeafen,
            Action::Disconnect,
            Action::Blackout,
            Action::Move {
                channel: ChannelId::new(10),
            },
            Action::Nickname {
                nick: "glop".to_string(),
            },
            Action::Pin,
            Action::Unpin,
            Action::Delete,
        ];
        assert_eq!(actions.len(), ActionKind::ALL.len());

        for action in actions {
            let kind = action.kind();
            let request = ActionRequest::new(action, invoker.clone(), vec![member(2, "bob")]);
            assert_eq!(authorize(&request), Ok(()), "{:?}", kind);
        }
    }

    #[test]
    fn test_self_disconnect_is_exempt() {
        let invoker = member(1, "alice");
        let request = ActionRequest::new(Action::Disconnect, invoker.clone(), vec![invoker]);
        assert!(request.self_exempt);
        assert_eq!(authorize(&request), Ok(()));
    }

    #[test]
    fn test_empty_targets_count_as_self() {
        let request = ActionRequest::new(Action::Disconnect, member(1, "alice"), Vec::new());
        assert_eq!(authorize(&request), Ok(()));
    }

    #[test]
    fn test_third_party_needs_permission_even_with_self() {
        let invoker = member(1, "alice");
        let request = ActionRequest::new(
            Action::Disconnect,
            invoker.clone(),
            vec![invoker, member(2, "bob")],
        );
        assert_eq!(
            authorize(&request),
            Err(Denial::MissingCapability(Permissions::MOVE_MEMBERS))
        );
    }

    #[test]
    fn test_self_exemption_can_be_turned_off() {
        let invoker = member(1, "alice");
        let request =
            ActionRequest::new(Action::Disconnect, invoker.clone(), vec![invoker]).self_exempt(false);
        assert!(authorize(&request).is_err());
    }

    #[test]
    fn test_self_mute_is_not_exempt_by_default() {
        let request = ActionRequest::new(Action::Mute, member(1, "alice"), Vec::new());
        assert_eq!(
            authorize(&request),
            Err(Denial::MissingCapability(Permissions::MUTE_MEMBERS))
        );
    }

    #[test]
    fn test_outside_guild_is_rejected_before_permissions() {
        let invoker = member(1, "alice").with_permissions(Permissions::ADMINISTRATOR);
        let request =
            ActionRequest::new(Action::Kick, invoker, vec![member(2, "bob")]).in_guild(false);
        assert_eq!(authorize(&request), Err(Denial::NotInGuild));
    }

    #[test]
    fn test_invoker_check_denies_before_targets_are_known() {
        let alice = member(1, "alice");
        assert_eq!(
            authorize_invoker(ActionKind::Move, &alice, true, false),
            Err(Denial::MissingCapability(Permissions::MOVE_MEMBERS))
        );
        assert_eq!(
            authorize_invoker(ActionKind::Pin, &alice, true, false),
            Err(Denial::MissingCapability(Permissions::MANAGE_MESSAGES))
        );
        assert_eq!(
            authorize_invoker(ActionKind::Pin, &alice, false, false),
            Err(Denial::NotInGuild)
        );
    }

    #[test]
    fn test_invoker_check_passes_holders_and_exempt_kinds() {
        let moderator = member(1, "mod").with_permissions(Permissions::MOVE_MEMBERS);
        assert_eq!(authorize_invoker(ActionKind::Move, &moderator, true, false), Ok(()));
        assert_eq!(
            authorize_invoker(ActionKind::Delete, &member(2, "bob"), true, true),
            Ok(())
        );
    }
}
