use std::collections::HashSet;
use std::sync::Mutex;

use poise::serenity_prelude::{self as serenity, UserId};

use crate::models::types::{Action, ActionKind, Actor, MessageTarget};
use crate::utils::executor::{ModerationPlatform, PlatformError};

pub fn member(id: u64, name: &str) -> Actor {
    Actor::new(UserId::new(id), name)
}

/// In-memory platform that records every call and fails for chosen users.
#[derive(Default)]
pub struct MockPlatform {
    failing: HashSet<u64>,
    calls: Mutex<Vec<(ActionKind, UserId)>>,
}

impl MockPlatform {
    pub fn failing_for(ids: &[u64]) -> Self {
        Self {
            failing: ids.iter().copied().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(ActionKind, UserId)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, kind: ActionKind, user: UserId) -> Result<(), PlatformError> {
        self.calls.lock().unwrap().push((kind, user));
        if self.failing.contains(&user.get()) {
            return Err(PlatformError::Discord(serenity::Error::Other("mock failure")));
        }
        Ok(())
    }
}

impl ModerationPlatform for MockPlatform {
    async fn perform(&self, action: &Action, target: &Actor) -> Result<(), PlatformError> {
        self.record(action.kind(), target.id)
    }

    async fn perform_on_message(
        &self,
        action: &Action,
        message: &MessageTarget,
    ) -> Result<(), PlatformError> {
        self.record(action.kind(), message.author.id)
    }
}
