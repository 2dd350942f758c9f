//! Notification Dispatcher
//!
//! Fans domain events out to every open connection of the affected
//! identities. Targets are resolved through the presence directory at call
//! time; identities with no open connection are skipped silently, and nothing
//! is queued for later.

use std::sync::Arc;

use super::events::ServerEvent;
use super::gateway::Gateway;
use crate::domain::{ChatId, Identity, InviteRecord, MessageRecord, ParticipantSource, UserSummary};

pub struct NotificationDispatcher {
    gateway: Arc<Gateway>,
    participants: Arc<dyn ParticipantSource>,
}

impl NotificationDispatcher {
    pub fn new(gateway: Arc<Gateway>, participants: Arc<dyn ParticipantSource>) -> Self {
        Self {
            gateway,
            participants,
        }
    }

    /// Deliver one event to every connection of every target identity.
    /// Returns the number of connections reached.
    pub fn notify(&self, identities: &[Identity], event: &ServerEvent) -> usize {
        let mut reached = 0;
        for identity in identities {
            reached += self.gateway.send_to_identity(identity, event);
        }
        tracing::debug!(
            event = event.event_name(),
            identities = identities.len(),
            reached,
            "notification dispatched"
        );
        reached
    }

    /// An invite was created for one invitee.
    pub fn invite_created(&self, invitee: &Identity, invite: InviteRecord) {
        self.notify(
            std::slice::from_ref(invitee),
            &ServerEvent::InviteCreated(invite),
        );
    }

    /// A user accepted an invite and entered a chat; the participants already
    /// in the chat are told.
    pub async fn chat_entered(&self, chat: &ChatId, user: UserSummary) {
        let targets: Vec<Identity> = self
            .participants
            .find_participants(chat)
            .await
            .into_iter()
            .filter(|identity| *identity != user.email)
            .collect();
        self.notify(&targets, &ServerEvent::EnterChat { user });
    }

    /// A message was posted; every participant of its chat is told, the
    /// author's other devices included.
    pub async fn message_posted(&self, message: MessageRecord) {
        let targets = self.participants.find_participants(&message.chat).await;
        self.notify(&targets, &ServerEvent::Message(message));
    }

    /// An account email was verified.
    pub fn email_validated(&self, identity: &Identity) {
        self.notify(std::slice::from_ref(identity), &ServerEvent::EmailValidated {});
    }
}
