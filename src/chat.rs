use crate::constants::{AUTO_REPLIES, MAX_CHAT_PARTNERS};
use crate::error::Result;
use crate::service::DataService;
use crate::session::Session;
use motoswap_core::{Message, MessageKind, NewMessage, User};
use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

/// A message as seen by one side of the conversation
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLine {
    pub direction: Direction,
    pub message: Message,
}

pub struct ChatService<'a> {
    service: &'a DataService,
    auto_reply_delay: Duration,
}

impl<'a> ChatService<'a> {
    pub fn new(service: &'a DataService, auto_reply_delay: Duration) -> Self {
        Self {
            service,
            auto_reply_delay,
        }
    }

    /// Persist `text` from the session user to `recipient_id`.
    ///
    /// Blank text is ignored and yields `Ok(None)`.
    pub async fn send(&self, session: &Session, recipient_id: i64, text: &str) -> Result<Option<Message>> {
        let sender = session.require_user()?;
        let content = text.trim();
        if content.is_empty() {
            return Ok(None);
        }

        let message = self
            .service
            .send_message(NewMessage {
                sender_id: sender.id,
                recipient_id,
                content: content.to_string(),
                kind: MessageKind::Message,
            })
            .await?;
        info!("Message {} sent from {} to {}", message.id, sender.id, recipient_id);
        Ok(Some(message))
    }

    /// Like [`send`](Self::send), then answer on behalf of the recipient
    /// after the configured delay. Returns the sent message and the reply.
    pub async fn send_with_auto_reply(
        &self,
        session: &Session,
        recipient_id: i64,
        text: &str,
    ) -> Result<Option<(Message, Option<Message>)>> {
        let Some(sent) = self.send(session, recipient_id, text).await? else {
            return Ok(None);
        };

        tokio::time::sleep(self.auto_reply_delay).await;

        let content = AUTO_REPLIES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(AUTO_REPLIES[0]);
        let reply = match self
            .service
            .send_message(NewMessage {
                sender_id: recipient_id,
                recipient_id: sent.sender_id,
                content: content.to_string(),
                kind: MessageKind::AutoReply,
            })
            .await
        {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!("Failed to store auto-reply from {}: {}", recipient_id, e);
                None
            }
        };

        Ok(Some((sent, reply)))
    }

    /// Messages between the session user and `other_id`, oldest first.
    pub async fn conversation(&self, session: &Session, other_id: i64) -> Result<Vec<ChatLine>> {
        let me = session.require_user()?.id;
        let lines = self
            .service
            .messages(me, other_id)
            .await
            .into_iter()
            .map(|message| ChatLine {
                direction: if message.sender_id == me {
                    Direction::Sent
                } else {
                    Direction::Received
                },
                message,
            })
            .collect();
        Ok(lines)
    }

    /// Other users to start a conversation with.
    pub async fn chat_partners(&self, session: &Session) -> Result<Vec<User>> {
        let me = session.require_user()?.id;
        Ok(self
            .service
            .users(MAX_CHAT_PARTNERS + 1)
            .await
            .into_iter()
            .filter(|u| u.id != me)
            .take(MAX_CHAT_PARTNERS)
            .collect())
    }
}
