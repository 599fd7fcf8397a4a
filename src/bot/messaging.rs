//! Delivery of rendered payloads to Telegram.
//!
//! A payload is sent as a new text or photo message, or edited into an
//! existing text message. When Telegram rejects the formatted version the
//! payload is resent once as plain text with the same buttons.

use crate::render::{Action, DisplayPayload, TextFormat};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode,
};
use teloxide::{ApiError, RequestError};
use thiserror::Error;
use tracing::{debug, warn};

/// Where a payload goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Post a new message
    Send,
    /// Replace the text and buttons of an existing text message
    Edit(MessageId),
}

/// Delivery failures
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Telegram refused the payload itself (bad markup, size, image URL)
    #[error("payload rejected by Telegram: {0}")]
    RenderRejected(String),
    /// The request did not complete
    #[error("Telegram request failed: {0}")]
    Transport(#[source] RequestError),
}

impl From<RequestError> for DeliveryError {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::Api(api) => Self::RenderRejected(api.to_string()),
            other => Self::Transport(other),
        }
    }
}

/// One button per row, in payload order.
///
/// # Examples
///
/// ```
/// use cinebot::actions::ActionKind;
/// use cinebot::bot::messaging::action_keyboard;
/// use cinebot::render::{Action, DisplayPayload};
///
/// let payload = DisplayPayload::html("Pilih:")
///     .with_actions(vec![Action::new("Up (2009)", ActionKind::Select, 14160)]);
/// assert_eq!(action_keyboard(&payload.actions).inline_keyboard.len(), 1);
/// ```
#[must_use]
pub fn action_keyboard(actions: &[Action]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(actions.iter().map(|action| {
        vec![InlineKeyboardButton::callback(
            action.label.clone(),
            action.token.encode(),
        )]
    }))
}

/// Sends one variant of a payload, with no retries
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PayloadSender: Send + Sync {
    /// Chat the payloads go to, for logging
    fn chat_id(&self) -> ChatId;

    /// Sends or edits once.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::RenderRejected`] when Telegram refuses the
    /// payload and [`DeliveryError::Transport`] when the request fails.
    async fn send(&self, payload: &DisplayPayload, target: Delivery) -> Result<(), DeliveryError>;
}

/// [`PayloadSender`] for one chat through the Bot API
pub struct TelegramSender {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSender {
    #[must_use]
    pub const fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait::async_trait]
impl PayloadSender for TelegramSender {
    fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    async fn send(&self, payload: &DisplayPayload, target: Delivery) -> Result<(), DeliveryError> {
        let keyboard = action_keyboard(&payload.actions);
        let parse_mode = match payload.format {
            TextFormat::Html => Some(ParseMode::Html),
            TextFormat::Plain => None,
        };

        let result = match (&payload.image_url, target) {
            (Some(image_url), _) => {
                let url = reqwest::Url::parse(image_url).map_err(|e| {
                    DeliveryError::RenderRejected(format!("invalid image URL: {e}"))
                })?;
                let mut req = self
                    .bot
                    .send_photo(self.chat_id, InputFile::url(url))
                    .caption(payload.text.clone())
                    .reply_markup(keyboard);
                if let Some(pm) = parse_mode {
                    req = req.parse_mode(pm);
                }
                req.await.map(|_| ())
            }
            (None, Delivery::Send) => {
                let mut req = self
                    .bot
                    .send_message(self.chat_id, payload.text.clone())
                    .reply_markup(keyboard);
                if let Some(pm) = parse_mode {
                    req = req.parse_mode(pm);
                }
                req.await.map(|_| ())
            }
            (None, Delivery::Edit(message_id)) => {
                let mut req = self
                    .bot
                    .edit_message_text(self.chat_id, message_id, payload.text.clone())
                    .reply_markup(keyboard);
                if let Some(pm) = parse_mode {
                    req = req.parse_mode(pm);
                }
                req.await.map(|_| ())
            }
        };

        settle(result)
    }
}

/// An edit that changes nothing counts as delivered.
fn settle(result: Result<(), RequestError>) -> Result<(), DeliveryError> {
    match result {
        Err(RequestError::Api(ApiError::MessageNotModified)) => {
            debug!("Message update skipped: not modified");
            Ok(())
        }
        other => other.map_err(DeliveryError::from),
    }
}

/// Delivers `payload` to `chat_id` through the Bot API.
///
/// See [`deliver_with`] for the retry rules.
///
/// # Errors
///
/// Returns the last failure if no variant of the payload could be delivered.
pub async fn deliver(
    bot: &Bot,
    chat_id: ChatId,
    payload: &DisplayPayload,
    target: Delivery,
) -> Result<(), DeliveryError> {
    deliver_with(&TelegramSender::new(bot.clone(), chat_id), payload, target).await
}

/// Delivers `payload`, retrying once as plain text if the formatted version
/// is rejected.
///
/// A photo that still fails is delivered as a text message without the image.
/// Transport failures are returned without a retry.
///
/// # Errors
///
/// Returns the last failure if no variant of the payload could be delivered.
pub async fn deliver_with<S: PayloadSender + ?Sized>(
    sender: &S,
    payload: &DisplayPayload,
    target: Delivery,
) -> Result<(), DeliveryError> {
    let chat_id = sender.chat_id().0;
    let reason = match sender.send(payload, target).await {
        Err(DeliveryError::RenderRejected(reason)) => reason,
        other => return other,
    };

    warn!(
        chat_id,
        reason = %reason,
        "Telegram rejected formatted payload, retrying as plain text"
    );
    let plain = payload.to_plain();
    match sender.send(&plain, target).await {
        Err(DeliveryError::RenderRejected(reason)) if plain.image_url.is_some() => {
            warn!(chat_id, reason = %reason, "Photo rejected, sending text only");
            sender.send(&plain.with_image(None), Delivery::Send).await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;

    #[test]
    fn test_keyboard_has_one_button_per_row_in_order() {
        let actions = vec![
            Action::new("A (2001)", ActionKind::Select, 1),
            Action::new("B (N/A)", ActionKind::Select, 2),
        ];
        let keyboard = action_keyboard(&actions);

        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert!(keyboard.inline_keyboard.iter().all(|row| row.len() == 1));
        assert_eq!(keyboard.inline_keyboard[1][0].text, "B (N/A)");
    }

    #[test]
    fn test_empty_actions_give_empty_keyboard() {
        assert!(action_keyboard(&[]).inline_keyboard.is_empty());
    }

    #[test]
    fn test_api_errors_are_render_rejections() {
        let rejected = DeliveryError::from(RequestError::Api(ApiError::MessageTextIsEmpty));
        assert!(matches!(rejected, DeliveryError::RenderRejected(_)));

        let other = DeliveryError::from(RequestError::MigrateToChatId(ChatId(-100)));
        assert!(matches!(other, DeliveryError::Transport(_)));
    }

    #[test]
    fn test_not_modified_counts_as_delivered() {
        assert!(settle(Err(RequestError::Api(ApiError::MessageNotModified))).is_ok());
        assert!(matches!(
            settle(Err(RequestError::Api(ApiError::MessageIsTooLong))),
            Err(DeliveryError::RenderRejected(_))
        ));
        assert!(settle(Ok(())).is_ok());
    }

    fn detail_payload(image_url: Option<&str>) -> DisplayPayload {
        DisplayPayload::html("🎬 <b>Up</b> & <i>friends</i>")
            .with_image(image_url.map(str::to_string))
            .with_actions(vec![
                Action::new("🎥 Trailer", ActionKind::Trailer, 14160),
                Action::new("🎭 Pemeran", ActionKind::Cast, 14160),
            ])
    }

    fn sender() -> MockPayloadSender {
        let mut sender = MockPayloadSender::new();
        sender.expect_chat_id().return_const(ChatId(42));
        sender
    }

    #[tokio::test]
    async fn test_rejected_markup_is_resent_once_as_plain_text() {
        let payload = detail_payload(None);
        let actions = payload.actions.clone();
        let target = Delivery::Edit(MessageId(7));

        let mut seq = mockall::Sequence::new();
        let mut sender = sender();
        sender
            .expect_send()
            .withf(|p, _| p.format == TextFormat::Html)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(DeliveryError::RenderRejected("can't parse entities".into())));
        sender
            .expect_send()
            .withf(move |p, t| {
                p.format == TextFormat::Plain
                    && !p.text.contains("<b>")
                    && p.actions == actions
                    && *t == target
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        assert!(deliver_with(&sender, &payload, target).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejected_photo_falls_back_to_text_message() {
        let payload = detail_payload(Some("https://image.tmdb.org/t/p/w500/up.jpg"));
        let actions = payload.actions.clone();

        let mut seq = mockall::Sequence::new();
        let mut sender = sender();
        sender
            .expect_send()
            .withf(|p, _| p.image_url.is_some())
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(DeliveryError::RenderRejected("wrong file".into())));
        sender
            .expect_send()
            .withf(move |p, t| {
                p.image_url.is_none()
                    && p.format == TextFormat::Plain
                    && p.actions == actions
                    && *t == Delivery::Send
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        assert!(deliver_with(&sender, &payload, Delivery::Send).await.is_ok());
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let mut sender = sender();
        sender.expect_send().times(1).returning(|_, _| {
            Err(DeliveryError::Transport(RequestError::MigrateToChatId(
                ChatId(-100),
            )))
        });

        let result = deliver_with(&sender, &detail_payload(None), Delivery::Send).await;
        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }

    #[tokio::test]
    async fn test_text_rejected_twice_gives_up() {
        let mut sender = sender();
        sender
            .expect_send()
            .times(2)
            .returning(|_, _| Err(DeliveryError::RenderRejected("too long".into())));

        let result = deliver_with(&sender, &detail_payload(None), Delivery::Send).await;
        assert!(matches!(result, Err(DeliveryError::RenderRejected(_))));
    }
}
