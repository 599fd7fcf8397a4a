use crate::bot::messaging::{deliver, Delivery};
use crate::conversation::{is_addressed_to_other_bot, ChatCommand, Conversation};
use crate::render::view::{DefaultMovieView, MovieView};
use crate::render::{DisplayPayload, TextFormat};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{CallbackQuery, ChatAction, Me},
    utils::command::BotCommands,
};
use tracing::{debug, error, info};

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Perintah yang tersedia:")]
pub enum Command {
    /// Show the welcome message
    #[command(description = "Mulai bot.")]
    Start,
    /// Show usage help
    #[command(description = "Bantuan.")]
    Help,
    /// Search movies by title
    #[command(description = "Cari film berdasarkan judul.")]
    CariJudul(String),
    /// Recommend movies, optionally for a genre
    #[command(description = "Rekomendasi film, bisa per genre.")]
    Rekomendasi(String),
    /// Currently popular movies
    #[command(description = "Film populer.")]
    Populer,
    /// Top-rated movies
    #[command(description = "Film dengan rating tertinggi.")]
    TopRated,
    /// List genres, or discover one
    #[command(description = "Daftar genre atau film per genre.")]
    Genre(String),
}

impl From<Command> for ChatCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => Self::Start,
            Command::Help => Self::Help,
            Command::CariJudul(title) => Self::Search(title),
            Command::Rekomendasi(genre) => Self::Recommend(genre),
            Command::Populer => Self::Popular,
            Command::TopRated => Self::TopRated,
            Command::Genre(name) => Self::Genre(name),
        }
    }
}

fn get_user_name(msg: &Message) -> Option<&str> {
    msg.from
        .as_ref()
        .map(|user| user.first_name.as_str())
        .filter(|name| !name.is_empty())
}

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
#[must_use]
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Handle a recognized slash command
///
/// # Errors
///
/// Currently infallible; delivery problems are reported to the user.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    conversation: Arc<Conversation>,
) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    info!(user_id, command = ?cmd, "Command received");

    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
    let payload = conversation
        .handle_command(cmd.into(), get_user_name(&msg))
        .await;
    reply(&bot, msg.chat.id, &payload, Delivery::Send).await;
    Ok(())
}

/// Handle free text, or a slash command the command parser did not accept
///
/// Commands addressed to another bot in a group are ignored.
///
/// # Errors
///
/// Returns an error if the message has no text.
pub async fn handle_text(
    bot: Bot,
    msg: Message,
    me: Me,
    conversation: Arc<Conversation>,
) -> Result<()> {
    let text = msg
        .text()
        .ok_or_else(|| anyhow!("Text handler called without text"))?;
    let bot_username = me.user.username.as_deref().unwrap_or_default();
    if is_addressed_to_other_bot(text, bot_username) {
        debug!(chat_id = msg.chat.id.0, "Ignoring command for another bot");
        return Ok(());
    }
    let user_id = get_user_id_safe(&msg);
    info!(user_id, "Text message received");

    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
    let payload = conversation
        .handle_command_or_text(text, text.trim_start().starts_with('/'))
        .await;
    reply(&bot, msg.chat.id, &payload, Delivery::Send).await;
    Ok(())
}

/// Handle a click on one of our inline buttons
///
/// The originating message is edited in place when both it and the new
/// payload are plain text; otherwise a new message is sent.
///
/// # Errors
///
/// Returns an error if the callback has no originating message.
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    conversation: Arc<Conversation>,
) -> Result<()> {
    // Stops the client's loading spinner, even for buttons we can't serve
    let _ = bot.answer_callback_query(q.id.clone()).await;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    let message = q
        .message
        .as_ref()
        .ok_or_else(|| anyhow!("Callback message missing chat id"))?;
    let chat_id = message.chat().id;
    info!(user_id = q.from.id.0, data = %data, "Action received");

    let _ = bot.send_chat_action(chat_id, ChatAction::Typing).await;
    let payload = conversation.handle_action_token(data).await;

    let editable = message
        .regular_message()
        .is_some_and(|m| m.text().is_some());
    let target = if editable && payload.image_url.is_none() {
        Delivery::Edit(message.id())
    } else {
        Delivery::Send
    };
    reply(&bot, chat_id, &payload, target).await;
    Ok(())
}

/// Delivers a payload; if that fails, tries a plain apology.
async fn reply(bot: &Bot, chat_id: ChatId, payload: &DisplayPayload, target: Delivery) {
    let Err(e) = deliver(bot, chat_id, payload, target).await else {
        return;
    };
    error!(chat_id = chat_id.0, error = %e, "Failed to deliver response");

    let apology = DisplayPayload {
        text: crate::utils::strip_html(DefaultMovieView::generic_error()),
        format: TextFormat::Plain,
        image_url: None,
        actions: Vec::new(),
    };
    if let Err(e) = deliver(bot, chat_id, &apology, Delivery::Send).await {
        error!(chat_id = chat_id.0, error = %e, "Failed to deliver apology");
    }
}
