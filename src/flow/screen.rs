//! Flow screens and declarative buttons
//!
//! A screen is one step of a flow: a message body plus a set of inline
//! keyboard buttons. Buttons are declared as data; a button may record a
//! `next_step`, and the engine performs that transition after the press
//! handler runs.

use futures::future::BoxFuture;
use teloxide::{Bot, prelude::*, types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId}};
use uuid::Uuid;

use crate::state::{StatePatch, UserState, UserStateRepository};
use crate::utils::errors::Result;

/// Prefix for all callback payloads produced by this library
pub const CALLBACK_PREFIX: &str = "flow";

/// A single inline keyboard button declared by a screen
///
/// The action id is part of the callback payload, so buttons that must
/// survive a process restart should set a stable one instead of relying
/// on the generated default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowButton {
    /// Text displayed on the button
    pub label: String,
    /// Identifier routed back to the screen on press
    pub action: String,
    /// Step to transition to after the press handler runs
    pub next_step: Option<String>,
}

impl FlowButton {
    /// Create a button with a generated action id
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: Uuid::new_v4().to_string(),
            next_step: None,
        }
    }

    /// Set a stable action id
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Record the step this button transitions to
    pub fn next_step(mut self, step: impl Into<String>) -> Self {
        self.next_step = Some(step.into());
        self
    }
}

/// One step of a flow, shown to the user as a message with buttons
pub trait FlowScreen: Send + Sync {
    /// Step name this screen represents, used as the registry key and
    /// the persisted state value
    fn step(&self) -> &str;

    /// Message body shown with the keyboard
    fn text(&self) -> String;

    /// Buttons declared by this screen, rendered one per row
    fn buttons(&self) -> Vec<FlowButton>;

    /// Called when one of the screen's buttons is pressed
    fn on_press<'a>(&'a self, action: &'a str, cx: &'a ScreenContext) -> BoxFuture<'a, Result<()>> {
        let _ = (action, cx);
        Box::pin(async { Ok(()) })
    }
}

/// Build the inline keyboard for a screen
pub fn keyboard(screen: &dyn FlowScreen) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = screen
        .buttons()
        .into_iter()
        .map(|button| {
            vec![InlineKeyboardButton::callback(
                button.label,
                callback_data(screen.step(), &button.action),
            )]
        })
        .collect();

    InlineKeyboardMarkup::new(rows)
}

/// Encode a callback payload for a button
pub fn callback_data(step: &str, action: &str) -> String {
    format!("{}:{}:{}", CALLBACK_PREFIX, step, action)
}

/// Check whether a payload carries this library's prefix
///
/// True does not imply the payload parses; the engine treats a prefixed
/// payload that fails to parse as an error rather than skipping it.
pub fn is_flow_payload(data: &str) -> bool {
    data.strip_prefix(CALLBACK_PREFIX)
        .map_or(false, |rest| rest.starts_with(':'))
}

/// Parse a callback payload into (step, action)
pub fn parse_callback(data: &str) -> Option<(&str, &str)> {
    let rest = data.strip_prefix(CALLBACK_PREFIX)?.strip_prefix(':')?;
    let (step, action) = rest.split_once(':')?;

    if step.is_empty() || action.is_empty() {
        return None;
    }
    Some((step, action))
}

/// Resolve the transition target recorded on a screen's button
pub fn transition_target(screen: &dyn FlowScreen, action: &str) -> Option<String> {
    screen
        .buttons()
        .into_iter()
        .find(|button| button.action == action)
        .and_then(|button| button.next_step)
}

/// Per-press handle passed to button handlers
///
/// Carries the bot, the chat the screen lives in, and the pressing user's
/// identity, and exposes the state helpers screens use to record
/// progress.
#[derive(Debug, Clone)]
pub struct ScreenContext {
    pub bot: Bot,
    pub chat_id: ChatId,
    pub message_id: Option<MessageId>,
    pub user_id: String,
    states: UserStateRepository,
}

impl ScreenContext {
    pub(crate) fn new(
        bot: Bot,
        chat_id: ChatId,
        message_id: Option<MessageId>,
        user_id: String,
        states: UserStateRepository,
    ) -> Self {
        Self {
            bot,
            chat_id,
            message_id,
            user_id,
            states,
        }
    }

    /// Update the user's state in the database
    pub async fn update_state(&self, patch: StatePatch) -> Result<UserState> {
        self.states.upsert(&self.user_id, patch).await
    }

    /// Retrieve the user's state from the database
    pub async fn state(&self) -> Result<Option<UserState>> {
        self.states.find(&self.user_id).await
    }

    /// Send a plain message to the chat the screen lives in
    pub async fn reply(&self, text: impl Into<String>) -> Result<()> {
        self.bot.send_message(self.chat_id, text.into()).await?;
        Ok(())
    }
}
