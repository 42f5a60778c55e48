//! Flow engine
//!
//! Wires the screen registry, the Telegram bot and the state repository
//! together: sends the first screen of a flow, dispatches callback
//! queries to the pressed button's handler, and performs the recorded
//! transition by editing the message in place.

use std::sync::Arc;

use teloxide::{Bot, prelude::*, types::{CallbackQuery, ChatId, Message}};
use tracing::{debug, info, warn};

use crate::database::{connection, DatabasePool};
use crate::flow::registry::ScreenRegistry;
use crate::flow::screen::{self, ScreenContext};
use crate::state::{StatePatch, UserStateRepository};
use crate::utils::errors::{FlowError, Result};
use crate::utils::logging;

/// Engine driving registered flow screens for a bot
///
/// Cheap to clone; hand a clone to the dispatcher as a dependency.
#[derive(Debug, Clone)]
pub struct FlowEngine {
    bot: Bot,
    registry: Arc<ScreenRegistry>,
    states: UserStateRepository,
}

impl FlowEngine {
    pub fn new(bot: Bot, pool: DatabasePool, registry: ScreenRegistry) -> Self {
        Self {
            bot,
            registry: Arc::new(registry),
            states: UserStateRepository::new(pool),
        }
    }

    pub fn registry(&self) -> &ScreenRegistry {
        &self.registry
    }

    pub fn states(&self) -> &UserStateRepository {
        &self.states
    }

    /// Ensure the schema exists, then restore in-flight flows
    ///
    /// Call once after the bot connects, before dispatching updates.
    /// Returns the number of restored flows.
    pub async fn init(&self) -> Result<u32> {
        connection::run_migrations(self.states.pool()).await?;

        let restored = self.restore().await?;
        info!(restored = restored, "Flow engine initialized");
        Ok(restored)
    }

    /// Rebuild screens for every user with a persisted step
    ///
    /// Steps that are no longer registered are logged and skipped; the
    /// stale rows are left for the owner to clear.
    pub async fn restore(&self) -> Result<u32> {
        let states = self.states.list_in_flight().await?;
        let mut restored = 0u32;

        for state in states {
            let step = state.step.as_deref().unwrap_or_default();
            match self.registry.build(step, &state.user_id) {
                Some(_) => {
                    debug!(user_id = %state.user_id, step = step, "Restored flow screen");
                    restored += 1;
                }
                None => {
                    warn!(user_id = %state.user_id, step = step,
                          "Persisted step has no registered screen");
                }
            }
        }

        Ok(restored)
    }

    /// Start a flow for a user at the given step
    ///
    /// Persists the step and sends the screen's message with its
    /// keyboard.
    pub async fn start(&self, chat_id: ChatId, user_id: &str, step: &str) -> Result<Message> {
        let flow_screen = self
            .registry
            .build(step, user_id)
            .ok_or_else(|| FlowError::UnknownStep {
                step: step.to_string(),
            })?;

        self.states
            .upsert(user_id, StatePatch::new().step(step))
            .await?;

        let message = self
            .bot
            .send_message(chat_id, flow_screen.text())
            .reply_markup(screen::keyboard(flow_screen.as_ref()))
            .await?;

        info!(user_id = user_id, step = step, "Flow started");
        Ok(message)
    }

    /// Dispatch a callback query to the pressed button's screen
    ///
    /// Payloads that do not carry this library's prefix, or that name an
    /// unregistered step, are logged and skipped so the engine can share
    /// a dispatcher with other callback handlers. A payload that carries
    /// the prefix but fails to parse is an error.
    pub async fn handle_callback(&self, query: CallbackQuery) -> Result<()> {
        let user_id = query.from.id.0.to_string();

        let data = match query.data {
            Some(data) => data,
            None => return Ok(()),
        };

        // Answer the callback query first to remove the loading state
        if let Err(e) = self.bot.answer_callback_query(query.id.clone()).await {
            warn!(error = %e, "Failed to answer callback query");
        }

        let (step, action) = match screen::parse_callback(&data) {
            Some(parsed) => parsed,
            None => {
                if screen::is_flow_payload(&data) {
                    return Err(FlowError::MalformedCallback(data));
                }
                debug!(data = %data, "Callback payload is not a flow payload");
                return Ok(());
            }
        };

        let (chat_id, message_id) = match query.message.as_ref() {
            Some(message) => (message.chat().id, Some(message.id())),
            None => (ChatId(query.from.id.0 as i64), None),
        };

        let flow_screen = match self.registry.build(step, &user_id) {
            Some(flow_screen) => flow_screen,
            None => {
                warn!(step = step, "No registered screen for callback step");
                return Ok(());
            }
        };

        logging::log_button_press(&user_id, step, action);

        let cx = ScreenContext::new(
            self.bot.clone(),
            chat_id,
            message_id,
            user_id,
            self.states.clone(),
        );

        flow_screen.on_press(action, &cx).await?;

        if let Some(next_step) = screen::transition_target(flow_screen.as_ref(), action) {
            self.transition(&cx, step, &next_step).await?;
        }

        Ok(())
    }

    /// Persist the next step and swap the message to its screen
    async fn transition(&self, cx: &ScreenContext, from: &str, next_step: &str) -> Result<()> {
        let flow_screen = match self.registry.build(next_step, &cx.user_id) {
            Some(flow_screen) => flow_screen,
            None => {
                warn!(user_id = %cx.user_id, step = next_step,
                      "Transition target has no registered screen");
                return Ok(());
            }
        };

        self.states
            .upsert(&cx.user_id, StatePatch::new().step(next_step))
            .await?;

        match cx.message_id {
            Some(message_id) => {
                self.bot
                    .edit_message_text(cx.chat_id, message_id, flow_screen.text())
                    .reply_markup(screen::keyboard(flow_screen.as_ref()))
                    .await?;
            }
            None => {
                self.bot
                    .send_message(cx.chat_id, flow_screen.text())
                    .reply_markup(screen::keyboard(flow_screen.as_ref()))
                    .await?;
            }
        }

        logging::log_transition(&cx.user_id, Some(from), next_step);
        Ok(())
    }
}
