//! Two-step confirmation flow demo
//!
//! A bot with a start screen and a confirmation screen. Proceed moves the
//! user forward, Confirm records the decision and ends the flow, Cancel
//! records the refusal and returns to the start screen.

use futures::future::BoxFuture;
use teloxide::{prelude::*, types::Message};
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands;
use tracing::info;

use stepflow::{
    config::Settings,
    database::connection::{create_pool, DatabaseConfig},
    utils::logging,
    FlowButton, FlowEngine, FlowScreen, ScreenContext, ScreenRegistry, StatePatch,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

struct StartScreen;

impl FlowScreen for StartScreen {
    fn step(&self) -> &str {
        "start"
    }

    fn text(&self) -> String {
        "Welcome to the workflow!".to_string()
    }

    fn buttons(&self) -> Vec<FlowButton> {
        vec![FlowButton::new("Proceed")
            .action("start_proceed")
            .next_step("confirmation")]
    }
}

struct ConfirmationScreen;

impl FlowScreen for ConfirmationScreen {
    fn step(&self) -> &str {
        "confirmation"
    }

    fn text(&self) -> String {
        "Please confirm your choice.".to_string()
    }

    fn buttons(&self) -> Vec<FlowButton> {
        vec![
            FlowButton::new("Confirm").action("confirm_confirm"),
            FlowButton::new("Cancel")
                .action("confirm_cancel")
                .next_step("start"),
        ]
    }

    fn on_press<'a>(
        &'a self,
        action: &'a str,
        cx: &'a ScreenContext,
    ) -> BoxFuture<'a, stepflow::Result<()>> {
        Box::pin(async move {
            match action {
                "confirm_confirm" => {
                    cx.update_state(StatePatch::new().confirmed(true).clear_step())
                        .await?;
                    cx.reply("Confirmed!").await?;
                }
                "confirm_cancel" => {
                    cx.update_state(StatePatch::new().confirmed(false)).await?;
                }
                _ => {}
            }
            Ok(())
        })
    }
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Confirm bot commands")]
enum Command {
    #[command(description = "Start the confirmation workflow")]
    Start,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::new()?;
    settings.validate()?;

    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting confirm bot...");

    let pool = create_pool(&DatabaseConfig::from_settings(&settings.database)).await?;

    let mut registry = ScreenRegistry::new();
    registry.register("start", |_user_id: &str| StartScreen);
    registry.register("confirmation", |_user_id: &str| ConfirmationScreen);

    let bot = Bot::new(&settings.bot.token);
    let engine = FlowEngine::new(bot.clone(), pool, registry);

    let restored = engine.init().await?;
    info!(restored = restored, "Confirm bot is ready!");

    Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![engine])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Confirm bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback))
}

/// Handle bot commands
async fn handle_command(msg: Message, cmd: Command, engine: FlowEngine) -> HandlerResult {
    match cmd {
        Command::Start => {
            let user = match msg.from.as_ref() {
                Some(user) => user,
                None => return Ok(()),
            };
            engine
                .start(msg.chat.id, &user.id.0.to_string(), "start")
                .await?;
        }
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callback(query: CallbackQuery, engine: FlowEngine) -> HandlerResult {
    engine.handle_callback(query).await?;
    Ok(())
}
