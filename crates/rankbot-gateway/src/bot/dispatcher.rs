//! Long-polling update loop
//!
//! Updates are fetched in order and handled one at a time. A failing message
//! is logged and answered with a generic reply; callback queries answer
//! themselves. A failure never stops the loop.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::error::HandlerError;
use super::handlers::{self, GENERIC_FAILURE};
use super::state::BotState;
use crate::render::escape_html;
use crate::telegram::{TelegramError, Update};

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Doubled delay after another failed poll, capped at `MAX_BACKOFF`
pub fn next_backoff(current: Duration) -> Duration {
    current.saturating_mul(2).min(MAX_BACKOFF)
}

/// Offset acknowledging every update up to and including `updates`' last one
pub fn next_offset(current: Option<i64>, updates: &[Update]) -> Option<i64> {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .max(current)
}

pub struct Dispatcher {
    state: BotState,
}

impl Dispatcher {
    pub fn new(state: BotState) -> Self {
        Self { state }
    }

    /// Poll and handle updates until the task is cancelled
    pub async fn run(&self) {
        info!(bot = %self.state.username(), "Polling for updates");

        let mut offset = None;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            let updates = match self.state.client().get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    self.log_poll_failure(&e, backoff);
                    tokio::time::sleep(backoff).await;
                    backoff = next_backoff(backoff);
                    continue;
                }
            };
            backoff = INITIAL_BACKOFF;

            for update in &updates {
                self.handle_update(update).await;
            }
            offset = next_offset(offset, &updates);
        }
    }

    fn log_poll_failure(&self, e: &TelegramError, backoff: Duration) {
        if e.is_transient() {
            warn!(error = %e, retry_in_secs = backoff.as_secs(), "Polling failed");
        } else {
            error!(error = %e, retry_in_secs = backoff.as_secs(), "Polling rejected");
        }
    }

    async fn handle_update(&self, update: &Update) {
        debug!(update_id = update.update_id, "Handling update");

        if let Some(message) = &update.message {
            if let Err(e) = handlers::message::handle(&self.state, message).await {
                error!(update_id = update.update_id, error = %e, "Message handling failed");
                let text = failure_text(&e);
                if let Err(e) = self.state.reply(message, text).await {
                    warn!(error = %e, "Could not deliver failure reply");
                }
            }
        }

        if let Some(query) = &update.callback_query {
            if let Err(e) = handlers::callback::handle(&self.state, query).await {
                error!(update_id = update.update_id, error = %e, "Callback handling failed");
            }
        }
    }
}

fn failure_text(err: &HandlerError) -> String {
    match err {
        HandlerError::Service(e) if e.is_user_error() => escape_html(&e.to_string()),
        _ => GENERIC_FAILURE.to_string(),
    }
}
