//! Notification sink
//!
//! Email delivery is an external collaborator; the core only ever asks for
//! "send a buyback confirmation to user X" through this trait.

use crate::cli::types::UserId;
use crate::error::Result;
use tracing::info;

pub trait NotificationSink {
    fn send_buyback_confirmation(&mut self, user_id: UserId) -> Result<()>;
}

/// Sink that records the request in the log instead of sending mail.
/// Stands in wherever a real mailer is not wired up.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn send_buyback_confirmation(&mut self, user_id: UserId) -> Result<()> {
        info!(user_id = user_id.as_i64(), "buyback confirmation requested");
        Ok(())
    }
}
