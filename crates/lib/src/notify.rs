//! Desktop notifications.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::{APP_NAME, NOTIFY_BIN};
use crate::pkg::exec::{self, CommandError};

/// A notification payload: a fixed title and a body of one item per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
  pub title: String,
  pub body: String,
}

impl Notification {
  /// Build a notification listing `items`, or `None` if there are none.
  pub fn listing<I, S>(title: &str, items: I) -> Option<Self>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let lines: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    if lines.is_empty() {
      return None;
    }
    Some(Self {
      title: title.to_string(),
      body: lines.join("\n"),
    })
  }
}

#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(#[from] pub CommandError);

pub trait Notifier {
  fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Sends notifications through `notify-send`.
#[derive(Debug, Clone)]
pub struct NotifySend {
  program: String,
}

impl NotifySend {
  pub fn new() -> Self {
    Self {
      program: NOTIFY_BIN.to_string(),
    }
  }

  pub fn with_program(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
    }
  }
}

impl Default for NotifySend {
  fn default() -> Self {
    Self::new()
  }
}

impl Notifier for NotifySend {
  fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
    let app_name = format!("--app-name={}", APP_NAME);
    exec::run(
      &self.program,
      [app_name.as_str(), notification.title.as_str(), notification.body.as_str()],
    )?;
    Ok(())
  }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
  fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
    debug!(title = %notification.title, "notifications disabled, not sending");
    Ok(())
  }
}

/// Send a notification if there is one, ignoring failures.
///
/// Returns whether the notifier accepted it.
pub fn send_best_effort(notifier: &dyn Notifier, notification: Option<&Notification>) -> bool {
  let Some(notification) = notification else {
    return false;
  };

  match notifier.notify(notification) {
    Ok(()) => true,
    Err(e) => {
      debug!(error = %e, title = %notification.title, "notification not delivered");
      false
    }
  }
}
