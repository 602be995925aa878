//! Crate-wide constants.

pub const APP_NAME: &str = "flatguard";

/// Program used for every package query and update.
pub const FLATPAK_BIN: &str = "flatpak";

/// Program used to deliver desktop notifications.
pub const NOTIFY_BIN: &str = "notify-send";

pub const LOG_FILENAME: &str = "flatguard.log";

/// Sections skipped when comparing manifests unless the config says otherwise.
pub const DEFAULT_IGNORED_SECTIONS: &[&str] = &["Application", "Runtime", "Instance", "Extra Data"];

/// Sections that carry sandbox grants and may never be ignored.
pub const PROTECTED_SECTIONS: &[&str] = &[
  "Context",
  "Permissions",
  "Session Bus Policy",
  "System Bus Policy",
  "Environment",
];

/// Prefix of per-subsystem policy sections such as `[Policy dconf]`.
pub const PROTECTED_SECTION_PREFIX: &str = "Policy ";

/// Number of leading characters used when comparing commit identifiers.
pub const COMMIT_PREFIX_LEN: usize = 12;

pub const PERMISSION_CHANGE_TITLE: &str = "Flatpak updates held back: permissions changed";

pub const OUTDATED_INSTANCE_TITLE: &str = "Running Flatpak applications are outdated";
