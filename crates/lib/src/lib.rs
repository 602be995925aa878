//! flatguard-lib: permission-aware Flatpak updates.
//!
//! The crate is organised around one update cycle per application:
//! - `pkg`: querying the package manager for manifests, commits and updates
//! - `manifest`: parsing manifests and reducing them to a canonical form
//! - `detect`: comparing canonical forms and describing the difference
//! - `update`: the update pass that updates or holds back each application
//! - `outdated`: finding running instances older than the installed build

pub mod config;
pub mod consts;
pub mod deps;
pub mod detect;
pub mod manifest;
pub mod notify;
pub mod outdated;
pub mod pkg;
pub mod platform;
pub mod run_lock;
pub mod update;
pub mod util;
