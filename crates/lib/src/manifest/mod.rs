//! Application manifest parsing and canonicalization.
//!
//! A manifest is the INI-like metadata a Flatpak application ships with: the
//! `[Context]` section lists filesystem, device and socket grants, the bus
//! policy sections list D-Bus access, and so on. This module turns the raw
//! text into a [`Manifest`] and then into a [`CanonicalManifest`], the sorted
//! and filtered form the detector compares.

mod canonical;
mod parse;

pub use canonical::*;
pub use parse::*;
