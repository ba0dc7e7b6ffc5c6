//! Amalgam - single-file source merger
//!
//! Concatenates the source files listed in a manifest into one output file,
//! dropping local `#include "..."` and `#pragma once` lines and marking each
//! merged section with a `//<file>` header.

pub mod config;
pub mod explain;
pub mod logging;
pub mod manifest;
pub mod merger;

pub use amalgam_filter::{classify_line, filter_source, DirectiveKind, LineClass};
pub use config::{ConfigError, EffectiveConfig, MergeConfig};
pub use explain::ExplainOutput;
pub use manifest::{Manifest, ManifestError};
pub use merger::{merge, EntryOutcome, EntryStatus, MergeError, MergeReport, Merger};
