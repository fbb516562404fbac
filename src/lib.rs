//! # team-pulse
//!
//! Team-health estimation from commit and code-review records.
//!
//! Feed a [`RawData`] dataset to [`CollaborationEngine`] for the pure
//! collaboration analysis (ownership, knowledge silos, interaction network
//! and the two composite scores), or to [`TeamHealthAnalyzer`] for the full
//! report with sentiment, knowledge areas and recommendations.
//!
//! ```rust
//! use team_pulse::{CollaborationEngine, RawData};
//!
//! let report = CollaborationEngine::default().analyze(&RawData::default());
//! assert_eq!(report.collaboration_score, 0.0);
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod analyzers;
pub mod config;
pub mod engine;
pub mod error;
pub mod git;
pub mod input;
pub mod insights;
pub mod reporters;
pub mod scoring;
pub mod types;

pub use crate::engine::{CollaborationEngine, TeamHealthAnalyzer};
pub use crate::error::{Error, Result};
pub use crate::types::{CollaborationReport, RawData, Report};

/// The current version of team-pulse.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
