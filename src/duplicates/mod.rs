//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Coarse and fine fingerprint construction (Phase 1 / Phase 2)
//! - Order-stable grouping by fingerprint
//! - The escalation pipeline: timestamp short-circuit, pixel-level
//!   disambiguation only for coarse collisions that need it

pub mod finder;
pub mod fingerprint;
pub mod groups;

pub use finder::{DedupeOutcome, DedupeStats, DuplicateFinder, FinderConfig, FinderError};
pub use fingerprint::Fingerprint;
pub use groups::{filter_actionable, group_by_fingerprint, DuplicateGroup, GroupingStats};
