//! Activity log and proficiency analytics for sport shooters.
//!
//! The crate turns a free-text activity log (range trainings and competition
//! stages) into per-equipment proficiency levels and dashboard aggregates:
//!
//! - [`normalize`]: caliber, equipment, and competition-name canonicalization
//! - [`levels`]: windowing, partitioning, grouping, and the level engine
//! - [`reports`]: monthly summaries, division distribution, evolution charts
//! - [`store`]: SQLite persistence, scoped per user
//!
//! All derived data is recomputed from the raw log on every read; nothing
//! computed is ever persisted.

pub mod config;
pub mod levels;
pub mod models;
pub mod normalize;
pub mod reports;
pub mod store;

#[cfg(test)]
pub mod test_utils;
