pub mod activity;
pub mod level;

pub use activity::{Activity, ActivityPatch, NewActivity};
pub use level::{GroupCounts, Level, LevelResult, NextLevelProgress, Requirement};
