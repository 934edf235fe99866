use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Proficiency Level: the tier assigned per equipment group
/// ---------------------------------------------------------------------------

/// Thresholds are always evaluated over the fixed trailing 12-month window,
/// highest tier first.
pub const NATIONAL_MIN_ACTIVITIES: usize = 20;
pub const NATIONAL_MIN_COMPETITIONS: usize = 6;
pub const REGIONAL_MIN_ACTIVITIES: usize = 12;
pub const REGIONAL_MIN_COMPETITIONS: usize = 4;
pub const HABITUAL_MIN_ACTIVITIES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Level {
  /// No tier reached yet
  #[default]
  Unranked,
  /// Nível 1: 8+ activities, no competition minimum
  Habitual,
  /// Nível 2: 12+ activities and 4+ competitions
  Regional,
  /// Nível 3: 20+ activities and 6+ competitions (terminal)
  National,
}

impl Level {
  /// Assign the level from 12-month counts. `total_activities` is the
  /// combined trainings + competitions count.
  pub fn from_counts(total_activities: usize, competitions: usize) -> Self {
    if total_activities >= NATIONAL_MIN_ACTIVITIES && competitions >= NATIONAL_MIN_COMPETITIONS {
      Level::National
    } else if total_activities >= REGIONAL_MIN_ACTIVITIES
      && competitions >= REGIONAL_MIN_COMPETITIONS
    {
      Level::Regional
    } else if total_activities >= HABITUAL_MIN_ACTIVITIES {
      Level::Habitual
    } else {
      Level::Unranked
    }
  }

  pub fn rank(&self) -> u8 {
    match self {
      Level::Unranked => 0,
      Level::Habitual => 1,
      Level::Regional => 2,
      Level::National => 3,
    }
  }

  pub fn display_name(&self) -> &'static str {
    match self {
      Level::Unranked => "Sem Nível",
      Level::Habitual => "Habitualidade (Nível 1)",
      Level::Regional => "Regional (Nível 2)",
      Level::National => "Nacional (Nível 3)",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Progress toward the next tier
/// ---------------------------------------------------------------------------

/// One counted requirement (e.g. 12 of 20 activities).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
  pub current: usize,
  pub needed: usize,
}

impl Requirement {
  pub fn new(current: usize, needed: usize) -> Self {
    Self { current, needed }
  }

  /// Completion percentage, capped at 100. A zero `needed` clamps to 0
  /// rather than dividing by zero.
  pub fn percent(&self) -> f64 {
    if self.needed == 0 {
      return 0.0;
    }
    ((self.current as f64 / self.needed as f64) * 100.0).min(100.0)
  }

  pub fn remaining(&self) -> usize {
    self.needed.saturating_sub(self.current)
  }
}

/// Progress-to-next-level, recomputed on every pass.
///
/// `total_activities` is always the combined trainings + competitions count,
/// the same number the level thresholds are evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NextLevelProgress {
  /// Level 3 is terminal; no numeric progress.
  Maximum,
  /// Working toward Regional or National: both an activity total and a
  /// competition minimum apply.
  Toward {
    target: Level,
    total_activities: Requirement,
    competitions: Requirement,
  },
  /// Working toward Habitual: only the activity total applies.
  TowardHabitual { activities: Requirement },
}

impl NextLevelProgress {
  pub fn for_level(level: Level, total_activities: usize, competitions: usize) -> Self {
    match level {
      Level::National => NextLevelProgress::Maximum,
      Level::Regional => NextLevelProgress::Toward {
        target: Level::National,
        total_activities: Requirement::new(total_activities, NATIONAL_MIN_ACTIVITIES),
        competitions: Requirement::new(competitions, NATIONAL_MIN_COMPETITIONS),
      },
      Level::Habitual => NextLevelProgress::Toward {
        target: Level::Regional,
        total_activities: Requirement::new(total_activities, REGIONAL_MIN_ACTIVITIES),
        competitions: Requirement::new(competitions, REGIONAL_MIN_COMPETITIONS),
      },
      Level::Unranked => NextLevelProgress::TowardHabitual {
        activities: Requirement::new(total_activities, HABITUAL_MIN_ACTIVITIES),
      },
    }
  }

  /// Progress-bar percentage as the dashboard renders it: habitual target is
  /// a single bar, the combined targets split 50/50 between activity total
  /// and competitions, and Maximum is a full bar.
  pub fn percent_complete(&self) -> f64 {
    match self {
      NextLevelProgress::Maximum => 100.0,
      NextLevelProgress::TowardHabitual { activities } => activities.percent(),
      NextLevelProgress::Toward {
        total_activities,
        competitions,
        ..
      } => (total_activities.percent() / 2.0 + competitions.percent() / 2.0).min(100.0),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Per-group classification output
/// ---------------------------------------------------------------------------

/// Training/competition counts over one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCounts {
  pub trainings: usize,
  pub competitions: usize,
  pub total_activities: usize,
}

impl GroupCounts {
  pub fn new(trainings: usize, competitions: usize) -> Self {
    Self {
      trainings,
      competitions,
      total_activities: trainings + competitions,
    }
  }
}

/// Ephemeral classification result for one equipment group. Rebuilt wholesale
/// on every dashboard read; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelResult {
  pub level: Level,
  pub progress: NextLevelProgress,
  pub display_name: String,
  /// 12-month counts the level was derived from.
  pub counts: GroupCounts,
  /// Counts over the user-selected reporting window, when it differs from
  /// the fixed 12-month level window. Informational only.
  pub period_counts: Option<GroupCounts>,
  /// Distinct division labels seen across the group, in first-seen order.
  pub divisions: Vec<String>,
}
