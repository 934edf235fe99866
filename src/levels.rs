//! Equipment-group level classification
//!
//! Groups the activity log by (generic equipment category, normalized
//! caliber) and assigns each group a proficiency tier from its trailing
//! 12-month counts:
//! - Nível 3 "Nacional": 20+ activities and 6+ competitions
//! - Nível 2 "Regional": 12+ activities and 4+ competitions
//! - Nível 1 "Habitualidade": 8+ activities
//!
//! The level window is fixed at 12 months and is independent of the
//! user-selected reporting window, which only drives the informational
//! period counts.

use chrono::{DateTime, Months, Utc};
use std::collections::BTreeMap;

use crate::models::activity::Activity;
use crate::models::level::{GroupCounts, Level, LevelResult, NextLevelProgress};
use crate::normalize::{classify_equipment, normalize_caliber, EquipmentCategory};

/// The level criteria always look at this trailing window, regardless of the
/// reporting window selected for display.
pub const LEVEL_WINDOW_MONTHS: u32 = 12;

// ---------------------------------------------------------------------------
/// Reporting Window: the user-selected display period
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportingWindow {
  /// Trailing N calendar months from now.
  Months(u32),
  /// Sentinel: no filtering at all.
  AllTime,
}

impl ReportingWindow {
  /// The instant records must be strictly after, or `None` for all-time.
  pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match self {
      ReportingWindow::AllTime => None,
      ReportingWindow::Months(months) => now.checked_sub_months(Months::new(*months)),
    }
  }
}

impl Default for ReportingWindow {
  fn default() -> Self {
    ReportingWindow::Months(LEVEL_WINDOW_MONTHS)
  }
}

/// Select the records inside the window. The all-time sentinel returns every
/// record in input order; once a cutoff applies, records with missing or
/// unparseable dates are excluded.
pub fn filter_window<'a>(activities: &'a [Activity], window: ReportingWindow) -> Vec<&'a Activity> {
  let cutoff = match window.cutoff(Utc::now()) {
    None => return activities.iter().collect(),
    Some(cutoff) => cutoff,
  };

  activities
    .iter()
    .filter(|a| a.parsed_date().is_some_and(|date| date > cutoff))
    .collect()
}

// ---------------------------------------------------------------------------
/// Partition: trainings vs competitions
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Partition<'a> {
  pub trainings: Vec<&'a Activity>,
  pub competitions: Vec<&'a Activity>,
}

impl Partition<'_> {
  pub fn counts(&self) -> GroupCounts {
    GroupCounts::new(self.trainings.len(), self.competitions.len())
  }
}

/// Split records by the competition-name discriminator. Every input record
/// lands in exactly one side.
pub fn partition<'a, I>(activities: I) -> Partition<'a>
where
  I: IntoIterator<Item = &'a Activity>,
{
  let mut split = Partition::default();
  for activity in activities {
    if activity.is_competition() {
      split.competitions.push(activity);
    } else {
      split.trainings.push(activity);
    }
  }
  split
}

// ---------------------------------------------------------------------------
/// Equipment Groups
// ---------------------------------------------------------------------------

/// One (category, caliber) grouping key. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub struct EquipmentGroup {
  pub category: EquipmentCategory,
  pub caliber: String,
}

impl EquipmentGroup {
  /// The grouping key every activity maps onto, defined even when fields
  /// are empty (empty equipment classifies as Pistol, empty caliber stays
  /// empty). Group *creation* is stricter, see `equipment_groups`.
  pub fn for_activity(activity: &Activity) -> Self {
    Self {
      category: classify_equipment(activity.equipment.as_deref().unwrap_or("")),
      caliber: normalize_caliber(activity.caliber.as_deref().unwrap_or("")),
    }
  }

  /// Stable map key, e.g. "Pistola|9mm".
  pub fn key(&self) -> String {
    format!("{}|{}", self.category.as_str(), self.caliber)
  }

  /// Human-readable label, e.g. "Pistola 9mm".
  pub fn display_name(&self) -> String {
    format!("{} {}", self.category.as_str(), self.caliber)
  }
}

/// The distinct groups observed in the log, from records where both
/// equipment and caliber are non-empty. Output is sorted by key, so the same
/// activity set yields the same groups whatever order it arrives in.
pub fn equipment_groups(activities: &[Activity]) -> Vec<EquipmentGroup> {
  let mut groups: Vec<EquipmentGroup> = Vec::new();

  for activity in activities {
    let has_equipment = activity
      .equipment
      .as_deref()
      .is_some_and(|e| !e.trim().is_empty());
    let has_caliber = activity
      .caliber
      .as_deref()
      .is_some_and(|c| !c.trim().is_empty());
    if !has_equipment || !has_caliber {
      continue;
    }

    let group = EquipmentGroup::for_activity(activity);
    if !groups.contains(&group) {
      groups.push(group);
    }
  }

  groups.sort();
  groups
}

// ---------------------------------------------------------------------------
/// Level Classification
// ---------------------------------------------------------------------------

/// Classify every equipment group in the activity set.
///
/// Returns a map from group key to result, in sorted key order. The level
/// and its progress always come from the fixed 12-month window; `window`
/// only fills the informational `period_counts` when it differs from that.
pub fn classify_levels(
  activities: &[Activity],
  window: ReportingWindow,
) -> BTreeMap<String, LevelResult> {
  let mut results = BTreeMap::new();

  for group in equipment_groups(activities) {
    let group_records: Vec<&Activity> = activities
      .iter()
      .filter(|a| EquipmentGroup::for_activity(a) == group)
      .collect();

    let result = classify_group(&group, &group_records, window);
    results.insert(group.key(), result);
  }

  results
}

fn classify_group(
  group: &EquipmentGroup,
  group_records: &[&Activity],
  window: ReportingWindow,
) -> LevelResult {
  let level_cutoff = ReportingWindow::Months(LEVEL_WINDOW_MONTHS).cutoff(Utc::now());

  let in_level_window: Vec<&Activity> = group_records
    .iter()
    .copied()
    .filter(|a| {
      a.parsed_date()
        .zip(level_cutoff)
        .is_some_and(|(date, cutoff)| date > cutoff)
    })
    .collect();

  let counts = partition(in_level_window).counts();
  let level = Level::from_counts(counts.total_activities, counts.competitions);
  let progress = NextLevelProgress::for_level(level, counts.total_activities, counts.competitions);

  // Informational counts over the selected reporting period, only when it
  // is not the level window itself.
  let period_counts = if window == ReportingWindow::Months(LEVEL_WINDOW_MONTHS) {
    None
  } else {
    let cutoff = window.cutoff(Utc::now());
    let in_period = group_records.iter().copied().filter(|a| match cutoff {
      None => true,
      Some(cutoff) => a.parsed_date().is_some_and(|date| date > cutoff),
    });
    Some(partition(in_period).counts())
  };

  // Divisions seen anywhere in the group, first-seen order.
  let mut divisions: Vec<String> = Vec::new();
  for record in group_records {
    if let Some(division) = record.division.as_deref() {
      if !division.trim().is_empty() && !divisions.iter().any(|d| d == division) {
        divisions.push(division.to_string());
      }
    }
  }

  LevelResult {
    level,
    progress,
    display_name: group.display_name(),
    counts,
    period_counts,
    divisions,
  }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
