//! Dashboard and analytics aggregations
//!
//! Everything here is a pure function over a borrowed activity slice: fresh
//! derived structures on every call, no mutation of the input, safe to
//! recompute on every render. The reporting window is the user-selected one
//! and has nothing to do with the level engine's fixed 12-month rule.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::levels::{filter_window, ReportingWindow};
use crate::models::activity::Activity;
use crate::normalize::competition_series_name;

/// ---------------------------------------------------------------------------
/// Monthly Activity Summary (dashboard bar chart)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
  /// Bucket key, `YYYY-MM`.
  pub month: String,
  /// Chart label, e.g. "jan 2024".
  pub label: String,
  pub trainings: usize,
  pub competitions: usize,
  pub total: usize,
}

/// Month-bucketed training/competition counts inside the reporting window,
/// sorted by month.
pub fn monthly_summary(activities: &[Activity], window: ReportingWindow) -> Vec<MonthlySummary> {
  let mut buckets: BTreeMap<String, (usize, usize)> = BTreeMap::new();

  for activity in filter_window(activities, window) {
    let date = match activity.parsed_date() {
      Some(date) => date,
      None => continue, // undated records can reach here via the all-time sentinel
    };
    let key = format!("{:04}-{:02}", date.year(), date.month());
    let bucket = buckets.entry(key).or_default();
    if activity.is_competition() {
      bucket.1 += 1;
    } else {
      bucket.0 += 1;
    }
  }

  buckets
    .into_iter()
    .map(|(month, (trainings, competitions))| MonthlySummary {
      label: month_label(&month),
      month,
      trainings,
      competitions,
      total: trainings + competitions,
    })
    .collect()
}

/// "YYYY-MM" -> "mmm yyyy" with Portuguese month abbreviations, as the
/// charts label their axes.
fn month_label(month: &str) -> String {
  const MONTHS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
  ];

  let (year, month_num) = match month.split_once('-') {
    Some((year, m)) => (year, m.parse::<usize>().unwrap_or(0)),
    None => (month, 0),
  };
  match month_num {
    1..=12 => format!("{} {}", MONTHS[month_num - 1], year),
    _ => month.to_string(),
  }
}

/// ---------------------------------------------------------------------------
/// Division Distribution (pie chart)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionCount {
  pub name: String,
  pub value: usize,
}

/// Participation count per division over competition records in the window,
/// optionally narrowed to one canonicalized competition series. Sorted by
/// division name.
pub fn division_distribution(
  activities: &[Activity],
  window: ReportingWindow,
  series: Option<&str>,
) -> Vec<DivisionCount> {
  let mut counts: BTreeMap<String, usize> = BTreeMap::new();

  for activity in competition_records(activities, window, series) {
    if let Some(division) = activity.division.as_deref() {
      if !division.trim().is_empty() {
        *counts.entry(division.to_string()).or_default() += 1;
      }
    }
  }

  counts
    .into_iter()
    .map(|(name, value)| DivisionCount { name, value })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Placement / Score Evolution (per-series line charts)
/// ---------------------------------------------------------------------------

/// One charted stage of a competition series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionPoint {
  /// Raw date string of the record.
  pub date: String,
  /// Chart label, `"{stage} (dd/mm)"`, with "Etapa Única" when the record
  /// has no stage.
  pub label: String,
  pub stage: Option<String>,
  /// Placement rank; 0 when the placement text had no digits.
  pub rank: u32,
  pub score: Option<f64>,
}

/// Ranking evolution per canonicalized series: date-ordered stages from
/// records that carry a non-blank placement, deduplicated by (stage, date)
/// so repeated imports chart once.
pub fn placement_evolution(
  activities: &[Activity],
  window: ReportingWindow,
  series: Option<&str>,
) -> BTreeMap<String, Vec<EvolutionPoint>> {
  evolution_series(activities, window, series, |a| {
    a.placement.as_deref().is_some_and(|p| !p.trim().is_empty())
  })
}

/// Score evolution per canonicalized series, for records with a competition
/// score. Same ordering and deduplication rules as `placement_evolution`.
pub fn score_evolution(
  activities: &[Activity],
  window: ReportingWindow,
  series: Option<&str>,
) -> BTreeMap<String, Vec<EvolutionPoint>> {
  evolution_series(activities, window, series, |a| a.competition_score.is_some())
}

fn evolution_series(
  activities: &[Activity],
  window: ReportingWindow,
  series: Option<&str>,
  keep: impl Fn(&Activity) -> bool,
) -> BTreeMap<String, Vec<EvolutionPoint>> {
  let mut grouped: BTreeMap<String, Vec<&Activity>> = BTreeMap::new();

  for activity in competition_records(activities, window, series) {
    if !keep(activity) {
      continue;
    }
    let name = competition_series_name(activity.competition_name.as_deref().unwrap_or(""));
    grouped.entry(name).or_default().push(activity);
  }

  grouped
    .into_iter()
    .map(|(name, mut records)| {
      records.sort_by_key(|a| a.parsed_date());

      let mut seen: HashSet<(Option<String>, Option<String>)> = HashSet::new();
      let points = records
        .into_iter()
        .filter(|a| seen.insert((a.stage.clone(), a.date.clone())))
        .map(evolution_point)
        .collect();

      (name, points)
    })
    .collect()
}

fn evolution_point(activity: &Activity) -> EvolutionPoint {
  let stage_label = activity.stage.as_deref().unwrap_or("Etapa Única");
  let date_label = activity
    .parsed_date()
    .map(|d| d.format("%d/%m").to_string())
    .unwrap_or_default();

  EvolutionPoint {
    date: activity.date.clone().unwrap_or_default(),
    label: format!("{} ({})", stage_label, date_label),
    stage: activity.stage.clone(),
    rank: activity.placement_rank().unwrap_or(0),
    score: activity.competition_score,
  }
}

/// ---------------------------------------------------------------------------
/// Series Listing and Summary Statistics
/// ---------------------------------------------------------------------------

/// Sorted distinct canonical series names across all competition records
/// (unwindowed, as the series picker shows every known series).
pub fn competition_series(activities: &[Activity]) -> Vec<String> {
  let mut names: Vec<String> = activities
    .iter()
    .filter(|a| a.is_competition())
    .map(|a| competition_series_name(a.competition_name.as_deref().unwrap_or("")))
    .collect();
  names.sort();
  names.dedup();
  names
}

/// Headline numbers for the analytics page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
  /// Distinct canonical series across the whole log.
  pub unique_competitions: usize,
  /// Competition records inside the reporting window.
  pub competition_activities: usize,
  /// Mean score over the deduplicated score-evolution points; 0 when there
  /// are none.
  pub mean_score: f64,
  /// Best (lowest positive) placement rank in the window.
  pub best_placement: Option<u32>,
  /// Division with the most participations in the window.
  pub top_division: Option<String>,
}

pub fn performance_stats(
  activities: &[Activity],
  window: ReportingWindow,
  series: Option<&str>,
) -> PerformanceStats {
  let scores: Vec<f64> = score_evolution(activities, window, series)
    .into_values()
    .flatten()
    .filter_map(|point| point.score)
    .collect();
  let mean_score = if scores.is_empty() {
    0.0
  } else {
    scores.iter().sum::<f64>() / scores.len() as f64
  };

  let best_placement = placement_evolution(activities, window, series)
    .into_values()
    .flatten()
    .map(|point| point.rank)
    .filter(|rank| *rank > 0)
    .min();

  let distribution = division_distribution(activities, window, series);
  let top_division = distribution
    .iter()
    .max_by_key(|d| d.value)
    .map(|d| d.name.clone());

  PerformanceStats {
    unique_competitions: competition_series(activities).len(),
    competition_activities: competition_records(activities, window, series).count(),
    mean_score,
    best_placement,
    top_division,
  }
}

/// Windowed competition records, optionally narrowed to one series.
fn competition_records<'a>(
  activities: &'a [Activity],
  window: ReportingWindow,
  series: Option<&'a str>,
) -> impl Iterator<Item = &'a Activity> {
  filter_window(activities, window)
    .into_iter()
    .filter(|a| a.is_competition())
    .filter(move |a| match series {
      None => true,
      Some(series) => {
        competition_series_name(a.competition_name.as_deref().unwrap_or("")) == series
      }
    })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
