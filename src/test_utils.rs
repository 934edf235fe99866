//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock activity factories
//! - Helper assertions

use crate::models::activity::Activity;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed the database with alternating trainings and competitions for one
/// user. Returns the IDs of created activities.
pub async fn seed_test_activities(pool: &SqlitePool, user_id: i64, count: usize) -> Vec<i64> {
  let mut ids = Vec::new();

  for i in 0..count {
    let competition_name = if i % 2 == 0 {
      None
    } else {
      Some("Copa Teste".to_string())
    };

    let result = sqlx::query(
      r#"
      INSERT INTO activities (user_id, date, equipment, caliber, competition_name)
      VALUES (?1, ?2, ?3, ?4, ?5)
      "#,
    )
    .bind(user_id)
    .bind(iso_days_ago(i as i64))
    .bind("Pistola Glock 17")
    .bind("9mm")
    .bind(competition_name)
    .execute(pool)
    .await
    .expect("Failed to insert test activity");

    ids.push(result.last_insert_rowid());
  }

  ids
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

fn base_activity(days_ago: i64, equipment: &str, caliber: &str) -> Activity {
  Activity {
    id: 0,
    user_id: 1,
    date: Some(iso_days_ago(days_ago)),
    equipment: Some(equipment.to_string()),
    caliber: Some(caliber.to_string()),
    division: None,
    shot_count: Some(50),
    competition_name: None,
    stage: None,
    placement: None,
    competition_score: None,
    club: None,
    created_at: Some(Utc::now()),
  }
}

/// Create a mock training session N days ago
pub fn mock_training(days_ago: i64, equipment: &str, caliber: &str) -> Activity {
  base_activity(days_ago, equipment, caliber)
}

/// Create a mock competition stage N days ago
pub fn mock_competition(days_ago: i64, name: &str, equipment: &str, caliber: &str) -> Activity {
  let mut activity = base_activity(days_ago, equipment, caliber);
  activity.competition_name = Some(name.to_string());
  activity
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// RFC 3339 date string N days ago from now
pub fn iso_days_ago(days: i64) -> String {
  (Utc::now() - Duration::days(days)).to_rfc3339()
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name = 'activities'",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_activities_returns_correct_count() {
    let pool = setup_test_db().await;

    let ids = seed_test_activities(&pool, 1, 6).await;
    assert_eq!(ids.len(), 6);

    let competitions: i64 = sqlx::query_scalar(
      "SELECT COUNT(*) FROM activities WHERE competition_name IS NOT NULL",
    )
    .fetch_one(&pool)
    .await
    .expect("Failed to count competitions");

    assert_eq!(competitions, 3);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let training = mock_training(3, "Pistola Glock 17", "9mm");
    assert!(!training.is_competition());
    assert!(training.parsed_date().is_some());

    let competition = mock_competition(3, "Copa SP", "Revolver Taurus 85", ".38");
    assert!(competition.is_competition());
    assert_eq!(competition.caliber.as_deref(), Some(".38"));
  }

  #[test]
  fn test_iso_days_ago_parses_back() {
    let raw = iso_days_ago(7);
    let parsed = chrono::DateTime::parse_from_rfc3339(&raw).expect("should parse");
    let diff = Utc::now() - parsed.with_timezone(&Utc);
    assert!(diff.num_days() >= 6 && diff.num_days() <= 8);
  }
}
