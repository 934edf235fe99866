use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::StoreConfig;
use crate::models::activity::{Activity, ActivityPatch, NewActivity};

pub type DbPool = SqlitePool;

/// ---------------------------------------------------------------------------
/// Errors
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Activity not found: {0}")]
  NotFound(i64),
}

// Serialize as the display string so the error crosses an IPC or JSON
// boundary as a plain message.
impl serde::Serialize for StoreError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(self.to_string().as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Bulk operation outcomes
/// ---------------------------------------------------------------------------

/// Per-record result of a bulk insert, reported in input order. One bad
/// record never aborts the rest of the batch.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BulkCreateOutcome {
  pub index: usize,
  pub created_id: Option<i64>,
  pub error: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct BulkDeleteOutcome {
  pub id: i64,
  pub error: Option<String>,
}

/// ---------------------------------------------------------------------------
/// Activity Store
/// ---------------------------------------------------------------------------

/// SQLite-backed activity log. Every query is scoped by `user_id`; there is
/// no ambient current user.
pub struct ActivityStore {
  pool: DbPool,
}

impl ActivityStore {
  /// Connect to the configured database and run migrations.
  pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
    let pool = SqlitePoolOptions::new()
      .max_connections(5)
      .connect(&config.database_url)
      .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("Activity store ready at: {}", config.database_url);

    Ok(Self { pool })
  }

  /// Wrap an already-initialized pool (tests use this with an in-memory
  /// database).
  pub fn with_pool(pool: DbPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }

  /// All activities for one user, newest first.
  pub async fn list(&self, user_id: i64) -> Result<Vec<Activity>, StoreError> {
    let activities = sqlx::query_as::<_, Activity>(
      r#"
      SELECT id, user_id, date, equipment, caliber, division, shot_count,
             competition_name, stage, placement, competition_score, club, created_at
      FROM activities
      WHERE user_id = ?1
      ORDER BY date DESC
      "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(activities)
  }

  pub async fn get(&self, user_id: i64, id: i64) -> Result<Activity, StoreError> {
    sqlx::query_as::<_, Activity>(
      r#"
      SELECT id, user_id, date, equipment, caliber, division, shot_count,
             competition_name, stage, placement, competition_score, club, created_at
      FROM activities
      WHERE user_id = ?1 AND id = ?2
      "#,
    )
    .bind(user_id)
    .bind(id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or(StoreError::NotFound(id))
  }

  /// Insert one activity and return its id.
  pub async fn create(&self, user_id: i64, activity: &NewActivity) -> Result<i64, StoreError> {
    let result = sqlx::query(
      r#"
      INSERT INTO activities (
        user_id, date, equipment, caliber, division, shot_count,
        competition_name, stage, placement, competition_score, club
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
      "#,
    )
    .bind(user_id)
    .bind(&activity.date)
    .bind(&activity.equipment)
    .bind(&activity.caliber)
    .bind(&activity.division)
    .bind(activity.shot_count)
    .bind(&activity.competition_name)
    .bind(&activity.stage)
    .bind(&activity.placement)
    .bind(activity.competition_score)
    .bind(&activity.club)
    .execute(&self.pool)
    .await?;

    Ok(result.last_insert_rowid())
  }

  /// Partial update: only the fields present in the patch change, everything
  /// else keeps its stored value.
  pub async fn update(
    &self,
    user_id: i64,
    id: i64,
    patch: &ActivityPatch,
  ) -> Result<Activity, StoreError> {
    let result = sqlx::query(
      r#"
      UPDATE activities SET
        date = COALESCE(?3, date),
        equipment = COALESCE(?4, equipment),
        caliber = COALESCE(?5, caliber),
        division = COALESCE(?6, division),
        shot_count = COALESCE(?7, shot_count),
        competition_name = COALESCE(?8, competition_name),
        stage = COALESCE(?9, stage),
        placement = COALESCE(?10, placement),
        competition_score = COALESCE(?11, competition_score),
        club = COALESCE(?12, club)
      WHERE user_id = ?1 AND id = ?2
      "#,
    )
    .bind(user_id)
    .bind(id)
    .bind(&patch.date)
    .bind(&patch.equipment)
    .bind(&patch.caliber)
    .bind(&patch.division)
    .bind(patch.shot_count)
    .bind(&patch.competition_name)
    .bind(&patch.stage)
    .bind(&patch.placement)
    .bind(patch.competition_score)
    .bind(&patch.club)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(StoreError::NotFound(id));
    }

    self.get(user_id, id).await
  }

  pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM activities WHERE user_id = ?1 AND id = ?2")
      .bind(user_id)
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(StoreError::NotFound(id));
    }

    Ok(())
  }

  /// Insert a batch, one record at a time, collecting a per-record outcome in
  /// input order.
  pub async fn create_many(
    &self,
    user_id: i64,
    activities: &[NewActivity],
  ) -> Vec<BulkCreateOutcome> {
    let mut outcomes = Vec::with_capacity(activities.len());

    for (index, activity) in activities.iter().enumerate() {
      match self.create(user_id, activity).await {
        Ok(id) => outcomes.push(BulkCreateOutcome {
          index,
          created_id: Some(id),
          error: None,
        }),
        Err(e) => outcomes.push(BulkCreateOutcome {
          index,
          created_id: None,
          error: Some(e.to_string()),
        }),
      }
    }

    outcomes
  }

  /// Delete a batch of ids, collecting a per-id outcome. Missing ids report
  /// their error without stopping the rest.
  pub async fn delete_many(&self, user_id: i64, ids: &[i64]) -> Vec<BulkDeleteOutcome> {
    let mut outcomes = Vec::with_capacity(ids.len());

    for &id in ids {
      let error = self.delete(user_id, id).await.err().map(|e| e.to_string());
      outcomes.push(BulkDeleteOutcome { id, error });
    }

    outcomes
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
