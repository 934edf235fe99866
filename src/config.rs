use crate::store::StoreError;

/// Store configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct StoreConfig {
  pub database_url: String,
}

impl StoreConfig {
  /// Load from environment variables (a `.env` file is honored when present).
  /// `SHOOTING_LOG_DATABASE_URL` wins over the generic `DATABASE_URL`.
  pub fn from_env() -> Result<Self, StoreError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SHOOTING_LOG_DATABASE_URL")
      .or_else(|_| std::env::var("DATABASE_URL"))
      .map_err(|_| {
        StoreError::MissingConfig(
          "SHOOTING_LOG_DATABASE_URL or DATABASE_URL must be set".to_string(),
        )
      })?;

    Ok(Self { database_url })
  }

  /// In-memory database, used by tests.
  pub fn in_memory() -> Self {
    Self {
      database_url: "sqlite::memory:".to_string(),
    }
  }
}
