use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One logged range session or competition stage.
///
/// Dates arrive as free text from manual entry and bulk imports, so they are
/// kept raw; `parsed_date` is the only path into date arithmetic and returns
/// `None` for anything unparseable.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Activity {
  pub id: i64,
  pub user_id: i64,
  pub date: Option<String>,
  pub equipment: Option<String>,
  pub caliber: Option<String>,
  pub division: Option<String>,
  pub shot_count: Option<i64>,
  pub competition_name: Option<String>,
  pub stage: Option<String>,
  pub placement: Option<String>,
  pub competition_score: Option<f64>,
  pub club: Option<String>,
  pub created_at: Option<DateTime<Utc>>,
}

impl Activity {
  /// A non-empty competition name is the sole discriminator between a
  /// training session and a competition stage.
  pub fn is_competition(&self) -> bool {
    self
      .competition_name
      .as_deref()
      .is_some_and(|name| !name.trim().is_empty())
  }

  /// Parse the raw date field. Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, and
  /// plain `YYYY-MM-DD`; anything else is `None`.
  pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
    let raw = self.date.as_deref()?.trim();
    if raw.is_empty() {
      return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
      return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
      return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
      return day.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }

    None
  }

  /// Numeric rank extracted from the free-text placement ("3º lugar" -> 3).
  /// Takes the first run of digits anywhere in the string.
  pub fn placement_rank(&self) -> Option<u32> {
    let raw = self.placement.as_deref()?;
    let digits: String = raw
      .chars()
      .skip_while(|c| !c.is_ascii_digit())
      .take_while(|c| c.is_ascii_digit())
      .collect();
    digits.parse().ok()
  }
}

/// For inserting new activities (without id, user_id, created_at)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewActivity {
  pub date: Option<String>,
  pub equipment: Option<String>,
  pub caliber: Option<String>,
  pub division: Option<String>,
  pub shot_count: Option<i64>,
  pub competition_name: Option<String>,
  pub stage: Option<String>,
  pub placement: Option<String>,
  pub competition_score: Option<f64>,
  pub club: Option<String>,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityPatch {
  pub date: Option<String>,
  pub equipment: Option<String>,
  pub caliber: Option<String>,
  pub division: Option<String>,
  pub shot_count: Option<i64>,
  pub competition_name: Option<String>,
  pub stage: Option<String>,
  pub placement: Option<String>,
  pub competition_score: Option<f64>,
  pub club: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn activity_with(date: Option<&str>, competition_name: Option<&str>) -> Activity {
    Activity {
      id: 1,
      user_id: 1,
      date: date.map(str::to_string),
      equipment: Some("Pistola Glock 17".to_string()),
      caliber: Some("9mm".to_string()),
      division: None,
      shot_count: None,
      competition_name: competition_name.map(str::to_string),
      stage: None,
      placement: None,
      competition_score: None,
      club: None,
      created_at: None,
    }
  }

  #[test]
  fn parses_rfc3339_dates() {
    let a = activity_with(Some("2024-01-20T14:00:00Z"), None);
    let parsed = a.parsed_date().expect("should parse");
    assert_eq!(parsed.to_rfc3339(), "2024-01-20T14:00:00+00:00");
  }

  #[test]
  fn parses_plain_dates() {
    let a = activity_with(Some("2024-01-20"), None);
    assert!(a.parsed_date().is_some());
  }

  #[test]
  fn unparseable_date_is_none() {
    assert!(activity_with(Some("20/01/2024"), None).parsed_date().is_none());
    assert!(activity_with(Some("   "), None).parsed_date().is_none());
    assert!(activity_with(None, None).parsed_date().is_none());
  }

  #[test]
  fn competition_requires_non_blank_name() {
    assert!(activity_with(None, Some("Campeonato Regional")).is_competition());
    assert!(!activity_with(None, Some("   ")).is_competition());
    assert!(!activity_with(None, None).is_competition());
  }

  #[test]
  fn placement_rank_takes_first_digit_run() {
    let mut a = activity_with(None, Some("Campeonato"));
    a.placement = Some("3º lugar".to_string());
    assert_eq!(a.placement_rank(), Some(3));

    a.placement = Some("12º de 40".to_string());
    assert_eq!(a.placement_rank(), Some(12));

    a.placement = Some("desclassificado".to_string());
    assert_eq!(a.placement_rank(), None);

    a.placement = None;
    assert_eq!(a.placement_rank(), None);
  }
}
