//! Text normalization for the inconsistent labels users type into the log:
//! caliber strings, equipment names, and multi-stage competition names.

use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Caliber Normalization
/// ---------------------------------------------------------------------------

/// Canonicalize a free-text caliber label into the fixed vocabulary
/// (`9mm`, `.38`, `.40`, `.45`, `.357`, `.22`, `.380`).
///
/// Unknown calibers pass through cleaned rather than being merged or
/// rejected, so typos form their own group instead of polluting a known one.
/// Empty input yields an empty string; callers drop such records from
/// grouping.
pub fn normalize_caliber(raw: &str) -> String {
  let collapsed = raw
    .trim()
    .to_lowercase()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ");
  let cleaned: String = collapsed
    .chars()
    .filter(|c| c.is_alphanumeric() || matches!(c, '_' | ' ' | '.'))
    .collect();

  let canonical = match cleaned.as_str() {
    "9mm" | "9x19" | "9x19 parabellum" | "9 mm" | "9" | "9x19mm" | "9x19mm parabellum" => "9mm",
    ".38" | "38" | ".38 spl" | ".38 special" | "38 special" => ".38",
    ".40" | "40" | ".40 sw" | "40 sw" => ".40",
    ".45" | "45" | ".45 acp" | "45 acp" => ".45",
    ".357" | "357" | ".357 magnum" | "357 magnum" => ".357",
    ".22" | "22" | ".22 lr" | "22 lr" => ".22",
    ".380" | "380" | ".380 acp" | "380 acp" => ".380",
    other => other,
  };

  canonical.to_string()
}

/// ---------------------------------------------------------------------------
/// Equipment Classification
/// ---------------------------------------------------------------------------

/// Generic equipment category used for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
  Pistol,
  Revolver,
  Carbine,
}

impl EquipmentCategory {
  /// Display label, matching the labels users see ("Pistola 9mm").
  pub fn as_str(&self) -> &'static str {
    match self {
      EquipmentCategory::Pistol => "Pistola",
      EquipmentCategory::Revolver => "Revolver",
      EquipmentCategory::Carbine => "Carabina",
    }
  }
}

impl std::fmt::Display for EquipmentCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Classify a free-text equipment name by substring heuristic.
///
/// Anything without a recognized substring falls back to `Pistol`: pistols
/// dominate the registry and carry no distinguishing keyword. Typos in
/// revolver/carbine names therefore land in the pistol bucket; this is the
/// established (lossy) behavior, not an error.
pub fn classify_equipment(raw: &str) -> EquipmentCategory {
  let lower = raw.to_lowercase();
  if lower.contains("revolver") {
    EquipmentCategory::Revolver
  } else if lower.contains("carabina") || lower.contains("rifle") {
    EquipmentCategory::Carbine
  } else {
    EquipmentCategory::Pistol
  }
}

/// ---------------------------------------------------------------------------
/// Competition Series Names
/// ---------------------------------------------------------------------------

/// Reduce a raw competition name to its series name so that multi-stage
/// entries chart as one line: strip a leading ordinal ("1º "), cut at the
/// first dash, drop stage/phase/final/online tokens and their numbers, then
/// title-case. Missing names fall into the "Sem Competição" bucket.
pub fn competition_series_name(raw: &str) -> String {
  if raw.trim().is_empty() {
    return "Sem Competição".to_string();
  }

  let stripped = strip_ordinal_prefix(raw.trim());
  let base = stripped
    .split(['–', '-'])
    .next()
    .unwrap_or("")
    .to_lowercase();

  let mut words: Vec<String> = Vec::new();
  let mut after_stage_token = false;
  for word in base.split_whitespace() {
    let bare = word.trim_end_matches(|c: char| c.is_ascii_digit());
    if matches!(bare, "etapa" | "fase" | "final" | "online") {
      after_stage_token = true;
      continue;
    }
    if after_stage_token && word.chars().all(|c| c.is_ascii_digit()) {
      after_stage_token = false;
      continue;
    }
    after_stage_token = false;
    words.push(title_case(word));
  }

  words.join(" ")
}

/// Drop a leading "1º " / "12 " style ordinal.
fn strip_ordinal_prefix(name: &str) -> &str {
  let rest = name.trim_start_matches(|c: char| c.is_ascii_digit());
  if rest.len() == name.len() {
    return name;
  }
  rest.strip_prefix('º').unwrap_or(rest).trim_start()
}

fn title_case(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn caliber_synonyms_collapse() {
    assert_eq!(normalize_caliber("9x19 Parabellum"), "9mm");
    assert_eq!(normalize_caliber("9 mm"), "9mm");
    assert_eq!(normalize_caliber("9"), "9mm");
    assert_eq!(normalize_caliber(".38 Special"), ".38");
    assert_eq!(normalize_caliber("38"), ".38");
    assert_eq!(normalize_caliber(".40 S&W"), ".40"); // '&' stripped -> ".40 sw"
    assert_eq!(normalize_caliber("45 ACP"), ".45");
    assert_eq!(normalize_caliber("357 Magnum"), ".357");
    assert_eq!(normalize_caliber(".22 LR"), ".22");
    assert_eq!(normalize_caliber("380 acp"), ".380");
  }

  #[test]
  fn unknown_caliber_passes_through_cleaned() {
    assert_eq!(normalize_caliber("  7.62x39  "), "7.62x39");
    assert_eq!(normalize_caliber("6,5 Creedmoor"), "65 creedmoor");
  }

  #[test]
  fn empty_caliber_stays_empty() {
    assert_eq!(normalize_caliber(""), "");
    assert_eq!(normalize_caliber("   "), "");
  }

  #[test]
  fn equipment_substring_heuristic() {
    assert_eq!(classify_equipment("Revolver Taurus 85"), EquipmentCategory::Revolver);
    assert_eq!(classify_equipment("Carabina CBC 8022"), EquipmentCategory::Carbine);
    assert_eq!(classify_equipment("Rifle .308"), EquipmentCategory::Carbine);
    assert_eq!(classify_equipment("Glock 17"), EquipmentCategory::Pistol);
    // The documented lossy fallback: unrecognized text counts as a pistol.
    assert_eq!(classify_equipment("Espingarda Boito"), EquipmentCategory::Pistol);
  }

  #[test]
  fn stage_suffixes_merge_into_one_series() {
    assert_eq!(
      competition_series_name("1º Campeonato Regional – Etapa 2"),
      "Campeonato Regional"
    );
    assert_eq!(
      competition_series_name("Campeonato Regional - Final"),
      "Campeonato Regional"
    );
  }

  #[test]
  fn stage_tokens_without_dash_are_dropped() {
    assert_eq!(competition_series_name("Copa Estadual Etapa 3"), "Copa Estadual");
    assert_eq!(competition_series_name("Copa Estadual etapa3"), "Copa Estadual");
    assert_eq!(competition_series_name("Torneio Fase 1"), "Torneio");
  }

  #[test]
  fn series_names_are_title_cased() {
    assert_eq!(competition_series_name("campeonato BRASILEIRO de tiro"), "Campeonato Brasileiro De Tiro");
  }

  #[test]
  fn missing_name_gets_placeholder_bucket() {
    assert_eq!(competition_series_name(""), "Sem Competição");
    assert_eq!(competition_series_name("  "), "Sem Competição");
  }
}
