use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult, DataWarning};

/// Numéros jouables : 1..=49.
pub const POOL_SIZE: usize = 49;

pub const FIRST_SUPPORTED_YEAR: i32 = 2011;
pub const LAST_SUPPORTED_YEAR: i32 = 2025;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Valeur affichée pour un concours ou une date inconnus.
pub const UNKNOWN: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draw {
    pub contest: String,
    /// Date de tri uniquement. Vaut l'epoch (1970-01-01) si la date source est invalide.
    pub date: NaiveDate,
    /// Année de rattachement : celle du fichier source, jamais déduite de la date sentinelle.
    pub year: i32,
    /// Date telle que fournie par la source (dd/mm/yyyy).
    pub date_label: String,
    /// Ordre de la source conservé, sans doublons.
    pub numbers: Vec<u8>,
}

impl Draw {
    pub fn new(contest: impl Into<String>, date: NaiveDate, numbers: Vec<u8>) -> Self {
        Self {
            contest: contest.into(),
            date,
            year: date.year(),
            date_label: date.format(DATE_FORMAT).to_string(),
            numbers,
        }
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

pub fn is_valid_number(n: u8) -> bool {
    n >= 1 && n as usize <= POOL_SIZE
}

/// Date sentinelle utilisée pour le tri quand la date source est illisible.
pub fn epoch_sentinel() -> NaiveDate {
    NaiveDate::default()
}

pub fn parse_draw_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> DataResult<Self> {
        if start > end {
            return Err(DataError::InvalidYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(year: i32) -> Self {
        Self { start: year, end: year }
    }

    pub fn supported() -> Self {
        Self {
            start: FIRST_SUPPORTED_YEAR,
            end: LAST_SUPPORTED_YEAR,
        }
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }

    pub fn is_supported(year: i32) -> bool {
        (FIRST_SUPPORTED_YEAR..=LAST_SUPPORTED_YEAR).contains(&year)
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Enregistrement brut d'un fichier annuel. Tous les champs sont tolérants :
/// un champ absent ou mal typé ne doit jamais faire échouer le fichier entier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrawRecord {
    #[serde(default)]
    pub concurso: Option<serde_json::Value>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub numeros: Option<serde_json::Value>,
}

/// Convertit un enregistrement brut en `Draw`, en remplaçant les champs défectueux
/// par des valeurs de repli et en poussant un avertissement pour chacun.
pub fn parse_record(
    record: &DrawRecord,
    year: i32,
    index: usize,
    warnings: &mut Vec<DataWarning>,
) -> Draw {
    let contest = match &record.concurso {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => UNKNOWN.to_string(),
    };

    let mut warn = |field: &'static str, reason: String| {
        warnings.push(DataWarning::FieldShape {
            year,
            index,
            contest: contest.clone(),
            field,
            reason,
        });
    };

    let (date, date_label) = match &record.data {
        Some(serde_json::Value::String(raw)) => match parse_draw_date(raw) {
            Some(date) => (date, raw.trim().to_string()),
            None => {
                warn("data", format!("invalide ('{raw}'), date sentinelle 1970-01-01 utilisée"));
                (epoch_sentinel(), raw.trim().to_string())
            }
        },
        Some(other) => {
            warn("data", format!("de type inattendu ({other}), date sentinelle 1970-01-01 utilisée"));
            (epoch_sentinel(), UNKNOWN.to_string())
        }
        None => {
            warn("data", "absent, date sentinelle 1970-01-01 utilisée".to_string());
            (epoch_sentinel(), UNKNOWN.to_string())
        }
    };

    let mut numbers: Vec<u8> = Vec::new();
    match &record.numeros {
        Some(serde_json::Value::Array(values)) => {
            for value in values {
                let parsed = value.as_u64().and_then(|n| u8::try_from(n).ok());
                match parsed {
                    Some(n) if is_valid_number(n) => {
                        if numbers.contains(&n) {
                            warn("numeros", format!("numéro {n} en double ignoré"));
                        } else {
                            numbers.push(n);
                        }
                    }
                    _ => warn("numeros", format!("valeur {value} hors limites (1-{POOL_SIZE}) ignorée")),
                }
            }
        }
        Some(other) => warn("numeros", format!("de type inattendu ({other}), ensemble vide utilisé")),
        None => warn("numeros", "absent, ensemble vide utilisé".to_string()),
    }

    Draw {
        contest,
        date,
        year,
        date_label,
        numbers,
    }
}

/// Tri chronologique stable : à date égale, l'ordre de la source est conservé.
pub fn sort_chronologically(draws: &mut [Draw]) {
    draws.sort_by_key(|d| d.date);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> DrawRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_record_ok() {
        let mut warnings = Vec::new();
        let draw = parse_record(
            &record(json!({"concurso": "001/2011", "data": "05/01/2011", "numeros": [7, 3, 49]})),
            2011,
            0,
            &mut warnings,
        );
        assert!(warnings.is_empty());
        assert_eq!(draw.contest, "001/2011");
        assert_eq!(draw.date, NaiveDate::from_ymd_opt(2011, 1, 5).unwrap());
        assert_eq!(draw.numbers, vec![7, 3, 49]);
        assert_eq!(draw.year(), 2011);
    }

    #[test]
    fn test_parse_record_missing_numbers_is_empty() {
        let mut warnings = Vec::new();
        let draw = parse_record(&record(json!({"concurso": 12, "data": "05/01/2011"})), 2011, 3, &mut warnings);
        assert!(draw.numbers.is_empty());
        assert_eq!(draw.contest, "12");
        assert_eq!(warnings.len(), 1);
        assert!(matches!(&warnings[0], DataWarning::FieldShape { field: "numeros", index: 3, .. }));
    }

    #[test]
    fn test_parse_record_bad_date_uses_epoch() {
        let mut warnings = Vec::new();
        let draw = parse_record(&record(json!({"data": "2011-31-31", "numeros": [1, 2]})), 2011, 0, &mut warnings);
        assert_eq!(draw.date, epoch_sentinel());
        assert_eq!(draw.year(), 2011);
        assert_eq!(draw.date_label, "2011-31-31");
        assert_eq!(draw.contest, UNKNOWN);
        assert!(matches!(&warnings[0], DataWarning::FieldShape { field: "data", .. }));
    }

    #[test]
    fn test_parse_record_drops_out_of_range_and_duplicates() {
        let mut warnings = Vec::new();
        let draw = parse_record(
            &record(json!({"data": "05/01/2011", "numeros": [0, 5, 50, 5, "x", 12]})),
            2011,
            0,
            &mut warnings,
        );
        assert_eq!(draw.numbers, vec![5, 12]);
        assert_eq!(warnings.len(), 4);
    }

    #[test]
    fn test_epoch_sentinel() {
        assert_eq!(epoch_sentinel(), NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    }

    #[test]
    fn test_sort_is_stable() {
        let d = NaiveDate::from_ymd_opt(2012, 3, 1).unwrap();
        let earlier = NaiveDate::from_ymd_opt(2012, 2, 1).unwrap();
        let mut draws = vec![
            Draw::new("A", d, vec![1]),
            Draw::new("B", earlier, vec![2]),
            Draw::new("C", d, vec![3]),
        ];
        sort_chronologically(&mut draws);
        let ids: Vec<&str> = draws.iter().map(|d| d.contest.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_year_range() {
        assert!(YearRange::new(2013, 2012).is_err());
        let r = YearRange::new(2011, 2013).unwrap();
        assert_eq!(r.years().count(), 3);
        assert_eq!(r.to_string(), "2011-2013");
        assert_eq!(YearRange::single(2012).to_string(), "2012");
        assert!(YearRange::is_supported(2011));
        assert!(!YearRange::is_supported(2010));
        assert!(!YearRange::is_supported(2026));
    }
}
