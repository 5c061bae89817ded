use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DataError, DataResult, DataWarning};
use crate::models::{parse_record, sort_chronologically, Draw, DrawRecord, YearRange};

/// Source d'historique : renvoie une séquence de tirages entièrement matérialisée
/// et triée par date. Ne doit jamais échouer pour une année isolée.
pub trait DrawHistoryProvider {
    fn load_draws(&self, years: YearRange) -> DrawHistory;
}

#[derive(Debug, Clone, Default)]
pub struct DrawHistory {
    pub draws: Vec<Draw>,
    pub warnings: Vec<DataWarning>,
    pub draws_per_year: BTreeMap<i32, usize>,
}

impl DrawHistory {
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    /// Historique vide = erreur fatale pour la prédiction.
    pub fn require_non_empty(self, what: &str) -> DataResult<Self> {
        if self.draws.is_empty() {
            return Err(DataError::EmptyHistory(what.to_string()));
        }
        Ok(self)
    }

    fn warn(&mut self, warning: DataWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearFile {
    Keyed(BTreeMap<String, Vec<DrawRecord>>),
    Flat(Vec<DrawRecord>),
}

/// Un fichier JSON par année : `<data_dir>/<année>.json`.
pub struct JsonYearProvider {
    data_dir: PathBuf,
}

impl JsonYearProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn year_path(&self, year: i32) -> PathBuf {
        self.data_dir.join(format!("{year}.json"))
    }

    fn read_year(&self, year: i32) -> Result<Vec<DrawRecord>, String> {
        let path = self.year_path(year);
        let content = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
        let file: YearFile = serde_json::from_str(&content).map_err(|e| format!("JSON invalide : {e}"))?;
        let records = match file {
            YearFile::Flat(records) => records,
            YearFile::Keyed(mut by_year) => match by_year.remove(&year.to_string()) {
                Some(records) => records,
                None => by_year.into_values().flatten().collect(),
            },
        };
        Ok(records)
    }
}

impl DrawHistoryProvider for JsonYearProvider {
    fn load_draws(&self, years: YearRange) -> DrawHistory {
        let mut history = DrawHistory::default();

        for year in years.years() {
            let path = self.year_path(year).display().to_string();

            if !YearRange::is_supported(year) {
                history.warn(DataWarning::SourceData {
                    year,
                    path,
                    reason: "année hors de la plage supportée".to_string(),
                });
                continue;
            }

            let records = match self.read_year(year) {
                Ok(records) => records,
                Err(reason) => {
                    history.warn(DataWarning::SourceData { year, path, reason });
                    continue;
                }
            };

            let mut field_warnings = Vec::new();
            let draws: Vec<Draw> = records
                .iter()
                .enumerate()
                .map(|(index, record)| parse_record(record, year, index, &mut field_warnings))
                .collect();

            for warning in field_warnings {
                history.warn(warning);
            }

            log::info!("{year} : {} tirages chargés depuis {path}", draws.len());
            history.draws_per_year.insert(year, draws.len());
            history.draws.extend(draws);
        }

        sort_chronologically(&mut history.draws);
        history
    }
}

/// Historique déjà en mémoire, filtré par année de tirage.
impl DrawHistoryProvider for [Draw] {
    fn load_draws(&self, years: YearRange) -> DrawHistory {
        let mut draws: Vec<Draw> = self
            .iter()
            .filter(|d| years.years().contains(&d.year()))
            .cloned()
            .collect();
        sort_chronologically(&mut draws);

        let mut draws_per_year = BTreeMap::new();
        for draw in &draws {
            *draws_per_year.entry(draw.year()).or_insert(0) += 1;
        }

        DrawHistory {
            draws,
            warnings: Vec::new(),
            draws_per_year,
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("dados");
    path
}
