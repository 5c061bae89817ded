use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Erreurs fatales de la couche données.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Historique vide : aucun tirage exploitable pour {0}")]
    EmptyHistory(String),

    #[error("Plage d'années invalide : {start}-{end}")]
    InvalidYearRange { start: i32, end: i32 },

    #[error("Erreur d'entrée/sortie sur {path:?} : {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Erreur de sérialisation : {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type DataResult<T> = Result<T, DataError>;

/// Anomalies récupérables : le chargement continue, l'anomalie est remontée à l'appelant.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum DataWarning {
    /// Fichier d'année absent, illisible ou mal formé : l'année entière est ignorée.
    #[error("Année {year} ignorée ({path}) : {reason}")]
    SourceData {
        year: i32,
        path: String,
        reason: String,
    },

    /// Champ manquant ou invalide dans un tirage : une valeur de repli est substituée.
    #[error("Tirage {contest} (année {year}, entrée {index}) : champ '{field}' {reason}")]
    FieldShape {
        year: i32,
        index: usize,
        contest: String,
        field: &'static str,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_message_has_context() {
        let w = DataWarning::FieldShape {
            year: 2012,
            index: 4,
            contest: "005/2012".to_string(),
            field: "numeros",
            reason: "absent, ensemble vide utilisé".to_string(),
        };
        let msg = w.to_string();
        assert!(msg.contains("2012"));
        assert!(msg.contains("005/2012"));
        assert!(msg.contains("numeros"));
    }

    #[test]
    fn test_warning_serializes_with_tag() {
        let w = DataWarning::SourceData {
            year: 2013,
            path: "dados/2013.json".to_string(),
            reason: "fichier introuvable".to_string(),
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["tipo"], "source_data");
        assert_eq!(json["year"], 2013);
    }
}
