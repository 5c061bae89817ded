use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{DataError, DataResult};

/// Destination des documents de résultat.
pub trait ReportSink {
    fn write_report<T: Serialize>(&self, name: &str, document: &T) -> DataResult<PathBuf>;
}

/// Écrit chaque document en JSON indenté dans `<output_dir>/<name>.json`.
pub struct JsonFileSink {
    output_dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl ReportSink for JsonFileSink {
    fn write_report<T: Serialize>(&self, name: &str, document: &T) -> DataResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| DataError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.output_dir.join(format!("{name}.json"));
        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(&path, json).map_err(|source| DataError::Io {
            path: path.clone(),
            source,
        })?;

        log::info!("Rapport écrit : {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Doc {
        media_acertos: f64,
        simulacoes: Vec<u8>,
    }

    #[test]
    fn test_write_report_creates_dir() {
        let dir = std::env::temp_dir()
            .join(format!("totoloto-sink-{}", std::process::id()))
            .join("estatisticas");
        let _ = std::fs::remove_dir_all(&dir);

        let sink = JsonFileSink::new(&dir);
        let path = sink
            .write_report("analise_desvio", &Doc { media_acertos: 0.75, simulacoes: vec![1, 2] })
            .unwrap();

        assert!(path.ends_with("analise_desvio.json"));
        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["media_acertos"], 0.75);
        assert_eq!(written["simulacoes"][1], 2);
    }
}
