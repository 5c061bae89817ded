use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Ordre des candidats du score de tendance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrendOrder {
    /// Ordre de la table de statistiques (numéros croissants), sans tri.
    #[default]
    Source,
    /// Tendance croissante, puis numéro croissant.
    Ascending,
}

/// Classement « top N » avec score linéaire décroissant `(limit - rang) * weight`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankPolicy {
    pub limit: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPolicy {
    pub limit: usize,
    pub weight: f64,
    pub max_trend: u32,
    pub order: TrendOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapPolicy {
    pub limit: usize,
    pub weight: f64,
    pub target: f64,
}

/// Paires / trios : chaque membre du k-ième groupe reçoit `base - k * step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboPolicy {
    pub limit: usize,
    pub base: f64,
    pub step: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPolicy {
    pub min_increases: u32,
    pub factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub frequency: RankPolicy,
    pub absence: RankPolicy,
    pub trend: TrendPolicy,
    pub average_gap: GapPolicy,
    pub pairs: ComboPolicy,
    pub triples: ComboPolicy,
    pub growth: GrowthPolicy,
    /// Contributions négatives des paires/trios ramenées à zéro.
    pub clamp_negative: bool,
    /// Nombre de numéros de la prédiction « prochain tirage ».
    pub live_pick: usize,
    /// Nombre de numéros prédits à chaque pas de la simulation.
    pub backtest_pick: usize,
    /// Taille de la fenêtre récente du pipeline de prédiction.
    pub recent_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frequency: RankPolicy { limit: 10, weight: 3.0 },
            absence: RankPolicy { limit: 10, weight: 2.0 },
            trend: TrendPolicy {
                limit: 10,
                weight: 2.0,
                max_trend: 10,
                order: TrendOrder::Source,
            },
            average_gap: GapPolicy {
                limit: 10,
                weight: 1.0,
                target: 40.0,
            },
            pairs: ComboPolicy {
                limit: 20,
                base: 15.0,
                step: 1.0,
            },
            triples: ComboPolicy {
                limit: 10,
                base: 20.0,
                step: 2.0,
            },
            growth: GrowthPolicy {
                min_increases: 2,
                factor: 3.0,
            },
            clamp_negative: false,
            live_pick: 2,
            backtest_pick: 6,
            recent_window: 50,
        }
    }
}

pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire la configuration {:?}", path))?;
    let config: EngineConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuration invalide {:?}", path))?;
    Ok(config)
}

pub fn save_config(config: &EngineConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}
