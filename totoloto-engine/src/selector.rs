use crate::scoring::ScoreMap;

/// Les `k` numéros au score le plus élevé. À score égal, le plus petit numéro passe
/// d'abord. Retourne moins de `k` numéros si la carte en contient moins.
pub fn select_top(scores: &ScoreMap, k: usize) -> Vec<u8> {
    let mut ranked: Vec<(u8, f64)> = scores.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(k).map(|(n, _)| n).collect()
}

/// Numéros du tirage réel qui figurent dans la prédiction, dans l'ordre du tirage.
/// Un numéro répété dans le tirage n'est compté qu'une fois.
pub fn matched(predicted: &[u8], actual: &[u8]) -> Vec<u8> {
    let mut hits = Vec::new();
    for &n in actual {
        if predicted.contains(&n) && !hits.contains(&n) {
            hits.push(n);
        }
    }
    hits
}
