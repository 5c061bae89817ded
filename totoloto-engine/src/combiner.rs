use crate::scoring::ScoreMap;
use crate::stats::round_dp;

/// Somme élément par élément. Un numéro absent d'une carte y compte pour 0.
pub fn combine<'a>(maps: impl IntoIterator<Item = &'a ScoreMap>) -> ScoreMap {
    maps.into_iter().flat_map(|m| m.iter()).collect()
}

/// Mise à l'échelle min-max dans [0, 1], arrondie à 4 décimales.
/// Si min == max, toutes les entrées valent 1.
pub fn normalize(map: &ScoreMap) -> ScoreMap {
    let (min, max) = map
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| (lo.min(v), hi.max(v)));
    let range = max - min;

    let mut out = ScoreMap::new();
    for (number, value) in map.iter() {
        let scaled = if range > 0.0 { (value - min) / range } else { 1.0 };
        out.insert(number, round_dp(scaled, 4));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(u8, f64)]) -> ScoreMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_combine_sums_and_unions() {
        let a = map(&[(1, 3.0), (2, 1.0)]);
        let b = map(&[(2, 4.0), (9, -2.0)]);
        let c = combine([&a, &b]);
        assert_eq!(c.get(1), Some(3.0));
        assert_eq!(c.get(2), Some(5.0));
        assert_eq!(c.get(9), Some(-2.0));
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_combine_nothing_is_empty() {
        let none: [&ScoreMap; 0] = [];
        assert!(combine(none).is_empty());
    }

    #[test]
    fn test_normalize_bounds() {
        let n = normalize(&map(&[(1, -4.0), (2, 6.0), (3, 1.0)]));
        assert_eq!(n.get(1), Some(0.0));
        assert_eq!(n.get(2), Some(1.0));
        assert_eq!(n.get(3), Some(0.5));
    }

    #[test]
    fn test_normalize_rounds_to_four_decimals() {
        let n = normalize(&map(&[(1, 0.0), (2, 1.0), (3, 3.0)]));
        assert_eq!(n.get(2), Some(0.3333));
    }

    #[test]
    fn test_normalize_degenerate() {
        let single = normalize(&map(&[(5, 12.0)]));
        assert_eq!(single.get(5), Some(1.0));

        let flat = normalize(&map(&[(1, 2.0), (2, 2.0)]));
        assert_eq!(flat.get(1), Some(1.0));
        assert_eq!(flat.get(2), Some(1.0));

        assert!(normalize(&ScoreMap::new()).is_empty());
    }
}
