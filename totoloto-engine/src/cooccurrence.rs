use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

use totoloto_db::models::{is_valid_number, Draw};

pub type Pair = (u8, u8);
pub type Triple = (u8, u8, u8);

pub fn canonical_pair(a: u8, b: u8) -> Pair {
    if a <= b { (a, b) } else { (b, a) }
}

pub fn canonical_triple(a: u8, b: u8, c: u8) -> Triple {
    let mut t = [a, b, c];
    t.sort_unstable();
    (t[0], t[1], t[2])
}

/// Compteurs indexés par clé, avec mémoire de l'ordre de première apparition.
/// Cet ordre sert de départage quand deux clés ont le même compte.
#[derive(Debug, Clone)]
pub struct CountTable<K> {
    counts: HashMap<K, u32>,
    order: Vec<K>,
}

impl<K> Default for CountTable<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> CountTable<K> {
    fn increment(&mut self, key: K) {
        match self.counts.entry(key) {
            Entry::Occupied(mut e) => *e.get_mut() += 1,
            Entry::Vacant(e) => {
                e.insert(1);
                self.order.push(key);
            }
        }
    }

    pub fn get(&self, key: &K) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Parcours dans l'ordre de première apparition.
    pub fn iter(&self) -> impl Iterator<Item = (K, u32)> + '_ {
        self.order.iter().map(|k| (*k, self.counts[k]))
    }

    /// Les `limit` clés les plus fréquentes, comptes décroissants,
    /// égalités départagées par l'ordre de première apparition.
    pub fn top(&self, limit: usize) -> Vec<(K, u32)> {
        let mut entries: Vec<(K, u32)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(limit);
        entries
    }
}

/// Tables de co-occurrence des paires et des trios.
#[derive(Debug, Clone, Default)]
pub struct CoOccurrence {
    pairs: CountTable<Pair>,
    triples: CountTable<Triple>,
    draws_seen: usize,
}

impl CoOccurrence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_draws(draws: &[Draw]) -> Self {
        let mut co = Self::new();
        for draw in draws {
            co.add_draw(draw);
        }
        co
    }

    /// Ajoute la contribution d'un seul tirage, sans relire l'historique :
    /// C(m,2) paires et C(m,3) trios pour un tirage de m numéros.
    pub fn add_draw(&mut self, draw: &Draw) {
        let mut numbers: Vec<u8> = Vec::with_capacity(draw.numbers.len());
        for &n in &draw.numbers {
            if is_valid_number(n) && !numbers.contains(&n) {
                numbers.push(n);
            }
        }

        let m = numbers.len();
        for i in 0..m {
            for j in (i + 1)..m {
                self.pairs.increment(canonical_pair(numbers[i], numbers[j]));
                for k in (j + 1)..m {
                    self.triples.increment(canonical_triple(numbers[i], numbers[j], numbers[k]));
                }
            }
        }
        self.draws_seen += 1;
    }

    pub fn draws_seen(&self) -> usize {
        self.draws_seen
    }

    pub fn pairs(&self) -> &CountTable<Pair> {
        &self.pairs
    }

    pub fn triples(&self) -> &CountTable<Triple> {
        &self.triples
    }

    pub fn pair_count(&self, a: u8, b: u8) -> u32 {
        self.pairs.get(&canonical_pair(a, b))
    }

    pub fn triple_count(&self, a: u8, b: u8, c: u8) -> u32 {
        self.triples.get(&canonical_triple(a, b, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sequence;

    #[test]
    fn test_single_draw_tables() {
        let co = CoOccurrence::from_draws(&sequence(&[&[1, 2, 3]]));
        assert_eq!(co.pairs().len(), 3);
        assert_eq!(co.pair_count(1, 2), 1);
        assert_eq!(co.pair_count(1, 3), 1);
        assert_eq!(co.pair_count(2, 3), 1);
        assert_eq!(co.triples().len(), 1);
        assert_eq!(co.triple_count(1, 2, 3), 1);
        assert_eq!(co.pair_count(1, 4), 0);
    }

    #[test]
    fn test_pairs_are_unordered() {
        let co = CoOccurrence::from_draws(&sequence(&[&[7, 3], &[3, 7]]));
        assert_eq!(co.pairs().len(), 1);
        assert_eq!(co.pair_count(3, 7), 2);
        assert_eq!(co.pair_count(7, 3), 2);
    }

    #[test]
    fn test_large_draw_not_truncated() {
        let numbers: Vec<u8> = (1..=10).collect();
        let co = CoOccurrence::from_draws(&sequence(&[numbers.as_slice()]));
        assert_eq!(co.pairs().len(), 45);
        assert_eq!(co.triples().len(), 120);
    }

    #[test]
    fn test_incremental_matches_full_rebuild() {
        let draws = sequence(&[&[1, 2, 3, 4], &[2, 3, 5], &[1, 3, 5, 6], &[2, 4, 6]]);
        let mut incremental = CoOccurrence::from_draws(&draws[..2]);
        for draw in &draws[2..] {
            incremental.add_draw(draw);
        }
        let full = CoOccurrence::from_draws(&draws);

        assert_eq!(incremental.draws_seen(), 4);
        let inc_pairs: Vec<_> = incremental.pairs().iter().collect();
        let full_pairs: Vec<_> = full.pairs().iter().collect();
        assert_eq!(inc_pairs, full_pairs);
        let inc_triples: Vec<_> = incremental.triples().iter().collect();
        let full_triples: Vec<_> = full.triples().iter().collect();
        assert_eq!(inc_triples, full_triples);
    }

    #[test]
    fn test_top_ties_keep_first_seen_order() {
        let co = CoOccurrence::from_draws(&sequence(&[&[5, 9], &[1, 2], &[1, 2], &[5, 9], &[3, 4]]));
        let top = co.pairs().top(3);
        assert_eq!(top, vec![((5, 9), 2), ((1, 2), 2), ((3, 4), 1)]);
    }

    #[test]
    fn test_empty_draw_contributes_nothing() {
        let co = CoOccurrence::from_draws(&sequence(&[&[], &[4]]));
        assert!(co.pairs().is_empty());
        assert!(co.triples().is_empty());
        assert_eq!(co.draws_seen(), 2);
    }
}
