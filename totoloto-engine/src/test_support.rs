use chrono::{Days, NaiveDate};

use totoloto_db::models::Draw;

/// Tirage daté, pour les tests.
pub fn draw_on(contest: &str, year: i32, month: u32, day: u32, numbers: &[u8]) -> Draw {
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    Draw::new(contest, date, numbers.to_vec())
}

/// Une séquence chronologique de tirages, un par jour à partir du 1er janvier 2011.
pub fn sequence(rows: &[&[u8]]) -> Vec<Draw> {
    let start = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap_or_default();
    rows.iter()
        .enumerate()
        .map(|(i, numbers)| {
            let date = start + Days::new(i as u64);
            Draw::new(format!("{:03}", i + 1), date, numbers.to_vec())
        })
        .collect()
}

/// Séquence pseudo-régulière de `n` tirages de 6 numéros commençant à `year`,
/// deux tirages par semaine.
pub fn make_test_draws(n: usize, year: i32) -> Vec<Draw> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default();
    (0..n)
        .map(|i| {
            let base = (i * 7) % 49;
            let numbers: Vec<u8> = (0..6).map(|k| ((base + k * 8) % 49 + 1) as u8).collect();
            let date = start + Days::new((i as u64 * 7) / 2);
            Draw::new(format!("{:03}/{}", i + 1, year), date, numbers)
        })
        .collect()
}
