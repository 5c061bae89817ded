use std::collections::BTreeMap;

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use totoloto_db::error::DataWarning;
use totoloto_db::models::{YearRange, UNKNOWN};
use totoloto_engine::backtest::BacktestReport;
use totoloto_engine::evaluation::HeuristicScorecard;
use totoloto_engine::predict::LivePrediction;
use totoloto_engine::selector::select_top;
use totoloto_engine::stats::StatsTable;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_stats(stats: &StatsTable, years: YearRange) {
    println!("\n📊 Statistiques {} ({} tirages)\n", years, stats.total_draws());

    let mut table = new_table(vec![
        "Numéro",
        "Sorties",
        "%",
        "Dernier concours",
        "Dernière date",
        "Absences",
        "Écart moyen",
        "Tendance",
    ]);

    let mut sorted: Vec<_> = stats.iter().collect();
    sorted.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));

    for stat in sorted {
        table.add_row(vec![
            format!("{:2}", stat.number),
            stat.occurrences.to_string(),
            format!("{:.2}", stat.occurrence_percent),
            stat.last_contest.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            stat.last_date.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            stat.absence_streak.to_string(),
            stat.average_gap.map_or_else(|| UNKNOWN.to_string(), |g| format!("{:.2}", g)),
            stat.trend.map_or_else(|| UNKNOWN.to_string(), |t| t.to_string()),
        ]);
    }
    println!("{table}");
}

fn year_counts_table(draws_per_year: &BTreeMap<i32, usize>) -> Table {
    let mut table = new_table(vec!["Année", "Tirages"]);
    for (year, count) in draws_per_year {
        table.add_row(vec![year.to_string(), count.to_string()]);
    }
    table
}

/// Tirages chargés par année ; rien si aucune année n'a été lue.
pub fn display_year_counts(label: &str, draws_per_year: &BTreeMap<i32, usize>) {
    if draws_per_year.is_empty() {
        return;
    }
    println!("\n── {label} : tirages par année ──");
    println!("{}", year_counts_table(draws_per_year));
}

pub fn display_prediction(prediction: &LivePrediction) {
    println!(
        "\n🎯 Prédiction sur {} tirages ({} → {})\n",
        prediction.total_draws, prediction.first_date, prediction.last_date
    );

    println!("── Heuristiques ──");
    let mut table = new_table(vec!["Heuristique", "Numéros en tête"]);
    for (name, scores) in &prediction.by_heuristic {
        let top = select_top(scores, 5);
        let label = if top.is_empty() { UNKNOWN.to_string() } else { join_numbers(&top) };
        table.add_row(vec![name.clone(), label]);
    }
    println!("{table}");

    println!("\n── Scores combinés ──");
    let mut table = new_table(vec!["Rang", "Numéro", "Score"]);
    for (rank, number) in select_top(&prediction.combined, 10).into_iter().enumerate() {
        let color = if prediction.suggestion.contains(&number) {
            Color::Green
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(format!("{:2}", number)).fg(color),
            Cell::new(format!("{:.2}", prediction.combined.get(number).unwrap_or(0.0))),
        ]);
    }
    println!("{table}");

    println!("\n🎲 Suggestion : {}", join_numbers(&prediction.suggestion));
}

pub fn display_backtest(report: &BacktestReport) {
    println!(
        "\n📈 {} tirages simulés (amorçage : {}), moyenne {:.2} numéros trouvés\n",
        report.total_steps, report.seed_draws, report.mean_hits
    );

    let mut table = new_table(vec!["Trouvés", "Tirages", "Part"]);
    for (hits, count) in &report.histogram {
        let share = if report.total_steps == 0 {
            0.0
        } else {
            *count as f64 / report.total_steps as f64 * 100.0
        };
        table.add_row(vec![hits.to_string(), count.to_string(), format!("{:.2}%", share)]);
    }
    println!("{table}");
}

pub fn display_scorecards(scorecards: &BTreeMap<String, HeuristicScorecard>) {
    if scorecards.is_empty() {
        return;
    }

    println!("\n── Heuristiques seules ──");
    let mut table = new_table(vec!["Heuristique", "Prévisions", "≥1", "≥2", "≥3", "Meilleure"]);
    for (name, card) in scorecards {
        let best = card.best().map_or_else(
            || UNKNOWN.to_string(),
            |b| format!("{} ({}) : {} trouvés", b.contest, b.date, b.hits),
        );
        table.add_row(vec![
            name.clone(),
            card.total_predictions().to_string(),
            format!("{:.2}%", card.success_rate(1)),
            format!("{:.2}%", card.success_rate(2)),
            format!("{:.2}%", card.success_rate(3)),
            best,
        ]);
    }
    println!("{table}");
}

pub fn display_warnings(warnings: &[DataWarning]) {
    if warnings.is_empty() {
        return;
    }

    println!("\n⚠ {} avertissement(s) :", warnings.len());
    for warning in warnings {
        println!("  - {warning}");
    }
}
