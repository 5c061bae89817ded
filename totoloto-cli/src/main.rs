mod display;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use totoloto_db::models::{YearRange, FIRST_SUPPORTED_YEAR, LAST_SUPPORTED_YEAR};
use totoloto_db::provider::{default_data_dir, DrawHistoryProvider, JsonYearProvider};
use totoloto_db::report::{JsonFileSink, ReportSink};
use totoloto_engine::backtest::run_backtest;
use totoloto_engine::config::{load_config, save_config, EngineConfig, TrendOrder};
use totoloto_engine::predict::predict_next;
use totoloto_engine::stats::StatsTable;

use crate::display::{
    display_backtest, display_prediction, display_scorecards, display_stats, display_warnings,
    display_year_counts,
};

const PREDICTION_REPORT: &str = "previsao";
const BACKTEST_REPORT: &str = "analise_desvio";

#[derive(Parser)]
#[command(
    name = "totoloto",
    about = "Heuristiques de score et simulation historique du Totoloto",
    long_about = "Sans sous-commande : prédiction puis simulation, chacune écrivant un rapport JSON."
)]
struct Cli {
    /// Dossier des fichiers annuels <année>.json (défaut : ./dados)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Dossier des rapports
    #[arg(long, global = true, default_value = "estatisticas")]
    output_dir: PathBuf,

    /// Fichier de configuration JSON (champs absents = valeurs par défaut)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ordre des candidats du score de tendance
    #[arg(long, global = true)]
    trend_order: Option<TrendOrder>,

    /// Verbosité (-v : info, -vv : debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Prédire le prochain tirage à partir de l'historique
    Predict {
        #[arg(long, default_value_t = FIRST_SUPPORTED_YEAR)]
        start: i32,
        #[arg(long, default_value_t = LAST_SUPPORTED_YEAR)]
        end: i32,
    },

    /// Rejouer une période tirage par tirage et mesurer les numéros trouvés
    Backtest {
        #[command(flatten)]
        window: BacktestWindow,
    },

    /// Afficher les statistiques par numéro
    Stats {
        #[arg(long, default_value_t = FIRST_SUPPORTED_YEAR)]
        start: i32,
        #[arg(long, default_value_t = LAST_SUPPORTED_YEAR)]
        end: i32,
    },

    /// Afficher la configuration effective (JSON)
    Config {
        /// Enregistrer aussi la configuration dans ce fichier
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

const DEFAULT_SEED_YEAR: i32 = 2011;
const DEFAULT_EVAL_YEAR: i32 = 2012;

#[derive(Args, Clone, Copy)]
struct BacktestWindow {
    /// Première année d'amorçage
    #[arg(long, default_value_t = DEFAULT_SEED_YEAR)]
    seed_start: i32,
    /// Dernière année d'amorçage
    #[arg(long, default_value_t = DEFAULT_SEED_YEAR)]
    seed_end: i32,
    /// Première année évaluée
    #[arg(long, default_value_t = DEFAULT_EVAL_YEAR)]
    eval_start: i32,
    /// Dernière année évaluée
    #[arg(long, default_value_t = DEFAULT_EVAL_YEAR)]
    eval_end: i32,
}

impl Default for BacktestWindow {
    fn default() -> Self {
        Self {
            seed_start: DEFAULT_SEED_YEAR,
            seed_end: DEFAULT_SEED_YEAR,
            eval_start: DEFAULT_EVAL_YEAR,
            eval_end: DEFAULT_EVAL_YEAR,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    if let Some(order) = cli.trend_order {
        config.trend.order = order;
    }

    let provider = JsonYearProvider::new(cli.data_dir.clone().unwrap_or_else(default_data_dir));
    let sink = JsonFileSink::new(cli.output_dir.clone());
    log::debug!(
        "Données : {}, rapports : {}",
        provider.data_dir().display(),
        sink.output_dir().display()
    );

    match cli.command {
        None => run_default(&provider, &sink, &config),
        Some(Command::Predict { start, end }) => {
            cmd_predict(&provider, &sink, &config, YearRange::new(start, end)?)
        }
        Some(Command::Backtest { window }) => cmd_backtest(&provider, &sink, &config, window),
        Some(Command::Stats { start, end }) => cmd_stats(&provider, YearRange::new(start, end)?),
        Some(Command::Config { output }) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if let Some(path) = output {
                save_config(&config, &path)?;
                println!("\nConfiguration enregistrée dans {}", path.display());
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Prédiction puis simulation. La simulation tourne même si la prédiction
/// échoue ; la première erreur est renvoyée.
fn run_default(
    provider: &(impl DrawHistoryProvider + ?Sized),
    sink: &impl ReportSink,
    config: &EngineConfig,
) -> Result<()> {
    let predicted = cmd_predict(provider, sink, config, YearRange::supported());
    if let Err(e) = &predicted {
        log::error!("{e:#}");
    }
    let backtested = cmd_backtest(provider, sink, config, BacktestWindow::default());
    predicted.and(backtested)
}

fn cmd_predict(
    provider: &(impl DrawHistoryProvider + ?Sized),
    sink: &impl ReportSink,
    config: &EngineConfig,
    years: YearRange,
) -> Result<()> {
    let history = provider.load_draws(years);
    let prediction = predict_next(&history, config)
        .with_context(|| format!("Prédiction impossible sur {years}"))?;

    display_prediction(&prediction);
    display_warnings(&prediction.warnings);

    let path = sink.write_report(PREDICTION_REPORT, &prediction)?;
    println!("\nRésultat enregistré dans {}", path.display());
    Ok(())
}

fn cmd_backtest(
    provider: &(impl DrawHistoryProvider + ?Sized),
    sink: &impl ReportSink,
    config: &EngineConfig,
    window: BacktestWindow,
) -> Result<()> {
    let seed_years = YearRange::new(window.seed_start, window.seed_end)?;
    let eval_years = YearRange::new(window.eval_start, window.eval_end)?;

    let seed = provider.load_draws(seed_years);
    let evaluation = provider.load_draws(eval_years);
    println!(
        "\nSimulation : amorçage {} ({} tirages), évaluation {} ({} tirages)",
        seed_years,
        seed.len(),
        eval_years,
        evaluation.len()
    );
    display_year_counts("Amorçage", &seed.draws_per_year);
    display_year_counts("Évaluation", &evaluation.draws_per_year);

    let pb = ProgressBar::new(evaluation.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let result = run_backtest(seed, evaluation, config, |outcome| {
        pb.set_message(outcome.date.clone());
        pb.inc(1);
    });
    pb.finish_with_message("Simulation terminée");

    let report = result.with_context(|| format!("Simulation impossible sur {eval_years}"))?;
    display_backtest(&report);
    display_scorecards(&report.scorecards);
    display_warnings(&report.warnings);

    let path = sink.write_report(BACKTEST_REPORT, &report)?;
    println!("\nSimulation enregistrée dans {}", path.display());
    Ok(())
}

fn cmd_stats(provider: &(impl DrawHistoryProvider + ?Sized), years: YearRange) -> Result<()> {
    let history = provider.load_draws(years);
    display_warnings(&history.warnings);
    display_year_counts("Historique", &history.draws_per_year);

    let history = history
        .require_non_empty(&format!("les statistiques {years}"))
        .context("Aucun tirage chargé. Vérifiez --data-dir")?;
    let stats = StatsTable::compute(&history.draws);
    display_stats(&stats, years);
    Ok(())
}
