use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sizhu_calendar::{BirthInput, Gender};
use sizhu_engine::{ChartEngine, ChartResult, ChartSummary, EngineConfig, Outcome};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sizhu", about = "Four Pillars (BaZi) chart CLI")]
struct Cli {
    /// Engine config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full chart for a birth moment
    Chart {
        /// Birth date (YYYY-MM-DD), solar unless --lunar
        #[arg(long)]
        date: String,
        /// Birth hour (0-23), local standard time
        #[arg(long)]
        hour: u32,
        /// Interpret --date as a lunar date
        #[arg(long)]
        lunar: bool,
        /// The lunar month is the leap month
        #[arg(long, requires = "lunar")]
        leap: bool,
        /// Subject gender; selects fortune-period direction
        #[arg(long, value_enum)]
        gender: GenderArg,
        /// Evaluation year for child stars and the current progression
        /// (default: current local year)
        #[arg(long)]
        as_of: Option<i32>,
        /// Plain-text output instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Analysis of four ganzhi codes
    Analyze {
        /// Year pillar, e.g. 壬午
        year: String,
        /// Month pillar
        month: String,
        /// Day pillar
        day: String,
        /// Hour pillar
        hour: String,
        /// Plain-text summary instead of JSON
        #[arg(long)]
        text: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GenderArg {
    #[value(alias = "m")]
    Male,
    #[value(alias = "f")]
    Female,
}

impl From<GenderArg> for Gender {
    fn from(g: GenderArg) -> Self {
        match g {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let kb = config.knowledge_base().unwrap_or_else(|e| {
        eprintln!("Failed to load knowledge base: {e}");
        std::process::exit(1);
    });
    let engine = ChartEngine::astronomical(&kb, config).unwrap_or_else(|e| {
        eprintln!("Failed to create engine: {e}");
        std::process::exit(1);
    });

    match cli.command {
        Commands::Chart {
            date,
            hour,
            lunar,
            leap,
            gender,
            as_of,
            text,
        } => {
            let (year, month, day) = parse_date(&date).unwrap_or_else(|e| {
                eprintln!("Invalid date '{date}': {e}");
                std::process::exit(1);
            });
            let gender = Gender::from(gender);
            let input = if lunar {
                BirthInput::lunar(year, month, day, hour, leap, gender)
            } else {
                BirthInput::solar(year, month, day, hour, gender)
            };
            let as_of = as_of.unwrap_or_else(|| chrono::Local::now().year());
            let chart = engine
                .with_as_of_year(as_of)
                .compute_from_birth_moment(&input)
                .unwrap_or_else(|e| {
                    eprintln!("Chart failed: {e}");
                    std::process::exit(1);
                });
            if text {
                print!("{}", ChartText(&chart));
            } else {
                print_json(&chart);
            }
        }

        Commands::Analyze {
            year,
            month,
            day,
            hour,
            text,
        } => {
            let result = engine
                .compute_from_pillars(&year, &month, &day, &hour)
                .unwrap_or_else(|e| {
                    eprintln!("Analysis failed: {e}");
                    std::process::exit(1);
                });
            if text {
                print!("{}", result.summary);
            } else {
                print_json(&result);
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> EngineConfig {
    let Some(path) = path else {
        return EngineConfig::default();
    };
    EngineConfig::from_file(path).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}");
        std::process::exit(1);
    })
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => {
            eprintln!("Failed to serialize result: {e}");
            std::process::exit(1);
        }
    }
}

/// Split `YYYY-MM-DD` without calendar validation; lunar days such as
/// month 2 day 30 must reach the calendar service intact.
fn parse_date(s: &str) -> Result<(i32, u32, u32), String> {
    let parts: Vec<&str> = s.split('-').collect();
    let [y, m, d] = parts.as_slice() else {
        return Err("expected YYYY-MM-DD".into());
    };
    let year = y.parse().map_err(|e| format!("year: {e}"))?;
    let month = m.parse().map_err(|e| format!("month: {e}"))?;
    let day = d.parse().map_err(|e| format!("day: {e}"))?;
    Ok((year, month, day))
}

/// Plain-text chart: dates, summary, per-pillar lines, voids, periods.
struct ChartText<'a>(&'a ChartResult);

impl Display for ChartText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let chart = self.0;
        writeln!(f, "陽曆: {}", chart.solar_date)?;
        writeln!(f, "農曆: {}", chart.lunar_date)?;
        writeln!(f, "性別: {}", chart.gender.name())?;

        let pairs = chart.pillars.by_ref().map(|_, p| p.value().ganzhi);
        write!(f, "{}", ChartSummary { pillars: &pairs, analysis: &chart.analysis })?;

        for (slot, pillar) in chart.pillars.entries() {
            let p = pillar.value();
            writeln!(
                f,
                "{:<5} {} {} {} {} [{}]",
                slot.name(),
                p.ganzhi,
                p.ten_deity,
                p.life_stage,
                p.nayin,
                p.shensha.join(" ")
            )?;
        }
        let empty: String = chart
            .empty_positions
            .empty_pair
            .iter()
            .map(|b| b.as_char())
            .collect();
        writeln!(f, "空亡: {empty} (命中 {})", chart.empty_positions.count)?;

        match &chart.fortune_periods {
            Outcome::Complete(periods) => {
                for p in periods {
                    writeln!(
                        f,
                        "大運 {:>3}歲 {} {}-{} {}",
                        p.start_age, p.ganzhi, p.start_year, p.end_year, p.stem_ten_deity
                    )?;
                }
            }
            Outcome::Degraded { diagnostic, .. } => writeln!(f, "大運: {diagnostic}")?,
        }
        if let Some(cur) = &chart.current_progression {
            writeln!(
                f,
                "{}年 ({}歲): 大運 {} 流年 {}",
                cur.as_of_year, cur.age, cur.period, cur.year
            )?;
        }
        Ok(())
    }
}
