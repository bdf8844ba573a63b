// --- Generador de horarios desde el boletín académico - Archivo principal ---

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use jikanwari::algorithm::{TimetableOutcome, TimetableRequest, get_courses_by_semester_and_major, plan_timetable};
use jikanwari::api_json::{course_to_dto, needs_resolution_response, ready_response};
use jikanwari::bulletin::read_bulletin_csv;
use jikanwari::config::{DEFAULT_BIND, DEFAULT_DB_PATH, DEFAULT_REPORT_DIR, Settings, db_path_from};
use jikanwari::models::Language;
use jikanwari::normalize::{ConvertedDataset, ExtractedDataset, convert_dataset, extract_dataset};
use jikanwari::reports::write_conflict_report;
use jikanwari::storage::{SqliteRepository, import_bulletin, load_converted, open_database, table_counts};

#[derive(Parser, Debug)]
#[command(name = "jikanwari", version, about = "Bulletin importer and timetable planner")]
struct Cli {
    /// SQLite database file (sqlite:// and file:// prefixes accepted)
    #[arg(long, global = true, env = "JIKANWARI_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db: String,

    /// Directory for persisted conflict reports
    #[arg(long, global = true, env = "JIKANWARI_REPORT_DIR", default_value = DEFAULT_REPORT_DIR)]
    report_dir: PathBuf,

    /// Display language: ja | en
    #[arg(long, global = true, env = "JIKANWARI_LANG", default_value = "ja")]
    lang: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Raw bulletin CSV -> extracted per-entity CSVs (text keys)
    Extract {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "data/extracted")]
        out: PathBuf,
    },
    /// Extracted CSVs -> converted CSVs (integer keys)
    Convert {
        #[arg(long, default_value = "data/extracted")]
        input: PathBuf,
        #[arg(long, default_value = "data/converted")]
        out: PathBuf,
    },
    /// Converted CSVs -> database, in one transaction
    Load {
        #[arg(long, default_value = "data/converted")]
        input: PathBuf,
    },
    /// Raw bulletin CSV -> database directly, in one transaction
    Import {
        #[arg(long)]
        input: PathBuf,
    },
    /// Courses of a semester, optionally restricted to one major
    Courses {
        #[arg(long)]
        semester: u8,
        #[arg(long)]
        major: Option<i64>,
    },
    /// Weekly timetable for a semester and two majors
    Timetable {
        #[arg(long)]
        semester: u8,
        #[arg(long)]
        major1: i64,
        #[arg(long)]
        major2: i64,
        /// Priority choice for a conflicted cell: conflict_{day}_{period}=CODE
        #[arg(long = "choice", value_parser = parse_choice)]
        choices: Vec<(String, String)>,
    },
    /// Start the JSON HTTP server
    Serve {
        #[arg(long, env = "JIKANWARI_BIND", default_value = DEFAULT_BIND)]
        bind: String,
    },
}

fn parse_choice(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, code) = raw.split_once('=').ok_or_else(|| format!("expected KEY=CODE, got '{}'", raw))?;
    Ok((key.trim().to_string(), code.trim().to_string()))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env antes de clap para que los `env = ...` lo vean
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("jikanwari=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let lang = Language::from_code(&cli.lang).ok_or_else(|| anyhow!("unsupported language '{}'", cli.lang))?;
    let settings = Settings {
        db_path: db_path_from(&cli.db),
        report_dir: cli.report_dir.clone(),
        lang,
        ..Settings::from_env()
    };

    match cli.command {
        Command::Extract { input, out } => {
            let records = read_bulletin_csv(&input).with_context(|| format!("reading {}", input.display()))?;
            let (dataset, stats) = extract_dataset(&records);
            dataset.write_to_dir(&out).with_context(|| format!("writing {}", out.display()))?;
            print_json(&serde_json::json!({"out": out, "stats": stats}))?;
        }
        Command::Convert { input, out } => {
            let extracted = ExtractedDataset::read_from_dir(&input)
                .with_context(|| format!("reading extracted CSVs from {}", input.display()))?;
            let converted = convert_dataset(&extracted);
            converted.write_to_dir(&out).with_context(|| format!("writing {}", out.display()))?;
            print_json(&serde_json::json!({"out": out, "courses": converted.courses.len()}))?;
        }
        Command::Load { input } => {
            let converted = ConvertedDataset::read_from_dir(&input)
                .with_context(|| format!("reading converted CSVs from {}", input.display()))?;
            let mut conn = open_database(&settings.db_path).context("opening database")?;
            let summary = load_converted(&mut conn, &converted).context("load rolled back")?;
            let counts: HashMap<String, i64> = table_counts(&conn)?.into_iter().collect();
            print_json(&serde_json::json!({"summary": summary, "table_counts": counts}))?;
        }
        Command::Import { input } => {
            let records = read_bulletin_csv(&input).with_context(|| format!("reading {}", input.display()))?;
            let mut conn = open_database(&settings.db_path).context("opening database")?;
            let (stats, summary) = import_bulletin(&mut conn, &records).context("import rolled back")?;
            let counts: HashMap<String, i64> = table_counts(&conn)?.into_iter().collect();
            print_json(&serde_json::json!({"stats": stats, "summary": summary, "table_counts": counts}))?;
        }
        Command::Courses { semester, major } => {
            let conn = open_database(&settings.db_path).context("opening database")?;
            let repo = SqliteRepository::new(&conn);
            let courses = get_courses_by_semester_and_major(&repo, semester, major)?;
            let dtos: Vec<_> = courses.iter().map(|c| course_to_dto(c, settings.lang)).collect();
            print_json(&serde_json::json!({"semester": semester, "major_id": major, "courses": dtos}))?;
        }
        Command::Timetable { semester, major1, major2, choices } => {
            let conn = open_database(&settings.db_path).context("opening database")?;
            let repo = SqliteRepository::new(&conn);
            let req = TimetableRequest {
                semester,
                major1_id: major1,
                major2_id: major2,
                lang: settings.lang,
                choices: choices.into_iter().collect(),
            };
            match plan_timetable(&repo, &req)? {
                TimetableOutcome::NeedsResolution { header, conflicts } => {
                    let path = write_conflict_report(&settings.report_dir, &header, &conflicts)?;
                    info!(report = %path.display(), "pass --choice KEY=CODE for each conflict");
                    print_json(&needs_resolution_response(&header, &conflicts, settings.lang))?;
                }
                TimetableOutcome::Ready(view) => {
                    if !view.conflicts.is_empty() {
                        write_conflict_report(&settings.report_dir, &view.header, &view.conflicts)?;
                    }
                    print_json(&ready_response(&view, settings.lang))?;
                }
            }
        }
        Command::Serve { bind } => {
            if bind.trim().is_empty() {
                bail!("bind address is empty");
            }
            jikanwari::run_server(Settings { bind, ..settings }).await?;
        }
    }
    Ok(())
}
