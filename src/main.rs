use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use medtrack_lib::config::{self, ExtractionConfig};
use medtrack_lib::db::open_database;
use medtrack_lib::pipeline::extraction::{TextRecognizer, VisionRecognizer};
use medtrack_lib::pipeline::processor::ReportProcessor;
use medtrack_lib::profile::{load_profile, register_profile, NewProfile};
use medtrack_lib::reports::{find_user_report, save_observation, user_reports, write_export};

#[derive(Parser)]
#[command(name = "medtrack", version)]
#[command(about = "Extract and track results from laboratory report scans")]
struct Cli {
    /// Database file (default: ~/MedTrack/medtrack.db, or MEDTRACK_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a user profile
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        patient_name: String,
        /// Date of birth, free text
        #[arg(long)]
        dob: Option<String>,
        /// Generated as PAT-<year>-<NNN> when omitted
        #[arg(long)]
        patient_id: Option<String>,
    },
    /// Extract one observation from a report and add it to the user's list
    Process {
        #[arg(long)]
        user: String,
        /// Report image, or recognized text with --text / a .txt extension
        file: PathBuf,
        /// Treat the file as already-recognized text
        #[arg(long)]
        text: bool,
        /// Skip the vision recognizer and use sample report text
        #[arg(long)]
        offline: bool,
    },
    /// Print the user's reports as JSON lines
    List {
        #[arg(long)]
        user: String,
        /// Keep reports whose names, date or value contain this term
        #[arg(long)]
        search: Option<String>,
    },
    /// Write a text summary of one report
    Export {
        #[arg(long)]
        user: String,
        id: Uuid,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    medtrack_lib::init_tracing();
    let cli = Cli::parse();

    let db_path = cli.db.unwrap_or_else(config::database_path);
    tracing::info!(version = config::APP_VERSION, db = %db_path.display(), "MedTrack starting");
    let conn = open_database(&db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;

    match cli.command {
        Command::Register {
            username,
            patient_name,
            dob,
            patient_id,
        } => {
            let profile = register_profile(
                &conn,
                NewProfile {
                    username,
                    patient_name,
                    date_of_birth: dob,
                    patient_id,
                },
            )?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::Process {
            user,
            file,
            text,
            offline,
        } => {
            load_profile(&conn, &user)?;
            let config = ExtractionConfig::from_env();
            let recognizer: Option<Arc<dyn TextRecognizer>> = if offline {
                None
            } else {
                Some(Arc::new(VisionRecognizer::from_config(&config)))
            };
            let processor = ReportProcessor::new(recognizer, config);
            let filename = display_name(&file);

            let outcome = if text || has_txt_extension(&file) {
                let content = std::fs::read_to_string(&file)
                    .with_context(|| format!("reading {}", file.display()))?;
                processor.process_text(&content, &filename)
            } else {
                let bytes = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("reading {}", file.display()))?;
                processor.process_image(bytes, &filename).await
            };

            let report = save_observation(&conn, &user, outcome.observation)?;
            let output = serde_json::json!({
                "report": report,
                "text_origin": outcome.text_origin,
                "tier": outcome.tier,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::List { user, search } => {
            for report in user_reports(&conn, &user, search.as_deref())? {
                println!("{}", serde_json::to_string(&report)?);
            }
        }
        Command::Export { user, id, out } => {
            let report = find_user_report(&conn, &user, &id)?;
            let path = write_export(&report, &out)?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn has_txt_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}
