//! clinqa CLI - Quality checks for clinical research CSV uploads
//!
//! # Main Commands
//!
//! ```bash
//! clinqa analyze visits.csv --modality clinical   # QA report (text)
//! clinqa analyze visits.csv --format json --save  # JSON report, saved as upload record
//! clinqa columns visits.csv -o metrics.csv        # Per-column metrics as CSV
//! clinqa serve                                    # Start HTTP server (port 3000)
//! ```
//!
//! # Stored Reports
//!
//! ```bash
//! clinqa reports list
//! clinqa reports show <id>
//! clinqa reports delete <id>
//! clinqa check-report report.json                 # Validate a report blob
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use clinqa::{
    analyze_file, render_text, run_analysis, validate_report_json, write_column_metrics_csv,
    AnalysisInput, Config, Modality, RecordSummary, ReportStore, DEFAULT_LIST_LIMIT,
};
use serde_json::Value;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "clinqa")]
#[command(about = "Quality checks for clinical research CSV uploads", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a CSV file and print its QA report
    Analyze {
        /// Input CSV file
        input: PathBuf,

        /// Data modality of the file
        #[arg(short, long)]
        modality: Option<Modality>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save the report as an upload record
        #[arg(long, requires = "modality")]
        save: bool,
    },

    /// Write per-column metrics of a CSV file as CSV
    Columns {
        /// Input CSV file
        input: PathBuf,

        /// Data modality of the file
        #[arg(short, long)]
        modality: Option<Modality>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: CLINQA_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage saved upload records
    Reports {
        #[command(subcommand)]
        action: ReportsAction,
    },

    /// Validate a QA report JSON file against the report schema
    CheckReport {
        /// Input JSON file
        input: PathBuf,
    },
}

#[derive(Subcommand)]
enum ReportsAction {
    /// List saved records, newest first
    List {
        /// Maximum number of records
        #[arg(short, long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,
    },

    /// Show a saved report
    Show {
        /// Record ID
        id: String,

        /// Print the raw JSON report
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved record
    Delete {
        /// Record ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(2);
        }
    };

    let result = match cli.command {
        Commands::Analyze {
            input,
            modality,
            format,
            output,
            save,
        } => cmd_analyze(&config, &input, modality, format, output.as_deref(), save),
        Commands::Columns {
            input,
            modality,
            output,
        } => cmd_columns(&input, modality, output.as_deref()),
        Commands::Serve { port } => cmd_serve(config, port).await,
        Commands::Reports { action } => cmd_reports(&config, action),
        Commands::CheckReport { input } => cmd_check_report(&input),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_analyze(
    config: &Config,
    input: &Path,
    modality: Option<Modality>,
    format: OutputFormat,
    output: Option<&Path>,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let analysis_input = AnalysisInput::from_path(input, modality);

    let outcome = if save {
        let mut store = ReportStore::new(config);
        run_analysis(analysis_input, Some(&mut store))
    } else {
        run_analysis(analysis_input, None)
    };

    let content = match format {
        OutputFormat::Text => render_text(&outcome.report),
        OutputFormat::Json => serde_json::to_string_pretty(&outcome.report)?,
    };
    write_output(&content, output)?;

    if let Some(id) = outcome.record_id {
        eprintln!("💾 Saved as record {}", id);
    }
    if let Some(e) = outcome.persist_error {
        return Err(format!("Report not saved: {}", e).into());
    }
    if !outcome.report.is_valid {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_columns(
    input: &Path,
    modality: Option<Modality>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = analyze_file(input, modality);
    for error in &report.errors {
        eprintln!("❌ {}", error);
    }

    match output {
        Some(p) => {
            write_column_metrics_csv(&report, File::create(p)?)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => write_column_metrics_csv(&report, std::io::stdout().lock())?,
    }
    Ok(())
}

async fn cmd_serve(config: Config, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config {
        port: port.unwrap_or(config.port),
        ..config
    };
    clinqa::server::start_server(config).await
}

fn cmd_reports(config: &Config, action: ReportsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ReportStore::new(config);

    match action {
        ReportsAction::List { limit } => {
            let records = store.list(limit);
            if records.is_empty() {
                eprintln!("📋 No reports saved in {}", store.dir().display());
                eprintln!("   Use 'clinqa analyze <file> --modality <m> --save' to add one.");
                return Ok(());
            }

            eprintln!("📋 Saved reports ({}):\n", records.len());
            for record in records.into_iter().map(RecordSummary::from) {
                println!("  📄 {} ({})", record.file_name, record.id);
                println!(
                    "     {} | {} | {} | score {:.1}",
                    record.modality, record.file_size_label, record.qa_status, record.qa_score
                );
                println!("     Analyzed: {}", record.qa_completed_at.to_rfc3339());
                println!();
            }
        }
        ReportsAction::Show { id, json } => {
            let report = store.load_report(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_text(&report));
            }
        }
        ReportsAction::Delete { id } => {
            store.delete(&id)?;
            eprintln!("🗑️  Report deleted: {}", id);
        }
    }

    Ok(())
}

fn cmd_check_report(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let value: Value = serde_json::from_str(&content)?;

    match validate_report_json(&value) {
        Ok(()) => {
            eprintln!("✅ Report is valid");
            Ok(())
        }
        Err(errors) => {
            eprintln!("\n❌ {} schema violation(s):", errors.len());
            for err in &errors {
                eprintln!("   - {}", err);
            }
            std::process::exit(1);
        }
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}
