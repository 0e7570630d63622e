use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pidsight::config;
use pidsight::db;
use pidsight::export;
use pidsight::ids::IdSource;
use pidsight::pipeline::{run_pipeline, OllamaVisionClient};
use pidsight::standards::StandardsProfile;

#[derive(Parser)]
#[command(name = "pidsight", version, about = "P&ID drawing extraction and reconciliation")]
struct Cli {
    /// Drawing image to analyze (PNG or JPEG)
    image: PathBuf,

    /// Directory for JSON/CSV/XML outputs
    #[arg(short, long, default_value = "output")]
    out_dir: PathBuf,

    /// Vision model name on the Ollama endpoint
    #[arg(short, long, default_value = config::DEFAULT_VISION_MODEL)]
    model: String,

    /// Ollama endpoint URL
    #[arg(long, default_value = config::DEFAULT_OLLAMA_URL)]
    ollama_url: String,

    /// Seed for synthetic identifier generation (reproducible runs)
    #[arg(long)]
    seed: Option<u64>,

    /// Skip writing equipment to the SQLite register
    #[arg(long)]
    skip_db: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let image_bytes = std::fs::read(&cli.image)?;
    let source_image = cli
        .image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.image.display().to_string());
    let stem = cli
        .image
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "drawing".to_string());

    let client = OllamaVisionClient::new(&cli.ollama_url, &cli.model, config::VISION_TIMEOUT_SECS);
    match client.is_model_available() {
        Ok(false) => {
            tracing::warn!(model = cli.model, "Model not found on endpoint, trying anyway");
        }
        Err(err) => return Err(Box::new(err)),
        Ok(true) => {}
    }

    let profile = StandardsProfile::default();
    let mut ids = match cli.seed {
        Some(seed) => IdSource::with_seed(seed),
        None => IdSource::new(),
    };

    let result = run_pipeline(&client, &image_bytes, &source_image, &profile, &mut ids)?;

    std::fs::create_dir_all(&cli.out_dir)?;

    let json_path = cli.out_dir.join(format!("{stem}.json"));
    std::fs::write(&json_path, serde_json::to_string_pretty(&result)?)?;

    let iso_path = cli.out_dir.join(format!("{stem}_iso15926.json"));
    let iso = export::to_iso15926(&result.document);
    std::fs::write(&iso_path, serde_json::to_string_pretty(&iso)?)?;

    let xml_path = cli.out_dir.join(format!("{stem}.xml"));
    std::fs::write(&xml_path, export::document_to_xml(&result.document)?)?;

    let csv_paths = export::csv::write_category_csvs(&result.document, &cli.out_dir, &stem)?;

    if !cli.skip_db {
        let conn = db::open_database(&cli.out_dir.join("pid_register.db"))?;
        db::save_equipment(&conn, &result.document, &source_image)?;
    }

    println!("Analysis {} of {source_image}", result.analysis_id);
    println!(
        "  {} items extracted ({} equipment, {} instruments, {} lines, {} valves)",
        result.document.item_count(),
        result.document.equipment.len(),
        result.document.instrumentation.len(),
        result.document.lines.len(),
        result.document.valves.len(),
    );
    println!(
        "  {} outputs written to {}",
        3 + csv_paths.len(),
        cli.out_dir.display()
    );

    if result.review.warnings.is_empty() {
        println!("  Review queue: clean");
    } else {
        println!("  Review queue: {} warnings", result.review.warnings.len());
        for issue in &result.review.warnings {
            println!("    [{}] {}: {}", issue.issue_type.as_str(), issue.id, issue.details);
        }
    }

    Ok(())
}
