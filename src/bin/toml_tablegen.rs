use clap::Parser;
use geomag_tablegen::core::ConfigProvider;
use geomag_tablegen::utils::{logger, validation::Validate};
use geomag_tablegen::{CoeffPipeline, LocalStorage, TableGenEngine, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-tablegen")]
#[command(about = "Coefficient table generator with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "tablegen.toml")]
    config: String,

    /// Override source.path from config
    #[arg(short, long)]
    input: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Parse the coefficient file and report, without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    // 應用命令列覆蓋設定
    if let Some(input) = args.input {
        tracing::info!("🔧 Input overridden to: {}", input);
        config.source.path = Some(input);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config);

    let pipeline = CoeffPipeline::new(LocalStorage::default(), config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        if let Err(e) = perform_dry_run(&pipeline).await {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
        return Ok(());
    }

    let engine = TableGenEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Table generated successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!("❌ Table generation failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    println!("📋 Configuration Summary:");
    println!("  Model: {}", config.model_name());
    println!("  Source: {}", config.input_path());
    println!("  Output: {}/{}", config.output_path(), config.table_filename());
    if let Some(name) = config.secular_filename() {
        println!("  Secular table: {}", name);
    }
    if let Some(name) = config.constants_filename() {
        println!("  Constants: {}", name);
    }
    if let Some(name) = config.json_filename() {
        println!("  JSON export: {}", name);
    }
    println!("  Double factorial: {}", config.double_factorial());
    println!("  Literal macro: {}", config.literal_macro());
    println!();
}

async fn perform_dry_run(
    pipeline: &CoeffPipeline<LocalStorage, TomlConfig>,
) -> geomag_tablegen::Result<()> {
    let model = pipeline.check().await?;

    println!("🔍 Dry Run Analysis:");
    println!("  Model: {} ({}), epoch {:?}", model.title, model.date, model.epoch);
    println!("  Coefficients: {} up to degree {}", model.len(), model.nm_max());
    println!("✅ Input is complete. Run without --dry-run to write the table.");
    Ok(())
}
