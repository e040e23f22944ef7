// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for loading, validating, converting, and
// inspecting map files. All terminal output lives here; the engine only
// emits tracing events.
// ═══════════════════════════════════════════════════════════════════════

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use warmap_engine::loader::{self, LoadOutcome};
use warmap_engine::{IdAllocator, LoadedMap, MapError, MapFormat};

#[derive(Parser)]
#[command(name = "warmap", about = "Territorial map loader and validator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a map file and report whether it is a valid play surface
    Load {
        file: PathBuf,
        /// Grammar to parse with (detected from content when omitted)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Convert a map file between the two grammars
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// Target grammar
        #[arg(long, value_enum)]
        to: FormatArg,
        /// Source grammar (detected from content when omitted)
        #[arg(long, value_enum)]
        from: Option<FormatArg>,
    },
    /// Print the parsed model of a map file
    Show {
        file: PathBuf,
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
        /// Emit the model as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Create an empty map file to start editing from
    New { file: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Domination,
    Conquest,
}

impl From<FormatArg> for MapFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Domination => MapFormat::Domination,
            FormatArg::Conquest => MapFormat::Conquest,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warmap_engine=warn")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Load { file, format } => cmd_load(&file, format.map(Into::into)),
        Commands::Convert { input, output, to, from } => {
            cmd_convert(&input, &output, to.into(), from.map(Into::into))
        }
        Commands::Show { file, format, json } => cmd_show(&file, format.map(Into::into), json),
        Commands::New { file } => cmd_new(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_load(file: &Path, format: Option<MapFormat>) -> Result<(), MapError> {
    let mut alloc = IdAllocator::new();
    match loader::load_map_file(file, format, &mut alloc)? {
        LoadOutcome::Created => {
            println!("a file {} has been created.", file.display());
        }
        LoadOutcome::Loaded(loaded) => {
            report_skips(&loaded);
            println!(
                "map ok: {} continents, {} countries, strongly connected",
                loaded.model.continent_count(),
                loaded.model.country_count(),
            );
        }
    }
    Ok(())
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    to: MapFormat,
    from: Option<MapFormat>,
) -> Result<(), MapError> {
    let text = std::fs::read_to_string(input)?;
    let from = from.unwrap_or_else(|| MapFormat::detect(&text));

    let mut alloc = IdAllocator::new();
    let loaded = from.parse_str(&text, &mut alloc)?;
    report_skips(&loaded);

    loader::save_map_file(output, to, &loaded.model)?;
    println!("converted {} ({from}) -> {} ({to})", input.display(), output.display());
    Ok(())
}

fn cmd_show(file: &Path, format: Option<MapFormat>, json: bool) -> Result<(), MapError> {
    let text = std::fs::read_to_string(file)?;
    let format = format.unwrap_or_else(|| MapFormat::detect(&text));

    let mut alloc = IdAllocator::new();
    let loaded = format.parse_str(&text, &mut alloc)?;
    report_skips(&loaded);
    let model = &loaded.model;

    if json {
        println!("{}", serde_json::to_string_pretty(model).unwrap_or_default());
        return Ok(());
    }

    println!("Continents:");
    for continent in model.continents() {
        println!("  {:3}  {:20} value: {}", continent.id.0, continent.name, continent.value);
    }
    println!("Countries:");
    for country in model.countries() {
        let neighbors = model
            .neighbors(country.id)
            .map(|set| {
                let mut ids: Vec<_> = set.iter().copied().collect();
                ids.sort_unstable();
                ids.iter()
                    .filter_map(|id| model.country_name(*id))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!(
            "  {:3}  {:20} {:15} ({}, {})  borders: {}",
            country.id.0,
            country.name,
            country.continent_name,
            country.coordinate_x,
            country.coordinate_y,
            neighbors,
        );
    }
    Ok(())
}

fn cmd_new(file: &Path) -> Result<(), MapError> {
    if file.exists() {
        println!("{} already exists.", file.display());
        return Ok(());
    }
    let mut alloc = IdAllocator::new();
    if let LoadOutcome::Created = loader::load_map_file(file, None, &mut alloc)? {
        println!("a file {} has been created.", file.display());
    }
    Ok(())
}

fn report_skips(loaded: &LoadedMap) {
    for skip in &loaded.skipped {
        eprintln!("skipped [{:?}] line \"{}\": {}", skip.section, skip.line, skip.reason);
    }
}
