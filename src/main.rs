use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use worldgen::export;
use worldgen::settings::{ClimateStencil, HeightModifier, Settings, ThermalTransfer};
use worldgen::world::Generator;

#[derive(Parser, Debug)]
#[command(name = "worldgen")]
#[command(about = "Generate procedural planet maps: height, water, climate and biomes")]
struct Args {
    /// Load settings from a JSON file (other flags override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Side length of the square world in cells
    #[arg(short = 'S', long)]
    size: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Landmass shaping: none, pangaea, inverse-pangaea, band
    #[arg(short, long)]
    modifier: Option<HeightModifier>,

    /// Height at or below which cells become ocean (0.0-1.0)
    #[arg(long)]
    sea_level: Option<f32>,

    /// Thermal erosion sweeps
    #[arg(long)]
    thermal_iterations: Option<usize>,

    /// Slope a cell must exceed before material slides
    #[arg(long)]
    thermal_threshold: Option<f32>,

    /// Fraction of the excess slope moved per step
    #[arg(long)]
    thermal_coefficient: Option<f32>,

    /// Thermal transfer: conserving or additive (legacy)
    #[arg(long)]
    thermal_transfer: Option<ThermalTransfer>,

    /// Hydraulic erosion sweeps
    #[arg(long)]
    hydraulic_iterations: Option<usize>,

    /// Temperature smoothing stencil: cardinal or legacy
    #[arg(long)]
    climate_stencil: Option<ClimateStencil>,

    /// Directory for the exported PNG maps
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Prefix added to every exported file name
    #[arg(long, default_value = "")]
    prefix: String,

    /// Write the effective settings to a JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Log filter (e.g. "debug", "worldgen=trace"); overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Build the effective settings: file (or defaults), then CLI overrides.
    fn settings(&self) -> worldgen::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings {
                seed: rand::random(),
                ..Default::default()
            },
        };

        if let Some(size) = self.size {
            settings.world_size = size;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(modifier) = self.modifier {
            settings.height_modifier = modifier;
        }
        if let Some(sea_level) = self.sea_level {
            settings.sea_level = sea_level;
        }
        if let Some(iterations) = self.thermal_iterations {
            settings.thermal_erosion_iterations = iterations;
        }
        if let Some(threshold) = self.thermal_threshold {
            settings.thermal_erosion_threshold = threshold;
        }
        if let Some(coefficient) = self.thermal_coefficient {
            settings.thermal_erosion_coefficient = coefficient;
        }
        if let Some(transfer) = self.thermal_transfer {
            settings.thermal_transfer = transfer;
        }
        if let Some(iterations) = self.hydraulic_iterations {
            settings.hydraulic_erosion_iterations = iterations;
        }
        if let Some(stencil) = self.climate_stencil {
            settings.climate_stencil = stencil;
        }
        Ok(settings)
    }
}

fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder.init();
}

fn run(args: &Args) -> worldgen::Result<()> {
    let settings = args.settings()?;

    if let Some(path) = &args.save_config {
        settings.save(path)?;
        log::info!("Saved settings to {}", path.display());
    }

    log::info!(
        "Height modifier: {} ({})",
        settings.height_modifier,
        settings.height_modifier.description()
    );
    log::info!(
        "Thermal transfer: {} ({})",
        settings.thermal_transfer,
        settings.thermal_transfer.description()
    );
    log::info!(
        "Climate stencil: {} ({})",
        settings.climate_stencil,
        settings.climate_stencil.description()
    );

    let mut generator = Generator::new(settings)?;
    let world = generator.generate();

    if world.thermal_stats.iterations > 0 {
        log::info!(
            "Thermal erosion moved {:.3} units of material",
            world.thermal_stats.total_deposited
        );
    }
    if world.hydraulic_stats.iterations > 0 {
        log::info!(
            "Hydraulic erosion moved {:.3} units, marked {} river/lake cells",
            world.hydraulic_stats.total_eroded,
            world.hydraulic_stats.river_cells
        );
    }
    log::info!("{}", world.summary());

    export::export_all(world, &args.output, &args.prefix)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
