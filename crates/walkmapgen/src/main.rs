// walkmapgen - Walkmap generator for .world level files
// Reads box geometry, carves walkable surfaces and writes a .walkmap, plus an
// optional .world preview of the result.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

mod blocks;
mod preview;
mod settings;
mod walkmap_file;
mod world;

use walkmap::{Obstacle, WalkRegion, WalkmapSettings, generate_walkmap};
use walkmap_shared::config::Config;
use walkmap_shared::log::{initialize_logging, map_log_level};

use crate::settings::{ENV_PREFIX, SettingOverrides, resolve_settings};
use crate::world::World;

const WALKMAP_EXTENSION: &str = "walkmap";
const PREVIEW_SUFFIX: &str = ".world";
const LOG_FILE_NAME: &str = "walkmapgen.log";
const DEFAULT_LOG_LEVEL: i32 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "walkmapgen")]
#[command(about = "Generate a walkmap from a .world file")]
#[command(version)]
struct Cli {
    /// Path to a .world file, or a .walkmap file to only write its preview
    #[arg(short = 'i', long = "in", visible_alias = "world", value_name = "PATH")]
    input: PathBuf,

    /// Where to write the walkmap (default: input path with a .walkmap extension)
    #[arg(short = 'o', long = "out", visible_alias = "walkmap", value_name = "PATH")]
    output: Option<PathBuf>,

    /// INI configuration file
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Obstacles at least this far above a surface do not obstruct it
    #[arg(long = "player-height")]
    player_height: Option<f32>,

    /// Distance kept between walkable edges and walls that cannot be stepped onto
    #[arg(long = "player-radius")]
    player_radius: Option<f32>,

    /// Largest height difference the player can step across
    #[arg(long = "player-step-height")]
    step_height: Option<f32>,

    /// Passed through to the walkmap, not used for generation
    #[arg(long = "player-max-speed")]
    max_player_speed: Option<f32>,

    /// Passed through to the walkmap, not used for generation
    #[arg(long = "height-adjustment-speed")]
    height_speed: Option<f32>,

    /// Skip generation and write a preview of the raw obstacle tops instead
    #[arg(long = "no-walkmap")]
    no_walkmap: bool,

    /// Also write <out>.world showing every walkmap region as a thin box
    #[arg(long = "generate-walkmap-world")]
    generate_walkmap_world: bool,

    /// Walkmap output format
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Console log level (0=Error, 1=Warn, 2=Info, 3=Debug, 4=Trace)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<i32>,

    /// Directory for a rolling log file
    #[arg(long = "logs-dir", value_name = "DIR")]
    logs_dir: Option<String>,
}

impl Cli {
    fn overrides(&self) -> SettingOverrides {
        SettingOverrides {
            player_height: self.player_height,
            player_radius: self.player_radius,
            step_height: self.step_height,
            max_player_speed: self.max_player_speed,
            height_speed: self.height_speed,
        }
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension(WALKMAP_EXTENSION))
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::from_env(ENV_PREFIX));
    };
    Config::load(path, ENV_PREFIX)
        .with_context(|| format!("Could not read config file {}", path.display()))
}

fn init_logging(cli: &Cli, config: &Config) {
    let level = cli
        .log_level
        .or_else(|| config.get_int("LogLevel"))
        .unwrap_or(DEFAULT_LOG_LEVEL);
    let logs_dir = cli
        .logs_dir
        .clone()
        .or_else(|| config.get("LogsDir").filter(|dir| !dir.is_empty()));
    initialize_logging(logs_dir.as_deref(), map_log_level(level), LOG_FILE_NAME);
}

fn preview_path(output: &Path) -> PathBuf {
    let mut path = output.as_os_str().to_owned();
    path.push(PREVIEW_SUFFIX);
    PathBuf::from(path)
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn write_preview(output: &Path, regions: &[WalkRegion], settings: &WalkmapSettings) -> anyhow::Result<()> {
    let path = preview_path(output);
    info!("Writing walkmap preview to {}...", path.display());
    write_file(&path, &preview::write_preview_world(regions, settings))
}

/// Preview an existing walkmap without regenerating it
fn run_preview(cli: &Cli) -> anyhow::Result<()> {
    info!("Parsing .walkmap file...");
    let content = fs::read_to_string(&cli.input)
        .with_context(|| format!("Invalid path for walkmap {}", cli.input.display()))?;
    let walkmap = walkmap_file::read_walkmap(&content)
        .with_context(|| format!("Failed to parse {}", cli.input.display()))?;
    info!("Read {} region(s)", walkmap.len());

    write_preview(&cli.output_path(), &walkmap.regions, &walkmap.settings)
}

fn run_generate(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    info!("Parsing .world file...");
    let world = World::load(&cli.input)?;
    let settings = resolve_settings(config, world.settings.as_deref(), &cli.overrides());
    let obstacles = world.obstacles();
    let output = cli.output_path();

    if cli.no_walkmap {
        if cli.generate_walkmap_world {
            warn!("--no-walkmap given, writing only the obstacle preview");
        }
        return write_preview(&output, &preview::obstacle_tops(&obstacles), &settings);
    }

    let inflated: Vec<Obstacle> = obstacles
        .iter()
        .map(|o| o.inflated(settings.player_radius))
        .collect();

    info!("Generating walkmap...");
    let (walkmap, report) = generate_walkmap(&inflated, &settings)
        .with_context(|| format!("Failed to generate walkmap for {}", cli.input.display()))?;
    info!(
        "{} obstacle(s), {} stepped onto, {} region(s) written",
        report.obstacles,
        report.stepped_onto,
        walkmap.len()
    );

    info!("Writing walkmap to {}...", output.display());
    let content = match cli.format {
        OutputFormat::Text => walkmap_file::write_walkmap(&walkmap),
        OutputFormat::Json => walkmap_file::write_walkmap_json(&walkmap)
            .context("Failed to serialize walkmap")?,
    };
    write_file(&output, &content)?;

    if cli.generate_walkmap_world {
        write_preview(&output, &walkmap.regions, &walkmap.settings)?;
    }
    Ok(())
}

fn is_walkmap_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == WALKMAP_EXTENSION)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    init_logging(&cli, &config);

    let start = Instant::now();
    if is_walkmap_file(&cli.input) {
        run_preview(&cli)?;
    } else {
        run_generate(&cli, &config)?;
    }

    info!("Done (finished in {:.3} seconds).", start.elapsed().as_secs_f64());
    Ok(())
}
