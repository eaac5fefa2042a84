use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use glowsphere::synth::{synthesize_sized, MAX_SPRITE_SIZE, SPRITE_SIZE};
use glowsphere::{ConfigError, ParticleShape, Rgb, SceneConfig, Viewer};

#[derive(Parser)]
#[command(name = "glowsphere")]
#[command(about = "Interactive particle sphere that disperses and reforms on click")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Open the viewer (default)
    Run(RunArgs),
    /// Write a single sprite texture to an image file
    Sprite(SpriteArgs),
}

#[derive(Args)]
struct RunArgs {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Particle color, e.g. "#ff0055" or "rgb(255, 0, 85)"
    #[arg(long)]
    color: Option<String>,

    /// Particle shape: sphere, snowflake, petal or star
    #[arg(long)]
    shape: Option<String>,

    /// Number of particles
    #[arg(long)]
    count: Option<u32>,

    /// Layout seed, for a reproducible cloud
    #[arg(long)]
    seed: Option<u64>,

    /// Launch in fullscreen mode
    #[arg(long)]
    fullscreen: bool,
}

#[derive(Args)]
struct SpriteArgs {
    /// Sprite shape
    #[arg(long, default_value = "sphere")]
    shape: String,

    /// Sprite color
    #[arg(long, default_value = "#00f3ff")]
    color: String,

    /// Output image path
    #[arg(long)]
    out: PathBuf,

    /// Edge length in pixels (1 to 4096)
    #[arg(
        long,
        default_value_t = SPRITE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SPRITE_SIZE)),
    )]
    size: u32,
}

fn load_config(args: RunArgs) -> Result<SceneConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(color) = args.color {
        config.color = color;
    }
    if let Some(shape) = args.shape {
        config.shape = shape;
    }
    if let Some(count) = args.count {
        config.particle_count = count;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.fullscreen |= args.fullscreen;
    config.validate()?;
    Ok(config)
}

fn write_sprite(args: SpriteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let shape: ParticleShape = args.shape.parse().map_err(ConfigError::Shape)?;
    let color: Rgb = args.color.parse()?;
    synthesize_sized(args.size, shape, color).save_png(&args.out)?;
    Ok(())
}

fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    Viewer::new(config).run()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Some(Command::Sprite(args)) => write_sprite(args),
        Some(Command::Run(args)) => run(args),
        None => run(cli.run),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn sprite_args(args: &[&str]) -> Result<SpriteArgs, clap::Error> {
        let cli = Cli::try_parse_from(args)?;
        match cli.command {
            Some(Command::Sprite(args)) => Ok(args),
            _ => panic!("expected the sprite subcommand"),
        }
    }

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sprite_size_defaults_to_sprite_size() {
        let args = sprite_args(&["glowsphere", "sprite", "--out", "orb.png"]).unwrap();
        assert_eq!(args.size, SPRITE_SIZE);
    }

    #[test]
    fn test_sprite_size_is_bounded() {
        let with_size = |size: String| {
            sprite_args(&["glowsphere", "sprite", "--out", "a.png", "--size", &size])
        };
        assert_eq!(with_size(MAX_SPRITE_SIZE.to_string()).unwrap().size, MAX_SPRITE_SIZE);
        assert!(with_size((MAX_SPRITE_SIZE + 1).to_string()).is_err());
        assert!(with_size("0".into()).is_err());
        assert!(with_size("100000".into()).is_err());
    }

    #[test]
    fn test_run_flags_without_subcommand() {
        let cli = Cli::try_parse_from(["glowsphere", "--shape", "star", "--seed", "7"]).unwrap();
        assert!(cli.command.is_none());
        let config = load_config(cli.run).unwrap();
        assert_eq!(config.shape, "star");
        assert_eq!(config.seed, Some(7));
    }
}
