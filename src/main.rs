use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use wallpaint::{
    build_controller, export_surface, init_logging, parse_obstacle, planner_client,
    wait_until_settled, Config, DeployInputs, DeployOutcome, Dimensions, Obstacle,
    TrajectoryRequest, UiState, BUILD_DATE, VERSION,
};

#[derive(Parser, Debug)]
#[command(name = "wallpaint", version, about = "Plan and animate wall-painting trajectories")]
struct Cli {
    /// Config file (.toml or .json); defaults to the platform config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log as JSON lines instead of pretty text
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a trajectory for a wall and animate it
    Deploy(DeployArgs),
    /// Animate a trajectory the planner already stored
    Replay {
        id: i64,
        #[arg(long)]
        tool_width: Option<f64>,
        #[arg(long, short, default_value = "trajectory.png")]
        output: PathBuf,
        #[arg(long)]
        planner_url: Option<String>,
    },
    /// Show the effective configuration, or write a default file
    Config {
        #[arg(long)]
        init: bool,
        /// Overwrite an existing file with --init
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct DeployArgs {
    /// Wall width in meters
    #[arg(long)]
    wall_width: Option<f64>,
    /// Wall height in meters
    #[arg(long)]
    wall_height: Option<f64>,
    /// Obstacle as x,y,width,height in meters (repeatable)
    #[arg(long = "obstacle", value_parser = parse_obstacle)]
    obstacles: Vec<Obstacle>,
    /// Tool width in meters
    #[arg(long)]
    tool_width: Option<f64>,
    #[arg(long, short, default_value = "trajectory.png")]
    output: PathBuf,
    #[arg(long)]
    planner_url: Option<String>,
}

impl DeployArgs {
    fn inputs(&self, config: &Config) -> DeployInputs {
        let defaults = DeployInputs::from_settings(&config.deploy);
        let wall = Dimensions::new(
            self.wall_width.unwrap_or(config.deploy.wall_width),
            self.wall_height.unwrap_or(config.deploy.wall_height),
        );
        let obstacles = if self.obstacles.is_empty() {
            defaults.request.obstacles
        } else {
            self.obstacles.clone()
        };
        DeployInputs::new(
            TrajectoryRequest::new(wall, obstacles),
            self.tool_width.unwrap_or(defaults.tool_width),
        )
    }
}

fn load_config(path: &Path, planner_url: Option<String>) -> Result<Config> {
    let mut config = Config::load_or_default(path)
        .with_context(|| format!("Cannot load config {}", path.display()))?;
    if let Some(url) = planner_url {
        config.planner.base_url = url;
    }
    config.validate()?;
    Ok(config)
}

fn report(state: UiState, surface_written: bool, output: &Path) -> Result<()> {
    match state {
        UiState::Complete => {
            println!("Complete! Wrote {}", output.display());
            Ok(())
        }
        UiState::Error(message) if surface_written => {
            bail!("{message} (partial drawing in {})", output.display())
        }
        UiState::Error(message) => bail!(message),
        other => bail!("Deploy ended in state {other}"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;
    info!("Wallpaint {} (built {})", VERSION, BUILD_DATE);

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };

    match cli.command {
        Command::Config { init, force } => {
            if init {
                if config_path.exists() && !force {
                    bail!(
                        "{} already exists (use --force to overwrite)",
                        config_path.display()
                    );
                }
                Config::default().save_to_file(&config_path)?;
                println!("Wrote default config to {}", config_path.display());
            } else {
                let config = Config::load_or_default(&config_path)?;
                println!("# {}", config_path.display());
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        Command::Deploy(args) => {
            let config = load_config(&config_path, args.planner_url.clone())?;
            let planner = Arc::new(planner_client(&config.planner)?);
            let inputs = Arc::new(args.inputs(&config));
            let (controller, surface) = build_controller(&config, planner, inputs)?;

            let mut events = controller.subscribe();
            let outcome = controller.deploy().await?;
            let state = wait_until_settled(&controller, &mut events, &outcome).await?;

            let painted = matches!(outcome, DeployOutcome::Painting(_));
            if painted {
                export_surface(&surface, &args.output)?;
            }
            report(state, painted, &args.output)?;
        }
        Command::Replay {
            id,
            tool_width,
            output,
            planner_url,
        } => {
            let config = load_config(&config_path, planner_url)?;
            let planner = Arc::new(planner_client(&config.planner)?);
            let inputs = Arc::new(DeployInputs::from_settings(&config.deploy));
            let (controller, surface) = build_controller(&config, planner, inputs)?;

            let mut events = controller.subscribe();
            let tool_width = tool_width.unwrap_or(config.deploy.tool_width);
            let outcome = controller.replay(id, tool_width).await?;
            let state = wait_until_settled(&controller, &mut events, &outcome).await?;

            let painted = matches!(outcome, DeployOutcome::Painting(_));
            if painted {
                export_surface(&surface, &output)?;
            }
            report(state, painted, &output)?;
        }
    }

    Ok(())
}
