use clap::{Parser, Subcommand};
use cropper::config::{self, ConfigError, CropConfig};
use cropper::output;
use cropper::process::{self, ProcessError};
use cropper::scan;
use cropper::state::{self, ShellState};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cropper")]
#[command(version)]
#[command(about = "Random wallpaper crops re-encoded as JPEGs under a byte budget")]
#[command(long_about = "\
Random wallpaper crops re-encoded as JPEGs under a byte budget

Each run takes one source image and writes two files next to each other:

  out/
  ├── beach_crop.jpg     # random 4096x2304 window, upscaled first if needed
  └── beach_logo.jpg     # centered 512x512 square

Both are encoded at the highest JPEG quality that stays under 1,000,000 bytes.
Existing files are never overwritten: a second run writes beach_crop_1.jpg.

Folders, the selected file and the delete flag are remembered between runs,
so after the first invocation `cropper random` alone is enough.

Run 'cropper gen-config' to generate a documented config.toml.")]
struct Cli {
    /// Config file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where remembered folders and flags are stored
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crop a random image from the input folder
    Random(RandomArgs),
    /// Crop one selected file
    File(FileArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct RandomArgs {
    /// Folder to pick a source image from
    #[arg(long)]
    input: Option<PathBuf>,

    /// Folder the crops are written to
    #[arg(long)]
    output: Option<PathBuf>,

    /// Delete the source image after a successful run
    #[arg(long, conflicts_with = "keep_source")]
    delete_source: bool,

    /// Keep the source image (overrides a remembered --delete-source)
    #[arg(long)]
    keep_source: bool,

    /// Skip the square logo
    #[arg(long)]
    no_logo: bool,
}

#[derive(clap::Args)]
struct FileArgs {
    /// Image to crop
    path: Option<PathBuf>,

    /// Folder the crops are written to
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip the square logo
    #[arg(long)]
    no_logo: bool,
}

/// Failures detected before the pipeline runs, plus the pipeline's own.
#[derive(Error, Debug)]
enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("No {0} given and none remembered from a previous run")]
    Missing(&'static str),
    #[error("Not a folder: {0}")]
    NotADirectory(PathBuf),
    #[error(transparent)]
    Process(#[from] ProcessError),
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cropper=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Process(e)) => {
            output::print_error(&e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let state_path = cli.state_file.clone().or_else(state::default_state_path);
    let mut shell_state = state_path
        .as_deref()
        .map(ShellState::load_or_default)
        .unwrap_or_default();

    match cli.command {
        Command::Random(args) => {
            let plan = plan_random(&args, &shell_state)?;
            plan.remember(&mut shell_state);
            save_state(&shell_state, state_path.as_deref());

            let config = effective_config(cli.config.as_deref(), args.no_logo)?;
            let report = process::process_random(
                &plan.input,
                &plan.output_dir,
                &config,
                &mut rand::thread_rng(),
            )?;
            output::print_run_report(&report);

            if plan.delete_after {
                let result = std::fs::remove_file(&report.source);
                if let Err(ref e) = result {
                    tracing::warn!(source = %report.source.display(), error = %e, "delete failed");
                }
                println!("{}", output::format_delete_result(&report.source, &result));
            }
        }
        Command::File(args) => {
            let plan = plan_file(&args, &shell_state)?;
            plan.remember(&mut shell_state);
            save_state(&shell_state, state_path.as_deref());

            let config = effective_config(cli.config.as_deref(), args.no_logo)?;
            let report = process::process_selected(
                &plan.file,
                &plan.output_dir,
                &config,
                &mut rand::thread_rng(),
            )?;
            output::print_run_report(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Effective inputs of a `random` run. Only built from paths that exist.
#[derive(Debug, PartialEq)]
struct RandomPlan {
    input: PathBuf,
    output_dir: PathBuf,
    delete_after: bool,
}

impl RandomPlan {
    fn remember(&self, state: &mut ShellState) {
        state.input_dir = Some(self.input.clone());
        state.output_dir = Some(self.output_dir.clone());
        state.delete_after = self.delete_after;
    }
}

fn plan_random(args: &RandomArgs, state: &ShellState) -> Result<RandomPlan, CliError> {
    let input = args
        .input
        .clone()
        .or_else(|| state.input_dir.clone())
        .ok_or(CliError::Missing("input folder"))?;
    let output_dir = args
        .output
        .clone()
        .or_else(|| state.output_dir.clone())
        .ok_or(CliError::Missing("output folder"))?;
    let delete_after = if args.delete_source {
        true
    } else if args.keep_source {
        false
    } else {
        state.delete_after
    };

    require_dir(&input)?;
    require_dir(&output_dir)?;
    Ok(RandomPlan {
        input,
        output_dir,
        delete_after,
    })
}

/// Effective inputs of a `file` run. Only built from paths that exist.
#[derive(Debug, PartialEq)]
struct FilePlan {
    file: PathBuf,
    output_dir: PathBuf,
}

impl FilePlan {
    fn remember(&self, state: &mut ShellState) {
        state.single_file = Some(self.file.clone());
        state.single_output_dir = Some(self.output_dir.clone());
    }
}

fn plan_file(args: &FileArgs, state: &ShellState) -> Result<FilePlan, CliError> {
    let file = args
        .path
        .clone()
        .or_else(|| state.single_file.clone())
        .ok_or(CliError::Missing("image file"))?;
    let output_dir = args
        .output
        .clone()
        .or_else(|| state.single_output().map(Path::to_path_buf))
        .ok_or(CliError::Missing("output folder"))?;

    scan::validate_selected_file(&file).map_err(ProcessError::from)?;
    require_dir(&output_dir)?;
    Ok(FilePlan { file, output_dir })
}

fn effective_config(path: Option<&Path>, no_logo: bool) -> Result<CropConfig, ConfigError> {
    let mut config = config::load_config(path)?;
    if no_logo {
        config.logo.enabled = false;
    }
    Ok(config)
}

fn require_dir(path: &Path) -> Result<(), CliError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CliError::NotADirectory(path.to_path_buf()))
    }
}

/// Persist the state file. Failures are logged, never fatal.
fn save_state(state: &ShellState, path: Option<&Path>) {
    let Some(path) = path else {
        tracing::warn!("no home directory, remembered state will not be saved");
        return;
    };
    if let Err(e) = state.save(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not save state");
    }
}
