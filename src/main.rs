mod camera;
mod config;
mod error;
mod i18n;
mod image_processing;
mod models;
mod services;

use clap::{Parser, Subcommand};
use config::StudioConfig;
use error::{AppError, ValidationError};
use gemini_client::{ApiKeyStore, CredentialGate, GateError, GeminiService, StoreGate};
use models::{AdjustmentChange, BodyPartCategory, Fabric, Fit, GenerationResult, ModelPhoto};
use services::{LookStudio, StudioFailure};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "stylesync", version, about = "Virtual try-on studio")]
struct Cli {
    /// Configuration file (default: ./stylesync.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a look from a model photo and garment photos
    Look(LookArgs),
    /// Identify a garment and put it on a person in one step
    Lightning(LightningArgs),
    /// List the body parts a garment can be placed on
    Parts,
    /// Print the effective configuration
    Config,
}

#[derive(Parser, Debug)]
struct LookArgs {
    /// Photo of the person
    #[arg(long)]
    model: PathBuf,

    /// Garment photo for a body part, e.g. `Chest=shirt.jpg`
    #[arg(long = "garment", value_parser = parse_garment, required = true)]
    garments: Vec<(BodyPartCategory, PathBuf)>,

    /// Fit for a body part, e.g. `Chest=Regular`
    #[arg(long = "fit", value_parser = parse_fit)]
    fits: Vec<(BodyPartCategory, Fit)>,

    /// Fabric for a body part, e.g. `Legs=Denim`
    #[arg(long = "fabric", value_parser = parse_fabric)]
    fabrics: Vec<(BodyPartCategory, Fabric)>,

    /// Styling notes for a body part, e.g. `Chest=sleeves rolled up`
    #[arg(long = "notes", value_parser = parse_notes)]
    notes: Vec<(BodyPartCategory, String)>,

    /// Also render a runway video of the result
    #[arg(long, default_value_t = false)]
    video: bool,

    /// Output directory
    #[arg(long, default_value = "output")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct LightningArgs {
    /// Photo of the person (front camera shot)
    #[arg(long)]
    person: PathBuf,

    /// Photo of the garment (rear camera shot)
    #[arg(long)]
    garment: PathBuf,

    /// Also render a runway video of the result
    #[arg(long, default_value_t = false)]
    video: bool,

    /// Output directory
    #[arg(long, default_value = "output")]
    out: PathBuf,
}

fn split_assignment(s: &str) -> Result<(BodyPartCategory, &str), String> {
    let (category, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <BodyPart>=<value>, got '{}'", s))?;
    let category = BodyPartCategory::parse(category).ok_or_else(|| {
        ValidationError::Unknown {
            kind: "body part",
            value: category.to_string(),
        }
        .to_string()
    })?;
    Ok((category, value))
}

fn parse_garment(s: &str) -> Result<(BodyPartCategory, PathBuf), String> {
    let (category, path) = split_assignment(s)?;
    Ok((category, PathBuf::from(path)))
}

fn parse_fit(s: &str) -> Result<(BodyPartCategory, Fit), String> {
    let (category, value) = split_assignment(s)?;
    let fit = Fit::parse(value).ok_or_else(|| {
        ValidationError::Unknown {
            kind: "fit",
            value: value.to_string(),
        }
        .to_string()
    })?;
    Ok((category, fit))
}

fn parse_fabric(s: &str) -> Result<(BodyPartCategory, Fabric), String> {
    let (category, value) = split_assignment(s)?;
    let fabric = Fabric::parse(value).ok_or_else(|| {
        ValidationError::Unknown {
            kind: "fabric",
            value: value.to_string(),
        }
        .to_string()
    })?;
    Ok((category, fabric))
}

fn parse_notes(s: &str) -> Result<(BodyPartCategory, String), String> {
    let (category, value) = split_assignment(s)?;
    Ok((category, value.to_string()))
}

/// Terminal stand-in for the key selection dialog
fn prompt_for_key() -> Result<String, GateError> {
    let mut stderr = std::io::stderr();
    write!(stderr, "Gemini API key: ")
        .and_then(|_| stderr.flush())
        .map_err(|e| GateError::Unavailable(e.to_string()))?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| GateError::Unavailable(e.to_string()))?;
    Ok(line)
}

struct App {
    studio: LookStudio,
    gate: Arc<StoreGate>,
}

impl App {
    fn new(config: &StudioConfig) -> Result<Self, AppError> {
        let store = ApiKeyStore::new(config.api_key.clone());
        let backend = Arc::new(GeminiService::new(config.gemini_config(), store.clone())?);
        let gate = Arc::new(StoreGate::new(store, prompt_for_key));
        let studio = LookStudio::new(backend, gate.clone(), config);
        Ok(Self { studio, gate })
    }

    /// Image calls need a key too; ask up front instead of failing the first request
    async fn ensure_key(&self) {
        if !self.gate.has_credential().await {
            if let Err(e) = self.gate.prompt_for_credential().await {
                log::warn!("No API key selected: {}", e);
            }
        }
    }

    async fn render_video(&mut self, out: &Path) -> Result<(), StudioFailure> {
        let video = self
            .studio
            .generate_video(|message| eprintln!("  {}", message))
            .await?;
        let path = image_processing::write_output(
            out,
            "video",
            chrono::Utc::now(),
            &video.bytes,
            &video.mime_type,
        )?;
        println!("{}", path.display());
        Ok(())
    }
}

fn write_composite(out: &Path, result: &GenerationResult) -> Result<(), StudioFailure> {
    let path = image_processing::write_output(
        out,
        "look",
        result.generated_at,
        &result.image.bytes,
        &result.image.mime_type,
    )?;
    println!("{}", path.display());
    Ok(())
}

async fn cmd_look(config: &StudioConfig, args: LookArgs) -> Result<(), StudioFailure> {
    let mut app = App::new(config)?;

    let model = image_processing::read_image_file(&args.model)?;
    app.studio
        .set_model_photo(ModelPhoto::new(model, Some(args.model.clone())));

    for (category, path) in &args.garments {
        let image = image_processing::read_image_file(path)?;
        app.studio.upload_garment(*category, image).await?;
    }
    for (category, fit) in args.fits {
        app.studio
            .adjust(category, AdjustmentChange::Fit(Some(fit)))?;
    }
    for (category, fabric) in args.fabrics {
        app.studio
            .adjust(category, AdjustmentChange::Fabric(Some(fabric)))?;
    }
    for (category, notes) in args.notes {
        app.studio
            .adjust(category, AdjustmentChange::Notes(Some(notes)))?;
    }

    // a look that cannot run reports its own error without asking for a key
    if app.studio.session().can_generate_look() {
        app.ensure_key().await;
    }
    eprintln!("Generating look...");
    let result = app.studio.generate_look().await?;
    write_composite(&args.out, &result)?;

    if args.video {
        app.render_video(&args.out).await?;
    }
    Ok(())
}

async fn cmd_lightning(config: &StudioConfig, args: LightningArgs) -> Result<(), StudioFailure> {
    let mut app = App::new(config)?;
    let mut camera = camera::file_camera(args.person, args.garment)?;

    app.ensure_key().await;
    eprintln!("Identifying garment and generating look...");
    let look = app.studio.run_lightning(&mut camera).await?;
    eprintln!(
        "Identified {} ({})",
        look.identification.product_name,
        look.identification.body_part.label()
    );
    write_composite(&args.out, &look.composite)?;

    if args.video {
        app.render_video(&args.out).await?;
    }
    Ok(())
}

fn body_part_table() -> String {
    BodyPartCategory::ALL
        .iter()
        .map(|c| format!("{:<10} {:<18} {}\n", c.as_str(), c.label(), c.description()))
        .collect()
}

fn cmd_config(config: &StudioConfig) -> Result<(), StudioFailure> {
    let text = config
        .redacted()
        .to_toml()
        .map_err(|e| AppError::Config(e.to_string()))?;
    print!("{}", text);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let outcome = match StudioConfig::load(cli.config.as_deref()) {
        Ok(config) => match cli.cmd {
            Command::Look(args) => cmd_look(&config, args).await,
            Command::Lightning(args) => cmd_lightning(&config, args).await,
            Command::Parts => {
                print!("{}", body_part_table());
                Ok(())
            }
            Command::Config => cmd_config(&config),
        },
        Err(e) => Err(e.into()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            log::debug!("{:?}", failure.error);
            eprintln!("{}", failure.message);
            ExitCode::FAILURE
        }
    }
}
