//! `noir`: command-line front end for the Neo-Tokyo Noir studio.
//!
//! Reads the API key from the `OPENROUTER_KEY` environment variable. The
//! `features`, `schema`, `prompt`, and `matrix` commands work offline.
//!
//! # Examples
//!
//! ```sh
//! noir features
//! noir prompt character-profile -i name="Rei Kisaragi" -i concept="ex-cop"
//! noir generate mission-brief -i client="Ghost Lotus" -i objective="steal a prototype" --export out/
//! noir image -i prompt="a rain-soaked alley, one red umbrella" --out alley.png
//! noir batch characters --export out/
//! noir chat
//! ```

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use noir_studio::matrix::prompt_matrix;
use noir_studio::prelude::*;
use noir_studio::prompt::{compile, compile_art_prompt, compile_guide_turn, compile_image};
use noir_studio::render::to_text;
use noir_studio::schema::registry;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Generative content studio for the Neo-Tokyo Noir setting.
#[derive(Parser)]
#[command(name = "noir", version)]
struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the text model from the config.
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every feature with its mode and inputs.
    Features,
    /// Print the JSON schema of a structured feature's Result Type.
    Schema { feature: Feature },
    /// Print the compiled prompt for a feature without calling the model.
    Prompt {
        feature: Feature,
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Run a structured feature.
    Generate {
        feature: Feature,
        #[command(flatten)]
        inputs: InputArgs,
        /// Print the raw result as JSON instead of text.
        #[arg(long)]
        json: bool,
        /// Write the export file into this directory.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Turn a transformation and a mood into an image prompt.
    ArtPrompt {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Render one image from a prompt.
    Image {
        #[command(flatten)]
        inputs: InputArgs,
        /// Where to write the image bytes.
        #[arg(long)]
        out: PathBuf,
    },
    /// Generate the fixed cast, district, or scene list.
    Batch {
        kind: BatchKind,
        /// Write the combined export into this directory.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Print every cast member in every district as an image prompt.
    Matrix {
        /// Write the Markdown table into this directory.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Talk to Kage, the city guide. One message per line; EOF ends.
    Chat,
}

#[derive(clap::Args)]
struct InputArgs {
    /// Feature input as `name=value`. Repeatable.
    #[arg(short = 'i', long = "input", value_parser = Inputs::parse_pair)]
    pairs: Vec<(String, String)>,
}

impl InputArgs {
    fn into_inputs(self) -> Inputs {
        self.pairs.into_iter().collect()
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BatchKind {
    Characters,
    Locations,
    Scenes,
}

impl BatchKind {
    fn feature(self) -> Feature {
        match self {
            BatchKind::Characters => Feature::CharacterBatch,
            BatchKind::Locations => Feature::LocationBatch,
            BatchKind::Scenes => Feature::SceneMatrix,
        }
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Features => {
            print_features();
            Ok(())
        }
        Command::Schema { feature } => {
            let descriptor = registry::descriptor(feature)
                .ok_or_else(|| format!("{feature} has no Result Type"))?;
            let schema = serde_json::to_string_pretty(&descriptor.json_schema())
                .map_err(|e| e.to_string())?;
            println!("{schema}");
            Ok(())
        }
        Command::Prompt { feature, inputs } => {
            let inputs = inputs.into_inputs();
            println!("{}", offline_prompt(feature, &inputs)?);
            Ok(())
        }
        Command::Generate {
            feature,
            inputs,
            json,
            export: dir,
        } => {
            let studio = open_studio(cli.config.as_deref(), cli.model)?;
            let result = studio
                .generate(feature, &inputs.into_inputs())
                .await
                .map_err(|e| e.user_message())?;
            if json {
                let text =
                    serde_json::to_string_pretty(&result.data()).map_err(|e| e.to_string())?;
                println!("{text}");
            } else {
                print!("{}", to_text(&result));
            }
            if let Some(dir) = dir {
                write_export(&dir, &export(&result))?;
            }
            Ok(())
        }
        Command::ArtPrompt { inputs } => {
            let studio = open_studio(cli.config.as_deref(), cli.model)?;
            let prompt = studio
                .art_prompt(&inputs.into_inputs())
                .await
                .map_err(|e| e.user_message())?;
            println!("{prompt}");
            Ok(())
        }
        Command::Image { inputs, out } => {
            let studio = open_studio(cli.config.as_deref(), cli.model)?;
            let image = studio
                .image(&inputs.into_inputs())
                .await
                .map_err(|e| e.user_message())?;
            std::fs::write(&out, &image.bytes)
                .map_err(|e| format!("writing {}: {e}", out.display()))?;
            eprintln!("Wrote {} ({} bytes)", out.display(), image.bytes.len());
            Ok(())
        }
        Command::Batch { kind, export: dir } => {
            let studio = open_studio(cli.config.as_deref(), cli.model)?;
            run_batch(&studio, kind.feature(), dir.as_deref()).await
        }
        Command::Matrix { export: dir } => {
            let entries = prompt_matrix();
            for entry in &entries {
                println!("{} @ {}\n  {}\n", entry.character, entry.location, entry.prompt);
            }
            if let Some(dir) = dir {
                write_export(&dir, &export_matrix(&entries))?;
            }
            Ok(())
        }
        Command::Chat => {
            let studio = open_studio(cli.config.as_deref(), cli.model)?;
            chat_loop(&studio).await
        }
    }
}

fn open_studio(config: Option<&Path>, model: Option<String>) -> Result<Studio, String> {
    let mut config = StudioConfig::load_or_default(config).map_err(|e| e.user_message())?;
    if let Some(model) = model {
        config = config.with_model(model);
    }
    let api_key = api_key_from_env().map_err(|e| e.user_message())?;
    let client = OpenRouterClient::from_config(api_key, &config).map_err(|e| e.user_message())?;
    Ok(Studio::new(CompletionClient::new(client)))
}

fn print_features() {
    for feature in Feature::ALL {
        println!("{:<24} {:<10} {}", feature.id(), mode_label(feature.mode()), feature.title());
        for input in feature.inputs() {
            let req = if input.required { "required" } else { "optional" };
            println!("    {:<12} {req:<8}  e.g. {}", input.name, input.placeholder);
        }
    }
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Structured => "structured",
        Mode::Freeform => "freeform",
        Mode::Image => "image",
        Mode::Local => "local",
        Mode::Batch => "batch",
    }
}

fn offline_prompt(feature: Feature, inputs: &Inputs) -> Result<String, String> {
    inputs.validate(feature).map_err(|e| e.user_message())?;
    match feature.mode() {
        Mode::Structured => Ok(compile(feature, inputs)),
        Mode::Image => Ok(compile_image(inputs)),
        Mode::Freeform if feature == Feature::ArtPrompt => Ok(compile_art_prompt(inputs)),
        Mode::Freeform => {
            let message = inputs.get("message").unwrap_or_default();
            Ok(compile_guide_turn(&Transcript::new(), message))
        }
        Mode::Local | Mode::Batch => Err(format!(
            "{} has no single prompt; it runs over a fixed list",
            feature.title()
        )),
    }
}

async fn run_batch(studio: &Studio, feature: Feature, dir: Option<&Path>) -> Result<(), String> {
    let observer = CompositeObserver::new()
        .with(LoggingObserver)
        .with(FnObserver::new(|event: &BatchEvent<'_>| {
            if let BatchEvent::Progress {
                subject,
                completed,
                total,
                ..
            } = event
            {
                eprintln!("[{completed}/{total}] {subject}");
            }
        }));
    let outcome = studio
        .run_batch(feature, &observer)
        .await
        .map_err(|e| e.user_message())?;

    for result in &outcome.results {
        println!("{}", to_text(result));
    }
    // Partial results are still exported before reporting the failure.
    if let Some(dir) = dir
        && !outcome.results.is_empty()
    {
        write_export(dir, &export_batch(feature, &outcome.results))?;
    }
    match outcome.error() {
        Some(err) => Err(err.user_message()),
        None => Ok(()),
    }
}

async fn chat_loop(studio: &Studio) -> Result<(), String> {
    let mut transcript = Transcript::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("Kage is listening. Ctrl-D to leave.");
    while let Some(line) = lines.next_line().await.map_err(|e| e.to_string())? {
        if line.trim().is_empty() {
            continue;
        }
        match studio.guide_reply(&mut transcript, &line).await {
            Ok(reply) => println!("{}: {reply}\n", Speaker::Ai.label()),
            Err(e) => eprintln!("Error: {}", e.user_message()),
        }
    }
    Ok(())
}

fn write_export(dir: &Path, file: &ExportFile) -> Result<(), String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("creating {}: {e}", dir.display()))?;
    let path = dir.join(&file.filename);
    std::fs::write(&path, &file.content).map_err(|e| format!("writing {}: {e}", path.display()))?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}
