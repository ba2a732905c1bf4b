use cardstock::{caption, config, output, pipeline};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "cardstock")]
#[command(about = "Composite a photograph into a bordered, captioned postcard")]
#[command(long_about = "\
Composite a photograph into a bordered, captioned postcard

The photo is center-cropped to the postcard's aspect ratio, wrapped in a
border, optionally grounded with a bottom-edge gradient shadow, and captioned
with auto-fit or fixed-size text. Wide-gamut/HDR sources are tone-mapped to
sRGB through an external color-management tool first.

Everything the postcard looks like — physical size, border, shadow, caption
text and styling, fonts — lives in postcard.toml. Run 'cardstock gen-config'
to generate a documented one.")]
#[command(version = version_string())]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "postcard.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose a postcard from a photo
    Build {
        /// Source photo (overrides `input` from the config)
        input: Option<PathBuf>,
        /// Destination file (overrides `output.path` from the config)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Skip the external tone-mapping step
        #[arg(long)]
        no_tonemap: bool,
    },
    /// Validate the config, input, and font chain without writing anything
    Check {
        /// Source photo (overrides `input` from the config)
        input: Option<PathBuf>,
    },
    /// Print a stock postcard.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { input, output, no_tonemap } => {
            let mut config = config::PostcardConfig::load(&cli.config)?;
            if let Some(path) = output {
                config.output.path = path;
            }
            let input = resolve_input(input, &config)?;
            let summary = pipeline::run(&config, &input, no_tonemap)?;
            output::print_run_summary(&summary);
        }
        Command::Check { input } => {
            let config = config::PostcardConfig::load(&cli.config)?;
            println!("==> Config valid: {}", cli.config.display());

            let input = resolve_input(input, &config)?;
            if !input.exists() {
                return Err(format!("input image not found: {}", input.display()).into());
            }
            println!("==> Input found: {}", input.display());

            if config.caption.lines.is_empty() {
                println!("==> No caption configured");
            } else {
                let resolved = caption::resolve(&config.caption.fonts)?;
                println!("==> Caption font: {}", resolved.path.display());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Pick the source photo: CLI positional first, then the config's `input`.
fn resolve_input(
    cli_input: Option<PathBuf>,
    config: &config::PostcardConfig,
) -> Result<PathBuf, String> {
    cli_input
        .or_else(|| config.input.clone())
        .ok_or_else(|| "no input image: pass one as an argument or set `input` in the config".into())
}
