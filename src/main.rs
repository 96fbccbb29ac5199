//! ucfg - format with Uncrustify and edit its config files
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;

use ucfg_app::CommandOutcome;
use ucfg_core::VersionStatus;
use uncrustify_configurator::{App, VersionReport};

/// Format with Uncrustify and edit its configuration files
#[derive(Parser, Debug)]
#[command(name = "ucfg")]
#[command(about = "Uncrustify formatter integration and config editor", long_about = None)]
struct Args {
    /// Workspace root (defaults to the current directory)
    #[arg(long, short, global = true, value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Ask the release feed for the formatter version when no executable reports one
    #[arg(long, global = true)]
    remote: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Format a file (or stdin) and print the result
    Format {
        /// Editor language id (c, cpp, csharp, d, java, objective-c, pawn, vala, apex)
        #[arg(long, short)]
        lang: String,

        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Render the config editor page
    Edit {
        /// Write the page, its script and its stylesheet instead of printing the page
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Create the config file from a release's default config
    Init {
        /// Release to start from (defaults to the installed formatter's version)
        #[arg(long = "version", value_name = "VERSION")]
        release: Option<String>,

        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Merge a JSON object of values into the config file
    Save {
        #[arg(value_name = "JSON")]
        values: String,
    },

    /// Run a command link posted by the editor page
    ApplyUri {
        #[arg(value_name = "URI")]
        uri: String,

        /// Preset name for `savePreset` links
        #[arg(long)]
        preset: Option<String>,
    },

    /// Manage presets
    #[command(subcommand)]
    Preset(PresetCommand),

    /// Compare the config's format version with the installed formatter
    Version,

    /// Rewrite the config file in the installed formatter's format
    Upgrade,
}

#[derive(Subcommand, Debug)]
enum PresetCommand {
    /// Save values (or the file's current values) under a name
    Save {
        name: String,
        #[arg(value_name = "JSON")]
        values: Option<String>,
    },
    /// Merge a preset into the config file
    Load { name: String },
    Delete { name: String },
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let workspace = match args.workspace {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let mut app = App::load(&workspace)?;
    if args.remote {
        app.settings.formatter.remote_version_fallback = true;
    }
    ucfg_core::logging::init(app.settings.debug)?;
    info!("Workspace: {}", workspace.display());

    match args.command {
        Command::Format { lang, file } => {
            let formatted = app.format(&lang, file.as_deref()).await?;
            print!("{}", formatted);
        }
        Command::Edit { out } => match out {
            Some(path) => {
                app.edit_to(&path).await?;
                eprintln!("Wrote editor page to {}", path.display());
            }
            None => println!("{}", app.edit().await?),
        },
        Command::Init { release, force } => {
            let version = app.init(release.as_deref(), force).await?;
            eprintln!(
                "Created {} from the {} defaults",
                app.config_path().display(),
                version
            );
        }
        Command::Save { values } => {
            app.save(&values).await?;
            eprintln!("Saved {}", app.config_path().display());
        }
        Command::ApplyUri { uri, preset } => {
            match app.apply_uri(&uri, preset.as_deref()).await? {
                CommandOutcome::Saved { config_path } => {
                    eprintln!("Saved {}", config_path.display())
                }
                CommandOutcome::PresetSaved { name } => eprintln!("Saved preset {}", name),
                CommandOutcome::Upgraded { config_path } => {
                    eprintln!("Upgraded {}", config_path.display())
                }
            }
        }
        Command::Preset(command) => run_preset(&app, command).await?,
        Command::Version => print_version(&app.version().await?),
        Command::Upgrade => {
            app.upgrade().await?;
            eprintln!("Upgraded {}", app.config_path().display());
        }
    }

    Ok(())
}

async fn run_preset(app: &App, command: PresetCommand) -> Result<()> {
    match command {
        PresetCommand::Save { name, values } => {
            let preset = app.save_preset(&name, values.as_deref()).await?;
            eprintln!("Saved preset {} ({} values)", preset.name, preset.values.len());
        }
        PresetCommand::Load { name } => {
            app.load_preset(&name).await?;
            eprintln!("Applied preset {} to {}", name, app.config_path().display());
        }
        PresetCommand::Delete { name } => {
            app.delete_preset(&name)?;
            eprintln!("Deleted preset {}", name);
        }
        PresetCommand::List => {
            for preset in app.list_presets()? {
                println!(
                    "{}\t{}\t{} values",
                    preset.name,
                    preset.saved_at.format("%Y-%m-%d %H:%M"),
                    preset.values.len()
                );
            }
        }
    }
    Ok(())
}

fn print_version(report: &VersionReport) {
    let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "unknown".to_string());

    println!("config:    {}", report.config_path.display());
    println!("file:      {}", show(&report.file_version));
    println!("installed: {}", show(&report.installed_version));
    match &report.status {
        VersionStatus::Current => println!("status:    up to date"),
        VersionStatus::Outdated { .. } => {
            println!("status:    outdated (run `ucfg upgrade`)")
        }
        VersionStatus::Unknown => println!("status:    unknown"),
    }
}
