//! Profile customizer command line
//!
//! Works offline against DOM snapshots (JSON as produced by the live bridge)
//! or drives a real page through Chrome/Chromium.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use profile_customizer::actions::{ActionContext, ActionRegistry};
use profile_customizer::imaging::{DataUrl, process_avatar, process_banner};
use profile_customizer::render::merge;
use profile_customizer::{
    BannerExporter, CustomizerOptions, DomTree, ElementLocator, JsonFileStore, LivePage, PageSession, ProfileData,
    Storage, TemplateCatalog,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "profile-customizer")]
#[command(version)]
#[command(about = "Restyle and export profile page banners from templates", long_about = None)]
struct Cli {
    /// JSON options file
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// JSON file holding persisted settings
    #[arg(long, short = 's', value_name = "FILE", global = true, default_value = "profile-customizer.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in templates
    Templates {
        /// Print full template definitions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Locate the banner and profile picture in a snapshot
    Locate {
        /// DOM snapshot (JSON)
        snapshot: PathBuf,
    },

    /// Apply the stored customization to a snapshot
    Render {
        snapshot: PathBuf,

        /// Page URL the snapshot was taken from
        #[arg(long, default_value = "https://www.linkedin.com/in/me")]
        url: String,

        /// Select this template before rendering
        #[arg(long, short = 't')]
        template: Option<String>,

        /// Write the patched snapshot here instead of printing the mutations
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Dispatch a JSON action message against a snapshot
    Message {
        snapshot: PathBuf,

        /// Message, e.g. '{"action": "checkStatus"}'
        message: String,

        #[arg(long, default_value = "https://www.linkedin.com/in/me")]
        url: String,
    },

    /// Process an avatar upload into a square JPEG
    Avatar {
        input: PathBuf,

        /// Write the JPEG here instead of printing a data URL
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Also store it as the custom profile picture
        #[arg(long)]
        save: bool,
    },

    /// Process a banner background upload
    BannerImage {
        input: PathBuf,

        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Also store it as the custom banner background
        #[arg(long)]
        save: bool,
    },

    /// Export the stored customization as a PNG
    Export {
        /// Directory for the timestamped file
        #[arg(long, short = 'd', default_value = ".")]
        dir: PathBuf,

        /// Scrape profile data from this snapshot
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// TrueType font for text elements
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,
    },

    /// Open a profile page in Chrome and apply the stored customization
    Live {
        url: String,

        /// Launch browser in headed mode (default: headless)
        #[arg(long, short = 'H')]
        headed: bool,

        /// Attach to a running browser instead of launching one
        #[arg(long, value_name = "URL")]
        ws_endpoint: Option<String>,

        /// Persistent browser profile directory
        #[arg(long, value_name = "DIR")]
        user_data_dir: Option<PathBuf>,

        /// Seconds to keep the page open after applying
        #[arg(long, default_value = "0")]
        hold: u64,
    },
}

fn load_snapshot(path: &Path) -> anyhow::Result<DomTree> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(DomTree::from_json(&json)?)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let options = match &cli.config {
        Some(path) => CustomizerOptions::load(path)?,
        None => CustomizerOptions::default(),
    };
    let storage = Storage::new(Arc::new(JsonFileStore::new(&cli.store)));

    match cli.command {
        Command::Templates { json } => {
            let catalog = TemplateCatalog::builtin();
            if json {
                print_json(&catalog.all())?;
            } else {
                for template in catalog.all() {
                    println!("{:<14} {}", template.id, template.name);
                }
            }
        }

        Command::Locate { snapshot } => {
            let tree = load_snapshot(&snapshot)?;
            let targets = ElementLocator::new(&options.locator)?.locate(&tree);
            eprintln!("{}", targets.status());
            for path in [targets.banner_path(), targets.profile_picture_path()].into_iter().flatten() {
                if let Some(node) = tree.node(path) {
                    eprintln!("  {} {}", path, node.to_simple_string());
                }
            }
            print_json(&targets)?;
        }

        Command::Render {
            snapshot,
            url,
            template,
            output,
        } => {
            let tree = load_snapshot(&snapshot)?;
            let mut session = PageSession::create(url, tree, storage, options)?;
            if !session.initialize().await {
                bail!("{} is not a profile page", session.url());
            }
            if let Some(template) = template {
                session.select_template(&template).await?;
            }
            session.activate().await;

            match output {
                Some(path) => {
                    std::fs::write(&path, session.tree().to_json()?)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("Wrote {}", path.display());
                }
                None => print_json(&session.take_mutations())?,
            }
        }

        Command::Message { snapshot, message, url } => {
            let tree = load_snapshot(&snapshot)?;
            let message: serde_json::Value = serde_json::from_str(&message).context("Message is not valid JSON")?;
            let mut session = PageSession::create(url, tree, storage, options)?;

            let registry = ActionRegistry::with_defaults();
            let mut context = ActionContext::new(&mut session);
            let response = registry.dispatch(message, &mut context).await;
            print_json(&response)?;
        }

        Command::Avatar { input, output, save } => {
            let bytes = std::fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
            let processed = process_avatar(&bytes, &options.images)?;
            eprintln!("Avatar: {}x{}", processed.width, processed.height);

            if save {
                storage
                    .save_profile_images(profile_customizer::ProfileImages {
                        profile_picture: Some(processed.data_url.clone()),
                        banner_image: None,
                    })
                    .await?;
                let mut settings = storage.custom_settings().await?.unwrap_or_default();
                settings.custom_profile_image = Some(processed.data_url.clone());
                storage.save_custom_settings(&settings).await?;
            }
            write_or_print(&processed.data_url, output.as_deref())?;
        }

        Command::BannerImage { input, output, save } => {
            let bytes = std::fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
            let processed = process_banner(&bytes, &options.images)?;
            eprintln!("Banner image: {}x{}", processed.width, processed.height);

            if save {
                storage
                    .save_profile_images(profile_customizer::ProfileImages {
                        banner_image: Some(processed.data_url.clone()),
                        profile_picture: None,
                    })
                    .await?;
                let mut settings = storage.custom_settings().await?.unwrap_or_default();
                settings.set_background_image(processed.data_url.clone());
                storage.save_custom_settings(&settings).await?;
            }
            write_or_print(&processed.data_url, output.as_deref())?;
        }

        Command::Export { dir, snapshot, font } => {
            let profile = match snapshot {
                Some(path) => ProfileData::scrape(&load_snapshot(&path)?),
                None => ProfileData::default(),
            };
            let mut settings = storage.custom_settings().await?.unwrap_or_default();
            settings.active_template_id = storage.active_template().await?;

            let catalog = TemplateCatalog::builtin();
            let spec = merge(catalog.get_or_default(&settings.active_template_id), &profile, &settings);

            let mut export = options.export.clone();
            if font.is_some() {
                export.font_path = font;
            }
            let path = BannerExporter::new(export)?.save(&spec, &dir)?;
            println!("{}", path.display());
        }

        Command::Live {
            url,
            headed,
            ws_endpoint,
            user_data_dir,
            hold,
        } => {
            let page = match ws_endpoint {
                Some(ws_url) => LivePage::connect(profile_customizer::ConnectionOptions::new(ws_url))?,
                None => {
                    let mut launch = options.browser.clone().headless(options.browser.headless && !headed);
                    if let Some(dir) = user_data_dir {
                        launch = launch.user_data_dir(dir);
                    }
                    LivePage::launch(&launch)?
                }
            };

            page.navigate(&url)?;
            let mut session = page.open_session(storage, options)?;
            if !session.initialize().await {
                bail!("{} is not a profile page", session.url());
            }
            session.activate().await;

            let applied = page.sync(&mut session)?;
            eprintln!("{}", session.targets().status());
            eprintln!("Applied {} DOM mutations", applied);

            if hold > 0 {
                tokio::time::sleep(tokio::time::Duration::from_secs(hold)).await;
            }
        }
    }

    Ok(())
}

/// Write decoded image bytes to `output`, or print the data URL
fn write_or_print(data_url: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let decoded = DataUrl::parse(data_url)?;
            std::fs::write(path, &decoded.data).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", data_url),
    }
    Ok(())
}
