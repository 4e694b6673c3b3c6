//! # profile-customizer
//!
//! A Rust library for restyling the banner and profile picture of a social-network
//! profile page from reusable templates, and for exporting the result as an image.
//!
//! ## Features
//!
//! - **Templates**: Built-in banner presets (background, text on a 9-way grid, profile picture)
//! - **Element Location**: Find the banner and profile picture in a page snapshot, with fallbacks
//! - **Rendering**: Merge template, scraped profile data and user overrides, then apply to the page
//!   as a replayable journal of DOM mutations
//! - **Persistence**: Settings and uploaded images in a key-value store (in memory or a JSON file)
//! - **Messaging**: JSON actions (`initialize`, `togglePanel`, `checkStatus`, ...) with parameter schemas
//! - **Imaging**: Avatar/banner upload processing and 1584×396 PNG banner export
//! - **Live Pages**: Snapshot and patch a real page via Chrome DevTools Protocol
//!
//! ## Library Usage
//!
//! ### Customizing a page snapshot
//!
//! ```rust,no_run
//! use profile_customizer::{CustomizerOptions, DomTree, PageSession, Storage};
//!
//! # async fn run() -> profile_customizer::Result<()> {
//! let snapshot = DomTree::from_json(&std::fs::read_to_string("page.json")?)?;
//! let mut session = PageSession::create(
//!     "https://www.linkedin.com/in/ada",
//!     snapshot,
//!     Storage::in_memory(),
//!     CustomizerOptions::default(),
//! )?;
//!
//! session.initialize().await;
//! session.select_template("professional").await?;
//! session.set_text("slogan", "Building analytical engines").await?;
//! session.activate().await;
//!
//! // Everything that changed, ready to replay onto the live page
//! let mutations = session.take_mutations();
//! println!("{} DOM mutations", mutations.len());
//! # Ok(())
//! # }
//! ```
//!
//! ### Using the action system
//!
//! ```rust,no_run
//! # use profile_customizer::{CustomizerOptions, DomTree, PageSession, Storage};
//! use profile_customizer::actions::{ActionContext, ActionRegistry};
//! use serde_json::json;
//!
//! # async fn run(mut session: PageSession) {
//! let registry = ActionRegistry::with_defaults();
//! let mut context = ActionContext::new(&mut session);
//!
//! let response = registry.dispatch(json!({ "action": "togglePanel" }), &mut context).await;
//! assert!(response.success);
//! # }
//! ```
//!
//! ### Live pages
//!
//! ```rust,no_run
//! use profile_customizer::{CustomizerOptions, LaunchOptions, LivePage, Storage};
//!
//! # async fn run() -> profile_customizer::Result<()> {
//! let page = LivePage::launch(&LaunchOptions::default())?;
//! page.navigate("https://www.linkedin.com/in/ada")?;
//!
//! let mut session = page.open_session(Storage::in_memory(), CustomizerOptions::default())?;
//! session.activate().await;
//! page.sync(&mut session)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`template`]: Template model and the built-in catalog
//! - [`dom`]: Page snapshot, CSS selector matching and DOM mutations
//! - [`locator`]: Banner and profile picture location
//! - [`profile`]: Profile data scraped from the page
//! - [`settings`]: User overrides and uploaded images
//! - [`render`]: Merge and apply a customization, and undo it
//! - [`storage`]: Key-value persistence
//! - [`panel`]: Side panel visibility state
//! - [`session`]: One customizer session per profile page
//! - [`actions`]: Message dispatch
//! - [`imaging`]: Data URLs, upload processing and banner export
//! - [`browser`]: Chrome/Chromium bridge
//! - [`config`]: Runtime options
//! - [`error`]: Error types and result aliases

pub mod actions;
pub mod browser;
pub mod config;
pub mod dom;
pub mod error;
pub mod imaging;
pub mod locator;
pub mod panel;
pub mod profile;
pub mod render;
pub mod session;
pub mod settings;
pub mod storage;
pub mod template;

pub use actions::{Action, ActionContext, ActionRegistry, ActionResult};
pub use browser::{ConnectionOptions, LaunchOptions, LivePage};
pub use config::CustomizerOptions;
pub use dom::{DomMutation, DomTree, ElementNode, NodePath};
pub use error::{CustomizerError, Result};
pub use imaging::BannerExporter;
pub use locator::{ElementLocator, Targets};
pub use profile::ProfileData;
pub use render::RenderSpec;
pub use session::{PageSession, SessionStatus};
pub use settings::{CustomizationSettings, ProfileImages};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, Storage};
pub use template::{Template, TemplateCatalog};
