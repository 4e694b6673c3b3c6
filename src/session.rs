//! One customizer session bound to one profile page.
//!
//! A `PageSession` owns everything that used to live in page-global state:
//! the page snapshot, located targets, scraped profile, current settings, the
//! style backup and the panel. Navigating away tears it down and starts over.
//!
//! Edits are optimistic: in-memory settings change and the page is re-rendered
//! first, then the settings are persisted. A failed write is logged and
//! returned, and the in-memory state is kept.

use crate::config::CustomizerOptions;
use crate::dom::{DomMutation, DomTree};
use crate::error::Result;
use crate::imaging::{BannerExporter, process_avatar, process_banner};
use crate::locator::{ElementLocator, Targets};
use crate::panel::{Panel, PanelEvent, PanelState, PanelTab};
use crate::profile::ProfileData;
use crate::render::{self, RenderSpec, StyleBackup};
use crate::settings::{CustomizationSettings, ProfileImages, TextOverride};
use crate::storage::Storage;
use crate::template::TemplateCatalog;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Snapshot of session flags, as reported to the popup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// The page is a profile page
    pub active: bool,
    pub initialized: bool,
    pub panel_visible: bool,
    pub is_active: bool,
    pub panel_state: PanelState,
    pub panel_tab: PanelTab,
    pub banner_found: bool,
    pub profile_picture_found: bool,
    pub message: String,
}

pub struct PageSession {
    url: String,
    options: CustomizerOptions,
    catalog: TemplateCatalog,
    storage: Storage,
    locator: ElementLocator,
    tree: DomTree,
    targets: Targets,
    profile: ProfileData,
    settings: CustomizationSettings,
    backup: StyleBackup,
    panel: Panel,
    initialized: bool,
    active: bool,
    pending: Vec<DomMutation>,
}

impl std::fmt::Debug for PageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSession")
            .field("url", &self.url)
            .field("initialized", &self.initialized)
            .field("active", &self.active)
            .field("panel", &self.panel)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

impl PageSession {
    /// Bind a session to a page snapshot. Nothing is located or rendered yet.
    pub fn create(
        url: impl Into<String>,
        snapshot: DomTree,
        storage: Storage,
        options: CustomizerOptions,
    ) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            locator: ElementLocator::new(&options.locator)?,
            catalog: TemplateCatalog::builtin(),
            options,
            storage,
            tree: snapshot,
            targets: Targets::default(),
            profile: ProfileData::default(),
            settings: CustomizationSettings::default(),
            backup: StyleBackup::new(),
            panel: Panel::new(),
            initialized: false,
            active: false,
            pending: Vec::new(),
        })
    }

    /// Builder method: use a custom template catalog
    pub fn with_catalog(mut self, catalog: TemplateCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_profile_page(&self) -> bool {
        self.options.is_profile_url(&self.url)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    pub fn profile(&self) -> &ProfileData {
        &self.profile
    }

    pub fn settings(&self) -> &CustomizationSettings {
        &self.settings
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Locate targets, scrape the profile, load settings and render hidden.
    ///
    /// Returns `false` without doing anything on non-profile pages.
    pub async fn initialize(&mut self) -> bool {
        if !self.is_profile_page() {
            log::debug!("{} is not a profile page", self.url);
            return false;
        }
        if self.initialized {
            return true;
        }

        log::info!("Initializing customizer for {}", self.url);
        self.targets = self.locator.locate(&self.tree);
        self.profile = ProfileData::scrape(&self.tree);

        if let Err(e) = self.load_settings().await {
            log::warn!("Using default settings: {}", e);
        }

        self.initialized = true;
        self.render();
        log::info!("{}", self.targets.status());
        true
    }

    /// Show the panel and the customization
    pub async fn activate(&mut self) {
        if !self.initialized && !self.initialize().await {
            return;
        }
        self.active = true;
        self.panel.handle(PanelEvent::Show);
        self.show_customization(true);
    }

    /// Hide the panel and the customization
    pub fn deactivate(&mut self) {
        if !self.initialized {
            return;
        }
        self.active = false;
        self.panel.handle(PanelEvent::Deactivate);
        self.show_customization(false);
    }

    /// Activate on first use, otherwise flip the panel. Returns panel visibility.
    pub async fn toggle_panel(&mut self) -> bool {
        if !self.active {
            self.activate().await;
        } else if let Some(change) = self.panel.handle(PanelEvent::Toggle) {
            if change.visible {
                self.show_customization(true);
            }
        }
        self.panel.is_visible()
    }

    /// Force the panel shown or hidden
    pub async fn set_panel_visibility(&mut self, visible: bool) {
        if !self.initialized && !self.initialize().await {
            return;
        }
        if visible {
            self.panel.handle(PanelEvent::Show);
            self.show_customization(true);
        } else {
            self.panel.handle(PanelEvent::Hide);
        }
    }

    /// Forward a panel event (collapse, tab selection, ...)
    pub fn panel_event(&mut self, event: PanelEvent) {
        if let Some(change) = self.panel.handle(event) {
            log::debug!("Panel visible: {}", change.visible);
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            active: self.is_profile_page(),
            initialized: self.initialized,
            panel_visible: self.panel.is_visible(),
            is_active: self.active,
            panel_state: self.panel.state(),
            panel_tab: self.panel.tab(),
            banner_found: self.targets.banner.is_some(),
            profile_picture_found: self.targets.profile_picture.is_some(),
            message: self.targets.status(),
        }
    }

    /// Take the customization off the page and reset all session state
    pub fn teardown(&mut self) {
        if self.initialized {
            let restored = render::restore(&mut self.tree, &self.targets, &mut self.backup);
            self.pending.extend(restored);
        }
        self.targets = Targets::default();
        self.profile = ProfileData::default();
        self.backup = StyleBackup::new();
        self.panel.handle(PanelEvent::Navigated);
        self.initialized = false;
        self.active = false;
    }

    /// Follow the host page to a new URL; UI state is discarded
    pub async fn navigate(&mut self, url: impl Into<String>, snapshot: DomTree) -> bool {
        self.teardown();
        self.pending.clear();
        self.url = url.into();
        self.tree = snapshot;
        log::info!("Profile page changed to {}, reinitializing", self.url);
        self.initialize().await
    }

    /// Reload settings from storage. The `activeTemplate` key decides the template.
    pub async fn load_settings(&mut self) -> Result<()> {
        let stored = self.storage.custom_settings().await?;
        let active = self.storage.active_template().await?;
        let images = self.storage.profile_images().await?;

        let mut settings = stored.unwrap_or_default();
        settings.active_template_id = active;
        if settings.custom_profile_image.is_none() {
            settings.custom_profile_image = images.profile_picture;
        }
        self.settings = settings;
        Ok(())
    }

    /// Resolved spec for the current settings
    pub fn render_spec(&self) -> RenderSpec {
        let template = self.catalog.get_or_default(&self.settings.active_template_id);
        render::merge(template, &self.profile, &self.settings)
    }

    /// Re-render onto the snapshot and return the mutations this produced
    pub fn render(&mut self) -> Vec<DomMutation> {
        let spec = self.render_spec();
        let mut journal = render::apply(&mut self.tree, &self.targets, &spec, &mut self.backup);
        journal.extend(render::set_overlay_visibility(&mut self.tree, &self.targets, self.active));
        self.pending.extend(journal.iter().cloned());
        journal
    }

    /// Drain mutations not yet replayed onto a live page
    pub fn take_mutations(&mut self) -> Vec<DomMutation> {
        std::mem::take(&mut self.pending)
    }

    fn show_customization(&mut self, visible: bool) {
        let journal = render::set_overlay_visibility(&mut self.tree, &self.targets, visible);
        self.pending.extend(journal);
    }

    async fn persist_settings(&self) -> Result<()> {
        self.storage
            .save_custom_settings(&self.settings)
            .await
            .inspect_err(|e| log::error!("Failed to save settings: {}", e))
    }

    pub async fn select_template(&mut self, template_id: &str) -> Result<()> {
        self.catalog.require(template_id)?;
        self.settings.active_template_id = template_id.to_string();
        self.render();

        self.storage
            .save_active_template(template_id)
            .await
            .inspect_err(|e| log::error!("Failed to save active template: {}", e))?;
        self.persist_settings().await
    }

    pub async fn set_text(&mut self, element_id: &str, content: &str) -> Result<()> {
        self.settings.set_text_content(element_id, content);
        self.render();
        self.persist_settings().await
    }

    pub async fn set_text_style(&mut self, element_id: &str, style: TextOverride) -> Result<()> {
        self.settings.merge_text_override(element_id, style);
        self.render();
        self.persist_settings().await
    }

    pub async fn set_background_color(&mut self, color: &str) -> Result<()> {
        self.settings.set_background_color(color);
        self.render();
        self.persist_settings().await
    }

    pub async fn set_profile_border_color(&mut self, color: &str) -> Result<()> {
        self.settings.set_profile_border_color(color);
        self.render();
        self.persist_settings().await
    }

    pub async fn set_profile_border_width(&mut self, width: u32) -> Result<()> {
        self.settings.profile_border_width = Some(width);
        self.render();
        self.persist_settings().await
    }

    /// Resize an uploaded banner image and use it as the background
    pub async fn upload_banner_image(&mut self, bytes: &[u8]) -> Result<()> {
        let processed = process_banner(bytes, &self.options.images)
            .inspect_err(|e| log::error!("Banner upload abandoned: {}", e))?;

        self.settings.set_background_image(processed.data_url.clone());
        self.render();

        self.storage
            .save_profile_images(ProfileImages {
                banner_image: Some(processed.data_url),
                profile_picture: None,
            })
            .await
            .inspect_err(|e| log::error!("Failed to save banner image: {}", e))?;
        self.persist_settings().await
    }

    /// Resize an uploaded avatar and use it as the profile picture
    pub async fn upload_profile_image(&mut self, bytes: &[u8]) -> Result<()> {
        let processed = process_avatar(bytes, &self.options.images)
            .inspect_err(|e| log::error!("Avatar upload abandoned: {}", e))?;

        self.settings.custom_profile_image = Some(processed.data_url.clone());
        self.render();

        self.storage
            .save_profile_images(ProfileImages {
                profile_picture: Some(processed.data_url),
                banner_image: None,
            })
            .await
            .inspect_err(|e| log::error!("Failed to save profile image: {}", e))?;
        self.persist_settings().await
    }

    /// Drop every override and uploaded image but keep the selected template
    pub async fn reset_customization(&mut self) -> Result<()> {
        self.settings = CustomizationSettings::new(self.settings.active_template_id.clone());
        self.render();

        self.storage
            .clear_profile_images()
            .await
            .inspect_err(|e| log::error!("Failed to clear profile images: {}", e))?;
        self.persist_settings().await
    }

    /// Paint the current customization into a timestamped PNG under `dir`
    pub fn export_banner(&self, dir: &Path) -> Result<PathBuf> {
        BannerExporter::new(self.options.export.clone())?
            .save(&self.render_spec(), dir)
            .inspect_err(|e| log::error!("Banner export failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementNode, NodePath};
    use crate::error::CustomizerError;
    use crate::render::OVERLAY_ID;
    use crate::storage::KeyValueStore;
    use serde_json::{Map, Value};
    use std::sync::Arc;

    /// Reads as empty and rejects every write
    struct FailingStore;

    #[async_trait::async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _keys: Option<&[String]>) -> Result<Map<String, Value>> {
            Ok(Map::new())
        }

        async fn set(&self, _items: Map<String, Value>) -> Result<()> {
            Err(CustomizerError::StorageFailed("quota exceeded".to_string()))
        }

        async fn clear(&self) -> Result<()> {
            Err(CustomizerError::StorageFailed("quota exceeded".to_string()))
        }
    }

    const URL: &str = "https://www.linkedin.com/in/ada";

    fn page() -> DomTree {
        DomTree::new(ElementNode::new("html").with_children(vec![ElementNode::new("body").with_children(vec![
            ElementNode::new("div").with_attribute("class", "profile-background-image"),
            ElementNode::new("h1")
                .with_attribute("class", "text-heading-xlarge")
                .with_text("Ada Lovelace"),
        ])]))
    }

    async fn session() -> PageSession {
        let mut session = PageSession::create(URL, page(), Storage::in_memory(), CustomizerOptions::default()).unwrap();
        assert!(session.initialize().await);
        session
    }

    fn overlay_opacity(session: &PageSession) -> Option<String> {
        let path = session.tree().find_by_id(OVERLAY_ID)?;
        session
            .tree()
            .node(&path)
            .and_then(|n| n.inline_style("opacity"))
            .map(str::to_string)
    }

    #[tokio::test]
    async fn test_initialize_renders_hidden() {
        let session = session().await;
        let status = session.status();

        assert!(status.initialized);
        assert!(!status.is_active);
        assert!(!status.panel_visible);
        assert!(status.banner_found);
        assert_eq!(overlay_opacity(&session).as_deref(), Some("0"));
        assert_eq!(session.profile().name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_non_profile_page() {
        let mut session =
            PageSession::create("https://example.com", page(), Storage::in_memory(), CustomizerOptions::default())
                .unwrap();
        assert!(!session.initialize().await);
        assert!(!session.status().active);
    }

    #[tokio::test]
    async fn test_toggle_activates_then_flips() {
        let mut session = session().await;

        assert!(session.toggle_panel().await);
        assert!(session.is_active());
        assert_eq!(overlay_opacity(&session).as_deref(), Some("1"));

        assert!(!session.toggle_panel().await);
        assert!(session.is_active());

        session.deactivate();
        assert_eq!(overlay_opacity(&session).as_deref(), Some("0"));
        assert!(!session.panel().is_visible());
    }

    #[tokio::test]
    async fn test_panel_events() {
        let mut session = session().await;
        session.activate().await;

        session.panel_event(PanelEvent::ToggleCollapse);
        assert_eq!(session.status().panel_state, PanelState::Collapsed);

        session.panel_event(PanelEvent::SelectTab(PanelTab::Profile));
        let status = session.status();
        assert_eq!(status.panel_state, PanelState::Expanded);
        assert_eq!(status.panel_tab, PanelTab::Profile);
    }

    #[tokio::test]
    async fn test_edits_persist() {
        let mut session = session().await;
        session.select_template("professional").await.unwrap();
        session.set_text("slogan", "Engine whisperer").await.unwrap();

        let storage = session.storage().clone();
        assert_eq!(storage.active_template().await.unwrap(), "professional");
        let saved = storage.custom_settings().await.unwrap().unwrap();
        assert_eq!(saved.custom_text_elements["slogan"].content.as_deref(), Some("Engine whisperer"));
    }

    #[tokio::test]
    async fn test_unknown_template_rejected() {
        let mut session = session().await;
        assert!(session.select_template("vaporwave").await.is_err());
        assert_eq!(session.settings().active_template_id, "modern");
    }

    #[tokio::test]
    async fn test_navigate_resets_state() {
        let mut session = session().await;
        session.activate().await;
        session.set_background_color("#112233").await.unwrap();

        assert!(session.navigate("https://www.linkedin.com/in/charles", page()).await);
        let status = session.status();
        assert!(status.initialized);
        assert!(!status.is_active);
        assert_eq!(status.panel_state, PanelState::Hidden);

        // Settings come back from storage
        assert_eq!(session.settings().custom_colors.background.as_deref(), Some("#112233"));
        assert!(session.take_mutations().iter().any(|m| m.path() == &NodePath::from(vec![0, 0])));
    }

    #[tokio::test]
    async fn test_reset_forgets_uploaded_avatar() {
        let mut session = session().await;
        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(64, 64, image::Rgb([10, 200, 10])))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .unwrap();
        session.upload_profile_image(&png).await.unwrap();
        assert!(session.settings().custom_profile_image.is_some());

        session.reset_customization().await.unwrap();
        assert!(session.settings().custom_profile_image.is_none());
        assert_eq!(session.storage().profile_images().await.unwrap(), ProfileImages::default());

        assert!(session.navigate(URL, page()).await);
        assert!(session.settings().custom_profile_image.is_none());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_optimistic_edit() {
        let storage = Storage::new(Arc::new(FailingStore));
        let mut session = PageSession::create(URL, page(), storage, CustomizerOptions::default()).unwrap();
        assert!(session.initialize().await);

        let err = session.set_background_color("#112233").await.unwrap_err();
        assert!(matches!(err, CustomizerError::StorageFailed(_)));

        assert_eq!(session.settings().custom_colors.background.as_deref(), Some("#112233"));
        let banner = session.tree().node(&NodePath::from(vec![0, 0])).unwrap();
        assert_eq!(banner.inline_style("background-color"), Some("#112233"));
    }
}
