use crate::browser::config::{ConnectionOptions, LaunchOptions};
use crate::config::CustomizerOptions;
use crate::dom::{DomMutation, DomTree};
use crate::error::{CustomizerError, Result};
use crate::locator::{ElementLocator, RetryPolicy, Targets, locate_with_retry};
use crate::session::PageSession;
use crate::storage::Storage;
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// A profile page open in Chrome/Chromium
pub struct LivePage {
    /// Kept alive for as long as the tab is in use
    browser: Browser,
    tab: Arc<Tab>,
}

impl LivePage {
    /// Launch a new browser and open a blank tab
    pub fn launch(options: &LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Keep the page from advertising automation
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        launch_opts.idle_browser_timeout = Duration::from_secs(options.idle_timeout_secs);
        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.path = options.chrome_path.clone();
        launch_opts.user_data_dir = options.user_data_dir.clone();
        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| CustomizerError::LaunchFailed(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| CustomizerError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser, tab })
    }

    /// Attach to a running browser and use its first tab
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect_with_timeout(options.ws_url, Duration::from_millis(options.timeout))
            .map_err(|e| CustomizerError::ConnectionFailed(e.to_string()))?;

        let existing = browser
            .get_tabs()
            .lock()
            .map_err(|e| CustomizerError::ConnectionFailed(format!("Failed to get tabs: {}", e)))?
            .first()
            .cloned();
        let tab = match existing {
            Some(tab) => tab,
            None => browser
                .new_tab()
                .map_err(|e| CustomizerError::ConnectionFailed(format!("Failed to create tab: {}", e)))?,
        };

        Ok(Self { browser, tab })
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Current URL of the tab
    pub fn url(&self) -> String {
        self.tab.get_url()
    }

    /// Navigate and wait for the load to finish
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| CustomizerError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| CustomizerError::NavigationFailed(format!("Navigation timeout: {}", e)))?;
        Ok(())
    }

    /// Capture the page DOM
    pub fn snapshot(&self) -> Result<DomTree> {
        let tree = DomTree::from_tab(&self.tab)?;
        log::debug!("Captured {} elements from {}", tree.count_elements(), self.url());
        Ok(tree)
    }

    /// Snapshot repeatedly until the banner can be located
    pub fn wait_for_targets(&self, locator: &ElementLocator, policy: RetryPolicy) -> Option<(DomTree, Targets)> {
        locate_with_retry(locator, policy, || self.snapshot())
    }

    /// Replay recorded mutations in the page. Returns how many found their target.
    pub fn apply_mutations(&self, mutations: &[DomMutation]) -> Result<usize> {
        if mutations.is_empty() {
            return Ok(0);
        }

        let journal = serde_json::to_string(mutations)?;
        let script = format!("{}({})", include_str!("apply_mutations.js"), journal);

        let result = self
            .tab
            .evaluate(&script, false)
            .map_err(|e| CustomizerError::EvaluationFailed(format!("Failed to apply mutations: {}", e)))?;

        let applied = result.value.and_then(|v| v.as_u64()).unwrap_or(0) as usize;
        if applied < mutations.len() {
            log::warn!("{} of {} mutations had no target in the page", mutations.len() - applied, mutations.len());
        }
        Ok(applied)
    }

    /// Bind a session to the page, waiting for the banner to render first
    pub fn open_session(&self, storage: Storage, options: CustomizerOptions) -> Result<PageSession> {
        let locator = ElementLocator::new(&options.locator)?;
        let policy = RetryPolicy::from(&options.locator);

        // Without a banner the session still works, just with fewer targets
        let snapshot = match self.wait_for_targets(&locator, policy) {
            Some((tree, _)) => tree,
            None => self.snapshot()?,
        };
        PageSession::create(self.url(), snapshot, storage, options)
    }

    /// Push whatever the session changed since the last sync into the page
    pub fn sync(&self, session: &mut PageSession) -> Result<usize> {
        let mutations = session.take_mutations();
        self.apply_mutations(&mutations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodePath;

    const FIXTURE: &str = "data:text/html,<html><body><div class=\"profile-background-image\" \
                           style=\"width:800px;height:200px\"></div></body></html>";

    #[test]
    #[ignore] // Requires Chrome; run with: cargo test -- --ignored
    fn test_launch_and_snapshot() {
        let page = LivePage::launch(&LaunchOptions::new().headless(true)).expect("Failed to launch browser");
        page.navigate(FIXTURE).expect("Failed to navigate");

        let tree = page.snapshot().expect("Failed to snapshot");
        assert_eq!(tree.root.tag_name, "html");
        assert!(tree.select(".profile-background-image").unwrap().is_some());
    }

    #[test]
    #[ignore]
    fn test_apply_mutations() {
        let page = LivePage::launch(&LaunchOptions::new().headless(true)).expect("Failed to launch browser");
        page.navigate(FIXTURE).expect("Failed to navigate");

        let banner = NodePath::from(vec![1, 0]);
        let applied = page
            .apply_mutations(&[
                DomMutation::SetStyle {
                    path: banner.clone(),
                    property: "background-color".to_string(),
                    value: "rgb(17, 34, 51)".to_string(),
                },
                DomMutation::SetStyle {
                    path: NodePath::from(vec![9, 9]),
                    property: "color".to_string(),
                    value: "red".to_string(),
                },
            ])
            .expect("Failed to apply");
        assert_eq!(applied, 1);

        let tree = page.snapshot().unwrap();
        let node = tree.node(&banner).unwrap();
        assert_eq!(node.inline_style("background-color"), Some("rgb(17, 34, 51)"));
    }
}
