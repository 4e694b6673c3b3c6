//! Live page bridge over the Chrome DevTools Protocol
//!
//! - config: launch and connection options
//! - page: a tab that can be snapshotted into a `DomTree` and patched with a
//!   `DomMutation` journal

pub mod config;
pub mod page;

pub use config::{ConnectionOptions, LaunchOptions};
pub use page::LivePage;
