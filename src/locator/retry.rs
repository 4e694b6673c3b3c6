use crate::config::LocatorOptions;
use crate::dom::DomTree;
use crate::error::Result;
use crate::locator::{ElementLocator, Targets};
use std::thread;
use std::time::Duration;

/// Fixed-interval retry policy for pages that render their banner late
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&LocatorOptions::default())
    }
}

impl From<&LocatorOptions> for RetryPolicy {
    fn from(options: &LocatorOptions) -> Self {
        Self {
            interval: Duration::from_millis(options.retry_interval_ms),
            max_attempts: options.max_attempts,
        }
    }
}

impl RetryPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self { interval, max_attempts }
    }

    /// Single attempt, no waiting
    pub fn once() -> Self {
        Self::new(Duration::ZERO, 1)
    }
}

/// Re-snapshot and locate until the banner shows up or attempts run out.
///
/// Snapshot failures count as a failed attempt. Returns the last snapshot with
/// its targets on success, `None` when every attempt came up empty.
pub fn locate_with_retry<F>(
    locator: &ElementLocator,
    policy: RetryPolicy,
    mut snapshot: F,
) -> Option<(DomTree, Targets)>
where
    F: FnMut() -> Result<DomTree>,
{
    let attempts = policy.max_attempts.max(1);

    for attempt in 1..=attempts {
        match snapshot() {
            Ok(tree) => {
                let targets = locator.locate(&tree);
                if targets.banner.is_some() {
                    log::debug!("Banner located on attempt {}/{}", attempt, attempts);
                    return Some((tree, targets));
                }
            }
            Err(e) => log::warn!("Snapshot failed on attempt {}/{}: {}", attempt, attempts, e),
        }

        if attempt < attempts && !policy.interval.is_zero() {
            thread::sleep(policy.interval);
        }
    }

    log::warn!("Banner not found after {} attempts", attempts);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;
    use crate::error::CustomizerError;

    fn page(with_banner: bool) -> DomTree {
        let mut body = ElementNode::new("body");
        if with_banner {
            body.add_child(ElementNode::new("div").with_attribute("class", "profile-background-image"));
        }
        DomTree::new(ElementNode::new("html").with_children(vec![body]))
    }

    #[test]
    fn test_retry_until_found() {
        let mut calls = 0;
        let found = locate_with_retry(&ElementLocator::default(), RetryPolicy::new(Duration::ZERO, 5), || {
            calls += 1;
            if calls == 1 {
                return Err(CustomizerError::EvaluationFailed("not ready".to_string()));
            }
            Ok(page(calls >= 3))
        });

        assert_eq!(calls, 3);
        assert!(found.unwrap().1.banner.is_some());
    }

    #[test]
    fn test_retry_exhausted() {
        let mut calls = 0;
        let found = locate_with_retry(&ElementLocator::default(), RetryPolicy::new(Duration::ZERO, 4), || {
            calls += 1;
            Ok(page(false))
        });

        assert!(found.is_none());
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_policy_from_options() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.interval, Duration::from_millis(1000));
        assert_eq!(policy.max_attempts, 10);
    }
}
