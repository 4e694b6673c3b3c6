use crate::dom::{DomTree, NodePath};
use indexmap::IndexMap;

/// Inline style of the banner before the first customization
///
/// Captured once per session; later renders never overwrite it, so restoring
/// always returns to what the host page drew.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleBackup {
    captured: Option<(NodePath, IndexMap<String, String>)>,
}

impl StyleBackup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the node's inline style unless a snapshot already exists
    pub fn capture(&mut self, tree: &DomTree, path: &NodePath) -> bool {
        if self.captured.is_some() {
            return false;
        }
        let Some(node) = tree.node(path) else {
            return false;
        };
        self.captured = Some((path.clone(), node.style.clone()));
        true
    }

    pub fn is_captured(&self) -> bool {
        self.captured.is_some()
    }

    pub fn path(&self) -> Option<&NodePath> {
        self.captured.as_ref().map(|(path, _)| path)
    }

    /// Original inline style, if captured
    pub fn style(&self) -> Option<&IndexMap<String, String>> {
        self.captured.as_ref().map(|(_, style)| style)
    }

    /// Forget the snapshot
    pub fn take(&mut self) -> Option<(NodePath, IndexMap<String, String>)> {
        self.captured.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;

    #[test]
    fn test_capture_once() {
        let mut tree = DomTree::new(ElementNode::new("div").with_style("background-color", "red"));
        let root = NodePath::root();
        let mut backup = StyleBackup::new();

        assert!(backup.capture(&tree, &root));
        tree.root.set_style("background-color", "blue");
        assert!(!backup.capture(&tree, &root));

        assert_eq!(backup.style().unwrap()["background-color"], "red");
        assert_eq!(backup.path(), Some(&root));
        assert!(backup.take().is_some());
        assert!(!backup.is_captured());
    }

    #[test]
    fn test_capture_missing_node() {
        let tree = DomTree::new(ElementNode::new("div"));
        let mut backup = StyleBackup::new();
        assert!(!backup.capture(&tree, &NodePath::from(vec![3])));
    }
}
