use crate::dom::element::ElementNode;
use crate::dom::selector::Selector;
use crate::error::{CustomizerError, Result};
use headless_chrome::Tab;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Position of a node as child indices from the root element
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Path of the root element
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the `index`-th child of this node
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Child indices from the root
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of steps below the root
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether `self` is `other` or lies inside it
    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

/// A borrowed element together with its location in the tree
#[derive(Debug, Clone)]
pub struct ElementRef<'a> {
    pub path: NodePath,
    pub node: &'a ElementNode,
}

/// Snapshot of a host page's DOM
#[derive(Debug, Clone, PartialEq)]
pub struct DomTree {
    /// Root element of the DOM tree (usually `html`)
    pub root: ElementNode,
}

impl DomTree {
    /// Create a new DomTree
    pub fn new(root: ElementNode) -> Self {
        Self { root }
    }

    /// Parse a snapshot serialized as JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let root: ElementNode = serde_json::from_str(json)
            .map_err(|e| CustomizerError::DomParseFailed(format!("Failed to parse DOM JSON: {}", e)))?;
        Ok(Self::new(root))
    }

    /// Capture the DOM of a browser tab
    pub fn from_tab(tab: &Arc<Tab>) -> Result<Self> {
        // The script returns the snapshot as a JSON string
        let js_code = include_str!("extract_dom.js");

        let result = tab
            .evaluate(js_code, false)
            .map_err(|e| CustomizerError::DomParseFailed(format!("Failed to execute DOM extraction script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| CustomizerError::DomParseFailed("No value returned from DOM extraction".to_string()))?;

        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| CustomizerError::DomParseFailed(format!("Failed to get JSON string: {}", e)))?;

        Self::from_json(&json_str)
    }

    /// Convert the DOM tree to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.root)
            .map_err(|e| CustomizerError::DomParseFailed(format!("Failed to serialize DOM to JSON: {}", e)))
    }

    /// Get the node at `path`
    pub fn node(&self, path: &NodePath) -> Option<&ElementNode> {
        let mut node = &self.root;
        for &index in path.indices() {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    /// Get the node at `path` mutably
    pub fn node_mut(&mut self, path: &NodePath) -> Option<&mut ElementNode> {
        let mut node = &mut self.root;
        for &index in path.indices() {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    /// All elements in document (pre-)order
    pub fn elements(&self) -> Vec<ElementRef<'_>> {
        let mut out = Vec::new();
        Self::collect_elements(&self.root, NodePath::root(), &mut out);
        out
    }

    fn collect_elements<'a>(node: &'a ElementNode, path: NodePath, out: &mut Vec<ElementRef<'a>>) {
        out.push(ElementRef {
            path: path.clone(),
            node,
        });
        for (i, child) in node.children.iter().enumerate() {
            Self::collect_elements(child, path.child(i), out);
        }
    }

    /// First element in document order matching `selector`
    pub fn query_selector(&self, selector: &Selector) -> Option<NodePath> {
        let mut ancestors = Vec::new();
        Self::find_first(&self.root, NodePath::root(), &mut ancestors, selector)
    }

    fn find_first<'a>(
        node: &'a ElementNode,
        path: NodePath,
        ancestors: &mut Vec<&'a ElementNode>,
        selector: &Selector,
    ) -> Option<NodePath> {
        if selector.matches(ancestors, node) {
            return Some(path);
        }

        ancestors.push(node);
        for (i, child) in node.children.iter().enumerate() {
            if let Some(found) = Self::find_first(child, path.child(i), ancestors, selector) {
                ancestors.pop();
                return Some(found);
            }
        }
        ancestors.pop();

        None
    }

    /// All elements matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodePath> {
        let mut found = Vec::new();
        let mut ancestors = Vec::new();
        Self::find_all(&self.root, NodePath::root(), &mut ancestors, selector, &mut found);
        found
    }

    fn find_all<'a>(
        node: &'a ElementNode,
        path: NodePath,
        ancestors: &mut Vec<&'a ElementNode>,
        selector: &Selector,
        found: &mut Vec<NodePath>,
    ) {
        if selector.matches(ancestors, node) {
            found.push(path.clone());
        }

        ancestors.push(node);
        for (i, child) in node.children.iter().enumerate() {
            Self::find_all(child, path.child(i), ancestors, selector, found);
        }
        ancestors.pop();
    }

    /// Parse and run a selector in one step
    pub fn select(&self, css: &str) -> Result<Option<NodePath>> {
        Ok(self.query_selector(&Selector::parse(css)?))
    }

    /// Find the first element with the given id attribute
    pub fn find_by_id(&self, id: &str) -> Option<NodePath> {
        self.elements()
            .into_iter()
            .find(|el| el.node.id().map(String::as_str) == Some(id))
            .map(|el| el.path)
    }

    /// Count total elements in the tree
    pub fn count_elements(&self) -> usize {
        Self::count_elements_recursive(&self.root)
    }

    fn count_elements_recursive(node: &ElementNode) -> usize {
        1 + node.children.iter().map(Self::count_elements_recursive).sum::<usize>()
    }
}
