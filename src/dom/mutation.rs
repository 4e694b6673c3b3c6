use crate::dom::element::ElementNode;
use crate::dom::tree::{DomTree, NodePath};
use serde::{Deserialize, Serialize};

/// A single change to the DOM, replayable against a snapshot or a live page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DomMutation {
    SetStyle { path: NodePath, property: String, value: String },
    RemoveStyle { path: NodePath, property: String },
    SetAttribute { path: NodePath, name: String, value: String },
    RemoveAttribute { path: NodePath, name: String },
    AppendChild { path: NodePath, node: ElementNode },
    ClearChildren { path: NodePath },
    RemoveNode { path: NodePath },
}

impl DomMutation {
    /// Node the mutation targets
    pub fn path(&self) -> &NodePath {
        match self {
            DomMutation::SetStyle { path, .. }
            | DomMutation::RemoveStyle { path, .. }
            | DomMutation::SetAttribute { path, .. }
            | DomMutation::RemoveAttribute { path, .. }
            | DomMutation::AppendChild { path, .. }
            | DomMutation::ClearChildren { path }
            | DomMutation::RemoveNode { path } => path,
        }
    }

    /// Apply to a snapshot. Returns false when the target node does not exist.
    pub fn apply(&self, tree: &mut DomTree) -> bool {
        if let DomMutation::RemoveNode { path } = self {
            return remove_node(tree, path);
        }

        let Some(node) = tree.node_mut(self.path()) else {
            return false;
        };

        match self {
            DomMutation::SetStyle { property, value, .. } => node.set_style(property.clone(), value.clone()),
            DomMutation::RemoveStyle { property, .. } => {
                node.remove_style(property);
            }
            DomMutation::SetAttribute { name, value, .. } => node.add_attribute(name.clone(), value.clone()),
            DomMutation::RemoveAttribute { name, .. } => {
                node.remove_attribute(name);
            }
            DomMutation::AppendChild { node: child, .. } => node.add_child(child.clone()),
            DomMutation::ClearChildren { .. } => node.children.clear(),
            DomMutation::RemoveNode { .. } => return false,
        }
        true
    }
}

fn remove_node(tree: &mut DomTree, path: &NodePath) -> bool {
    let Some((&last, parent)) = path.indices().split_last() else {
        // The root element cannot be removed
        return false;
    };
    match tree.node_mut(&NodePath::from(parent.to_vec())) {
        Some(parent) if last < parent.children.len() => {
            parent.children.remove(last);
            true
        }
        _ => false,
    }
}

/// Applies mutations to a snapshot while recording them for replay
pub struct DomPatcher<'a> {
    tree: &'a mut DomTree,
    journal: Vec<DomMutation>,
}

impl<'a> DomPatcher<'a> {
    pub fn new(tree: &'a mut DomTree) -> Self {
        Self {
            tree,
            journal: Vec::new(),
        }
    }

    /// Read access to the tree being patched
    pub fn tree(&self) -> &DomTree {
        &*self.tree
    }

    /// Apply and record a mutation. Mutations whose target is gone are dropped.
    pub fn push(&mut self, mutation: DomMutation) -> bool {
        if mutation.apply(self.tree) {
            self.journal.push(mutation);
            true
        } else {
            log::debug!("Skipping mutation on missing node {}", mutation.path());
            false
        }
    }

    pub fn set_style(&mut self, path: &NodePath, property: &str, value: impl Into<String>) -> bool {
        self.push(DomMutation::SetStyle {
            path: path.clone(),
            property: property.to_string(),
            value: value.into(),
        })
    }

    pub fn remove_style(&mut self, path: &NodePath, property: &str) -> bool {
        self.push(DomMutation::RemoveStyle {
            path: path.clone(),
            property: property.to_string(),
        })
    }

    pub fn set_attribute(&mut self, path: &NodePath, name: &str, value: impl Into<String>) -> bool {
        self.push(DomMutation::SetAttribute {
            path: path.clone(),
            name: name.to_string(),
            value: value.into(),
        })
    }

    pub fn remove_attribute(&mut self, path: &NodePath, name: &str) -> bool {
        self.push(DomMutation::RemoveAttribute {
            path: path.clone(),
            name: name.to_string(),
        })
    }

    /// Append a child and return its path
    pub fn append_child(&mut self, path: &NodePath, node: ElementNode) -> Option<NodePath> {
        let index = self.tree.node(path)?.children.len();
        self.push(DomMutation::AppendChild {
            path: path.clone(),
            node,
        })
        .then(|| path.child(index))
    }

    pub fn clear_children(&mut self, path: &NodePath) -> bool {
        self.push(DomMutation::ClearChildren { path: path.clone() })
    }

    pub fn remove_node(&mut self, path: &NodePath) -> bool {
        self.push(DomMutation::RemoveNode { path: path.clone() })
    }

    /// Finish patching and hand back the recorded journal
    pub fn finish(self) -> Vec<DomMutation> {
        self.journal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> DomTree {
        DomTree::new(ElementNode::new("html").with_children(vec![
            ElementNode::new("head"),
            ElementNode::new("body").with_children(vec![ElementNode::new("div").with_attribute("id", "banner")]),
        ]))
    }

    #[test]
    fn test_patcher_records_applied_mutations() {
        let mut tree = tree();
        let banner = NodePath::from(vec![1, 0]);

        let journal = {
            let mut patcher = DomPatcher::new(&mut tree);
            assert!(patcher.set_style(&banner, "background-color", "#112233"));
            assert!(!patcher.set_style(&NodePath::from(vec![9]), "color", "red"));
            let overlay = patcher.append_child(&banner, ElementNode::new("div")).unwrap();
            assert_eq!(overlay, NodePath::from(vec![1, 0, 0]));
            patcher.finish()
        };

        assert_eq!(journal.len(), 2);
        assert_eq!(tree.node(&banner).unwrap().inline_style("background-color"), Some("#112233"));
        assert_eq!(tree.node(&banner).unwrap().children.len(), 1);
    }

    #[test]
    fn test_replay_reproduces_tree() {
        let mut patched = tree();
        let banner = NodePath::from(vec![1, 0]);
        let journal = {
            let mut patcher = DomPatcher::new(&mut patched);
            patcher.set_attribute(&banner, "data-state", "custom");
            patcher.append_child(&banner, ElementNode::new("span").with_text("Hi"));
            patcher.clear_children(&banner);
            patcher.append_child(&banner, ElementNode::new("span").with_text("Hello"));
            patcher.finish()
        };

        let mut replayed = tree();
        for mutation in &journal {
            assert!(mutation.apply(&mut replayed));
        }
        assert_eq!(replayed, patched);
    }

    #[test]
    fn test_remove_node() {
        let mut tree = tree();
        assert!(DomMutation::RemoveNode { path: NodePath::from(vec![1, 0]) }.apply(&mut tree));
        assert!(tree.node(&NodePath::from(vec![1, 0])).is_none());
        assert!(!DomMutation::RemoveNode { path: NodePath::root() }.apply(&mut tree));
    }

    #[test]
    fn test_mutation_wire_format() {
        let mutation = DomMutation::SetStyle {
            path: NodePath::from(vec![1, 0]),
            property: "opacity".to_string(),
            value: "1".to_string(),
        };

        let json = serde_json::to_value(&mutation).unwrap();
        assert_eq!(json["op"], "setStyle");
        assert_eq!(json["path"], serde_json::json!([1, 0]));
        assert_eq!(json["property"], "opacity");
    }
}
