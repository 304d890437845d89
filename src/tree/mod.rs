//! # Tree Model
//!
//! A phylogenetic tree held as a flat node list. Index 0 is the root and
//! nodes are stored in preorder, so every parent index is smaller than the
//! indices of its children. Per-node vectors (visibility, branch
//! thickness, tip counts, tip radii) are indexed the same way.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod color;
pub mod helpers;

pub type NodeId = usize;

/// strain → gene (or "nuc") → position → state
pub type Sequences = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

/// Attribute key holding a node's decimal-year date.
pub const NUM_DATE_ATTR: &str = "num_date";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub strain: String,
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub attrs: BTreeMap<String, Value>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn num_date(&self) -> Option<f64> {
        self.attr_f64(NUM_DATE_ATTR)
    }

    /// Attribute value as a string, for comparing against filter and legend labels.
    pub fn attr_str(&self, key: &str) -> Option<String> {
        match self.attrs.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        self.attrs.get(key).and_then(Value::as_f64)
    }
}

/// Tree as it appears in dataset JSON: nested children, attributes under `attr`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NestedNode {
    pub strain: String,
    #[serde(default)]
    pub attr: BTreeMap<String, Value>,
    #[serde(default)]
    pub children: Vec<NestedNode>,
}

/// Flatten a nested tree into a preorder node list.
pub fn flatten(root: &NestedNode) -> Vec<TreeNode> {
    fn visit(node: &NestedNode, parent: Option<NodeId>, out: &mut Vec<TreeNode>) -> NodeId {
        let id = out.len();
        out.push(TreeNode {
            strain: node.strain.clone(),
            parent,
            children: Vec::with_capacity(node.children.len()),
            attrs: node.attr.clone(),
        });
        for child in &node.children {
            let child_id = visit(child, Some(id), out);
            out[id].children.push(child_id);
        }
        id
    }

    let mut nodes = Vec::new();
    visit(root, None, &mut nodes);
    nodes
}

/// Check that every node has a strain name and no name is used twice.
/// Sequences are keyed by strain.
///
/// Returns a description of the first problem found.
pub fn check_strains(nodes: &[TreeNode]) -> Result<(), String> {
    let mut seen = BTreeMap::new();
    for (id, node) in nodes.iter().enumerate() {
        if node.strain.is_empty() {
            return Err(format!("node {id} has an empty strain name"));
        }
        if let Some(first) = seen.insert(node.strain.as_str(), id) {
            return Err(format!(
                "strain {} appears at nodes {first} and {id}",
                node.strain
            ));
        }
    }
    Ok(())
}
