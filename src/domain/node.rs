//! Capability tree model.
//!
//! A tree is built once from a table snapshot and never mutated afterwards.
//! Branches group capabilities, leaves carry one spend record each.

use std::fmt;

use serde::Serialize;

/// Reserved `id` of the root branch. Data-derived ids never take this value.
pub const ROOT_ID: &str = "<data_root>";

/// Build-assigned node identifier, unique within one tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic source of node ids for a single build.
///
/// The first id issued is `"0"`, which always goes to the root.
#[derive(Debug, Default)]
pub struct NodeIdCounter {
    next: usize,
}

impl NodeIdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> NodeId {
        let id = NodeId(self.next.to_string());
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> usize {
        self.next
    }
}

/// Shape of a node: branches own children, leaves own a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Branch {
        /// Insertion ordered, keyed by sibling `id`
        children: Vec<TreeNode>,
    },
    Leaf {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
}

/// Node of the capability hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    id: String,
    name: String,
    node_id: NodeId,
    #[serde(flatten)]
    kind: NodeKind,
}

impl TreeNode {
    pub fn branch(id: impl Into<String>, name: impl Into<String>, node_id: NodeId) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_id,
            kind: NodeKind::Branch {
                children: Vec::new(),
            },
        }
    }

    pub fn leaf(
        id: impl Into<String>,
        name: impl Into<String>,
        node_id: NodeId,
        value: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_id,
            kind: NodeKind::Leaf { value },
        }
    }

    /// Root branch with no children, as held before any table was loaded.
    pub fn empty_root() -> Self {
        Self::branch(ROOT_ID, "", NodeIdCounter::new().issue())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.kind, NodeKind::Branch { .. })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Leaf value; `None` for branches and for leaves without a value.
    pub fn value(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Leaf { value } => value,
            NodeKind::Branch { .. } => None,
        }
    }

    /// Direct children; always empty for leaves.
    pub fn children(&self) -> &[TreeNode] {
        match &self.kind {
            NodeKind::Branch { children } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    /// Direct child with the given sibling `id`.
    pub fn child(&self, id: &str) -> Option<&TreeNode> {
        self.children().iter().find(|child| child.id == id)
    }

    /// Depth-first pre-order traversal starting at (and including) this node.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including this node.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Longest root-to-leaf path counted in nodes.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1)];

        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in node.children() {
                stack.push((child, depth + 1));
            }
        }

        max_depth
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<TreeNode>> {
        match &mut self.kind {
            NodeKind::Branch { children } => Some(children),
            NodeKind::Leaf { .. } => None,
        }
    }
}

impl<'a> IntoIterator for &'a TreeNode {
    type Item = &'a TreeNode;
    type IntoIter = PreOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator over a subtree, driven by an explicit stack.
pub struct PreOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}
