//! Tree builder: turns the flat spend table into the capability hierarchy.

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::domain::node::{NodeIdCounter, TreeNode, ROOT_ID};
use crate::domain::row::{compare_rows, present, SpendRow};

/// Leaf row rejected because its `id` already exists under the same level-3 branch.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateLeaf {
    /// `id` of the level-3 branch holding the first occurrence
    pub branch: String,
    /// Rejected leaf `id`
    pub id: String,
    /// Value carried by the rejected row
    pub value: Option<f64>,
}

/// Constructs capability trees from spend rows.
///
/// Rows are sorted by `(level1, level2, level3, id)` before insertion, so the
/// resulting tree and its node ids do not depend on input order.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    counter: NodeIdCounter,
    duplicates: Vec<DuplicateLeaf>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh tree. Diagnostics of a previous build are discarded.
    #[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn build(&mut self, rows: &[SpendRow]) -> TreeNode {
        // Reset state for fresh build
        self.counter = NodeIdCounter::new();
        self.duplicates.clear();

        let mut root = TreeNode::branch(ROOT_ID, "", self.counter.issue());
        for row in rows.iter().sorted_by(|a, b| compare_rows(a, b)) {
            self.insert_row(&mut root, row);
        }

        debug!(
            nodes = self.counter.issued(),
            duplicates = self.duplicates.len(),
            "tree built"
        );
        root
    }

    /// Leaf rows rejected by the last build, in sorted row order.
    pub fn duplicates(&self) -> &[DuplicateLeaf] {
        &self.duplicates
    }

    /// Number of nodes created by the last build, root included.
    pub fn node_count(&self) -> usize {
        self.counter.issued()
    }

    fn insert_row(&mut self, root: &mut TreeNode, row: &SpendRow) {
        let Some(level1) = present(&row.level1) else {
            return;
        };
        let Some(level1_node) = self.ensure_branch(root, level1) else {
            return;
        };
        let Some(level2) = present(&row.level2) else {
            return;
        };
        let Some(level2_node) = self.ensure_branch(level1_node, level2) else {
            return;
        };
        let Some(level3) = present(&row.level3) else {
            return;
        };
        let Some(level3_node) = self.ensure_branch(level2_node, level3) else {
            return;
        };
        if let Some(id) = present(&row.id) {
            self.insert_leaf(level3_node, id, row);
        }
    }

    /// Child branch `id` of `parent`, created on first use.
    fn ensure_branch<'a>(&mut self, parent: &'a mut TreeNode, id: &str) -> Option<&'a mut TreeNode> {
        let children = parent.children_mut()?;
        // Rows arrive sorted, so an existing sibling with this id is the last child
        if !is_last_child(children, id) {
            children.push(TreeNode::branch(id, id, self.counter.issue()));
        }
        children.last_mut().filter(|child| child.is_branch())
    }

    fn insert_leaf(&mut self, branch: &mut TreeNode, id: &str, row: &SpendRow) {
        let branch_id = branch.id().to_string();
        let Some(children) = branch.children_mut() else {
            return;
        };
        if is_last_child(children, id) {
            warn!("Branch '{}' already contains a child '{}'.", branch_id, id);
            self.duplicates.push(DuplicateLeaf {
                branch: branch_id,
                id: id.to_string(),
                value: row.value,
            });
            return;
        }
        let name = row.name.as_deref().unwrap_or(id);
        children.push(TreeNode::leaf(id, name, self.counter.issue(), row.value));
    }
}

fn is_last_child(children: &[TreeNode], id: &str) -> bool {
    children.last().is_some_and(|child| child.id() == id)
}

/// Build a tree with a throwaway builder.
pub fn build_tree(rows: &[SpendRow]) -> TreeNode {
    TreeBuilder::new().build(rows)
}
