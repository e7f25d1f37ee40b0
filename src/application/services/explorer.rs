//! Explorer service
//!
//! Loads the spend table and turns it into a capability tree.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{find_node, find_path, DuplicateLeaf, TreeBuilder, TreeNode};
use crate::infrastructure::traits::TableSource;

/// Result of loading and building one table snapshot.
#[derive(Debug, Clone)]
pub struct BuiltTree {
    /// Root of the new tree, shared read-only
    pub root: Arc<TreeNode>,
    /// Leaf rows rejected as duplicates
    pub duplicates: Vec<DuplicateLeaf>,
    /// Number of rows fetched from the source
    pub row_count: usize,
}

/// Service for building capability trees from a table source.
pub struct ExplorerService {
    source: Arc<dyn TableSource>,
}

impl ExplorerService {
    /// Create a new explorer service.
    pub fn new(source: Arc<dyn TableSource>) -> Self {
        Self { source }
    }

    /// Origin of the table, for messages.
    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    /// Fetch the table and build a fresh tree from it.
    #[instrument(level = "debug", skip(self))]
    pub fn load_tree(&self) -> ApplicationResult<BuiltTree> {
        let rows = self
            .source
            .fetch_rows()
            .with_context("load table", self.source.describe())?;
        debug!("load_tree: fetched {} rows", rows.len());

        let mut builder = TreeBuilder::new();
        let root = builder.build(&rows);

        Ok(BuiltTree {
            root: Arc::new(root),
            duplicates: builder.duplicates().to_vec(),
            row_count: rows.len(),
        })
    }

    /// Resolve `node_id` within `root`, failing with `NodeNotFound`.
    pub fn resolve<'a>(&self, root: &'a TreeNode, node_id: &str) -> ApplicationResult<&'a TreeNode> {
        find_node(root, Some(node_id))
            .ok_or_else(|| ApplicationError::NodeNotFound(node_id.to_string()))
    }

    /// Nodes from `root` down to `node_id`, both included.
    pub fn resolve_path<'a>(
        &self,
        root: &'a TreeNode,
        node_id: &str,
    ) -> ApplicationResult<Vec<&'a TreeNode>> {
        find_path(root, Some(node_id))
            .ok_or_else(|| ApplicationError::NodeNotFound(node_id.to_string()))
    }
}
