//! Node lookup by build-assigned node id.

use tracing::trace;

use crate::domain::node::TreeNode;

/// Find the node whose `node_id` equals `node_id`.
///
/// Depth-first, pre-order, stops at the first match. An absent or empty
/// candidate never matches.
pub fn find_node<'a>(root: &'a TreeNode, node_id: Option<&str>) -> Option<&'a TreeNode> {
    let node_id = node_id.filter(|id| !id.is_empty())?;
    let found = root.iter().find(|node| node.node_id().as_str() == node_id);
    trace!(node_id, found = found.is_some(), "find_node");
    found
}

/// Path from `root` down to the node with `node_id`, both ends included.
pub fn find_path<'a>(root: &'a TreeNode, node_id: Option<&str>) -> Option<Vec<&'a TreeNode>> {
    let node_id = node_id.filter(|id| !id.is_empty())?;
    let mut path: Vec<&TreeNode> = Vec::new();
    let mut stack = vec![(root, 0usize)];

    while let Some((node, depth)) = stack.pop() {
        path.truncate(depth);
        path.push(node);
        if node.node_id().as_str() == node_id {
            return Some(path);
        }
        for child in node.children().iter().rev() {
            stack.push((child, depth + 1));
        }
    }

    None
}
