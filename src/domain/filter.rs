//! Visible leaves of a selected branch.

use crate::domain::navigator::find_node;
use crate::domain::node::{NodeKind, TreeNode};
use crate::domain::range::ValueFilter;

/// Direct leaf children of the branch `node_id` whose value lies in `filter`.
///
/// Returns `None` ("no selection") when `node_id` is absent, unknown or names a
/// leaf. Returns an empty list when the branch has no matching leaf children.
/// Grandchildren are not considered, so a level-1 or level-2 branch yields an
/// empty list. Leaves without a value are never returned.
pub fn filter_leaves<'a>(
    root: &'a TreeNode,
    node_id: Option<&str>,
    filter: Option<ValueFilter>,
) -> Option<Vec<&'a TreeNode>> {
    let node = find_node(root, node_id)?;
    let NodeKind::Branch { children } = node.kind() else {
        return None;
    };

    let leaves = children
        .iter()
        .filter(|child| match child.kind() {
            NodeKind::Leaf { value: Some(value) } => {
                filter.map_or(true, |range| range.contains(*value))
            }
            _ => false,
        })
        .collect();
    Some(leaves)
}
