//! Domain layer: capability tree and the operations over it
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).
//! Every operation is a pure function of its arguments.

pub mod builder;
pub mod filter;
pub mod navigator;
pub mod node;
pub mod range;
pub mod row;

pub use builder::{build_tree, DuplicateLeaf, TreeBuilder};
pub use filter::filter_leaves;
pub use navigator::{find_node, find_path};
pub use node::{NodeId, NodeIdCounter, NodeKind, PreOrder, TreeNode, ROOT_ID};
pub use range::{normalize_filter, value_domain, FilterNormalizer, ValueFilter};
pub use row::{compare_rows, SpendRow};
