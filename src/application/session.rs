//! Explorer session: current tree, selection and value filter
//!
//! State changes go through [`reduce`], a pure transition function. The
//! session serialises writers behind a lock and hands out cheap snapshots;
//! the tree itself is shared through `Arc` and never modified.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, instrument, warn};

use crate::application::services::ExplorerService;
use crate::domain::{filter_leaves, value_domain, FilterNormalizer, TreeNode, ValueFilter};

/// Progress of the table fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    InProgress,
    Done,
}

/// Everything the presentation layer reads.
#[derive(Debug, Clone)]
pub struct ExplorerState {
    pub data: Arc<TreeNode>,
    pub selection: Option<String>,
    pub error: Option<String>,
    pub fetch_status: Option<FetchStatus>,
    pub value_filter: Option<ValueFilter>,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self {
            data: Arc::new(TreeNode::empty_root()),
            selection: None,
            error: None,
            fetch_status: None,
            value_filter: None,
        }
    }
}

/// State transitions.
#[derive(Debug, Clone)]
pub enum Action {
    /// New tree, or the message of a failed load
    UpdateData(Result<Arc<TreeNode>, String>),
    UpdateFetchStatus(Option<FetchStatus>),
    UpdateSelection(Option<String>),
    UpdateValueFilter(Option<ValueFilter>),
}

/// Apply `action` to `state`.
///
/// A failed load replaces the tree with an empty root and records the error;
/// both outcomes mark the fetch as done.
pub fn reduce(state: ExplorerState, action: Action) -> ExplorerState {
    match action {
        Action::UpdateData(Ok(data)) => ExplorerState {
            data,
            error: None,
            fetch_status: Some(FetchStatus::Done),
            ..state
        },
        Action::UpdateData(Err(message)) => ExplorerState {
            data: Arc::new(TreeNode::empty_root()),
            error: Some(message),
            fetch_status: Some(FetchStatus::Done),
            ..state
        },
        Action::UpdateFetchStatus(fetch_status) => ExplorerState {
            fetch_status,
            ..state
        },
        Action::UpdateSelection(selection) => ExplorerState { selection, ..state },
        Action::UpdateValueFilter(value_filter) => ExplorerState {
            value_filter,
            ..state
        },
    }
}

/// Outcome of [`ExplorerSession::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Loaded { rows: usize, duplicates: usize },
    Failed { message: String },
    /// Another refresh was still running; nothing was done
    AlreadyInProgress,
}

/// Stateful front of the explorer, shared between threads.
pub struct ExplorerSession {
    service: ExplorerService,
    state: RwLock<ExplorerState>,
}

impl ExplorerSession {
    pub fn new(service: ExplorerService) -> Self {
        Self {
            service,
            state: RwLock::new(ExplorerState::default()),
        }
    }

    pub fn service(&self) -> &ExplorerService {
        &self.service
    }

    fn read(&self) -> RwLockReadGuard<'_, ExplorerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ExplorerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state. The tree is shared, not copied.
    pub fn snapshot(&self) -> ExplorerState {
        self.read().clone()
    }

    /// Current tree.
    pub fn tree(&self) -> Arc<TreeNode> {
        Arc::clone(&self.read().data)
    }

    pub fn dispatch(&self, action: Action) {
        let mut state = self.write();
        let current = std::mem::take(&mut *state);
        *state = reduce(current, action);
    }

    /// Reload the table and swap in the new tree.
    ///
    /// Skipped while another refresh is outstanding. The load runs without
    /// holding the lock, so readers keep seeing the previous tree until the
    /// new one replaces it.
    #[instrument(level = "debug", skip(self))]
    pub fn refresh(&self) -> RefreshOutcome {
        {
            let mut state = self.write();
            if state.fetch_status == Some(FetchStatus::InProgress) {
                debug!("refresh: fetch already in progress");
                return RefreshOutcome::AlreadyInProgress;
            }
            state.fetch_status = Some(FetchStatus::InProgress);
        }

        match self.service.load_tree() {
            Ok(built) => {
                info!(
                    "loaded {} rows from {}",
                    built.row_count,
                    self.service.source_name()
                );
                let outcome = RefreshOutcome::Loaded {
                    rows: built.row_count,
                    duplicates: built.duplicates.len(),
                };
                self.dispatch(Action::UpdateData(Ok(built.root)));
                outcome
            }
            Err(e) => {
                let message = e.to_string();
                warn!("refresh failed: {}", message);
                self.dispatch(Action::UpdateData(Err(message.clone())));
                RefreshOutcome::Failed { message }
            }
        }
    }

    /// Select a node by node id, or clear the selection.
    pub fn select(&self, node_id: Option<&str>) {
        self.dispatch(Action::UpdateSelection(node_id.map(str::to_string)));
    }

    /// Legal filter range for the current tree.
    pub fn domain(&self) -> ValueFilter {
        value_domain(&self.read().data)
    }

    /// Normalize raw range input and make it the current filter.
    ///
    /// Input that does not fit the domain is ignored and the prior filter
    /// stays in place. Returns the normalized filter, if any.
    pub fn apply_filter_input(&self, candidate: &[f64]) -> Option<ValueFilter> {
        let normalized = FilterNormalizer::new(self.domain()).normalize(candidate);
        match normalized {
            Some(filter) => self.dispatch(Action::UpdateValueFilter(Some(filter))),
            None => debug!("apply_filter_input: ignoring {:?}", candidate),
        }
        normalized
    }

    pub fn clear_filter(&self) {
        self.dispatch(Action::UpdateValueFilter(None));
    }

    /// Leaves visible for the current selection and filter.
    ///
    /// `None` means nothing selectable is selected.
    pub fn visible_leaves(&self) -> Option<Vec<TreeNode>> {
        let state = self.read();
        filter_leaves(&state.data, state.selection.as_deref(), state.value_filter)
            .map(|leaves| leaves.into_iter().cloned().collect())
    }
}
