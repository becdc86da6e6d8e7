use std::collections::BTreeMap;

use crate::view_model::{ActionView, PageViewModel, RowView, ACTION_HEADER};
use crate::JobId;

/// Content-derived identity for one table row, stable across re-scans of an
/// unchanged row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey(String);

impl RowKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One resolved, ready-to-render log link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLink {
    pub label: String,
    pub href: String,
}

/// Augmentation lifecycle of one row. A key is bound exactly once; the
/// binding itself then walks this state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowBinding {
    /// No job id could be extracted. Terminal placeholder, no retry.
    Unavailable,
    /// Action control attached and waiting for the user.
    Ready(JobId),
    /// Lookup in flight; the control is disabled.
    Fetching(JobId),
    /// Links rendered; the control is gone.
    Rendered(Vec<LogLink>),
    /// Lookup failed; the message replaces the control.
    Failed(String),
}

/// Shape of the currently visible jobs table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableShape {
    pub headers: Vec<String>,
    pub job_id_column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageState {
    table: Option<TableShape>,
    bindings: BTreeMap<RowKey, RowBinding>,
    /// Keys and cell texts in last-scan document order.
    visible: Vec<(RowKey, Vec<String>)>,
    dirty: bool,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binding(&self, key: &RowKey) -> Option<&RowBinding> {
        self.bindings.get(key)
    }

    pub fn bindings(&self) -> &BTreeMap<RowKey, RowBinding> {
        &self.bindings
    }

    /// Returns whether the state changed since the last call, and resets
    /// the flag. Drives render coalescing in the app loop.
    pub fn consume_dirty(&mut self) -> bool {
        let was = self.dirty;
        self.dirty = false;
        was
    }

    pub(crate) fn set_table(&mut self, table: Option<TableShape>) {
        if self.table != table {
            self.table = table;
            self.dirty = true;
        }
    }

    pub(crate) fn set_visible(&mut self, visible: Vec<(RowKey, Vec<String>)>) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty = true;
        }
    }

    /// Binds a key, unless it is already bound. Returns whether the binding
    /// was inserted. The contains-check runs before any mutation so that
    /// repeated scans of the same row are no-ops.
    pub(crate) fn bind_row(&mut self, key: RowKey, binding: RowBinding) -> bool {
        if self.bindings.contains_key(&key) {
            return false;
        }
        self.bindings.insert(key, binding);
        self.dirty = true;
        true
    }

    pub(crate) fn set_binding(&mut self, key: RowKey, binding: RowBinding) {
        self.bindings.insert(key, binding);
        self.dirty = true;
    }

    pub fn view(&self) -> PageViewModel {
        let Some(table) = &self.table else {
            return PageViewModel::default();
        };
        let mut headers = table.headers.clone();
        // Append-only: never insert at a computed index.
        if !headers.iter().any(|h| h.eq_ignore_ascii_case(ACTION_HEADER)) {
            headers.push(ACTION_HEADER.to_string());
        }
        let rows = self
            .visible
            .iter()
            .map(|(key, cells)| RowView {
                key: key.clone(),
                cells: cells.clone(),
                action: self.action_view(key),
            })
            .collect();
        PageViewModel { headers, rows }
    }

    fn action_view(&self, key: &RowKey) -> ActionView {
        match self.bindings.get(key) {
            None | Some(RowBinding::Unavailable) => ActionView::Unavailable,
            Some(RowBinding::Ready(_)) => ActionView::Fetch,
            Some(RowBinding::Fetching(_)) => ActionView::Loading,
            Some(RowBinding::Rendered(links)) => ActionView::Links(links.clone()),
            Some(RowBinding::Failed(message)) => ActionView::Error(message.clone()),
        }
    }
}
