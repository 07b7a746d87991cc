//! page::form
//!
//! Form lifecycle states.
//!
//! A page's form is either closed (the user is browsing the list), open
//! on an empty snapshot (creating), or open on an existing entity
//! (editing). The mode is derived from the persisted flags rather than
//! stored, so a restored snapshot always reports a consistent mode.
//!
//! ```text
//! Browsing --activate_create--> Creating --save/cancel--> Browsing
//! Browsing --select_row-------> Editing  --save/cancel--> Browsing
//! ```

use serde::Serialize;

use crate::core::types::{Entity, RowKey};

/// Form lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    /// No form open.
    Browsing,
    /// Empty form open for a new entity.
    Creating,
    /// Form open on a selected entity.
    Editing,
}

impl FormMode {
    /// Derive the mode from the form-active flag and the current selection.
    ///
    /// An active form with a selected row is editing that row; an active
    /// form without one is creating. A selection alone does not open the
    /// form until it is activated.
    pub fn derive(form_active: bool, selected: Option<&RowKey>, detail_present: bool) -> Self {
        match (form_active, selected.is_some() || detail_present) {
            (false, _) => FormMode::Browsing,
            (true, true) => FormMode::Editing,
            (true, false) => FormMode::Creating,
        }
    }

    /// Whether the form is open.
    pub fn is_open(&self) -> bool {
        !matches!(self, FormMode::Browsing)
    }
}

impl std::fmt::Display for FormMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormMode::Browsing => write!(f, "browsing"),
            FormMode::Creating => write!(f, "creating"),
            FormMode::Editing => write!(f, "editing"),
        }
    }
}

/// Form snapshot derived from a selected entity.
///
/// The snapshot edits the parent fields only; the nested collection is
/// handed to the staged child rows instead.
pub fn snapshot_of<T: Entity>(entity: &T) -> T {
    entity.without_children()
}
