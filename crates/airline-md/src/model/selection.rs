//! Selection model for list views.
//!
//! [`SelectionModel`] tracks which rows of a flat list are selected. It does
//! not notify anybody itself: every mutating call returns the
//! [`SelectionDelta`] it produced, and the owning view decides whether to
//! announce it (see [`ListView`](super::ListView)).
//!
//! # Example
//!
//! ```
//! use airline_md::model::{SelectionFlags, SelectionMode, SelectionModel};
//!
//! let mut selection = SelectionModel::new();
//! selection.set_selection_mode(SelectionMode::MultiSelection);
//!
//! selection.select(0, SelectionFlags::SELECT);
//! let delta = selection.select(2, SelectionFlags::SELECT);
//! assert_eq!(delta.selected, vec![2]);
//! assert_eq!(selection.selected_rows(), &[0, 2]);
//! ```

use serde::{Deserialize, Serialize};

/// Selection behavior mode for list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// No items can be selected.
    NoSelection,
    /// Only one item can be selected at a time (default).
    #[default]
    SingleSelection,
    /// Multiple items can be selected, each toggled independently.
    MultiSelection,
    /// Range selection extended by additional picks.
    ExtendedSelection,
}

impl SelectionMode {
    /// Returns false for [`SelectionMode::NoSelection`].
    pub fn allows_selection(self) -> bool {
        self != Self::NoSelection
    }
}

/// Flags controlling selection operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionFlags {
    /// Clear existing selection before applying operation.
    pub clear: bool,
    /// Select the specified row.
    pub select: bool,
    /// Deselect the specified row.
    pub deselect: bool,
    /// Toggle selection state of the specified row.
    pub toggle: bool,
}

impl SelectionFlags {
    /// No operation.
    pub const NONE: Self = Self::empty();

    /// Select the row.
    pub const SELECT: Self = Self {
        select: true,
        ..Self::empty()
    };

    /// Deselect the row.
    pub const DESELECT: Self = Self {
        deselect: true,
        ..Self::empty()
    };

    /// Toggle selection of the row.
    pub const TOGGLE: Self = Self {
        toggle: true,
        ..Self::empty()
    };

    /// Clear existing selection and select the row.
    pub const CLEAR_AND_SELECT: Self = Self {
        clear: true,
        select: true,
        ..Self::empty()
    };

    const fn empty() -> Self {
        Self {
            clear: false,
            select: false,
            deselect: false,
            toggle: false,
        }
    }
}

/// Rows whose selection state changed in one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionDelta {
    pub selected: Vec<usize>,
    pub deselected: Vec<usize>,
}

impl SelectionDelta {
    /// True if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.deselected.is_empty()
    }
}

/// Manages selection state for a flat list.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    /// Current selection mode.
    mode: SelectionMode,
    /// Selected rows in selection order.
    selected_rows: Vec<usize>,
}

impl SelectionModel {
    /// Creates a new selection model in single-selection mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a selection model with the given mode.
    pub fn with_mode(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected_rows: Vec::new(),
        }
    }

    // =========================================================================
    // Selection Mode
    // =========================================================================

    pub fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    /// Sets the selection mode.
    ///
    /// Changing mode does not clear existing selection, but subsequent
    /// selections follow the new mode's behavior.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    // =========================================================================
    // Selection Queries
    // =========================================================================

    pub fn is_selected(&self, row: usize) -> bool {
        self.selected_rows.contains(&row)
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_rows.is_empty()
    }

    pub fn selected_count(&self) -> usize {
        self.selected_rows.len()
    }

    /// Returns the selected rows in selection order.
    pub fn selected_rows(&self) -> &[usize] {
        &self.selected_rows
    }

    /// The first selected row, if any.
    pub fn first_selected(&self) -> Option<usize> {
        self.selected_rows.first().copied()
    }

    // =========================================================================
    // Selection Operations
    // =========================================================================

    /// Performs a selection operation on a row.
    ///
    /// - `clear`: Deselects all rows first
    /// - `select`: Adds the row to selection
    /// - `deselect`: Removes the row from selection
    /// - `toggle`: Toggles the selection state
    ///
    /// In [`SelectionMode::NoSelection`] nothing changes.
    pub fn select(&mut self, row: usize, flags: SelectionFlags) -> SelectionDelta {
        if !self.mode.allows_selection() {
            return SelectionDelta::default();
        }

        let before = self.selected_rows.clone();
        if flags.clear {
            self.selected_rows.clear();
        }

        let was_selected = self.is_selected(row);
        if flags.toggle {
            if was_selected {
                self.selected_rows.retain(|&r| r != row);
            } else {
                self.selected_rows.push(row);
            }
        } else if flags.select && !was_selected {
            self.selected_rows.push(row);
        } else if flags.deselect && was_selected {
            self.selected_rows.retain(|&r| r != row);
        }

        // Single selection keeps only the most recent pick.
        if self.mode == SelectionMode::SingleSelection && self.selected_rows.len() > 1 {
            let keep = self.selected_rows.len() - 1;
            self.selected_rows.drain(..keep);
        }

        SelectionDelta {
            selected: self
                .selected_rows
                .iter()
                .filter(|row| !before.contains(*row))
                .copied()
                .collect(),
            deselected: before
                .into_iter()
                .filter(|row| !self.selected_rows.contains(row))
                .collect(),
        }
    }

    /// Clears all selection.
    pub fn clear_selection(&mut self) -> SelectionDelta {
        SelectionDelta {
            selected: Vec::new(),
            deselected: std::mem::take(&mut self.selected_rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_model_creation() {
        let model = SelectionModel::new();
        assert_eq!(model.selection_mode(), SelectionMode::SingleSelection);
        assert!(!model.has_selection());
        assert_eq!(model.first_selected(), None);
    }

    #[test]
    fn test_single_selection_replaces() {
        let mut model = SelectionModel::new();

        model.select(0, SelectionFlags::SELECT);
        assert!(model.is_selected(0));

        let delta = model.select(1, SelectionFlags::SELECT);
        assert!(!model.is_selected(0));
        assert!(model.is_selected(1));
        assert_eq!(model.selected_count(), 1);
        assert_eq!(delta.selected, vec![1]);
        assert_eq!(delta.deselected, vec![0]);
    }

    #[test]
    fn test_reselecting_is_a_no_op() {
        let mut model = SelectionModel::new();
        model.select(3, SelectionFlags::SELECT);

        let delta = model.select(3, SelectionFlags::CLEAR_AND_SELECT);
        assert!(delta.is_empty());
        assert_eq!(model.selected_rows(), &[3]);
    }

    #[test]
    fn test_multi_selection() {
        let mut model = SelectionModel::with_mode(SelectionMode::MultiSelection);

        model.select(0, SelectionFlags::SELECT);
        model.select(1, SelectionFlags::SELECT);
        assert_eq!(model.selected_count(), 2);

        let delta = model.select(0, SelectionFlags::TOGGLE);
        assert_eq!(delta.deselected, vec![0]);
        assert_eq!(model.selected_rows(), &[1]);
    }

    #[test]
    fn test_deselect() {
        let mut model = SelectionModel::with_mode(SelectionMode::ExtendedSelection);
        model.select(4, SelectionFlags::SELECT);

        let delta = model.select(4, SelectionFlags::DESELECT);
        assert_eq!(delta.deselected, vec![4]);
        assert!(!model.has_selection());
    }

    #[test]
    fn test_no_selection_mode() {
        let mut model = SelectionModel::with_mode(SelectionMode::NoSelection);

        let delta = model.select(0, SelectionFlags::SELECT);
        assert!(delta.is_empty());
        assert!(!model.has_selection());
    }

    #[test]
    fn test_clear_selection() {
        let mut model = SelectionModel::with_mode(SelectionMode::MultiSelection);
        model.select(0, SelectionFlags::SELECT);
        model.select(5, SelectionFlags::SELECT);

        let delta = model.clear_selection();
        assert_eq!(delta.deselected, vec![0, 5]);
        assert!(!model.has_selection());
        assert!(model.clear_selection().is_empty());
    }
}
