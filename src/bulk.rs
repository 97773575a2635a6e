use crate::schema::{BudgetBook, CategoryKind};
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The cell most recently picked for "apply to all months".
///
/// Holds indices only, so a structural edit made after arming can leave it
/// pointing at a different row, or at nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Selection {
    pub kind: CategoryKind,
    pub parent_index: usize,
    pub sub_index: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BulkApplyState {
    #[default]
    Idle,
    Armed(Selection),
}

#[derive(Debug, Clone, Default)]
pub struct BulkApply {
    state: BulkApplyState,
}

impl BulkApply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BulkApplyState {
        self.state
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.state {
            BulkApplyState::Armed(selection) => Some(selection),
            BulkApplyState::Idle => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, BulkApplyState::Armed(_))
    }

    /// Arms with `selection`, replacing any earlier one.
    pub fn arm(&mut self, selection: Selection) {
        debug!(
            "Armed bulk apply on {} parent #{} sub #{} with {}",
            selection.kind, selection.parent_index, selection.sub_index, selection.value
        );
        self.state = BulkApplyState::Armed(selection);
    }

    pub fn dismiss(&mut self) {
        self.state = BulkApplyState::Idle;
    }

    /// Overwrites the whole selected row with the selected value and returns
    /// to idle. When idle, or when the selection no longer resolves to a row,
    /// the book comes back unchanged.
    pub fn apply_all(&mut self, book: &BudgetBook) -> BudgetBook {
        let selection = match std::mem::take(&mut self.state) {
            BulkApplyState::Armed(selection) => selection,
            BulkApplyState::Idle => return book.clone(),
        };
        fill_row(book, &selection)
    }
}

/// Replaces every value of the selected row with `selection.value`, sized to
/// the current month count.
pub fn fill_row(book: &BudgetBook, selection: &Selection) -> BudgetBook {
    if book
        .subcategory(selection.kind, selection.parent_index, selection.sub_index)
        .is_none()
    {
        warn!("Ignoring bulk apply on missing row: {:?}", selection);
        return book.clone();
    }

    let count = book.month_count();
    let mut next = book.clone();
    if let Some(sub) =
        next.subcategory_mut(selection.kind, selection.parent_index, selection.sub_index)
    {
        sub.values = vec![selection.value; count];
    }
    next
}
