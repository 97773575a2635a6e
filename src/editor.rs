use crate::month::MonthRange;
use crate::schema::{BudgetBook, CategoryKind, ParentCategory, SubCategory};
use crate::sync::reconcile;
use crate::utils::parse_cell_value;
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single edit to the category tree or value grid.
///
/// Edits that reference a parent, subcategory or month that does not exist
/// are silent no-ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TreeEdit {
    /// Append an empty, unnamed parent category.
    AddParent { kind: CategoryKind },

    /// Append an unnamed subcategory with a zero for every month.
    AddSubcategory {
        kind: CategoryKind,
        parent_index: usize,
    },

    /// Rename a parent. Its subcategories are untouched.
    RenameParent {
        kind: CategoryKind,
        parent_index: usize,
        new_name: String,
    },

    /// Rename a subcategory. This also resets every value in the row to zero.
    RenameSubcategory {
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
        new_name: String,
    },

    /// Delete a subcategory. Later subcategories shift down one index.
    RemoveSubcategory {
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
    },

    /// Delete a parent with all its subcategories.
    RemoveParent {
        kind: CategoryKind,
        parent_index: usize,
    },

    /// Parse free-text input and write it into one cell.
    SetCellValue {
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
        month_index: usize,
        #[schemars(description = "Raw user input, e.g. '1.250,00' or '-40'")]
        raw_text: String,
    },

    /// Replace the month range and resize every row to match.
    SetRange { range: MonthRange },
}

/// Applies one edit, returning a new book. `book` itself is never modified.
pub fn apply_edit(book: &BudgetBook, edit: &TreeEdit) -> BudgetBook {
    match edit {
        TreeEdit::AddParent { kind } => {
            let mut next = book.clone();
            next.forest_mut(*kind).push(ParentCategory::default());
            next
        }

        TreeEdit::AddSubcategory { kind, parent_index } => {
            if book.parent(*kind, *parent_index).is_none() {
                return ignore(book, edit);
            }
            let count = book.month_count();
            let mut next = book.clone();
            if let Some(parent) = next.forest_mut(*kind).get_mut(*parent_index) {
                parent.subcategories.push(SubCategory::zeroed(count));
            }
            reconcile(&next)
        }

        TreeEdit::RenameParent {
            kind,
            parent_index,
            new_name,
        } => {
            if book.parent(*kind, *parent_index).is_none() {
                return ignore(book, edit);
            }
            let mut next = book.clone();
            if let Some(parent) = next.forest_mut(*kind).get_mut(*parent_index) {
                parent.name = new_name.clone();
            }
            next
        }

        TreeEdit::RenameSubcategory {
            kind,
            parent_index,
            sub_index,
            new_name,
        } => {
            if book.subcategory(*kind, *parent_index, *sub_index).is_none() {
                return ignore(book, edit);
            }
            let count = book.month_count();
            let mut next = book.clone();
            if let Some(sub) = next.subcategory_mut(*kind, *parent_index, *sub_index) {
                // The row is rebuilt from scratch on rename, values included.
                *sub = SubCategory {
                    name: new_name.clone(),
                    values: vec![0.0; count],
                };
            }
            next
        }

        TreeEdit::RemoveSubcategory {
            kind,
            parent_index,
            sub_index,
        } => {
            if book.subcategory(*kind, *parent_index, *sub_index).is_none() {
                return ignore(book, edit);
            }
            let mut next = book.clone();
            if let Some(parent) = next.forest_mut(*kind).get_mut(*parent_index) {
                parent.subcategories.remove(*sub_index);
            }
            reconcile(&next)
        }

        TreeEdit::RemoveParent { kind, parent_index } => {
            if book.parent(*kind, *parent_index).is_none() {
                return ignore(book, edit);
            }
            let mut next = book.clone();
            next.forest_mut(*kind).remove(*parent_index);
            next
        }

        TreeEdit::SetCellValue {
            kind,
            parent_index,
            sub_index,
            month_index,
            raw_text,
        } => {
            if book
                .cell(*kind, *parent_index, *sub_index, *month_index)
                .is_none()
            {
                return ignore(book, edit);
            }
            let value = parse_cell_value(raw_text);
            let mut next = book.clone();
            if let Some(cell) = next
                .subcategory_mut(*kind, *parent_index, *sub_index)
                .and_then(|sub| sub.values.get_mut(*month_index))
            {
                *cell = value;
            }
            next
        }

        TreeEdit::SetRange { range } => {
            debug!(
                "Range set to {}..{} ({} months)",
                range.start,
                range.end,
                range.month_count()
            );
            let mut next = book.clone();
            next.set_range_unsynced(*range);
            reconcile(&next)
        }
    }
}

/// Applies edits in order, each one against the result of the previous.
pub fn apply_edits(book: &BudgetBook, edits: &[TreeEdit]) -> BudgetBook {
    edits
        .iter()
        .fold(book.clone(), |current, edit| apply_edit(&current, edit))
}

fn ignore(book: &BudgetBook, edit: &TreeEdit) -> BudgetBook {
    warn!("Ignoring edit with out-of-bounds reference: {:?}", edit);
    book.clone()
}

impl BudgetBook {
    pub fn add_parent(&self, kind: CategoryKind) -> BudgetBook {
        apply_edit(self, &TreeEdit::AddParent { kind })
    }

    pub fn add_subcategory(&self, kind: CategoryKind, parent_index: usize) -> BudgetBook {
        apply_edit(self, &TreeEdit::AddSubcategory { kind, parent_index })
    }

    pub fn rename_parent(
        &self,
        kind: CategoryKind,
        parent_index: usize,
        new_name: impl Into<String>,
    ) -> BudgetBook {
        apply_edit(
            self,
            &TreeEdit::RenameParent {
                kind,
                parent_index,
                new_name: new_name.into(),
            },
        )
    }

    pub fn rename_subcategory(
        &self,
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
        new_name: impl Into<String>,
    ) -> BudgetBook {
        apply_edit(
            self,
            &TreeEdit::RenameSubcategory {
                kind,
                parent_index,
                sub_index,
                new_name: new_name.into(),
            },
        )
    }

    pub fn remove_subcategory(
        &self,
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
    ) -> BudgetBook {
        apply_edit(
            self,
            &TreeEdit::RemoveSubcategory {
                kind,
                parent_index,
                sub_index,
            },
        )
    }

    pub fn remove_parent(&self, kind: CategoryKind, parent_index: usize) -> BudgetBook {
        apply_edit(self, &TreeEdit::RemoveParent { kind, parent_index })
    }

    pub fn set_cell_value(
        &self,
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
        month_index: usize,
        raw_text: &str,
    ) -> BudgetBook {
        apply_edit(
            self,
            &TreeEdit::SetCellValue {
                kind,
                parent_index,
                sub_index,
                month_index,
                raw_text: raw_text.to_string(),
            },
        )
    }

    pub fn set_range(&self, range: MonthRange) -> BudgetBook {
        apply_edit(self, &TreeEdit::SetRange { range })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::MonthKey;
    use crate::sync::verify_grid;

    const INCOME: CategoryKind = CategoryKind::Income;
    const EXPENSE: CategoryKind = CategoryKind::Expense;

    fn range(start: (i32, u32), end: (i32, u32)) -> MonthRange {
        MonthRange::new(
            MonthKey::new(start.0, start.1).unwrap(),
            MonthKey::new(end.0, end.1).unwrap(),
        )
    }

    fn three_month_book() -> BudgetBook {
        BudgetBook::new(range((2025, 1), (2025, 3)))
            .add_parent(INCOME)
            .add_subcategory(INCOME, 0)
            .add_subcategory(INCOME, 0)
    }

    #[test]
    fn test_add_parent_and_subcategory() {
        let book = three_month_book();

        let parent = book.parent(INCOME, 0).unwrap();
        assert_eq!(parent.name, "");
        assert_eq!(parent.subcategories.len(), 2);
        assert_eq!(parent.subcategories[0].values, vec![0.0, 0.0, 0.0]);
        assert!(book.expense().is_empty());
    }

    #[test]
    fn test_edits_leave_previous_book_untouched() {
        let before = three_month_book();
        let after = before.set_cell_value(INCOME, 0, 1, 2, "12");

        assert_eq!(before.cell(INCOME, 0, 1, 2), Some(0.0));
        assert_eq!(after.cell(INCOME, 0, 1, 2), Some(12.0));
        assert!(!before.same_snapshot(&after));
    }

    #[test]
    fn test_rename_parent_keeps_values() {
        let book = three_month_book()
            .set_cell_value(INCOME, 0, 0, 0, "100")
            .rename_parent(INCOME, 0, "Salary");

        assert_eq!(book.parent(INCOME, 0).unwrap().name, "Salary");
        assert_eq!(book.cell(INCOME, 0, 0, 0), Some(100.0));
    }

    #[test]
    fn test_rename_subcategory_resets_values() {
        let book = three_month_book()
            .set_cell_value(INCOME, 0, 0, 0, "100")
            .set_cell_value(INCOME, 0, 0, 2, "-5")
            .rename_subcategory(INCOME, 0, 0, "Consulting");

        let sub = book.subcategory(INCOME, 0, 0).unwrap();
        assert_eq!(sub.name, "Consulting");
        assert_eq!(sub.values, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_remove_subcategory_shifts_indices() {
        let book = three_month_book()
            .add_subcategory(INCOME, 0)
            .rename_subcategory(INCOME, 0, 2, "Third")
            .remove_subcategory(INCOME, 0, 1);

        let parent = book.parent(INCOME, 0).unwrap();
        assert_eq!(parent.subcategories.len(), 2);
        assert_eq!(parent.subcategories[1].name, "Third");
    }

    #[test]
    fn test_remove_parent() {
        let book = three_month_book()
            .add_parent(INCOME)
            .rename_parent(INCOME, 1, "Other")
            .remove_parent(INCOME, 0);

        assert_eq!(book.income().len(), 1);
        assert_eq!(book.parent(INCOME, 0).unwrap().name, "Other");
    }

    #[test]
    fn test_out_of_bounds_edits_are_noops() {
        let book = three_month_book();

        let edits = [
            TreeEdit::AddSubcategory {
                kind: EXPENSE,
                parent_index: 0,
            },
            TreeEdit::RenameParent {
                kind: INCOME,
                parent_index: 4,
                new_name: "Ghost".to_string(),
            },
            TreeEdit::RenameSubcategory {
                kind: INCOME,
                parent_index: 0,
                sub_index: 9,
                new_name: "Ghost".to_string(),
            },
            TreeEdit::RemoveSubcategory {
                kind: INCOME,
                parent_index: 0,
                sub_index: 2,
            },
            TreeEdit::RemoveParent {
                kind: EXPENSE,
                parent_index: 0,
            },
            TreeEdit::SetCellValue {
                kind: INCOME,
                parent_index: 0,
                sub_index: 0,
                month_index: 3,
                raw_text: "50".to_string(),
            },
        ];

        for edit in &edits {
            let after = apply_edit(&book, edit);
            assert!(after.same_snapshot(&book), "Edit was not a no-op: {:?}", edit);
        }
    }

    #[test]
    fn test_set_cell_value_parses_input() {
        let book = three_month_book()
            .set_cell_value(INCOME, 0, 0, 0, "1,5")
            .set_cell_value(INCOME, 0, 0, 1, "--")
            .set_cell_value(INCOME, 0, 0, 2, "");

        assert_eq!(
            book.subcategory(INCOME, 0, 0).unwrap().values,
            vec![1.5, 0.0, 0.0]
        );
    }

    #[test]
    fn test_set_range_resizes_rows() {
        let book = three_month_book()
            .set_cell_value(INCOME, 0, 0, 2, "30")
            .set_range(range((2025, 1), (2025, 6)));

        assert_eq!(book.month_count(), 6);
        assert_eq!(
            book.subcategory(INCOME, 0, 0).unwrap().values,
            vec![0.0, 0.0, 30.0, 0.0, 0.0, 0.0]
        );
        assert!(verify_grid(&book).is_ok());
    }

    #[test]
    fn test_new_subcategory_after_range_change_matches_width() {
        let book = three_month_book()
            .set_range(range((2024, 11), (2025, 2)))
            .add_parent(EXPENSE)
            .add_subcategory(EXPENSE, 0);

        assert_eq!(book.subcategory(EXPENSE, 0, 0).unwrap().values.len(), 4);
        assert!(verify_grid(&book).is_ok());
    }

    #[test]
    fn test_apply_edits_from_json() {
        let json = r#"[
            {"action": "add_parent", "kind": "expense"},
            {"action": "rename_parent", "kind": "expense", "parent_index": 0, "new_name": "Rent"},
            {"action": "add_subcategory", "kind": "expense", "parent_index": 0},
            {"action": "set_cell_value", "kind": "expense", "parent_index": 0, "sub_index": 0, "month_index": 1, "raw_text": "950"}
        ]"#;
        let edits: Vec<TreeEdit> = serde_json::from_str(json).unwrap();

        let book = apply_edits(&BudgetBook::new(range((2025, 1), (2025, 3))), &edits);
        assert_eq!(book.parent(EXPENSE, 0).unwrap().name, "Rent");
        assert_eq!(book.cell(EXPENSE, 0, 0, 1), Some(950.0));
    }
}
