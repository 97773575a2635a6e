use crate::error::{BudgetError, Result};
use crate::schema::{BudgetBook, CategoryKind, ParentCategory};
use log::debug;

const KINDS: [CategoryKind; 2] = [CategoryKind::Income, CategoryKind::Expense];

/// Resizes a value row to `count` positions.
///
/// Resizing is positional: surviving positions keep their value, new
/// positions are `0.0`, trailing positions are dropped. Values are not keyed
/// by month, so moving the range start shifts which month a value lands in.
pub fn resize_values(values: &[f64], count: usize) -> Vec<f64> {
    let mut resized = Vec::with_capacity(count);
    resized.extend(values.iter().take(count).copied());
    resized.resize(count, 0.0);
    resized
}

fn forest_needs_resize(parents: &[ParentCategory], count: usize) -> bool {
    parents
        .iter()
        .flat_map(|p| p.subcategories.iter())
        .any(|s| s.values.len() != count)
}

/// Brings every subcategory row in both forests to the resolved month count.
///
/// A forest that already conforms is left shared with the input book, so an
/// idle pass returns a book for which `same_snapshot` holds.
pub fn reconcile(book: &BudgetBook) -> BudgetBook {
    let count = book.month_count();
    let mut next = book.clone();

    for kind in KINDS {
        if !forest_needs_resize(book.parents(kind), count) {
            continue;
        }

        let mut resized_rows = 0usize;
        for parent in next.forest_mut(kind).iter_mut() {
            for sub in parent.subcategories.iter_mut() {
                if sub.values.len() != count {
                    sub.values = resize_values(&sub.values, count);
                    resized_rows += 1;
                }
            }
        }

        debug!(
            "Resized {} {} rows to {} months",
            resized_rows, kind, count
        );
    }

    next
}

/// Checks the grid invariant, reporting the first row whose length is off.
pub fn verify_grid(book: &BudgetBook) -> Result<()> {
    let expected = book.month_count();

    for kind in KINDS {
        for (parent_index, parent) in book.parents(kind).iter().enumerate() {
            for (sub_index, sub) in parent.subcategories.iter().enumerate() {
                if sub.values.len() != expected {
                    return Err(BudgetError::GridInvariantViolation {
                        kind,
                        parent_index,
                        sub_index,
                        expected,
                        actual: sub.values.len(),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::{MonthKey, MonthRange};
    use crate::schema::SubCategory;

    fn range(start: (i32, u32), end: (i32, u32)) -> MonthRange {
        MonthRange::new(
            MonthKey::new(start.0, start.1).unwrap(),
            MonthKey::new(end.0, end.1).unwrap(),
        )
    }

    fn single_row_book(range: MonthRange, values: Vec<f64>) -> BudgetBook {
        let mut book = BudgetBook::new(range);
        book.forest_mut(CategoryKind::Income).push(ParentCategory {
            name: "Sales".to_string(),
            subcategories: vec![SubCategory {
                name: "Retail".to_string(),
                values,
            }],
        });
        book
    }

    #[test]
    fn test_resize_values() {
        assert_eq!(resize_values(&[10.0, 20.0, 30.0], 2), vec![10.0, 20.0]);
        assert_eq!(resize_values(&[10.0, 20.0], 4), vec![10.0, 20.0, 0.0, 0.0]);
        assert_eq!(resize_values(&[1.0], 0), Vec::<f64>::new());
        assert_eq!(resize_values(&[], 3), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_shrink_then_grow_does_not_restore() {
        let book = single_row_book(range((2025, 1), (2025, 3)), vec![10.0, 20.0, 30.0]);

        let mut shrunk = book.clone();
        shrunk.set_range_unsynced(range((2025, 1), (2025, 2)));
        let shrunk = reconcile(&shrunk);
        assert_eq!(
            shrunk.subcategory(CategoryKind::Income, 0, 0).unwrap().values,
            vec![10.0, 20.0]
        );

        let mut grown = shrunk.clone();
        grown.set_range_unsynced(range((2025, 1), (2025, 4)));
        let grown = reconcile(&grown);
        assert_eq!(
            grown.subcategory(CategoryKind::Income, 0, 0).unwrap().values,
            vec![10.0, 20.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_start_shift_is_positional() {
        let mut book = single_row_book(range((2025, 1), (2025, 3)), vec![1.0, 2.0, 3.0]);
        book.set_range_unsynced(range((2025, 2), (2025, 4)));
        let book = reconcile(&book);

        // Same length, so nothing moves: January's value now sits under February.
        assert_eq!(
            book.subcategory(CategoryKind::Income, 0, 0).unwrap().values,
            vec![1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut book = single_row_book(range((2025, 1), (2025, 3)), vec![7.0]);
        book.forest_mut(CategoryKind::Expense).push(ParentCategory {
            name: "Costs".to_string(),
            subcategories: vec![SubCategory::zeroed(5)],
        });

        let once = reconcile(&book);
        let twice = reconcile(&once);

        assert_eq!(once, twice);
        assert!(once.same_snapshot(&twice));
        assert!(verify_grid(&twice).is_ok());
    }

    #[test]
    fn test_reconcile_leaves_conforming_forest_shared() {
        let mut book = single_row_book(range((2025, 1), (2025, 2)), vec![1.0, 2.0]);
        book.forest_mut(CategoryKind::Expense).push(ParentCategory {
            name: "Costs".to_string(),
            subcategories: vec![SubCategory::zeroed(1)],
        });

        let synced = reconcile(&book);
        assert!(!synced.same_snapshot(&book));
        assert_eq!(synced.income(), book.income());
        assert_eq!(
            synced.subcategory(CategoryKind::Expense, 0, 0).unwrap().values,
            vec![0.0, 0.0]
        );
    }

    #[test]
    fn test_inverted_range_empties_rows() {
        let mut book = single_row_book(range((2025, 1), (2025, 2)), vec![1.0, 2.0]);
        book.set_range_unsynced(range((2025, 5), (2025, 1)));
        let book = reconcile(&book);
        assert!(book
            .subcategory(CategoryKind::Income, 0, 0)
            .unwrap()
            .values
            .is_empty());
    }

    #[test]
    fn test_verify_grid_reports_violation() {
        let book = single_row_book(range((2025, 1), (2025, 3)), vec![1.0]);

        match verify_grid(&book) {
            Err(BudgetError::GridInvariantViolation {
                kind,
                parent_index,
                sub_index,
                expected,
                actual,
            }) => {
                assert_eq!(kind, CategoryKind::Income);
                assert_eq!(parent_index, 0);
                assert_eq!(sub_index, 0);
                assert_eq!(expected, 3);
                assert_eq!(actual, 1);
            }
            other => panic!("Expected grid violation, got {:?}", other),
        }
    }
}
