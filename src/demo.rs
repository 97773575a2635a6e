use crate::schema::{BudgetBook, CategoryKind};
use log::info;

/// Example figures for the first two months of each seeded parent.
///
/// A parent is seeded only when it has at least as many subcategories as
/// listed here.
const DEMO_ROWS: &[(CategoryKind, usize, &[[f64; 2]])] = &[
    (CategoryKind::Income, 0, &[[200.0, 400.0], [0.0, 200.0]]),
    (CategoryKind::Income, 1, &[[500.0, 550.0], [500.0, 600.0]]),
    (CategoryKind::Expense, 0, &[[100.0, 200.0], [200.0, 400.0]]),
    (
        CategoryKind::Expense,
        1,
        &[[100.0, 120.0], [80.0, 80.0], [20.0, 0.0]],
    ),
];

/// True when no income cell holds a non-zero value.
pub fn income_is_blank(book: &BudgetBook) -> bool {
    book.income()
        .iter()
        .flat_map(|p| p.subcategories.iter())
        .all(|s| s.values.iter().all(|v| *v == 0.0))
}

/// Fills a blank budget with example numbers so a new grid is not empty.
///
/// Does nothing when the range has no months or any income cell is already
/// non-zero. Only the first two months are touched; with a single month only
/// the first figure of each pair is written.
pub fn seed_demo_values(book: &BudgetBook) -> BudgetBook {
    let count = book.month_count();
    if count == 0 || !income_is_blank(book) {
        return book.clone();
    }

    let mut next = book.clone();
    let mut seeded = 0usize;

    for (kind, parent_index, rows) in DEMO_ROWS {
        let Some(parent) = book.parent(*kind, *parent_index) else {
            continue;
        };
        if parent.subcategories.len() < rows.len() {
            continue;
        }

        for (sub_index, pair) in rows.iter().enumerate() {
            if let Some(sub) = next.subcategory_mut(*kind, *parent_index, sub_index) {
                for (month_index, value) in pair.iter().take(count).enumerate() {
                    if let Some(cell) = sub.values.get_mut(month_index) {
                        *cell = *value;
                    }
                }
            }
        }
        seeded += 1;
    }

    if seeded == 0 {
        return book.clone();
    }

    info!("Seeded demo values into {} parent categories", seeded);
    next
}
