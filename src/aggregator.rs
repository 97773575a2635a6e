use crate::schema::{BudgetBook, CategoryKind, ParentCategory};
use log::debug;

/// Read-only roll-ups over a book. Nothing is cached; every call recomputes
/// from the current rows.
///
/// Month indices past the end of a row read as `0.0`.
pub struct Aggregator<'a> {
    book: &'a BudgetBook,
}

impl<'a> Aggregator<'a> {
    pub fn new(book: &'a BudgetBook) -> Self {
        Self { book }
    }

    pub fn month_count(&self) -> usize {
        self.book.month_count()
    }

    pub fn subtotal(&self, parent: &ParentCategory, month_index: usize) -> f64 {
        subtotal(parent, month_index)
    }

    pub fn total(&self, kind: CategoryKind, month_index: usize) -> f64 {
        self.book
            .parents(kind)
            .iter()
            .map(|p| subtotal(p, month_index))
            .sum()
    }

    pub fn total_income(&self, month_index: usize) -> f64 {
        self.total(CategoryKind::Income, month_index)
    }

    pub fn total_expense(&self, month_index: usize) -> f64 {
        self.total(CategoryKind::Expense, month_index)
    }

    pub fn profit_loss(&self, month_index: usize) -> f64 {
        self.total_income(month_index) - self.total_expense(month_index)
    }

    /// Sum of profit/loss over every month before `month_index`.
    pub fn opening_balance(&self, month_index: usize) -> f64 {
        if month_index == 0 {
            return 0.0;
        }
        let mut running = 0.0;
        for i in 0..month_index {
            running += self.profit_loss(i);
        }
        running
    }

    pub fn closing_balance(&self, month_index: usize) -> f64 {
        self.opening_balance(month_index) + self.profit_loss(month_index)
    }

    pub fn subtotal_row(&self, parent: &ParentCategory) -> Vec<f64> {
        (0..self.month_count())
            .map(|i| subtotal(parent, i))
            .collect()
    }

    pub fn total_row(&self, kind: CategoryKind) -> Vec<f64> {
        (0..self.month_count()).map(|i| self.total(kind, i)).collect()
    }

    pub fn profit_loss_row(&self) -> Vec<f64> {
        (0..self.month_count())
            .map(|i| self.profit_loss(i))
            .collect()
    }

    /// Opening balances for every month in one pass. Matches
    /// `opening_balance(i)` element for element.
    pub fn opening_balance_row(&self) -> Vec<f64> {
        let profit_loss = self.profit_loss_row();
        let mut row = Vec::with_capacity(profit_loss.len());
        let mut running = 0.0;
        for pl in profit_loss {
            row.push(running);
            running += pl;
        }
        row
    }

    pub fn closing_balance_row(&self) -> Vec<f64> {
        let profit_loss = self.profit_loss_row();
        let mut row = Vec::with_capacity(profit_loss.len());
        let mut running = 0.0;
        for pl in profit_loss {
            running += pl;
            row.push(running);
        }
        debug!(
            "Computed closing balances for {} months, final {}",
            row.len(),
            row.last().copied().unwrap_or(0.0)
        );
        row
    }
}

pub fn subtotal(parent: &ParentCategory, month_index: usize) -> f64 {
    parent
        .subcategories
        .iter()
        .map(|s| s.values.get(month_index).copied().unwrap_or(0.0))
        .sum()
}
