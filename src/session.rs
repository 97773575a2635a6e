use crate::aggregator::Aggregator;
use crate::bulk::{BulkApply, Selection};
use crate::config::BudgetConfig;
use crate::demo::seed_demo_values;
use crate::editor::{apply_edit, TreeEdit};
use crate::error::Result;
use crate::month::{MonthColumn, MonthKey, MonthRange};
use crate::schema::{BudgetBook, CategoryKind};
use crate::sheet::BudgetSheet;
use crate::sync::{reconcile, verify_grid};
use log::{debug, info, warn};

/// Owns the current book and the bulk-apply state on behalf of the
/// presentation layer.
///
/// Every mutating call swaps in a new book; callers holding an earlier
/// snapshot can compare it with [`BudgetBook::same_snapshot`] to see whether
/// anything changed.
#[derive(Debug, Clone)]
pub struct BudgetSession {
    config: BudgetConfig,
    book: BudgetBook,
    bulk: BulkApply,
}

impl Default for BudgetSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetSession {
    /// A session over the current calendar year with one empty income parent.
    pub fn new() -> Self {
        Self::build(BudgetConfig::default())
    }

    pub fn with_config(config: BudgetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: BudgetConfig) -> Self {
        let range = config.range();
        let mut book = BudgetBook::new(range);
        for _ in 0..config.initial_income_parents {
            book = book.add_parent(CategoryKind::Income);
        }
        for _ in 0..config.initial_expense_parents {
            book = book.add_parent(CategoryKind::Expense);
        }

        info!(
            "Created budget session for {}..{} ({} months)",
            range.start,
            range.end,
            range.month_count()
        );

        let mut session = Self {
            config,
            book,
            bulk: BulkApply::new(),
        };
        session.sync();
        session
    }

    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }

    pub fn book(&self) -> &BudgetBook {
        &self.book
    }

    pub fn range(&self) -> MonthRange {
        self.book.range()
    }

    pub fn months(&self) -> Vec<MonthKey> {
        self.book.months()
    }

    pub fn columns(&self) -> Vec<MonthColumn> {
        self.book.columns()
    }

    pub fn month_count(&self) -> usize {
        self.book.month_count()
    }

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.book)
    }

    pub fn sheet(&self) -> BudgetSheet {
        BudgetSheet::from_book(&self.book)
    }

    pub fn verify(&self) -> Result<()> {
        verify_grid(&self.book)
    }

    /// Handles the start-month picker. Returns false when the input is not a
    /// valid "YYYY-MM" month and nothing changed.
    pub fn on_start_change(&mut self, input: &str) -> bool {
        match MonthKey::parse_input(input) {
            Ok(start) => {
                let range = MonthRange::new(start, self.book.range().end);
                self.set_range(range);
                true
            }
            Err(e) => {
                warn!("Ignoring start month change: {}", e);
                false
            }
        }
    }

    /// Handles the end-month picker. Returns false when the input is not a
    /// valid "YYYY-MM" month and nothing changed.
    pub fn on_end_change(&mut self, input: &str) -> bool {
        match MonthKey::parse_input(input) {
            Ok(end) => {
                let range = MonthRange::new(self.book.range().start, end);
                self.set_range(range);
                true
            }
            Err(e) => {
                warn!("Ignoring end month change: {}", e);
                false
            }
        }
    }

    pub fn set_range(&mut self, range: MonthRange) {
        info!(
            "Month range changed to {}..{} ({} months)",
            range.start,
            range.end,
            range.month_count()
        );
        self.book = self.book.set_range(range);
        self.sync();
    }

    /// Applies one tree or cell edit.
    pub fn apply(&mut self, edit: &TreeEdit) {
        self.book = apply_edit(&self.book, edit);
        if let TreeEdit::SetRange { .. } = edit {
            self.sync();
        }
    }

    pub fn add_parent(&mut self, kind: CategoryKind) {
        self.book = self.book.add_parent(kind);
    }

    pub fn add_subcategory(&mut self, kind: CategoryKind, parent_index: usize) {
        self.book = self.book.add_subcategory(kind, parent_index);
    }

    pub fn rename_parent(&mut self, kind: CategoryKind, parent_index: usize, new_name: &str) {
        self.book = self.book.rename_parent(kind, parent_index, new_name);
    }

    /// Renames a subcategory. Its values are reset to zero as part of the
    /// rename.
    pub fn rename_subcategory(
        &mut self,
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
        new_name: &str,
    ) {
        self.book = self
            .book
            .rename_subcategory(kind, parent_index, sub_index, new_name);
    }

    pub fn remove_subcategory(&mut self, kind: CategoryKind, parent_index: usize, sub_index: usize) {
        self.book = self.book.remove_subcategory(kind, parent_index, sub_index);
    }

    pub fn remove_parent(&mut self, kind: CategoryKind, parent_index: usize) {
        self.book = self.book.remove_parent(kind, parent_index);
    }

    pub fn set_cell_value(
        &mut self,
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
        month_index: usize,
        raw_text: &str,
    ) {
        self.book = self
            .book
            .set_cell_value(kind, parent_index, sub_index, month_index, raw_text);
    }

    /// Arms bulk apply with the cell the user picked.
    pub fn select_cell(
        &mut self,
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
        value: f64,
    ) {
        self.bulk.arm(Selection {
            kind,
            parent_index,
            sub_index,
            value,
        });
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.bulk.selection()
    }

    pub fn dismiss_selection(&mut self) {
        self.bulk.dismiss();
    }

    /// Copies the selected value into every month of the selected row.
    pub fn apply_all(&mut self) {
        self.book = self.bulk.apply_all(&self.book);
    }

    fn sync(&mut self) {
        self.book = reconcile(&self.book);
        if self.config.seed_demo_values {
            self.book = seed_demo_values(&self.book);
        }
        debug!("Synchronized grid to {} months", self.book.month_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(start: &str, end: &str) -> BudgetConfig {
        BudgetConfig {
            start: Some(MonthKey::parse_input(start).unwrap()),
            end: Some(MonthKey::parse_input(end).unwrap()),
            ..BudgetConfig::default()
        }
    }

    #[test]
    fn test_new_session_defaults() {
        let session = BudgetSession::new();
        assert_eq!(session.month_count(), 12);
        assert_eq!(session.book().income().len(), 1);
        assert!(session.book().expense().is_empty());
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_with_config_rejects_inverted_range() {
        assert!(BudgetSession::with_config(config("2025-05", "2025-01")).is_err());
    }

    #[test]
    fn test_invalid_month_input_is_ignored() {
        let mut session = BudgetSession::with_config(config("2025-01", "2025-03")).unwrap();
        let before = session.book().clone();

        assert!(!session.on_start_change(""));
        assert!(!session.on_end_change("not-a-month"));
        assert!(session.book().same_snapshot(&before));
    }

    #[test]
    fn test_range_change_resizes_rows() {
        let mut session = BudgetSession::with_config(config("2025-01", "2025-03")).unwrap();
        session.add_subcategory(CategoryKind::Income, 0);
        session.set_cell_value(CategoryKind::Income, 0, 0, 0, "10");

        assert!(session.on_end_change("2025-05"));
        assert_eq!(session.month_count(), 5);
        assert_eq!(
            session.book().subcategory(CategoryKind::Income, 0, 0).unwrap().values,
            vec![10.0, 0.0, 0.0, 0.0, 0.0]
        );

        assert!(session.on_start_change("2025-06"));
        assert_eq!(session.month_count(), 0);
        assert!(session.verify().is_ok());
    }

    #[test]
    fn test_select_and_apply_all() {
        let mut session = BudgetSession::with_config(config("2025-01", "2025-04")).unwrap();
        session.add_subcategory(CategoryKind::Income, 0);
        session.select_cell(CategoryKind::Income, 0, 0, 250.0);
        session.apply_all();

        assert_eq!(
            session.book().subcategory(CategoryKind::Income, 0, 0).unwrap().values,
            vec![250.0; 4]
        );
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_seeding_runs_on_sync() {
        let mut session = BudgetSession::with_config(BudgetConfig {
            seed_demo_values: true,
            ..config("2025-01", "2025-02")
        })
        .unwrap();
        session.add_subcategory(CategoryKind::Income, 0);
        session.add_subcategory(CategoryKind::Income, 0);
        assert_eq!(session.aggregator().total_income(0), 0.0);

        session.set_range(session.range());
        assert_eq!(session.aggregator().total_income(0), 200.0);
        assert_eq!(session.aggregator().total_income(1), 600.0);
    }

    #[test]
    fn test_apply_edit() {
        let mut session = BudgetSession::with_config(config("2025-01", "2025-02")).unwrap();
        session.apply(&TreeEdit::RenameParent {
            kind: CategoryKind::Income,
            parent_index: 0,
            new_name: "Wages".to_string(),
        });
        assert_eq!(session.book().income()[0].name, "Wages");
    }
}
