use crate::month::{month_columns, resolve, MonthColumn, MonthKey, MonthRange};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    #[schemars(description = "Money coming in: salaries, sales, interest")]
    Income,

    #[schemars(description = "Money going out: rent, wages, supplies")]
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SubCategory {
    #[schemars(description = "Row label, e.g. 'Rent' or 'Consulting'")]
    pub name: String,

    #[schemars(
        description = "One value per resolved month, in month order. Always as long as the resolved month list."
    )]
    pub values: Vec<f64>,
}

impl SubCategory {
    /// An empty-named row of zeros, one per month.
    pub fn zeroed(month_count: usize) -> Self {
        Self {
            name: String::new(),
            values: vec![0.0; month_count],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ParentCategory {
    #[schemars(description = "Group label, e.g. 'Operating Costs'")]
    pub name: String,

    #[schemars(description = "Ordered rows belonging to this group")]
    pub subcategories: Vec<SubCategory>,
}

/// The whole budget: two independent category forests and the month range.
///
/// Each forest sits behind an `Arc`. Edits clone the book (cheap) and then
/// clone-on-write only the forest they touch, so earlier books stay valid and
/// untouched forests stay pointer-identical.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct BudgetBook {
    income: Arc<Vec<ParentCategory>>,
    expense: Arc<Vec<ParentCategory>>,
    range: MonthRange,
}

impl BudgetBook {
    pub fn new(range: MonthRange) -> Self {
        Self {
            income: Arc::new(Vec::new()),
            expense: Arc::new(Vec::new()),
            range,
        }
    }

    /// Builds a book from existing forests, resizing every row to the range.
    pub fn from_parts(
        range: MonthRange,
        income: Vec<ParentCategory>,
        expense: Vec<ParentCategory>,
    ) -> Self {
        let book = Self {
            income: Arc::new(income),
            expense: Arc::new(expense),
            range,
        };
        crate::sync::reconcile(&book)
    }

    pub fn range(&self) -> MonthRange {
        self.range
    }

    pub fn months(&self) -> Vec<MonthKey> {
        resolve(&self.range)
    }

    pub fn month_count(&self) -> usize {
        self.range.month_count()
    }

    pub fn columns(&self) -> Vec<MonthColumn> {
        month_columns(&self.range)
    }

    pub fn parents(&self, kind: CategoryKind) -> &[ParentCategory] {
        match kind {
            CategoryKind::Income => self.income.as_slice(),
            CategoryKind::Expense => self.expense.as_slice(),
        }
    }

    pub fn income(&self) -> &[ParentCategory] {
        self.income.as_slice()
    }

    pub fn expense(&self) -> &[ParentCategory] {
        self.expense.as_slice()
    }

    pub fn parent(&self, kind: CategoryKind, parent_index: usize) -> Option<&ParentCategory> {
        self.parents(kind).get(parent_index)
    }

    pub fn subcategory(
        &self,
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
    ) -> Option<&SubCategory> {
        self.parent(kind, parent_index)?
            .subcategories
            .get(sub_index)
    }

    pub fn cell(
        &self,
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
        month_index: usize,
    ) -> Option<f64> {
        self.subcategory(kind, parent_index, sub_index)?
            .values
            .get(month_index)
            .copied()
    }

    /// True when both books share the same forests and range, i.e. nothing
    /// changed between them.
    pub fn same_snapshot(&self, other: &BudgetBook) -> bool {
        Arc::ptr_eq(&self.income, &other.income)
            && Arc::ptr_eq(&self.expense, &other.expense)
            && self.range == other.range
    }

    pub(crate) fn set_range_unsynced(&mut self, range: MonthRange) {
        self.range = range;
    }

    pub(crate) fn forest_mut(&mut self, kind: CategoryKind) -> &mut Vec<ParentCategory> {
        match kind {
            CategoryKind::Income => Arc::make_mut(&mut self.income),
            CategoryKind::Expense => Arc::make_mut(&mut self.expense),
        }
    }

    pub(crate) fn subcategory_mut(
        &mut self,
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
    ) -> Option<&mut SubCategory> {
        self.forest_mut(kind)
            .get_mut(parent_index)?
            .subcategories
            .get_mut(sub_index)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(BudgetBook)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
