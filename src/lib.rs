//! # Budget Grid
//!
//! A library for monthly budget grids: income and expense categories, each
//! split into subcategories that hold one value per month of a chosen range,
//! rolled up into subtotals, totals, profit/loss and running balances.
//!
//! ## Core Concepts
//!
//! - **Month range**: an inclusive start/end pair of calendar months; it
//!   decides how many columns every row has
//! - **Category tree**: two independent forests (income, expense) of parent
//!   categories, each with an ordered list of subcategory rows
//! - **Synchronization**: every row is resized positionally to the month
//!   count after each range or tree change
//! - **Aggregation**: totals and balances are recomputed from the rows on
//!   every read
//! - **Bulk apply**: one selected value copied into every month of a row
//! - **Snapshots**: edits return a new [`BudgetBook`]; earlier books are
//!   never modified
//!
//! ## Example
//!
//! ```rust
//! use budget_grid::*;
//!
//! let mut session = BudgetSession::with_config(BudgetConfig {
//!     start: MonthKey::new(2025, 1),
//!     end: MonthKey::new(2025, 3),
//!     ..BudgetConfig::default()
//! })
//! .unwrap();
//!
//! session.rename_parent(CategoryKind::Income, 0, "Salary");
//! session.add_subcategory(CategoryKind::Income, 0);
//! session.set_cell_value(CategoryKind::Income, 0, 0, 0, "2500");
//!
//! session.add_parent(CategoryKind::Expense);
//! session.add_subcategory(CategoryKind::Expense, 0);
//! session.select_cell(CategoryKind::Expense, 0, 0, 900.0);
//! session.apply_all();
//!
//! let agg = session.aggregator();
//! assert_eq!(agg.profit_loss(0), 1600.0);
//! assert_eq!(agg.closing_balance_row().len(), 3);
//! ```

pub mod aggregator;
pub mod bulk;
pub mod config;
pub mod demo;
pub mod editor;
pub mod error;
pub mod month;
pub mod schema;
pub mod session;
pub mod sheet;
pub mod sync;
pub mod utils;

pub use aggregator::{subtotal, Aggregator};
pub use bulk::{fill_row, BulkApply, BulkApplyState, Selection};
pub use config::BudgetConfig;
pub use demo::seed_demo_values;
pub use editor::{apply_edit, apply_edits, TreeEdit};
pub use error::{BudgetError, Result};
pub use month::{month_columns, resolve, MonthColumn, MonthKey, MonthRange};
pub use schema::*;
pub use session::BudgetSession;
pub use sheet::{BudgetSheet, SheetParent, SheetRow, SheetSection};
pub use sync::{reconcile, resize_values, verify_grid};
pub use utils::*;
