use crate::aggregator::Aggregator;
use crate::error::Result;
use crate::month::MonthColumn;
use crate::schema::{BudgetBook, CategoryKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const UNNAMED: &str = "(unnamed)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SheetRow {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SheetParent {
    pub name: String,
    pub rows: Vec<SheetRow>,
    pub subtotal: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SheetSection {
    pub kind: CategoryKind,
    pub parents: Vec<SheetParent>,
    pub total: Vec<f64>,
}

/// Everything the grid view shows, computed once from a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BudgetSheet {
    pub columns: Vec<MonthColumn>,
    pub income: SheetSection,
    pub expense: SheetSection,
    pub profit_loss: Vec<f64>,
    pub opening_balance: Vec<f64>,
    pub closing_balance: Vec<f64>,
}

impl BudgetSheet {
    pub fn from_book(book: &BudgetBook) -> Self {
        let agg = Aggregator::new(book);

        Self {
            columns: book.columns(),
            income: section(book, &agg, CategoryKind::Income),
            expense: section(book, &agg, CategoryKind::Expense),
            profit_loss: agg.profit_loss_row(),
            opening_balance: agg.opening_balance_row(),
            closing_balance: agg.closing_balance_row(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("| Category |");
        for column in &self.columns {
            output.push_str(&format!(" {} |", column.label));
        }
        output.push('\n');
        output.push_str("|---|");
        for _ in &self.columns {
            output.push_str("---:|");
        }
        output.push('\n');

        for block in [&self.income, &self.expense] {
            let heading = match block.kind {
                CategoryKind::Income => "Income",
                CategoryKind::Expense => "Expenses",
            };
            push_heading(&mut output, heading, self.columns.len());

            for parent in &block.parents {
                push_heading(&mut output, display_name(&parent.name), self.columns.len());
                for row in &parent.rows {
                    push_row(&mut output, &format!("  {}", display_name(&row.name)), &row.values);
                }
                push_row(&mut output, "Subtotal", &parent.subtotal);
            }

            let total_label = match block.kind {
                CategoryKind::Income => "**Total Income**",
                CategoryKind::Expense => "**Total Expenses**",
            };
            push_row(&mut output, total_label, &block.total);
        }

        push_row(&mut output, "**Profit/Loss**", &self.profit_loss);
        push_row(&mut output, "Opening Balance", &self.opening_balance);
        push_row(&mut output, "Closing Balance", &self.closing_balance);

        output
    }
}

fn section(book: &BudgetBook, agg: &Aggregator<'_>, kind: CategoryKind) -> SheetSection {
    let parents = book
        .parents(kind)
        .iter()
        .map(|parent| SheetParent {
            name: parent.name.clone(),
            rows: parent
                .subcategories
                .iter()
                .map(|sub| SheetRow {
                    name: sub.name.clone(),
                    values: sub.values.clone(),
                })
                .collect(),
            subtotal: agg.subtotal_row(parent),
        })
        .collect();

    SheetSection {
        kind,
        parents,
        total: agg.total_row(kind),
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        UNNAMED
    } else {
        name
    }
}

fn push_heading(output: &mut String, label: &str, columns: usize) {
    output.push_str(&format!("| **{}** |", label));
    for _ in 0..columns {
        output.push_str(" |");
    }
    output.push('\n');
}

fn push_row(output: &mut String, label: &str, values: &[f64]) {
    output.push_str(&format!("| {} |", label));
    for value in values {
        output.push_str(&format!(" {:.2} |", value));
    }
    output.push('\n');
}
