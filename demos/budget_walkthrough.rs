use budget_grid::*;

fn main() {
    println!("📊 Budget Grid Walkthrough\n");
    println!("Builds a small quarterly budget, edits it, and prints the resulting sheet.\n");

    let mut session = BudgetSession::with_config(BudgetConfig {
        start: MonthKey::new(2025, 1),
        end: MonthKey::new(2025, 3),
        ..BudgetConfig::default()
    })
    .expect("demo config is valid");

    // Income: one parent with two rows
    session.rename_parent(CategoryKind::Income, 0, "Employment");
    session.add_subcategory(CategoryKind::Income, 0);
    session.rename_subcategory(CategoryKind::Income, 0, 0, "Salary");
    session.add_subcategory(CategoryKind::Income, 0);
    session.rename_subcategory(CategoryKind::Income, 0, 1, "Overtime");

    session.select_cell(CategoryKind::Income, 0, 0, 4200.0);
    session.apply_all();
    session.set_cell_value(CategoryKind::Income, 0, 1, 1, "350,50");

    // Expenses: housing and living costs
    session.add_parent(CategoryKind::Expense);
    session.rename_parent(CategoryKind::Expense, 0, "Housing");
    session.add_subcategory(CategoryKind::Expense, 0);
    session.rename_subcategory(CategoryKind::Expense, 0, 0, "Rent");
    session.select_cell(CategoryKind::Expense, 0, 0, 1650.0);
    session.apply_all();

    session.add_parent(CategoryKind::Expense);
    session.rename_parent(CategoryKind::Expense, 1, "Living");
    session.add_subcategory(CategoryKind::Expense, 1);
    session.rename_subcategory(CategoryKind::Expense, 1, 0, "Groceries");
    for (month, raw) in ["$620", "580.20", "701"].iter().enumerate() {
        session.set_cell_value(CategoryKind::Expense, 1, 0, month, raw);
    }

    println!("📋 Months:");
    for column in session.columns() {
        println!("  - {} ({})", column.label, column.key);
    }
    println!();

    println!("{}", session.sheet().to_markdown());

    println!("📐 Extending the range to June (rows grow with zeros)...");
    session.on_end_change("2025-06");
    let agg = session.aggregator();
    println!(
        "  Closing balance after {} months: {:.2}",
        agg.month_count(),
        agg.closing_balance_row().last().copied().unwrap_or(0.0)
    );

    match session.verify() {
        Ok(()) => println!("\n✅ Every row matches the month count"),
        Err(e) => println!("\n❌ {}", e),
    }
}
