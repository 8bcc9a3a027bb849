//! Plain-text views printed by the commands.

use catchbook_client_core::{date::format_day, DayRecord, HistoryBook, Totals};

fn num(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn totals(t: &Totals) -> String {
    format!(
        "  kg {}  sales {}  expenses {}  profit {}  earnings 15% {}\n",
        num(t.total_kg),
        num(t.total_sales),
        num(t.total_expenses),
        num(t.profit),
        num(t.earnings15)
    )
}

/// Lines are numbered from 1; those numbers are what `--line` expects.
pub fn day(record: &DayRecord) -> String {
    let mut out = format!("{}\n", format_day(record.date));
    if record.is_empty() {
        out.push_str("  (no lines)\n");
    }
    for (i, sale) in record.sales.iter().enumerate() {
        out.push_str(&format!(
            "  sale {}: {} kg x {} = {}\n",
            i + 1,
            num(sale.kg()),
            num(sale.price()),
            num(sale.total())
        ));
    }
    for (i, expense) in record.expenses.iter().enumerate() {
        out.push_str(&format!(
            "  expense {}: {} {}\n",
            i + 1,
            expense.category,
            num(expense.amount)
        ));
    }
    out.push_str(&totals(&record.stored_totals()));
    out
}

pub fn history(book: &HistoryBook) -> String {
    if book.is_empty() {
        return "No saved days\n".to_string();
    }
    let mut out = String::new();
    for (key, record) in book.iter() {
        out.push_str(&format!(
            "{:<14} sales {:>3}  expenses {:>3}  total {}  profit {}\n",
            key.to_string(),
            record.sales.len(),
            record.expenses.len(),
            num(record.total_sales),
            num(record.profit)
        ));
    }
    out
}

pub fn period(days: usize, t: &Totals) -> String {
    format!("Period over {} saved days\n{}", days, totals(t))
}
