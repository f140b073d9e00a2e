//! Transaction display formatting

use std::collections::HashMap;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::{Category, CategoryId, Transaction};

use super::{format_date, truncate};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Method")]
    payment_method: String,
}

fn category_label(
    category_id: Option<&CategoryId>,
    names: &HashMap<&CategoryId, &str>,
    settings: &Settings,
) -> String {
    match category_id {
        Some(id) => names
            .get(id)
            .map(|name| name.to_string())
            .unwrap_or_else(|| settings.fallback_category_label.clone()),
        None => "(uncategorized)".to_string(),
    }
}

/// Signed amount: income positive, expenses negative
fn signed_amount(txn: &Transaction, symbol: &str) -> String {
    if txn.is_income() {
        format!("+{}", txn.amount.format_with_symbol(symbol))
    } else {
        format!("-{}", txn.amount.format_with_symbol(symbol))
    }
}

/// Format transactions as a table, newest first as given
pub fn format_transaction_table(
    transactions: &[Transaction],
    categories: &[Category],
    settings: &Settings,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let names: HashMap<&CategoryId, &str> =
        categories.iter().map(|c| (&c.id, c.name.as_str())).collect();

    let rows = transactions.iter().map(|txn| TransactionRow {
        id: txn.id.short(),
        date: format_date(txn.date, &settings.date_format),
        kind: txn.kind.as_str().to_string(),
        category: category_label(txn.category_id.as_ref(), &names, settings),
        description: truncate(&txn.description, 32),
        amount: signed_amount(txn, &settings.currency_symbol),
        payment_method: txn.payment_method.clone(),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Format one transaction's details
pub fn format_transaction_details(
    txn: &Transaction,
    categories: &[Category],
    settings: &Settings,
) -> String {
    let names: HashMap<&CategoryId, &str> =
        categories.iter().map(|c| (&c.id, c.name.as_str())).collect();

    let mut output = String::new();
    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!(
        "Date:        {}",
        format_date(txn.date, &settings.date_format)
    ));
    if let Some(time) = txn.time {
        output.push_str(&format!(" {}", time.format("%H:%M")));
    }
    output.push('\n');
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(&settings.currency_symbol)
    ));
    output.push_str(&format!(
        "Category:    {}\n",
        category_label(txn.category_id.as_ref(), &names, settings)
    ));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }
    if !txn.payment_method.is_empty() {
        output.push_str(&format!("Method:      {}\n", txn.payment_method));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    #[test]
    fn test_table_resolves_names_and_fallbacks() {
        let categories = vec![Category::with_id("food", "Food & Dining", "", "#f97316")];
        let mut groceries = Transaction::expense(Money::from_units(500), "food", day());
        groceries.description = "Groceries".into();
        let orphan = Transaction::expense(Money::from_units(20), "gone", day());
        let salary = Transaction::income(Money::from_units(3000), "salary", day());

        let output = format_transaction_table(
            &[groceries, orphan, salary],
            &categories,
            &Settings::default(),
        );

        assert!(output.contains("Food & Dining"));
        assert!(output.contains("Unknown"));
        assert!(output.contains("-₹500.00"));
        assert!(output.contains("+₹3000.00"));
        assert!(output.contains("Groceries"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(
            format_transaction_table(&[], &[], &Settings::default()),
            "No transactions found."
        );
    }

    #[test]
    fn test_details() {
        let mut txn = Transaction::expense(Money::from_cents(1250), "food", day());
        txn.category_id = None;
        txn.payment_method = "upi".into();

        let output = format_transaction_details(&txn, &[], &Settings::default());
        assert!(output.contains("2024-01-05"));
        assert!(output.contains("₹12.50"));
        assert!(output.contains("(uncategorized)"));
        assert!(output.contains("Method:      upi"));
    }
}
