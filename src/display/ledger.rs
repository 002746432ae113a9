//! Ledger display formatting
//!
//! Category balances, allocation rules and the effect of single operations.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::LedgerResult;
use crate::models::{AllocationOutcome, AllocationRule, CategoryDraw, User};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Bank Account")]
    bank_account: String,
}

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Rule")]
    rule: String,
}

#[derive(Tabled)]
struct AmountRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::modern()).to_string()
}

/// Format a user's categories and totals
pub fn format_user(user: &User) -> LedgerResult<String> {
    let rows: Vec<CategoryRow> = user
        .categories
        .values()
        .map(|c| CategoryRow {
            category: c.kind.to_string(),
            balance: c.balance.to_string(),
            bank_account: c.bank_account.to_string(),
        })
        .collect();

    let mut output = format!("User: {} ({})\n", user.id, user.currency);
    output.push_str(&render(rows));
    output.push('\n');
    output.push_str(&format!("Total balance: {}\n", user.total_balance()?));
    output.push_str(&format!(
        "Incomes: {}  Expenses: {}\n",
        user.incomes.len(),
        user.expenses.len()
    ));
    Ok(output)
}

/// Format allocation rules in evaluation order
pub fn format_rules(rules: &[AllocationRule]) -> String {
    if rules.is_empty() {
        return "No allocation rules set.\n\nRun 'arus rules set <user> --percent expense=0.5 ...' to add some.\n"
            .to_string();
    }

    let rows: Vec<RuleRow> = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| RuleRow {
            position: i + 1,
            rule: rule.to_string(),
        })
        .collect();

    let mut output = render(rows);
    output.push('\n');
    output
}

/// Format the credits made by one allocation
pub fn format_allocation(outcome: &AllocationOutcome) -> String {
    let rows: Vec<AmountRow> = outcome
        .credits
        .iter()
        .map(|c| AmountRow {
            category: c.category.to_string(),
            amount: c.amount.to_string(),
        })
        .collect();

    let mut output = format!("Allocated {}\n", outcome.income);
    output.push_str(&render(rows));
    output.push('\n');

    if !outcome.unallocated.is_zero() {
        output.push_str(&format!("Unallocated: {}\n", outcome.unallocated));
    }
    output
}

/// Format the categories an expense was drawn from
pub fn format_draws(draws: &[CategoryDraw]) -> String {
    if draws.is_empty() {
        return "Nothing deducted.\n".to_string();
    }

    let rows: Vec<AmountRow> = draws
        .iter()
        .map(|d| AmountRow {
            category: d.category.to_string(),
            amount: d.amount.to_string(),
        })
        .collect();

    let mut output = render(rows);
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryKind, Money};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn funded_user() -> (User, AllocationOutcome) {
        let mut user = User::new("user123");
        user.set_allocation_rules(vec![
            AllocationRule::fixed(CategoryKind::Expense, Money::new(dec!(200), "USD")),
            AllocationRule::percentage(CategoryKind::Savings, dec!(0.5)),
        ])
        .unwrap();
        let outcome = user
            .allocate_income(
                Money::new(dec!(1000), "USD"),
                NaiveDate::from_ymd_opt(2023, 9, 1).unwrap(),
                "Salary",
            )
            .unwrap();
        (user, outcome)
    }

    #[test]
    fn test_format_user() {
        let (user, _) = funded_user();
        let output = format_user(&user).unwrap();

        assert!(output.contains("User: user123 (USD)"));
        assert!(output.contains("Savings"));
        assert!(output.contains("400.00 USD"));
        assert!(output.contains("EMG123 at Emergency Bank"));
        assert!(output.contains("Total balance: 600.00 USD"));
    }

    #[test]
    fn test_format_rules() {
        let (user, _) = funded_user();
        let output = format_rules(&user.allocation_rules);
        assert!(output.contains("Expense: 200.00 USD"));
        assert!(output.contains("Savings: 50% of remaining"));

        assert!(format_rules(&[]).starts_with("No allocation rules set."));
    }

    #[test]
    fn test_format_allocation_shows_unallocated() {
        let (_, outcome) = funded_user();
        let output = format_allocation(&outcome);
        assert!(output.contains("Allocated 1000.00 USD"));
        assert!(output.contains("Unallocated: 400.00 USD"));
    }

    #[test]
    fn test_format_draws() {
        let draws = vec![CategoryDraw {
            category: CategoryKind::Emergency,
            amount: Money::new(dec!(12.5), "USD"),
        }];
        let output = format_draws(&draws);
        assert!(output.contains("Emergency"));
        assert!(output.contains("12.50 USD"));
        assert_eq!(format_draws(&[]), "Nothing deducted.\n");
    }
}
