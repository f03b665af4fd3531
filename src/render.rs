//! Turns the store's numbers into text for the terminal.

use crate::model::{Amount, ItemRef, Kind, Percentage};
use crate::store::{BudgetSnapshot, BudgetStore};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::{Display, Formatter};

/// Shown wherever a percentage is unset or not above zero.
pub const NO_PERCENTAGE: &str = "---";

/// Formats a money value the way every row and total on the page shows it: `+` for income, `-`
/// for expense, then the symbol, thousands separators and cents, e.g. `- $1,234.50`. The sign of
/// `value` itself is dropped.
pub fn format_number(value: Decimal, kind: Kind, symbol: &str) -> String {
    let sign = match kind {
        Kind::Income => '+',
        Kind::Expense => '-',
    };
    format!("{sign} {}", Amount::new(value.abs()).with_symbol(symbol))
}

/// `25%`, or `---` for anything not above zero.
pub fn percentage_label(percentage: Percentage) -> String {
    match percentage.value() {
        Some(v) if v > 0 => format!("{v}%"),
        _ => NO_PERCENTAGE.to_string(),
    }
}

/// `October 2026`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Knows how to present values; holds the presentation settings.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Renderer {
    symbol: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(crate::model::DEFAULT_SYMBOL)
    }
}

impl Renderer {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn format_number(&self, value: Decimal, kind: Kind) -> String {
        format_number(value, kind, &self.symbol)
    }

    /// The budget reads as income only when it is above zero, so an even budget shows as
    /// `- $0.00`.
    pub fn budget_label(&self, budget: Decimal) -> String {
        let kind = if budget > Decimal::ZERO {
            Kind::Income
        } else {
            Kind::Expense
        };
        self.format_number(budget, kind)
    }

    /// Lays out the whole page from `snapshot` and the entries in `store`.
    pub fn page(&self, snapshot: &BudgetSnapshot, store: &BudgetStore, today: NaiveDate) -> Page {
        let mut rows = Vec::with_capacity(store.len());
        for income in store.incomes() {
            rows.push(Row {
                selector: ItemRef::new(Kind::Income, income.id()).to_string(),
                description: income.description().to_string(),
                value: self.format_number(income.amount(), Kind::Income),
                percentage: None,
            });
        }
        for expense in store.expenses() {
            rows.push(Row {
                selector: ItemRef::new(Kind::Expense, expense.id()).to_string(),
                description: expense.description().to_string(),
                value: self.format_number(expense.amount(), Kind::Expense),
                percentage: Some(percentage_label(expense.percentage())),
            });
        }
        Page {
            month: month_label(today),
            budget: self.budget_label(snapshot.budget),
            income: self.format_number(snapshot.total_income, Kind::Income),
            expense: self.format_number(snapshot.total_expense, Kind::Expense),
            percentage: percentage_label(snapshot.percentage),
            incomes: store.incomes().len(),
            rows,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct Row {
    selector: String,
    description: String,
    value: String,
    percentage: Option<String>,
}

/// A fully formatted page, ready to print.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Page {
    month: String,
    budget: String,
    income: String,
    expense: String,
    percentage: String,
    /// The first `incomes` rows are incomes, the rest expenses.
    incomes: usize,
    rows: Vec<Row>,
}

impl Page {
    pub fn budget(&self) -> &str {
        &self.budget
    }

    pub fn percentage(&self) -> &str {
        &self.percentage
    }
}

impl Display for Page {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Available Budget in {}:", self.month)?;
        writeln!(f, "{}", self.budget)?;
        writeln!(f, "  Income    {:>16}", self.income)?;
        writeln!(f, "  Expenses  {:>16}  {:>4}", self.expense, self.percentage)?;
        let (incomes, expenses) = self.rows.split_at(self.incomes);
        writeln!(f)?;
        writeln!(f, "INCOME")?;
        for row in incomes {
            writeln!(f, "{row}")?;
        }
        writeln!(f)?;
        writeln!(f, "EXPENSES")?;
        for row in expenses {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "  {:<12}{:<24}{:>16}",
            self.selector, self.description, self.value
        )?;
        if let Some(percentage) = &self.percentage {
            write!(f, "  {percentage:>4}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(dec("1234.5"), Kind::Income, "$"), "+ $1,234.50");
        assert_eq!(format_number(dec("50"), Kind::Expense, "$"), "- $50.00");
        assert_eq!(
            format_number(dec("1234567.891"), Kind::Expense, "$"),
            "- $1,234,567.89"
        );
        assert_eq!(format_number(dec("999"), Kind::Income, "€"), "+ €999.00");
        assert_eq!(
            format_number(dec("12345678901234567.89"), Kind::Income, "$"),
            "+ $12,345,678,901,234,567.89"
        );
    }

    #[test]
    fn test_format_number_drops_sign_of_value() {
        assert_eq!(format_number(dec("-42"), Kind::Income, "$"), "+ $42.00");
    }

    #[test]
    fn test_budget_label() {
        let renderer = Renderer::default();
        assert_eq!(renderer.budget_label(dec("250")), "+ $250.00");
        assert_eq!(renderer.budget_label(dec("-250")), "- $250.00");
        assert_eq!(renderer.budget_label(Decimal::ZERO), "- $0.00");
    }

    #[test]
    fn test_percentage_label() {
        assert_eq!(percentage_label(Percentage::Value(17)), "17%");
        assert_eq!(percentage_label(Percentage::Value(0)), "---");
        assert_eq!(percentage_label(Percentage::Unset), "---");
    }

    #[test]
    fn test_month_label() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(month_label(date), "October 2026");
    }

    #[test]
    fn test_page() {
        let mut store = BudgetStore::default();
        store.add_item(Kind::Income, "Salary", dec("2000"));
        store.add_item(Kind::Expense, "Rent", dec("500"));
        store.add_item(Kind::Expense, "Food", dec("250"));
        store.calculate_budget();
        store.calculate_percentages();

        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let page = Renderer::default().page(&store.budget(), &store, date);
        assert_eq!(page.budget(), "+ $1,250.00");
        assert_eq!(page.percentage(), "38%");

        let text = page.to_string();
        assert!(text.starts_with("Available Budget in January 2026:\n"));
        assert!(text.contains("+ $2,000.00"));
        assert!(text.contains("- $750.00"));
        let rent = text.lines().find(|l| l.contains("Rent")).unwrap();
        assert!(rent.contains("expense-0"));
        assert!(rent.contains("- $500.00"));
        assert!(rent.trim_end().ends_with("25%"));
        let salary = text.lines().find(|l| l.contains("Salary")).unwrap();
        assert!(salary.contains("income-0"));
        assert!(!salary.contains('%'));
    }

    #[test]
    fn test_page_before_recalculation() {
        let mut store = BudgetStore::default();
        store.add_item(Kind::Expense, "Rent", dec("500"));
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let page = Renderer::default().page(&store.budget(), &store, date);
        let rent = page
            .to_string()
            .lines()
            .find(|l| l.contains("Rent"))
            .map(str::to_string)
            .unwrap();
        assert!(rent.trim_end().ends_with(NO_PERCENTAGE));
    }
}
