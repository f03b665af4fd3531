//! The budget store: entries, id assignment and the derived totals.
//!
//! Nothing here recomputes implicitly. After `add_item` or `delete_item`, call `calculate_budget`
//! and then `calculate_percentages` before reading, otherwise the reads are stale.

use crate::model::{Entry, Expense, Income, ItemId, Kind, Percentage};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::trace;

/// How the next id of a kind is chosen.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// One more than the id of the last entry in the sequence, or 0 when empty. Deleting the last
    /// entry frees its id for the next add.
    #[default]
    LastPlusOne,
    /// One more than the highest id ever issued for the kind. Ids are never reissued.
    Monotonic,
}

serde_plain::derive_display_from_serialize!(IdPolicy);
serde_plain::derive_fromstr_from_deserialize!(IdPolicy);

/// A read-only copy of the aggregate values as of the last `calculate_budget`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct BudgetSnapshot {
    pub budget: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub percentage: Percentage,
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
struct Totals {
    income: Decimal,
    expense: Decimal,
}

/// Owns every entry of a budget along with the totals derived from them.
#[derive(Debug, Clone, Default)]
pub struct BudgetStore {
    incomes: Vec<Income>,
    expenses: Vec<Expense>,
    totals: Totals,
    budget: Decimal,
    percentage: Percentage,
    id_policy: IdPolicy,
    /// Next id per kind, only consulted under `IdPolicy::Monotonic`.
    next_income_id: ItemId,
    next_expense_id: ItemId,
}

impl BudgetStore {
    pub fn new(id_policy: IdPolicy) -> Self {
        Self {
            id_policy,
            ..Default::default()
        }
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// Appends a new entry of `kind` and returns it.
    ///
    /// The caller is responsible for passing a non-empty `description` and a positive `amount`;
    /// nothing is validated here. Totals and percentages are not touched.
    pub fn add_item(
        &mut self,
        kind: Kind,
        description: impl Into<String>,
        amount: Decimal,
    ) -> Entry {
        let id = self.next_id(kind);
        let entry = match kind {
            Kind::Income => {
                let income = Income::new(id, description, amount);
                self.incomes.push(income.clone());
                Entry::Income(income)
            }
            Kind::Expense => {
                let expense = Expense::new(id, description, amount);
                self.expenses.push(expense.clone());
                Entry::Expense(expense)
            }
        };
        trace!("Added {}", entry.item_ref());
        entry
    }

    /// Removes the entry of `kind` with `id`, keeping the rest in order. Returns `false`, and
    /// changes nothing, when there is no such entry.
    pub fn delete_item(&mut self, kind: Kind, id: ItemId) -> bool {
        let removed = match kind {
            Kind::Income => remove_by_id(&mut self.incomes, id, Income::id),
            Kind::Expense => remove_by_id(&mut self.expenses, id, Expense::id),
        };
        trace!("Delete {kind}-{id}: removed = {removed}");
        removed
    }

    /// Recomputes both totals, the budget and the overall expense percentage.
    ///
    /// Totals and the budget saturate at the bounds of `Decimal` instead of overflowing, and a
    /// percentage that cannot be represented is `Unset`.
    pub fn calculate_budget(&mut self) {
        self.totals = Totals {
            income: sum(self.incomes.iter().map(Income::amount)),
            expense: sum(self.expenses.iter().map(Expense::amount)),
        };
        self.budget = self.totals.income.saturating_sub(self.totals.expense);
        self.percentage = Percentage::of(self.totals.expense, self.totals.income);
    }

    /// Recomputes each expense's share of the income total from the last `calculate_budget`.
    pub fn calculate_percentages(&mut self) {
        let total_income = self.totals.income;
        for expense in self.expenses.iter_mut() {
            expense.calculate_percentage(total_income);
        }
    }

    /// The percentage of every expense, in the same order as `expenses()`.
    pub fn percentages(&self) -> Vec<Percentage> {
        self.expenses.iter().map(Expense::percentage).collect()
    }

    pub fn budget(&self) -> BudgetSnapshot {
        BudgetSnapshot {
            budget: self.budget,
            total_income: self.totals.income,
            total_expense: self.totals.expense,
            percentage: self.percentage,
        }
    }

    pub fn incomes(&self) -> &[Income] {
        &self.incomes
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Incomes then expenses, each in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = Entry> + '_ {
        self.incomes
            .iter()
            .cloned()
            .map(Entry::from)
            .chain(self.expenses.iter().cloned().map(Entry::from))
    }

    pub fn len(&self) -> usize {
        self.incomes.len() + self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn next_id(&mut self, kind: Kind) -> ItemId {
        let (last, counter) = match kind {
            Kind::Income => (self.incomes.last().map(Income::id), &mut self.next_income_id),
            Kind::Expense => (
                self.expenses.last().map(Expense::id),
                &mut self.next_expense_id,
            ),
        };
        let after_last = last.map(|id| id.saturating_add(1)).unwrap_or(0);
        match self.id_policy {
            IdPolicy::LastPlusOne => after_last,
            IdPolicy::Monotonic => {
                let id = after_last.max(*counter);
                *counter = id.saturating_add(1);
                id
            }
        }
    }
}

fn remove_by_id<T>(items: &mut Vec<T>, id: ItemId, get_id: fn(&T) -> ItemId) -> bool {
    match items.iter().position(|item| get_id(item) == id) {
        Some(ix) => {
            items.remove(ix);
            true
        }
        None => false,
    }
}

fn sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}
