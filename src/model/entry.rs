use crate::model::Percentage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which side of the budget an entry sits on.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    #[default]
    #[serde(alias = "inc")]
    Income,
    #[serde(alias = "exp")]
    Expense,
}

serde_plain::derive_display_from_serialize!(Kind);
serde_plain::derive_fromstr_from_deserialize!(Kind);

/// The identifier of an entry, unique within its `Kind`.
pub type ItemId = u64;

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Income {
    id: ItemId,
    description: String,
    amount: Decimal,
}

impl Income {
    pub(crate) fn new(id: ItemId, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id,
            description: description.into(),
            amount,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Expense {
    id: ItemId,
    description: String,
    amount: Decimal,
    /// Derived from total income; stale until `calculate_percentage` runs again.
    percentage: Percentage,
}

impl Expense {
    pub(crate) fn new(id: ItemId, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id,
            description: description.into(),
            amount,
            percentage: Percentage::Unset,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn percentage(&self) -> Percentage {
        self.percentage
    }

    /// Sets `percentage` to this expense's share of `total_income`.
    pub(crate) fn calculate_percentage(&mut self, total_income: Decimal) {
        self.percentage = Percentage::of(self.amount, total_income);
    }
}

/// Either kind of entry, as handed back to callers of the store.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Income(Income),
    Expense(Expense),
}

impl Entry {
    pub fn kind(&self) -> Kind {
        match self {
            Entry::Income(_) => Kind::Income,
            Entry::Expense(_) => Kind::Expense,
        }
    }

    pub fn id(&self) -> ItemId {
        match self {
            Entry::Income(income) => income.id(),
            Entry::Expense(expense) => expense.id(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Entry::Income(income) => income.description(),
            Entry::Expense(expense) => expense.description(),
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Entry::Income(income) => income.amount(),
            Entry::Expense(expense) => expense.amount(),
        }
    }

    /// Incomes have no percentage.
    pub fn percentage(&self) -> Option<Percentage> {
        match self {
            Entry::Income(_) => None,
            Entry::Expense(expense) => Some(expense.percentage()),
        }
    }

    pub fn item_ref(&self) -> ItemRef {
        ItemRef::new(self.kind(), self.id())
    }
}

impl From<Income> for Entry {
    fn from(value: Income) -> Self {
        Entry::Income(value)
    }
}

impl From<Expense> for Entry {
    fn from(value: Expense) -> Self {
        Entry::Expense(value)
    }
}

/// Names one entry as `<kind>-<id>`, e.g. `income-3`. This is the handle shown next to each row
/// and typed back in to delete it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ItemRef {
    kind: Kind,
    id: ItemId,
}

impl ItemRef {
    pub fn new(kind: Kind, id: ItemId) -> Self {
        Self { kind, id }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn id(&self) -> ItemId {
        self.id
    }
}

impl Display for ItemRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.kind, self.id)
    }
}

impl FromStr for ItemRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind, id)) = s.trim().split_once('-') else {
            anyhow::bail!("'{s}' is not an item selector, expected something like 'income-0'");
        };
        let kind = Kind::from_str(kind)
            .map_err(|_| anyhow::anyhow!("Unknown kind '{kind}' in selector '{s}'"))?;
        let id = id
            .parse::<ItemId>()
            .map_err(|e| anyhow::anyhow!("Bad id '{id}' in selector '{s}': {e}"))?;
        Ok(Self { kind, id })
    }
}
