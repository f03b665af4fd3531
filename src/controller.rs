//! The controller sits between user input and the `BudgetStore`.
//!
//! It rejects bad input before the store sees it, and after every change it recalculates the
//! totals and percentages in the right order, so what it hands back is never stale.

use crate::model::{Amount, Entry, ItemRef, Kind, Percentage};
use crate::store::{BudgetSnapshot, BudgetStore, IdPolicy};
use crate::Result;
use anyhow::ensure;
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

/// What the user typed into the add form.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Input {
    kind: Kind,
    description: String,
    value: Amount,
}

impl Input {
    pub fn new(kind: Kind, description: impl Into<String>, value: Amount) -> Self {
        Self {
            kind,
            description: description.into(),
            value,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn value(&self) -> Amount {
        self.value
    }

    /// Only a non-empty description and a value greater than zero are accepted.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.description.is_empty(), "The description is empty");
        ensure!(
            self.value.is_positive(),
            "The value must be greater than zero, got {}",
            self.value
        );
        Ok(())
    }
}

/// Everything a renderer needs after a change.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Update {
    /// The entry that was added or removed, if any.
    entry: Option<Entry>,
    budget: BudgetSnapshot,
    /// Parallel to the expense list.
    percentages: Vec<Percentage>,
}

impl Update {
    pub fn entry(&self) -> Option<&Entry> {
        self.entry.as_ref()
    }

    pub fn budget(&self) -> &BudgetSnapshot {
        &self.budget
    }

    pub fn percentages(&self) -> &[Percentage] {
        &self.percentages
    }
}

#[derive(Debug, Clone, Default)]
pub struct Controller {
    store: BudgetStore,
}

impl Controller {
    pub fn new(id_policy: IdPolicy) -> Self {
        Self {
            store: BudgetStore::new(id_policy),
        }
    }

    pub fn store(&self) -> &BudgetStore {
        &self.store
    }

    /// The view shown before anything has been entered. The overall percentage is `0`, not
    /// `Unset`; both render the same.
    pub fn init(&self) -> Update {
        Update {
            entry: None,
            budget: BudgetSnapshot {
                percentage: Percentage::Value(0),
                ..BudgetSnapshot::default()
            },
            percentages: Vec::new(),
        }
    }

    /// Validates `input`, adds it to the store and returns the recalculated view. On rejection the
    /// store is left untouched.
    pub fn add_item(&mut self, input: Input) -> Result<Update> {
        input.validate()?;
        let entry = self
            .store
            .add_item(input.kind, input.description, input.value.value());
        debug!("Added {} for {}", entry.item_ref(), entry.amount());
        Ok(self.update(Some(entry)))
    }

    /// Deletes the entry named by `selector`, e.g. `expense-2`, and returns the recalculated view.
    ///
    /// A selector that does not parse is an error. A selector that parses but matches nothing is
    /// not; the view is recalculated all the same.
    pub fn delete_item(&mut self, selector: &str) -> Result<Update> {
        let item = ItemRef::from_str(selector)?;
        let removed = self.find(item);
        if self.store.delete_item(item.kind(), item.id()) {
            debug!("Deleted {item}");
        } else {
            debug!("Nothing to delete for {item}");
        }
        Ok(self.update(removed))
    }

    /// The current view without changing anything.
    pub fn view(&self) -> Update {
        Update {
            entry: None,
            budget: self.store.budget(),
            percentages: self.store.percentages(),
        }
    }

    fn update(&mut self, entry: Option<Entry>) -> Update {
        self.store.calculate_budget();
        self.store.calculate_percentages();
        Update {
            entry,
            ..self.view()
        }
    }

    fn find(&self, item: ItemRef) -> Option<Entry> {
        self.store.entries().find(|e| e.item_ref() == item)
    }
}

/// Parses the value field of the add form. Text that is not a number is rejected here, the same
/// as a number that is not positive is rejected by `Input::validate`.
pub fn parse_value(text: &str) -> Result<Amount> {
    ensure!(!text.trim().is_empty(), "The value is empty");
    Amount::from_str(text).map_err(|e| anyhow::anyhow!("'{text}' is not a number: {e}"))
}
