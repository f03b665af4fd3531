//! Types that represent the core data model, such as `Entry`, `Amount` and `Percentage`.
mod amount;
mod entry;
mod percentage;

pub use amount::{Amount, AmountError, DEFAULT_SYMBOL};
pub use entry::{Entry, Expense, Income, ItemId, ItemRef, Kind};
pub use percentage::Percentage;
