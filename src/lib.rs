//! budgety keeps a running budget: incomes and expenses go in, and out come the totals, the money
//! left over and each expense's share of income.
//!
//! The `store` module holds the data and does the arithmetic. The `controller` validates input and
//! keeps the derived values current, `render` formats them, and `session` drives both from lines
//! of text.

pub mod args;
pub mod commands;
mod config;
pub mod controller;
mod error;
pub mod model;
pub mod render;
pub mod session;
pub mod store;
mod utils;


pub use config::Config;
pub use controller::Controller;
pub use error::Error;
pub use error::Result;
pub use store::{BudgetSnapshot, BudgetStore, IdPolicy};
