use crate::commands::Out;
use crate::store::IdPolicy;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the budgety home directory, if needed, and writes an initial `config.json` into it.
///
/// # Arguments
/// - `budgety_home` - The directory that will hold the configuration, e.g. `$HOME/budgety`
/// - `id_policy` - How entry ids are assigned during a session
/// - `currency_symbol` - The symbol printed in front of every value
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(
    budgety_home: &Path,
    id_policy: IdPolicy,
    currency_symbol: &str,
) -> Result<Out<()>> {
    let config = Config::create(budgety_home, id_policy, currency_symbol)
        .await
        .context("Unable to create the budgety directory and config")?;
    Ok(format!(
        "Successfully created the budgety config at {}",
        config.config_path().display()
    )
    .into())
}
