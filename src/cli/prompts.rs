//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{Confirm, MultiSelect};

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Let the user pick which segments to evaluate; all are preselected
pub fn select_segments(available: &[String]) -> Result<Vec<String>> {
    let defaults = vec![true; available.len()];
    let picked = MultiSelect::new()
        .with_prompt("Segments to evaluate (space toggles, enter confirms)")
        .items(available)
        .defaults(&defaults)
        .interact()?;

    Ok(picked.into_iter().map(|idx| available[idx].clone()).collect())
}

/// Ask before overwriting segment CSVs that already exist
pub fn confirm_overwrite(existing: usize) -> Result<bool> {
    let message = format!(
        "{} segment file(s) already exist in the output directory. Overwrite?",
        existing
    );
    confirm_step(&message)
}
