//! Clean the output directory

use anyhow::Result;

use crate::Smg;

/// Remove everything a build wrote
pub fn run(smg: &Smg) -> Result<()> {
    smg.clean()?;
    Ok(())
}
