//! `controls`.

use anyhow::Result;
use flamelab_runtime::help_text;

pub fn execute() -> Result<()> {
    println!("{}", help_text());
    Ok(())
}
