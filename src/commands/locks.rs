use super::refreshed_context;
use crate::core::{error::Result, print_info, print_section_header};
use colored::*;

pub fn execute_locks() -> Result<()> {
    let context = refreshed_context()?;
    let locks = context.repository.current_locks()?;

    if locks.is_empty() {
        print_info("No files are locked");
        return Ok(());
    }

    print_section_header("Locked Files");
    for lock in &locks {
        let since = lock
            .locked_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "  {}  {}  {}",
            lock.path.to_string_lossy().white(),
            lock.owner.cyan(),
            since.bright_black()
        );
    }
    println!();

    Ok(())
}
