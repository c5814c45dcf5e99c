use super::refreshed_context;
use crate::core::{error::Result, print_info, print_section_header};
use colored::*;

pub fn execute_log(limit: Option<usize>) -> Result<()> {
    let context = refreshed_context()?;
    let log = context.repository.log()?;

    if log.is_empty() {
        print_info("No commits yet");
        return Ok(());
    }

    print_section_header("Log");
    let shown = limit.unwrap_or(log.len());
    for entry in log.iter().take(shown) {
        println!(
            "{} {} {} {}",
            entry.short_id().yellow(),
            entry.time.format("%Y-%m-%d %H:%M").to_string().bright_black(),
            entry.author_name.cyan(),
            entry.summary.white()
        );
    }
    println!();

    Ok(())
}
