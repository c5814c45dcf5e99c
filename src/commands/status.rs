use super::refreshed_context;
use crate::core::{error::Result, format_status_entry, print_info, state::GitStatus};
use colored::*;

pub fn execute_status() -> Result<()> {
    let context = refreshed_context()?;
    let status = context.repository.current_status()?;

    print_status_header(&status);

    if status.entries.is_empty() {
        print_info("Nothing to commit, working tree clean");
        return Ok(());
    }

    for entry in &status.entries {
        println!("{}", format_status_entry(entry));
    }
    println!();

    Ok(())
}

fn print_status_header(status: &GitStatus) {
    let branch = status.local_branch.as_deref().unwrap_or("-none-");
    let tracking = match &status.remote_branch {
        Some(remote) => format!(" {} {}", "->".bright_black(), remote.white()),
        None => String::new(),
    };

    println!(
        "\n{} {}{}{}",
        "On branch".bright_black(),
        branch.blue(),
        tracking,
        format_ahead_behind(status.ahead, status.behind)
    );
}

/// ` (+ahead/-behind)`, or empty when in sync
pub fn format_ahead_behind(ahead: usize, behind: usize) -> String {
    if ahead > 0 && behind > 0 {
        format!(
            " {}+{}/-{}{}",
            "(".bright_black(),
            ahead.to_string().white(),
            behind.to_string().white(),
            ")".bright_black()
        )
    } else if ahead > 0 {
        format!(
            " {}+{}{}",
            "(".bright_black(),
            ahead.to_string().white(),
            ")".bright_black()
        )
    } else if behind > 0 {
        format!(
            " {}-{}{}",
            "(".bright_black(),
            behind.to_string().white(),
            ")".bright_black()
        )
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ahead_behind() {
        assert_eq!(format_ahead_behind(0, 0), "");
        assert!(format_ahead_behind(2, 0).contains("+2"));
        assert!(format_ahead_behind(0, 3).contains("-3"));
        let both = format_ahead_behind(1, 4);
        assert!(both.contains("+1"));
        assert!(both.contains("4"));
    }
}
