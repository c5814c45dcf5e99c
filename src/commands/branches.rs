use super::refreshed_context;
use crate::core::{error::Result, print_info, print_section_header, state::GitBranch};
use colored::*;

pub fn execute_branches(include_remote: bool) -> Result<()> {
    let context = refreshed_context()?;
    let local = context.repository.local_branches()?;

    if local.is_empty() {
        print_info("No branches found. Make your first commit to create one.");
        return Ok(());
    }

    print_section_header("Local Branches");
    for branch in &local {
        println!("{}", format_branch_line(branch));
    }

    if include_remote {
        let remote = context.repository.remote_branches()?;
        print_section_header("Remote Branches");
        if remote.is_empty() {
            crate::core::print_muted("(none)");
        }
        for branch in &remote {
            println!("{}", format_branch_line(branch));
        }
    }

    println!();
    Ok(())
}

fn format_branch_line(branch: &GitBranch) -> String {
    let marker = if branch.is_active { "*" } else { " " };
    let tracking = match &branch.tracking {
        Some(tracking) => format!(" {} {}", "->".bright_black(), tracking.bright_black()),
        None => String::new(),
    };

    format!(
        "{}{}{} {}{}",
        "[".bright_black(),
        marker.white(),
        "]".bright_black(),
        branch.name.blue(),
        tracking
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_branch_line() {
        let mut branch = GitBranch::new("main");
        branch.is_active = true;
        branch.tracking = Some("origin/main".to_string());

        let line = format_branch_line(&branch);
        assert!(line.contains("*"));
        assert!(line.contains("main"));
        assert!(line.contains("origin/main"));
    }
}
