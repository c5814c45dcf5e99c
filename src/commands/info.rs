use super::refreshed_context;
use crate::core::{error::Result, print_field, print_section_header};

pub fn execute_info() -> Result<()> {
    let context = refreshed_context()?;
    let repository = &context.repository;

    let branch = repository
        .current_branch()?
        .map(|branch| branch.to_string())
        .unwrap_or_else(|| "-none-".to_string());
    let remote = repository
        .current_remote()?
        .map(|remote| remote.to_string())
        .unwrap_or_else(|| "-none-".to_string());

    print_section_header("Repository");
    print_field("Name", &repository.name()?);
    print_field("Path", &repository.local_path().display().to_string());
    print_field("Branch", &branch);
    print_field("Remote", &remote);
    print_field("GitHub", if repository.is_github()? { "yes" } else { "no" });
    print_field("Snapshots", &context.store.dir().display().to_string());
    println!();

    Ok(())
}
