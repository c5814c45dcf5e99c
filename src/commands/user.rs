use super::refreshed_context;
use crate::core::{error::Result, print_field, print_info, print_section_header};

pub fn execute_user() -> Result<()> {
    let context = refreshed_context()?;

    match context.repository.user()? {
        Some(user) => {
            print_section_header("User");
            print_field("Name", &user.name);
            print_field("Email", &user.email);
            println!();
        }
        None => print_info("No git user configured"),
    }

    Ok(())
}
