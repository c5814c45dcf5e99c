pub mod branches;
pub mod caches;
pub mod history;
pub mod info;
pub mod invalidate;
pub mod locks;
pub mod refresh;
pub mod status;
pub mod user;

pub use branches::*;
pub use caches::*;
pub use history::*;
pub use info::*;
pub use invalidate::*;
pub use locks::*;
pub use refresh::*;
pub use status::*;
pub use user::*;

use crate::core::{command_init::MirrorCommandContext, error::Result, MirrorCommandInit};

/// Initialize and bring every cache up to date before a read command prints
fn refreshed_context() -> Result<MirrorCommandContext> {
    let context = MirrorCommandInit::initialize()?;
    context.repository.refresh()?;
    Ok(context)
}
