use crate::core::{error::Result, print_success, CacheType, MirrorCommandInit};

/// Invalidate one cache by name, or every cache for `all`
pub fn execute_invalidate(target: &str) -> Result<()> {
    let context = MirrorCommandInit::initialize()?;

    if target.eq_ignore_ascii_case("all") {
        context.container.invalidate_all()?;
        print_success("Invalidated all caches");
        return Ok(());
    }

    let cache_type: CacheType = target.parse()?;
    context.container.invalidate(cache_type)?;
    print_success(&format!("Invalidated {cache_type} cache"));

    Ok(())
}
