use crate::core::{
    error::Result, format_cache_age, print_section_header, Cache, CacheType, MirrorCommandInit,
};
use chrono::Utc;
use colored::*;

/// List every cache with its timestamps, without validating anything
pub fn execute_caches() -> Result<()> {
    let context = MirrorCommandInit::initialize()?;
    let now = Utc::now();
    let ttl = context.config.environment().ttl;

    print_section_header("Caches");
    for cache_type in CacheType::ALL {
        let cache = context.container.cache(cache_type)?;
        let stale = now.signed_duration_since(cache.last_updated_at()) > ttl;
        let state = if stale { "stale".yellow() } else { "fresh".green() };

        println!(
            "  {:<16} {}  updated {}  verified {}",
            cache_type.as_str().white(),
            state,
            format_cache_age(cache.last_updated_at(), now),
            format_cache_age(cache.last_verified_at(), now)
        );
    }
    println!();

    Ok(())
}
