use crate::core::{cache_type::CacheType, error::Result, print_info, print_success, MirrorCommandInit};
use colored::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Caches touched during one refresh.
///
/// Stale caches are reset in a first pass, so an update seen during that pass is a
/// reset to empty, not new data.
#[derive(Default)]
struct RefreshTally {
    validating: bool,
    invalidated: Vec<CacheType>,
    reset: Vec<CacheType>,
    updated: Vec<CacheType>,
}

impl RefreshTally {
    /// Returns false when `cache_type` was already invalidated in this refresh
    fn record_invalidated(&mut self, cache_type: CacheType) -> bool {
        record(&mut self.invalidated, cache_type)
    }

    fn record_updated(&mut self, cache_type: CacheType) {
        if self.validating {
            record(&mut self.reset, cache_type);
        } else {
            record(&mut self.updated, cache_type);
        }
    }

    /// Caches that took new data without having been reset first
    fn changed(&self) -> usize {
        self.updated
            .iter()
            .filter(|cache_type| !self.reset.contains(cache_type))
            .count()
    }

    /// Caches reset for staleness and filled again
    fn reloaded(&self) -> usize {
        self.reset
            .iter()
            .filter(|cache_type| self.updated.contains(cache_type))
            .count()
    }
}

fn record(list: &mut Vec<CacheType>, cache_type: CacheType) -> bool {
    if list.contains(&cache_type) {
        return false;
    }
    list.push(cache_type);
    true
}

/// Refresh every cache and print the container events it produced
pub fn execute_refresh() -> Result<()> {
    let context = MirrorCommandInit::initialize()?;
    let tally = Rc::new(RefCell::new(RefreshTally::default()));

    let on_invalidated = Rc::clone(&tally);
    context.container.on_cache_invalidated(move |cache_type| {
        if on_invalidated.borrow_mut().record_invalidated(cache_type) {
            println!("  {} {}", "invalidated".yellow(), cache_type.as_str().white());
        }
    });
    let on_updated = Rc::clone(&tally);
    context.container.on_cache_updated(move |cache_type, at| {
        let mut tally = on_updated.borrow_mut();
        tally.record_updated(cache_type);
        let label = if tally.validating { "reset".yellow() } else { "updated".green() };
        println!(
            "  {} {} {}",
            label,
            cache_type.as_str().white(),
            at.format("%H:%M:%S%.3f").to_string().bright_black()
        );
    });

    tally.borrow_mut().validating = true;
    context.container.validate_all()?;
    tally.borrow_mut().validating = false;
    context.repository.refresh()?;

    let tally = tally.borrow();
    let reloaded = tally.reloaded();
    if reloaded > 0 {
        print_info(&format!("Reloaded {reloaded} stale cache(s)"));
    }
    match tally.changed() {
        0 => print_info("No cache changed"),
        n => print_success(&format!("Refreshed {n} cache(s)")),
    }

    Ok(())
}
