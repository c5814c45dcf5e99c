//! Color mapping for status lines and cache listings.
//!
//! # Public API
//! - [`get_status_color_style`]: color function for a file status
//! - [`get_aligned_status`]: status code padded to two columns
//! - [`format_status_entry`]: one status line, code then path
//! - [`format_cache_age`]: how long ago a cache last changed
//!
//! # Color Scheme
//! - **Modified**: yellow
//! - **Added**: green
//! - **Deleted**: red
//! - **Renamed**: blue
//! - **Untracked**: cyan
//! - **Unmerged**: red bold

use crate::core::git_status::GitFileStatus;
use crate::core::state::GitStatusEntry;
use chrono::{DateTime, TimeDelta, Utc};
use colored::*;

/// Returns a closure that colors any text the way `status` is colored
pub fn get_status_color_style(status: GitFileStatus) -> Box<dyn Fn(&str) -> ColoredString> {
    match status {
        GitFileStatus::Modified => Box::new(|text: &str| text.yellow()),
        GitFileStatus::Untracked => Box::new(|text: &str| text.cyan()),
        GitFileStatus::Deleted => Box::new(|text: &str| text.red()),
        GitFileStatus::Added => Box::new(|text: &str| text.green()),
        GitFileStatus::Renamed => Box::new(|text: &str| text.blue()),
        GitFileStatus::TypeChanged => Box::new(|text: &str| text.magenta()),
        GitFileStatus::Unmerged => Box::new(|text: &str| text.red().bold()),
    }
}

pub fn get_aligned_status(status: GitFileStatus) -> ColoredString {
    let color_fn = get_status_color_style(status);
    let status_str = status.as_str();
    match status_str {
        s if s.len() == 2 => color_fn(status_str),
        _ => color_fn(&format!("{status_str} ")),
    }
}

pub fn format_status_entry(entry: &GitStatusEntry) -> String {
    let color_fn = get_status_color_style(entry.status);
    let path = entry.path.to_string_lossy();
    let marker = if entry.staged { "+".green() } else { " ".normal() };
    format!(
        "{marker}{}  {}",
        get_aligned_status(entry.status),
        color_fn(&path)
    )
}

/// `never` for epoch stamps, otherwise a coarse "N unit ago"
pub fn format_cache_age(at: DateTime<Utc>, now: DateTime<Utc>) -> ColoredString {
    if at == DateTime::<Utc>::UNIX_EPOCH {
        return "never".bright_black();
    }

    let age = now.signed_duration_since(at).max(TimeDelta::zero());
    let text = if age < TimeDelta::seconds(1) {
        format!("{}ms ago", age.num_milliseconds())
    } else if age < TimeDelta::minutes(1) {
        format!("{}s ago", age.num_seconds())
    } else if age < TimeDelta::hours(1) {
        format!("{}m ago", age.num_minutes())
    } else if age < TimeDelta::days(1) {
        format!("{}h ago", age.num_hours())
    } else {
        format!("{}d ago", age.num_days())
    };

    text.white()
}
