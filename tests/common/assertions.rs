//! Common assertion helpers for test output validation
//!
//! Provides predicates for validating repo-mirror command output and error messages.

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for git repository error messages
pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
        .or(predicates::str::contains("NotInGitRepo"))
}

/// Creates a predicate that checks for the unknown cache name error
pub fn unknown_cache_type(name: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("Unknown cache type: '{name}'"))
}

/// Creates a predicate that checks every cache name is listed
pub fn lists_every_cache() -> impl Predicate<str> {
    predicates::str::contains("branches")
        .and(predicates::str::contains("log"))
        .and(predicates::str::contains("repository-info"))
        .and(predicates::str::contains("status"))
        .and(predicates::str::contains("locks"))
        .and(predicates::str::contains("user"))
}
