//! Git repository management and setup utilities
//!
//! Provides functions for creating test repositories and for running the
//! repo-mirror binary against them with an isolated config and cache home.

#![allow(dead_code)]

use assert_cmd::prelude::*;
use repo_mirror::core::{
    config::MirrorConfig,
    error::{RepoMirrorError, Result},
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test repository plus a separate home for config and snapshot files.
///
/// Both directories must be kept alive for the duration of the test. The home
/// lives outside the working tree so snapshot files never show up in `git status`.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub home: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cache_home(&self) -> PathBuf {
        self.home.path().join("cache")
    }

    /// Config sharing the snapshot directory the binary uses for this repo
    pub fn config(&self, ttl_ms: u64) -> MirrorConfig {
        MirrorConfig {
            ttl_ms,
            cache_dir: Some(self.cache_home().join("repo-mirror")),
            ..MirrorConfig::default()
        }
    }

    /// `repo-mirror` command running inside the repository, with XDG dirs in `home`
    pub fn mirror_cmd(&self) -> anyhow::Result<Command> {
        let mut cmd = Command::cargo_bin("repo-mirror")?;
        cmd.current_dir(&self.path)
            .env("XDG_CONFIG_HOME", self.home.path().join("config"))
            .env("XDG_CACHE_HOME", self.cache_home())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        Ok(cmd)
    }
}

/// Runs `git <args>` in `repo_path`
pub fn git(repo_path: &Path, args: &[&str]) -> Result<()> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .map_err(RepoMirrorError::Io)?;

    if !output.status.success() {
        return Err(RepoMirrorError::git_command_failed(
            String::from_utf8_lossy(&output.stderr).trim(),
        ));
    }
    Ok(())
}

/// Sets up a fresh git repository on `main` with a configured user
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new().map_err(RepoMirrorError::Io)?;
    let home = TempDir::new().map_err(RepoMirrorError::Io)?;
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init", "-b", "main"])?;
    git(&repo_path, &["config", "user.name", "Test User"])?;
    git(&repo_path, &["config", "user.email", "test@example.com"])?;

    Ok(TestRepo {
        temp_dir,
        home,
        path: repo_path,
    })
}

/// Sets up a git repository with "initial.txt" committed as "Initial commit"
pub fn setup_test_repo_with_initial_commit() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_file(&repo.path, "initial.txt", "initial content\n")?;
    git(&repo.path, &["add", "initial.txt"])?;
    git(&repo.path, &["commit", "-m", "Initial commit"])?;

    Ok(repo)
}

/// Creates a file with specified content in the repository
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    fs::write(repo_path.join(filename), content).map_err(RepoMirrorError::Io)?;
    Ok(())
}

/// Creates a git commit of everything in the working tree
pub fn commit_all(repo_path: &Path, message: &str) -> Result<()> {
    git(repo_path, &["add", "-A"])?;
    git(repo_path, &["commit", "-m", message])
}
