//! Repository collaborator
//!
//! Wraps git behind a trait so the workflow can run against a scripted
//! repository in tests. The real implementation shells out to the `git`
//! binary; every failed command surfaces as [`Error::Git`] with the
//! command's stderr attached.

use crate::error::{Error, Result};
use crate::types::Author;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Read/write access to the local repository and its remotes
pub trait Repository {
    /// Project display name (final component of the repository path)
    fn project_name(&self) -> String;

    /// Name of the currently checked-out branch
    fn current_branch(&self) -> Result<String>;

    /// Whether `refs/heads/<name>` resolves locally
    ///
    /// A ref that fails to resolve is "absent", not an error.
    fn ref_exists(&self, name: &str) -> Result<bool>;

    /// All configured remote names
    fn remotes(&self) -> Result<Vec<String>>;

    /// Whether `remote` has a head named exactly `name`
    fn remote_has_branch(&self, remote: &str, name: &str) -> Result<bool>;

    /// Paths staged in the index (diff against HEAD)
    fn staged_files(&self) -> Result<Vec<String>>;

    /// Paths modified in the working tree but not staged
    fn modified_files(&self) -> Result<Vec<String>>;

    /// Stage every modification in the working tree
    fn stage_all(&self) -> Result<()>;

    /// Create a local branch at the current HEAD
    fn create_branch(&self, name: &str) -> Result<()>;

    /// Check out an existing branch
    fn checkout(&self, name: &str) -> Result<()>;

    /// Commit the staged index with an explicit author identity
    fn commit(&self, message: &str, author: &Author) -> Result<()>;

    /// Push `refspec` to `remote`
    fn push(&self, remote: &str, refspec: &str) -> Result<()>;

    /// The single remote new branches are pushed to
    ///
    /// "origin" when configured, otherwise the first configured remote.
    fn push_remote(&self) -> Result<String> {
        let remotes = self.remotes()?;
        remotes
            .iter()
            .find(|r| *r == "origin")
            .or_else(|| remotes.first())
            .cloned()
            .ok_or_else(|| Error::Git("no remotes configured; cannot push".to_string()))
    }
}

/// Repository backed by the `git` binary
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Open the repository at `path`, verifying it is a git work tree.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Self {
            root: path.to_path_buf(),
        };
        let inside = repo.run(&["rev-parse", "--is-inside-work-tree"])?;
        if inside.trim() == "true" {
            Ok(repo)
        } else {
            Err(Error::Git(format!(
                "'{}' is not inside a git work tree",
                path.display()
            )))
        }
    }

    /// Run git with `args`, returning the raw output without status checks.
    fn raw(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(|e| Error::Git(format!("failed to spawn git: {e}")))
    }

    /// Run git with `args`, failing on a non-zero exit status.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.raw(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run git and split stdout into trimmed, non-empty lines.
    fn run_lines(&self, args: &[&str]) -> Result<Vec<String>> {
        Ok(self
            .run(args)?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect())
    }
}

impl Repository for GitCli {
    fn project_name(&self) -> String {
        self.root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone())
            .file_name()
            .map_or_else(
                || self.root.display().to_string(),
                |n| n.to_string_lossy().into_owned(),
            )
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?.trim().to_string())
    }

    fn ref_exists(&self, name: &str) -> Result<bool> {
        let refname = format!("refs/heads/{name}");
        let output = self.raw(&["rev-parse", "--verify", "--quiet", &refname])?;
        Ok(output.status.success())
    }

    fn remotes(&self) -> Result<Vec<String>> {
        self.run_lines(&["remote"])
    }

    fn remote_has_branch(&self, remote: &str, name: &str) -> Result<bool> {
        let heads = self.run(&["ls-remote", "--heads", remote, name])?;
        Ok(!heads.trim().is_empty())
    }

    fn staged_files(&self) -> Result<Vec<String>> {
        self.run_lines(&["diff", "--name-only", "--cached"])
    }

    fn modified_files(&self) -> Result<Vec<String>> {
        self.run_lines(&["diff", "--name-only"])
    }

    fn stage_all(&self) -> Result<()> {
        self.run(&["add", "--all"]).map(|_| ())
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.run(&["branch", name]).map(|_| ())
    }

    fn checkout(&self, name: &str) -> Result<()> {
        self.run(&["checkout", name]).map(|_| ())
    }

    fn commit(&self, message: &str, author: &Author) -> Result<()> {
        let name_cfg = format!("user.name={}", author.name);
        let email_cfg = format!("user.email={}", author.email);
        let author_spec = format!("{} <{}>", author.name, author.email);
        self.run(&[
            "-c",
            &name_cfg,
            "-c",
            &email_cfg,
            "commit",
            "-m",
            message,
            "--author",
            &author_spec,
        ])
        .map(|_| ())
    }

    fn push(&self, remote: &str, refspec: &str) -> Result<()> {
        self.run(&["push", remote, refspec]).map(|_| ())
    }
}
