//! System git backend
//!
//! Every operation is one `git` subprocess run in the working tree.

use crate::error::{Error, Result};
use crate::repo::{LocalRepository, find_template};
use crate::types::{Branch, GitRemote};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Fallback when a remote has no `HEAD` symref
const FALLBACK_DEFAULT_BRANCH: &str = "master";

/// Repository backed by the `git` binary
pub struct SystemGit {
    work_tree: PathBuf,
    git_dir: PathBuf,
}

impl SystemGit {
    /// Open the repository containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let output = Command::new("git")
            .arg("-C")
            .arg(path)
            .args(["rev-parse", "--show-toplevel", "--absolute-git-dir"])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(format!(
                "not a git repository: {} ({})",
                path.display(),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut lines = stdout.lines();
        let (Some(work_tree), Some(git_dir)) = (lines.next(), lines.next()) else {
            return Err(Error::Git(format!(
                "unexpected rev-parse output for {}",
                path.display()
            )));
        };

        Ok(Self {
            work_tree: PathBuf::from(work_tree),
            git_dir: PathBuf::from(git_dir),
        })
    }

    fn git_cmd(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.work_tree)
            .args(["-c", "log.showSignature=false"])
            .stdin(Stdio::null());
        cmd
    }

    /// Run git and return trimmed stdout, failing on non-zero exit
    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(?args, "git");
        let output = self.git_cmd().args(args).output()?;

        if !output.status.success() {
            return Err(Error::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }

    /// Run git, treating a non-zero exit as "no value"
    fn run_optional(&self, args: &[&str]) -> Result<Option<String>> {
        let output = self.git_cmd().args(args).output()?;
        if !output.status.success() {
            return Ok(None);
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!value.is_empty()).then_some(value))
    }
}

impl LocalRepository for SystemGit {
    fn current_branch(&self) -> Result<Branch> {
        let head = self
            .run_optional(&["symbolic-ref", "--quiet", "HEAD"])?
            .ok_or_else(|| Error::Git("Aborted: not currently on any branch.".to_string()))?;

        let name = head.strip_prefix("refs/heads/").unwrap_or(&head);
        Ok(Branch::local(name))
    }

    fn remotes(&self) -> Result<Vec<GitRemote>> {
        let Some(config) =
            self.run_optional(&["config", "--get-regexp", r"^remote\..+\.url$"])?
        else {
            return Ok(Vec::new());
        };

        Ok(config
            .lines()
            .filter_map(|line| {
                let (key, url) = line.split_once(' ')?;
                let name = key.strip_prefix("remote.")?.strip_suffix(".url")?;
                Some(GitRemote {
                    name: name.to_string(),
                    url: url.trim().to_string(),
                })
            })
            .collect())
    }

    fn default_branch(&self, remote: &str) -> Result<String> {
        let symref = format!("refs/remotes/{remote}/HEAD");
        let prefix = format!("refs/remotes/{remote}/");

        Ok(self
            .run_optional(&["symbolic-ref", &symref])?
            .and_then(|target| target.strip_prefix(&prefix).map(ToString::to_string))
            .unwrap_or_else(|| FALLBACK_DEFAULT_BRANCH.to_string()))
    }

    fn tracking_branch(&self, branch: &Branch) -> Result<Option<Branch>> {
        let remote_key = format!("branch.{}.remote", branch.short_name);
        let merge_key = format!("branch.{}.merge", branch.short_name);

        let (Some(remote), Some(merge)) = (
            self.run_optional(&["config", &remote_key])?,
            self.run_optional(&["config", &merge_key])?,
        ) else {
            return Ok(None);
        };

        let name = merge.strip_prefix("refs/heads/").unwrap_or(&merge);
        if remote == "." {
            Ok(Some(Branch::local(name)))
        } else {
            Ok(Some(Branch::remote(remote, name)))
        }
    }

    fn push(&self, remote: &str, head: &str) -> Result<()> {
        let refspec = format!("HEAD:{head}");
        self.run(&["push", "--set-upstream", remote, &refspec])?;
        Ok(())
    }

    fn ref_list(&self, base: &str, head: &str) -> Result<Vec<String>> {
        let range = format!("{base}...{head}");
        let output = self.run(&[
            "rev-list",
            "--cherry-pick",
            "--right-only",
            "--no-merges",
            &range,
        ])?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    fn commit_message(&self, commit: &str) -> Result<String> {
        self.run(&["show", "-s", "--format=%s%n%+b", commit])
    }

    fn log(&self, base: &str, head: &str) -> Result<String> {
        let range = format!("{base}...{head}");
        self.run(&[
            "log",
            "--no-color",
            "--format=%h (%aN, %ar)%n%w(78,3,3)%s%n%+b",
            "--cherry",
            &range,
        ])
    }

    fn workdir(&self) -> Result<Option<PathBuf>> {
        Ok(Some(self.work_tree.clone()))
    }

    fn pull_request_template(&self) -> Result<Option<String>> {
        find_template(&self.work_tree)
    }

    fn git_dir(&self) -> Result<PathBuf> {
        Ok(self.git_dir.clone())
    }
}
