//! Local git repository operations for the release workflow.
//!
//! Wraps `git2::Repository` with the handful of operations a release needs:
//! cutting a release branch, committing the changelog, tagging, and pushing
//! the branch and tag to a remote.
//!
//! # Usage
//!
//! ```rust,ignore
//! let repo = Repository::open(Path::new("."))?;
//! repo.switch_branch("stg")?;
//! repo.create_branch("release-1.3.0")?;
//! repo.add_path(Path::new("Changelog.md"))?;
//! repo.commit("Update Changelog for release 1.3.0")?;
//! repo.push_branch("origin", "release-1.3.0")?;
//! ```
use git2::RemoteCallbacks;
use log::*;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;

use crate::{
    error::{KeeperError, Result},
    forge::config::RemoteConfig,
};

/// Username sent alongside an access token for https pushes.
const TOKEN_USER: &str = "x-access-token";

/// Create Git authentication callbacks for username/token authentication.
fn get_auth_callbacks<'r>(user: String, token: String) -> RemoteCallbacks<'r> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(move |_url, _username, _allowed| {
        git2::Cred::userpass_plaintext(&user, &token)
    });
    callbacks
}

/// Git repository interface for release automation.
pub struct Repository {
    repo: git2::Repository,
    token: Option<SecretString>,
}

impl Repository {
    /// Open the repository containing `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = git2::Repository::discover(path)?;
        debug!("opened repository: {}", repo.path().display());
        Ok(Self { repo, token: None })
    }

    /// Authenticate pushes with the token of the given remote.
    pub fn with_remote_config(mut self, config: &RemoteConfig) -> Self {
        if !config.token.expose_secret().is_empty() {
            self.token = Some(config.token.clone());
        }
        self
    }

    pub fn workdir(&self) -> Result<&Path> {
        self.repo.workdir().ok_or_else(|| {
            KeeperError::Git(git2::Error::from_str(
                "repository has no working directory",
            ))
        })
    }

    /// Short name of the checked out branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        let name = head.shorthand().ok_or_else(|| {
            KeeperError::Git(git2::Error::from_str(
                "unable to determine current branch",
            ))
        })?;
        Ok(name.to_string())
    }

    /// Switch to the specified branch and update the working directory.
    pub fn switch_branch(&self, branch: &str) -> Result<()> {
        info!("switching to branch: {branch}");
        let ref_name = format!("refs/heads/{}", branch);
        let target_obj = self.repo.revparse_single(&ref_name)?;
        self.repo.checkout_tree(&target_obj, None)?;
        self.repo.set_head(&ref_name)?;
        Ok(())
    }

    /// Create a new branch from HEAD and check it out. Fails if the branch
    /// already exists.
    pub fn create_branch(&self, branch: &str) -> Result<()> {
        info!("creating branch: {branch}");
        let head = self.repo.head()?;
        let commit = head.peel_to_commit()?;
        self.repo.branch(branch, &commit, false)?;
        self.switch_branch(branch)
    }

    /// Stage a single file. Absolute paths must live inside the working
    /// directory.
    pub fn add_path(&self, path: &Path) -> Result<()> {
        let workdir = self.workdir()?;
        let relative = if path.is_absolute() {
            path.strip_prefix(workdir).map_err(|_| {
                KeeperError::Git(git2::Error::from_str(&format!(
                    "{} is outside of the repository",
                    path.display()
                )))
            })?
        } else {
            path
        };

        debug!("adding {} to index", relative.display());
        let mut index = self.repo.index()?;
        index.add_path(relative)?;
        index.write()?;
        Ok(())
    }

    /// Commit the index on top of HEAD using the configured git identity.
    pub fn commit(&self, msg: &str) -> Result<()> {
        debug!("committing changes with msg: {msg}");
        let committer = self.repo.signature()?;
        let mut index = self.repo.index()?;
        let oid = index.write_tree()?;
        let tree = self.repo.find_tree(oid)?;
        let parent_commit = self.repo.head()?.peel_to_commit()?;
        self.repo.commit(
            Some("HEAD"),
            &committer,
            &committer,
            msg,
            &tree,
            &[&parent_commit],
        )?;
        Ok(())
    }

    /// Create an annotated tag on HEAD.
    pub fn tag_head(&self, tag: &str, message: &str) -> Result<()> {
        info!("tagging HEAD as {tag}");
        let commit = self.repo.head()?.peel_to_commit()?;
        let tagger = self.repo.signature()?;
        self.repo
            .tag(tag, commit.as_object(), &tagger, message, false)?;
        Ok(())
    }

    /// Fetch URL of a configured remote.
    pub fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        let remote = self.repo.find_remote(remote)?;
        Ok(remote.url().map(|url| url.to_string()))
    }

    /// Push a branch and record the remote as its upstream.
    pub fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        info!("pushing branch {branch} to {remote}");
        let ref_spec = format!("refs/heads/{branch}:refs/heads/{branch}");
        self.push(remote, &ref_spec)?;

        let mut config = self.repo.config()?;
        config.set_str(&format!("branch.{branch}.remote"), remote)?;
        config.set_str(
            &format!("branch.{branch}.merge"),
            &format!("refs/heads/{branch}"),
        )?;

        Ok(())
    }

    /// Push a single tag.
    pub fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        info!("pushing tag {tag} to {remote}");
        let ref_spec = format!("refs/tags/{tag}:refs/tags/{tag}");
        self.push(remote, &ref_spec)
    }

    fn push(&self, remote: &str, ref_spec: &str) -> Result<()> {
        let mut push_opts = git2::PushOptions::default();

        if let Some(token) = &self.token {
            let callbacks = get_auth_callbacks(
                TOKEN_USER.into(),
                token.expose_secret().to_string(),
            );
            push_opts.remote_callbacks(callbacks);
        }

        let mut remote = self.repo.find_remote(remote)?;
        remote.push(&[ref_spec], Some(&mut push_opts))?;

        Ok(())
    }
}
