//! Release command: changelog update, commit, tag, push, draft release and
//! pull requests.
use log::*;
use std::{env, path::Path};

use crate::{
    changelog::{Changelog, CompareLinks},
    cli,
    command::common,
    config::Config,
    error::{KeeperError, Result},
    forge::{
        github::Github,
        request::{CreatePrRequest, CreateReleaseRequest, PullRequest},
        traits::Forge,
    },
    repo::Repository,
    version::ReleaseVersion,
};

/// What to release and which optional steps to run.
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub version: String,
    pub date: String,
    pub create_branch: bool,
    pub tag: bool,
}

/// Local result of a release, ready to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRelease {
    pub version: String,
    /// Tag name, whether or not it was created locally.
    pub tag: String,
    pub tagged: bool,
    /// Branch holding the changelog commit.
    pub branch: String,
    /// Notes of the released changelog entry.
    pub notes: String,
}

/// Execute the release command.
pub async fn execute(args: &cli::Args, cmd: &cli::ReleaseArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;

    // resolve the remote before touching the repository so a missing token
    // fails before anything is committed
    let remote = if cmd.dry_run {
        None
    } else {
        Some(args.get_remote(&config)?)
    };

    let mut repo = Repository::open(&env::current_dir()?)?;
    if let Some(remote) = &remote {
        repo = repo.with_remote_config(remote);
    }

    let links =
        common::compare_links(args, &config, &config.changelog_path)?;

    let plan = ReleasePlan {
        version: cmd.release_version.clone(),
        date: cmd.release_date.clone().unwrap_or_else(common::today),
        create_branch: cmd.create_branch,
        tag: cmd.tag,
    };

    let workflow = ReleaseWorkflow::new(&repo, &config, links);
    let prepared = workflow.prepare(&plan)?;

    let Some(remote) = remote else {
        info!(
            "dry run: skipping push of {} and creation of draft release {}",
            prepared.branch, prepared.tag
        );
        for base in config.base_branches.iter() {
            info!(
                "dry run: skipping pull request {} -> {base}",
                prepared.branch
            );
        }
        return Ok(());
    };

    let forge = Github::new(remote).await?;
    workflow.publish(&forge, &prepared).await?;

    Ok(())
}

/// Runs the release steps against a repository.
pub struct ReleaseWorkflow<'a> {
    repo: &'a Repository,
    config: &'a Config,
    links: CompareLinks,
}

impl<'a> ReleaseWorkflow<'a> {
    pub fn new(
        repo: &'a Repository,
        config: &'a Config,
        links: CompareLinks,
    ) -> Self {
        Self {
            repo,
            config,
            links,
        }
    }

    /// Update and commit the changelog, optionally on a fresh release branch
    /// and with an annotated tag.
    ///
    /// The changelog release is validated before any branch or commit is
    /// created. A rejected release switches back to the branch that was
    /// checked out.
    pub fn prepare(&self, plan: &ReleasePlan) -> Result<PreparedRelease> {
        let parsed = semver::Version::parse_version(&plan.version)?;
        let version = parsed.to_string();
        let path = self.repo.workdir()?.join(&self.config.changelog_path);

        let changelog = if plan.create_branch {
            let original = self.repo.current_branch()?;
            self.repo.switch_branch(&self.config.source_branch)?;

            match self.release_changelog(&path, &version, &plan.date) {
                Ok(changelog) => changelog,
                Err(err) => {
                    self.repo.switch_branch(&original)?;
                    return Err(err);
                }
            }
        } else {
            self.release_changelog(&path, &version, &plan.date)?
        };

        let branch = if plan.create_branch {
            let branch = self.config.release_branch(&version);
            self.repo.create_branch(&branch)?;
            branch
        } else {
            self.repo.current_branch()?
        };

        changelog.save(&path)?;

        info!("committing changelog changes for release {version}");
        self.repo.add_path(&path)?;
        self.repo
            .commit(&format!("Update Changelog for release {version}"))?;

        let tag = self.config.tag_name(&version);
        if plan.tag {
            self.repo
                .tag_head(&tag, &format!("Release version {version}"))?;
        }

        let notes = changelog
            .find_release(&parsed)
            .map(|record| record.notes())
            .ok_or_else(|| {
                KeeperError::Other(color_eyre::eyre::eyre!(
                    "released record for {version} missing from changelog"
                ))
            })?;

        Ok(PreparedRelease {
            version,
            tag,
            tagged: plan.tag,
            branch,
            notes,
        })
    }

    fn release_changelog(
        &self,
        path: &Path,
        version: &str,
        date: &str,
    ) -> Result<Changelog> {
        info!("updating changelog for release {version}");
        let mut changelog = Changelog::load(path, self.links.clone())?;
        changelog.release_latest(version, date)?;
        Ok(changelog)
    }

    /// Push the release and open the draft release and pull requests.
    pub async fn publish(
        &self,
        forge: &dyn Forge,
        prepared: &PreparedRelease,
    ) -> Result<Vec<PullRequest>> {
        let remote = self.config.remote.as_str();

        if prepared.tagged {
            self.repo.push_tag(remote, &prepared.tag)?;
        }
        self.repo.push_branch(remote, &prepared.branch)?;

        let release_url = forge
            .create_draft_release(CreateReleaseRequest {
                tag: prepared.tag.clone(),
                target: prepared.branch.clone(),
                name: prepared.tag.clone(),
                notes: prepared.notes.clone(),
            })
            .await?;
        info!("draft release created at {release_url}");

        let repo_name = forge.remote_config().repo;
        let title = format!("{repo_name} release {}", prepared.tag);
        let body = format!(
            "Release notes:\n{}\nRelease URL: {release_url}\n\
Please review and merge this PR to complete the release process.",
            prepared.notes
        );

        let mut pull_requests = vec![];

        for base in self.config.base_branches.iter() {
            let pr = forge
                .create_pr(CreatePrRequest {
                    head_branch: prepared.branch.clone(),
                    base_branch: base.clone(),
                    title: title.clone(),
                    body: body.clone(),
                })
                .await?;
            info!("pull request #{} created at {}", pr.number, pr.url);
            pull_requests.push(pr);
        }

        Ok(pull_requests)
    }
}

#[cfg(test)]
#[path = "release_tests.rs"]
mod tests;

