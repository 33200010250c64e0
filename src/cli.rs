//! CLI argument parsing and forge remote configuration.
use clap::{Parser, Subcommand};
use git_url_parse::GitUrl;
use secrecy::SecretString;
use std::{env, path::PathBuf};

use crate::{
    config::Config,
    error::{KeeperError, Result},
    forge::config::RemoteConfig,
};

/// Global CLI arguments for forge configuration and debugging.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "", global = true)]
    /// GitHub repository URL (https://github.com/owner/repo). Falls back to
    /// `repository` in the configuration file.
    pub github_repo: String,

    #[arg(long, default_value = "", global = true)]
    /// GitHub personal access token. Falls back to GITHUB_TOKEN env var.
    pub github_token: String,

    #[arg(long, global = true)]
    /// Path to the configuration file (default: ./releasekeeper.toml).
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Release operation subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Promote the unreleased changelog section to a release.
    UpdateChangelog(UpdateChangelogArgs),

    /// Print the latest released version recorded in the changelog.
    LatestVersion(LatestVersionArgs),

    /// Update the changelog, commit, push, draft a release and open PRs.
    Release(ReleaseArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct UpdateChangelogArgs {
    #[arg(long)]
    /// Version of the release.
    pub release_version: String,

    #[arg(long)]
    /// Date of the release (YYYY-MM-DD). Defaults to today.
    pub release_date: Option<String>,

    #[arg(long)]
    /// Path to the changelog file. Overrides the configuration file.
    pub file_path: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LatestVersionArgs {
    #[arg(long)]
    /// Path to the changelog file. Overrides the configuration file.
    pub file_path: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReleaseArgs {
    #[arg(long)]
    /// Version of the release.
    pub release_version: String,

    #[arg(long)]
    /// Date of the release (YYYY-MM-DD). Defaults to today.
    pub release_date: Option<String>,

    #[arg(long, default_value_t = false)]
    /// Cut a release branch from the source branch before updating.
    pub create_branch: bool,

    #[arg(long, default_value_t = false)]
    /// Create an annotated tag for the release commit and push it.
    pub tag: bool,

    #[arg(long, default_value_t = false)]
    /// Commit locally but skip pushing and all forge calls.
    pub dry_run: bool,
}

impl Args {
    /// Repository URL from `--github-repo`, falling back to the
    /// configuration file.
    pub fn repository_url(&self, config: &Config) -> Option<String> {
        if !self.github_repo.is_empty() {
            return Some(self.github_repo.clone());
        }
        config.repository.clone()
    }

    /// Configure the GitHub remote from the repository URL and token.
    pub fn get_remote(&self, config: &Config) -> Result<RemoteConfig> {
        let url = self.repository_url(config).ok_or_else(|| {
            KeeperError::InvalidRemote("must configure a remote".into())
        })?;

        let parsed = parse_repo_url(&url)?;

        let mut token = self.github_token.clone();

        if token.is_empty()
            && let Some(parsed_token) = parsed.token
        {
            token = parsed_token;
        }

        if token.is_empty()
            && let Ok(env_var_token) = env::var("GITHUB_TOKEN")
        {
            token = env_var_token;
        }

        if token.is_empty() {
            return Err(KeeperError::InvalidRemote(
                "must set github token".into(),
            ));
        }

        Ok(RemoteConfig {
            host: parsed.host,
            scheme: parsed.scheme,
            owner: parsed.owner,
            repo: parsed.name,
            token: SecretString::from(token),
        })
    }
}

struct ParsedRepoUrl {
    host: String,
    scheme: String,
    owner: String,
    name: String,
    token: Option<String>,
}

/// Web URL (`<scheme>://<host>/<owner>/<repo>`) of a repository URL. ssh and
/// git remotes map to https.
pub fn repo_web_url(url: &str) -> Result<String> {
    let parsed = GitUrl::parse(url)?;

    let scheme = match parsed.scheme {
        git_url_parse::Scheme::Http => "http",
        _ => "https",
    };
    let (host, owner) = host_and_owner(url, parsed.host, parsed.owner)?;

    Ok(format!("{scheme}://{host}/{owner}/{}", parsed.name))
}

fn host_and_owner(
    url: &str,
    host: Option<String>,
    owner: Option<String>,
) -> Result<(String, String)> {
    let host = host.ok_or_else(|| {
        KeeperError::InvalidRemote(format!("unable to parse host from {url}"))
    })?;

    let owner = owner.ok_or_else(|| {
        KeeperError::InvalidRemote(format!("unable to parse owner from {url}"))
    })?;

    Ok((host, owner))
}

/// Validate repository URL uses HTTP or HTTPS scheme.
fn validate_scheme(scheme: git_url_parse::Scheme) -> Result<()> {
    match scheme {
        git_url_parse::Scheme::Http => Ok(()),
        git_url_parse::Scheme::Https => Ok(()),
        _ => Err(KeeperError::InvalidRemote(
            "only http and https schemes are supported for repo urls".into(),
        )),
    }
}

fn parse_repo_url(url: &str) -> Result<ParsedRepoUrl> {
    let parsed = GitUrl::parse(url)?;

    validate_scheme(parsed.scheme)?;

    let (host, owner) = host_and_owner(url, parsed.host, parsed.owner)?;

    Ok(ParsedRepoUrl {
        host,
        scheme: parsed.scheme.to_string(),
        owner,
        name: parsed.name,
        token: parsed.token,
    })
}
