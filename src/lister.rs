//! Remote repository listing
//!
//! The wizard core only depends on the [`RemoteRepositoryLister`] trait, so
//! tests can substitute a canned listing and the engine never knows which
//! HTTP client (or none) sits behind it. The concrete implementations here
//! talk to the GitHub and Gitea REST APIs over a blocking `ureq` agent with
//! an explicit request timeout; authentication and network failures are
//! surfaced unmodified as [`Error::Listing`].

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

/// Trait for remote repository listing - allows mocking in tests
pub trait RemoteRepositoryLister: Send + Sync {
    /// List the repository names of `organization`, acting as `identity`.
    ///
    /// `identity` scopes caching; the credential configured on the
    /// implementation decides what the remote actually shows.
    fn list_repositories_for_organization(
        &self,
        identity: &str,
        organization: &str,
    ) -> Result<Vec<String>>;
}

/// Repository object as returned by both the GitHub and Gitea APIs; only
/// the name is of interest here.
#[derive(Debug, Deserialize)]
struct RemoteRepo {
    name: String,
}

/// Pagination of the listing endpoint; the query parameter naming and the
/// maximum page size differ between the two APIs.
struct Paging {
    size_param: &'static str,
    size: usize,
}

/// GitHub: `per_page`, capped at 100.
const GITHUB_PAGING: Paging = Paging {
    size_param: "per_page",
    size: 100,
};

/// Gitea: `limit`, capped at 50.
const GITEA_PAGING: Paging = Paging {
    size_param: "limit",
    size: 50,
};

fn listing_error(organization: &str, message: impl ToString) -> Error {
    Error::Listing {
        organization: organization.to_string(),
        message: message.to_string(),
    }
}

/// Fetch all pages of a repository listing endpoint.
///
/// Both APIs paginate; keep requesting pages until one comes back short.
fn fetch_all_pages(
    agent: &ureq::Agent,
    base: &Url,
    organization: &str,
    auth_header: Option<&str>,
    paging: &Paging,
) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for page in 1.. {
        let url = format!("{}?{}={}&page={}", base, paging.size_param, paging.size, page);
        let mut request = agent
            .get(&url)
            .set("Accept", "application/json")
            .set("User-Agent", "repo-import");
        if let Some(value) = auth_header {
            request = request.set("Authorization", value);
        }
        let repos: Vec<RemoteRepo> = request
            .call()
            .map_err(|e| listing_error(organization, e))?
            .into_json()
            .map_err(|e| listing_error(organization, e))?;

        let page_len = repos.len();
        names.extend(repos.into_iter().map(|r| r.name));
        if page_len < paging.size {
            break;
        }
    }
    Ok(names)
}

/// Lister backed by the GitHub REST API (`/orgs/{org}/repos`).
#[derive(Debug)]
pub struct GithubLister {
    agent: ureq::Agent,
    api_url: Url,
    token: Option<String>,
}

impl GithubLister {
    /// Create a lister against `api_url` (normally `https://api.github.com`)
    /// with the given request timeout.
    pub fn new(api_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            api_url: Url::parse(api_url)?,
            token,
        })
    }

    fn org_repos_url(&self, organization: &str) -> Result<Url> {
        Ok(self
            .api_url
            .join(&format!("orgs/{}/repos", organization))?)
    }
}

impl RemoteRepositoryLister for GithubLister {
    fn list_repositories_for_organization(
        &self,
        identity: &str,
        organization: &str,
    ) -> Result<Vec<String>> {
        log::debug!("GitHub listing for {} as {}", organization, identity);
        let url = self.org_repos_url(organization)?;
        let auth = self.token.as_ref().map(|t| format!("Bearer {}", t));
        fetch_all_pages(&self.agent, &url, organization, auth.as_deref(), &GITHUB_PAGING)
    }
}

/// Lister backed by the Gitea REST API (`/api/v1/orgs/{org}/repos`).
pub struct GiteaLister {
    agent: ureq::Agent,
    api_url: Url,
    token: Option<String>,
}

impl GiteaLister {
    /// Create a lister against a self-hosted Gitea instance's base URL.
    pub fn new(api_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            api_url: Url::parse(api_url)?,
            token,
        })
    }

    fn org_repos_url(&self, organization: &str) -> Result<Url> {
        Ok(self
            .api_url
            .join(&format!("api/v1/orgs/{}/repos", organization))?)
    }
}

impl RemoteRepositoryLister for GiteaLister {
    fn list_repositories_for_organization(
        &self,
        identity: &str,
        organization: &str,
    ) -> Result<Vec<String>> {
        log::debug!("Gitea listing for {} as {}", organization, identity);
        let url = self.org_repos_url(organization)?;
        let auth = self.token.as_ref().map(|t| format!("token {}", t));
        fetch_all_pages(&self.agent, &url, organization, auth.as_deref(), &GITEA_PAGING)
    }
}
