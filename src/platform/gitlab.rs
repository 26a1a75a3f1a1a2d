//! GitLab hosting service implementation

use crate::error::{Error, Result};
use crate::platform::HostingService;
use crate::types::{Author, HostUser, MergeRequest, NewMergeRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GitLab service using reqwest
///
/// Talks to one project on one instance. The trust store is configured per
/// instance through the constructor rather than through process-wide
/// environment state, so independent services stay independent.
#[derive(Debug)]
pub struct GitLabService {
    client: Client,
    token: String,
    base_url: Url,
    project_id: u64,
}

#[derive(Deserialize)]
struct GitLabMr {
    iid: u64,
    web_url: String,
    source_branch: String,
    target_branch: String,
    title: String,
    description: Option<String>,
    author: Option<GitLabMrAuthor>,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct GitLabMrAuthor {
    id: u64,
}

#[derive(Deserialize)]
struct GitLabUser {
    name: String,
    email: Option<String>,
    public_email: Option<String>,
}

#[derive(Serialize)]
struct AuthorPayload<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct CreateMrPayload<'a> {
    source_branch: &'a str,
    target_branch: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<AuthorPayload<'a>>,
    squash: bool,
}

impl From<GitLabMr> for MergeRequest {
    fn from(mr: GitLabMr) -> Self {
        Self {
            iid: mr.iid,
            web_url: mr.web_url,
            source_branch: mr.source_branch,
            target_branch: mr.target_branch,
            title: mr.title,
            description: mr.description.filter(|d| !d.is_empty()),
            author_id: mr.author.map(|a| a.id),
            created_at: mr.created_at,
        }
    }
}

impl GitLabService {
    /// Create a new GitLab service for one project.
    ///
    /// `ca_cert` is an optional PEM bundle added to the client trust store
    /// for self-hosted instances behind a private CA.
    pub fn new(
        base_url: &str,
        token: String,
        project_id: u64,
        ca_cert: Option<&Path>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid base URL '{base_url}': {e}")))?;

        let mut builder =
            Client::builder().timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        if let Some(path) = ca_cert {
            let pem = std::fs::read(path).map_err(|e| {
                Error::Config(format!("cannot read CA bundle '{}': {e}", path.display()))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                Error::Config(format!("invalid CA bundle '{}': {e}", path.display()))
            })?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            token,
            base_url,
            project_id,
        })
    }

    fn api_url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/api/v4{path}")
    }
}

#[async_trait]
impl HostingService for GitLabService {
    async fn find_open_mr(&self, source_branch: &str) -> Result<Option<MergeRequest>> {
        let url = self.api_url(&format!("/projects/{}/merge_requests", self.project_id));

        let mrs: Vec<GitLabMr> = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[("source_branch", source_branch), ("state", "opened")])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Platform(e.to_string()))?
            .json()
            .await?;

        Ok(mrs.into_iter().next().map(MergeRequest::from))
    }

    async fn create_mr(&self, request: &NewMergeRequest) -> Result<MergeRequest> {
        let url = self.api_url(&format!("/projects/{}/merge_requests", self.project_id));

        let payload = CreateMrPayload {
            source_branch: &request.source_branch,
            target_branch: &request.target_branch,
            title: &request.title,
            description: request.description.as_deref(),
            author: request.author.as_ref().map(|a| AuthorPayload {
                name: &a.name,
                email: &a.email,
            }),
            squash: request.squash,
        };

        let mr: GitLabMr = self
            .client
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&payload)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Platform(e.to_string()))?
            .json()
            .await?;

        Ok(mr.into())
    }

    async fn get_user(&self, id: u64) -> Result<HostUser> {
        let url = self.api_url(&format!("/users/{id}"));

        let user: GitLabUser = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Platform(e.to_string()))?
            .json()
            .await?;

        Ok(HostUser {
            name: user.name,
            email: user.email.or(user.public_email).filter(|e| !e.is_empty()),
        })
    }
}
