//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::{NotificationService, PullRequestService};
use crate::types::{
    CheckConclusion, CheckRun, CheckSuite, CommitStatus, LastCommit, MergeMethod, Notification,
    PrState, PullRequestRef, PullRequestSnapshot, ReviewRecord, ReviewState, StatusContext,
    StatusState,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// Page size for REST pagination (GitHub caps this at 50 for notifications)
const NOTIFICATIONS_PER_PAGE: usize = 50;

const PULL_REQUEST_QUERY: &str = r"
    query PullRequestSnapshot($owner: String!, $repo: String!, $number: Int!, $fileLimit: Int!) {
        repository(owner: $owner, name: $repo) {
            pullRequest(number: $number) {
                number
                title
                url
                state
                author {
                    login
                }
                files(first: $fileLimit) {
                    nodes {
                        path
                    }
                }
                commits(last: 1) {
                    nodes {
                        commit {
                            oid
                            checkSuites(first: 100) {
                                nodes {
                                    checkRuns(first: 100) {
                                        nodes {
                                            name
                                            conclusion
                                            permalink
                                        }
                                    }
                                }
                            }
                            status {
                                contexts {
                                    context
                                    state
                                    targetUrl
                                }
                            }
                        }
                    }
                }
            }
        }
    }
";

// GraphQL response types for the PR snapshot query

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Connection<T> {
    #[serde(default)]
    nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotData {
    repository: Option<GraphQlRepository>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRepository {
    pull_request: Option<GraphQlPullRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlPullRequest {
    number: u64,
    title: String,
    url: String,
    state: PrState,
    author: Option<GraphQlActor>,
    #[serde(default)]
    files: Option<Connection<GraphQlFile>>,
    commits: Connection<GraphQlCommitNode>,
}

#[derive(Deserialize)]
struct GraphQlActor {
    login: String,
}

#[derive(Deserialize)]
struct GraphQlFile {
    path: String,
}

#[derive(Deserialize)]
struct GraphQlCommitNode {
    commit: GraphQlCommit,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlCommit {
    oid: String,
    #[serde(default)]
    check_suites: Option<Connection<GraphQlCheckSuite>>,
    status: Option<GraphQlStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlCheckSuite {
    #[serde(default)]
    check_runs: Option<Connection<GraphQlCheckRun>>,
}

#[derive(Deserialize)]
struct GraphQlCheckRun {
    name: String,
    conclusion: Option<CheckConclusion>,
    permalink: String,
}

#[derive(Deserialize)]
struct GraphQlStatus {
    #[serde(default)]
    contexts: Vec<GraphQlStatusContext>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlStatusContext {
    context: String,
    state: StatusState,
    target_url: Option<String>,
}

impl GraphQlPullRequest {
    fn into_snapshot(self, pr: &PullRequestRef) -> Result<PullRequestSnapshot> {
        let node = self.commits.nodes.into_iter().next().ok_or_else(|| {
            Error::GitHubApi(format!("PR {pr} has no commits in GraphQL response"))
        })?;
        let commit = node.commit;

        let check_suites = commit
            .check_suites
            .unwrap_or_default()
            .nodes
            .into_iter()
            .map(|suite| CheckSuite {
                check_runs: suite
                    .check_runs
                    .unwrap_or_default()
                    .nodes
                    .into_iter()
                    .map(|run| CheckRun {
                        name: run.name,
                        conclusion: run.conclusion,
                        permalink: run.permalink,
                    })
                    .collect(),
            })
            .collect();

        let status = commit.status.map(|status| CommitStatus {
            contexts: status
                .contexts
                .into_iter()
                .map(|ctx| StatusContext {
                    context: ctx.context,
                    state: ctx.state,
                    target_url: ctx.target_url,
                })
                .collect(),
        });

        Ok(PullRequestSnapshot {
            owner: pr.owner.clone(),
            repo: pr.repo.clone(),
            number: self.number,
            title: self.title,
            html_url: self.url,
            state: self.state,
            author_login: self.author.map(|a| a.login),
            changed_file_paths: self
                .files
                .unwrap_or_default()
                .nodes
                .into_iter()
                .map(|f| f.path)
                .collect(),
            last_commit: LastCommit {
                id: commit.oid,
                check_suites,
                status,
            },
        })
    }
}

// REST response types for notifications

#[derive(Deserialize)]
struct RestNotification {
    id: String,
    subject: RestSubject,
    repository: RestRepository,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RestSubject {
    title: String,
    url: Option<String>,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct RestRepository {
    full_name: String,
}

impl From<RestNotification> for Notification {
    fn from(n: RestNotification) -> Self {
        Self {
            thread_id: n.id,
            subject_title: n.subject.title,
            subject_url: n.subject.url,
            subject_type: n.subject.kind,
            repository: n.repository.full_name,
            updated_at: n.updated_at,
        }
    }
}

/// GitHub service using octocrab
///
/// Reviews and merges go through octocrab. Notifications, approvals, the
/// GraphQL snapshot query, and the scope check use raw HTTP.
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// REST API base, without trailing slash
    api_base: String,
    /// GraphQL endpoint
    graphql_url: String,
}

impl GitHubService {
    /// Create a new GitHub service for github.com or an enterprise host
    pub fn new(token: &str, host: Option<&str>) -> Result<Self> {
        let api_base = host.map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_api_base(token, &api_base)
    }

    /// Create a service against an explicit API base URL
    pub fn with_api_base(token: &str, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();
        let graphql_url = graphql_url(&api_base);

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(&api_base)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent(concat!("depmerge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::GitHubApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_base,
            graphql_url,
        })
    }

    /// OAuth scopes granted to the token
    ///
    /// Returns `None` when GitHub doesn't report scopes, which is the case
    /// for fine-grained and app tokens.
    pub async fn token_scopes(&self) -> Result<Option<Vec<String>>> {
        debug!("probing token scopes");
        let response = self.request(Method::GET, "/").send().await?;
        let response = check_status(response, "scope check").await?;

        let scopes = response
            .headers()
            .get("x-oauth-scopes")
            .and_then(|v| v.to_str().ok())
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            });
        debug!(?scopes, "token scopes");
        Ok(scopes)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_url(method, &format!("{}{path}", self.api_base))
    }

    fn request_url(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

/// GraphQL endpoint for a REST API base
///
/// github.com serves it next to REST (`/graphql`); Enterprise serves it at
/// `/api/graphql` rather than under `/api/v3`.
fn graphql_url(api_base: &str) -> String {
    api_base.strip_suffix("/api/v3").map_or_else(
        || format!("{api_base}/graphql"),
        |root| format!("{root}/api/graphql"),
    )
}

/// Map octocrab failures, turning a rejected token into `Error::Auth`
fn octocrab_error(e: octocrab::Error, what: &str) -> Error {
    match e {
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 401 => {
            Error::Auth(format!("{what} rejected the token: {}", source.message))
        }
        octocrab::Error::GitHub { source, .. } => Error::GitHubApi(format!(
            "{what} failed with {}: {}",
            source.status_code, source.message
        )),
        e => Error::Octocrab(e),
    }
}

/// Turn non-success responses into errors, keeping the body for context
async fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Auth(format!("{what} rejected the token: {body}")));
    }
    Err(Error::GitHubApi(format!("{what} failed with {status}: {body}")))
}

fn review_state_from_octocrab(state: Option<&octocrab::models::pulls::ReviewState>) -> ReviewState {
    use octocrab::models::pulls::ReviewState as GhState;

    match state {
        Some(GhState::Approved) => ReviewState::Approved,
        Some(GhState::ChangesRequested) => ReviewState::ChangesRequested,
        Some(GhState::Commented) => ReviewState::Commented,
        Some(GhState::Dismissed) => ReviewState::Dismissed,
        Some(GhState::Pending) => ReviewState::Pending,
        // ReviewState is non-exhaustive
        _ => ReviewState::Other,
    }
}

#[async_trait]
impl NotificationService for GitHubService {
    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        debug!("listing notifications");
        let mut notifications = Vec::new();
        let mut page = 1;

        loop {
            let response = self
                .request(
                    Method::GET,
                    &format!("/notifications?per_page={NOTIFICATIONS_PER_PAGE}&page={page}"),
                )
                .send()
                .await?;
            let batch: Vec<RestNotification> = check_status(response, "listing notifications")
                .await?
                .json()
                .await?;

            let count = batch.len();
            notifications.extend(batch.into_iter().map(Notification::from));
            if count < NOTIFICATIONS_PER_PAGE {
                break;
            }
            page += 1;
        }

        debug!(count = notifications.len(), "listed notifications");
        Ok(notifications)
    }

    async fn mark_notification_read(&self, thread_id: &str) -> Result<()> {
        debug!(thread_id, "marking notification read");
        let response = self
            .request(Method::PATCH, &format!("/notifications/threads/{thread_id}"))
            .send()
            .await?;
        check_status(response, "marking notification read").await?;
        Ok(())
    }
}

#[async_trait]
impl PullRequestService for GitHubService {
    async fn fetch_pull_request(
        &self,
        pr: &PullRequestRef,
        file_limit: u32,
    ) -> Result<PullRequestSnapshot> {
        debug!(%pr, "fetching PR snapshot");

        let response = self
            .request_url(Method::POST, &self.graphql_url)
            .json(&serde_json::json!({
                "query": PULL_REQUEST_QUERY,
                "variables": {
                    "owner": pr.owner,
                    "repo": pr.repo,
                    "number": pr.number,
                    "fileLimit": file_limit,
                }
            }))
            .send()
            .await?;
        let response: GraphQlResponse<SnapshotData> = check_status(response, "GraphQL query")
            .await?
            .json()
            .await?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GitHubApi(format!(
                "GraphQL error: {}",
                messages.join(", ")
            )));
        }

        let pull_request = response
            .data
            .and_then(|d| d.repository)
            .and_then(|r| r.pull_request)
            .ok_or_else(|| Error::GitHubApi(format!("PR {pr} not found")))?;

        let snapshot = pull_request.into_snapshot(pr)?;
        debug!(
            %pr,
            state = %snapshot.state,
            author = ?snapshot.author_login,
            "fetched PR snapshot"
        );
        Ok(snapshot)
    }

    async fn list_reviews(&self, pr: &PullRequestRef) -> Result<Vec<ReviewRecord>> {
        debug!(%pr, "listing reviews");
        let first_page = self
            .client
            .pulls(&pr.owner, &pr.repo)
            .list_reviews(pr.number)
            .send()
            .await
            .map_err(|e| octocrab_error(e, "listing reviews"))?;
        let reviews = self
            .client
            .all_pages(first_page)
            .await
            .map_err(|e| octocrab_error(e, "listing reviews"))?;

        let result: Vec<ReviewRecord> = reviews
            .into_iter()
            .map(|r| ReviewRecord {
                reviewer_login: r.user.map(|u| u.login).unwrap_or_default(),
                state: review_state_from_octocrab(r.state.as_ref()),
            })
            .collect();
        debug!(%pr, count = result.len(), "listed reviews");
        Ok(result)
    }

    async fn approve_pull_request(&self, pr: &PullRequestRef, commit_id: &str) -> Result<()> {
        debug!(%pr, commit_id, "approving PR");
        let response = self
            .request(
                Method::POST,
                &format!("/repos/{}/{}/pulls/{}/reviews", pr.owner, pr.repo, pr.number),
            )
            .json(&serde_json::json!({
                "event": "APPROVE",
                "commit_id": commit_id,
            }))
            .send()
            .await?;
        check_status(response, "approving PR").await?;
        debug!(%pr, "approved PR");
        Ok(())
    }

    async fn merge_pull_request(
        &self,
        pr: &PullRequestRef,
        method: MergeMethod,
        commit_title: &str,
        expected_head_sha: &str,
    ) -> Result<()> {
        debug!(%pr, %method, commit_title, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&pr.owner, &pr.repo)
            .merge(pr.number)
            .method(octocrab_method)
            .title(commit_title)
            .sha(expected_head_sha)
            .send()
            .await;

        match result {
            Ok(merge) if merge.merged => {
                debug!(%pr, sha = ?merge.sha, "merge complete");
                Ok(())
            }
            Ok(merge) => Err(Error::GitHubApi(format!(
                "merge of {pr} was not performed: {}",
                merge.message.unwrap_or_default()
            ))),
            Err(octocrab::Error::GitHub { source, .. })
                // 405: not mergeable right now, 409: head moved past `sha`
                if matches!(source.status_code.as_u16(), 405 | 409) =>
            {
                Err(Error::MergeConflict {
                    pr_number: pr.number,
                    message: source.message.clone(),
                })
            }
            Err(e) => Err(octocrab_error(e, "merge")),
        }
    }
}
