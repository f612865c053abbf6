//! The subset of the GitHub webhook payloads needed to plan a response.

#[derive(serde_derive::Deserialize, Debug)]
pub(crate) struct Owner {
    pub(crate) login: String,
}

#[derive(serde_derive::Deserialize, Debug)]
pub(crate) struct Repository {
    pub(crate) owner: Owner,
    pub(crate) name: String,
}

#[derive(serde_derive::Deserialize, Debug)]
pub(crate) struct User {
    pub(crate) login: String,
}

#[derive(serde_derive::Deserialize, Debug)]
pub(crate) struct Comment {
    #[serde(default)]
    pub(crate) body: String,
    pub(crate) user: User,
}

#[derive(serde_derive::Deserialize, Debug)]
pub(crate) struct Issue {
    pub(crate) number: u64,
    /// Only present when the issue is a pull request.
    #[serde(default)]
    pub(crate) pull_request: Option<serde_json::Value>,
}

#[derive(serde_derive::Deserialize, Debug)]
pub(crate) struct IssueCommentEvent {
    pub(crate) action: String,
    pub(crate) comment: Comment,
    pub(crate) issue: Issue,
    pub(crate) repository: Repository,
}

#[derive(serde_derive::Deserialize, Debug)]
pub(crate) struct PullRequest {
    pub(crate) number: u64,
}

#[derive(serde_derive::Deserialize, Debug)]
pub(crate) struct PullRequestEvent {
    pub(crate) pull_request: PullRequest,
    pub(crate) repository: Repository,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    PullRequest,
    IssueComment,
}

impl EventType {
    pub const AVAILABLE: &'static [&'static str] = &["pull_request", "issue_comment"];
}

impl std::str::FromStr for EventType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pull_request" => Ok(EventType::PullRequest),
            "issue_comment" => Ok(EventType::IssueComment),
            other => anyhow::bail!(
                "X-GitHub-Event want: {:?}, got: {other:?}",
                EventType::AVAILABLE
            ),
        }
    }
}
