use crate::command::{self, CommandType};
use crate::event::{EventType, IssueCommentEvent, PullRequestEvent};
use crate::permissions::DerekConfigExt;
use crate::policy::PolicySource;
use anyhow::Context as _;
use derek_data::v1::{COMMENTS, DCO_CHECK};
use log::{info, warn};

/// What should be done in response to a webhook delivery.
#[derive(serde_derive::Serialize, Debug, PartialEq, Eq)]
#[serde(tag = "plan", rename_all = "snake_case")]
pub enum Plan {
    Skip {
        reason: String,
    },
    DcoCheck {
        owner: String,
        repo: String,
        number: u64,
    },
    Command {
        owner: String,
        repo: String,
        number: u64,
        is_pull_request: bool,
        command: CommandType,
        /// The command value, with `me` resolved to the commenter for
        /// assignments.
        target: String,
    },
}

impl Plan {
    fn skip(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        info!("nothing to do: {reason}");
        Plan::Skip { reason }
    }
}

pub fn plan_event(
    event_type: EventType,
    payload: &str,
    source: &PolicySource,
) -> anyhow::Result<Plan> {
    match event_type {
        EventType::PullRequest => {
            let event: PullRequestEvent =
                serde_json::from_str(payload).context("cannot parse the pull_request payload")?;
            plan_pull_request(event, source)
        }
        EventType::IssueComment => {
            let event: IssueCommentEvent =
                serde_json::from_str(payload).context("cannot parse the issue_comment payload")?;
            plan_issue_comment(event, source)
        }
    }
}

fn plan_pull_request(event: PullRequestEvent, source: &PolicySource) -> anyhow::Result<Plan> {
    let owner = event.repository.owner.login;
    let repo = event.repository.name;
    let policy = source
        .load(&owner, &repo)
        .with_context(|| format!("unable to verify access to {owner}/{repo}"))?;
    if !policy.feature_enabled(DCO_CHECK) {
        return Ok(Plan::skip(format!(
            "{DCO_CHECK} is not enabled for {owner}/{repo}"
        )));
    }
    Ok(Plan::DcoCheck {
        owner,
        repo,
        number: event.pull_request.number,
    })
}

fn plan_issue_comment(event: IssueCommentEvent, source: &PolicySource) -> anyhow::Result<Plan> {
    if event.action != "created" {
        return Ok(Plan::skip(format!(
            "comment action `{}` is ignored",
            event.action
        )));
    }
    let parsed = command::parse(&event.comment.body);
    let Some(kind) = parsed.kind() else {
        return Ok(Plan::skip("the comment does not contain a command"));
    };

    let owner = event.repository.owner.login;
    let repo = event.repository.name;
    let user = event.comment.user.login;
    let policy = source
        .load(&owner, &repo)
        .with_context(|| format!("unable to verify access to {owner}/{repo}"))?;
    if !policy.user_permitted(COMMENTS, &user) {
        warn!("{user} is not allowed to run `{kind}` on {owner}/{repo}");
        return Ok(Plan::skip(format!(
            "{user} is not permitted to use {COMMENTS} on {owner}/{repo}"
        )));
    }

    let target = match kind {
        CommandType::Assign | CommandType::Unassign if parsed.value() == "me" => user,
        _ => parsed.value().to_string(),
    };
    info!("planned `{kind}` on {owner}/{repo}#{}", event.issue.number);
    Ok(Plan::Command {
        owner,
        repo,
        number: event.issue.number,
        is_pull_request: event.issue.pull_request.is_some(),
        command: kind,
        target,
    })
}
