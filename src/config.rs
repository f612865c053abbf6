use std::time::Duration;

static MAINTAINERS_FILE_VAR: &str = "maintainers_file";
static HOST_VAR: &str = "derek_policy_host";
static BRANCH_VAR: &str = "derek_policy_branch";

/// Where policy documents are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the policy file inside the repository.
    pub maintainers_file: String,
    /// Base URL of the GitHub instance serving raw files.
    pub host: String,
    /// `HEAD` resolves to the repository's default branch.
    pub branch: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            maintainers_file: derek_data::v1::DEFAULT_FILE.to_string(),
            host: "https://github.com".to_string(),
            branch: "HEAD".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let mut config = Config::default();
        if let Some(file) = get(MAINTAINERS_FILE_VAR) {
            config.maintainers_file = file;
        }
        if let Some(host) = get(HOST_VAR) {
            config.host = host;
        }
        if let Some(branch) = get(BRANCH_VAR) {
            config.branch = branch;
        }
        config
    }

    pub fn policy_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}/{owner}/{repo}/raw/{}/{}",
            self.host.trim_end_matches('/'),
            self.branch,
            self.maintainers_file.trim_matches('/')
        )
    }
}
