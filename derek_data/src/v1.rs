use serde::{Deserialize, Serialize};

/// Name of the policy file looked up in the root of a repository.
pub static DEFAULT_FILE: &str = ".DEREK.yml";

/// Enables the DCO check on pull requests.
pub static DCO_CHECK: &str = "dco_check";
/// Enables commands in issue and pull request comments.
pub static COMMENTS: &str = "comments";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerekConfig {
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub maintainers: Vec<String>,
}
