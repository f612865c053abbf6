use crate::policy::{PolicyError, PolicySource};
use derek_data::v1::DerekConfig;
use log::debug;

fn contains_ignore_case(list: &[String], needle: &str) -> bool {
    let fold = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<String>();
    let needle = fold(needle);
    list.iter().any(|item| fold(item) == needle)
}

pub(crate) trait DerekConfigExt {
    /// Whether `feature` is listed in the `features` of the policy.
    fn feature_enabled(&self, feature: &str) -> bool;

    /// Whether `user` is a maintainer allowed to use `feature`. Always false
    /// when the feature itself is disabled.
    fn user_permitted(&self, feature: &str, user: &str) -> bool;
}

impl DerekConfigExt for DerekConfig {
    fn feature_enabled(&self, feature: &str) -> bool {
        contains_ignore_case(&self.features, feature)
    }

    fn user_permitted(&self, feature: &str, user: &str) -> bool {
        self.feature_enabled(feature) && contains_ignore_case(&self.maintainers, user)
    }
}

pub fn enabled_feature(
    source: &PolicySource,
    feature: &str,
    owner: &str,
    repo: &str,
) -> Result<bool, PolicyError> {
    let enabled = source.load(owner, repo)?.feature_enabled(feature);
    debug!("feature {feature} enabled for {owner}/{repo}: {enabled}");
    Ok(enabled)
}

pub fn permitted_user_feature(
    source: &PolicySource,
    feature: &str,
    owner: &str,
    repo: &str,
    user: &str,
) -> Result<bool, PolicyError> {
    let permitted = source.load(owner, repo)?.user_permitted(feature, user);
    debug!("{user} permitted to use {feature} on {owner}/{repo}: {permitted}");
    Ok(permitted)
}
