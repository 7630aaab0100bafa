use std::env;

use featurize::UnseenPolicy;

pub(super) fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(super) fn parse_policy(value: &str) -> Option<UnseenPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "reject" | "strict" => Some(UnseenPolicy::Reject),
        "extend" | "permissive" => Some(UnseenPolicy::Extend),
        _ => None,
    }
}
