use tracing::info;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
pub const DEFAULT_PROFILE_ID: &str = "me";
pub const DEFAULT_STORAGE_PREFIX: &str = "poll-vote";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the remote poll API, without a trailing `/`.
    pub api_base: String,
    pub profile_id: String,
    pub storage_prefix: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            profile_id: DEFAULT_PROFILE_ID.into(),
            storage_prefix: DEFAULT_STORAGE_PREFIX.into(),
        }
    }
}

impl ClientConfig {
    /// Build from any key lookup; the browser build passes `option_env!` values.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base = load(&lookup, "POLL_API_BASE", DEFAULT_API_BASE);
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            profile_id: load(&lookup, "POLL_PROFILE_ID", DEFAULT_PROFILE_ID),
            storage_prefix: load(&lookup, "POLL_STORAGE_PREFIX", DEFAULT_STORAGE_PREFIX),
        }
    }
}

fn load(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    match lookup(key).map(|v| v.trim().to_string()) {
        Some(value) if !value.is_empty() => value,
        _ => {
            info!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}
