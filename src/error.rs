use std::fmt;

use thiserror::Error;

/// Upstream resource a fetch was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Players,
    Transfers,
    History,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Resource::Players => "players",
            Resource::Transfers => "transfers",
            Resource::History => "history",
        };
        f.write_str(label)
    }
}

/// Coarse classification shown to the user: the upstream answered with a
/// failing status, or anything else went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTier {
    Http,
    Other,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error occurred while fetching {resource}: status {status}: {detail}")]
    Http {
        resource: Resource,
        status: u16,
        detail: String,
    },

    #[error("Other error occurred while fetching {resource}: request failed: {source}")]
    Transport {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },

    #[error("Other error occurred while fetching {resource}: malformed response: {detail}")]
    Malformed { resource: Resource, detail: String },
}

impl FetchError {
    pub fn malformed(resource: Resource, detail: impl Into<String>) -> Self {
        FetchError::Malformed {
            resource,
            detail: detail.into(),
        }
    }

    pub fn resource(&self) -> Resource {
        match self {
            FetchError::Http { resource, .. }
            | FetchError::Transport { resource, .. }
            | FetchError::Malformed { resource, .. } => *resource,
        }
    }

    pub fn tier(&self) -> ErrorTier {
        match self {
            FetchError::Http { .. } => ErrorTier::Http,
            FetchError::Transport { .. } | FetchError::Malformed { .. } => ErrorTier::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_carry_the_http_prefix() {
        let err = FetchError::Http {
            resource: Resource::Players,
            status: 500,
            detail: "Internal Server Error".to_string(),
        };
        assert_eq!(err.tier(), ErrorTier::Http);
        assert!(err
            .to_string()
            .starts_with("HTTP error occurred while fetching players"));
    }

    #[test]
    fn malformed_is_an_other_error() {
        let err = FetchError::malformed(Resource::History, "expected an object");
        assert_eq!(err.tier(), ErrorTier::Other);
        assert_eq!(err.resource(), Resource::History);
        assert!(err
            .to_string()
            .starts_with("Other error occurred while fetching history"));
    }
}
