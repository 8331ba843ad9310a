// src/error.rs
use thiserror::Error;

/// Why a site resource could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Network(#[from] gloo_net::Error),

    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },

    /// The body arrived but is not what the site expects.
    #[error("malformed content: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::Status { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = LoadError::Status {
            url: "poems/poems_manifest.json".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "poems/poems_manifest.json answered 404");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_decode_from_serde() {
        let err: LoadError = serde_json::from_str::<Vec<u32>>("{oops")
            .map_err(LoadError::from)
            .unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
        assert!(!err.is_not_found());
    }
}
