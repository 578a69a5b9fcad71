use thiserror::Error;

/// Errors from a single social provider lookup.
///
/// These never escape the enricher: a failed lookup counts as no signal.
#[derive(Error, Debug)]
pub enum SocialError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{provider} returned status {status}")]
    Status { provider: String, status: u16 },
    #[error("decode error: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_status() {
        let e = SocialError::Status {
            provider: "reddit".to_string(),
            status: 429,
        };
        assert_eq!(e.to_string(), "reddit returned status 429");
    }

    #[test]
    fn test_error_display_decode() {
        let e = SocialError::Decode("missing field `hits`".to_string());
        assert_eq!(e.to_string(), "decode error: missing field `hits`");
    }
}
