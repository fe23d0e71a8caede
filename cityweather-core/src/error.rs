use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single network lookup: weather fetch, place autocomplete,
/// place details, IP position, or reverse geocode.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("provider reported an error: {0}")]
    Provider(String),

    #[error("timestamp out of range: {0}")]
    Timestamp(i64),

    #[error("provider returned no usable result")]
    NoMatch,
}

/// App-level error taxonomy. Every async flow returns one of these and the
/// presentation layer decides how to surface it; nothing here is fatal.
#[derive(Debug, Error)]
pub enum Error {
    #[error("location permission denied")]
    PermissionDenied,

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("selected place has no city-level component")]
    Selection,
}

impl Error {
    /// Single generic notice per error kind, with no structured detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::PermissionDenied => {
                "Location access is not enabled. Run `cityweather configure` to allow it."
            }
            Error::Lookup(_) => "Failed to fetch data for that location. Please try again.",
            Error::Selection => "Unable to determine city from selection. Try another location.",
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Back off to a char boundary so multibyte bodies can't split mid-char.
    let mut cut = MAX;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }

    format!("{}...", &body[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_carry_no_detail() {
        let err = Error::Lookup(LookupError::NoMatch);
        assert!(!err.user_message().contains("NoMatch"));
        assert!(!Error::Selection.user_message().is_empty());
        assert!(!Error::PermissionDenied.user_message().is_empty());
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);
        assert!(truncated.len() <= 203);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn short_bodies_pass_through() {
        assert_eq!(truncate_body("city not found"), "city not found");
    }

    #[test]
    fn truncation_lands_on_a_char_boundary() {
        // A two-byte char straddling the cut index must not panic the cut.
        let mut body = "x".repeat(199);
        body.push('é');
        body.push_str(&"y".repeat(100));

        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated, format!("{}...", "x".repeat(199)));

        let all_multibyte = "é".repeat(300);
        let truncated = truncate_body(&all_multibyte);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }
}
