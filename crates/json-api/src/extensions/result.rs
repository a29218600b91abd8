//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

pub(crate) trait ResultExt<T> {
    /// Log the error and answer 500 without detail.
    fn or_500(self, context: &str) -> Result<T, StatusError>;

    /// Answer 400 with `brief`; the underlying error is the caller's fault
    /// and is not logged.
    fn or_400(self, brief: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }

    fn or_400(self, brief: &str) -> Result<T, StatusError> {
        self.map_err(|_ignored| StatusError::bad_request().brief(brief))
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn or_400_keeps_the_brief() {
        let status = "x".parse::<u32>().or_400("Invalid request").err();

        assert_eq!(status.as_ref().map(|status| status.code), Some(StatusCode::BAD_REQUEST));
        assert_eq!(status.map(|status| status.brief), Some("Invalid request".to_string()));
    }

    #[test]
    fn or_500_hides_the_cause() {
        let status = "x".parse::<u32>().or_500("parsing").err();

        assert_eq!(status.as_ref().map(|status| status.code), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_ne!(status.map(|status| status.brief), Some("parsing".to_string()));
    }
}
