//! JSON Error Catcher

use salvo::{catcher::Catcher, http::ResBody, prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: u16,
    pub name: String,
    pub brief: String,
}

/// Error Response
///
/// Same shape salvo uses for its own JSON error pages.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

impl From<StatusError> for ErrorResponse {
    fn from(error: StatusError) -> Self {
        Self {
            error: ErrorBody {
                code: error.code.as_u16(),
                name: error.name,
                brief: error.brief,
            },
        }
    }
}

/// Renders error responses as JSON whatever the `Accept` header asks for.
#[handler]
pub(crate) async fn json_errors(res: &mut Response, ctrl: &mut FlowCtrl) {
    let code = res.status_code.unwrap_or(StatusCode::NOT_FOUND);

    if !(code.is_client_error() || code.is_server_error()) {
        return;
    }

    let error = match res.body.take() {
        ResBody::Error(error) => error,
        ResBody::None => {
            StatusError::from_code(code).unwrap_or_else(StatusError::internal_server_error)
        }
        body => {
            res.body = body;
            return;
        }
    };

    res.status_code(error.code);
    res.render(Json(ErrorResponse::from(error)));

    ctrl.skip_rest();
}

pub(crate) fn json_catcher() -> Catcher {
    Catcher::default().hoop(json_errors)
}
