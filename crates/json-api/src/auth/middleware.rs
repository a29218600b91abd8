//! Bearer token gate for the order routes.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use threadline_app::auth::AuthServiceError;
use tracing::error;

use crate::{extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = bearer_token(req) else {
        deny(res, ctrl, StatusError::unauthorized().brief("Unauthorized"));

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(status) => {
            deny(res, ctrl, status);

            return;
        }
    };

    match state.app.auth.authenticate_bearer(token).await {
        Ok(user) => {
            depot.insert_user_uuid(user);

            ctrl.call_next(req, depot, res).await;
        }
        Err(AuthServiceError::NotFound) => {
            deny(res, ctrl, StatusError::unauthorized().brief("Unauthorized"));
        }
        Err(source) => {
            error!("failed to authenticate api token: {source}");

            deny(res, ctrl, StatusError::internal_server_error());
        }
    }
}

fn deny(res: &mut Response, ctrl: &mut FlowCtrl, status: StatusError) {
    res.render(status);
    ctrl.skip_rest();
}

fn bearer_token(req: &Request) -> Option<&str> {
    let (scheme, token) = req
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split_once(' ')?;

    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;
    use threadline_app::{
        auth::{MockAuthService, TokenVerifierError},
        domain::users::records::UserUuid,
    };

    use crate::test_helpers::{TEST_USER_UUID, state_with_auth};

    use super::*;

    #[salvo::handler]
    async fn echo_user(depot: &mut Depot, res: &mut Response) {
        let user = depot
            .user_uuid_or_401()
            .ok()
            .map_or_else(|| "missing".to_string(), |uuid: UserUuid| uuid.to_string());

        res.render(user);
    }

    fn make_service(auth: MockAuthService) -> Service {
        let router = Router::new()
            .hoop(inject(state_with_auth(auth)))
            .hoop(handler)
            .push(Router::new().get(echo_user));

        Service::new(router)
    }

    #[tokio::test]
    async fn test_missing_authorization_header_returns_401() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_returns_401() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic abc123", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_empty_bearer_token_returns_401() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer    ", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_unknown_token_returns_401() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "tl_v1_unknown")
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer tl_v1_unknown", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_verifier_outage_returns_500() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().once().return_once(|_| {
            Err(AuthServiceError::Verifier(
                TokenVerifierError::UnexpectedResponse("sealed".to_string()),
            ))
        });

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer tl_v1_any", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_valid_token_injects_user_uuid() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "tl_v1_valid")
            .return_once(|_| Ok(TEST_USER_UUID));

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "bearer tl_v1_valid", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, TEST_USER_UUID.to_string());

        Ok(())
    }
}
