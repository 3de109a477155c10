//! access token（JWT）検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` からトークンを取り出す (ルールは `bearer` 参照)
//! - トークンなし → 401 `Access Denied`、検証は行わない
//! - 検証失敗 (署名 / exp / nbf / 形式) → 401 `Invalid token`、原因はログのみ
//! - 成功時だけ AuthCtx { user: claims } を一度で insert し、next を呼ぶ

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::middleware::auth::bearer::{Bearer, extract_bearer};
use crate::state::AppState;

/// 保護したい Router に認証を掛ける。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/me", get(me));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = match extract_bearer(req.headers()) {
        Some(Bearer::Token(token)) => token,
        Some(Bearer::Undecodable) => {
            tracing::warn!("bearer token is not visible ascii");
            return Err(AppError::InvalidCredential);
        }
        None => {
            tracing::debug!(uri = %req.uri(), "no bearer token");
            return Err(AppError::MissingCredential);
        }
    };

    let claims = match state.auth.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                error = %err,
                "access token verification failed"
            );
            return Err(AppError::InvalidCredential);
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(claims));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{
        Json,
        http::{HeaderValue, StatusCode, header},
        routing::get,
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::api::v1::extractors::AuthCtxExtractor;
    use crate::services::auth::access_jwt::test_support::{SECRET, now, service, sign};

    /// Protected router whose only handler counts invocations and echoes `user`.
    fn app(hits: Arc<AtomicUsize>) -> Router {
        let state = AppState::new(Arc::new(service()));

        let protected = Router::new().route(
            "/protected",
            get(move |AuthCtxExtractor(ctx): AuthCtxExtractor| {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(ctx.user)
                }
            }),
        );

        apply(protected, state.clone()).with_state(state)
    }

    async fn call(authorization: Option<&str>) -> (StatusCode, Value, usize) {
        call_raw(authorization.map(str::as_bytes)).await
    }

    async fn call_raw(authorization: Option<&[u8]>) -> (StatusCode, Value, usize) {
        let hits = Arc::new(AtomicUsize::new(0));

        let mut req = Request::builder().uri("/protected");
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, HeaderValue::from_bytes(value).unwrap());
        }

        let resp = app(hits.clone())
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, body, hits.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn missing_header_is_access_denied() {
        let (status, body, hits) = call(None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"message": "Access Denied"}));
        assert_eq!(hits, 0);
    }

    #[tokio::test]
    async fn header_without_token_is_access_denied() {
        for value in ["Bearer", "Malformed", "Bearer "] {
            let (status, body, hits) = call(Some(value)).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "{value:?}");
            assert_eq!(body, json!({"message": "Access Denied"}), "{value:?}");
            assert_eq!(hits, 0);
        }
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_claims() {
        let claims = json!({"cID": "user-42", "iat": now(), "exp": now() + 600});
        let token = sign(&claims, SECRET);

        let (status, body, hits) = call(Some(format!("Bearer {token}").as_str())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, claims);
        assert_eq!(hits, 1);
    }

    #[tokio::test]
    async fn any_scheme_word_is_accepted() {
        let token = sign(&json!({"cID": "user-42"}), SECRET);

        let (status, body, hits) = call(Some(format!("Token {token}").as_str())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cID"], "user-42");
        assert_eq!(hits, 1);
    }

    #[tokio::test]
    async fn token_from_other_secret_is_invalid() {
        let token = sign(&json!({"cID": "user-42"}), "not-the-configured-secret");

        let (status, body, hits) = call(Some(format!("Bearer {token}").as_str())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"message": "Invalid token"}));
        assert_eq!(hits, 0);
    }

    #[tokio::test]
    async fn expired_token_is_invalid() {
        let token = sign(&json!({"cID": "user-42", "exp": now() - 60}), SECRET);

        let (status, body, hits) = call(Some(format!("Bearer {token}").as_str())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"message": "Invalid token"}));
        assert_eq!(hits, 0);
    }

    #[tokio::test]
    async fn tampered_or_garbage_token_is_invalid() {
        let token = sign(&json!({"cID": "user-42"}), SECRET);
        let (head, _sig) = token.rsplit_once('.').unwrap();
        let tampered = format!("{head}.c2lnbmF0dXJl");

        for value in [
            format!("Bearer {tampered}"),
            "Bearer not-a-jwt".to_string(),
            format!("Bearer {token} trailing"),
        ] {
            let (status, body, hits) = call(Some(value.as_str())).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "{value:?}");
            assert_eq!(body, json!({"message": "Invalid token"}), "{value:?}");
            assert_eq!(hits, 0);
        }
    }

    #[tokio::test]
    async fn non_text_token_is_invalid_not_missing() {
        let (status, body, hits) = call_raw(Some(&b"Bearer \xfftoken"[..])).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"message": "Invalid token"}));
        assert_eq!(hits, 0);
    }

    #[tokio::test]
    async fn same_token_authenticates_independent_requests() {
        let claims = json!({"cID": "user-42", "exp": now() + 600});
        let header_value = format!("Bearer {}", sign(&claims, SECRET));

        let first = call(Some(header_value.as_str())).await;
        let second = call(Some(header_value.as_str())).await;

        assert_eq!(first, (StatusCode::OK, claims.clone(), 1));
        assert_eq!(second, (StatusCode::OK, claims, 1));
    }
}
