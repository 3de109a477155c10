/*
 * Responsibility
 * - GET /me: 認証済み主体 (AuthCtx.user) をそのまま返す
 * - 認可はしない
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::services::auth::Claims;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Claims,
}

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    tracing::debug!(cid = ?ctx.user.cid(), "me");

    Json(MeResponse { user: ctx.user })
}
