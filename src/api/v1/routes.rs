/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は公開、/me は Bearer gate の内側
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, me::me};
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route("/me", get(me));
    // layer は適用時点の route にだけ掛かる
    let protected = access::apply(protected, state);

    Router::new().route("/health", get(health)).merge(protected)
}
