/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - 認可 (権限チェック) はここでは行わない
 */

use crate::services::auth::Claims;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user` は検証済みトークンの claims をそのまま保持する (`cID` + 任意のフィールド)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user: Claims,
}

impl AuthCtx {
    pub fn new(user: Claims) -> Self {
        Self { user }
    }
}
