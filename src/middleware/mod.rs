/*
 * Responsibility
 * - middlware の公開インターフェース
 * - auth (Bearer gate), cors, http (request-id / trace / limit / timeout)
 */
pub mod auth;
pub mod cors;
pub mod http;
