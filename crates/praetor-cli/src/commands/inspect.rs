//! 토큰 검사.

use chrono::{DateTime, Utc};
use praetor_auth::{Token, TokenCodec};
use serde::Serialize;
use serde_json::{Map, Value};

/// 검사 결과 (JSON 출력용).
#[derive(Debug, Serialize)]
pub struct TokenReport {
    pub jti: String,
    pub subject: String,
    pub username: String,
    pub roles: Vec<String>,
    pub token_type: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub remaining_secs: i64,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub custom_claims: Map<String, Value>,
}

impl TokenReport {
    pub fn new(token: &Token, now: DateTime<Utc>) -> Self {
        Self {
            jti: token.jti.clone(),
            subject: token.subject_id.to_string(),
            username: token.username.clone(),
            roles: token.roles.iter().map(str::to_string).collect(),
            token_type: token.token_type.to_string(),
            issued_at: token.issued_at,
            expires_at: token.expires_at,
            remaining_secs: token.remaining(now).num_seconds(),
            custom_claims: token.custom_claims.clone(),
        }
    }
}

/// 토큰 검증 후 보고서 생성. 서명/만료 검사를 모두 거칩니다.
pub fn run(codec: &TokenCodec, token: &str, now: DateTime<Utc>) -> anyhow::Result<TokenReport> {
    let token = codec.decode(token.trim(), now)?;
    Ok(TokenReport::new(&token, now))
}
