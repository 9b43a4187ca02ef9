//! 토큰 발급.

use anyhow::{bail, Context};
use chrono::{DateTime, Duration, Utc};
use praetor_auth::TokenCodec;
use praetor_core::{Identity, RoleSet, TokenType};
use serde_json::Value;

/// 발급 옵션.
#[derive(Debug, Clone)]
pub struct MintOptions {
    pub subject: String,
    pub username: String,
    /// 쉼표 구분 역할 목록
    pub roles: String,
    pub token_type: TokenType,
    /// 기본 수명 대신 사용할 수명
    pub lifespan: Option<Duration>,
    /// 사실상 만료되지 않는 Access Token
    pub eternal: bool,
    pub claims: Vec<(String, Value)>,
}

/// `KEY=VALUE` 형식의 사용자 정의 클레임 파싱.
///
/// 값은 JSON으로 해석하고, 실패하면 문자열로 취급합니다.
pub fn parse_claim(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("KEY=VALUE 형식이 아닙니다: {raw}"))?;
    if key.is_empty() {
        return Err(format!("클레임 이름이 비어 있습니다: {raw}"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// 토큰 타입 파싱 (`access` | `refresh`).
pub fn parse_token_type(raw: &str) -> Result<TokenType, String> {
    TokenType::parse(raw).ok_or_else(|| format!("알 수 없는 토큰 타입: {raw} (access, refresh)"))
}

/// 초 단위 수명 파싱. `Duration` 범위를 넘는 값은 거부합니다.
pub fn parse_lifespan_secs(raw: &str) -> Result<Duration, String> {
    let secs: i64 = raw
        .parse()
        .map_err(|_| format!("정수가 아닙니다: {raw}"))?;
    Duration::try_seconds(secs).ok_or_else(|| format!("수명이 너무 큽니다: {secs}초"))
}

/// 서명된 토큰 문자열 발급.
pub fn run(codec: &TokenCodec, options: &MintOptions, now: DateTime<Utc>) -> anyhow::Result<String> {
    let roles = RoleSet::parse_delimited(&options.roles).context("역할 목록이 올바르지 않습니다")?;
    let identity = Identity {
        id: options.subject.as_str().into(),
        username: options.username.clone(),
        roles,
    };

    let mut token = match (options.eternal, options.lifespan) {
        (true, Some(_)) => bail!("--eternal과 --lifespan-secs는 함께 쓸 수 없습니다"),
        (true, None) => {
            if options.token_type != TokenType::Access {
                bail!("영구 토큰은 Access Token만 발급할 수 있습니다");
            }
            codec.issue_eternal(&identity, now)?
        }
        (false, lifespan) => {
            let lifespan = lifespan.unwrap_or_else(|| codec.lifespan(options.token_type));
            codec.issue_with_lifespan(&identity, options.token_type, now, lifespan)?
        }
    };

    for (name, value) in &options.claims {
        token = token.with_custom_claim(name.clone(), value.clone())?;
    }

    tracing::debug!(subject = %token.subject_id, token_type = %token.token_type, "Token minted");
    Ok(codec.encode(&token)?)
}
