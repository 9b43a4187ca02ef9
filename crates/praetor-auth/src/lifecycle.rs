//! 토큰 수명 주기 관리.
//!
//! 로그인 → 토큰 발급, Access Token 검증, Refresh Token 교환을 조율합니다.
//!
//! Access Token 검증은 토큰에 담긴 스냅샷만 사용하고 저장소를 조회하지
//! 않습니다. 반면 Refresh는 저장소에서 현재 사용자를 다시 읽어 비활성화나
//! 역할 변경을 반영합니다. 폐기 목록은 없으므로 이미 발급된 Access Token은
//! 계정이 비활성화되어도 만료 시까지 유효합니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use praetor_core::{
    AuthConfig, AuthError, ConfigError, Identity, Principal, PrincipalLookup, TokenError,
    TokenType,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::header::{read_token_from_header, HeaderSource};
use crate::token::{Token, TokenCodec};
use crate::verifier::CredentialVerifier;

/// Access Token + Refresh Token 페어.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access Token 만료까지 남은 시간 (초)
    pub expires_in: i64,
    /// 헤더 타입 (기본 "Bearer")
    pub token_type: String,
}

/// 토큰 수명 주기 관리자.
pub struct TokenLifecycle<L> {
    codec: TokenCodec,
    verifier: CredentialVerifier<L>,
}

impl<L: PrincipalLookup> TokenLifecycle<L> {
    /// 설정 검증 후 생성.
    pub fn new(config: Arc<AuthConfig>, lookup: L) -> Result<Self, ConfigError> {
        Ok(Self {
            codec: TokenCodec::new(config)?,
            verifier: CredentialVerifier::new(lookup),
        })
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn config(&self) -> &AuthConfig {
        self.codec.config()
    }

    pub fn lookup(&self) -> &L {
        self.verifier.lookup()
    }

    /// 로그인 후 Access Token 발급.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let principal = self.authenticate(username, password).await?;
        let token = self.codec.issue(&principal, TokenType::Access, now)?;
        Ok(self.codec.encode(&token)?)
    }

    /// 로그인 후 Access + Refresh Token 발급.
    pub async fn login_pair(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthError> {
        let principal = self.authenticate(username, password).await?;

        let access = self.codec.issue(&principal, TokenType::Access, now)?;
        let refresh = self.codec.issue(&principal, TokenType::Refresh, now)?;

        Ok(TokenPair {
            access_token: self.codec.encode(&access)?,
            refresh_token: self.codec.encode(&refresh)?,
            expires_in: access.remaining(now).num_seconds(),
            token_type: self.config().header_type.clone(),
        })
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        match self.verifier.authenticate(username, password).await {
            Ok(principal) => {
                info!(subject = %principal.id, username, "Login succeeded");
                Ok(principal)
            }
            Err(e) => {
                warn!(username, reason = e.reason(), "Login failed");
                Err(e)
            }
        }
    }

    /// Access Token 검증.
    ///
    /// Refresh Token은 `WrongType`으로 거부합니다.
    pub fn validate_access(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        let token = self.decode_expecting(token, TokenType::Access, now)?;
        Ok(token.identity())
    }

    /// Refresh Token으로 새 Access Token 발급.
    ///
    /// 현재 저장소 상태를 다시 조회하므로 삭제/비활성화된 계정은
    /// `UnknownUser`/`AccountDisabled`로 실패하고, 새 토큰에는 현재 역할이 담깁니다.
    pub async fn refresh(&self, token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let refresh = self.decode_expecting(token, TokenType::Refresh, now)?;

        let principal = self
            .lookup()
            .lookup_by_id(&refresh.subject_id)
            .await?
            .ok_or_else(|| {
                warn!(subject = %refresh.subject_id, "Refresh for unknown subject");
                AuthError::UnknownUser
            })?;

        if !principal.is_active {
            warn!(subject = %principal.id, "Refresh for disabled account");
            return Err(AuthError::AccountDisabled);
        }

        let access = self.codec.issue(&principal, TokenType::Access, now)?;
        info!(subject = %principal.id, "Access token refreshed");
        Ok(self.codec.encode(&access)?)
    }

    fn decode_expecting(
        &self,
        token: &str,
        expected: TokenType,
        now: DateTime<Utc>,
    ) -> Result<Token, TokenError> {
        let token = self.codec.decode(token, now)?;
        if token.token_type != expected {
            return Err(TokenError::WrongType {
                expected,
                found: token.token_type,
            });
        }
        Ok(token)
    }

    /// 설정된 헤더 이름/타입으로 토큰 추출.
    pub fn read_token_from_header<'a, H>(&self, headers: &'a H) -> Result<&'a str, TokenError>
    where
        H: HeaderSource + ?Sized,
    {
        let config = self.config();
        read_token_from_header(headers, &config.header_name, &config.header_type)
    }

    /// 사용자의 Access Token을 담은 `(헤더 이름, 헤더 값)` 생성.
    ///
    /// 테스트나 도구에서 인증된 요청을 만들 때 사용합니다.
    pub fn pack_header_for_user(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<(String, String), TokenError> {
        let token = self.codec.issue(principal, TokenType::Access, now)?;
        let encoded = self.codec.encode(&token)?;
        let config = self.config();
        Ok((
            config.header_name.clone(),
            format!("{} {}", config.header_type, encoded),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{demo_lookup, MemoryLookup, TEST_SECRET};
    use chrono::Duration;
    use std::collections::HashMap;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn lifecycle(lookup: Arc<MemoryLookup>) -> TokenLifecycle<Arc<MemoryLookup>> {
        TokenLifecycle::new(Arc::new(AuthConfig::new(TEST_SECRET)), lookup).unwrap()
    }

    #[tokio::test]
    async fn test_login_then_validate_returns_same_identity() {
        let lookup = Arc::new(demo_lookup());
        let lc = lifecycle(lookup.clone());

        let token = lc.login("Walter", "calmerthanyouare", t0()).await.unwrap();
        let identity = lc.validate_access(&token, t0()).unwrap();

        let walter = lookup.get("Walter").unwrap();
        assert_eq!(identity, walter.identity());
    }

    #[tokio::test]
    async fn test_login_failures() {
        let lc = lifecycle(Arc::new(demo_lookup()));

        assert_eq!(
            lc.login("Walter", "wrong", t0()).await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            lc.login("Jackie", "treehorn", t0()).await,
            Err(AuthError::UnknownUser)
        );
    }

    #[tokio::test]
    async fn test_disabled_account_cannot_login() {
        let lookup = Arc::new(demo_lookup());
        let lc = lifecycle(lookup.clone());

        lookup.set_active("Donnie", false);
        assert_eq!(
            lc.login("Donnie", "iamthewalrus", t0()).await,
            Err(AuthError::AccountDisabled)
        );
    }

    #[tokio::test]
    async fn test_refresh_token_rejected_as_access() {
        let lc = lifecycle(Arc::new(demo_lookup()));
        let pair = lc.login_pair("Maude", "andthorough", t0()).await.unwrap();

        assert_eq!(
            lc.validate_access(&pair.refresh_token, t0()),
            Err(TokenError::WrongType {
                expected: TokenType::Access,
                found: TokenType::Refresh,
            })
        );
        assert_eq!(pair.expires_in, 15 * 60);
        assert_eq!(pair.token_type, "Bearer");
    }

    #[tokio::test]
    async fn test_access_token_rejected_by_refresh() {
        let lc = lifecycle(Arc::new(demo_lookup()));
        let access = lc.login("Maude", "andthorough", t0()).await.unwrap();

        assert!(matches!(
            lc.refresh(&access, t0()).await,
            Err(AuthError::Token(TokenError::WrongType { .. }))
        ));
    }

    #[tokio::test]
    async fn test_refresh_issues_new_access_token() {
        let lc = lifecycle(Arc::new(demo_lookup()));
        let pair = lc.login_pair("Walter", "calmerthanyouare", t0()).await.unwrap();

        let later = t0() + Duration::days(10);
        // 원래 Access Token은 만료됨
        assert_eq!(
            lc.validate_access(&pair.access_token, later),
            Err(TokenError::Expired)
        );

        let fresh = lc.refresh(&pair.refresh_token, later).await.unwrap();
        let identity = lc.validate_access(&fresh, later).unwrap();
        assert_eq!(identity.username, "Walter");
    }

    #[tokio::test]
    async fn test_refresh_honors_disabled_account_but_access_survives() {
        let lookup = Arc::new(demo_lookup());
        let lc = lifecycle(lookup.clone());
        let pair = lc.login_pair("Donnie", "iamthewalrus", t0()).await.unwrap();

        lookup.set_active("Donnie", false);

        // 폐기 목록이 없으므로 기존 Access Token은 여전히 유효
        assert!(lc.validate_access(&pair.access_token, t0()).is_ok());
        assert_eq!(
            lc.refresh(&pair.refresh_token, t0()).await,
            Err(AuthError::AccountDisabled)
        );
    }

    #[tokio::test]
    async fn test_refresh_picks_up_role_changes() {
        let lookup = Arc::new(demo_lookup());
        let lc = lifecycle(lookup.clone());
        let pair = lc.login_pair("Donnie", "iamthewalrus", t0()).await.unwrap();

        lookup.set_roles("Donnie", ["operator", "admin"].into_iter().collect());

        let stale = lc.validate_access(&pair.access_token, t0()).unwrap();
        assert!(!stale.roles.contains("admin"));

        let fresh = lc.refresh(&pair.refresh_token, t0()).await.unwrap();
        let identity = lc.validate_access(&fresh, t0()).unwrap();
        assert!(identity.roles.contains("admin"));
    }

    #[tokio::test]
    async fn test_refresh_for_removed_user() {
        let lookup = Arc::new(demo_lookup());
        let lc = lifecycle(lookup.clone());
        let pair = lc.login_pair("TheDude", "abides", t0()).await.unwrap();

        lookup.remove("TheDude");
        assert_eq!(
            lc.refresh(&pair.refresh_token, t0()).await,
            Err(AuthError::UnknownUser)
        );
    }

    #[tokio::test]
    async fn test_expired_refresh_token() {
        let lc = lifecycle(Arc::new(demo_lookup()));
        let pair = lc.login_pair("TheDude", "abides", t0()).await.unwrap();

        assert_eq!(
            lc.refresh(&pair.refresh_token, t0() + Duration::days(30)).await,
            Err(AuthError::Token(TokenError::Expired))
        );
    }

    #[test]
    fn test_pack_header_round_trips_through_reader() {
        let lookup = Arc::new(demo_lookup());
        let lc = lifecycle(lookup.clone());
        let maude = lookup.get("Maude").unwrap();

        let (name, value) = lc.pack_header_for_user(&maude, t0()).unwrap();
        assert_eq!(name, "Authorization");
        assert!(value.starts_with("Bearer "));

        let headers: HashMap<String, String> = [(name, value)].into_iter().collect();
        let token = lc.read_token_from_header(&headers).unwrap();
        assert_eq!(lc.validate_access(token, t0()).unwrap().username, "Maude");
    }
}
