//! JWT 토큰 발급/인코딩/디코딩.
//!
//! 토큰은 발급 후 변경되지 않습니다. 만료 검사는 항상 호출자가 전달한
//! `now`를 기준으로 하며 코덱 자체의 시계를 사용하지 않습니다.

use std::str::FromStr;
use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use praetor_core::{
    AuthConfig, ConfigError, Identity, Principal, PrincipalId, RoleSet, TokenError, TokenType,
    ETERNAL_LIFESPAN_DAYS,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// 사용자 정의 클레임으로 쓸 수 없는 이름.
pub const RESERVED_CLAIMS: &[&str] = &[
    "sub", "usr", "rls", "typ", "iat", "exp", "jti", "iss", "aud", "nbf",
];

/// 서명된 시간 제한 자격증명.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// 토큰 고유 식별자
    pub jti: String,
    /// 사용자 식별자
    pub subject_id: PrincipalId,
    /// 발급 시점 사용자 이름
    pub username: String,
    /// 발급 시점 역할 스냅샷
    pub roles: RoleSet,
    /// 토큰 용도
    pub token_type: TokenType,
    /// 발급 시각 (초 단위)
    pub issued_at: DateTime<Utc>,
    /// 만료 시각 (초 단위)
    pub expires_at: DateTime<Utc>,
    /// 사용자 정의 클레임
    pub custom_claims: Map<String, Value>,
}

impl Token {
    /// 사용자 정의 클레임 추가.
    ///
    /// 새 값을 반환하며 원래 토큰은 그대로 둡니다. 예약된 이름이면
    /// `ReservedClaim` 에러.
    pub fn with_custom_claim(
        &self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, TokenError> {
        let name = name.into();
        if RESERVED_CLAIMS.contains(&name.as_str()) {
            return Err(TokenError::ReservedClaim(name));
        }

        let mut token = self.clone();
        token.custom_claims.insert(name, value.into());
        Ok(token)
    }

    /// 토큰에 담긴 신원 스냅샷.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.subject_id.clone(),
            username: self.username.clone(),
            roles: self.roles.clone(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// 남은 수명 (만료 시 0).
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

/// JWT 페이로드 (와이어 형식).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// Subject - 사용자 ID
    sub: PrincipalId,
    /// 사용자 이름
    usr: String,
    /// 역할 목록
    rls: RoleSet,
    /// 토큰 타입
    typ: TokenType,
    /// Issued At (Unix timestamp)
    iat: i64,
    /// Expiration (Unix timestamp)
    exp: i64,
    /// JWT ID
    jti: String,
    #[serde(flatten)]
    custom: Map<String, Value>,
}

impl From<&Token> for Claims {
    fn from(token: &Token) -> Self {
        Self {
            sub: token.subject_id.clone(),
            usr: token.username.clone(),
            rls: token.roles.clone(),
            typ: token.token_type,
            iat: token.issued_at.timestamp(),
            exp: token.expires_at.timestamp(),
            jti: token.jti.clone(),
            custom: token.custom_claims.clone(),
        }
    }
}

impl TryFrom<Claims> for Token {
    type Error = TokenError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let issued_at = DateTime::from_timestamp(claims.iat, 0)
            .ok_or_else(|| TokenError::MalformedToken("iat 범위 초과".to_string()))?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::MalformedToken("exp 범위 초과".to_string()))?;
        if expires_at <= issued_at {
            return Err(TokenError::MalformedToken(
                "exp가 iat보다 빠릅니다".to_string(),
            ));
        }

        Ok(Self {
            jti: claims.jti,
            subject_id: claims.sub,
            username: claims.usr,
            roles: claims.rls,
            token_type: claims.typ,
            issued_at,
            expires_at,
            custom_claims: claims.custom,
        })
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// 토큰 코덱.
///
/// 서명 키와 설정은 생성 후 읽기 전용이며 여러 요청에서 동시에 사용됩니다.
pub struct TokenCodec {
    config: Arc<AuthConfig>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    /// 설정을 검증하고 코덱 생성.
    pub fn new(config: Arc<AuthConfig>) -> Result<Self, ConfigError> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// 토큰 타입별 기본 수명.
    pub fn lifespan(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.config.access_lifespan(),
            TokenType::Refresh => self.config.refresh_lifespan(),
        }
    }

    /// 기본 수명으로 토큰 발급.
    pub fn issue(
        &self,
        principal: &Principal,
        token_type: TokenType,
        now: DateTime<Utc>,
    ) -> Result<Token, TokenError> {
        self.build(principal.identity(), token_type, now, self.lifespan(token_type))
    }

    /// 수명을 지정하여 토큰 발급.
    ///
    /// 1초 미만이거나 만료 시각이 표현 범위를 넘는 수명은 `InvalidLifespan`.
    pub fn issue_with_lifespan(
        &self,
        identity: &Identity,
        token_type: TokenType,
        now: DateTime<Utc>,
        lifespan: Duration,
    ) -> Result<Token, TokenError> {
        self.build(identity.clone(), token_type, now, lifespan)
    }

    /// 사실상 만료되지 않는 서비스용 Access Token 발급.
    pub fn issue_eternal(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<Token, TokenError> {
        self.build(
            identity.clone(),
            TokenType::Access,
            now,
            Duration::days(ETERNAL_LIFESPAN_DAYS),
        )
    }

    fn build(
        &self,
        identity: Identity,
        token_type: TokenType,
        now: DateTime<Utc>,
        lifespan: Duration,
    ) -> Result<Token, TokenError> {
        // 와이어 형식이 초 단위이므로 1초 미만 수명은 iat == exp가 된다
        if lifespan < Duration::seconds(1) {
            return Err(TokenError::InvalidLifespan);
        }

        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(lifespan)
            .ok_or(TokenError::InvalidLifespan)?
            .trunc_subsecs(0);

        Ok(Token {
            jti: uuid::Uuid::new_v4().to_string(),
            subject_id: identity.id,
            username: identity.username,
            roles: identity.roles,
            token_type,
            issued_at,
            expires_at,
            custom_claims: Map::new(),
        })
    }

    /// 토큰 서명 및 직렬화.
    pub fn encode(&self, token: &Token) -> Result<String, TokenError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, &Claims::from(token), &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// 토큰 검증 및 디코딩.
    ///
    /// 1. 형식 검사 (`MalformedToken`)
    /// 2. 헤더 알고리즘이 허용 목록에 있는지 (`BadSignature`, `alg: none` 포함)
    /// 3. 서명 검증 (`BadSignature`)
    /// 4. 클레임 파싱 (`MalformedToken`)
    /// 5. `now >= exp`이면 `Expired`
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Token, TokenError> {
        let algorithm = self.header_algorithm(token)?;

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(map_jwt_error)?;
        let token = Token::try_from(data.claims)?;

        if token.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(token)
    }

    fn header_algorithm(&self, token: &str) -> Result<Algorithm, TokenError> {
        let mut segments = token.split('.');
        let (Some(header), Some(_), Some(_), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::MalformedToken("세그먼트 수가 올바르지 않습니다".to_string()));
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|_| TokenError::MalformedToken("헤더 인코딩 오류".to_string()))?;
        let raw: RawHeader = serde_json::from_slice(&bytes)
            .map_err(|_| TokenError::MalformedToken("헤더 파싱 오류".to_string()))?;

        match Algorithm::from_str(&raw.alg) {
            Ok(alg) if self.config.allowed_algorithms.contains(&alg) => Ok(alg),
            _ => {
                warn!(alg = %raw.alg, "Rejected token signed with disallowed algorithm");
                Err(TokenError::BadSignature)
            }
        }
    }
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match e.kind() {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::MalformedToken(e.to_string()),
    }
}
