//! 설정 관리.
//!
//! 프로세스 시작 시 한 번 생성되어 `Arc`로 각 컴포넌트에 주입됩니다.
//! 전역 싱글톤은 사용하지 않습니다.
//!
//! 로드 순서: 기본값 → 설정 파일 (선택) → `PRAETOR__` 환경 변수.

use chrono::Duration;
use jsonwebtoken::Algorithm;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// 기본 토큰 헤더 이름
pub const DEFAULT_JWT_HEADER_NAME: &str = "Authorization";
/// 기본 토큰 헤더 타입
pub const DEFAULT_JWT_HEADER_TYPE: &str = "Bearer";
/// 기본 Access Token 수명 (15분)
pub const DEFAULT_JWT_ACCESS_LIFESPAN_SECS: i64 = 15 * 60;
/// 기본 Refresh Token 수명 (30일)
pub const DEFAULT_JWT_REFRESH_LIFESPAN_SECS: i64 = 30 * 24 * 60 * 60;
/// 기본 서명 알고리즘
pub const DEFAULT_JWT_ALGORITHM: Algorithm = Algorithm::HS256;
/// 서비스 토큰용 "영구" 수명 (일)
pub const ETERNAL_LIFESPAN_DAYS: i64 = 1_000_000;
/// 설정 가능한 최대 토큰 수명 (초)
pub const MAX_LIFESPAN_SECS: i64 = ETERNAL_LIFESPAN_DAYS * 24 * 60 * 60;

const MIN_RECOMMENDED_SECRET_LEN: usize = 32;

/// 애플리케이션 설정.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 토큰/인증 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// `host:port` 문자열.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 토큰 발급/검증 설정.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC 서명 키
    #[serde(skip_serializing, deserialize_with = "deserialize_secret")]
    pub secret: SecretString,
    /// 토큰을 읽을 헤더 이름
    pub header_name: String,
    /// 헤더 값의 토큰 타입 접두어
    pub header_type: String,
    /// Access Token 수명 (초)
    pub access_lifespan_secs: i64,
    /// Refresh Token 수명 (초)
    pub refresh_lifespan_secs: i64,
    /// 서명 알고리즘
    pub algorithm: Algorithm,
    /// 검증 시 허용할 알고리즘 목록
    pub allowed_algorithms: Vec<Algorithm>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: SecretString::new(String::new().into()),
            header_name: DEFAULT_JWT_HEADER_NAME.to_string(),
            header_type: DEFAULT_JWT_HEADER_TYPE.to_string(),
            access_lifespan_secs: DEFAULT_JWT_ACCESS_LIFESPAN_SECS,
            refresh_lifespan_secs: DEFAULT_JWT_REFRESH_LIFESPAN_SECS,
            algorithm: DEFAULT_JWT_ALGORITHM,
            allowed_algorithms: vec![DEFAULT_JWT_ALGORITHM],
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(SecretString::new(raw.into()))
}

impl AuthConfig {
    /// 주어진 서명 키로 기본 설정 생성.
    pub fn new(secret: impl Into<String>) -> Self {
        Self::default().with_secret(secret)
    }

    /// 서명 키 설정.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = SecretString::new(secret.into().into());
        self
    }

    /// 헤더 이름과 타입 설정.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, header_type: impl Into<String>) -> Self {
        self.header_name = name.into();
        self.header_type = header_type.into();
        self
    }

    /// 토큰 수명 설정.
    #[must_use]
    pub fn with_lifespans(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_lifespan_secs = access.num_seconds();
        self.refresh_lifespan_secs = refresh.num_seconds();
        self
    }

    /// 서명 알고리즘과 허용 목록 설정.
    #[must_use]
    pub fn with_algorithms(mut self, algorithm: Algorithm, allowed: Vec<Algorithm>) -> Self {
        self.algorithm = algorithm;
        self.allowed_algorithms = allowed;
        self
    }

    /// Access Token 수명.
    ///
    /// `Duration` 범위를 벗어난 값은 0이 되어 발급 시 `InvalidLifespan`으로 거부됩니다.
    pub fn access_lifespan(&self) -> Duration {
        Duration::try_seconds(self.access_lifespan_secs).unwrap_or_else(Duration::zero)
    }

    pub fn refresh_lifespan(&self) -> Duration {
        Duration::try_seconds(self.refresh_lifespan_secs).unwrap_or_else(Duration::zero)
    }

    /// 서명 키 바이트.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }

    /// 서명 키가 설정되었는지 확인.
    pub fn has_secret(&self) -> bool {
        !self.secret.expose_secret().is_empty()
    }

    /// 설정 검증.
    ///
    /// HMAC 계열(HS256/HS384/HS512) 알고리즘만 지원합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.has_secret() {
            return Err(ConfigError::invalid("auth.secret", "서명 키가 설정되지 않았습니다"));
        }
        if self.secret_bytes().len() < MIN_RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                min_len = MIN_RECOMMENDED_SECRET_LEN,
                "JWT secret is shorter than recommended"
            );
        }
        if self.header_name.trim().is_empty() {
            return Err(ConfigError::invalid("auth.header_name", "헤더 이름이 비어 있습니다"));
        }
        if self.header_type.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid(
                "auth.header_type",
                "헤더 타입에 공백을 포함할 수 없습니다",
            ));
        }
        check_lifespan("auth.access_lifespan_secs", self.access_lifespan_secs)?;
        check_lifespan("auth.refresh_lifespan_secs", self.refresh_lifespan_secs)?;
        if self.allowed_algorithms.is_empty() {
            return Err(ConfigError::invalid(
                "auth.allowed_algorithms",
                "허용 알고리즘 목록이 비어 있습니다",
            ));
        }
        for alg in std::iter::once(&self.algorithm).chain(self.allowed_algorithms.iter()) {
            if !is_hmac(*alg) {
                return Err(ConfigError::invalid(
                    "auth.algorithm",
                    format!("HMAC 계열 알고리즘만 지원합니다: {:?}", alg),
                ));
            }
        }
        if !self.allowed_algorithms.contains(&self.algorithm) {
            return Err(ConfigError::invalid(
                "auth.allowed_algorithms",
                format!("서명 알고리즘 {:?}이(가) 허용 목록에 없습니다", self.algorithm),
            ));
        }
        Ok(())
    }
}

fn check_lifespan(field: &'static str, secs: i64) -> Result<(), ConfigError> {
    if !(1..=MAX_LIFESPAN_SECS).contains(&secs) {
        return Err(ConfigError::invalid(
            field,
            format!("1초 이상 {}초 이하여야 합니다", MAX_LIFESPAN_SECS),
        ));
    }
    Ok(())
}

fn is_hmac(alg: Algorithm) -> bool {
    matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("PRAETOR")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.allowed_algorithms")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.header_name, "Authorization");
        assert_eq!(config.header_type, "Bearer");
        assert_eq!(config.access_lifespan(), Duration::minutes(15));
        assert_eq!(config.refresh_lifespan(), Duration::days(30));
        assert_eq!(config.algorithm, Algorithm::HS256);
        assert_eq!(config.allowed_algorithms, vec![Algorithm::HS256]);
        assert!(!config.has_secret());
    }

    #[test]
    fn test_validate_requires_secret() {
        assert!(AuthConfig::default().validate().is_err());
        assert!(AuthConfig::new(TEST_SECRET).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_hmac_algorithm() {
        let config = AuthConfig::new(TEST_SECRET)
            .with_algorithms(Algorithm::RS256, vec![Algorithm::RS256]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_signing_algorithm_must_be_allowed() {
        let config = AuthConfig::new(TEST_SECRET)
            .with_algorithms(Algorithm::HS512, vec![Algorithm::HS256]);
        assert!(config.validate().is_err());

        let config = AuthConfig::new(TEST_SECRET)
            .with_algorithms(Algorithm::HS512, vec![Algorithm::HS256, Algorithm::HS512]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_lifespan() {
        let config = AuthConfig::new(TEST_SECRET)
            .with_lifespans(Duration::zero(), Duration::days(30));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_lifespan() {
        let mut config = AuthConfig::new(TEST_SECRET);
        config.access_lifespan_secs = 1_000_000_000_000_000;
        assert!(config.validate().is_err());
        // 범위를 벗어난 값도 패닉 없이 0으로 처리
        assert_eq!(config.access_lifespan(), Duration::zero());

        let mut config = AuthConfig::new(TEST_SECRET);
        config.refresh_lifespan_secs = MAX_LIFESPAN_SECS + 1;
        assert!(config.validate().is_err());

        config.refresh_lifespan_secs = MAX_LIFESPAN_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_secret_is_not_serialized() {
        let config = AuthConfig::new(TEST_SECRET);
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains(TEST_SECRET));
        assert!(!format!("{:?}", config).contains(TEST_SECRET));
    }

    #[test]
    fn test_deserialize_partial_auth_config() {
        let config: AuthConfig = serde_json::from_str(
            r#"{"secret": "s3cr3t", "header_type": "JWT", "allowed_algorithms": ["HS256", "HS512"]}"#,
        )
        .unwrap();
        assert_eq!(config.secret_bytes(), b"s3cr3t");
        assert_eq!(config.header_type, "JWT");
        assert_eq!(config.header_name, "Authorization");
        assert_eq!(config.allowed_algorithms.len(), 2);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.access_lifespan_secs, DEFAULT_JWT_ACCESS_LIFESPAN_SECS);
        assert_eq!(config.logging.format, "pretty");
    }
}
