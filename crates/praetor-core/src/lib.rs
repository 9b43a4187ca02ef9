//! # Praetor Core
//!
//! JWT 인증 시스템의 핵심 타입을 제공합니다.
//!
//! - 설정 관리 (토큰 수명, 헤더, 서명 알고리즘)
//! - 시간 공급자
//! - Principal 모델 및 조회 인터페이스
//! - 에러 분류
//! - 로깅 인프라

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod principal;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use clock::{Clock, FixedClock, SystemClock};
pub use self::config::*;
pub use error::*;
pub use principal::{Identity, Principal, PrincipalLookup};
pub use types::{PrincipalId, RoleDataError, RoleSet, TokenType};

// 하위 크레이트가 같은 버전의 알고리즘 타입을 쓰도록 재노출
pub use jsonwebtoken::Algorithm;
