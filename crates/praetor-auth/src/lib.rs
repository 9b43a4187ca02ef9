//! # Praetor Auth
//!
//! JWT 토큰 발급/검증/갱신 및 역할 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`CredentialVerifier`]: 사용자 이름/비밀번호 검증
//! - [`TokenCodec`]: 토큰 발급, 서명, 디코딩
//! - [`TokenLifecycle`]: 로그인, Access Token 검증, Refresh 교환
//! - [`RolePolicy`], [`CheckChain`]: 역할 기반 접근 제어
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! let lifecycle = TokenLifecycle::new(Arc::new(config), store)?;
//!
//! let pair = lifecycle.login_pair("Walter", "calmerthanyouare", Utc::now()).await?;
//! let identity = lifecycle.validate_access(&pair.access_token, Utc::now())?;
//!
//! let admin_only = CheckChain::policy(RolePolicy::require_all(["admin"]));
//! admin_only.run(&identity)?;
//! ```

mod guard;
mod header;
mod lifecycle;
mod password;
mod token;
mod verifier;

#[cfg(test)]
mod testing;

pub use guard::{authorize, check_fn, AccessCheck, CheckChain, Denial, FnCheck, RolePolicy, Verdict};
pub use header::{parse_header_value, read_token_from_header, HeaderSource};
pub use lifecycle::{TokenLifecycle, TokenPair};
pub use password::{hash_password, verify_password, PasswordError};
pub use token::{Token, TokenCodec, RESERVED_CLAIMS};
pub use verifier::CredentialVerifier;
