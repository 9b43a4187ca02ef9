//! 자격증명 검증.

use praetor_core::{AuthError, Principal, PrincipalLookup};
use tracing::{debug, warn};

use crate::password::{verify_password, PasswordError};

/// 사용자 이름/비밀번호 검증기.
///
/// 조회 외의 부수 효과는 없습니다.
pub struct CredentialVerifier<L> {
    lookup: L,
}

impl<L: PrincipalLookup> CredentialVerifier<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// 주입된 조회 인터페이스.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// 사용자 인증.
    ///
    /// # Errors
    ///
    /// - `UnknownUser`: 사용자가 없음
    /// - `InvalidCredentials`: 비밀번호 불일치 (저장된 해시가 손상된 경우 포함)
    /// - `AccountDisabled`: 비밀번호는 맞지만 비활성화된 계정
    /// - `Lookup`: 저장소 에러
    ///
    /// 비활성 여부는 비밀번호 확인 뒤에 검사하므로 비밀번호를 모르는
    /// 호출자는 계정 상태를 알 수 없습니다.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        let principal = self
            .lookup
            .lookup_by_username(username)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        match verify_password(password, &principal.password_hash) {
            Ok(()) => {}
            Err(PasswordError::InvalidHashFormat) => {
                warn!(subject = %principal.id, "Stored password hash is not a valid PHC string");
                return Err(AuthError::InvalidCredentials);
            }
            Err(_) => return Err(AuthError::InvalidCredentials),
        }

        if !principal.is_active {
            return Err(AuthError::AccountDisabled);
        }

        debug!(subject = %principal.id, "Credentials verified");
        Ok(principal)
    }
}
