//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 해싱 및 검증. 평문 비밀번호는 저장하거나 직접 비교하지 않습니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호 검증 실패")]
    VerificationFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

/// 비밀번호 해싱.
///
/// 솔트는 자동으로 생성되며 결과는 PHC 형식 문자열입니다.
///
/// ```rust,ignore
/// let hash = hash_password("calmerthanyouare").unwrap();
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 비교는 argon2 내부의 상수 시간 비교를 사용합니다.
/// 일치하면 Ok(()), 불일치하면 `VerificationFailed`.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("calmerthanyouare").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("calmerthanyouare", &hash).is_ok());
        assert!(matches!(
            verify_password("iamthewalrus", &hash),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hash1 = hash_password("abides").unwrap();
        let hash2 = hash_password("abides").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("abides", &hash1).is_ok());
        assert!(verify_password("abides", &hash2).is_ok());
    }

    #[test]
    fn test_plaintext_is_not_a_hash() {
        let result = verify_password("abides", "abides");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }
}
