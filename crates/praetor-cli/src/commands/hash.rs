//! 비밀번호 해시 생성.

use anyhow::{bail, Context};
use praetor_auth::hash_password;

/// 저장소에 넣을 PHC 형식 해시 생성.
pub fn run(password: &str) -> anyhow::Result<String> {
    if password.is_empty() {
        bail!("비밀번호가 비어 있습니다");
    }
    hash_password(password).context("비밀번호 해싱 실패")
}
