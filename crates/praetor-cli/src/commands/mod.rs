//! CLI 명령어 구현 모듈.

pub mod hash;
pub mod inspect;
pub mod mint;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use praetor_auth::TokenCodec;
use praetor_core::AppConfig;

/// 설정 파일에서 토큰 코덱 생성.
///
/// CLI는 개발용 서명 키로 대체하지 않습니다.
pub fn load_codec(config_path: &Path) -> anyhow::Result<TokenCodec> {
    let config = AppConfig::load(config_path)
        .with_context(|| format!("설정 로드 실패: {}", config_path.display()))?;

    if !config.auth.has_secret() {
        bail!("서명 키가 없습니다. PRAETOR__AUTH__SECRET 또는 auth.secret을 설정하세요");
    }

    TokenCodec::new(Arc::new(config.auth)).context("토큰 설정이 올바르지 않습니다")
}
