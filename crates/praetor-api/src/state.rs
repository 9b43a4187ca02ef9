//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.
//! 설정과 서명 키는 시작 시 한 번 만들어진 뒤 읽기 전용입니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use praetor_auth::TokenLifecycle;
use praetor_core::{AuthConfig, Clock, ConfigError, SystemClock};

use crate::store::InMemoryPrincipalStore;

/// 데모 서비스의 토큰 수명 주기 관리자 타입.
pub type Lifecycle = TokenLifecycle<Arc<InMemoryPrincipalStore>>;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 로그인/검증/갱신
    pub lifecycle: Arc<Lifecycle>,

    /// 사용자 저장소 (lifecycle과 같은 인스턴스)
    pub store: Arc<InMemoryPrincipalStore>,

    /// 시간 공급자
    pub clock: Arc<dyn Clock>,

    /// API 버전
    pub version: String,

    /// 서버 시작 시간
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// 설정을 검증하고 상태 생성.
    pub fn new(
        config: Arc<AuthConfig>,
        store: Arc<InMemoryPrincipalStore>,
    ) -> Result<Self, ConfigError> {
        let lifecycle = TokenLifecycle::new(config, Arc::clone(&store))?;

        Ok(Self {
            lifecycle: Arc::new(lifecycle),
            store,
            clock: Arc::new(SystemClock),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
        })
    }

    /// 시간 공급자 교체.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.started_at = clock.now();
        self.clock = clock;
        self
    }

    /// 현재 시각. 요청당 한 번 읽어서 사용합니다.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (self.now() - self.started_at).num_seconds()
    }
}

/// 테스트용 AppState 생성.
///
/// 데모 사용자 4명과 고정 테스트 서명 키를 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub async fn create_test_state() -> AppState {
    let store = InMemoryPrincipalStore::with_demo_users()
        .await
        .expect("Failed to seed demo users for test");
    let config = AuthConfig::new("test-secret-key-for-jwt-testing-minimum-32-chars");

    AppState::new(Arc::new(config), Arc::new(store)).expect("Failed to create test state")
}
