//! 인증 도메인의 기본 타입.
//!
//! - [`PrincipalId`]: 사용자 식별자
//! - [`RoleSet`]: 역할 이름 집합
//! - [`TokenType`]: 토큰 용도 (Access / Refresh)

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// 사용자 식별자.
///
/// 저장소가 부여하는 불투명한 고유 값입니다. 토큰의 `sub` 클레임으로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PrincipalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PrincipalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for PrincipalId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// 역할 데이터 파싱 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("잘못된 역할 데이터: {raw:?}")]
pub struct RoleDataError {
    /// 파싱에 실패한 원본 문자열
    pub raw: String,
}

/// 역할 이름 집합.
///
/// 정렬된 집합이므로 직렬화 결과가 항상 같은 순서를 가집니다.
/// 역직렬화(토큰의 `rls` 클레임 등)에도 [`RoleSet::parse_delimited`]와
/// 같은 이름 규칙이 적용됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    /// 빈 역할 집합.
    pub fn new() -> Self {
        Self::default()
    }

    /// 쉼표로 구분된 역할 문자열 파싱.
    ///
    /// 저장소 컬럼 형식(`"operator,admin"`)을 집합으로 변환합니다.
    /// 빈 문자열(또는 공백만 있는 문자열)은 빈 집합입니다.
    ///
    /// 빈 항목(`"admin,,operator"`)이나 내부 공백/제어 문자가 포함된
    /// 역할 이름은 빈 집합으로 대체되지 않고 에러가 됩니다.
    pub fn parse_delimited(raw: &str) -> Result<Self, RoleDataError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }

        let mut roles = BTreeSet::new();
        for part in raw.split(',') {
            let name = part.trim();
            if !is_valid_role_name(name) {
                return Err(RoleDataError {
                    raw: raw.to_string(),
                });
            }
            roles.insert(name.to_string());
        }

        Ok(Self(roles))
    }

    /// 쉼표로 연결된 문자열 반환 (저장소 형식).
    pub fn to_delimited(&self) -> String {
        self.0.iter().cloned().collect::<Vec<_>>().join(",")
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    /// `other`의 모든 역할을 포함하는지 확인.
    pub fn is_superset(&self, other: &RoleSet) -> bool {
        self.0.is_superset(&other.0)
    }

    /// 공통 역할이 하나라도 있는지 확인.
    pub fn intersects(&self, other: &RoleSet) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.to_delimited())
    }
}

impl TryFrom<Vec<String>> for RoleSet {
    type Error = RoleDataError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        if names.iter().any(|name| !is_valid_role_name(name)) {
            return Err(RoleDataError {
                raw: names.join(","),
            });
        }
        Ok(Self(names.into_iter().collect()))
    }
}

impl From<RoleSet> for Vec<String> {
    fn from(roles: RoleSet) -> Self {
        roles.0.into_iter().collect()
    }
}

fn is_valid_role_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_whitespace() || c.is_control())
}

/// 토큰 용도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// 개별 요청 인증용 단기 토큰
    #[serde(rename = "ACCESS")]
    Access,
    /// Access Token 재발급 전용 장기 토큰
    #[serde(rename = "REFRESH")]
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "ACCESS",
            TokenType::Refresh => "REFRESH",
        }
    }

    /// 문자열에서 토큰 타입 파싱 (대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ACCESS" => Some(TokenType::Access),
            "REFRESH" => Some(TokenType::Refresh),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
