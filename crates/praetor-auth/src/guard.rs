//! 역할 기반 접근 제어 (RBAC).
//!
//! [`RolePolicy`]는 토큰의 역할 집합에 대한 순수 술어입니다.
//! 보호된 핸들러 앞에서는 [`CheckChain`]이 검사들을 순서대로 실행하고
//! 첫 번째 거부에서 멈춥니다.

use std::fmt;
use std::sync::Arc;

use praetor_core::{Identity, RoleSet};

/// 역할 정책.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolePolicy {
    /// 나열된 역할을 모두 가져야 함 (빈 목록은 항상 통과)
    RequireAll(RoleSet),
    /// 나열된 역할 중 하나 이상을 가져야 함 (빈 목록은 항상 거부)
    AcceptAny(RoleSet),
}

impl RolePolicy {
    pub fn require_all<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RolePolicy::RequireAll(roles.into_iter().collect())
    }

    pub fn accept_any<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RolePolicy::AcceptAny(roles.into_iter().collect())
    }

    pub fn is_satisfied_by(&self, roles: &RoleSet) -> bool {
        authorize(roles, self)
    }
}

impl fmt::Display for RolePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RolePolicy::RequireAll(roles) => write!(f, "require_all{}", roles),
            RolePolicy::AcceptAny(roles) => write!(f, "accept_any{}", roles),
        }
    }
}

/// 역할 집합이 정책을 만족하는지 확인.
pub fn authorize(roles: &RoleSet, policy: &RolePolicy) -> bool {
    match policy {
        RolePolicy::RequireAll(required) => roles.is_superset(required),
        RolePolicy::AcceptAny(accepted) => roles.intersects(accepted),
    }
}

/// 검사 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Deny(String),
}

/// 접근 검사.
pub trait AccessCheck: Send + Sync {
    /// 로그에 남길 검사 이름.
    fn name(&self) -> String;

    fn check(&self, identity: &Identity) -> Verdict;
}

impl AccessCheck for RolePolicy {
    fn name(&self) -> String {
        self.to_string()
    }

    fn check(&self, identity: &Identity) -> Verdict {
        if authorize(&identity.roles, self) {
            return Verdict::Pass;
        }
        let reason = match self {
            RolePolicy::RequireAll(required) => format!("필요한 역할: {}", required),
            RolePolicy::AcceptAny(accepted) => format!("허용된 역할: {}", accepted),
        };
        Verdict::Deny(reason)
    }
}

/// 클로저 기반 검사.
pub struct FnCheck<F> {
    name: String,
    check: F,
}

/// 클로저로 검사 생성.
///
/// ```rust,ignore
/// let not_root = check_fn("not_root", |id: &Identity| {
///     if id.username == "root" { Verdict::Deny("root 금지".into()) } else { Verdict::Pass }
/// });
/// ```
pub fn check_fn<F>(name: impl Into<String>, check: F) -> FnCheck<F>
where
    F: Fn(&Identity) -> Verdict + Send + Sync,
{
    FnCheck {
        name: name.into(),
        check,
    }
}

impl<F> AccessCheck for FnCheck<F>
where
    F: Fn(&Identity) -> Verdict + Send + Sync,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn check(&self, identity: &Identity) -> Verdict {
        (self.check)(identity)
    }
}

/// 거부 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    /// 거부한 검사 이름
    pub check: String,
    /// 거부 사유
    pub reason: String,
}

/// 순서가 있는 접근 검사 목록.
#[derive(Clone, Default)]
pub struct CheckChain {
    checks: Vec<Arc<dyn AccessCheck>>,
}

impl CheckChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// 단일 역할 정책 체인.
    pub fn policy(policy: RolePolicy) -> Self {
        Self::new().then(policy)
    }

    /// 검사를 체인 끝에 추가.
    #[must_use]
    pub fn then(mut self, check: impl AccessCheck + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// 모든 검사 실행. 첫 번째 거부에서 중단.
    pub fn run(&self, identity: &Identity) -> Result<(), Denial> {
        for check in &self.checks {
            if let Verdict::Deny(reason) = check.check(identity) {
                return Err(Denial {
                    check: check.name(),
                    reason,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CheckChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.checks.iter().map(|c| c.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(username: &str, roles: &str) -> Identity {
        Identity {
            id: username.into(),
            username: username.to_string(),
            roles: RoleSet::parse_delimited(roles).unwrap(),
        }
    }

    #[test]
    fn test_require_all() {
        let admin_required = RolePolicy::require_all(["admin"]);

        assert!(authorize(&identity("Walter", "admin").roles, &admin_required));
        assert!(authorize(&identity("Maude", "operator,admin").roles, &admin_required));
        assert!(!authorize(&identity("Donnie", "operator").roles, &admin_required));
        assert!(!authorize(&identity("TheDude", "").roles, &admin_required));

        let both = RolePolicy::require_all(["admin", "operator"]);
        assert!(both.is_satisfied_by(&identity("Maude", "operator,admin").roles));
        assert!(!both.is_satisfied_by(&identity("Walter", "admin").roles));
    }

    #[test]
    fn test_accept_any() {
        let accepted = RolePolicy::accept_any(["admin", "operator"]);

        assert!(authorize(&identity("Walter", "admin").roles, &accepted));
        assert!(authorize(&identity("Donnie", "operator").roles, &accepted));
        assert!(!authorize(&identity("TheDude", "").roles, &accepted));
        assert!(!authorize(&identity("Bunny", "viewer").roles, &accepted));
    }

    #[test]
    fn test_empty_policies() {
        let roles = identity("Walter", "admin").roles;
        assert!(authorize(&roles, &RolePolicy::RequireAll(RoleSet::new())));
        assert!(!authorize(&roles, &RolePolicy::AcceptAny(RoleSet::new())));
    }

    #[test]
    fn test_chain_stops_at_first_denial() {
        let chain = CheckChain::new()
            .then(RolePolicy::accept_any(["admin", "operator"]))
            .then(check_fn("no_donnie", |id: &Identity| {
                if id.username == "Donnie" {
                    Verdict::Deny("Donnie는 출입 금지".to_string())
                } else {
                    Verdict::Pass
                }
            }))
            .then(RolePolicy::require_all(["admin"]));

        assert_eq!(chain.len(), 3);
        assert!(chain.run(&identity("Walter", "admin")).is_ok());

        let denial = chain.run(&identity("Donnie", "operator")).unwrap_err();
        assert_eq!(denial.check, "no_donnie");

        let denial = chain.run(&identity("TheDude", "")).unwrap_err();
        assert_eq!(denial.check, "accept_any{admin,operator}");
    }

    #[test]
    fn test_empty_chain_passes() {
        assert!(CheckChain::new().run(&identity("TheDude", "")).is_ok());
    }
}
