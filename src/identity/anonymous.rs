use sha2::{Digest, Sha256};
use std::fmt::Write;

use super::User;

/// 匿名标识长度(十六进制字符)
const ANONYMOUS_ID_LEN: usize = 32;

/// 为用户生成稳定的匿名标识，不会暴露真实的 user_id
pub trait AnonymousIdProvider: Send + Sync {
    /// scope 为课程 id，None 表示不区分课程
    fn anonymous_id_for(&self, user: &User, scope: Option<&str>) -> String;
}

/// 基于 SHA-256 的匿名标识: hex(sha256(secret | user_id | scope))
pub struct HashedAnonymousIdProvider {
    secret: String,
}

impl HashedAnonymousIdProvider {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl AnonymousIdProvider for HashedAnonymousIdProvider {
    fn anonymous_id_for(&self, user: &User, scope: Option<&str>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(user.id.to_string().as_bytes());
        if let Some(course_id) = scope {
            hasher.update(course_id.as_bytes());
        }

        let digest = hasher.finalize();
        let mut encoded = String::with_capacity(digest.len() * 2);
        for byte in digest.iter() {
            let _ = write!(encoded, "{:02x}", byte);
        }
        encoded.truncate(ANONYMOUS_ID_LEN);
        encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64) -> User {
        User {
            id,
            username: format!("user{}", id),
            full_name: String::new(),
        }
    }

    #[test]
    fn test_anonymous_id_is_stable_per_scope() {
        let provider = HashedAnonymousIdProvider::new("salt");
        let first = provider.anonymous_id_for(&user(42), None);
        let second = provider.anonymous_id_for(&user(42), None);
        assert_eq!(first, second);
        assert_eq!(first.len(), ANONYMOUS_ID_LEN);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));

        let scoped = provider.anonymous_id_for(&user(42), Some("C1"));
        assert_ne!(first, scoped);
        assert_eq!(scoped, provider.anonymous_id_for(&user(42), Some("C1")));
    }

    #[test]
    fn test_anonymous_id_differs_by_user_and_secret() {
        let provider = HashedAnonymousIdProvider::new("salt");
        let other_secret = HashedAnonymousIdProvider::new("pepper");
        let id = provider.anonymous_id_for(&user(42), None);

        assert_ne!(id, provider.anonymous_id_for(&user(43), None));
        assert_ne!(id, other_secret.anonymous_id_for(&user(42), None));
        assert_ne!(id, "42");
    }
}
