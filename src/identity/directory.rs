use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use super::User;
use crate::error::Result;

/// 用户目录，按 user_id 查找用户
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// 查找用户，不存在时返回 None
    async fn lookup_user(&self, user_id: u64) -> Result<Option<User>>;
}

/// 配置文件中的用户条目
#[derive(Debug, Deserialize, Clone)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            username: record.username,
            full_name: record.full_name,
        }
    }
}

/// 由配置构建的只读用户目录
pub struct StaticUserDirectory {
    users: HashMap<u64, User>,
}

impl StaticUserDirectory {
    pub fn new(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = records
            .into_iter()
            .map(|record| (record.id, User::from(record)))
            .collect();
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn lookup_user(&self, user_id: u64) -> Result<Option<User>> {
        Ok(self.users.get(&user_id).cloned())
    }
}
