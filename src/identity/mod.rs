//! 身份协作者模块
//!
//! 提供用户目录查询和匿名学生标识生成。

pub mod anonymous;
pub mod directory;

pub use anonymous::{AnonymousIdProvider, HashedAnonymousIdProvider};
pub use directory::{StaticUserDirectory, UserDirectory};

/// 平台用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    /// 个人资料中的全名
    pub full_name: String,
}
