//! 分析事件转发
//!
//! - 平台启动: 主题、微站点、第三方登录、关键字替换表
//! - 事件转发: 过滤答题事件并以 OAuth 1.0 签名的表单 POST 到分析服务

pub mod cli;
pub mod error;
pub mod event;
pub mod forwarder;
pub mod identity;
pub mod monitor;
pub mod protocol;
pub mod startup;

#[cfg(test)]
mod test_log;
