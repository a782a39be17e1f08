//! 出站协议模块
//!
//! 表单载荷编码和 OAuth 1.0 请求签名。

pub mod form;
pub mod oauth;

pub use form::FormPayload;
pub use oauth::{OAuth1Session, SignatureMethod};
