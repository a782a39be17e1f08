use std::fmt;

/// 单次转发的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// 被过滤、用户不存在或传输失败
    NotSent,
    /// 服务端返回 200
    Ok,
    /// 服务端返回其他状态码
    Error,
}

impl SendOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendOutcome::NotSent => "not sent",
            SendOutcome::Ok => "OK",
            SendOutcome::Error => "Error",
        }
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
