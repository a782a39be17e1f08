use async_trait::async_trait;

use crate::{event::Event, forwarder::state::SendOutcome};

#[async_trait]
pub trait EventForwarder: Send + Sync {
    /// 获取后端名称
    fn backend_name(&self) -> &str;

    /// 转发单个事件，失败不会向调用方抛出错误
    async fn forward(&self, event: &Event) -> SendOutcome;
}
