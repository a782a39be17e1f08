use std::sync::atomic::{AtomicU64, Ordering};

use crate::forwarder::SendOutcome;

/// 转发统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ForwardingStats {
    /// 收到的事件数量
    pub events_received: u64,
    /// 服务端返回 200 的数量
    pub events_sent: u64,
    /// 服务端返回错误状态的数量
    pub events_rejected: u64,
    /// 未发送(被过滤或传输失败)的数量
    pub events_not_sent: u64,
}

/// 转发监控器
#[derive(Debug, Default)]
pub struct ForwardingMonitor {
    received: AtomicU64,
    sent: AtomicU64,
    rejected: AtomicU64,
    not_sent: AtomicU64,
}

impl ForwardingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: SendOutcome) {
        self.received.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            SendOutcome::Ok => &self.sent,
            SendOutcome::Error => &self.rejected,
            SendOutcome::NotSent => &self.not_sent,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取当前统计信息
    pub fn snapshot(&self) -> ForwardingStats {
        ForwardingStats {
            events_received: self.received.load(Ordering::Relaxed),
            events_sent: self.sent.load(Ordering::Relaxed),
            events_rejected: self.rejected.load(Ordering::Relaxed),
            events_not_sent: self.not_sent.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarding_monitor() {
        let monitor = ForwardingMonitor::new();

        monitor.record(SendOutcome::Ok);
        monitor.record(SendOutcome::NotSent);
        monitor.record(SendOutcome::NotSent);
        monitor.record(SendOutcome::Error);

        let stats = monitor.snapshot();
        assert_eq!(
            stats,
            ForwardingStats {
                events_received: 4,
                events_sent: 1,
                events_rejected: 1,
                events_not_sent: 2,
            }
        );
    }
}
