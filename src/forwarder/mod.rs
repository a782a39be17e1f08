//! 事件转发模块
//!
//! 该模块提供了分析事件的过滤和转发实现。

pub mod base;
pub mod config;
pub mod schoolbus;
pub mod state;

pub use base::EventForwarder;
pub use config::ForwarderSettings;
pub use schoolbus::SchoolBusForwarder;
pub use state::SendOutcome;

use crate::cli::ForwarderConfig;
use crate::error::{ForwarderError, Result};
use crate::identity::{AnonymousIdProvider, UserDirectory};
use std::sync::Arc;

/// 转发器工厂
pub struct ForwarderFactory;

impl ForwarderFactory {
    /// 按配置中的后端名称创建转发器实例
    pub fn create(
        config: &ForwarderConfig,
        directory: Arc<dyn UserDirectory>,
        anonymizer: Arc<dyn AnonymousIdProvider>,
    ) -> Result<Arc<dyn EventForwarder>> {
        let forwarder: Arc<dyn EventForwarder> = match config.backend.as_str() {
            "schoolbus" => Arc::new(SchoolBusForwarder::new(
                ForwarderSettings::from(config),
                directory,
                anonymizer,
            )),
            other => {
                return Err(ForwarderError::Config(format!(
                    "Unsupported forwarder backend: {}",
                    other
                )))
            }
        };

        Ok(forwarder)
    }
}
