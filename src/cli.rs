use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::Result;
use crate::identity::directory::UserRecord;
use crate::protocol::SignatureMethod;
use crate::startup::PlatformConfig;

/// 环境变量前缀，例如 TRACK_FORWARDER__FORWARDER__SECRET
const ENV_PREFIX: &str = "TRACK_FORWARDER";

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: String,

    /// 事件文件路径(每行一个 JSON 事件)，缺省时从标准输入读取
    #[arg(short, long)]
    pub events: Option<PathBuf>,

    /// 日志级别，覆盖配置文件中的 log_level
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub forwarder: ForwarderConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub platform: PlatformConfig,

    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// 默认日志级别
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// 从 YAML 文件加载配置，并允许环境变量覆盖
    pub fn from_file(path: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("forwarder.course_ids")
                    .with_list_parse_key("forwarder.events")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForwarderConfig {
    /// 转发后端名称
    #[serde(default = "default_backend")]
    pub backend: String,
    pub url: Option<String>,
    pub path: Option<String>,
    pub key: Option<String>,
    pub secret: Option<String>,
    pub course_ids: Option<Vec<String>>,
    pub events: Option<Vec<String>>,
    #[serde(default)]
    pub signature_method: SignatureMethod,
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
}

fn default_backend() -> String {
    "schoolbus".to_string()
}

fn default_queue_size() -> usize {
    1000
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct IdentityConfig {
    /// 生成匿名学生标识时使用的密钥
    #[serde(default)]
    pub anonymous_id_secret: String,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}
