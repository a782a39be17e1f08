use log::{error, info};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{PlatformConfig, SearchPaths, StaticFilesDir};

/// 微站点，即以子域名区分的站点
#[derive(Debug, Clone, PartialEq)]
pub struct Microsite {
    pub microsite_name: String,
    pub microsite_root: PathBuf,
    pub template_dir: PathBuf,
    /// 配置文件中的原始站点配置
    pub config: Map<String, Value>,
}

/// 加载目录存在的微站点，目录不存在的站点记录错误后丢弃
///
/// 只要有一个站点有效，微站点根目录就会加入模板和静态文件搜索路径。
pub(crate) fn enable_microsites(
    config: &PlatformConfig,
    paths: &mut SearchPaths,
) -> BTreeMap<String, Microsite> {
    let microsites_root = &config.microsite_root_dir;
    let mut microsites = BTreeMap::new();

    for (name, site_config) in &config.microsite_configuration {
        let root = microsites_root.join(name);

        if root.is_dir() {
            info!("Loading microsite {}", root.display());
            microsites.insert(
                name.clone(),
                Microsite {
                    microsite_name: name.clone(),
                    template_dir: root.join("templates"),
                    microsite_root: root,
                    config: site_config.clone(),
                },
            );
        } else {
            error!("Error loading microsite {}. Directory does not exist", root.display());
        }
    }

    if !microsites.is_empty() {
        paths.template_dirs.push(microsites_root.clone());
        paths
            .staticfiles_dirs
            .insert(0, StaticFilesDir::plain(microsites_root.clone()));
    }

    microsites
}
