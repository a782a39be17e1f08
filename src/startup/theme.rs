use log::info;
use std::path::PathBuf;

use super::{PlatformConfig, SearchPaths, StaticFilesDir};
use crate::error::{ForwarderError, Result};

/// 已启用的自定义主题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    /// 主题文件位于 env_root/themes/<name>
    pub root: PathBuf,
    pub favicon_path: String,
}

/// 启用自定义主题
///
/// 主题名为空时视为未配置，返回 None。主题模板放在搜索路径最前面，
/// 静态文件以 `themes/<name>` 为命名空间，避免与默认静态文件冲突。
pub(crate) fn enable_theme(config: &PlatformConfig, paths: &mut SearchPaths) -> Result<Option<Theme>> {
    let name = match config.theme_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return Ok(None),
    };

    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ForwarderError::Startup(format!("Invalid theme name: {}", name)));
    }

    let root = config.env_root.join("themes").join(name);

    paths.template_dirs.insert(0, root.join("templates"));
    paths.staticfiles_dirs.push(StaticFilesDir {
        prefix: Some(format!("themes/{}", name)),
        path: root.join("static"),
    });

    info!("Enabled custom theme {} from {}", name, root.display());

    Ok(Some(Theme {
        name: name.to_string(),
        favicon_path: format!("themes/{}/images/favicon.ico", name),
        root,
    }))
}
