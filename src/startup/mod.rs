//! 平台启动模块
//!
//! 启动时根据配置一次性构建不可变的 [`PlatformSettings`]，之后只以引用方式传递，
//! 不存在全局可变的设置对象。

pub mod auth;
pub mod keyword;
pub mod microsite;
pub mod mimetypes;
pub mod theme;

pub use keyword::{Course, KeywordRegistry};
pub use microsite::Microsite;
pub use mimetypes::MimeTypes;
pub use theme::Theme;

use log::info;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::identity::AnonymousIdProvider;
use auth::AuthProviderConfig;

/// 功能开关
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FeatureFlags {
    #[serde(default)]
    pub use_custom_theme: bool,
    #[serde(default)]
    pub use_microsites: bool,
    #[serde(default)]
    pub enable_third_party_auth: bool,
}

/// 平台配置，来自配置文件的 platform 段
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PlatformConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    /// 主题目录所在的根目录
    #[serde(default)]
    pub env_root: PathBuf,
    pub theme_name: Option<String>,
    #[serde(default)]
    pub template_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub staticfiles_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub microsite_root_dir: PathBuf,
    #[serde(default)]
    pub microsite_configuration: BTreeMap<String, Map<String, Value>>,
    #[serde(default)]
    pub authentication_backends: Vec<String>,
    #[serde(default)]
    pub third_party_auth: Vec<AuthProviderConfig>,
}

/// 静态文件目录，prefix 用于命名空间隔离
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFilesDir {
    pub prefix: Option<String>,
    pub path: PathBuf,
}

impl StaticFilesDir {
    pub fn plain(path: PathBuf) -> Self {
        Self { prefix: None, path }
    }
}

/// 启动完成后的平台设置，只读
#[derive(Debug)]
pub struct PlatformSettings {
    pub mime_types: MimeTypes,
    pub theme: Option<Theme>,
    /// 模板搜索路径，按优先级排序
    pub template_dirs: Vec<PathBuf>,
    pub staticfiles_dirs: Vec<StaticFilesDir>,
    pub microsites: BTreeMap<String, Microsite>,
    pub authentication_backends: Vec<String>,
    pub keywords: KeywordRegistry,
}

/// 启动过程中逐步累积的路径，run 结束时冻结进 PlatformSettings
#[derive(Debug, Default)]
pub(crate) struct SearchPaths {
    pub template_dirs: Vec<PathBuf>,
    pub staticfiles_dirs: Vec<StaticFilesDir>,
}

/// 执行平台启动流程
pub fn run(
    config: &PlatformConfig,
    anonymizer: Arc<dyn AnonymousIdProvider>,
) -> Result<PlatformSettings> {
    let mime_types = MimeTypes::with_platform_types();

    let mut paths = SearchPaths {
        template_dirs: config.template_dirs.clone(),
        staticfiles_dirs: config
            .staticfiles_dirs
            .iter()
            .cloned()
            .map(StaticFilesDir::plain)
            .collect(),
    };

    let theme = if config.features.use_custom_theme {
        theme::enable_theme(config, &mut paths)?
    } else {
        None
    };

    let microsites = if config.features.use_microsites {
        microsite::enable_microsites(config, &mut paths)
    } else {
        BTreeMap::new()
    };

    let authentication_backends = if config.features.enable_third_party_auth {
        auth::apply_settings(&config.third_party_auth, &config.authentication_backends)
    } else {
        config.authentication_backends.clone()
    };

    let keywords = KeywordRegistry::with_platform_keywords(anonymizer);

    info!(
        "Platform startup complete: theme={:?}, microsites={}, auth backends={}",
        theme.as_ref().map(|t| t.name.as_str()),
        microsites.len(),
        authentication_backends.len()
    );

    Ok(PlatformSettings {
        mime_types,
        theme,
        template_dirs: paths.template_dirs,
        staticfiles_dirs: paths.staticfiles_dirs,
        microsites,
        authentication_backends,
        keywords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::HashedAnonymousIdProvider;
    use std::fs;

    fn anonymizer() -> Arc<dyn AnonymousIdProvider> {
        Arc::new(HashedAnonymousIdProvider::new("salt"))
    }

    #[test]
    fn test_run_with_features_disabled() {
        let config = PlatformConfig {
            theme_name: Some("stanford".to_string()),
            template_dirs: vec![PathBuf::from("/srv/lms/templates")],
            authentication_backends: vec!["ratelimitbackend.backends.RateLimitModelBackend".to_string()],
            ..Default::default()
        };

        let settings = run(&config, anonymizer()).unwrap();
        assert!(settings.theme.is_none());
        assert!(settings.microsites.is_empty());
        assert_eq!(settings.template_dirs, vec![PathBuf::from("/srv/lms/templates")]);
        assert_eq!(settings.authentication_backends, config.authentication_backends);
        assert_eq!(settings.mime_types.guess("fonts/icons.woff"), Some("application/font-woff"));
        assert!(settings.keywords.contains("%%USER_ID%%"));
    }

    #[test]
    fn test_run_with_all_features() {
        let root = tempfile::tempdir().unwrap();
        let microsite_root = root.path().join("microsites");
        fs::create_dir_all(microsite_root.join("openedx")).unwrap();

        let mut microsite_configuration = BTreeMap::new();
        microsite_configuration.insert("openedx".to_string(), Map::new());

        let config = PlatformConfig {
            features: FeatureFlags {
                use_custom_theme: true,
                use_microsites: true,
                enable_third_party_auth: true,
            },
            env_root: root.path().to_path_buf(),
            theme_name: Some("stanford".to_string()),
            template_dirs: vec![PathBuf::from("/srv/lms/templates")],
            microsite_root_dir: microsite_root.clone(),
            microsite_configuration,
            authentication_backends: vec!["model".to_string()],
            third_party_auth: vec![AuthProviderConfig {
                name: "Google".to_string(),
                backend: "social.backends.google.GoogleOAuth2".to_string(),
                enabled: true,
            }],
            ..Default::default()
        };

        let settings = run(&config, anonymizer()).unwrap();
        let theme_templates = root.path().join("themes/stanford/templates");
        assert_eq!(
            settings.template_dirs,
            vec![theme_templates, PathBuf::from("/srv/lms/templates"), microsite_root.clone()]
        );
        assert_eq!(settings.staticfiles_dirs[0], StaticFilesDir::plain(microsite_root));
        assert_eq!(settings.staticfiles_dirs[1].prefix.as_deref(), Some("themes/stanford"));
        assert_eq!(settings.microsites.len(), 1);
        assert_eq!(
            settings.authentication_backends,
            vec!["social.backends.google.GoogleOAuth2".to_string(), "model".to_string()]
        );
    }
}
