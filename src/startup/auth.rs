use log::info;
use serde::Deserialize;

/// 第三方登录提供方
#[derive(Debug, Deserialize, Clone)]
pub struct AuthProviderConfig {
    pub name: String,
    /// 认证后端的完整名称
    pub backend: String,
    #[serde(default)]
    pub enabled: bool,
}

/// 已启用提供方的后端排在默认后端之前，重复的只保留第一个
pub(crate) fn apply_settings(providers: &[AuthProviderConfig], defaults: &[String]) -> Vec<String> {
    let mut backends: Vec<String> = Vec::with_capacity(providers.len() + defaults.len());

    let enabled = providers.iter().filter(|p| p.enabled);
    for provider in enabled {
        info!("Enabling third party auth provider {}", provider.name);
        if !backends.contains(&provider.backend) {
            backends.push(provider.backend.clone());
        }
    }

    for backend in defaults {
        if !backends.contains(backend) {
            backends.push(backend.clone());
        }
    }

    backends
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(name: &str, backend: &str, enabled: bool) -> AuthProviderConfig {
        AuthProviderConfig {
            name: name.to_string(),
            backend: backend.to_string(),
            enabled,
        }
    }

    #[test]
    fn test_apply_settings_orders_and_dedups() {
        let providers = vec![
            provider("Google", "google-oauth2", true),
            provider("LinkedIn", "linkedin-oauth2", false),
            provider("Google Apps", "google-oauth2", true),
        ];
        let defaults = vec!["model".to_string(), "google-oauth2".to_string()];

        assert_eq!(
            apply_settings(&providers, &defaults),
            vec!["google-oauth2".to_string(), "model".to_string()]
        );
    }

    #[test]
    fn test_apply_settings_without_providers() {
        let defaults = vec!["model".to_string()];
        assert_eq!(apply_settings(&[], &defaults), defaults);
    }
}
