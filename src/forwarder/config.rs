use std::collections::HashSet;
use url::Url;

use crate::cli::ForwarderConfig;
use crate::error::Result;
use crate::protocol::SignatureMethod;

/// 转发器的不可变配置，构造后不再修改
#[derive(Debug, Clone, Default)]
pub struct ForwarderSettings {
    pub url: Option<String>,
    pub path: Option<String>,
    pub key: Option<String>,
    pub secret: Option<String>,
    /// 只有这些课程的数据会被发送
    pub course_ids: HashSet<String>,
    /// 只有这些事件类型会被发送
    pub events: HashSet<String>,
    pub signature_method: SignatureMethod,
}

impl ForwarderSettings {
    pub fn new(
        url: Option<String>,
        path: Option<String>,
        key: Option<String>,
        secret: Option<String>,
        course_ids: Option<Vec<String>>,
        events: Option<Vec<String>>,
    ) -> Self {
        Self {
            url,
            path,
            key,
            secret,
            course_ids: course_ids.unwrap_or_default().into_iter().collect(),
            events: events.unwrap_or_default().into_iter().collect(),
            signature_method: SignatureMethod::default(),
        }
    }

    pub fn with_signature_method(mut self, signature_method: SignatureMethod) -> Self {
        self.signature_method = signature_method;
        self
    }

    /// url、key、secret 都非空时才可发送
    pub fn is_complete(&self) -> bool {
        [&self.url, &self.key, &self.secret]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
    }

    pub fn allows_event(&self, event_type: &str) -> bool {
        self.events.contains(event_type)
    }

    pub fn allows_course(&self, course_id: &str) -> bool {
        self.course_ids.contains(course_id)
    }

    /// 以 url 为基准解析 path，规则同浏览器解析相对链接
    pub fn endpoint(&self) -> Result<Url> {
        let base = Url::parse(self.url.as_deref().unwrap_or_default())?;
        match self.path.as_deref() {
            Some(path) if !path.is_empty() => Ok(base.join(path)?),
            _ => Ok(base),
        }
    }
}

impl From<&ForwarderConfig> for ForwarderSettings {
    fn from(config: &ForwarderConfig) -> Self {
        ForwarderSettings::new(
            config.url.clone(),
            config.path.clone(),
            config.key.clone(),
            config.secret.clone(),
            config.course_ids.clone(),
            config.events.clone(),
        )
        .with_signature_method(config.signature_method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: &str, path: Option<&str>) -> ForwarderSettings {
        ForwarderSettings::new(
            Some(url.to_string()),
            path.map(str::to_string),
            Some("key".to_string()),
            Some("secret".to_string()),
            Some(vec!["C1".to_string()]),
            None,
        )
    }

    #[test]
    fn test_default_sets_are_empty() {
        let settings = settings("http://example.com", None);
        assert!(settings.allows_course("C1"));
        assert!(!settings.allows_course("C2"));
        assert!(settings.events.is_empty());
        assert!(!settings.allows_event("problem_check"));
    }

    #[test]
    fn test_is_complete() {
        assert!(settings("http://example.com", None).is_complete());

        let mut missing_secret = settings("http://example.com", None);
        missing_secret.secret = None;
        assert!(!missing_secret.is_complete());

        let mut empty_key = settings("http://example.com", None);
        empty_key.key = Some(String::new());
        assert!(!empty_key.is_complete());

        assert!(!ForwarderSettings::default().is_complete());
    }

    #[test]
    fn test_endpoint_join() {
        let cases = [
            ("http://example.com/", Some("api/events"), "http://example.com/api/events"),
            ("http://example.com/v1/", Some("events"), "http://example.com/v1/events"),
            ("http://example.com/v1", Some("events"), "http://example.com/events"),
            ("http://example.com/v1/", Some("/events"), "http://example.com/events"),
            ("http://example.com/v1/", None, "http://example.com/v1/"),
            ("http://example.com/", Some("https://other.example.com/x"), "https://other.example.com/x"),
        ];
        for (url, path, expected) in cases {
            assert_eq!(settings(url, path).endpoint().unwrap().as_str(), expected);
        }
    }

    #[test]
    fn test_endpoint_invalid_url() {
        assert!(settings("not a url", Some("events")).endpoint().is_err());
    }
}
