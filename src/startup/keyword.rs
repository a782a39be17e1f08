use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::identity::{AnonymousIdProvider, User};

pub const USER_ID: &str = "%%USER_ID%%";
pub const USER_FULLNAME: &str = "%%USER_FULLNAME%%";
pub const COURSE_DISPLAY_NAME: &str = "%%COURSE_DISPLAY_NAME%%";
pub const COURSE_END_DATE: &str = "%%COURSE_END_DATE%%";

const DEFAULT_TIME_FORMAT: &str = "%b %d, %Y at %H:%M UTC";

/// 课程
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: String,
    pub display_name: String,
    pub end: Option<DateTime<Utc>>,
}

pub type KeywordFn = Box<dyn Fn(&User, &Course) -> String + Send + Sync>;

/// 关键字替换表，渲染 html、文本和邮件前用于过滤字符串
#[derive(Default)]
pub struct KeywordRegistry {
    functions: BTreeMap<String, KeywordFn>,
}

impl fmt::Debug for KeywordRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.functions.keys()).finish()
    }
}

impl KeywordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 平台默认关键字
    pub fn with_platform_keywords(anonymizer: Arc<dyn AnonymousIdProvider>) -> Self {
        let mut registry = Self::new();
        registry.register(USER_ID, move |user, course| {
            anonymizer.anonymous_id_for(user, Some(course.id.as_str()))
        });
        registry.register(USER_FULLNAME, |user, _| user.full_name.clone());
        registry.register(COURSE_DISPLAY_NAME, |_, course| course.display_name.clone());
        registry.register(COURSE_END_DATE, |_, course| {
            course
                .end
                .map(|end| end.format(DEFAULT_TIME_FORMAT).to_string())
                .unwrap_or_default()
        });
        registry
    }

    pub fn register<F>(&mut self, keyword: &str, function: F)
    where
        F: Fn(&User, &Course) -> String + Send + Sync + 'static,
    {
        self.functions.insert(keyword.to_string(), Box::new(function));
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.functions.contains_key(keyword)
    }

    /// 替换文本中出现的全部关键字，未出现的关键字不会求值
    /// 从左到右单遍扫描，替换结果不会被再次展开
    pub fn substitute(&self, text: &str, user: &User, course: &Course) -> String {
        let mut result = String::with_capacity(text.len());
        let mut rest = text;
        while let Some((start, keyword, function)) = self.next_keyword(rest) {
            result.push_str(&rest[..start]);
            result.push_str(&function(user, course));
            rest = &rest[start + keyword.len()..];
        }
        result.push_str(rest);
        result
    }

    // 最靠前的关键字，同一位置取最长的
    fn next_keyword(&self, text: &str) -> Option<(usize, &str, &KeywordFn)> {
        self.functions
            .iter()
            .filter(|(keyword, _)| !keyword.is_empty())
            .filter_map(|(keyword, function)| {
                text.find(keyword.as_str())
                    .map(|start| (start, keyword.as_str(), function))
            })
            .min_by_key(|(start, keyword, _)| (*start, Reverse(keyword.len())))
    }
}
