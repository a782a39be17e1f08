//! 事件接入模块
//!
//! 该模块提供了分析事件的只读视图和 JSON Lines 读取器。

pub mod reader;

pub use reader::EventReader;

use serde_json::{Map, Value};

/// 分析事件，内部保持原始 JSON 结构，未识别的字段会被忽略
#[derive(Debug, Clone, PartialEq)]
pub struct Event(Value);

impl Event {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn event_type(&self) -> Option<&str> {
        self.0.get("event_type").and_then(Value::as_str)
    }

    pub fn event_source(&self) -> Option<&str> {
        self.0.get("event_source").and_then(Value::as_str)
    }

    /// context 映射，缺失或为假值时返回 None
    pub fn context(&self) -> Option<&Map<String, Value>> {
        truthy_field(&self.0, "context").and_then(Value::as_object)
    }

    /// 事件主体，缺失或为假值时返回 None
    pub fn body(&self) -> Option<&Map<String, Value>> {
        truthy_field(&self.0, "event").and_then(Value::as_object)
    }
}

impl From<Value> for Event {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// 假值: null、false、0、空字符串、空数组、空对象
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// 取出字段，仅当其为真值时返回
pub fn truthy_field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| is_truthy(v))
}

/// 解析 user_id，兼容数字字符串
pub fn as_user_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
        for truthy in [json!(true), json!(1), json!(-2.5), json!("x"), json!([0]), json!({"a": null})] {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
    }

    #[test]
    fn test_event_accessors() {
        let event = Event::new(json!({
            "event_type": "problem_check",
            "event_source": "server",
            "context": {"course_id": "C1", "user_id": 42},
            "event": {},
            "extra": [1, 2, 3],
        }));

        assert_eq!(event.event_type(), Some("problem_check"));
        assert_eq!(event.event_source(), Some("server"));
        assert_eq!(event.context().unwrap().get("course_id"), Some(&json!("C1")));
        assert!(event.body().is_none());
    }

    #[test]
    fn test_non_object_context_is_ignored() {
        let event = Event::new(json!({"context": "C1", "event": [1]}));
        assert!(event.context().is_none());
        assert!(event.body().is_none());
    }

    #[test]
    fn test_user_id_parsing() {
        assert_eq!(as_user_id(&json!(42)), Some(42));
        assert_eq!(as_user_id(&json!("42")), Some(42));
        assert_eq!(as_user_id(&json!(-1)), None);
        assert_eq!(as_user_id(&json!("abc")), None);
        assert_eq!(as_user_id(&json!(null)), None);
    }
}
