use serde_json::Value;
use std::fmt;

/// 发送给分析服务的表单载荷
#[derive(Debug, Clone, PartialEq)]
pub struct FormPayload {
    pub course_id: String,
    /// 即 problem_id
    pub resource_id: String,
    /// 匿名学生标识
    pub student_id: String,
    /// 原样透传
    pub answers: Option<Value>,
    pub result: bool,
    pub event_type: String,
}

impl FormPayload {
    /// 按线上格式生成表单字段，顺序固定
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("course_id", self.course_id.clone()),
            ("resource_id", self.resource_id.clone()),
            ("student_id", self.student_id.clone()),
            ("answers", encode_answers(self.answers.as_ref())),
            ("result", encode_result(self.result).to_string()),
            ("event_type", self.event_type.clone()),
        ]
    }
}

fn encode_result(result: bool) -> &'static str {
    if result {
        "True"
    } else {
        "False"
    }
}

fn encode_answers(answers: Option<&Value>) -> String {
    match answers {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl fmt::Display for FormPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .fields()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{{{}}}", fields)
    }
}
