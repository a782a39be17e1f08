use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;

use super::base::EventForwarder;
use super::config::ForwarderSettings;
use super::state::SendOutcome;
use crate::event::{as_user_id, is_truthy, Event};
use crate::identity::{AnonymousIdProvider, UserDirectory};
use crate::protocol::{FormPayload, OAuth1Session};

/// 只有服务端产生的事件会被转发
const SERVER_SOURCE: &str = "server";
const CORRECT: &str = "correct";

/// 通过过滤、等待查找用户的事件
#[derive(Debug)]
struct Candidate<'a> {
    event_type: &'a str,
    course_id: &'a str,
    user_id: u64,
    problem_id: String,
    answers: Option<Value>,
    is_correct: bool,
}

/// 将答题事件转发到 SchoolBus 分析服务
pub struct SchoolBusForwarder {
    settings: ForwarderSettings,
    oauth: OAuth1Session,
    client: Client,
    directory: Arc<dyn UserDirectory>,
    anonymizer: Arc<dyn AnonymousIdProvider>,
}

impl SchoolBusForwarder {
    pub fn new(
        settings: ForwarderSettings,
        directory: Arc<dyn UserDirectory>,
        anonymizer: Arc<dyn AnonymousIdProvider>,
    ) -> Self {
        let oauth = OAuth1Session::new(
            settings.key.clone().unwrap_or_default(),
            settings.secret.clone().unwrap_or_default(),
            settings.signature_method,
        );

        Self {
            settings,
            oauth,
            client: Client::new(),
            directory,
            anonymizer,
        }
    }

    // 便宜的检查在前，按顺序短路
    fn select<'a>(&self, event: &'a Event) -> Option<Candidate<'a>> {
        if !self.settings.is_complete() {
            return None;
        }

        let event_type = event.event_type()?;
        if !self.settings.allows_event(event_type) {
            return None;
        }

        if event.event_source() != Some(SERVER_SOURCE) {
            return None;
        }

        let context = event.context()?;

        let course_id = context
            .get("course_id")
            .and_then(Value::as_str)
            .filter(|id| self.settings.allows_course(id))?;

        let user_id = context
            .get("user_id")
            .filter(|v| is_truthy(v))
            .and_then(as_user_id)?;

        let body = event.body()?;

        let problem_id = body
            .get("problem_id")
            .filter(|v| is_truthy(v))
            .map(text_of)?;

        let answers = body.get("answers").cloned();

        // 没有明确判分结果的事件不转发
        let success = body.get("success").filter(|v| is_truthy(v))?;
        let is_correct = success.as_str() == Some(CORRECT);

        Some(Candidate {
            event_type,
            course_id,
            user_id,
            problem_id,
            answers,
            is_correct,
        })
    }

    async fn send(&self, payload: &FormPayload) -> SendOutcome {
        let endpoint = match self.settings.endpoint() {
            Ok(endpoint) => endpoint,
            Err(e) => {
                warn!(
                    "Unable to send event to SchoolBus analytics service: {:?}: {}: {}",
                    self.settings.url, payload, e
                );
                return SendOutcome::NotSent;
            }
        };

        let fields = payload.fields();
        let authorization = match self.oauth.authorization("POST", &endpoint, &fields) {
            Ok(header) => header,
            Err(e) => {
                warn!(
                    "Unable to send event to SchoolBus analytics service: {}: {}: {}",
                    endpoint, payload, e
                );
                return SendOutcome::NotSent;
            }
        };

        let response = self
            .client
            .post(endpoint.clone())
            .header(AUTHORIZATION, authorization)
            .form(&fields)
            .send()
            .await;

        match response {
            Ok(response) if response.status() == StatusCode::OK => SendOutcome::Ok,
            Ok(response) => {
                warn!(
                    "SchoolBus analytics service returns error status: {}.",
                    response.status().as_u16()
                );
                SendOutcome::Error
            }
            Err(e) => {
                warn!(
                    "Unable to send event to SchoolBus analytics service: {}: {}: {}",
                    endpoint, payload, e
                );
                SendOutcome::NotSent
            }
        }
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl EventForwarder for SchoolBusForwarder {
    fn backend_name(&self) -> &str {
        "schoolbus"
    }

    async fn forward(&self, event: &Event) -> SendOutcome {
        let Some(candidate) = self.select(event) else {
            debug!("Event filtered: {:?}", event.event_type());
            return SendOutcome::NotSent;
        };

        // 数据库查询放在最后，避免不必要的开销
        let user = match self.directory.lookup_user(candidate.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Can not find a user with user_id: {}", candidate.user_id);
                return SendOutcome::NotSent;
            }
            Err(e) => {
                warn!("Failed to look up user_id {}: {}", candidate.user_id, e);
                return SendOutcome::NotSent;
            }
        };

        let payload = FormPayload {
            course_id: candidate.course_id.to_string(),
            resource_id: candidate.problem_id,
            student_id: self.anonymizer.anonymous_id_for(&user, None),
            answers: candidate.answers,
            result: candidate.is_correct,
            event_type: candidate.event_type.to_string(),
        };

        self.send(&payload).await
    }
}
