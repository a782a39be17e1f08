use log::{debug, warn};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use super::Event;
use crate::error::Result;

/// 从 JSON Lines 输入读取事件并送入转发队列
pub struct EventReader<R> {
    input: R,
    tx: mpsc::Sender<Event>,
    source_name: String,
}

impl<R: AsyncBufRead + Unpin> EventReader<R> {
    pub fn new(input: R, tx: mpsc::Sender<Event>, source_name: impl Into<String>) -> Self {
        Self {
            input,
            tx,
            source_name: source_name.into(),
        }
    }

    /// 读取直到输入结束或接收端关闭，返回送出的事件数量
    pub async fn read_loop(mut self) -> Result<u64> {
        let mut lines = (&mut self.input).lines();
        let mut line_no: u64 = 0;
        let mut sent: u64 = 0;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = match serde_json::from_str(line) {
                Ok(value @ Value::Object(_)) => value,
                Ok(_) => {
                    warn!("{}:{}: event is not a JSON object, skipping", self.source_name, line_no);
                    continue;
                }
                Err(e) => {
                    warn!("{}:{}: malformed event: {}", self.source_name, line_no, e);
                    continue;
                }
            };

            if self.tx.send(Event::new(value)).await.is_err() {
                debug!("Event queue closed, stop reading {}", self.source_name);
                break;
            }
            sent += 1;
        }

        Ok(sent)
    }
}
