use serde_json::Value;

/// 错误通道
///
/// 导入/导出失败通过它回报给调用方: 人类可读的消息，
/// 加上可选的结构化细节(比如 XML 错误的行列位置)。
#[derive(Debug, Default)]
pub struct ErrorReport {
    message: Option<String>,
    detail: Option<Value>,
}

impl ErrorReport {
    pub fn new() -> Self {
        ErrorReport::default()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn set_detail(&mut self, detail: Value) {
        self.detail = Some(detail);
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.detail = None;
    }

    pub fn has_error(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }
}
