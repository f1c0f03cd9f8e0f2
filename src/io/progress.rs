/// 进度报告
///
/// 纯粹的即发即忘计数器: 每处理一个顶层单元(段落/元素) tick 一次，
/// 可选回调喂给调用方的进度条。没有背压也没有取消语义。
#[derive(Default)]
pub struct ProgressReport {
    step: f64,
    progress: f64,
    text: Option<String>,
    callback: Option<Box<dyn FnMut(f64) + Send>>,
}

impl ProgressReport {
    pub fn new() -> Self {
        ProgressReport::default()
    }

    pub fn set_progress_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn progress_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// 每个 tick 前进多少，通常是 1/(单元数+1)
    pub fn set_progress_step(&mut self, step: f64) {
        self.step = step;
    }

    pub fn start(&mut self) {
        self.progress = 0.0;
        self.notify();
    }

    pub fn tick(&mut self) {
        self.progress = (self.progress + self.step).min(1.0);
        self.notify();
    }

    pub fn finish(&mut self) {
        self.progress = 1.0;
        self.notify();
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn on_progress(&mut self, callback: impl FnMut(f64) + Send + 'static) {
        self.callback = Some(Box::new(callback));
    }

    fn notify(&mut self) {
        let value = self.progress;
        if let Some(cb) = &mut self.callback {
            cb(value);
        }
    }
}
