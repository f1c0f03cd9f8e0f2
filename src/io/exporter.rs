use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ExportResult;
use crate::io::{ErrorReport, ProgressReport};
use crate::models::Screenplay;

/// 导出器
///
/// 与导入器对称: 具体格式实现 do_export 往字节流里写，
/// write 负责开文件、进度起止和错误上报。导出器对文档只读。
pub trait Exporter {
    fn format_name(&self) -> &'static str;

    fn progress(&mut self) -> &mut ProgressReport;

    fn error(&mut self) -> &mut ErrorReport;

    fn do_export(&mut self, doc: &Screenplay, out: &mut dyn Write) -> ExportResult<()>;

    /// 导出到文件，返回是否成功；失败原因在错误通道里
    fn write(&mut self, doc: &Screenplay, path: &Path) -> bool {
        self.error().clear();

        let mut file = match File::create(path) {
            Ok(file) => file,
            Err(e) => {
                self.error()
                    .set_message(format!("无法打开文件 {} 进行写入: {}", path.display(), e));
                return false;
            }
        };

        let text = format!("正在导出 {} 格式", self.format_name());
        self.progress().set_progress_text(text);
        self.progress().start();
        let result = self.do_export(doc, &mut file);
        self.progress().finish();

        match result {
            Ok(()) => true,
            Err(e) => {
                self.error().set_message(e.to_string());
                false
            }
        }
    }
}
