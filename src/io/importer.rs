use std::fs;
use std::path::Path;

use serde_json::json;

use crate::error::{ImportError, ImportResult};
use crate::io::{ErrorReport, ProgressReport};
use crate::models::Screenplay;

/// 导入器
///
/// 具体格式只实现 do_import: 吃进字节流，往目标剧本上追加场景。
/// 文件 IO、目标重置、进度起止和错误上报都由 read 统一处理。
/// do_import 中途返回 Err 时，已建出的场景留在文档里，
/// 由调用方在失败时丢弃整个文档。
pub trait Importer {
    /// 格式名，进度文案用
    fn format_name(&self) -> &'static str;

    fn progress(&mut self) -> &mut ProgressReport;

    fn error(&mut self) -> &mut ErrorReport;

    /// 格式引擎本体
    fn do_import(&mut self, bytes: &[u8], doc: &mut Screenplay) -> ImportResult<()>;

    /// 从文件导入，返回是否成功；失败原因在错误通道里
    fn read(&mut self, path: &Path, doc: &mut Screenplay) -> bool {
        self.error().clear();
        doc.reset();

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.error()
                    .set_message(format!("无法读取文件 {}: {}", path.display(), e));
                return false;
            }
        };
        if bytes.is_empty() {
            self.error().set_message(ImportError::NothingToImport.to_string());
            return false;
        }

        let text = format!("正在导入 {} 格式", self.format_name());
        self.progress().set_progress_text(text);
        self.progress().start();
        let result = self.do_import(&bytes, doc);
        self.progress().finish();

        match result {
            Ok(()) => true,
            Err(e) => {
                if let ImportError::XmlParse { line, column, .. } = &e {
                    let detail = json!({ "line": line, "column": column });
                    self.error().set_detail(detail);
                }
                self.error().set_message(e.to_string());
                false
            }
        }
    }
}
