//! 便捷 API
//!
//! 这个模块提供按扩展名分发的文件导入/导出入口和纯文本解析包装

use std::path::Path;

use crate::exporters::{FinalDraftExporter, FountainExporter};
use crate::importers::{FinalDraftImporter, FountainImporter, HtmlImporter};
use crate::io::{Exporter, Importer};
use crate::models::{Element, ParseOptions, Screenplay, TitlePage, WriteOptions};
use crate::parser::{FountainParser, ParseOutput};
use crate::writer::FountainWriter;

/// 文件操作结果
#[derive(Debug, Clone)]
pub struct FileResult {
    pub success: bool,
    pub message: String,
}

/// 解析 Fountain 文本
pub fn parse_fountain(text: &str, options: &ParseOptions) -> ParseOutput {
    FountainParser::with_options(options.clone()).parse(text)
}

/// 解析 Fountain 文本，返回 JSON 格式结果
pub fn parse_fountain_to_json(text: &str, options: &ParseOptions) -> String {
    let output = parse_fountain(text, options);
    serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
}

/// 写出 Fountain 文本
pub fn write_fountain(title_page: &TitlePage, body: &[Element], options: &WriteOptions) -> String {
    FountainWriter::with_options(options.clone()).write(title_page, body)
}

fn importer_for(path: &Path) -> Option<Box<dyn Importer>> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "fountain" | "txt" => Some(Box::new(FountainImporter::new())),
        "fdx" | "xml" => Some(Box::new(FinalDraftImporter::new())),
        "html" | "htm" => Some(Box::new(HtmlImporter::new())),
        _ => None,
    }
}

fn exporter_for(path: &Path) -> Option<Box<dyn Exporter>> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "fountain" | "txt" => Some(Box::new(FountainExporter::new())),
        "fdx" | "xml" => Some(Box::new(FinalDraftExporter::new())),
        _ => None,
    }
}

/// 按扩展名导入文件到剧本文档
pub fn import_file(path: impl AsRef<Path>, doc: &mut Screenplay) -> FileResult {
    let path = path.as_ref();
    let mut importer = match importer_for(path) {
        Some(importer) => importer,
        None => {
            return FileResult {
                success: false,
                message: format!("不支持的导入格式: {}", path.display()),
            }
        }
    };
    if importer.read(path, doc) {
        FileResult {
            success: true,
            message: "导入成功".to_string(),
        }
    } else {
        FileResult {
            success: false,
            message: importer.error().message().unwrap_or("导入失败").to_string(),
        }
    }
}

/// 按扩展名把剧本文档导出到文件
pub fn export_file(path: impl AsRef<Path>, doc: &Screenplay) -> FileResult {
    let path = path.as_ref();
    let mut exporter = match exporter_for(path) {
        Some(exporter) => exporter,
        None => {
            return FileResult {
                success: false,
                message: format!("不支持的导出格式: {}", path.display()),
            }
        }
    };
    if exporter.write(doc, path) {
        FileResult {
            success: true,
            message: "导出成功".to_string(),
        }
    } else {
        FileResult {
            success: false,
            message: exporter.error().message().unwrap_or("导出失败").to_string(),
        }
    }
}
