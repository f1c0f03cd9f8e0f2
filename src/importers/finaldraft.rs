use log::{debug, warn};

use crate::error::{ImportError, ImportResult};
use crate::importers::{append_to_current_scene, start_scene};
use crate::io::{ErrorReport, Importer, ProgressReport};
use crate::models::{SceneElementType, Screenplay};
use crate::utils::decode_text;

/// Final Draft (FDX) 导入器
///
/// 按文档顺序遍历 FinalDraft/Content/Paragraph，Type 属性经固定
/// 字符串表映射成段落类型。Scene Heading 开新场景，其余段落追加到
/// 当前场景。识别不出的 Type 和空文本逐段跳过，不中断整次导入。
pub struct FinalDraftImporter {
    progress: ProgressReport,
    error: ErrorReport,
}

impl Default for FinalDraftImporter {
    fn default() -> Self {
        FinalDraftImporter::new()
    }
}

impl FinalDraftImporter {
    pub fn new() -> Self {
        FinalDraftImporter {
            progress: ProgressReport::new(),
            error: ErrorReport::new(),
        }
    }
}

impl Importer for FinalDraftImporter {
    fn format_name(&self) -> &'static str {
        "Final Draft"
    }

    fn progress(&mut self) -> &mut ProgressReport {
        &mut self.progress
    }

    fn error(&mut self) -> &mut ErrorReport {
        &mut self.error
    }

    fn do_import(&mut self, bytes: &[u8], doc: &mut Screenplay) -> ImportResult<()> {
        let text = decode_text(bytes);

        let xml = roxmltree::Document::parse(&text).map_err(|e| {
            let pos = e.pos();
            ImportError::XmlParse {
                message: e.to_string(),
                line: pos.row,
                column: pos.col,
            }
        })?;

        let root = xml.root_element();
        if root.tag_name().name() != "FinalDraft" {
            return Err(ImportError::NotFinalDraft);
        }

        let version = root
            .attribute("Version")
            .and_then(|v| v.trim().parse::<i32>().ok())
            .unwrap_or(0);
        if root.attribute("DocumentType") != Some("Script") || !(2..=4).contains(&version) {
            return Err(ImportError::UnsupportedVersion(version));
        }

        let paragraphs: Vec<roxmltree::Node<'_, '_>> = root
            .children()
            .find(|n| n.has_tag_name("Content"))
            .map(|content| {
                content
                    .children()
                    .filter(|n| n.has_tag_name("Paragraph"))
                    .collect()
            })
            .unwrap_or_default();
        if paragraphs.is_empty() {
            return Err(ImportError::NoParagraphs);
        }

        self.progress
            .set_progress_step(1.0 / (paragraphs.len() + 1) as f64);

        for paragraph in paragraphs {
            self.progress.tick();

            let type_attr = paragraph.attribute("Type").unwrap_or("");
            let element_type = match SceneElementType::from_fdx_str(type_attr) {
                Some(t) => t,
                None => {
                    warn!("跳过未识别的段落类型: {:?}", type_attr);
                    continue;
                }
            };

            let text: String = paragraph
                .children()
                .find(|n| n.has_tag_name("Text"))
                .map(|t| {
                    t.descendants()
                        .filter(|n| n.is_text())
                        .filter_map(|n| n.text())
                        .collect()
                })
                .unwrap_or_default();
            if text.is_empty() {
                continue;
            }

            match element_type {
                SceneElementType::Heading => start_scene(doc, &text, None),
                other => append_to_current_scene(doc, other, &text),
            }
        }

        debug!(
            "Final Draft 导入完成: {} 个场景, {} 个段落",
            doc.scene_count(),
            doc.scene_element_count()
        );
        Ok(())
    }
}
