use log::debug;

use crate::error::{ImportError, ImportResult};
use crate::importers::{append_to_current_scene, start_scene};
use crate::io::{ErrorReport, Importer, ProgressReport};
use crate::models::{
    BreakType, ElementType, ParseOptions, Scene, SceneElementType, Screenplay, ScreenplayElement,
};
use crate::parser::FountainParser;
use crate::utils::decode_text;

/// Fountain 导入器
///
/// 解析引擎产出元素流，这里把它物化成场景/剧本结构:
/// 场景标题开新场景，章节变结构断点，概要挂到最近的断点或场景上，
/// 其余元素追加到当前场景。解析本身不会失败，唯一的失败是空输入。
pub struct FountainImporter {
    progress: ProgressReport,
    error: ErrorReport,
    options: ParseOptions,
}

impl Default for FountainImporter {
    fn default() -> Self {
        FountainImporter::new()
    }
}

impl FountainImporter {
    pub fn new() -> Self {
        FountainImporter::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        FountainImporter {
            progress: ProgressReport::new(),
            error: ErrorReport::new(),
            options,
        }
    }
}

impl Importer for FountainImporter {
    fn format_name(&self) -> &'static str {
        "Fountain"
    }

    fn progress(&mut self) -> &mut ProgressReport {
        &mut self.progress
    }

    fn error(&mut self) -> &mut ErrorReport {
        &mut self.error
    }

    fn do_import(&mut self, bytes: &[u8], doc: &mut Screenplay) -> ImportResult<()> {
        let text = decode_text(bytes);
        let parser = FountainParser::with_options(self.options.clone());
        let output = parser.parse(&text);

        if output.body.is_empty() && output.title_page.is_empty() {
            return Err(ImportError::NothingToImport);
        }

        doc.apply_title_page(&output.title_page);
        self.progress
            .set_progress_step(1.0 / (output.body.len() + 1) as f64);

        for element in &output.body {
            self.progress.tick();
            match element.element_type {
                ElementType::SceneHeading => {
                    start_scene(doc, &element.text, element.scene_number.clone());
                }
                ElementType::Section => {
                    doc.add_break(
                        BreakType::from_section_depth(element.section_depth),
                        element.text.clone(),
                    );
                }
                ElementType::Synopsis => {
                    // 概要属于刚开出的断点，否则属于当前场景
                    if let Some(ScreenplayElement::Break { summary, .. }) = doc.trailing_break_mut()
                    {
                        if !summary.is_empty() {
                            summary.push('\n');
                        }
                        summary.push_str(&element.text);
                    } else {
                        if doc.last_scene_mut().is_none() {
                            doc.add_scene(Scene::with_disabled_heading(), None);
                        }
                        if let Some(scene) = doc.last_scene_mut() {
                            scene.append_synopsis(&element.text);
                        }
                    }
                }
                // 分页和硬换行是排版指令，文档模型不保留
                ElementType::PageBreak | ElementType::LineBreak => {}
                other => {
                    if let Some(element_type) = SceneElementType::from_element_type(other) {
                        append_to_current_scene(doc, element_type, &element.text);
                    }
                }
            }
        }

        debug!(
            "Fountain 导入完成: {} 个场景, {} 个段落",
            doc.scene_count(),
            doc.scene_element_count()
        );
        Ok(())
    }
}
