use std::io::Write;

use log::debug;

use crate::error::ExportResult;
use crate::io::{ErrorReport, Exporter, ProgressReport};
use crate::models::{Element, ElementType, Screenplay, ScreenplayElement, WriteOptions};
use crate::writer::FountainWriter;

/// Fountain 导出器
///
/// 把文档模型铺平成元素流(断点变章节、概要变 Synopsis、场景标题
/// 还原成 slugline 文本)，写出交给 FountainWriter。
pub struct FountainExporter {
    progress: ProgressReport,
    error: ErrorReport,
    options: WriteOptions,
}

impl Default for FountainExporter {
    fn default() -> Self {
        FountainExporter::new()
    }
}

impl FountainExporter {
    pub fn new() -> Self {
        FountainExporter::with_options(WriteOptions::default())
    }

    pub fn with_options(options: WriteOptions) -> Self {
        FountainExporter {
            progress: ProgressReport::new(),
            error: ErrorReport::new(),
            options,
        }
    }

    /// 文档模型 -> 元素流
    fn flatten(&self, doc: &Screenplay) -> Vec<Element> {
        let mut body = Vec::new();
        for element in &doc.elements {
            match element {
                ScreenplayElement::Break {
                    break_type,
                    subtitle,
                    summary,
                } => {
                    let mut section = Element::new(ElementType::Section, subtitle.clone());
                    section.section_depth = break_type.section_depth();
                    body.push(section);
                    for line in summary.split('\n').filter(|l| !l.is_empty()) {
                        body.push(Element::new(ElementType::Synopsis, line));
                    }
                }
                ScreenplayElement::Scene {
                    scene,
                    user_scene_number,
                } => {
                    if scene.heading.enabled {
                        let mut heading =
                            Element::new(ElementType::SceneHeading, scene.heading.to_text());
                        heading.scene_number = user_scene_number.clone();
                        body.push(heading);
                    }
                    if let Some(synopsis) = &scene.synopsis {
                        for line in synopsis.split('\n').filter(|l| !l.is_empty()) {
                            body.push(Element::new(ElementType::Synopsis, line));
                        }
                    }
                    for scene_element in &scene.elements {
                        body.push(Element::new(
                            scene_element.element_type.to_element_type(),
                            scene_element.text.clone(),
                        ));
                    }
                }
            }
        }
        body
    }
}

impl Exporter for FountainExporter {
    fn format_name(&self) -> &'static str {
        "Fountain"
    }

    fn progress(&mut self) -> &mut ProgressReport {
        &mut self.progress
    }

    fn error(&mut self) -> &mut ErrorReport {
        &mut self.error
    }

    fn do_export(&mut self, doc: &Screenplay, out: &mut dyn Write) -> ExportResult<()> {
        self.progress
            .set_progress_step(1.0 / (doc.element_count() + 1) as f64);

        let title_page = doc.title_page();
        let body = self.flatten(doc);
        for _ in &doc.elements {
            self.progress.tick();
        }

        let writer = FountainWriter::with_options(self.options.clone());
        let text = writer.write(&title_page, &body);
        out.write_all(text.as_bytes())?;

        debug!("Fountain 导出完成: {} 个元素", body.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BreakType, Scene, SceneElement, SceneElementType, SceneHeading};

    fn sample_doc() -> Screenplay {
        let mut doc = Screenplay::new();
        doc.title = "Big Fish".to_string();
        doc.add_break(BreakType::Act, "Act One");
        let mut scene = Scene::new();
        scene.heading = SceneHeading::parse("INT. RIVER - DAY");
        scene.add_element(SceneElement::new(SceneElementType::Character, "EDWARD"));
        scene.add_element(SceneElement::new(SceneElementType::Dialogue, "The water."));
        doc.add_scene(scene, Some("1".to_string()));
        doc
    }

    #[test]
    fn exports_breaks_headings_and_speech() {
        let mut exporter = FountainExporter::new();
        let mut out = Vec::new();
        exporter
            .do_export(&sample_doc(), &mut out)
            .expect("导出应当成功");
        let text = String::from_utf8(out).expect("输出应当是 UTF-8");
        assert_eq!(
            text,
            "Title: Big Fish\n\n# Act One\n\nINT. RIVER - DAY #1#\n\nEDWARD\nThe water.\n"
        );
    }

    #[test]
    fn disabled_heading_is_not_written() {
        let mut doc = Screenplay::new();
        let mut scene = Scene::with_disabled_heading();
        scene.add_element(SceneElement::new(SceneElementType::Action, "Dark."));
        doc.add_scene(scene, None);

        let mut exporter = FountainExporter::new();
        let mut out = Vec::new();
        exporter.do_export(&doc, &mut out).expect("导出应当成功");
        assert_eq!(String::from_utf8_lossy(&out), "Dark.\n");
    }
}
