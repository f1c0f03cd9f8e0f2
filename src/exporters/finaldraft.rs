use std::io::Write;

use log::debug;
use xmltree::{Element as XmlElement, EmitterConfig, XMLNode};

use crate::error::{ExportError, ExportResult};
use crate::io::{ErrorReport, Exporter, ProgressReport};
use crate::models::{Screenplay, ScreenplayElement, MOMENT_NAMES};

/// SmartType 的场景引导词表
const SCENE_INTROS: &[&str] = &["INT", "EXT", "I/E"];

/// Final Draft (FDX) 导出器
///
/// 每个启用的场景标题和每个场景段落各写一个 Paragraph，随后是
/// Watermarking 和 SmartType 元数据块(角色名、时刻词表、场景引导词)。
/// 结构断点在 FDX 里没有对应物，跳过。始终写 Version="2"。
pub struct FinalDraftExporter {
    progress: ProgressReport,
    error: ErrorReport,
}

impl Default for FinalDraftExporter {
    fn default() -> Self {
        FinalDraftExporter::new()
    }
}

impl FinalDraftExporter {
    pub fn new() -> Self {
        FinalDraftExporter {
            progress: ProgressReport::new(),
            error: ErrorReport::new(),
        }
    }
}

fn child<'a>(parent: &'a mut XmlElement, name: &str) -> &'a mut XmlElement {
    parent.children.push(XMLNode::Element(XmlElement::new(name)));
    match parent.children.last_mut() {
        Some(XMLNode::Element(e)) => e,
        _ => unreachable!("刚刚推入的就是元素"),
    }
}

fn set_attr(element: &mut XmlElement, name: &str, value: &str) {
    element.attributes.insert(name.to_string(), value.to_string());
}

fn add_text_paragraph(content: &mut XmlElement, ptype: &str, text: &str) {
    let paragraph = child(content, "Paragraph");
    set_attr(paragraph, "Type", ptype);
    let text_element = child(paragraph, "Text");
    text_element.children.push(XMLNode::Text(text.to_string()));
}

fn add_text_child(parent: &mut XmlElement, name: &str, text: &str) {
    let element = child(parent, name);
    element.children.push(XMLNode::Text(text.to_string()));
}

impl Exporter for FinalDraftExporter {
    fn format_name(&self) -> &'static str {
        "Final Draft"
    }

    fn progress(&mut self) -> &mut ProgressReport {
        &mut self.progress
    }

    fn error(&mut self) -> &mut ErrorReport {
        &mut self.error
    }

    fn do_export(&mut self, doc: &Screenplay, out: &mut dyn Write) -> ExportResult<()> {
        if doc.scene_count() == 0 {
            return Err(ExportError::NoScenes);
        }

        self.progress
            .set_progress_step(1.0 / (doc.element_count() + 1) as f64);

        let mut root = XmlElement::new("FinalDraft");
        set_attr(&mut root, "DocumentType", "Script");
        set_attr(&mut root, "Template", "No");
        set_attr(&mut root, "Version", "2");

        let mut locations: Vec<String> = Vec::new();
        {
            let content = child(&mut root, "Content");
            for element in &doc.elements {
                self.progress.tick();
                let (scene, _) = match element {
                    ScreenplayElement::Scene {
                        scene,
                        user_scene_number,
                    } => (scene, user_scene_number),
                    ScreenplayElement::Break { .. } => continue,
                };

                if scene.heading.enabled {
                    add_text_paragraph(content, "Scene Heading", &scene.heading.to_text());
                    locations.push(scene.heading.location.clone());
                }
                for scene_element in &scene.elements {
                    add_text_paragraph(
                        content,
                        scene_element.element_type.as_fdx_str(),
                        &scene_element.text,
                    );
                }
            }
        }

        let watermarking = child(&mut root, "Watermarking");
        set_attr(watermarking, "Text", "screenplay-formats");

        let smart_type = child(&mut root, "SmartType");

        let characters = child(smart_type, "Characters");
        for name in doc.collect_character_names() {
            add_text_child(characters, "Character", &name);
        }

        let times_of_day = child(smart_type, "TimesOfDay");
        set_attr(times_of_day, "Separator", " - ");
        for (_, name) in MOMENT_NAMES {
            add_text_child(times_of_day, "TimeOfDay", name);
        }

        let scene_intros = child(smart_type, "SceneIntros");
        set_attr(scene_intros, "Separator", ". ");
        for intro in SCENE_INTROS {
            add_text_child(scene_intros, "SceneIntro", intro);
        }

        locations.sort();
        locations.dedup();
        debug!(
            "Final Draft 导出完成: {} 个场景, {} 个地点",
            doc.scene_count(),
            locations.len()
        );

        let config = EmitterConfig::new()
            .perform_indent(true)
            .indent_string("    ")
            .write_document_declaration(true);
        root.write_with_config(out, config)?;
        Ok(())
    }
}
