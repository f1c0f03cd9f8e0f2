use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{ImportError, ImportResult};
use crate::importers::{append_to_current_scene, start_scene};
use crate::io::{ErrorReport, Importer, ProgressReport};
use crate::models::{SceneElementType, Screenplay};
use crate::utils::{decode_text, normalize_whitespace};

/// 段落 class 到类型的固定映射表
const PARAGRAPH_CLASSES: &[(&str, SceneElementType)] = &[
    ("heading", SceneElementType::Heading),
    ("action", SceneElementType::Action),
    ("character", SceneElementType::Character),
    ("dialog", SceneElementType::Dialogue),
    ("parenthetical", SceneElementType::Parenthetical),
    ("shot", SceneElementType::Shot),
    ("transition", SceneElementType::Transition),
];

lazy_static! {
    static ref BR_TAG: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
    static ref BODY_OPEN: Regex = Regex::new(r"(?i)<body[^>]*>").unwrap();
    static ref BODY_CLOSE: Regex = Regex::new(r"(?i)</body>").unwrap();
    static ref HTML_OPEN: Regex = Regex::new(r"(?i)<html[\s>]").unwrap();
}

/// HTML 导入器
///
/// 处理 <p class="..."> 形式的简化 HTML。先做已知生产方的方言修正
/// (定位 <body>、去掉散落的 <br>、把 dialogue class 改名成 dialog)，
/// 再按 class 映射到段落类型，消费方式与 Final Draft 导入一致。
pub struct HtmlImporter {
    progress: ProgressReport,
    error: ErrorReport,
}

impl Default for HtmlImporter {
    fn default() -> Self {
        HtmlImporter::new()
    }
}

impl HtmlImporter {
    pub fn new() -> Self {
        HtmlImporter {
            progress: ProgressReport::new(),
            error: ErrorReport::new(),
        }
    }

    /// 方言修正
    ///
    /// 完整文档(<html>)必须有 <body>，否则结构性拒绝；
    /// 片段输入整体当作正文接受。
    fn preprocess(&self, text: &str) -> ImportResult<String> {
        let body = match BODY_OPEN.find(text) {
            Some(open) => {
                let after = &text[open.end()..];
                match BODY_CLOSE.find(after) {
                    Some(close) => &after[..close.start()],
                    None => after,
                }
            }
            None => {
                if HTML_OPEN.is_match(text) {
                    return Err(ImportError::NoBody);
                }
                text
            }
        };
        let stripped = BR_TAG.replace_all(body, "");
        // 某些导出方言写 dialogue，统一成映射表里的 dialog
        Ok(stripped.replace("class=\"dialogue\"", "class=\"dialog\""))
    }
}

impl Importer for HtmlImporter {
    fn format_name(&self) -> &'static str {
        "HTML"
    }

    fn progress(&mut self) -> &mut ProgressReport {
        &mut self.progress
    }

    fn error(&mut self) -> &mut ErrorReport {
        &mut self.error
    }

    fn do_import(&mut self, bytes: &[u8], doc: &mut Screenplay) -> ImportResult<()> {
        let text = decode_text(bytes);
        let fragment = self.preprocess(&text)?;

        let html = Html::parse_fragment(&fragment);
        let selector = Selector::parse("p").expect("选择器是字面量");

        // (类型, 规整后的文本)
        let mut paragraphs: Vec<(SceneElementType, String)> = Vec::new();
        for p in html.select(&selector) {
            let class_attr = p.attr("class").unwrap_or("");
            let class = class_attr
                .split_whitespace()
                .next()
                .unwrap_or("")
                .to_lowercase();
            let element_type = PARAGRAPH_CLASSES
                .iter()
                .find(|(name, _)| *name == class)
                .map(|(_, t)| *t);
            let element_type = match element_type {
                Some(t) => t,
                None => {
                    warn!("跳过未识别的段落 class: {:?}", class_attr);
                    continue;
                }
            };
            let text = normalize_whitespace(&p.text().collect::<String>());
            if text.is_empty() {
                continue;
            }
            paragraphs.push((element_type, text));
        }

        if paragraphs.is_empty() {
            return Err(ImportError::NoParagraphs);
        }

        self.progress
            .set_progress_step(1.0 / (paragraphs.len() + 1) as f64);
        for (element_type, text) in paragraphs {
            self.progress.tick();
            match element_type {
                SceneElementType::Heading => start_scene(doc, &text, None),
                other => append_to_current_scene(doc, other, &text),
            }
        }

        debug!(
            "HTML 导入完成: {} 个场景, {} 个段落",
            doc.scene_count(),
            doc.scene_element_count()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocationType;

    fn import(html: &str) -> ImportResult<Screenplay> {
        let mut doc = Screenplay::new();
        let mut importer = HtmlImporter::new();
        importer.do_import(html.as_bytes(), &mut doc)?;
        Ok(doc)
    }

    #[test]
    fn heading_and_action_paragraphs() {
        let doc = import(
            "<body><p class=\"heading\">INT. OFFICE - NIGHT</p>\
             <p class=\"action\">He sits.</p></body>",
        )
        .expect("导入应当成功");
        assert_eq!(doc.scene_count(), 1);
        let scene = doc.scenes().next().unwrap();
        assert!(scene.heading.enabled);
        assert_eq!(scene.heading.location_type, LocationType::Interior);
        assert_eq!(scene.elements[0].text, "He sits.");
    }

    #[test]
    fn dialogue_class_is_renamed_to_dialog() {
        let doc = import(
            "<body><p class=\"heading\">INT. A - DAY</p>\
             <p class=\"character\">JOHN</p>\
             <p class=\"dialogue\">Hi.</p></body>",
        )
        .expect("导入应当成功");
        let scene = doc.scenes().next().unwrap();
        assert_eq!(scene.elements[1].element_type, SceneElementType::Dialogue);
    }

    #[test]
    fn br_tags_are_stripped_and_whitespace_normalized() {
        let doc = import(
            "<body><p class=\"action\">He \r\n walks<br> away.</p></body>",
        )
        .expect("导入应当成功");
        let scene = doc.scenes().next().unwrap();
        assert_eq!(scene.elements[0].text, "He walks away.");
        // 标题之前的内容挂在禁用标题的占位场景下
        assert!(!scene.heading.enabled);
    }

    #[test]
    fn unknown_classes_are_skipped() {
        let doc = import(
            "<body><p class=\"heading\">INT. A - DAY</p>\
             <p class=\"pagenumber\">12</p>\
             <p class=\"action\">x</p></body>",
        )
        .expect("导入应当成功");
        assert_eq!(doc.scenes().next().unwrap().element_count(), 1);
    }

    #[test]
    fn zero_paragraphs_is_an_error() {
        let err = import("<body><div>nothing here</div></body>").unwrap_err();
        assert!(matches!(err, ImportError::NoParagraphs));
    }

    #[test]
    fn full_document_without_body_is_rejected() {
        let err = import("<html><head><title>x</title></head></html>").unwrap_err();
        assert!(matches!(err, ImportError::NoBody));
    }

    #[test]
    fn fragment_without_body_is_accepted() {
        let doc = import("<p class=\"action\">Fragment.</p>").expect("片段输入应当被接受");
        assert_eq!(doc.scene_count(), 1);
    }
}
