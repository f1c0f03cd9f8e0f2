use unicode_segmentation::UnicodeSegmentation;

use crate::models::{Element, ElementType, EmphasisStyle, TextFormat, TitlePage, WriteOptions};
use crate::utils::{ends_with_to, is_character_cue, looks_like_scene_heading};

/// Fountain 格式写出器
///
/// 解析器的逆向: 对同一份 Body，写出的文本再解析回来时每个元素的
/// (类型, 文本, 场景编号, 注解) 保持不变。格式区间只保证净覆盖不变。
/// 写出器只读不改，一次 write 调用产出完整文本。
pub struct FountainWriter {
    options: WriteOptions,
}

impl Default for FountainWriter {
    fn default() -> Self {
        FountainWriter::new()
    }
}

impl FountainWriter {
    pub fn new() -> Self {
        FountainWriter::with_options(WriteOptions::default())
    }

    pub fn with_options(options: WriteOptions) -> Self {
        FountainWriter { options }
    }

    /// 写出标题页和正文
    pub fn write(&self, title_page: &TitlePage, body: &[Element]) -> String {
        let mut out = String::new();

        if !title_page.is_empty() {
            for (key, value) in &title_page.entries {
                let mut lines = value.split('\n');
                let first = lines.next().unwrap_or("");
                out.push_str(key);
                out.push(':');
                if !first.is_empty() {
                    out.push(' ');
                    out.push_str(first);
                }
                out.push('\n');
                for cont in lines {
                    // 续行缩进，重新导入时归并回同一个条目
                    out.push_str("    ");
                    out.push_str(cont);
                    out.push('\n');
                }
            }
            out.push('\n');
        }

        for (i, el) in body.iter().enumerate() {
            out.push_str(&self.render_element(el));
            out.push('\n');
            if let Some(next) = body.get(i + 1) {
                // 对话块内部不空行，其余元素之间空一行
                if !same_speech_block(el.element_type, next.element_type) {
                    out.push('\n');
                }
            }
        }

        out
    }

    fn render_element(&self, el: &Element) -> String {
        let text = if self.options.emphasis {
            encode_emphasis(&el.text, &el.formats)
        } else {
            el.text.clone()
        };

        let mut line = match el.element_type {
            ElementType::SceneHeading => {
                let mut t = text;
                if self.options.strict_syntax && !looks_like_scene_heading(el.text.trim()) {
                    // 本地化或非常规标题靠 . 强制重新识别
                    t.insert(0, '.');
                }
                if let Some(number) = &el.scene_number {
                    t.push_str(&format!(" #{}#", number));
                }
                t
            }
            ElementType::Character => {
                if is_character_cue(&el.text) {
                    text
                } else {
                    // 名字里有小写字母时必须用 @ 强制，否则重新导入会丢类型
                    format!("@{}", text)
                }
            }
            ElementType::Parenthetical => {
                if el.text.starts_with('(') && el.text.ends_with(')') {
                    text
                } else {
                    format!("({})", text)
                }
            }
            ElementType::Action => {
                if el.is_centered {
                    text.split('\n')
                        .map(|l| format!("> {} <", l))
                        .collect::<Vec<_>>()
                        .join("\n")
                } else {
                    text
                }
            }
            ElementType::Lyrics => text
                .split('\n')
                .map(|l| format!("~{}", l))
                .collect::<Vec<_>>()
                .join("\n"),
            ElementType::Shot => {
                if self.options.strict_syntax {
                    format!("!{}", text)
                } else {
                    text
                }
            }
            ElementType::Transition => {
                let reparses = is_character_cue(&el.text) && ends_with_to(&el.text);
                if self.options.strict_syntax && !reparses {
                    format!("> {}", text)
                } else {
                    text
                }
            }
            ElementType::Section => {
                format!("{} {}", "#".repeat(el.section_depth.max(1)), text)
            }
            ElementType::Synopsis => format!("= {}", text),
            ElementType::PageBreak => "===".to_string(),
            ElementType::LineBreak => "  ".to_string(),
            ElementType::Dialogue | ElementType::Unknown => text,
        };

        for note in &el.notes {
            line.push_str(&format!(" [[{}]]", note));
        }
        line
    }
}

/// 对话块内部的元素对，之间不写空行
fn same_speech_block(cur: ElementType, next: ElementType) -> bool {
    use ElementType::*;
    matches!(
        (cur, next),
        (Character, Dialogue)
            | (Character, Parenthetical)
            | (Character, Lyrics)
            | (Parenthetical, Dialogue)
            | (Parenthetical, Parenthetical)
            | (Parenthetical, Lyrics)
            | (Dialogue, Dialogue)
            | (Dialogue, Parenthetical)
            | (Dialogue, Lyrics)
            | (Lyrics, Dialogue)
            | (Lyrics, Parenthetical)
            | (Lyrics, Lyrics)
    )
}

/// 把格式区间重新编码成强调标记
///
/// 同区间的 Bold+Italic 合并为 ***。插入顺序保证嵌套关系在重新解析时
/// 不变: 同一位置先闭合里层(起点靠后的)，先打开外层(终点靠后的)。
pub fn encode_emphasis(text: &str, formats: &[TextFormat]) -> String {
    if formats.is_empty() {
        return text.to_string();
    }
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    let n = graphemes.len();

    let mut spans: Vec<(usize, usize, &'static str)> = Vec::new();
    let mut used = vec![false; formats.len()];
    for i in 0..formats.len() {
        if used[i] {
            continue;
        }
        let f = formats[i];
        let (start, end) = (f.start.min(n), f.end.min(n));
        if start >= end {
            used[i] = true;
            continue;
        }
        let find_twin = |style: EmphasisStyle, used: &[bool]| {
            (i + 1..formats.len()).find(|&j| {
                !used[j]
                    && formats[j].style == style
                    && formats[j].start == f.start
                    && formats[j].end == f.end
            })
        };
        let marker = match f.style {
            EmphasisStyle::Bold => match find_twin(EmphasisStyle::Italic, &used) {
                Some(j) => {
                    used[j] = true;
                    "***"
                }
                None => "**",
            },
            EmphasisStyle::Italic => match find_twin(EmphasisStyle::Bold, &used) {
                Some(j) => {
                    used[j] = true;
                    "***"
                }
                None => "*",
            },
            EmphasisStyle::Underline => "_",
        };
        used[i] = true;
        spans.push((start, end, marker));
    }

    let mut out = String::new();
    for p in 0..=n {
        let mut closes: Vec<&(usize, usize, &'static str)> =
            spans.iter().filter(|s| s.1 == p).collect();
        closes.sort_by(|a, b| b.0.cmp(&a.0));
        for s in closes {
            out.push_str(s.2);
        }
        let mut opens: Vec<&(usize, usize, &'static str)> =
            spans.iter().filter(|s| s.0 == p).collect();
        opens.sort_by(|a, b| b.1.cmp(&a.1));
        for s in opens {
            out.push_str(s.2);
        }
        if p < n {
            out.push_str(graphemes[p]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextFormat;

    fn el(t: ElementType, text: &str) -> Element {
        Element::new(t, text)
    }

    #[test]
    fn speech_block_has_no_interior_blank_lines() {
        let writer = FountainWriter::new();
        let body = vec![
            el(ElementType::SceneHeading, "INT. ROOM - DAY"),
            el(ElementType::Character, "JOHN"),
            el(ElementType::Parenthetical, "(low)"),
            el(ElementType::Dialogue, "Hello."),
            el(ElementType::Action, "He exits."),
        ];
        let out = writer.write(&TitlePage::new(), &body);
        assert_eq!(
            out,
            "INT. ROOM - DAY\n\nJOHN\n(low)\nHello.\n\nHe exits.\n"
        );
    }

    #[test]
    fn lowercase_character_gets_at_prefix() {
        let writer = FountainWriter::new();
        let body = vec![
            el(ElementType::Character, "Dr. Smith"),
            el(ElementType::Dialogue, "It's malignant."),
        ];
        let out = writer.write(&TitlePage::new(), &body);
        assert_eq!(out, "@Dr. Smith\nIt's malignant.\n");
    }

    #[test]
    fn strict_syntax_forces_heading_and_transition() {
        let writer = FountainWriter::with_options(WriteOptions {
            strict_syntax: true,
            emphasis: false,
        });
        let mut heading = el(ElementType::SceneHeading, "厨房 - 白天");
        heading.scene_number = Some("7".to_string());
        let body = vec![heading, el(ElementType::Transition, "FADE TO BLACK")];
        let out = writer.write(&TitlePage::new(), &body);
        assert_eq!(out, ".厨房 - 白天 #7#\n\n> FADE TO BLACK\n");
    }

    #[test]
    fn standard_heading_is_not_forced() {
        let writer = FountainWriter::with_options(WriteOptions {
            strict_syntax: true,
            emphasis: false,
        });
        let body = vec![el(ElementType::SceneHeading, "INT. KITCHEN - DAY")];
        let out = writer.write(&TitlePage::new(), &body);
        assert_eq!(out, "INT. KITCHEN - DAY\n");
    }

    #[test]
    fn centered_action_and_lyrics_markers() {
        let writer = FountainWriter::new();
        let mut centered = el(ElementType::Action, "THE END");
        centered.is_centered = true;
        let body = vec![centered, el(ElementType::Lyrics, "la la\nla di da")];
        let out = writer.write(&TitlePage::new(), &body);
        assert_eq!(out, "> THE END <\n\n~la la\n~la di da\n");
    }

    #[test]
    fn sections_synopsis_and_page_break() {
        let writer = FountainWriter::new();
        let mut section = el(ElementType::Section, "Act Two");
        section.section_depth = 2;
        let body = vec![
            section,
            el(ElementType::Synopsis, "Things get worse."),
            el(ElementType::PageBreak, ""),
        ];
        let out = writer.write(&TitlePage::new(), &body);
        assert_eq!(out, "## Act Two\n\n= Things get worse.\n\n===\n");
    }

    #[test]
    fn notes_are_appended_in_brackets() {
        let writer = FountainWriter::new();
        let mut action = el(ElementType::Action, "He exits.");
        action.notes = vec!["check timing".to_string()];
        let out = writer.write(&TitlePage::new(), &[action]);
        assert_eq!(out, "He exits. [[check timing]]\n");
    }

    #[test]
    fn title_page_with_continuation_value() {
        let writer = FountainWriter::new();
        let mut tp = TitlePage::new();
        tp.push("Title", "Big Fish");
        tp.push("Contact", "John August\njohn@example.com");
        let out = writer.write(&tp, &[]);
        assert_eq!(
            out,
            "Title: Big Fish\nContact: John August\n    john@example.com\n\n"
        );
    }

    #[test]
    fn emphasis_encoding_merges_bold_italic() {
        let formats = vec![
            TextFormat::new(0, 3, EmphasisStyle::Bold),
            TextFormat::new(0, 3, EmphasisStyle::Italic),
        ];
        assert_eq!(encode_emphasis("wow", &formats), "***wow***");
    }

    #[test]
    fn emphasis_encoding_nested_spans() {
        // 外层下划线包着里层斜体
        let formats = vec![
            TextFormat::new(0, 9, EmphasisStyle::Underline),
            TextFormat::new(5, 9, EmphasisStyle::Italic),
        ];
        assert_eq!(encode_emphasis("very nice", &formats), "_very *nice*_");
    }

    #[test]
    fn emphasis_dropped_when_option_off() {
        let writer = FountainWriter::new();
        let mut action = el(ElementType::Action, "italic");
        action.formats = vec![TextFormat::new(0, 6, EmphasisStyle::Italic)];
        let out = writer.write(&TitlePage::new(), &[action]);
        assert_eq!(out, "italic\n");
    }

    #[test]
    fn emphasis_written_when_option_on() {
        let writer = FountainWriter::with_options(WriteOptions {
            strict_syntax: false,
            emphasis: true,
        });
        let mut action = el(ElementType::Action, "italic");
        action.formats = vec![TextFormat::new(0, 6, EmphasisStyle::Italic)];
        let out = writer.write(&TitlePage::new(), &[action]);
        assert_eq!(out, "*italic*\n");
    }
}
