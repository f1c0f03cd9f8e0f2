use serde::{Deserialize, Serialize};

/// 剧本元素类型
///
/// 解析器输出的统一类型词汇表。Fountain 解析、Final Draft 导入和 HTML
/// 导入都映射到这一套类型上。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Unknown,
    SceneHeading,
    Action,
    Character,
    Dialogue,
    Parenthetical,
    Lyrics,
    Shot,
    Transition,
    PageBreak,
    LineBreak,
    Section,
    Synopsis,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Unknown => "unknown",
            ElementType::SceneHeading => "scene_heading",
            ElementType::Action => "action",
            ElementType::Character => "character",
            ElementType::Dialogue => "dialogue",
            ElementType::Parenthetical => "parenthetical",
            ElementType::Lyrics => "lyrics",
            ElementType::Shot => "shot",
            ElementType::Transition => "transition",
            ElementType::PageBreak => "page_break",
            ElementType::LineBreak => "line_break",
            ElementType::Section => "section",
            ElementType::Synopsis => "synopsis",
        }
    }
}

/// 强调样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmphasisStyle {
    Italic,
    Bold,
    Underline,
}

/// 强调区间，半开区间 [start, end)，以字素簇为单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFormat {
    pub start: usize,
    pub end: usize,
    pub style: EmphasisStyle,
}

impl TextFormat {
    pub fn new(start: usize, end: usize, style: EmphasisStyle) -> Self {
        TextFormat { start, end, style }
    }
}

/// 剧本元素
///
/// 解析完成后 text 不再包含任何原始标记: 强调标记转成 formats，
/// 居中标记转成 is_centered，[[...]] 注解转成 notes，场景编号转成
/// scene_number。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// 元素类型
    pub element_type: ElementType,
    /// 清理后的显示文本
    pub text: String,
    /// 是否为 >...< 居中文本
    pub is_centered: bool,
    /// 场景标题行尾 #...# 捕获的场景编号
    pub scene_number: Option<String>,
    /// 章节嵌套深度，1 为最外层
    pub section_depth: usize,
    /// 从本行提取出的 [[...]] 注解
    pub notes: Vec<String>,
    /// 强调区间列表
    pub formats: Vec<TextFormat>,
}

impl Element {
    pub fn new(element_type: ElementType, text: impl Into<String>) -> Self {
        Element {
            element_type,
            text: text.into(),
            is_centered: false,
            scene_number: None,
            section_depth: 0,
            notes: Vec::new(),
            formats: Vec::new(),
        }
    }
}

impl Default for Element {
    fn default() -> Self {
        Element::new(ElementType::Unknown, "")
    }
}

/// 标题页已知关键字词汇表
///
/// 匹配时忽略大小写。未知关键字也会被保留，不会丢弃。
pub const TITLE_PAGE_KEYS: &[&str] = &[
    "title",
    "subtitle",
    "credit",
    "author",
    "authors",
    "source",
    "contact",
    "notes",
    "copyright",
    "date",
    "draft date",
    "revision",
    "version",
];

/// 标题页，有序的 (关键字, 值) 列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitlePage {
    pub entries: Vec<(String, String)>,
}

impl TitlePage {
    pub fn new() -> Self {
        TitlePage::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// 按关键字查值，忽略大小写
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// 是否为已知词汇表中的关键字
    pub fn is_known_key(key: &str) -> bool {
        TITLE_PAGE_KEYS
            .iter()
            .any(|k| k.eq_ignore_ascii_case(key.trim()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
