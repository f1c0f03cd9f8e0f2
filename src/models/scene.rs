use serde::{Deserialize, Serialize};

use crate::models::ElementType;
use crate::utils::fountain_constants::HEADER_HINTS;

/// 场景位置类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    Unknown,
    Interior,
    Exterior,
    Both,
}

/// 位置类型与标准写法的映射表，只读常量
pub const LOCATION_TYPE_NAMES: &[(LocationType, &str)] = &[
    (LocationType::Interior, "INT."),
    (LocationType::Exterior, "EXT."),
    (LocationType::Both, "I/E."),
];

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        LOCATION_TYPE_NAMES
            .iter()
            .find(|(t, _)| t == self)
            .map(|(_, s)| *s)
            .unwrap_or("NONE")
    }

    /// 宽容解析: 接受带点和不带点的写法，以及内外景组合的各种拼法。
    /// EST(establishing) 归为外景。
    pub fn parse(text: &str) -> LocationType {
        let t = text.trim().trim_end_matches('.').to_uppercase();
        match t.as_str() {
            "INT" => LocationType::Interior,
            "EXT" | "EST" => LocationType::Exterior,
            "I/E" | "I./E" | "INT/EXT" | "INT./EXT" => LocationType::Both,
            _ => LocationType::Unknown,
        }
    }
}

/// 场景时刻(时间标记)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Moment {
    Unknown,
    Day,
    Night,
    Morning,
    Afternoon,
    Evening,
    Later,
    MomentsLater,
    Continuous,
    TheNextDay,
    Earlier,
    ThePreviousDay,
}

/// 时刻词汇表，顺序即导出时的展示顺序
pub const MOMENT_NAMES: &[(Moment, &str)] = &[
    (Moment::Day, "DAY"),
    (Moment::Night, "NIGHT"),
    (Moment::Morning, "MORNING"),
    (Moment::Afternoon, "AFTERNOON"),
    (Moment::Evening, "EVENING"),
    (Moment::Later, "LATER"),
    (Moment::MomentsLater, "MOMENTS LATER"),
    (Moment::Continuous, "CONTINUOUS"),
    (Moment::TheNextDay, "THE NEXT DAY"),
    (Moment::Earlier, "EARLIER"),
    (Moment::ThePreviousDay, "THE PREVIOUS DAY"),
];

impl Moment {
    pub fn as_str(&self) -> &'static str {
        MOMENT_NAMES
            .iter()
            .find(|(m, _)| m == self)
            .map(|(_, s)| *s)
            .unwrap_or("NONE")
    }

    /// 词汇表之外的时刻一律归为 Unknown
    pub fn parse(text: &str) -> Moment {
        let t = text.trim().to_uppercase();
        MOMENT_NAMES
            .iter()
            .find(|(_, s)| *s == t)
            .map(|(m, _)| *m)
            .unwrap_or(Moment::Unknown)
    }
}

/// 场景标题(slugline)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneHeading {
    /// 禁用的标题不参与导出，用于首个真实标题之前的占位场景
    pub enabled: bool,
    pub location_type: LocationType,
    pub location: String,
    pub moment: Moment,
}

impl Default for SceneHeading {
    fn default() -> Self {
        SceneHeading {
            enabled: true,
            location_type: LocationType::Unknown,
            location: String::new(),
            moment: Moment::Unknown,
        }
    }
}

impl SceneHeading {
    pub fn disabled() -> Self {
        SceneHeading {
            enabled: false,
            ..SceneHeading::default()
        }
    }

    /// 从标题文本拆出 位置类型 / 位置 / 时刻
    ///
    /// 先按已知前缀(INT./EXT. 等)识别位置类型，识别不出时退回到
    /// 第一个 `.` 或空格分隔符。时刻取最后一个 `-` 之后的部分。
    pub fn parse(text: &str) -> SceneHeading {
        let text = text.trim();
        let mut heading = SceneHeading::default();

        let mut rest = text;
        let upper = text.to_uppercase();
        let mut matched_hint = false;
        for hint in HEADER_HINTS {
            if upper.starts_with(hint) {
                let sep = text.chars().nth(hint.chars().count());
                let sep_ok = matches!(sep, None | Some('.') | Some(' ') | Some('\t'));
                if sep_ok {
                    heading.location_type = LocationType::parse(hint);
                    rest = text[hint.len()..]
                        .trim_start_matches(&['.', ' ', '\t'][..])
                        .trim();
                    matched_hint = true;
                    break;
                }
            }
        }

        if !matched_hint {
            // 退回到第一个分隔符: "TYPE LOCATION - MOMENT"
            if let Some(idx) = text.find(&[' ', '.'][..]) {
                let candidate = LocationType::parse(&text[..idx]);
                if candidate != LocationType::Unknown {
                    heading.location_type = candidate;
                    rest = text[idx + 1..].trim();
                }
            }
        }

        match rest.rfind('-') {
            Some(idx) => {
                let moment = Moment::parse(&rest[idx + 1..]);
                if moment != Moment::Unknown {
                    heading.moment = moment;
                    heading.location = rest[..idx].trim().to_string();
                } else {
                    heading.location = rest.to_string();
                }
            }
            None => heading.location = rest.to_string(),
        }

        heading
    }

    /// 标准文本形式，识别不出的部分省略而不是写成 NONE
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if self.location_type != LocationType::Unknown {
            out.push_str(self.location_type.as_str());
            out.push(' ');
        }
        out.push_str(&self.location);
        if self.moment != Moment::Unknown {
            out.push_str(" - ");
            out.push_str(self.moment.as_str());
        }
        out
    }
}

/// 场景内段落的类型，与 Final Draft 的 Paragraph Type 一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneElementType {
    Action,
    Character,
    Dialogue,
    Parenthetical,
    Shot,
    Transition,
    Heading,
}

/// Final Draft 的 Paragraph Type 字符串表
pub const FDX_PARAGRAPH_TYPES: &[(SceneElementType, &str)] = &[
    (SceneElementType::Heading, "Scene Heading"),
    (SceneElementType::Action, "Action"),
    (SceneElementType::Character, "Character"),
    (SceneElementType::Dialogue, "Dialogue"),
    (SceneElementType::Parenthetical, "Parenthetical"),
    (SceneElementType::Shot, "Shot"),
    (SceneElementType::Transition, "Transition"),
];

impl SceneElementType {
    pub fn as_fdx_str(&self) -> &'static str {
        FDX_PARAGRAPH_TYPES
            .iter()
            .find(|(t, _)| t == self)
            .map(|(_, s)| *s)
            .expect("每个类型都在表里")
    }

    /// 识别不出的类型返回 None，由调用方决定跳过
    pub fn from_fdx_str(text: &str) -> Option<SceneElementType> {
        FDX_PARAGRAPH_TYPES
            .iter()
            .find(|(_, s)| *s == text)
            .map(|(t, _)| *t)
    }

    /// 解析器元素类型到场景段落类型的映射。
    /// Lyrics 在文档模型里没有对应段落类型，归为 Action。
    /// 结构性元素(章节、概要、分页)不映射。
    pub fn from_element_type(element_type: ElementType) -> Option<SceneElementType> {
        match element_type {
            ElementType::Action | ElementType::Lyrics | ElementType::Unknown => {
                Some(SceneElementType::Action)
            }
            ElementType::Character => Some(SceneElementType::Character),
            ElementType::Dialogue => Some(SceneElementType::Dialogue),
            ElementType::Parenthetical => Some(SceneElementType::Parenthetical),
            ElementType::Shot => Some(SceneElementType::Shot),
            ElementType::Transition => Some(SceneElementType::Transition),
            ElementType::SceneHeading => Some(SceneElementType::Heading),
            _ => None,
        }
    }

    /// 导出成 Fountain 元素时的反向映射
    pub fn to_element_type(self) -> ElementType {
        match self {
            SceneElementType::Action => ElementType::Action,
            SceneElementType::Character => ElementType::Character,
            SceneElementType::Dialogue => ElementType::Dialogue,
            SceneElementType::Parenthetical => ElementType::Parenthetical,
            SceneElementType::Shot => ElementType::Shot,
            SceneElementType::Transition => ElementType::Transition,
            SceneElementType::Heading => ElementType::SceneHeading,
        }
    }
}

/// 场景内的一个段落
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    pub element_type: SceneElementType,
    pub text: String,
}

impl SceneElement {
    pub fn new(element_type: SceneElementType, text: impl Into<String>) -> Self {
        SceneElement {
            element_type,
            text: text.into(),
        }
    }
}

/// 场景: 标题 + 有序段落列表 + 可选概要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub heading: SceneHeading,
    pub elements: Vec<SceneElement>,
    pub synopsis: Option<String>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    /// 首个真实场景标题之前的内容挂在一个禁用标题的占位场景下
    pub fn with_disabled_heading() -> Self {
        Scene {
            heading: SceneHeading::disabled(),
            ..Scene::default()
        }
    }

    pub fn add_element(&mut self, element: SceneElement) {
        self.elements.push(element);
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// 概要可以由多个 Synopsis 元素累积，换行拼接
    pub fn append_synopsis(&mut self, text: &str) {
        match &mut self.synopsis {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(text);
            }
            None => self.synopsis = Some(text.to_string()),
        }
    }
}
