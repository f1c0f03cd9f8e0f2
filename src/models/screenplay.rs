use serde::{Deserialize, Serialize};

use crate::models::{Scene, SceneElementType, TitlePage};
use crate::utils::strip_character_decorations;

/// 结构性断点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakType {
    Act,
    Chapter,
    Interval,
}

impl BreakType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakType::Act => "Act",
            BreakType::Chapter => "Chapter",
            BreakType::Interval => "Interval",
        }
    }

    /// Fountain 章节深度到断点类型的映射
    pub fn from_section_depth(depth: usize) -> BreakType {
        match depth {
            0 | 1 => BreakType::Act,
            2 => BreakType::Chapter,
            _ => BreakType::Interval,
        }
    }

    pub fn section_depth(&self) -> usize {
        match self {
            BreakType::Act => 1,
            BreakType::Chapter => 2,
            BreakType::Interval => 3,
        }
    }
}

/// 剧本序列中的一项: 场景，或结构性断点(幕/章)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScreenplayElement {
    Scene {
        scene: Scene,
        /// 用户指定的场景编号(Fountain 的 #...# 标记)
        user_scene_number: Option<String>,
    },
    Break {
        break_type: BreakType,
        subtitle: String,
        summary: String,
    },
}

/// 剧本: 标题页元数据 + 场景/断点的有序序列
///
/// 这是场景顺序的权威表示。导入器向它追加场景，导出器只读遍历。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Screenplay {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub contact: String,
    pub version: String,
    /// 标题页里词汇表之外的条目，按出现顺序保留
    pub extra_title_entries: Vec<(String, String)>,
    pub elements: Vec<ScreenplayElement>,
}

impl Screenplay {
    pub fn new() -> Self {
        Screenplay::default()
    }

    /// 导入前由调用方清空目标文档
    pub fn reset(&mut self) {
        *self = Screenplay::default();
    }

    pub fn add_scene(&mut self, scene: Scene, user_scene_number: Option<String>) {
        self.elements.push(ScreenplayElement::Scene {
            scene,
            user_scene_number,
        });
    }

    pub fn add_break(&mut self, break_type: BreakType, subtitle: impl Into<String>) {
        self.elements.push(ScreenplayElement::Break {
            break_type,
            subtitle: subtitle.into(),
            summary: String::new(),
        });
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn scene_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, ScreenplayElement::Scene { .. }))
            .count()
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.elements.iter().filter_map(|e| match e {
            ScreenplayElement::Scene { scene, .. } => Some(scene),
            _ => None,
        })
    }

    /// 当前场景 = 序列中最后一个场景(断点不打断场景内容的归属)
    pub fn last_scene_mut(&mut self) -> Option<&mut Scene> {
        self.elements.iter_mut().rev().find_map(|e| match e {
            ScreenplayElement::Scene { scene, .. } => Some(scene),
            _ => None,
        })
    }

    /// 仅当序列末尾是断点时返回它，用于把概要挂到刚创建的断点上
    pub fn trailing_break_mut(&mut self) -> Option<&mut ScreenplayElement> {
        match self.elements.last_mut() {
            Some(e @ ScreenplayElement::Break { .. }) => Some(e),
            _ => None,
        }
    }

    /// 场景段落总数，进度展示用
    pub fn scene_element_count(&self) -> usize {
        self.scenes().map(|s| s.element_count()).sum()
    }

    /// 去重收集全部角色名，保持首次出现顺序。
    /// 角色名去掉 @ 强制符、(V.O.) 之类的扩展和双对话 ^ 标记。
    pub fn collect_character_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for scene in self.scenes() {
            for element in &scene.elements {
                if element.element_type != SceneElementType::Character {
                    continue;
                }
                let name = strip_character_decorations(&element.text);
                if name.is_empty() {
                    continue;
                }
                if !names.iter().any(|n| n == &name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// 由标题页条目填充元数据。
    /// "Title (Subtitle)" 形式拆成主副标题，词汇表之外的条目原样保留。
    pub fn apply_title_page(&mut self, title_page: &TitlePage) {
        for (key, value) in &title_page.entries {
            let value = value.trim();
            match key.trim().to_lowercase().as_str() {
                "title" => {
                    if let (Some(open), Some(close)) = (value.find('('), value.rfind(')')) {
                        if open < close {
                            self.title = value[..open].trim().to_string();
                            self.subtitle = value[open + 1..close].trim().to_string();
                            continue;
                        }
                    }
                    self.title = value.to_string();
                }
                "subtitle" => self.subtitle = value.to_string(),
                "author" | "authors" => self.author = value.to_string(),
                "contact" => self.contact = value.to_string(),
                "version" => self.version = value.to_string(),
                _ => self
                    .extra_title_entries
                    .push((key.clone(), value.to_string())),
            }
        }
    }

    /// 元数据还原成标题页，空字段跳过
    pub fn title_page(&self) -> TitlePage {
        let mut tp = TitlePage::new();
        for (key, value) in [
            ("Title", &self.title),
            ("Subtitle", &self.subtitle),
            ("Author", &self.author),
            ("Contact", &self.contact),
            ("Version", &self.version),
        ] {
            if !value.is_empty() {
                tp.push(key, value.clone());
            }
        }
        for (key, value) in &self.extra_title_entries {
            tp.push(key.clone(), value.clone());
        }
        tp
    }
}
