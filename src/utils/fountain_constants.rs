use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

/// 场景标题前缀提示词，长的在前，避免 INT 抢先匹配掉 INT./EXT
pub const HEADER_HINTS: &[&str] = &["INT./EXT", "INT/EXT", "I/E", "EST", "INT", "EXT"];

lazy_static! {
    /// 行级语法正则
    pub static ref LINE_REGEX: HashMap<&'static str, Regex> = {
        let mut map = HashMap::new();
        // 章节: # 后至少一个空白
        map.insert("section", Regex::new(r"^(#+)\s+(.*)$").unwrap());
        // 分页: 整行 3 个以上 =
        map.insert("page_break", Regex::new(r"^={3,}$").unwrap());
        // 概要: 单个 = 前缀
        map.insert("synopsis", Regex::new(r"^=\s?(.*)$").unwrap());
        // 硬换行: 只有空白且至少两个字符
        map.insert("line_break", Regex::new(r"^\s{2,}$").unwrap());
        // 歌词
        map.insert("lyric", Regex::new(r"^~\s?(.*)$").unwrap());
        // 强制动作
        map.insert("action_force", Regex::new(r"^!(.*)$").unwrap());
        // 强制角色
        map.insert("character_force", Regex::new(r"^@\s*(.*)$").unwrap());
        // 居中文本 >...<
        map.insert("centered", Regex::new(r"^>\s*(.*?)\s*<$").unwrap());
        // 强制转场 >...
        map.insert("transition_force", Regex::new(r"^>\s*(.*)$").unwrap());
        // 行尾场景编号 #...#
        map.insert("scene_number", Regex::new(r"\s*#([^#\r\n]*)#\s*$").unwrap());
        // 标题页条目 Key: Value
        map.insert("title_page_entry", Regex::new(r"^([^:\r\n]+):\s*(.*)$").unwrap());
        // 行内注解 [[...]]
        map.insert("note_inline", Regex::new(r"\[\[([^\[\]]*)\]\]").unwrap());
        // 角色名后的扩展部分与双对话标记
        map.insert(
            "character_extension",
            Regex::new(r"[ \t]*(\(.*\)|（.*）)?[ \t]*(\^)?\s*$").unwrap(),
        );
        map
    };
}
