pub mod fountain_constants;

use std::borrow::Cow;

pub use fountain_constants::{HEADER_HINTS, LINE_REGEX};

/// 字节流解码成文本
///
/// 按约定输入是 UTF-8(BOM 探测由更外层的调用方完成)，这里只负责
/// 宽容解码并去掉残留的 BOM。
pub fn decode_text(bytes: &[u8]) -> String {
    let text: Cow<str> = String::from_utf8_lossy(bytes);
    text.trim_start_matches('\u{feff}').to_string()
}

/// 角色提示行判定: 不含任何小写字母
///
/// 只检查字母，数字和标点不影响判定，
/// 因此中文等无大小写之分的文字整行都算"全大写"。短的全大写动作行
/// 会被误判成角色，这是有意保留的已知行为。
pub fn is_character_cue(text: &str) -> bool {
    let mut has_content = false;
    for ch in text.chars() {
        if ch.is_alphabetic() && ch.is_lowercase() {
            return false;
        }
        if !ch.is_whitespace() {
            has_content = true;
        }
    }
    has_content
}

/// 行是否以 TO: 结尾(忽略大小写)，转场判定用
pub fn ends_with_to(text: &str) -> bool {
    let t = text.trim_end();
    if t.len() < 3 || !t.is_char_boundary(t.len() - 3) {
        return false;
    }
    t[t.len() - 3..].eq_ignore_ascii_case("TO:")
}

/// 场景标题判定: 全大写且以 INT/EXT 等提示词开头，后跟 . 或空白
pub fn looks_like_scene_heading(text: &str) -> bool {
    if !is_character_cue(text) {
        return false;
    }
    let upper = text.to_uppercase();
    for hint in HEADER_HINTS {
        if upper.starts_with(hint) {
            match text.chars().nth(hint.chars().count()) {
                Some('.') | Some(' ') | Some('\t') => return true,
                _ => continue,
            }
        }
    }
    false
}

/// 去掉角色名上的修饰: @ 强制符、(V.O.) 扩展、双对话 ^ 标记
pub fn strip_character_decorations(text: &str) -> String {
    let t = text.trim().trim_start_matches('@').trim_start();
    LINE_REGEX["character_extension"].replace(t, "").trim().to_string()
}

/// 把所有空白(含 CR/LF)折叠成单个空格
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
