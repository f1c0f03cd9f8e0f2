use serde::{Deserialize, Serialize};

/// Fountain 解析选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOptions {
    /// 逐行去除行首空白
    pub ignore_leading_whitespace: bool,
    /// 逐行去除行尾空白。关闭时，仅含两个以上空白字符的行会产生
    /// 一个显式的 LineBreak 元素
    pub ignore_trailing_whitespace: bool,
    /// 把相邻的同类型元素(中间无空行)合并成一个元素
    pub join_adjacent_elements: bool,
    /// 把 *斜体*/**粗体**/_下划线_ 标记解析成格式区间并从文本中移除
    pub resolve_emphasis: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            ignore_leading_whitespace: true,
            ignore_trailing_whitespace: true,
            join_adjacent_elements: true,
            resolve_emphasis: true,
        }
    }
}

/// Fountain 写出选项
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteOptions {
    /// 为重新导入时会被误判的元素加上强制标记
    /// (场景标题加 `.`，转场加 `>`，镜头加 `!`)
    pub strict_syntax: bool,
    /// 把格式区间重新编码成强调标记。关闭时格式区间被丢弃
    pub emphasis: bool,
}
