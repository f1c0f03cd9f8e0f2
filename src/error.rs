use thiserror::Error;

/// 导入错误类型
///
/// 三类失败需要区分开: 结构性拒绝(不是这个格式)、标记语法错误(XML/HTML
/// 解析失败)、空内容(是这个格式但没有东西可导入)。调用方据此提示用户
/// 采取不同的修正动作。
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 底层 XML 解析器报告的错误，带行列位置
    #[error("XML 解析错误: {message} (第 {line} 行, 第 {column} 列)")]
    XmlParse {
        message: String,
        line: u32,
        column: u32,
    },

    /// 根元素不是 FinalDraft
    #[error("不是 Final Draft 文件")]
    NotFinalDraft,

    /// DocumentType 不是 Script，或 Version 不在 2~4 之间
    #[error("无法识别的 Final Draft 文件版本: {0}")]
    UnsupportedVersion(i32),

    /// 格式匹配但没有任何段落
    #[error("没有可导入的段落")]
    NoParagraphs,

    /// 完整 HTML 文档里找不到 <body>
    #[error("HTML 中没有 <body> 内容")]
    NoBody,

    /// 输入为空
    #[error("没有可导入的内容")]
    NothingToImport,
}

/// 导入结果
pub type ImportResult<T> = Result<T, ImportError>;

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML 生成错误: {0}")]
    Xml(#[from] xmltree::Error),

    /// 剧本里一个场景都没有
    #[error("剧本中没有可导出的场景")]
    NoScenes,
}

/// 导出结果
pub type ExportResult<T> = Result<T, ExportError>;
