pub mod api;
pub mod error;
pub mod exporters;
pub mod importers;
pub mod io;
pub mod models;
pub mod parser;
pub mod utils;
pub mod writer;

pub use models::{
    BreakType, Element, ElementType, EmphasisStyle, LocationType, Moment, ParseOptions, Scene,
    SceneElement, SceneElementType, SceneHeading, Screenplay, ScreenplayElement, TextFormat,
    TitlePage, WriteOptions,
};

pub use error::{ExportError, ExportResult, ImportError, ImportResult};

pub use parser::{FountainParser, ParseOutput};

pub use writer::FountainWriter;

pub use importers::{FinalDraftImporter, FountainImporter, HtmlImporter};

pub use exporters::{FinalDraftExporter, FountainExporter};

pub use io::{ErrorReport, Exporter, Importer, ProgressReport};

pub use api::{export_file, import_file, parse_fountain, parse_fountain_to_json, write_fountain};

/// 解析 Fountain 格式文本
///
/// # Arguments
///
/// * `script` - Fountain 格式的剧本文本
/// * `options` - 解析选项
///
/// # Returns
///
/// 标题页和正文元素序列
pub fn parse(script: &str, options: &ParseOptions) -> ParseOutput {
    let parser = FountainParser::with_options(options.clone());
    parser.parse(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let options = ParseOptions::default();
        let result = parse("INT. ROOM - DAY\n\nHello, world!", &options);
        assert!(!result.body.is_empty());
    }
}
