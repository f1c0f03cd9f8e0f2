pub mod fountain_parser;

pub use fountain_parser::{resolve_emphasis, rule_names, FountainParser, ParseOutput};
