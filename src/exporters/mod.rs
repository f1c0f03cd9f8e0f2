pub mod finaldraft;
pub mod fountain;

pub use finaldraft::FinalDraftExporter;
pub use fountain::FountainExporter;
