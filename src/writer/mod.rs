pub mod fountain_writer;

pub use fountain_writer::{encode_emphasis, FountainWriter};
