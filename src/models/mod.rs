pub mod element;
pub mod options;
pub mod scene;
pub mod screenplay;

pub use element::{Element, ElementType, EmphasisStyle, TextFormat, TitlePage, TITLE_PAGE_KEYS};
pub use options::{ParseOptions, WriteOptions};
pub use scene::{
    LocationType, Moment, Scene, SceneElement, SceneElementType, SceneHeading,
    FDX_PARAGRAPH_TYPES, LOCATION_TYPE_NAMES, MOMENT_NAMES,
};
pub use screenplay::{BreakType, Screenplay, ScreenplayElement};
