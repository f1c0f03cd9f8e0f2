pub mod finaldraft;
pub mod fountain;
pub mod html;

pub use finaldraft::FinalDraftImporter;
pub use fountain::FountainImporter;
pub use html::HtmlImporter;

use crate::models::{Scene, SceneElement, SceneElementType, SceneHeading, Screenplay};

/// 用标题文本开启一个新场景
pub(crate) fn start_scene(doc: &mut Screenplay, heading_text: &str, user_scene_number: Option<String>) {
    let mut scene = Scene::new();
    scene.heading = SceneHeading::parse(heading_text);
    doc.add_scene(scene, user_scene_number);
}

/// 往当前场景追加一个段落
///
/// 首个真实标题之前出现内容时，合成一个禁用标题的占位场景接住它。
pub(crate) fn append_to_current_scene(
    doc: &mut Screenplay,
    element_type: SceneElementType,
    text: &str,
) {
    if doc.last_scene_mut().is_none() {
        doc.add_scene(Scene::with_disabled_heading(), None);
    }
    if let Some(scene) = doc.last_scene_mut() {
        scene.add_element(SceneElement::new(element_type, text));
    }
}
