use screenplay_formats::{
    HtmlImporter, Importer, ImportError, LocationType, Moment, SceneElementType, Screenplay,
};

fn import(html: &str) -> Result<Screenplay, ImportError> {
    let mut doc = Screenplay::new();
    let mut importer = HtmlImporter::new();
    importer.do_import(html.as_bytes(), &mut doc)?;
    Ok(doc)
}

#[test]
fn full_document_heading_and_action() {
    let doc = import(
        "<html><head><title>x</title></head><body>\
         <p class=\"heading\">INT. OFFICE - NIGHT</p>\
         <p class=\"action\">He sits.</p>\
         </body></html>",
    )
    .expect("导入应当成功");

    assert_eq!(doc.scene_count(), 1);
    let scene = doc.scenes().next().unwrap();
    assert!(scene.heading.enabled);
    assert_eq!(scene.heading.location_type, LocationType::Interior);
    assert_eq!(scene.heading.location, "OFFICE");
    assert_eq!(scene.heading.moment, Moment::Night);
    assert_eq!(scene.element_count(), 1);
    assert_eq!(scene.elements[0].element_type, SceneElementType::Action);
    assert_eq!(scene.elements[0].text, "He sits.");
}

#[test]
fn producer_dialect_is_normalized() {
    // dialogue class 改名 + <br> 清理 + 空白折叠
    let doc = import(
        "<body>\
         <p class=\"heading\">INT. A - DAY</p>\
         <p class=\"character\">JOHN</p>\
         <p class=\"dialogue\">I was<br> thinking\r\n about it.</p>\
         </body>",
    )
    .expect("导入应当成功");

    let scene = doc.scenes().next().unwrap();
    assert_eq!(scene.elements[1].element_type, SceneElementType::Dialogue);
    assert_eq!(scene.elements[1].text, "I was thinking about it.");
}

#[test]
fn content_before_heading_synthesizes_disabled_heading() {
    let doc = import(
        "<body>\
         <p class=\"action\">Dark screen.</p>\
         <p class=\"heading\">INT. A - DAY</p>\
         <p class=\"action\">Lights up.</p>\
         </body>",
    )
    .expect("导入应当成功");

    assert_eq!(doc.scene_count(), 2);
    let scenes: Vec<_> = doc.scenes().collect();
    assert!(!scenes[0].heading.enabled);
    assert_eq!(scenes[0].elements[0].text, "Dark screen.");
    assert!(scenes[1].heading.enabled);
}

#[test]
fn full_document_without_body_is_structural_rejection() {
    let err = import("<html><head></head></html>").unwrap_err();
    assert!(matches!(err, ImportError::NoBody));
}

#[test]
fn zero_paragraphs_is_empty_content_error() {
    let err = import("<body><h1>标题</h1><div>正文</div></body>").unwrap_err();
    assert!(matches!(err, ImportError::NoParagraphs));
}

#[test]
fn all_mapped_classes_import() {
    let doc = import(
        "<body>\
         <p class=\"heading\">INT. A - DAY</p>\
         <p class=\"action\">a</p>\
         <p class=\"character\">B</p>\
         <p class=\"dialog\">c</p>\
         <p class=\"parenthetical\">(d)</p>\
         <p class=\"shot\">E</p>\
         <p class=\"transition\">CUT TO:</p>\
         </body>",
    )
    .expect("导入应当成功");

    let scene = doc.scenes().next().unwrap();
    let types: Vec<SceneElementType> = scene.elements.iter().map(|e| e.element_type).collect();
    assert_eq!(
        types,
        vec![
            SceneElementType::Action,
            SceneElementType::Character,
            SceneElementType::Dialogue,
            SceneElementType::Parenthetical,
            SceneElementType::Shot,
            SceneElementType::Transition,
        ]
    );
}
