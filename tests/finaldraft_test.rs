use std::fs;
use std::path::Path;

use screenplay_formats::{
    Exporter, FinalDraftExporter, FinalDraftImporter, FountainImporter, Importer, ImportError,
    Screenplay, ScreenplayElement,
};

fn fountain_fixture_doc() -> Screenplay {
    let script = fs::read_to_string(Path::new("tests/test_data/morning_light.fountain"))
        .expect("无法读取测试文件");
    let mut doc = Screenplay::new();
    let mut importer = FountainImporter::new();
    importer
        .do_import(script.as_bytes(), &mut doc)
        .expect("Fountain 导入应当成功");
    doc
}

fn export_to_xml(doc: &Screenplay) -> String {
    let mut exporter = FinalDraftExporter::new();
    let mut out = Vec::new();
    exporter
        .do_export(doc, &mut out)
        .expect("Final Draft 导出应当成功");
    String::from_utf8(out).expect("导出应当是 UTF-8")
}

#[test]
fn fountain_to_fdx_to_screenplay_keeps_scenes() {
    let doc = fountain_fixture_doc();
    assert_eq!(doc.scene_count(), 4);

    let xml = export_to_xml(&doc);

    let mut reimported = Screenplay::new();
    let mut importer = FinalDraftImporter::new();
    importer
        .do_import(xml.as_bytes(), &mut reimported)
        .expect("Final Draft 导入应当成功");

    // 断点在 FDX 里没有对应物，场景一一对应
    assert_eq!(reimported.scene_count(), doc.scene_count());

    let original: Vec<_> = doc.scenes().collect();
    let back: Vec<_> = reimported.scenes().collect();
    for (a, b) in original.iter().zip(back.iter()) {
        assert_eq!(a.heading.location, b.heading.location);
        assert_eq!(a.heading.location_type, b.heading.location_type);
        assert_eq!(a.heading.moment, b.heading.moment);
        assert_eq!(a.element_count(), b.element_count());
        for (x, y) in a.elements.iter().zip(b.elements.iter()) {
            assert_eq!(x.element_type, y.element_type);
            assert_eq!(x.text, y.text);
        }
    }
}

#[test]
fn character_names_survive_the_round_trip() {
    let doc = fountain_fixture_doc();
    let xml = export_to_xml(&doc);

    let mut reimported = Screenplay::new();
    let mut importer = FinalDraftImporter::new();
    importer
        .do_import(xml.as_bytes(), &mut reimported)
        .expect("Final Draft 导入应当成功");

    assert_eq!(
        reimported.collect_character_names(),
        vec!["JOHN", "JANE", "顾清"]
    );
}

#[test]
fn exporter_always_writes_version_two() {
    let xml = export_to_xml(&fountain_fixture_doc());
    let parsed = roxmltree::Document::parse(&xml).expect("导出应当是合法 XML");
    assert_eq!(parsed.root_element().attribute("Version"), Some("2"));
    assert!(xml.starts_with("<?xml"));
}

#[test]
fn missing_content_creates_zero_scenes() {
    let xml = "<FinalDraft DocumentType=\"Script\" Version=\"2\"></FinalDraft>";
    let mut doc = Screenplay::new();
    let mut importer = FinalDraftImporter::new();
    let err = importer.do_import(xml.as_bytes(), &mut doc).unwrap_err();
    assert!(matches!(err, ImportError::NoParagraphs));
    assert_eq!(doc.scene_count(), 0);
}

#[test]
fn read_reports_errors_through_the_error_channel() {
    let dir = std::env::temp_dir();
    let path = dir.join("screenplay_formats_bad_fdx_test.fdx");
    fs::write(&path, "<NotFinalDraft/>").expect("无法写临时文件");

    let mut doc = Screenplay::new();
    let mut importer = FinalDraftImporter::new();
    let ok = importer.read(&path, &mut doc);
    assert!(!ok);
    assert!(importer.error().has_error());
    assert_eq!(
        importer.error().message(),
        Some(ImportError::NotFinalDraft.to_string().as_str())
    );
    fs::remove_file(&path).ok();
}

#[test]
fn xml_parse_error_carries_position_detail() {
    let dir = std::env::temp_dir();
    let path = dir.join("screenplay_formats_malformed_fdx_test.fdx");
    fs::write(&path, "<FinalDraft\n<oops").expect("无法写临时文件");

    let mut doc = Screenplay::new();
    let mut importer = FinalDraftImporter::new();
    assert!(!importer.read(&path, &mut doc));
    let detail = importer.error().detail().expect("应当有结构化细节");
    assert!(detail.get("line").is_some());
    assert!(detail.get("column").is_some());
    fs::remove_file(&path).ok();
}

#[test]
fn breaks_do_not_reach_the_fdx_content() {
    let doc = fountain_fixture_doc();
    assert!(doc
        .elements
        .iter()
        .any(|e| matches!(e, ScreenplayElement::Break { .. })));
    let xml = export_to_xml(&doc);
    assert!(!xml.contains("Act One"));
}
