use std::fs;
use std::path::Path;

use screenplay_formats::{
    parse, write_fountain, Element, ElementType, EmphasisStyle, ParseOptions, TextFormat,
    WriteOptions,
};

fn read_fixture() -> String {
    let path = Path::new("tests/test_data/morning_light.fountain");
    fs::read_to_string(path).expect("无法读取测试文件")
}

/// 回环比较用的元组
fn tuples(body: &[Element]) -> Vec<(ElementType, String, Option<String>, Vec<String>)> {
    body.iter()
        .map(|e| {
            (
                e.element_type,
                e.text.clone(),
                e.scene_number.clone(),
                e.notes.clone(),
            )
        })
        .collect()
}

#[test]
fn fixture_round_trips_through_writer() {
    let options = ParseOptions::default();
    let original = parse(&read_fixture(), &options);

    // 严格语法保证强制标题等在重新导入时不丢类型
    let text = write_fountain(
        &original.title_page,
        &original.body,
        &WriteOptions {
            strict_syntax: true,
            emphasis: true,
        },
    );
    let reparsed = parse(&text, &options);

    assert_eq!(tuples(&original.body), tuples(&reparsed.body));
    assert_eq!(original.title_page, reparsed.title_page);

    // 格式区间的净覆盖不变
    let original_formats: Vec<&Vec<TextFormat>> =
        original.body.iter().map(|e| &e.formats).collect();
    let reparsed_formats: Vec<&Vec<TextFormat>> =
        reparsed.body.iter().map(|e| &e.formats).collect();
    assert_eq!(original_formats, reparsed_formats);
}

#[test]
fn lowercase_character_round_trips_via_at() {
    let mut character = Element::new(ElementType::Character, "Dr. Smith");
    character.formats = Vec::new();
    let dialogue = Element::new(ElementType::Dialogue, "It's malignant.");
    let body = vec![character, dialogue];

    // StrictSyntax 未开启也必须强制 @
    let text = write_fountain(
        &Default::default(),
        &body,
        &WriteOptions {
            strict_syntax: false,
            emphasis: true,
        },
    );
    assert!(text.starts_with("@Dr. Smith\n"));

    let reparsed = parse(&text, &ParseOptions::default());
    assert_eq!(reparsed.body[0].element_type, ElementType::Character);
    assert_eq!(reparsed.body[0].text, "Dr. Smith");
    assert_eq!(reparsed.body[1].element_type, ElementType::Dialogue);
}

#[test]
fn emphasis_coverage_round_trips() {
    let mut action = Element::new(ElementType::Action, "very nice day");
    action.formats = vec![
        TextFormat::new(0, 9, EmphasisStyle::Underline),
        TextFormat::new(5, 9, EmphasisStyle::Italic),
    ];
    let text = write_fountain(
        &Default::default(),
        &[action.clone()],
        &WriteOptions {
            strict_syntax: false,
            emphasis: true,
        },
    );
    assert_eq!(text, "_very *nice*_ day\n");

    let reparsed = parse(&text, &ParseOptions::default());
    assert_eq!(reparsed.body[0].text, "very nice day");
    let mut expected = action.formats.clone();
    expected.sort_by_key(|f| (f.start, f.end));
    let mut got = reparsed.body[0].formats.clone();
    got.sort_by_key(|f| (f.start, f.end));
    assert_eq!(got, expected);
}

#[test]
fn notes_and_scene_numbers_round_trip() {
    let mut heading = Element::new(ElementType::SceneHeading, "INT. LAB - NIGHT");
    heading.scene_number = Some("12B".to_string());
    heading.notes = vec!["双机位".to_string()];
    let body = vec![heading];

    let text = write_fountain(
        &Default::default(),
        &body,
        &WriteOptions {
            strict_syntax: true,
            emphasis: true,
        },
    );
    let reparsed = parse(&text, &ParseOptions::default());
    assert_eq!(reparsed.body[0].element_type, ElementType::SceneHeading);
    assert_eq!(reparsed.body[0].text, "INT. LAB - NIGHT");
    assert_eq!(reparsed.body[0].scene_number.as_deref(), Some("12B"));
    assert_eq!(reparsed.body[0].notes, vec!["双机位"]);
}

#[test]
fn emphasis_off_discards_formats_but_keeps_text() {
    let mut action = Element::new(ElementType::Action, "italic");
    action.formats = vec![TextFormat::new(0, 6, EmphasisStyle::Italic)];
    let text = write_fountain(&Default::default(), &[action], &WriteOptions::default());
    assert_eq!(text, "italic\n");
}

#[test]
fn written_output_is_stable_under_rewrite() {
    let options = ParseOptions::default();
    let write_options = WriteOptions {
        strict_syntax: true,
        emphasis: true,
    };
    let first_parse = parse(&read_fixture(), &options);
    let first_text = write_fountain(&first_parse.title_page, &first_parse.body, &write_options);
    let second_parse = parse(&first_text, &options);
    let second_text = write_fountain(&second_parse.title_page, &second_parse.body, &write_options);
    assert_eq!(first_text, second_text);
}
