use super::*;

fn parse(json: &str) -> DocumentDef {
    serde_json::from_str(json).unwrap()
}

#[test]
fn minimal_document_is_valid() {
    let d = parse(r#"{"version":"1","root":{"kind":"frame"}}"#);
    validate_document(&d).unwrap();
}

#[test]
fn root_must_be_a_frame() {
    let d = parse(r#"{"version":"1","root":{"kind":"block"}}"#);
    let err = validate_document(&d).unwrap_err();
    assert!(err.to_string().contains("$.root.kind: root node must be a frame"));
}

#[test]
fn duplicate_ids_are_reported_with_path() {
    let d = parse(
        r#"{"version":"1","root":{"kind":"frame","children":[
            {"id":"a"},
            {"id":"a"}
        ]}}"#,
    );
    let err = validate_document(&d).unwrap_err();
    assert_eq!(err.errors.len(), 1);
    assert!(err.to_string().contains("$.root.children[1]: duplicate node id 'a'"));
}

#[test]
fn collects_every_problem() {
    let d = parse(
        r#"{"version":"0","canvas":{"width":0,"height":10},"root":{"kind":"frame","children":[
            {"kind":{"figure":{"frames":0}}},
            {"attrs":{"pause":"","step":"2"}},
            {"attrs":{"scale":"-1"}},
            {"strokes":["M0 0 L1 1"]}
        ]}}"#,
    );
    let err = validate_document(&d).unwrap_err();
    assert_eq!(err.errors.len(), 6);
}

#[test]
fn overlay_strokes_must_parse() {
    let d = parse(
        r#"{"version":"1","root":{"kind":"frame","children":[
            {"kind":{"overlay":{"layer":"draw"}},"strokes":["M0 0 L10 10","not a path ("]}
        ]}}"#,
    );
    let err = validate_document(&d).unwrap_err();
    assert!(err.to_string().contains("strokes[1]"));
}

#[test]
fn step_values_and_counts_are_bounded() {
    let d = parse(
        r#"{"version":"1","root":{"kind":"frame","children":[
            {"attrs":{"mk-visible-at":"1 4000000000"}},
            {"attrs":{"chg-visib-at":"-10001"}},
            {"attrs":{"pause":"4000000000"}},
            {"attrs":{"step":"10000","mk-hidden-at":"-10000 10000"}}
        ]}}"#,
    );
    let err = validate_document(&d).unwrap_err();
    assert_eq!(err.errors.len(), 3);
    let msg = err.to_string();
    assert!(msg.contains("$.root.children[0]: mk-visible-at steps must lie within +/-10000"));
    assert!(msg.contains("$.root.children[1]: chg-visib-at"));
    assert!(msg.contains("$.root.children[2]: pause count must be <= 10000"));
}
