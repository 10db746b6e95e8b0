use super::*;

#[test]
fn box_accepts_array_and_object_forms() {
    let a: BoxDef = serde_json::from_str("[10, 20, 300, 400]").unwrap();
    let b: BoxDef = serde_json::from_str(r#"{"x":10,"y":20,"w":300,"h":400}"#).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.h, 400.0);
}

#[test]
fn node_defaults_to_block_without_attrs() {
    let n: NodeDef = serde_json::from_str("{}").unwrap();
    assert_eq!(n.kind, NodeKindDef::Block);
    assert!(n.attrs.is_empty());
    assert!(n.children.is_empty());
    assert_eq!(n.bounds, BoxDef::default());
}

#[test]
fn kind_variants_are_snake_case() {
    let n: NodeDef = serde_json::from_str(r#"{"kind":"frame"}"#).unwrap();
    assert_eq!(n.kind, NodeKindDef::Frame);

    let n: NodeDef =
        serde_json::from_str(r#"{"kind":{"script":{"handler":"intro"}}}"#).unwrap();
    assert_eq!(
        n.kind,
        NodeKindDef::Script {
            handler: "intro".to_string()
        }
    );

    let n: NodeDef =
        serde_json::from_str(r#"{"kind":{"overlay":{"layer":"highlight"}}}"#).unwrap();
    assert_eq!(
        n.kind,
        NodeKindDef::Overlay {
            layer: OverlayLayerDef::Highlight
        }
    );
}

#[test]
fn canvas_defaults_when_missing() {
    let d: DocumentDef =
        serde_json::from_str(r#"{"version":"1","root":{"kind":"frame"}}"#).unwrap();
    assert_eq!((d.canvas.width, d.canvas.height), (1440, 1080));
}
