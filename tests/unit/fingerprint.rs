use super::*;
use crate::document::model::DocumentDef;

fn build() -> (SceneTree, FrameTree) {
    let def: DocumentDef = serde_json::from_str(
        r#"{"version":"1","root":{"kind":"frame","children":[
            {"id":"a","attrs":{"mk-hidden-at":"1"}},
            {"id":"p","attrs":{"pause":"2"}}
        ]}}"#,
    )
    .unwrap();
    let mut scene = SceneTree::from_document(&def).unwrap();
    let frames = FrameTree::build(&mut scene).unwrap();
    (scene, frames)
}

#[test]
fn equal_states_hash_alike() {
    let (scene, frames) = build();
    let stack = NavigationStack::new(frames.root());
    let a = fingerprint_state(&scene, &frames, &stack);
    let b = fingerprint_state(&scene, &frames, &stack);
    assert_eq!(a, b);
    assert_eq!(a.to_string().len(), 32);
}

#[test]
fn node_and_pause_changes_are_seen() {
    let (mut scene, mut frames) = build();
    let stack = NavigationStack::new(frames.root());
    let base = fingerprint_state(&scene, &frames, &stack);

    let a = scene.require("a").unwrap();
    scene.state_mut(a).reveal = Reveal::Hidden;
    let hidden = fingerprint_state(&scene, &frames, &stack);
    assert_ne!(base, hidden);

    let root = frames.root();
    frames.frame_mut(root).markers[0].advance();
    assert_ne!(hidden, fingerprint_state(&scene, &frames, &stack));
}
