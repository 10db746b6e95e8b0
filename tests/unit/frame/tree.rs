use super::*;
use crate::document::model::DocumentDef;

fn build(json: &str) -> (SceneTree, FrameTree) {
    let def: DocumentDef = serde_json::from_str(json).unwrap();
    let mut scene = SceneTree::from_document(&def).unwrap();
    let frames = FrameTree::build(&mut scene).unwrap();
    (scene, frames)
}

const DOC: &str = r#"{"version":"1","root":{"kind":"frame","children":[
    {"id":"intro","kind":"frame","attrs":{"enter-at":"1","toc-title":"Intro"},"children":[
        {"id":"inner","attrs":{"mk-hidden-at":"1"}}
    ]},
    {"id":"lost","kind":"frame"},
    {"id":"s1","attrs":{"step":"2"}},
    {"id":"imm","attrs":{"immediate-enter":""}},
    {"id":"auto","attrs":{"auto-enter":""},"children":[
        {"id":"in-auto","attrs":{"mk-visible-at":"1"}}
    ]},
    {"id":"p","attrs":{"pause":"","enter-at-unpause":"target"}},
    {"id":"target","kind":"frame"},
    {"id":"hid","attrs":{"chg-visib-at":"3"}},
    {"id":"st","attrs":{"static-at":"3"}},
    {"id":"ink","kind":{"overlay":{"layer":"draw"}}}
]}}"#;

fn frame_of<'a>(scene: &SceneTree, frames: &'a FrameTree, key: &str) -> &'a Frame {
    let id = frames.by_anchor(scene.require(key).unwrap()).unwrap();
    frames.frame(id)
}

#[test]
fn children_come_from_enter_at_and_pause_flow() {
    let (scene, frames) = build(DOC);
    assert_eq!(frames.len(), 5);
    let root = frames.frame(frames.root());
    let ids = |key: &str| frames.by_anchor(scene.require(key).unwrap()).unwrap();
    assert_eq!(
        root.children(),
        vec![
            (1, ids("intro")),
            (2, ids("imm")),
            (4, ids("auto")),
            (5, ids("target")),
        ]
    );
    assert_eq!(frames.by_anchor(scene.require("lost").unwrap()), None);
    assert_eq!(root.max_step(), 5);
}

#[test]
fn kinds_titles_and_parents() {
    let (scene, frames) = build(DOC);
    let root = frames.frame(frames.root());
    assert_eq!(root.title(), "Presentation");
    assert_eq!(root.parent(), None);

    let intro = frame_of(&scene, &frames, "intro");
    assert_eq!(intro.title(), "Intro");
    assert_eq!(intro.kind(), FrameKind::Slip);
    assert_eq!(intro.parent(), Some(frames.root()));

    assert_eq!(frame_of(&scene, &frames, "imm").kind(), FrameKind::Inline);
    assert_eq!(frame_of(&scene, &frames, "imm").title(), "imm");
    assert_eq!(frame_of(&scene, &frames, "target").kind(), FrameKind::Slip);
}

#[test]
fn scopes_stop_at_nested_frames() {
    let (scene, frames) = build(DOC);
    let root = frames.frame(frames.root());
    let key = |n: &NodeId| scene.node(*n).key().unwrap_or("").to_owned();
    let keys: Vec<String> = root.scope.iter().map(key).collect();
    assert_eq!(
        keys,
        vec!["intro", "lost", "s1", "imm", "auto", "p", "target", "hid", "st", "ink"]
    );
    let auto = frame_of(&scene, &frames, "auto");
    let keys: Vec<String> = auto.scope.iter().map(key).collect();
    assert_eq!(keys, vec!["in-auto"]);
}

#[test]
fn initial_state_is_primed_and_snapshotted() {
    let (scene, frames) = build(DOC);
    let hid = scene.require("hid").unwrap();
    let st = scene.require("st").unwrap();
    assert_eq!(scene.state(hid).reveal, Reveal::Hidden);
    assert_eq!(scene.state(st).placement, Placement::OutOfFlow);

    // everything after the unreleased pause is held back
    assert!(scene.state(scene.require("target").unwrap()).paused);
    assert!(!scene.state(scene.require("p").unwrap()).paused);
    assert!(!scene.state(scene.require("imm").unwrap()).paused);

    let root = frames.frame(frames.root());
    assert_eq!(root.snapshot.len(), root.scope.len() - 1);
    assert!(
        root.snapshot
            .iter()
            .all(|(n, _)| *n != scene.require("ink").unwrap())
    );
}

#[test]
fn refresh_all_resets_descendants() {
    let (mut scene, mut frames) = build(DOC);
    let intro = frames.by_anchor(scene.require("intro").unwrap()).unwrap();
    let inner = scene.require("inner").unwrap();
    frames.frame_mut(intro).step_index = 1;
    scene.state_mut(inner).reveal = Reveal::Hidden;
    frames.frame_mut(frames.root()).step_index = 1;

    frames.refresh_all(frames.root(), &mut scene);
    assert!(frames.frame(intro).is_pristine());
    assert!(frames.frame(frames.root()).is_pristine());
    assert_eq!(scene.state(inner).reveal, Reveal::Default);
}

#[test]
fn refresh_targets_the_live_child() {
    let (mut scene, mut frames) = build(DOC);
    let root = frames.root();
    let intro = frames.by_anchor(scene.require("intro").unwrap()).unwrap();
    frames.frame_mut(root).step_index = 1;
    frames.frame_mut(intro).step_index = 0;

    frames.refresh(root, &mut scene);
    assert_eq!(frames.frame(root).step_index(), 1);
    assert!(frames.frame(intro).is_pristine());
}

#[test]
fn root_must_be_a_frame() {
    let def: DocumentDef =
        serde_json::from_str(r#"{"version":"1","root":{"kind":"block"}}"#).unwrap();
    let mut scene = SceneTree::from_document(&def).unwrap();
    assert!(FrameTree::build(&mut scene).is_err());
}

#[test]
fn a_node_cannot_be_entered_twice() {
    let def: DocumentDef = serde_json::from_str(
        r#"{"version":"1","root":{"kind":"frame","children":[
            {"attrs":{"step":"","enter-at-unpause":"f"}},
            {"id":"f","kind":"frame","attrs":{"enter-at":"3"}}
        ]}}"#,
    )
    .unwrap();
    let mut scene = SceneTree::from_document(&def).unwrap();
    let err = FrameTree::build(&mut scene).unwrap_err();
    assert!(err.to_string().contains("more than once"));
}
