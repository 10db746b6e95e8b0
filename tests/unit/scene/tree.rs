use super::*;
use crate::document::model::DocumentDef;

fn tree(json: &str) -> SceneTree {
    let def: DocumentDef = serde_json::from_str(json).unwrap();
    SceneTree::from_document(&def).unwrap()
}

const DOC: &str = r#"{"version":"1","root":{"kind":"frame","children":[
    {"id":"a","box":[0,0,100,50],"children":[{"id":"a1"},{"id":"a2"}]},
    {"id":"b","kind":"frame","attrs":{"scale":"0.5"}},
    {"id":"ink","kind":{"overlay":{"layer":"draw"}},"strokes":["M0 0 L5 5"]}
]}}"#;

#[test]
fn ids_follow_pre_order() {
    let t = tree(DOC);
    assert_eq!(t.len(), 6);
    assert_eq!(t.find("a"), Some(NodeId(1)));
    assert_eq!(t.find("a2"), Some(NodeId(3)));
    assert_eq!(t.find("b"), Some(NodeId(4)));
    assert_eq!(t.subtree_end(NodeId(1)), 4);
    assert_eq!(t.descendants(NodeId(1)).collect::<Vec<_>>(), vec![NodeId(2), NodeId(3)]);
}

#[test]
fn ancestry_queries() {
    let t = tree(DOC);
    let a = t.require("a").unwrap();
    let a2 = t.require("a2").unwrap();
    let b = t.require("b").unwrap();
    assert!(t.is_ancestor(a, a2));
    assert!(!t.is_ancestor(a2, a));
    assert!(!t.is_ancestor(a, b));
    assert_eq!(t.ancestors(a2).collect::<Vec<_>>(), vec![a, t.root()]);
    assert!(t.require("missing").is_err());
}

#[test]
fn frames_default_to_canvas_size_and_read_scale() {
    let t = tree(DOC);
    let b = t.node(t.require("b").unwrap());
    assert_eq!(b.bounds().width(), 1440.0);
    assert_eq!(b.bounds().height(), 1080.0);
    assert_eq!(b.scale(), 0.5);
    // plain blocks keep their declared size and never scale
    assert_eq!(t.node(t.require("a1").unwrap()).bounds().width(), 0.0);
}

#[test]
fn visibility_follows_ancestors() {
    let mut t = tree(DOC);
    let a = t.require("a").unwrap();
    let a1 = t.require("a1").unwrap();
    assert!(t.is_visible(a1));
    t.state_mut(a).reveal = Reveal::Hidden;
    assert!(!t.is_visible(a1));
    t.state_mut(a).reveal = Reveal::Shown;
    t.state_mut(a1).placement = Placement::OutOfFlow;
    assert!(!t.is_visible(a1));
    t.state_mut(a1).placement = Placement::InFlow;
    t.state_mut(a1).paused = true;
    assert!(!t.is_visible(a1));
}

#[test]
fn strokes_only_land_on_overlays() {
    let mut t = tree(DOC);
    let ink = t.require("ink").unwrap();
    assert_eq!(t.overlays().collect::<Vec<_>>(), vec![ink]);
    assert_eq!(t.node(ink).strokes().len(), 1);

    let stroke = BezPath::from_svg("M1 1 L2 2").unwrap();
    t.push_stroke(ink, stroke.clone()).unwrap();
    assert_eq!(t.node(ink).strokes().len(), 2);
    assert!(t.push_stroke(t.require("a").unwrap(), stroke).is_err());
}
