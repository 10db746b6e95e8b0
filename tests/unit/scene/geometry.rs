use super::*;
use crate::document::model::DocumentDef;

fn tree(json: &str) -> SceneTree {
    let def: DocumentDef = serde_json::from_str(json).unwrap();
    SceneTree::from_document(&def).unwrap()
}

const DOC: &str = r#"{"version":"1","root":{"kind":"frame","children":[
    {"id":"half","kind":"frame","box":[1440,0,0,0],"attrs":{"scale":"0.5"},"children":[
        {"id":"para","box":[100,540,400,216]}
    ]},
    {"id":"pic","box":[360,270,720,540]}
]}}"#;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn root_frame_is_home() {
    let t = tree(DOC);
    assert_eq!(t.frame_position(t.root(), 0.0), CameraTarget::HOME);
}

#[test]
fn scaled_frame_position() {
    let t = tree(DOC);
    let half = t.require("half").unwrap();
    assert!(close(t.accumulated_scale(half), 0.5));
    let r = t.universe_rect(half);
    assert_eq!(r, Rect::new(1440.0, 0.0, 2160.0, 540.0));

    let p = t.frame_position(half, 15.0);
    assert!(close(p.x, 1800.0 / 1440.0));
    assert!(close(p.y, 0.25));
    assert!(close(p.scale, 0.5));
    assert_eq!(p.rotation, 15.0);
}

#[test]
fn local_rects_undo_frame_scale() {
    let t = tree(DOC);
    let half = t.require("half").unwrap();
    let para = t.require("para").unwrap();
    assert_eq!(t.universe_rect(para), Rect::new(1490.0, 270.0, 1690.0, 378.0));
    let local = t.rect_in(half, para);
    assert!(close(local.y0, 540.0));
    assert!(close(local.height(), 216.0));
}

#[test]
fn element_framing_fits_the_larger_side() {
    let t = tree(DOC);
    let pic = t.element_framing(t.require("pic").unwrap()).unwrap();
    assert!(close(pic.x, 0.5));
    assert!(close(pic.y, 0.5));
    assert!(close(pic.scale, 0.5));

    let empty = tree(r#"{"version":"1","root":{"kind":"frame","children":[{"id":"dot"}]}}"#);
    assert!(empty.element_framing(empty.require("dot").unwrap()).is_err());
}

#[test]
fn sub_moves_shift_vertically_only() {
    let t = tree(DOC);
    let half = t.require("half").unwrap();
    let para = t.require("para").unwrap();
    let base = t.frame_position(half, 0.0);

    let up = t.sub_move(base, half, para, SubMove::Up, 0.0125);
    assert!(close(up.y, 0.25 + (0.5 - 0.0125) * 0.5));
    assert_eq!((up.x, up.scale), (base.x, base.scale));

    let down = t.sub_move(base, half, para, SubMove::Down, 0.0125);
    assert!(close(down.y, 0.25 + (0.7 - 1.0 + 0.0125) * 0.5));

    let center = t.sub_move(base, half, para, SubMove::Center, 0.0125);
    assert!(close(center.y, 0.25 + (0.6 - 0.5) * 0.5));
}
