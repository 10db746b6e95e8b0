use super::*;

#[test]
fn canvas_rejects_empty_dims() {
    assert!(Canvas::new(0, 1080).is_err());
    assert!(Canvas::new(1440, 0).is_err());
    assert!(Canvas::new(1440, 1080).is_ok());
}

#[test]
fn default_canvas_is_4_by_3() {
    let c = Canvas::default();
    assert_eq!((c.width, c.height), (1440, 1080));
    assert_eq!(c.rect(), Rect::new(0.0, 0.0, 1440.0, 1080.0));
}

#[test]
fn ids_order_by_index() {
    assert!(NodeId(1) < NodeId(2));
    assert_eq!(FrameId(3).index(), 3);
}
