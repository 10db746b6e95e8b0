use super::*;

#[test]
fn linked_ports_cross_over() {
    let (mut presenter, mut audience) = LinkedPort::pair();
    presenter.on_step_committed(&StepPath(vec![2, 1]));
    assert_eq!(presenter.take_goto(), None);
    assert_eq!(audience.pending(), 1);
    assert_eq!(audience.take_goto().as_deref(), Some("2,1"));
    assert_eq!(audience.take_goto(), None);

    audience.on_step_committed(&StepPath(vec![0]));
    assert_eq!(presenter.take_goto().as_deref(), Some("0"));
}

#[test]
fn inject_feeds_own_inbox() {
    let (mut a, b) = LinkedPort::pair();
    a.inject("3");
    assert_eq!(b.pending(), 0);
    assert_eq!(a.take_goto().as_deref(), Some("3"));
}

#[test]
fn memory_deep_link_clones_share_slot() {
    let link = MemoryDeepLink::new();
    let mut handle = link.clone();
    assert_eq!(link.read(), None);
    handle.write("1,2");
    assert_eq!(link.get().as_deref(), Some("1,2"));
    assert_eq!(
        MemoryDeepLink::with_fragment("4").read().as_deref(),
        Some("4")
    );
}
