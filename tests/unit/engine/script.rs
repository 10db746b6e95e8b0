use super::*;
use crate::document::model::DocumentDef;

fn scene() -> SceneTree {
    let def: DocumentDef = serde_json::from_str(
        r#"{"version":"1","root":{"kind":"frame","children":[
            {"id":"run","kind":{"script":{"handler":"go"}}},
            {"id":"a"},
            {"id":"fig","kind":{"figure":{"frames":3}}},
            {"id":"far"}
        ]}}"#,
    )
    .unwrap();
    SceneTree::from_document(&def).unwrap()
}

fn script(t: &SceneTree, handler: &str) -> ScriptRef {
    ScriptRef {
        handler: handler.to_string(),
        node: t.require("run").unwrap(),
    }
}

#[test]
fn handlers_mutate_scoped_nodes_and_queue_camera_work() {
    let mut t = scene();
    let scope = vec![
        t.require("run").unwrap(),
        t.require("a").unwrap(),
        t.require("fig").unwrap(),
    ];
    let mut tasks = TaskQueue::default();
    let mut reg = ScriptRegistry::default();
    reg.register("go", |cx: &mut ScriptCtx<'_>| {
        cx.hide("a")?;
        cx.emphasize("a", true)?;
        cx.set_figure_step("fig", 10)?;
        cx.focus("a")?;
        cx.unfocus();
        assert!(cx.lookup("far").is_err());
        Ok(())
    });
    assert!(reg.contains("go"));
    assert_eq!(reg.len(), 1);

    let s = script(&t, "go");
    let mut cx = ScriptCtx {
        scene: &mut t,
        tasks: &mut tasks,
        frame: FrameId(0),
        scope: &scope,
        step: 1,
        node: s.node,
        delay: 1.0,
    };
    reg.run(&s, &mut cx).unwrap();

    let a = t.state(t.require("a").unwrap());
    assert_eq!(a.reveal, Reveal::Hidden);
    assert!(a.emphasized);
    assert_eq!(t.state(t.require("fig").unwrap()).figure_step, 2);
    assert_eq!(tasks.len(), 2);
}

#[test]
fn failures_name_the_handler() {
    let mut t = scene();
    let scope: Vec<NodeId> = t.descendants(t.root()).collect();
    let mut tasks = TaskQueue::default();
    let mut reg = ScriptRegistry::default();
    reg.register("go", |_: &mut ScriptCtx<'_>| anyhow::bail!("boom"));

    let s = script(&t, "go");
    let mut cx = ScriptCtx {
        scene: &mut t,
        tasks: &mut tasks,
        frame: FrameId(0),
        scope: &scope,
        step: 0,
        node: s.node,
        delay: 1.0,
    };
    let err = reg.run(&s, &mut cx).unwrap_err();
    assert!(matches!(err, SlipwayError::Script { ref handler, .. } if handler == "go"));
}

#[test]
fn unregistered_handlers_are_skipped() {
    let mut t = scene();
    let scope: Vec<NodeId> = t.descendants(t.root()).collect();
    let mut tasks = TaskQueue::default();
    let mut reg = ScriptRegistry::default();
    assert!(reg.is_empty());

    let s = script(&t, "missing");
    let mut cx = ScriptCtx {
        scene: &mut t,
        tasks: &mut tasks,
        frame: FrameId(0),
        scope: &scope,
        step: 0,
        node: s.node,
        delay: 1.0,
    };
    reg.run(&s, &mut cx).unwrap();
    assert!(format!("{reg:?}").contains("ScriptRegistry"));
}
