use super::*;
use crate::document::model::DocumentDef;
use crate::engine::script::{ScriptCtx, ScriptRegistry};
use crate::engine::tasks::TaskQueue;
use crate::frame::effect::ScriptRef;
use crate::frame::tree::FrameTree;
use crate::scene::tree::Reveal;

struct Rig {
    scene: SceneTree,
    frames: FrameTree,
    tasks: TaskQueue,
    scripts: ScriptRegistry,
}

impl Rig {
    fn new(json: &str) -> Self {
        let def: DocumentDef = serde_json::from_str(json).unwrap();
        let mut scene = SceneTree::from_document(&def).unwrap();
        let frames = FrameTree::build(&mut scene).unwrap();
        Self {
            scene,
            frames,
            tasks: TaskQueue::default(),
            scripts: ScriptRegistry::default(),
        }
    }

    fn root(&mut self) -> (&mut Frame, StepCx<'_>) {
        let id = self.frames.root();
        let cx = StepCx {
            scene: &mut self.scene,
            tasks: &mut self.tasks,
            scripts: &mut self.scripts,
            effect_delay: 1.0,
            focus_delay: 1.0,
        };
        (self.frames.frame_mut(id), cx)
    }

    fn next(&mut self) -> SlipwayResult<StepOutcome> {
        let (f, mut cx) = self.root();
        f.next(&mut cx)
    }

    fn previous(&mut self) -> Rewind {
        let (f, mut cx) = self.root();
        f.previous(&mut cx).unwrap()
    }

    fn step(&self) -> i64 {
        self.frames.frame(self.frames.root()).step_index()
    }

    fn states(&self) -> Vec<NodeState> {
        (0..self.scene.len() as u32)
            .map(|i| self.scene.state(NodeId(i)))
            .collect()
    }

    fn state(&self, key: &str) -> NodeState {
        self.scene.state(self.scene.require(key).unwrap())
    }

    fn drain(&mut self) -> Vec<Task> {
        std::iter::from_fn(|| self.tasks.pop()).collect()
    }
}

const DOC: &str = r#"{"version":"1","root":{"kind":"frame","children":[
    {"id":"a","attrs":{"mk-hidden-at":"1","mk-visible-at":"3"}},
    {"id":"e","attrs":{"emphasize-at":"2"}},
    {"id":"fig","kind":{"figure":{"frames":2}},"attrs":{"figure-next-at":"1 2 3"}},
    {"id":"p","attrs":{"pause":"2","reveal-at-unpause":"x"}},
    {"id":"x"},
    {"id":"u","attrs":{"up-at":"2"}}
]}}"#;

#[test]
fn forward_applies_schedule_and_pauses() {
    let mut rig = Rig::new(DOC);
    assert_eq!(rig.frames.frame(rig.frames.root()).max_step(), 3);
    assert!(rig.state("x").paused);

    assert_eq!(rig.next().unwrap(), StepOutcome::Advanced);
    assert_eq!(rig.step(), 0);

    rig.next().unwrap();
    assert_eq!(rig.state("a").reveal, Reveal::Hidden);
    assert_eq!(rig.state("fig").figure_step, 1);
    assert!(rig.state("x").paused);
    let root = rig.frames.frame(rig.frames.root());
    assert_eq!(root.pause_states().next().unwrap().2, PauseState::Consuming(1));

    rig.drain();
    rig.next().unwrap();
    assert!(rig.state("e").emphasized);
    assert_eq!(rig.state("fig").figure_step, 1);
    assert!(!rig.state("x").paused);
    assert_eq!(rig.state("x").reveal, Reveal::Shown);
    assert!(matches!(rig.drain().as_slice(), [Task::SubMove { .. }]));

    rig.next().unwrap();
    assert!(!rig.state("e").emphasized);
    assert_eq!(rig.state("a").reveal, Reveal::Shown);
}

#[test]
fn exhausted_frames_do_not_change() {
    let mut rig = Rig::new(DOC);
    for _ in 0..4 {
        rig.next().unwrap();
    }
    let before = rig.states();
    assert_eq!(rig.next().unwrap(), StepOutcome::Exhausted);
    assert_eq!(rig.step(), 3);
    assert_eq!(rig.states(), before);
}

#[test]
fn previous_replays_to_the_same_state() {
    let mut rig = Rig::new(DOC);
    let mut seen = Vec::new();
    for _ in 0..4 {
        rig.next().unwrap();
        seen.push(rig.states());
    }
    rig.drain();

    assert_eq!(rig.previous(), Rewind::Replayed(StepOutcome::Advanced));
    assert_eq!(rig.step(), 2);
    assert_eq!(rig.states(), seen[2]);

    let tasks = rig.drain();
    assert_eq!(tasks.first(), Some(&Task::Lock));
    assert_eq!(
        tasks.last(),
        Some(&Task::Goto {
            frame: rig.frames.root(),
            delay: None
        })
    );
    assert!(tasks.contains(&Task::Unlock));

    assert_eq!(rig.previous(), Rewind::Replayed(StepOutcome::Advanced));
    assert_eq!(rig.states(), seen[1]);
    rig.previous();
    assert_eq!(rig.step(), 0);
    assert_eq!(rig.states(), seen[0]);
}

#[test]
fn previous_at_the_edges() {
    let mut rig = Rig::new(DOC);
    let pristine = rig.states();
    assert_eq!(rig.previous(), Rewind::AtStart);
    assert_eq!(rig.drain(), vec![Task::Lock, Task::Unlock]);

    rig.next().unwrap();
    assert_eq!(rig.previous(), Rewind::Rewound);
    assert!(rig.frames.frame(rig.frames.root()).is_pristine());
    assert_eq!(rig.states(), pristine);
}

#[test]
fn partially_consumed_pauses_reset_on_replay() {
    let mut rig = Rig::new(DOC);
    rig.next().unwrap();
    rig.next().unwrap();
    rig.previous();
    let root = rig.frames.frame(rig.frames.root());
    assert_eq!(root.step_index(), 0);
    assert_eq!(root.pause_states().next().unwrap().2, PauseState::Open);
}

#[test]
fn actions_freeze_once_max_step_is_known() {
    let mut rig = Rig::new(DOC);
    let root = rig.frames.root();
    let anchor = rig.frames.frame(root).anchor();
    let action = |h: &str| {
        Effect::ScriptExec(ScriptRef {
            handler: h.to_string(),
            node: anchor,
        })
    };
    let f = rig.frames.frame_mut(root);
    f.add_action(5, action("late")).unwrap();
    assert!(f.add_action(5, action("again")).is_err());
    assert!(f.add_action(-1, action("neg")).is_err());
    assert_eq!(f.max_step(), 5);
    assert!(f.add_action(6, action("sealed")).is_err());
}

#[test]
fn script_failure_keeps_applied_toggles() {
    let mut rig = Rig::new(
        r#"{"version":"1","root":{"kind":"frame","children":[
            {"id":"a","attrs":{"mk-hidden-at":"1"}},
            {"id":"run","kind":{"script":{"handler":"bad"}},"attrs":{"exec-at":"1"}}
        ]}}"#,
    );
    rig.scripts
        .register("bad", |_: &mut ScriptCtx<'_>| anyhow::bail!("nope"));
    rig.next().unwrap();
    let err = rig.next().unwrap_err();
    assert!(err.to_string().contains("script 'bad' failed"));
    assert_eq!(rig.step(), 1);
    assert_eq!(rig.state("a").reveal, Reveal::Hidden);
}
