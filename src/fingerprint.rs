use crate::engine::stack::NavigationStack;
use crate::foundation::core::NodeId;
use crate::frame::pause::{MarkerKind, PauseState};
use crate::frame::tree::FrameTree;
use crate::scene::tree::{NodeState, Placement, Reveal, SceneTree};
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x5d1f_a3c2_7be4_9086;

/// 128-bit digest of a presentation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Fingerprint {
    /// High half.
    pub hi: u64,
    /// Low half.
    pub lo: u64,
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Hash node states, frame steps, pause automata and the stack. Camera and strokes are
/// left out: two paths to the same step must hash alike.
pub(crate) fn fingerprint_state(
    scene: &SceneTree,
    frames: &FrameTree,
    stack: &NavigationStack,
) -> Fingerprint {
    let mut h = StableHasher::new();

    h.write_u32(scene.len() as u32);
    for i in 0..scene.len() as u32 {
        write_node_state(&mut h, scene.state(NodeId(i)));
    }

    h.write_u32(frames.len() as u32);
    for f in frames.iter() {
        h.write_i64(f.step_index());
        for (node, kind, state) in f.pause_states() {
            h.write_u32(node.0);
            write_marker(&mut h, kind, state);
        }
    }

    h.write_u32(stack.len() as u32);
    for f in stack.as_slice() {
        h.write_u32(f.0);
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn finish(self) -> Fingerprint {
        let v = self.inner.digest128();
        Fingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_node_state(h: &mut StableHasher, s: NodeState) {
    h.write_u8(match s.reveal {
        Reveal::Default => 0,
        Reveal::Shown => 1,
        Reveal::Hidden => 2,
    });
    h.write_bool(s.emphasized);
    h.write_u8(match s.placement {
        Placement::InFlow => 0,
        Placement::OutOfFlow => 1,
    });
    h.write_u32(s.figure_step);
    h.write_bool(s.paused);
}

fn write_marker(h: &mut StableHasher, kind: MarkerKind, state: PauseState) {
    h.write_u8(match kind {
        MarkerKind::Pause => 0,
        MarkerKind::Step => 1,
        MarkerKind::AutoEnter => 2,
        MarkerKind::ImmediateEnter => 3,
    });
    match state {
        PauseState::Open => h.write_u8(0),
        PauseState::Consuming(r) => {
            h.write_u8(1);
            h.write_u32(r);
        }
        PauseState::Released => h.write_u8(2),
    }
}

#[cfg(test)]
#[path = "../tests/unit/fingerprint.rs"]
mod tests;
