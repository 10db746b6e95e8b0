use crate::engine::path::StepPath;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Channel to whoever mirrors or drives this session.
pub trait RemoteControlPort {
    /// Called after every change the session committed on its own.
    fn on_step_committed(&mut self, path: &StepPath);

    /// Next pending "go to this path" request, if any.
    fn take_goto(&mut self) -> Option<String>;
}

type Inbox = Rc<RefCell<VecDeque<String>>>;

/// In-process port; see [`LinkedPort::pair`].
#[derive(Debug, Default, Clone)]
pub struct LinkedPort {
    inbox: Inbox,
    outbox: Inbox,
}

impl LinkedPort {
    /// Two connected ports: what one side commits, the other receives as a goto request.
    pub fn pair() -> (Self, Self) {
        let a: Inbox = Rc::default();
        let b: Inbox = Rc::default();
        (
            Self {
                inbox: Rc::clone(&a),
                outbox: Rc::clone(&b),
            },
            Self {
                inbox: b,
                outbox: a,
            },
        )
    }

    /// Queue a goto request on this port, as if the peer had sent it.
    pub fn inject(&self, msg: impl Into<String>) {
        self.inbox.borrow_mut().push_back(msg.into());
    }

    /// Requests waiting on this port.
    pub fn pending(&self) -> usize {
        self.inbox.borrow().len()
    }
}

impl RemoteControlPort for LinkedPort {
    fn on_step_committed(&mut self, path: &StepPath) {
        self.outbox.borrow_mut().push_back(path.to_string());
    }

    fn take_goto(&mut self) -> Option<String> {
        self.inbox.borrow_mut().pop_front()
    }
}

/// Where the current path is persisted between runs (a URL fragment, a file, ...).
pub trait DeepLinkStore {
    /// Stored fragment, without any leading `#`.
    fn read(&self) -> Option<String>;

    /// Replace the stored fragment.
    fn write(&mut self, fragment: &str);
}

/// Deep link kept in memory. Clones share the same slot.
#[derive(Debug, Default, Clone)]
pub struct MemoryDeepLink {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryDeepLink {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `fragment`.
    pub fn with_fragment(fragment: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(fragment.into()))),
        }
    }

    /// Current content.
    pub fn get(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl DeepLinkStore for MemoryDeepLink {
    fn read(&self) -> Option<String> {
        self.get()
    }

    fn write(&mut self, fragment: &str) {
        *self.slot.borrow_mut() = Some(fragment.to_owned());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/remote.rs"]
mod tests;
