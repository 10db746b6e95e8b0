use crate::engine::path::StepPath;
use crate::engine::stack::NavigationStack;
use crate::foundation::core::FrameId;
use crate::frame::tree::FrameTree;
use crate::toc::counter::counter_label;
use std::cmp::Ordering;
use std::fmt;

/// Position of a ToC entry relative to the live step of its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Already played.
    Before,
    /// The frame's current step.
    Current,
    /// Not reached yet.
    After,
}

/// One step of a frame in the table of contents.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TocEntry {
    /// Path that reaches this step from the start.
    pub path: StepPath,
    /// Composite counter, e.g. `"II.3"`.
    pub label: String,
    /// Relation to the live step.
    pub status: EntryStatus,
    /// Frame entered at this step, if any.
    pub child: Option<TocFrame>,
}

/// A frame in the table of contents, with one entry per step.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TocFrame {
    /// Frame described.
    pub frame: FrameId,
    /// Frame title.
    pub title: String,
    /// True for the frame on top of the navigation stack.
    pub active: bool,
    /// Entries for steps `0..=max_step`.
    pub entries: Vec<TocEntry>,
}

impl TocFrame {
    /// Every entry of the tree, depth first.
    pub fn walk(&self) -> Vec<&TocEntry> {
        let mut out = Vec::new();
        for e in &self.entries {
            out.push(e);
            if let Some(child) = &e.child {
                out.extend(child.walk());
            }
        }
        out
    }

    /// Entry whose path is `path`.
    pub fn find(&self, path: &StepPath) -> Option<&TocEntry> {
        self.walk().into_iter().find(|e| &e.path == path)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let marker = if self.active { " *" } else { "" };
        writeln!(f, "{:indent$}{}{marker}", "", self.title, indent = depth * 2)?;
        for e in &self.entries {
            let status = match e.status {
                EntryStatus::Before => ' ',
                EntryStatus::Current => '>',
                EntryStatus::After => '.',
            };
            writeln!(f, "{:indent$}{status} {}", "", e.label, indent = depth * 2 + 2)?;
            if let Some(child) = &e.child {
                child.write_indented(f, depth + 2)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for TocFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Table of contents of `frames`, marked against the live `stack`.
pub fn table_of_contents(frames: &FrameTree, stack: &NavigationStack) -> TocFrame {
    outline(frames, stack, frames.root(), &[])
}

fn outline(frames: &FrameTree, stack: &NavigationStack, id: FrameId, prefix: &[i64]) -> TocFrame {
    let frame = frames.frame(id);
    let entries = (0..=frame.max_step())
        .map(|step| {
            let mut path = prefix.to_vec();
            path.push(step);
            let path = StepPath(path);
            let status = match step.cmp(&frame.step_index()) {
                Ordering::Less => EntryStatus::Before,
                Ordering::Equal => EntryStatus::Current,
                Ordering::Greater => EntryStatus::After,
            };
            let child = frame
                .child_at(step)
                .map(|c| outline(frames, stack, c, path.steps()));
            TocEntry {
                label: counter_label(&path),
                path,
                status,
                child,
            }
        })
        .collect();
    TocFrame {
        frame: id,
        title: frame.title().to_owned(),
        active: stack.top() == id,
        entries,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/toc/outline.rs"]
mod tests;
