//! Operation history: linear undo/redo over named groups of edits.
//!
//! One group is one logical user action; groups may nest, and only the
//! outermost `end_group` commits. Committing prunes any previously-undone
//! groups past the current position (redo is a straight line, not a
//! tree). An optional capacity evicts the oldest group; its effects stay
//! part of the current state, it just stops being undoable.

use crate::complex::Complex;
use crate::diff::Diff;
use crate::edit::Edit;
use crate::error::OpResult;

/// One committed undoable unit.
#[derive(Clone, Debug)]
pub struct OpGroup {
    pub name: String,
    pub(crate) edits: Vec<Edit>,
}

impl OpGroup {
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

#[derive(Debug)]
struct OpenGroup {
    name: String,
    depth: usize,
    edits: Vec<Edit>,
}

#[derive(Debug, Default)]
pub struct History {
    groups: Vec<OpGroup>,
    /// Number of groups currently applied; undo moves it down, redo up.
    position: usize,
    open: Option<OpenGroup>,
    capacity: Option<usize>,
}

impl History {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    #[inline]
    pub fn has_open_group(&self) -> bool {
        self.open.is_some()
    }

    /// Committed group count.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Current position: number of applied groups (undo steps available).
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0 && self.open.is_none()
    }

    pub fn can_redo(&self) -> bool {
        self.position < self.groups.len() && self.open.is_none()
    }

    /// Names of committed groups, oldest first (for host undo menus).
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Open a group, or deepen the already-open one. Nested begin/end
    /// pairs fold into the enclosing group; the outermost name wins.
    pub fn begin_group(&mut self, name: &str) {
        match &mut self.open {
            Some(open) => open.depth += 1,
            None => {
                self.open = Some(OpenGroup {
                    name: name.to_string(),
                    depth: 1,
                    edits: Vec::new(),
                });
            }
        }
    }

    /// Record already-applied edits into the open group.
    pub(crate) fn record(&mut self, edits: Vec<Edit>) {
        if let Some(open) = &mut self.open {
            open.edits.extend(edits);
        }
    }

    /// Close one nesting level; the outermost close commits. Empty groups
    /// are dropped rather than committed. Returns true when a commit (or
    /// amend) happened.
    pub fn end_group(&mut self) -> bool {
        self.close(false)
    }

    /// Like `end_group`, but when the group at the undo position has the
    /// same name, merge into it instead of pushing a new entry (used to
    /// coalesce successive small drags into one undo step).
    pub fn end_group_amend(&mut self) -> bool {
        self.close(true)
    }

    fn close(&mut self, amend: bool) -> bool {
        let open = match &mut self.open {
            Some(open) => open,
            None => return false,
        };
        open.depth -= 1;
        if open.depth > 0 {
            return false;
        }
        let open = match self.open.take() {
            Some(open) => open,
            None => return false,
        };
        if open.edits.is_empty() {
            return false;
        }
        // A new edit invalidates the redo tail.
        self.groups.truncate(self.position);
        let merged = amend
            && self
                .groups
                .last()
                .is_some_and(|last| last.name == open.name);
        if merged {
            if let Some(last) = self.groups.last_mut() {
                last.edits.extend(open.edits);
            }
        } else {
            self.groups.push(OpGroup {
                name: open.name,
                edits: open.edits,
            });
            self.position += 1;
            if let Some(cap) = self.capacity {
                while self.groups.len() > cap && self.position > 0 {
                    let evicted = self.groups.remove(0);
                    self.position -= 1;
                    log::debug!(
                        "history capacity {cap} reached, evicting group '{}'",
                        evicted.name
                    );
                }
            }
        }
        true
    }

    /// Discard the open group, reverting every edit applied since the
    /// outermost `begin_group`. History itself is untouched.
    pub fn abort_group(&mut self, complex: &mut Complex, diff: &mut Diff) -> OpResult<()> {
        if let Some(open) = self.open.take() {
            for edit in open.edits.iter().rev() {
                edit.inverted().apply(complex, diff)?;
            }
        }
        Ok(())
    }

    /// Step back one group. A no-op (returning false) at the start of
    /// history or while a group is open.
    pub fn undo_one(&mut self, complex: &mut Complex, diff: &mut Diff) -> OpResult<bool> {
        if !self.can_undo() {
            return Ok(false);
        }
        self.position -= 1;
        for edit in self.groups[self.position].edits.iter().rev() {
            edit.inverted().apply(complex, diff)?;
        }
        Ok(true)
    }

    /// Step forward one group. A no-op at the end of history.
    pub fn redo_one(&mut self, complex: &mut Complex, diff: &mut Diff) -> OpResult<bool> {
        if !self.can_redo() {
            return Ok(false);
        }
        for edit in self.groups[self.position].edits.iter() {
            edit.apply(complex, diff)?;
        }
        self.position += 1;
        Ok(true)
    }
}
