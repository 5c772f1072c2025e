//! # The presentation stack.
//!
//! Ordered, duplicate-free sequence of [`ControllerProxy`] nodes; index 0 is the bottom,
//! the last element is the top. The stack owns the proxies: removing a node drops the
//! only strong reference the presenter keeps.
//!
//! The stack is plain data. It is mutated only by the operation loop and read by
//! snapshots and command routing.

use std::sync::Arc;

use crate::controllers::{ControllerId, ControllerProxy, ControllerType};
use crate::policies::PresentFlags;

#[derive(Default)]
pub(crate) struct Stack {
    items: Vec<Arc<ControllerProxy>>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes `proxy` and returns its position. Duplicates are ignored.
    pub fn push(&mut self, proxy: Arc<ControllerProxy>) -> usize {
        if let Some(at) = self.index_of(proxy.id()) {
            return at;
        }
        self.items.push(proxy);
        self.items.len() - 1
    }

    pub fn remove(&mut self, id: ControllerId) -> Option<Arc<ControllerProxy>> {
        let at = self.index_of(id)?;
        Some(self.items.remove(at))
    }

    /// Topmost proxy.
    pub fn peek(&self) -> Option<&Arc<ControllerProxy>> {
        self.items.last()
    }

    pub fn index_of(&self, id: ControllerId) -> Option<usize> {
        self.items.iter().position(|p| p.id() == id)
    }

    pub fn contains(&self, id: ControllerId) -> bool {
        self.index_of(id).is_some()
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<ControllerProxy>> {
        self.items.iter()
    }

    /// Top to bottom.
    pub fn top_down(&self) -> impl Iterator<Item = &Arc<ControllerProxy>> {
        self.items.iter().rev()
    }

    /// Owned bottom-to-top copy.
    pub fn snapshot(&self) -> Vec<Arc<ControllerProxy>> {
        self.items.clone()
    }

    /// Topmost live instance of `kind`.
    pub fn find_live_of_type(&self, kind: ControllerType) -> Option<&Arc<ControllerProxy>> {
        self.top_down().find(|p| p.kind() == kind && p.is_live())
    }

    /// Every transitive `CHILD` descendant of `id`, most recently pushed first.
    ///
    /// Only proxies above `id` are considered; a child can never sit below its parent.
    pub fn descendants_of(&self, id: ControllerId) -> Vec<Arc<ControllerProxy>> {
        let Some(at) = self.index_of(id) else {
            return Vec::new();
        };

        let mut family = vec![id];
        let mut found = Vec::new();
        for proxy in &self.items[at + 1..] {
            if !proxy.flags().contains(PresentFlags::CHILD) {
                continue;
            }
            let Some(parent) = proxy.parent() else {
                continue;
            };
            if family.contains(&parent.id()) {
                family.push(proxy.id());
                found.push(Arc::clone(proxy));
            }
        }
        found.reverse();
        found
    }
}
