//! The GUI stack.
//!
//! Front is the bottom-most layer, back is the active one. The stack owns
//! its layers; callers keep a [`LayerId`] and hand it back to remove or look
//! up a layer.

use crate::layer::{GuiLayer, LayerId};

/// A slide between the previous top and a newly pushed layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transition {
    pub leaving: LayerId,
    pub elapsed_ms: u32,
    pub duration_ms: u32,
}

impl Transition {
    pub fn new(leaving: LayerId, duration_ms: u32) -> Self {
        Self {
            leaving,
            elapsed_ms: 0,
            duration_ms: duration_ms.max(1),
        }
    }

    /// Completion in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        (self.elapsed_ms as f32 / self.duration_ms as f32).min(1.0)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

#[derive(Default)]
pub struct GuiStack {
    layers: Vec<(LayerId, Box<dyn GuiLayer>)>,
    next_id: u64,
}

impl GuiStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer. The previous top is told it is no longer on top.
    pub fn push(&mut self, layer: Box<dyn GuiLayer>) -> LayerId {
        if let Some((_, top)) = self.layers.last_mut() {
            top.set_top_window(false);
        }
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.push((id, layer));
        id
    }

    /// Remove a layer, returning it. When the removed layer was the top and
    /// layers remain, the new top is told it is on top. Unknown ids are a
    /// no-op.
    pub fn remove(&mut self, id: LayerId) -> Option<Box<dyn GuiLayer>> {
        let idx = self.index_of(id)?;
        let was_top = idx + 1 == self.layers.len();
        let (_, layer) = self.layers.remove(idx);
        if was_top && let Some((_, top)) = self.layers.last_mut() {
            top.set_top_window(true);
        }
        Some(layer)
    }

    /// The active layer's id.
    pub fn peek(&self) -> Option<LayerId> {
        self.layers.last().map(|(id, _)| *id)
    }

    pub fn top(&self) -> Option<&dyn GuiLayer> {
        self.layers.last().map(|(_, l)| l.as_ref())
    }

    pub fn top_mut(&mut self) -> Option<&mut dyn GuiLayer> {
        self.layers
            .last_mut()
            .map(|(_, l)| -> &mut dyn GuiLayer { l.as_mut() })
    }

    pub fn get(&self, id: LayerId) -> Option<&dyn GuiLayer> {
        self.layers
            .iter()
            .find(|(lid, _)| *lid == id)
            .map(|(_, l)| l.as_ref())
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut dyn GuiLayer> {
        self.layers
            .iter_mut()
            .find(|(lid, _)| *lid == id)
            .map(|(_, l)| -> &mut dyn GuiLayer { l.as_mut() })
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Ids from bottom to top.
    pub fn ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|(id, _)| *id).collect()
    }

    pub fn any_processing(&self) -> bool {
        self.layers.iter().any(|(_, l)| l.is_processing())
    }

    /// Visit every layer bottom to top.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut dyn GuiLayer)) {
        for (_, layer) in &mut self.layers {
            f(layer.as_mut());
        }
    }

    pub(crate) fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|(lid, _)| *lid == id)
    }

    pub(crate) fn at_mut(&mut self, idx: usize) -> Option<&mut dyn GuiLayer> {
        self.layers
            .get_mut(idx)
            .map(|(_, l)| -> &mut dyn GuiLayer { l.as_mut() })
    }
}

impl std::fmt::Debug for GuiStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuiStack")
            .field("layers", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::test_utils::{RecordingLayer, new_log, take};

    #[test]
    fn empty_stack_peeks_none() {
        let stack = GuiStack::new();
        assert_eq!(stack.peek(), None);
        assert!(stack.top().is_none());
    }

    #[test]
    fn push_demotes_previous_top() {
        let log = new_log();
        let mut stack = GuiStack::new();
        stack.push(Box::new(RecordingLayer::new("a", &log)));
        let b = stack.push(Box::new(RecordingLayer::new("b", &log)));
        assert_eq!(take(&log), vec!["a:top=false"]);
        assert_eq!(stack.peek(), Some(b));
    }

    #[test]
    fn removing_top_promotes_once() {
        let log = new_log();
        let mut stack = GuiStack::new();
        let a = stack.push(Box::new(RecordingLayer::new("a", &log)));
        let b = stack.push(Box::new(RecordingLayer::new("b", &log)));
        take(&log);

        assert!(stack.remove(b).is_some());
        assert_eq!(take(&log), vec!["a:top=true"]);
        assert_eq!(stack.peek(), Some(a));
    }

    #[test]
    fn removing_middle_does_not_promote() {
        let log = new_log();
        let mut stack = GuiStack::new();
        stack.push(Box::new(RecordingLayer::new("a", &log)));
        let b = stack.push(Box::new(RecordingLayer::new("b", &log)));
        let c = stack.push(Box::new(RecordingLayer::new("c", &log)));
        take(&log);

        stack.remove(b);
        assert!(take(&log).is_empty());
        assert_eq!(stack.peek(), Some(c));
    }

    #[test]
    fn removing_unknown_is_noop() {
        let log = new_log();
        let mut stack = GuiStack::new();
        let a = stack.push(Box::new(RecordingLayer::new("a", &log)));
        stack.remove(a);
        assert!(stack.remove(a).is_none());
        assert!(stack.remove(LayerId(999)).is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn removing_last_layer_notifies_nobody() {
        let log = new_log();
        let mut stack = GuiStack::new();
        let a = stack.push(Box::new(RecordingLayer::new("a", &log)));
        take(&log);
        stack.remove(a);
        assert!(take(&log).is_empty());
    }

    #[test]
    fn mutable_accessors_reach_owned_layers() {
        let log = new_log();
        let mut stack = GuiStack::new();
        let a = stack.push(Box::new(RecordingLayer::new("a", &log)));
        stack.push(Box::new(RecordingLayer::new("b", &log)));
        take(&log);

        stack.top_mut().unwrap().set_top_window(false);
        stack.get_mut(a).unwrap().set_top_window(true);
        stack.at_mut(0).unwrap().set_top_window(false);
        assert!(stack.get_mut(LayerId(999)).is_none());
        assert!(stack.at_mut(5).is_none());
        assert_eq!(take(&log), vec!["b:top=false", "a:top=true", "a:top=false"]);
    }

    #[test]
    fn transition_progress() {
        let mut t = Transition::new(LayerId(0), 200);
        assert_eq!(t.progress(), 0.0);
        t.elapsed_ms = 100;
        assert_eq!(t.progress(), 0.5);
        t.elapsed_ms = 400;
        assert_eq!(t.progress(), 1.0);
        assert!(t.is_done());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push,
        Remove(usize),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Push), (0usize..8).prop_map(Op::Remove)]
    }

    proptest! {
        #[test]
        fn peek_is_last_pushed_not_removed(ops in prop::collection::vec(arb_op(), 0..64)) {
            let log = new_log();
            let mut stack = GuiStack::new();
            let mut model: Vec<LayerId> = Vec::new();
            let mut issued: Vec<LayerId> = Vec::new();
            for op in ops {
                match op {
                    Op::Push => {
                        let id = stack.push(Box::new(RecordingLayer::new("l", &log)));
                        model.push(id);
                        issued.push(id);
                    },
                    Op::Remove(i) => {
                        if let Some(&id) = issued.get(i) {
                            let was_member = model.contains(&id);
                            prop_assert_eq!(stack.remove(id).is_some(), was_member);
                            model.retain(|m| *m != id);
                        }
                    },
                }
                prop_assert_eq!(stack.peek(), model.last().copied());
                prop_assert_eq!(stack.ids(), model.clone());
            }
        }
    }
}
