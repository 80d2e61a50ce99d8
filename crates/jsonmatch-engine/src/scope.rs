//! Position of the comparison inside the input trees.

use jsonmatch_types::json_pointer;

/// Linked path from the root to the node being compared. Lives on the call
/// stack, so descending costs no allocation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scope<'a> {
    parent: Option<&'a Scope<'a>>,
    segment: &'a str,
    depth: usize,
}

impl Scope<'static> {
    pub(crate) fn root() -> Self {
        Self {
            parent: None,
            segment: "",
            depth: 0,
        }
    }
}

impl<'a> Scope<'a> {
    pub(crate) fn child<'b>(&'b self, segment: &'b str) -> Scope<'b> {
        Scope {
            parent: Some(self),
            segment,
            depth: self.depth + 1,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// JSON pointer of this position.
    pub(crate) fn pointer(&self) -> String {
        let mut segments = Vec::with_capacity(self.depth);
        let mut current = Some(self);
        while let Some(scope) = current {
            if scope.parent.is_some() {
                segments.push(scope.segment);
            }
            current = scope.parent;
        }
        segments.reverse();
        json_pointer(segments)
    }
}
