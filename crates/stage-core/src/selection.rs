//! Selection state machine driven by hit-test results.

/// `None` or exactly one selected panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Selected(usize),
}

impl Selection {
    pub fn index(self) -> Option<usize> {
        match self {
            Selection::None => None,
            Selection::Selected(i) => Some(i),
        }
    }

    pub fn from_index(index: Option<usize>) -> Self {
        index.map_or(Selection::None, Selection::Selected)
    }

    /// `-1` when nothing is selected.
    pub fn as_js_index(self) -> i32 {
        self.index().map_or(-1, |i| i as i32)
    }

    pub fn is_active(self, index: usize) -> bool {
        self == Selection::Selected(index)
    }

    /// Next state for a click that hit `hit` (or empty space).
    pub fn after_hit(self, hit: Option<usize>) -> Selection {
        match (self, hit) {
            (Selection::Selected(current), Some(i)) if current == i => Selection::None,
            (_, Some(i)) => Selection::Selected(i),
            (_, None) => Selection::None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Selection,
    pub current: Selection,
}

impl SelectionChange {
    /// Index that just became active, if any.
    pub fn newly_selected(&self) -> Option<usize> {
        self.current.index()
    }
}

#[derive(Debug, Default)]
pub struct SelectionMachine {
    current: Selection,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Selection {
        self.current
    }

    /// Applies a pointer hit. Returns `None` when the state does not change
    /// (a miss while nothing is selected).
    pub fn on_hit(&mut self, hit: Option<usize>) -> Option<SelectionChange> {
        self.set(self.current.after_hit(hit))
    }

    /// Moves straight to `next` without toggle semantics.
    pub fn set(&mut self, next: Selection) -> Option<SelectionChange> {
        if next == self.current {
            return None;
        }
        let previous = std::mem::replace(&mut self.current, next);
        Some(SelectionChange {
            previous,
            current: next,
        })
    }

    pub fn reset(&mut self) {
        self.current = Selection::None;
    }
}
