//! A generic fixed-point worklist: repeatedly attempt every pending
//! item until a full pass makes no further progress. Used where one
//! item's resolution can unblock another (`uses` expansion depends on
//! groupings whose own nested `uses` must expand first).

pub struct Worklist<T> {
    items: Vec<T>,
}

impl<T> Worklist<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Runs `attempt` over every item each round, dropping items it
    /// returns `true` for. Stops when a round drops nothing and
    /// returns whatever is left (the stuck set).
    pub fn drain_to_fixed_point(mut self, mut attempt: impl FnMut(&T) -> bool) -> Vec<T> {
        loop {
            let before = self.items.len();
            self.items.retain(|item| !attempt(item));
            if self.items.is_empty() || self.items.len() == before {
                return self.items;
            }
        }
    }
}
