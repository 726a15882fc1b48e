//! FIFO frontier of links waiting to be visited within one category

use crate::state::ThemeLink;
use std::collections::VecDeque;

/// Queue of pending links for the current category, drained from the front
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<ThemeLink>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, link: ThemeLink) {
        self.queue.push_back(link);
    }

    pub fn pop(&mut self) -> Option<ThemeLink> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Extend<ThemeLink> for Frontier {
    fn extend<I: IntoIterator<Item = ThemeLink>>(&mut self, iter: I) {
        self.queue.extend(iter);
    }
}
