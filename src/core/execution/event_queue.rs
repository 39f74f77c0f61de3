use crate::core::execution::config::EventOrder;
use crate::core::types::FnId;
use std::collections::VecDeque;

/// Pending combinational functions for the current settle pass
///
/// A function appears at most once. With [`EventOrder::Lifo`] new entries go
/// to the front, so the most recently triggered function runs next; with
/// [`EventOrder::Fifo`] they go to the back.
#[derive(Debug)]
pub struct EventQueue {
    queue: VecDeque<FnId>,
    pending: Vec<bool>,
    order: EventOrder,
}

impl EventQueue {
    pub fn new(function_count: usize, order: EventOrder) -> Self {
        Self {
            queue: VecDeque::with_capacity(function_count),
            pending: vec![false; function_count],
            order,
        }
    }

    /// Enqueue a function unless it is already pending
    ///
    /// Returns true if the function was added.
    pub fn schedule(&mut self, function: FnId) -> bool {
        if function.0 >= self.pending.len() {
            self.pending.resize(function.0 + 1, false);
        }
        if self.pending[function.0] {
            return false;
        }
        self.pending[function.0] = true;
        match self.order {
            EventOrder::Lifo => self.queue.push_front(function),
            EventOrder::Fifo => self.queue.push_back(function),
        }
        true
    }

    /// Take the next function to run; it stops being pending immediately
    pub fn pop(&mut self) -> Option<FnId> {
        let function = self.queue.pop_front()?;
        self.pending[function.0] = false;
        Some(function)
    }

    pub fn is_pending(&self, function: FnId) -> bool {
        self.pending.get(function.0).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn order(&self) -> EventOrder {
        self.order
    }

    /// Drop everything pending
    pub fn clear(&mut self) {
        for function in self.queue.drain(..) {
            self.pending[function.0] = false;
        }
    }
}
