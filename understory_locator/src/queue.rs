// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Priority queues keyed by squared distances.

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::{Ordering, Reverse};

/// An item ordered by an `f32` key using `total_cmp`.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Keyed<T> {
    pub(crate) key: f32,
    pub(crate) item: T,
}

impl<T> PartialEq for Keyed<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key.total_cmp(&other.key) == Ordering::Equal
    }
}

impl<T> Eq for Keyed<T> {}

impl<T> PartialOrd for Keyed<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Keyed<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.total_cmp(&other.key)
    }
}

/// Min-heap: pops the smallest key first.
///
/// No decrease-key: an item is pushed once when discovered.
#[derive(Debug)]
pub(crate) struct MinQueue<T> {
    heap: BinaryHeap<Reverse<Keyed<T>>>,
}

impl<T> MinQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub(crate) fn push(&mut self, key: f32, item: T) {
        self.heap.push(Reverse(Keyed { key, item }));
    }

    pub(crate) fn pop(&mut self) -> Option<(f32, T)> {
        self.heap.pop().map(|Reverse(k)| (k.key, k.item))
    }

    #[cfg(test)]
    pub(crate) fn peek_key(&self) -> Option<f32> {
        self.heap.peek().map(|Reverse(k)| k.key)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Keeps the `capacity` items with the smallest keys.
#[derive(Debug)]
pub(crate) struct BoundedMaxQueue<T> {
    capacity: usize,
    heap: BinaryHeap<Keyed<T>>,
}

impl<T> BoundedMaxQueue<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Largest kept key, once the queue is full.
    pub(crate) fn worst_key(&self) -> Option<f32> {
        if self.is_full() {
            self.heap.peek().map(|k| k.key)
        } else {
            None
        }
    }

    /// Offers an item; it is kept if there is room or it beats the current worst.
    pub(crate) fn push(&mut self, key: f32, item: T) {
        if self.capacity == 0 {
            return;
        }
        if !self.is_full() {
            self.heap.push(Keyed { key, item });
        } else if let Some(mut worst) = self.heap.peek_mut()
            && key < worst.key
        {
            *worst = Keyed { key, item };
        }
    }

    /// Kept items in ascending key order.
    pub(crate) fn into_sorted_vec(self) -> Vec<(f32, T)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|k| (k.key, k.item))
            .collect()
    }
}
