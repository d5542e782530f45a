//! Bitmap set of resource queues
//!
//! A thread's held resources are a set of queue slots. With at most 64
//! queues the whole set fits in one word, so insert, remove and
//! membership are single bit operations and iteration walks set bits
//! with trailing-zero counts.

use crate::config::CFG_QUEUE_MAX;
use crate::types::QueueId;

/// Set of resource queues, one bit per queue slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueSet {
    bits: u64,
}

impl QueueSet {
    pub const fn new() -> Self {
        QueueSet { bits: 0 }
    }

    /// Add a queue to the set
    #[inline]
    pub fn insert(&mut self, queue: QueueId) {
        debug_assert!(queue.index() < CFG_QUEUE_MAX);
        self.bits |= 1u64 << queue.index();
    }

    /// Remove a queue from the set
    #[inline]
    pub fn remove(&mut self, queue: QueueId) {
        debug_assert!(queue.index() < CFG_QUEUE_MAX);
        self.bits &= !(1u64 << queue.index());
    }

    /// Check if a queue is in the set
    #[inline]
    pub fn contains(&self, queue: QueueId) -> bool {
        (self.bits & (1u64 << queue.index())) != 0
    }

    /// Check if the set is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of queues in the set
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterate queues in slot order
    #[inline]
    pub fn iter(&self) -> QueueSetIter {
        QueueSetIter { bits: self.bits }
    }
}

/// Iterator over the queues of a [`QueueSet`]
///
/// Owns a copy of the bits, so the set may be modified while iterating.
pub struct QueueSetIter {
    bits: u64,
}

impl Iterator for QueueSetIter {
    type Item = QueueId;

    #[inline]
    fn next(&mut self) -> Option<QueueId> {
        if self.bits == 0 {
            return None;
        }
        let slot = self.bits.trailing_zeros() as u8;
        // clear lowest set bit
        self.bits &= self.bits - 1;
        Some(QueueId(slot))
    }
}

impl IntoIterator for &QueueSet {
    type Item = QueueId;
    type IntoIter = QueueSetIter;

    fn into_iter(self) -> QueueSetIter {
        self.iter()
    }
}
