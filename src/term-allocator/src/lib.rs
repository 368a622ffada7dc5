//! A pooled arena of fixed-width `u64` buffers, used by `dpllsat`'s decision stack to hold
//! the `unassigned` bitmap snapshot captured at each decision.
//!
//! Per decision, a buffer is checked out, filled with a snapshot of the current assignment
//! state, and returned to the pool once its decision frame is popped off the backtracking
//! stack. The pool starts sized to the caller's declared capacity (the reference
//! implementation sizes it to `variable_count + 1`, since the decision stack can never
//! hold more frames than there are variables) and grows on demand if that is ever
//! exceeded.

use smallvec::SmallVec;

/// A handle to one pooled snapshot buffer. Cheap to copy; carries no borrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHandle(u32);

pub struct SnapshotArena {
    word_width: usize,
    buffers: Vec<Vec<u64>>,
    free_list: SmallVec<[u32; 16]>,
}

impl SnapshotArena {
    pub fn new(capacity: u32, word_width: usize) -> Self {
        let buffers = (0..capacity).map(|_| vec![0u64; word_width]).collect();
        let free_list = (0..capacity).rev().collect();
        SnapshotArena {
            word_width,
            buffers,
            free_list,
        }
    }

    /// Checks out a buffer, growing the pool by one if it is exhausted.
    pub fn alloc(&mut self) -> SnapshotHandle {
        let idx = self.free_list.pop().unwrap_or_else(|| {
            log::trace!("snapshot arena pool exhausted, growing by one buffer");
            self.buffers.push(vec![0u64; self.word_width]);
            (self.buffers.len() - 1) as u32
        });
        SnapshotHandle(idx)
    }

    /// Returns a buffer to the pool for reuse by a later decision.
    pub fn free(&mut self, handle: SnapshotHandle) {
        self.free_list.push(handle.0);
    }

    pub fn buffer(&self, handle: &SnapshotHandle) -> &[u64] {
        &self.buffers[handle.0 as usize]
    }

    pub fn buffer_mut(&mut self, handle: &SnapshotHandle) -> &mut [u64] {
        &mut self.buffers[handle.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_reuses_freed_buffers() {
        let mut arena = SnapshotArena::new(2, 3);
        let a = arena.alloc();
        let b = arena.alloc();
        arena.buffer_mut(&a)[0] = 7;
        arena.free(a);
        let c = arena.alloc();
        // `c` should have reused `a`'s slot, carrying over its old contents untouched.
        assert_eq!(arena.buffer(&c)[0], 7);
        assert_ne!(b, c);
    }

    #[test]
    fn alloc_grows_past_initial_capacity() {
        let mut arena = SnapshotArena::new(1, 2);
        let _a = arena.alloc();
        let b = arena.alloc();
        arena.buffer_mut(&b)[1] = 9;
        assert_eq!(arena.buffer(&b)[1], 9);
    }
}
