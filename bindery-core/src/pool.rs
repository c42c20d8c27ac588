//! Reusable string buffers for rendering.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

/// Bounded pool of `String` buffers
///
/// Buffers are checked out for the duration of one rendering step and
/// returned, cleared, when the guard drops. Access is single-threaded.
#[derive(Debug)]
pub struct BufferPool {
    buffers: RefCell<Vec<String>>,
    capacity: usize,
}

impl BufferPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: RefCell::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Take an empty buffer, allocating one when the pool is drained
    pub fn checkout(&self) -> PooledBuffer<'_> {
        let buffer = self.buffers.borrow_mut().pop().unwrap_or_default();
        PooledBuffer {
            pool: self,
            buffer,
        }
    }

    /// Number of idle buffers
    pub fn idle(&self) -> usize {
        self.buffers.borrow().len()
    }

    fn give_back(&self, mut buffer: String) {
        let mut buffers = self.buffers.borrow_mut();
        if buffers.len() < self.capacity {
            buffer.clear();
            buffers.push(buffer);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(4)
    }
}

/// A buffer on loan from a [`BufferPool`]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buffer: String,
}

impl Deref for PooledBuffer<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut String {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.buffer));
    }
}
