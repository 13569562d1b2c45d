use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use once_cell::sync::Lazy;

/// A source of reusable write buffers. `put` must tolerate any buffer that
/// `get` handed out earlier, whatever its current contents.
pub trait BufferPool: Send + Sync {
    fn get(&self) -> Vec<u8>;
    fn put(&self, buf: Vec<u8>);
}

pub struct WriteBufferPool {
    idle: Mutex<Vec<Vec<u8>>>,
    outstanding: AtomicI64,
}

impl WriteBufferPool {
    pub fn new() -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            outstanding: AtomicI64::new(0),
        }
    }

    fn lock_idle(&self) -> MutexGuard<'_, Vec<Vec<u8>>> {
        match self.idle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn take(&self) -> Vec<u8> {
        self.lock_idle().pop().unwrap_or_default()
    }

    fn give_back(&self, mut buf: Vec<u8>) {
        buf.clear();
        self.lock_idle().push(buf);
        self.outstanding.fetch_sub(1, Ordering::AcqRel);
    }

    /// Hands out an owned holder, allocating when the pool is empty.
    pub fn checkout(self: &Arc<Self>) -> PooledWriteBuffer {
        let buf = self.take();
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        PooledWriteBuffer {
            buf,
            pool: Arc::clone(self),
        }
    }

    pub fn idle_count(&self) -> usize {
        self.lock_idle().len()
    }

    pub fn outstanding(&self) -> i64 {
        self.outstanding.load(Ordering::Acquire)
    }
}

impl Default for WriteBufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferPool for WriteBufferPool {
    fn get(&self) -> Vec<u8> {
        self.take()
    }

    fn put(&self, mut buf: Vec<u8>) {
        buf.clear();
        self.lock_idle().push(buf);
    }
}

/// An exclusively held write buffer. Dropping it truncates the contents and
/// returns the allocation to its pool, during unwinding included, so a later
/// checkout can never observe bytes from another connection.
pub struct PooledWriteBuffer {
    buf: Vec<u8>,
    pool: Arc<WriteBufferPool>,
}

impl Deref for PooledWriteBuffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledWriteBuffer {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledWriteBuffer {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.buf));
    }
}

static SHARED_POOL: Lazy<Arc<WriteBufferPool>> = Lazy::new(|| Arc::new(WriteBufferPool::new()));

/// The process-wide pool backing every upgrade.
pub fn shared() -> &'static Arc<WriteBufferPool> {
    &SHARED_POOL
}
