//! A manually released barrier for async tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

#[derive(Debug, Default)]
struct GateState {
    open: bool,
    wakers: Vec<Waker>,
}

/// Futures from [`Gate::wait`] stay pending until [`Gate::open`] is called.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    inner: Arc<Mutex<GateState>>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release every waiter, now and in the future.
    pub fn open(&self) {
        let wakers = {
            let mut state = self.inner.lock();
            state.open = true;
            std::mem::take(&mut state.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().open
    }

    pub fn wait(&self) -> GateWait {
        GateWait { gate: self.clone() }
    }
}

/// Future returned by [`Gate::wait`].
#[derive(Debug)]
pub struct GateWait {
    gate: Gate,
}

impl Future for GateWait {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = self.gate.inner.lock();
        if state.open {
            Poll::Ready(())
        } else {
            state.wakers.push(cx.waker().clone());
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use futures_lite::future;

    use super::*;

    #[test]
    fn test_pending_until_open() {
        let gate = Gate::new();
        let mut wait = gate.wait();
        assert!(future::block_on(future::poll_once(&mut wait)).is_none());

        gate.open();
        assert!(gate.is_open());
        assert!(future::block_on(future::poll_once(&mut wait)).is_some());
    }

    #[test]
    fn test_open_before_wait() {
        let gate = Gate::new();
        gate.open();
        future::block_on(gate.wait());
    }
}
