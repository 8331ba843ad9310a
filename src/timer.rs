// src/timer.rs
use gloo::timers::callback::Timeout;

/// Something that stops a pending action when cancelled.
pub trait CancelToken {
    fn cancel_now(self);
}

impl CancelToken for Timeout {
    fn cancel_now(self) {
        let _ = self.cancel();
    }
}

/// One slot for one delayed action. Arming the slot cancels whatever was
/// pending in it, so a slot never holds two actions.
pub struct DelaySlot<T: CancelToken = Timeout> {
    pending: Option<T>,
}

impl<T: CancelToken> DelaySlot<T> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn arm(&mut self, token: T) {
        self.cancel();
        self.pending = Some(token);
    }

    /// Returns true if something was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(token) => {
                token.cancel_now();
                true
            }
            None => false,
        }
    }

    /// The pending action ran; forget its token without cancelling.
    pub fn fired(&mut self) {
        self.pending = None;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T: CancelToken> Default for DelaySlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl DelaySlot<Timeout> {
    pub fn schedule<F>(&mut self, millis: u32, action: F)
    where
        F: FnOnce() + 'static,
    {
        self.arm(Timeout::new(millis, action));
    }
}
