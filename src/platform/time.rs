//! Time sources and frame scheduling
//!
//! The simulation only needs two things from its environment: a monotonic
//! millisecond clock and a way to say "run me again next refresh". The
//! browser supplies `performance.now()` and `requestAnimationFrame`; native
//! runs and tests drive both by hand.

use std::cell::Cell;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) -> f64 {
        let now = self.now.get() + ms;
        self.now.set(now);
        now
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// `performance.now()`
#[cfg(target_arch = "wasm32")]
pub struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

#[cfg(target_arch = "wasm32")]
impl PerformanceClock {
    pub fn new() -> Self {
        let performance = web_sys::window().and_then(|w| w.performance());
        if performance.is_none() {
            log::warn!("performance.now() unavailable, falling back to Date.now()");
        }
        Self { performance }
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now(),
            None => js_sys::Date::now(),
        }
    }
}

/// Something that can run a callback on the next display refresh
pub trait FrameScheduler {
    type Handle;

    /// Ask for one more frame; `None` if the environment refused
    fn request_frame(&mut self) -> Option<Self::Handle>;

    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Tracks the single pending frame of a tick-then-reschedule loop
///
/// At most one frame is ever outstanding. Entering Playing schedules one,
/// each fired frame reschedules while still Playing, and leaving Playing
/// cancels whatever is pending.
#[derive(Debug)]
pub struct FrameLoop<H> {
    pending: Option<H>,
}

impl<H> Default for FrameLoop<H> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<H> FrameLoop<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Request the next frame unless one is already pending
    pub fn schedule<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: FrameScheduler<Handle = H>,
    {
        if self.pending.is_some() {
            return false;
        }
        self.pending = scheduler.request_frame();
        if self.pending.is_none() {
            log::warn!("Frame request refused");
        }
        self.pending.is_some()
    }

    /// Drop the pending frame, if any
    pub fn cancel<S>(&mut self, scheduler: &mut S)
    where
        S: FrameScheduler<Handle = H>,
    {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
    }

    /// Mark the pending frame as delivered; call first thing in the frame callback
    pub fn fired(&mut self) {
        self.pending = None;
    }
}

/// Scheduler for headless runs: frames fire when the caller says so
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_handle: u32,
    /// Handles requested and not yet cancelled or fired
    pub outstanding: Vec<u32>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver the oldest outstanding frame, returning its handle
    pub fn fire(&mut self) -> Option<u32> {
        if self.outstanding.is_empty() {
            None
        } else {
            Some(self.outstanding.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = u32;

    fn request_frame(&mut self) -> Option<u32> {
        self.next_handle += 1;
        self.outstanding.push(self.next_handle);
        Some(self.next_handle)
    }

    fn cancel_frame(&mut self, handle: u32) {
        self.outstanding.retain(|h| *h != handle);
    }
}
