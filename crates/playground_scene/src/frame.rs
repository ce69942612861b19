//! Per-frame updates.
//!
//! A render loop calls [`BeforeRender::run`] once per frame, before drawing,
//! with the [`FrameContext`] produced by its [`FrameClock`]. Callbacks keep no
//! state beyond what they capture, and recompute their uniforms from the
//! frame context every time.

use crate::uniform::UniformSink;
use std::{fmt, time::Instant};

/// Timing information for a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    frame_index: u64,
    elapsed_seconds: f32,
}

/// Produces a [`FrameContext`] for each rendered frame.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    next_frame_index: u64,
}

/// A callback invoked once per frame before rendering.
pub type BeforeRenderCallback = Box<dyn FnMut(&FrameContext, &mut dyn UniformSink)>;

/// Callbacks to run before every rendered frame, in registration order.
#[derive(Default)]
pub struct BeforeRender {
    callbacks: Vec<BeforeRenderCallback>,
}

impl FrameContext {
    pub const fn new(frame_index: u64, elapsed_seconds: f32) -> Self {
        Self {
            frame_index,
            elapsed_seconds,
        }
    }

    /// The number of frames rendered before this one.
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Seconds since the clock was started.
    pub const fn elapsed_seconds(&self) -> f32 {
        self.elapsed_seconds
    }
}

impl FrameClock {
    /// Starts a clock measuring wall-clock time from now.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            next_frame_index: 0,
        }
    }

    /// Begins a new frame at the current wall-clock time.
    pub fn tick(&mut self) -> FrameContext {
        let elapsed_seconds = self.start.elapsed().as_secs_f32();
        self.tick_at(elapsed_seconds)
    }

    /// Begins a new frame at the given time, ignoring the wall clock. Useful
    /// for rendering a specific moment of an animation.
    pub fn tick_at(&mut self, elapsed_seconds: f32) -> FrameContext {
        let frame = FrameContext::new(self.next_frame_index, elapsed_seconds);
        self.next_frame_index += 1;
        frame
    }
}

impl BeforeRender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback to run before every frame.
    pub fn register(
        &mut self,
        callback: impl FnMut(&FrameContext, &mut dyn UniformSink) + 'static,
    ) {
        self.callbacks.push(Box::new(callback));
        log::debug!("Registered before-render callback #{}", self.callbacks.len());
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Runs every registered callback for the given frame.
    pub fn run(&mut self, frame: &FrameContext, uniforms: &mut dyn UniformSink) {
        log::trace!(
            "Running {} before-render callbacks for frame {} (t = {:.3} s)",
            self.callbacks.len(),
            frame.frame_index,
            frame.elapsed_seconds
        );
        for callback in &mut self.callbacks {
            callback(frame, &mut *uniforms);
        }
    }
}

impl fmt::Debug for BeforeRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeforeRender")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
