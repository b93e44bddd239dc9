// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge auto-scrolling while dragging.
//!
//! [`AutoScroll`] scrolls a [`ScrollViewport`] when the pointer is within
//! [`AutoScrollConfig::margin`] of one of its edges. Speed grows quadratically as the pointer
//! approaches the edge and is capped at [`AutoScrollConfig::max_speed`] at or past it.
//!
//! The controller does not own a timer. The host runs its animation-frame loop and calls
//! [`AutoScroll::tick`] from it for as long as `tick` returns `true`:
//!
//! ```
//! use kurbo::{Point, Rect, Vec2};
//! use understory_drag_state::autoscroll::{AutoScroll, ScrollViewport};
//!
//! struct Pane {
//!     rect: Rect,
//!     offset: Vec2,
//! }
//!
//! impl ScrollViewport for Pane {
//!     fn viewport_rect(&self) -> Option<Rect> {
//!         Some(self.rect)
//!     }
//!     fn scroll_by(&mut self, delta: Vec2) {
//!         self.offset += delta;
//!     }
//! }
//!
//! let mut pane = Pane { rect: Rect::new(0.0, 0.0, 400.0, 400.0), offset: Vec2::ZERO };
//! let mut scroll = AutoScroll::new();
//! scroll.set_enabled(true);
//!
//! // Right at the bottom edge: full speed downward.
//! assert!(scroll.handle_move(Point::new(200.0, 400.0)));
//! let mut now = 0;
//! while scroll.tick(&mut pane, now) && now < 160 {
//!     now += 16;
//! }
//! assert!(pane.offset.y > 0.0);
//!
//! // Disabling stops the loop on the next tick.
//! scroll.set_enabled(false);
//! assert!(!scroll.tick(&mut pane, now + 16));
//! ```

use kurbo::{Point, Rect, Vec2};

/// A scrollable container driven by [`AutoScroll`].
pub trait ScrollViewport {
    /// Visible bounds of the container, in the same space as pointer positions.
    ///
    /// `None` means the container is no longer mounted, which stops auto-scrolling.
    fn viewport_rect(&self) -> Option<Rect>;

    /// Scroll the content by `delta`.
    fn scroll_by(&mut self, delta: Vec2);
}

/// Auto-scroll tuning.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AutoScrollConfig {
    /// Width of the band along each edge that triggers scrolling.
    pub margin: f64,
    /// Speed at or past an edge, in pixels per second.
    pub max_speed: f64,
    /// Assumed frame duration in milliseconds for the first tick of a run.
    pub frame_ms: u64,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            margin: 40.0,
            max_speed: 1200.0,
            frame_ms: 16,
        }
    }
}

impl AutoScrollConfig {
    /// Scroll velocity in pixels per second for `pointer` over `viewport`.
    ///
    /// Zero when the pointer is outside every edge band.
    pub fn velocity(&self, viewport: Rect, pointer: Point) -> Vec2 {
        let viewport = viewport.abs();
        Vec2::new(
            self.axis_velocity(pointer.x - viewport.x0, viewport.x1 - pointer.x),
            self.axis_velocity(pointer.y - viewport.y0, viewport.y1 - pointer.y),
        )
    }

    fn axis_velocity(&self, to_start: f64, to_end: f64) -> f64 {
        if to_start < self.margin && to_start <= to_end {
            -self.speed(to_start)
        } else if to_end < self.margin {
            self.speed(to_end)
        } else {
            0.0
        }
    }

    /// Quadratic ease-in over the margin band.
    fn speed(&self, distance: f64) -> f64 {
        if self.margin.is_nan() || self.margin <= 0.0 {
            return 0.0;
        }
        let t = ((self.margin - distance) / self.margin).clamp(0.0, 1.0);
        self.max_speed * t * t
    }
}

/// Drag-time edge scrolling for one viewport.
#[derive(Clone, Debug)]
pub struct AutoScroll {
    config: AutoScrollConfig,
    enabled: bool,
    running: bool,
    pointer: Option<Point>,
    /// Viewport bounds seen by the last tick or [`AutoScroll::set_viewport_rect`].
    viewport: Option<Rect>,
    last_tick: Option<u64>,
}

impl Default for AutoScroll {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoScroll {
    /// Create a disabled controller with default tuning.
    pub fn new() -> Self {
        Self::with_config(AutoScrollConfig::default())
    }

    /// Create a disabled controller with custom tuning.
    pub fn with_config(config: AutoScrollConfig) -> Self {
        Self {
            config,
            enabled: false,
            running: false,
            pointer: None,
            viewport: None,
            last_tick: None,
        }
    }

    /// Current tuning.
    pub fn config(&self) -> &AutoScrollConfig {
        &self.config
    }

    /// Turn scrolling on for a drag, or off at its end.
    ///
    /// Disabling forgets the pointer and stops a running loop.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            self.pointer = None;
            self.stop();
        }
    }

    /// Returns `true` while enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` while the host's frame loop should keep calling [`AutoScroll::tick`].
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tell the controller where the viewport is before the first tick.
    ///
    /// Ticks keep this up to date afterwards.
    pub fn set_viewport_rect(&mut self, rect: Option<Rect>) {
        self.viewport = rect;
    }

    /// Record the pointer position.
    ///
    /// Returns `true` when the host should start its frame loop: the controller is enabled, no
    /// loop is running yet, and the pointer is in an edge band. While the viewport bounds are
    /// unknown the band check is left to the first tick. Ignored while disabled.
    pub fn handle_move(&mut self, point: Point) -> bool {
        if !self.enabled {
            return false;
        }
        self.pointer = Some(point);
        if self.running {
            return false;
        }
        if let Some(rect) = self.viewport
            && self.config.velocity(rect, point) == Vec2::ZERO
        {
            return false;
        }
        self.running = true;
        true
    }

    /// Run one frame at `now_ms`.
    ///
    /// Scrolls `viewport` by the distance covered since the previous tick and returns whether
    /// another frame should be scheduled. Returns `false` and stops when disabled, when the
    /// viewport is unmounted, or when the pointer is outside the edge bands.
    pub fn tick<V>(&mut self, viewport: &mut V, now_ms: u64) -> bool
    where
        V: ScrollViewport + ?Sized,
    {
        let (true, Some(pointer)) = (self.enabled, self.pointer) else {
            self.stop();
            return false;
        };
        self.viewport = viewport.viewport_rect();
        let Some(rect) = self.viewport else {
            tracing::debug!("auto-scroll viewport unmounted");
            self.stop();
            return false;
        };
        let velocity = self.config.velocity(rect, pointer);
        if velocity == Vec2::ZERO {
            self.stop();
            return false;
        }

        // Long stalls (a background tab) would otherwise jump the content.
        let frame = self.config.frame_ms;
        let elapsed = self.last_tick.map_or(frame, |last| {
            now_ms.saturating_sub(last).min(frame.saturating_mul(4))
        });
        if self.last_tick.is_none() {
            tracing::trace!(?velocity, "auto-scroll started");
        }
        self.last_tick = Some(now_ms);
        self.running = true;

        let seconds = elapsed as f64 / 1000.0;
        let delta = velocity * seconds;
        if delta != Vec2::ZERO {
            viewport.scroll_by(delta);
        }
        true
    }

    fn stop(&mut self) {
        if self.last_tick.is_some() {
            tracing::trace!("auto-scroll stopped");
        }
        self.running = false;
        self.last_tick = None;
    }
}
