#![forbid(unsafe_code)]

//! Scroll-driven background hues and parallax offsets.
//!
//! The engine maps normalized scroll progress `p ∈ [0, 1]` to three hue
//! angles and three pixel offsets, written to the document root as CSS
//! custom properties (`--hA`, `--hB`, `--hC`, `--bg1-off`, ...).
//!
//! # Invariants
//!
//! 1. `p` is `0` whenever the page is not scrollable (never NaN).
//! 2. `offset1 / offset2 == -140 / 120` for every `p > 0` and direction.
//! 3. At most one recomputation is pending per rendered frame.
//! 4. Under reduced motion no scroll subscription exists; resize and
//!    orientation changes still recompute.
//!
//! Direction is hysteretic: it depends on the previous sampled `scrollY`,
//! held in [`ScrollVisualEngine::last_scroll_y`].

use core::f64::consts::PI;

use crate::media::MediaPreferences;
use crate::subscriptions::{EventKind, ListenerOptions, Subscriber, Subscriptions};

pub const HUE_A_BASE: f64 = 210.0;
pub const HUE_A_SWING: f64 = 40.0;
pub const HUE_B_BASE: f64 = 260.0;
pub const HUE_B_SWING: f64 = 35.0;
pub const HUE_C_BASE: f64 = 190.0;
pub const HUE_C_SWING: f64 = 30.0;

pub const OFFSET_1_PX: f64 = 140.0;
pub const OFFSET_2_PX: f64 = 120.0;
pub const OFFSET_3_PX: f64 = 160.0;

pub const PROP_HUE_A: &str = "--hA";
pub const PROP_HUE_B: &str = "--hB";
pub const PROP_HUE_C: &str = "--hC";
pub const PROP_OFFSET_1: &str = "--bg1-off";
pub const PROP_OFFSET_2: &str = "--bg2-off";
pub const PROP_OFFSET_3: &str = "--bg3-off";

const PASSIVE: ListenerOptions = ListenerOptions { passive: true };

/// Raw page geometry sampled by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    /// `window.scrollY`.
    pub scroll_y: f64,
    /// Document scroll height.
    pub scroll_height: f64,
    /// Viewport (client) height.
    pub viewport_height: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y,
            scroll_height,
            viewport_height,
        }
    }

    /// Normalized progress, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        scroll_progress(self.scroll_y, self.scroll_height, self.viewport_height)
    }
}

/// `scroll_y / (scroll_height - viewport_height)`, or `0` when not scrollable.
#[must_use]
pub fn scroll_progress(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scroll_max = scroll_height - viewport_height;
    if !(scroll_max > 0.0) || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / scroll_max).clamp(0.0, 1.0)
}

/// Scroll direction since the previous sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Non-decreasing `scrollY`.
    Down,
    Up,
}

impl Direction {
    #[must_use]
    pub fn between(previous_y: f64, y: f64) -> Self {
        if previous_y <= y { Self::Down } else { Self::Up }
    }

    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Down => 1.0,
            Self::Up => -1.0,
        }
    }
}

/// Derived hue angles (degrees) and parallax offsets (px).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub hue_a: f64,
    pub hue_b: f64,
    pub hue_c: f64,
    pub offset1: f64,
    pub offset2: f64,
    pub offset3: f64,
}

impl Default for VisualState {
    fn default() -> Self {
        Self::compute(0.0, Direction::Down, 1.0)
    }
}

impl VisualState {
    #[must_use]
    pub fn compute(p: f64, dir: Direction, amp: f64) -> Self {
        let d = dir.sign();
        Self {
            hue_a: HUE_A_BASE + (p * PI * 2.0).sin() * (HUE_A_SWING * amp),
            hue_b: HUE_B_BASE + (p * PI * 2.0).cos() * (HUE_B_SWING * amp),
            hue_c: HUE_C_BASE + (p * PI).sin() * (HUE_C_SWING * amp),
            offset1: (p * OFFSET_1_PX * amp) * d,
            offset2: (-p * OFFSET_2_PX * amp) * d,
            offset3: (p * OFFSET_3_PX * amp) * -d,
        }
    }

    /// The three hues, in `A, B, C` order.
    #[must_use]
    pub const fn hues(&self) -> [f64; 3] {
        [self.hue_a, self.hue_b, self.hue_c]
    }

    /// Root style properties in application order.
    #[must_use]
    pub fn css_properties(&self) -> [(&'static str, String); 6] {
        [
            (PROP_HUE_A, to_fixed(self.hue_a, 0)),
            (PROP_HUE_B, to_fixed(self.hue_b, 0)),
            (PROP_HUE_C, to_fixed(self.hue_c, 0)),
            (PROP_OFFSET_1, format!("{}px", to_fixed(self.offset1, 1))),
            (PROP_OFFSET_2, format!("{}px", to_fixed(self.offset2, 1))),
            (PROP_OFFSET_3, format!("{}px", to_fixed(self.offset3, 1))),
        ]
    }
}

/// Fixed-point decimal formatting with JavaScript `toFixed` semantics.
///
/// Exact ties round away from zero and negative zero prints unsigned.
#[must_use]
pub fn to_fixed(value: f64, digits: usize) -> String {
    let value = value + 0.0;
    let scale = 10f64.powi(digits as i32);
    let scaled = value * scale;
    // The product can land on .5 after rounding; only the exact expansion decides.
    if scaled.fract().abs() == 0.5 && is_exact_tie(value, digits) {
        return format!("{:.*}", digits, scaled.round() / scale);
    }
    format!("{value:.digits$}")
}

/// Every finite `f64` has a terminating decimal expansion of at most this
/// many fractional digits.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// True when `value` lies exactly halfway between two `digits`-place decimals.
fn is_exact_tie(value: f64, digits: usize) -> bool {
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let Some((_, fraction)) = exact.split_once('.') else {
        return false;
    };
    match fraction.as_bytes().split_at_checked(digits) {
        Some((_, [b'5', rest @ ..])) => rest.iter().all(|&b| b == b'0'),
        _ => false,
    }
}

/// Host events the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    Scroll,
    Resize,
    OrientationChange,
}

/// What the host should do after delivering an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// Schedule one animation frame, then call [`ScrollVisualEngine::on_frame`].
    Schedule,
    /// A frame is already pending; this event is folded into it.
    Coalesced,
    /// The engine is not listening for this event.
    Ignored,
}

/// Frame-throttled visual state engine.
#[derive(Debug, Clone)]
pub struct ScrollVisualEngine {
    prefs: MediaPreferences,
    last_scroll_y: f64,
    frame_pending: bool,
    attached: bool,
    state: VisualState,
}

impl ScrollVisualEngine {
    #[must_use]
    pub fn new(prefs: MediaPreferences) -> Self {
        Self {
            prefs,
            last_scroll_y: 0.0,
            frame_pending: false,
            attached: false,
            state: VisualState::default(),
        }
    }

    /// Preferences captured at attach time; they decide listener wiring.
    #[must_use]
    pub const fn preferences(&self) -> MediaPreferences {
        self.prefs
    }

    #[must_use]
    pub const fn state(&self) -> VisualState {
        self.state
    }

    #[must_use]
    pub const fn last_scroll_y(&self) -> f64 {
        self.last_scroll_y
    }

    #[must_use]
    pub const fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Declare listeners. Scroll is skipped entirely under reduced motion.
    pub fn attach(&mut self, subs: &mut Subscriptions) {
        if !self.prefs.reduced_motion {
            subs.subscribe(Subscriber::ScrollVisuals, EventKind::Scroll, PASSIVE);
        }
        subs.subscribe(Subscriber::ScrollVisuals, EventKind::Resize, PASSIVE);
        subs.subscribe(Subscriber::ScrollVisuals, EventKind::OrientationChange, PASSIVE);
        self.attached = true;
        crate::info!(
            reduced_motion = self.prefs.reduced_motion,
            mobile = self.prefs.mobile,
            "scroll visuals attached"
        );
    }

    pub fn detach(&mut self, subs: &mut Subscriptions) {
        subs.unsubscribe_all(Subscriber::ScrollVisuals);
        self.attached = false;
        self.frame_pending = false;
    }

    /// Deliver a host event; returns whether a frame must be scheduled.
    pub fn handle(&mut self, event: ViewportEvent) -> FrameRequest {
        if !self.attached {
            return FrameRequest::Ignored;
        }
        if event == ViewportEvent::Scroll && self.prefs.reduced_motion {
            return FrameRequest::Ignored;
        }
        if self.frame_pending {
            return FrameRequest::Coalesced;
        }
        self.frame_pending = true;
        FrameRequest::Schedule
    }

    /// Recompute on the scheduled frame with freshly sampled inputs.
    pub fn on_frame(&mut self, metrics: ScrollMetrics, prefs: MediaPreferences) -> VisualState {
        self.update(metrics, prefs)
    }

    /// Recompute immediately (initialization path).
    pub fn update(&mut self, metrics: ScrollMetrics, prefs: MediaPreferences) -> VisualState {
        let p = metrics.progress();
        let y = if metrics.scroll_y.is_finite() {
            metrics.scroll_y
        } else {
            0.0
        };
        let dir = Direction::between(self.last_scroll_y, y);
        self.last_scroll_y = y;
        self.state = VisualState::compute(p, dir, prefs.amp());
        self.frame_pending = false;
        crate::trace!(p, y, ?dir, "visual state recomputed");
        self.state
    }
}
