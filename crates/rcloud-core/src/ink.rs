#![forbid(unsafe_code)]

//! Decorative "ink burst" elements spawned when sections scroll into view.
//!
//! A burst has no semantic meaning and no persisted state: it is a colored,
//! blurred blob that removes itself after a fixed lifetime. Colors are the
//! current [`crate::visual::VisualState`] hues plus independent jitter.
//!
//! The effect is a no-op whenever reduced motion is preferred. Preferences are
//! passed per call since the host media queries can change at any time.

use core::fmt;
use core::time::Duration;

use crate::clock::TimerQueue;
use crate::config::Timings;
use crate::media::MediaPreferences;
use crate::rng::RandomSource;
use crate::subscriptions::{EventKind, ListenerOptions, Subscriber, Subscriptions};
use crate::visual::to_fixed;

/// Hues used when the root style properties are missing or unparseable.
pub const FALLBACK_HUES: [f64; 3] = [240.0, 220.0, 200.0];
/// Visibility ratio that counts as "entered" on mobile-class viewports.
pub const MOBILE_THRESHOLD: f64 = 0.5;
pub const DESKTOP_THRESHOLD: f64 = 0.35;

/// Burst anchor range within the section box, as a fraction of its size.
const ANCHOR_MIN: f64 = 0.2;
const ANCHOR_MAX: f64 = 0.8;
const DUPLICATE_SPREAD_X: f64 = 80.0;
const DUPLICATE_SPREAD_Y: f64 = 60.0;
/// `Math.random() > 0.5` gate for the second burst.
const DUPLICATE_GATE: f64 = 0.5;

/// Viewport-relative bounding box of an observed section.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SectionRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SectionRect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// One intersection observer entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub is_intersecting: bool,
    pub rect: SectionRect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// CSS `hsla()` color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub hue: f64,
    pub saturation: u8,
    pub lightness: u8,
    pub alpha: f64,
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsla({}, {}%, {}%, {})",
            to_fixed(self.hue, 0),
            self.saturation,
            self.lightness,
            self.alpha
        )
    }
}

/// Per-color recipe: which base hue, fixed shift, jitter, saturation,
/// lightness and desktop alpha.
struct Swatch {
    base: usize,
    shift: f64,
    jitter: f64,
    saturation: u8,
    lightness: u8,
    alpha: f64,
}

const SWATCHES: [Swatch; 5] = [
    Swatch { base: 0, shift: 0.0, jitter: 10.0, saturation: 85, lightness: 62, alpha: 0.28 },
    Swatch { base: 1, shift: 0.0, jitter: 8.0, saturation: 80, lightness: 62, alpha: 0.26 },
    Swatch { base: 2, shift: 0.0, jitter: 8.0, saturation: 85, lightness: 60, alpha: 0.22 },
    Swatch { base: 0, shift: 110.0, jitter: 6.0, saturation: 80, lightness: 62, alpha: 0.18 },
    Swatch { base: 1, shift: -140.0, jitter: 6.0, saturation: 90, lightness: 60, alpha: 0.16 },
];

/// Desktop alpha of each color slot.
#[must_use]
pub fn desktop_alphas() -> [f64; 5] {
    SWATCHES.map(|s| s.alpha)
}

/// Size ranges, `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryRanges {
    pub width: (f64, f64),
    pub height: (f64, f64),
    pub blur: (f64, f64),
    pub rotation: (f64, f64),
}

impl GeometryRanges {
    #[must_use]
    pub const fn for_viewport(mobile: bool) -> Self {
        if mobile {
            Self {
                width: (340.0, 520.0),
                height: (100.0, 160.0),
                blur: (12.0, 20.0),
                rotation: (-10.0, 14.0),
            }
        } else {
            Self {
                width: (420.0, 640.0),
                height: (120.0, 200.0),
                blur: (16.0, 26.0),
                rotation: (-10.0, 14.0),
            }
        }
    }
}

/// Fully resolved burst element.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstSpec {
    pub at: Point,
    pub colors: [Hsla; 5],
    pub width: f64,
    pub height: f64,
    pub rotation_deg: f64,
    pub blur: f64,
}

impl BurstSpec {
    /// Inline style properties for the burst element.
    #[must_use]
    pub fn css_properties(&self) -> Vec<(&'static str, String)> {
        let mut props = Vec::with_capacity(11);
        props.push(("left", format!("{}px", self.at.x)));
        props.push(("top", format!("{}px", self.at.y)));
        for (name, color) in ["--c1", "--c2", "--c3", "--c4", "--c5"]
            .into_iter()
            .zip(self.colors.iter())
        {
            props.push((name, color.to_string()));
        }
        props.push(("--w", format!("{}px", self.width)));
        props.push(("--h", format!("{}px", self.height)));
        props.push(("--rot", format!("{}deg", self.rotation_deg)));
        props.push(("--blur", format!("{}px", self.blur)));
        props
    }
}

/// Bursts to spawn for one intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstTrigger {
    pub primary: Point,
    /// Second burst location and its delay.
    pub duplicate: Option<(Point, Duration)>,
}

/// Leading-number parse with `parseFloat(..) || fallback` semantics.
///
/// Zero, NaN and unparseable input all yield `fallback`.
#[must_use]
pub fn parse_hue(raw: &str, fallback: f64) -> f64 {
    let trimmed = raw.trim_start();
    let numeric_len = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    let parsed = (1..=numeric_len)
        .rev()
        .find_map(|end| trimmed[..end].parse::<f64>().ok());
    match parsed {
        Some(v) if v != 0.0 && v.is_finite() => v,
        _ => fallback,
    }
}

/// Read hues from the three root property values.
#[must_use]
pub fn hues_from_css(hue_a: &str, hue_b: &str, hue_c: &str) -> [f64; 3] {
    [
        parse_hue(hue_a, FALLBACK_HUES[0]),
        parse_hue(hue_b, FALLBACK_HUES[1]),
        parse_hue(hue_c, FALLBACK_HUES[2]),
    ]
}

/// Ink burst planner.
#[derive(Debug, Clone)]
pub struct InkBurstEffect {
    threshold: f64,
    timings: Timings,
    attached: bool,
}

impl InkBurstEffect {
    /// The visibility threshold is fixed from `prefs` at construction.
    #[must_use]
    pub fn new(prefs: MediaPreferences, timings: Timings) -> Self {
        Self {
            threshold: if prefs.mobile {
                MOBILE_THRESHOLD
            } else {
                DESKTOP_THRESHOLD
            },
            timings,
            attached: false,
        }
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn lifetime(&self) -> Duration {
        Duration::from_millis(u64::from(self.timings.burst_lifetime_ms))
    }

    #[must_use]
    pub fn duplicate_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.timings.burst_duplicate_delay_ms))
    }

    pub fn attach(&mut self, subs: &mut Subscriptions) {
        subs.subscribe(
            Subscriber::InkBursts,
            EventKind::Intersection,
            ListenerOptions { passive: true },
        );
        self.attached = true;
    }

    pub fn detach(&mut self, subs: &mut Subscriptions) {
        subs.unsubscribe_all(Subscriber::InkBursts);
        self.attached = false;
    }

    /// Decide where bursts go for one intersection entry.
    ///
    /// Returns `None` when the entry is leaving view, the effect is detached,
    /// or reduced motion is preferred.
    pub fn on_intersection<R: RandomSource>(
        &self,
        entry: IntersectionEntry,
        prefs: MediaPreferences,
        rng: &mut R,
    ) -> Option<BurstTrigger> {
        if !self.attached || !entry.is_intersecting || prefs.reduced_motion {
            return None;
        }
        let rect = entry.rect;
        let primary = Point {
            x: rect.left + rect.width * rng.range(ANCHOR_MIN, ANCHOR_MAX),
            y: rect.top + rect.height * rng.range(ANCHOR_MIN, ANCHOR_MAX),
        };
        let duplicate = (!prefs.mobile && rng.above(DUPLICATE_GATE)).then(|| {
            let at = Point {
                x: primary.x + rng.range(-DUPLICATE_SPREAD_X, DUPLICATE_SPREAD_X),
                y: primary.y + rng.range(-DUPLICATE_SPREAD_Y, DUPLICATE_SPREAD_Y),
            };
            (at, self.duplicate_delay())
        });
        Some(BurstTrigger { primary, duplicate })
    }

    /// Resolve one burst element at `at`; `None` under reduced motion.
    pub fn spawn<R: RandomSource>(
        &self,
        at: Point,
        hues: [f64; 3],
        prefs: MediaPreferences,
        rng: &mut R,
    ) -> Option<BurstSpec> {
        if prefs.reduced_motion {
            return None;
        }
        let softness = prefs.softness();
        let colors = SWATCHES.each_ref().map(|s| Hsla {
            hue: hues[s.base] + s.shift + rng.range(-s.jitter, s.jitter),
            saturation: s.saturation,
            lightness: s.lightness,
            alpha: s.alpha * softness,
        });
        let ranges = GeometryRanges::for_viewport(prefs.mobile);
        let width = rng.range(ranges.width.0, ranges.width.1);
        let height = rng.range(ranges.height.0, ranges.height.1);
        let blur = rng.range(ranges.blur.0, ranges.blur.1);
        let rotation_deg = rng.range(ranges.rotation.0, ranges.rotation.1);
        crate::debug!(x = at.x, y = at.y, "ink burst spawned");
        Some(BurstSpec {
            at,
            colors,
            width,
            height,
            rotation_deg,
            blur,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Host-driven burst layer
// ─────────────────────────────────────────────────────────────────────────────

/// Identifier of a live burst in an [`InkBurstLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BurstId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
enum LayerTask {
    SpawnDuplicate(Point),
    Remove(BurstId),
}

/// Change applied to the layer container.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerChange {
    Added(BurstId, BurstSpec),
    Removed(BurstId),
}

/// Burst container driven by a deterministic clock.
///
/// Mirrors the browser layer: each burst is removed `lifetime` after it was
/// added, and duplicate bursts appear after their delay. Timers are
/// fire-and-forget.
#[derive(Debug)]
pub struct InkBurstLayer {
    effect: InkBurstEffect,
    timers: TimerQueue<LayerTask>,
    live: Vec<BurstId>,
    next_id: u64,
}

impl InkBurstLayer {
    #[must_use]
    pub fn new(effect: InkBurstEffect) -> Self {
        Self {
            effect,
            timers: TimerQueue::new(),
            live: Vec::new(),
            next_id: 0,
        }
    }

    #[must_use]
    pub fn effect(&self) -> &InkBurstEffect {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut InkBurstEffect {
        &mut self.effect
    }

    /// Ids of bursts currently in the layer, oldest first.
    #[must_use]
    pub fn live(&self) -> &[BurstId] {
        &self.live
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Handle an intersection entry at the current time.
    pub fn on_intersection<R: RandomSource>(
        &mut self,
        entry: IntersectionEntry,
        hues: [f64; 3],
        prefs: MediaPreferences,
        rng: &mut R,
    ) -> Vec<LayerChange> {
        let mut changes = Vec::new();
        let Some(trigger) = self.effect.on_intersection(entry, prefs, rng) else {
            return changes;
        };
        self.add(trigger.primary, hues, prefs, rng, &mut changes);
        if let Some((at, delay)) = trigger.duplicate {
            self.timers.schedule(delay, LayerTask::SpawnDuplicate(at));
        }
        changes
    }

    /// Advance time, firing due duplicates and removals.
    ///
    /// `hues` and `prefs` are sampled now, as the browser reads them when the
    /// delayed burst actually spawns.
    pub fn advance<R: RandomSource>(
        &mut self,
        dt: Duration,
        hues: [f64; 3],
        prefs: MediaPreferences,
        rng: &mut R,
    ) -> Vec<LayerChange> {
        let mut changes = Vec::new();
        for task in self.timers.advance(dt) {
            match task {
                LayerTask::SpawnDuplicate(at) => self.add(at, hues, prefs, rng, &mut changes),
                LayerTask::Remove(id) => {
                    self.live.retain(|live| *live != id);
                    changes.push(LayerChange::Removed(id));
                }
            }
        }
        changes
    }

    fn add<R: RandomSource>(
        &mut self,
        at: Point,
        hues: [f64; 3],
        prefs: MediaPreferences,
        rng: &mut R,
        changes: &mut Vec<LayerChange>,
    ) {
        let Some(spec) = self.effect.spawn(at, hues, prefs, rng) else {
            return;
        };
        let id = BurstId(self.next_id);
        self.next_id += 1;
        self.live.push(id);
        let lifetime = self.effect.lifetime();
        self.timers.schedule(lifetime, LayerTask::Remove(id));
        changes.push(LayerChange::Added(id, spec));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRandom;
    use pretty_assertions::assert_eq;

    const DESKTOP: MediaPreferences = MediaPreferences::desktop();
    const MOBILE: MediaPreferences = MediaPreferences::new(true, false);
    const REDUCED: MediaPreferences = MediaPreferences::new(false, true);

    fn attached(prefs: MediaPreferences) -> InkBurstEffect {
        let mut effect = InkBurstEffect::new(prefs, Timings::default());
        effect.attach(&mut Subscriptions::new());
        effect
    }

    fn visible(rect: SectionRect) -> IntersectionEntry {
        IntersectionEntry {
            is_intersecting: true,
            rect,
        }
    }

    #[test]
    fn threshold_depends_on_viewport() {
        assert_eq!(InkBurstEffect::new(MOBILE, Timings::default()).threshold(), 0.5);
        assert_eq!(InkBurstEffect::new(DESKTOP, Timings::default()).threshold(), 0.35);
    }

    #[test]
    fn parse_hue_matches_parse_float_or_fallback() {
        assert_eq!(parse_hue("232", 240.0), 232.0);
        assert_eq!(parse_hue(" 245.5px", 240.0), 245.5);
        assert_eq!(parse_hue("", 240.0), 240.0);
        assert_eq!(parse_hue("abc", 220.0), 220.0);
        assert_eq!(parse_hue("0", 200.0), 200.0);
        assert_eq!(hues_from_css("210", "", "x"), [210.0, 220.0, 200.0]);
    }

    #[test]
    fn primary_lands_in_central_band() {
        let effect = attached(DESKTOP);
        let rect = SectionRect::new(100.0, 50.0, 1000.0, 400.0);
        // 0.0 -> 20%, 0.999.. -> ~80%, duplicate gate 0.0 -> no duplicate.
        let mut rng = SequenceRandom::new([0.0, 1.0, 0.0]);
        let trigger = effect.on_intersection(visible(rect), DESKTOP, &mut rng).unwrap();
        assert_eq!(trigger.primary.x, 300.0);
        assert!((trigger.primary.y - 370.0).abs() < 1e-6);
        assert_eq!(trigger.duplicate, None);
    }

    #[test]
    fn duplicate_scheduled_on_desktop_when_gate_passes() {
        let effect = attached(DESKTOP);
        let rect = SectionRect::new(0.0, 0.0, 100.0, 100.0);
        let mut rng = SequenceRandom::new([0.5, 0.5, 0.9, 0.5, 0.5]);
        let trigger = effect.on_intersection(visible(rect), DESKTOP, &mut rng).unwrap();
        let (at, delay) = trigger.duplicate.unwrap();
        assert_eq!(delay, Duration::from_millis(180));
        assert_eq!(at, trigger.primary);
    }

    #[test]
    fn never_duplicates_on_mobile() {
        let effect = attached(MOBILE);
        let mut rng = SequenceRandom::new([0.99]);
        let trigger = effect
            .on_intersection(visible(SectionRect::new(0.0, 0.0, 10.0, 10.0)), MOBILE, &mut rng)
            .unwrap();
        assert_eq!(trigger.duplicate, None);
    }

    #[test]
    fn leaving_view_and_reduced_motion_are_noops() {
        let effect = attached(DESKTOP);
        let mut rng = SequenceRandom::new([0.5]);
        let leaving = IntersectionEntry {
            is_intersecting: false,
            rect: SectionRect::default(),
        };
        assert_eq!(effect.on_intersection(leaving, DESKTOP, &mut rng), None);
        let entry = visible(SectionRect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(effect.on_intersection(entry, REDUCED, &mut rng), None);
        let at = Point { x: 1.0, y: 2.0 };
        assert_eq!(effect.spawn(at, FALLBACK_HUES, REDUCED, &mut rng), None);
    }

    #[test]
    fn spawn_colors_and_geometry() {
        let effect = attached(DESKTOP);
        let mut rng = SequenceRandom::new([0.5]);
        let spec = effect
            .spawn(Point { x: 10.0, y: 20.0 }, [210.0, 260.0, 190.0], DESKTOP, &mut rng)
            .unwrap();
        // Mid-range jitter is zero.
        assert_eq!(spec.colors[0].to_string(), "hsla(210, 85%, 62%, 0.28)");
        assert_eq!(spec.colors[1].to_string(), "hsla(260, 80%, 62%, 0.26)");
        assert_eq!(spec.colors[2].to_string(), "hsla(190, 85%, 60%, 0.22)");
        assert_eq!(spec.colors[3].to_string(), "hsla(320, 80%, 62%, 0.18)");
        assert_eq!(spec.colors[4].to_string(), "hsla(120, 90%, 60%, 0.16)");
        assert_eq!(spec.width, 530.0);
        assert_eq!(spec.height, 160.0);
        assert_eq!(spec.blur, 21.0);
        assert_eq!(spec.rotation_deg, 2.0);

        let props = spec.css_properties();
        assert_eq!(props[0], ("left", "10px".to_owned()));
        assert_eq!(props[7], ("--w", "530px".to_owned()));
        assert_eq!(props[9], ("--rot", "2deg".to_owned()));
    }

    #[test]
    fn mobile_softens_alpha_and_shrinks_geometry() {
        let effect = attached(MOBILE);
        let mut rng = SequenceRandom::new([0.0]);
        let spec = effect
            .spawn(Point { x: 0.0, y: 0.0 }, FALLBACK_HUES, MOBILE, &mut rng)
            .unwrap();
        for (color, desktop) in spec.colors.iter().zip(desktop_alphas()) {
            assert!(color.alpha < desktop);
        }
        assert_eq!(spec.width, 340.0);
        assert_eq!(spec.blur, 12.0);
    }

    #[test]
    fn layer_removes_bursts_after_lifetime() {
        let mut layer = InkBurstLayer::new(attached(DESKTOP));
        // Gate sample 0.9 > 0.5 schedules a duplicate.
        let mut rng = SequenceRandom::new([0.5, 0.5, 0.9]);
        let entry = visible(SectionRect::new(0.0, 0.0, 100.0, 100.0));

        let added = layer.on_intersection(entry, FALLBACK_HUES, DESKTOP, &mut rng);
        assert!(matches!(added.as_slice(), [LayerChange::Added(BurstId(0), _)]));
        assert_eq!(layer.live(), &[BurstId(0)]);

        let dup = layer.advance(Duration::from_millis(180), FALLBACK_HUES, DESKTOP, &mut rng);
        assert!(matches!(dup.as_slice(), [LayerChange::Added(BurstId(1), _)]));

        let gone = layer.advance(Duration::from_millis(1420), FALLBACK_HUES, DESKTOP, &mut rng);
        assert_eq!(gone, vec![LayerChange::Removed(BurstId(0))]);

        let gone = layer.advance(Duration::from_millis(180), FALLBACK_HUES, DESKTOP, &mut rng);
        assert_eq!(gone, vec![LayerChange::Removed(BurstId(1))]);
        assert!(layer.live().is_empty());
        assert_eq!(layer.pending_timers(), 0);
    }

    #[test]
    fn repeated_entries_retrigger() {
        let mut layer = InkBurstLayer::new(attached(MOBILE));
        let mut rng = SequenceRandom::new([0.3]);
        let entry = visible(SectionRect::new(0.0, 0.0, 100.0, 100.0));
        for _ in 0..3 {
            layer.on_intersection(entry, FALLBACK_HUES, MOBILE, &mut rng);
        }
        assert_eq!(layer.live().len(), 3);
    }
}
