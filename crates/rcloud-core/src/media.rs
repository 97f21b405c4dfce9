#![forbid(unsafe_code)]

//! Media-query derived motion preferences.

/// Damping applied on coarse-pointer or narrow viewports.
pub const MOBILE_FACTOR: f64 = 0.6;
/// Damping applied under `prefers-reduced-motion: reduce`.
pub const REDUCE_FACTOR: f64 = 0.25;
/// Alpha multiplier for ink burst colors on mobile.
pub const MOBILE_SOFTNESS: f64 = 0.85;

/// Snapshot of the two media queries every visual component consults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaPreferences {
    /// `(pointer: coarse), (max-width: 768px)` matches.
    pub mobile: bool,
    /// `(prefers-reduced-motion: reduce)` matches.
    pub reduced_motion: bool,
}

impl MediaPreferences {
    #[must_use]
    pub const fn new(mobile: bool, reduced_motion: bool) -> Self {
        Self {
            mobile,
            reduced_motion,
        }
    }

    #[must_use]
    pub const fn desktop() -> Self {
        Self::new(false, false)
    }

    #[must_use]
    pub fn mobile_factor(self) -> f64 {
        if self.mobile { MOBILE_FACTOR } else { 1.0 }
    }

    #[must_use]
    pub fn reduce_factor(self) -> f64 {
        if self.reduced_motion {
            REDUCE_FACTOR
        } else {
            1.0
        }
    }

    /// Combined animation amplitude.
    #[must_use]
    pub fn amp(self) -> f64 {
        self.mobile_factor() * self.reduce_factor()
    }

    /// Ink burst alpha multiplier.
    #[must_use]
    pub fn softness(self) -> f64 {
        if self.mobile { MOBILE_SOFTNESS } else { 1.0 }
    }
}
