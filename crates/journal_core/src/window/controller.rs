//! Scroll window controller.
//!
//! # Responsibility
//! - Own the mounted month window and the per-panel height cache.
//! - Extend the window near either scroll edge and prune the far side.
//! - Produce the scroll corrections that keep content visually anchored.
//! - Coalesce scroll signals into at most one settle pass per frame.
//!
//! # Invariants
//! - The window is a non-empty, contiguous, strictly ascending run of offsets.
//! - After any settle pass, `len() <= max_keep`.
//! - Pruning never removes from the side that just grew, unless both sides grew.
//! - Heights are get-or-zero; unmeasured panels never block a correction.
//!
//! # Correction protocol
//! 1. Host calls [`ScrollWindowController::request_settle`] on every scroll
//!    signal and schedules one frame task when it returns `true`.
//! 2. The frame task calls [`ScrollWindowController::on_frame`] with fresh
//!    metrics, then mounts/unmounts panels per the returned outcome.
//! 3. During the layout pass that reflects new panels, the host reports their
//!    heights and applies [`ScrollWindowController::take_layout_correction`]
//!    synchronously.
//! 4. On the following paint, the host applies
//!    [`ScrollWindowController::take_paint_correction`].
//!
//! A new settle pass discards corrections not yet taken.

use crate::config::{ConfigError, PrependEstimate, WindowConfig};
use crate::date::MonthOffset;
use log::debug;
use std::collections::HashMap;

/// Scroll surface measurements read by the host at settle time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Distance between the bottom of the viewport and the end of content.
    pub fn distance_to_bottom(&self) -> f64 {
        self.scroll_height - (self.scroll_top + self.client_height)
    }
}

/// Window changes made by one settle pass, in ascending order per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettleOutcome {
    pub near_top: bool,
    pub near_bottom: bool,
    pub prepended: Vec<MonthOffset>,
    pub appended: Vec<MonthOffset>,
    pub removed_front: Vec<MonthOffset>,
    pub removed_back: Vec<MonthOffset>,
}

impl SettleOutcome {
    pub fn changed(&self) -> bool {
        !(self.prepended.is_empty()
            && self.appended.is_empty()
            && self.removed_front.is_empty()
            && self.removed_back.is_empty())
    }

    pub fn removed(&self) -> impl Iterator<Item = MonthOffset> + '_ {
        self.removed_front
            .iter()
            .chain(self.removed_back.iter())
            .copied()
    }
}

/// Scroll offset adjustment owed to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollCorrection {
    /// Content was prepended above the viewport; add to the scroll offset
    /// synchronously with the layout pass.
    Forward(f64),
    /// Content was removed above the viewport; subtract from the scroll
    /// offset on the next paint.
    Backward(f64),
}

impl ScrollCorrection {
    /// Signed amount to add to the scroll offset.
    pub fn delta(&self) -> f64 {
        match self {
            Self::Forward(pixels) => *pixels,
            Self::Backward(pixels) => -*pixels,
        }
    }
}

/// Absolute scroll request for the host surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTarget {
    pub top: f64,
    pub smooth: bool,
}

/// Owner of the mounted month window and its measurement cache.
#[derive(Debug, Clone)]
pub struct ScrollWindowController {
    config: WindowConfig,
    window: Vec<MonthOffset>,
    heights: HashMap<MonthOffset, f64>,
    metrics: ScrollMetrics,
    settle_pending: bool,
    pending_prepend: Vec<MonthOffset>,
    pending_removal: Option<f64>,
}

impl ScrollWindowController {
    /// Creates the controller with the initial window around offset 0.
    ///
    /// # Errors
    /// - Any window constraint violation from [`WindowConfig::validate`].
    pub fn new(config: WindowConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let before = config.initial_before as MonthOffset;
        let after = config.initial_after as MonthOffset;
        Ok(Self {
            window: (-before..=after).collect(),
            config,
            heights: HashMap::new(),
            metrics: ScrollMetrics::default(),
            settle_pending: false,
            pending_prepend: Vec::new(),
            pending_removal: None,
        })
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Mounted offsets in ascending order.
    pub fn offsets(&self) -> &[MonthOffset] {
        &self.window
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn contains(&self, offset: MonthOffset) -> bool {
        self.index_of(offset).is_some()
    }

    /// Last observed scroll offset, including applied corrections.
    pub fn scroll_top(&self) -> f64 {
        self.metrics.scroll_top
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    /// Records host measurements without running a settle pass.
    pub fn observe(&mut self, metrics: ScrollMetrics) {
        self.metrics = metrics;
    }

    /// Records the measured height of a panel. Idempotent.
    ///
    /// Negative or non-finite measurements are stored as zero.
    pub fn report_height(&mut self, offset: MonthOffset, pixels: f64) {
        let pixels = if pixels.is_finite() { pixels.max(0.0) } else { 0.0 };
        self.heights.insert(offset, pixels);
    }

    /// Last measured height of a panel, or zero when never measured.
    pub fn height(&self, offset: MonthOffset) -> f64 {
        self.heights.get(&offset).copied().unwrap_or(0.0)
    }

    pub fn is_measured(&self, offset: MonthOffset) -> bool {
        self.heights.contains_key(&offset)
    }

    /// Marks a settle pass as pending.
    ///
    /// Returns `true` when the caller should schedule a frame task, and
    /// `false` when a pass is already pending and this signal is dropped.
    pub fn request_settle(&mut self) -> bool {
        if self.settle_pending {
            return false;
        }
        self.settle_pending = true;
        true
    }

    pub fn settle_pending(&self) -> bool {
        self.settle_pending
    }

    /// Runs the pending settle pass, if any, and clears the pending flag.
    pub fn on_frame(&mut self, metrics: ScrollMetrics) -> Option<SettleOutcome> {
        if !self.settle_pending {
            return None;
        }
        self.settle_pending = false;
        Some(self.on_scroll_settled(metrics))
    }

    /// Evaluates scroll position against the edge threshold and extends or
    /// prunes the window.
    ///
    /// Supersedes any correction from an earlier pass that was not yet taken.
    pub fn on_scroll_settled(&mut self, metrics: ScrollMetrics) -> SettleOutcome {
        self.metrics = metrics;
        self.pending_prepend.clear();
        self.pending_removal = None;

        let threshold = self.config.edge_threshold;
        let mut outcome = SettleOutcome {
            near_top: metrics.scroll_top < threshold,
            near_bottom: metrics.distance_to_bottom() < threshold,
            ..SettleOutcome::default()
        };
        if !outcome.near_top && !outcome.near_bottom {
            return outcome;
        }
        let (Some(&first), Some(&last)) = (self.window.first(), self.window.last()) else {
            return outcome;
        };

        let extend = self.config.extend_by as MonthOffset;
        if outcome.near_top {
            outcome.prepended = (first - extend..first).collect();
            let mut grown = outcome.prepended.clone();
            grown.append(&mut self.window);
            self.window = grown;
        }
        if outcome.near_bottom {
            outcome.appended = (last + 1..=last + extend).collect();
            self.window.extend(outcome.appended.iter().copied());
        }

        let max_keep = self.config.max_keep as usize;
        if self.window.len() > max_keep {
            let over = self.window.len() - max_keep;
            let (front, back) = prune_split(over, outcome.near_top, outcome.near_bottom);
            outcome.removed_front = self.window.drain(..front).collect();
            outcome.removed_back = self.window.split_off(self.window.len() - back);
        }

        if !outcome.removed_front.is_empty() {
            let removed_height = outcome
                .removed_front
                .iter()
                .map(|offset| self.height(*offset))
                .sum::<f64>();
            self.pending_removal = Some(removed_height);
        }
        self.pending_prepend = outcome
            .prepended
            .iter()
            .copied()
            .filter(|offset| self.contains(*offset))
            .collect();

        debug!(
            "event=window_extend module=window status=ok prepended={} appended={} removed_front={} removed_back={} len={}",
            outcome.prepended.len(),
            outcome.appended.len(),
            outcome.removed_front.len(),
            outcome.removed_back.len(),
            self.window.len()
        );
        outcome
    }

    /// Forward correction for panels prepended by the last settle pass.
    ///
    /// Call during the layout pass that mounts them, after their heights are
    /// reported. Unmeasured panels contribute per the configured
    /// [`PrependEstimate`]. Returns `None` when nothing is owed.
    pub fn take_layout_correction(&mut self) -> Option<ScrollCorrection> {
        if self.pending_prepend.is_empty() {
            return None;
        }
        let prepended = std::mem::take(&mut self.pending_prepend);
        let fallback = match self.config.prepend_estimate {
            PrependEstimate::CachedOnly => 0.0,
            PrependEstimate::MeanOfMeasured => self.mean_measured_height(),
        };
        let pixels = prepended
            .iter()
            .map(|offset| self.heights.get(offset).copied().unwrap_or(fallback))
            .sum::<f64>();
        if pixels <= 0.0 {
            return None;
        }
        self.metrics.scroll_top += pixels;
        Some(ScrollCorrection::Forward(pixels))
    }

    /// Backward correction for panels removed from the front by the last
    /// settle pass. Call on the paint after the removal is laid out.
    pub fn take_paint_correction(&mut self) -> Option<ScrollCorrection> {
        let pixels = self.pending_removal.take()?;
        if pixels <= 0.0 {
            return None;
        }
        self.metrics.scroll_top = (self.metrics.scroll_top - pixels).max(0.0);
        Some(ScrollCorrection::Backward(pixels))
    }

    /// Top edge of a mounted panel relative to the start of content.
    pub fn panel_top(&self, offset: MonthOffset) -> Option<f64> {
        let index = self.index_of(offset)?;
        Some(
            self.window[..index]
                .iter()
                .map(|offset| self.height(*offset))
                .sum(),
        )
    }

    /// Smooth scroll target aligning the panel top with the viewport top.
    ///
    /// Unmounted offsets are a no-op and yield `None`.
    pub fn jump_to(&self, offset: MonthOffset) -> Option<ScrollTarget> {
        let Some(top) = self.panel_top(offset) else {
            debug!("event=window_jump module=window status=noop offset={offset} reason=unmounted");
            return None;
        };
        Some(ScrollTarget { top, smooth: true })
    }

    fn index_of(&self, offset: MonthOffset) -> Option<usize> {
        let first = *self.window.first()?;
        let index = usize::try_from(offset.checked_sub(first)?).ok()?;
        (index < self.window.len()).then_some(index)
    }

    fn mean_measured_height(&self) -> f64 {
        let (sum, count) = self
            .window
            .iter()
            .filter_map(|offset| self.heights.get(offset))
            .fold((0.0, 0u32), |(sum, count), height| (sum + height, count + 1));
        if count == 0 {
            0.0
        } else {
            sum / f64::from(count)
        }
    }
}

/// Splits `over` excess offsets into (front, back) removal counts.
fn prune_split(over: usize, near_top: bool, near_bottom: bool) -> (usize, usize) {
    match (near_top, near_bottom) {
        (false, true) => (over, 0),
        (true, false) => (0, over),
        _ => {
            let front = over / 2;
            (front, over - front)
        }
    }
}
