//! Infinite-scrolling calendar surface.
//!
//! # Responsibility
//! - Hold the session base date, header month, filter text and open entry.
//! - Build month panel view models joined with the filtered entry index.
//! - Drive settle passes and header recomputation from host frame callbacks.
//!
//! # Invariants
//! - The window controller is owned here and only read through snapshots.
//! - The header is recomputed after every settle pass and every extension.
//! - Keyboard scrolling is suppressed while an entry is open or text has focus.

use crate::config::{CalendarConfig, ConfigError};
use crate::date::{day_key, is_same_month, month_grid, month_label, month_start, DayKey, MonthOffset};
use crate::model::entry::{EntryId, JournalEntry};
use crate::search::entry_index::EntryIndex;
use crate::surface::keyboard::{KeyCommand, KeyFocus, ModalCommand, ScrollAction};
use crate::window::controller::{
    ScrollCorrection, ScrollMetrics, ScrollWindowController, SettleOutcome,
};
use crate::window::visibility::{most_visible, Rect};
use chrono::NaiveDate;
use log::debug;

/// One rendered grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub key: DayKey,
    /// Day belongs to a neighbouring month.
    pub dim: bool,
    pub entry_ids: Vec<EntryId>,
}

/// View model of one mounted month panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthPanel {
    pub offset: MonthOffset,
    pub month_start: NaiveDate,
    pub label: String,
    pub weeks: Vec<[DayCell; 7]>,
}

/// Result of one host frame callback that ran a settle pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameUpdate {
    pub outcome: SettleOutcome,
    /// New header label, present only when it changed.
    pub header_label: Option<String>,
}

/// Composition root of the scroll region.
pub struct CalendarSurface {
    config: CalendarConfig,
    base: NaiveDate,
    controller: ScrollWindowController,
    header_index: MonthOffset,
    entries: Vec<JournalEntry>,
    filter_text: String,
    index: EntryIndex,
    open_entry: Option<EntryId>,
    row_height: Option<f64>,
}

impl CalendarSurface {
    /// Creates the surface for a session starting at `base`.
    ///
    /// `base` also stands in for "today" when entry dates are malformed.
    pub fn new(config: CalendarConfig, base: NaiveDate) -> Result<Self, ConfigError> {
        config.validate()?;
        let controller = ScrollWindowController::new(config.window.clone())?;
        Ok(Self {
            config,
            base,
            controller,
            header_index: 0,
            entries: Vec::new(),
            filter_text: String::new(),
            index: EntryIndex::default(),
            open_entry: None,
            row_height: None,
        })
    }

    pub fn base(&self) -> NaiveDate {
        self.base
    }

    pub fn controller(&self) -> &ScrollWindowController {
        &self.controller
    }

    pub fn header_index(&self) -> MonthOffset {
        self.header_index
    }

    /// Label of the month currently judged most visible.
    pub fn header_label(&self) -> String {
        month_label(month_start(self.base, self.header_index))
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn index(&self) -> &EntryIndex {
        &self.index
    }

    /// Replaces the entry snapshot and regroups it under the current filter.
    ///
    /// Closes the open entry when it no longer exists.
    pub fn sync_entries(&mut self, entries: &[JournalEntry]) {
        self.entries = entries.to_vec();
        if let Some(open) = &self.open_entry {
            if !self.entries.iter().any(|entry| &entry.id == open) {
                self.open_entry = None;
            }
        }
        self.rebuild_index();
    }

    /// Updates the filter text and regroups the snapshot.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
        self.rebuild_index();
    }

    /// View models for every mounted panel, in ascending offset order.
    pub fn panels(&self) -> Vec<MonthPanel> {
        self.controller
            .offsets()
            .iter()
            .map(|offset| self.build_panel(*offset))
            .collect()
    }

    /// View model for one mounted panel.
    pub fn panel(&self, offset: MonthOffset) -> Option<MonthPanel> {
        self.controller
            .contains(offset)
            .then(|| self.build_panel(offset))
    }

    /// Panel height callback from the host.
    pub fn report_height(&mut self, offset: MonthOffset, pixels: f64) {
        self.controller.report_height(offset, pixels);
    }

    /// Measured height of one day row, used for keyboard row steps.
    pub fn report_row_height(&mut self, pixels: f64) {
        if pixels.is_finite() && pixels > 0.0 {
            self.row_height = Some(pixels);
        }
    }

    /// Records live scroll metrics without running a settle pass.
    ///
    /// Hosts call this on mount and on resize so page steps track the
    /// current viewport height.
    pub fn observe(&mut self, metrics: ScrollMetrics) {
        self.controller.observe(metrics);
    }

    /// Scroll signal from the host. Returns `true` when a frame task must be
    /// scheduled; signals arriving while one is pending are dropped.
    pub fn on_scroll(&mut self) -> bool {
        self.controller.request_settle()
    }

    /// Frame task: runs the pending settle pass and recomputes the header
    /// from the panel rectangles measured for this frame.
    pub fn on_frame(
        &mut self,
        metrics: ScrollMetrics,
        viewport: Rect,
        panels: &[(MonthOffset, Rect)],
    ) -> Option<FrameUpdate> {
        let outcome = self.controller.on_frame(metrics)?;
        let header_label = self.update_header(viewport, panels);
        Some(FrameUpdate {
            outcome,
            header_label,
        })
    }

    /// Recomputes the header from panel rectangles.
    ///
    /// Returns the new label only when the header month changed. Panels not
    /// mounted any more are ignored.
    pub fn update_header(
        &mut self,
        viewport: Rect,
        panels: &[(MonthOffset, Rect)],
    ) -> Option<String> {
        let mut mounted = panels
            .iter()
            .copied()
            .filter(|(offset, _)| self.controller.contains(*offset))
            .collect::<Vec<_>>();
        mounted.sort_by_key(|(offset, _)| *offset);

        let best = most_visible(viewport, &mounted)?;
        if best == self.header_index {
            return None;
        }
        self.header_index = best;
        let label = self.header_label();
        debug!("event=header_change module=surface status=ok offset={best}");
        Some(label)
    }

    /// Forward correction owed in the current layout pass.
    pub fn take_layout_correction(&mut self) -> Option<ScrollCorrection> {
        self.controller.take_layout_correction()
    }

    /// Backward correction owed on the next paint.
    pub fn take_paint_correction(&mut self) -> Option<ScrollCorrection> {
        self.controller.take_paint_correction()
    }

    /// Translates a keyboard command into a host scroll action.
    ///
    /// Returns `None` when suppressed, or when a month jump targets an
    /// unmounted panel.
    pub fn handle_key(&self, command: KeyCommand, focus: KeyFocus) -> Option<ScrollAction> {
        if self.open_entry.is_some() || focus == KeyFocus::TextInput {
            return None;
        }
        let page = self.controller.metrics().client_height * self.config.page_factor;
        match command {
            KeyCommand::RowDown => Some(ScrollAction::By {
                delta: self.row_step(),
            }),
            KeyCommand::RowUp => Some(ScrollAction::By {
                delta: -self.row_step(),
            }),
            KeyCommand::PageDown => Some(ScrollAction::By { delta: page }),
            KeyCommand::PageUp => Some(ScrollAction::By { delta: -page }),
            KeyCommand::NextMonth => self.jump(self.header_index + 1),
            KeyCommand::PreviousMonth => self.jump(self.header_index - 1),
            KeyCommand::Today => self.jump(0),
        }
    }

    pub fn open_entry_id(&self) -> Option<&str> {
        self.open_entry.as_deref()
    }

    /// Opens the detail surface on `id`. Ignored when the id is not in the
    /// filtered view.
    pub fn open_entry(&mut self, id: &str) -> bool {
        if self.index.current(id).is_none() {
            return false;
        }
        self.open_entry = Some(id.to_string());
        true
    }

    pub fn close_entry(&mut self) {
        self.open_entry = None;
    }

    /// The open entry as shown by the detail surface.
    pub fn current_entry(&self) -> Option<&JournalEntry> {
        self.open_entry
            .as_deref()
            .and_then(|id| self.index.current(id))
    }

    /// Applies a detail-surface command. Stepping past either end is a no-op.
    pub fn handle_modal_key(&mut self, command: ModalCommand) {
        let Some(open) = self.open_entry.as_deref() else {
            return;
        };
        let target = match command {
            ModalCommand::Close => {
                self.open_entry = None;
                return;
            }
            ModalCommand::Next => self.index.next_id(open),
            ModalCommand::Previous => self.index.previous_id(open),
        };
        if let Some(target) = target {
            self.open_entry = Some(target);
        }
    }

    fn jump(&self, offset: MonthOffset) -> Option<ScrollAction> {
        self.controller
            .jump_to(offset)
            .map(|target| ScrollAction::To { top: target.top })
    }

    fn row_step(&self) -> f64 {
        match self.row_height {
            Some(height) => height + self.config.row_gap,
            None => self.config.row_height_fallback,
        }
    }

    fn rebuild_index(&mut self) {
        self.index = EntryIndex::build(&self.entries, &self.filter_text, self.base);
        debug!(
            "event=index_rebuild module=surface status=ok matched={} days={}",
            self.index.len(),
            self.index.day_count()
        );
    }

    fn build_panel(&self, offset: MonthOffset) -> MonthPanel {
        let start = month_start(self.base, offset);
        let weeks = month_grid(start, self.config.week_start.weekday())
            .into_iter()
            .map(|week| week.map(|date| self.day_cell(date, start)))
            .collect();
        MonthPanel {
            offset,
            month_start: start,
            label: month_label(start),
            weeks,
        }
    }

    fn day_cell(&self, date: NaiveDate, month: NaiveDate) -> DayCell {
        let key = day_key(date);
        let entry_ids = self
            .index
            .entries_for(&key)
            .iter()
            .map(|entry| entry.id.clone())
            .collect();
        DayCell {
            date,
            dim: !is_same_month(date, month),
            key,
            entry_ids,
        }
    }
}
