use journal_core::{
    ConfigError, PrependEstimate, ScrollCorrection, ScrollMetrics, ScrollWindowController,
    WindowConfig,
};

const PANEL: f64 = 800.0;
const VIEWPORT: f64 = 800.0;

#[test]
fn initial_window_spans_configured_offsets() {
    let controller = controller();
    assert_eq!(controller.offsets(), (-6..=6).collect::<Vec<_>>().as_slice());
    assert_eq!(controller.len(), 13);
}

#[test]
fn invalid_config_is_rejected() {
    let config = WindowConfig {
        max_keep: 10,
        ..WindowConfig::default()
    };
    assert!(matches!(
        ScrollWindowController::new(config),
        Err(ConfigError::InitialWindowTooLarge { .. })
    ));
}

#[test]
fn settle_away_from_edges_changes_nothing() {
    let mut controller = measured_controller();
    let before = controller.offsets().to_vec();

    let outcome = controller.on_scroll_settled(middle_metrics(&controller));

    assert!(!outcome.changed());
    assert_eq!(controller.offsets(), before.as_slice());
    assert_eq!(controller.take_layout_correction(), None);
    assert_eq!(controller.take_paint_correction(), None);
}

#[test]
fn top_edge_settle_prepends_and_issues_forward_correction() {
    let mut controller = measured_controller();

    let outcome = controller.on_scroll_settled(top_metrics(&controller, 100.0));

    assert_eq!(outcome.prepended, vec![-11, -10, -9, -8, -7]);
    assert!(outcome.removed().next().is_none());
    assert_eq!(
        controller.offsets(),
        (-11..=6).collect::<Vec<_>>().as_slice()
    );
    assert_eq!(
        controller.take_layout_correction(),
        Some(ScrollCorrection::Forward(4000.0))
    );
    assert_eq!(controller.scroll_top(), 4100.0);
    assert_eq!(controller.take_layout_correction(), None);
    assert_eq!(controller.take_paint_correction(), None);
}

#[test]
fn forward_correction_prefers_reported_heights_of_new_panels() {
    let mut controller = measured_controller();
    controller.on_scroll_settled(top_metrics(&controller, 0.0));
    for offset in -11..=-7 {
        controller.report_height(offset, 700.0);
    }

    assert_eq!(
        controller.take_layout_correction(),
        Some(ScrollCorrection::Forward(3500.0))
    );
}

#[test]
fn cached_only_estimate_skips_unmeasured_prepends() {
    let config = WindowConfig {
        prepend_estimate: PrependEstimate::CachedOnly,
        ..WindowConfig::default()
    };
    let mut controller = ScrollWindowController::new(config).unwrap();
    measure_all(&mut controller);

    controller.on_scroll_settled(top_metrics(&controller, 0.0));
    assert_eq!(controller.take_layout_correction(), None);

    controller.report_height(-11, 500.0);
    controller.on_scroll_settled(middle_metrics(&controller));
    controller.on_scroll_settled(top_metrics(&controller, 0.0));
    assert_eq!(controller.take_layout_correction(), None);
}

#[test]
fn repeated_top_settles_prune_from_back_without_correction() {
    let mut controller = measured_controller();

    controller.on_scroll_settled(top_metrics(&controller, 0.0));
    controller.on_scroll_settled(top_metrics(&controller, 0.0));
    assert_eq!(controller.len(), 23);

    let outcome = controller.on_scroll_settled(top_metrics(&controller, 0.0));
    assert_eq!(outcome.removed_back, vec![5, 6]);
    assert!(outcome.removed_front.is_empty());
    assert_eq!(controller.len(), 26);
    assert_eq!(controller.offsets().first(), Some(&-21));
    assert_eq!(controller.offsets().last(), Some(&4));
    assert_eq!(controller.take_paint_correction(), None);
}

#[test]
fn repeated_bottom_settles_prune_front_and_defer_backward_correction() {
    let mut controller = measured_controller();

    controller.on_scroll_settled(bottom_metrics(&controller));
    controller.on_scroll_settled(bottom_metrics(&controller));
    let outcome = controller.on_scroll_settled(bottom_metrics(&controller));

    assert_eq!(outcome.removed_front, vec![-6, -5]);
    assert!(outcome.removed_back.is_empty());
    assert_eq!(controller.offsets().first(), Some(&-4));
    assert_eq!(controller.offsets().last(), Some(&21));
    assert_eq!(controller.take_layout_correction(), None);

    let scroll_top = controller.scroll_top();
    assert_eq!(
        controller.take_paint_correction(),
        Some(ScrollCorrection::Backward(1600.0))
    );
    assert_eq!(controller.scroll_top(), scroll_top - 1600.0);
}

#[test]
fn both_edges_split_pruning_floor_to_front() {
    let mut controller = measured_controller();
    let tiny = ScrollMetrics::new(0.0, 500.0, 500.0);

    let first = controller.on_scroll_settled(tiny);
    assert!(first.near_top && first.near_bottom);
    assert_eq!(controller.len(), 23);

    let second = controller.on_scroll_settled(tiny);
    assert_eq!(second.removed_front, vec![-16, -15, -14]);
    assert_eq!(second.removed_back, vec![13, 14, 15, 16]);
    assert_eq!(
        controller.offsets(),
        (-13..=12).collect::<Vec<_>>().as_slice()
    );
}

#[test]
fn top_then_bottom_settle_never_removes_fresh_offsets() {
    let mut controller = measured_controller();

    let top = controller.on_scroll_settled(top_metrics(&controller, 0.0));
    let bottom = controller.on_scroll_settled(bottom_metrics(&controller));

    assert!(top.removed().next().is_none());
    assert!(bottom.removed().next().is_none());
    for offset in top.prepended.iter().chain(bottom.appended.iter()) {
        assert!(controller.contains(*offset));
    }
    assert_eq!(
        controller.offsets(),
        (-11..=11).collect::<Vec<_>>().as_slice()
    );
}

#[test]
fn pruning_never_removes_the_side_being_viewed() {
    let mut controller = measured_controller();
    for _ in 0..6 {
        let outcome = controller.on_scroll_settled(top_metrics(&controller, 0.0));
        let first = controller.offsets()[0];
        assert!(outcome.removed_front.is_empty());
        assert!(outcome.removed_back.iter().all(|offset| *offset > first));
    }
    for _ in 0..6 {
        let outcome = controller.on_scroll_settled(bottom_metrics(&controller));
        assert!(outcome.removed_back.is_empty());
        assert!(!outcome.removed_front.contains(controller.offsets().last().unwrap()));
    }
}

#[test]
fn window_stays_bounded_and_contiguous_under_arbitrary_scrolling() {
    let mut controller = measured_controller();
    let mut seed: u64 = 0x5eed;

    for _ in 0..500 {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let content = controller.len() as f64 * PANEL;
        let fraction = (seed >> 33) as f64 / (1u64 << 31) as f64;
        let scroll_top = fraction * (content - VIEWPORT).max(0.0);
        let metrics = ScrollMetrics::new(scroll_top, content, VIEWPORT);

        if controller.request_settle() {
            controller.on_frame(metrics);
        }
        for offset in controller.offsets().to_vec() {
            controller.report_height(offset, PANEL);
        }
        controller.take_layout_correction();
        controller.take_paint_correction();

        let offsets = controller.offsets();
        assert!(offsets.len() <= 26);
        assert!(offsets.windows(2).all(|pair| pair[1] == pair[0] + 1));
    }
}

#[test]
fn scroll_signals_coalesce_into_one_pass_per_frame() {
    let mut controller = measured_controller();

    assert!(controller.request_settle());
    assert!(!controller.request_settle());
    assert!(!controller.request_settle());
    assert!(controller.settle_pending());

    let outcome = controller.on_frame(top_metrics(&controller, 0.0));
    assert!(outcome.is_some());
    assert!(!controller.settle_pending());
    assert_eq!(controller.len(), 18);

    assert_eq!(controller.on_frame(top_metrics(&controller, 0.0)), None);
    assert_eq!(controller.len(), 18);
    assert!(controller.request_settle());
}

#[test]
fn new_settle_pass_supersedes_untaken_corrections() {
    let mut controller = measured_controller();

    controller.on_scroll_settled(top_metrics(&controller, 0.0));
    controller.on_scroll_settled(middle_metrics(&controller));

    assert_eq!(controller.take_layout_correction(), None);
}

#[test]
fn height_cache_is_get_or_zero() {
    let mut controller = controller();

    assert_eq!(controller.height(3), 0.0);
    assert!(!controller.is_measured(3));

    controller.report_height(3, 640.0);
    controller.report_height(3, 640.0);
    assert_eq!(controller.height(3), 640.0);

    controller.report_height(4, -10.0);
    controller.report_height(5, f64::NAN);
    assert_eq!(controller.height(4), 0.0);
    assert_eq!(controller.height(5), 0.0);
}

#[test]
fn jump_to_targets_mounted_panel_top_smoothly() {
    let controller = measured_controller();

    let target = controller.jump_to(0).unwrap();
    assert_eq!(target.top, 6.0 * PANEL);
    assert!(target.smooth);
    assert_eq!(controller.jump_to(-6).unwrap().top, 0.0);
    assert_eq!(controller.jump_to(42), None);
}

fn controller() -> ScrollWindowController {
    ScrollWindowController::new(WindowConfig::default()).unwrap()
}

fn measured_controller() -> ScrollWindowController {
    let mut controller = controller();
    measure_all(&mut controller);
    controller
}

fn measure_all(controller: &mut ScrollWindowController) {
    for offset in controller.offsets().to_vec() {
        controller.report_height(offset, PANEL);
    }
}

fn content_height(controller: &ScrollWindowController) -> f64 {
    controller.len() as f64 * PANEL
}

fn top_metrics(controller: &ScrollWindowController, scroll_top: f64) -> ScrollMetrics {
    ScrollMetrics::new(scroll_top, content_height(controller), VIEWPORT)
}

fn middle_metrics(controller: &ScrollWindowController) -> ScrollMetrics {
    let content = content_height(controller);
    ScrollMetrics::new((content - VIEWPORT) / 2.0, content, VIEWPORT)
}

fn bottom_metrics(controller: &ScrollWindowController) -> ScrollMetrics {
    let content = content_height(controller);
    ScrollMetrics::new(content - VIEWPORT - 100.0, content, VIEWPORT)
}
