use super::*;

fn timeline() -> ScrollTimeline {
    // height 400, text 120, padding 20, speed 20 => start -20, end 540, 2px per tick.
    ScrollTimeline::from_parts(400.0, 120.0, 20.0, 20.0)
}

fn run_to_end(t: &ScrollTimeline, ticks_per_frame: f64) -> (Vec<f64>, ScrollState) {
    let mut state = t.initial();
    let mut seen = vec![state.scroll];
    loop {
        let (next, flow) = t.advance(state, ticks_per_frame);
        state = next;
        seen.push(state.scroll);
        if flow == Flow::Complete {
            return (seen, state);
        }
    }
}

#[test]
fn starts_below_canvas_and_ends_past_text() {
    let t = timeline();
    assert_eq!(t.initial().scroll, -20.0);
    assert_eq!(t.end, 540.0);
    assert_eq!(t.step_per_tick, 2.0);
    assert!(!t.is_complete(t.initial()));
}

#[test]
fn completion_offset_is_independent_of_frame_rate() {
    let t = ScrollTimeline::from_parts(400.0, 123.4, 20.0, 37.0);
    for ticks_per_frame in [1.0, 2.0, 2.5, 7.0] {
        let (_, end_state) = run_to_end(&t, ticks_per_frame);
        assert_eq!(end_state.scroll, t.end);
    }
}

#[test]
fn scroll_strictly_increases_until_completion() {
    let t = timeline();
    let (seen, _) = run_to_end(&t, 1.0);
    for pair in seen.windows(2) {
        assert!(pair[1] > pair[0]);
    }
}

#[test]
fn frame_count_matches_stepping() {
    let t = ScrollTimeline::from_parts(400.0, 123.4, 20.0, 37.0);
    for ticks_per_frame in [1.0, 2.0, 3.0] {
        let (seen, _) = run_to_end(&t, ticks_per_frame);
        assert_eq!(seen.len() as u64, t.frames_to_complete(ticks_per_frame));
    }
}

#[test]
fn progress_spans_zero_to_hundred() {
    let t = timeline();
    assert_eq!(t.progress(t.initial()), 0.0);
    let mid = ScrollState {
        scroll: 260.0,
        ticks: 140.0,
    };
    assert!((t.progress(mid) - 50.0).abs() < 1e-9);
    let past = ScrollState {
        scroll: 1_000.0,
        ticks: 0.0,
    };
    assert_eq!(t.progress(past), 100.0);
}

#[test]
fn duration_uses_reference_refresh_rate() {
    let t = timeline();
    // 560px at 2px per tick = 280 ticks = 4.666.. seconds.
    assert_eq!(t.duration_ticks(), 280.0);
    assert!((t.duration_secs() - 280.0 / 60.0).abs() < 1e-12);
}
