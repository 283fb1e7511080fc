use super::*;

#[test]
fn magnitude_uses_integer_square_root() {
    assert_eq!(RawSample::new(3, 4, 0).magnitude(), 5);
    assert_eq!(RawSample::new(0, 0, -1_000).magnitude(), 1_000);
    assert_eq!(RawSample::new(1, 1, 1).magnitude(), 1);
    assert_eq!(
        RawSample::new(i16::MIN, i16::MIN, i16::MIN).magnitude(),
        56_755
    );
}

#[test]
fn tick_deltas_wrap() {
    assert_eq!(ticks_between(10, 14), 4);
    assert_eq!(ticks_between(u32::MAX - 1, 2), 4);
}

#[test]
fn epoch_start_is_first_of_january_1970() {
    let start = LocalDateTime::from_local_seconds(0);
    assert_eq!(start.date(), CalendarDate::new(1970, 1, 1));
    assert_eq!((start.hour, start.minute, start.second), (0, 0, 0));
}

#[test]
fn converts_leap_day_and_time_of_day() {
    // 2024-02-29 13:45:30
    let t = LocalDateTime::from_local_seconds(1_709_214_330);
    assert_eq!(t.date(), CalendarDate::new(2024, 2, 29));
    assert_eq!((t.hour, t.minute, t.second), (13, 45, 30));
}

#[test]
fn last_second_of_year_rolls_to_next_date() {
    let eve = LocalDateTime::from_local_seconds(1_735_689_599);
    assert_eq!(eve.date(), CalendarDate::new(2024, 12, 31));
    let next = LocalDateTime::from_local_seconds(1_735_689_600);
    assert_eq!(next.date(), CalendarDate::new(2025, 1, 1));
}

#[test]
fn action_buffer_drops_overflow() {
    let mut actions = ActionBuffer::new();
    for _ in 0..ActionBuffer::MAX + 2 {
        actions.push(EngineAction::Trigger);
    }
    assert_eq!(actions.len(), ActionBuffer::MAX);
    assert!(actions.contains_trigger());
    assert_eq!(actions.reset_reason(), None);
}

#[test]
fn window_start_and_clear_keep_count_and_time_in_step() {
    let mut window = CycleWindow::new();
    assert!(window.is_empty());
    assert_eq!(window.first_event_time, None);

    let now = LocalDateTime::from_local_seconds(60);
    window.start(7, now);
    assert_eq!(window.count, 1);
    assert_eq!(window.first_event_time, Some(now));
    assert_eq!(window.elapsed_ticks(9), Some(2));

    window.clear();
    assert!(window.is_empty());
    assert_eq!(window.first_event_time, None);
    assert_eq!(window.elapsed_ticks(9), None);
}
