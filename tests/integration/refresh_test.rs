use std::time::{Duration, Instant};

use sysdash::core::dashboard::{should_refresh, RefreshSchedule, Refreshable, TICK_PERIOD};

#[test]
fn test_ten_second_interval_on_five_second_ticks() {
    let start = Instant::now();
    let mut schedule = RefreshSchedule::new(Duration::from_secs(10));

    let fired: Vec<u64> = (0..=6)
        .map(|tick| tick * TICK_PERIOD.as_secs())
        .filter(|&secs| schedule.should_refresh(start + Duration::from_secs(secs)))
        .collect();

    assert_eq!(fired, vec![0, 15, 30]);
}

#[test]
fn test_exact_interval_is_not_yet_due() {
    let start = Instant::now();
    let mut last = None;

    assert!(should_refresh(&mut last, Duration::from_secs(10), start));
    assert!(!should_refresh(&mut last, Duration::from_secs(10), start + Duration::from_secs(10)));
    assert!(should_refresh(&mut last, Duration::from_secs(10), start + Duration::from_secs(11)));
    assert_eq!(last, Some(start + Duration::from_secs(11)));
}
