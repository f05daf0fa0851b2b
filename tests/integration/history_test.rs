use sysdash::core::dashboard::BoundedSeries;

#[test]
fn test_oldest_points_fall_off() {
    let mut series = BoundedSeries::with_capacity(3);
    for (i, value) in [1.0, 2.0, 3.0, 4.0, 5.0].into_iter().enumerate() {
        series.push(format!("t{}", i), value);
    }

    assert_eq!(series.len(), 3);
    assert_eq!(series.values(), vec![3.0, 4.0, 5.0]);
    assert_eq!(series.first_label(), Some("t2"));
    assert_eq!(series.last_label(), Some("t4"));
}

#[test]
fn test_shrinking_keeps_newest() {
    let mut series = BoundedSeries::with_capacity(5);
    for value in 0..5 {
        series.push("", f64::from(value));
    }
    series.set_capacity(2);

    assert_eq!(series.values(), vec![3.0, 4.0]);
    assert_eq!(series.max_value(), Some(4.0));
}
