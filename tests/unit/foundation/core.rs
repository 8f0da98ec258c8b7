use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::new(30, 1).unwrap(), Fps::default());
}

#[test]
fn tick_interval_matches_rate() {
    let fps = Fps::default();
    assert!((fps.tick_interval_ms() - 1000.0 / 30.0).abs() < 1e-9);

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert!((ntsc.tick_interval_ms() - 33.366_666).abs() < 1e-3);
}

#[test]
fn ticks_in_ms_is_exact_on_interval_multiples() {
    let fps = Fps::default();
    assert_eq!(fps.ticks_in_ms_floor(100.0), 3);
    assert_eq!(fps.ticks_in_ms_floor(200.0), 6);
    assert_eq!(fps.ticks_in_ms_floor(33.0), 0);
    assert_eq!(fps.ticks_in_ms_floor(-5.0), 0);
    assert_eq!(fps.ticks_in_ms_floor(f64::NAN), 0);
}
