use {
    base::{CancelFlag, Vec2},
    std::{thread, time::Duration},
};

#[test]
fn test_cancel_flag_starts_clear() {
    let flag = CancelFlag::new();
    assert!(!flag.is_cancelled());
}

#[test]
fn test_cancel_is_shared_between_clones() {
    let flag = CancelFlag::new();
    let worker_flag = flag.clone();
    flag.cancel();
    assert!(worker_flag.is_cancelled());
    flag.cancel();
    assert!(worker_flag.is_cancelled());
}

#[test]
fn test_cancel_stops_worker_loop() {
    let flag = CancelFlag::new();
    let handle = thread::spawn({
        let flag = flag.clone();
        move || {
            let mut iterations = 0u64;
            while !flag.is_cancelled() {
                iterations += 1;
                thread::sleep(Duration::from_millis(1));
            }
            iterations
        }
    });
    thread::sleep(Duration::from_millis(20));
    flag.cancel();
    assert!(handle.join().unwrap() > 0);
}

#[test]
fn test_vec2_area_and_display() {
    let size = Vec2::new(1280usize, 720);
    assert_eq!(size.area(), 921_600);
    assert_eq!(format!("{}", size), "1280x720");
    assert_eq!(Vec2::<usize>::zero(), Vec2::new(0, 0));
}
