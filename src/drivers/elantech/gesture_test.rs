use crate::drivers::elantech::{
    event::Buttons,
    gesture::{GestureState, Point},
};

#[test]
fn test_motion_delta() {
    let mut gesture = GestureState::default();
    assert_eq!(gesture.motion(Point::new(100, 100)), None);
    assert_eq!(gesture.motion(Point::new(110, 95)), Some((10, -5)));
    assert_eq!(gesture.last_point(), Some(Point::new(110, 95)));
}

#[test]
fn test_start_point_latched() {
    let mut gesture = GestureState::default();
    gesture.track(0, Point::new(100, 100));
    gesture.track(0, Point::new(120, 120));
    assert_eq!(gesture.start_point(0), Some(Point::new(100, 100)));
    assert!(gesture.in_range(0));
    assert!(gesture.is_tap_eligible());
}

#[test]
fn test_threshold_is_exclusive() {
    let mut gesture = GestureState::default();
    gesture.track(0, Point::new(100, 100));
    gesture.track(0, Point::new(132, 68));
    assert!(gesture.is_tap_eligible());

    gesture.track(0, Point::new(133, 100));
    assert!(!gesture.in_range(0));
    assert!(!gesture.is_tap_eligible());
}

#[test]
fn test_disqualified_until_release() {
    let mut gesture = GestureState::default();
    gesture.track(0, Point::new(100, 100));
    gesture.track(0, Point::new(200, 100));
    // Coming back does not restore eligibility
    gesture.track(0, Point::new(100, 100));
    assert!(!gesture.is_tap_eligible());

    gesture.set_fingers(1);
    assert_eq!(gesture.release(), Buttons::default());

    // Re-armed for the next contact
    assert!(gesture.is_tap_eligible());
    assert_eq!(gesture.start_point(0), None);
    assert!(gesture.in_range(0));
}

#[test]
fn test_tap_buttons() {
    let mut gesture = GestureState::default();
    gesture.set_fingers(1);
    assert_eq!(gesture.release(), Buttons::LEFT);

    gesture.set_fingers(2);
    assert_eq!(gesture.release(), Buttons::RIGHT);

    gesture.set_fingers(3);
    assert_eq!(gesture.release(), Buttons::default());

    gesture.set_fingers(0);
    assert_eq!(gesture.release(), Buttons::default());
}

#[test]
fn test_tap_disabled() {
    let mut gesture = GestureState::new(false, 32);
    gesture.track(0, Point::new(100, 100));
    gesture.set_fingers(1);
    assert!(!gesture.is_tap_eligible());
    assert_eq!(gesture.release(), Buttons::default());
}

#[test]
fn test_second_slot() {
    let mut gesture = GestureState::default();
    gesture.track(0, Point::new(100, 100));
    gesture.track(1, Point::new(400, 100));
    gesture.track(1, Point::new(400, 200));
    assert!(gesture.in_range(0));
    assert!(!gesture.in_range(1));
    assert!(!gesture.is_tap_eligible());

    // Out of range slots are ignored
    gesture.track(2, Point::new(0, 0));
    assert_eq!(gesture.start_point(2), None);
}
