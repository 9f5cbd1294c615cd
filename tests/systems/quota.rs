use bevy_celebration::prelude::*;

use super::helpers::*;

fn request(app: &mut bevy::prelude::App) {
    app.world_mut().trigger(CelebrateRequested);
    app.update();
}

fn heart_bursts(facility: &RecordingFacility) -> usize {
    facility.bursts().iter().filter(|b| is_heart_burst(b)).count()
}

#[test]
fn requests_celebrate_until_the_quota_runs_out() {
    let (mut app, facility) = create_recording_app();

    for _ in 0..4 {
        request(&mut app);
    }

    assert_eq!(heart_bursts(&facility), 3);
    let quota = app.world().resource::<CelebrationQuota>();
    assert_eq!(quota.count(), 3);
    assert!(quota.is_exhausted());
}

#[test]
fn dismissing_the_banner_allows_more_celebrations() {
    let (mut app, facility) = create_recording_app();
    for _ in 0..3 {
        request(&mut app);
    }

    app.world_mut().trigger(DismissBanner);
    app.update();
    assert!(!app.world().resource::<CelebrationQuota>().banner_visible());

    request(&mut app);
    assert!(app.world().resource::<CelebrationQuota>().banner_visible());
    assert_eq!(heart_bursts(&facility), 4);
}

#[test]
fn banner_returns_after_the_extra_celebration() {
    let (mut app, facility) = create_recording_app();
    for _ in 0..3 {
        request(&mut app);
    }

    app.world_mut().trigger(DismissBanner);
    app.update();
    for _ in 0..10 {
        request(&mut app);
    }

    assert_eq!(heart_bursts(&facility), 7);
    let quota = app.world().resource::<CelebrationQuota>();
    assert!(quota.banner_visible());
    assert!(quota.is_exhausted());
}

#[test]
fn largest_quota_from_settings_is_accepted() {
    let facility = RecordingFacility::default();
    let mut settings = quiet_settings();
    settings.timeline.quota = u32::MAX;
    let mut app = create_app(settings, Some(facility.clone()));

    for _ in 0..5 {
        request(&mut app);
    }

    assert_eq!(heart_bursts(&facility), 5);
    assert_eq!(app.world().resource::<CelebrationQuota>().count(), 5);
}

#[test]
fn quota_limit_comes_from_settings() {
    let facility = RecordingFacility::default();
    let mut settings = quiet_settings();
    settings.timeline.quota = 1;
    let mut app = create_app(settings, Some(facility.clone()));

    request(&mut app);
    request(&mut app);

    assert_eq!(app.world().resource::<CelebrationQuota>().limit(), 1);
    assert_eq!(heart_bursts(&facility), 1);
}

#[test]
fn startup_celebration_does_not_use_the_quota() {
    let facility = RecordingFacility::default();
    let mut app = create_app(CelebrationSettings::default(), Some(facility.clone()));

    advance_ms(&mut app, 1_100);

    assert_eq!(heart_bursts(&facility), 1);
    assert_eq!(app.world().resource::<CelebrationQuota>().count(), 0);
}
