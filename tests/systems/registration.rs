use bevy_celebration::prelude::*;

use super::helpers::*;

#[test]
fn plugin_registers_heart_and_flower_on_startup() {
    let (_app, facility) = create_recording_app();

    assert_eq!(facility.registrations(), vec![HEART, FLOWER]);
    assert_eq!(facility.shape_names(), vec![FLOWER, HEART]);
}

#[test]
fn registration_happens_once_per_startup() {
    let (mut app, facility) = create_recording_app();

    advance_frames(&mut app, 5);

    assert_eq!(facility.registrations().len(), 2);
}

#[test]
fn registering_again_replaces_entries() {
    let (mut app, facility) = create_recording_app();

    let mut installed = app.world_mut().resource_mut::<Facility>();
    register_shapes(Some(&mut *installed));

    assert_eq!(facility.registrations().len(), 4);
    assert_eq!(facility.shape_names().len(), 2);
}

#[test]
fn plugin_starts_without_a_facility() {
    let mut app = create_app(quiet_settings(), None);

    advance_frames(&mut app, 3);

    assert!(app.world().get_resource::<Facility>().is_none());
}
