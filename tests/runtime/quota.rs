use bevy_celebration::quota::CelebrationQuota;

fn press(quota: &mut CelebrationQuota) -> bool {
    if !quota.can_celebrate() {
        return false;
    }
    quota.record_celebration();
    true
}

#[test]
fn fresh_quota_allows_celebrating() {
    let quota = CelebrationQuota::new(3);
    assert_eq!(quota.count(), 0);
    assert_eq!(quota.limit(), 3);
    assert!(quota.banner_visible());
    assert!(quota.can_celebrate());
}

#[test]
fn default_quota_allows_three() {
    assert_eq!(CelebrationQuota::default().limit(), 3);
}

#[test]
fn quota_runs_out_while_the_banner_is_up() {
    let mut quota = CelebrationQuota::new(3);
    for _ in 0..3 {
        assert!(quota.can_celebrate());
        quota.record_celebration();
    }
    assert_eq!(quota.count(), 3);
    assert!(quota.is_exhausted());
}

#[test]
fn dismissing_the_banner_allows_one_more() {
    let mut quota = CelebrationQuota::new(3);
    for _ in 0..3 {
        quota.record_celebration();
    }
    quota.dismiss_banner();

    assert!(!quota.banner_visible());
    assert!(quota.can_celebrate());
    quota.record_celebration();
    assert_eq!(quota.count(), 0);
    assert!(quota.banner_visible());
}

#[test]
fn limit_applies_again_after_a_dismissal() {
    let mut quota = CelebrationQuota::new(3);

    let first = (0..3).filter(|_| press(&mut quota)).count();
    quota.dismiss_banner();
    let after_dismissal = (0..10).filter(|_| press(&mut quota)).count();

    assert_eq!(first, 3);
    assert_eq!(after_dismissal, 4);
    assert!(quota.is_exhausted());
}

#[test]
fn counter_cycles_through_the_limit() {
    let mut quota = CelebrationQuota::new(2);
    quota.dismiss_banner();
    let counts: Vec<u32> = (0..6)
        .map(|_| {
            quota.record_celebration();
            quota.count()
        })
        .collect();
    assert_eq!(counts, vec![1, 2, 0, 1, 2, 0]);
}

#[test]
fn zero_limit_is_exhausted_immediately() {
    let mut quota = CelebrationQuota::new(0);
    assert!(quota.is_exhausted());
    quota.dismiss_banner();
    assert!(quota.can_celebrate());
    quota.record_celebration();
    assert_eq!(quota.count(), 0);
    assert!(quota.is_exhausted());
}

#[test]
fn largest_limit_does_not_overflow() {
    let mut quota = CelebrationQuota::new(u32::MAX);
    quota.record_celebration();
    assert_eq!(quota.count(), 1);
    assert!(quota.can_celebrate());
}

#[test]
fn lowering_the_limit_clamps_the_count() {
    let mut quota = CelebrationQuota::new(5);
    for _ in 0..4 {
        quota.record_celebration();
    }
    quota.set_limit(2);
    assert_eq!(quota.count(), 2);
    assert!(quota.is_exhausted());

    quota.set_limit(6);
    assert_eq!(quota.count(), 2);
    assert!(quota.can_celebrate());
}
