use space_shooter::collision::Aabb;

#[test]
fn overlapping_boxes_intersect() {
    let a = Aabb::centered(0.0, 0.0, 10.0, 10.0);
    let b = Aabb::centered(15.0, 5.0, 10.0, 10.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn touching_edges_count_as_hit() {
    let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
    let right = Aabb::new(10.0, 0.0, 20.0, 10.0);
    let below = Aabb::new(0.0, 10.0, 10.0, 20.0);
    let corner = Aabb::new(10.0, 10.0, 20.0, 20.0);
    assert!(a.intersects(&right));
    assert!(a.intersects(&below));
    assert!(a.intersects(&corner));
}

#[test]
fn separated_boxes_miss() {
    let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
    assert!(!a.intersects(&Aabb::new(10.5, 0.0, 20.0, 10.0)));
    assert!(!a.intersects(&Aabb::new(0.0, -20.0, 10.0, -0.5)));
}

#[test]
fn contained_box_intersects() {
    let outer = Aabb::new(0.0, 0.0, 100.0, 100.0);
    let inner = Aabb::new(40.0, 40.0, 60.0, 60.0);
    assert!(outer.intersects(&inner));
    assert!(inner.intersects(&outer));
}

#[test]
fn contains_is_inclusive() {
    let r = Aabb::new(10.0, 20.0, 30.0, 40.0);
    assert!(r.contains(10.0, 20.0));
    assert!(r.contains(30.0, 40.0));
    assert!(r.contains(20.0, 30.0));
    assert!(!r.contains(9.9, 30.0));
    assert!(!r.contains(20.0, 40.1));
}

#[test]
fn center_and_shift() {
    let r = Aabb::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.center(), (20.0, 30.0));
    assert_eq!(r.shifted(-5.0), Aabb::new(10.0, 15.0, 30.0, 35.0));
}
