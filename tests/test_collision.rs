use wave_shooter::collision::*;
use wave_shooter::entities::Rect;

fn sample_rects() -> Vec<Rect> {
    let mut rects = Vec::new();
    for x in [-20, 0, 7, 30] {
        for y in [-5, 0, 12] {
            for (w, h) in [(1, 1), (10, 10), (40, 3)] {
                rects.push(Rect::new(x, y, w, h));
            }
        }
    }
    rects
}

// ── intersects ────────────────────────────────────────────────────────────────

#[test]
fn intersects_is_symmetric() {
    let rects = sample_rects();
    for a in &rects {
        for b in &rects {
            assert_eq!(intersects(a, b), intersects(b, a), "{a:?} vs {b:?}");
        }
    }
}

#[test]
fn intersects_is_reflexive() {
    for r in sample_rects() {
        assert!(intersects(&r, &r));
    }
}

#[test]
fn shared_edge_is_not_overlap() {
    let a = Rect::new(0, 0, 10, 10);
    assert!(!intersects(&a, &Rect::new(10, 0, 10, 10)));
    assert!(!intersects(&a, &Rect::new(0, 10, 10, 10)));
    assert!(intersects(&a, &Rect::new(9, 9, 10, 10)));
}

#[test]
fn containment_counts_as_overlap() {
    let outer = Rect::new(0, 0, 100, 100);
    let inner = Rect::new(40, 40, 2, 2);
    assert!(intersects(&outer, &inner));
    assert_eq!(intersection(&outer, &inner), Some(inner));
}

#[test]
fn intersection_of_disjoint_is_none() {
    assert_eq!(
        intersection(&Rect::new(0, 0, 5, 5), &Rect::new(20, 20, 5, 5)),
        None
    );
    assert_eq!(
        intersection(&Rect::new(0, 0, 10, 10), &Rect::new(5, 6, 10, 10)),
        Some(Rect::new(5, 6, 5, 4))
    );
}

// ── Side classification ───────────────────────────────────────────────────────

#[test]
fn wall_on_left_marks_left_only() {
    let me = Rect::new(0, 100, 50, 85);
    let wall = Rect::new(0, 0, 1, 768);
    let sides = classify_sides(&me, &wall);
    assert_eq!(
        sides,
        SideContacts {
            left: true,
            ..SideContacts::default()
        }
    );
}

#[test]
fn floor_marks_bottom_only() {
    let me = Rect::new(300, 683, 50, 85);
    let floor = Rect::new(0, 767, 1024, 1);
    let sides = classify_sides(&me, &floor);
    assert!(sides.bottom);
    assert!(!sides.left && !sides.right && !sides.top);
}

#[test]
fn corner_graze_marks_nothing() {
    let me = Rect::new(0, 0, 50, 85);
    let other = Rect::new(45, 80, 20, 20);
    assert!(intersects(&me, &other));
    assert!(!classify_sides(&me, &other).any());
}

#[test]
fn short_overlap_below_threshold_is_ignored() {
    let me = Rect::new(0, 0, 50, 85);
    // Flush with the right edge but only MIN_SIDE_OVERLAP_H tall.
    let post = Rect::new(49, 0, 10, MIN_SIDE_OVERLAP_H);
    assert!(!classify_sides(&me, &post).right);
    let taller = Rect::new(49, 0, 10, MIN_SIDE_OVERLAP_H + 1);
    assert!(classify_sides(&me, &taller).right);
}

#[test]
fn side_collider_resets_each_check() {
    let mut collider = SideCollider::default();
    let walls = [Rect::new(0, 0, 1, 768), Rect::new(0, 0, 1024, 1)];

    assert!(collider.check(&Rect::new(0, 0, 50, 85), walls.iter()));
    assert!(collider.contacts.left && collider.contacts.top);

    assert!(!collider.check(&Rect::new(200, 200, 50, 85), walls.iter()));
    assert_eq!(collider.contacts, SideContacts::default());
}
