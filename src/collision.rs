/// Axis-aligned rectangle collision.
///
/// `intersects` is the only test the shooter core needs for hits.  The side
/// classifier is a separate capability for entities that must know *where*
/// they touch level geometry (the player against the screen walls).

use crate::entities::Rect;

/// An intersection narrower than this (in pixels) does not count as a
/// left/right touch.
pub const MIN_SIDE_OVERLAP_H: u32 = 12;
/// An intersection shorter than this does not count as a top/bottom touch.
pub const MIN_SIDE_OVERLAP_W: u32 = 5;

/// True iff the areas overlap.  Shared edges only touch.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && b.left() < a.right() && a.top() < b.bottom() && b.top() < a.bottom()
}

pub fn intersection(a: &Rect, b: &Rect) -> Option<Rect> {
    if !intersects(a, b) {
        return None;
    }
    let left = a.left().max(b.left());
    let top = a.top().max(b.top());
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    Some(Rect::new(left, top, (right - left) as u32, (bottom - top) as u32))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SideContacts {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl SideContacts {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    fn merge(&mut self, other: SideContacts) {
        self.left |= other.left;
        self.right |= other.right;
        self.top |= other.top;
        self.bottom |= other.bottom;
    }
}

/// Which sides of `me` the overlap with `other` lies on.
///
/// A side counts only when the intersection is flush with it and extends far
/// enough along it, so grazing a corner does not block two axes at once.
pub fn classify_sides(me: &Rect, other: &Rect) -> SideContacts {
    let Some(hit) = intersection(me, other) else {
        return SideContacts::default();
    };
    SideContacts {
        left: hit.left() == me.left() && hit.height() > MIN_SIDE_OVERLAP_H,
        right: hit.right() == me.right() && hit.height() > MIN_SIDE_OVERLAP_H,
        top: hit.top() == me.top() && hit.width() > MIN_SIDE_OVERLAP_W,
        bottom: hit.bottom() == me.bottom() && hit.width() > MIN_SIDE_OVERLAP_W,
    }
}

/// Per-frame side contacts against a set of obstacles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SideCollider {
    pub contacts: SideContacts,
}

impl SideCollider {
    /// Recompute contacts for `me`.  Returns whether anything overlapped;
    /// with no overlap every flag is cleared.
    pub fn check<'a>(&mut self, me: &Rect, obstacles: impl IntoIterator<Item = &'a Rect>) -> bool {
        let mut contacts = SideContacts::default();
        let mut collided = false;
        for obstacle in obstacles {
            if intersects(me, obstacle) {
                collided = true;
                contacts.merge(classify_sides(me, obstacle));
            }
        }
        self.contacts = contacts;
        collided
    }
}
