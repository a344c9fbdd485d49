//! Texture coordinates of the stroke.
//!
//! The stroke texture is split in three horizontal slices, like a 3-slice sprite: the left
//! part is mapped on start caps, the middle part is stretched along the segments and the
//! right part is mapped on end caps.

use crate::math::{point, Box2D, Point};
use crate::QuadKind;

/// The region of a texture used by a stroke, in UV space.
///
/// `inner` delimits the stretchable middle slice within `outer`. When the texture has no
/// border, `inner` is equal to `outer`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct TextureRegion {
    pub outer: Box2D,
    pub inner: Box2D,
}

impl TextureRegion {
    pub fn new(outer: Box2D, inner: Box2D) -> Self {
        TextureRegion { outer, inner }
    }

    /// A region without border.
    pub fn uniform(outer: Box2D) -> Self {
        TextureRegion {
            outer,
            inner: outer,
        }
    }
}

/// The unit square, split in its middle.
impl Default for TextureRegion {
    fn default() -> Self {
        TextureRegion {
            outer: Box2D::new(point(0.0, 0.0), point(1.0, 1.0)),
            inner: Box2D::new(point(0.5, 0.0), point(0.5, 1.0)),
        }
    }
}

/// The texture coordinates of the four corners of each kind of quad.
///
/// Corners are in the same order as the vertices of a [`Quad`](struct.Quad.html).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UvSets {
    pub start: [Point; 4],
    pub middle: [Point; 4],
    pub end: [Point; 4],
    pub full: [Point; 4],
}

impl UvSets {
    /// Computes the UV sets of a texture region, or of the default region if there
    /// is none.
    pub fn new(region: Option<&TextureRegion>) -> Self {
        let region = region.copied().unwrap_or_default();
        let (outer, inner) = (region.outer, region.inner);

        let top_left = point(outer.min.x, outer.min.y);
        let bottom_left = point(outer.min.x, outer.max.y);
        let top_center_left = point(inner.min.x, inner.min.y);
        let top_center_right = point(inner.max.x, inner.min.y);
        let bottom_center_left = point(inner.min.x, inner.max.y);
        let bottom_center_right = point(inner.max.x, inner.max.y);
        let top_right = point(outer.max.x, outer.min.y);
        let bottom_right = point(outer.max.x, outer.max.y);

        UvSets {
            start: [top_left, bottom_left, bottom_center_left, top_center_left],
            middle: [
                top_center_left,
                bottom_center_left,
                bottom_center_right,
                top_center_right,
            ],
            end: [top_center_right, bottom_center_right, bottom_right, top_right],
            full: [top_left, bottom_left, bottom_right, top_right],
        }
    }

    /// Join quads copy the corners of their neighbours, the middle set is returned
    /// for them.
    pub fn get(&self, kind: QuadKind) -> &[Point; 4] {
        match kind {
            QuadKind::Start => &self.start,
            QuadKind::Middle | QuadKind::Join => &self.middle,
            QuadKind::End => &self.end,
            QuadKind::Full => &self.full,
        }
    }
}

impl Default for UvSets {
    fn default() -> Self {
        UvSets::new(None)
    }
}

#[test]
fn default_uvs() {
    let uvs = UvSets::new(None);

    assert_eq!(
        uvs.start,
        [
            point(0.0, 0.0),
            point(0.0, 1.0),
            point(0.5, 1.0),
            point(0.5, 0.0)
        ]
    );
    assert_eq!(
        uvs.middle,
        [
            point(0.5, 0.0),
            point(0.5, 1.0),
            point(0.5, 1.0),
            point(0.5, 0.0)
        ]
    );
    assert_eq!(
        uvs.end,
        [
            point(0.5, 0.0),
            point(0.5, 1.0),
            point(1.0, 1.0),
            point(1.0, 0.0)
        ]
    );
    assert_eq!(
        uvs.full,
        [
            point(0.0, 0.0),
            point(0.0, 1.0),
            point(1.0, 1.0),
            point(1.0, 0.0)
        ]
    );
}

#[test]
fn custom_region() {
    let region = TextureRegion::new(
        Box2D::new(point(0.0, 0.5), point(0.5, 1.0)),
        Box2D::new(point(0.125, 0.5), point(0.375, 1.0)),
    );
    let uvs = UvSets::new(Some(&region));

    assert_eq!(uvs.get(QuadKind::Start)[0], point(0.0, 0.5));
    assert_eq!(uvs.get(QuadKind::Start)[2], point(0.125, 1.0));
    assert_eq!(
        *uvs.get(QuadKind::Middle),
        [
            point(0.125, 0.5),
            point(0.125, 1.0),
            point(0.375, 1.0),
            point(0.375, 0.5)
        ]
    );
    assert_eq!(uvs.get(QuadKind::End)[2], point(0.5, 1.0));
    assert_eq!(uvs.get(QuadKind::Full)[3], point(0.5, 0.5));
    assert_eq!(uvs.get(QuadKind::Join), uvs.get(QuadKind::Middle));

    // Without border the middle set covers the whole region.
    let uvs = UvSets::new(Some(&TextureRegion::uniform(region.outer)));
    assert_eq!(uvs.middle, uvs.full);
}
