//! The fixed-dimensionality point type stored in and used to query a [`KdTree`].
//!
//! [`KdTree`]: crate::kdtree::KdTree

use std::ops::Index;

use geo_traits::CoordTrait;

use crate::error::{KdIndexError, Result};
use crate::r#type::IndexableNum;

/// A point with `D` coordinates of type `N`.
///
/// Points compare equal when every coordinate is equal.
///
/// ```
/// use kd_index::Point;
///
/// let a = Point::new([0., 0.]);
/// let b = Point::new([3., 4.]);
/// assert_eq!(a.distance(&b), 5.);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<N: IndexableNum, const D: usize> {
    coords: [N; D],
}

impl<N: IndexableNum, const D: usize> Point<N, D> {
    /// Create a new point from its coordinates.
    pub fn new(coords: [N; D]) -> Self {
        Self { coords }
    }

    /// Create a point from any [`CoordTrait`] implementation.
    ///
    /// Returns [`KdIndexError::DimensionMismatch`] if the coord does not have exactly `D`
    /// dimensions.
    pub fn try_from_coord(coord: &impl CoordTrait<T = N>) -> Result<Self> {
        let actual = coord.dim().size();
        if actual != D {
            return Err(KdIndexError::DimensionMismatch {
                expected: D,
                actual,
            });
        }

        let mut coords = [N::zero(); D];
        for (axis, value) in coords.iter_mut().enumerate() {
            *value = coord.nth_or_panic(axis);
        }
        Ok(Self { coords })
    }

    /// The number of coordinates of this point.
    #[inline]
    pub fn dimension(&self) -> usize {
        D
    }

    /// The raw coordinates of this point.
    #[inline]
    pub fn coords(&self) -> &[N; D] {
        &self.coords
    }

    /// The coordinate along `axis`.
    ///
    /// Panics if `axis >= D`.
    #[inline]
    pub fn coord(&self, axis: usize) -> N {
        self.coords[axis]
    }

    /// Returns `true` if no coordinate is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Overflows to infinity when coordinate differences exceed roughly the square root of
    /// `N::max_value()`.
    #[inline]
    pub fn sq_distance(&self, other: &Self) -> N {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .fold(N::zero(), |acc, (&a, &b)| {
                let d = a - b;
                acc + d * d
            })
    }

    /// Euclidean distance to another point.
    ///
    /// Finite for any two finite points whose distance is representable.
    #[inline]
    pub fn distance(&self, other: &Self) -> N {
        let sq = self.sq_distance(other);
        if sq.is_finite() {
            return sq.sqrt();
        }

        // squaring overflowed, rescale by the largest difference
        let scale = self
            .coords
            .iter()
            .zip(other.coords.iter())
            .fold(N::zero(), |acc, (&a, &b)| acc.max((a - b).abs()));
        let scaled = self
            .coords
            .iter()
            .zip(other.coords.iter())
            .fold(N::zero(), |acc, (&a, &b)| {
                let d = (a - b) / scale;
                acc + d * d
            });
        scaled.sqrt() * scale
    }

    /// Distance from this point to the axis-aligned hyperplane through `other` that is
    /// perpendicular to `axis`.
    ///
    /// This is a lower bound on the distance to any point on the far side of that
    /// hyperplane.
    #[inline]
    pub fn axis_distance(&self, other: &Self, axis: usize) -> N {
        (self.coords[axis] - other.coords[axis]).abs()
    }
}

impl<N: IndexableNum, const D: usize> Index<usize> for Point<N, D> {
    type Output = N;

    fn index(&self, axis: usize) -> &Self::Output {
        &self.coords[axis]
    }
}

impl<N: IndexableNum, const D: usize> From<[N; D]> for Point<N, D> {
    fn from(coords: [N; D]) -> Self {
        Self::new(coords)
    }
}

impl<N: IndexableNum, const D: usize> TryFrom<&[N]> for Point<N, D> {
    type Error = KdIndexError;

    fn try_from(value: &[N]) -> Result<Self> {
        let coords: [N; D] = value
            .try_into()
            .map_err(|_| KdIndexError::DimensionMismatch {
                expected: D,
                actual: value.len(),
            })?;
        Ok(Self { coords })
    }
}

#[cfg(test)]
mod test {
    use geo_0_31::{coord, Coord};

    use crate::error::KdIndexError;
    use crate::point::Point;

    #[test]
    fn distances() {
        let a = Point::new([1., 2., 3.]);
        let b = Point::new([4., 6., 3.]);
        assert_eq!(a.sq_distance(&b), 25.);
        assert_eq!(a.distance(&b), 5.);
        assert_eq!(b.distance(&a), 5.);
        assert_eq!(a.axis_distance(&b, 0), 3.);
        assert_eq!(a.axis_distance(&b, 1), 4.);
        assert_eq!(a.axis_distance(&b, 2), 0.);
    }

    #[test]
    fn distance_of_huge_coordinates() {
        let origin = Point::new([0., 0.]);
        let near = Point::new([1e200, 0.]);
        let far = Point::new([2e200, 0.]);
        assert_eq!(origin.distance(&near), 1e200);
        assert_eq!(origin.distance(&far), 2e200);
        assert!(origin.distance(&near) < origin.distance(&far));

        let diagonal = Point::new([3e200, 4e200]);
        let d: f64 = origin.distance(&diagonal);
        assert!((d / 5e200 - 1.).abs() < 1e-12);
    }

    #[test]
    fn coordinate_access() {
        let p = Point::new([1.5f32, -2.5]);
        assert_eq!(p.dimension(), 2);
        assert_eq!(p[0], 1.5);
        assert_eq!(p.coord(1), -2.5);
        assert_eq!(p.coords(), &[1.5, -2.5]);
    }

    #[test]
    fn equality_is_coordinate_wise() {
        assert_eq!(Point::new([1., 2.]), Point::from([1., 2.]));
        assert_ne!(Point::new([1., 2.]), Point::new([2., 1.]));
    }

    #[test]
    fn finiteness() {
        assert!(Point::new([0., 1e300]).is_finite());
        assert!(!Point::new([0., f64::NAN]).is_finite());
        assert!(!Point::new([f64::NEG_INFINITY, 0.]).is_finite());
    }

    #[test]
    fn from_slice() {
        let data = [1., 2., 3.];
        let p = Point::<f64, 3>::try_from(&data[..]).unwrap();
        assert_eq!(p, Point::new([1., 2., 3.]));

        let err = Point::<f64, 2>::try_from(&data[..]).unwrap_err();
        assert_eq!(
            err,
            KdIndexError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn from_coord() {
        let c: Coord<f64> = coord! { x: 3., y: 7. };
        let p = Point::<f64, 2>::try_from_coord(&c).unwrap();
        assert_eq!(p, Point::new([3., 7.]));

        let err = Point::<f64, 3>::try_from_coord(&c).unwrap_err();
        assert!(matches!(
            err,
            KdIndexError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }
}
