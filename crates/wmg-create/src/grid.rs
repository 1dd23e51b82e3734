//! Grid coordinates and the spatial index used for neighbour queries.

use core::fmt;

use nalgebra::DMatrix;
use rstar::RTree;
use rstar::primitives::GeomWithData;
use wmg_core::{Point, Real, Rect, WmgError, WmgResult, linspace};

/// Coordinates of a rectangular grid, as an `(2, Nx, Ny)` array.
///
/// Channel 0 holds x coordinates and channel 1 holds y coordinates; both are
/// `Nx x Ny` matrices. Grid point `(i, j)` has the stable index `i * Ny + j`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCoords {
    x: DMatrix<Real>,
    y: DMatrix<Real>,
}

impl GridCoords {
    /// Build from the two coordinate channels.
    ///
    /// Fails when the channels differ in shape, when either axis has fewer
    /// than 2 points, when a coordinate is not finite, or when the grid has
    /// no extent along an axis.
    pub fn new(x: DMatrix<Real>, y: DMatrix<Real>) -> WmgResult<Self> {
        if x.shape() != y.shape() {
            return Err(WmgError::grid(format!(
                "x channel is {}x{} but y channel is {}x{}",
                x.nrows(),
                x.ncols(),
                y.nrows(),
                y.ncols()
            )));
        }

        let (nx, ny) = x.shape();
        if nx < 2 || ny < 2 {
            return Err(WmgError::grid(format!(
                "need at least 2 points along each axis, got {}x{}",
                nx, ny
            )));
        }

        if let Some(v) = x.iter().chain(y.iter()).find(|v| !v.is_finite()) {
            return Err(WmgError::grid(format!("non-finite coordinate {}", v)));
        }

        let grid = Self { x, y };
        let bounds = grid.bounding_rectangle();
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Err(WmgError::grid(format!(
                "grid spans a degenerate rectangle {} - {}",
                bounds.min, bounds.max
            )));
        }
        Ok(grid)
    }

    /// Build from a flat buffer in row-major `(2, Nx, Ny)` order.
    pub fn from_array(shape: [usize; 3], data: &[Real]) -> WmgResult<Self> {
        let [channels, nx, ny] = shape;
        if channels != 2 {
            return Err(WmgError::grid(format!(
                "expected 2 coordinate channels, got {}",
                channels
            )));
        }
        let plane = nx.checked_mul(ny);
        let needed = plane.and_then(|p| p.checked_mul(2));
        let (Some(plane), Some(needed)) = (plane, needed) else {
            return Err(WmgError::grid(format!(
                "shape (2, {}, {}) is too large",
                nx, ny
            )));
        };
        if data.len() != needed {
            return Err(WmgError::grid(format!(
                "shape (2, {}, {}) needs {} values, got {}",
                nx,
                ny,
                needed,
                data.len()
            )));
        }
        let x = DMatrix::from_row_slice(nx, ny, &data[..plane]);
        let y = DMatrix::from_row_slice(nx, ny, &data[plane..]);
        Self::new(x, y)
    }

    /// Build from nested `[channel][i][j]` vectors, rejecting ragged input.
    pub fn from_nested(xy: &[Vec<Vec<Real>>]) -> WmgResult<Self> {
        if xy.len() != 2 {
            return Err(WmgError::grid(format!(
                "expected 2 coordinate channels, got {}",
                xy.len()
            )));
        }
        let nx = xy[0].len();
        let ny = xy[0].first().map_or(0, Vec::len);
        for (c, channel) in xy.iter().enumerate() {
            if channel.len() != nx || channel.iter().any(|row| row.len() != ny) {
                return Err(WmgError::grid(format!("channel {} is not rectangular", c)));
            }
        }
        let x = DMatrix::from_fn(nx, ny, |i, j| xy[0][i][j]);
        let y = DMatrix::from_fn(nx, ny, |i, j| xy[1][i][j]);
        Self::new(x, y)
    }

    /// Tensor-product grid: point `(i, j)` sits at `(xs[i], ys[j])`.
    pub fn meshgrid(xs: &[Real], ys: &[Real]) -> WmgResult<Self> {
        let x = DMatrix::from_fn(xs.len(), ys.len(), |i, _| xs[i]);
        let y = DMatrix::from_fn(xs.len(), ys.len(), |_, j| ys[j]);
        Self::new(x, y)
    }

    /// Evenly spaced `nx x ny` grid over the given ranges (inclusive).
    pub fn uniform(
        nx: usize,
        ny: usize,
        x_range: (Real, Real),
        y_range: (Real, Real),
    ) -> WmgResult<Self> {
        Self::meshgrid(
            &linspace(x_range.0, x_range.1, nx),
            &linspace(y_range.0, y_range.1, ny),
        )
    }

    /// Evenly spaced `nx x ny` grid over the unit square.
    pub fn unit_square(nx: usize, ny: usize) -> WmgResult<Self> {
        Self::uniform(nx, ny, (0.0, 1.0), (0.0, 1.0))
    }

    /// `(Nx, Ny)`.
    pub fn shape(&self) -> (usize, usize) {
        self.x.shape()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Position of grid point `(i, j)` (panics if out of bounds).
    pub fn point(&self, i: usize, j: usize) -> Point {
        Point::new(self.x[(i, j)], self.y[(i, j)])
    }

    /// All grid points as `(i, j, position)`, in stable index order.
    pub fn points(&self) -> impl Iterator<Item = (usize, usize, Point)> + '_ {
        let (nx, ny) = self.shape();
        (0..nx).flat_map(move |i| (0..ny).map(move |j| (i, j, self.point(i, j))))
    }

    pub fn bounding_rectangle(&self) -> Rect {
        let fold = |m: &DMatrix<Real>| {
            m.iter()
                .fold((Real::INFINITY, Real::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        let (x_min, x_max) = fold(&self.x);
        let (y_min, y_max) = fold(&self.y);
        Rect::new(Point::new(x_min, y_min), Point::new(x_max, y_max))
    }
}

type IndexedPoint = GeomWithData<[Real; 2], usize>;

/// A point found by a neighbour query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    /// Position of the point in the indexed sequence.
    pub index: usize,
    pub distance: Real,
}

/// R-tree over a fixed sequence of points.
///
/// Every query returns neighbours ordered by distance, ties broken by
/// ascending index.
pub struct GeometryIndex {
    points: Vec<Point>,
    tree: RTree<IndexedPoint>,
}

impl GeometryIndex {
    pub fn new(points: Vec<Point>) -> Self {
        let entries = points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new(p.to_array(), i))
            .collect();
        Self {
            points,
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn from_grid(grid: &GridCoords) -> Self {
        Self::new(grid.points().map(|(_, _, p)| p).collect())
    }

    pub fn all_points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounding_rectangle(&self) -> Option<Rect> {
        Rect::from_points(self.points.iter().copied())
    }

    /// The `k` points closest to `query` (fewer if the index is smaller).
    pub fn nearest(&self, query: Point, k: usize) -> Vec<Neighbour> {
        self.nearest_excluding(query, k, None)
    }

    /// As [`nearest`](Self::nearest), never returning the point at `exclude`.
    pub fn nearest_excluding(
        &self,
        query: Point,
        k: usize,
        exclude: Option<usize>,
    ) -> Vec<Neighbour> {
        let excluded = exclude.is_some_and(|e| e < self.points.len());
        let available = self.points.len() - usize::from(excluded);
        let k = k.min(available);
        if k == 0 {
            return Vec::new();
        }

        let mut found: Vec<(Real, usize)> = Vec::with_capacity(k + 1);
        for (item, d2) in self
            .tree
            .nearest_neighbor_iter_with_distance_2(&query.to_array())
        {
            if Some(item.data) == exclude {
                continue;
            }
            // distances arrive in ascending order; collect every tie at the k-th one
            if found.len() >= k && d2 > found[k - 1].0 {
                break;
            }
            found.push((d2, item.data));
        }
        Self::finish(found, Some(k))
    }

    /// Every point at distance `<= radius` from `query`.
    pub fn within_radius(&self, query: Point, radius: Real) -> Vec<Neighbour> {
        if !(radius >= 0.0) {
            return Vec::new();
        }
        let r2 = radius * radius;
        let found = self
            .tree
            .locate_within_distance(query.to_array(), r2)
            .map(|item| (query.distance_sq(self.points[item.data]), item.data))
            .filter(|(d2, _)| *d2 <= r2)
            .collect();
        Self::finish(found, None)
    }

    fn finish(mut found: Vec<(Real, usize)>, limit: Option<usize>) -> Vec<Neighbour> {
        found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        if let Some(k) = limit {
            found.truncate(k);
        }
        found
            .into_iter()
            .map(|(d2, index)| Neighbour {
                index,
                distance: d2.sqrt(),
            })
            .collect()
    }
}

impl fmt::Debug for GeometryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryIndex")
            .field("len", &self.points.len())
            .field("bounds", &self.bounding_rectangle())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_shape_and_order() {
        let grid = GridCoords::meshgrid(&[0.0, 1.0, 2.0], &[10.0, 20.0]).unwrap();
        assert_eq!(grid.shape(), (3, 2));
        let pts: Vec<_> = grid.points().collect();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[1], (0, 1, Point::new(0.0, 20.0)));
        assert_eq!(pts[2], (1, 0, Point::new(1.0, 10.0)));
        let bounds = grid.bounding_rectangle();
        assert_eq!(bounds.min, Point::new(0.0, 10.0));
        assert_eq!(bounds.max, Point::new(2.0, 20.0));
    }

    #[test]
    fn from_array_is_row_major() {
        // (2, 2, 3): x then y channel
        let data = [
            0.0, 0.0, 0.0, 1.0, 1.0, 1.0, //
            0.0, 0.5, 1.0, 0.0, 0.5, 1.0,
        ];
        let grid = GridCoords::from_array([2, 2, 3], &data).unwrap();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.point(1, 2), Point::new(1.0, 1.0));
        assert_eq!(grid.point(0, 1), Point::new(0.0, 0.5));
    }

    #[test]
    fn invalid_grids_rejected() {
        let too_small = GridCoords::meshgrid(&[0.0], &[0.0, 1.0]);
        assert!(matches!(too_small, Err(WmgError::InvalidGrid { .. })));

        let nan = GridCoords::meshgrid(&[0.0, f64::NAN], &[0.0, 1.0]);
        assert!(matches!(nan, Err(WmgError::InvalidGrid { .. })));

        let wrong_len = GridCoords::from_array([2, 2, 2], &[0.0; 7]);
        assert!(matches!(wrong_len, Err(WmgError::InvalidGrid { .. })));

        let overflowing = GridCoords::from_array([2, usize::MAX, 2], &[0.0; 8]);
        assert!(matches!(overflowing, Err(WmgError::InvalidGrid { .. })));
        let overflowing = GridCoords::from_array([2, 1usize << 32, 1usize << 31], &[0.0; 8]);
        assert!(matches!(overflowing, Err(WmgError::InvalidGrid { .. })));

        let ragged = GridCoords::from_nested(&[
            vec![vec![0.0, 1.0], vec![0.0]],
            vec![vec![0.0, 0.0], vec![1.0, 1.0]],
        ]);
        assert!(matches!(ragged, Err(WmgError::InvalidGrid { .. })));

        let flat = GridCoords::meshgrid(&[1.0, 1.0], &[0.0, 1.0]);
        assert!(matches!(flat, Err(WmgError::InvalidGrid { .. })));

        let mismatched = GridCoords::new(DMatrix::zeros(2, 3), DMatrix::zeros(3, 2));
        assert!(matches!(mismatched, Err(WmgError::InvalidGrid { .. })));
    }

    #[test]
    fn nearest_breaks_ties_by_index() {
        // four corners equidistant from the centre
        let index = GeometryIndex::new(vec![
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(5.0, 5.0),
        ]);
        let found = index.nearest(Point::new(0.5, 0.5), 2);
        let ids: Vec<usize> = found.iter().map(|n| n.index).collect();
        assert_eq!(ids, vec![0, 1]);

        let all = index.nearest(Point::new(0.5, 0.5), 10);
        assert_eq!(all.len(), 5);
        assert_eq!(all[4].index, 4);

        assert!(index.nearest(Point::new(0.0, 0.0), 0).is_empty());
    }

    #[test]
    fn huge_k_is_clamped_to_index_size() {
        let index = GeometryIndex::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        assert_eq!(index.nearest(Point::new(0.0, 0.0), usize::MAX).len(), 3);
        assert_eq!(index.nearest(Point::new(0.0, 0.0), 1usize << 40).len(), 3);
        let others = index.nearest_excluding(Point::new(0.0, 0.0), usize::MAX, Some(0));
        let ids: Vec<usize> = others.iter().map(|n| n.index).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn nearest_excluding_skips_self() {
        let index = GeometryIndex::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(3.0, 0.0),
        ]);
        let found = index.nearest_excluding(Point::new(0.0, 0.0), 1, Some(0));
        assert_eq!(found[0].index, 1);
        assert_eq!(found[0].distance, 1.0);
    }

    #[test]
    fn within_radius_is_inclusive() {
        let index = GeometryIndex::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        let found = index.within_radius(Point::new(0.0, 0.0), 1.0);
        let ids: Vec<usize> = found.iter().map(|n| n.index).collect();
        assert_eq!(ids, vec![0, 2, 3]);
        assert!(index.within_radius(Point::new(0.0, 0.0), -1.0).is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn points() -> impl Strategy<Value = Vec<Point>> {
        prop::collection::vec((-10.0_f64..10.0, -10.0_f64..10.0), 1..60)
            .prop_map(|v| v.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    }

    proptest! {
        #[test]
        fn nearest_returns_min_of_k_and_len(
            pts in points(),
            qx in -12.0_f64..12.0,
            qy in -12.0_f64..12.0,
            k in 0_usize..80,
        ) {
            let index = GeometryIndex::new(pts.clone());
            let query = Point::new(qx, qy);
            let found = index.nearest(query, k);
            prop_assert_eq!(found.len(), k.min(pts.len()));

            // sorted by distance, and nothing left out is closer than the last hit
            for pair in found.windows(2) {
                prop_assert!(pair[0].distance <= pair[1].distance);
            }
            if let Some(last) = found.last() {
                let kept: Vec<usize> = found.iter().map(|n| n.index).collect();
                for (i, p) in pts.iter().enumerate() {
                    if !kept.contains(&i) {
                        prop_assert!(query.distance(*p) >= last.distance);
                    }
                }
            }
        }

        #[test]
        fn within_radius_matches_brute_force(
            pts in points(),
            qx in -12.0_f64..12.0,
            qy in -12.0_f64..12.0,
            r in 0.0_f64..8.0,
        ) {
            let index = GeometryIndex::new(pts.clone());
            let query = Point::new(qx, qy);
            let mut got: Vec<usize> = index.within_radius(query, r).iter().map(|n| n.index).collect();
            got.sort_unstable();
            let expected: Vec<usize> = pts
                .iter()
                .enumerate()
                .filter(|(_, p)| query.distance_sq(**p) <= r * r)
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(got, expected);
        }
    }
}
