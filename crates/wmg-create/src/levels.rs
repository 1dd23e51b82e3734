//! Mesh level hierarchy: how many nodes each level has and where they sit.
//!
//! Level 1 is the finest mesh level, placed `grid_refinement_factor` times
//! coarser than the grid. Each further level is `level_refinement_factor`
//! times coarser than the one below it.

use wmg_core::{Point, Real, Rect, WmgError, WmgResult, ceil_div};

use crate::grid::GridCoords;

/// Refinement factors controlling the level hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefinementParams {
    /// Grid points per finest-level mesh cell, along each axis.
    pub grid_refinement_factor: usize,
    /// Ratio between the node spacing of consecutive levels.
    pub level_refinement_factor: usize,
    /// Upper bound on the number of levels; `None` builds until the mesh
    /// cannot shrink any further.
    pub max_num_levels: Option<usize>,
}

impl Default for RefinementParams {
    fn default() -> Self {
        Self {
            grid_refinement_factor: 3,
            level_refinement_factor: 3,
            max_num_levels: None,
        }
    }
}

impl RefinementParams {
    /// A single level `grid_refinement_factor` times coarser than the grid.
    pub fn single_level(grid_refinement_factor: usize) -> Self {
        Self {
            grid_refinement_factor,
            max_num_levels: Some(1),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> WmgResult<()> {
        if self.grid_refinement_factor < 1 {
            return Err(WmgError::config("grid_refinement_factor must be at least 1"));
        }
        if self.level_refinement_factor < 2 {
            return Err(WmgError::config(format!(
                "level_refinement_factor must be at least 2, got {}",
                self.level_refinement_factor
            )));
        }
        if self.max_num_levels == Some(0) {
            return Err(WmgError::config("max_num_levels must be at least 1"));
        }
        Ok(())
    }
}

/// Node spacing of a regular mesh level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshSpacing {
    pub dx: Real,
    pub dy: Real,
}

impl MeshSpacing {
    /// Length of a cell diagonal, the longest edge in the 8-neighbour lattice.
    pub fn diagonal(&self) -> Real {
        self.dx.hypot(self.dy)
    }
}

/// One level of the mesh: a regular `nx x ny` lattice of node positions.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshLevel {
    /// 1-based level number; 1 is the finest.
    pub level: u32,
    pub nx: usize,
    pub ny: usize,
    pub spacing: MeshSpacing,
    /// Row-major: node `(i, j)` is at `positions[i * ny + j]`.
    pub positions: Vec<Point>,
}

impl MeshLevel {
    /// Place `nx x ny` nodes at the centres of an even subdivision of `bounds`.
    ///
    /// Node `(i, j)` sits at `min + ((i + 0.5) dx, (j + 0.5) dy)`, so every
    /// node lies strictly inside the rectangle.
    pub fn new(level: u32, bounds: Rect, nx: usize, ny: usize) -> Self {
        let dx = bounds.width() / nx as Real;
        let dy = bounds.height() / ny as Real;
        let mut positions = Vec::with_capacity(nx * ny);
        for i in 0..nx {
            for j in 0..ny {
                positions.push(Point::new(
                    bounds.min.x + dx * (i as Real + 0.5),
                    bounds.min.y + dy * (j as Real + 0.5),
                ));
            }
        }
        Self {
            level,
            nx,
            ny,
            spacing: MeshSpacing { dx, dy },
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.ny + j
    }

    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.ny, index % self.ny)
    }
}

/// Computes the mesh levels for a grid.
#[derive(Debug, Clone, Copy)]
pub struct LevelHierarchyBuilder {
    params: RefinementParams,
}

impl LevelHierarchyBuilder {
    pub fn new(params: RefinementParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RefinementParams {
        &self.params
    }

    /// Node counts `(nx, ny)` per level, finest first.
    ///
    /// Level counts are integer ceilings, so an axis of `grf * lrf^k` points
    /// yields exactly `lrf^k`, `lrf^(k-1)`, ... nodes on successive levels.
    pub fn level_shapes(&self, grid_shape: (usize, usize)) -> WmgResult<Vec<(usize, usize)>> {
        self.params.validate()?;
        let RefinementParams {
            grid_refinement_factor: grf,
            level_refinement_factor: lrf,
            max_num_levels,
        } = self.params;

        let (grid_nx, grid_ny) = grid_shape;
        let mut shape = (ceil_div(grid_nx, grf), ceil_div(grid_ny, grf));
        if shape.0 < 2 || shape.1 < 2 {
            return Err(WmgError::EmptyHierarchy {
                nx: grid_nx,
                ny: grid_ny,
                grid_refinement_factor: grf,
            });
        }

        let mut shapes = Vec::new();
        while shape.0 >= 2 && shape.1 >= 2 {
            if max_num_levels.is_some_and(|max| shapes.len() >= max) {
                break;
            }
            shapes.push(shape);
            shape = (ceil_div(shape.0, lrf), ceil_div(shape.1, lrf));
        }
        Ok(shapes)
    }

    /// All levels for `grid`, finest first, spanning its bounding rectangle.
    pub fn build(&self, grid: &GridCoords) -> WmgResult<Vec<MeshLevel>> {
        let bounds = grid.bounding_rectangle();
        let levels: Vec<MeshLevel> = self
            .level_shapes(grid.shape())?
            .into_iter()
            .zip(1u32..)
            .map(|((nx, ny), level)| MeshLevel::new(level, bounds, nx, ny))
            .collect();

        tracing::debug!(
            num_levels = levels.len(),
            finest = ?levels.first().map(|l| (l.nx, l.ny)),
            coarsest = ?levels.last().map(|l| (l.nx, l.ny)),
            "mesh hierarchy computed"
        );
        Ok(levels)
    }
}
