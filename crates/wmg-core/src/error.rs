use thiserror::Error;

pub type WmgResult<T> = Result<T, WmgError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WmgError {
    /// Grid coordinates are malformed (too small, ragged or non-finite).
    #[error("Invalid grid: {what}")]
    InvalidGrid { what: String },

    /// Not even one mesh level fits on the grid.
    #[error(
        "Cannot build a mesh on a {nx}x{ny} grid with grid_refinement_factor={grid_refinement_factor}: \
         the first mesh level needs at least 2 nodes along each axis"
    )]
    EmptyHierarchy {
        nx: usize,
        ny: usize,
        grid_refinement_factor: usize,
    },

    /// Connectivity parameters are missing, conflicting or out of range.
    #[error("Invalid connectivity configuration: {what}")]
    ConnectivityConfig { what: String },

    /// A connectivity method was requested by a name nobody implements.
    #[error("Unsupported {kind}: {name}")]
    UnsupportedComponent { kind: &'static str, name: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}

impl WmgError {
    pub fn config(what: impl Into<String>) -> Self {
        WmgError::ConnectivityConfig { what: what.into() }
    }

    pub fn grid(what: impl Into<String>) -> Self {
        WmgError::InvalidGrid { what: what.into() }
    }
}
