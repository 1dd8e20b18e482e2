use serde::{Deserialize, Serialize};

use rhapsim_core::RhapsimError;

use crate::consts::*;

/// Position of a simulated cluster on a flow-cell tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoordinate {
    pub x: u64,
    pub y: u64,
}

///
/// Rectangular grid of cluster positions on one tile.
///
/// Cell indices are laid out row by row, `per_row` positions per row, each
/// `pitch` units apart. Used only to give every cell distinct header
/// coordinates.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub x_min: u64,
    pub x_max: u64,
    pub y_min: u64,
    pub y_max: u64,
    pub pitch: u64,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self {
            x_min: TILE_X_MIN,
            x_max: TILE_X_MAX,
            y_min: TILE_Y_MIN,
            y_max: TILE_Y_MAX,
            pitch: TILE_PITCH,
        }
    }
}

impl TileGrid {
    /// Positions per row; a zero pitch yields an empty grid.
    pub fn per_row(&self) -> u64 {
        self.x_max
            .saturating_sub(self.x_min)
            .checked_div(self.pitch)
            .unwrap_or(0)
    }

    pub fn per_col(&self) -> u64 {
        self.y_max
            .saturating_sub(self.y_min)
            .checked_div(self.pitch)
            .unwrap_or(0)
    }

    /// Number of distinct positions on the grid, saturating at `u64::MAX`.
    pub fn capacity(&self) -> u64 {
        self.per_row().saturating_mul(self.per_col())
    }

    /// Map a 0-based cell index to its coordinate.
    pub fn coordinate(&self, cell_index: u64) -> Result<TileCoordinate, RhapsimError> {
        let per_row = self.per_row();
        if cell_index >= self.capacity() {
            return Err(RhapsimError::CellIndexOutOfRange {
                index: cell_index,
                limit: self.capacity(),
            });
        }

        Ok(TileCoordinate {
            x: self.x_min + (cell_index % per_row) * self.pitch,
            y: self.y_min + (cell_index / per_row) * self.pitch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::collections::HashSet;

    #[fixture]
    fn small_grid() -> TileGrid {
        TileGrid {
            x_min: 10,
            x_max: 60,
            y_min: 100,
            y_max: 130,
            pitch: 9,
        }
    }

    #[rstest]
    fn test_default_grid_dimensions() {
        let grid = TileGrid::default();
        assert_eq!(grid.per_row(), 3551);
        assert_eq!(grid.per_col(), 4006);
        assert_eq!(grid.capacity(), 3551 * 4006);
    }

    #[rstest]
    #[case(0, 1000, 1000)]
    #[case(1, 1009, 1000)]
    #[case(3550, 1000 + 3550 * 9, 1000)]
    #[case(3551, 1000, 1009)]
    #[case(3551 * 4006 - 1, 1000 + 3550 * 9, 1000 + 4005 * 9)]
    fn test_default_grid_coordinates(#[case] index: u64, #[case] x: u64, #[case] y: u64) {
        let coord = TileGrid::default().coordinate(index).unwrap();
        assert_eq!(coord, TileCoordinate { x, y });
    }

    #[rstest]
    fn test_coordinates_stay_within_bounds() {
        let grid = TileGrid::default();
        for index in (0..grid.capacity()).step_by(7919) {
            let coord = grid.coordinate(index).unwrap();
            assert!(coord.x >= grid.x_min && coord.x <= grid.x_max);
            assert!(coord.y >= grid.y_min && coord.y <= grid.y_max);
        }
    }

    #[rstest]
    fn test_mapping_is_injective(small_grid: TileGrid) {
        assert_eq!(small_grid.per_row(), 5);
        assert_eq!(small_grid.per_col(), 3);

        let coords: HashSet<TileCoordinate> = (0..small_grid.capacity())
            .map(|i| small_grid.coordinate(i).unwrap())
            .collect();
        assert_eq!(coords.len() as u64, small_grid.capacity());
    }

    #[rstest]
    fn test_out_of_range_index(small_grid: TileGrid) {
        let result = small_grid.coordinate(15);
        assert!(matches!(
            result,
            Err(RhapsimError::CellIndexOutOfRange { index: 15, limit: 15 })
        ));
        assert!(TileGrid::default().coordinate(3551 * 4006).is_err());
    }

    #[rstest]
    fn test_degenerate_grid_accepts_nothing() {
        let grid = TileGrid {
            x_min: 0,
            x_max: 5,
            y_min: 0,
            y_max: 100,
            pitch: 9,
        };
        assert_eq!(grid.capacity(), 0);
        assert!(grid.coordinate(0).is_err());
    }

    #[rstest]
    fn test_zero_pitch_grid_accepts_nothing() {
        let grid = TileGrid {
            x_min: 0,
            x_max: 100,
            y_min: 0,
            y_max: 100,
            pitch: 0,
        };
        assert_eq!(grid.per_row(), 0);
        assert_eq!(grid.capacity(), 0);
        assert!(matches!(
            grid.coordinate(0),
            Err(RhapsimError::CellIndexOutOfRange { index: 0, limit: 0 })
        ));
        assert!(grid.coordinate(1).is_err());
    }

    #[rstest]
    fn test_huge_grid_capacity_saturates() {
        let grid = TileGrid {
            x_min: 0,
            x_max: u64::MAX,
            y_min: 0,
            y_max: u64::MAX,
            pitch: 1,
        };
        assert_eq!(grid.capacity(), u64::MAX);
        assert_eq!(grid.coordinate(5).unwrap(), TileCoordinate { x: 5, y: 0 });
    }
}
