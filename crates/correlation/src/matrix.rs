use crate::align::AlignedPair;
use crate::pearson::pearson;
use crate::returns::ReturnSeries;
use core_types::AssetId;
use serde::Serialize;
use std::collections::HashMap;

/// A square Pearson-correlation table over one lookback window. Rows and
/// columns are the same ordered asset list; the diagonal is fixed at 1.0
/// and never computed; `None` cells mark undefined coefficients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    lookback_days: u32,
    assets: Vec<AssetId>,
    cells: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    fn new(lookback_days: u32, assets: Vec<AssetId>) -> Self {
        let n = assets.len();
        let mut cells = vec![vec![None; n]; n];
        for (i, row) in cells.iter_mut().enumerate() {
            row[i] = Some(1.0);
        }
        Self {
            lookback_days,
            assets,
            cells,
        }
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    /// The ordered asset list labelling both rows and columns.
    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    /// Cell by row/column position.
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells[row][col]
    }

    /// Cell by asset pair. `None` for an asset absent from this run as well
    /// as for an undefined coefficient.
    pub fn get(&self, a: &AssetId, b: &AssetId) -> Option<f64> {
        let row = self.assets.iter().position(|asset| asset == a)?;
        let col = self.assets.iter().position(|asset| asset == b)?;
        self.cells[row][col]
    }

    pub fn contains(&self, asset: &AssetId) -> bool {
        self.assets.iter().any(|a| a == asset)
    }

    pub fn size(&self) -> usize {
        self.assets.len()
    }
}

/// A stateless calculator that assembles one correlation matrix per
/// configured lookback window.
#[derive(Debug, Default)]
pub struct CorrelationEngine {}

impl CorrelationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every ordered pair of assets through alignment and correlation,
    /// once per lookback window.
    ///
    /// # Arguments
    ///
    /// * `assets` - The ordered asset list for the run. Assets with no entry
    ///   in `returns` (failed loads) are dropped from the matrix, not
    ///   treated as errors.
    /// * `returns` - One return series per successfully loaded asset.
    /// * `lookbacks` - The lookback window sizes, in days.
    ///
    /// # Returns
    ///
    /// One `CorrelationMatrix` per lookback, in the order given.
    pub fn build_matrices(
        &self,
        assets: &[AssetId],
        returns: &HashMap<AssetId, ReturnSeries>,
        lookbacks: &[u32],
    ) -> Vec<CorrelationMatrix> {
        let assets: Vec<AssetId> = assets
            .iter()
            .filter(|asset| returns.contains_key(asset))
            .cloned()
            .collect();

        let mut matrices = Vec::with_capacity(lookbacks.len());
        for &lookback in lookbacks {
            let mut matrix = CorrelationMatrix::new(lookback, assets.clone());

            // Ordered pairs: (A,B) and (B,A) are each computed in full. The
            // two coefficients agree up to summation order, which is within
            // the published tolerance.
            for (i, a) in assets.iter().enumerate() {
                for (j, b) in assets.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    tracing::debug!(%a, %b, lookback, "computing pair correlation");
                    let pair = AlignedPair::join(&returns[a], &returns[b]);
                    matrix.cells[i][j] = pearson(&pair, lookback as usize);
                }
            }

            matrices.push(matrix);
        }

        matrices
    }
}
