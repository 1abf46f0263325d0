//! Symmetric sparse matrix with scalar coefficients and 3-vector right-hand sides.
//!
//! The off-diagonal pattern comes from the spring network, so rows are short and a
//! chain of springs produces a tridiagonal matrix. The three spatial axes share the
//! same coefficients and are solved together.

use glam::Vec3;

use crate::error::SimulationError;

/// Row entries `(column, value)` sorted by column.
type SparseRow = Vec<(usize, f32)>;

/// Symmetric matrix storing the diagonal and the strictly lower triangle.
#[derive(Debug, Clone, Default)]
pub struct SymmetricSparseMatrix {
    diagonal: Vec<f32>,
    lower: Vec<SparseRow>,
}

impl SymmetricSparseMatrix {
    pub fn new(dim: usize) -> Self {
        Self {
            diagonal: vec![0.0; dim],
            lower: vec![Vec::new(); dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.diagonal.len()
    }

    fn check_index(&self, index: usize) -> Result<(), SimulationError> {
        if index < self.dim() {
            Ok(())
        } else {
            Err(SimulationError::DimensionMismatch {
                expected: self.dim(),
                found: index + 1,
            })
        }
    }

    pub fn add_diagonal(&mut self, i: usize, value: f32) -> Result<(), SimulationError> {
        self.check_index(i)?;
        self.diagonal[i] += value;
        Ok(())
    }

    /// Adds `value` to both `(i, j)` and `(j, i)`.
    pub fn add_symmetric(&mut self, i: usize, j: usize, value: f32) -> Result<(), SimulationError> {
        if i == j {
            return self.add_diagonal(i, value);
        }
        self.check_index(i)?;
        self.check_index(j)?;

        let (row, col) = if i > j { (i, j) } else { (j, i) };
        let entries = &mut self.lower[row];
        match entries.binary_search_by_key(&col, |&(c, _)| c) {
            Ok(pos) => entries[pos].1 += value,
            Err(pos) => entries.insert(pos, (col, value)),
        }
        Ok(())
    }

    pub fn diagonal(&self, i: usize) -> f32 {
        self.diagonal.get(i).copied().unwrap_or(0.0)
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        if i == j {
            return self.diagonal(i);
        }
        let (row, col) = if i > j { (i, j) } else { (j, i) };
        self.lower
            .get(row)
            .and_then(|entries| {
                entries
                    .binary_search_by_key(&col, |&(c, _)| c)
                    .ok()
                    .map(|pos| entries[pos].1)
            })
            .unwrap_or(0.0)
    }

    /// Number of stored off-diagonal pairs.
    pub fn off_diagonal_count(&self) -> usize {
        self.lower.iter().map(Vec::len).sum()
    }

    pub fn mul_vec(&self, x: &[Vec3]) -> Result<Vec<Vec3>, SimulationError> {
        if x.len() != self.dim() {
            return Err(SimulationError::DimensionMismatch {
                expected: self.dim(),
                found: x.len(),
            });
        }
        let mut y: Vec<Vec3> = self
            .diagonal
            .iter()
            .zip(x)
            .map(|(&d, &xi)| d * xi)
            .collect();
        for (i, entries) in self.lower.iter().enumerate() {
            for &(j, a_ij) in entries {
                y[i] += a_ij * x[j];
                y[j] += a_ij * x[i];
            }
        }
        Ok(y)
    }

    /// Factors the matrix into `L·D·Lᵗ` with unit lower-triangular `L`.
    ///
    /// Elimination only writes entries already present in the pattern, so the result is
    /// exact for patterns without fill-in (chains, trees) and an incomplete factorization
    /// otherwise.
    pub fn factorize(&self) -> Result<LdltFactorization, SimulationError> {
        let dim = self.dim();
        let mut pivots = vec![0.0_f32; dim];
        let mut lower: Vec<SparseRow> = Vec::with_capacity(dim);

        for i in 0..dim {
            let mut row: SparseRow = Vec::with_capacity(self.lower[i].len());
            for &(j, a_ij) in &self.lower[i] {
                let eliminated = weighted_dot(&row, &lower[j], &pivots);
                row.push((j, (a_ij - eliminated) / pivots[j]));
            }

            let pivot = self.diagonal[i]
                - row
                    .iter()
                    .map(|&(k, l_ik)| l_ik * l_ik * pivots[k])
                    .sum::<f32>();
            if !pivot.is_finite() || pivot.abs() <= f32::MIN_POSITIVE {
                return Err(SimulationError::SingularPivot { row: i });
            }
            pivots[i] = pivot;
            lower.push(row);
        }

        let mut upper: Vec<SparseRow> = vec![Vec::new(); dim];
        for (i, row) in lower.iter().enumerate() {
            for &(j, l_ij) in row {
                upper[j].push((i, l_ij));
            }
        }

        Ok(LdltFactorization {
            lower,
            upper,
            pivots,
        })
    }
}

/// `Σ a_k · b_k · d_k` over the columns both rows share.
fn weighted_dot(a: &[(usize, f32)], b: &[(usize, f32)], d: &[f32]) -> f32 {
    let (mut ia, mut ib) = (0, 0);
    let mut sum = 0.0;
    while ia < a.len() && ib < b.len() {
        let (ca, va) = a[ia];
        let (cb, vb) = b[ib];
        if ca == cb {
            sum += va * vb * d[ca];
            ia += 1;
            ib += 1;
        } else if ca < cb {
            ia += 1;
        } else {
            ib += 1;
        }
    }
    sum
}

/// Unit lower-triangular `L`, its transpose and the pivots `D`.
#[derive(Debug, Clone)]
pub struct LdltFactorization {
    lower: Vec<SparseRow>,
    /// `upper[i]` lists `(k, L[k, i])` for `k > i`, i.e. row `i` of `Lᵗ`.
    upper: Vec<SparseRow>,
    pivots: Vec<f32>,
}

impl LdltFactorization {
    pub fn dim(&self) -> usize {
        self.pivots.len()
    }

    pub fn pivot(&self, i: usize) -> f32 {
        self.pivots.get(i).copied().unwrap_or(0.0)
    }

    /// Entry `L[i, j]`; the diagonal is implicitly one.
    pub fn lower(&self, i: usize, j: usize) -> f32 {
        if i == j {
            return 1.0;
        }
        self.lower
            .get(i)
            .and_then(|row| row.iter().find(|&&(c, _)| c == j))
            .map(|&(_, v)| v)
            .unwrap_or(0.0)
    }

    /// Solves `L·Q = G` row by row from the top.
    pub fn forward_substitute(&self, rhs: &[Vec3]) -> Result<Vec<Vec3>, SimulationError> {
        if rhs.len() != self.dim() {
            return Err(SimulationError::DimensionMismatch {
                expected: self.dim(),
                found: rhs.len(),
            });
        }
        let mut q = Vec::with_capacity(rhs.len());
        for (i, &g) in rhs.iter().enumerate() {
            let solved: Vec3 = self.lower[i].iter().map(|&(j, l_ij)| l_ij * q[j]).sum();
            q.push(g - solved);
        }
        Ok(q)
    }

    /// `Q[i] /= D[i, i]`.
    pub fn scale_by_diagonal(&self, q: &mut [Vec3]) {
        for (value, &pivot) in q.iter_mut().zip(&self.pivots) {
            *value /= pivot;
        }
    }

    /// Solves `Lᵗ·X = Q` row by row from the bottom.
    pub fn backward_substitute(&self, q: &[Vec3]) -> Result<Vec<Vec3>, SimulationError> {
        if q.len() != self.dim() {
            return Err(SimulationError::DimensionMismatch {
                expected: self.dim(),
                found: q.len(),
            });
        }
        let mut x = vec![Vec3::ZERO; q.len()];
        for i in (0..q.len()).rev() {
            let solved: Vec3 = self.upper[i].iter().map(|&(k, l_ki)| l_ki * x[k]).sum();
            x[i] = q[i] - solved;
        }
        Ok(x)
    }

    pub fn solve(&self, rhs: &[Vec3]) -> Result<Vec<Vec3>, SimulationError> {
        let mut q = self.forward_substitute(rhs)?;
        self.scale_by_diagonal(&mut q);
        self.backward_substitute(&q)
    }
}
