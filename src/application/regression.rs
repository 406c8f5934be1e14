// Least-squares trend lines fitted over aligned chart points

/// Pivot magnitude below which the normal equations are treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Polynomial coefficients, lowest order first, fitted to `(xs, ys)`.
///
/// The degree is clamped to `points - 1`. Returns `None` for empty or
/// mismatched input, or when the system is numerically singular.
pub fn polynomial_fit(xs: &[f64], ys: &[f64], degree: usize) -> Option<Vec<f64>> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }
    let degree = degree.min(xs.len() - 1);
    let size = degree + 1;

    // Normal equations: (X^T X) c = X^T y, as an augmented matrix
    let mut matrix = vec![vec![0.0; size + 1]; size];
    for (x, y) in xs.iter().zip(ys) {
        let powers: Vec<f64> = (0..=2 * degree).map(|p| x.powi(p as i32)).collect();
        for row in 0..size {
            for col in 0..size {
                matrix[row][col] += powers[row + col];
            }
            matrix[row][size] += powers[row] * y;
        }
    }

    solve(matrix)
}

/// Gauss-Jordan elimination with partial pivoting on an augmented matrix.
fn solve(mut matrix: Vec<Vec<f64>>) -> Option<Vec<f64>> {
    let size = matrix.len();
    for col in 0..size {
        let pivot = (col..size).max_by(|a, b| {
            matrix[*a][col]
                .abs()
                .total_cmp(&matrix[*b][col].abs())
        })?;
        if matrix[pivot][col].abs() < SINGULAR_EPSILON {
            return None;
        }
        matrix.swap(col, pivot);

        let lead = matrix[col][col];
        for value in matrix[col].iter_mut() {
            *value /= lead;
        }
        for row in 0..size {
            if row == col {
                continue;
            }
            let factor = matrix[row][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..=size {
                let delta = factor * matrix[col][k];
                matrix[row][k] -= delta;
            }
        }
    }

    let coefficients: Vec<f64> = matrix.iter().map(|row| row[size]).collect();
    coefficients
        .iter()
        .all(|c| c.is_finite())
        .then_some(coefficients)
}

pub fn evaluate(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Fitted values at each `x`. Positions are shifted to start at zero before
/// fitting so large axis indexes stay well conditioned.
pub fn regression_values(xs: &[f64], ys: &[f64], degree: usize) -> Option<Vec<f64>> {
    let origin = *xs.first()?;
    let shifted: Vec<f64> = xs.iter().map(|x| x - origin).collect();
    let coefficients = polynomial_fit(&shifted, ys, degree)?;
    Some(shifted.iter().map(|x| evaluate(&coefficients, *x)).collect())
}
