//! Maximum-weight one-to-one assignment (Hungarian method).

/// Solve a maximum-weight assignment over a rows × columns weight matrix.
///
/// Returns, for each row, the column it is assigned to. Only pairs with
/// `eligible` set are ever reported; other cells act as "leave unassigned".
/// Ragged or empty matrices yield no assignments.
pub fn max_weight_assignment(weights: &[Vec<f64>], eligible: &[Vec<bool>]) -> Vec<Option<usize>> {
    let rows = weights.len();
    let cols = weights.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 || weights.iter().any(|row| row.len() != cols) {
        return vec![None; rows];
    }

    // Square cost matrix; ineligible and padding cells cost nothing.
    let n = rows.max(cols);
    let cost = |i: usize, j: usize| -> f64 {
        if i < rows && j < cols && eligible_at(eligible, i, j) {
            -weights[i][j]
        } else {
            0.0
        }
    };

    // Potentials and matching are 1-based; index 0 is the virtual column.
    let mut u = vec![0.0_f64; n + 1];
    let mut v = vec![0.0_f64; n + 1];
    let mut p = vec![0_usize; n + 1];
    let mut way = vec![0_usize; n + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0;
        let mut minv = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];
        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            if j1 == 0 {
                break;
            }
            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![None; rows];
    for j in 1..=n {
        let i = p[j];
        if i == 0 {
            continue;
        }
        let (row, col) = (i - 1, j - 1);
        if row < rows && col < cols && eligible_at(eligible, row, col) {
            assignment[row] = Some(col);
        }
    }
    assignment
}

fn eligible_at(eligible: &[Vec<bool>], row: usize, col: usize) -> bool {
    eligible
        .get(row)
        .and_then(|r| r.get(col))
        .copied()
        .unwrap_or(false)
}
