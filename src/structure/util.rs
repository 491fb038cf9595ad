/* ************************************************************************ **
** This file is part of jdftx-plugin, and is licensed under EITHER the MIT  **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of jdftx-plugin is provided under this permissive  **
** license, and that the project as a whole is licensed under the GPL 3.0.  **
** ************************************************************************ */

// Everything here is row-based: vectors are rows, and a row vector
// multiplies a matrix from the left.

pub type V3 = [f64; 3];
pub type M33 = [V3; 3];

pub fn det(m: &M33) -> f64 {
    let [[a, b, c], [d, e, f], [g, h, i]] = *m;
    a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
}

/// Matrix inverse by cofactors.
///
/// A singular matrix produces non-finite entries rather than a panic.
pub fn inv(m: &M33) -> M33 {
    let [[a, b, c], [d, e, f], [g, h, i]] = *m;
    let rdet = 1.0 / det(m);
    [
        [(e * i - f * h) * rdet, (c * h - b * i) * rdet, (b * f - c * e) * rdet],
        [(f * g - d * i) * rdet, (a * i - c * g) * rdet, (c * d - a * f) * rdet],
        [(d * h - e * g) * rdet, (b * g - a * h) * rdet, (a * e - b * d) * rdet],
    ]
}

pub fn transpose(m: &M33) -> M33 {
    let mut out = [[0.0; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            out[c][r] = m[r][c];
        }
    }
    out
}

pub fn dot_v3_33(v: &V3, m: &M33) -> V3 {
    let mut out = [0.0; 3];
    for k in 0..3 {
        for c in 0..3 {
            out[c] += v[k] * m[k][c];
        }
    }
    out
}

pub fn mat_mul(a: &M33, b: &M33) -> M33 {
    [dot_v3_33(&a[0], b), dot_v3_33(&a[1], b), dot_v3_33(&a[2], b)]
}

/// Multiply each row of an `N x 3` array against a `3 x 3` matrix.
pub fn dot_n3_33(rows: &[V3], m: &M33) -> Vec<V3> {
    rows.iter().map(|v| dot_v3_33(v, m)).collect()
}

pub fn norm(v: &V3) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn exact_inverse() {
        // inverse should be exact for any reasonable algorithm on f64s
        let m = [
            [2.0, 2.0, 0.0],
            [0.0, 4.0, 0.0],
            [0.0, 0.0, 2.0],
        ];
        assert_eq!(inv(&m), [
            [0.5, -0.25, 0.0],
            [0.0,  0.25, 0.0],
            [0.0,   0.0, 0.5],
        ]);
        assert_eq!(mat_mul(&m, &inv(&m)), [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn row_vectors_multiply_from_the_left() {
        let m = [
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 3.0],
        ];
        assert_eq!(dot_n3_33(&[[1.0, 2.0, 1.0]], &m), vec![[2.0, 1.0, 3.0]]);
        assert_eq!(transpose(&[[1.0, 2.0, 3.0], [0.0; 3], [0.0; 3]])[2], [3.0, 0.0, 0.0]);
        assert_eq!(det(&m), -3.0);
    }
}
