// column-major memory layout
// [i,j] : i + j * nrow
//   0,0 0,1 0,2        0 2 4
//   1,0 1,1 1,2        1 3 5

mod matrix_c64;
pub use matrix_c64::*;

use std::{
    fmt,
    fmt::{Debug, Display},
    ops::{AddAssign, Mul},
};

#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    #[error("matrix must be square, got {nrow} x {ncol}")]
    NotSquare { nrow: usize, ncol: usize },

    #[error("overlap matrix is not positive definite (smallest eigenvalue {0:e})")]
    NotPositiveDefinite(f64),
}

pub trait Dot<RHS = Self> {
    type Output;

    fn dot(&self, other: &RHS) -> Self::Output;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix<T> {
    nrow: usize,
    ncol: usize,
    data: Vec<T>,
}

impl<T: num_traits::Zero + Default + Copy + AddAssign + Mul<Output = T>> Dot<Matrix<T>>
    for Matrix<T>
{
    type Output = Self;

    fn dot(&self, rhs: &Matrix<T>) -> Self::Output {
        assert_eq!(self.ncol, rhs.nrow);

        let mut mdot = Matrix::<T>::new(self.nrow, rhs.ncol);

        for j in 0..rhs.ncol {
            for k in 0..self.ncol {
                let f = rhs[[k, j]];

                for i in 0..self.nrow {
                    mdot[[i, j]] += self[[i, k]] * f;
                }
            }
        }

        mdot
    }
}

impl<T: num_traits::Zero + Default + Copy> Matrix<T> {
    pub fn new(nrow: usize, ncol: usize) -> Matrix<T> {
        Matrix {
            nrow,
            ncol,
            data: vec![T::default(); nrow * ncol],
        }
    }

    /// Takes ownership of column-major data.
    pub fn from_col_vec(nrow: usize, ncol: usize, data: Vec<T>) -> Matrix<T> {
        assert_eq!(data.len(), nrow * ncol);

        Matrix { nrow, ncol, data }
    }

    pub fn from_row_slice(nrow: usize, ncol: usize, s: &[T]) -> Matrix<T> {
        assert_eq!(s.len(), nrow * ncol);

        let mut mat = Matrix::<T>::new(nrow, ncol);

        for i in 0..nrow {
            for j in 0..ncol {
                mat[[i, j]] = s[i * ncol + j];
            }
        }

        mat
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn set_col(&mut self, icol: usize, v: &[T]) {
        let n1 = icol * self.nrow;
        let n2 = n1 + self.nrow;

        self.data[n1..n2].copy_from_slice(v);
    }

    pub fn get_col(&self, icol: usize) -> &[T] {
        let n1 = icol * self.nrow;
        let n2 = n1 + self.nrow;

        &self.data[n1..n2]
    }
}

impl<T> std::ops::Index<[usize; 2]> for Matrix<T> {
    type Output = T;

    fn index(&self, idx: [usize; 2]) -> &T {
        &self.data[idx[0] + idx[1] * self.nrow]
    }
}

impl<T> std::ops::IndexMut<[usize; 2]> for Matrix<T> {
    fn index_mut(&mut self, idx: [usize; 2]) -> &mut Self::Output {
        &mut self.data[idx[0] + idx[1] * self.nrow]
    }
}

impl<T: Debug + Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for i in 0..self.nrow {
            write!(f, " | ")?;
            for j in 0..self.ncol {
                write!(f, "{:+8.3} ", self[[i, j]])?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_and_dot() {
        let m = Matrix::<f64>::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        assert_eq!(m.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(m.get_col(1), &[2.0, 5.0]);

        let mt = Matrix::<f64>::from_row_slice(3, 2, &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

        let p = m.dot(&mt);

        assert_eq!(p.nrow(), 2);
        assert_eq!(p[[0, 0]], 14.0);
        assert_eq!(p[[0, 1]], 32.0);
        assert_eq!(p[[1, 1]], 77.0);
    }
}
