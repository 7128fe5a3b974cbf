mod array3_c64;

use ndarray_crate::{Array3 as NdArray3, ShapeBuilder, Zip};
use num_traits::Zero;
use std::ops::{Add, Index, IndexMut};

/// Dense 3-D grid with first-index-fastest (Fortran) memory order, the layout
/// the FFT and the volumetric writers expect.
#[derive(Debug, Clone, PartialEq)]
pub struct Array3<T> {
    shape: [usize; 3],
    data: NdArray3<T>,
}

impl<T: Default + Clone> Default for Array3<T> {
    fn default() -> Self {
        Self {
            shape: [0, 0, 0],
            data: NdArray3::from_elem((0, 0, 0).f(), T::default()),
        }
    }
}

impl<T: Default + Copy + Zero + Add<Output = T>> Array3<T> {
    pub fn new(shape: [usize; 3]) -> Array3<T> {
        Array3 {
            shape,
            data: NdArray3::from_elem((shape[0], shape[1], shape[2]).f(), T::default()),
        }
    }

    pub fn from_vec(shape: [usize; 3], data: Vec<T>) -> Array3<T> {
        assert_eq!(data.len(), shape[0] * shape[1] * shape[2]);

        let data = NdArray3::from_shape_vec((shape[0], shape[1], shape[2]).f(), data)
            .expect("Array3 length checked against shape");

        Array3 { shape, data }
    }

    /// Flat data in memory order, consuming the grid.
    pub fn into_vec(self) -> Vec<T> {
        let (v, _offset) = self.data.into_raw_vec_and_offset();
        v
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn ntot(&self) -> usize {
        self.shape[0] * self.shape[1] * self.shape[2]
    }

    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |s, v| s + *v)
    }

    pub fn set_value(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn as_slice(&self) -> &[T] {
        self.data
            .as_slice_memory_order()
            .expect("Array3 is contiguous in memory order")
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data
            .as_slice_memory_order_mut()
            .expect("Array3 is contiguous in memory order")
    }

    pub fn add_from(&mut self, rhs: &Array3<T>) {
        assert_eq!(self.shape, rhs.shape);

        Zip::from(self.data.view_mut())
            .and(rhs.data.view())
            .for_each(|d, &s| *d = *d + s);
    }

    pub fn map<U, F>(&self, f: F) -> Array3<U>
    where
        U: Default + Copy + Zero + Add<Output = U>,
        F: Fn(&T) -> U,
    {
        Array3 {
            shape: self.shape,
            data: self.data.map(f),
        }
    }
}

impl<T> Index<[usize; 3]> for Array3<T> {
    type Output = T;

    fn index(&self, idx: [usize; 3]) -> &T {
        &self.data[[idx[0], idx[1], idx[2]]]
    }
}

impl<T> IndexMut<[usize; 3]> for Array3<T> {
    fn index_mut(&mut self, idx: [usize; 3]) -> &mut Self::Output {
        &mut self.data[[idx[0], idx[1], idx[2]]]
    }
}
