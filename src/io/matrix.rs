//! Dense column-major matrices and their binary container.
//!
//! On disk a matrix is an 8-byte header (`i32` row count, `i32` column
//! count, native endian) followed by the elements in row-major order.
//! Several matrices may be concatenated in one buffer or file.

use std::fs;
use std::mem::size_of;
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use bytes::{Buf, BufMut, BytesMut};

use crate::mesh_error::MeshError;

/// Column-major `nrows × ncols` matrix; one column per entity.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix<T: Pod> {
    nrows: usize,
    ncols: usize,
    data: Vec<T>,
}

impl<T: Pod> DenseMatrix<T> {
    /// Zero-filled matrix.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            data: vec![T::zeroed(); nrows * ncols],
        }
    }

    /// Wrap column-major `data`.
    ///
    /// # Panics
    /// If `data.len() != nrows * ncols`.
    pub fn from_col_major(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "{nrows}x{ncols} matrix needs {} elements",
            nrows * ncols
        );
        Self { nrows, ncols, data }
    }

    /// Matrix whose columns are the given fixed-size arrays.
    pub fn from_columns<const R: usize>(columns: &[[T; R]]) -> Self {
        Self {
            nrows: R,
            ncols: columns.len(),
            data: columns.iter().flatten().copied().collect(),
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(row < self.nrows && col < self.ncols, "({row}, {col}) out of range");
        self.data[col * self.nrows + row]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(row < self.nrows && col < self.ncols, "({row}, {col}) out of range");
        self.data[col * self.nrows + row] = value;
    }

    pub fn column(&self, col: usize) -> &[T] {
        assert!(col < self.ncols, "column {col} out of range");
        &self.data[col * self.nrows..(col + 1) * self.nrows]
    }

    pub fn column_mut(&mut self, col: usize) -> &mut [T] {
        assert!(col < self.ncols, "column {col} out of range");
        &mut self.data[col * self.nrows..(col + 1) * self.nrows]
    }

    pub fn columns(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.ncols).map(move |c| self.column(c))
    }

    /// Column-major element storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MatrixHeader {
    nrows: i32,
    ncols: i32,
}

fn dim_to_i32(n: usize, what: &str) -> Result<i32, MeshError> {
    i32::try_from(n).map_err(|_| MeshError::MatrixFormat(format!("{what} {n} exceeds i32")))
}

/// Append `m` to `buf` in the container layout.
pub fn encode_matrix<T: Pod, B: BufMut>(buf: &mut B, m: &DenseMatrix<T>) -> Result<(), MeshError> {
    let hdr = MatrixHeader {
        nrows: dim_to_i32(m.nrows, "row count")?,
        ncols: dim_to_i32(m.ncols, "column count")?,
    };
    buf.put_slice(bytemuck::bytes_of(&hdr));
    for r in 0..m.nrows {
        for c in 0..m.ncols {
            buf.put_slice(bytemuck::bytes_of(&m.get(r, c)));
        }
    }
    Ok(())
}

/// Read one matrix from the front of `buf`, advancing past it.
pub fn decode_matrix<T: Pod, B: Buf>(buf: &mut B) -> Result<DenseMatrix<T>, MeshError> {
    let mut raw = [0u8; size_of::<MatrixHeader>()];
    if buf.remaining() < raw.len() {
        return Err(MeshError::MatrixFormat(format!(
            "truncated header: {} bytes left",
            buf.remaining()
        )));
    }
    buf.copy_to_slice(&mut raw);
    let hdr: MatrixHeader = bytemuck::pod_read_unaligned(&raw);
    let (Ok(nrows), Ok(ncols)) = (usize::try_from(hdr.nrows), usize::try_from(hdr.ncols)) else {
        return Err(MeshError::MatrixFormat(format!(
            "negative shape {}x{}",
            hdr.nrows, hdr.ncols
        )));
    };
    let n_bytes = nrows
        .checked_mul(ncols)
        .and_then(|n| n.checked_mul(size_of::<T>()))
        .ok_or_else(|| MeshError::MatrixFormat(format!("shape {nrows}x{ncols} overflows")))?;
    if buf.remaining() < n_bytes {
        return Err(MeshError::MatrixFormat(format!(
            "{nrows}x{ncols} payload needs {n_bytes} bytes, {} left",
            buf.remaining()
        )));
    }
    let payload = buf.copy_to_bytes(n_bytes);
    let mut m = DenseMatrix::zeros(nrows, ncols);
    let mut elems = payload.chunks_exact(size_of::<T>().max(1));
    for r in 0..nrows {
        for c in 0..ncols {
            if let Some(chunk) = elems.next() {
                m.set(r, c, bytemuck::pod_read_unaligned(chunk));
            }
        }
    }
    Ok(m)
}

pub fn read_matrix<T: Pod>(path: impl AsRef<Path>) -> Result<DenseMatrix<T>, MeshError> {
    let bytes = fs::read(path.as_ref())?;
    let mut buf = bytes.as_slice();
    let m = decode_matrix(&mut buf)?;
    if buf.has_remaining() {
        log::debug!(
            "{}: {} trailing bytes after matrix",
            path.as_ref().display(),
            buf.remaining()
        );
    }
    Ok(m)
}

pub fn write_matrix<T: Pod>(path: impl AsRef<Path>, m: &DenseMatrix<T>) -> Result<(), MeshError> {
    let mut buf = BytesMut::with_capacity(size_of::<MatrixHeader>() + m.len() * size_of::<T>());
    encode_matrix(&mut buf, m)?;
    fs::write(path, &buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_major_access() {
        let m = DenseMatrix::from_columns(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!((m.nrows(), m.ncols()), (3, 2));
        assert_eq!(m.get(2, 0), 3.0);
        assert_eq!(m.column(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn payload_is_row_major() {
        let m = DenseMatrix::from_columns(&[[1i32, 2], [3, 4], [5, 6]]);
        let mut buf = Vec::new();
        encode_matrix(&mut buf, &m).unwrap();
        let words: Vec<i32> = buf
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned)
            .collect();
        assert_eq!(words, vec![2, 3, 1, 3, 5, 2, 4, 6]);
    }

    #[test]
    fn concatenated_matrices_decode_in_order() {
        let a = DenseMatrix::from_columns(&[[0.5f64, 1.5, 2.5]]);
        let b = DenseMatrix::from_columns(&[[7i32, 8, 9, 10], [1, 2, 3, 4]]);
        let mut buf = BytesMut::new();
        encode_matrix(&mut buf, &a).unwrap();
        encode_matrix(&mut buf, &b).unwrap();
        let mut rd = buf.freeze();
        assert_eq!(decode_matrix::<f64, _>(&mut rd).unwrap(), a);
        assert_eq!(decode_matrix::<i32, _>(&mut rd).unwrap(), b);
        assert!(!rd.has_remaining());
    }

    #[test]
    fn truncated_input_is_an_error() {
        let m = DenseMatrix::from_columns(&[[1.0f64, 2.0]]);
        let mut buf = Vec::new();
        encode_matrix(&mut buf, &m).unwrap();
        buf.pop();
        let err = decode_matrix::<f64, _>(&mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, MeshError::MatrixFormat(_)));
        let err = decode_matrix::<f64, _>(&mut &buf[..5]).unwrap_err();
        assert!(matches!(err, MeshError::MatrixFormat(_)));
    }

    #[test]
    fn negative_shape_is_rejected() {
        let mut buf = Vec::new();
        buf.put_i32_ne(-1);
        buf.put_i32_ne(2);
        assert!(matches!(
            decode_matrix::<f64, _>(&mut buf.as_slice()),
            Err(MeshError::MatrixFormat(_))
        ));
    }

    #[test]
    fn empty_matrix_round_trips() {
        let m: DenseMatrix<f64> = DenseMatrix::zeros(3, 0);
        let mut buf = Vec::new();
        encode_matrix(&mut buf, &m).unwrap();
        assert_eq!(buf.len(), 8);
        assert_eq!(decode_matrix::<f64, _>(&mut buf.as_slice()).unwrap(), m);
    }
}
