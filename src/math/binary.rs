//! Binary blob format for dense matrices.
//!
//! Layout (little-endian), compatible with gonum's `mat.Dense` marshalling:
//!
//! | offset | size | field                   |
//! |--------|------|-------------------------|
//! | 0      | 4    | version (`u32`, = 1)    |
//! | 4      | 1    | form (`b'G'`)           |
//! | 5      | 1    | packing (`b'F'`)        |
//! | 6      | 1    | uplo (`b'A'`)           |
//! | 7      | 1    | unit (`0`)              |
//! | 8      | 8    | rows (`i64`)            |
//! | 16     | 8    | cols (`i64`)            |
//! | 24     | 8    | ku (`i64`, = 0)         |
//! | 32     | 8    | kl (`i64`, = 0)         |
//! | 40     | 8·n  | row-major `f64` entries |

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Read, Write};

use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

pub const HEADER_SIZE: usize = 40;
pub const VERSION: u32 = 1;

const FORM_GENERAL: u8 = b'G';
const PACKING_FULL: u8 = b'F';
const UPLO_ALL: u8 = b'A';

/// Writes `matrix` as header + row-major payload.
pub fn write_matrix<W: Write>(w: &mut W, matrix: &Matrix) -> io::Result<()> {
    w.write_u32::<LittleEndian>(VERSION)?;
    w.write_u8(FORM_GENERAL)?;
    w.write_u8(PACKING_FULL)?;
    w.write_u8(UPLO_ALL)?;
    w.write_u8(0)?;
    w.write_i64::<LittleEndian>(matrix.rows() as i64)?;
    w.write_i64::<LittleEndian>(matrix.cols() as i64)?;
    w.write_i64::<LittleEndian>(0)?;
    w.write_i64::<LittleEndian>(0)?;

    for &v in matrix.as_slice() {
        w.write_f64::<LittleEndian>(v)?;
    }
    Ok(())
}

pub fn encode(matrix: &Matrix) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + matrix.as_slice().len() * 8);
    write_matrix(&mut buf, matrix)?;
    Ok(buf)
}

/// Total blob size in bytes for a `rows × cols` matrix, `None` on overflow.
pub fn blob_len(rows: usize, cols: usize) -> Option<usize> {
    rows.checked_mul(cols)?.checked_mul(8)?.checked_add(HEADER_SIZE)
}

/// Decodes a complete blob. Trailing or missing payload bytes are an error.
pub fn decode(bytes: &[u8]) -> Result<Matrix> {
    if bytes.len() < HEADER_SIZE {
        return Err(NetError::Format(format!(
            "matrix blob too short: {} bytes, header needs {HEADER_SIZE}",
            bytes.len()
        )));
    }

    let mut r = Cursor::new(bytes);
    let version = r.read_u32::<LittleEndian>()?;
    if version != VERSION {
        return Err(NetError::Format(format!("unsupported matrix blob version {version}")));
    }

    let mut tags = [0u8; 4];
    r.read_exact(&mut tags)?;
    if tags != [FORM_GENERAL, PACKING_FULL, UPLO_ALL, 0] {
        return Err(NetError::Format(format!("not a general dense matrix blob: tags {tags:?}")));
    }

    let rows = r.read_i64::<LittleEndian>()?;
    let cols = r.read_i64::<LittleEndian>()?;
    let ku = r.read_i64::<LittleEndian>()?;
    let kl = r.read_i64::<LittleEndian>()?;

    if rows <= 0 || cols <= 0 {
        return Err(NetError::Format(format!("bad matrix dimensions {rows}x{cols}")));
    }
    if ku != 0 || kl != 0 {
        return Err(NetError::Format(format!("unexpected band widths ku={ku} kl={kl}")));
    }

    let (rows, cols) = (rows as usize, cols as usize);
    let payload = bytes.len() - HEADER_SIZE;
    let expected = blob_len(rows, cols)
        .map(|n| n - HEADER_SIZE)
        .ok_or_else(|| NetError::Format(format!("matrix dimensions {rows}x{cols} overflow")))?;
    if payload != expected {
        return Err(NetError::Format(format!(
            "matrix payload is {payload} bytes, {rows}x{cols} needs {expected}"
        )));
    }

    let mut data = vec![0.0; rows * cols];
    r.read_f64_into::<LittleEndian>(&mut data)?;

    Matrix::from_vec(rows, cols, data)
}
