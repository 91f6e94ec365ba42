//! Fixture writers shared by the integration tests. Each writes the same
//! padded test volume in one of the supported file formats.
#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::{indices, Array, ArrayD, ArrayViewD, Axis, Dimension, IxDyn, Slice};
use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tiff::encoder::{colortype, TiffEncoder};
use zip::write::FileOptions;

pub const OFFSET: [usize; 3] = [10, 10, 10];
pub const SHAPE: [usize; 3] = [20, 20, 20];
pub const PADDED_SHAPE: [usize; 3] = [40, 40, 40];
pub const PAD_VALUE: u8 = 1;
pub const INTERNAL_PATH: &str = "volume";

/// The volume expected back when reading `SHAPE` at `OFFSET`. Values vary
/// along every axis and never equal the padding.
pub fn inner_array() -> ArrayD<u8> {
    Array::from_shape_fn(IxDyn(&SHAPE), |ix| {
        (PAD_VALUE as usize + 1 + (ix[0] * 37 + ix[1] * 11 + ix[2] * 3) % 250) as u8
    })
}

/// `inner_array` placed at `OFFSET` in a buffer filled with `PAD_VALUE`.
pub fn padded_array() -> ArrayD<u8> {
    let mut padded = ArrayD::from_elem(IxDyn(&PADDED_SHAPE), PAD_VALUE);
    padded
        .slice_each_axis_mut(|d| {
            let i = d.axis.index();
            Slice::from(OFFSET[i]..OFFSET[i] + SHAPE[i])
        })
        .assign(&inner_array());
    padded
}

/// Encode a `.npy` file in memory.
pub fn npy_bytes(descr: &str, shape: &[usize], fortran: bool, data: &[u8]) -> Vec<u8> {
    let shape_str = if shape.len() == 1 {
        format!("({},)", shape[0])
    } else {
        let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
        format!("({})", dims.join(", "))
    };
    let mut header = format!(
        "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
        descr,
        if fortran { "True" } else { "False" },
        shape_str
    );
    // magic, version and length take 10 bytes; the whole header ends on a
    // multiple of 64 with a newline
    let unpadded = 10 + header.len() + 1;
    header.extend(std::iter::repeat(' ').take((64 - unpadded % 64) % 64));
    header.push('\n');

    let mut out = b"\x93NUMPY\x01\x00".to_vec();
    out.extend(&(header.len() as u16).to_le_bytes());
    out.extend(header.as_bytes());
    out.extend(data);
    out
}

fn u8_npy_bytes(array: &ArrayD<u8>) -> Vec<u8> {
    let data: Vec<u8> = array.iter().copied().collect();
    npy_bytes("|u1", array.shape(), false, &data)
}

pub fn write_npy(path: &Path, array: &ArrayD<u8>) {
    fs::write(path, u8_npy_bytes(array)).unwrap();
}

pub fn write_npz(path: &Path, name: &str, array: &ArrayD<u8>) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    zip.start_file(format!("{}.npy", name), FileOptions::default())
        .unwrap();
    zip.write_all(&u8_npy_bytes(array)).unwrap();
    let _ = zip.finish().unwrap();
}

fn to_nested(view: ArrayViewD<u8>) -> Value {
    if view.ndim() == 0 {
        return json!(view.iter().next().copied().unwrap_or(0));
    }
    Value::Array(view.outer_iter().map(to_nested).collect())
}

pub fn write_json(path: &Path, key: Option<&str>, array: &ArrayD<u8>) {
    let nested = to_nested(array.view());
    let doc = match key {
        Some(key) => json!({ key: nested }),
        None => nested,
    };
    fs::write(path, doc.to_string()).unwrap();
}

fn grid_counts(shape: &[usize], block: &[usize]) -> Vec<usize> {
    shape
        .iter()
        .zip(block)
        .map(|(&s, &b)| (s + b - 1) / b)
        .collect()
}

fn block_view<'a>(array: &'a ArrayD<u8>, position: &[usize], block: &[usize]) -> ArrayViewD<'a, u8> {
    array.slice_each_axis(|d| {
        let i = d.axis.index();
        let start = position[i] * block[i];
        Slice::from(start..(start + block[i]).min(array.shape()[i]))
    })
}

/// Write an N5 container holding `array` as a `uint8` dataset. `block` is
/// given in C order.
pub fn write_n5(root: &Path, dataset: &str, array: &ArrayD<u8>, block: &[usize], gzip: bool) {
    let dir = root.join(dataset);
    fs::create_dir_all(&dir).unwrap();
    fs::write(root.join("attributes.json"), r#"{"n5": "2.0.0"}"#).unwrap();

    let reversed = |v: &[usize]| v.iter().rev().copied().collect::<Vec<_>>();
    let compression = if gzip {
        json!({"type": "gzip", "level": -1})
    } else {
        json!({"type": "raw"})
    };
    let attributes = json!({
        "dimensions": reversed(array.shape()),
        "blockSize": reversed(block),
        "dataType": "uint8",
        "compression": compression,
    });
    fs::write(dir.join("attributes.json"), attributes.to_string()).unwrap();

    for position in indices(IxDyn(&grid_counts(array.shape(), block))) {
        let position = position.slice().to_vec();
        let view = block_view(array, &position, block);

        let mut bytes = vec![0u8, 0];
        bytes.extend(&(view.ndim() as u16).to_be_bytes());
        for d in view.shape().iter().rev() {
            bytes.extend(&(*d as u32).to_be_bytes());
        }
        let data: Vec<u8> = view.iter().copied().collect();
        if gzip {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&data).unwrap();
            bytes.extend(encoder.finish().unwrap());
        } else {
            bytes.extend(data);
        }

        let mut path = dir.clone();
        for p in position.iter().rev() {
            path.push(p.to_string());
        }
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, bytes).unwrap();
    }
}

/// Write an HDF5 file holding `array` as a `uint8` dataset.
#[cfg(feature = "hdf5")]
pub fn write_hdf5(path: &Path, dataset: &str, array: &ArrayD<u8>) {
    let file = hdf5::File::create(path).unwrap();
    let _ = file
        .new_dataset_builder()
        .with_data(array)
        .create(dataset)
        .unwrap();
}

/// Write a Zarr v2 group holding `array` as an uncompressed `|u1` array.
pub fn write_zarr(root: &Path, dataset: &str, array: &ArrayD<u8>, chunks: &[usize]) {
    let dir = root.join(dataset);
    fs::create_dir_all(&dir).unwrap();
    fs::write(root.join(".zgroup"), r#"{"zarr_format": 2}"#).unwrap();
    let metadata = json!({
        "zarr_format": 2,
        "shape": array.shape(),
        "chunks": chunks,
        "dtype": "|u1",
        "compressor": null,
        "fill_value": 0,
        "order": "C",
        "filters": null,
    });
    fs::write(dir.join(".zarray"), metadata.to_string()).unwrap();

    for position in indices(IxDyn(&grid_counts(array.shape(), chunks))) {
        let position = position.slice().to_vec();
        let view = block_view(array, &position, chunks);
        // edge chunks are stored at full size
        let mut chunk = ArrayD::<u8>::zeros(IxDyn(chunks));
        chunk
            .slice_each_axis_mut(|d| Slice::from(0..view.shape()[d.axis.index()]))
            .assign(&view);
        let name: Vec<String> = position.iter().map(|p| p.to_string()).collect();
        let data: Vec<u8> = chunk.iter().copied().collect();
        fs::write(dir.join(name.join(".")), data).unwrap();
    }
}

/// Write each slice along axis 0 as a grayscale page of a TIFF file.
pub fn write_tiff(path: &Path, array: &ArrayD<u8>) {
    let mut encoder = TiffEncoder::new(File::create(path).unwrap()).unwrap();
    let (height, width) = (array.shape()[1] as u32, array.shape()[2] as u32);
    for plane in array.axis_iter(Axis(0)) {
        let data: Vec<u8> = plane.iter().copied().collect();
        encoder
            .write_image::<colortype::Gray8>(width, height, &data)
            .unwrap();
    }
}

/// Write each slice along axis 0 of a `(z, y, x, 3)` array as an RGB page of
/// a TIFF file.
pub fn write_tiff_rgb(path: &Path, array: &ArrayD<u8>) {
    let mut encoder = TiffEncoder::new(File::create(path).unwrap()).unwrap();
    let (height, width) = (array.shape()[1] as u32, array.shape()[2] as u32);
    for plane in array.axis_iter(Axis(0)) {
        let data: Vec<u8> = plane.iter().copied().collect();
        encoder
            .write_image::<colortype::RGB8>(width, height, &data)
            .unwrap();
    }
}
