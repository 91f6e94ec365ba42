//! JSON documents holding an array as nested lists.
//!
//! The document is parsed whole. With an internal path, the top-level value
//! must be an object and the path is a single key into it; without one, the
//! top-level value is the array itself. Integer-only data becomes an `i64`
//! volume, and any floating point value makes it `f64`.
use crate::error::{ReadError, Result};
use crate::region::Region;
use crate::volume::Volume;
use ndarray::{ArrayD, IxDyn};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read an array from a JSON file, optionally found under a top-level key.
pub fn read_json<P: AsRef<Path>>(path: P, key: Option<&str>, region: &Region) -> Result<Volume> {
    let file = BufReader::new(File::open(path)?);
    let value: Value = serde_json::from_reader(file)?;
    let value = match key {
        Some(key) => lookup(value, key)?,
        None => value,
    };
    Ok(value_to_volume(&value)?.select(region))
}

fn lookup(value: Value, key: &str) -> Result<Value> {
    match value {
        Value::Object(mut map) => map
            .remove(key)
            .ok_or_else(|| ReadError::MissingDataset(key.to_string())),
        _ => Err(ReadError::MissingDataset(key.to_string())),
    }
}

/// Convert a JSON value of nested lists of numbers into a dense volume.
///
/// # Errors
///
/// - `ReadError::InconsistentShape` if the lists are ragged.
/// - `ReadError::UnsupportedDataType` if a leaf is not a number.
pub fn value_to_volume(value: &Value) -> Result<Volume> {
    let shape = infer_shape(value);
    let mut numbers = Vec::new();
    flatten(value, &shape, &mut numbers)?;

    let all_int = !numbers.is_empty() && numbers.iter().all(|n| n.is_i64());
    if all_int {
        let data: Vec<i64> = numbers.iter().filter_map(|n| n.as_i64()).collect();
        Ok(Volume::from(ArrayD::from_shape_vec(IxDyn(&shape), data)?))
    } else {
        let data: Vec<f64> = numbers.iter().filter_map(|n| n.as_f64()).collect();
        Ok(Volume::from(ArrayD::from_shape_vec(IxDyn(&shape), data)?))
    }
}

fn infer_shape(mut value: &Value) -> Vec<usize> {
    let mut shape = Vec::new();
    while let Value::Array(items) = value {
        shape.push(items.len());
        match items.first() {
            Some(first) => value = first,
            None => break,
        }
    }
    shape
}

fn flatten<'a>(value: &'a Value, shape: &[usize], out: &mut Vec<&'a serde_json::Number>) -> Result<()> {
    match (value, shape.split_first()) {
        (Value::Array(items), Some((&len, rest))) => {
            if items.len() != len {
                return Err(ReadError::InconsistentShape(format!(
                    "list of length {} where {} was expected",
                    items.len(),
                    len
                )));
            }
            items.iter().try_for_each(|item| flatten(item, rest, out))
        }
        (Value::Number(n), None) => {
            out.push(n);
            Ok(())
        }
        (Value::Array(_), None) | (Value::Number(_), Some(_)) => Err(ReadError::InconsistentShape(
            "lists nested to different depths".to_string(),
        )),
        (other, _) => Err(ReadError::UnsupportedDataType(format!("JSON value `{}`", other))),
    }
}
