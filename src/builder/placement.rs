//! Placement grammar for the `pack` and `grid` directives.
//!
//! ```text
//! pack: true | false | [..]      default pack
//! pack: x | y | both | none      fill axis
//! pack: left | right | top | bottom
//! pack: { side: left, padx: 4 }  keyword placement
//! grid: [row, column]
//! grid: { row: 1, sticky: nsew } keyword placement
//! grid: true                     default grid
//! grid: <word or number>         passed to the toolkit as is
//! ```

use crate::document::{describe, NodePath};
use crate::error::{Error, Result};
use crate::types::{Body, Fill, Placement, Side, Value};

pub(crate) fn parse_pack(value: &Value, path: &NodePath) -> Result<Placement> {
    match value {
        Value::Null | Value::Bool(_) | Value::Array(_) => Ok(Placement::pack()),
        Value::String(word) => pack_word(word).ok_or_else(|| {
            Error::type_error(
                path,
                format!("'{word}' is neither a fill axis (x, y, both, none) nor a side (left, right, top, bottom)"),
            )
        }),
        Value::Object(map) => {
            let mut options = Body::new();
            let mut fill = None;
            let mut side = None;
            for (key, value) in map {
                match (key.as_str(), value) {
                    ("fill", Value::String(word)) => {
                        fill = Some(Fill::parse(word).ok_or_else(|| {
                            Error::type_error(path, format!("unknown fill '{word}'"))
                        })?);
                    }
                    ("side", Value::String(word)) => {
                        side = Some(Side::parse(word).ok_or_else(|| {
                            Error::type_error(path, format!("unknown side '{word}'"))
                        })?);
                    }
                    _ => {
                        options.insert(key.clone(), value.clone());
                    }
                }
            }
            Ok(Placement::Pack {
                fill,
                side,
                options,
            })
        }
        Value::Number(_) => Err(Error::type_error(
            path,
            format!("pack expects a boolean, a word or a mapping, found {}", describe(value)),
        )),
    }
}

fn pack_word(word: &str) -> Option<Placement> {
    Fill::parse(word)
        .map(Placement::fill)
        .or_else(|| Side::parse(word).map(Placement::side))
}

pub(crate) fn parse_grid(value: &Value, path: &NodePath) -> Result<Placement> {
    match value {
        Value::Null | Value::Bool(_) => Ok(Placement::Grid {
            row: None,
            column: None,
            options: Body::new(),
        }),
        Value::Array(cell) => match cell.as_slice() {
            [row, column] => Ok(Placement::cell(
                grid_index(row, "row", path)?,
                grid_index(column, "column", path)?,
            )),
            _ => Err(Error::type_error(
                path,
                format!("grid expects [row, column], found {} element(s)", cell.len()),
            )),
        },
        Value::Object(map) => {
            let mut options = Body::new();
            let mut row = None;
            let mut column = None;
            for (key, value) in map {
                match key.as_str() {
                    "row" => row = Some(grid_index(value, "row", path)?),
                    "column" => column = Some(grid_index(value, "column", path)?),
                    _ => {
                        options.insert(key.clone(), value.clone());
                    }
                }
            }
            Ok(Placement::Grid {
                row,
                column,
                options,
            })
        }
        Value::String(_) | Value::Number(_) => Ok(Placement::GridRaw(value.clone())),
    }
}

fn grid_index(value: &Value, axis: &str, path: &NodePath) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| Error::type_error(path, format!("grid {axis} must be an integer, found {}", describe(value))))
}
