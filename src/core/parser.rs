//! Reader for the WMM `.COF` coefficient layout.
//!
//! ```text
//!     2020.0            WMM-2020        12/10/2019
//!   1  0  -29404.5       0.0        6.7        0.0
//!   1  1   -1450.7    4652.9        7.7      -25.1
//! 999999999999999999999999999999999999999999999999
//! ```

use crate::domain::model::{ParsedCoefficients, RawRow};
use crate::utils::error::{Result, TableGenError};
use std::str::FromStr;

const HEADER_FIELDS: usize = 3;
const ROW_FIELDS: usize = 6;

/// A line made only of `9`s ends the data section.
///
/// An empty line passes this test as well and ends the data section too.
pub fn is_terminator(line: &str) -> bool {
    line.trim().chars().all(|c| c == '9')
}

fn parse_field<T: FromStr>(token: &str, line: usize, what: &str) -> Result<T> {
    token.parse::<T>().map_err(|_| {
        TableGenError::input_format(line, format!("invalid {} '{}'", what, token))
    })
}

fn parse_header(line: &str) -> Result<(f64, String, String)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != HEADER_FIELDS {
        return Err(TableGenError::input_format(
            1,
            format!(
                "header must have {} fields (epoch, name, date), found {}",
                HEADER_FIELDS,
                fields.len()
            ),
        ));
    }

    let epoch = parse_field::<f64>(fields[0], 1, "epoch")?;
    Ok((epoch, fields[1].to_string(), fields[2].to_string()))
}

fn parse_row(text: &str, line: usize) -> Result<RawRow> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != ROW_FIELDS {
        return Err(TableGenError::input_format(
            line,
            format!(
                "data row must have {} fields (n, m, g, h, g_dot, h_dot), found {}",
                ROW_FIELDS,
                fields.len()
            ),
        ));
    }

    let degree = parse_field::<u32>(fields[0], line, "degree")?;
    let order = parse_field::<u32>(fields[1], line, "order")?;
    if degree == 0 {
        return Err(TableGenError::input_format(line, "degree must be at least 1"));
    }
    if order > degree {
        return Err(TableGenError::input_format(
            line,
            format!("order {} exceeds degree {}", order, degree),
        ));
    }

    Ok(RawRow {
        degree,
        order,
        g: parse_field(fields[2], line, "g coefficient")?,
        h: parse_field(fields[3], line, "h coefficient")?,
        g_dot: parse_field(fields[4], line, "g_dot coefficient")?,
        h_dot: parse_field(fields[5], line, "h_dot coefficient")?,
        line,
    })
}

/// Parses the whole text of a coefficient file.
///
/// Rows are returned in file order; nothing is normalized or reordered here.
pub fn parse_coefficients(text: &str) -> Result<ParsedCoefficients> {
    let mut lines = text.lines().enumerate();

    let header = lines.next().map(|(_, l)| l).unwrap_or("");
    let (epoch, title, date) = parse_header(header)?;
    tracing::debug!("Parsed header: epoch={}, title={}, date={}", epoch, title, date);

    let mut rows = Vec::new();
    let mut terminated = false;
    for (idx, text) in lines {
        let line = idx + 1;
        if is_terminator(text) {
            tracing::trace!("Terminator at line {}", line);
            terminated = true;
            break;
        }
        rows.push(parse_row(text, line)?);
    }

    if !terminated {
        tracing::warn!("No terminator line found, using all {} data rows", rows.len());
    }

    Ok(ParsedCoefficients {
        epoch,
        title,
        date,
        rows,
    })
}
