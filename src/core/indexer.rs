use crate::core::normalize::{self, DoubleFactorial};
use crate::domain::model::{Model, ParsedCoefficients, RawRow};
use crate::utils::error::{Result, TableGenError};

/// Dense zero-based slot for `(n, m)`: degree-major, order-minor.
///
/// `(1,0) -> 0`, `(1,1) -> 1`, `(2,0) -> 2`, ... `(N,N) -> N(N+3)/2 - 1`.
/// Only defined for `n >= 1` and `m <= n`.
pub fn packing_index(degree: u32, order: u32) -> usize {
    let n = degree as usize;
    n * (n + 1) / 2 + order as usize - 1
}

/// Number of `(n, m)` pairs for every degree in `1..=nm_max`.
pub fn total_coeffs(nm_max: u32) -> usize {
    let n = nm_max as usize;
    n * (n + 3) / 2
}

struct Entry {
    nm: (u32, u32),
    g: f64,
    h: f64,
    g_dot: f64,
    h_dot: f64,
}

impl Entry {
    fn normalized(row: RawRow, mode: DoubleFactorial) -> Self {
        let s = normalize::factor(row.degree, row.order, mode);
        Self {
            nm: (row.degree, row.order),
            g: normalize::normalize(row.g, s),
            h: normalize::normalize(row.h, s),
            g_dot: normalize::normalize(row.g_dot, s),
            h_dot: normalize::normalize(row.h_dot, s),
        }
    }
}

/// Normalizes every row and places it at its packing index.
///
/// The table has exactly one slot per input row; a row landing outside it,
/// two rows sharing a slot, or a slot nobody fills is rejected. The highest
/// degree must also be complete through `m = n`.
pub fn build_model(parsed: ParsedCoefficients, mode: DoubleFactorial) -> Result<Model> {
    let ParsedCoefficients {
        epoch,
        title,
        date,
        rows,
    } = parsed;

    let len = rows.len();
    let mut slots: Vec<Option<Entry>> = std::iter::repeat_with(|| None).take(len).collect();

    for row in rows {
        let (degree, order) = (row.degree, row.order);
        if degree == 0 || order > degree {
            return Err(TableGenError::input_format(
                row.line,
                format!("no table slot for degree {} order {}", degree, order),
            ));
        }
        let index = packing_index(degree, order);

        let slot = slots
            .get_mut(index)
            .ok_or(TableGenError::IndexOutOfRangeError {
                degree,
                order,
                index,
                len,
            })?;
        if slot.is_some() {
            return Err(TableGenError::DuplicateCoefficientError {
                degree,
                order,
                index,
            });
        }
        *slot = Some(Entry::normalized(row, mode));
    }

    let missing: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_none())
        .map(|(i, _)| i)
        .collect();
    if let Some(&first) = missing.first() {
        return Err(TableGenError::MissingCoefficientError {
            first,
            count: missing.len(),
        });
    }

    // 最後一個 degree 缺尾端的 order 時，前面的格子仍會全部填滿
    let nm_max = slots.iter().flatten().map(|e| e.nm.0).max().unwrap_or(0);
    let expected = total_coeffs(nm_max);
    if expected > len {
        return Err(TableGenError::MissingCoefficientError {
            first: len,
            count: expected - len,
        });
    }

    let mut model = Model {
        title,
        date,
        epoch,
        nm: Vec::with_capacity(len),
        g: Vec::with_capacity(len),
        h: Vec::with_capacity(len),
        g_dot: Vec::with_capacity(len),
        h_dot: Vec::with_capacity(len),
    };
    for entry in slots.into_iter().flatten() {
        model.nm.push(entry.nm);
        model.g.push(entry.g);
        model.h.push(entry.h);
        model.g_dot.push(entry.g_dot);
        model.h_dot.push(entry.h_dot);
    }

    tracing::debug!(
        "Indexed {} coefficients up to degree {} ({} mode)",
        model.len(),
        model.nm_max(),
        mode
    );
    Ok(model)
}
