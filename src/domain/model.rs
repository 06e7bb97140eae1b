use serde::{Deserialize, Serialize};

/// One data row of a coefficient file, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub degree: u32,
    pub order: u32,
    pub g: f64,
    pub h: f64,
    pub g_dot: f64,
    pub h_dot: f64,
    /// 1-based line number in the source text.
    pub line: usize,
}

/// Header fields plus data rows in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCoefficients {
    pub epoch: f64,
    pub title: String,
    pub date: String,
    pub rows: Vec<RawRow>,
}

/// Normalized model, dense in packing-index order.
///
/// All five sequences have the same length and slot `i` of each belongs to
/// the pair `nm[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub title: String,
    pub date: String,
    pub epoch: f64,
    pub nm: Vec<(u32, u32)>,
    pub g: Vec<f64>,
    pub h: Vec<f64>,
    pub g_dot: Vec<f64>,
    pub h_dot: Vec<f64>,
}

impl Model {
    pub fn len(&self) -> usize {
        self.nm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nm.is_empty()
    }

    /// Largest degree in the model, 0 when empty.
    pub fn nm_max(&self) -> u32 {
        self.nm.iter().map(|&(n, _)| n).max().unwrap_or(0)
    }

    /// `((n, m), g, h)` in slot order.
    pub fn main_rows(&self) -> impl Iterator<Item = ((u32, u32), f64, f64)> + Clone + '_ {
        zip_rows(&self.nm, &self.g, &self.h)
    }

    /// `((n, m), g_dot, h_dot)` in slot order.
    pub fn secular_rows(&self) -> impl Iterator<Item = ((u32, u32), f64, f64)> + Clone + '_ {
        zip_rows(&self.nm, &self.g_dot, &self.h_dot)
    }
}

fn zip_rows<'a>(
    nm: &'a [(u32, u32)],
    first: &'a [f64],
    second: &'a [f64],
) -> impl Iterator<Item = ((u32, u32), f64, f64)> + Clone + 'a {
    nm.iter()
        .zip(first)
        .zip(second)
        .map(|((&nm, &a), &b)| (nm, a, b))
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub model: Model,
    pub table_output: String,
    pub secular_output: Option<String>,
    pub constants_output: Option<String>,
}
