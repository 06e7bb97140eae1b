use crate::domain::model::Model;

pub const PROVENANCE: &str = "// Auto-generated table by `geomag-tablegen`";
pub const DEFAULT_LITERAL_MACRO: &str = "REAL";

/// Length of the shortest round-trip decimal form of `x` (`-29404.5`, `0.0`).
pub fn natural_width(x: f64) -> usize {
    format!("{:?}", x).len()
}

/// Sign-aware scientific form: 16 fractional digits, exponent with explicit
/// sign and at least two digits, a leading space in place of `+`.
pub fn scientific(x: f64) -> String {
    let raw = format!("{:.16e}", x);
    let (mantissa, exponent) = match raw.split_once('e') {
        Some(parts) => parts,
        None => return raw,
    };
    let (exp_sign, exp_digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    let lead = if mantissa.starts_with('-') { "" } else { " " };
    format!("{}{}e{}{:0>2}", lead, mantissa, exp_sign, exp_digits)
}

#[derive(Debug, Clone)]
pub struct TableRenderer {
    literal_macro: String,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_LITERAL_MACRO)
    }
}

impl TableRenderer {
    pub fn new(literal_macro: impl Into<String>) -> Self {
        Self {
            literal_macro: literal_macro.into(),
        }
    }

    fn literal(&self, x: f64, width: usize) -> String {
        format!("{}({:>width$})", self.literal_macro, scientific(x), width = width)
    }

    /// One line per `((n, m), g, h)` row, after a provenance comment.
    pub fn render<I>(&self, rows: I) -> String
    where
        I: IntoIterator<Item = ((u32, u32), f64, f64)>,
        I::IntoIter: Clone,
    {
        let rows = rows.into_iter();
        let width = rows
            .clone()
            .flat_map(|(_, g, h)| [natural_width(g), natural_width(h)])
            .max()
            .unwrap_or(0);

        let mut lines = vec![PROVENANCE.to_string()];
        for ((n, m), g, h) in rows {
            lines.push(format!(
                "{{ .g = {}, .h = {} }},  // (n = {:>3}, m = {:>3})",
                self.literal(g, width),
                self.literal(h, width),
                n,
                m
            ));
        }
        lines.join("\n")
    }

    pub fn render_main(&self, model: &Model) -> String {
        self.render(model.main_rows())
    }

    pub fn render_secular(&self, model: &Model) -> String {
        self.render(model.secular_rows())
    }

    /// `#define` block describing the table dimensions and epoch.
    pub fn render_constants(&self, model: &Model) -> String {
        let nm_max = model.nm_max();
        [
            format!("// Auto-generated constants by `geomag-tablegen` ({}, {})", model.title, model.date),
            format!("#define EPOCH           {}({:?})", self.literal_macro, model.epoch),
            format!("#define N_MAX           ({}U)", nm_max),
            format!("#define M_MAX           ({}U)", nm_max),
            format!("#define TOTAL_COEFFS    ({}U)", model.len()),
        ]
        .join("\n")
    }
}
