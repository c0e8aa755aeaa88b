use thiserror::Error;

/// Input combinations the yield optimizer rejects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A sheet or item dimension is out of range (or a custom sheet has none).
    #[error("invalid {what}: {value} mm")]
    InvalidDimension { what: &'static str, value: f64 },

    /// Margins consume the whole sheet.
    #[error("margins too large for this sheet: usable area would be {width} x {height} mm")]
    NonPositiveArea { width: f64, height: f64 },

    /// More items along one axis than a grid can count.
    #[error("too many items along the sheet {axis}: {count}")]
    GridTooLarge { axis: &'static str, count: f64 },
}
