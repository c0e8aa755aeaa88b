use crate::error::GeometryError;
use crate::geometry::UsableArea;
use crate::types::{Dimension, EPSILON_MM, Orientation, PackingResult};

/// Packs a uniform grid of `footprint` (already oriented) into `usable`,
/// leaving `spacing` between neighbouring footprints but not along the edges.
pub fn pack(
    usable: &UsableArea,
    footprint: Dimension,
    spacing: f64,
    orientation: Orientation,
) -> Result<PackingResult, GeometryError> {
    let columns = fit_count(usable.width, footprint.width, spacing, "width")?;
    let rows = fit_count(usable.height, footprint.height, spacing, "height")?;

    let occupied_width = occupied_span(columns, footprint.width, spacing, usable.width);
    let occupied_height = occupied_span(rows, footprint.height, spacing, usable.height);

    Ok(PackingResult {
        orientation,
        columns,
        rows,
        // u32 x u32 always fits in u64
        quantity: u64::from(columns) * u64::from(rows),
        occupied_width_mm: occupied_width,
        occupied_height_mm: occupied_height,
        leftover_width_mm: (usable.width - occupied_width).max(0.0),
        leftover_height_mm: (usable.height - occupied_height).max(0.0),
    })
}

/// Whole items of `size` that fit along `budget`. Adding one spacing to both
/// the budget and the pitch accounts for `n` items needing only `n - 1` gaps.
fn fit_count(
    budget: f64,
    size: f64,
    spacing: f64,
    axis: &'static str,
) -> Result<u32, GeometryError> {
    if size <= 0.0 || budget <= 0.0 {
        return Ok(0);
    }
    let count = ((budget + spacing + EPSILON_MM) / (size + spacing)).floor();
    if !count.is_finite() || count > u32::MAX as f64 {
        return Err(GeometryError::GridTooLarge { axis, count });
    }
    if count >= 1.0 { Ok(count as u32) } else { Ok(0) }
}

fn occupied_span(count: u32, size: f64, spacing: f64, budget: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    // Clamp away the float noise tolerated in fit_count
    (n * size + (n - 1.0) * spacing).min(budget)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4() -> UsableArea {
        Dimension::new(210.0, 297.0)
    }

    #[test]
    fn test_exact_fit() {
        let r = pack(&a4(), Dimension::new(70.0, 99.0), 0.0, Orientation::Normal).unwrap();
        assert_eq!((r.columns, r.rows, r.quantity), (3, 3, 9));
        assert_eq!(r.occupied_width_mm, 210.0);
        assert_eq!(r.occupied_height_mm, 297.0);
        assert_eq!(r.leftover_width_mm, 0.0);
        assert_eq!(r.leftover_height_mm, 0.0);
    }

    #[test]
    fn test_spacing_only_between_items() {
        let r = pack(&a4(), Dimension::new(100.0, 100.0), 5.0, Orientation::Normal).unwrap();
        assert_eq!((r.columns, r.rows, r.quantity), (2, 2, 4));
        assert_eq!(r.occupied_width_mm, 205.0);
        assert_eq!(r.leftover_width_mm, 5.0);
        assert_eq!(r.occupied_height_mm, 205.0);
        assert_eq!(r.leftover_height_mm, 92.0);
    }

    #[test]
    fn test_spacing_fits_trailing_item_without_gap() {
        // 2 * 100 + 10 = 210 exactly, no gap needed after the second item
        let r = pack(&a4(), Dimension::new(100.0, 297.0), 10.0, Orientation::Normal).unwrap();
        assert_eq!(r.columns, 2);
        assert_eq!(r.occupied_width_mm, 210.0);
    }

    #[test]
    fn test_item_too_large() {
        let r = pack(&a4(), Dimension::new(220.0, 50.0), 0.0, Orientation::Normal).unwrap();
        assert_eq!(r.columns, 0);
        assert_eq!(r.rows, 5);
        assert_eq!(r.quantity, 0);
        assert_eq!(r.occupied_width_mm, 0.0);
        assert_eq!(r.leftover_width_mm, 210.0);
    }

    #[test]
    fn test_decimal_inputs_tolerate_float_noise() {
        // 0.1 + 0.2 style noise must not drop a column
        let usable = Dimension::new(0.3, 10.0);
        let r = pack(&usable, Dimension::new(0.1, 10.0), 0.0, Orientation::Normal).unwrap();
        assert_eq!(r.columns, 3);
        assert!(r.occupied_width_mm <= usable.width);
        assert!(r.leftover_width_mm >= 0.0);
    }

    #[test]
    fn test_large_grid_counts_past_u32() {
        let usable = Dimension::new(10000.0, 10000.0);
        let r = pack(&usable, Dimension::new(0.1, 0.1), 0.0, Orientation::Normal).unwrap();
        assert_eq!((r.columns, r.rows), (100_000, 100_000));
        assert_eq!(r.quantity, 10_000_000_000);
        assert_eq!(r.quantity, u64::from(r.columns) * u64::from(r.rows));
        assert!(r.occupied_width_mm <= usable.width);
    }

    #[test]
    fn test_axis_count_overflow_is_an_error() {
        let usable = Dimension::new(10000.0, 10.0);
        let err = pack(&usable, Dimension::new(1e-9, 10.0), 0.0, Orientation::Normal).unwrap_err();
        assert!(matches!(err, GeometryError::GridTooLarge { axis: "width", .. }));
    }

    #[test]
    fn test_orientation_is_recorded() {
        let r = pack(&a4(), Dimension::new(99.0, 70.0), 0.0, Orientation::Rotated).unwrap();
        assert_eq!(r.orientation, Orientation::Rotated);
        assert_eq!((r.columns, r.rows), (2, 4));
    }
}
