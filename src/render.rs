use crate::types::YieldReport;

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// ASCII preview of the usable area with every packed footprint outlined.
pub fn render_layout(report: &YieldReport) -> String {
    let area = report.usable_area;
    let scale = f64::min(MAX_WIDTH / area.width, MAX_HEIGHT / area.height);
    let grid_w = (area.width * scale).round() as usize;
    let grid_h = (area.height * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    let placed = report.placed_size();
    let sw = (placed.width * scale).round() as usize;
    let sh = (placed.height * scale).round() as usize;

    // Cells under one character would only fill the border with noise, and
    // skipping them keeps the loop bounded by the grid size.
    if sw > 0 && sh > 0 {
        let label = format!("{}x{}", placed.width, placed.height);
        let label_chars: Vec<char> = label.chars().collect();

        for p in report.placements() {
            let sx = (p.x * scale).round() as usize;
            let sy = (p.y * scale).round() as usize;

            draw_rect(&mut grid, sx, sy, sw, sh);

            // Only label cells wide enough to hold the whole label
            if sw > label_chars.len() + 1 && sh > 1 {
                let cy = sy + sh / 2;
                let start_x = sx + (sw - label_chars.len()) / 2;
                for (i, &ch) in label_chars.iter().enumerate() {
                    let x = start_x + i;
                    if x > sx && x < sx + sw && cy < grid.len() && x < grid[cy].len() {
                        grid[cy][x] = ch;
                    }
                }
            }
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn edge(current: char, crossing: char, plain: char) -> char {
    if current == crossing || current == '+' {
        '+'
    } else {
        plain
    }
}

#[allow(clippy::needless_range_loop)]
fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = if rows > 0 { grid[0].len() } else { return };

    for i in x..=x + w {
        if i >= cols {
            break;
        }
        for j in [y, y + h] {
            if j < rows {
                grid[j][i] = edge(grid[j][i], '|', '-');
            }
        }
    }

    for j in y..=y + h {
        if j >= rows {
            break;
        }
        for i in [x, x + w] {
            if i < cols {
                grid[j][i] = edge(grid[j][i], '-', '|');
            }
        }
    }

    for cx in [x, x + w] {
        for cy in [y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{SheetSpec, StandardSize};
    use crate::solver::compute_yield;
    use crate::types::{Dimension, ItemSpec, Margins};

    fn a4_report(width: f64, height: f64) -> YieldReport {
        compute_yield(
            SheetSpec::standard(StandardSize::A4, Margins::default()),
            ItemSpec::new(Dimension::new(width, height)),
        )
        .unwrap()
    }

    #[test]
    fn test_render_full_sheet_item() {
        let output = render_layout(&a4_report(210.0, 297.0));
        assert!(output.contains('+'));
        assert!(output.contains('-'));
        assert!(output.contains('|'));
        assert!(output.contains("210x297"));
    }

    #[test]
    fn test_render_grid() {
        let output = render_layout(&a4_report(105.0, 148.5));
        // 2x2 grid: three horizontal border lines
        let border_lines = output.lines().filter(|l| l.starts_with("+-")).count();
        assert_eq!(border_lines, 3);
    }

    #[test]
    fn test_render_rotated_label() {
        let output = render_layout(&a4_report(99.0, 70.0));
        assert!(output.contains("70x99"));
    }

    #[test]
    fn test_render_tiny_items_draws_border_only() {
        let report = compute_yield(
            SheetSpec::custom(10000.0, 10000.0, Margins::default()).unwrap(),
            ItemSpec::new(Dimension::new(0.1, 0.1)),
        )
        .unwrap();
        assert_eq!(report.quantity(), 10_000_000_000);
        let output = render_layout(&report);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 41);
        assert!(lines[0].starts_with("+-"));
        assert!(lines[20].starts_with('|'));
        assert!(!output.contains("0.1x0.1"));
    }

    #[test]
    fn test_render_empty() {
        let output = render_layout(&a4_report(300.0, 300.0));
        // Border of the usable area is still drawn
        assert!(output.contains('+'));
        assert!(!output.contains("300x300"));
    }
}
