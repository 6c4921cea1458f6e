//! SVG export of the current maze with a column-by-column reveal.

use std::{fmt::Write as _, fs, path::Path};

use anyhow::{Context, Result};
use maze_runner_core::CellCoord;
use maze_runner_rendering::{DrawPlan, MarkerRect, MazeLayout, Palette};
use tracing::info;

const WALL_STROKE_WIDTH: f32 = 2.0;

/// Renders the draw plan as a standalone SVG document.
///
/// Every wall stroke fades in after its instruction's delay, so browsers replay
/// the staggered drawing when the file is opened. Markers appear once the last
/// column is drawn.
pub(crate) fn render_svg(
    plan: DrawPlan<'_>,
    layout: &MazeLayout,
    palette: &Palette,
    player: CellCoord,
    waypoint: Option<CellCoord>,
) -> String {
    let width = layout.container_width();
    let markers_delay = plan.total_delay().as_millis();
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{width}" viewBox="0 0 {width} {width}">"#
    );
    svg.push_str(
        "<style>line,.marker{opacity:0;animation:reveal 0s forwards}@keyframes reveal{to{opacity:1}}</style>\n",
    );
    let _ = writeln!(
        svg,
        r#"<rect width="{width}" height="{width}" fill="{}"/>"#,
        palette.background.to_hex()
    );

    let _ = writeln!(
        svg,
        r#"<g stroke="{}" stroke-width="{WALL_STROKE_WIDTH}" stroke-linecap="square">"#,
        palette.wall.to_hex()
    );
    for instruction in plan {
        let delay = instruction.delay.as_millis();
        for segment in &instruction.segments {
            let _ = writeln!(
                svg,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" style="animation-delay:{delay}ms"/>"#,
                segment.from.x, segment.from.y, segment.to.x, segment.to.y
            );
        }
    }
    svg.push_str("</g>\n");

    if let Some(waypoint) = waypoint {
        push_marker(
            &mut svg,
            layout.marker_rect(waypoint),
            &palette.waypoint.to_hex(),
            markers_delay,
        );
    }
    push_marker(
        &mut svg,
        layout.marker_rect(player),
        &palette.player.to_hex(),
        markers_delay,
    );

    svg.push_str("</svg>\n");
    svg
}

fn push_marker(svg: &mut String, rect: MarkerRect, fill: &str, delay_ms: u128) {
    let _ = writeln!(
        svg,
        r#"<rect x="{}" y="{}" width="{side}" height="{side}" fill="{fill}" class="marker" style="animation-delay:{delay_ms}ms"/>"#,
        rect.origin.x,
        rect.origin.y,
        side = rect.side
    );
}

/// Writes the rendered document to `path`.
pub(crate) fn export(path: &Path, document: &str) -> Result<()> {
    fs::write(path, document)
        .with_context(|| format!("failed to write maze svg to {}", path.display()))?;
    info!(path = %path.display(), "maze exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use maze_runner_core::GridSize;
    use maze_runner_session::Grid;

    use super::*;

    #[test]
    fn closed_single_cell_has_four_strokes_and_one_marker() {
        let grid = Grid::new(GridSize::new(1).expect("valid grid size"));
        let layout = MazeLayout::new(40.0, grid.size()).expect("positive width");
        let plan = DrawPlan::new(grid.view(), layout, Duration::from_millis(30));

        let svg = render_svg(
            plan,
            &layout,
            &Palette::default(),
            CellCoord::new(0, 0),
            None,
        );

        assert_eq!(svg.matches("<line ").count(), 4);
        assert!(svg.contains(r#"<rect x="10" y="10" width="20" height="20""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn later_columns_are_delayed() {
        let grid = Grid::new(GridSize::new(3).expect("valid grid size"));
        let layout = MazeLayout::new(90.0, grid.size()).expect("positive width");
        let plan = DrawPlan::new(grid.view(), layout, Duration::from_millis(30));

        let svg = render_svg(
            plan,
            &layout,
            &Palette::default(),
            CellCoord::new(0, 0),
            Some(CellCoord::new(2, 2)),
        );

        assert!(svg.contains("animation-delay:0ms"));
        assert!(svg.contains("animation-delay:60ms"));
        assert!(!svg.contains("animation-delay:90ms"));
        let delayed_markers = svg.matches(r#"class="marker" style="animation-delay:60ms""#);
        assert_eq!(delayed_markers.count(), 2, "markers wait for the last column");
    }
}
