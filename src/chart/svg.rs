use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::scene::{
    ChartScene, LineScene, PanelScene, RenderedChart, SeriesScene, MARGIN_LEFT, MARGIN_RIGHT,
};
use crate::error::AppError;

const EMPTY_WIDTH: u32 = 600;
const EMPTY_HEIGHT: u32 = 120;
const FONT: &str = "sans-serif";
const AXIS_FONT_SIZE: u32 = 11;
const CANDLE_STROKE: u32 = 1;
const LINE_STROKE: u32 = 2;
const MESSAGE_COLOR: RGBColor = RGBColor(0x6b, 0x72, 0x80);

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

fn px(v: f64) -> i32 {
    v.round() as i32
}

/// Serialise a chart as an SVG document. With `pointer`, the crosshair and
/// its date/value readout are drawn at that position.
pub fn render_svg(chart: &RenderedChart, pointer: Option<(f64, f64)>) -> Result<String, AppError> {
    let mut buf = String::new();
    {
        let size = match chart {
            RenderedChart::Chart(scene) => (scene.width, scene.height),
            RenderedChart::Empty(_) => (EMPTY_WIDTH, EMPTY_HEIGHT),
        };
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        let drawn = match chart {
            RenderedChart::Chart(scene) => draw_scene(&root, scene, pointer),
            RenderedChart::Empty(reason) => draw_message(&root, reason.message()),
        };
        drawn.map_err(|e| AppError::Render(e.to_string()))?;
        root.present().map_err(|e| AppError::Render(e.to_string()))?;
    }
    Ok(buf)
}

fn draw_message<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, message: &str) -> DrawResult<DB> {
    root.fill(&WHITE)?;
    let style = (FONT, 16)
        .into_font()
        .color(&MESSAGE_COLOR)
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(
        message.to_string(),
        ((EMPTY_WIDTH / 2) as i32, (EMPTY_HEIGHT / 2) as i32),
        style,
    ))
}

pub fn draw_scene<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &ChartScene,
    pointer: Option<(f64, f64)>,
) -> DrawResult<DB> {
    let palette = &scene.palette;
    root.fill(&palette.background)?;

    for panel in &scene.panels {
        draw_panel_frame(root, scene, panel)?;
        for series in &panel.series {
            draw_series(root, series)?;
        }
    }
    draw_x_axis(root, scene)?;

    if let Some(readout) = pointer.and_then(|(x, y)| scene.readout(x, y)) {
        let (top, bottom) = plot_span(scene);
        let (x0, x1) = scene.x.range();
        let style = palette.crosshair.stroke_width(1);
        root.draw(&PathElement::new(
            vec![(px(readout.x), px(top)), (px(readout.x), px(bottom))],
            style,
        ))?;
        root.draw(&PathElement::new(
            vec![(px(x0), px(readout.y)), (px(x1), px(readout.y))],
            style,
        ))?;
        let label = (FONT, AXIS_FONT_SIZE).into_font().color(&palette.crosshair);
        root.draw(&Text::new(
            readout.date_label(),
            (px(readout.x), px(bottom) + 4),
            label.pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;
        root.draw(&Text::new(
            readout.value_label(),
            (px(x1) + 4, px(readout.y)),
            label.pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }
    Ok(())
}

fn plot_span(scene: &ChartScene) -> (f64, f64) {
    let top = scene.panels.first().map_or(0.0, |p| p.top);
    let bottom = scene.panels.last().map_or(0.0, |p| p.top + p.height);
    (top, bottom)
}

fn draw_panel_frame<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &ChartScene,
    panel: &PanelScene,
) -> DrawResult<DB> {
    let palette = &scene.palette;
    let left = MARGIN_LEFT as i32;
    let right = scene.width.saturating_sub(MARGIN_RIGHT) as i32;
    let grid = palette.grid.stroke_width(1);
    let label = (FONT, AXIS_FONT_SIZE)
        .into_font()
        .color(&palette.text)
        .pos(Pos::new(HPos::Left, VPos::Center));

    for (value, y) in &panel.y_ticks {
        root.draw(&PathElement::new(vec![(left, px(*y)), (right, px(*y))], grid))?;
        root.draw(&Text::new(
            format!("{:.2}", value),
            (right + 6, px(*y)),
            label.clone(),
        ))?;
    }
    root.draw(&Rectangle::new(
        [
            (left, px(panel.top)),
            (right, px(panel.top + panel.height)),
        ],
        palette.grid.stroke_width(1),
    ))
}

fn draw_x_axis<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &ChartScene) -> DrawResult<DB> {
    let palette = &scene.palette;
    let (top, bottom) = plot_span(scene);
    let label = (FONT, AXIS_FONT_SIZE)
        .into_font()
        .color(&palette.text)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (x, text) in &scene.x_ticks {
        root.draw(&PathElement::new(
            vec![(px(*x), px(top)), (px(*x), px(bottom))],
            palette.grid.stroke_width(1),
        ))?;
        root.draw(&Text::new(text.clone(), (px(*x), px(bottom) + 6), label.clone()))?;
    }
    Ok(())
}

fn draw_series<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, series: &SeriesScene) -> DrawResult<DB> {
    match series {
        SeriesScene::Candles(glyphs) => {
            for g in glyphs {
                let half = g.width / 2.0;
                root.draw(&PathElement::new(
                    vec![(px(g.x), px(g.wick_top)), (px(g.x), px(g.wick_bottom))],
                    g.wick.stroke_width(CANDLE_STROKE),
                ))?;
                // a doji still gets a visible one-pixel body
                let bottom = g.body_bottom.max(g.body_top + 1.0);
                root.draw(&Rectangle::new(
                    [(px(g.x - half), px(g.body_top)), (px(g.x + half), px(bottom))],
                    g.fill.filled(),
                ))?;
            }
        }
        SeriesScene::Line(line) => draw_line(root, line)?,
        SeriesScene::Band { upper, mid, lower } => {
            draw_line(root, upper)?;
            draw_line(root, lower)?;
            draw_line(root, mid)?;
        }
        SeriesScene::Bars {
            color,
            opacity,
            bars,
        } => {
            for b in bars {
                let half = b.width / 2.0;
                root.draw(&Rectangle::new(
                    [(px(b.x - half), px(b.top)), (px(b.x + half), px(b.bottom))],
                    color.mix(*opacity).filled(),
                ))?;
            }
        }
        SeriesScene::Area {
            line,
            fill_opacity,
            baseline,
        } => {
            for segment in &line.segments {
                let (Some(first), Some(last)) = (segment.first(), segment.last()) else {
                    continue;
                };
                let mut polygon: Vec<(i32, i32)> =
                    segment.iter().map(|(x, y)| (px(*x), px(*y))).collect();
                polygon.push((px(last.0), px(*baseline)));
                polygon.push((px(first.0), px(*baseline)));
                root.draw(&Polygon::new(polygon, line.color.mix(*fill_opacity).filled()))?;
            }
            draw_line(root, line)?;
        }
    }
    Ok(())
}

fn draw_line<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, line: &LineScene) -> DrawResult<DB> {
    for segment in &line.segments {
        let points: Vec<(i32, i32)> = segment.iter().map(|(x, y)| (px(*x), px(*y))).collect();
        root.draw(&PathElement::new(points, line.color.stroke_width(LINE_STROKE)))?;
    }
    Ok(())
}
