use crate::chart::palette::ColorMode;

pub const VIEW_WIDTH: u32 = 600;
pub const VIEW_HEIGHT: u32 = 320;
pub const CENTER: (f64, f64) = (300.0, 260.0);
pub const ARC_RADIUS: f64 = 180.0;
pub const ARC_STROKE: u32 = 30;
pub const TICK_INNER_RADIUS: f64 = 170.0;
pub const TICK_OUTER_RADIUS: f64 = 190.0;
pub const NEEDLE_LENGTH: f64 = 160.0;
pub const HUB_OUTER_RADIUS: f64 = 15.0;
pub const HUB_INNER_RADIUS: f64 = 7.0;
pub const HUB_INNER_COLOR: &str = "#e91e63";
pub const TICK_VALUES: [u32; 6] = [0, 20, 40, 60, 80, 100];

/// One fixed 36° segment of the dial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceBand {
    pub start_deg: f64,
    pub end_deg: f64,
    pub color: &'static str,
}

/// Low to high: red, yellow, blue, light green, green.
pub const BANDS: [ConfidenceBand; 5] = [
    ConfidenceBand {
        start_deg: -180.0,
        end_deg: -144.0,
        color: "#f44336",
    },
    ConfidenceBand {
        start_deg: -144.0,
        end_deg: -108.0,
        color: "#ffeb3b",
    },
    ConfidenceBand {
        start_deg: -108.0,
        end_deg: -72.0,
        color: "#2196f3",
    },
    ConfidenceBand {
        start_deg: -72.0,
        end_deg: -36.0,
        color: "#8bc34a",
    },
    ConfidenceBand {
        start_deg: -36.0,
        end_deg: 0.0,
        color: "#4caf50",
    },
];

/// Fixed label positions. End labels sit outside the arc so their
/// connector ticks do not collide with the interior labels.
fn label_position(value: u32) -> (f64, f64) {
    match value {
        0 => (120.0, 310.0),
        20 => (160.0, 80.0),
        40 => (240.0, 50.0),
        60 => (360.0, 50.0),
        80 => (440.0, 80.0),
        100 => (480.0, 310.0),
        // not a configured tick; fall back to the arc itself
        other => point_on_arc(angle_for(other as f64), ARC_RADIUS),
    }
}

/// NaN/absent become 0, then clamp to [0, 100].
pub fn sanitize_score(score: Option<f64>) -> f64 {
    match score {
        Some(s) if s.is_nan() => 0.0,
        Some(s) => s.clamp(0.0, 100.0),
        None => 0.0,
    }
}

/// `-180 + (score / 100) * 180` for an already-sanitised score.
pub fn angle_for(score: f64) -> f64 {
    -180.0 + (score / 100.0) * 180.0
}

pub fn point_on_arc(angle_deg: f64, radius: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (CENTER.0 + rad.cos() * radius, CENTER.1 + rad.sin() * radius)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandArc {
    pub band: ConfidenceBand,
    /// SVG path data for the arc stroke.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaugeTick {
    pub value: u32,
    /// Tick position projected onto the arc radius.
    pub x: f64,
    pub y: f64,
    pub inner: (f64, f64),
    pub outer: (f64, f64),
    pub label: (f64, f64),
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub score: f64,
    pub needle_angle_deg: f64,
    pub needle_tip: (f64, f64),
    pub bands: Vec<BandArc>,
    pub ticks: Vec<GaugeTick>,
}

/// Compute the full gauge for a raw score. Accepts `f64` or `Option<f64>`.
pub fn compute_gauge(score: impl Into<Option<f64>>) -> Gauge {
    let score = sanitize_score(score.into());
    let needle_angle_deg = angle_for(score);

    let bands = BANDS
        .iter()
        .map(|band| {
            let (x1, y1) = point_on_arc(band.start_deg, ARC_RADIUS);
            let (x2, y2) = point_on_arc(band.end_deg, ARC_RADIUS);
            BandArc {
                band: *band,
                path: format!(
                    "M {:.2} {:.2} A {r} {r} 0 0 1 {:.2} {:.2}",
                    x1,
                    y1,
                    x2,
                    y2,
                    r = ARC_RADIUS
                ),
            }
        })
        .collect();

    let ticks = TICK_VALUES
        .iter()
        .map(|&value| {
            let angle = angle_for(value as f64);
            let (x, y) = point_on_arc(angle, ARC_RADIUS);
            GaugeTick {
                value,
                x,
                y,
                inner: point_on_arc(angle, TICK_INNER_RADIUS),
                outer: point_on_arc(angle, TICK_OUTER_RADIUS),
                label: label_position(value),
                emphasized: value == 0 || value == 100,
            }
        })
        .collect();

    Gauge {
        score,
        needle_angle_deg,
        needle_tip: point_on_arc(needle_angle_deg, NEEDLE_LENGTH),
        bands,
        ticks,
    }
}

/// "42.5%" / "80%".
pub fn score_label(score: f64) -> String {
    let rounded = (score * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}%", rounded)
    } else {
        let s = format!("{:.2}", rounded);
        format!("{}%", s.trim_end_matches('0'))
    }
}

impl Gauge {
    pub fn to_svg(&self, mode: ColorMode) -> String {
        let (text, tick) = match mode {
            ColorMode::Light => ("#2c3e50", "#666666"),
            ColorMode::Dark => ("#e2e8f0", "#94a3b8"),
        };
        let (cx, cy) = CENTER;

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="{h}" viewBox="0 0 {w} {h}" preserveAspectRatio="xMidYMid meet">"#,
            w = VIEW_WIDTH,
            h = VIEW_HEIGHT
        ));
        svg.push('\n');
        for arc in &self.bands {
            svg.push_str(&format!(
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                arc.path, arc.band.color, ARC_STROKE
            ));
            svg.push('\n');
        }
        for t in &self.ticks {
            let (size, weight) = if t.emphasized { (24, 800) } else { (20, 600) };
            svg.push_str(&format!(
                r#"<g><line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="3"/><text x="{:.0}" y="{:.0}" font-size="{}" font-weight="{}" fill="{}" text-anchor="middle" alignment-baseline="middle">{}</text></g>"#,
                t.inner.0, t.inner.1, t.outer.0, t.outer.1, tick,
                t.label.0, t.label.1, size, weight, text, t.value
            ));
            svg.push('\n');
        }
        svg.push_str(&format!(
            r#"<line x1="{cx:.0}" y1="{cy:.0}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="6" stroke-linecap="round"/>"#,
            self.needle_tip.0, self.needle_tip.1, text
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<circle cx="{cx:.0}" cy="{cy:.0}" r="{:.0}" fill="{}"/>"#,
            HUB_OUTER_RADIUS, text
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<circle cx="{cx:.0}" cy="{cy:.0}" r="{:.0}" fill="{}"/>"#,
            HUB_INNER_RADIUS, HUB_INNER_COLOR
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<text x="{cx:.0}" y="{:.0}" font-size="30" font-weight="700" fill="{}" text-anchor="middle" alignment-baseline="middle">{}</text>"#,
            cy - 30.0,
            text,
            score_label(self.score)
        ));
        svg.push_str("\n</svg>\n");
        svg
    }
}
