use macroquad::prelude::*;
use racecar_dynamics::RaceTrace;
use tracing::info;

// Function to configure the macroquad window
pub fn window_conf() -> Conf {
    Conf {
        window_title: "Race Characteristics".to_string(),
        window_width: 1000,
        window_height: 650,
        high_dpi: true,
        ..Default::default()
    }
}

const MARGIN_LEFT: f32 = 70.0;
const MARGIN_RIGHT: f32 = 30.0;
const MARGIN_TOP: f32 = 30.0;
const MARGIN_BOTTOM: f32 = 60.0;
const FONT_SIZE: f32 = 20.0;
const TARGET_TICKS: f32 = 8.0;

/// One line on the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: Color,
    pub values: Vec<f32>,
}

/// The four race series with the colours and labels of the original race charts.
pub fn race_series(race: &RaceTrace) -> Vec<Series> {
    let to_f32 = |values: &[f64]| values.iter().map(|&v| v as f32).collect::<Vec<_>>();
    vec![
        Series { label: "Velocity (m/s)", color: BLUE, values: to_f32(race.velocity()) },
        Series { label: "Acceleration (m/s/s)", color: RED, values: to_f32(race.acceleration()) },
        Series { label: "Distance Travelled (m)", color: BLACK, values: to_f32(race.distance()) },
        Series { label: "Current draw (A)", color: ORANGE, values: to_f32(race.current_draw()) },
    ]
}

/// Data-space extent of the plot. Both axes start at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub x_max: f32,
    pub y_max: f32,
}

impl PlotBounds {
    pub fn fit(times: &[f32], series: &[Series]) -> Self {
        let x_max = times.iter().copied().fold(0.0_f32, f32::max);
        let y_max = series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0_f32, f32::max);
        // Leave headroom above the highest point; keep a non-zero range for flat data.
        PlotBounds {
            x_max: if x_max > 0.0 { x_max } else { 1.0 },
            y_max: if y_max > 0.0 { y_max * 1.05 } else { 1.0 },
        }
    }
}

/// Screen-space area the axes occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PlotArea {
    pub fn for_screen(screen_w: f32, screen_h: f32) -> Self {
        PlotArea {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (screen_w - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (screen_h - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Map a data point to screen coordinates. Values below zero are pinned to
    /// the x axis.
    pub fn to_screen(&self, bounds: &PlotBounds, x: f32, y: f32) -> Vec2 {
        let fx = (x / bounds.x_max).clamp(0.0, 1.0);
        let fy = (y / bounds.y_max).clamp(0.0, 1.0);
        vec2(self.left + fx * self.width, self.bottom() - fy * self.height)
    }
}

/// A 1-2-5 tick spacing giving roughly `target` ticks over `range`.
pub fn nice_step(range: f32, target: f32) -> f32 {
    if range <= 0.0 || !range.is_finite() {
        return 1.0;
    }
    let raw = range / target;
    let magnitude = 10f32.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn ticks(max: f32) -> Vec<f32> {
    let step = nice_step(max, TARGET_TICKS);
    (0..)
        .map(|i| i as f32 * step)
        .take_while(|t| *t <= max * 1.0001)
        .collect()
}

fn draw_axes(area: &PlotArea, bounds: &PlotBounds) {
    draw_line(area.left, area.bottom(), area.left + area.width, area.bottom(), 2.0, DARKGRAY);
    draw_line(area.left, area.top, area.left, area.bottom(), 2.0, DARKGRAY);

    for t in ticks(bounds.x_max) {
        let p = area.to_screen(bounds, t, 0.0);
        draw_line(p.x, area.top, p.x, area.bottom(), 1.0, LIGHTGRAY);
        let label = format!("{t:.1}");
        let dims = measure_text(&label, None, FONT_SIZE as u16, 1.0);
        draw_text(&label, p.x - dims.width / 2.0, area.bottom() + 18.0, FONT_SIZE, DARKGRAY);
    }
    for t in ticks(bounds.y_max) {
        let p = area.to_screen(bounds, 0.0, t);
        draw_line(area.left, p.y, area.left + area.width, p.y, 1.0, LIGHTGRAY);
        let label = format!("{t:.0}");
        let dims = measure_text(&label, None, FONT_SIZE as u16, 1.0);
        draw_text(&label, area.left - dims.width - 8.0, p.y + 5.0, FONT_SIZE, DARKGRAY);
    }

    let x_label = "Time (s)";
    let dims = measure_text(x_label, None, FONT_SIZE as u16, 1.0);
    draw_text(
        x_label,
        area.left + (area.width - dims.width) / 2.0,
        area.bottom() + 45.0,
        FONT_SIZE,
        BLACK,
    );
}

fn draw_series(area: &PlotArea, bounds: &PlotBounds, times: &[f32], series: &Series) {
    let points: Vec<Vec2> = times
        .iter()
        .zip(&series.values)
        .map(|(&t, &v)| area.to_screen(bounds, t, v))
        .collect();
    for pair in points.windows(2) {
        draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, 2.0, series.color);
    }
}

fn draw_legend(area: &PlotArea, series: &[Series]) {
    let row_height = 24.0;
    let width = series
        .iter()
        .map(|s| measure_text(s.label, None, FONT_SIZE as u16, 1.0).width)
        .fold(0.0_f32, f32::max)
        + 50.0;
    let height = row_height * series.len() as f32 + 10.0;
    let x = area.left + 15.0;
    let y = area.top + 10.0;

    draw_rectangle(x, y, width, height, Color::new(1.0, 1.0, 1.0, 0.85));
    draw_rectangle_lines(x, y, width, height, 1.0, GRAY);
    for (i, s) in series.iter().enumerate() {
        let row_y = y + 5.0 + row_height * (i as f32 + 0.5);
        draw_line(x + 8.0, row_y, x + 34.0, row_y, 3.0, s.color);
        draw_text(s.label, x + 42.0, row_y + 6.0, FONT_SIZE, BLACK);
    }
}

/// Render the race until the window is closed or Escape is pressed.
pub async fn run_plot_loop(race: RaceTrace) {
    let times: Vec<f32> = race.time().iter().map(|&t| t as f32).collect();
    let series = race_series(&race);
    let bounds = PlotBounds::fit(&times, &series);

    info!(samples = times.len(), "Plot window opened. Press Escape to close.");

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        clear_background(WHITE);
        let area = PlotArea::for_screen(screen_width(), screen_height());
        draw_axes(&area, &bounds);
        for s in &series {
            draw_series(&area, &bounds, &times, s);
        }
        draw_legend(&area, &series);

        next_frame().await
    }

    info!("Plot window closed.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use racecar_dynamics::{RaceSimulator, VehicleConfig};
    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_race_series_labels_and_lengths() {
        let race = RaceSimulator::default().run(&VehicleConfig::default()).unwrap();
        let series = race_series(&race);
        let labels: Vec<_> = series.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            ["Velocity (m/s)", "Acceleration (m/s/s)", "Distance Travelled (m)", "Current draw (A)"]
        );
        assert!(series.iter().all(|s| s.values.len() == race.len()));
        assert_eq!(series[2].color, BLACK);
    }

    #[test]
    fn test_bounds_start_at_zero_with_headroom() {
        let series = vec![Series { label: "v", color: BLUE, values: vec![-3.0, 2.0, 10.0] }];
        let bounds = PlotBounds::fit(&[0.0, 0.5, 1.0], &series);
        assert!((bounds.x_max - 1.0).abs() < EPSILON);
        assert!((bounds.y_max - 10.5).abs() < EPSILON);
    }

    #[test]
    fn test_bounds_for_flat_or_negative_data() {
        let series = vec![Series { label: "v", color: BLUE, values: vec![-1.0, -2.0] }];
        let bounds = PlotBounds::fit(&[0.0, 0.0], &series);
        assert_eq!(bounds, PlotBounds { x_max: 1.0, y_max: 1.0 });
    }

    #[test]
    fn test_to_screen_maps_corners_and_clamps_negatives() {
        let area = PlotArea { left: 10.0, top: 20.0, width: 100.0, height: 50.0 };
        let bounds = PlotBounds { x_max: 2.0, y_max: 4.0 };

        let origin = area.to_screen(&bounds, 0.0, 0.0);
        assert!((origin.x - 10.0).abs() < EPSILON && (origin.y - 70.0).abs() < EPSILON);

        let corner = area.to_screen(&bounds, 2.0, 4.0);
        assert!((corner.x - 110.0).abs() < EPSILON && (corner.y - 20.0).abs() < EPSILON);

        let below = area.to_screen(&bounds, 1.0, -5.0);
        assert!((below.x - 60.0).abs() < EPSILON && (below.y - 70.0).abs() < EPSILON);
    }

    #[test]
    fn test_nice_step() {
        assert!((nice_step(25.0, 8.0) - 5.0).abs() < EPSILON);
        assert!((nice_step(6.35, 8.0) - 1.0).abs() < EPSILON);
        assert!((nice_step(0.9, 8.0) - 0.2).abs() < EPSILON);
        assert!((nice_step(0.0, 8.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_ticks_cover_range() {
        let t = ticks(25.0);
        assert_eq!(t.first().copied(), Some(0.0));
        assert!((t.last().copied().unwrap() - 25.0).abs() < EPSILON);
        assert_eq!(t.len(), 6);
    }
}
