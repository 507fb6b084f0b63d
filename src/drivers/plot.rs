use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::drivers::error::MonitorError;
use crate::drivers::scheduler::{BATTERY_SERIES, SPEED_SERIES};
use crate::drivers::TelemetryFrame;
pub const PLOT_TITLE: &str = "Speed and Battery Voltage Over Time";
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub speed_color: RGBColor,
    pub battery_color: RGBColor,
    /// Caption, axis labels and legend. Text needs system fonts.
    pub show_text: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: RGBColor(10, 10, 10),
            speed_color: RED,
            battery_color: BLUE,
            show_text: true,
        }
    }
}
/// Renders both telemetry series onto one chart and encodes it as PNG.
pub fn render_telemetry_png(
    frame: &TelemetryFrame,
    style: PlotStyle,
) -> Result<Vec<u8>, MonitorError> {
    if frame.is_empty() {
        return Err(MonitorError::Plot("telemetry frame has no samples".into()));
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let y_max = frame
            .speed
            .iter()
            .chain(&frame.battery)
            .copied()
            .fold(0.0f64, f64::max);
        let y_min = frame
            .speed
            .iter()
            .chain(&frame.battery)
            .copied()
            .fold(0.0f64, f64::min);
        let y_bounds = if (y_max - y_min).abs() < f64::EPSILON {
            (0.0, 100.0)
        } else {
            (y_min, y_max * 1.05)
        };
        let x_max = frame.x.last().copied().unwrap_or(0.0).max(1.0);
        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if style.show_text {
            builder
                .caption(PLOT_TITLE, ("sans-serif", 20).into_font().color(&WHITE))
                .set_label_area_size(LabelAreaPosition::Left, 45)
                .set_label_area_size(LabelAreaPosition::Bottom, 40);
        }
        let mut chart = builder.build_cartesian_2d(0f64..x_max, y_bounds.0..y_bounds.1)?;
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(&WHITE.mix(0.1));
        if style.show_text {
            mesh.x_desc("Time (s)").y_desc("Speed (%) / Battery Voltage (V)");
        } else {
            mesh.x_labels(0).y_labels(0);
        }
        mesh.draw()?;
        let series = [
            (SPEED_SERIES, &frame.speed, style.speed_color),
            (BATTERY_SERIES, &frame.battery, style.battery_color),
        ];
        for (name, values, color) in series {
            let points = frame.x.iter().copied().zip(values.iter().copied());
            chart
                .draw_series(LineSeries::new(points, &color))?
                .label(name)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
        if style.show_text {
            chart
                .configure_series_labels()
                .border_style(&WHITE.mix(0.2))
                .background_style(&style.background)
                .draw()?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, MonitorError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| MonitorError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
