use std::io::Cursor;
use std::ops::Range;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::telemetry::chart::{ChartConfig, ChartFrame};
use crate::telemetry::PollError;
// Marker radius; a run of one point has no line to draw.
const POINT_SIZE: u32 = 3;

#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: RGBColor(10, 10, 15),
        }
    }
}
/// Render the visible window to PNG bytes. Only what the chart currently
/// shows is drawn; nothing older than the window exists to draw.
pub fn render_window_png(
    frame: &ChartFrame,
    config: &ChartConfig,
    style: &PlotStyle,
) -> Result<Vec<u8>, PollError> {
    if frame.is_empty() {
        return Err(PollError::Chart("window has no samples yet".into()));
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let y_range = value_axis(frame, config);
        let x_max = (frame.len().max(2) - 1) as f64;
        let labels = frame.labels.clone();
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&config.title, ("sans-serif", 20).into_font().color(&WHITE))
            .set_label_area_size(LabelAreaPosition::Left, 45)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(0f64..x_max, y_range)?;
        chart
            .configure_mesh()
            .light_line_style(&WHITE.mix(0.1))
            .x_labels(frame.len())
            .x_label_formatter(&|x| {
                labels
                    .get(x.round().max(0.0) as usize)
                    .cloned()
                    .unwrap_or_default()
            })
            .label_style(("sans-serif", 12).into_font().color(&WHITE))
            .draw()?;
        for (idx, style_entry) in config.series.iter().enumerate() {
            let [r, g, b, _] = style_entry.rgba;
            let color = RGBColor(r, g, b);
            let width = style_entry.line_width.round().max(1.0) as u32;
            let mut segments = frame.segments(idx).into_iter();
            let Some(first) = segments.next() else {
                continue;
            };
            chart
                .draw_series(
                    LineSeries::new(first.into_iter().map(|[x, y]| (x, y)), color.stroke_width(width))
                        .point_size(POINT_SIZE),
                )?
                .label(style_entry.label.clone())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width))
                });
            for run in segments {
                chart.draw_series(
                    LineSeries::new(run.into_iter().map(|[x, y]| (x, y)), color.stroke_width(width))
                        .point_size(POINT_SIZE),
                )?;
            }
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .border_style(&WHITE.mix(0.2))
            .background_style(&style.background)
            .label_font(("sans-serif", 12).into_font().color(&WHITE))
            .draw()?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// Vertical range covering every finite value, with headroom on top. With
/// `begin_at_zero` the range always contains zero.
fn value_axis(frame: &ChartFrame, config: &ChartConfig) -> Range<f64> {
    let (mut lo, mut hi) = frame.value_bounds().unwrap_or((0.0, 1.0));
    if config.begin_at_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let span = hi - lo;
    if span < f64::EPSILON {
        return lo..lo + 1.0;
    }
    lo..hi + span * 0.05
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, PollError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| PollError::Chart("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::window::SensorWindow;
    use crate::types::Channel;
    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    #[test]
    fn renders_window_with_gaps_to_png() {
        let mut window = SensorWindow::new(10);
        window.append("00:16:40".into(), [5.0, 10.0, 3.0, 22.0, 60.0]);
        window.append("00:16:45".into(), [f64::NAN, 11.0, 3.5, 22.4, 61.0]);
        window.append("00:16:50".into(), [6.0, 12.0, 4.0, 22.9, 59.0]);
        let png = render_window_png(&window.frame(), &ChartConfig::default(), &PlotStyle::default())
            .unwrap();
        assert_eq!(png[..8], PNG_MAGIC);
    }
    fn frame_of(series: Vec<Vec<f64>>) -> ChartFrame {
        ChartFrame {
            labels: (0..series[0].len()).map(|i| format!("t{i}")).collect(),
            series,
        }
    }

    #[test]
    fn single_reading_leaves_a_marker() {
        let nan = vec![f64::NAN];
        let frame = frame_of(vec![vec![5.0], nan.clone(), nan.clone(), nan.clone(), nan]);
        let style = PlotStyle::default();
        let png = render_window_png(&frame, &ChartConfig::default(), &style).unwrap();

        let image = image::load_from_memory(&png).unwrap().to_rgb8();
        let [r, g, b, _] = Channel::Moisture.rgba();
        // The legend sits bottom right; the lone point is at the left edge.
        let marker_pixels = image
            .enumerate_pixels()
            .filter(|(x, _, px)| *x < style.width / 2 && px.0 == [r, g, b])
            .count();
        assert!(marker_pixels > 0);
    }

    #[test]
    fn negative_values_stay_inside_the_axis() {
        let frame = frame_of(vec![vec![-5.0, -2.0]]);
        let range = value_axis(&frame, &ChartConfig::default());
        assert_eq!(range.start, -5.0);
        assert!(range.end > 0.0);

        let floating = ChartConfig {
            begin_at_zero: false,
            ..ChartConfig::default()
        };
        let range = value_axis(&frame, &floating);
        assert_eq!(range.start, -5.0);
        assert!(range.end > -2.0);
    }

    #[test]
    fn positive_values_start_at_zero_with_headroom() {
        let range = value_axis(&frame_of(vec![vec![10.0, 20.0]]), &ChartConfig::default());
        assert_eq!(range.start, 0.0);
        assert!(range.end > 20.0);

        let flat = value_axis(&frame_of(vec![vec![0.0, 0.0]]), &ChartConfig::default());
        assert_eq!(flat, 0.0..1.0);
    }

    #[test]
    fn empty_window_is_rejected() {
        let err = render_window_png(
            &ChartFrame::empty(),
            &ChartConfig::default(),
            &PlotStyle::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PollError::Chart(_)));
    }
}
