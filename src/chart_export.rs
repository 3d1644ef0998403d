//! PNG export of the on-screen charts via the plotters bitmap backend.

use std::path::Path;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use plotters::prelude::*;

use crate::chart_data::RowTable;

const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(18, 75, 115),
    RGBColor(63, 203, 249),
    RGBColor(255, 165, 0),
    RGBColor(44, 160, 44),
];

/// Write `table` as a line chart PNG. Rows chart at their index on the x
/// axis with date labels; non-finite values are left out of their series.
pub fn export_png(path: &Path, table: &RowTable, title: &str) -> Result<()> {
    let rows = &table.rows;
    if rows.len() < 2 {
        return Err(eyre!("not enough data to export"));
    }

    let y_max = rows
        .iter()
        .flat_map(|r| r.values.iter())
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.2 } else { 1.0 };

    let root = BitMapBackend::new(path, (900, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..(rows.len() - 1) as f64, 0.0..y_max)?;

    let dates: Vec<String> = rows
        .iter()
        .map(|r| r.date.format("%-m/%-d").to_string())
        .collect();
    chart
        .configure_mesh()
        .x_label_formatter(&|x| {
            let idx = x.round() as usize;
            dates.get(idx).cloned().unwrap_or_default()
        })
        .draw()?;

    for s in 0..table.series_count() {
        let color = SERIES_COLORS[s % SERIES_COLORS.len()];
        let points: Vec<(f64, f64)> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.values.get(s).is_some_and(|v| v.is_finite()))
            .map(|(i, r)| (i as f64, r.values[s]))
            .collect();
        chart
            .draw_series(LineSeries::new(points, color))?
            .label(table.schema[s + 1].as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_data::Row;
    use chrono::{TimeZone, Utc};
    use std::io::Read;

    fn table() -> RowTable {
        RowTable {
            schema: vec!["Date".into(), "Total".into(), "New".into()],
            short_schema: None,
            rows: (0..5)
                .map(|i| {
                    Row::new(
                        Utc.with_ymd_and_hms(2020, 3, i + 1, 0, 0, 0).unwrap(),
                        vec![(i as f64 + 1.0) * 10.0, 3.0],
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn writes_a_png_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("chart.png");
        export_png(&path, &table(), "Confirmed").expect("export_png");

        let mut magic = [0u8; 8];
        std::fs::File::open(&path)
            .expect("open png")
            .read_exact(&mut magic)
            .expect("read png header");
        assert_eq!(&magic, b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn too_little_data_is_an_error() {
        let mut t = table();
        t.rows.truncate(1);
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(export_png(&dir.path().join("chart.png"), &t, "Confirmed").is_err());
    }
}
