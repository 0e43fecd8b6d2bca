//! Decomposition and forecast charts
//!
//! Charts are produced through the [`ChartRenderer`] trait so the batch job
//! can run with real SVG output ([`SvgChartRenderer`]) or without any
//! drawing at all ([`NullChartRenderer`]).

use crate::describe::SeriesDescription;
use displacement_core::calendar::{date_from_days, days_since_epoch};
use displacement_core::{Error, Result, Series};
use displacement_decompose::Decomposition;
use displacement_forecast::{ForecastModel, ForecastResult};
use plotters::prelude::*;
use std::ops::Range;

/// Produces chart documents for one series
///
/// `Ok(None)` means the renderer deliberately produced nothing.
pub trait ChartRenderer {
    /// Observed, trend, seasonal and residual panels
    fn render_decomposition(&self, series_id: &str, decomposition: &Decomposition) -> Result<Option<String>>;

    /// History, forecast and its confidence band
    fn render_forecast(
        &self,
        series: &Series,
        model: &ForecastModel,
        forecast: &ForecastResult,
    ) -> Result<Option<String>>;
}

impl<T: ChartRenderer + ?Sized> ChartRenderer for &T {
    fn render_decomposition(&self, series_id: &str, decomposition: &Decomposition) -> Result<Option<String>> {
        (**self).render_decomposition(series_id, decomposition)
    }

    fn render_forecast(
        &self,
        series: &Series,
        model: &ForecastModel,
        forecast: &ForecastResult,
    ) -> Result<Option<String>> {
        (**self).render_forecast(series, model, forecast)
    }
}

/// Renderer that never draws
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChartRenderer;

impl ChartRenderer for NullChartRenderer {
    fn render_decomposition(&self, _series_id: &str, _decomposition: &Decomposition) -> Result<Option<String>> {
        Ok(None)
    }

    fn render_forecast(
        &self,
        _series: &Series,
        _model: &ForecastModel,
        _forecast: &ForecastResult,
    ) -> Result<Option<String>> {
        Ok(None)
    }
}

/// SVG charts drawn with `plotters`
#[derive(Debug, Clone, Copy)]
pub struct SvgChartRenderer {
    /// Pixel size of the decomposition chart
    pub decomposition_size: (u32, u32),
    /// Pixel size of the forecast chart
    pub forecast_size: (u32, u32),
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self {
            decomposition_size: (960, 960),
            forecast_size: (1440, 960),
        }
    }
}

fn render_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

fn format_day(days: &f64) -> String {
    date_from_days(*days)
        .map(|d| d.format("%d-%m-%y").to_string())
        .unwrap_or_default()
}

/// Axis range covering all values with a 5% margin
fn padded_range(values: impl IntoIterator<Item = f64>) -> Result<Range<f64>> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min > max {
        return Err(Error::Render("nothing to plot".to_string()));
    }
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    Ok(min - pad..max + pad)
}

impl ChartRenderer for SvgChartRenderer {
    fn render_decomposition(&self, series_id: &str, decomposition: &Decomposition) -> Result<Option<String>> {
        let x: Vec<f64> = decomposition
            .timestamps
            .iter()
            .map(|d| days_since_epoch(*d))
            .collect();
        let x_range = padded_range(x.iter().copied())?;

        let panels: [(&str, Vec<(f64, f64)>, bool); 4] = [
            (
                "Observado",
                x.iter().copied().zip(decomposition.observed.iter().copied()).collect(),
                false,
            ),
            (
                "Tendencia",
                x.iter()
                    .zip(&decomposition.trend)
                    .filter_map(|(x, v)| v.map(|v| (*x, v)))
                    .collect(),
                false,
            ),
            (
                "Estacionalidad",
                x.iter().copied().zip(decomposition.seasonal.iter().copied()).collect(),
                false,
            ),
            (
                "Residuo",
                x.iter()
                    .zip(&decomposition.residual)
                    .filter_map(|(x, v)| v.map(|v| (*x, v)))
                    .collect(),
                true,
            ),
        ];

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.decomposition_size).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            let root = root
                .titled(series_id, ("sans-serif", 22))
                .map_err(render_error)?;

            for (area, (name, points, markers)) in root.split_evenly((4, 1)).iter().zip(panels) {
                if points.is_empty() {
                    continue;
                }
                let y_range = padded_range(points.iter().map(|p| p.1))?;
                let mut chart = ChartBuilder::on(area)
                    .margin(10)
                    .x_label_area_size(30)
                    .y_label_area_size(60)
                    .build_cartesian_2d(x_range.clone(), y_range)
                    .map_err(render_error)?;
                chart
                    .configure_mesh()
                    .x_labels(8)
                    .x_label_formatter(&format_day)
                    .y_desc(name)
                    .draw()
                    .map_err(render_error)?;

                if markers {
                    chart
                        .draw_series(LineSeries::new(
                            [(x_range.start, 0.0), (x_range.end, 0.0)],
                            &BLACK.mix(0.5),
                        ))
                        .map_err(render_error)?;
                    chart
                        .draw_series(points.iter().map(|p| Circle::new(*p, 3, BLUE.filled())))
                        .map_err(render_error)?;
                } else {
                    chart
                        .draw_series(LineSeries::new(points, &BLUE))
                        .map_err(render_error)?;
                }
            }
            root.present().map_err(render_error)?;
        }
        Ok(Some(svg))
    }

    fn render_forecast(
        &self,
        series: &Series,
        model: &ForecastModel,
        forecast: &ForecastResult,
    ) -> Result<Option<String>> {
        let history: Vec<(f64, f64)> = series
            .observations()
            .iter()
            .map(|o| (days_since_epoch(o.timestamp), o.value))
            .collect();
        let future: Vec<(f64, f64)> = forecast
            .points()
            .iter()
            .map(|p| (days_since_epoch(p.timestamp), p.estimate))
            .collect();
        let band: Vec<(f64, f64)> = forecast
            .points()
            .iter()
            .map(|p| (days_since_epoch(p.timestamp), p.upper))
            .chain(
                forecast
                    .points()
                    .iter()
                    .rev()
                    .map(|p| (days_since_epoch(p.timestamp), p.lower)),
            )
            .collect();

        let x_range = padded_range(history.iter().chain(&future).map(|p| p.0))?;
        let y_range = padded_range(history.iter().chain(&band).map(|p| p.1))?;

        let description = SeriesDescription::from_id(series.id());
        let title = format!(
            "{} - {} - {}",
            model.describe(),
            series.id(),
            description.description
        );
        let forecast_label = format!("Predicción {}", forecast.model().label());

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.forecast_size).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 24))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(80)
                .build_cartesian_2d(x_range, y_range)
                .map_err(render_error)?;
            chart
                .configure_mesh()
                .x_labels(10)
                .x_label_formatter(&format_day)
                .x_desc("Fecha")
                .y_desc(description.axis_label.as_str())
                .draw()
                .map_err(render_error)?;

            chart
                .draw_series(std::iter::once(Polygon::new(band, RED.mix(0.15).filled())))
                .map_err(render_error)?
                .label("Intervalo de confianza 95%")
                .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], RED.mix(0.15).filled()));
            chart
                .draw_series(LineSeries::new(history, &BLUE))
                .map_err(render_error)?
                .label("Datos históricos")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
            chart
                .draw_series(LineSeries::new(future, &RED))
                .map_err(render_error)?
                .label(forecast_label)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .position(SeriesLabelPosition::UpperLeft)
                .draw()
                .map_err(render_error)?;
            root.present().map_err(render_error)?;
        }
        Ok(Some(svg))
    }
}
