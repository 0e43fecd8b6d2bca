//! Stationarity and forecast report rendered as a fixed-layout SVG table

use crate::describe::SeriesDescription;
use crate::format::NumberFormat;
use crate::svg::{Element, SvgDocument, Text, TextAnchor};
use displacement_forecast::{ForecastResult, ModelKind};
use displacement_stationarity::{Metric, MetricValue, StationarityResult};
use tracing::debug;

const WIDTH: u32 = 250;
const HEIGHT: u32 = 500;
const MARGIN_X: f64 = 20.0;
const TOP: f64 = 30.0;
const ROW_HEIGHT: f64 = 20.0;
const LABEL_WIDTH: f64 = 150.0;
const VALUE_WIDTH: f64 = 60.0;
const CELL_PADDING: f64 = 5.0;
const HEADER_FILL: &str = "#0069AA";
const SEPARATOR_STROKE: &str = "#ddd";

/// Placeholder for values that cannot be formatted
pub const NOT_AVAILABLE: &str = "N/A";

/// Everything shown in one analysis report
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub series_id: String,
    pub description: SeriesDescription,
    pub stationarity: StationarityResult,
    pub model: ModelKind,
    pub max_forecast_value: f64,
}

impl Report {
    pub fn new(series_id: &str, stationarity: &StationarityResult, forecast: &ForecastResult) -> Self {
        Self {
            series_id: series_id.to_string(),
            description: SeriesDescription::from_id(series_id),
            stationarity: stationarity.clone(),
            model: forecast.model(),
            max_forecast_value: forecast.max_forecast_value(),
        }
    }
}

/// Display label of a stationarity metric; unknown names pass through
pub fn translate_metric(name: &str) -> &str {
    match name {
        "Test Statistic" => "Estadístico de prueba",
        "p-value" => "p-value",
        "No. of Lags used" => "N° de lags usados",
        "Number of observations used" => "Observaciones totales",
        "Critical Value (1%)" => "Valor crítico (1%)",
        "Critical Value (5%)" => "Valor crítico (5%)",
        "Critical Value (10%)" => "Valor crítico (10%)",
        other => other,
    }
}

/// Renders [`Report`]s into standalone SVG documents
///
/// Rendering is a pure function of the report and the number format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer {
    format: NumberFormat,
}

impl ReportRenderer {
    pub fn new(format: NumberFormat) -> Self {
        Self { format }
    }

    pub fn number_format(&self) -> &NumberFormat {
        &self.format
    }

    pub fn render(&self, report: &Report) -> String {
        self.document(report).serialize()
    }

    /// Lay out the report without serialising it
    pub fn document(&self, report: &Report) -> SvgDocument {
        let mut doc = SvgDocument::new(WIDTH, HEIGHT);
        let mut y = TOP;

        doc.push(Text::new(MARGIN_X, y, "Análisis de estacionariedad").bold());
        y += ROW_HEIGHT;

        let (table, next_y) = self.metrics_table(&report.stationarity.metrics(), y);
        doc.push(table);
        y = next_y + ROW_HEIGHT;

        let verdict = if report.stationarity.is_stationary() {
            "La serie temporal es estacionaria."
        } else {
            "La serie temporal es no estacionaria."
        };
        doc.push(Text::new(MARGIN_X, y, verdict));
        y += ROW_HEIGHT;

        doc.push(Text::new(MARGIN_X, y, "Resultados del pronóstico").bold());
        y += ROW_HEIGHT;

        let max_value = self.real(report.max_forecast_value, "max forecast value");
        for (label, value, header) in [
            ("Característica", "Valor".to_string(), true),
            ("Tipo de modelo", report.model.label().to_string(), false),
            ("Máximo valor pronosticado", max_value, false),
        ] {
            doc.push(table_row(y, label, &value, header));
            y += ROW_HEIGHT;
        }

        doc
    }

    /// Header plus one row per metric; returns the y of the next free row
    pub fn metrics_table(&self, metrics: &[Metric], start_y: f64) -> (Element, f64) {
        let mut y = start_y;
        let mut rows = vec![table_row(y, "Métrica", "Valor", true)];
        y += ROW_HEIGHT;
        for metric in metrics {
            let value = match metric.value {
                MetricValue::Count(count) => self.format.format_count(count),
                MetricValue::Real(value) => self.real(value, &metric.name),
            };
            rows.push(table_row(y, translate_metric(&metric.name), &value, false));
            y += ROW_HEIGHT;
        }
        (Element::Group(rows), y)
    }

    fn real(&self, value: f64, what: &str) -> String {
        self.format.format(value).unwrap_or_else(|e| {
            debug!(metric = what, error = %e, "value rendered as N/A");
            NOT_AVAILABLE.to_string()
        })
    }
}

/// One two-column table row at baseline `y`
fn table_row(y: f64, label: &str, value: &str, header: bool) -> Element {
    let x = MARGIN_X;
    let width = LABEL_WIDTH + VALUE_WIDTH;
    let (background, text_fill) = if header {
        (
            Element::Rect {
                x,
                y: y - 15.0,
                width,
                height: ROW_HEIGHT,
                fill: HEADER_FILL.to_string(),
            },
            "white",
        )
    } else {
        (
            Element::Line {
                x1: x,
                y1: y + 5.0,
                x2: x + width,
                y2: y + 5.0,
                stroke: SEPARATOR_STROKE.to_string(),
                stroke_width: 1.0,
            },
            "black",
        )
    };

    Element::Group(vec![
        background,
        Text::new(x + CELL_PADDING, y, label)
            .fill(text_fill)
            .anchor(TextAnchor::Start)
            .into(),
        Text::new(x + width - CELL_PADDING, y, value)
            .fill(text_fill)
            .anchor(TextAnchor::End)
            .into(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use displacement_stationarity::CriticalValues;

    fn stationarity(p_value: f64) -> StationarityResult {
        StationarityResult {
            statistic: -3.1234567,
            p_value,
            used_lag: 2,
            n_obs: 27,
            critical_values: CriticalValues {
                one_percent: -3.6891,
                five_percent: -2.9718,
                ten_percent: -2.6251,
            },
            ic_best: Some(10.0),
        }
    }

    fn report(p_value: f64, max: f64) -> Report {
        Report {
            series_id: "X_HOR".to_string(),
            description: SeriesDescription::from_id("X_HOR"),
            stationarity: stationarity(p_value),
            model: ModelKind::SeasonalArima,
            max_forecast_value: max,
        }
    }

    #[test]
    fn test_translations() {
        assert_eq!(translate_metric("Test Statistic"), "Estadístico de prueba");
        assert_eq!(translate_metric("No. of Lags used"), "N° de lags usados");
        assert_eq!(translate_metric("Critical Value (10%)"), "Valor crítico (10%)");
        assert_eq!(translate_metric("Custom"), "Custom");
    }

    #[test]
    fn test_report_contents() {
        let svg = ReportRenderer::default().render(&report(0.0123, 12.5));
        assert!(svg.contains(">Análisis de estacionariedad</text>"));
        assert!(svg.contains(">Estadístico de prueba</text>"));
        assert!(svg.contains(">-3,1235</text>"));
        assert!(svg.contains(">0,0123</text>"));
        assert!(svg.contains(">2</text>"));
        assert!(svg.contains(">27</text>"));
        assert!(svg.contains(">La serie temporal es estacionaria.</text>"));
        assert!(svg.contains(">SARIMA</text>"));
        assert!(svg.contains(">12,5000</text>"));
    }

    #[test]
    fn test_non_stationary_sentence() {
        let svg = ReportRenderer::default().render(&report(0.2, 1.0));
        assert!(svg.contains(">La serie temporal es no estacionaria.</text>"));
    }

    #[test]
    fn test_non_finite_rendered_as_na() {
        let svg = ReportRenderer::default().render(&report(f64::NAN, f64::INFINITY));
        assert_eq!(svg.matches(">N/A</text>").count(), 2);
    }

    #[test]
    fn test_unknown_metric_passes_through() {
        let renderer = ReportRenderer::default();
        let (table, next_y) = renderer.metrics_table(&[Metric::real("Custom metric", 1.5)], 50.0);
        assert_eq!(next_y, 90.0);
        let mut doc = SvgDocument::new(10, 10);
        doc.push(table);
        let svg = doc.serialize();
        assert!(svg.contains(">Custom metric</text>"));
        assert!(svg.contains(">1,5000</text>"));
    }

    #[test]
    fn test_row_geometry() {
        let svg = ReportRenderer::default().render(&report(0.2, 1.0));
        // First table header sits one row below the title
        assert!(svg.contains("<rect x=\"20\" y=\"35\" width=\"210\" height=\"20\" fill=\"#0069AA\"/>"));
        assert!(svg.contains("<text x=\"25\" y=\"50\""));
        assert!(svg.contains("<text x=\"225\" y=\"50\""));
        // First body row separator
        assert!(svg.contains("<line x1=\"20\" y1=\"75\" x2=\"230\" y2=\"75\" stroke=\"#ddd\" stroke-width=\"1\"/>"));
    }
}
