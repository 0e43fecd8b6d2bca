use chrono::NaiveDate;
use displacement_core::calendar::month_ends_after;
use displacement_core::Series;
use displacement_decompose::SeasonalDecomposer;
use displacement_forecast::{
    BayesianParams, ForecastModel, ForecastPoint, ForecastResult, ModelKind, SarimaParams,
};
use displacement_report::{
    ChartRenderer, NullChartRenderer, NumberFormat, Report, ReportRenderer, SvgChartRenderer,
};
use displacement_stationarity::{CriticalValues, StationarityResult};
use proptest::prelude::*;

fn monthly_series(id: &str, n: usize) -> Series {
    let start = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
    let dates: Vec<NaiveDate> = (0..n as u32)
        .map(|i| start.checked_add_months(chrono::Months::new(i)).unwrap())
        .collect();
    let values: Vec<f64> = (0..n)
        .map(|i| 0.5 * i as f64 + (i as f64 * std::f64::consts::PI / 3.0).sin())
        .collect();
    Series::from_parts(id, &dates, &values).unwrap()
}

fn forecast_for(series: &Series, model: ModelKind) -> ForecastResult {
    let last = series.last_timestamp().unwrap();
    let points = month_ends_after(last, 6)
        .into_iter()
        .enumerate()
        .map(|(i, timestamp)| ForecastPoint {
            timestamp,
            estimate: 20.0 + i as f64,
            lower: 18.0 + i as f64 * 0.5,
            upper: 22.0 + i as f64 * 1.5,
        })
        .collect();
    ForecastResult::new(model, points).unwrap()
}

fn stationarity(p_value: f64) -> StationarityResult {
    StationarityResult {
        statistic: -2.5,
        p_value,
        used_lag: 1,
        n_obs: 22,
        critical_values: CriticalValues {
            one_percent: -3.7697,
            five_percent: -3.0054,
            ten_percent: -2.6425,
        },
        ic_best: None,
    }
}

#[test]
fn test_report_is_deterministic() {
    let series = monthly_series("P3_TOT", 24);
    let forecast = forecast_for(&series, ModelKind::BayesianAdditive);
    let report = Report::new(series.id(), &stationarity(0.2), &forecast);
    let renderer = ReportRenderer::default();

    let first = renderer.render(&report);
    let second = renderer.render(&report.clone());
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_report_summarises_forecast() {
    let series = monthly_series("P3_TOT", 24);
    let forecast = forecast_for(&series, ModelKind::BayesianAdditive);
    let report = Report::new(series.id(), &stationarity(0.2), &forecast);

    assert_eq!(report.model, ModelKind::BayesianAdditive);
    assert_eq!(report.max_forecast_value, 29.5);
    assert_eq!(report.description.description, "Desplazamiento total absoluto");

    let svg = ReportRenderer::default().render(&report);
    assert!(svg.contains(">Bayesiano aditivo</text>"));
    assert!(svg.contains(">29,5000</text>"));
    assert!(svg.contains(">La serie temporal es no estacionaria.</text>"));
    assert!(svg.contains(">Resultados del pronóstico</text>"));
    assert!(svg.contains(">Máximo valor pronosticado</text>"));
}

#[test]
fn test_report_layout_order() {
    let series = monthly_series("P3_HOR", 30);
    let forecast = forecast_for(&series, ModelKind::SeasonalArima);
    let svg = ReportRenderer::default().render(&Report::new(series.id(), &stationarity(0.01), &forecast));

    let position = |needle: &str| svg.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
    let title = position("Análisis de estacionariedad");
    let statistic = position("Estadístico de prueba");
    let lags = position("N° de lags usados");
    let observations = position("Observaciones totales");
    let critical = position("Valor crítico (10%)");
    let verdict = position("La serie temporal es estacionaria.");
    let model = position("Tipo de modelo");
    assert!(title < statistic && statistic < lags && lags < observations);
    assert!(observations < critical && critical < verdict && verdict < model);

    // Seven metric rows below a header starting at y = 50, then one gap row
    assert!(svg.contains("<text x=\"20\" y=\"230\""));
    assert!(svg.contains("<text x=\"20\" y=\"250\""));
}

#[test]
fn test_counts_and_reals_formatting() {
    let series = monthly_series("P3_HOR", 30);
    let forecast = forecast_for(&series, ModelKind::SeasonalArima);
    let report = Report::new(series.id(), &stationarity(0.01), &forecast);

    let svg = ReportRenderer::default().render(&report);
    assert!(svg.contains(">22</text>"));
    assert!(svg.contains(">1</text>"));
    assert!(svg.contains(">-2,5000</text>"));
    assert!(svg.contains(">-3,7697</text>"));

    let plain = ReportRenderer::new(NumberFormat::plain(2)).render(&report);
    assert!(plain.contains(">-2.50</text>"));
    assert!(plain.contains(">22</text>"));
}

#[test]
fn test_null_renderer_draws_nothing() {
    let series = monthly_series("P3_TOT", 24);
    let decomposition = SeasonalDecomposer::default().decompose(&series).unwrap();
    let forecast = forecast_for(&series, ModelKind::BayesianAdditive);
    let model = ForecastModel::BayesianAdditive(BayesianParams::default());

    let renderer = NullChartRenderer;
    assert!(renderer.render_decomposition(series.id(), &decomposition).unwrap().is_none());
    assert!(renderer.render_forecast(&series, &model, &forecast).unwrap().is_none());
}

#[test]
fn test_svg_charts() {
    let series = monthly_series("P3_TOT", 24);
    let decomposition = SeasonalDecomposer::default().decompose(&series).unwrap();
    let forecast = forecast_for(&series, ModelKind::SeasonalArima);
    let model = ForecastModel::SeasonalArima(SarimaParams::default());
    let renderer = SvgChartRenderer::default();

    let decomposition_svg = renderer
        .render_decomposition(series.id(), &decomposition)
        .unwrap()
        .unwrap();
    assert!(decomposition_svg.contains("<svg"));
    assert!(decomposition_svg.contains("Tendencia"));
    assert!(decomposition_svg.contains("Residuo"));

    let forecast_svg = renderer.render_forecast(&series, &model, &forecast).unwrap().unwrap();
    assert!(forecast_svg.contains("<svg"));
    assert!(forecast_svg.contains("Datos históricos"));
    assert!(forecast_svg.contains("Predicción SARIMA"));
    assert!(forecast_svg.contains("Intervalo de confianza 95%"));
    assert!(forecast_svg.contains("Fecha"));
}

proptest! {
    #[test]
    fn prop_default_format_round_trips(value in -1.0e6f64..1.0e6) {
        let text = NumberFormat::default().format(value).unwrap();
        let (_, fraction) = text.rsplit_once(',').unwrap();
        prop_assert_eq!(fraction.len(), 4);
        let parsed: f64 = text.replace('.', "").replace(',', ".").parse().unwrap();
        prop_assert!((parsed - value).abs() <= 5e-5 + 1e-9 * value.abs());
    }
}
