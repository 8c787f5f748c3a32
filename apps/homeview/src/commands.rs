//! Subcommand implementations

use std::collections::BTreeMap;
use std::error::Error;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use homeview_core::{
    find_hypothesis, format_number, CsvExporter, DashboardConfig, DashboardData, DashboardQuery,
    HomeviewError, Hypothesis, HypothesisEngine, RecommendationReports, ReportKind,
};
use homeview_features::{augmented_table, AugmentedRecord, FeatureDeriver, HouseRecord};
use homeview_io::{read_table, DataTable};
use homeview_server::{serve as serve_http, AppState};

type CommandResult = Result<(), Box<dyn Error>>;

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn load_houses(config: &DashboardConfig) -> Result<Vec<AugmentedRecord>, HomeviewError> {
    let raw = read_table(&config.data.houses.to_string_lossy())?;
    let records = HouseRecord::from_table(&raw)?;
    Ok(FeatureDeriver::new().augment_all(records))
}

// MARK: - serve

pub async fn serve(mut config: DashboardConfig, addr: Option<SocketAddr>) -> CommandResult {
    if let Some(addr) = addr {
        config.server.addr = addr.to_string();
    }
    let addr = config.socket_addr()?;

    let data = DashboardData::load(&config).await?;
    serve_http(addr, Arc::new(AppState::new(data))).await
}

// MARK: - hypotheses

pub fn hypotheses(config: &DashboardConfig, id: Option<&str>) -> CommandResult {
    let houses = load_houses(config)?;
    let hypotheses = HypothesisEngine::new(config.analysis.verdict_tolerance).evaluate(&houses);

    match id {
        Some(id) => {
            let hypothesis = find_hypothesis(&hypotheses, id)
                .ok_or_else(|| HomeviewError::UnknownChart(id.to_string()))?;
            print_hypothesis(hypothesis);
        }
        None => {
            let mut summary = table();
            summary.set_header(vec!["#", "Statement", "Claim", "Observed", "Verdict"]);
            for h in &hypotheses {
                summary.add_row(vec![
                    h.id.clone(),
                    h.statement.clone(),
                    format!("{:+.0}%", h.claim_percent),
                    h.observed_percent
                        .map(|x| format!("{:+.2}%", x))
                        .unwrap_or_else(|| "-".to_string()),
                    h.verdict.to_string(),
                ]);
            }
            println!("{summary}");
        }
    }
    Ok(())
}

fn print_hypothesis(hypothesis: &Hypothesis) {
    let chart = &hypothesis.chart;
    println!("{}\n{}\n", chart.title, hypothesis.statement);

    let mut bars = table();
    bars.set_header(vec![chart.x_label.as_str(), chart.y_label.as_str()]);
    for bar in &chart.bars {
        bars.add_row(vec![bar.label.clone(), format_number(bar.value)]);
    }
    println!("{bars}\n{}", hypothesis.conclusion);
}

// MARK: - reports

pub fn reports(
    config: &DashboardConfig,
    query: &DashboardQuery,
    kind: Option<&str>,
    csv: bool,
) -> CommandResult {
    let kinds = match kind {
        Some(kind) => vec![kind.parse::<ReportKind>()?],
        None => vec![ReportKind::Buy, ReportKind::Sell],
    };

    let reports = RecommendationReports::load(&config.data.buy_report, &config.data.sell_report)?;
    let filter = query.to_expr()?;
    let filtered = reports.apply(&filter)?;
    tracing::info!(filter = %filter, "Applied report filter");

    for kind in kinds {
        let report = filtered.display_table(kind);
        if csv {
            print!("{}", CsvExporter::new().export(&report)?);
        } else {
            println!("{} report ({} rows)", kind, report.num_rows());
            println!("{}", render_table(&report));
        }
    }
    Ok(())
}

fn render_table(data: &DataTable) -> Table {
    let mut out = table();
    out.set_header(data.column_names());
    for row in 0..data.num_rows() {
        out.add_row(data.row(row).iter().map(ToString::to_string));
    }
    out
}

// MARK: - derive

pub fn derive(config: &DashboardConfig, output: Option<&Path>) -> CommandResult {
    let houses = load_houses(config)?;

    if let Some(path) = output {
        CsvExporter::new().write_to(&augmented_table(&houses), path)?;
    }

    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for house in &houses {
        let f = &house.features;
        for key in [
            ("age_house", f.age_house.as_str()),
            ("basement", f.basement.as_str()),
            ("is_renovated", f.is_renovated.as_str()),
            ("season", f.season.as_str()),
            ("complete_bathroom", f.complete_bathroom.as_str()),
        ] {
            *counts.entry(key).or_default() += 1;
        }
    }

    let mut summary = table();
    summary.set_header(vec!["Feature", "Value", "Houses"]);
    for ((feature, value), count) in counts {
        summary.add_row(vec![feature.to_string(), value.to_string(), count.to_string()]);
    }
    println!("{} houses\n{summary}", houses.len());
    Ok(())
}
