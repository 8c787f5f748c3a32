//! The dashboard as a single HTML document
//!
//! Layout: title, hypothesis grid, filter sidebar, the two report tables,
//! then the density and choropleth maps. Map data is embedded as JSON and
//! drawn client side with Leaflet.

use crate::chart::escape_xml;
use crate::dashboard::{DashboardData, DashboardQuery, DashboardView};
use crate::error::HomeviewResult;
use crate::hypothesis::{Hypothesis, Verdict};
use crate::map::{ChoroplethMap, DensityMap};
use crate::report::ReportKind;
use homeview_io::DataTable;
use serde::Serialize;

pub const PAGE_TITLE: &str = "House Rocket Company";

const CHART_WIDTH: u32 = 480;
const CHART_HEIGHT: u32 = 320;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const CLUSTER_CSS: &str = "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css";
const CLUSTER_BASE_CSS: &str = "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css";
const CLUSTER_JS: &str = "https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js";

const STYLE: &str = "body{font-family:sans-serif;margin:0;display:flex}\
aside{width:260px;padding:16px;background:#F0F2F6;min-height:100vh}\
main{flex:1;padding:16px 32px}\
.grid{display:grid;grid-template-columns:repeat(2,1fr);gap:24px}\
.hypothesis p{margin:4px 0}.holds{color:#00A36C}.rejected{color:#C0392B}\
table{border-collapse:collapse;font-size:12px;margin-bottom:24px}\
th,td{border:1px solid #DDD;padding:2px 6px;text-align:right}\
.map{height:480px;margin-bottom:24px}\
input[type=text]{width:100%;box-sizing:border-box}";

/// Map payloads handed to the page script
#[derive(Serialize)]
struct MapPayload<'a> {
    density: &'a DensityMap,
    choropleth: &'a ChoroplethMap,
}

/// Render the full dashboard page for one view
pub fn render_page(
    data: &DashboardData,
    view: &DashboardView,
    query: &DashboardQuery,
) -> HomeviewResult<String> {
    let maps = serde_json::to_string(&MapPayload {
        density: &view.density,
        choropleth: &view.choropleth,
    })?;

    let mut html = String::new();
    html.push_str(&format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>{PAGE_TITLE}</title><link rel="stylesheet" href="{LEAFLET_CSS}"><link rel="stylesheet" href="{CLUSTER_BASE_CSS}"><link rel="stylesheet" href="{CLUSTER_CSS}"><style>{STYLE}</style></head><body>"#,
    ));

    render_sidebar(&mut html, view, query);

    html.push_str(&format!("<main><h1>{PAGE_TITLE}</h1><h2>Main insights</h2><div class=\"grid\">"));
    for hypothesis in &data.hypotheses {
        render_hypothesis(&mut html, hypothesis);
    }
    html.push_str("</div>");

    for (kind, heading) in [
        (ReportKind::Buy, "Buy recommendations"),
        (ReportKind::Sell, "Sell recommendations"),
    ] {
        let table = view.reports.display_table(kind);
        html.push_str(&format!("<h2>{heading} ({} rows)</h2>", table.num_rows()));
        render_table(&mut html, &table);
    }

    html.push_str(
        r#"<h2>Geographic view of the buy report</h2><h3>Portfolio density</h3><div id="density" class="map"></div><h3>Price density</h3><div id="choropleth" class="map"></div></main>"#,
    );
    html.push_str(&format!(
        r#"<script src="{LEAFLET_JS}"></script><script src="{CLUSTER_JS}"></script><script>const MAPS = {};{}</script></body></html>"#,
        escape_script(&maps),
        MAP_SCRIPT,
    ));
    Ok(html)
}

fn render_sidebar(html: &mut String, view: &DashboardView, query: &DashboardQuery) {
    let join = |values: &[i64]| {
        values
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let value = |v: &Option<String>| escape_xml(v.as_deref().unwrap_or(""));

    html.push_str(r#"<aside><h2>Filters</h2><form method="get" action="/">"#);
    html.push_str(&format!(
        r#"<label>Zip codes<input type="text" name="zipcode" value="{}" placeholder="98001, 98002"></label><p><small>Available: {}</small></p>"#,
        value(&query.zipcode),
        join(&view.options.zipcodes),
    ));
    html.push_str(&format!(
        r#"<label>Conditions<input type="text" name="condition" value="{}" placeholder="3, 4"></label><p><small>Available: {}</small></p>"#,
        value(&query.condition),
        join(&view.options.conditions),
    ));
    html.push_str(&format!(
        r#"<label>Expression<input type="text" name="filter" value="{}" placeholder="price &lt; 500000"></label><p><button type="submit">Apply</button></p></form><p><small>Active filter: <code>{}</code></small></p></aside>"#,
        value(&query.filter),
        escape_xml(&view.filter.to_string()),
    ));
}

fn render_hypothesis(html: &mut String, hypothesis: &Hypothesis) {
    html.push_str(&format!(
        r#"<section class="hypothesis" id="{}">{}<p><strong>H{}:</strong> {}</p><p class="{}">{}</p></section>"#,
        hypothesis.id,
        hypothesis.chart.to_svg(CHART_WIDTH, CHART_HEIGHT),
        hypothesis.number,
        escape_xml(&hypothesis.statement),
        verdict_class(hypothesis),
        escape_xml(&hypothesis.conclusion),
    ));
}

fn verdict_class(hypothesis: &Hypothesis) -> &'static str {
    match hypothesis.verdict {
        Verdict::Holds => "holds",
        Verdict::Rejected => "rejected",
        Verdict::Inconclusive => "inconclusive",
    }
}

/// Render a table with escaped header and cells
pub fn render_table(html: &mut String, table: &DataTable) {
    html.push_str("<table><thead><tr>");
    for name in table.column_names() {
        html.push_str(&format!("<th>{}</th>", escape_xml(name)));
    }
    html.push_str("</tr></thead><tbody>");
    for row in 0..table.num_rows() {
        html.push_str("<tr>");
        for cell in table.row(row) {
            html.push_str(&format!("<td>{}</td>", escape_xml(&cell.to_string())));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
}

/// Keep embedded JSON from closing the script element
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

const MAP_SCRIPT: &str = r#"
const tiles = 'https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png';
const d = MAPS.density;
const density = L.map('density').setView([d.center.lat, d.center.long], d.zoom);
L.tileLayer(tiles).addTo(density);
const cluster = L.markerClusterGroup();
d.markers.forEach(m => cluster.addLayer(L.marker([m.lat, m.long]).bindPopup(m.popup)));
density.addLayer(cluster);
const c = MAPS.choropleth;
const choropleth = L.map('choropleth').setView([c.center.lat, c.center.long], c.zoom);
L.tileLayer(tiles).addTo(choropleth);
L.geoJSON(c.geojson, {
  style: f => ({fillColor: f.properties.fill, fillOpacity: c.fill_opacity, opacity: c.line_opacity, color: '#000', weight: 1}),
  onEachFeature: (f, layer) => layer.bindTooltip(f.properties.ZIP + ': ' + Math.round(f.properties.PRICE))
}).addTo(choropleth);
if (c.price_range) {
  const legend = L.control({position: 'topright'});
  legend.onAdd = () => {
    const div = L.DomUtil.create('div');
    div.style.background = 'white';
    div.style.padding = '4px 8px';
    div.textContent = c.legend + ': ' + Math.round(c.price_range[0]) + ' - ' + Math.round(c.price_range[1]);
    return div;
  };
  legend.addTo(choropleth);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use homeview_io::DataColumn;

    #[test]
    fn test_render_table_escapes_cells() {
        let table = DataTable::new()
            .with_column("zipcode", DataColumn::Int64(vec![Some(98001), None]))
            .with_column(
                "note",
                DataColumn::String(vec![Some("<b>cheap</b>".to_string()), None]),
            );
        let mut html = String::new();
        render_table(&mut html, &table);

        assert!(html.contains("<th>zipcode</th><th>note</th>"));
        assert!(html.contains("<td>98001</td><td>&lt;b&gt;cheap&lt;/b&gt;</td>"));
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn test_escape_script() {
        assert_eq!(escape_script(r#"{"a":"</script>"}"#), r#"{"a":"<\/script>"}"#);
    }
}
