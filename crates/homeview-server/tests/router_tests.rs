//! Router tests, driven through `tower::ServiceExt::oneshot`

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rstest::{fixture, rstest};
use tower::ServiceExt;

use homeview_core::{DashboardConfig, DashboardData, RecommendationReports};
use homeview_io::{CsvReader, DataReader, DataTable, FeatureCollection};
use homeview_server::{create_router, AppState};

fn table(text: &str) -> DataTable {
    CsvReader::from_text(text).unwrap().read_table().unwrap()
}

#[fixture]
fn app() -> Router {
    let houses = table(
        "id,date,price,bathrooms,floors,waterfront,sqft_lot,sqft_basement,yr_built,yr_renovated,zipcode,condition,lat,long\n\
         1,20140615T000000,100000,1,1,0,5000,0,1950,0,98001,3,47.32,-122.22\n\
         2,20150115T000000,100000,2.5,2,0,6000,500,1990,2005,98002,4,47.62,-122.42\n\
         3,20140915T000000,140000,3,2,1,8000,0,2000,0,98001,3,47.33,-122.23\n",
    );
    let buy = table(
        "id,zipcode,condition,price,lat,long\n\
         1,98001,3,100000,47.32,-122.22\n\
         2,98002,4,300000,47.62,-122.42\n\
         3,98001,4,200000,47.33,-122.23\n",
    );
    let sell = table(
        "id,zipcode,condition,price,sell_price\n\
         1,98001,3,100000,130000\n\
         2,98002,4,300000,330000\n",
    );
    let geojson = FeatureCollection::from_json(
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"ZIP": 98001}, "geometry": null},
            {"type": "Feature", "properties": {"ZIP": 98002}, "geometry": null}
        ]}"#,
    )
    .unwrap();

    let reports = RecommendationReports::new(buy, sell).unwrap();
    let data = DashboardData::from_parts(DashboardConfig::default(), &houses, reports, geojson).unwrap();
    create_router(Arc::new(AppState::new(data)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_json(app: Router, uri: &str) -> serde_json::Value {
    let (status, _, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    serde_json::from_str(&body).unwrap()
}

#[rstest]
#[tokio::test]
async fn test_index_page(app: Router) {
    let (status, content_type, body) = get(app, "/?zipcode=98001").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(body.contains("House Rocket Company"));
    assert!(body.contains(r#"name="zipcode" value="98001""#));
}

#[rstest]
#[tokio::test]
async fn test_hypotheses(app: Router) {
    let json = get_json(app, "/api/hypotheses").await;
    let hypotheses = json.as_array().unwrap();
    assert_eq!(hypotheses.len(), 10);
    assert_eq!(hypotheses[0]["id"], "h1");
    assert_eq!(hypotheses[0]["verdict"], "holds");
    let observed = hypotheses[0]["observed_percent"].as_f64().unwrap();
    assert!((observed - 40.0).abs() < 1e-9);
}

#[rstest]
#[tokio::test]
async fn test_single_hypothesis(app: Router) {
    let json = get_json(app, "/api/hypotheses/6").await;
    assert_eq!(json["id"], "h6");
}

#[rstest]
#[tokio::test]
async fn test_chart_svg(app: Router) {
    let (status, content_type, body) = get(app, "/api/charts/h2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/svg+xml"));
    assert!(body.starts_with("<svg"));
}

#[rstest]
#[case("/api/charts/h11")]
#[case("/api/hypotheses/0")]
#[case("/api/reports/rent/csv")]
#[tokio::test]
async fn test_not_found(app: Router, #[case] uri: &str) {
    let (status, _, _) = get(app, uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/api/reports?filter=price%20%3E%3E")]
#[case("/api/reports?filter=bedrooms%20%3E%203")]
#[case("/api/maps/density?zipcode=abc")]
#[tokio::test]
async fn test_bad_filters(app: Router, #[case] uri: &str) {
    let (status, _, _) = get(app, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn test_filters(app: Router) {
    let json = get_json(app, "/api/filters").await;
    assert_eq!(json["zipcodes"], serde_json::json!([98001, 98002]));
    assert_eq!(json["conditions"], serde_json::json!([3, 4]));
}

#[rstest]
#[tokio::test]
async fn test_reports_filtered_by_zip(app: Router) {
    let json = get_json(app, "/api/reports?zipcode=98001").await;
    assert_eq!(json["filter"], "zipcode in [98001]");
    assert_eq!(json["buy"]["rows"].as_array().unwrap().len(), 2);
    assert_eq!(json["sell"]["rows"].as_array().unwrap().len(), 1);
    assert_eq!(
        json["buy"]["columns"],
        serde_json::json!(["id", "zipcode", "condition", "price"])
    );
}

#[rstest]
#[tokio::test]
async fn test_report_csv(app: Router) {
    let (status, content_type, body) = get(app, "/api/reports/sell/csv?condition=4").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/csv"));
    assert_eq!(body, "id,zipcode,condition,price,sell_price\n2,98002,4,300000,330000\n");
}

#[rstest]
#[tokio::test]
async fn test_maps(app: Router) {
    let density = get_json(app.clone(), "/api/maps/density?filter=price%20%3E%3D%20200000").await;
    assert_eq!(density["markers"].as_array().unwrap().len(), 2);

    let choropleth = get_json(app, "/api/maps/choropleth").await;
    assert_eq!(choropleth["legend"], "AVG PRICE");
    assert_eq!(choropleth["regions"].as_array().unwrap().len(), 2);
    assert_eq!(choropleth["geojson"]["features"].as_array().unwrap().len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_status(app: Router) {
    let json = get_json(app, "/status").await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["houses"], 3);
    assert_eq!(json["reports"]["buy"], 3);
    assert_eq!(json["boundaries"], 2);
}
