//! Input files for dashboard tests, written to a temporary directory

use homeview_core::DashboardConfig;
use std::path::Path;
use tempfile::TempDir;

pub const HOUSES_HEADER: &str =
    "id,date,price,bathrooms,floors,waterfront,sqft_lot,sqft_basement,yr_built,yr_renovated,zipcode,condition,lat,long";

/// Three listings; the third is the only waterfront house
pub fn houses_csv(waterfront_price: f64) -> String {
    format!(
        "{HOUSES_HEADER}\n\
         1,20140615T000000,100000,1,1,0,5000,0,1950,0,98001,3,47.32,-122.22\n\
         2,20150115T000000,100000,2.5,2,0,6000,500,1990,2005,98002,4,47.62,-122.42\n\
         3,20140915T000000,{waterfront_price},3,2,1,8000,0,2000,0,98001,3,47.33,-122.23\n"
    )
}

pub const BUY_REPORT: &str = "id,zipcode,condition,price,lat,long,status\n\
    1,98001,3,100000,47.32,-122.22,buy\n\
    2,98002,4,300000,47.62,-122.42,buy\n\
    3,98001,4,200000,47.33,-122.23,buy\n";

pub const SELL_REPORT: &str = "id,zipcode,condition,price,season,sell_price\n\
    1,98001,3,100000,summer,130000\n\
    2,98002,4,300000,spring,330000\n";

pub const BOUNDARIES: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "properties": {"ZIP": 98001},
     "geometry": {"type": "Polygon", "coordinates": [[[-122.3, 47.3], [-122.2, 47.3], [-122.2, 47.4], [-122.3, 47.3]]]}},
    {"type": "Feature", "properties": {"ZIP": 98002},
     "geometry": {"type": "Polygon", "coordinates": [[[-122.5, 47.6], [-122.4, 47.6], [-122.4, 47.7], [-122.5, 47.6]]]}},
    {"type": "Feature", "properties": {"ZIP": 98199}, "geometry": null}
]}"#;

/// A directory holding every dashboard input, plus a config pointing at it
pub struct Inputs {
    pub dir: TempDir,
    pub config: DashboardConfig,
}

impl Inputs {
    pub fn new(houses: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let write = |name: &str, content: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            path
        };

        let mut config = DashboardConfig::default();
        config.data.houses = write("kc_house_data.csv", houses);
        config.data.buy_report = write("kc_house_buy_report_geo.csv", BUY_REPORT);
        config.data.sell_report = write("kc_house_sell_report.csv", SELL_REPORT);
        config.data.geojson = write("zips.geojson", BOUNDARIES).display().to_string();

        Self { dir, config }
    }

    pub fn with_waterfront_price(price: f64) -> Self {
        Self::new(&houses_csv(price))
    }

    #[allow(dead_code)]
    pub fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    #[allow(dead_code)]
    pub fn remove(&self, path: &Path) {
        std::fs::remove_file(path).unwrap();
    }
}
