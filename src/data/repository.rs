//! One-shot dataset fetch.
//!
//! The dataset is a JSON array of products, each carrying its weekly `sales`.
//! The dashboard shows the first product. Sources:
//!
//! - the sample compiled into the binary (`assets/data.json`)
//! - a local JSON file
//! - an HTTP(S) URL, fetched with a blocking reqwest client
//!
//! There is no retry: a failed fetch is reported once and the store records it.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{DataSource, Product, SaleRecord};
use crate::error::AppError;

const BUNDLED_DATASET: &str = include_str!("../../assets/data.json");
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The decoded top-level JSON document.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RawDataset {
    pub products: Vec<Product>,
}

impl RawDataset {
    pub fn parse(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json)
            .map_err(|e| AppError::decode(format!("Failed to parse sales dataset: {e}")))
    }

    /// Split out the first product and its sales rows.
    pub fn into_parts(self) -> Result<(Product, Vec<SaleRecord>), AppError> {
        let product = self
            .products
            .into_iter()
            .next()
            .ok_or_else(|| AppError::fetch("Sales dataset contains no products."))?;
        let sales = product.sales.clone();
        Ok((product, sales))
    }
}

pub struct SalesRepository {
    source: DataSource,
}

impl SalesRepository {
    pub fn new(source: DataSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn fetch(&self) -> Result<RawDataset, AppError> {
        tracing::info!(source = %self.source.describe(), "fetching sales dataset");
        let dataset = match &self.source {
            DataSource::Bundled => RawDataset::parse(BUNDLED_DATASET)?,
            DataSource::File(path) => {
                let body = std::fs::read_to_string(path).map_err(|e| {
                    AppError::fetch(format!("Failed to read dataset '{}': {e}", path.display()))
                })?;
                RawDataset::parse(&body)?
            }
            DataSource::Url(url) => self.fetch_url(url)?,
        };
        tracing::info!(products = dataset.products.len(), "sales dataset loaded");
        Ok(dataset)
    }

    fn fetch_url(&self, url: &str) -> Result<RawDataset, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::fetch(format!("Failed to build HTTP client: {e}")))?;

        let resp = client
            .get(url)
            .send()
            .map_err(|e| AppError::fetch(format!("Dataset request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(format!(
                "Dataset request failed with status {}.",
                resp.status()
            )));
        }

        resp.json()
            .map_err(|e| AppError::decode(format!("Failed to parse dataset response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn bundled_dataset_decodes() {
        let repo = SalesRepository::new(DataSource::Bundled);
        let (product, sales) = repo.fetch().unwrap().into_parts().unwrap();
        assert!(!product.title.is_empty());
        assert!(!product.tags.is_empty());
        assert_eq!(sales.len(), 52);
        assert!(sales.windows(2).all(|w| w[0].week_ending < w[1].week_ending));
    }

    #[test]
    fn file_source_reads_first_product() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[{"title":"A","tags":["x"],"sales":[{"weekEnding":"2018-02-04","retailSales":1.5,"wholesaleSales":1,"unitsSold":3,"retailerMargin":-2}]},{"title":"B"}]"#,
        )
        .unwrap();

        let repo = SalesRepository::new(DataSource::File(path));
        let (product, sales) = repo.fetch().unwrap().into_parts().unwrap();
        assert_eq!(product.title, "A");
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].retailer_margin, -2.0);
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SalesRepository::new(DataSource::File(dir.path().join("nope.json")));
        assert_eq!(repo.fetch().unwrap_err().kind(), ErrorKind::Fetch);
    }

    #[test]
    fn empty_array_has_no_product() {
        let err = RawDataset::parse("[]").unwrap().into_parts().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn unreachable_url_is_a_fetch_error() {
        // Port 9 (discard) is closed on loopback; the connect fails fast.
        let repo = SalesRepository::new(DataSource::Url("http://127.0.0.1:9/data.json".to_string()));
        let err = repo.fetch().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert!(err.message().contains("request failed"), "{}", err.message());
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert_eq!(RawDataset::parse("{").unwrap_err().kind(), ErrorKind::Decode);
    }
}
