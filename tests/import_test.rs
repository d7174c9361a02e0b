mod common;

use axum::http::{Method, StatusCode};
use common::{read_json, TestApp};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CSV_HEADER: &str =
    "index,product,category,sub_category,brand,sale_price,market_price,type,rating,description";

fn write_csv(dir: &TempDir, name: &str, rows: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut contents = String::from(CSV_HEADER);
    for row in rows {
        contents.push('\n');
        contents.push_str(row);
    }
    contents.push('\n');
    std::fs::write(&path, contents).expect("failed to write test CSV");
    path
}

#[tokio::test]
async fn import_loads_every_well_formed_row() {
    let app = TestApp::new().await;
    let dir = TempDir::new().expect("temp dir for csv");

    let csv = write_csv(
        &dir,
        "catalog.csv",
        &[
            "1,Garlic Oil Capsule,Beauty,Hair Care,HealthVit,220.0,250.0,Hair Oil,4.1,Capsule with pure garlic oil",
            "2,Water Bottle Orange,Kitchen,Storage,Mastercook,180.0,200.0,Bottle,3.8,Leak proof water bottle",
            "3,Multani Mati,Beauty,Face Care,Satinance,58.0,64.0,Face Pack,4.0,Natural face pack clay",
        ],
    );

    let summary = app
        .state
        .catalog
        .import_from_csv(&csv)
        .await
        .expect("import should succeed");

    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.skipped, 0);

    let response = app.request(Method::GET, "/products", None).await;
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);

    let items = body.as_array().expect("list body should be an array");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["product"], json!("Garlic Oil Capsule"));
    assert_eq!(items[2]["product"], json!("Multani Mati"));
    assert_eq!(items[1]["type"], json!("Bottle"));
}

#[tokio::test]
async fn malformed_rows_are_skipped_not_fatal() {
    let app = TestApp::new().await;
    let dir = TempDir::new().expect("temp dir for csv");

    let csv = write_csv(
        &dir,
        "catalog.csv",
        &[
            "1,Garlic Oil Capsule,Beauty,Hair Care,HealthVit,220.0,250.0,Hair Oil,4.1,Capsule with pure garlic oil",
            "2,Broken Row,Cleaning,Laundry,Acme,not-a-price,210.0,Detergent,4.0,Sale price does not parse",
            "3,Too Short",
            "4,Water Bottle Orange,Kitchen,Storage,Mastercook,180.0,200.0,Bottle,3.8,Leak proof water bottle",
        ],
    );

    let summary = app
        .state
        .catalog
        .import_from_csv(&csv)
        .await
        .expect("import should succeed despite bad rows");

    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.skipped, 2);

    let products = app
        .state
        .catalog
        .list_products()
        .await
        .expect("list after import");
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].product, "Garlic Oil Capsule");
    assert_eq!(products[1].product, "Water Bottle Orange");
}

#[tokio::test]
async fn import_of_header_only_file_is_empty() {
    let app = TestApp::new().await;
    let dir = TempDir::new().expect("temp dir for csv");

    let csv = write_csv(&dir, "empty.csv", &[]);

    let summary = app
        .state
        .catalog
        .import_from_csv(&csv)
        .await
        .expect("import of empty file should succeed");

    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.skipped, 0);
}

#[tokio::test]
async fn import_of_missing_file_fails() {
    let app = TestApp::new().await;
    let dir = TempDir::new().expect("temp dir for csv");

    let missing = dir.path().join("nope.csv");
    let result = app.state.catalog.import_from_csv(&missing).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn conversion_fills_euro_columns_for_every_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blue": {"value_avg": 2.0, "value_sell": 2.0, "value_buy": 2.0},
            "last_update": "2024-03-01T14:02:10.000000-03:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = TestApp::with_exchange_rate_url(&format!("{}/v2/latest", server.uri())).await;
    let dir = TempDir::new().expect("temp dir for csv");

    let csv = write_csv(
        &dir,
        "catalog.csv",
        &[
            "1,Garlic Oil Capsule,Beauty,Hair Care,HealthVit,220.0,250.0,Hair Oil,4.1,Capsule with pure garlic oil",
            "2,Water Bottle Orange,Kitchen,Storage,Mastercook,180.0,200.0,Bottle,3.8,Leak proof water bottle",
        ],
    );

    let summary = app
        .state
        .catalog
        .import_from_csv(&csv)
        .await
        .expect("import should succeed");
    assert_eq!(summary.inserted, 2);

    let conversion = app
        .state
        .catalog
        .convert_catalog_prices()
        .await
        .expect("conversion should succeed");

    assert!((conversion.rate - 2.0).abs() < f64::EPSILON);
    assert_eq!(conversion.rows, 2);

    let products = app
        .state
        .catalog
        .list_products()
        .await
        .expect("list after conversion");
    for product in products {
        let sale_euro = product.sale_price_euro.expect("sale euro column filled");
        let market_euro = product.market_price_euro.expect("market euro column filled");
        assert!((sale_euro - product.sale_price * 2.0).abs() < 1e-6);
        assert!((market_euro - product.market_price * 2.0).abs() < 1e-6);
    }
}

#[tokio::test]
async fn conversion_with_unreachable_source_changes_nothing() {
    let app = TestApp::new().await;
    let dir = TempDir::new().expect("temp dir for csv");

    let csv = write_csv(
        &dir,
        "catalog.csv",
        &["1,Garlic Oil Capsule,Beauty,Hair Care,HealthVit,220.0,250.0,Hair Oil,4.1,Capsule with pure garlic oil"],
    );

    app.state
        .catalog
        .import_from_csv(&csv)
        .await
        .expect("import should succeed");

    let result = app.state.catalog.convert_catalog_prices().await;
    assert!(result.is_err());

    let products = app
        .state
        .catalog
        .list_products()
        .await
        .expect("list after failed conversion");
    assert_eq!(products[0].sale_price_euro, None);
    assert_eq!(products[0].market_price_euro, None);
}
