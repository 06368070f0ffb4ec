use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use vnquotes_lib::{
    compare, Client, CompareError, CompareOptions, Exchange, ExchangeFetcher, HnxColumnLayout,
    HnxFetcher, QuoteSource, RecordOrder, SortDirection, SortKey,
};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOSE_PATH: &str = "/mk/api/v1/market/quote-report";
const HNX_PATH: &str = "/ModuleReportStockETFs/Report_MD_PriceVolatilyti/ListData_Listed";

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("../vnquotes_api/tests/fixtures/{}", name)).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
}

fn fetcher(server: &MockServer, exchange: Exchange) -> ExchangeFetcher {
    let client = Client::with_base_url(&server.uri()).unwrap();
    ExchangeFetcher::new(Arc::new(client), exchange)
}

#[tokio::test]
async fn hose_comparison_against_mock_exchange() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(HOSE_PATH))
        .and(query_param("date", "2025-07-24"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("hose_quote_report.json")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(HOSE_PATH))
        .and(query_param("date", "2025-07-25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"securitySymbol": "BBB", "closePrice": "19,475"},
                {"securitySymbol": "AAA", "closePrice": 11000},
                {"securitySymbol": "CCC", "closePrice": 5},
                {"securitySymbol": "ZZZ", "closePrice": 5}
            ]
        })))
        .mount(&server)
        .await;

    let source = fetcher(&server, Exchange::Hose);
    assert_eq!(source.exchange(), Exchange::Hose);

    let result = compare(&source, day(24), day(25), &CompareOptions::default())
        .await
        .unwrap();

    assert_eq!(result.exchange, Exchange::Hose);
    let symbols: Vec<&str> = result.records.iter().map(|r| r.symbol.as_str()).collect();
    // ZZZ is missing from the start date.
    assert_eq!(symbols, vec!["AAA", "BBB", "CCC"]);

    assert_eq!(result.records[0].start_price, 10000.0);
    assert_eq!(result.records[0].end_price, 11000.0);
    assert_eq!(result.records[0].change_percent, 10.0);
    assert!(result.records[0].is_positive);

    assert_eq!(result.records[1].start_price, 20500.0);
    assert_eq!(result.records[1].end_price, 19475.0);
    assert_eq!(result.records[1].change_percent, -5.0);
    assert!(!result.records[1].is_positive);

    // No start close: zero baseline, no meaningful change.
    assert_eq!(result.records[2].start_price, 0.0);
    assert_eq!(result.records[2].end_price, 5.0);
    assert_eq!(result.records[2].change_percent, 0.0);
}

#[tokio::test]
async fn hnx_comparison_against_mock_exchange() {
    let server = MockServer::start().await;
    let start_html = load_fixture("hnx_listed.html");
    let end_html = r#"<table><tbody>
        <tr><td>1</td><td>DXG</td><td>x</td><td>5,500</td></tr>
        <tr><td>2</td><td>AAA</td><td>x</td><td>9,000</td></tr>
    </tbody></table>"#;

    Mock::given(method("POST"))
        .and(path(HNX_PATH))
        .and(body_string_contains("24%2F07%2F2025"))
        .respond_with(ResponseTemplate::new(200).set_body_string(start_html))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(HNX_PATH))
        .and(body_string_contains("25%2F07%2F2025"))
        .respond_with(ResponseTemplate::new(200).set_body_string(end_html))
        .mount(&server)
        .await;

    let source = fetcher(&server, Exchange::Hnx);
    let options = CompareOptions {
        order: RecordOrder::By(SortKey::ChangePercent, SortDirection::Desc),
        deadline: None,
    };
    let result = compare(&source, day(24), day(25), &options).await.unwrap();

    assert_eq!(result.exchange, Exchange::Hnx);
    assert_eq!(result.records.len(), 2);
    assert_eq!(result.records[0].symbol, "DXG");
    assert_eq!(result.records[0].change_percent, 10.0);
    assert_eq!(result.records[1].symbol, "AAA");
    assert_eq!(result.records[1].change_percent, -10.0);
}

#[tokio::test]
async fn upstream_failure_on_one_date_fails_the_comparison() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(HOSE_PATH))
        .and(query_param("date", "2025-07-24"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("hose_quote_report.json")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(HOSE_PATH))
        .and(query_param("date", "2025-07-25"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let source = fetcher(&server, Exchange::Hose);
    let err = compare(&source, day(24), day(25), &CompareOptions::default())
        .await
        .unwrap_err();
    match err {
        CompareError::Api(inner) => assert_eq!(inner.status(), Some(500)),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn unrecognized_hose_envelope_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(HOSE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "no data"})))
        .mount(&server)
        .await;

    let source = fetcher(&server, Exchange::Hose);
    let err = compare(&source, day(24), day(25), &CompareOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CompareError::MalformedResponse(_)));
}

#[tokio::test]
async fn empty_hnx_reports_give_empty_comparison() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(HNX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let source = fetcher(&server, Exchange::Hnx);
    let result = compare(&source, day(24), day(25), &CompareOptions::default())
        .await
        .unwrap();
    assert!(result.records.is_empty());
}

#[tokio::test]
async fn hnx_fetcher_honours_custom_layout() {
    let server = MockServer::start().await;
    let html = r#"<table>
        <tr><td>AAA</td><td>12,000</td></tr>
        <tr><td>BBB</td><td>-</td></tr>
    </table>"#;

    Mock::given(method("POST"))
        .and(path(HNX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;

    let client = Arc::new(Client::with_base_url(&server.uri()).unwrap());
    let layout = HnxColumnLayout {
        version: 2,
        symbol: 0,
        first_price: 1,
        min_cells: 2,
    };
    let fetcher = HnxFetcher::new(client).with_layout(layout);

    let snapshot = fetcher.fetch(day(24)).await.unwrap();
    assert_eq!(snapshot.exchange, Exchange::Hnx);
    assert_eq!(snapshot.quotes.len(), 1);
    assert_eq!(snapshot.quotes[0].symbol, "AAA");
    assert_eq!(snapshot.quotes[0].close_value(), Some(12000.0));
    assert_eq!(snapshot.skipped_rows, 1);
}
