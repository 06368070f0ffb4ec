//! Decoding of the HOSE quote report into [`SecurityQuote`] records.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CompareError;
use crate::quote::{Price, SecurityQuote};

/// One entry of the quote report. Prices arrive as numbers or numeric strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HoseQuoteRecord {
    security_symbol: Option<String>,
    symbol: Option<String>,
    close_price: Option<Value>,
    open_price: Option<Value>,
    high_price: Option<Value>,
    low_price: Option<Value>,
}

/// Records decoded from a report and how many entries were unusable.
#[derive(Debug, Default)]
pub struct DecodedReport {
    pub quotes: Vec<SecurityQuote>,
    pub skipped: usize,
}

/// Finds the record array inside one of the known envelopes:
/// a bare array, `{"data": [...]}`, `{"data": {"items"|"data": [...]}}` or
/// `{"items": [...]}`.
fn records(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => Some(items),
            Some(Value::Object(inner)) => ["items", "data"]
                .iter()
                .find_map(|key| inner.get(*key).and_then(Value::as_array)),
            _ => map.get("items").and_then(Value::as_array),
        },
        _ => None,
    }
}

fn price(value: Option<&Value>) -> Option<Price> {
    match value? {
        Value::Number(n) => n.as_f64().map(Price::from_value),
        Value::String(s) => Price::parse(s),
        _ => None,
    }
}

/// Decodes the report. An unrecognized envelope is an error; individual
/// entries without a symbol are skipped.
pub fn decode_quote_report(value: &Value) -> Result<DecodedReport, CompareError> {
    let items = records(value).ok_or_else(|| {
        let shape = match value {
            Value::Object(map) => format!(
                "object with keys [{}]",
                map.keys().cloned().collect::<Vec<_>>().join(", ")
            ),
            Value::Null => "null".to_string(),
            other => format!("scalar {}", other),
        };
        CompareError::MalformedResponse(format!("unrecognized quote report envelope: {}", shape))
    })?;

    let mut out = DecodedReport::default();
    for item in items {
        let record = match HoseQuoteRecord::deserialize(item) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("skipping quote entry: {}", e);
                out.skipped += 1;
                continue;
            }
        };
        let symbol = [&record.security_symbol, &record.symbol]
            .into_iter()
            .filter_map(|s| s.as_deref().map(str::trim))
            .find(|s| !s.is_empty())
            .unwrap_or_default();
        if symbol.is_empty() {
            out.skipped += 1;
            continue;
        }
        out.quotes.push(SecurityQuote {
            symbol: symbol.to_string(),
            close: price(record.close_price.as_ref()),
            open: price(record.open_price.as_ref()),
            high: price(record.high_price.as_ref()),
            low: price(record.low_price.as_ref()),
            diagnostics: None,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load_fixture() -> Value {
        let json_str = include_str!("../../vnquotes_api/tests/fixtures/hose_quote_report.json");
        serde_json::from_str(json_str).unwrap()
    }

    #[test]
    fn decodes_fixture() {
        let report = decode_quote_report(&load_fixture()).unwrap();
        assert_eq!(report.quotes.len(), 3);
        assert_eq!(report.skipped, 0);

        let aaa = &report.quotes[0];
        assert_eq!(aaa.symbol, "AAA");
        assert_eq!(aaa.close_value(), Some(10000.0));
        assert_eq!(aaa.low.as_ref().unwrap().value(), 9900.0);
        assert!(aaa.diagnostics.is_none());

        let bbb = &report.quotes[1];
        assert_eq!(bbb.close_value(), Some(20500.0));
        assert!(bbb.high.is_none());

        let ccc = &report.quotes[2];
        assert!(ccc.close.is_none());
    }

    #[test]
    fn accepts_known_envelopes() {
        let entry = json!({"securitySymbol": "AAA", "closePrice": 1});
        for doc in [
            json!([entry.clone()]),
            json!({"data": [entry.clone()]}),
            json!({"data": {"items": [entry.clone()]}}),
            json!({"data": {"data": [entry.clone()]}}),
            json!({"items": [entry.clone()]}),
        ] {
            let report = decode_quote_report(&doc).unwrap();
            assert_eq!(report.quotes.len(), 1, "envelope {}", doc);
        }
    }

    #[test]
    fn rejects_unknown_envelopes() {
        for doc in [
            json!({"message": "maintenance"}),
            json!({"data": "nope"}),
            json!(null),
            json!(42),
        ] {
            let err = decode_quote_report(&doc).unwrap_err();
            assert!(matches!(err, CompareError::MalformedResponse(_)));
        }
    }

    #[test]
    fn empty_report_is_not_an_error() {
        let report = decode_quote_report(&json!({"data": []})).unwrap();
        assert!(report.quotes.is_empty());
    }

    #[test]
    fn entries_without_symbol_are_skipped() {
        let doc = json!([
            {"securitySymbol": "", "closePrice": 1},
            {"closePrice": 2},
            "garbage",
            {"symbol": "BBB", "closePrice": "3"}
        ]);
        let report = decode_quote_report(&doc).unwrap();
        assert_eq!(report.skipped, 3);
        assert_eq!(report.quotes.len(), 1);
        assert_eq!(report.quotes[0].symbol, "BBB");
    }

    #[test]
    fn both_symbol_keys_present() {
        let doc = json!([
            {"securitySymbol": "AAA", "symbol": "AAA", "closePrice": 10},
            {"securitySymbol": " ", "symbol": "BBB", "closePrice": 20},
            {"securitySymbol": "CCC", "symbol": "ccc-old", "closePrice": 30}
        ]);
        let report = decode_quote_report(&doc).unwrap();
        assert_eq!(report.skipped, 0);
        let symbols: Vec<&str> = report.quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAA", "BBB", "CCC"]);
        assert_eq!(report.quotes[0].close_value(), Some(10.0));
    }

    #[test]
    fn non_numeric_prices_become_none() {
        let doc = json!([{"securitySymbol": "AAA", "closePrice": true, "openPrice": "n/a"}]);
        let report = decode_quote_report(&doc).unwrap();
        assert!(report.quotes[0].close.is_none());
        assert!(report.quotes[0].open.is_none());
    }
}
