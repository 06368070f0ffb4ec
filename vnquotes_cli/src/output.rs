use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use vnquotes_lib::{
    round2, CompanyDirectory, Comparison, ComparisonRecord, Exchange, QuoteSnapshot,
    SecurityQuote,
};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct CompareRow {
    #[tabled(rename = "Symbol")]
    #[serde(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Company")]
    #[serde(rename = "Company")]
    company: String,
    #[tabled(rename = "Start Price")]
    #[serde(rename = "Start Price")]
    start_price: String,
    #[tabled(rename = "End Price")]
    #[serde(rename = "End Price")]
    end_price: String,
    #[tabled(rename = "Change")]
    #[serde(rename = "Change")]
    price_change: String,
    #[tabled(rename = "Change (%)")]
    #[serde(rename = "Change (%)")]
    change_percent: String,
}

#[derive(Tabled, Serialize)]
struct QuoteRow {
    #[tabled(rename = "Symbol")]
    #[serde(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Close")]
    #[serde(rename = "Close")]
    close: String,
    #[tabled(rename = "Open")]
    #[serde(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    #[serde(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    #[serde(rename = "Low")]
    low: String,
}

#[derive(Tabled, Serialize)]
struct RawQuoteRow {
    #[tabled(rename = "Symbol")]
    #[serde(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Close")]
    #[serde(rename = "Close")]
    close: String,
    #[tabled(rename = "Cells")]
    #[serde(rename = "Cells")]
    cell_count: usize,
    #[tabled(rename = "Raw")]
    #[serde(rename = "Raw")]
    raw: String,
}

/// JSON view of a comparison with company names merged in.
#[derive(Serialize)]
struct ComparisonJson<'a> {
    exchange: Exchange,
    start: NaiveDate,
    end: NaiveDate,
    records: Vec<RecordJson<'a>>,
}

#[derive(Serialize)]
struct RecordJson<'a> {
    #[serde(flatten)]
    record: &'a ComparisonRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    company: Option<&'a str>,
}

// -- Row builders --

fn build_compare_rows(
    records: &[ComparisonRecord],
    directory: Option<&CompanyDirectory>,
) -> Vec<CompareRow> {
    records
        .iter()
        .map(|r| CompareRow {
            symbol: r.symbol.clone(),
            company: company_name(directory, &r.symbol).unwrap_or_default().to_string(),
            start_price: format_price(r.start_price),
            end_price: format_price(r.end_price),
            price_change: format_signed(r.price_change, ""),
            change_percent: format_signed(r.change_percent, "%"),
        })
        .collect()
}

fn build_quote_rows(quotes: &[SecurityQuote]) -> Vec<QuoteRow> {
    quotes
        .iter()
        .map(|q| {
            let prices = q.resolved();
            QuoteRow {
                symbol: q.symbol.clone(),
                close: prices.close.text().to_string(),
                open: prices.open.text().to_string(),
                high: prices.high.text().to_string(),
                low: prices.low.text().to_string(),
            }
        })
        .collect()
}

fn build_raw_quote_rows(quotes: &[SecurityQuote]) -> Vec<RawQuoteRow> {
    quotes
        .iter()
        .map(|q| {
            let (cell_count, raw) = match &q.diagnostics {
                Some(d) => (d.cell_count, d.raw_cells.join(" | ")),
                None => (0, String::new()),
            };
            RawQuoteRow {
                symbol: q.symbol.clone(),
                close: q.resolved().close.text().to_string(),
                cell_count,
                raw,
            }
        })
        .collect()
}

fn build_comparison_json<'a>(
    comparison: &'a Comparison,
    directory: Option<&'a CompanyDirectory>,
) -> ComparisonJson<'a> {
    ComparisonJson {
        exchange: comparison.exchange,
        start: comparison.start,
        end: comparison.end,
        records: comparison
            .records
            .iter()
            .map(|r| RecordJson {
                record: r,
                company: company_name(directory, &r.symbol),
            })
            .collect(),
    }
}

fn company_name<'a>(directory: Option<&'a CompanyDirectory>, symbol: &str) -> Option<&'a str> {
    directory.and_then(|d| d.name(symbol))
}

// -- Printers --

pub fn print_comparison(
    comparison: &Comparison,
    directory: Option<&CompanyDirectory>,
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&build_comparison_json(comparison, directory)),
        _ => print_rows(build_compare_rows(&comparison.records, directory), format)?,
    }
    Ok(())
}

pub fn print_snapshot(snapshot: &QuoteSnapshot, raw: bool, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(snapshot),
        _ if raw => print_rows(build_raw_quote_rows(&snapshot.quotes), format)?,
        _ => print_rows(build_quote_rows(&snapshot.quotes), format)?,
    }
    Ok(())
}

fn print_rows<T: Tabled + Serialize>(rows: Vec<T>, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        _ => println!("{}", Table::new(rows)),
    }
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Groups thousands with commas, the way both exchanges print prices.
fn format_price(value: f64) -> String {
    let rounded = round2(value);
    let negative = rounded < 0.0;
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if negative { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

fn format_signed(value: f64, suffix: &str) -> String {
    // Normalizes -0.0 so it prints without a sign.
    let rounded = round2(value) + 0.0;
    let sign = if rounded > 0.0 { "+" } else { "" };
    match suffix {
        "%" => format!("{}{:.2}%", sign, rounded),
        _ => format!("{}{}{}", sign, format_price(value), suffix),
    }
}
