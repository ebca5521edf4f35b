/// Renderer and export properties, checked against the standard page.
use indexmap::IndexMap;

use sentimen::dom::Document;
use sentimen::export::{self, CSV_HEADER};
use sentimen::models::{
    BatchResponse, BatchRow, ClassifyResponse, HistoryEntry, ProductStats, Sentiment,
    SentimentCounts,
};
use sentimen::render;
use sentimen::style;
use sentimen::view::View;

fn page() -> (Document, View) {
    let doc = Document::skeleton();
    let view = View::bind(&doc);
    (doc, view)
}

fn entry(sentiment: Sentiment) -> HistoryEntry {
    HistoryEntry {
        id: None,
        text: "ulasan".to_string(),
        sentiment,
        confidence: Some(0.8),
        created_at: None,
        timestamp: Some("2026-03-01T10:15:00Z".to_string()),
    }
}

fn history(pos: usize, neg: usize, neu: usize) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();
    entries.extend((0..pos).map(|_| entry(Sentiment::Positif)));
    entries.extend((0..neg).map(|_| entry(Sentiment::Negatif)));
    entries.extend((0..neu).map(|_| entry(Sentiment::Netral)));
    entries
}

// ---------------------------------------------------------------------------
// Stats percentages
// ---------------------------------------------------------------------------

#[test]
fn percentages_sum_to_about_100() {
    for pos in 0..7 {
        for neg in 0..7 {
            for neu in 0..7 {
                let entries = history(pos, neg, neu);
                let sum: i64 = render::history_percentages(&entries).iter().sum();
                if entries.is_empty() {
                    assert_eq!(sum, 0);
                } else {
                    assert!((98..=102).contains(&sum), "{pos}/{neg}/{neu} sums to {sum}");
                }
            }
        }
    }
}

#[test]
fn empty_history_renders_zero_everywhere() {
    let (mut doc, view) = page();
    render::render_stats(&mut doc, &view, &[]);

    assert_eq!(doc.text("totalCount"), "0");
    for id in ["countPos", "countNeg", "countNeu"] {
        assert_eq!(doc.text(id), "0%");
    }
    for id in ["barPos", "barNeg", "barNeu"] {
        assert_eq!(doc.style(id, "width"), Some("0%"));
    }
}

#[test]
fn stats_widths_follow_counts() {
    let (mut doc, view) = page();
    render::render_stats(&mut doc, &view, &history(2, 1, 1));

    assert_eq!(doc.text("totalCount"), "4");
    assert_eq!(doc.text("countPos"), "50%");
    assert_eq!(doc.style("barNeg", "width"), Some("25%"));
}

// ---------------------------------------------------------------------------
// Unknown labels
// ---------------------------------------------------------------------------

#[test]
fn unknown_label_uses_netral_style_and_keeps_text() {
    let (mut doc, view) = page();
    let result = ClassifyResponse {
        sentiment: Sentiment::parse("Campuran"),
        confidence: 0.5,
        aspects: Vec::new(),
        timestamp: None,
    };

    render::render_result(&mut doc, &view, &result);

    assert_eq!(doc.text("sentimentLabel"), "Campuran");
    assert_eq!(doc.style("sentimentLabel", "color"), Some(style::NETRAL.color));
    assert_eq!(doc.text("sentimentIcon"), style::NETRAL.icon);
    assert_eq!(doc.text("sentimentDesc"), style::NETRAL.description);
}

#[test]
fn unknown_label_in_history_badge_keeps_text() {
    let (mut doc, view) = page();
    render::render_history(&mut doc, &view, &[entry(Sentiment::parse("Sarkas"))], false);

    let html = doc.html("historyList");
    assert!(html.contains("Sarkas"));
    assert!(html.contains(style::NETRAL.color));
}

// ---------------------------------------------------------------------------
// Batch products
// ---------------------------------------------------------------------------

fn batch_row(text: &str, product: Option<&str>) -> BatchRow {
    BatchRow {
        text: text.to_string(),
        sentiment: Sentiment::Positif,
        confidence: 0.9,
        product: product.map(str::to_string),
    }
}

fn product(positive_pct: f64) -> ProductStats {
    ProductStats {
        counts: SentimentCounts::default(),
        total: 10,
        positive_pct,
        negative_pct: 100.0 - positive_pct,
    }
}

#[test]
fn batch_without_products_has_no_ranking_or_column() {
    let (mut doc, view) = page();
    let batch = BatchResponse {
        stats: SentimentCounts {
            positif: 1,
            ..SentimentCounts::default()
        },
        results: vec![batch_row("enak", Some("Kopi"))],
        has_products: false,
        product_stats: None,
        insights: None,
        filename: None,
    };

    render::render_batch(&mut doc, &view, &batch, 10);

    assert!(!doc.is_visible("batchProducts"));
    assert!(!doc.html("batchProducts").contains("Performa"));
    assert!(!doc.html("batchTableHead").contains("Produk"));
    assert!(!doc.html("batchTableBody").contains("product-tag"));
    assert!(doc.is_visible("batchResult"));
}

#[test]
fn product_ranking_is_sorted_descending() {
    let (mut doc, view) = page();
    let stats = IndexMap::from([
        ("Alpha".to_string(), product(80.0)),
        ("Beta".to_string(), product(40.0)),
        ("Gamma".to_string(), product(60.0)),
    ]);
    let batch = BatchResponse {
        stats: SentimentCounts::default(),
        results: vec![batch_row("enak", Some("Alpha"))],
        has_products: true,
        product_stats: Some(stats),
        insights: None,
        filename: None,
    };

    render::render_batch(&mut doc, &view, &batch, 10);

    let html = doc.html("batchProducts");
    let at = |needle: &str| html.find(needle).unwrap();
    assert!(at("80%") < at("60%"));
    assert!(at("60%") < at("40%"));
    assert!(at("Alpha") < at("Gamma") && at("Gamma") < at("Beta"));
}

#[test]
fn product_ranking_ties_keep_server_order() {
    let (mut doc, view) = page();
    let batch: BatchResponse = serde_json::from_str(
        r#"{
            "has_products": true,
            "results": [{"text": "enak", "sentiment": "Positif", "confidence": 0.9, "product": "Zaitun"}],
            "product_stats": {
                "Zaitun": {"total": 4, "positive_pct": 50, "negative_pct": 50},
                "Mentega": {"total": 2, "positive_pct": 90, "negative_pct": 10},
                "Apel": {"total": 4, "positive_pct": 50, "negative_pct": 50}
            }
        }"#,
    )
    .unwrap();

    render::render_batch(&mut doc, &view, &batch, 10);

    let html = doc.html("batchProducts");
    let at = |needle: &str| html.find(needle).unwrap();
    assert!(at("Mentega") < at("Zaitun"));
    assert!(at("Zaitun") < at("Apel"));
}

#[test]
fn product_header_appears_once_across_runs() {
    let (mut doc, view) = page();
    let batch = BatchResponse {
        stats: SentimentCounts::default(),
        results: vec![batch_row("enak", Some("Kopi"))],
        has_products: true,
        product_stats: Some(IndexMap::from([("Kopi".to_string(), product(100.0))])),
        insights: None,
        filename: None,
    };

    render::render_batch(&mut doc, &view, &batch, 10);
    render::render_batch(&mut doc, &view, &batch, 10);

    assert_eq!(doc.html("batchTableHead").matches("Produk").count(), 1);
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

#[test]
fn csv_escapes_quotes_under_fixed_header() {
    let rows = vec![BatchRow {
        text: "a\"b".to_string(),
        sentiment: Sentiment::Positif,
        confidence: 0.9,
        product: None,
    }];

    let csv = export::batch_csv(&rows).unwrap();
    let mut lines = csv.split('\n');
    assert_eq!(lines.next(), Some(CSV_HEADER));
    assert_eq!(lines.next(), Some("\"a\"\"b\",\"Positif\",\"0.9\""));
    assert_eq!(lines.next(), None);
}

#[test]
fn csv_of_empty_batch_is_none() {
    assert!(export::batch_csv(&[]).is_none());
}
