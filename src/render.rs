//! Renderers: typed payload in, document mutations out.
//!
//! Repeated fragments (history rows, chips, tables, comment cards) come from
//! `minijinja` templates whose names end in `.html`, so every interpolated
//! value is HTML-escaped unless the template marks it `|safe`. Only fixed
//! server vocabulary (sentiment labels, icons, insight and verdict copy) is
//! marked safe; user text and product names never are.

use std::sync::OnceLock;

use chrono::{DateTime, Local, NaiveDateTime};
use minijinja::{Environment, Value, context};
use serde::Serialize;

use crate::dom::Document;
use crate::models::{
    BattleResponse, BatchResponse, ClassifyResponse, HistoryEntry, InsightKind, ScrapeResponse,
    Sentiment, SentimentCounts, SummaryStats, UserInfo, confidence_pct,
};
use crate::style::style_for;
use crate::view::View;

/// Text of the history empty state.
pub const EMPTY_HISTORY: &str = "Belum ada riwayat";

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

const TEMPLATE_SOURCES: &[(&str, &str)] = &[
    (
        "aspects.html",
        r#"{% for a in aspects %}<div class="aspect-chip" style="background-color: {{ a.color }}"><span class="aspect-name">{{ a.aspect }}:</span> <span>{{ a.sentiment|safe }}</span></div>{% endfor %}"#,
    ),
    (
        "history.html",
        r#"{% if not rows %}<tr><td colspan="2" class="history-empty">Belum ada riwayat</td></tr>{% endif %}{% for row in rows %}<tr class="history-row"><td><p class="history-text" title="{{ row.text }}">{{ row.text }}</p><p class="history-time">{{ row.time }}</p></td><td class="history-meta"><span class="badge" style="background-color: {{ row.color }}">{{ row.sentiment|safe }}</span>{% if row.feedback_id is not none %}<button class="feedback-btn" title="Koreksi Sentimen" data-event="open_feedback" data-args='{"id": {{ row.feedback_id }} }'>✎</button>{% endif %}</td></tr>{% endfor %}"#,
    ),
    (
        "products.html",
        r#"<h4 class="block-title">🏆 Performa per Produk</h4><div class="product-list">{% for p in products %}<div class="product-row"><div class="product-info"><span class="product-name">{{ p.name }}</span><div class="product-counts"><span class="text-green">{{ p.positif }} positif</span> <span class="text-red">{{ p.negatif }} negatif</span> <span class="text-gray">{{ p.netral }} netral</span></div></div><div class="product-score {{ p.tone }}">{{ p.pct }}%</div></div>{% endfor %}</div>"#,
    ),
    (
        "insights.html",
        r#"<h4 class="block-title">💡 Smart Insights</h4><div class="insight-list">{% for i in insights %}<div class="insight insight-{{ i.kind }}"><span class="insight-icon">{{ i.icon|safe }}</span><div><h5 class="insight-title">{{ i.title|safe }}</h5><p class="insight-message">{{ i.message|safe }}</p></div></div>{% endfor %}</div>"#,
    ),
    (
        "batch_head.html",
        r#"<tr>{% if has_products %}<th class="product-header">Produk</th>{% endif %}<th>Teks</th><th>Sentimen</th><th>Confidence</th></tr>"#,
    ),
    (
        "batch_rows.html",
        r#"{% for row in rows %}<tr class="batch-row">{% if has_products %}<td>{% if row.product %}<span class="product-tag">{{ row.product }}</span>{% endif %}</td>{% endif %}<td class="batch-text" title="{{ row.text }}">{{ row.text }}</td><td><span class="badge" style="background-color: {{ row.color }}">{{ row.sentiment|safe }}</span></td><td class="batch-confidence">{{ row.confidence }}%</td></tr>{% endfor %}"#,
    ),
    (
        "comments.html",
        r#"{% for c in comments %}<div class="comment"><div class="comment-meta"><span class="badge" style="background-color: {{ c.color }}">{{ c.sentiment|safe }}</span><span class="comment-confidence">{{ c.confidence }}%</span></div><p class="comment-text">{{ c.text }}</p></div>{% endfor %}"#,
    ),
    (
        "verdict.html",
        r#"<div><h4 class="verdict-title">{{ title|safe }}</h4><p class="verdict-message">{{ message|safe }}</p></div><div class="verdict-icon">{{ icon }}</div>"#,
    ),
    (
        "auth_nav.html",
        r#"{% if username is not none %}<span class="nav-greeting">Hi, {{ username }}</span><button class="nav-link" data-event="logout">Keluar</button>{% else %}<a class="nav-link" href="/register">Daftar</a><button class="nav-button" data-event="open_login">Masuk</button>{% endif %}"#,
    ),
];

static TEMPLATES: OnceLock<Environment<'static>> = OnceLock::new();

fn templates() -> &'static Environment<'static> {
    TEMPLATES.get_or_init(|| {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATE_SOURCES {
            if let Err(e) = env.add_template(name, source) {
                log::error!("invalid template {name}: {e}");
            }
        }
        env
    })
}

fn render(name: &str, ctx: Value) -> String {
    match templates()
        .get_template(name)
        .and_then(|template| template.render(ctx))
    {
        Ok(html) => html,
        Err(e) => {
            log::error!("failed to render {name}: {e}");
            String::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Whole percentage of `count` in `total`; zero when `total` is zero.
pub fn percentage(count: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as i64
}

/// A backend number as a person would write it (`67`, not `67.0`).
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

/// `HH.MM` of a recorded timestamp, or `-` when it can't be read.
///
/// Zoned timestamps are shown in local time; naive ones as written.
pub fn format_time(raw: &str) -> String {
    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return zoned.with_timezone(&Local).format("%H.%M").to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.format("%H.%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn set_counts(
    doc: &mut Document,
    ids: [Option<&'static str>; 3],
    counts: &SentimentCounts,
) {
    let [pos, neg, neu] = ids;
    doc.set_text(pos, counts.positif.to_string());
    doc.set_text(neg, counts.negatif.to_string());
    doc.set_text(neu, counts.netral.to_string());
}

// ---------------------------------------------------------------------------
// Single result
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct AspectChip<'a> {
    aspect: &'a str,
    sentiment: &'a str,
    color: &'static str,
}

pub fn render_result(doc: &mut Document, view: &View, result: &ClassifyResponse) {
    let style = style_for(&result.sentiment);

    doc.set_text(view.sentiment_label, result.sentiment.as_str());
    doc.set_style(view.sentiment_label, "color", style.color);
    doc.set_text(view.sentiment_icon, style.icon);
    doc.set_text(view.sentiment_desc, style.description);
    doc.set_text(
        view.confidence_score,
        format!("{}% Confidence", confidence_pct(result.confidence)),
    );

    if result.aspects.is_empty() {
        doc.hide(view.aspect_section);
    } else {
        let chips: Vec<_> = result
            .aspects
            .iter()
            .map(|a| AspectChip {
                aspect: &a.aspect,
                sentiment: a.sentiment.as_str(),
                color: style_for(&a.sentiment).color,
            })
            .collect();
        doc.set_html(view.aspect_list, render("aspects.html", context! { aspects => chips }));
        doc.show(view.aspect_section);
    }

    doc.show(view.result_card);
}

// ---------------------------------------------------------------------------
// History + stats
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HistoryRow<'a> {
    text: &'a str,
    time: String,
    sentiment: &'a str,
    color: &'static str,
    feedback_id: Option<i64>,
}

/// Render the history list.
///
/// The clear button is only offered for the anonymous session list; the
/// correction button only for logged-in rows that carry a server id.
pub fn render_history(doc: &mut Document, view: &View, entries: &[HistoryEntry], logged_in: bool) {
    let rows: Vec<_> = entries
        .iter()
        .map(|entry| HistoryRow {
            text: &entry.text,
            time: entry.recorded_at().map(format_time).unwrap_or_default(),
            sentiment: entry.sentiment.as_str(),
            color: style_for(&entry.sentiment).color,
            feedback_id: if logged_in { entry.id } else { None },
        })
        .collect();

    doc.set_html(view.history_list, render("history.html", context! { rows => rows }));
    doc.set_visible(view.clear_history_btn, !entries.is_empty() && !logged_in);
}

/// Label shares over the whole list, each rounded on its own.
pub fn history_percentages(entries: &[HistoryEntry]) -> [i64; 3] {
    let total = entries.len();
    let count = |label: Sentiment| entries.iter().filter(|e| e.sentiment == label).count();
    [
        percentage(count(Sentiment::Positif), total),
        percentage(count(Sentiment::Negatif), total),
        percentage(count(Sentiment::Netral), total),
    ]
}

pub fn render_stats(doc: &mut Document, view: &View, entries: &[HistoryEntry]) {
    doc.set_text(view.total_count, entries.len().to_string());

    let [pos, neg, neu] = history_percentages(entries);
    for (bar, label, pct) in [
        (view.bar_pos, view.count_pos, pos),
        (view.bar_neg, view.count_neg, neg),
        (view.bar_neu, view.count_neu, neu),
    ] {
        doc.set_style(bar, "width", format!("{pct}%"));
        doc.set_text(label, format!("{pct}%"));
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ProductCard {
    name: String,
    positif: u64,
    negatif: u64,
    netral: u64,
    pct: String,
    tone: &'static str,
}

#[derive(Serialize)]
struct InsightCard<'a> {
    kind: &'static str,
    icon: &'a str,
    title: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct BatchPreviewRow<'a> {
    product: Option<&'a str>,
    text: &'a str,
    sentiment: &'a str,
    color: &'static str,
    confidence: i64,
}

/// Color class of a product's positive share.
pub fn product_tone(positive_pct: f64) -> &'static str {
    if positive_pct >= 70.0 {
        "text-green"
    } else if positive_pct >= 50.0 {
        "text-yellow"
    } else {
        "text-red"
    }
}

fn insight_kind(kind: InsightKind) -> &'static str {
    match kind {
        InsightKind::Success => "success",
        InsightKind::Warning => "warning",
        InsightKind::Info => "info",
    }
}

/// Render a batch run. Every block is rebuilt, so repeated runs never stack
/// duplicate rankings or headers.
pub fn render_batch(doc: &mut Document, view: &View, batch: &BatchResponse, preview_rows: usize) {
    set_counts(
        doc,
        [view.batch_pos, view.batch_neg, view.batch_neu],
        &batch.stats,
    );

    match batch.product_stats.as_ref().filter(|_| batch.has_products) {
        Some(stats) => {
            let mut products: Vec<_> = stats.iter().collect();
            products.sort_by(|a, b| b.1.positive_pct.total_cmp(&a.1.positive_pct));
            let cards: Vec<_> = products
                .into_iter()
                .map(|(name, s)| ProductCard {
                    name: name.clone(),
                    positif: s.counts.positif,
                    negatif: s.counts.negatif,
                    netral: s.counts.netral,
                    pct: format_number(s.positive_pct),
                    tone: product_tone(s.positive_pct),
                })
                .collect();
            doc.set_html(view.batch_products, render("products.html", context! { products => cards }));
            doc.show(view.batch_products);
        }
        None => doc.hide(view.batch_products),
    }

    match batch.insights.as_deref().filter(|list| !list.is_empty()) {
        Some(insights) => {
            let cards: Vec<_> = insights
                .iter()
                .map(|i| InsightCard {
                    kind: insight_kind(i.kind),
                    icon: &i.icon,
                    title: &i.title,
                    message: &i.message,
                })
                .collect();
            doc.set_html(view.batch_insights, render("insights.html", context! { insights => cards }));
            doc.show(view.batch_insights);
        }
        None => doc.hide(view.batch_insights),
    }

    let rows: Vec<_> = batch
        .results
        .iter()
        .take(preview_rows)
        .map(|row| BatchPreviewRow {
            product: row.product.as_deref().filter(|p| !p.is_empty()),
            text: &row.text,
            sentiment: row.sentiment.as_str(),
            color: style_for(&row.sentiment).color,
            confidence: confidence_pct(row.confidence),
        })
        .collect();

    doc.set_html(
        view.batch_table_head,
        render("batch_head.html", context! { has_products => batch.has_products }),
    );
    doc.set_html(
        view.batch_table_body,
        render(
            "batch_rows.html",
            context! { rows => rows, has_products => batch.has_products },
        ),
    );
    doc.show(view.batch_result);
}

// ---------------------------------------------------------------------------
// Social
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CommentCard<'a> {
    text: &'a str,
    sentiment: &'a str,
    color: &'static str,
    confidence: i64,
}

pub fn render_social(doc: &mut Document, view: &View, scrape: &ScrapeResponse) {
    set_counts(
        doc,
        [view.social_pos, view.social_neg, view.social_neu],
        &scrape.stats,
    );

    let comments: Vec<_> = scrape
        .results
        .iter()
        .map(|c| CommentCard {
            text: &c.text,
            sentiment: c.sentiment.as_str(),
            color: style_for(&c.sentiment).color,
            confidence: confidence_pct(c.confidence),
        })
        .collect();
    doc.set_html(
        view.social_comments_list,
        render("comments.html", context! { comments => comments }),
    );
    doc.show(view.social_result);
}

// ---------------------------------------------------------------------------
// Battle
// ---------------------------------------------------------------------------

pub fn render_battle(doc: &mut Document, view: &View, battle: &BattleResponse) {
    doc.show(view.battle_result);

    for (score, pos, neg, brand) in [
        (view.score_a, view.pos_a, view.neg_a, &battle.brand_a),
        (view.score_b, view.pos_b, view.neg_b, &battle.brand_b),
    ] {
        doc.set_text(score, format!("{}%", format_number(brand.positive_pct)));
        doc.set_text(pos, brand.stats.positif.to_string());
        doc.set_text(neg, brand.stats.negatif.to_string());
    }

    let verdict = &battle.verdict;
    let (tone, icon) = if verdict.gap > 0.0 {
        ("verdict-win", "🏆")
    } else {
        ("verdict-lose", "⚠️")
    };
    doc.set_classes(view.battle_verdict, &["verdict", tone]);
    doc.set_html(
        view.battle_verdict,
        render(
            "verdict.html",
            context! { title => &verdict.title, message => &verdict.message, icon => icon },
        ),
    );
}

// ---------------------------------------------------------------------------
// Dashboard + nav
// ---------------------------------------------------------------------------

pub fn render_summary(doc: &mut Document, view: &View, summary: &SummaryStats) {
    doc.set_text(view.total_analyses, summary.total.to_string());
    doc.set_text(view.positive_count, summary.positive.to_string());
    doc.set_text(view.negative_count, summary.negative.to_string());
}

/// Greeting + logout when a session exists, register/login otherwise.
///
/// A session without a readable user record still greets, as "User".
pub fn render_auth_nav(doc: &mut Document, view: &View, session: Option<Option<&UserInfo>>) {
    let username = session.map(|user| user.map_or("User", |u| u.username.as_str()));
    doc.set_html(view.auth_buttons, render("auth_nav.html", context! { username => username }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::models::{
        Aspect, BatchRow, BrandScore, Insight, ProductStats, ScoredComment, Verdict,
    };

    fn setup() -> (Document, View) {
        let doc = Document::skeleton();
        let view = View::bind(&doc);
        (doc, view)
    }

    fn entry(text: &str, label: Sentiment, id: Option<i64>) -> HistoryEntry {
        HistoryEntry {
            id,
            text: text.to_string(),
            sentiment: label,
            confidence: Some(0.9),
            created_at: None,
            timestamp: Some("2026-03-04T09:05:00".to_string()),
        }
    }

    fn batch(has_products: bool) -> BatchResponse {
        let mut product_stats = IndexMap::new();
        for (name, pct) in [("Kopi", 40.0), ("Teh", 90.0), ("Roti", 55.0)] {
            product_stats.insert(
                name.to_string(),
                ProductStats {
                    positive_pct: pct,
                    ..ProductStats::default()
                },
            );
        }
        BatchResponse {
            stats: SentimentCounts {
                positif: 2,
                negatif: 1,
                netral: 0,
            },
            results: (0..12)
                .map(|i| BatchRow {
                    text: format!("ulasan {i}"),
                    sentiment: Sentiment::Positif,
                    confidence: 0.5,
                    product: has_products.then(|| "Kopi".to_string()),
                })
                .collect(),
            has_products,
            product_stats: has_products.then_some(product_stats),
            insights: None,
            filename: None,
        }
    }

    #[test]
    fn percentage_rounds_and_handles_zero_total() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn format_time_reads_naive_and_space_separated() {
        assert_eq!(format_time("2026-03-04T09:05:00"), "09.05");
        assert_eq!(format_time("2026-03-04 21:40:12.123"), "21.40");
        assert_eq!(format_time("kemarin"), "-");
    }

    #[test]
    fn result_renderer_styles_unknown_label_as_netral() {
        let (mut doc, view) = setup();
        let result = ClassifyResponse {
            sentiment: Sentiment::parse("Sarkas"),
            confidence: 0.876,
            aspects: Vec::new(),
            timestamp: None,
        };

        render_result(&mut doc, &view, &result);

        assert_eq!(doc.text("sentimentLabel"), "Sarkas");
        assert_eq!(doc.style("sentimentLabel", "color"), Some("#BFD7EE"));
        assert_eq!(doc.text("sentimentIcon"), "😐");
        assert_eq!(doc.text("confidenceScore"), "88% Confidence");
        assert!(!doc.is_visible("aspectSection"));
        assert!(doc.is_visible("resultCard"));
    }

    #[test]
    fn result_renderer_escapes_aspect_names() {
        let (mut doc, view) = setup();
        let result = ClassifyResponse {
            sentiment: Sentiment::Positif,
            confidence: 0.9,
            aspects: vec![Aspect {
                aspect: "<b>rasa</b>".to_string(),
                sentiment: Sentiment::Negatif,
            }],
            timestamp: None,
        };

        render_result(&mut doc, &view, &result);

        let html = doc.html("aspectList");
        assert!(html.contains("&lt;b&gt;rasa"));
        assert!(!html.contains("<b>rasa"));
        assert!(html.contains("#F5B8C2"));
        assert!(doc.is_visible("aspectSection"));
    }

    #[test]
    fn history_escapes_user_text() {
        let (mut doc, view) = setup();
        let entries = [entry("<script>alert(1)<script>", Sentiment::Negatif, None)];

        render_history(&mut doc, &view, &entries, false);

        let html = doc.html("historyList");
        assert!(html.contains("&lt;script&gt;alert(1)&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(">Negatif<"));
        assert!(html.contains("09.05"));
    }

    #[test]
    fn empty_history_shows_placeholder_and_hides_clear() {
        let (mut doc, view) = setup();
        doc.show(view.clear_history_btn);

        render_history(&mut doc, &view, &[], false);

        assert!(doc.html("historyList").contains(EMPTY_HISTORY));
        assert!(!doc.is_visible("clearHistoryBtn"));
    }

    #[test]
    fn feedback_control_only_for_logged_in_rows_with_id() {
        let (mut doc, view) = setup();
        let entries = [
            entry("punya id", Sentiment::Positif, Some(11)),
            entry("tanpa id", Sentiment::Positif, None),
        ];

        render_history(&mut doc, &view, &entries, true);
        let html = doc.html("historyList").to_string();
        assert_eq!(html.matches("open_feedback").count(), 1);
        assert!(html.contains(r#""id": 11"#));
        assert!(!doc.is_visible("clearHistoryBtn"));

        render_history(&mut doc, &view, &entries, false);
        assert!(!doc.html("historyList").contains("open_feedback"));
        assert!(doc.is_visible("clearHistoryBtn"));
    }

    #[test]
    fn stats_are_zero_when_empty() {
        let (mut doc, view) = setup();
        render_stats(&mut doc, &view, &[]);
        assert_eq!(doc.text("totalCount"), "0");
        assert_eq!(doc.text("countPos"), "0%");
        assert_eq!(doc.style("barNeu", "width"), Some("0%"));
    }

    #[test]
    fn stats_round_each_label_independently() {
        let (mut doc, view) = setup();
        let entries = [
            entry("a", Sentiment::Positif, None),
            entry("b", Sentiment::Negatif, None),
            entry("c", Sentiment::Netral, None),
        ];
        render_stats(&mut doc, &view, &entries);
        assert_eq!(doc.text("totalCount"), "3");
        assert_eq!(doc.text("countPos"), "33%");
        assert_eq!(doc.style("barNeg", "width"), Some("33%"));
    }

    #[test]
    fn product_ranking_sorted_by_positive_share() {
        let (mut doc, view) = setup();
        render_batch(&mut doc, &view, &batch(true), 10);

        let html = doc.html("batchProducts");
        let teh = html.find("Teh").unwrap();
        let roti = html.find("Roti").unwrap();
        let kopi = html.find("Kopi").unwrap();
        assert!(teh < roti && roti < kopi);
        assert!(html.contains("text-green"));
        assert!(html.contains("text-yellow"));
        assert!(html.contains("text-red"));
        assert!(doc.is_visible("batchProducts"));
    }

    #[test]
    fn product_header_is_not_duplicated_across_runs() {
        let (mut doc, view) = setup();
        render_batch(&mut doc, &view, &batch(true), 10);
        render_batch(&mut doc, &view, &batch(true), 10);
        assert_eq!(doc.html("batchTableHead").matches("product-header").count(), 1);

        render_batch(&mut doc, &view, &batch(false), 10);
        assert!(!doc.html("batchTableHead").contains("product-header"));
        assert!(!doc.is_visible("batchProducts"));
    }

    #[test]
    fn batch_preview_is_truncated() {
        let (mut doc, view) = setup();
        render_batch(&mut doc, &view, &batch(false), 10);
        let body = doc.html("batchTableBody");
        assert_eq!(body.matches("batch-row").count(), 10);
        assert!(body.contains("50%"));
        assert_eq!(doc.text("batchPos"), "2");
        assert!(doc.is_visible("batchResult"));
    }

    #[test]
    fn insight_kinds_map_to_classes() {
        let (mut doc, view) = setup();
        let mut response = batch(false);
        response.insights = Some(vec![
            Insight {
                kind: InsightKind::Success,
                icon: "✅".to_string(),
                title: "Bagus".to_string(),
                message: "<em>naik</em>".to_string(),
            },
            Insight {
                kind: InsightKind::Info,
                icon: "ℹ️".to_string(),
                title: "Info".to_string(),
                message: "stabil".to_string(),
            },
        ]);

        render_batch(&mut doc, &view, &response, 10);

        let html = doc.html("batchInsights");
        assert!(html.contains("insight-success"));
        assert!(html.contains("insight-info"));
        assert!(html.contains("<em>naik</em>"));
    }

    #[test]
    fn social_renderer_escapes_comments() {
        let (mut doc, view) = setup();
        let scrape = ScrapeResponse {
            stats: SentimentCounts {
                positif: 1,
                negatif: 0,
                netral: 0,
            },
            results: vec![ScoredComment {
                text: "<img src=x>".to_string(),
                sentiment: Sentiment::Positif,
                confidence: 0.8,
            }],
        };

        render_social(&mut doc, &view, &scrape);

        let html = doc.html("socialCommentsList");
        assert!(html.contains("&lt;img src=x&gt;"));
        assert!(html.contains("80%"));
        assert_eq!(doc.text("socialPos"), "1");
        assert!(doc.is_visible("socialResult"));
    }

    fn battle(gap: f64) -> BattleResponse {
        let score = |pct: f64| BrandScore {
            positive_pct: pct,
            stats: SentimentCounts {
                positif: 8,
                negatif: 2,
                netral: 0,
            },
            total: 10,
        };
        BattleResponse {
            brand_a: score(80.0),
            brand_b: score(80.0 - gap),
            verdict: Verdict {
                gap,
                title: "Hasil".to_string(),
                message: "Pesan".to_string(),
            },
        }
    }

    #[test]
    fn battle_verdict_tone_follows_gap_sign() {
        let (mut doc, view) = setup();

        render_battle(&mut doc, &view, &battle(12.5));
        assert_eq!(doc.text("scoreA"), "80%");
        assert_eq!(doc.text("scoreB"), "67.5%");
        assert_eq!(doc.text("posA"), "8");
        assert!(doc.has_class("battleVerdict", "verdict-win"));
        assert!(doc.html("battleVerdict").contains("🏆"));

        render_battle(&mut doc, &view, &battle(0.0));
        assert!(doc.has_class("battleVerdict", "verdict-lose"));
        assert!(!doc.has_class("battleVerdict", "verdict-win"));
        assert!(doc.is_visible("battleResult"));
    }

    #[test]
    fn auth_nav_variants() {
        let (mut doc, view) = setup();
        let user = UserInfo {
            username: "sari".to_string(),
            id: None,
        };

        render_auth_nav(&mut doc, &view, Some(Some(&user)));
        assert!(doc.html("auth_buttons").contains("Hi, sari"));

        render_auth_nav(&mut doc, &view, Some(None));
        assert!(doc.html("auth_buttons").contains("Hi, User"));

        render_auth_nav(&mut doc, &view, None);
        let html = doc.html("auth_buttons");
        assert!(html.contains("open_login"));
        assert!(!html.contains("Hi,"));
    }
}
