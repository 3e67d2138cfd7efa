use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::layout::Rect;
use serde::Serialize;
use tracing::{debug, info};

use crate::api::TrendsGateway;
use crate::app::{handle_input, handle_mouse, App};
use crate::cache::CacheStats;
use crate::cli::CliArgs;
use crate::domain::{ComparisonResult, HealthStatus, TrendingSnapshot, TrendsResult};
use crate::format::format_date;
use crate::terminal::Tui;
use crate::ui;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);
const HEADLESS_LIST_LIMIT: usize = 10;

/// Run the dashboard until the user quits.
pub async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.update();
        let applied = app.drain_events();
        if applied > 0 {
            debug!(applied, "applied background results");
        }

        let frame = terminal
            .draw(|f| ui::ui(app, f))
            .map_err(|e| color_eyre::eyre::eyre!("Terminal draw error: {e}"))?;
        if frame.area != app.frame_area {
            app.frame_area = frame.area;
            app.chart.resize(ui::dashboard_layout(frame.area).chart);
        }

        if !matches!(event::poll(EVENT_POLL_TIMEOUT), Ok(true)) {
            tokio::task::yield_now().await;
            continue;
        }

        match event::read() {
            Ok(Event::Key(key)) => handle_input(app, key),
            Ok(Event::Mouse(mouse)) => handle_mouse(app, mouse),
            Ok(Event::Resize(width, height)) => {
                let area = Rect::new(0, 0, width, height);
                app.frame_area = area;
                app.chart.resize(ui::dashboard_layout(area).chart);
            }
            Ok(Event::FocusGained | Event::FocusLost | Event::Paste(_)) => {}
            Err(e) => debug!(error = %e, "failed to read terminal event"),
        }
    }

    info!("dashboard closed");
    Ok(())
}

/// Run one query against the backend and print it instead of drawing.
pub async fn run_headless(gateway: &TrendsGateway, args: &CliArgs) -> Result<()> {
    let report = build_report(gateway, args).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)?;
        println!("{json}");
    } else {
        print_report(&report);
    }

    Ok(())
}

async fn build_report(gateway: &TrendsGateway, args: &CliArgs) -> Result<HeadlessReport> {
    if let Some(keyword) = &args.keyword {
        let result = gateway.search(keyword, &args.geo, &args.timeframe).await?;
        return Ok(HeadlessReport::Search(SearchSummary::from_result(&result)));
    }

    if !args.compare.is_empty() {
        let result = gateway
            .compare(&args.compare, &args.geo, &args.timeframe)
            .await?;
        return Ok(HeadlessReport::Compare(CompareSummary::from_result(&result)));
    }

    if let Some(geo) = &args.trending {
        let snapshot = gateway.trending_searches(geo).await?;
        return Ok(HeadlessReport::Trending(TrendingSummary::from_snapshot(
            &snapshot,
        )));
    }

    let health = gateway.health().await;
    let countries = gateway.countries().await;
    Ok(HeadlessReport::Status(StatusSummary {
        backend_reachable: health.is_some(),
        health,
        available_countries: countries.countries.len(),
        cache: gateway.cache_stats(),
    }))
}

fn print_report(report: &HeadlessReport) {
    match report {
        HeadlessReport::Search(summary) => {
            println!("\nSearch interest for \"{}\"", summary.keyword);
            println!("=================");
            println!(
                "Region: {}",
                if summary.geo.is_empty() { "Worldwide" } else { &summary.geo }
            );
            println!("Data points: {}", summary.points);
            if let Some((date, value)) = &summary.peak {
                println!("Peak: {value} on {date}");
            }
            if let Some(latest) = summary.latest {
                println!("Latest: {latest}");
            }

            println!("\nTop Regions:");
            for (name, value) in &summary.top_regions {
                println!("- {name}: {value}");
            }

            println!("\nRelated Queries:");
            for query in &summary.related {
                println!("- {query}");
            }
        }
        HeadlessReport::Compare(summary) => {
            println!("\nComparison: {}", summary.keywords.join(" vs "));
            println!("=================");
            for (keyword, average) in summary.keywords.iter().zip(&summary.averages) {
                println!("- {keyword}: average {average:.1}");
            }

            println!("\nRecent Points:");
            for row in &summary.recent {
                let values = row
                    .values
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(" | ");
                println!("- {} | {values}", row.date);
            }
        }
        HeadlessReport::Trending(summary) => {
            println!("\nTrending in {} ({})", summary.country, summary.geo);
            println!("=================");
            for (rank, query) in &summary.searches {
                println!("{rank:>2}. {query}");
            }
        }
        HeadlessReport::Status(status) => {
            println!("\nWorld Trends Explorer");
            println!("=================");
            match &status.health {
                Some(health) => println!("Backend: {} ({})", health.status, health.service),
                None => println!("Backend: unreachable"),
            }
            println!("Available countries: {}", status.available_countries);
            println!("Cached responses: {}", status.cache.size);
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum HeadlessReport {
    Search(SearchSummary),
    Compare(CompareSummary),
    Trending(TrendingSummary),
    Status(StatusSummary),
}

#[derive(Debug, Serialize)]
struct SearchSummary {
    keyword: String,
    geo: String,
    points: usize,
    peak: Option<(String, u32)>,
    latest: Option<u32>,
    top_regions: Vec<(String, u32)>,
    related: Vec<String>,
}

impl SearchSummary {
    fn from_result(result: &TrendsResult) -> Self {
        let peak = result
            .interest_over_time
            .iter()
            .max_by_key(|point| point.value)
            .map(|point| {
                (
                    point.date.as_deref().map(format_date).unwrap_or_default(),
                    point.value,
                )
            });

        Self {
            keyword: result.keyword.clone(),
            geo: result.geo.clone(),
            points: result.interest_over_time.len(),
            peak,
            latest: result.interest_over_time.last().map(|point| point.value),
            top_regions: result
                .top_regions(HEADLESS_LIST_LIMIT)
                .into_iter()
                .map(|region| (region.geo_name.clone(), region.value))
                .collect(),
            related: result
                .related_queries
                .top
                .iter()
                .take(HEADLESS_LIST_LIMIT)
                .map(|query| query.query.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompareRow {
    date: String,
    values: Vec<u32>,
}

#[derive(Debug, Serialize)]
struct CompareSummary {
    keywords: Vec<String>,
    averages: Vec<f64>,
    recent: Vec<CompareRow>,
}

impl CompareSummary {
    fn from_result(result: &ComparisonResult) -> Self {
        let points = &result.comparison_data;

        #[allow(clippy::cast_precision_loss)]
        let averages = result
            .keywords
            .iter()
            .map(|keyword| {
                if points.is_empty() {
                    return 0.0;
                }
                let total: u64 = points
                    .iter()
                    .map(|point| u64::from(point.value_for(keyword)))
                    .sum();
                total as f64 / points.len() as f64
            })
            .collect();

        let recent = points
            .iter()
            .skip(points.len().saturating_sub(HEADLESS_LIST_LIMIT))
            .map(|point| CompareRow {
                date: point.date.as_deref().map(format_date).unwrap_or_default(),
                values: result
                    .keywords
                    .iter()
                    .map(|keyword| point.value_for(keyword))
                    .collect(),
            })
            .collect();

        Self {
            keywords: result.keywords.clone(),
            averages,
            recent,
        }
    }
}

#[derive(Debug, Serialize)]
struct TrendingSummary {
    geo: String,
    country: String,
    searches: Vec<(u32, String)>,
}

impl TrendingSummary {
    fn from_snapshot(snapshot: &TrendingSnapshot) -> Self {
        Self {
            geo: snapshot.geo.clone(),
            country: snapshot.country.clone(),
            searches: snapshot
                .trending_searches
                .iter()
                .map(|search| (search.rank, search.query.clone()))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusSummary {
    backend_reachable: bool,
    health: Option<HealthStatus>,
    available_countries: usize,
    cache: CacheStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComparisonPoint, RegionInterest, RelatedQueries, TimePoint};
    use std::collections::BTreeMap;

    #[test]
    fn search_summary_picks_peak_and_latest() {
        let result = TrendsResult {
            keyword: "ai".to_string(),
            geo: "US".to_string(),
            timeframe: None,
            timestamp: String::new(),
            interest_over_time: vec![
                TimePoint {
                    date: Some("2025-01-01".to_string()),
                    value: 10,
                },
                TimePoint {
                    date: Some("2025-02-01".to_string()),
                    value: 90,
                },
                TimePoint {
                    date: Some("2025-03-01".to_string()),
                    value: 40,
                },
            ],
            interest_by_region: vec![RegionInterest {
                geo_code: "US-CA".to_string(),
                geo_name: "California".to_string(),
                value: 100,
            }],
            related_queries: RelatedQueries::default(),
        };

        let summary = SearchSummary::from_result(&result);
        assert_eq!(summary.points, 3);
        assert_eq!(summary.peak, Some(("Feb 1, 2025".to_string(), 90)));
        assert_eq!(summary.latest, Some(40));
        assert_eq!(summary.top_regions, vec![("California".to_string(), 100)]);
    }

    #[test]
    fn compare_summary_averages_each_keyword() {
        let point = |a: u32, b: u32| ComparisonPoint {
            date: Some("2025-01-01".to_string()),
            values: BTreeMap::from([("rust".to_string(), a), ("go".to_string(), b)]),
        };
        let result = ComparisonResult {
            keywords: vec!["rust".to_string(), "go".to_string()],
            geo: String::new(),
            timeframe: None,
            timestamp: String::new(),
            comparison_data: vec![point(10, 50), point(30, 70)],
        };

        let summary = CompareSummary::from_result(&result);
        assert_eq!(summary.averages, vec![20.0, 60.0]);
        assert_eq!(summary.recent.len(), 2);
        assert_eq!(summary.recent[1].values, vec![30, 70]);
    }
}
