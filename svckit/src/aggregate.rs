// svckit/src/aggregate.rs
//
// Chart summaries derived from a fetched collection. Each record kind picks
// its own grouping; the result is a renderer-independent `Chart`.

use chrono::{Datelike, NaiveDate};

use crate::display::format_month;
use crate::resource::Resource;
use crate::types::{Article, Club, Competition, CompetitionLevel, Match, MatchStatus};

pub const NO_DATA: &str = "Aucune donnée à afficher";
pub const MONTH_WINDOW: usize = 6;

const ARTICLE_COLOR: &str = "#1A78E2";
const CLUB_PALETTE: [&str; 5] = ["#1A78E2", "#E63946", "#4CAF50", "#FF9800", "#9C27B0"];
const LEVEL_PALETTE: [&str; 5] = ["#1A78E2", "#E63946", "#4CAF50", "#FF9800", "#673AB7"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    /// Vertical bars along a category axis.
    Bar,
    /// One horizontal bar per item.
    HorizontalBar,
    Pie,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: &'static str,
    pub caption: &'static str,
    pub series: &'static str,
    pub style: ChartStyle,
    pub points: Vec<ChartPoint>,
}

impl Chart {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Rounded percentage of the total, for pie labels.
    pub fn share(&self, point: &ChartPoint) -> u64 {
        let total = self.total();
        if total == 0 {
            0
        } else {
            ((point.value as f64 / total as f64) * 100.0).round() as u64
        }
    }
}

/// A record kind that knows how to summarize a collection of itself.
pub trait Aggregate: Resource {
    fn summarize(records: &[Self], today: NaiveDate) -> Chart;
}

// ---------------------------------------------------------------------------
// Articles: publications per month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub count: u64,
}

impl MonthBucket {
    pub fn label(&self) -> String {
        format_month(self.year, self.month)
    }

    fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Exactly `MONTH_WINDOW` buckets in chronological order, the last one being
/// `today`'s month. Empty months are kept with a zero count.
pub fn monthly_publications(articles: &[Article], today: NaiveDate) -> Vec<MonthBucket> {
    let current = today.year() * 12 + today.month0() as i32;
    let mut buckets: Vec<MonthBucket> = (0..MONTH_WINDOW as i32)
        .map(|i| {
            let index = current - (MONTH_WINDOW as i32 - 1) + i;
            MonthBucket {
                year: index.div_euclid(12),
                month: index.rem_euclid(12) as u32 + 1,
                count: 0,
            }
        })
        .collect();

    for published in articles.iter().filter_map(|a| a.published_at) {
        let date = published.date_naive();
        if let Some(bucket) = buckets.iter_mut().find(|b| b.contains(date)) {
            bucket.count += 1;
        }
    }
    buckets
}

impl Aggregate for Article {
    fn summarize(records: &[Self], today: NaiveDate) -> Chart {
        Chart {
            title: "Statistiques des Articles",
            caption: "Nombre d'articles publiés par mois",
            series: "Articles",
            style: ChartStyle::Bar,
            points: monthly_publications(records, today)
                .into_iter()
                .map(|bucket| ChartPoint {
                    label: bucket.label(),
                    value: bucket.count,
                    color: ARTICLE_COLOR,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Clubs: stadium capacity ranking
// ---------------------------------------------------------------------------

/// `(club name, capacity)` by descending capacity; ties keep fetch order.
pub fn capacity_ranking(clubs: &[Club]) -> Vec<(String, u32)> {
    let mut ranking: Vec<(String, u32)> = clubs.iter().map(|c| (c.name.clone(), c.capacity)).collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1));
    ranking
}

impl Aggregate for Club {
    fn summarize(records: &[Self], _today: NaiveDate) -> Chart {
        Chart {
            title: "Capacité des Stades",
            caption: "Comparaison des capacités des stades par club",
            series: "Capacité",
            style: ChartStyle::HorizontalBar,
            points: capacity_ranking(records)
                .into_iter()
                .enumerate()
                .map(|(i, (name, capacity))| ChartPoint {
                    label: name,
                    value: capacity as u64,
                    color: CLUB_PALETTE[i % CLUB_PALETTE.len()],
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Competitions: count per level
// ---------------------------------------------------------------------------

/// Distinct levels in first-appearance order with their counts.
pub fn level_breakdown(competitions: &[Competition]) -> Vec<(CompetitionLevel, u64)> {
    let mut counts: Vec<(CompetitionLevel, u64)> = Vec::new();
    for competition in competitions {
        match counts.iter_mut().find(|(level, _)| *level == competition.level) {
            Some((_, count)) => *count += 1,
            None => counts.push((competition.level.clone(), 1)),
        }
    }
    counts
}

impl Aggregate for Competition {
    fn summarize(records: &[Self], _today: NaiveDate) -> Chart {
        Chart {
            title: "Répartition des Compétitions",
            caption: "Par niveau de compétition",
            series: "Compétitions",
            style: ChartStyle::Pie,
            points: level_breakdown(records)
                .into_iter()
                .enumerate()
                .map(|(i, (level, count))| ChartPoint {
                    label: level.label(),
                    value: count,
                    color: LEVEL_PALETTE[i % LEVEL_PALETTE.len()],
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Matches: count per status
// ---------------------------------------------------------------------------

/// Known statuses in fixed order, then unknown values in first-appearance
/// order. Statuses without any match are left out.
pub fn status_breakdown(matches: &[Match]) -> Vec<(MatchStatus, u64)> {
    let mut counts: Vec<(MatchStatus, u64)> = MatchStatus::KNOWN.iter().map(|s| (s.clone(), 0)).collect();
    for m in matches {
        match counts.iter_mut().find(|(status, _)| *status == m.status) {
            Some((_, count)) => *count += 1,
            None => counts.push((m.status.clone(), 1)),
        }
    }
    counts.retain(|(_, count)| *count > 0);
    counts
}

impl Aggregate for Match {
    fn summarize(records: &[Self], _today: NaiveDate) -> Chart {
        Chart {
            title: "Statuts des Matches",
            caption: "Répartition des matches par statut",
            series: "Matches",
            style: ChartStyle::Pie,
            points: status_breakdown(records)
                .into_iter()
                .map(|(status, count)| ChartPoint {
                    label: status.label().to_string(),
                    value: count,
                    color: status.color(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn article(id: u64, published: Option<(i32, u32, u32)>) -> Article {
        Article {
            id,
            document_id: format!("a{}", id),
            title: format!("Article {}", id),
            body: String::new(),
            created_at: None,
            updated_at: None,
            published_at: published.map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()),
        }
    }

    fn club(name: &str, capacity: u32) -> Club {
        serde_json::from_value(serde_json::json!({
            "id": 1, "documentId": name, "nom": name, "capacite": capacity
        }))
        .unwrap()
    }

    fn competition(level: &str) -> Competition {
        serde_json::from_value(serde_json::json!({
            "id": 1, "documentId": level, "nom": "Coupe", "niveau": level
        }))
        .unwrap()
    }

    fn game(status: &str) -> Match {
        serde_json::from_value(serde_json::json!({
            "id": 1, "documentId": status, "titre": "Match", "statut": status
        }))
        .unwrap()
    }

    #[test]
    fn test_six_month_window_across_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let articles = vec![
            article(1, Some((2025, 2, 1))),
            article(2, Some((2025, 2, 28))),
            article(3, Some((2024, 11, 15))),
            article(4, Some((2024, 8, 31))),
            article(5, Some((2024, 9, 1))),
            article(6, None),
        ];

        let buckets = monthly_publications(&articles, today);
        let summary: Vec<(i32, u32, u64)> = buckets.iter().map(|b| (b.year, b.month, b.count)).collect();
        assert_eq!(
            summary,
            vec![
                (2024, 9, 1),
                (2024, 10, 0),
                (2024, 11, 1),
                (2024, 12, 0),
                (2025, 1, 0),
                (2025, 2, 2),
            ]
        );
        assert_eq!(buckets[0].label(), "sept. 2024");
    }

    #[test]
    fn test_empty_articles_still_six_buckets() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let chart = Article::summarize(&[], today);
        assert_eq!(chart.points.len(), MONTH_WINDOW);
        assert!(chart.points.iter().all(|p| p.value == 0));
        assert_eq!(chart.points.last().unwrap().label, "juin 2025");
    }

    #[test]
    fn test_capacity_ranking_descending() {
        let clubs = vec![club("FUS", 18000), club("Raja", 45000), club("Wydad", 45000), club("MAS", 45000 / 2)];
        let names: Vec<String> = capacity_ranking(&clubs).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Raja", "Wydad", "MAS", "FUS"]);

        let chart = Club::summarize(&clubs, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(chart.points[0].color, "#1A78E2");
        assert_eq!(chart.points[3].color, "#FF9800");
    }

    #[test]
    fn test_level_breakdown_first_appearance() {
        let comps = vec![
            competition("continental"),
            competition("national"),
            competition("continental"),
            competition("régional"),
        ];
        let chart = Competition::summarize(&comps, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let labels: Vec<(&str, u64)> = chart.points.iter().map(|p| (p.label.as_str(), p.value)).collect();
        assert_eq!(labels, vec![("Continental", 2), ("National", 1), ("Régional", 1)]);
        assert_eq!(chart.share(&chart.points[0]), 50);
    }

    #[test]
    fn test_status_breakdown_omits_zero_and_keeps_unknown() {
        let matches = vec![game("termine"), game("a_venir"), game("interrompu"), game("termine")];
        let chart = Match::summarize(&matches, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let slices: Vec<(&str, u64, &str)> = chart
            .points
            .iter()
            .map(|p| (p.label.as_str(), p.value, p.color))
            .collect();
        assert_eq!(
            slices,
            vec![
                ("À venir", 1, "#1A78E2"),
                ("Terminé", 2, "#6C757D"),
                ("interrompu", 1, "#999999"),
            ]
        );
        assert!(chart.points.iter().all(|p| p.value > 0));
    }

    #[test]
    fn test_empty_matches_chart_is_empty() {
        let chart = Match::summarize(&[], NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(chart.is_empty());
        assert_eq!(chart.total(), 0);
    }
}
