use super::*;
use crate::github::CommitHistory;
use crate::types::{
    ActivityTrend, CommitRecord, ContributorRecord, LanguageBreakdown, RepositoryMetadata,
    RepositoryRef, WeeklyActivity,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn commit_at(timestamp: &str) -> CommitRecord {
    CommitRecord {
        sha: "9fceb02d0ae598e95dc970b74767f19372d61af8".to_string(),
        author: "tester".to_string(),
        timestamp: DateTime::parse_from_rfc3339(timestamp)
            .unwrap()
            .with_timezone(&Utc),
        message: "change".to_string(),
    }
}

fn contributor(login: &str, contributions: u64) -> ContributorRecord {
    ContributorRecord {
        login: login.to_string(),
        contributions,
        kind: "User".to_string(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn week(start: NaiveDate, total: u32) -> WeeklyActivity {
    WeeklyActivity {
        week_start: start,
        total,
        days: [0; 7],
    }
}

fn random_commits(rng: &mut StdRng, count: usize) -> Vec<CommitRecord> {
    let origin = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let mut commits: Vec<CommitRecord> = (0..count)
        .map(|i| CommitRecord {
            sha: format!("{i:040x}"),
            author: format!("dev{}", rng.gen_range(0..5)),
            timestamp: origin + Duration::minutes(rng.gen_range(0..60 * 24 * 400)),
            message: format!("commit {i}"),
        })
        .collect();
    // GitHub lists newest first
    commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    commits
}

#[test]
fn test_commits_by_day_scenario() {
    let commits = vec![
        commit_at("2024-01-02T09:00:00Z"),
        commit_at("2024-01-01T18:30:00Z"),
        commit_at("2024-01-01T07:15:00Z"),
    ];

    assert_eq!(
        commits_by_day(&commits),
        vec![(date(2024, 1, 1), 2), (date(2024, 1, 2), 1)]
    );
}

#[test]
fn test_commits_by_day_uses_utc() {
    // 23:30 at UTC-05:00 is already the next day in UTC
    let commits = vec![commit_at("2024-03-10T23:30:00-05:00")];
    assert_eq!(commits_by_day(&commits), vec![(date(2024, 3, 11), 1)]);
}

#[test]
fn test_commits_by_day_empty() {
    assert!(commits_by_day(&[]).is_empty());
}

#[test]
fn test_commits_by_day_properties() {
    let mut rng = StdRng::seed_from_u64(7);
    for count in [1, 10, 250] {
        let commits = random_commits(&mut rng, count);
        let days = commits_by_day(&commits);

        assert!(days.windows(2).all(|pair| pair[0].0 < pair[1].0));
        assert_eq!(days.iter().map(|(_, n)| n).sum::<usize>(), commits.len());
        assert_eq!(commits_by_day(&commits), days);
    }
}

#[test]
fn test_commits_by_week_groups_on_monday() {
    let commits = vec![
        commit_at("2024-01-07T12:00:00Z"), // Sunday
        commit_at("2024-01-03T12:00:00Z"), // Wednesday
        commit_at("2024-01-01T12:00:00Z"), // Monday
        commit_at("2023-12-31T12:00:00Z"), // Sunday of the previous week
    ];

    assert_eq!(
        commits_by_week(&commits),
        vec![(date(2023, 12, 25), 1), (date(2024, 1, 1), 3)]
    );
}

#[test]
fn test_weekly_from_commits_fills_gaps() {
    let commits = vec![
        commit_at("2024-01-16T10:00:00Z"), // Tuesday, week of 2024-01-14
        commit_at("2024-01-01T10:00:00Z"), // Monday, week of 2023-12-31
        commit_at("2024-01-01T11:00:00Z"),
    ];

    let weeks = weekly_from_commits(&commits);
    assert_eq!(weeks.len(), 3);
    assert_eq!(weeks[0].week_start, date(2023, 12, 31));
    assert_eq!(weeks[0].total, 2);
    assert_eq!(weeks[0].days, [0, 2, 0, 0, 0, 0, 0]);
    assert_eq!(weeks[1].total, 0);
    assert_eq!(weeks[2].week_start, date(2024, 1, 14));
    assert_eq!(weeks[2].days[2], 1);
}

#[test]
fn test_top_contributors_tie_break() {
    let contributors = vec![contributor("C", 3), contributor("B", 5), contributor("A", 5)];

    let top = top_contributors(&contributors, 2);
    assert_eq!(top, vec![contributor("A", 5), contributor("B", 5)]);
}

#[test]
fn test_top_contributors_fewer_than_n() {
    let contributors = vec![contributor("solo", 1)];
    assert_eq!(top_contributors(&contributors, 10).len(), 1);
    assert!(top_contributors(&[], 10).is_empty());
    assert!(top_contributors(&contributors, 0).is_empty());
}

#[test]
fn test_top_contributors_properties() {
    let mut rng = StdRng::seed_from_u64(11);
    let contributors: Vec<ContributorRecord> = (0..40)
        .map(|i| contributor(&format!("user{i}"), rng.gen_range(1..20)))
        .collect();

    for n in [0, 1, 5, 40, 100] {
        let top = top_contributors(&contributors, n);
        assert_eq!(top.len(), n.min(contributors.len()));
        assert!(top.windows(2).all(|pair| pair[0].contributions >= pair[1].contributions));
        assert_eq!(top_contributors(&contributors, n), top);
    }
}

#[test]
fn test_language_percentages_scenario() {
    let breakdown: LanguageBreakdown =
        [("Python".to_string(), 300), ("JS".to_string(), 100)].into_iter().collect();

    let percentages = language_percentages(&breakdown);
    assert_eq!(percentages.get("Python"), Some(&75.0));
    assert_eq!(percentages.get("JS"), Some(&25.0));
}

#[test]
fn test_language_percentages_zero_total() {
    let breakdown: LanguageBreakdown = [("Rust".to_string(), 0)].into_iter().collect();
    assert!(language_percentages(&breakdown).is_empty());
    assert!(language_percentages(&LanguageBreakdown::new()).is_empty());
}

#[test]
fn test_language_percentages_sum_to_hundred() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let breakdown: LanguageBreakdown = (0..rng.gen_range(1..12))
            .map(|i| (format!("lang{i}"), rng.gen_range(1..1_000_000u64)))
            .collect();

        let percentages = language_percentages(&breakdown);
        let tenths: i64 = percentages.values().map(|p| (p * 10.0).round() as i64).sum();
        assert_eq!(tenths, 1000);
        assert!(percentages
            .values()
            .all(|p| (p * 10.0 - (p * 10.0).round()).abs() < 1e-6));
    }
}

#[test]
fn test_language_percentages_many_small_languages() {
    let mut breakdown: LanguageBreakdown = (0..20).map(|i| (format!("tiny{i:02}"), 400)).collect();
    breakdown.insert("Main".to_string(), 992_000);

    let percentages = language_percentages(&breakdown);
    let tenths: i64 = percentages.values().map(|p| (p * 10.0).round() as i64).sum();
    assert_eq!(tenths, 1000);
    assert_eq!(percentages.get("Main"), Some(&99.2));
    // The 0.8 left over goes to the first eight equal remainders
    assert_eq!(percentages.get("tiny00"), Some(&0.1));
    assert_eq!(percentages.get("tiny07"), Some(&0.1));
    assert_eq!(percentages.get("tiny08"), Some(&0.0));
    assert_eq!(language_percentages(&breakdown), percentages);
}

#[test]
fn test_language_percentages_thirds() {
    let breakdown: LanguageBreakdown = ["C", "Go", "Rust"]
        .into_iter()
        .map(|name| (name.to_string(), 1))
        .collect();

    let percentages = language_percentages(&breakdown);
    assert_eq!(percentages.get("C"), Some(&33.4));
    assert_eq!(percentages.get("Go"), Some(&33.3));
    assert_eq!(percentages.get("Rust"), Some(&33.3));
}

#[test]
fn test_weekly_statistics() {
    let weeks: Vec<WeeklyActivity> = [2, 4, 4, 4, 5, 5, 7, 9, 3]
        .iter()
        .enumerate()
        .map(|(i, &total)| week(date(2024, 1, 7) + Duration::weeks(i as i64), total))
        .collect();

    let stats = weekly_statistics(43, &weeks).unwrap();
    assert_eq!(stats.total_commits, 43);
    assert_eq!(stats.average_weekly, 4.78);
    assert_eq!(stats.median_weekly, 4.0);
    assert_eq!(stats.highest_weekly, 9);
    assert_eq!(stats.lowest_weekly, 2);
    assert_eq!(stats.std_dev, 1.99);
    // Last week (3) is below the mean of the ones before it (5.0)
    assert_eq!(stats.trend, ActivityTrend::Decreasing);
}

#[test]
fn test_weekly_statistics_trend_uses_recent_weeks() {
    // Old busy weeks fall outside the twelve-week window
    let mut totals = vec![100; 10];
    totals.extend([1; 11]);
    totals.push(2);
    let weeks: Vec<WeeklyActivity> = totals
        .iter()
        .enumerate()
        .map(|(i, &total)| week(date(2023, 1, 1) + Duration::weeks(i as i64), total))
        .collect();

    let stats = weekly_statistics(0, &weeks).unwrap();
    assert_eq!(stats.trend, ActivityTrend::Increasing);
}

#[test]
fn test_weekly_statistics_edge_cases() {
    assert!(weekly_statistics(0, &[]).is_none());

    let stats = weekly_statistics(1, &[week(date(2024, 1, 7), 1)]).unwrap();
    assert_eq!(stats.trend, ActivityTrend::Insufficient);
    assert_eq!(stats.std_dev, 0.0);
}

#[test]
fn test_weekly_histogram() {
    let weeks: Vec<WeeklyActivity> = [0, 1, 2, 3, 4, 10]
        .iter()
        .map(|&total| week(date(2024, 1, 7), total))
        .collect();

    let histogram = weekly_histogram(&weeks, 5);
    assert_eq!(histogram.len(), 5);
    assert_eq!(
        histogram.iter().map(|b| b.count).sum::<usize>(),
        weeks.len()
    );
    assert_eq!(histogram[0].count, 2); // 0 and 1 fall in [0, 2)
    assert_eq!(histogram[4].count, 1); // the maximum lands in the last bin

    let flat = weekly_histogram(&[week(date(2024, 1, 7), 3), week(date(2024, 1, 14), 3)], 10);
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].count, 2);

    assert!(weekly_histogram(&[], 10).is_empty());
}

fn fetched(activity: Option<Vec<WeeklyActivity>>) -> FetchedData {
    let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    FetchedData {
        metadata: RepositoryMetadata {
            name: "widgets".to_string(),
            full_name: "octo/widgets".to_string(),
            description: None,
            stars: 1,
            forks: 0,
            open_issues: 0,
            watchers: 1,
            size_kb: 10,
            created_at: now,
            updated_at: now,
            language: Some("Rust".to_string()),
            default_branch: Some("main".to_string()),
            license: None,
            topics: Vec::new(),
            html_url: None,
        },
        history: CommitHistory {
            records: vec![
                commit_at("2024-01-10T10:00:00Z"),
                commit_at("2024-01-02T10:00:00Z"),
            ],
            truncated: false,
        },
        contributors: vec![contributor("b", 1), contributor("a", 4)],
        languages: [("Rust".to_string(), 10)].into_iter().collect(),
        activity,
    }
}

#[test]
fn test_summarize_derives_weekly_activity_when_missing() {
    let repository = RepositoryRef::new("octo", "widgets").unwrap();
    let result = summarize(repository, fetched(None), 1);

    assert!(result.weekly_activity_derived);
    assert_eq!(result.weekly_activity.len(), 2);
    assert_eq!(result.top_contributors, vec![contributor("a", 4)]);
    assert_eq!(result.contributors.len(), 2);
    assert_eq!(result.language_percentages.get("Rust"), Some(&100.0));
    assert_eq!(result.statistics.unwrap().total_commits, 2);
}

#[test]
fn test_summarize_prefers_github_statistics() {
    let repository = RepositoryRef::new("octo", "widgets").unwrap();
    let weeks = vec![week(date(2024, 1, 7), 5), week(date(2024, 1, 14), 9)];
    let result = summarize(repository, fetched(Some(weeks.clone())), 10);

    assert!(!result.weekly_activity_derived);
    assert_eq!(result.weekly_activity, weeks);
    assert_eq!(result.statistics.unwrap().highest_weekly, 9);
}
