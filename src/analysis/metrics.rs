//! Pure transforms from typed records into chartable series and summaries.
//!
//! Nothing here performs I/O or keeps state; calling a function twice on the
//! same input yields the same output.

use chrono::{Datelike, Days, NaiveDate};
use statrs::statistics::{Data, Median, Statistics};
use std::collections::BTreeMap;

use crate::types::{
    ActivityTrend, CommitRecord, ContributorRecord, HistogramBin, LanguageBreakdown,
    RepoStatistics, WeeklyActivity,
};

/// Weeks considered when judging the recent activity trend.
pub const RECENT_WEEKS: usize = 12;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Count commits per UTC calendar day, oldest day first.
pub fn commits_by_day(commits: &[CommitRecord]) -> Vec<(NaiveDate, usize)> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for commit in commits {
        *counts.entry(commit.timestamp.date_naive()).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Count commits per ISO week, keyed by the week's Monday, oldest first.
pub fn commits_by_week(commits: &[CommitRecord]) -> Vec<(NaiveDate, usize)> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for commit in commits {
        let date = commit.timestamp.date_naive();
        let monday = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
        *counts.entry(monday).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Weekly activity derived from a commit list, shaped like GitHub's
/// `stats/commit_activity` (weeks start on Sunday). Weeks without commits
/// between the first and the last commit are included with zero totals.
pub fn weekly_from_commits(commits: &[CommitRecord]) -> Vec<WeeklyActivity> {
    let mut weeks: BTreeMap<NaiveDate, [u32; 7]> = BTreeMap::new();
    for commit in commits {
        let date = commit.timestamp.date_naive();
        let offset = date.weekday().num_days_from_sunday();
        let sunday = date - Days::new(u64::from(offset));
        weeks.entry(sunday).or_insert([0; 7])[offset as usize] += 1;
    }

    let (Some(&first), Some(&last)) = (weeks.keys().next(), weeks.keys().next_back()) else {
        return Vec::new();
    };

    let mut result = Vec::new();
    let mut week_start = first;
    while week_start <= last {
        let days = weeks.get(&week_start).copied().unwrap_or([0; 7]);
        result.push(WeeklyActivity {
            week_start,
            total: days.iter().sum(),
            days,
        });
        week_start = week_start + Days::new(7);
    }
    result
}

/// Rank contributors by contribution count, highest first, breaking ties by
/// login in ascending order, and keep at most `n`.
pub fn top_contributors(contributors: &[ContributorRecord], n: usize) -> Vec<ContributorRecord> {
    let mut ranked = contributors.to_vec();
    ranked.sort_by(|a, b| {
        b.contributions
            .cmp(&a.contributions)
            .then_with(|| a.login.cmp(&b.login))
    });
    ranked.truncate(n);
    ranked
}

/// Share of each language in percent, with one decimal place.
///
/// Shares are apportioned in tenths of a percent by largest remainder, so
/// the values always add up to exactly 100.0; ties on the remainder go to
/// the language that sorts first. Returns an empty map when the breakdown
/// holds no bytes at all.
pub fn language_percentages(breakdown: &LanguageBreakdown) -> BTreeMap<String, f64> {
    const TENTHS: u128 = 1000;

    let total: u128 = breakdown.values().map(|&bytes| u128::from(bytes)).sum();
    if total == 0 {
        return BTreeMap::new();
    }

    // (language, whole tenths, remainder of the division)
    let mut shares: Vec<(&String, u128, u128)> = breakdown
        .iter()
        .map(|(language, &bytes)| {
            let scaled = u128::from(bytes) * TENTHS;
            (language, scaled / total, scaled % total)
        })
        .collect();

    let assigned: u128 = shares.iter().map(|(_, tenths, _)| tenths).sum();
    let leftover = (TENTHS - assigned) as usize;

    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| {
        shares[b]
            .2
            .cmp(&shares[a].2)
            .then_with(|| shares[a].0.cmp(shares[b].0))
    });
    for &index in order.iter().take(leftover) {
        shares[index].1 += 1;
    }

    shares
        .into_iter()
        .map(|(language, tenths, _)| (language.clone(), tenths as f64 / 10.0))
        .collect()
}

/// The trailing `count` weeks.
pub fn recent_weeks(weeks: &[WeeklyActivity], count: usize) -> &[WeeklyActivity] {
    &weeks[weeks.len().saturating_sub(count)..]
}

fn activity_trend(weeks: &[WeeklyActivity]) -> ActivityTrend {
    let recent = recent_weeks(weeks, RECENT_WEEKS);
    let Some((last, earlier)) = recent.split_last() else {
        return ActivityTrend::Insufficient;
    };
    if earlier.is_empty() {
        return ActivityTrend::Insufficient;
    }

    let baseline = earlier.iter().map(|w| f64::from(w.total)).mean();
    if f64::from(last.total) > baseline {
        ActivityTrend::Increasing
    } else {
        ActivityTrend::Decreasing
    }
}

/// Summary statistics over weekly commit totals; `None` without any weeks.
pub fn weekly_statistics(total_commits: usize, weeks: &[WeeklyActivity]) -> Option<RepoStatistics> {
    if weeks.is_empty() {
        return None;
    }

    let totals: Vec<f64> = weeks.iter().map(|w| f64::from(w.total)).collect();
    let average = totals.iter().mean();
    let std_dev = totals.iter().population_std_dev();
    let median = Data::new(totals).median();

    Some(RepoStatistics {
        total_commits,
        average_weekly: round_to(average, 2),
        median_weekly: median,
        highest_weekly: weeks.iter().map(|w| w.total).fold(0, std::cmp::max),
        lowest_weekly: weeks.iter().map(|w| w.total).fold(u32::MAX, std::cmp::min),
        std_dev: round_to(std_dev, 2),
        trend: activity_trend(weeks),
    })
}

/// Distribute weekly totals over `bins` equal-width buckets spanning the
/// observed range. Bin counts add up to the number of weeks.
pub fn weekly_histogram(weeks: &[WeeklyActivity], bins: usize) -> Vec<HistogramBin> {
    if weeks.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = weeks.iter().map(|w| w.total).fold(u32::MAX, std::cmp::min);
    let max = weeks.iter().map(|w| w.total).fold(0, std::cmp::max);

    if min == max {
        return vec![HistogramBin {
            start: f64::from(min),
            end: f64::from(max) + 1.0,
            count: weeks.len(),
        }];
    }

    let low = f64::from(min);
    let width = (f64::from(max) - low) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: low + width * i as f64,
            end: low + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for week in weeks {
        let index = ((f64::from(week.total) - low) / width).floor() as usize;
        histogram[index.min(bins - 1)].count += 1;
    }
    histogram
}
