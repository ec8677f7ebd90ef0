//! Session statistics report
//!
//! Formats the counters of a finished (or interrupted) session for the
//! terminal.

use crate::state::{SessionStats, SkipReason, Unavailability};
use std::fmt::Write;

/// Renders statistics as a multi-line report
pub fn format_statistics(stats: &SessionStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Session Statistics ===\n");

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Started at: {}", stats.started_at.to_rfc3339());
    let _ = writeln!(out, "  Elapsed: {:.1}s", stats.elapsed().as_secs_f64());
    let _ = writeln!(out, "  Pages requested: {}", stats.pages_requested);
    let _ = writeln!(out, "  Pages received: {}", stats.pages_received);
    let _ = writeln!(out, "  Results seen: {}", stats.results_seen);
    let _ = writeln!(out, "  Records yielded: {}", stats.records_yielded);
    let _ = writeln!(out);

    if stats.total_unavailable() > 0 {
        let (exhausted, failed): (Vec<_>, Vec<_>) = stats
            .pages_unavailable
            .iter()
            .partition(|(reason, _)| reason.is_exhaustion());
        let _ = writeln!(out, "Unavailable Pages:");
        let _ = writeln!(out, "  Topic exhausted: {}", exhausted.iter().map(|(_, c)| **c).sum::<u64>());
        let _ = writeln!(out, "  Fetch failed: {}", failed.iter().map(|(_, c)| **c).sum::<u64>());
        for reason in [
            Unavailability::Empty,
            Unavailability::HttpError,
            Unavailability::NetworkError,
            Unavailability::ParseError,
        ] {
            if let Some(count) = stats.pages_unavailable.get(&reason) {
                let _ = writeln!(out, "    {}: {}", reason, count);
            }
        }
        let _ = writeln!(out);
    }

    if stats.total_skipped() > 0 {
        let count_where = |pred: fn(&SkipReason) -> bool| -> u64 {
            stats
                .skipped
                .iter()
                .filter(|(reason, _)| pred(*reason))
                .map(|(_, count)| *count)
                .sum()
        };
        let _ = writeln!(out, "Skipped Results:");
        let _ = writeln!(out, "  Ineligible: {}", count_where(SkipReason::is_filtered));
        let _ = writeln!(out, "  Image download failed: {}", count_where(SkipReason::is_download_failure));
        let _ = writeln!(out, "  Duplicate: {}", stats.skipped_for(SkipReason::Duplicate));
        // Sort reasons by count (descending)
        let mut skip_counts: Vec<(SkipReason, u64)> = SkipReason::all_reasons()
            .into_iter()
            .map(|reason| (reason, stats.skipped_for(reason)))
            .filter(|(_, count)| *count > 0)
            .collect();
        skip_counts.sort_by(|a, b| b.1.cmp(&a.1));

        for (reason, count) in skip_counts {
            let _ = writeln!(out, "    {}: {}", reason, count);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "Acceptance Rate: {:.1}% ({} / {} results became records)",
        stats.acceptance_rate(),
        stats.records_yielded,
        stats.results_seen
    );

    out
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &SessionStats) {
    print!("{}", format_statistics(stats));
}
