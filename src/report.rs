//! Session snapshots: a serializable dump for JSON export and a compact text
//! rendering of the three panels for terminals.

use serde::Serialize;
use std::fmt::Write as _;

use crate::core::curves::reference_density;
use crate::model::population::PopulationParams;
use crate::sim::histograms::{HistogramName, HistogramSet, HistogramSummary, Scaling};
use crate::sim::session::{Session, SessionCounters};

const SPARKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Panels in display order: population, authors, attitudes.
pub const PANELS: [(&str, &[HistogramName]); 3] = [
    ("All users: true means", &[HistogramName::TrueAll]),
    (
        "Tweet authors: political vs non-political",
        &[
            HistogramName::TweetAuthorsPolitical,
            HistogramName::TweetAuthorsNonPolitical,
        ],
    ),
    (
        "Attitudes: posted vs shadow",
        &[HistogramName::PostedAttitudes, HistogramName::ShadowAttitudes],
    ),
];

#[derive(Clone, Debug, Serialize)]
pub struct HistogramSnapshot {
    pub name: HistogramName,
    pub counts: Vec<u64>,
    pub summary: HistogramSummary,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub population: PopulationParams,
    pub political_model: &'static str,
    pub topic_model: &'static str,
    pub range: (f64, f64),
    pub n_bins: usize,
    pub counters: SessionCounters,
    pub histograms: Vec<HistogramSnapshot>,
}

impl Snapshot {
    pub fn capture(session: &Session) -> Self {
        let h = session.histograms();
        let bins = h.bins();
        let selection = session.selection();
        Self {
            population: *session.population(),
            political_model: if selection.political.is_fitted() {
                "fitted"
            } else {
                "logistic"
            },
            topic_model: if selection.topic.is_fitted() {
                "fitted"
            } else {
                "abs-extremity"
            },
            range: (bins.min, bins.max),
            n_bins: bins.n_bins,
            counters: session.counters(),
            histograms: HistogramName::ALL
                .into_iter()
                .map(|name| HistogramSnapshot {
                    name,
                    counts: h.counts(name).to_vec(),
                    summary: h.summary(name),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Merge adjacent bins so the histogram fits in `width` columns.
fn columns(counts: &[u64], width: usize) -> Vec<u64> {
    let n = counts.len();
    let width = width.clamp(1, n.max(1));
    (0..width)
        .map(|j| {
            let lo = j * n / width;
            let hi = (j + 1) * n / width;
            counts[lo..hi].iter().sum()
        })
        .collect()
}

fn sparkline(cols: &[u64], max: u64) -> String {
    let max = max.max(1) as f64;
    cols.iter()
        .map(|&c| {
            let level = ((c as f64 / max) * 8.0).ceil() as usize;
            SPARKS[level.min(8)]
        })
        .collect()
}

/// Peak-normalized N(0, 1) curve across the range, one level per column.
fn reference_line(min: f64, max: f64, n_cols: usize) -> String {
    reference_density(min, max, n_cols.max(2))
        .into_iter()
        .take(n_cols)
        .map(|(_, y)| SPARKS[((y * 8.0).round() as usize).min(8)])
        .collect()
}

/// Render all panels as sparklines with per-histogram summaries.
pub fn render_text(session: &Session, width: usize) -> String {
    render_histograms(session.histograms(), session.scaling(), session.counters(), width)
}

pub fn render_histograms(
    h: &HistogramSet,
    scaling: Scaling,
    counters: SessionCounters,
    width: usize,
) -> String {
    let mut out = String::new();
    let bins = h.bins();
    let _ = writeln!(
        out,
        "users={} political={} non-political={}  range=[{}, {}) bins={}",
        counters.users, counters.political, counters.non_political, bins.min, bins.max, bins.n_bins
    );
    for (title, names) in PANELS {
        let _ = writeln!(out, "\n{title}");
        let cols: Vec<Vec<u64>> = names.iter().map(|&n| columns(h.counts(n), width)).collect();
        let shared = cols.iter().flatten().copied().max().unwrap_or(0);
        for (name, col) in names.iter().zip(&cols) {
            let max = match scaling {
                Scaling::Shared => shared,
                Scaling::Independent => col.iter().copied().max().unwrap_or(0),
            };
            let s = h.summary(*name);
            let _ = writeln!(out, "  |{}|", sparkline(col, max));
            let _ = writeln!(
                out,
                "   {:<26} n={:<7} mean={:+.3} sd={:.3}",
                name.as_str(),
                s.total,
                s.mean,
                s.sd
            );
            if *name == HistogramName::TrueAll {
                let _ = writeln!(out, "  |{}|", reference_line(bins.min, bins.max, col.len()));
                let _ = writeln!(out, "   {:<26} peak-normalized", "reference N(0,1)");
            }
        }
    }
    out
}
