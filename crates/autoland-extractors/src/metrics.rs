//! Cost savings of the hybrid strategy over a batch of results.

use autoland_core::ExtractionMethod;
use serde::{Deserialize, Serialize};

use crate::hybrid::HybridParseResult;

/// Aggregate cost figures. Costs are in the unit passed to
/// [`calculate_cost_savings`]; rates and percentages are 0-100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSavingsMetrics {
    pub total_processed: usize,
    pub free_success_count: usize,
    pub paid_fallback_count: usize,
    pub free_success_rate: f64,
    /// Cost if every document had gone straight to OCR.
    pub cost_without_hybrid: f64,
    pub actual_cost: f64,
    pub savings: f64,
    pub savings_percentage: f64,
}

/// Reduce past results into cost savings, given the cost of one OCR call.
pub fn calculate_cost_savings(results: &[HybridParseResult], unit_cost: f64) -> CostSavingsMetrics {
    let total = results.len();
    let free = results
        .iter()
        .filter(|r| r.method == ExtractionMethod::Local)
        .count();
    let paid = results.iter().filter(|r| r.method.is_paid()).count();

    let cost_without_hybrid = total as f64 * unit_cost;
    let actual_cost = paid as f64 * unit_cost;
    let savings = cost_without_hybrid - actual_cost;

    CostSavingsMetrics {
        total_processed: total,
        free_success_count: free,
        paid_fallback_count: paid,
        free_success_rate: percentage(free as f64, total as f64),
        cost_without_hybrid,
        actual_cost,
        savings,
        savings_percentage: percentage(savings, cost_without_hybrid),
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
