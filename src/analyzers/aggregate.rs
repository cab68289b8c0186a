use crate::analyzers::types::CategorySummary;
use crate::analyzers::utility::weighted_mean_rounded;
use crate::stats::OperationStats;

/// Reduces one category's operations to a single [`CategorySummary`].
///
/// Median and p95 are averages of the per-operation values weighted by
/// request count. They are not true percentiles over the raw samples, which
/// a stats export does not contain.
///
/// Returns `None` for an empty slice, or when the operations recorded no
/// requests at all.
pub fn aggregate_category(operations: &[OperationStats]) -> Option<CategorySummary> {
    if operations.is_empty() {
        return None;
    }

    let mut total_requests: u128 = 0;
    let mut weighted_median: u128 = 0;
    let mut weighted_p95: u128 = 0;

    for op in operations {
        let requests = u128::from(op.request_count);
        total_requests += requests;
        weighted_median += u128::from(op.median_ms) * requests;
        weighted_p95 += u128::from(op.p95_ms) * requests;
    }

    Some(CategorySummary {
        median: weighted_mean_rounded(weighted_median, total_requests)?,
        p95: weighted_mean_rounded(weighted_p95, total_requests)?,
        request_count: u64::try_from(total_requests).ok()?,
        operation_count: operations.len(),
    })
}

/// Returns up to `limit` operations ordered by median latency, slowest
/// first. Ties are broken by p95, then by input order.
pub fn slowest_operations(operations: &[OperationStats], limit: usize) -> Vec<OperationStats> {
    let mut ranked = operations.to_vec();
    ranked.sort_by(|a, b| {
        b.median_ms
            .cmp(&a.median_ms)
            .then_with(|| b.p95_ms.cmp(&a.p95_ms))
    });
    ranked.truncate(limit);
    ranked
}
