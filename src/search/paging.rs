// Catalog Rust Client Library
// Copyright 2025 catalog-rs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Query and sort rewriting for timestamp-based paging.

use crate::dsl::{BoolQuery, Dsl, Query, Range, SortItem, SortOrder};
use crate::error::ValidationErr;

/// Marker for "no usable timestamp" on the first/last record of a page.
pub(crate) const NO_TIMESTAMP: i64 = -2;

/// True for the `gte` range this module adds on the timestamp field.
pub(crate) fn is_paging_timestamp_query(query: &Query, timestamp_field: &str) -> bool {
    match query {
        Query::Range(r) => {
            r.field == timestamp_field
                && r.gte.as_ref().and_then(|v| v.as_i64()).is_some_and(|v| v > 0)
        }
        _ => false,
    }
}

pub(crate) fn paging_timestamp_query(timestamp_field: &str, last_timestamp: i64) -> Query {
    Range::new(timestamp_field).gte(last_timestamp).into()
}

/// True when the first sort is ascending on the timestamp field.
pub(crate) fn presorted_by_timestamp(sorts: &[SortItem], timestamp_field: &str) -> bool {
    sorts
        .first()
        .is_some_and(|s| s.field == timestamp_field && s.order == SortOrder::Ascending)
}

/// Puts an ascending timestamp sort first, dropping any other timestamp sort.
pub(crate) fn sort_by_timestamp_first(sorts: &[SortItem], timestamp_field: &str) -> Vec<SortItem> {
    std::iter::once(SortItem::asc(timestamp_field))
        .chain(sorts.iter().filter(|s| s.field != timestamp_field).cloned())
        .collect()
}

/// Returns the sorts a timestamp-paged search must run with.
///
/// Sorting on the timestamp field or on a tiebreaker is rewritten; any other
/// sort cannot be honoured and is rejected.
pub(crate) fn prepare_sorts_for_bulk(
    sorts: &[SortItem],
    timestamp_field: &str,
    tiebreakers: &[SortItem],
) -> Result<Vec<SortItem>, ValidationErr> {
    if presorted_by_timestamp(sorts, timestamp_field) {
        return Ok(sorts.to_vec());
    }
    let has_user_sort = sorts.iter().any(|s| {
        s.field != timestamp_field && !tiebreakers.iter().any(|t| t.field == s.field)
    });
    if has_user_sort {
        return Err(ValidationErr::BulkSearchWithSorts);
    }
    Ok(sort_by_timestamp_first(sorts, timestamp_field))
}

/// Appends every tiebreaker not already sorted on.
pub(crate) fn ensure_tiebreakers(sorts: &mut Vec<SortItem>, tiebreakers: &[SortItem]) {
    for t in tiebreakers {
        if !sorts.iter().any(|s| s.field == t.field) {
            sorts.push(t.clone());
        }
    }
}

/// First and last creation timestamps of a page. Pages with fewer than two
/// records give [`NO_TIMESTAMP`] for both, which forces offset paging.
pub(crate) fn first_last_timestamps<I>(timestamps: I) -> (i64, i64)
where
    I: ExactSizeIterator<Item = Option<i64>>,
{
    if timestamps.len() <= 1 {
        return (NO_TIMESTAMP, NO_TIMESTAMP);
    }
    let mut first = NO_TIMESTAMP;
    let mut last = NO_TIMESTAMP;
    for (i, ts) in timestamps.enumerate() {
        let ts = ts.unwrap_or(NO_TIMESTAMP);
        if i == 0 {
            first = ts;
        }
        last = ts;
    }
    (first, last)
}

/// Rewrites the query of the next page request.
///
/// When the last page spans more than one timestamp the next page starts at
/// the last timestamp seen (`gte`, from 0) so the server's result window never
/// fills up. Otherwise, or when either end of the page has no timestamp, all
/// paging ranges are removed and the search continues by offset, skipping the
/// records already processed.
pub(crate) fn prepare_query_for_timestamp_paging(
    dsl: &mut Dsl,
    timestamp_field: &str,
    first_timestamp: i64,
    last_timestamp: i64,
    processed: usize,
) {
    let query = dsl.query.take().map(|q| match q {
        Query::Bool(mut b) => {
            b.filter
                .retain(|f| !is_paging_timestamp_query(f, timestamp_field));
            Query::Bool(b)
        }
        other => other,
    });

    let windowed = first_timestamp != last_timestamp
        && first_timestamp != NO_TIMESTAMP
        && last_timestamp != NO_TIMESTAMP;
    if windowed {
        let paging = paging_timestamp_query(timestamp_field, last_timestamp);
        let rewritten = match query {
            Some(Query::Bool(mut b)) => {
                b.filter.push(paging);
                b
            }
            Some(other) => BoolQuery::new().filter(other).filter(paging),
            None => BoolQuery::new().filter(paging),
        };
        dsl.query = Some(rewritten.into());
        dsl.from = 0;
    } else {
        dsl.query = query;
        dsl.from = processed;
    }
}
