//! Sparse/full-text retrieval strategy adapter, with its unbounded
//! streamed mode (spec.md §4.7).

use std::sync::Arc;

use async_stream::try_stream;
use futures::Stream;
use serde_json::Value;

use crate::backend::{FTSStore, FtsRow};
use crate::dense::parse_metadata;
use crate::filter::Filter;
use crate::query::to_sparse_expression;
use crate::types::{Hit, SearchRequest, Strategy};
use crate::RetrieveError;

/// Default page size for [`SparseRetriever::retrieve_systematic`].
pub const DEFAULT_BATCH_SIZE: usize = 1000;

pub struct SparseRetriever {
    store: Arc<dyn FTSStore>,
}

impl SparseRetriever {
    pub fn new(store: Arc<dyn FTSStore>) -> Self {
        Self { store }
    }

    pub fn snapshot_id(&self) -> i64 {
        self.store.snapshot_id().unwrap_or(-1)
    }

    /// `Retrieve(request) -> [Hit]` (spec.md §4.7).
    ///
    /// Oversamples when filters are present (`max(top_k * 10, 100)`) to
    /// survive post-filter attrition, then truncates to `top_k`.
    pub fn retrieve(&self, request: &SearchRequest) -> Result<Vec<Hit>, RetrieveError> {
        let expr = to_sparse_expression(&request.query);
        let filter = request
            .filters
            .as_ref()
            .map(Filter::parse)
            .transpose()?;

        let limit = match filter {
            Some(_) => (request.top_k * 10).max(100),
            None => request.top_k,
        };

        let rows = self.store.search(&expr, limit, 0)?;
        let mut hits = Vec::with_capacity(rows.len());
        for row in rows {
            let hit = row_to_hit(row)?;
            if filter_matches(&filter, &hit) {
                hits.push(hit);
            }
        }
        hits.truncate(request.top_k);
        Ok(hits)
    }

    /// `RetrieveSystematic(request) -> Stream<Hit>` (spec.md §4.7).
    ///
    /// Pages through the backend statelessly `(limit, offset)`; terminates
    /// as soon as a batch returns fewer than `batch_size` rows.
    pub fn retrieve_systematic<'a>(
        &'a self,
        request: &'a SearchRequest,
        batch_size: usize,
    ) -> impl Stream<Item = Result<Hit, RetrieveError>> + 'a {
        let expr = to_sparse_expression(&request.query);
        let filter_spec = request.filters.clone();

        try_stream! {
            let filter = match &filter_spec {
                Some(spec) => Some(Filter::parse(spec)?),
                None => None,
            };
            let mut offset = 0usize;
            loop {
                let rows = self.store.search(&expr, batch_size, offset)?;
                let n = rows.len();
                for row in rows {
                    let hit = row_to_hit(row)?;
                    if filter_matches(&filter, &hit) {
                        yield hit;
                    }
                }
                offset += n;
                if n < batch_size {
                    break;
                }
            }
        }
    }
}

fn filter_matches(filter: &Option<Filter>, hit: &Hit) -> bool {
    match filter {
        Some(f) => f.matches(&Value::Object(hit.metadata.clone())),
        None => true,
    }
}

fn row_to_hit(row: FtsRow) -> Result<Hit, RetrieveError> {
    let metadata = parse_metadata(&row.metadata_json)?;
    let mut hit = Hit::new(row.doc_id, row.score as f64, Strategy::Fts);
    hit.content = Some(row.content);
    hit.metadata = metadata;
    Ok(hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Query;
    use futures::StreamExt;
    use std::sync::Mutex;

    /// A mock whose pages are fixed in advance, mirroring S6 in spec.md §8.
    struct PagedMock {
        pages: Mutex<Vec<Vec<f64>>>,
    }

    impl FTSStore for PagedMock {
        fn search(&self, _expr: &str, _limit: usize, offset: usize) -> Result<Vec<FtsRow>, RetrieveError> {
            let pages = self.pages.lock().unwrap();
            let page_index = offset / 3;
            Ok(pages
                .get(page_index)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(i, val)| FtsRow {
                    doc_id: format!("p{page_index}_{i}"),
                    content: String::new(),
                    metadata_json: serde_json::json!({"val": val}).to_string(),
                    score: val as f32,
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn systematic_pagination_and_filter_scenario_s6() {
        let store = PagedMock {
            pages: Mutex::new(vec![
                vec![5.0, 15.0, 5.0],
                vec![5.0, 5.0, 5.0],
                vec![20.0, 30.0, 5.0],
                vec![],
            ]),
        };
        let retriever = SparseRetriever::new(Arc::new(store));
        let mut request = SearchRequest::new(Query::Text("x".into()), vec![Strategy::Fts]);
        request.filters = Some(serde_json::json!({"val": {"$gt": 10}}));

        let stream = retriever.retrieve_systematic(&request, 3);
        tokio::pin!(stream);
        let mut yielded = Vec::new();
        while let Some(hit) = stream.next().await {
            yielded.push(hit.unwrap());
        }

        assert_eq!(yielded.len(), 3);
        assert_eq!(yielded[0].doc_id, "p0_1"); // val=15
        assert_eq!(yielded[1].doc_id, "p2_0"); // val=20
        assert_eq!(yielded[2].doc_id, "p2_1"); // val=30
    }
}
