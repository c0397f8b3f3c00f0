use std::sync::Arc;

use async_trait::async_trait;
use contactbook_signals::{task::Spawner, Mut, Peek, Read};
use tracing::{debug, warn};

use crate::{config::Config, error::ServiceError, traits::SearchService, types::Contact};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState<T> {
    Loading,
    Empty,
    Populated(Vec<T>),
    Error(String),
}

/// Type-ahead search: distinct terms, debounced, with only the newest search kept alive.
///
/// `results` emits `None` for an empty term, then for every other term `Loading` followed by the
/// outcome. A search that is superseded before it completes is abandoned and never reported.
pub struct Search<T>
where T: Clone + Send + Sync + 'static
{
    query: Mut<String>,
    results: Read<Option<SearchState<T>>>,
}

impl<T> Search<T>
where T: Clone + Send + Sync + 'static
{
    /// Must be called within a tokio runtime
    pub fn new<S>(service: Arc<S>, config: &Config) -> Self
    where S: SearchService<Item = T> {
        let query = Mut::cold();
        let latency = config.search_latency;
        let spawner = Spawner::current();
        let results = query.read().distinct().debounce(config.search_debounce).switch_latest(move |term: String| {
            if term.is_empty() {
                return Read::once(None);
            }
            debug!("searching for {term:?}");
            let service = service.clone();
            Read::from_future_on(&spawner, async move {
                let result = service.search(&term).await;
                tokio::time::sleep(latency).await;
                Some(match result {
                    Ok(items) if items.is_empty() => SearchState::Empty,
                    Ok(items) => SearchState::Populated(items),
                    Err(err) => {
                        warn!("search for {term:?} failed: {err}");
                        SearchState::Error(err.message)
                    }
                })
            })
            .start_with(Some(SearchState::Loading))
        });
        Self { query, results }
    }

    pub fn set_query(&self, text: impl Into<String>) { self.query.set(text.into()); }

    pub fn results(&self) -> Read<Option<SearchState<T>>> { self.results.clone() }

    pub fn dispose(&self) { self.query.close(); }
}

/// Searches a live contact list by name prefix
pub struct ContactSearch {
    items: Read<Vec<Contact>>,
}

impl ContactSearch {
    pub fn new(items: Read<Vec<Contact>>) -> Self { Self { items } }
}

#[async_trait]
impl SearchService for ContactSearch {
    type Item = Contact;

    async fn search(&self, term: &str) -> Result<Vec<Contact>, ServiceError> {
        let Some(items) = self.items.peek() else { return Err(ServiceError::new("unavailable", "contacts are not loaded yet")) };
        Ok(items.into_iter().filter(|contact| contact.matches(term)).collect())
    }
}
