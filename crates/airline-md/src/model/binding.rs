//! List binding: search, filter and sort state feeding a list view.
//!
//! A [`ListBinding`] owns the query state of the airline list and re-reads
//! from the [`EntityService`] whenever that state changes. Responses are
//! delivered into the bound [`ListView`]; a response overtaken by a newer
//! request is discarded.

use std::cmp::Ordering as CmpOrdering;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use airline_md_core::logging::targets;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use super::entity::{Airline, AirlineKey};
use super::list_view::{ListItem, ListView};
use crate::service::EntityService;

/// Comparison applied by a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Case-insensitive substring match.
    Contains,
    /// Exact match.
    Eq,
    /// Case-insensitive prefix match.
    StartsWith,
}

/// A condition on one airline property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub property: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl Filter {
    pub fn new(
        property: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            property: property.into(),
            operator,
            value: value.into(),
        }
    }

    /// Returns true if `airline` satisfies this filter. Unknown properties
    /// never match.
    pub fn matches(&self, airline: &Airline) -> bool {
        let Some(actual) = airline.property(&self.property) else {
            return false;
        };
        match self.operator {
            FilterOperator::Contains => actual.to_lowercase().contains(&self.value.to_lowercase()),
            FilterOperator::Eq => actual == self.value,
            FilterOperator::StartsWith => {
                actual.to_lowercase().starts_with(&self.value.to_lowercase())
            }
        }
    }
}

/// Property a list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    AirlineName,
    #[serde(rename = "AirlineID")]
    AirlineId,
    Currency,
}

impl SortKey {
    /// The value of this key on `airline`.
    pub fn value(self, airline: &Airline) -> &str {
        match self {
            Self::AirlineName => &airline.airline_name,
            Self::AirlineId => &airline.airline_id,
            Self::Currency => &airline.currency,
        }
    }

    fn compare(self, a: &Airline, b: &Airline) -> CmpOrdering {
        self.value(a).cmp(self.value(b))
    }
}

/// Sort order of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sorter {
    pub key: SortKey,
    pub descending: bool,
}

impl Sorter {
    pub fn new(key: SortKey, descending: bool) -> Self {
        Self { key, descending }
    }

    /// Orders two airlines; ties fall back to the airline ID.
    pub fn compare(&self, a: &Airline, b: &Airline) -> CmpOrdering {
        let ordering = self
            .key
            .compare(a, b)
            .then_with(|| a.airline_id.cmp(&b.airline_id));
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Search and filter conditions applied together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilterState {
    /// Conditions from the search field.
    pub search: Vec<Filter>,
    /// Conditions from the filter settings.
    pub filters: Vec<Filter>,
}

impl ListFilterState {
    /// All conditions, search first.
    pub fn combined(&self) -> Vec<Filter> {
        self.search.iter().chain(self.filters.iter()).cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.filters.is_empty()
    }
}

/// What a service read of the airline list should return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirlineQuery {
    /// All filters must match.
    pub filters: Vec<Filter>,
    pub sorter: Sorter,
    /// Groups ascend by this key before `sorter` applies within a group.
    pub group_by: Option<SortKey>,
}

impl AirlineQuery {
    /// Applies the query to `airlines`, in place.
    pub fn apply(&self, airlines: &mut Vec<Airline>) {
        airlines.retain(|airline| self.filters.iter().all(|f| f.matches(airline)));
        airlines.sort_by(|a, b| {
            let group = match self.group_by {
                Some(key) => key.compare(a, b),
                None => CmpOrdering::Equal,
            };
            group.then_with(|| self.sorter.compare(a, b))
        });
    }
}

/// Header of one group of consecutive rows sharing a group value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHeader {
    /// The shared value, shown as is.
    pub title: String,
    pub first_row: usize,
    pub count: usize,
}

/// Splits `airlines` into runs of equal `key` values.
pub fn group_headers(airlines: &[Airline], key: SortKey) -> Vec<GroupHeader> {
    let mut headers: Vec<GroupHeader> = Vec::new();
    for (row, airline) in airlines.iter().enumerate() {
        let value = key.value(airline);
        match headers.last_mut() {
            Some(header) if header.title == value => header.count += 1,
            _ => headers.push(GroupHeader {
                title: value.to_string(),
                first_row: row,
                count: 1,
            }),
        }
    }
    headers
}

/// Which "no data" text the list should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDataText {
    /// Nothing to show at all.
    Default,
    /// Nothing matches the active search or filters.
    WithFilterOrSearch,
}

struct BindingState {
    filter_state: ListFilterState,
    sorter: Sorter,
    group_by: Option<SortKey>,
}

/// Binds the airline list of a [`ListView`] to an [`EntityService`].
pub struct ListBinding {
    service: Arc<dyn EntityService>,
    list: Arc<ListView>,
    key: AirlineKey,
    search_property: String,
    state: Mutex<BindingState>,
    /// Airlines behind the displayed items, in display order.
    contexts: Arc<RwLock<Vec<Airline>>>,
    groups: Arc<RwLock<Vec<GroupHeader>>>,
    /// Generation of the latest request; older responses are dropped.
    generation: Arc<AtomicU64>,
}

impl ListBinding {
    pub fn new(
        service: Arc<dyn EntityService>,
        list: Arc<ListView>,
        key: AirlineKey,
        search_property: impl Into<String>,
        sorter: Sorter,
    ) -> Self {
        Self {
            service,
            list,
            key,
            search_property: search_property.into(),
            state: Mutex::new(BindingState {
                filter_state: ListFilterState::default(),
                sorter,
                group_by: None,
            }),
            contexts: Arc::new(RwLock::new(Vec::new())),
            groups: Arc::new(RwLock::new(Vec::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn list(&self) -> &Arc<ListView> {
        &self.list
    }

    /// Starts grouped by `group_by`.
    pub fn with_group_by(mut self, group_by: Option<SortKey>) -> Self {
        self.state.get_mut().group_by = group_by;
        self
    }

    pub fn filter_state(&self) -> ListFilterState {
        self.state.lock().filter_state.clone()
    }

    pub fn key(&self) -> &AirlineKey {
        &self.key
    }

    pub fn sorter(&self) -> Sorter {
        self.state.lock().sorter
    }

    pub fn group_by(&self) -> Option<SortKey> {
        self.state.lock().group_by
    }

    /// Group headers of the displayed items; empty when not grouped.
    pub fn groups(&self) -> Vec<GroupHeader> {
        self.groups.read().clone()
    }

    /// Applies a search query; an empty query removes the search.
    pub fn search(&self, query: &str) {
        {
            let mut state = self.state.lock();
            state.filter_state.search = if query.is_empty() {
                Vec::new()
            } else {
                vec![Filter::new(
                    self.search_property.as_str(),
                    FilterOperator::Contains,
                    query,
                )]
            };
        }
        self.refresh();
    }

    /// Replaces the filter conditions, keeping the search.
    pub fn filter(&self, filters: Vec<Filter>) {
        self.state.lock().filter_state.filters = filters;
        self.refresh();
    }

    pub fn sort(&self, sorter: Sorter) {
        self.state.lock().sorter = sorter;
        self.refresh();
    }

    /// Sets sort order and grouping with a single re-read.
    pub fn sort_group(&self, sorter: Sorter, group_by: Option<SortKey>) {
        {
            let mut state = self.state.lock();
            state.sorter = sorter;
            state.group_by = group_by;
        }
        self.refresh();
    }

    /// Re-reads the list with the current search, filter and sort state.
    pub fn refresh(&self) {
        let query = {
            let state = self.state.lock();
            AirlineQuery {
                filters: state.filter_state.combined(),
                sorter: state.sorter,
                group_by: state.group_by,
            }
        };
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(target: targets::LIST, generation, filters = query.filters.len(), "reading airline list");

        let list = self.list.clone();
        let key = self.key.clone();
        let group_by = query.group_by;
        let contexts = self.contexts.clone();
        let groups = self.groups.clone();
        let latest = self.generation.clone();
        self.service.read_airlines(
            &query,
            Box::new(move |result| {
                if latest.load(Ordering::SeqCst) != generation {
                    tracing::debug!(target: targets::LIST, generation, "dropping stale list response");
                    return;
                }
                match result {
                    Ok(airlines) => {
                        let items = airlines
                            .iter()
                            .map(|airline| {
                                let path = key.path_of(airline);
                                ListItem::new(airline.airline_name.clone(), Some(path))
                            })
                            .collect();
                        *groups.write() = match group_by {
                            Some(group_key) => group_headers(&airlines, group_key),
                            None => Vec::new(),
                        };
                        *contexts.write() = airlines;
                        list.receive_data(items, true);
                    }
                    Err(err) => {
                        tracing::warn!(target: targets::LIST, error = %err, "airline list could not be read");
                        contexts.write().clear();
                        groups.write().clear();
                        list.receive_data(Vec::new(), false);
                    }
                }
            }),
        );
    }

    /// The airline an item displays.
    pub fn context(&self, item: &ListItem) -> Option<Airline> {
        let path = item.bound_path()?;
        self.contexts
            .read()
            .iter()
            .find(|airline| self.key.path_of(airline) == *path)
            .cloned()
    }

    /// The "no data" text matching the current state.
    pub fn no_data_text(&self) -> NoDataText {
        if self.state.lock().filter_state.is_empty() {
            NoDataText::Default
        } else {
            NoDataText::WithFilterOrSearch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airlines() -> Vec<Airline> {
        vec![
            Airline::new("LH", "Lufthansa", "EUR"),
            Airline::new("AA", "American Airlines", "USD"),
            Airline::new("AF", "Air France", "EUR"),
        ]
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let filter = Filter::new("AirlineName", FilterOperator::Contains, "AIR");
        let names: Vec<_> = airlines()
            .into_iter()
            .filter(|a| filter.matches(a))
            .map(|a| a.airline_id)
            .collect();
        assert_eq!(names, vec!["AA", "AF"]);
    }

    #[test]
    fn test_unknown_property_never_matches() {
        let filter = Filter::new("Nope", FilterOperator::Eq, "LH");
        assert!(!filter.matches(&airlines()[0]));
    }

    #[test]
    fn test_query_filters_and_sorts() {
        let mut list = airlines();
        let query = AirlineQuery {
            filters: vec![Filter::new("Currency", FilterOperator::Eq, "EUR")],
            sorter: Sorter::new(SortKey::AirlineName, true),
            group_by: None,
        };
        query.apply(&mut list);

        let ids: Vec<_> = list.iter().map(|a| a.airline_id.as_str()).collect();
        assert_eq!(ids, vec!["LH", "AF"]);
    }

    #[test]
    fn test_filter_state_combines_search_first() {
        let state = ListFilterState {
            search: vec![Filter::new("AirlineName", FilterOperator::Contains, "a")],
            filters: vec![Filter::new("Currency", FilterOperator::Eq, "USD")],
        };
        let combined = state.combined();
        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].property, "AirlineName");
        assert!(!state.is_empty());
        assert!(ListFilterState::default().is_empty());
    }

    #[test]
    fn test_grouping_orders_groups_first() {
        let mut list = airlines();
        list.push(Airline::new("UA", "United Airlines", "USD"));
        let query = AirlineQuery {
            filters: Vec::new(),
            sorter: Sorter::new(SortKey::AirlineName, true),
            group_by: Some(SortKey::Currency),
        };
        query.apply(&mut list);

        let ids: Vec<_> = list.iter().map(|a| a.airline_id.as_str()).collect();
        assert_eq!(ids, vec!["LH", "AF", "UA", "AA"]);
        assert_eq!(
            group_headers(&list, SortKey::Currency),
            vec![
                GroupHeader {
                    title: "EUR".into(),
                    first_row: 0,
                    count: 2
                },
                GroupHeader {
                    title: "USD".into(),
                    first_row: 2,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_items_are_bound_by_airline_key() {
        use crate::model::ListHandle;
        use crate::service::InMemoryService;
        use airline_md_core::SharedTaskQueue;

        let queue = SharedTaskQueue::new();
        let key = AirlineKey::new("CarrierSet", "AirlineID");
        let service = Arc::new(
            InMemoryService::with_data(queue.clone(), airlines(), Vec::new()).with_key(key.clone()),
        );
        let list = Arc::new(ListView::new());
        let binding = ListBinding::new(service, list.clone(), key, "AirlineName", Sorter::default());

        binding.sort_group(Sorter::default(), Some(SortKey::Currency));
        queue.process_all();

        let first = list.items()[0].clone();
        assert_eq!(first.bound_path().unwrap(), "/CarrierSet('AF')");
        assert_eq!(binding.context(&first).unwrap().airline_name, "Air France");
        assert_eq!(binding.groups().len(), 2);
    }
}
