//! Per-login state: the opaque auth token, the user's person id, the family
//! graph, and the current filters.
//!
//! A session only exists once a graph has been built, so queries can never
//! run against an unloaded graph. Logging out drops the session.

use tracing::{info, warn};

use crate::{
    error::FamilyDataError,
    filters::FilterSettings,
    graph::FamilyGraph,
    lines::{lines_for_event, MapLine},
    models::{EventRecord, EventView, PersonDetail, PersonRecord, PersonView, SearchResults},
    palette::{EventPalette, EventTypeHue},
    query,
};

#[derive(Debug, Clone)]
pub struct Session {
    auth_token: String,
    person_id: String,
    graph: FamilyGraph,
    palette: EventPalette,
    filters: FilterSettings,
}

impl Session {
    pub fn open(
        auth_token: impl Into<String>,
        person_id: impl Into<String>,
        persons: &[PersonRecord],
        events: &[EventRecord],
        filters: FilterSettings,
    ) -> Result<Self, FamilyDataError> {
        let person_id = person_id.into();
        let graph = FamilyGraph::build(&person_id, persons, events).inspect_err(|err| {
            warn!(person_id = %person_id, "Rejected family data: {err}");
        })?;
        let palette = EventPalette::new(graph.event_types());

        Ok(Self {
            auth_token: auth_token.into(),
            person_id,
            graph,
            palette,
            filters,
        })
    }

    /// Replaces the whole graph. On failure the previous graph stays in place.
    pub fn reload(
        &mut self,
        persons: &[PersonRecord],
        events: &[EventRecord],
    ) -> Result<(), FamilyDataError> {
        let graph = FamilyGraph::build(&self.person_id, persons, events).inspect_err(|err| {
            warn!(person_id = %self.person_id, "Rejected family reload: {err}");
        })?;
        self.palette = EventPalette::new(graph.event_types());
        self.graph = graph;
        Ok(())
    }

    /// Logout. Consumes the session and everything it references.
    pub fn clear(self) {
        info!(
            person_id = %self.person_id,
            persons = self.graph.person_count(),
            "Session cleared"
        );
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn person_id(&self) -> &str {
        &self.person_id
    }

    pub fn first_name(&self) -> &str {
        self.graph.person(self.graph.root()).first_name()
    }

    pub fn last_name(&self) -> &str {
        self.graph.person(self.graph.root()).last_name()
    }

    pub fn graph(&self) -> &FamilyGraph {
        &self.graph
    }

    pub fn filters(&self) -> FilterSettings {
        self.filters
    }

    pub fn set_filters(&mut self, filters: FilterSettings) {
        self.filters = filters;
    }

    pub fn event_types(&self) -> Vec<EventTypeHue> {
        self.palette.entries().to_vec()
    }

    pub fn people(&self) -> Vec<PersonView> {
        query::enabled_people(&self.graph, &self.filters)
            .into_iter()
            .map(|key| query::person_view(&self.graph, key))
            .collect()
    }

    pub fn events(&self) -> Vec<EventView> {
        query::enabled_events(&self.graph, &self.filters)
            .into_iter()
            .map(|key| query::event_view(&self.graph, key))
            .collect()
    }

    pub fn search(&self, text: &str) -> SearchResults {
        query::search(&self.graph, &self.filters, text)
    }

    pub fn person_detail(&self, person_id: &str) -> Option<PersonDetail> {
        let key = self.graph.find_person(person_id)?;
        Some(query::person_detail(&self.graph, &self.filters, key))
    }

    /// `None` when the event id is unknown to this session.
    pub fn lines_for_event(&self, event_id: &str) -> Option<Vec<MapLine>> {
        let focus = self.graph.find_event(event_id)?;
        Some(lines_for_event(&self.graph, &self.filters, focus))
    }
}
