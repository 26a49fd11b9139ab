use crate::{
    classify::BucketKey,
    filters::FilterSettings,
    graph::{EventKey, FamilyGraph, PersonKey},
    models::{EventView, FamilyMemberView, PersonDetail, PersonView, Relation, SearchResults},
};

/// People visible under `filters`: the user, the user's spouse, then the
/// enabled ancestor buckets.
pub fn enabled_people(graph: &FamilyGraph, filters: &FilterSettings) -> Vec<PersonKey> {
    let mut people = vec![graph.root()];
    people.extend(graph.user_spouse());
    for bucket in BucketKey::ANCESTORS {
        if bucket.person_enabled(filters) {
            people.extend_from_slice(graph.ancestors_in(bucket));
        }
    }
    people
}

pub fn enabled_events(graph: &FamilyGraph, filters: &FilterSettings) -> Vec<EventKey> {
    let mut events = Vec::new();
    for bucket in BucketKey::ALL {
        if bucket.events_enabled(filters) {
            events.extend_from_slice(graph.events_in(bucket));
        }
    }
    events
}

pub fn is_event_enabled(graph: &FamilyGraph, filters: &FilterSettings, event: EventKey) -> bool {
    graph.event_bucket(event).events_enabled(filters)
}

/// Case-insensitive substring match on full names, sorted by last then first
/// name.
pub fn search_people(graph: &FamilyGraph, filters: &FilterSettings, query: &str) -> Vec<PersonKey> {
    let needle = query.to_lowercase();
    let mut found: Vec<PersonKey> = enabled_people(graph, filters)
        .into_iter()
        .filter(|key| graph.person(*key).full_name().to_lowercase().contains(&needle))
        .collect();
    found.sort_by_cached_key(|key| {
        let person = graph.person(*key);
        format!("{} {}", person.last_name(), person.first_name()).to_lowercase()
    });
    found
}

/// Case-insensitive substring match on event descriptions, sorted by year.
pub fn search_events(graph: &FamilyGraph, filters: &FilterSettings, query: &str) -> Vec<EventKey> {
    let needle = query.to_lowercase();
    let mut found: Vec<EventKey> = enabled_events(graph, filters)
        .into_iter()
        .filter(|key| graph.event(*key).description().to_lowercase().contains(&needle))
        .collect();
    found.sort_by_key(|key| graph.event(*key).year());
    found
}

pub fn search(graph: &FamilyGraph, filters: &FilterSettings, query: &str) -> SearchResults {
    SearchResults {
        query: query.to_string(),
        people: search_people(graph, filters, query)
            .into_iter()
            .map(|key| person_view(graph, key))
            .collect(),
        events: search_events(graph, filters, query)
            .into_iter()
            .map(|key| event_view(graph, key))
            .collect(),
    }
}

pub fn person_detail(graph: &FamilyGraph, filters: &FilterSettings, key: PersonKey) -> PersonDetail {
    let person = graph.person(key);

    let life_events = if person.bucket().events_enabled(filters) {
        graph
            .life_events(key)
            .into_iter()
            .map(|event| event_view(graph, event))
            .collect()
    } else {
        Vec::new()
    };

    let mut family = Vec::new();
    let relatives = [
        (Relation::Father, person.father()),
        (Relation::Mother, person.mother()),
        (Relation::Spouse, person.spouse()),
    ];
    for (relation, relative) in relatives {
        if let Some(relative) = relative {
            family.push(member_view(graph, relation, relative));
        }
    }
    for child in person.children() {
        family.push(member_view(graph, Relation::Child, *child));
    }

    PersonDetail {
        person: person_view(graph, key),
        life_events,
        family,
    }
}

fn member_view(graph: &FamilyGraph, relation: Relation, key: PersonKey) -> FamilyMemberView {
    FamilyMemberView {
        relation,
        title: relation.title(),
        person: person_view(graph, key),
    }
}

pub fn person_view(graph: &FamilyGraph, key: PersonKey) -> PersonView {
    let person = graph.person(key);
    PersonView {
        person_id: person.person_id().to_string(),
        first_name: person.first_name().to_string(),
        last_name: person.last_name().to_string(),
        full_name: person.full_name(),
        gender: person.gender(),
        gender_label: person.gender().label(),
        side: person.side(),
    }
}

pub fn event_view(graph: &FamilyGraph, key: EventKey) -> EventView {
    let event = graph.event(key);
    let owner = graph.person(event.person());
    EventView {
        event_id: event.event_id().to_string(),
        person_id: owner.person_id().to_string(),
        person_name: owner.full_name(),
        latitude: event.latitude(),
        longitude: event.longitude(),
        country: event.country().to_string(),
        city: event.city().to_string(),
        event_type: event.event_type().to_string(),
        year: event.year(),
        description: event.description(),
    }
}
