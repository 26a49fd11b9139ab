//! In-memory family graph built once per session from flat service records.
//!
//! Nodes live in arenas addressed by [`PersonKey`] / [`EventKey`]. Links
//! between people are keys rather than references, which keeps the
//! mother/father/spouse/children cross-links acyclic in ownership terms and
//! makes memoization and cycle detection during resolution explicit.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    classify::{classify, BucketKey, Gender, Side},
    error::FamilyDataError,
    models::{EventRecord, PersonRecord},
};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a person node. Only valid for the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonKey {
    graph: u64,
    index: usize,
}

/// Handle to an event node. Only valid for the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKey {
    graph: u64,
    index: usize,
}

/// Life-event category, stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventType(String);

impl EventType {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct PersonNode {
    person_id: String,
    first_name: String,
    last_name: String,
    gender: Gender,
    side: Side,
    mother: Option<PersonKey>,
    father: Option<PersonKey>,
    spouse: Option<PersonKey>,
    children: Vec<PersonKey>,
    events: Vec<EventKey>,
}

impl PersonNode {
    fn new(
        record: &PersonRecord,
        side: Side,
        mother: Option<PersonKey>,
        father: Option<PersonKey>,
    ) -> Self {
        Self {
            person_id: record.person_id.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            gender: record.gender,
            side,
            mother,
            father,
            spouse: None,
            children: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn person_id(&self) -> &str {
        &self.person_id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn bucket(&self) -> BucketKey {
        classify(self.side, self.gender)
    }

    pub fn mother(&self) -> Option<PersonKey> {
        self.mother
    }

    pub fn father(&self) -> Option<PersonKey> {
        self.father
    }

    pub fn spouse(&self) -> Option<PersonKey> {
        self.spouse
    }

    pub fn children(&self) -> &[PersonKey] {
        &self.children
    }

    /// Events in the order they were attached.
    pub fn events(&self) -> &[EventKey] {
        &self.events
    }
}

#[derive(Debug, Clone)]
pub struct EventNode {
    event_id: String,
    person: PersonKey,
    latitude: f64,
    longitude: f64,
    country: String,
    city: String,
    event_type: EventType,
    year: i32,
}

impl EventNode {
    fn new(record: &EventRecord, person: PersonKey) -> Self {
        Self {
            event_id: record.event_id.clone(),
            person,
            latitude: record.latitude,
            longitude: record.longitude,
            country: record.country.clone(),
            city: record.city.clone(),
            event_type: EventType::new(&record.event_type),
            year: record.year,
        }
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn person(&self) -> PersonKey {
        self.person
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// "BIRTH: Provo, USA (2000)"
    pub fn description(&self) -> String {
        format!(
            "{}: {}, {} ({})",
            self.event_type, self.city, self.country, self.year
        )
    }
}

#[derive(Debug, Clone)]
pub struct FamilyGraph {
    id: u64,
    root: PersonKey,
    user_spouse: Option<PersonKey>,
    persons: Vec<PersonNode>,
    events: Vec<EventNode>,
    person_index: HashMap<String, PersonKey>,
    event_index: HashMap<String, EventKey>,
    ancestor_buckets: [Vec<PersonKey>; 6],
    event_buckets: [Vec<EventKey>; 6],
    event_types: BTreeSet<EventType>,
}

impl FamilyGraph {
    /// Links the person records around `root_id`, then attaches every event.
    ///
    /// Fails without exposing any partial graph if the root is missing, an
    /// event names an unknown person, or the ancestry is malformed.
    pub fn build(
        root_id: &str,
        persons: &[PersonRecord],
        events: &[EventRecord],
    ) -> Result<Self, FamilyDataError> {
        let mut builder = GraphBuilder::new(persons)?;
        let root = builder.resolve_root(root_id)?;
        let mut graph = builder.finish(root);

        for record in events {
            graph.attach_event(record)?;
        }

        info!(
            root_id = %root_id,
            persons = graph.persons.len(),
            events = graph.events.len(),
            event_types = graph.event_types.len(),
            "Family graph built"
        );

        Ok(graph)
    }

    fn attach_event(&mut self, record: &EventRecord) -> Result<(), FamilyDataError> {
        let Some(person) = self.person_index.get(&record.person_id).copied() else {
            return Err(FamilyDataError::EventOwnerNotFound {
                event_id: record.event_id.clone(),
                person_id: record.person_id.clone(),
            });
        };
        if self.event_index.contains_key(&record.event_id) {
            return Err(FamilyDataError::DuplicateEvent {
                event_id: record.event_id.clone(),
            });
        }

        let key = EventKey {
            graph: self.id,
            index: self.events.len(),
        };
        let node = EventNode::new(record, person);
        self.event_types.insert(node.event_type.clone());
        self.events.push(node);

        let owner = &mut self.persons[person.index];
        owner.events.push(key);
        self.event_buckets[owner.bucket().index()].push(key);
        self.event_index.insert(record.event_id.clone(), key);
        Ok(())
    }

    pub fn root(&self) -> PersonKey {
        self.root
    }

    pub fn user_spouse(&self) -> Option<PersonKey> {
        self.user_spouse
    }

    /// Panics if `key` was issued by a different graph.
    pub fn person(&self, key: PersonKey) -> &PersonNode {
        assert_eq!(
            key.graph, self.id,
            "person handle {key:?} does not belong to graph {}",
            self.id
        );
        &self.persons[key.index]
    }

    /// Panics if `key` was issued by a different graph.
    pub fn event(&self, key: EventKey) -> &EventNode {
        assert_eq!(
            key.graph, self.id,
            "event handle {key:?} does not belong to graph {}",
            self.id
        );
        &self.events[key.index]
    }

    pub fn find_person(&self, person_id: &str) -> Option<PersonKey> {
        self.person_index.get(person_id).copied()
    }

    pub fn find_event(&self, event_id: &str) -> Option<EventKey> {
        self.event_index.get(event_id).copied()
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Ancestors in one (side, gender) bucket. Immediate buckets are empty;
    /// the user and spouse are reached through [`Self::root`] and
    /// [`Self::user_spouse`].
    pub fn ancestors_in(&self, bucket: BucketKey) -> &[PersonKey] {
        &self.ancestor_buckets[bucket.index()]
    }

    pub fn events_in(&self, bucket: BucketKey) -> &[EventKey] {
        &self.event_buckets[bucket.index()]
    }

    /// Distinct event categories, sorted.
    pub fn event_types(&self) -> &BTreeSet<EventType> {
        &self.event_types
    }

    pub fn event_bucket(&self, key: EventKey) -> BucketKey {
        self.person(self.event(key).person).bucket()
    }

    /// Minimum-year event; ties go to the earliest attached.
    pub fn earliest_event(&self, person: PersonKey) -> Option<EventKey> {
        self.person(person)
            .events
            .iter()
            .copied()
            .min_by_key(|key| self.events[key.index].year)
    }

    /// The person's events ordered by year, ties kept in attach order.
    pub fn life_events(&self, person: PersonKey) -> Vec<EventKey> {
        let mut events = self.person(person).events.clone();
        events.sort_by_key(|key| self.events[key.index].year);
        events
    }
}

enum Visit<'a> {
    Enter(&'a PersonRecord),
    Exit(&'a PersonRecord),
}

struct GraphBuilder<'a> {
    id: u64,
    records: HashMap<&'a str, &'a PersonRecord>,
    persons: Vec<PersonNode>,
    resolved: HashMap<&'a str, PersonKey>,
    resolving: HashSet<&'a str>,
    ancestor_buckets: [Vec<PersonKey>; 6],
    user_spouse: Option<PersonKey>,
}

impl<'a> GraphBuilder<'a> {
    fn new(persons: &'a [PersonRecord]) -> Result<Self, FamilyDataError> {
        let mut records = HashMap::with_capacity(persons.len());
        for record in persons {
            if records.insert(record.person_id.as_str(), record).is_some() {
                return Err(FamilyDataError::DuplicatePerson {
                    person_id: record.person_id.clone(),
                });
            }
        }

        Ok(Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            records,
            persons: Vec::with_capacity(persons.len()),
            resolved: HashMap::new(),
            resolving: HashSet::new(),
            ancestor_buckets: Default::default(),
            user_spouse: None,
        })
    }

    fn lookup(&self, person_id: Option<&str>) -> Option<&'a PersonRecord> {
        person_id.and_then(|id| self.records.get(id).copied())
    }

    fn resolve_root(&mut self, root_id: &str) -> Result<PersonKey, FamilyDataError> {
        let Some(record) = self.records.get(root_id).copied() else {
            return Err(FamilyDataError::PersonNotFound {
                person_id: root_id.to_string(),
            });
        };
        check_self_reference(record)?;

        let id = record.person_id.as_str();
        self.resolving.insert(id);
        let mother = self
            .lookup(record.mother_id.as_deref())
            .map(|parent| self.resolve_ancestor(parent, Side::MotherSide))
            .transpose()?;
        let father = self
            .lookup(record.father_id.as_deref())
            .map(|parent| self.resolve_ancestor(parent, Side::FatherSide))
            .transpose()?;
        let root = self.push_person(record, Side::Immediate, mother, father)?;
        self.resolving.remove(id);
        self.resolved.insert(id, root);

        if let Some(spouse) = self.lookup(record.spouse_id.as_deref()) {
            if self.resolved.contains_key(spouse.person_id.as_str()) {
                return Err(FamilyDataError::SpouseIsAncestor {
                    person_id: spouse.person_id.clone(),
                });
            }
            let key = self.push_person(spouse, Side::Immediate, None, None)?;
            self.link_spouses(root, key);
            self.resolved.insert(spouse.person_id.as_str(), key);
            self.user_spouse = Some(key);
        } else if let Some(spouse_id) = &record.spouse_id {
            debug!(spouse_id = %spouse_id, "User spouse record not present; skipping");
        }

        Ok(root)
    }

    /// Parents are resolved before the child so every node is linked to its
    /// full ancestry when created. A parent id missing from the records ends
    /// that branch.
    ///
    /// Walks an explicit stack in post order, so ancestry depth is bounded by
    /// the heap rather than the thread stack. `resolving` holds the persons
    /// whose parents are still pending; meeting one of them again is a cycle.
    fn resolve_ancestor(
        &mut self,
        start: &'a PersonRecord,
        side: Side,
    ) -> Result<PersonKey, FamilyDataError> {
        let mut stack = vec![Visit::Enter(start)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(record) => {
                    let id = record.person_id.as_str();
                    if self.resolved.contains_key(id) {
                        continue;
                    }
                    if !self.resolving.insert(id) {
                        return Err(FamilyDataError::CyclicAncestry {
                            person_id: id.to_string(),
                        });
                    }
                    check_self_reference(record)?;

                    stack.push(Visit::Exit(record));
                    // Pushed father first so the mother's branch resolves first.
                    let parents = [
                        self.lookup(record.father_id.as_deref()),
                        self.lookup(record.mother_id.as_deref()),
                    ];
                    for parent in parents.into_iter().flatten() {
                        if !self.resolved.contains_key(parent.person_id.as_str()) {
                            stack.push(Visit::Enter(parent));
                        }
                    }
                }
                Visit::Exit(record) => {
                    let mother = self.resolved_parent(record.mother_id.as_deref());
                    let father = self.resolved_parent(record.father_id.as_deref());
                    let key = self.push_person(record, side, mother, father)?;
                    self.ancestor_buckets[classify(side, record.gender).index()].push(key);

                    let id = record.person_id.as_str();
                    self.resolving.remove(id);
                    self.resolved.insert(id, key);
                }
            }
        }

        self.resolved
            .get(start.person_id.as_str())
            .copied()
            .ok_or_else(|| FamilyDataError::PersonNotFound {
                person_id: start.person_id.clone(),
            })
    }

    fn resolved_parent(&self, person_id: Option<&str>) -> Option<PersonKey> {
        self.lookup(person_id)
            .and_then(|record| self.resolved.get(record.person_id.as_str()).copied())
    }

    fn push_person(
        &mut self,
        record: &PersonRecord,
        side: Side,
        mother: Option<PersonKey>,
        father: Option<PersonKey>,
    ) -> Result<PersonKey, FamilyDataError> {
        if mother.is_some() && mother == father {
            return Err(FamilyDataError::IdenticalParents {
                person_id: record.person_id.clone(),
            });
        }

        let key = PersonKey {
            graph: self.id,
            index: self.persons.len(),
        };
        self.persons.push(PersonNode::new(record, side, mother, father));

        if let (Some(mother), Some(father)) = (mother, father) {
            self.link_spouses(mother, father);
        }
        for parent in [father, mother].into_iter().flatten() {
            self.persons[parent.index].children.push(key);
        }
        Ok(key)
    }

    /// Keeps spouse links symmetric: a previous partner of either side is
    /// unlinked first.
    fn link_spouses(&mut self, a: PersonKey, b: PersonKey) {
        for (person, partner) in [(a, b), (b, a)] {
            if let Some(previous) = self.persons[person.index].spouse {
                if previous != partner {
                    self.persons[previous.index].spouse = None;
                }
            }
        }
        self.persons[a.index].spouse = Some(b);
        self.persons[b.index].spouse = Some(a);
    }

    fn finish(self, root: PersonKey) -> FamilyGraph {
        let person_index = self
            .resolved
            .iter()
            .map(|(id, key)| ((*id).to_string(), *key))
            .collect();

        FamilyGraph {
            id: self.id,
            root,
            user_spouse: self.user_spouse,
            persons: self.persons,
            events: Vec::new(),
            person_index,
            event_index: HashMap::new(),
            ancestor_buckets: self.ancestor_buckets,
            event_buckets: Default::default(),
            event_types: BTreeSet::new(),
        }
    }
}

fn check_self_reference(record: &PersonRecord) -> Result<(), FamilyDataError> {
    let id = record.person_id.as_str();
    let relations = [
        ("mother", record.mother_id.as_deref()),
        ("father", record.father_id.as_deref()),
        ("spouse", record.spouse_id.as_deref()),
    ];
    for (relation, target) in relations {
        if target == Some(id) {
            return Err(FamilyDataError::SelfReference {
                person_id: id.to_string(),
                relation,
            });
        }
    }
    Ok(())
}
