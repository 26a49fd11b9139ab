//! Connector lines drawn from a focus event: spouse, ancestor chain, and life
//! story.

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    filters::FilterSettings,
    graph::{EventKey, FamilyGraph, PersonKey},
    query::is_event_enabled,
};

pub const BASE_LINE_WIDTH: f32 = 12.0;
pub const LINE_WIDTH_DECREMENT: f32 = 3.0;
pub const MIN_LINE_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Spouse,
    Ancestor,
    LifeStory,
}

impl LineKind {
    pub fn color(&self) -> &'static str {
        match self {
            Self::Spouse => "#FF0000",
            Self::Ancestor => "#00FF00",
            Self::LifeStory => "#0000FF",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapLine {
    pub kind: LineKind,
    pub color: &'static str,
    pub width: f32,
    pub points: Vec<Coordinate>,
}

impl MapLine {
    fn new(kind: LineKind, width: f32, points: Vec<Coordinate>) -> Self {
        Self {
            kind,
            color: kind.color(),
            width,
            points,
        }
    }
}

fn coordinate(graph: &FamilyGraph, key: EventKey) -> Coordinate {
    let event = graph.event(key);
    Coordinate {
        latitude: event.latitude(),
        longitude: event.longitude(),
    }
}

/// All line families enabled in `filters`, spouse first, then ancestors, then
/// the life story. Disabled families are not computed.
///
/// Panics if `focus` does not belong to `graph`.
pub fn lines_for_event(graph: &FamilyGraph, filters: &FilterSettings, focus: EventKey) -> Vec<MapLine> {
    let mut lines = Vec::new();
    if filters.show_spouse_line {
        lines.extend(spouse_line(graph, filters, focus));
    }
    if filters.show_ancestor_lines {
        lines.extend(ancestor_lines(graph, filters, focus));
    }
    if filters.show_life_story_line {
        lines.extend(life_story_line(graph, focus));
    }
    lines
}

/// Line to the spouse's earliest event, if the spouse has one and it is
/// currently enabled.
pub fn spouse_line(graph: &FamilyGraph, filters: &FilterSettings, focus: EventKey) -> Option<MapLine> {
    let person = graph.event(focus).person();
    let spouse = graph.person(person).spouse()?;
    let earliest = graph.earliest_event(spouse)?;
    if !is_event_enabled(graph, filters, earliest) {
        return None;
    }
    Some(MapLine::new(
        LineKind::Spouse,
        BASE_LINE_WIDTH,
        vec![coordinate(graph, focus), coordinate(graph, earliest)],
    ))
}

/// Lines up both parental branches, one generation per line, thinning as
/// they go. A branch stops at the first parent without an enabled earliest
/// event.
///
/// Walks depth first with an explicit stack, mother's branch before father's.
/// Each (child event, parent event) segment is drawn once, at the width of
/// the first path that reaches it, so an ancestor reachable by several routes
/// is expanded only once.
pub fn ancestor_lines(graph: &FamilyGraph, filters: &FilterSettings, focus: EventKey) -> Vec<MapLine> {
    let mut lines = Vec::new();
    let mut drawn: HashSet<(EventKey, EventKey)> = HashSet::new();
    let mut stack = Vec::new();
    push_parents(graph, focus, BASE_LINE_WIDTH, &mut stack);

    while let Some((from, parent, width)) = stack.pop() {
        let Some(earliest) = graph.earliest_event(parent) else {
            continue;
        };
        if !is_event_enabled(graph, filters, earliest) || !drawn.insert((from, earliest)) {
            continue;
        }

        lines.push(MapLine::new(
            LineKind::Ancestor,
            width,
            vec![coordinate(graph, from), coordinate(graph, earliest)],
        ));

        let next_width = (width - LINE_WIDTH_DECREMENT).max(MIN_LINE_WIDTH);
        push_parents(graph, earliest, next_width, &mut stack);
    }
    lines
}

fn push_parents(
    graph: &FamilyGraph,
    from: EventKey,
    width: f32,
    stack: &mut Vec<(EventKey, PersonKey, f32)>,
) {
    let person = graph.person(graph.event(from).person());
    for parent in [person.father(), person.mother()].into_iter().flatten() {
        stack.push((from, parent, width));
    }
}

/// A single path through the focus person's events in year order. Needs at
/// least two events.
pub fn life_story_line(graph: &FamilyGraph, focus: EventKey) -> Option<MapLine> {
    let person = graph.event(focus).person();
    let points: Vec<Coordinate> = graph
        .life_events(person)
        .into_iter()
        .map(|key| coordinate(graph, key))
        .collect();
    if points.len() < 2 {
        return None;
    }
    Some(MapLine::new(LineKind::LifeStory, BASE_LINE_WIDTH, points))
}

#[cfg(test)]
mod tests {
    use super::{
        ancestor_lines, life_story_line, lines_for_event, spouse_line, LineKind, BASE_LINE_WIDTH,
        MIN_LINE_WIDTH,
    };
    use crate::{
        classify::Gender,
        filters::FilterSettings,
        fixtures::{
            collapsed_pedigree, doe_family, event, event_at, mother_chain, person, with_parents,
        },
        graph::FamilyGraph,
    };

    fn doe_graph() -> FamilyGraph {
        let (persons, events) = doe_family();
        FamilyGraph::build("u1", &persons, &events).expect("graph build")
    }

    #[test]
    fn spouse_line_joins_focus_and_spouse_earliest_event() {
        let graph = doe_graph();
        let focus = graph.find_event("e-u1-marriage").expect("present");
        let line = spouse_line(&graph, &FilterSettings::default(), focus).expect("spouse line");
        assert_eq!(line.kind, LineKind::Spouse);
        assert_eq!(line.color, "#FF0000");
        assert_eq!(line.points.len(), 2);
        assert_eq!(line.points[0].latitude, 48.85);
        assert_eq!(line.points[1].latitude, 30.27);
    }

    #[test]
    fn no_spouse_means_no_spouse_line() {
        let persons = vec![person("u1", "Jane", "Doe", Gender::Female)];
        let events = vec![event("e1", "u1", "birth", 2000)];
        let graph = FamilyGraph::build("u1", &persons, &events).expect("graph build");
        let focus = graph.find_event("e1").expect("present");
        assert!(spouse_line(&graph, &FilterSettings::default(), focus).is_none());
    }

    #[test]
    fn spouse_line_respects_gender_filter() {
        let graph = doe_graph();
        let focus = graph.find_event("e-u1-birth").expect("present");
        let filters = FilterSettings {
            show_male_events: false,
            ..FilterSettings::default()
        };
        assert!(spouse_line(&graph, &filters, focus).is_none());
    }

    #[test]
    fn ancestor_chain_stops_at_disabled_generation() {
        // u1 -> mother -> grandmother -> great-grandfather, whose events
        // disappear once male events are filtered out.
        let persons = vec![
            with_parents(person("u1", "Jane", "Doe", Gender::Female), "m1", "none"),
            with_parents(person("m1", "Mary", "Allen", Gender::Female), "gm1", "none"),
            with_parents(person("gm1", "Ruth", "Baker", Gender::Female), "none", "ggf1"),
            person("ggf1", "Silas", "Baker", Gender::Male),
        ];
        let events = vec![
            event("u", "u1", "birth", 2000),
            event("m", "m1", "birth", 1970),
            event("gm", "gm1", "birth", 1945),
            event("ggf", "ggf1", "birth", 1920),
        ];
        let graph = FamilyGraph::build("u1", &persons, &events).expect("graph build");
        let focus = graph.find_event("u").expect("present");

        let all = ancestor_lines(&graph, &FilterSettings::default(), focus);
        assert_eq!(all.len(), 3);

        let filters = FilterSettings {
            show_male_events: false,
            ..FilterSettings::default()
        };
        let lines = ancestor_lines(&graph, &filters, focus);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].width, BASE_LINE_WIDTH);
        assert_eq!(lines[1].width, BASE_LINE_WIDTH - 3.0);
        assert!(lines.iter().all(|l| l.kind == LineKind::Ancestor));
    }

    #[test]
    fn ancestor_lines_cover_both_branches_and_thin_out() {
        let graph = doe_graph();
        let focus = graph.find_event("e-u1-birth").expect("present");
        let lines = ancestor_lines(&graph, &FilterSettings::default(), focus);
        // mother branch: m1, mm1, mmm1, mmf1, mf1; father branch: f1, fm1, ff1
        assert_eq!(lines.len(), 8);

        let widths: Vec<f32> = lines.iter().map(|l| l.width).collect();
        assert_eq!(widths, vec![12.0, 9.0, 6.0, 6.0, 9.0, 12.0, 9.0, 9.0]);

        // the father-side chain starts at f1's earliest event (Oslo)
        assert_eq!(lines[5].points[1].latitude, 59.91);
        // ff1's earliest event is the 1939 birth, not the 2010 death
        assert_eq!(lines[7].points[1].latitude, 45.07);
    }

    #[test]
    fn line_width_is_clamped() {
        let mut persons = vec![person("p0", "Gen", "Zero", Gender::Female)];
        let mut events = vec![event("e0", "p0", "birth", 2000)];
        for generation in 1..=6 {
            let id = format!("p{generation}");
            persons[generation - 1].mother_id = Some(id.clone());
            persons.push(person(&id, "Gen", "Older", Gender::Female));
            events.push(event(&format!("e{generation}"), &id, "birth", 2000 - 25 * generation as i32));
        }
        let graph = FamilyGraph::build("p0", &persons, &events).expect("graph build");
        let focus = graph.find_event("e0").expect("present");
        let lines = ancestor_lines(&graph, &FilterSettings::default(), focus);
        assert_eq!(lines.len(), 6);
        assert!(lines.iter().all(|l| l.width >= MIN_LINE_WIDTH));
        assert_eq!(lines[5].width, MIN_LINE_WIDTH);
    }

    #[test]
    fn life_story_visits_events_chronologically() {
        let persons = vec![person("u1", "Jane", "Doe", Gender::Female)];
        let events = vec![
            event_at("death", "u1", "death", 2080, "C", "X", 3.0, 3.0),
            event_at("birth", "u1", "birth", 2000, "A", "X", 1.0, 1.0),
            event_at("grad", "u1", "graduation", 2022, "B", "X", 2.0, 2.0),
        ];
        let graph = FamilyGraph::build("u1", &persons, &events).expect("graph build");
        let focus = graph.find_event("grad").expect("present");
        let line = life_story_line(&graph, focus).expect("life story");
        let lats: Vec<f64> = line.points.iter().map(|p| p.latitude).collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0]);
        assert_eq!(line.kind, LineKind::LifeStory);
    }

    #[test]
    fn single_event_has_no_life_story() {
        let persons = vec![person("u1", "Jane", "Doe", Gender::Female)];
        let events = vec![event("e1", "u1", "birth", 2000)];
        let graph = FamilyGraph::build("u1", &persons, &events).expect("graph build");
        let focus = graph.find_event("e1").expect("present");
        assert!(life_story_line(&graph, focus).is_none());
    }

    #[test]
    fn toggles_skip_whole_line_families() {
        let graph = doe_graph();
        let focus = graph.find_event("e-u1-birth").expect("present");

        let all = lines_for_event(&graph, &FilterSettings::default(), focus);
        assert_eq!(all.first().map(|l| l.kind), Some(LineKind::Spouse));
        assert_eq!(all.last().map(|l| l.kind), Some(LineKind::LifeStory));
        assert_eq!(all.len(), 1 + 8 + 1);

        let filters = FilterSettings {
            show_spouse_line: false,
            show_ancestor_lines: false,
            ..FilterSettings::default()
        };
        let only_story = lines_for_event(&graph, &filters, focus);
        assert_eq!(only_story.len(), 1);
        assert_eq!(only_story[0].kind, LineKind::LifeStory);
    }

    #[test]
    fn deep_ancestry_draws_every_generation() {
        let (persons, events) = mother_chain(20_000);
        let graph = FamilyGraph::build("p0", &persons, &events).expect("graph build");
        let focus = graph.find_event("e0").expect("present");

        let lines = ancestor_lines(&graph, &FilterSettings::default(), focus);
        assert_eq!(lines.len(), 19_999);
        assert_eq!(lines[0].width, BASE_LINE_WIDTH);
        assert_eq!(lines[19_998].width, MIN_LINE_WIDTH);
    }

    #[test]
    fn collapsed_pedigree_draws_each_segment_once() {
        let generations = 22;
        let (persons, events) = collapsed_pedigree(generations);
        let graph = FamilyGraph::build("u", &persons, &events).expect("graph build");
        let focus = graph.find_event("e-u").expect("present");

        let lines = ancestor_lines(&graph, &FilterSettings::default(), focus);
        // Two from the user, then two from each of the lower couples' members.
        assert_eq!(lines.len(), 2 + 4 * (generations - 1));
        assert_eq!(lines[0].width, BASE_LINE_WIDTH);
        assert!(lines.iter().all(|line| line.kind == LineKind::Ancestor));
    }

    #[test]
    #[should_panic(expected = "does not belong to graph")]
    fn foreign_focus_event_fails_fast() {
        let first = doe_graph();
        let second = doe_graph();
        let focus = first.find_event("e-u1-birth").expect("present");
        let _ = lines_for_event(&second, &FilterSettings::default(), focus);
    }
}
