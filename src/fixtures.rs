//! Record builders shared by unit tests.

use crate::{
    classify::Gender,
    models::{EventRecord, PersonRecord},
};

pub fn person(id: &str, first: &str, last: &str, gender: Gender) -> PersonRecord {
    PersonRecord {
        person_id: id.to_string(),
        associated_username: Some("jdoe".to_string()),
        first_name: first.to_string(),
        last_name: last.to_string(),
        gender,
        father_id: None,
        mother_id: None,
        spouse_id: None,
    }
}

pub fn with_parents(mut record: PersonRecord, mother: &str, father: &str) -> PersonRecord {
    record.mother_id = Some(mother.to_string());
    record.father_id = Some(father.to_string());
    record
}

pub fn with_spouse(mut record: PersonRecord, spouse: &str) -> PersonRecord {
    record.spouse_id = Some(spouse.to_string());
    record
}

pub fn event(id: &str, person: &str, event_type: &str, year: i32) -> EventRecord {
    event_at(id, person, event_type, year, "Provo", "USA", 40.0, -111.0)
}

#[allow(clippy::too_many_arguments)]
pub fn event_at(
    id: &str,
    person: &str,
    event_type: &str,
    year: i32,
    city: &str,
    country: &str,
    latitude: f64,
    longitude: f64,
) -> EventRecord {
    EventRecord {
        event_id: id.to_string(),
        associated_username: Some("jdoe".to_string()),
        person_id: person.to_string(),
        latitude,
        longitude,
        country: country.to_string(),
        city: city.to_string(),
        event_type: event_type.to_string(),
        year,
    }
}

/// Jane Doe (u1) married to John Smith (s1); three generations of ancestry
/// on each side.
pub fn doe_family() -> (Vec<PersonRecord>, Vec<EventRecord>) {
    let persons = vec![
        with_spouse(
            with_parents(person("u1", "Jane", "Doe", Gender::Female), "m1", "f1"),
            "s1",
        ),
        with_spouse(person("s1", "John", "Smith", Gender::Male), "u1"),
        with_parents(person("m1", "Mary", "Allen", Gender::Female), "mm1", "mf1"),
        with_parents(person("f1", "Frank", "Doe", Gender::Male), "fm1", "ff1"),
        with_parents(person("mm1", "Ruth", "Baker", Gender::Female), "mmm1", "mmf1"),
        person("mf1", "Henry", "Allen", Gender::Male),
        person("fm1", "Edna", "Cole", Gender::Female),
        person("ff1", "Walter", "Doe", Gender::Male),
        person("mmm1", "Ada", "Carter", Gender::Female),
        person("mmf1", "Silas", "Baker", Gender::Male),
    ];

    let events = vec![
        event_at("e-u1-birth", "u1", "birth", 2000, "Provo", "USA", 40.23, -111.66),
        event_at("e-u1-marriage", "u1", "Marriage", 2022, "Paris", "France", 48.85, 2.35),
        event_at("e-s1-birth", "s1", "birth", 1998, "Austin", "USA", 30.27, -97.74),
        event_at("e-m1-birth", "m1", "birth", 1970, "Dublin", "Ireland", 53.35, -6.26),
        event_at("e-f1-birth", "f1", "birth", 1968, "Oslo", "Norway", 59.91, 10.75),
        event_at("e-mm1-birth", "mm1", "birth", 1945, "Lima", "Peru", -12.05, -77.04),
        event_at("e-mf1-birth", "mf1", "birth", 1944, "Quito", "Ecuador", -0.18, -78.47),
        event_at("e-fm1-birth", "fm1", "birth", 1940, "Cairo", "Egypt", 30.04, 31.24),
        event_at("e-ff1-death", "ff1", "death", 2010, "Rome", "Italy", 41.90, 12.50),
        event_at("e-ff1-birth", "ff1", "birth", 1939, "Turin", "Italy", 45.07, 7.69),
        event_at("e-mmm1-birth", "mmm1", "birth", 1920, "Hanoi", "Vietnam", 21.03, 105.85),
        event_at("e-mmf1-birth", "mmf1", "birth", 1918, "Seoul", "Korea", 37.57, 126.98),
    ];

    (persons, events)
}

/// `p0` descends from `p1`, `p1` from `p2`, and so on, through mothers only.
/// Each person has one birth event.
pub fn mother_chain(len: usize) -> (Vec<PersonRecord>, Vec<EventRecord>) {
    let mut persons = Vec::with_capacity(len);
    let mut events = Vec::with_capacity(len);
    for i in 0..len {
        let id = format!("p{i}");
        let mut record = person(&id, "Eve", &format!("Gen{i}"), Gender::Female);
        if i + 1 < len {
            record.mother_id = Some(format!("p{}", i + 1));
        }
        persons.push(record);
        events.push(event(&format!("e{i}"), &id, "birth", 2000 - i as i32));
    }
    (persons, events)
}

/// `u` above `generations` couples where each couple `a{g}`/`b{g}` are
/// siblings who share the couple one generation up as parents.
pub fn collapsed_pedigree(generations: usize) -> (Vec<PersonRecord>, Vec<EventRecord>) {
    let mut persons = vec![with_parents(person("u", "Ada", "Root", Gender::Female), "a1", "b1")];
    let mut events = vec![event("e-u", "u", "birth", 2000)];
    for g in 1..=generations {
        let mut mother = person(&format!("a{g}"), "Ann", &format!("Gen{g}"), Gender::Female);
        let mut father = person(&format!("b{g}"), "Bob", &format!("Gen{g}"), Gender::Male);
        if g < generations {
            let (up_mother, up_father) = (format!("a{}", g + 1), format!("b{}", g + 1));
            mother = with_parents(mother, &up_mother, &up_father);
            father = with_parents(father, &up_mother, &up_father);
        }
        let year = 2000 - 25 * g as i32;
        events.push(event(&format!("e-a{g}"), &format!("a{g}"), "birth", year));
        events.push(event(&format!("e-b{g}"), &format!("b{g}"), "birth", year));
        persons.push(mother);
        persons.push(father);
    }
    (persons, events)
}
