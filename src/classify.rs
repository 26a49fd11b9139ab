//! Lineage-side and gender classification.
//!
//! Every person and event lands in exactly one [`BucketKey`]; the same key
//! drives bucket indexing in the graph and filter checks in queries.

use serde::{Deserialize, Serialize};

use crate::filters::FilterSettings;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    #[serde(rename = "m", alias = "M")]
    Male,
    #[serde(rename = "f", alias = "F")]
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Which part of the user's family a person belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// The user and the user's spouse.
    Immediate,
    MotherSide,
    FatherSide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub side: Side,
    pub gender: Gender,
}

impl BucketKey {
    /// Iteration order for filtered queries: female before male, and within a
    /// gender immediate, mother side, father side.
    pub const ALL: [BucketKey; 6] = [
        BucketKey::new(Side::Immediate, Gender::Female),
        BucketKey::new(Side::MotherSide, Gender::Female),
        BucketKey::new(Side::FatherSide, Gender::Female),
        BucketKey::new(Side::Immediate, Gender::Male),
        BucketKey::new(Side::MotherSide, Gender::Male),
        BucketKey::new(Side::FatherSide, Gender::Male),
    ];

    /// Ancestor-only buckets, in person-query order.
    pub const ANCESTORS: [BucketKey; 4] = [
        BucketKey::new(Side::MotherSide, Gender::Female),
        BucketKey::new(Side::MotherSide, Gender::Male),
        BucketKey::new(Side::FatherSide, Gender::Female),
        BucketKey::new(Side::FatherSide, Gender::Male),
    ];

    pub const fn new(side: Side, gender: Gender) -> Self {
        Self { side, gender }
    }

    pub fn index(&self) -> usize {
        let side = match self.side {
            Side::Immediate => 0,
            Side::MotherSide => 1,
            Side::FatherSide => 2,
        };
        let gender = match self.gender {
            Gender::Female => 0,
            Gender::Male => 3,
        };
        side + gender
    }

    /// Side filters never hide the immediate pair.
    pub fn side_enabled(&self, filters: &FilterSettings) -> bool {
        match self.side {
            Side::Immediate => true,
            Side::MotherSide => filters.show_mother_side,
            Side::FatherSide => filters.show_father_side,
        }
    }

    pub fn gender_enabled(&self, filters: &FilterSettings) -> bool {
        match self.gender {
            Gender::Male => filters.show_male_events,
            Gender::Female => filters.show_female_events,
        }
    }

    pub fn person_enabled(&self, filters: &FilterSettings) -> bool {
        self.side_enabled(filters)
    }

    pub fn events_enabled(&self, filters: &FilterSettings) -> bool {
        self.side_enabled(filters) && self.gender_enabled(filters)
    }
}

pub fn classify(side: Side, gender: Gender) -> BucketKey {
    BucketKey::new(side, gender)
}
