//! Personal and monster name source.

use std::collections::BTreeMap;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::region::Regionalism;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Gender {
        if rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

/// Source of first names, surnames and monster names.
pub trait NameBank {
    fn first_name(&self, culture: Regionalism, gender: Gender, rng: &mut dyn RngCore) -> String;
    fn surname(&self, culture: Regionalism, rng: &mut dyn RngCore) -> String;
    fn monster_name(&self, gender: Gender, rng: &mut dyn RngCore) -> String;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenderedNames {
    pub male: Vec<String>,
    pub female: Vec<String>,
}

impl GenderedNames {
    fn list(&self, gender: Gender) -> &[String] {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }
}

/// Table-driven name bank loaded from `name_bank.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNameBank {
    pub first_names: BTreeMap<Regionalism, GenderedNames>,
    pub surnames: BTreeMap<Regionalism, Vec<String>>,
    pub monsters: GenderedNames,
}

fn pick_owned(list: &[String], rng: &mut dyn RngCore) -> String {
    if list.is_empty() {
        String::new()
    } else {
        list[rng.gen_range(0..list.len())].clone()
    }
}

impl TableNameBank {
    /// Culture table, falling back to the High Rock table.
    fn culture_entry<'a, T>(
        table: &'a BTreeMap<Regionalism, T>,
        culture: Regionalism,
    ) -> Option<&'a T> {
        table
            .get(&culture)
            .or_else(|| table.get(&Regionalism::HighRockVanilla))
    }
}

impl NameBank for TableNameBank {
    fn first_name(&self, culture: Regionalism, gender: Gender, rng: &mut dyn RngCore) -> String {
        match Self::culture_entry(&self.first_names, culture) {
            Some(names) => pick_owned(names.list(gender), rng),
            None => String::new(),
        }
    }

    fn surname(&self, culture: Regionalism, rng: &mut dyn RngCore) -> String {
        match Self::culture_entry(&self.surnames, culture) {
            Some(names) => pick_owned(names, rng),
            None => String::new(),
        }
    }

    fn monster_name(&self, gender: Gender, rng: &mut dyn RngCore) -> String {
        pick_owned(self.monsters.list(gender), rng)
    }
}
