use std::{
    collections::{BTreeSet, HashMap},
    slice::Iter,
};

use derive_more::Deref;
use log::warn;

use crate::Name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub parent: Option<ExerciseID>,
    pub muscle_groups: BTreeSet<MuscleGroup>,
    pub description: String,
    pub form_notes: String,
}

/// Position of an exercise inside its [`Exercises`] catalog.
#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(usize);

impl From<usize> for ExerciseID {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// All exercises of a run, in file order, addressable by name.
///
/// Parent links are plain IDs into the same catalog. They are set only by
/// [`Exercises::resolve_parents`], after every exercise has been inserted, so
/// that a parent may be defined before or after its variants.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Exercises {
    exercises: Vec<Exercise>,
    ids: HashMap<String, ExerciseID>,
}

impl Exercises {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exercise without parent link.
    ///
    /// A second exercise with the same name replaces the earlier definition
    /// and keeps its ID.
    pub fn insert(
        &mut self,
        name: Name,
        muscle_groups: BTreeSet<MuscleGroup>,
        description: String,
        form_notes: String,
    ) -> ExerciseID {
        if let Some(&id) = self.ids.get(name.as_str()) {
            warn!("exercise '{name}' defined more than once, using last definition");
            self.exercises[*id] = Exercise {
                id,
                name,
                parent: None,
                muscle_groups,
                description,
                form_notes,
            };
            return id;
        }

        let id = ExerciseID(self.exercises.len());
        self.ids.insert(name.to_string(), id);
        self.exercises.push(Exercise {
            id,
            name,
            parent: None,
            muscle_groups,
            description,
            form_notes,
        });
        id
    }

    /// Link exercises to their parents by name.
    ///
    /// Links to names which are not part of the catalog are left absent.
    pub fn resolve_parents(&mut self, links: impl IntoIterator<Item = (ExerciseID, Name)>) {
        for (id, parent_name) in links {
            let parent = self.ids.get(parent_name.as_str()).copied();
            if parent.is_none() {
                warn!(
                    "parent exercise '{parent_name}' of '{}' not found",
                    self.exercises[*id].name
                );
            }
            self.exercises[*id].parent = parent;
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Exercise> {
        self.ids.get(name.trim()).map(|id| &self.exercises[**id])
    }

    #[must_use]
    pub fn by_id(&self, id: ExerciseID) -> Option<&Exercise> {
        self.exercises.get(*id)
    }

    #[must_use]
    pub fn parent_of(&self, exercise: &Exercise) -> Option<&Exercise> {
        exercise.parent.and_then(|id| self.by_id(id))
    }

    /// Parents, grandparents, ... of an exercise, nearest first.
    ///
    /// Parent links are not validated on load. The walk ends at the first
    /// exercise that has already been visited.
    #[must_use]
    pub fn ancestors(&self, id: ExerciseID) -> Vec<ExerciseID> {
        let mut visited = BTreeSet::from([id]);
        let mut result = vec![];
        let mut current = self.by_id(id).and_then(|e| e.parent);

        while let Some(parent) = current {
            if !visited.insert(parent) {
                break;
            }
            result.push(parent);
            current = self.by_id(parent).and_then(|e| e.parent);
        }

        result
    }

    pub fn iter(&self) -> Iter<'_, Exercise> {
        self.exercises.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

impl<'a> IntoIterator for &'a Exercises {
    type Item = &'a Exercise;
    type IntoIter = Iter<'a, Exercise>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum MuscleGroup {
    Legs,
    Chest,
    Back,
    Arms,
    Shoulders,
    Core,
}

impl MuscleGroup {
    pub fn iter() -> Iter<'static, MuscleGroup> {
        static MUSCLE_GROUPS: [MuscleGroup; 6] = [
            MuscleGroup::Legs,
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Arms,
            MuscleGroup::Shoulders,
            MuscleGroup::Core,
        ];
        MUSCLE_GROUPS.iter()
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            MuscleGroup::Legs => "LEGS",
            MuscleGroup::Chest => "CHEST",
            MuscleGroup::Back => "BACK",
            MuscleGroup::Arms => "ARMS",
            MuscleGroup::Shoulders => "SHOULDERS",
            MuscleGroup::Core => "CORE",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Core => "Core",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            MuscleGroup::Legs => "Exercises targeting the lower extremities.",
            MuscleGroup::Chest => "Exercises targeting the chest.",
            MuscleGroup::Back => "Exercises targeting the upper and lower back.",
            MuscleGroup::Arms => "Exercises targeting the arms.",
            MuscleGroup::Shoulders => "Exercises targeting specifically the shoulders.",
            MuscleGroup::Core => "Exercises targeting all areas of the abs and core.",
        }
    }

    /// Match a single token, first against the IDs and then against the
    /// labels, ignoring case.
    #[must_use]
    pub fn parse(token: &str) -> Option<MuscleGroup> {
        let token = token.trim();
        Self::iter()
            .find(|m| m.id().eq_ignore_ascii_case(token))
            .or_else(|| Self::iter().find(|m| m.label().eq_ignore_ascii_case(token)))
            .copied()
    }

    /// Parse a list of tokens separated by commas or semicolons.
    ///
    /// Unknown tokens are dropped.
    #[must_use]
    pub fn parse_list(text: &str) -> BTreeSet<MuscleGroup> {
        text.split([',', ';'])
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .filter_map(|token| {
                let muscle_group = MuscleGroup::parse(token);
                if muscle_group.is_none() {
                    warn!("ignoring unknown muscle group '{token}'");
                }
                muscle_group
            })
            .collect()
    }
}

impl std::fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
