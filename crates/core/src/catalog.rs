use thiserror::Error;

use crate::model::StampId;

/// Display names of the compiled-in six-point card, in point order.
pub const STANDARD_STAMP_NAMES: [&str; 6] = [
    "Lobby Welcome Desk",
    "Garden Fountain",
    "Library Reading Nook",
    "Cafe Counter",
    "Gallery East Wing",
    "Rooftop Terrace",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("a stamp catalog needs at least one stamp")]
    Empty,

    #[error("stamp #{0} has an empty name")]
    EmptyName(StampId),

    #[error("a stamp catalog holds at most {max} stamps")]
    TooLarge { max: usize },
}

/// One collection point on the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampDefinition {
    index: StampId,
    name: String,
}

impl StampDefinition {
    #[must_use]
    pub fn index(&self) -> StampId {
        self.index
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First word of the name; the grid has room for little else.
    #[must_use]
    pub fn short_label(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Fixed, ordered list of stamps. Indices are always exactly `1..=total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampCatalog {
    definitions: Vec<StampDefinition>,
}

impl StampCatalog {
    const MAX_STAMPS: usize = 64;

    /// The card shipped with the app.
    #[must_use]
    pub fn standard() -> Self {
        let definitions = STANDARD_STAMP_NAMES
            .iter()
            .zip(1u32..)
            .map(|(name, index)| StampDefinition {
                index: StampId::new(index),
                name: (*name).to_string(),
            })
            .collect();
        Self { definitions }
    }

    /// Build a catalog from display names; the first name is stamp #1.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the list is empty, too large, or holds a blank name.
    pub fn from_names<I, S>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut definitions = Vec::new();
        for (name, index) in names.into_iter().zip(1u32..) {
            let name = name.into().trim().to_string();
            let index = StampId::new(index);
            if name.is_empty() {
                return Err(CatalogError::EmptyName(index));
            }
            definitions.push(StampDefinition { index, name });
        }

        if definitions.is_empty() {
            return Err(CatalogError::Empty);
        }
        if definitions.len() > Self::MAX_STAMPS {
            return Err(CatalogError::TooLarge {
                max: Self::MAX_STAMPS,
            });
        }

        Ok(Self { definitions })
    }

    /// Number of stamps needed to complete the card.
    #[must_use]
    pub fn total(&self) -> u32 {
        // Bounded by MAX_STAMPS.
        u32::try_from(self.definitions.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn get(&self, id: StampId) -> Option<&StampDefinition> {
        let index = usize::try_from(id.value()).ok()?.checked_sub(1)?;
        self.definitions.get(index)
    }

    /// Range-check a raw integer against `1..=total()`.
    #[must_use]
    pub fn resolve(&self, raw: i64) -> Option<StampId> {
        let id = StampId::new(u32::try_from(raw).ok()?);
        self.contains(id).then_some(id)
    }

    #[must_use]
    pub fn contains(&self, id: StampId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StampDefinition> {
        self.definitions.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = StampId> + '_ {
        self.definitions.iter().map(StampDefinition::index)
    }
}

impl Default for StampCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
