use crate::error::ValidationError;
use crate::models::body_part::BodyPartCategory;
use crate::models::look::EncodedImage;
use look_capture::Preview;
use serde::{Deserialize, Serialize};

pub const MAX_NOTES_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fit {
    Tight,
    Regular,
    Loose,
}

impl Fit {
    pub fn all() -> &'static [Fit] {
        static ALL: [Fit; 3] = [Fit::Tight, Fit::Regular, Fit::Loose];
        &ALL
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Fit::Tight => "Tight",
            Fit::Regular => "Regular",
            Fit::Loose => "Loose",
        }
    }

    pub fn prompt_word(&self) -> String {
        self.as_str().to_lowercase()
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fabric {
    Cotton,
    Denim,
    Leather,
    Silk,
    Wool,
}

impl Fabric {
    pub fn all() -> &'static [Fabric] {
        static ALL: [Fabric; 5] = [
            Fabric::Cotton,
            Fabric::Denim,
            Fabric::Leather,
            Fabric::Silk,
            Fabric::Wool,
        ];
        &ALL
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Fabric::Cotton => "Cotton",
            Fabric::Denim => "Denim",
            Fabric::Leather => "Leather",
            Fabric::Silk => "Silk",
            Fabric::Wool => "Wool",
        }
    }

    pub fn prompt_word(&self) -> String {
        self.as_str().to_lowercase()
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
    }
}

/// Per-slot styling adjustments. Every field is optional and independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentSet {
    pub fit: Option<Fit>,
    pub fabric: Option<Fabric>,
    pub notes: Option<String>,
}

/// A change to exactly one adjustment field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustmentChange {
    Fit(Option<Fit>),
    Fabric(Option<Fabric>),
    Notes(Option<String>),
}

impl AdjustmentSet {
    /// Notes with surrounding whitespace removed; blank notes count as unset
    pub fn notes(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fit.is_none() && self.fabric.is_none() && self.notes().is_none()
    }

    /// New record with one field replaced
    pub fn with_change(&self, change: AdjustmentChange) -> Self {
        let mut next = self.clone();
        match change {
            AdjustmentChange::Fit(fit) => next.fit = fit,
            AdjustmentChange::Fabric(fabric) => next.fabric = fabric,
            AdjustmentChange::Notes(notes) => next.notes = notes,
        }
        next
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(notes) = self.notes() {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(ValidationError::NotesTooLong(MAX_NOTES_LEN));
            }
        }
        Ok(())
    }
}

/// A garment uploaded for one body part
#[derive(Debug, Clone, PartialEq)]
pub struct GarmentSlot {
    pub category: BodyPartCategory,
    pub image: EncodedImage,
    pub preview: Preview,
    pub adjustments: AdjustmentSet,
}

impl GarmentSlot {
    pub fn new(category: BodyPartCategory, image: EncodedImage, preview: Preview) -> Self {
        Self {
            category,
            image,
            preview,
            adjustments: AdjustmentSet::default(),
        }
    }
}
