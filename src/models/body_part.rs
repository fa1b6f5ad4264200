use serde::{Deserialize, Serialize};
use std::fmt;

/// Where on the body a garment goes.
///
/// The declaration order is the prompt order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodyPartCategory {
    Head,
    Face,
    Neck,
    Chest,
    Shoulders,
    Torso,
    Arms,
    Waist,
    Legs,
    Feet,
}

impl BodyPartCategory {
    pub const ALL: [BodyPartCategory; 10] = [
        BodyPartCategory::Head,
        BodyPartCategory::Face,
        BodyPartCategory::Neck,
        BodyPartCategory::Chest,
        BodyPartCategory::Shoulders,
        BodyPartCategory::Torso,
        BodyPartCategory::Arms,
        BodyPartCategory::Waist,
        BodyPartCategory::Legs,
        BodyPartCategory::Feet,
    ];

    /// Literal used on the wire (identification schema)
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyPartCategory::Head => "Head",
            BodyPartCategory::Face => "Face",
            BodyPartCategory::Neck => "Neck",
            BodyPartCategory::Chest => "Chest",
            BodyPartCategory::Shoulders => "Shoulders",
            BodyPartCategory::Torso => "Torso",
            BodyPartCategory::Arms => "Arms",
            BodyPartCategory::Waist => "Waist",
            BodyPartCategory::Legs => "Legs",
            BodyPartCategory::Feet => "Feet",
        }
    }

    /// Word used inside prompt sentences
    pub fn prompt_word(&self) -> String {
        self.as_str().to_lowercase()
    }

    pub fn label(&self) -> &'static str {
        match self {
            BodyPartCategory::Head => "Headwear",
            BodyPartCategory::Face => "Face Accessories",
            BodyPartCategory::Neck => "Neckwear",
            BodyPartCategory::Chest => "Tops",
            BodyPartCategory::Shoulders => "Outerwear",
            BodyPartCategory::Torso => "Full Body",
            BodyPartCategory::Arms => "Armwear",
            BodyPartCategory::Waist => "Waist Accessories",
            BodyPartCategory::Legs => "Hosiery",
            BodyPartCategory::Feet => "Footwear",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BodyPartCategory::Head => "Hats, caps, etc.",
            BodyPartCategory::Face => "Makeup, earrings, etc.",
            BodyPartCategory::Neck => "Necklaces, scarves, etc.",
            BodyPartCategory::Chest => "Shirts, t-shirts, etc.",
            BodyPartCategory::Shoulders => "Jackets, blouses, etc.",
            BodyPartCategory::Torso => "Dresses, costumes, etc.",
            BodyPartCategory::Arms => "Watches, bracelets, etc.",
            BodyPartCategory::Waist => "Belts, etc.",
            BodyPartCategory::Legs => "Socks, tights, etc.",
            BodyPartCategory::Feet => "Shoes, sandals, etc.",
        }
    }

    /// Case-insensitive parse of the wire literal
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for BodyPartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_declaration_order() {
        let mut sorted = BodyPartCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, BodyPartCategory::ALL);
        assert_eq!(BodyPartCategory::ALL[0], BodyPartCategory::Head);
        assert_eq!(BodyPartCategory::ALL[9], BodyPartCategory::Feet);
    }

    #[test]
    fn test_parse() {
        assert_eq!(BodyPartCategory::parse("Chest"), Some(BodyPartCategory::Chest));
        assert_eq!(BodyPartCategory::parse(" feet "), Some(BodyPartCategory::Feet));
        assert_eq!(BodyPartCategory::parse("Tail"), None);
    }

    #[test]
    fn test_serde_uses_wire_literal() {
        let json = serde_json::to_string(&BodyPartCategory::Shoulders).unwrap();
        assert_eq!(json, "\"Shoulders\"");
        assert_eq!(BodyPartCategory::Shoulders.prompt_word(), "shoulders");
    }
}
