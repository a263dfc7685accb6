//! Palette type: the fixed set of colours a canvas generation allows.

use std::collections::HashSet;

use crate::error::{AsmError, Result};

use super::Colour;

/// The 32-colour r/place palette.
const PLACE_2023: [&str; 32] = [
    "#6D001A", "#BE0039", "#FF4500", "#FFA800", "#FFD635", "#FFF8B8", "#00A368", "#00CC78",
    "#7EED56", "#00756F", "#009EAA", "#00CCC0", "#2450A4", "#3690EA", "#51E9F4", "#493AC1",
    "#6A5CFF", "#94B3FF", "#811E9F", "#B44AC0", "#E4ABFF", "#DE107F", "#FF3881", "#FF99AA",
    "#6D482F", "#9C6926", "#FFB470", "#000000", "#515252", "#898D90", "#D4D7D9", "#FFFFFF",
];

/// Names accepted by [`Palette::builtin`].
pub const BUILTIN_PALETTES: [&str; 2] = ["place-2023", "mono"];

/// An immutable, ordered set of opaque colours.
///
/// Membership is exact RGB equality. Declaration order is kept so that
/// nearest-colour ties resolve the same way on every run.
#[derive(Debug, Clone)]
pub struct Palette {
    /// Palette name
    pub name: String,

    colours: Vec<Colour>,

    members: HashSet<[u8; 3]>,
}

impl Palette {
    /// Create a palette from colours. Alpha is forced to 255 and duplicates are dropped.
    pub fn new(name: impl Into<String>, colours: impl IntoIterator<Item = Colour>) -> Result<Self> {
        let name = name.into();
        let mut members = HashSet::new();
        let mut ordered = Vec::new();

        for colour in colours {
            if members.insert(colour.rgb_key()) {
                ordered.push(Colour::rgb(colour.r, colour.g, colour.b));
            }
        }

        if ordered.is_empty() {
            return Err(AsmError::Config {
                message: format!("Palette '{}' has no colours", name),
                help: Some("List at least one hex colour".to_string()),
            });
        }

        Ok(Self {
            name,
            colours: ordered,
            members,
        })
    }

    /// Create a palette from hex strings.
    pub fn from_hex<S: AsRef<str>>(name: impl Into<String>, hexes: &[S]) -> Result<Self> {
        let colours = hexes
            .iter()
            .map(|h| Colour::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(name, colours)
    }

    /// Look up a builtin palette by name.
    pub fn builtin(name: &str) -> Option<Self> {
        let colours: Vec<Colour> = match name {
            "place-2023" => PLACE_2023
                .iter()
                .filter_map(|h| Colour::from_hex(h).ok())
                .collect(),
            "mono" => vec![Colour::WHITE, Colour::BLACK],
            _ => return None,
        };
        Self::new(name, colours).ok()
    }

    /// Exact RGB membership test. Alpha is ignored.
    pub fn contains(&self, colour: Colour) -> bool {
        self.members.contains(&colour.rgb_key())
    }

    /// Colours in declaration order.
    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    /// Get the number of colours.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Always false; construction rejects empty palettes.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        let colours = PLACE_2023.iter().filter_map(|h| Colour::from_hex(h).ok());
        Self {
            name: "place-2023".to_string(),
            members: colours.clone().map(Colour::rgb_key).collect(),
            colours: colours.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_place_palette() {
        let palette = Palette::builtin("place-2023").unwrap();
        assert_eq!(palette.len(), 32);
        assert!(palette.contains(Colour::rgb(0xFF, 0x45, 0x00)));
        assert!(palette.contains(Colour::BLACK));
        assert!(palette.colours().iter().all(|c| c.is_opaque()));
    }

    #[test]
    fn test_builtin_unknown() {
        assert!(Palette::builtin("nope").is_none());
        for name in BUILTIN_PALETTES {
            assert!(Palette::builtin(name).is_some(), "{}", name);
        }
    }

    #[test]
    fn test_membership_is_exact_and_ignores_alpha() {
        let palette = Palette::builtin("mono").unwrap();
        assert!(palette.contains(Colour::new(255, 255, 255, 3)));
        assert!(!palette.contains(Colour::rgb(254, 255, 255)));
    }

    #[test]
    fn test_duplicates_dropped_in_order() {
        let palette = Palette::from_hex("dup", &["#000", "#FFF", "#000000"]).unwrap();
        assert_eq!(palette.colours(), &[Colour::BLACK, Colour::WHITE]);
    }

    #[test]
    fn test_empty_palette_rejected() {
        let empty: [&str; 0] = [];
        assert!(Palette::from_hex("empty", &empty).is_err());
    }

    #[test]
    fn test_default_matches_builtin() {
        let default = Palette::default();
        let builtin = Palette::builtin("place-2023").unwrap();
        assert_eq!(default.colours(), builtin.colours());
    }
}
