use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::time::SystemTime;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Names the faces of the cube.
///
/// The discriminants follow the facelet string order U, R, F, D, L, B.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    #[serde(rename = "U")]
    Up,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "F")]
    Front,
    #[serde(rename = "D")]
    Down,
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "B")]
    Back,
}

pub const ALL_FACES: [Face; 6] = [
    Face::Up,
    Face::Right,
    Face::Front,
    Face::Down,
    Face::Left,
    Face::Back,
];

impl Face {
    pub fn letter(self) -> char {
        match self {
            Face::Up => 'U',
            Face::Right => 'R',
            Face::Front => 'F',
            Face::Down => 'D',
            Face::Left => 'L',
            Face::Back => 'B',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'U' => Some(Face::Up),
            'R' => Some(Face::Right),
            'F' => Some(Face::Front),
            'D' => Some(Face::Down),
            'L' => Some(Face::Left),
            'B' => Some(Face::Back),
            _ => None,
        }
    }

    /// Color of the center, which never moves.
    pub fn center_color(self) -> Color {
        match self {
            Face::Up => Color::White,
            Face::Right => Color::Red,
            Face::Front => Color::Green,
            Face::Down => Color::Yellow,
            Face::Left => Color::Orange,
            Face::Back => Color::Blue,
        }
    }

    pub fn opposite(self) -> Face {
        ALL_FACES[(self as usize + 3) % 6]
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl TryFrom<usize> for Face {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        ALL_FACES
            .get(value)
            .copied()
            .ok_or(Error::InvalidCubieValue)
    }
}

/// Sticker colors.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    White,
    Yellow,
    Green,
    Blue,
    Orange,
    Red,
}

pub const ALL_COLORS: [Color; 6] = [
    Color::White,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Orange,
    Color::Red,
];

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Yellow,
            Color::Yellow => Color::White,
            Color::Green => Color::Blue,
            Color::Blue => Color::Green,
            Color::Orange => Color::Red,
            Color::Red => Color::Orange,
        }
    }

    /// The face this color belongs to on the solved cube.
    pub fn home_face(self) -> Face {
        match self {
            Color::White => Face::Up,
            Color::Red => Face::Right,
            Color::Green => Face::Front,
            Color::Yellow => Face::Down,
            Color::Orange => Face::Left,
            Color::Blue => Face::Back,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::White => "WHITE",
            Color::Yellow => "YELLOW",
            Color::Green => "GREEN",
            Color::Blue => "BLUE",
            Color::Orange => "ORANGE",
            Color::Red => "RED",
        };
        f.write_str(name)
    }
}

/// Address of a single sticker: a face plus a row-major position 0..=8.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceletId {
    pub face: Face,
    pub position: usize,
}

impl FaceletId {
    pub const fn new(face: Face, position: usize) -> Self {
        Self { face, position }
    }
}

impl fmt::Display for FaceletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face, self.position)
    }
}

pub const CENTER: usize = 4;

/// The 54 sticker slots, `None` meaning not configured yet.
///
/// Serialized as a map keyed by face letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Faces(pub [[Option<Color>; 9]; 6]);

impl Index<Face> for Faces {
    type Output = [Option<Color>; 9];

    fn index(&self, face: Face) -> &Self::Output {
        &self.0[face as usize]
    }
}

impl IndexMut<Face> for Faces {
    fn index_mut(&mut self, face: Face) -> &mut Self::Output {
        &mut self.0[face as usize]
    }
}

impl Index<FaceletId> for Faces {
    type Output = Option<Color>;

    fn index(&self, id: FaceletId) -> &Self::Output {
        &self.0[id.face as usize][id.position]
    }
}

impl IndexMut<FaceletId> for Faces {
    fn index_mut(&mut self, id: FaceletId) -> &mut Self::Output {
        &mut self.0[id.face as usize][id.position]
    }
}

impl Serialize for Faces {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6))?;
        for face in ALL_FACES {
            map.serialize_entry(&face, &self[face])?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Faces {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = HashMap::<Face, [Option<Color>; 9]>::deserialize(deserializer)?;
        let mut faces = [[None; 9]; 6];
        for face in ALL_FACES {
            faces[face as usize] = *map
                .get(&face)
                .ok_or_else(|| de::Error::custom(format!("missing face {}", face.letter())))?;
        }
        Ok(Faces(faces))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMetadata {
    pub total_configured: usize,
    pub is_complete: bool,
    pub is_valid: bool,
    pub last_modified: SystemTime,
}

/// Represent a cube on the facelet level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeState {
    pub faces: Faces,
    pub metadata: StateMetadata,
}

/// Equality looks at the stickers only, metadata is bookkeeping.
impl PartialEq for CubeState {
    fn eq(&self, other: &Self) -> bool {
        self.faces == other.faces
    }
}

impl Eq for CubeState {}

impl Default for CubeState {
    fn default() -> Self {
        Self::empty()
    }
}

impl CubeState {
    /// A state with only the six centers filled.
    pub fn empty() -> Self {
        let mut faces = Faces([[None; 9]; 6]);
        for face in ALL_FACES {
            faces[face][CENTER] = Some(face.center_color());
        }
        Self::from_faces(faces)
    }

    pub fn solved() -> Self {
        let mut faces = Faces([[None; 9]; 6]);
        for face in ALL_FACES {
            faces[face] = [Some(face.center_color()); 9];
        }
        let mut state = Self::from_faces(faces);
        state.metadata.is_valid = true;
        state
    }

    /// Wraps raw faces, deriving the counters from the stickers.
    pub fn from_faces(faces: Faces) -> Self {
        let total_configured = faces.0.iter().flatten().filter(|c| c.is_some()).count();
        Self {
            faces,
            metadata: StateMetadata {
                total_configured,
                is_complete: total_configured == 54,
                is_valid: false,
                last_modified: SystemTime::now(),
            },
        }
    }

    pub fn color(&self, face: Face, position: usize) -> Option<Color> {
        self.faces[face].get(position).copied().flatten()
    }

    /// Returns a copy with one sticker changed. Centers are fixed.
    pub fn with_color(
        &self,
        face: Face,
        position: usize,
        color: Option<Color>,
    ) -> Result<CubeState, Error> {
        if position > 8 {
            return Err(Error::InvalidFaceletPosition(position));
        }
        if position == CENTER {
            return Err(Error::CenterFacelet { face, position });
        }
        let mut faces = self.faces;
        faces[face][position] = color;
        Ok(Self::from_faces(faces))
    }

    pub fn configured_count(&self) -> usize {
        self.faces.0.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.configured_count() == 54
    }

    /// Number of stickers of each color, in [ALL_COLORS] order.
    pub fn color_counts(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        for color in self.faces.0.iter().flatten().flatten() {
            counts[*color as usize] += 1;
        }
        counts
    }

    pub fn centers_intact(&self) -> bool {
        ALL_FACES
            .iter()
            .all(|&face| self.faces[face][CENTER] == Some(face.center_color()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_state() {
        let state = CubeState::empty();
        assert_eq!(state.metadata.total_configured, 6);
        assert!(!state.metadata.is_complete);
        assert_eq!(state.color(Face::Front, CENTER), Some(Color::Green));
        assert_eq!(state.color(Face::Front, 0), None);
        assert!(state.centers_intact());
    }

    #[test]
    fn test_solved_state() {
        let state = CubeState::solved();
        assert!(state.is_complete());
        assert_eq!(state.color_counts(), [9; 6]);
        assert_eq!(state.color(Face::Down, 8), Some(Color::Yellow));
    }

    #[test]
    fn test_with_color() {
        let state = CubeState::empty();
        let next = state.with_color(Face::Up, 0, Some(Color::Red)).unwrap();
        assert_eq!(next.color(Face::Up, 0), Some(Color::Red));
        assert_eq!(next.metadata.total_configured, 7);
        assert_eq!(state.color(Face::Up, 0), None);
        assert!(matches!(
            state.with_color(Face::Up, CENTER, Some(Color::Red)),
            Err(Error::CenterFacelet { .. })
        ));
        assert!(matches!(
            state.with_color(Face::Up, 9, Some(Color::Red)),
            Err(Error::InvalidFaceletPosition(9))
        ));
    }

    #[test]
    fn test_equality_ignores_metadata() {
        let a = CubeState::solved();
        let mut b = CubeState::solved();
        b.metadata.is_valid = false;
        b.metadata.total_configured = 0;
        assert_eq!(a, b);
    }

    #[test]
    fn test_opposites() {
        for color in ALL_COLORS {
            assert_eq!(color.opposite().opposite(), color);
            assert_eq!(color.home_face().opposite(), color.opposite().home_face());
            assert_eq!(color.home_face().center_color(), color);
        }
    }

    #[test]
    fn test_serialized_shape() {
        let state = CubeState::empty();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["faces"]["F"][4], "GREEN");
        assert!(json["faces"]["U"][0].is_null());
        assert_eq!(json["metadata"]["totalConfigured"], 6);
        assert_eq!(json["metadata"]["isComplete"], false);

        let back: CubeState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_missing_face_is_rejected() {
        let mut json = serde_json::to_value(CubeState::solved()).unwrap();
        json["faces"].as_object_mut().unwrap().remove("B");
        let err = serde_json::from_value::<CubeState>(json).unwrap_err();
        assert!(err.to_string().contains("missing face B"));
    }
}
