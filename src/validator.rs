use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{CORNER_COLOR, CORNER_FACELET, EDGE_COLOR, EDGE_FACELET};
use crate::cubie::{corner_at, edge_at, CubieCube};
use crate::facelet::{Color, CubeState, Face, FaceletId, ALL_COLORS, ALL_FACES, CENTER};

fn list<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single finding of [validate].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationError {
    #[error("Configuration is incomplete. Please configure all {remaining} remaining facelets.")]
    IncompleteConfiguration { remaining: usize },
    #[error("The {face} center must be {expected}, centers never move.")]
    MisplacedCenter { face: Face, expected: Color },
    #[error("The {color} color has been used {count} times. Each color should appear exactly 9 times.")]
    ColorOveruse { color: Color, count: usize },
    #[error("The {color} color has been used {count} times. Each color should appear exactly 9 times.")]
    ColorUnderuse { color: Color, count: usize },
    #[error("The corner piece has opposite colors ({first} and {second}) which cannot appear together.")]
    OppositeColorsCorner {
        first: Color,
        second: Color,
        facelets: Vec<FaceletId>,
    },
    #[error("The edge piece has opposite colors ({first} and {second}) which cannot appear together.")]
    OppositeColorsEdge {
        first: Color,
        second: Color,
        facelets: Vec<FaceletId>,
    },
    #[error("The piece has the same color ({color}) appearing twice, which is impossible.")]
    DuplicateColorsPiece {
        color: Color,
        facelets: Vec<FaceletId>,
    },
    #[error("The corner piece at {} has an invalid color combination: {}.", list(.facelets), list(.colors))]
    InvalidCorner {
        colors: Vec<Color>,
        facelets: Vec<FaceletId>,
    },
    #[error("The edge piece at {} has an invalid color combination: {}.", list(.facelets), list(.colors))]
    InvalidEdge {
        colors: Vec<Color>,
        facelets: Vec<FaceletId>,
    },
    #[error("The piece at {} is physically impossible to achieve.", list(.facelets))]
    UnsolvableState { facelets: Vec<FaceletId> },
    #[error("This cube configuration is unsolvable: the corners are twisted by {twist} in total.")]
    UnsolvableTwist { twist: u8 },
    #[error("This cube configuration is unsolvable: a single edge is flipped.")]
    UnsolvableFlip,
    #[error("This cube configuration is unsolvable due to incorrect permutation parity.")]
    UnsolvableParity,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::IncompleteConfiguration { .. } => "INCOMPLETE_CONFIGURATION",
            ValidationError::MisplacedCenter { .. } => "MISPLACED_CENTER",
            ValidationError::ColorOveruse { .. } => "COLOR_OVERUSE",
            ValidationError::ColorUnderuse { .. } => "COLOR_UNDERUSE",
            ValidationError::OppositeColorsCorner { .. } => "OPPOSITE_COLORS_CORNER",
            ValidationError::OppositeColorsEdge { .. } => "OPPOSITE_COLORS_EDGE",
            ValidationError::DuplicateColorsPiece { .. } => "DUPLICATE_COLORS_PIECE",
            ValidationError::InvalidCorner { .. } => "INVALID_CORNER",
            ValidationError::InvalidEdge { .. } => "INVALID_EDGE",
            ValidationError::UnsolvableState { .. } => "UNSOLVABLE_STATE",
            ValidationError::UnsolvableTwist { .. } => "UNSOLVABLE_TWIST",
            ValidationError::UnsolvableFlip => "UNSOLVABLE_FLIP",
            ValidationError::UnsolvableParity => "UNSOLVABLE_PARITY",
        }
    }

    pub fn affected_facelets(&self) -> &[FaceletId] {
        match self {
            ValidationError::OppositeColorsCorner { facelets, .. }
            | ValidationError::OppositeColorsEdge { facelets, .. }
            | ValidationError::DuplicateColorsPiece { facelets, .. }
            | ValidationError::InvalidCorner { facelets, .. }
            | ValidationError::InvalidEdge { facelets, .. }
            | ValidationError::UnsolvableState { facelets } => facelets,
            _ => &[],
        }
    }

    /// Findings that only the cubie level can see: every piece looks fine on its own.
    pub fn is_solvability(&self) -> bool {
        matches!(
            self,
            ValidationError::UnsolvableState { .. }
                | ValidationError::UnsolvableTwist { .. }
                | ValidationError::UnsolvableFlip
                | ValidationError::UnsolvableParity
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub is_complete: bool,
    pub errors: Vec<ValidationError>,
}

lazy_static! {
    /// Sorted color sets of the 8 real corners.
    static ref CORNER_SETS: Vec<Vec<Color>> = CORNER_COLOR
        .iter()
        .map(|faces| sorted(faces.iter().map(|f| f.center_color())))
        .collect();
    /// Sorted color sets of the 12 real edges.
    static ref EDGE_SETS: Vec<Vec<Color>> = EDGE_COLOR
        .iter()
        .map(|faces| sorted(faces.iter().map(|f| f.center_color())))
        .collect();
}

fn sorted(colors: impl Iterator<Item = Color>) -> Vec<Color> {
    let mut colors: Vec<Color> = colors.collect();
    colors.sort();
    colors
}

#[derive(Clone, Copy)]
enum Piece {
    Corner,
    Edge,
}

/// First finding for one piece: opposite colors, then a repeated color, then the allow-list.
fn check_piece(state: &CubeState, facelets: &[FaceletId], piece: Piece) -> Option<ValidationError> {
    let colors: Vec<Color> = facelets
        .iter()
        .map(|&id| state.faces[id])
        .collect::<Option<_>>()?;
    let ids = facelets.to_vec();

    for i in 0..colors.len() {
        for j in i + 1..colors.len() {
            if colors[i].opposite() == colors[j] {
                let (first, second) = (colors[i], colors[j]);
                return Some(match piece {
                    Piece::Corner => ValidationError::OppositeColorsCorner {
                        first,
                        second,
                        facelets: ids,
                    },
                    Piece::Edge => ValidationError::OppositeColorsEdge {
                        first,
                        second,
                        facelets: ids,
                    },
                });
            }
        }
    }
    for i in 0..colors.len() {
        for j in i + 1..colors.len() {
            if colors[i] == colors[j] {
                return Some(ValidationError::DuplicateColorsPiece {
                    color: colors[i],
                    facelets: ids,
                });
            }
        }
    }
    let key = sorted(colors.iter().copied());
    match piece {
        Piece::Corner if !CORNER_SETS.contains(&key) => Some(ValidationError::InvalidCorner {
            colors,
            facelets: ids,
        }),
        Piece::Edge if !EDGE_SETS.contains(&key) => Some(ValidationError::InvalidEdge {
            colors,
            facelets: ids,
        }),
        _ => None,
    }
}

fn check_color_counts(state: &CubeState, errors: &mut Vec<ValidationError>) {
    let counts = state.color_counts();
    for color in ALL_COLORS {
        let count = counts[color as usize];
        if count > 9 {
            errors.push(ValidationError::ColorOveruse { color, count });
        } else if count < 9 {
            errors.push(ValidationError::ColorUnderuse { color, count });
        }
    }
}

/// Lift the stickers to cubies and check the invariants every reachable cube keeps.
fn check_solvability(state: &CubeState, errors: &mut Vec<ValidationError>) {
    let mut cc = CubieCube::default();
    let before = errors.len();
    for (i, facelets) in CORNER_FACELET.iter().enumerate() {
        match corner_at(&state.faces, i) {
            Some((corner, ori)) => {
                cc.cp[i] = corner;
                cc.co[i] = ori;
            }
            None => errors.push(ValidationError::UnsolvableState {
                facelets: facelets.to_vec(),
            }),
        }
    }
    for (i, facelets) in EDGE_FACELET.iter().enumerate() {
        match edge_at(&state.faces, i) {
            Some((edge, ori)) => {
                cc.ep[i] = edge;
                cc.eo[i] = ori;
            }
            None => errors.push(ValidationError::UnsolvableState {
                facelets: facelets.to_vec(),
            }),
        }
    }
    if errors.len() > before {
        return;
    }

    if !cc.has_unique_pieces() {
        for i in 0..8 {
            if cc.cp.iter().filter(|&&c| c == cc.cp[i]).count() > 1 {
                errors.push(ValidationError::UnsolvableState {
                    facelets: CORNER_FACELET[i].to_vec(),
                });
            }
        }
        for i in 0..12 {
            if cc.ep.iter().filter(|&&e| e == cc.ep[i]).count() > 1 {
                errors.push(ValidationError::UnsolvableState {
                    facelets: EDGE_FACELET[i].to_vec(),
                });
            }
        }
        return;
    }
    let twist = cc.twist_sum();
    if twist != 0 {
        errors.push(ValidationError::UnsolvableTwist { twist });
    }
    if cc.flip_sum() != 0 {
        errors.push(ValidationError::UnsolvableFlip);
    }
    if cc.corner_parity() != cc.edge_parity() {
        errors.push(ValidationError::UnsolvableParity);
    }
}

fn check_centers(state: &CubeState, errors: &mut Vec<ValidationError>) {
    if state.centers_intact() {
        return;
    }
    for face in ALL_FACES {
        let expected = face.center_color();
        if state.faces[face][CENTER] != Some(expected) {
            errors.push(ValidationError::MisplacedCenter { face, expected });
        }
    }
}

/// Check a cube state.
///
/// An incomplete state yields only the remaining count. A complete one is checked for
/// fixed centers, color balance and piece legality, and when those pass, for solvability.
pub fn validate(state: &CubeState) -> ValidationResult {
    let configured = state.configured_count();
    if configured < 54 {
        return ValidationResult {
            is_valid: false,
            is_complete: false,
            errors: vec![ValidationError::IncompleteConfiguration {
                remaining: 54 - configured,
            }],
        };
    }

    let mut errors = Vec::new();
    check_centers(state, &mut errors);
    check_color_counts(state, &mut errors);
    for facelets in CORNER_FACELET.iter() {
        errors.extend(check_piece(state, facelets, Piece::Corner));
    }
    for facelets in EDGE_FACELET.iter() {
        errors.extend(check_piece(state, facelets, Piece::Edge));
    }
    if errors.is_empty() {
        check_solvability(state, &mut errors);
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        is_complete: true,
        errors,
    }
}
