//! Conversion between [CubeState] and the 54 character facelet string.
//!
//! The string lists the faces in the order U, R, F, D, L, B, each row-major, and writes
//! every sticker as the letter of the face its color belongs to on the solved cube:
//!
//! ```text
//!              |************|
//!              |*U1**U2**U3*|
//!              |************|
//!              |*U4**U5**U6*|
//!              |************|
//!              |*U7**U8**U9*|
//!              |************|
//! |************|************|************|************|
//! |*L1**L2**L3*|*F1**F2**F3*|*R1**R2**R3*|*B1**B2**B3*|
//! |************|************|************|************|
//! |*L4**L5**L6*|*F4**F5**F6*|*R4**R5**R6*|*B4**B5**B6*|
//! |************|************|************|************|
//! |*L7**L8**L9*|*F7**F8**F9*|*R7**R8**R9*|*B7**B8**B9*|
//! |************|************|************|************|
//!              |************|
//!              |*D1**D2**D3*|
//!              |************|
//!              |*D4**D5**D6*|
//!              |************|
//!              |*D7**D8**D9*|
//!              |************|
//! ```

use crate::error::Error;
use crate::facelet::{CubeState, Face, Faces, ALL_FACES, CENTER};

pub const SOLVED_FACELETS: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

/// Serialize a complete state. Unconfigured stickers are an error.
pub fn state_to_facelet_string(state: &CubeState) -> Result<String, Error> {
    let mut s = String::with_capacity(54);
    for face in ALL_FACES {
        for (position, color) in state.faces[face].iter().enumerate() {
            let color = color.ok_or_else(|| {
                Error::InvalidFaceletString(format!("facelet {face}{position} is not configured"))
            })?;
            s.push(color.home_face().letter());
        }
    }
    Ok(s)
}

/// Parse a facelet string. Exact inverse of [state_to_facelet_string].
pub fn facelet_string_to_state(s: &str) -> Result<CubeState, Error> {
    let count = s.chars().count();
    if count != 54 {
        return Err(Error::InvalidFaceletString(format!(
            "expected 54 facelets, got {count}"
        )));
    }
    let mut faces = Faces([[None; 9]; 6]);
    for (i, c) in s.chars().enumerate() {
        let face = Face::from_letter(c).ok_or_else(|| {
            Error::InvalidFaceletString(format!("invalid facelet `{c}` at index {i}"))
        })?;
        faces.0[i / 9][i % 9] = Some(face.center_color());
    }
    for face in ALL_FACES {
        if faces[face][CENTER] != Some(face.center_color()) {
            return Err(Error::InvalidFaceletString(format!(
                "center of face {face} must be {face}"
            )));
        }
    }
    Ok(CubeState::from_faces(faces))
}

/// Face by face summary for logs, `.` marking unconfigured stickers.
pub fn describe(state: &CubeState) -> String {
    ALL_FACES
        .iter()
        .map(|&face| {
            let stickers: String = state.faces[face]
                .iter()
                .map(|c| c.map_or('.', |c| c.home_face().letter()))
                .collect();
            format!("{face}:{stickers}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}
