//! Moves on the facelet level.
//!
//! A quarter turn rotates the eight outer stickers of the turned face and cycles the
//! four three-sticker strips of its neighbours, see [ADJACENT_STRIPS].

use crate::constants::{ADJACENT_STRIPS, CLOCKWISE_SOURCE, COUNTER_CLOCKWISE_SOURCE};
use crate::facelet::{CubeState, Face, Faces};
use crate::moves::{Direction, Move};

fn quarter_turn(faces: &mut Faces, face: Face, direction: Direction) {
    let old = *faces;
    let source = match direction {
        Direction::Clockwise => &CLOCKWISE_SOURCE,
        Direction::Counterclockwise => &COUNTER_CLOCKWISE_SOURCE,
    };
    for (i, &from) in source.iter().enumerate() {
        faces[face][i] = old[face][from];
    }

    let strips = &ADJACENT_STRIPS[face as usize];
    for k in 0..4 {
        let (from, to) = match direction {
            Direction::Clockwise => (strips[k], strips[(k + 1) % 4]),
            Direction::Counterclockwise => (strips[(k + 1) % 4], strips[k]),
        };
        for i in 0..3 {
            faces[to.face][to.positions[i]] = old[from.face][from.positions[i]];
        }
    }
}

/// Apply a move to a state, returning the new state. The input is left untouched.
///
/// Works on partially configured states too, empty slots travel like colors.
pub fn apply_move(state: &CubeState, m: Move) -> CubeState {
    let details = m.details();
    let mut faces = state.faces;
    for _ in 0..details.degrees / 90 {
        quarter_turn(&mut faces, details.face, details.direction);
    }
    CubeState {
        faces,
        metadata: state.metadata,
    }
}

pub fn apply_moves(state: &CubeState, moves: &[Move]) -> CubeState {
    moves
        .iter()
        .fold(state.clone(), |state, &m| apply_move(&state, m))
}

#[cfg(test)]
mod test {
    use crate::cubie::CubieCube;
    use crate::executor::*;
    use crate::facelet::{Color, CENTER};
    use crate::moves::{Move::*, ALL_MOVES};

    fn scrambled() -> CubeState {
        apply_moves(&CubeState::solved(), &[R, U, F3, L2, D, B3, U2, R3])
    }

    #[test]
    fn test_move_then_inverse() {
        let start = scrambled();
        for m in ALL_MOVES {
            assert_ne!(apply_move(&CubeState::solved(), m), CubeState::solved());
            let there = apply_move(&start, m);
            assert_eq!(apply_move(&there, m.get_inverse()), start, "{m}");
        }
    }

    #[test]
    fn test_quarter_turn_order_four() {
        let start = scrambled();
        for m in [U, R, F, D, L, B, U3, R3, F3, D3, L3, B3] {
            let mut state = start.clone();
            for _ in 0..4 {
                state = apply_move(&state, m);
            }
            assert_eq!(state, start, "{m}");
        }
    }

    #[test]
    fn test_half_turn_is_two_quarters() {
        let start = scrambled();
        for (half, quarter) in [(U2, U), (R2, R), (F2, F), (D2, D), (L2, L), (B2, B)] {
            assert_eq!(
                apply_move(&start, half),
                apply_moves(&start, &[quarter, quarter])
            );
        }
    }

    #[test]
    fn test_opposite_faces_commute() {
        let start = scrambled();
        for (a, b) in [(U, D), (R, L), (F, B), (U3, D2), (L3, R)] {
            assert_eq!(apply_moves(&start, &[a, b]), apply_moves(&start, &[b, a]));
        }
    }

    #[test]
    fn test_input_untouched() {
        let start = CubeState::solved();
        let copy = start.clone();
        let _ = apply_move(&start, F);
        assert_eq!(start, copy);
    }

    #[test]
    fn test_centers_fixed() {
        let state = scrambled();
        assert!(state.centers_intact());
        assert_eq!(state.color_counts(), [9; 6]);
    }

    #[test]
    fn test_u_turn_strips() {
        // U clockwise brings the right face's top row to the front
        let state = apply_move(&CubeState::solved(), U);
        assert_eq!(state.faces[Face::Front][..3], [Some(Color::Red); 3]);
        assert_eq!(state.faces[Face::Left][..3], [Some(Color::Green); 3]);
        assert_eq!(state.faces[Face::Back][..3], [Some(Color::Orange); 3]);
        assert_eq!(state.faces[Face::Right][..3], [Some(Color::Blue); 3]);
        assert_eq!(state.faces[Face::Front][3..], [Some(Color::Green); 6]);
    }

    #[test]
    fn test_agrees_with_cubie_moves() {
        let mut cc = CubieCube::default();
        let mut state = CubeState::solved();
        for m in [R, U, F3, L2, D, B3, U2, R3, F, D3, B, L] {
            cc = cc.apply_move(m);
            state = apply_move(&state, m);
            assert_eq!(state, CubeState::from(&cc), "after {m}");
        }
        for m in ALL_MOVES {
            let single = CubeState::from(&CubieCube::default().apply_move(m));
            assert_eq!(apply_move(&CubeState::solved(), m), single, "{m}");
        }
    }

    #[test]
    fn test_partial_state() {
        let state = CubeState::empty()
            .with_color(Face::Up, 7, Some(Color::White))
            .unwrap();
        let turned = apply_move(&state, F);
        assert_eq!(turned.faces[Face::Right][3], Some(Color::White));
        assert_eq!(turned.faces[Face::Up][7], None);
        assert_eq!(turned.faces[Face::Front][CENTER], Some(Color::Green));
    }
}
