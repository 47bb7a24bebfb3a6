use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Error;
use crate::moves::{Move, ALL_MOVES};

/// Parse a space separated move sequence such as `"R U R' U'"`.
pub fn scramble_from_str(s: &str) -> Result<Vec<Move>, Error> {
    s.split_whitespace()
        .map(|word| Move::from_str(word.trim()))
        .collect()
}

pub fn scramble_to_str(s: &[Move]) -> String {
    s.iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A random sequence of `length` moves, never turning the same face twice in a row.
pub fn gen_scramble(length: usize) -> Vec<Move> {
    gen_scramble_with(&mut rand::thread_rng(), length)
}

pub fn gen_scramble_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Vec<Move> {
    let mut scramble: Vec<Move> = Vec::with_capacity(length);
    while scramble.len() < length {
        let candidates: Vec<Move> = match scramble.last() {
            Some(last) => ALL_MOVES
                .into_iter()
                .filter(|m| !m.is_same_layer(*last))
                .collect(),
            None => ALL_MOVES.to_vec(),
        };
        if let Some(&m) = candidates.choose(rng) {
            scramble.push(m);
        }
    }
    scramble
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::moves::Move::*;

    #[test]
    fn test_scramble_from_str() {
        let m = vec![R, U, R3, U3, F, L3, D3, B2, R3, U3];
        assert_eq!(scramble_from_str("R U R' U' F L' D' B2 R' U'").unwrap(), m);
        assert_eq!(scramble_from_str("  R   U2 ").unwrap(), vec![R, U2]);
        assert!(scramble_from_str("").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_scramble() {
        assert!(matches!(
            scramble_from_str("R X U"),
            Err(Error::InvalidScramble(word)) if word == "X"
        ));
    }

    #[test]
    fn test_scramble_to_str() {
        let m = vec![R, U, R3, U3, F, L3, D3, B2, R3, U3];
        assert_eq!(scramble_to_str(&m), "R U R' U' F L' D' B2 R' U'");
        assert_eq!(scramble_to_str(&[]), "");
    }

    #[test]
    fn test_gen_scramble() {
        let ss = gen_scramble(25);
        assert_eq!(ss.len(), 25);
        let mut rng = StdRng::seed_from_u64(3);
        let ss = gen_scramble_with(&mut rng, 40);
        assert!(ss.windows(2).all(|w| w[0].face() != w[1].face()));
    }
}
