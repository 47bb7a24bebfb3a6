//! A crate for modelling the 3x3 Rubik's cube on the facelet level and solving it, either with
//! [Kociemba's two phase algorithm](http://kociemba.org/cube.htm) or with the beginner's
//! layer-by-layer method.
//!
//! ```rust,no_run
//! use cube_assembly::calculator::SolutionCalculator;
//! use cube_assembly::executor::apply_moves;
//! use cube_assembly::facelet::CubeState;
//! use cube_assembly::scramble::scramble_from_str;
//!
//! # async fn run() -> Result<(), cube_assembly::error::Error> {
//! let scramble = scramble_from_str("R U R' U' F2 D")?;
//! let state = apply_moves(&CubeState::solved(), &scramble);
//! let solution = SolutionCalculator::default().calculate_solution(&state).await?;
//! assert!(solution.is_solved);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate lazy_static;

pub mod error;

/// Module containing 3x3 cube constants.
pub mod constants;
pub mod facelet;

pub mod executor;
pub mod simulator;
pub mod validator;

pub mod bridge;
pub mod coord;
pub mod cubie;
pub mod moves;
pub mod pruning;
pub mod solver;

pub mod algorithm;
pub mod layered;

pub mod builder;
pub mod calculator;
pub mod config;
pub mod configuration;

/// Module containing functions for scrambling the cube.
pub mod scramble;

use std::{fs, path::Path};

use bincode::{
    config::{self as bincode_config, Configuration},
    decode_from_slice, encode_to_vec,
    error::DecodeError,
    Decode, Encode,
};

use crate::error::Error;

const CONFIG: Configuration = bincode_config::standard();

pub fn write_table<P, T: Encode>(path: P, table: &T) -> Result<(), Error>
where
    P: AsRef<Path>,
{
    let encoded = encode_to_vec(table, CONFIG)?;
    fs::write(path, encoded)?;
    Ok(())
}

pub fn decode_table<T: Decode<()>>(bytes: &[u8]) -> Result<T, Error> {
    let (decoded, written) = decode_from_slice(bytes, CONFIG)?;
    let additional = bytes.len() - written;

    if additional != 0 {
        return Err(DecodeError::UnexpectedEnd { additional })?;
    }
    Ok(decoded)
}

#[cfg(test)]
mod test {
    use crate::moves::MoveTables;
    use crate::*;

    #[test]
    fn test_table_cache_roundtrip() {
        let dir = std::env::temp_dir().join(format!("cube-assembly-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("move_tables");
        let tables = MoveTables::new();
        write_table(&path, &tables).unwrap();
        let bytes = fs::read(&path).unwrap();
        let decoded: MoveTables = decode_table(&bytes).unwrap();
        assert_eq!(decoded.twist_move, tables.twist_move);
        assert_eq!(decoded.ud_edges_move, tables.ud_edges_move);
        assert!(decode_table::<MoveTables>(&bytes[..bytes.len() / 2]).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = encode_to_vec(vec![1u16, 2, 3], CONFIG).unwrap();
        assert_eq!(decode_table::<Vec<u16>>(&bytes).unwrap(), vec![1, 2, 3]);
        bytes.push(0);
        assert!(matches!(
            decode_table::<Vec<u16>>(&bytes),
            Err(Error::Decode(_))
        ));
    }
}
