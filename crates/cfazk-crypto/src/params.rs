//! Poseidon round-constant and MDS tables.
//!
//! The tables are precomputed collaborator data (the same tables the circuit
//! compiler bakes into the verifier), supplied as a JSON file:
//!
//! ```json
//! {
//!   "tables": [
//!     { "t": 9,
//!       "c": ["<decimal>", "..."],
//!       "m": [["<decimal>", "..."], ["..."]] }
//!   ]
//! }
//! ```
//!
//! `c` is the flat round-constant vector of length `t * (n_rounds_f +
//! n_rounds_p[t - 2])`, `m` the `t × t` MDS matrix. Entries are decimal field
//! elements; anything `>= p` is rejected at load time.

use crate::field::Fr;
use crate::CryptoError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Number of full rounds, independent of arity.
pub const N_ROUNDS_F: usize = 8;

/// Partial-round counts indexed by `t - 2`.
pub const N_ROUNDS_P: [usize; 8] = [56, 57, 56, 60, 60, 63, 64, 63];

/// Smallest supported state width.
pub const MIN_T: usize = 2;

/// Largest supported state width.
pub const MAX_T: usize = 9;

#[derive(Debug, Deserialize)]
struct RawParams {
    tables: Vec<RawTable>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    t: usize,
    c: Vec<String>,
    m: Vec<Vec<String>>,
}

/// Round constants and MDS matrix for one permutation arity.
#[derive(Clone, Debug)]
pub struct PoseidonTable {
    t: usize,
    c: Vec<Fr>,
    m: Vec<Vec<Fr>>,
}

impl PoseidonTable {
    /// Build a table, validating arity and shape.
    ///
    /// # Errors
    /// `UnsupportedArity` for `t` outside `[2, 9]`; `MalformedTable` when the
    /// constant vector or matrix have the wrong dimensions.
    pub fn new(t: usize, c: Vec<Fr>, m: Vec<Vec<Fr>>) -> Result<Self, CryptoError> {
        if !(MIN_T..=MAX_T).contains(&t) {
            return Err(CryptoError::UnsupportedArity { t });
        }
        let expect_c = t * (N_ROUNDS_F + N_ROUNDS_P[t - 2]);
        if c.len() != expect_c {
            return Err(CryptoError::MalformedTable {
                t,
                reason: format!("expected {expect_c} round constants, got {}", c.len()),
            });
        }
        if m.len() != t || m.iter().any(|row| row.len() != t) {
            return Err(CryptoError::MalformedTable {
                t,
                reason: format!("MDS matrix must be {t}x{t}"),
            });
        }
        Ok(Self { t, c, m })
    }

    /// State width this table serves.
    #[inline]
    #[must_use]
    pub fn t(&self) -> usize {
        self.t
    }

    /// `(full, partial)` round counts for this arity.
    #[inline]
    #[must_use]
    pub fn rounds(&self) -> (usize, usize) {
        (N_ROUNDS_F, N_ROUNDS_P[self.t - 2])
    }

    /// Round constant for round `r`, element `i` (flat layout `c[r*t + i]`).
    #[inline]
    #[must_use]
    pub fn constant(&self, r: usize, i: usize) -> &Fr {
        &self.c[r * self.t + i]
    }

    /// Row `i` of the MDS matrix.
    #[inline]
    #[must_use]
    pub fn mds_row(&self, i: usize) -> &[Fr] {
        &self.m[i]
    }
}

/// A set of [`PoseidonTable`]s, at most one per arity.
#[derive(Clone, Debug, Default)]
pub struct PoseidonParams {
    // Slot `t - 2` holds the table for arity `t`.
    tables: Vec<Option<PoseidonTable>>,
}

impl PoseidonParams {
    /// Assemble parameters from already-validated tables.
    ///
    /// # Errors
    /// `MalformedTable` when two tables claim the same arity.
    pub fn from_tables(tables: Vec<PoseidonTable>) -> Result<Self, CryptoError> {
        let mut slots: Vec<Option<PoseidonTable>> = vec![None; MAX_T - MIN_T + 1];
        for table in tables {
            let t = table.t();
            let slot = &mut slots[t - MIN_T];
            if slot.is_some() {
                return Err(CryptoError::MalformedTable {
                    t,
                    reason: "duplicate table for this arity".to_owned(),
                });
            }
            *slot = Some(table);
        }
        Ok(Self { tables: slots })
    }

    /// Load and validate parameters from a JSON file.
    ///
    /// # Errors
    /// File/JSON errors with path context, plus every [`PoseidonTable::new`]
    /// shape check and the `< p` range check on each entry.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let f = File::open(path_ref)
            .with_context(|| format!("open {}", path_ref.display()))?;
        let raw: RawParams = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("deserialize Poseidon parameters {}", path_ref.display()))?;

        let mut tables = Vec::with_capacity(raw.tables.len());
        for rt in raw.tables {
            let t = rt.t;
            let c = parse_entries(&rt.c, t)?;
            let mut m = Vec::with_capacity(rt.m.len());
            for row in &rt.m {
                m.push(parse_entries(row, t)?);
            }
            tables.push(PoseidonTable::new(t, c, m)?);
        }
        Ok(Self::from_tables(tables)?)
    }

    /// Look up the table for arity `t`.
    ///
    /// # Errors
    /// `UnsupportedArity` outside `[2, 9]`; `MissingTable` when the loaded
    /// file carried no table for this arity.
    pub fn table(&self, t: usize) -> Result<&PoseidonTable, CryptoError> {
        if !(MIN_T..=MAX_T).contains(&t) {
            return Err(CryptoError::UnsupportedArity { t });
        }
        self.tables[t - MIN_T]
            .as_ref()
            .ok_or(CryptoError::MissingTable { t })
    }
}

fn parse_entries(entries: &[String], t: usize) -> Result<Vec<Fr>, CryptoError> {
    entries
        .iter()
        .map(|s| {
            Fr::from_dec_str(s).map_err(|e| CryptoError::MalformedTable {
                t,
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_table(t: usize) -> PoseidonTable {
        let rounds = N_ROUNDS_F + N_ROUNDS_P[t - 2];
        let c = (0..t * rounds).map(|i| Fr::from_u64(i as u64 + 1)).collect();
        let m = (0..t)
            .map(|i| (0..t).map(|j| Fr::from_u64((i * t + j + 2) as u64)).collect())
            .collect();
        PoseidonTable::new(t, c, m).unwrap()
    }

    #[test]
    fn table_shape_checks() {
        assert!(matches!(
            PoseidonTable::new(1, vec![], vec![]),
            Err(CryptoError::UnsupportedArity { t: 1 })
        ));
        assert!(matches!(
            PoseidonTable::new(10, vec![], vec![]),
            Err(CryptoError::UnsupportedArity { t: 10 })
        ));
        // Wrong constant count.
        assert!(PoseidonTable::new(2, vec![Fr::zero()], vec![vec![Fr::zero(); 2]; 2]).is_err());
        // Ragged matrix.
        let rounds = N_ROUNDS_F + N_ROUNDS_P[0];
        assert!(PoseidonTable::new(
            2,
            vec![Fr::zero(); 2 * rounds],
            vec![vec![Fr::zero(); 2], vec![Fr::zero(); 3]],
        )
        .is_err());
    }

    #[test]
    fn lookup_and_duplicates() {
        let params = PoseidonParams::from_tables(vec![tiny_table(2), tiny_table(9)]).unwrap();
        assert_eq!(params.table(2).unwrap().t(), 2);
        assert_eq!(params.table(9).unwrap().t(), 9);
        assert!(matches!(params.table(3), Err(CryptoError::MissingTable { t: 3 })));
        assert!(matches!(params.table(11), Err(CryptoError::UnsupportedArity { t: 11 })));

        assert!(PoseidonParams::from_tables(vec![tiny_table(2), tiny_table(2)]).is_err());
    }

    #[test]
    fn partial_round_table_matches_arity() {
        let (rf, rp) = tiny_table(9).rounds();
        assert_eq!(rf, 8);
        assert_eq!(rp, 63);
        assert_eq!(tiny_table(2).rounds().1, 56);
    }
}
