use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const PACKAGED_TABLE: &str = include_str!("../../../data/base_pairs.csv");
const PACKAGED_ORIGIN: &str = "<packaged base_pairs.csv>";

/// One hydrogen-bonded atom pair of a base-pair type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BasePairRecord {
    #[serde(rename = "type")]
    pub pair_type: String,
    pub residue1: String,
    pub residue2: String,
    pub atom1: String,
    pub atom2: String,
}

#[derive(Debug, Error)]
pub enum BasePairLoadError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

type PairKey = (String, String, String);

#[derive(Debug, Clone, Default)]
pub struct BasePairTable {
    records: Vec<BasePairRecord>,
    index: HashMap<PairKey, Vec<usize>>,
}

impl BasePairTable {
    pub fn load(path: &Path) -> Result<Self, BasePairLoadError> {
        let origin = path.to_string_lossy().to_string();
        let reader = csv::Reader::from_path(path).map_err(|e| BasePairLoadError::Csv {
            path: origin.clone(),
            source: e,
        })?;
        Self::from_csv(reader, &origin)
    }

    /// The table shipped with the library (Watson-Crick, wobble, sheared and
    /// reverse-Hoogsteen pairs).
    pub fn packaged() -> Result<Self, BasePairLoadError> {
        Self::from_reader(PACKAGED_TABLE.as_bytes(), PACKAGED_ORIGIN)
    }

    pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Self, BasePairLoadError> {
        Self::from_csv(csv::Reader::from_reader(reader), origin)
    }

    fn from_csv<R: Read>(
        mut reader: csv::Reader<R>,
        origin: &str,
    ) -> Result<Self, BasePairLoadError> {
        let mut table = Self::default();
        for result in reader.deserialize::<BasePairRecord>() {
            let record = result.map_err(|e| BasePairLoadError::Csv {
                path: origin.to_string(),
                source: e,
            })?;
            table.insert(record);
        }
        debug!(origin, records = table.len(), "Base-pair table loaded.");
        Ok(table)
    }

    fn insert(&mut self, record: BasePairRecord) {
        let key = (
            record.pair_type.clone(),
            record.residue1.clone(),
            record.residue2.clone(),
        );
        self.index.entry(key).or_default().push(self.records.len());
        self.records.push(record);
    }

    pub fn records(&self) -> &[BasePairRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records stored exactly under `(pair_type, residue1, residue2)`.
    pub fn lookup(
        &self,
        pair_type: &str,
        residue1: &str,
        residue2: &str,
    ) -> Vec<&BasePairRecord> {
        let key = (
            pair_type.to_string(),
            residue1.to_string(),
            residue2.to_string(),
        );
        self.index
            .get(&key)
            .map(|rows| rows.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    /// Hydrogen-bonded atom pairs oriented as `(atom of residue1, atom of residue2)`.
    ///
    /// Falls back to the reversed residue order, swapping atoms, when the table only
    /// lists the pair the other way round.
    pub fn atom_pairs(
        &self,
        pair_type: &str,
        residue1: &str,
        residue2: &str,
    ) -> Vec<(&str, &str)> {
        let forward = self.lookup(pair_type, residue1, residue2);
        if !forward.is_empty() {
            return forward
                .into_iter()
                .map(|r| (r.atom1.as_str(), r.atom2.as_str()))
                .collect();
        }
        self.lookup(pair_type, residue2, residue1)
            .into_iter()
            .map(|r| (r.atom2.as_str(), r.atom1.as_str()))
            .collect()
    }

    pub fn pair_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.records.iter().map(|r| r.pair_type.as_str()).collect();
        types.sort_unstable();
        types.dedup();
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn packaged_table_contains_watson_crick_pairs() {
        let table = BasePairTable::packaged().unwrap();

        let gc = table.atom_pairs("cWW", "G", "C");
        assert_eq!(gc, vec![("N1", "N3"), ("N2", "O2"), ("O6", "N4")]);
        assert_eq!(table.lookup("cWW", "A", "U").len(), 2);
        assert!(table.pair_types().contains(&"tSH"));
    }

    #[test]
    fn reversed_residue_order_swaps_atoms() {
        let table = BasePairTable::packaged().unwrap();

        let cg = table.atom_pairs("cWW", "C", "G");

        assert_eq!(cg, vec![("N3", "N1"), ("O2", "N2"), ("N4", "O6")]);
        assert!(table.lookup("cWW", "C", "G").is_empty());
    }

    #[test]
    fn unknown_pair_yields_no_atoms() {
        let table = BasePairTable::packaged().unwrap();

        assert!(table.atom_pairs("cWW", "A", "A").is_empty());
        assert!(table.atom_pairs("cSS", "G", "C").is_empty());
    }

    #[test]
    fn load_reads_table_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pairs.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "type,residue1,residue2,atom1,atom2").unwrap();
        writeln!(file, "cWW,DG,DC,N1,N3").unwrap();

        let table = BasePairTable::load(&path).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.records()[0],
            BasePairRecord {
                pair_type: "cWW".to_string(),
                residue1: "DG".to_string(),
                residue2: "DC".to_string(),
                atom1: "N1".to_string(),
                atom2: "N3".to_string(),
            }
        );
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        let result = BasePairTable::load(&path);

        assert!(matches!(result, Err(BasePairLoadError::Csv { .. })));
    }

    #[test]
    fn load_fails_for_malformed_row() {
        let data = "type,residue1,residue2,atom1,atom2\ncWW,G,C,N1\n";

        let result = BasePairTable::from_reader(data.as_bytes(), "inline");

        match result {
            Err(BasePairLoadError::Csv { path, .. }) => assert_eq!(path, "inline"),
            other => panic!("expected CSV error, got {other:?}"),
        }
    }
}
