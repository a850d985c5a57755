//! per-column signedness lookup
//!
//! table map events carry column types but not signedness; exact decoding
//! of unsigned integer columns needs flags fetched out of band, typically
//! from information_schema.COLUMNS keyed by database and table. the
//! decoder takes the lookup as an injected dependency and falls back to
//! treating every column as signed.
use smol_str::SmolStr;
use std::collections::HashMap;

pub trait SignednessProvider {
    /// unsigned flags in column order for `database`.`table`, or None if
    /// the table is unknown to the provider
    fn unsigned_flags(&self, database: &str, table: &str) -> Option<&[bool]>;
}

/// default provider: every column decodes as signed
#[derive(Debug, Default, Clone, Copy)]
pub struct AllSigned;

impl SignednessProvider for AllSigned {
    fn unsigned_flags(&self, _database: &str, _table: &str) -> Option<&[bool]> {
        None
    }
}

/// provider backed by a plain map, filled by whoever ran the
/// information_schema query
#[derive(Debug, Default, Clone)]
pub struct SignednessMap {
    tables: HashMap<(SmolStr, SmolStr), Vec<bool>>,
}

impl SignednessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        database: impl Into<SmolStr>,
        table: impl Into<SmolStr>,
        unsigned: Vec<bool>,
    ) {
        self.tables.insert((database.into(), table.into()), unsigned);
    }
}

impl SignednessProvider for SignednessMap {
    fn unsigned_flags(&self, database: &str, table: &str) -> Option<&[bool]> {
        self.tables
            .get(&(SmolStr::new(database), SmolStr::new(table)))
            .map(|flags| flags.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_lookup() {
        let mut map = SignednessMap::new();
        map.insert("test", "tbl", vec![true, false]);
        assert_eq!(Some(&[true, false][..]), map.unsigned_flags("test", "tbl"));
        assert_eq!(None, map.unsigned_flags("test", "other"));
        assert_eq!(None, AllSigned.unsigned_flags("test", "tbl"));
    }
}
