use num_bigint::BigUint;
use std::collections::HashSet;
use std::sync::OnceLock;

use super::NumberError;

/// Suffixes shown by the dashboard, one per power of 1000.
/// `!` is the catch-all for anything at or above 10^42.
const STANDARD_SUFFIXES: &[(&str, u32)] = &[
    ("K", 1),
    ("M", 2),
    ("B", 3),
    ("T", 4),
    ("q", 5),
    ("Q", 6),
    ("s", 7),
    ("S", 8),
    ("O", 9),
    ("N", 10),
    ("d", 11),
    ("U", 12),
    ("D", 13),
    ("!", 14),
];

/// In-game suffixes past `D`. Several end in a shorter suffix (`Td` / `d`,
/// `uV` / `V`), so matching must try the longest symbol first.
const EXTENDED_SUFFIXES: &[(&str, u32)] = &[
    ("K", 1),
    ("M", 2),
    ("B", 3),
    ("T", 4),
    ("q", 5),
    ("Q", 6),
    ("s", 7),
    ("S", 8),
    ("O", 9),
    ("N", 10),
    ("d", 11),
    ("U", 12),
    ("D", 13),
    ("Td", 14),
    ("qd", 15),
    ("Qd", 16),
    ("sd", 17),
    ("Sd", 18),
    ("Od", 19),
    ("Nd", 20),
    ("V", 21),
    ("uV", 22),
    ("dV", 23),
    ("tV", 24),
    ("qV", 25),
    ("QV", 26),
    ("sV", 27),
    ("SV", 28),
    ("OV", 29),
    ("NV", 30),
];

/// Returns 1000^rank.
pub fn power_of_thousand(rank: u32) -> BigUint {
    BigUint::from(1000u32).pow(rank)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffix {
    symbol: String,
    rank: u32,
    threshold: BigUint,
}

impl Suffix {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    /// Smallest value written with this suffix (1000^rank).
    pub fn threshold(&self) -> &BigUint {
        &self.threshold
    }
}

/// Ordered, case-sensitive mapping from suffix symbol to power-of-1000 rank.
#[derive(Debug, Clone)]
pub struct SuffixTable {
    entries: Vec<Suffix>,
    // Entry indices ordered by descending symbol length
    match_order: Vec<usize>,
}

impl SuffixTable {
    /// Builds a table from `(symbol, rank)` pairs.
    ///
    /// Ranks must start at 1 or above and be strictly increasing; symbols must be
    /// unique, non-empty, and free of characters that can appear in a decimal.
    pub fn new<I, S>(entries: I) -> Result<Self, NumberError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut suffixes: Vec<Suffix> = Vec::new();
        let mut seen = HashSet::new();

        for (symbol, rank) in entries {
            let symbol = symbol.into();

            if symbol.is_empty() {
                return Err(NumberError::InvalidSuffixTable(
                    "suffix symbol cannot be empty".to_string(),
                ));
            }
            if symbol
                .chars()
                .any(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '%'))
            {
                return Err(NumberError::InvalidSuffixTable(format!(
                    "suffix '{}' contains numeric characters",
                    symbol
                )));
            }
            if !seen.insert(symbol.clone()) {
                return Err(NumberError::InvalidSuffixTable(format!(
                    "duplicate suffix '{}'",
                    symbol
                )));
            }
            if rank == 0 {
                return Err(NumberError::InvalidSuffixTable(format!(
                    "suffix '{}' has rank 0",
                    symbol
                )));
            }
            if let Some(previous) = suffixes.last() {
                if rank <= previous.rank {
                    return Err(NumberError::InvalidSuffixTable(format!(
                        "rank {} of '{}' does not increase on '{}'",
                        rank, symbol, previous.symbol
                    )));
                }
            }

            suffixes.push(Suffix {
                symbol,
                rank,
                threshold: power_of_thousand(rank),
            });
        }

        if suffixes.is_empty() {
            return Err(NumberError::InvalidSuffixTable(
                "table has no suffixes".to_string(),
            ));
        }

        let mut match_order: Vec<usize> = (0..suffixes.len()).collect();
        match_order.sort_by_key(|&index| std::cmp::Reverse(suffixes[index].symbol.len()));

        Ok(Self {
            entries: suffixes,
            match_order,
        })
    }

    /// The table used for display throughout the dashboard.
    pub fn standard() -> &'static SuffixTable {
        static TABLE: OnceLock<SuffixTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            Self::new(STANDARD_SUFFIXES.iter().copied())
                .unwrap_or_else(|err| unreachable!("standard suffix table is valid: {err}"))
        })
    }

    /// The in-game table, for decoding values copied straight from the game.
    pub fn extended() -> &'static SuffixTable {
        static TABLE: OnceLock<SuffixTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            Self::new(EXTENDED_SUFFIXES.iter().copied())
                .unwrap_or_else(|err| unreachable!("extended suffix table is valid: {err}"))
        })
    }

    pub fn entries(&self) -> &[Suffix] {
        &self.entries
    }

    pub fn highest(&self) -> &Suffix {
        // Construction rejects empty tables
        &self.entries[self.entries.len() - 1]
    }

    pub fn rank_of(&self, symbol: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|suffix| suffix.symbol == symbol)
            .map(Suffix::rank)
    }

    /// Splits `text` into its numeric prefix and trailing suffix, trying the
    /// longest symbols first.
    pub fn split_suffix<'a>(&self, text: &'a str) -> Option<(&'a str, &Suffix)> {
        self.match_order.iter().find_map(|&index| {
            let suffix = &self.entries[index];
            text.strip_suffix(suffix.symbol.as_str())
                .map(|prefix| (prefix, suffix))
        })
    }

    /// Index of the largest entry whose threshold does not exceed `value`.
    pub(crate) fn floor_index(&self, value: &BigUint) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|suffix| &suffix.threshold <= value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_ranks_increase() {
        let table = SuffixTable::standard();
        assert_eq!(table.entries().len(), 14);
        assert_eq!(table.rank_of("K"), Some(1));
        assert_eq!(table.rank_of("q"), Some(5));
        assert_eq!(table.rank_of("Q"), Some(6));
        assert_eq!(table.highest().symbol(), "!");
        assert_eq!(table.highest().rank(), 14);
    }

    #[test]
    fn split_prefers_longest_symbol() {
        let table = SuffixTable::extended();

        let (prefix, suffix) = table.split_suffix("1.5Qd").unwrap();
        assert_eq!(prefix, "1.5");
        assert_eq!(suffix.symbol(), "Qd");

        let (prefix, suffix) = table.split_suffix("42d").unwrap();
        assert_eq!(prefix, "42");
        assert_eq!(suffix.symbol(), "d");
    }

    #[test]
    fn split_returns_none_without_suffix() {
        assert!(SuffixTable::standard().split_suffix("12345").is_none());
    }

    #[test]
    fn floor_index_picks_largest_threshold_not_above_value() {
        let table = SuffixTable::standard();
        assert_eq!(table.floor_index(&BigUint::from(999u32)), None);
        assert_eq!(table.floor_index(&BigUint::from(1000u32)), Some(0));
        assert_eq!(table.floor_index(&BigUint::from(999_999u32)), Some(0));
        assert_eq!(table.floor_index(&BigUint::from(1_000_000u32)), Some(1));
    }

    #[test]
    fn rejects_non_increasing_ranks() {
        let result = SuffixTable::new(vec![("K", 1), ("M", 1)]);
        assert!(matches!(result, Err(NumberError::InvalidSuffixTable(_))));
    }

    #[test]
    fn rejects_numeric_and_duplicate_symbols() {
        assert!(SuffixTable::new(vec![("K", 1), ("1X", 2)]).is_err());
        assert!(SuffixTable::new(vec![("K", 1), ("K", 2)]).is_err());
        assert!(SuffixTable::new(Vec::<(&str, u32)>::new()).is_err());
    }
}
