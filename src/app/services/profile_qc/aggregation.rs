//! Worst-case-wins reduction of per-test flags

use crate::app::models::Flag;

/// Overall flag of one observation
///
/// The most severe flag among tests that expressed an opinion, or
/// [`Flag::Missing`] when none did. `NoQc` and `Missing` never win over an
/// opinion, whatever their code.
pub fn aggregate_position(flags: impl IntoIterator<Item = Flag>) -> Flag {
    flags
        .into_iter()
        .filter(|flag| flag.is_opinion())
        .max()
        .unwrap_or(Flag::Missing)
}

/// Overall flags of a variable from the flags of each of its tests
///
/// Every input slice is expected to hold `len` flags; with no test at all
/// every observation is [`Flag::Missing`].
pub fn aggregate(len: usize, test_flags: &[&[Flag]]) -> Vec<Flag> {
    (0..len)
        .map(|i| aggregate_position(test_flags.iter().filter_map(|flags| flags.get(i).copied())))
        .collect()
}
