use super::database::ItemId;
use super::storage::PatternStore;
use super::tree::PathEntry;
use crate::error::{Container, MiningError, Result};

/// Binomial coefficient `n! / (k! (n-k)!)`, saturating at `usize::MAX`.
pub fn choose(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // result == choose(n, i) here, so the division is exact.
        result = match result.checked_mul((n - i) as u128) {
            Some(product) => product / (i as u128 + 1),
            None => return usize::MAX,
        };
    }
    usize::try_from(result).unwrap_or(usize::MAX)
}

/// Number of non-empty sub-combinations of an `n`-node path.
pub fn count_path_patterns(n: usize) -> usize {
    (1..=n).fold(0usize, |total, k| total.saturating_add(choose(n, k)))
}

/// Emits every non-empty combination of the qualifying path nodes joined
/// with `alpha`. A combination's support and provenance are those of its
/// deepest node. Returns the number of patterns stored.
pub fn enumerate_single_path(
    path: &[PathEntry],
    alpha: &[ItemId],
    threshold: f64,
    store: &mut PatternStore,
) -> Result<usize> {
    let qualifying: Vec<&PathEntry> = path.iter().filter(|entry| entry.count >= threshold).collect();
    if qualifying.is_empty() {
        return Ok(0);
    }

    let total = count_path_patterns(qualifying.len());
    if total > store.remaining() {
        return Err(MiningError::capacity(Container::PatternStore, store.capacity()));
    }

    let indices: Vec<usize> = (0..qualifying.len()).collect();
    let mut outcome = Ok(());
    for k in 1..=qualifying.len() {
        let mut callback = |combination: &[usize]| {
            if outcome.is_err() {
                return;
            }
            let Some(&deepest) = combination.last() else {
                return;
            };
            let mut pattern = Vec::with_capacity(alpha.len() + combination.len());
            pattern.extend_from_slice(alpha);
            pattern.extend(combination.iter().map(|&idx| qualifying[idx].item));
            let entry = qualifying[deepest];
            if let Err(e) = store.add_itemset(pattern, entry.count, entry.provenance.clone()) {
                outcome = Err(e);
            }
        };
        generate_combinations_recursive(&indices, k, 0, &mut Vec::with_capacity(k), &mut callback);
        if outcome.is_err() {
            break;
        }
    }
    outcome.map(|()| total)
}

pub fn generate_combinations_recursive<F>(
    items: &[usize],
    k: usize,
    start: usize,
    current: &mut Vec<usize>,
    callback: &mut F,
) where
    F: FnMut(&[usize]),
{
    if current.len() == k {
        callback(current);
        return;
    }

    for i in start..items.len() {
        current.push(items[i]);
        generate_combinations_recursive(items, k, i + 1, current, callback);
        current.pop();
    }
}
