//! Helpers for the denormalized id lists kept on guild records.
//!
//! Lists are append-only on add: duplicates are allowed and never checked.

/// Append a single id.
pub fn add(ids: &mut Vec<u64>, id: u64) {
    ids.push(id);
}

/// Append every id from `new_ids`.
pub fn add_all(ids: &mut Vec<u64>, new_ids: impl IntoIterator<Item = u64>) {
    ids.extend(new_ids);
}

/// Remove every occurrence of `id`.
pub fn remove(ids: &mut Vec<u64>, id: u64) {
    ids.retain(|&existing| existing != id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_duplicates() {
        let mut ids = vec![1, 2];
        add(&mut ids, 2);
        assert_eq!(ids, vec![1, 2, 2]);
    }

    #[test]
    fn test_add_all_appends_in_order() {
        let mut ids = vec![5];
        add_all(&mut ids, [7, 6]);
        assert_eq!(ids, vec![5, 7, 6]);
    }

    #[test]
    fn test_remove_all_occurrences() {
        let mut ids = vec![1, 2, 1, 3];
        remove(&mut ids, 1);
        assert_eq!(ids, vec![2, 3]);

        remove(&mut ids, 42);
        assert_eq!(ids, vec![2, 3]);
    }
}
