//! Soft filtering.
//!
//! Several stages of the pipeline share the same policy: apply a filter
//! only if it leaves at least one item, otherwise keep the unfiltered
//! set. This lives here once instead of being re-implemented per call
//! site.

/// Retain items matching `pred`, unless that would empty the set, in
/// which case the original items are returned untouched.
pub fn soft_retain<T, F>(items: Vec<T>, mut pred: F) -> Vec<T>
where
    F: FnMut(&T) -> bool,
{
    let matches: Vec<bool> = items.iter().map(&mut pred).collect();
    if !matches.iter().any(|&m| m) {
        return items;
    }
    items
        .into_iter()
        .zip(matches)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applies_when_non_emptying() {
        let out = soft_retain(vec![1, 2, 3, 4], |&n| n % 2 == 0);
        assert_eq!(out, vec![2, 4]);
    }

    #[test]
    fn test_keeps_all_when_filter_would_empty() {
        let out = soft_retain(vec![1, 3, 5], |&n| n % 2 == 0);
        assert_eq!(out, vec![1, 3, 5]);
    }

    #[test]
    fn test_empty_input_stays_empty() {
        let out = soft_retain(Vec::<i32>::new(), |_| true);
        assert!(out.is_empty());
    }

    #[test]
    fn test_preserves_order() {
        let out = soft_retain(vec![5, 1, 4, 2], |&n| n < 5);
        assert_eq!(out, vec![1, 4, 2]);
    }
}
