//! List reordering (drag-and-drop splice)

/// Move the element at `from` to `to`, shifting the elements in between by one.
///
/// Out-of-range indices leave the slice untouched.
pub fn move_item<T>(items: &mut [T], from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
}

/// Move the element matching `active` to the position of the element matching
/// `over`. Returns `false` when either key is absent or both are the same.
pub fn move_by_key<T, K, F>(items: &mut [T], active: &K, over: &K, key: F) -> bool
where
    K: PartialEq,
    F: Fn(&T) -> &K,
{
    if active == over {
        return false;
    }
    let Some(from) = items.iter().position(|item| key(item) == active) else {
        return false;
    };
    let Some(to) = items.iter().position(|item| key(item) == over) else {
        return false;
    };
    move_item(items, from, to);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_forward_shifts_intermediate_left() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        move_item(&mut items, 1, 3);
        assert_eq!(items, vec!['a', 'c', 'd', 'b', 'e']);
    }

    #[test]
    fn test_move_backward_shifts_intermediate_right() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        move_item(&mut items, 3, 0);
        assert_eq!(items, vec!['d', 'a', 'b', 'c', 'e']);
    }

    #[test]
    fn test_move_same_or_out_of_range_is_noop() {
        let mut items = vec![1, 2, 3];
        move_item(&mut items, 1, 1);
        move_item(&mut items, 5, 0);
        move_item(&mut items, 0, 3);
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_move_by_key() {
        let mut items = vec![(10, "a"), (20, "b"), (30, "c")];
        assert!(move_by_key(&mut items, &30, &10, |item| &item.0));
        assert_eq!(items, vec![(30, "c"), (10, "a"), (20, "b")]);

        assert!(!move_by_key(&mut items, &10, &10, |item| &item.0));
        assert!(!move_by_key(&mut items, &10, &99, |item| &item.0));
        assert_eq!(items, vec![(30, "c"), (10, "a"), (20, "b")]);
    }

    #[test]
    fn test_move_matches_position_contract_for_every_pair() {
        let original: Vec<usize> = (0..6).collect();
        for i in 0..original.len() {
            for j in 0..original.len() {
                let mut items = original.clone();
                move_item(&mut items, i, j);
                assert_eq!(items[j], i);
                let mut rest = items.clone();
                rest.remove(j);
                let mut expected = original.clone();
                expected.remove(i);
                assert_eq!(rest, expected, "relative order kept for {i}->{j}");
            }
        }
    }
}
