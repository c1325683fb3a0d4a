//! Per-line move computation.
//!
//! A line is the row or column being swiped, read from the edge the tiles slide
//! toward. Computing its moves takes three steps:
//! 1. [`condense`] removes the gaps between tiles.
//! 2. [`collapse`] merges Fibonacci-adjacent neighbours, each tile merging at most once.
//! 3. [`convert`] turns what is left into [`MoveOrder`]s for the board and the delegate.

use crate::{board::Cell, rules::is_mergeable};

/// Intermediate description of where a tile ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionToken {
    /// The tile has not moved.
    NoAction { source: usize, value: u32 },
    /// The tile slides without merging.
    Move { source: usize, value: u32 },
    /// An unmoved tile absorbs the tile at `source`.
    SingleCombine { source: usize, value: u32 },
    /// Two tiles leave their cells and merge at a new one.
    DoubleCombine {
        source: usize,
        second: usize,
        value: u32,
    },
}

impl ActionToken {
    pub fn source(self) -> usize {
        match self {
            ActionToken::NoAction { source, .. }
            | ActionToken::Move { source, .. }
            | ActionToken::SingleCombine { source, .. }
            | ActionToken::DoubleCombine { source, .. } => source,
        }
    }

    pub fn value(self) -> u32 {
        match self {
            ActionToken::NoAction { value, .. }
            | ActionToken::Move { value, .. }
            | ActionToken::SingleCombine { value, .. }
            | ActionToken::DoubleCombine { value, .. } => value,
        }
    }
}

/// Final instruction for one destination cell of a line. Indices are positions in the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOrder {
    SingleMove {
        source: usize,
        destination: usize,
        value: u32,
        was_merge: bool,
    },
    DoubleMove {
        first_source: usize,
        second_source: usize,
        destination: usize,
        value: u32,
    },
}

impl MoveOrder {
    pub fn destination(self) -> usize {
        match self {
            MoveOrder::SingleMove { destination, .. } | MoveOrder::DoubleMove { destination, .. } => {
                destination
            }
        }
    }

    pub fn value(self) -> u32 {
        match self {
            MoveOrder::SingleMove { value, .. } | MoveOrder::DoubleMove { value, .. } => value,
        }
    }

    pub fn is_merge(self) -> bool {
        match self {
            MoveOrder::SingleMove { was_merge, .. } => was_merge,
            MoveOrder::DoubleMove { .. } => true,
        }
    }
}

/// Removes interstitial space, e.g. `|3| | |13|` becomes `|3|13|`.
pub fn condense(line: &[Cell]) -> Vec<ActionToken> {
    let mut tokens = Vec::with_capacity(line.len());

    for (idx, cell) in line.iter().enumerate() {
        let Cell::Tile(value) = *cell else {
            continue;
        };

        // Every tile before this one was in place, so this one is too
        if tokens.len() == idx {
            tokens.push(ActionToken::NoAction { source: idx, value });
        } else {
            tokens.push(ActionToken::Move { source: idx, value });
        }
    }

    tokens
}

/// Whether a `NoAction` token still describes a tile sitting in its original cell.
fn still_quiescent(input_position: usize, output_length: usize, original_position: usize) -> bool {
    input_position == output_length && original_position == input_position
}

/// Merges adjacent tokens whose values are Fibonacci neighbours, scanning from the leading edge.
///
/// No merge happens while `remaining_moves` is zero. The last token never starts a merge.
pub fn collapse(tokens: &[ActionToken], remaining_moves: u32) -> Vec<ActionToken> {
    let mut buffer = Vec::with_capacity(tokens.len());
    let mut skip_next = false;

    for (idx, &token) in tokens.iter().enumerate() {
        if skip_next {
            // Consumed by the previous merge
            skip_next = false;
            continue;
        }

        let partner = tokens
            .get(idx + 1)
            .filter(|next| remaining_moves > 0 && is_mergeable(token.value(), next.value()));

        match (token, partner) {
            (ActionToken::SingleCombine { .. } | ActionToken::DoubleCombine { .. }, _) => {
                debug_assert!(false, "combine token in collapse input: {token:?}");
            }
            (ActionToken::NoAction { source, value }, Some(next))
                if still_quiescent(idx, buffer.len(), source) =>
            {
                skip_next = true;
                buffer.push(ActionToken::SingleCombine {
                    source: next.source(),
                    value: value + next.value(),
                });
            }
            (_, Some(next)) => {
                // The tile has moved, either on its own or because of an earlier merge
                skip_next = true;
                buffer.push(ActionToken::DoubleCombine {
                    source: token.source(),
                    second: next.source(),
                    value: token.value() + next.value(),
                });
            }
            (ActionToken::NoAction { source, value }, None)
                if !still_quiescent(idx, buffer.len(), source) =>
            {
                buffer.push(ActionToken::Move { source, value });
            }
            (ActionToken::NoAction { .. } | ActionToken::Move { .. }, None) => buffer.push(token),
        }
    }

    buffer
}

/// Turns collapsed tokens into orders, the position of each token being its destination.
pub fn convert(tokens: &[ActionToken]) -> Vec<MoveOrder> {
    tokens
        .iter()
        .enumerate()
        .filter_map(|(destination, &token)| match token {
            ActionToken::NoAction { .. } => None,
            ActionToken::Move { source, value } => Some(MoveOrder::SingleMove {
                source,
                destination,
                value,
                was_merge: false,
            }),
            ActionToken::SingleCombine { source, value } => Some(MoveOrder::SingleMove {
                source,
                destination,
                value,
                was_merge: true,
            }),
            ActionToken::DoubleCombine {
                source,
                second,
                value,
            } => Some(MoveOrder::DoubleMove {
                first_source: source,
                second_source: second,
                destination,
                value,
            }),
        })
        .collect()
}

/// Computes the orders for a single line.
pub fn merge(line: &[Cell], remaining_moves: u32) -> Vec<MoveOrder> {
    convert(&collapse(&condense(line), remaining_moves))
}

/// Applies `orders` to a line in place, the way the executor applies them to the board.
pub fn apply(line: &mut [Cell], orders: &[MoveOrder]) {
    for order in orders {
        match *order {
            MoveOrder::SingleMove {
                source,
                destination,
                value,
                ..
            } => {
                line[source] = Cell::Empty;
                line[destination] = Cell::Tile(value);
            }
            MoveOrder::DoubleMove {
                first_source,
                second_source,
                destination,
                value,
            } => {
                line[first_source] = Cell::Empty;
                line[second_source] = Cell::Empty;
                line[destination] = Cell::Tile(value);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools as _;

    use super::*;
    use crate::board::test_utils;

    fn line(values: &[u32]) -> Vec<Cell> {
        values.iter().map(|&v| Cell::from(v)).collect()
    }

    fn count(cells: &[Cell]) -> usize {
        cells.iter().filter(|c| !c.is_empty()).count()
    }

    fn mass(cells: &[Cell]) -> u32 {
        cells.iter().filter_map(|c| c.value()).sum()
    }

    fn swiped(values: &[u32], remaining_moves: u32) -> Vec<u32> {
        let mut cells = line(values);
        let orders = merge(&cells, remaining_moves);
        apply(&mut cells, &orders);
        cells.iter().map(|c| c.value().unwrap_or(0)).collect()
    }

    #[test]
    fn test_condense() {
        assert_eq!(condense(&line(&[3, 0, 0, 13])), vec![
            ActionToken::NoAction {
                source: 0,
                value: 3
            },
            ActionToken::Move {
                source: 3,
                value: 13
            },
        ]);

        assert_eq!(condense(&line(&[0, 0, 0, 0])), vec![]);
        assert_eq!(condense(&line(&[0, 1, 2])), vec![
            ActionToken::Move {
                source: 1,
                value: 1
            },
            ActionToken::Move {
                source: 2,
                value: 2
            },
        ]);
    }

    #[test]
    fn test_collapse_single_combine() {
        let tokens = condense(&line(&[1, 1, 2]));
        assert_eq!(collapse(&tokens, 10), vec![
            ActionToken::SingleCombine {
                source: 1,
                value: 2
            },
            ActionToken::Move {
                source: 2,
                value: 2
            },
        ]);
    }

    #[test]
    fn test_collapse_double_combine() {
        let tokens = condense(&line(&[0, 2, 3]));
        assert_eq!(collapse(&tokens, 10), vec![ActionToken::DoubleCombine {
            source: 1,
            second: 2,
            value: 5
        }]);
    }

    #[test]
    fn test_collapse_keeps_quiescent() {
        let tokens = condense(&line(&[1, 3, 8, 21]));
        assert_eq!(collapse(&tokens, 10), tokens);
        assert!(convert(&collapse(&tokens, 10)).is_empty());
    }

    #[test]
    fn test_collapse_without_remaining_moves() {
        let tokens = condense(&line(&[1, 1, 0, 2]));
        assert_eq!(collapse(&tokens, 0), vec![
            ActionToken::NoAction {
                source: 0,
                value: 1
            },
            ActionToken::NoAction {
                source: 1,
                value: 1
            },
            ActionToken::Move {
                source: 3,
                value: 2
            },
        ]);
    }

    #[test]
    fn test_leftmost_pair_first() {
        assert_eq!(merge(&line(&[1, 1, 2]), 5), vec![
            MoveOrder::SingleMove {
                source: 1,
                destination: 0,
                value: 2,
                was_merge: true
            },
            MoveOrder::SingleMove {
                source: 2,
                destination: 1,
                value: 2,
                was_merge: false
            },
        ]);
        assert_eq!(swiped(&[1, 1, 2], 5), vec![2, 2, 0]);
    }

    #[test]
    fn test_double_move_order() {
        assert_eq!(merge(&line(&[0, 2, 3, 0]), 5), vec![MoveOrder::DoubleMove {
            first_source: 1,
            second_source: 2,
            destination: 0,
            value: 5
        }]);
    }

    #[test]
    fn test_each_tile_merges_once() {
        assert_eq!(swiped(&[1, 2, 13, 2, 2], 5), vec![3, 13, 2, 2, 0]);
        assert_eq!(swiped(&[5, 8, 13, 0], 5), vec![13, 13, 0, 0]);
        assert_eq!(swiped(&[2, 0, 1, 1], 5), vec![3, 1, 0, 0]);
        assert_eq!(swiped(&[1, 1, 1, 1], 5), vec![2, 2, 0, 0]);
        assert_eq!(swiped(&[0, 1, 1, 1], 5), vec![2, 1, 0, 0]);
    }

    #[test]
    fn test_gated_by_remaining_moves() {
        assert_eq!(swiped(&[0, 3, 5, 0], 0), vec![3, 5, 0, 0]);
        assert_eq!(swiped(&[3, 5], 0), vec![3, 5]);
        assert!(merge(&line(&[3, 5]), 0).is_empty());
    }

    #[test]
    fn test_top_tiles() {
        assert_eq!(swiped(&[377, 610, 0, 0], 1), vec![987, 0, 0, 0]);
        assert_eq!(swiped(&[610, 987, 0, 0], 1), vec![610, 987, 0, 0]);
    }

    #[test]
    fn test_orders_sorted_by_destination() {
        for _ in 0..200 {
            let rows = test_utils::generate_random_board::<6>(20, 10);
            for values in rows {
                let orders = merge(&line(&values), 1);
                assert!(
                    orders
                        .iter()
                        .tuple_windows()
                        .all(|(a, b)| a.destination() < b.destination())
                );
            }
        }
    }

    #[test]
    fn test_conservation() {
        for filled in 0..=16 {
            for _ in 0..50 {
                let rows = test_utils::generate_random_board::<4>(filled, 12);
                for values in rows {
                    let before = line(&values);
                    let orders = merge(&before, 3);
                    let merges = orders.iter().filter(|o| o.is_merge()).count();

                    let mut after = before.clone();
                    apply(&mut after, &orders);

                    assert_eq!(count(&after), count(&before) - merges, "{values:?}");
                    assert_eq!(mass(&after), mass(&before), "{values:?}");

                    // Tiles end up packed against the leading edge
                    let occupied = count(&after);
                    assert!(after[..occupied].iter().all(|c| !c.is_empty()), "{values:?}");
                }
            }
        }
    }

    #[test]
    fn test_no_orders_means_unchanged() {
        for _ in 0..200 {
            let rows = test_utils::generate_random_board::<4>(10, 12);
            for values in rows {
                let before = line(&values);
                let orders = merge(&before, 1);
                let mut after = before.clone();
                apply(&mut after, &orders);
                assert_eq!(orders.is_empty(), before == after, "{values:?}");
            }
        }
    }
}
