/// Tile values in the order they are produced by merging. `1` shows up twice.
pub const FIBONACCI: [u32; 16] = [
    1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233, 377, 610, 987,
];

pub fn is_fibonacci(value: u32) -> bool {
    FIBONACCI.contains(&value)
}

/// Whether `a` may merge with `b`, i.e. `a` is the predecessor or the successor of `b`.
///
/// Only values up to 610 have partners, and 610 only pairs with 377. Everything
/// outside the table is unmergeable.
pub fn is_mergeable(a: u32, b: u32) -> bool {
    match b {
        1 => a == 1 || a == 2,
        2 => a == 1 || a == 3,
        3 => a == 2 || a == 5,
        5 => a == 3 || a == 8,
        8 => a == 5 || a == 13,
        13 => a == 8 || a == 21,
        21 => a == 13 || a == 34,
        34 => a == 21 || a == 55,
        55 => a == 34 || a == 89,
        89 => a == 55 || a == 144,
        144 => a == 89 || a == 233,
        233 => a == 144 || a == 377,
        377 => a == 233 || a == 610,
        610 => a == 377,
        _ => false,
    }
}
