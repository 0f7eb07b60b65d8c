use crate::env::Vec2D;
use crate::game::{Item, ItemKind};

/// Picks the item to pursue from `pools`, which are ordered by priority.
///
/// The first non-empty pool wins, regardless of how far away its items are.
/// Within that pool the item closest to `p` (manhattan) is chosen, ties go to
/// the earlier item.
pub fn select_target<'a>(
    p: Vec2D,
    pools: impl IntoIterator<Item = (ItemKind, &'a [Vec2D])>,
) -> Option<Item> {
    let (kind, pool) = pools.into_iter().find(|(_, pool)| !pool.is_empty())?;
    pool.iter()
        .copied()
        .min_by_key(|item| p.distance(*item))
        .map(|pos| Item { pos, kind })
}
