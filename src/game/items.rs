use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::env::Vec2D;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Score and growth.
    Fruit,
    /// Temporary speed boost.
    PowerUp,
    /// Penalizes the opponent.
    Shrink,
}

impl ItemKind {
    /// Spawn order.
    pub const ALL: [ItemKind; 3] = [ItemKind::Fruit, ItemKind::PowerUp, ItemKind::Shrink];
    /// Order in which the ai pursues items.
    pub const PRIORITY: [ItemKind; 3] = [ItemKind::Fruit, ItemKind::Shrink, ItemKind::PowerUp];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub pos: Vec2D,
    pub kind: ItemKind,
}

/// Item pools, one ordered list per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Items {
    pools: [Vec<Vec2D>; 3],
}

impl Items {
    pub fn new() -> Items {
        Items::default()
    }

    pub fn pool(&self, kind: ItemKind) -> &[Vec2D] {
        &self.pools[kind.index()]
    }

    /// Pools in the order of [ItemKind::PRIORITY].
    pub fn by_priority(&self) -> impl Iterator<Item = (ItemKind, &[Vec2D])> + '_ {
        ItemKind::PRIORITY
            .into_iter()
            .map(move |kind| (kind, self.pool(kind)))
    }

    /// Adds an item without any occupancy checks.
    pub fn push(&mut self, kind: ItemKind, p: Vec2D) {
        self.pools[kind.index()].push(p);
    }

    /// Removes the item at `p` and returns its kind.
    pub fn take(&mut self, p: Vec2D) -> Option<ItemKind> {
        for kind in ItemKind::ALL {
            let pool = &mut self.pools[kind.index()];
            if let Some(i) = pool.iter().position(|&item| item == p) {
                pool.remove(i);
                return Some(kind);
            }
        }
        None
    }

    pub fn get(&self, p: Vec2D) -> Option<ItemKind> {
        self.iter().find(|item| item.pos == p).map(|item| item.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = Item> + '_ {
        ItemKind::ALL.into_iter().flat_map(move |kind| {
            self.pool(kind)
                .iter()
                .map(move |&pos| Item { pos, kind })
        })
    }

    /// Positions of all items.
    pub fn cells(&self) -> impl Iterator<Item = &Vec2D> + '_ {
        self.pools.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.pools.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.iter().all(Vec::is_empty)
    }

    pub fn clear(&mut self) {
        for pool in &mut self.pools {
            pool.clear();
        }
    }

    /// Fills every pool up to its configured size with random free cells.
    ///
    /// A cell is free if no item is on it and `blocked` returns false.
    /// If no free cell is found within `placement_attempts` tries the pool
    /// stays short until the next call. Returns the number of skipped spawns.
    pub fn replenish<R: Rng>(
        &mut self,
        config: &Config,
        rng: &mut R,
        blocked: impl Fn(Vec2D) -> bool,
    ) -> usize {
        let mut skipped = 0;
        for kind in ItemKind::ALL {
            let target = config.item_count(kind);
            while self.pool(kind).len() < target {
                match self.free_cell(config, rng, &blocked) {
                    Some(p) => self.push(kind, p),
                    None => {
                        skipped += target - self.pool(kind).len();
                        break;
                    }
                }
            }
        }
        if skipped > 0 {
            log::debug!("skipped {} item spawns, no free cell found", skipped);
        }
        skipped
    }

    fn free_cell<R: Rng>(
        &self,
        config: &Config,
        rng: &mut R,
        blocked: &impl Fn(Vec2D) -> bool,
    ) -> Option<Vec2D> {
        (0..config.placement_attempts)
            .map(|_| {
                Vec2D::new(
                    rng.gen_range(0..config.width) as i16,
                    rng.gen_range(0..config.height) as i16,
                )
            })
            .find(|&p| !blocked(p) && self.get(p).is_none())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::v2;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn items_take() {
        let mut items = Items::new();
        items.push(ItemKind::Fruit, v2(1, 1));
        items.push(ItemKind::Fruit, v2(2, 1));
        items.push(ItemKind::Shrink, v2(3, 3));

        assert_eq!(items.take(v2(0, 0)), None);
        assert_eq!(items.take(v2(1, 1)), Some(ItemKind::Fruit));
        assert_eq!(items.take(v2(1, 1)), None);
        assert_eq!(items.pool(ItemKind::Fruit), &[v2(2, 1)]);
        assert_eq!(items.get(v2(3, 3)), Some(ItemKind::Shrink));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn items_replenish() {
        let config = Config {
            width: 10,
            height: 10,
            ..Config::default()
        };
        let mut rng = SmallRng::seed_from_u64(7);
        let snake = [v2(4, 4), v2(4, 5), v2(4, 6)];

        let mut items = Items::new();
        let skipped = items.replenish(&config, &mut rng, |p| snake.contains(&p));
        assert_eq!(skipped, 0);
        assert_eq!(items.pool(ItemKind::Fruit).len(), 4);
        assert_eq!(items.pool(ItemKind::PowerUp).len(), 2);
        assert_eq!(items.pool(ItemKind::Shrink).len(), 2);

        let mut cells: Vec<Vec2D> = items.cells().copied().collect();
        assert!(cells.iter().all(|p| p.within(10, 10) && !snake.contains(p)));
        cells.sort_by_key(|p| (p.x, p.y));
        cells.dedup();
        assert_eq!(cells.len(), 8);

        // refill only the consumed item
        let fruit = items.pool(ItemKind::Fruit)[1];
        items.take(fruit);
        let before = items.clone();
        items.replenish(&config, &mut rng, |p| snake.contains(&p));
        assert_eq!(items.len(), 8);
        assert_eq!(items.pool(ItemKind::PowerUp), before.pool(ItemKind::PowerUp));
        assert_eq!(items.pool(ItemKind::Shrink), before.pool(ItemKind::Shrink));
    }

    #[test]
    fn items_replenish_full_grid() {
        let config = Config {
            width: 3,
            height: 3,
            ..Config::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let mut items = Items::new();
        let skipped = items.replenish(&config, &mut rng, |_| true);
        assert_eq!(skipped, 8);
        assert!(items.is_empty());

        // a single free cell is found eventually
        let skipped = items.replenish(&config, &mut rng, |p| p != v2(1, 1));
        assert_eq!(items.iter().collect::<Vec<_>>().len(), 1);
        assert_eq!(items.get(v2(1, 1)), Some(ItemKind::Fruit));
        assert_eq!(skipped, 7);
    }
}
