use crate::fruit::FruitItem;
use crate::grid::{Cell, GridWorld};
use crate::snake::Snake;

/// What the head ran into on a tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Collision {
    WallHit,
    SelfHit,
    FruitHit(FruitItem),
    Clear,
}

/// Classifies `new_head` against the board, the body before the tail is
/// trimmed, and the live fruit, in that order.
#[must_use]
pub fn classify(
    new_head: Cell,
    grid: GridWorld,
    body_before_trim: &Snake,
    fruit: Option<&FruitItem>,
) -> Collision {
    if !grid.contains(new_head) {
        return Collision::WallHit;
    }
    if body_before_trim.occupies(new_head) {
        return Collision::SelfHit;
    }
    match fruit {
        Some(fruit) if fruit.position == new_head => Collision::FruitHit(*fruit),
        _ => Collision::Clear,
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, Collision};
    use crate::fruit::FruitItem;
    use crate::grid::{Cell, GridWorld};
    use crate::snake::Snake;

    fn snake(cells: &[(i32, i32)]) -> Snake {
        Snake::from_segments(cells.iter().map(|&(x, y)| Cell::new(x, y)).collect())
            .expect("test snakes are non-empty")
    }

    #[test]
    fn wall_is_checked_before_fruit() {
        let grid = GridWorld::new(4, 4);
        let fruit = FruitItem::normal(Cell::new(4, 1));

        let outcome = classify(Cell::new(4, 1), grid, &snake(&[(3, 1)]), Some(&fruit));

        assert_eq!(outcome, Collision::WallHit);
    }

    #[test]
    fn tail_cell_counts_as_body_before_trim() {
        // Square loop: moving up from (2,2) lands on the tail at (2,1).
        let body = snake(&[(2, 2), (1, 2), (1, 1), (2, 1)]);

        let outcome = classify(Cell::new(2, 1), GridWorld::new(6, 6), &body, None);

        assert_eq!(outcome, Collision::SelfHit);
    }

    #[test]
    fn fruit_on_the_new_head_is_a_fruit_hit() {
        let fruit = FruitItem::normal(Cell::new(6, 5));

        let outcome = classify(
            Cell::new(6, 5),
            GridWorld::new(10, 10),
            &snake(&[(5, 5), (4, 5)]),
            Some(&fruit),
        );

        assert_eq!(outcome, Collision::FruitHit(fruit));
    }

    #[test]
    fn empty_cell_is_clear() {
        let outcome = classify(
            Cell::new(6, 5),
            GridWorld::new(10, 10),
            &snake(&[(5, 5)]),
            Some(&FruitItem::normal(Cell::new(0, 0))),
        );

        assert_eq!(outcome, Collision::Clear);
    }
}
