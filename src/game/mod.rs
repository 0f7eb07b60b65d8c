mod grid;
pub use grid::*;
mod items;
pub use items::*;
mod game;
pub use game::*;
