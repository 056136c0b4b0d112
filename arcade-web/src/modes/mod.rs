//! Modes module - one state machine per minigame
//!
//! Re-exports only. All logic in submodules.

mod game_mode;
mod gesture;
mod fruit_slice;
mod runner;
mod maze_grid;
mod maze;
mod shapes;
mod shape_trace;
mod gesture_sequence;
mod follow_target;
mod paint;

#[cfg(test)]
pub(crate) mod testing;

pub use game_mode::{GameMode, ModeId, ModeLogic};
pub use gesture::{classify, Gesture, PINCH_DISTANCE, OPEN_DISTANCE, CLOSED_DISTANCE};
pub use fruit_slice::{
    find_hits, FruitSlice, GameObject, ObjectKind, Segment,
    GRAVITY, HIT_PADDING, FRUIT_POINTS, BOMB_PENALTY, SLICE_REMOVE_DELAY_MS,
};
pub use runner::{Runner, Obstacle, Avatar, HIT_PENALTY, PASS_POINTS};
pub use maze_grid::{Maze, Cell, Dir};
pub use maze::{MazeMode, MazePlayer, MazeVariant, EXIT_POINTS};
pub use shapes::{ShapeKind, circle, random_outline};
pub use shape_trace::{ShapeTrace, TraceTarget, SHAPE_POINTS, TRACE_TOLERANCE};
pub use gesture_sequence::{GestureSequence, Phase, MIN_SEQUENCE_LEN};
pub use follow_target::{FollowTarget, FOLLOW_POINTS};
pub use paint::{PaintMode, DEFAULT_BRUSH_SIZE};
