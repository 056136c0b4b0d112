//! Mode ids, the shared mode interface, and the enum the dispatcher holds

use std::fmt;
use std::str::FromStr;

use crate::engine::{DrawList, EngineError, ModeContext};
use crate::physics::MappedHand;
use super::follow_target::FollowTarget;
use super::fruit_slice::FruitSlice;
use super::gesture_sequence::GestureSequence;
use super::maze::{MazeMode, MazeVariant};
use super::paint::PaintMode;
use super::runner::Runner;
use super::shape_trace::ShapeTrace;

/// What every game mode does once per frame
pub trait ModeLogic {
    /// Fresh round: discard anything left from a previous one
    fn on_start(&mut self, ctx: &mut ModeContext);
    fn update(&mut self, dt: f32, hands: &[MappedHand], ctx: &mut ModeContext);
    /// Synchronously drop all mode-owned transient state
    fn on_end(&mut self, ctx: &mut ModeContext);
    fn draw(&self, list: &mut DrawList);
    /// Modes that zero the score when entered
    fn resets_score(&self) -> bool {
        false
    }
}

// ============================================================================
// MODE ID
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeId {
    FruitSlice,
    Runner,
    Maze,
    MiniMaze,
    Paint,
    ShapeTrace,
    Gesture,
    Follow,
}

impl ModeId {
    pub const ALL: [ModeId; 8] = [
        ModeId::FruitSlice,
        ModeId::Runner,
        ModeId::Maze,
        ModeId::MiniMaze,
        ModeId::Paint,
        ModeId::ShapeTrace,
        ModeId::Gesture,
        ModeId::Follow,
    ];

    /// Stable id, also the leaderboard key
    pub fn as_str(self) -> &'static str {
        match self {
            ModeId::FruitSlice => "fruit",
            ModeId::Runner => "runner",
            ModeId::Maze => "maze",
            ModeId::MiniMaze => "mini_maze",
            ModeId::Paint => "paint",
            ModeId::ShapeTrace => "shape_trace",
            ModeId::Gesture => "gesture",
            ModeId::Follow => "follow",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModeId::FruitSlice => "Fruit Slice",
            ModeId::Runner => "Runner",
            ModeId::Maze => "Maze",
            ModeId::MiniMaze => "Mini Maze",
            ModeId::Paint => "Paint",
            ModeId::ShapeTrace => "Shape Trace",
            ModeId::Gesture => "Gesture Memory",
            ModeId::Follow => "Follow",
        }
    }

    /// Round length for this mode; paint is untimed
    pub fn round_seconds(self, default_seconds: f32) -> f32 {
        match self {
            ModeId::Paint => 0.0,
            _ => default_seconds,
        }
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ModeId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| EngineError::UnknownMode(s.to_string()))
    }
}

// ============================================================================
// GAME MODE
// ============================================================================

/// The active mode. One variant per state machine; both maze ids share one.
pub enum GameMode {
    FruitSlice(FruitSlice),
    Runner(Runner),
    Maze(MazeMode),
    Paint(PaintMode),
    ShapeTrace(ShapeTrace),
    Gesture(GestureSequence),
    Follow(FollowTarget),
}

impl GameMode {
    pub fn new(id: ModeId) -> Self {
        match id {
            ModeId::FruitSlice => GameMode::FruitSlice(FruitSlice::new()),
            ModeId::Runner => GameMode::Runner(Runner::new()),
            ModeId::Maze => GameMode::Maze(MazeMode::new(MazeVariant::Classic)),
            ModeId::MiniMaze => GameMode::Maze(MazeMode::new(MazeVariant::Mini)),
            ModeId::Paint => GameMode::Paint(PaintMode::new()),
            ModeId::ShapeTrace => GameMode::ShapeTrace(ShapeTrace::new()),
            ModeId::Gesture => GameMode::Gesture(GestureSequence::new()),
            ModeId::Follow => GameMode::Follow(FollowTarget::new()),
        }
    }

    pub fn id(&self) -> ModeId {
        match self {
            GameMode::FruitSlice(_) => ModeId::FruitSlice,
            GameMode::Runner(_) => ModeId::Runner,
            GameMode::Maze(m) => match m.variant() {
                MazeVariant::Classic => ModeId::Maze,
                MazeVariant::Mini => ModeId::MiniMaze,
            },
            GameMode::Paint(_) => ModeId::Paint,
            GameMode::ShapeTrace(_) => ModeId::ShapeTrace,
            GameMode::Gesture(_) => ModeId::Gesture,
            GameMode::Follow(_) => ModeId::Follow,
        }
    }

    fn logic(&self) -> &dyn ModeLogic {
        match self {
            GameMode::FruitSlice(m) => m,
            GameMode::Runner(m) => m,
            GameMode::Maze(m) => m,
            GameMode::Paint(m) => m,
            GameMode::ShapeTrace(m) => m,
            GameMode::Gesture(m) => m,
            GameMode::Follow(m) => m,
        }
    }

    fn logic_mut(&mut self) -> &mut dyn ModeLogic {
        match self {
            GameMode::FruitSlice(m) => m,
            GameMode::Runner(m) => m,
            GameMode::Maze(m) => m,
            GameMode::Paint(m) => m,
            GameMode::ShapeTrace(m) => m,
            GameMode::Gesture(m) => m,
            GameMode::Follow(m) => m,
        }
    }

    pub fn on_start(&mut self, ctx: &mut ModeContext) {
        self.logic_mut().on_start(ctx);
    }

    pub fn update(&mut self, dt: f32, hands: &[MappedHand], ctx: &mut ModeContext) {
        self.logic_mut().update(dt, hands, ctx);
    }

    pub fn on_end(&mut self, ctx: &mut ModeContext) {
        self.logic_mut().on_end(ctx);
    }

    pub fn draw(&self, list: &mut DrawList) {
        self.logic().draw(list);
    }

    pub fn resets_score(&self) -> bool {
        self.logic().resets_score()
    }

    pub fn as_fruit_slice_mut(&mut self) -> Option<&mut FruitSlice> {
        match self {
            GameMode::FruitSlice(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_paint_mut(&mut self) -> Option<&mut PaintMode> {
        match self {
            GameMode::Paint(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_paint(&self) -> Option<&PaintMode> {
        match self {
            GameMode::Paint(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_shape_trace(&self) -> Option<&ShapeTrace> {
        match self {
            GameMode::ShapeTrace(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_shape_trace_mut(&mut self) -> Option<&mut ShapeTrace> {
        match self {
            GameMode::ShapeTrace(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_gesture(&self) -> Option<&GestureSequence> {
        match self {
            GameMode::Gesture(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_ids_round_trip_through_strings() {
        for id in ModeId::ALL {
            assert_eq!(id.as_str().parse::<ModeId>().unwrap(), id);
            assert_eq!(GameMode::new(id).id(), id);
        }
        assert!(matches!("  Fruit ".parse::<ModeId>(), Ok(ModeId::FruitSlice)));
        assert!(matches!("chess".parse::<ModeId>(), Err(EngineError::UnknownMode(_))));
    }

    #[test]
    fn test_only_paint_is_untimed() {
        for id in ModeId::ALL {
            let secs = id.round_seconds(60.0);
            assert_eq!(secs == 0.0, id == ModeId::Paint);
        }
    }

    #[test]
    fn test_score_resetting_modes() {
        let resets: Vec<ModeId> = ModeId::ALL
            .into_iter()
            .filter(|&id| GameMode::new(id).resets_score())
            .collect();
        assert_eq!(resets, vec![ModeId::Paint, ModeId::ShapeTrace]);
    }
}
