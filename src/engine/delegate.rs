use crate::board::Coord;

/// Receives the changes the engine makes, typically to animate them.
///
/// Implementations must not call back into the engine from a notification.
pub trait Delegate {
    fn on_goal_changed(&mut self, _goal: u32) {}

    /// Called whenever the remaining-moves counter is rewritten, with its new value.
    fn on_resource_decreased(&mut self, _remaining_moves: u32) {}

    fn on_tile_inserted(&mut self, _at: Coord, _value: u32) {}

    fn on_single_tile_moved(&mut self, _from: Coord, _to: Coord, _value: u32) {}

    fn on_double_tile_moved(&mut self, _from: (Coord, Coord), _to: Coord, _value: u32) {}
}

impl Delegate for () {}

impl<D: Delegate + ?Sized> Delegate for &mut D {
    fn on_goal_changed(&mut self, goal: u32) {
        (**self).on_goal_changed(goal)
    }

    fn on_resource_decreased(&mut self, remaining_moves: u32) {
        (**self).on_resource_decreased(remaining_moves)
    }

    fn on_tile_inserted(&mut self, at: Coord, value: u32) {
        (**self).on_tile_inserted(at, value)
    }

    fn on_single_tile_moved(&mut self, from: Coord, to: Coord, value: u32) {
        (**self).on_single_tile_moved(from, to, value)
    }

    fn on_double_tile_moved(&mut self, from: (Coord, Coord), to: Coord, value: u32) {
        (**self).on_double_tile_moved(from, to, value)
    }
}

/// Everything a [`Delegate`] can be told, as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    GoalChanged(u32),
    ResourceDecreased(u32),
    TileInserted { at: Coord, value: u32 },
    SingleTileMoved { from: Coord, to: Coord, value: u32 },
    DoubleTileMoved { from: (Coord, Coord), to: Coord, value: u32 },
}

/// Keeps every notification in order.
impl Delegate for Vec<Event> {
    fn on_goal_changed(&mut self, goal: u32) {
        self.push(Event::GoalChanged(goal));
    }

    fn on_resource_decreased(&mut self, remaining_moves: u32) {
        self.push(Event::ResourceDecreased(remaining_moves));
    }

    fn on_tile_inserted(&mut self, at: Coord, value: u32) {
        self.push(Event::TileInserted { at, value });
    }

    fn on_single_tile_moved(&mut self, from: Coord, to: Coord, value: u32) {
        self.push(Event::SingleTileMoved { from, to, value });
    }

    fn on_double_tile_moved(&mut self, from: (Coord, Coord), to: Coord, value: u32) {
        self.push(Event::DoubleTileMoved { from, to, value });
    }
}
