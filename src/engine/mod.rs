use itertools::Itertools as _;
use rand::{Rng, SeedableRng as _, rngs::StdRng, seq::IndexedRandom as _};

use crate::{
    board::{Board, Cell, Coord},
    config::GameConfig,
    error::QueueError,
    merge::{MoveOrder, merge},
    progression::{Progression, Update},
    rules::{is_fibonacci, is_mergeable},
};

pub mod delegate;
pub mod queue;

pub use delegate::{Delegate, Event};
pub use queue::{Clock, ManualClock, MoveOutcome, MoveQueue, MoveTicket, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Coordinates of the `iteration`th line, starting at the edge tiles slide toward.
    pub fn line(self, iteration: usize, dimension: usize) -> Vec<Coord> {
        (0..dimension)
            .map(|i| match self {
                Direction::Up => (i, iteration),
                Direction::Down => (dimension - i - 1, iteration),
                Direction::Left => (iteration, i),
                Direction::Right => (iteration, dimension - i - 1),
            })
            .collect()
    }
}

/// Result of [`Engine::settle_turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Continue,
    Won(Coord),
    Lost,
}

/// Board, progression and move queue of a single game.
pub struct Engine<D, R = StdRng, K = SystemClock> {
    config: GameConfig,
    board: Board,
    progression: Progression,
    queue: MoveQueue,
    outcomes: Vec<MoveOutcome>,
    delegate: D,
    rng: R,
    clock: K,
}

impl<D: Delegate> Engine<D> {
    pub fn seeded(config: GameConfig, delegate: D, seed: u64) -> Self {
        Self::new(config, delegate, StdRng::seed_from_u64(seed), SystemClock)
    }
}

impl<D: Delegate, R: Rng, K: Clock> Engine<D, R, K> {
    pub fn new(config: GameConfig, delegate: D, rng: R, clock: K) -> Self {
        let config = config.clamped();

        Self {
            board: Board::new(config.dimension),
            progression: Progression::new(config.initial_remaining_moves),
            queue: MoveQueue::new(config.queue_capacity, config.queue_delay),
            outcomes: Vec::new(),
            config,
            delegate,
            rng,
            clock,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    pub fn threshold(&self) -> u32 {
        self.config.threshold
    }

    pub fn goal(&self) -> u32 {
        self.progression.goal()
    }

    pub fn remaining_moves(&self) -> u32 {
        self.progression.remaining_moves()
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    /// Number of moves waiting for the debounce timer.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn timer_pending(&self) -> bool {
        self.queue.timer_running(self.clock.now())
    }

    /// When [`Engine::tick`] should be called next, if anything is waiting.
    pub fn next_deadline(&self) -> Option<std::time::Instant> {
        self.queue.deadline().filter(|_| !self.queue.is_empty())
    }

    /// Empties the board and restores the initial goal and budget.
    ///
    /// Waiting moves are dropped without an outcome and the timer is cancelled.
    /// Outcomes of moves that already ran stay available to [`Engine::take_outcomes`].
    pub fn reset(&mut self) {
        self.board.set_all(Cell::Empty);
        self.progression.reset();
        self.queue.clear();

        self.delegate.on_goal_changed(self.progression.goal());
        self.delegate
            .on_resource_decreased(self.progression.remaining_moves());
    }

    /// Resets and places the two opening tiles.
    pub fn start(&mut self) {
        self.reset();
        self.insert_tile_at_random_location(1);
        self.insert_tile_at_random_location(1);
    }

    /// Runs `direction` now if the timer is idle, otherwise waits behind the queued moves.
    pub fn queue_move(&mut self, direction: Direction) -> Result<MoveTicket, QueueError> {
        let ticket = self.queue.push(direction)?;

        if !self.queue.timer_running(self.clock.now()) {
            self.timer_fired();
        }

        Ok(ticket)
    }

    /// Fires the debounce timer if its deadline has passed. Returns whether it fired.
    pub fn tick(&mut self) -> bool {
        if !self.queue.timer_elapsed(self.clock.now()) {
            return false;
        }

        self.timer_fired();
        true
    }

    /// Outcomes of the moves executed since the last call, oldest first.
    pub fn take_outcomes(&mut self) -> Vec<MoveOutcome> {
        std::mem::take(&mut self.outcomes)
    }

    fn timer_fired(&mut self) {
        self.queue.disarm();

        // Run moves until one of them changes the board
        let mut changed = false;
        while let Some(command) = self.queue.pop() {
            changed = self.perform_move(command.direction);
            log::debug!(
                "Move {:?} ({:?}) changed: {changed}",
                command.direction,
                command.ticket
            );

            self.outcomes.push(MoveOutcome {
                ticket: command.ticket,
                direction: command.direction,
                changed,
            });

            if changed {
                break;
            }
        }

        if changed {
            self.queue.arm(self.clock.now());
        }
    }

    /// Places a tile if `at` is an empty cell and `value` is a term of the sequence.
    /// Returns whether it did.
    pub fn insert_tile(&mut self, at: Coord, value: u32) -> bool {
        if !is_fibonacci(value) {
            log::warn!("Refusing to insert {value} at {at:?}");
            return false;
        }

        if self.board.get(at) != Some(Cell::Empty) {
            return false;
        }

        self.board[at] = Cell::Tile(value);
        self.delegate.on_tile_inserted(at, value);
        true
    }

    /// Places a tile on an empty cell picked uniformly at random.
    pub fn insert_tile_at_random_location(&mut self, value: u32) -> Option<Coord> {
        let at = *self.board.empty_spots().choose(&mut self.rng)?;
        self.insert_tile(at, value);
        Some(at)
    }

    /// Value of a freshly spawned tile: 2 one time in ten, 1 otherwise.
    pub fn random_tile_value(&mut self) -> u32 {
        if self.rng.random_ratio(1, 10) { 2 } else { 1 }
    }

    pub fn spawn_random_tile(&mut self) -> Option<Coord> {
        let value = self.random_tile_value();
        self.insert_tile_at_random_location(value)
    }

    /// Spends one move and returns what is left.
    pub fn decrement_remaining_moves(&mut self) -> u32 {
        let remaining_moves = self.progression.decrement();
        self.delegate.on_resource_decreased(remaining_moves);
        remaining_moves
    }

    /// Follow-up to a move that changed the board: spend a move, then either
    /// win, or spawn a tile and check for a loss.
    pub fn settle_turn(&mut self) -> Turn {
        let remaining_moves = self.decrement_remaining_moves();

        if let Some(at) = self.user_has_won(remaining_moves) {
            log::info!("Won with {:?} at {at:?}", self.board[at]);
            return Turn::Won(at);
        }

        self.spawn_random_tile();

        if self.user_has_lost(remaining_moves) {
            log::info!("Lost, highest tile {}", self.user_has_reached());
            Turn::Lost
        } else {
            Turn::Continue
        }
    }

    /// First cell (row-major) holding at least the winning value, while moves remain.
    pub fn user_has_won(&self, remaining_moves: u32) -> Option<Coord> {
        if remaining_moves == 0 {
            return None;
        }

        self.board.iter().find_map(|(at, cell)| {
            matches!(cell, Cell::Tile(v) if v >= self.config.threshold).then_some(at)
        })
    }

    /// Whether no empty cell and no mergeable neighbours are left.
    ///
    /// Every check is gated on `remaining_moves`, so running out of moves always loses.
    pub fn user_has_lost(&self, remaining_moves: u32) -> bool {
        !self.board.iter().any(|(at, cell)| {
            remaining_moves > 0
                && match cell {
                    Cell::Empty => true,
                    Cell::Tile(v) => self.has_mergeable_neighbour(at, v),
                }
        })
    }

    /// Highest tile on the board, 1 when it is empty.
    pub fn user_has_reached(&self) -> u32 {
        self.board.highest().unwrap_or(1)
    }

    /// Checks the right and lower neighbours.
    fn has_mergeable_neighbour(&self, (row, col): Coord, value: u32) -> bool {
        [(row, col + 1), (row + 1, col)]
            .into_iter()
            .filter_map(|at| self.board.get(at).and_then(Cell::value))
            .any(|neighbour| is_mergeable(neighbour, value))
    }

    /// Slides and merges every line toward `direction`. Returns whether anything moved.
    pub fn perform_move(&mut self, direction: Direction) -> bool {
        let dimension = self.board.dimension();
        let mut at_least_one_move = false;

        for iteration in 0..dimension {
            let coords = direction.line(iteration, dimension);
            let line = coords.iter().map(|&at| self.board[at]).collect_vec();

            // Milestones are re-evaluated before every line, not once per move
            let highest = self.user_has_reached();
            let update = self.progression.observe(highest);
            self.notify(update);

            let orders = merge(&line, self.progression.remaining_moves());
            log::trace!("{direction:?} line {iteration}: {orders:?}");
            at_least_one_move |= !orders.is_empty();

            for order in orders {
                self.apply_order(&coords, order);
            }
        }

        at_least_one_move
    }

    fn apply_order(&mut self, coords: &[Coord], order: MoveOrder) {
        debug_assert!(is_fibonacci(order.value()), "{order:?} leaves the sequence");

        match order {
            MoveOrder::SingleMove {
                source,
                destination,
                value,
                ..
            } => {
                let (from, to) = (coords[source], coords[destination]);
                self.board[from] = Cell::Empty;
                self.board[to] = Cell::Tile(value);
                self.delegate.on_single_tile_moved(from, to, value);
            }
            MoveOrder::DoubleMove {
                first_source,
                second_source,
                destination,
                value,
            } => {
                let from = (coords[first_source], coords[second_source]);
                let to = coords[destination];
                self.board[from.0] = Cell::Empty;
                self.board[from.1] = Cell::Empty;
                self.board[to] = Cell::Tile(value);
                self.delegate.on_double_tile_moved(from, to, value);
            }
        }
    }

    fn notify(&mut self, update: Update) {
        if let Some(goal) = update.goal {
            self.delegate.on_goal_changed(goal);
        }

        if let Some(remaining_moves) = update.remaining_moves {
            self.delegate.on_resource_decreased(remaining_moves);
        }
    }
}
