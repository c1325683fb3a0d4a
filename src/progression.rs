/// Goal shown before any milestone is reached.
pub const INITIAL_GOAL: u32 = 89;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
    /// Highest tile that triggers the milestone.
    pub reached: u32,
    /// Goal shown once the milestone is reached.
    pub goal: u32,
    /// Remaining moves granted the first time the milestone is reached.
    pub remaining_moves: u32,
}

pub const MILESTONES: [Milestone; 5] = [
    Milestone {
        reached: 89,
        goal: 144,
        remaining_moves: 61,
    },
    Milestone {
        reached: 144,
        goal: 233,
        remaining_moves: 1001,
    },
    Milestone {
        reached: 233,
        goal: 377,
        remaining_moves: 101,
    },
    Milestone {
        reached: 377,
        goal: 610,
        remaining_moves: 201,
    },
    Milestone {
        reached: 610,
        goal: 987,
        remaining_moves: 351,
    },
];

/// What changed after observing the board.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Update {
    pub goal: Option<u32>,
    pub remaining_moves: Option<u32>,
}

/// Goal escalation and the remaining-moves budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    goal: u32,
    /// Milestone allowed to refill the budget next. Each one fires once per game.
    next_goal: u32,
    remaining_moves: u32,
    initial_remaining_moves: u32,
}

impl Progression {
    pub fn new(initial_remaining_moves: u32) -> Self {
        Self {
            goal: INITIAL_GOAL,
            next_goal: INITIAL_GOAL,
            remaining_moves: initial_remaining_moves,
            initial_remaining_moves,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.initial_remaining_moves);
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn next_goal(&self) -> u32 {
        self.next_goal
    }

    pub fn remaining_moves(&self) -> u32 {
        self.remaining_moves
    }

    /// Feeds the highest tile currently on the board through the milestone table.
    pub fn observe(&mut self, highest: u32) -> Update {
        let mut update = Update::default();

        let goal = match MILESTONES.iter().find(|m| m.reached == highest) {
            Some(milestone) => {
                if self.next_goal == milestone.reached {
                    log::info!(
                        "Reached {highest}, remaining moves reset to {}",
                        milestone.remaining_moves
                    );

                    self.remaining_moves = milestone.remaining_moves;
                    self.next_goal = milestone.goal;
                    update.remaining_moves = Some(self.remaining_moves);
                }

                milestone.goal
            }
            None if highest < INITIAL_GOAL => INITIAL_GOAL,
            // Past the last milestone the goal stays where it is
            None => self.goal,
        };

        if goal != self.goal {
            self.goal = goal;
            update.goal = Some(goal);
        }

        update
    }

    /// Spends one move, returning what is left.
    pub fn decrement(&mut self) -> u32 {
        self.remaining_moves = self.remaining_moves.saturating_sub(1);
        self.remaining_moves
    }
}
