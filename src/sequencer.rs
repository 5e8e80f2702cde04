/// Timed command sequences that script enemy behaviour.
///
/// A sequence is a non-empty list of steps.  Each step holds a set of
/// simultaneous commands and how long (in game-clock milliseconds) it stays
/// active.  Deadlines are absolute ticks so frame pacing never accumulates
/// drift.

use serde::{Deserialize, Serialize};

use crate::entities::Tick;
use crate::error::SequenceError;

// ── Commands ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Left,
    Right,
    Up,
    Down,
    Fire,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Left,
        Command::Right,
        Command::Up,
        Command::Down,
        Command::Fire,
    ];

    fn bit(self) -> u8 {
        match self {
            Command::Left => 1 << 0,
            Command::Right => 1 << 1,
            Command::Up => 1 << 2,
            Command::Down => 1 << 3,
            Command::Fire => 1 << 4,
        }
    }
}

/// A set of commands executed together.  Directions combine, so
/// `{down, left}` moves diagonally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Command>", into = "Vec<Command>")]
pub struct CommandSet(u8);

impl CommandSet {
    pub const EMPTY: CommandSet = CommandSet(0);

    pub fn of(commands: &[Command]) -> Self {
        commands.iter().copied().collect()
    }

    pub fn insert(&mut self, command: Command) {
        self.0 |= command.bit();
    }

    pub fn contains(&self, command: Command) -> bool {
        self.0 & command.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Commands in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Command> + '_ {
        Command::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Command> for CommandSet {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        let mut set = CommandSet::EMPTY;
        for command in iter {
            set.insert(command);
        }
        set
    }
}

impl From<Vec<Command>> for CommandSet {
    fn from(commands: Vec<Command>) -> Self {
        commands.into_iter().collect()
    }
}

impl From<CommandSet> for Vec<Command> {
    fn from(set: CommandSet) -> Self {
        set.iter().collect()
    }
}

// ── Steps & sequences ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStep {
    pub commands: CommandSet,
    /// 0 means the step is active for exactly one evaluation.
    pub dwell_ms: u64,
}

impl ActionStep {
    pub fn new(commands: &[Command], dwell_ms: u64) -> Self {
        ActionStep {
            commands: CommandSet::of(commands),
            dwell_ms,
        }
    }
}

/// What happens once the last step's dwell time runs out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatPolicy {
    /// Start over from the first step.
    Loop,
    /// Stay on the last step forever.
    #[default]
    Hold,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionSequence {
    steps: Vec<ActionStep>,
    policy: RepeatPolicy,
    cursor: usize,
    /// `None` until the first `advance`.
    deadline: Option<Tick>,
}

impl ActionSequence {
    pub fn new(steps: Vec<ActionStep>, policy: RepeatPolicy) -> Result<Self, SequenceError> {
        if steps.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(ActionSequence {
            steps,
            policy,
            cursor: 0,
            deadline: None,
        })
    }

    pub fn steps(&self) -> &[ActionStep] {
        &self.steps
    }

    pub fn policy(&self) -> RepeatPolicy {
        self.policy
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn deadline(&self) -> Option<Tick> {
        self.deadline
    }

    pub fn current(&self) -> &ActionStep {
        &self.steps[self.cursor]
    }

    /// Returns the command set in effect at `now`, moving to the next step
    /// when the current one's deadline has been reached.
    pub fn advance(&mut self, now: Tick) -> CommandSet {
        match self.deadline {
            None => {
                self.deadline = Some(now + self.current().dwell_ms);
            }
            Some(deadline) if now < deadline => {}
            Some(_) => {
                self.cursor = self.next_index();
                self.deadline = Some(now + self.current().dwell_ms);
            }
        }
        self.current().commands
    }

    fn next_index(&self) -> usize {
        let last = self.steps.len() - 1;
        match self.policy {
            _ if self.cursor < last => self.cursor + 1,
            RepeatPolicy::Loop => 0,
            RepeatPolicy::Hold => last,
        }
    }
}
