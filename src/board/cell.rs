//! Cell contents: integers, input placeholders, output markers and operators
//!
//! Every cell of a program holds exactly one token from a fixed alphabet:
//! - integer literals in [-99, 99]
//! - input placeholders `A` / `B`
//! - the output marker `S`
//! - operators `< > ^ v + - * / % = # @`

use crate::EditError;
use std::fmt;
use std::str::FromStr;

/// Smallest integer a cell may hold
pub const INTEGER_MIN: i32 = -99;

/// Largest integer a cell may hold
pub const INTEGER_MAX: i32 = 99;

/// Whether `n` fits in a cell
pub fn integer_in_range(n: i32) -> bool {
    (INTEGER_MIN..=INTEGER_MAX).contains(&n)
}

/// Input placeholder identifier
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputPort {
    /// Placeholder `A`, bound to the first input
    A,
    /// Placeholder `B`, bound to the second input
    B,
}

/// Operator symbols
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatorKind {
    /// `<`: moves the right neighbour one cell past the operator to the left
    MoveLeft,
    /// `>`: moves the left neighbour one cell past the operator to the right
    MoveRight,
    /// `^`: moves the neighbour below to the cell above
    MoveUp,
    /// `v`: moves the neighbour above to the cell below
    MoveDown,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`, truncating toward zero
    Div,
    /// `%`, remainder of truncating division
    Mod,
    /// `=`
    Equal,
    /// `#`
    NotEqual,
    /// `@`: sends a value back in time
    TimeWarp,
}

impl OperatorKind {
    /// All operators, in symbol table order
    pub const ALL: [OperatorKind; 12] = [
        OperatorKind::MoveLeft,
        OperatorKind::MoveRight,
        OperatorKind::MoveUp,
        OperatorKind::MoveDown,
        OperatorKind::Add,
        OperatorKind::Sub,
        OperatorKind::Mul,
        OperatorKind::Div,
        OperatorKind::Mod,
        OperatorKind::Equal,
        OperatorKind::NotEqual,
        OperatorKind::TimeWarp,
    ];

    /// Program text for this operator
    pub fn symbol(&self) -> char {
        match self {
            OperatorKind::MoveLeft => '<',
            OperatorKind::MoveRight => '>',
            OperatorKind::MoveUp => '^',
            OperatorKind::MoveDown => 'v',
            OperatorKind::Add => '+',
            OperatorKind::Sub => '-',
            OperatorKind::Mul => '*',
            OperatorKind::Div => '/',
            OperatorKind::Mod => '%',
            OperatorKind::Equal => '=',
            OperatorKind::NotEqual => '#',
            OperatorKind::TimeWarp => '@',
        }
    }

    /// Decode from program text
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Direction of travel for the four move operators
    pub fn direction(&self) -> Option<Direction> {
        match self {
            OperatorKind::MoveLeft => Some(Direction::Left),
            OperatorKind::MoveRight => Some(Direction::Right),
            OperatorKind::MoveUp => Some(Direction::Up),
            OperatorKind::MoveDown => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Unit step on the grid. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Decrement x
    Left,
    /// Increment x
    Right,
    /// Decrement y
    Up,
    /// Increment y
    Down,
}

impl Direction {
    /// Offset `(dx, dy)` of one step
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    /// Apply one step to a position, `None` past the edge of the `i32` plane
    pub fn apply(&self, (x, y): (i32, i32)) -> Option<(i32, i32)> {
        let (dx, dy) = self.offset();
        Some((x.checked_add(dx)?, y.checked_add(dy)?))
    }

    /// Step in the opposite direction
    pub fn reverse(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Contents of a single grid cell
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellValue {
    /// Nothing stored
    #[default]
    Empty,
    /// Integer payload
    Integer(i32),
    /// Placeholder replaced by an input when the run starts
    Input(InputPort),
    /// Output marker `S`; overwriting it submits a result
    OutputMarker,
    /// Operator symbol
    Operator(OperatorKind),
}

impl CellValue {
    /// Checked integer constructor
    pub fn integer(n: i32) -> Option<Self> {
        integer_in_range(n).then_some(CellValue::Integer(n))
    }

    /// Whether the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Integer payload, if any
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            CellValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Operator payload, if any
    pub fn as_operator(&self) -> Option<OperatorKind> {
        match self {
            CellValue::Operator(op) => Some(*op),
            _ => None,
        }
    }
}

impl From<OperatorKind> for CellValue {
    fn from(op: OperatorKind) -> Self {
        CellValue::Operator(op)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => f.write_str("."),
            CellValue::Integer(n) => write!(f, "{n}"),
            CellValue::Input(InputPort::A) => f.write_str("A"),
            CellValue::Input(InputPort::B) => f.write_str("B"),
            CellValue::OutputMarker => f.write_str("S"),
            CellValue::Operator(op) => write!(f, "{}", op.symbol()),
        }
    }
}

impl FromStr for CellValue {
    type Err = EditError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();

        if let Ok(n) = token.parse::<i64>() {
            return i32::try_from(n)
                .ok()
                .and_then(CellValue::integer)
                .ok_or(EditError::IntegerOutOfRange(n));
        }

        let mut chars = token.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(EditError::InvalidToken(token.to_string()));
        };

        match c {
            '.' => Ok(CellValue::Empty),
            'A' => Ok(CellValue::Input(InputPort::A)),
            'B' => Ok(CellValue::Input(InputPort::B)),
            'S' => Ok(CellValue::OutputMarker),
            _ => OperatorKind::from_symbol(c)
                .map(CellValue::Operator)
                .ok_or_else(|| EditError::InvalidToken(token.to_string())),
        }
    }
}

/// Token validity check used by program editors
///
/// Accepts `.` (empty), integers in [-99, 99], and the fixed symbols
/// `< > ^ v + - * / % = # @ S A B`.
pub fn token_is_valid(token: &str) -> bool {
    token.parse::<CellValue>().is_ok()
}
