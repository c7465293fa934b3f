//! Typed identifiers for pipes and their liquid sub-segments.

use std::fmt;

/// A pipe on the fuel path, in flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pipe {
    /// Tank outlet riser with one 90° turn.
    Supply,
    /// Horizontal feed under the metering unit.
    BelowMid,
    /// Left branch with two turns.
    Left,
    /// Right branch with two turns.
    Right,
    /// Vertical pipe through the metering unit.
    Mid,
    /// Spool valve crossover.
    Spool,
    /// Left delivery pipe.
    LeftOutput,
    /// Right delivery pipe.
    RightOutput,
}

impl Pipe {
    /// Every pipe in flow order.
    pub const ALL: [Self; 8] = [
        Self::Supply,
        Self::BelowMid,
        Self::Left,
        Self::Right,
        Self::Mid,
        Self::Spool,
        Self::LeftOutput,
        Self::RightOutput,
    ];

    /// Model component name of the pipe casing.
    #[must_use]
    pub const fn component_name(self) -> &'static str {
        match self {
            Self::Supply => "Fuel_supply_pipe",
            Self::BelowMid => "Below_Mid_pipe",
            Self::Left => "Left_pipe",
            Self::Right => "Right_pipe",
            Self::Mid => "Mid_Pipe",
            Self::Spool => "Spool_Pipe",
            Self::LeftOutput => "Left_Output",
            Self::RightOutput => "Right_Output",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Which run of a (possibly bent) pipe a liquid mesh fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Part {
    /// First vertical run (or the whole pipe when straight and upright).
    Vertical,
    /// Horizontal run (or the whole pipe when straight and lying flat).
    Horizontal,
    /// Drop after the horizontal run of a doubly bent pipe.
    SecondVertical,
}

impl Part {
    /// Every part.
    pub const ALL: [Self; 3] = [Self::Vertical, Self::Horizontal, Self::SecondVertical];

    const fn index(self) -> usize {
        self as usize
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::SecondVertical => "second_vertical",
        }
    }
}

/// A single liquid mesh slot: pipe × part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId {
    /// Host pipe.
    pub pipe: Pipe,
    /// Run within the pipe.
    pub part: Part,
}

impl SegmentId {
    /// Number of distinct segment ids.
    pub const COUNT: usize = Pipe::ALL.len() * Part::ALL.len();

    /// Construct a segment id.
    #[must_use]
    pub const fn new(pipe: Pipe, part: Part) -> Self {
        Self { pipe, part }
    }

    const fn slot(self) -> usize {
        self.pipe.index() * Part::ALL.len() + self.part.index()
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pipe.component_name(), self.part.label())
    }
}

/// Fixed-size map keyed by [`SegmentId`].
#[derive(Debug, Clone)]
pub struct SegmentMap<T> {
    slots: [Option<T>; SegmentId::COUNT],
}

impl<T> Default for SegmentMap<T> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<T> SegmentMap<T> {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, returning the previous occupant.
    pub fn insert(&mut self, id: SegmentId, value: T) -> Option<T> {
        self.slots[id.slot()].replace(value)
    }

    /// Value for `id`.
    #[must_use]
    pub fn get(&self, id: SegmentId) -> Option<&T> {
        self.slots[id.slot()].as_ref()
    }

    /// Mutable value for `id`.
    pub fn get_mut(&mut self, id: SegmentId) -> Option<&mut T> {
        self.slots[id.slot()].as_mut()
    }

    /// Whether `id` is occupied.
    #[must_use]
    pub fn contains(&self, id: SegmentId) -> bool {
        self.slots[id.slot()].is_some()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Occupied entries in flow order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &T)> {
        Pipe::ALL
            .into_iter()
            .flat_map(|pipe| Part::ALL.into_iter().map(move |part| SegmentId::new(pipe, part)))
            .filter_map(|id| self.get(id).map(|value| (id, value)))
    }
}
