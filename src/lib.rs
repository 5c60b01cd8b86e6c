// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! parking-view: grid and state-graph data for visualizing "Rush Hour" configurations.
//!
//! A configuration is a snapshot of every vehicle on the board, each vehicle given by the cells it
//! occupies (its footprint). This library turns a configuration into the two things a
//! visualization needs: a colour [`Grid`] of the board, and a [`StateId`] naming the configuration
//! as a node in a state-transition graph. A history of configurations becomes a list of
//! identifiers and the [`Transition`]s between consecutive ones, which together with the grid of
//! the newest configuration form a [`Scene`] handed to a [`Renderer`].
//!
//! No rules are checked here: vehicles may overlap and may take any shape. Only the bounds of the
//! board are enforced. Identifiers are arbitrary-precision integers, so boards of any size and
//! occupancy can be identified.

#![no_std]

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::error::Error;
use core::fmt::{Debug, Display, Formatter};
use core::num::{IntErrorKind, NonZeroUsize};
use core::ops::Add;
use num_bigint::BigUint;
use num_traits::{CheckedAdd, CheckedMul, One, Unsigned, Zero};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod palette;

pub use palette::{Colour, FrameError};

/// Marker trait: specifies that a value may be used for board definitions.
pub trait BoardValue:
    One
    + Ord
    + Add<Output = Self>
    + CheckedAdd
    + Copy
    + Into<usize>
    + TryFrom<usize>
    + Zero
    + CheckedMul
    + Debug
    + Display
    + Unsigned
    + DeserializeOwned
    + Serialize
    + 'static
{
}

impl<V> BoardValue for V where
    V: One
        + Ord
        + Add<Output = Self>
        + CheckedAdd
        + Copy
        + Into<usize>
        + TryFrom<usize>
        + Zero
        + CheckedMul
        + Debug
        + Display
        + Unsigned
        + DeserializeOwned
        + Serialize
        + 'static
{
}

/// The side length of a standard "Rush Hour" board.
pub const STANDARD_SIDE: usize = 6;

/// An orientation for a car.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub enum Orientation {
    /// The car extends downwards from its anchor.
    UpDown,
    /// The car extends rightwards from its anchor.
    LeftRight,
}

/// A car, generic over the numeric type which backs it. This is the compact description of a
/// straight vehicle; see [`Vehicle::from_car`] for its footprint.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub struct Car<V> {
    length: V,
    orientation: Orientation,
}

impl<V> Car<V> {
    /// The length of the car.
    pub fn length(&self) -> &V {
        &self.length
    }

    /// The orientation of the car.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl<V> Car<V>
where
    V: BoardValue,
{
    /// Create a new car of the provided length and orientation.
    pub fn new(length: V, orientation: Orientation) -> Option<Self> {
        if length < V::one() {
            None
        } else {
            Some(Self {
                length,
                orientation,
            })
        }
    }
}

/// A position in the board (eff., a coordinate pair).
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Position<V> {
    row: V,
    column: V,
}

impl<V> Position<V> {
    /// Create a position from its row and column.
    pub fn new(row: V, column: V) -> Self {
        Self { row, column }
    }

    /// The row of the position.
    pub fn row(&self) -> &V {
        &self.row
    }

    /// The column of the position.
    pub fn column(&self) -> &V {
        &self.column
    }
}

impl<V> Add for Position<V>
where
    V: BoardValue,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            row: self.row + rhs.row,
            column: self.column + rhs.column,
        }
    }
}

impl<V> CheckedAdd for Position<V>
where
    V: BoardValue,
{
    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(&rhs.row)?,
            column: self.column.checked_add(&rhs.column)?,
        })
    }
}

impl<V> Position<V>
where
    V: BoardValue,
{
    /// The position encoded as a row-major index into a board with the provided dimensions.
    pub fn as_index(&self, dim: &Dimensions<V>) -> Option<usize> {
        if self.row >= dim.rows || self.column >= dim.columns {
            return None;
        }
        let row = self.row.into();
        let column = self.column.into();
        Some(row * dim.columns.into() + column)
    }

    /// The position at the provided row-major index, or `None` if the index lies outside a board
    /// with the provided dimensions.
    pub fn from_index(index: usize, dim: &Dimensions<V>) -> Option<Self> {
        if index >= dim.area() {
            return None;
        }
        let columns: usize = dim.columns.into();
        Some(Self {
            row: V::try_from(index / columns).ok()?,
            column: V::try_from(index % columns).ok()?,
        })
    }
}

impl<V> From<(V, V)> for Position<V> {
    fn from((row, column): (V, V)) -> Self {
        Self { row, column }
    }
}

/// The dimensions of a board in terms of rows and columns.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub struct Dimensions<V> {
    rows: V,
    columns: V,
}

impl<V> Dimensions<V> {
    /// The number of rows.
    pub fn rows(&self) -> &V {
        &self.rows
    }

    /// The number of columns.
    pub fn columns(&self) -> &V {
        &self.columns
    }
}

impl<V> Dimensions<V>
where
    V: BoardValue,
{
    /// The dimensions of a standard 6x6 board.
    pub fn standard() -> Self {
        let side = (0..STANDARD_SIDE).fold(V::zero(), |side, _| side + V::one());
        Self {
            rows: side,
            columns: side,
        }
    }

    /// The number of cells in a board of these dimensions.
    pub fn area(&self) -> usize {
        self.rows.into() * self.columns.into()
    }
}

/// An error associated with the creation of the dimensions.
#[derive(Debug)]
pub struct DimensionError(IntErrorKind);

impl Display for DimensionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let reason = match self.0 {
            IntErrorKind::PosOverflow => "the dimensions were too large",
            IntErrorKind::Zero => "the dimensions have zero area",
            _ => unreachable!(),
        };
        f.write_fmt(format_args!("dimensions could not be used: {reason}"))
    }
}

impl Error for DimensionError {}

impl<V> TryFrom<(V, V)> for Dimensions<V>
where
    V: BoardValue,
{
    type Error = DimensionError;

    fn try_from((rows, columns): (V, V)) -> Result<Self, Self::Error> {
        if let Some(size) = rows.checked_mul(&columns) {
            if size.is_zero() {
                Err(DimensionError(IntErrorKind::Zero))
            } else {
                Ok(Self { rows, columns })
            }
        } else {
            Err(DimensionError(IntErrorKind::PosOverflow))
        }
    }
}

/// A vehicle, described by the ordered list of cells it occupies.
///
/// The order of the footprint is significant for [`Configuration::id`] and
/// [`Configuration::key`].
#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub struct Vehicle<V> {
    footprint: Vec<Position<V>>,
}

impl<V> Vehicle<V> {
    /// Create a vehicle occupying the provided cells.
    pub fn new(footprint: Vec<Position<V>>) -> Self {
        Self { footprint }
    }

    /// The cells occupied by this vehicle, in order.
    pub fn footprint(&self) -> &[Position<V>] {
        &self.footprint
    }
}

impl<V> Vehicle<V>
where
    V: BoardValue,
{
    /// The vehicle covered by `car` when its top-left cell is at `position`, or `None` if a cell
    /// of the car cannot be represented by `V`.
    pub fn from_car<P: Into<Position<V>>>(position: P, car: &Car<V>) -> Option<Self> {
        let step = match car.orientation {
            Orientation::UpDown => Position::new(V::one(), V::zero()),
            Orientation::LeftRight => Position::new(V::zero(), V::one()),
        };
        let mut footprint = Vec::with_capacity(car.length.into());
        let mut cell = Some(position.into());
        for _ in 0..car.length.into() {
            let current = cell?;
            footprint.push(current);
            cell = current.checked_add(&step);
        }
        Some(Self { footprint })
    }
}

impl<V, P> FromIterator<P> for Vehicle<V>
where
    P: Into<Position<V>>,
{
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            footprint: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// An error which denotes that a vehicle occupies a cell outside of the board.
#[derive(Debug)]
pub struct OutOfBoundsError<V> {
    vehicle: NonZeroUsize,
    position: Position<V>,
    dim: Dimensions<V>,
}

impl<V> OutOfBoundsError<V> {
    /// The (1-based) index of the offending vehicle.
    pub fn vehicle(&self) -> NonZeroUsize {
        self.vehicle
    }

    /// The offending cell.
    pub fn position(&self) -> &Position<V> {
        &self.position
    }
}

impl<V> Display for OutOfBoundsError<V>
where
    V: BoardValue,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!(
            "vehicle {} occupies ({}, {}), which is outside of the {}x{} board",
            self.vehicle, self.position.row, self.position.column, self.dim.rows, self.dim.columns
        ))
    }
}

impl<V> Error for OutOfBoundsError<V> where V: BoardValue {}

/// A configuration identifier. See [`Configuration::id`].
///
/// Identifiers are unbounded and (de)serialize as decimal strings.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StateId(BigUint);

impl StateId {
    /// The numeric value of the identifier.
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

impl From<BigUint> for StateId {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u64> for StateId {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Serialize for StateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let digits = String::deserialize(deserializer)?;
        digits.parse().map(Self).map_err(serde::de::Error::custom)
    }
}

const ID_BASE: u32 = 100;

/// A snapshot of every vehicle on a board.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub struct Configuration<V> {
    dim: Dimensions<V>,
    vehicles: Vec<Vehicle<V>>,
}

impl<V> Configuration<V> {
    /// The dimensions of the board.
    pub fn dimensions(&self) -> &Dimensions<V> {
        &self.dim
    }

    /// The vehicles of this configuration, in order.
    pub fn vehicles(&self) -> &[Vehicle<V>] {
        &self.vehicles
    }

    /// Produce an empty configuration (i.e., one with no vehicles) with the provided dimensions.
    pub fn empty<D: TryInto<Dimensions<V>>>(dim: D) -> Result<Self, D::Error> {
        let dim = dim.try_into()?;
        Ok(Self {
            dim,
            vehicles: Vec::new(),
        })
    }

    /// Add a vehicle, returning its (1-based) index.
    pub fn push(&mut self, vehicle: Vehicle<V>) -> NonZeroUsize {
        self.vehicles.push(vehicle);
        NonZeroUsize::MIN.saturating_add(self.vehicles.len() - 1)
    }

    /// Builder-style variant of [`Configuration::push`].
    pub fn with_vehicle(mut self, vehicle: Vehicle<V>) -> Self {
        self.push(vehicle);
        self
    }
}

impl<V> Configuration<V>
where
    V: BoardValue,
{
    /// An empty configuration on a standard 6x6 board.
    pub fn standard() -> Self {
        Self {
            dim: Dimensions::standard(),
            vehicles: Vec::new(),
        }
    }

    /// The row-major cell indices of every vehicle, or an error for the first cell outside of the
    /// board.
    fn concrete(&self) -> Result<Vec<Vec<usize>>, OutOfBoundsError<V>> {
        self.vehicles
            .iter()
            .enumerate()
            .map(|(idx, vehicle)| {
                vehicle
                    .footprint
                    .iter()
                    .map(|position| {
                        position.as_index(&self.dim).ok_or(OutOfBoundsError {
                            vehicle: NonZeroUsize::MIN.saturating_add(idx),
                            position: *position,
                            dim: self.dim,
                        })
                    })
                    .collect::<Result<Vec<usize>, _>>()
            })
            .collect()
    }

    /// Check that every vehicle lies within the board.
    pub fn validate(&self) -> Result<(), OutOfBoundsError<V>> {
        self.concrete().map(|_| ())
    }

    /// The board as a grid: every occupied cell is [`Colour::Red`], every other cell is
    /// [`Colour::White`].
    pub fn grid(&self) -> Result<Grid<V>, OutOfBoundsError<V>> {
        self.grid_with(|_| Colour::Red)
    }

    /// The board as a grid, painting each vehicle with the colour chosen by `paint` for its
    /// (1-based) index. Where vehicles overlap, the later vehicle's colour is kept.
    pub fn grid_with<F>(&self, mut paint: F) -> Result<Grid<V>, OutOfBoundsError<V>>
    where
        F: FnMut(NonZeroUsize) -> Colour,
    {
        let concrete = self.concrete()?;
        let mut cells = vec![Colour::White; self.dim.area()];
        for (idx, indices) in concrete.iter().enumerate() {
            let colour = paint(NonZeroUsize::MIN.saturating_add(idx));
            for &index in indices {
                cells[index] = colour;
            }
        }
        Ok(Grid {
            dim: self.dim,
            cells,
        })
    }

    /// The identifier of this configuration.
    ///
    /// Walking the cells of every vehicle in order, the `n`th cell (from zero) at `(row, column)`
    /// contributes `row * 100^n + column * 100^(2n)`. The result therefore depends on the order of
    /// the vehicles and of the cells within each vehicle.
    pub fn id(&self) -> Result<StateId, OutOfBoundsError<V>> {
        self.validate()?;
        let mut id = BigUint::zero();
        let mut hash = BigUint::one();
        for position in self.vehicles.iter().flat_map(|vehicle| &vehicle.footprint) {
            let row: usize = position.row.into();
            let column: usize = position.column.into();
            id += &hash * BigUint::from(row) + &hash * &hash * BigUint::from(column);
            hash *= ID_BASE;
        }
        Ok(StateId(id))
    }

    /// A lossless key for this configuration which, like [`Configuration::id`], depends on the
    /// order of vehicles and cells, but never overflows.
    pub fn key(&self) -> Result<StateKey, OutOfBoundsError<V>> {
        Ok(StateKey(self.concrete()?))
    }

    /// A key which is equal for every configuration covering the same footprints, regardless of
    /// the order of the vehicles or of the cells within each vehicle.
    pub fn canonical_key(&self) -> Result<StateKey, OutOfBoundsError<V>> {
        let mut concrete = self.concrete()?;
        for indices in &mut concrete {
            indices.sort_unstable();
        }
        concrete.sort_unstable();
        Ok(StateKey(concrete))
    }
}

/// A key identifying a configuration by the row-major cell indices of its vehicles.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct StateKey(Vec<Vec<usize>>);

impl StateKey {
    /// The cell indices of each vehicle.
    pub fn vehicles(&self) -> &[Vec<usize>] {
        &self.0
    }
}

impl Display for StateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for (v, indices) in self.0.iter().enumerate() {
            if v != 0 {
                f.write_str("/")?;
            }
            for (i, index) in indices.iter().enumerate() {
                if i != 0 {
                    f.write_str(",")?;
                }
                write!(f, "{index}")?;
            }
        }
        Ok(())
    }
}

/// A colour grid of a board, in row-major order.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub struct Grid<V> {
    dim: Dimensions<V>,
    cells: Vec<Colour>,
}

impl<V> Grid<V> {
    /// The dimensions of the grid.
    pub fn dimensions(&self) -> &Dimensions<V> {
        &self.dim
    }

    /// Every cell of the grid, in row-major order.
    pub fn cells(&self) -> &[Colour] {
        &self.cells
    }
}

impl<V> Grid<V>
where
    V: BoardValue,
{
    /// Wrap an existing row-major colour map, or `None` if it doesn't match the dimensions.
    pub fn from_cells(dim: Dimensions<V>, cells: Vec<Colour>) -> Option<Self> {
        (cells.len() == dim.area()).then_some(Self { dim, cells })
    }

    /// The colour at the requested position, or `None` if the position doesn't exist.
    pub fn get<P: Into<Position<V>>>(&self, position: P) -> Option<Colour> {
        position
            .into()
            .as_index(&self.dim)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// The rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Colour]> {
        let columns: usize = self.dim.columns.into();
        self.cells.chunks(columns.max(1))
    }

    /// The grid as a matrix, as consumed by grid renderers.
    pub fn to_rows(&self) -> Vec<Vec<Colour>> {
        self.rows().map(<[Colour]>::to_vec).collect()
    }
}

impl<V> Display for Grid<V>
where
    V: BoardValue,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for row in self.rows() {
            for colour in row {
                write!(f, "{}", colour.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A directed edge between two configuration identifiers.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Transition {
    from: StateId,
    to: StateId,
}

impl Transition {
    /// Create a transition between two identifiers.
    pub fn new(from: StateId, to: StateId) -> Self {
        Self { from, to }
    }

    /// The identifier the transition leaves.
    pub fn source(&self) -> &StateId {
        &self.from
    }

    /// The identifier the transition enters.
    pub fn target(&self) -> &StateId {
        &self.to
    }
}

impl From<(StateId, StateId)> for Transition {
    fn from((from, to): (StateId, StateId)) -> Self {
        Self { from, to }
    }
}

/// The identifier of every configuration in `history`, in order.
pub fn ids<V>(history: &[Configuration<V>]) -> Result<Vec<StateId>, OutOfBoundsError<V>>
where
    V: BoardValue,
{
    history.iter().map(Configuration::id).collect()
}

/// One transition for each pair of consecutive configurations in `history`, in order.
pub fn transitions<V>(history: &[Configuration<V>]) -> Result<Vec<Transition>, OutOfBoundsError<V>>
where
    V: BoardValue,
{
    Ok(link(&ids(history)?))
}

fn link(ids: &[StateId]) -> Vec<Transition> {
    ids.windows(2)
        .map(|pair| Transition::new(pair[0].clone(), pair[1].clone()))
        .collect()
}

/// An error produced while assembling a [`Scene`].
#[derive(Debug)]
pub enum SceneError<V> {
    /// The history contained no configurations.
    EmptyHistory,
    /// A configuration of the history lies (partly) outside of its board.
    OutOfBounds(OutOfBoundsError<V>),
}

impl<V> From<OutOfBoundsError<V>> for SceneError<V> {
    fn from(value: OutOfBoundsError<V>) -> Self {
        Self::OutOfBounds(value)
    }
}

impl<V> Display for SceneError<V>
where
    V: BoardValue,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            SceneError::EmptyHistory => f.write_str("cannot build a scene from an empty history"),
            SceneError::OutOfBounds(e) => {
                f.write_fmt(format_args!("cannot build a scene: {e}"))
            }
        }
    }
}

impl<V> Error for SceneError<V> where V: BoardValue {}

/// A consumer of the data in a [`Scene`].
pub trait Renderer<V> {
    /// The error produced when rendering fails.
    type Error;

    /// Render the grid of the current configuration.
    fn grid(&mut self, grid: &Grid<V>) -> Result<(), Self::Error>;

    /// Render the state-transition graph, highlighting `state`.
    fn graph(
        &mut self,
        state: &StateId,
        states: &[StateId],
        transitions: &[Transition],
    ) -> Result<(), Self::Error>;
}

/// Everything needed to display one step of a history: the newest configuration's grid and
/// identifier, and the graph of identifiers seen so far.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Scene<V> {
    state: StateId,
    states: Vec<StateId>,
    transitions: Vec<Transition>,
    grid: Grid<V>,
}

impl<V> Scene<V> {
    /// The identifier of the current (i.e., last) configuration.
    pub fn state(&self) -> &StateId {
        &self.state
    }

    /// The identifier of every configuration in the history.
    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    /// The transitions between consecutive configurations.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The grid of the current configuration.
    pub fn grid(&self) -> &Grid<V> {
        &self.grid
    }

    /// Hand the scene to a renderer: first the grid, then the graph.
    pub fn render<R: Renderer<V>>(&self, renderer: &mut R) -> Result<(), R::Error> {
        renderer.grid(&self.grid)?;
        renderer.graph(&self.state, &self.states, &self.transitions)
    }
}

impl<V> Scene<V>
where
    V: BoardValue,
{
    /// Build the scene for a history whose last element is the current configuration.
    pub fn from_history(history: &[Configuration<V>]) -> Result<Self, SceneError<V>> {
        let current = history.last().ok_or(SceneError::EmptyHistory)?;
        let states = ids(history)?;
        let state = states.last().cloned().ok_or(SceneError::EmptyHistory)?;
        Ok(Self {
            state,
            transitions: link(&states),
            states,
            grid: current.grid()?,
        })
    }
}

#[cfg(test)]
mod test {
    use crate::{
        Car, Colour, Configuration, Dimensions, Grid, Orientation, Position, Renderer, Scene,
        SceneError, StateId, Transition, Vehicle, ids, transitions,
    };
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;
    use core::error::Error;
    use proptest::prelude::*;

    fn configuration(vehicles: &[&[(u8, u8)]]) -> Configuration<u8> {
        vehicles
            .iter()
            .fold(Configuration::standard(), |configuration, cells| {
                configuration.with_vehicle(cells.iter().copied().collect())
            })
    }

    fn state(value: u64) -> StateId {
        StateId::from(value)
    }

    fn previous() -> Configuration<u8> {
        configuration(&[&[(0, 1), (0, 2)], &[(3, 0), (4, 0)]])
    }

    fn current() -> Configuration<u8> {
        configuration(&[&[(0, 0), (0, 1)], &[(3, 0), (4, 0)]])
    }

    #[test]
    fn sample_grid() -> Result<(), Box<dyn Error>> {
        let grid = current().grid()?;
        assert_eq!(36, grid.cells().len());
        let red = [(0u8, 0u8), (0, 1), (3, 0), (4, 0)];
        for row in 0..6u8 {
            for column in 0..6u8 {
                let expected = if red.contains(&(row, column)) {
                    Colour::Red
                } else {
                    Colour::White
                };
                assert_eq!(Some(expected), grid.get((row, column)));
            }
        }
        assert_eq!(
            "RR....\n......\n......\nR.....\nR.....\n......\n",
            grid.to_string()
        );
        assert_eq!(6, grid.to_rows().len());
        Ok(())
    }

    #[test]
    fn overlapping_vehicles_stay_red() -> Result<(), Box<dyn Error>> {
        let grid = configuration(&[&[(2, 2), (2, 3)], &[(2, 3), (3, 3)]]).grid()?;
        assert_eq!(Some(Colour::Red), grid.get((2, 3)));
        assert_eq!(3, grid.cells().iter().filter(|c| **c == Colour::Red).count());
        Ok(())
    }

    #[test]
    fn painted_grid() -> Result<(), Box<dyn Error>> {
        let grid = current().grid_with(|idx| match idx.get() {
            1 => Colour::Green,
            _ => Colour::Blue,
        })?;
        assert_eq!(Some(Colour::Green), grid.get((0, 1)));
        assert_eq!(Some(Colour::Blue), grid.get((4, 0)));
        assert_eq!(Some(Colour::White), grid.get((5, 5)));
        assert_eq!(None, grid.get((6, 0)));
        Ok(())
    }

    #[test]
    fn sample_ids() -> Result<(), Box<dyn Error>> {
        assert_eq!(state(4_050_001), previous().id()?);
        assert_eq!(state(4_040_000), current().id()?);
        assert_eq!(state(0), Configuration::<u8>::standard().id()?);
        assert_eq!("4040000", current().id()?.to_string());
        Ok(())
    }

    #[test]
    fn id_depends_on_order() -> Result<(), Box<dyn Error>> {
        let reordered = configuration(&[&[(0, 1), (0, 0)], &[(3, 0), (4, 0)]]);
        assert_eq!(state(4_030_001), reordered.id()?);
        assert_ne!(current().id()?, reordered.id()?);

        let swapped = configuration(&[&[(3, 0), (4, 0)], &[(0, 0), (0, 1)]]);
        assert_ne!(current().id()?, swapped.id()?);
        Ok(())
    }

    #[test]
    fn crowded_board_ids() -> Result<(), Box<dyn Error>> {
        let corner = [(5u8, 5u8); 40];
        let eleven = configuration(&[&corner[..4], &corner[4..11]]).id()?;
        assert!(eleven.value().bits() > 128);

        let full = configuration(&[&corner]).id()?;
        assert_ne!(full, configuration(&[&corner[..39]]).id()?);
        assert!(full > eleven);
        Ok(())
    }

    #[test]
    fn out_of_bounds() {
        let configuration = configuration(&[&[(0, 0)], &[(5, 5), (6, 5)]]);
        match configuration.grid() {
            Err(e) => {
                assert_eq!(2, e.vehicle().get());
                assert_eq!(Position::new(6, 5), *e.position());
                assert_eq!(
                    "vehicle 2 occupies (6, 5), which is outside of the 6x6 board",
                    e.to_string()
                );
            }
            s => unreachable!("Expected an error, got {s:?}"),
        }
        assert_eq!(2, configuration.id().unwrap_err().vehicle().get());
        assert!(matches!(
            Scene::from_history(&[configuration.clone()]),
            Err(SceneError::OutOfBounds(_))
        ));
        assert!(configuration.key().is_err());
        assert!(configuration.validate().is_err());
    }

    #[test]
    fn dimensions() -> Result<(), Box<dyn Error>> {
        assert!(Configuration::<u8>::empty((0u8, 6)).is_err());
        assert!(Configuration::<u8>::empty((16u8, 16)).is_err());
        let configuration = Configuration::empty((2u8, 3))?
            .with_vehicle([(1u8, 0u8), (1, 1), (1, 2)].into_iter().collect());
        let grid = configuration.grid()?;
        assert_eq!("...\nRRR\n", grid.to_string());
        assert_eq!(Dimensions::standard(), *Configuration::<u16>::standard().dimensions());
        assert_eq!(36, Dimensions::<u16>::standard().area());
        Ok(())
    }

    #[test]
    fn vehicles_from_cars() {
        let truck = Car::new(3u8, Orientation::UpDown).unwrap();
        let vehicle = Vehicle::from_car((1, 4), &truck).unwrap();
        assert_eq!(
            &[Position::new(1, 4), Position::new(2, 4), Position::new(3, 4)],
            vehicle.footprint()
        );

        let car = Car::new(2u8, Orientation::LeftRight).unwrap();
        assert_eq!(2, Vehicle::from_car((0, 0), &car).unwrap().footprint().len());
        assert!(Vehicle::from_car((0, 255), &car).is_none());
        assert!(Car::new(0u8, Orientation::LeftRight).is_none());
    }

    #[test]
    fn sample_history() -> Result<(), Box<dyn Error>> {
        let history = [previous(), current()];
        assert_eq!(vec![state(4_050_001), state(4_040_000)], ids(&history)?);
        assert_eq!(
            vec![Transition::new(previous().id()?, current().id()?)],
            transitions(&history)?
        );
        assert!(transitions(&history[..1])?.is_empty());
        assert!(ids::<u8>(&[])?.is_empty());
        Ok(())
    }

    #[test]
    fn keys() -> Result<(), Box<dyn Error>> {
        assert_eq!("0,1/18,24", current().key()?.to_string());

        let reordered = configuration(&[&[(4, 0), (3, 0)], &[(0, 1), (0, 0)]]);
        assert_ne!(current().key()?, reordered.key()?);
        assert_eq!(current().canonical_key()?, reordered.canonical_key()?);
        assert_ne!(current().canonical_key()?, previous().canonical_key()?);

        let long = configuration(&[&[(5, 5); 40]]);
        assert_eq!(40, long.key()?.vehicles()[0].len());
        Ok(())
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        grid: Option<Grid<u8>>,
        graph: Option<(StateId, Vec<StateId>, Vec<Transition>)>,
    }

    impl Renderer<u8> for Recorder {
        type Error = &'static str;

        fn grid(&mut self, grid: &Grid<u8>) -> Result<(), Self::Error> {
            self.calls.push("grid".to_string());
            self.grid = Some(grid.clone());
            Ok(())
        }

        fn graph(
            &mut self,
            state: &StateId,
            states: &[StateId],
            transitions: &[Transition],
        ) -> Result<(), Self::Error> {
            self.calls.push("graph".to_string());
            self.graph = Some((state.clone(), states.to_vec(), transitions.to_vec()));
            Ok(())
        }
    }

    struct Broken;

    impl Renderer<u8> for Broken {
        type Error = &'static str;

        fn grid(&mut self, _grid: &Grid<u8>) -> Result<(), Self::Error> {
            Err("no display")
        }

        fn graph(&mut self, _: &StateId, _: &[StateId], _: &[Transition]) -> Result<(), Self::Error> {
            unreachable!("the graph is rendered after the grid")
        }
    }

    #[test]
    fn scene() -> Result<(), Box<dyn Error>> {
        let scene = Scene::from_history(&[previous(), current()])?;
        assert_eq!(&state(4_040_000), scene.state());
        assert_eq!(&[state(4_050_001), state(4_040_000)], scene.states());
        assert_eq!(
            &[Transition::from((state(4_050_001), state(4_040_000)))],
            scene.transitions()
        );
        assert_eq!(&current().grid()?, scene.grid());

        let mut recorder = Recorder::default();
        scene.render(&mut recorder)?;
        assert_eq!(vec!["grid", "graph"], recorder.calls);
        assert_eq!(Some(scene.grid().clone()), recorder.grid);
        assert_eq!(
            Some((
                state(4_040_000),
                vec![state(4_050_001), state(4_040_000)],
                scene.transitions().to_vec()
            )),
            recorder.graph
        );

        assert_eq!(Err("no display"), scene.render(&mut Broken));

        match Scene::<u8>::from_history(&[]) {
            Err(SceneError::EmptyHistory) => {}
            s => unreachable!("Expected an empty history error, got {s:?}"),
        }
        Ok(())
    }

    #[test]
    fn scene_serializes_for_renderers() -> Result<(), Box<dyn Error>> {
        let scene = Scene::from_history(&[previous(), current()])?;
        let value = serde_json::to_value(&scene)?;
        assert_eq!("4040000", value["state"]);
        assert_eq!("4050001", value["transitions"][0]["from"]);
        assert_eq!("4040000", value["transitions"][0]["to"]);
        assert_eq!("red", value["grid"]["cells"][0]);
        assert_eq!("white", value["grid"]["cells"][2]);

        let decoded: Scene<u8> = serde_json::from_value(value)?;
        assert_eq!(scene, decoded);
        Ok(())
    }

    fn arbitrary_configuration() -> impl Strategy<Value = Configuration<u8>> {
        prop::collection::vec(prop::collection::vec((0u8..6, 0u8..6), 0..3), 0..4).prop_map(
            |vehicles| {
                vehicles
                    .into_iter()
                    .fold(Configuration::standard(), |configuration, cells| {
                        configuration.with_vehicle(cells.into_iter().collect())
                    })
            },
        )
    }

    proptest! {
        #[test]
        fn red_iff_occupied(configuration in arbitrary_configuration()) {
            let grid = configuration.grid().unwrap();
            prop_assert_eq!(36, grid.cells().len());
            for index in 0..36 {
                let position = Position::from_index(index, configuration.dimensions()).unwrap();
                let occupied = configuration
                    .vehicles()
                    .iter()
                    .any(|vehicle| vehicle.footprint().contains(&position));
                let expected = if occupied { Colour::Red } else { Colour::White };
                prop_assert_eq!(expected, grid.cells()[index]);
            }
        }

        #[test]
        fn id_is_deterministic(configuration in arbitrary_configuration()) {
            prop_assert_eq!(configuration.id().unwrap(), configuration.clone().id().unwrap());
        }

        #[test]
        fn history_lengths(history in prop::collection::vec(arbitrary_configuration(), 1..6)) {
            prop_assert_eq!(history.len(), ids(&history).unwrap().len());
            prop_assert_eq!(history.len() - 1, transitions(&history).unwrap().len());
        }
    }
}
