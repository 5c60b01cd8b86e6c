// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! Colour labels for grids, and recovery of vehicles from photographs of a physical board.
//!
//! A photographed board is reduced to a [`Grid`] by averaging each cell's pixels and snapping the
//! average to the nearest [`Colour`] of the palette. Every vehicle of the physical game has its own
//! colour, so [`Grid::detect`] can then read the vehicles back off the grid.

use crate::{BoardValue, Car, Configuration, Dimensions, Grid, Orientation, Position, Vehicle};
use alloc::vec::Vec;
use core::error::Error;
use core::fmt::{Display, Formatter};
use num_traits::CheckedAdd;
use serde::{Deserialize, Serialize};

/// A colour label of a grid cell.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    /// An occupied cell, or the red vehicle of a photographed board.
    Red,
    /// An orange vehicle.
    Orange,
    /// A yellow vehicle.
    Yellow,
    /// A green vehicle.
    Green,
    /// A blue vehicle.
    Blue,
    /// A purple vehicle.
    Purple,
    /// The background.
    White,
}

impl Colour {
    /// Every colour of the palette, in detection order.
    pub const ALL: [Colour; 7] = [
        Colour::Red,
        Colour::Orange,
        Colour::Yellow,
        Colour::Green,
        Colour::Blue,
        Colour::Purple,
        Colour::White,
    ];

    /// The reference RGB value of the colour.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Colour::Red => [0xFF, 0x00, 0x00],
            Colour::Orange => [0xFF, 0xA5, 0x00],
            Colour::Yellow => [0xFF, 0xFF, 0x00],
            Colour::Green => [0x00, 0x80, 0x00],
            Colour::Blue => [0x00, 0x00, 0xFF],
            Colour::Purple => [0x80, 0x00, 0x80],
            Colour::White => [0xFF, 0xFF, 0xFF],
        }
    }

    /// The lowercase name of the colour.
    pub fn name(self) -> &'static str {
        match self {
            Colour::Red => "red",
            Colour::Orange => "orange",
            Colour::Yellow => "yellow",
            Colour::Green => "green",
            Colour::Blue => "blue",
            Colour::Purple => "purple",
            Colour::White => "white",
        }
    }

    /// The character used for the colour in the text rendering of a [`Grid`].
    pub fn symbol(self) -> char {
        match self {
            Colour::Red => 'R',
            Colour::Orange => 'O',
            Colour::Yellow => 'Y',
            Colour::Green => 'G',
            Colour::Blue => 'B',
            Colour::Purple => 'P',
            Colour::White => '.',
        }
    }

    fn distance(self, rgb: [u8; 3]) -> u32 {
        self.rgb()
            .iter()
            .zip(rgb)
            .map(|(&reference, sample)| {
                let d = u32::from(reference.abs_diff(sample));
                d * d
            })
            .sum()
    }

    /// The palette colour nearest to `rgb` by squared euclidean distance. Ties go to the colour
    /// which comes last in [`Colour::ALL`].
    pub fn closest(rgb: [u8; 3]) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .min_by_key(|colour| colour.distance(rgb))
            .unwrap_or(Colour::White)
    }
}

impl Display for Colour {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// An error which denotes that a frame cannot be sampled into a grid.
#[derive(Debug)]
pub enum FrameError {
    /// The number of pixels doesn't match the width and height of the frame.
    PixelCount {
        /// The number of pixels implied by the width and height.
        expected: usize,
        /// The number of pixels provided.
        actual: usize,
    },
    /// The board has no rows or no columns to sample into.
    EmptyBoard,
    /// The square cut from the frame has fewer pixels per side than the board has cells.
    TooSmall {
        /// The side of the square cut from the frame.
        side: usize,
    },
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::PixelCount { expected, actual } => f.write_fmt(format_args!(
                "frame has {actual} pixels, but its dimensions require {expected}"
            )),
            FrameError::EmptyBoard => f.write_str("cannot sample a frame into an empty board"),
            FrameError::TooSmall { side } => f.write_fmt(format_args!(
                "a frame with a side of {side} pixels is too small for the board"
            )),
        }
    }
}

impl Error for FrameError {}

impl<V> Grid<V>
where
    V: BoardValue,
{
    /// Sample a row-major RGB frame of `width` x `height` pixels into a grid.
    ///
    /// The centred square of the frame is split into one block per cell; each block's average
    /// colour is snapped to the palette. Pixels left over when the square doesn't divide evenly
    /// are ignored.
    pub fn from_pixels(
        dim: Dimensions<V>,
        width: usize,
        height: usize,
        pixels: &[[u8; 3]],
    ) -> Result<Self, FrameError> {
        let expected = width.saturating_mul(height);
        if pixels.len() != expected {
            return Err(FrameError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }

        let side = width.min(height);
        let rows: usize = dim.rows.into();
        let columns: usize = dim.columns.into();
        let (Some(block_height), Some(block_width)) =
            (side.checked_div(rows), side.checked_div(columns))
        else {
            return Err(FrameError::EmptyBoard);
        };
        if block_height == 0 || block_width == 0 {
            return Err(FrameError::TooSmall { side });
        }
        let top = (height - side) / 2;
        let left = (width - side) / 2;
        let count = (block_height * block_width) as u64;

        let mut cells = Vec::with_capacity(dim.area());
        for row in 0..rows {
            for column in 0..columns {
                let mut sum = [0u64; 3];
                let start = left + column * block_width;
                for y in (top + row * block_height)..(top + (row + 1) * block_height) {
                    let line = &pixels[y * width + start..y * width + start + block_width];
                    for pixel in line {
                        for (total, channel) in sum.iter_mut().zip(pixel) {
                            *total += u64::from(*channel);
                        }
                    }
                }
                let average = sum.map(|total| u8::try_from(total / count).unwrap_or(u8::MAX));
                cells.push(Colour::closest(average));
            }
        }
        Ok(Self { dim, cells })
    }

    /// The two-cell vehicles painted on this grid, one per colour.
    ///
    /// For each non-white colour in palette order, the vehicle starts at the colour's first cell in
    /// row-major order and continues to the right if that cell has the same colour, otherwise
    /// downwards. Colours without such a second cell are skipped.
    pub fn detect(&self) -> Vec<(Colour, Vehicle<V>)> {
        Colour::ALL
            .into_iter()
            .filter(|&colour| colour != Colour::White)
            .filter_map(|colour| {
                let first = self.cells.iter().position(|&cell| cell == colour)?;
                let anchor = Position::from_index(first, &self.dim)?;
                let continues = |step: Position<V>| {
                    anchor.checked_add(&step).and_then(|next| self.get(next)) == Some(colour)
                };
                let orientation = if continues(Position::new(V::zero(), V::one())) {
                    Orientation::LeftRight
                } else if continues(Position::new(V::one(), V::zero())) {
                    Orientation::UpDown
                } else {
                    return None;
                };
                let car = Car::new(V::one() + V::one(), orientation)?;
                Some((colour, Vehicle::from_car(anchor, &car)?))
            })
            .collect()
    }

    /// The vehicles of [`Grid::detect`] as a configuration of the same dimensions.
    pub fn to_configuration(&self) -> Configuration<V> {
        Configuration {
            dim: self.dim,
            vehicles: self.detect().into_iter().map(|(_, vehicle)| vehicle).collect(),
        }
    }
}
