//! Canvas geometry used by the generator.

use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::graph::Position;

/// Drawing area the generator lays nodes out on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    /// Distance kept free along every edge of the canvas
    pub margin: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            margin: 40.0,
        }
    }
}

impl Canvas {
    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Width and height of the usable area inside the margin
    pub fn usable(&self) -> (f64, f64) {
        (
            (self.width - 2.0 * self.margin).max(0.0),
            (self.height - 2.0 * self.margin).max(0.0),
        )
    }

    /// Largest circle radius that fits inside the margin
    pub fn max_radius(&self) -> f64 {
        let (w, h) = self.usable();
        w.min(h) / 2.0
    }

    /// Uniform random point inside the margin
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let (w, h) = self.usable();
        Position::new(
            self.margin + rng.gen::<f64>() * w,
            self.margin + rng.gen::<f64>() * h,
        )
    }
}

/// `count` points evenly spaced on a circle, starting at angle 0
pub fn circle_positions(center: Position, radius: f64, count: usize) -> Vec<Position> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f64 / count as f64;
            Position::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// Random point within `radius` of `center`, uniform over the disc
pub fn random_position_near<R: Rng + ?Sized>(
    center: Position,
    radius: f64,
    rng: &mut R,
) -> Position {
    let angle = rng.gen::<f64>() * TAU;
    let distance = radius * rng.gen::<f64>().sqrt();
    Position::new(center.x + distance * angle.cos(), center.y + distance * angle.sin())
}

/// Lattice dimensions `(columns, rows)` for `count` points on a canvas with
/// the given aspect ratio
pub fn grid_dimensions(count: usize, aspect_ratio: f64) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let columns = ((count as f64 * aspect_ratio).sqrt().ceil() as usize).clamp(1, count);
    let rows = count.div_ceil(columns);
    (columns, rows)
}

/// Indices of the `k` points closest to `positions[index]` among
/// `candidates`, nearest first. Ties keep candidate order.
pub fn k_nearest(
    positions: &[Position],
    index: usize,
    candidates: &[usize],
    k: usize,
) -> Vec<usize> {
    let origin = positions[index];
    let mut ranked: Vec<(usize, f64)> = candidates
        .iter()
        .copied()
        .filter(|&c| c != index)
        .map(|c| (c, origin.distance_to(&positions[c])))
        .collect();

    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.into_iter().take(k).map(|(c, _)| c).collect()
}
