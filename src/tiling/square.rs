use std::f64::consts::FRAC_PI_4;

use glam::DVec2;

use super::Frame;
use crate::surface::Surface;
use crate::Result;

/// Checkerboard-mirrored square cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareTiling {
    pub area: f64,
    pub side: f64,
    pub pivot: DVec2,
}

impl SquareTiling {
    pub fn new(area: f64) -> Self {
        Self {
            area,
            side: area * FRAC_PI_4.sin(),
            pivot: DVec2::splat(area / 2.0),
        }
    }

    /// Cells per axis needed to cover a square of side `diag` with a margin.
    pub fn cells_per_axis(&self, diag: f64) -> usize {
        (diag / self.side).ceil() as usize + 1
    }

    /// Axis scale of cell (i, j): `-1` on odd indices.
    pub fn mirror(i: usize, j: usize) -> DVec2 {
        let flip = |n: usize| if n % 2 == 0 { 1.0 } else { -1.0 };
        DVec2::new(flip(i), flip(j))
    }

    /// Where cell (i, j)'s local origin lands in grid space. Mirrored axes
    /// start from the far edge so the flipped cell still covers its slot.
    pub fn cell_origin(&self, i: usize, j: usize) -> DVec2 {
        let m = Self::mirror(i, j);
        let base = DVec2::new(i as f64, j as f64) * self.side;
        base + DVec2::new(
            if m.x < 0.0 { self.side } else { 0.0 },
            if m.y < 0.0 { self.side } else { 0.0 },
        )
    }

    pub(super) fn paint<S: Surface>(&self, surface: &mut S, texture: &S, frame: &Frame<'_>) -> Result<()> {
        let diag = frame.diagonal();
        let cells = self.cells_per_axis(diag);

        surface.save();
        if frame.rot_screen {
            let corner = (frame.viewport - DVec2::splat(diag)) / 2.0;
            surface.translate(corner.x, corner.y)?;
            surface.translate(diag / 2.0, diag / 2.0)?;
            surface.rotate(frame.angle)?;
            surface.translate(-diag / 2.0, -diag / 2.0)?;
        }
        for i in 0..cells {
            for j in 0..cells {
                self.stamp(surface, texture, frame, i, j)?;
            }
        }
        surface.restore();
        Ok(())
    }

    fn stamp<S: Surface>(&self, surface: &mut S, texture: &S, frame: &Frame<'_>, i: usize, j: usize) -> Result<()> {
        let origin = self.cell_origin(i, j);
        let mirror = Self::mirror(i, j);
        let l = self.side;
        let inset = (self.area - l) / 2.0;

        surface.save();
        surface.translate(origin.x, origin.y)?;
        surface.scale(mirror.x, mirror.y)?;
        surface.clip_polygon(&[
            DVec2::ZERO,
            DVec2::new(l, 0.0),
            DVec2::new(l, l),
            DVec2::new(0.0, l),
        ]);
        surface.translate(-inset, -inset)?;
        surface.translate(self.pivot.x, self.pivot.y)?;
        if frame.rot_screen {
            surface.rotate(-frame.angle)?;
        }
        surface.translate(-self.pivot.x, -self.pivot.y)?;
        surface.draw_surface(texture, 0.0, 0.0)?;
        surface.restore();
        Ok(())
    }
}
