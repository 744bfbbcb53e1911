use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;

use super::{rotation_index, Frame};
use crate::surface::Surface;
use crate::Result;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Triangular lattice with pairs of reflected triangles per cell, giving the
/// six-fold kaleidoscope look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleTiling {
    pub area: f64,
    pub side: f64,
    pub pivot: DVec2,
}

impl TriangleTiling {
    pub fn new(area: f64) -> Self {
        let side = area * SQRT_3 / 2.0;
        Self {
            area,
            side,
            pivot: DVec2::new(side / 2.0, side / SQRT_3 / 2.0),
        }
    }

    /// Lattice radius: cells are visited for x, y in `-n..=n`.
    pub fn rings(&self, diag: f64) -> i64 {
        (diag / 2.0 / self.side).ceil() as i64 + 1
    }

    /// Lattice basis vectors at global `angle`.
    pub fn basis(&self, angle: f64) -> (DVec2, DVec2) {
        let mx = DVec2::from_angle(angle) * self.side;
        let my = DVec2::from_angle(angle + FRAC_PI_2) * self.side * SQRT_3 / 2.0;
        (mx, my)
    }

    /// Screen position of lattice cell (x, y); odd rows shift half a cell.
    pub fn cell_center(&self, x: i64, y: i64, angle: f64, center: DVec2) -> DVec2 {
        let (mx, my) = self.basis(angle);
        let dx = x as f64 + if y % 2 != 0 { 0.5 } else { 0.0 };
        mx * dx + my * y as f64 + center
    }

    /// Corners of the clip triangle in cell-local space.
    pub fn triangle(&self) -> [DVec2; 3] {
        let l = self.side;
        [
            DVec2::ZERO,
            DVec2::new(l, 0.0),
            DVec2::new(l / 2.0, l * SQRT_3 / 2.0),
        ]
    }

    pub(super) fn paint<S: Surface>(&self, surface: &mut S, texture: &S, frame: &Frame<'_>) -> Result<()> {
        let center = frame.viewport / 2.0;
        let n = self.rings(frame.diagonal());

        for x in -n..=n {
            for y in -n..=n {
                let at = self.cell_center(x, y, frame.angle, center);
                let rot = rotation_index(x, y);
                self.stamp(surface, texture, frame, at, rot, false)?;
                self.stamp(surface, texture, frame, at, rot, true)?;
            }
        }
        Ok(())
    }

    fn stamp<S: Surface>(
        &self,
        surface: &mut S,
        texture: &S,
        frame: &Frame<'_>,
        at: DVec2,
        rot: usize,
        reflected: bool,
    ) -> Result<()> {
        surface.save();
        surface.translate(at.x, at.y)?;
        if frame.rot_screen {
            surface.rotate(frame.angle)?;
        }
        surface.translate(-self.pivot.x, -self.pivot.y)?;
        if reflected {
            surface.transform(1.0, 0.0, 0.0, -1.0, 0.0, 0.0)?;
        }
        for _ in 0..rot {
            surface.rotate(-PI / 3.0 * 2.0)?;
            surface.translate(-self.side, 0.0)?;
        }
        surface.clip_polygon(&self.triangle());
        surface.translate(self.pivot.x, self.pivot.y)?;
        if frame.rot_screen {
            surface.rotate(-frame.angle)?;
        }
        surface.translate(-self.area / 2.0, -self.area / 2.0)?;
        surface.draw_surface(texture, 0.0, 0.0)?;
        surface.restore();
        Ok(())
    }
}
