//! Blob-based circle primitive.
//!
//! Groups foreground pixels of a binary image into 4-connected components by
//! region growing, then keeps the components that look like a filled disk:
//! - equivalent radius `sqrt(area / π)` within `[min_radius, max_radius]`
//! - bounding box roughly square
//! - fill ratio `area / bbox_area` close to `π / 4`
//! - not clipped by the left or right frame edge
//!
//! A disk cut off by the top or bottom edge (a ball overshooting into a wall)
//! is kept: its bounding-box width is still the diameter, so the circle is
//! rebuilt from the width and the unclipped side.
//!
//! Candidates are returned largest first.

use crate::detector::{Circle, CirclePrimitive};
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Tunables for [`BlobCircleDetector`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlobCircleDetector {
    pub min_radius: f64,
    pub max_radius: f64,
    /// Accepted bounding-box aspect ratio band around 1.0 (e.g. 0.25 → [0.75, 1.33])
    pub aspect_tolerance: f64,
    /// Accepted deviation of the fill ratio from π/4
    pub fill_tolerance: f64,
}

impl Default for BlobCircleDetector {
    fn default() -> Self {
        Self {
            min_radius: 5.0,
            max_radius: 20.0,
            aspect_tolerance: 0.25,
            fill_tolerance: 0.15,
        }
    }
}

/// Pixel statistics of one connected component.
#[derive(Clone, Copy, Debug)]
struct Component {
    area: u64,
    sum_x: u64,
    sum_y: u64,
    min_x: u32,
    max_x: u32,
    min_y: u32,
    max_y: u32,
}

impl Component {
    fn seed(x: u32, y: u32) -> Self {
        Self {
            area: 0,
            sum_x: 0,
            sum_y: 0,
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.area += 1;
        self.sum_x += x as u64;
        self.sum_y += y as u64;
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    fn width(&self) -> f64 {
        (self.max_x - self.min_x + 1) as f64
    }

    fn height(&self) -> f64 {
        (self.max_y - self.min_y + 1) as f64
    }

    /// Centre in continuous coordinates (pixel `i` spans `[i, i+1)`).
    fn circle(&self) -> Circle {
        let n = self.area as f64;
        Circle {
            x: self.sum_x as f64 / n + 0.5,
            y: self.sum_y as f64 / n + 0.5,
            radius: (n / PI).sqrt(),
        }
    }
}

/// Label all 4-connected foreground components of `binary`.
fn components(binary: &GrayImage) -> Vec<Component> {
    let (w, h) = binary.dimensions();
    let mut visited = vec![false; (w as usize) * (h as usize)];
    let idx = |x: u32, y: u32| (y as usize) * (w as usize) + x as usize;
    let mut found = Vec::new();
    let mut stack: Vec<(u32, u32)> = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if visited[idx(x, y)] || binary.get_pixel(x, y)[0] == 0 {
                continue;
            }

            // grow a region from this unvisited seed
            let mut comp = Component::seed(x, y);
            visited[idx(x, y)] = true;
            stack.push((x, y));
            while let Some((cx, cy)) = stack.pop() {
                comp.add(cx, cy);
                let neighbours = [
                    (cx.wrapping_sub(1), cy),
                    (cx + 1, cy),
                    (cx, cy.wrapping_sub(1)),
                    (cx, cy + 1),
                ];
                for (nx, ny) in neighbours {
                    if nx >= w || ny >= h {
                        continue;
                    }
                    let i = idx(nx, ny);
                    if !visited[i] && binary.get_pixel(nx, ny)[0] != 0 {
                        visited[i] = true;
                        stack.push((nx, ny));
                    }
                }
            }
            found.push(comp);
        }
    }
    found
}

impl Component {
    /// Circle of a disk clipped by the top or bottom frame edge.
    fn clipped_circle(&self) -> Circle {
        let radius = self.width() / 2.0;
        let y = if self.min_y == 0 {
            (self.max_y + 1) as f64 - radius
        } else {
            self.min_y as f64 + radius
        };
        Circle {
            x: (self.min_x + self.max_x + 1) as f64 / 2.0,
            y,
            radius,
        }
    }
}

impl BlobCircleDetector {
    /// Circle for an acceptable component, `None` otherwise.
    fn circle_for(&self, comp: &Component, frame_width: u32, frame_height: u32) -> Option<Circle> {
        // a disk entering or leaving through a side edge has a biased centre
        if comp.min_x == 0 || comp.max_x + 1 >= frame_width {
            return None;
        }
        let fill = comp.area as f64 / (comp.width() * comp.height());
        let vertically_clipped = comp.min_y == 0 || comp.max_y + 1 >= frame_height;

        let circle = if vertically_clipped {
            let circle = comp.clipped_circle();
            // centre inside the frame; a cut disk fills its box more than π/4
            if comp.height() < circle.radius || comp.height() > comp.width() + 1.0 {
                return None;
            }
            if fill < PI / 4.0 - self.fill_tolerance {
                return None;
            }
            circle
        } else {
            let aspect = comp.width() / comp.height();
            if (aspect - 1.0).abs() > self.aspect_tolerance {
                return None;
            }
            if (fill - PI / 4.0).abs() > self.fill_tolerance {
                return None;
            }
            comp.circle()
        };

        (self.min_radius..=self.max_radius)
            .contains(&circle.radius)
            .then_some(circle)
    }
}

impl CirclePrimitive for BlobCircleDetector {
    fn find_circles(&self, binary: &GrayImage) -> Vec<Circle> {
        let (w, h) = binary.dimensions();
        let mut accepted: Vec<(u64, Circle)> = components(binary)
            .iter()
            .filter_map(|c| self.circle_for(c, w, h).map(|circle| (c.area, circle)))
            .collect();
        accepted.sort_by(|a, b| b.0.cmp(&a.0));
        accepted.into_iter().map(|(_, circle)| circle).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
