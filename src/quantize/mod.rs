//! Octree color quantization
//!
//! Every pixel is counted in an 8-level color octree. Leaves are then folded
//! into their parents, least significant first, until no more than the
//! requested number of nodes remain; each survivor becomes a palette entry.

mod octree;

use crate::color::Color;
use crate::error::Result;
use crate::surface::Surface;
use octree::{NodeHeap, Octree};

impl Surface {
    /// Reduce the image to at most `colors` distinct RGB values in place
    ///
    /// Each pixel keeps its own alpha. `colors` below 1 is treated as 1.
    /// Images that already use no more than `colors` values are unchanged.
    pub fn quantize(&mut self, colors: i32) -> Result<()> {
        if colors < 1 {
            tracing::warn!(colors, "palette size clamped to 1");
        }
        let target = colors.max(1) as usize;
        if self.is_empty() {
            return Ok(());
        }

        let mut tree = Octree::new()?;
        let mut heap = NodeHeap::new();
        for &p in self.pixels() {
            let leaf = tree.insert(Color(p))?;
            heap.add(&mut tree, leaf)?;
        }
        let leaves = heap.len();

        while heap.len() > target {
            let Some(node) = heap.pop(&mut tree) else {
                break;
            };
            let Some(parent) = tree.fold(node) else {
                heap.add(&mut tree, node)?;
                break;
            };
            heap.add(&mut tree, parent)?;
        }

        let palette: Vec<u32> = heap.entries().collect();
        for &id in &palette {
            tree.average(id);
        }
        tracing::debug!(
            pixels = self.pixels().len(),
            leaves,
            palette = palette.len(),
            nodes = tree.len(),
            "quantized surface"
        );

        for p in self.pixels_mut() {
            let c = Color(*p);
            *p = tree.lookup(c).with_a(c.a()).0;
        }
        Ok(())
    }

    /// Quantized copy, leaving `self` untouched
    pub fn quantized(&self, colors: i32) -> Result<Surface> {
        let mut out = self.try_clone()?;
        out.quantize(colors)?;
        Ok(out)
    }
}
