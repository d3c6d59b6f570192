use std::collections::HashMap;

use crate::render::texture::{Texture, byte_len};

/// Pool configuration for cached offscreen targets.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoolOpts {
    /// Maximum bytes retained across all buckets.
    pub max_pool_bytes: usize,
    /// Maximum number of retained textures per (w,h) bucket.
    pub max_surfaces_per_bucket: usize,
}

impl Default for SurfacePoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 64 * 1024 * 1024,
            max_surfaces_per_bucket: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SurfaceKey {
    w: u32,
    h: u32,
}

impl SurfaceKey {
    fn byte_len(self) -> usize {
        byte_len(self.w, self.h)
    }
}

/// Allocation counters for a [`SurfacePool`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SurfacePoolStats {
    /// Textures currently held for reuse.
    pub retained_surfaces: usize,
    /// Bytes currently held for reuse.
    pub retained_bytes: usize,
    /// Fresh allocations performed.
    pub alloc_surfaces: u64,
    /// Bytes allocated fresh.
    pub alloc_bytes: u64,
    /// Borrows served from the pool.
    pub reused_surfaces: u64,
    /// Released textures dropped because a cap was hit.
    pub dropped_on_release: u64,
}

/// Bounded pool of offscreen render targets keyed by size.
///
/// Borrowed textures come back cleared to transparent.
#[derive(Debug)]
pub struct SurfacePool {
    opts: SurfacePoolOpts,
    stats: SurfacePoolStats,
    buckets: HashMap<SurfaceKey, Vec<Texture>>,
}

impl SurfacePool {
    /// Empty pool with the given caps.
    pub fn new(opts: SurfacePoolOpts) -> Self {
        Self {
            opts,
            stats: SurfacePoolStats::default(),
            buckets: HashMap::new(),
        }
    }

    /// Snapshot of the allocation counters.
    pub fn stats(&self) -> SurfacePoolStats {
        self.stats.clone()
    }

    /// Take a transparent `width` x `height` texture, reusing a retained one when possible.
    pub fn borrow(&mut self, width: u32, height: u32) -> Texture {
        let key = SurfaceKey {
            w: width,
            h: height,
        };
        if let Some(mut tex) = self.buckets.get_mut(&key).and_then(Vec::pop) {
            self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(key.byte_len());
            self.stats.reused_surfaces = self.stats.reused_surfaces.saturating_add(1);
            tex.data_mut().fill(0);
            return tex;
        }

        self.stats.alloc_surfaces = self.stats.alloc_surfaces.saturating_add(1);
        self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(key.byte_len() as u64);
        Texture::new(width, height)
    }

    /// Return a texture for later reuse, or drop it when a cap is hit.
    pub fn release(&mut self, texture: Texture) {
        if self.opts.max_pool_bytes == 0 || self.opts.max_surfaces_per_bucket == 0 {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let key = SurfaceKey {
            w: texture.width(),
            h: texture.height(),
        };
        let bytes = key.byte_len();
        if self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bucket = self.buckets.entry(key).or_default();
        if bucket.len() >= self.opts.max_surfaces_per_bucket {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        bucket.push(texture);
        self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface_pool.rs"]
mod tests;
