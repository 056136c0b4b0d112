//! Uniform-grid bucket index over paint points
//!
//! Buckets hold arena indices, not points. Deleted points stay in their
//! bucket until the owner compacts and rebuilds the whole index.

use hashbrown::HashMap;

/// Bucket edge length in canvas pixels
pub const BUCKET_SIZE: f32 = 32.0;

/// Grid cell coordinates `(floor(x / B), floor(y / B))`
pub type BucketKey = (i32, i32);

pub fn bucket_key(x: f32, y: f32, bucket_size: f32) -> BucketKey {
    ((x / bucket_size).floor() as i32, (y / bucket_size).floor() as i32)
}

pub struct SpatialIndex {
    bucket_size: f32,
    buckets: HashMap<BucketKey, Vec<usize>>,
}

impl SpatialIndex {
    pub fn new(bucket_size: f32) -> Self {
        Self {
            bucket_size: bucket_size.max(1.0),
            buckets: HashMap::new(),
        }
    }

    pub fn insert(&mut self, index: usize, x: f32, y: f32) {
        self.buckets
            .entry(bucket_key(x, y, self.bucket_size))
            .or_default()
            .push(index);
    }

    /// Candidates from every bucket overlapping the circle's bounding box.
    /// The caller filters by exact distance.
    pub fn query_circle(&self, x: f32, y: f32, radius: f32) -> Vec<usize> {
        let (min_x, min_y) = bucket_key(x - radius, y - radius, self.bucket_size);
        let (max_x, max_y) = bucket_key(x + radius, y + radius, self.bucket_size);

        let mut out = Vec::new();
        for gy in min_y..=max_y {
            for gx in min_x..=max_x {
                if let Some(bucket) = self.buckets.get(&(gx, gy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    pub fn bucket_size(&self) -> f32 {
        self.bucket_size
    }

    pub fn bucket(&self, key: BucketKey) -> Option<&[usize]> {
        self.buckets.get(&key).map(Vec::as_slice)
    }

    /// Every (key, index) pair, for invariant checks
    pub fn entries(&self) -> impl Iterator<Item = (BucketKey, usize)> + '_ {
        self.buckets
            .iter()
            .flat_map(|(key, bucket)| bucket.iter().map(move |&i| (*key, i)))
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(BUCKET_SIZE)
    }
}
