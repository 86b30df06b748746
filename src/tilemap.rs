/// A square 2D grid owning one contiguous row-major buffer.
///
/// Three access policies are offered:
/// - exact (`get`/`set`): caller guarantees the coordinate is in bounds, panics otherwise
/// - clamped: each axis saturates to `[0, size - 1]`
/// - wrapped: each axis reduces modulo `size` (Euclidean, so negatives wrap too)
///
/// Stencil code that probes past a border must use the clamped or wrapped forms.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub size: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(size: usize) -> Self {
        Self::new_with(size, T::default())
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(size: usize, value: T) -> Self {
        assert!(size > 0, "tilemap size must be positive");
        Self {
            size,
            data: vec![value; size * size],
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.size && y < self.size,
            "tilemap access ({}, {}) out of bounds for size {}",
            x,
            y,
            self.size
        );
        y * self.size + x
    }

    fn clamp_axis(&self, v: i32) -> usize {
        v.clamp(0, self.size as i32 - 1) as usize
    }

    fn wrap_axis(&self, v: i32) -> usize {
        v.rem_euclid(self.size as i32) as usize
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    pub fn get_clamped(&self, x: i32, y: i32) -> &T {
        self.get(self.clamp_axis(x), self.clamp_axis(y))
    }

    pub fn set_clamped(&mut self, x: i32, y: i32, value: T) {
        let (cx, cy) = (self.clamp_axis(x), self.clamp_axis(y));
        self.set(cx, cy, value);
    }

    pub fn get_wrapped(&self, x: i32, y: i32) -> &T {
        self.get(self.wrap_axis(x), self.wrap_axis(y))
    }

    pub fn set_wrapped(&mut self, x: i32, y: i32, value: T) {
        let (wx, wy) = (self.wrap_axis(x), self.wrap_axis(y));
        self.set(wx, wy, value);
    }

    /// Resolve a signed coordinate to its in-bounds wrapped position.
    pub fn wrap_coords(&self, x: i32, y: i32) -> (usize, usize) {
        (self.wrap_axis(x), self.wrap_axis(y))
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Raw row-major view of the cells.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Iterate over all cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let size = self.size;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, val)| (idx % size, idx / size, val))
    }

    /// Iterate mutably over all cells with their coordinates, row by row.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let size = self.size;
        self.data
            .iter_mut()
            .enumerate()
            .map(move |(idx, val)| (idx % size, idx / size, val))
    }
}

impl Tilemap<f32> {
    /// Smallest and largest value in the map.
    pub fn min_max(&self) -> (f32, f32) {
        let mut min_val = f32::MAX;
        let mut max_val = f32::MIN;
        for &val in &self.data {
            if val < min_val {
                min_val = val;
            }
            if val > max_val {
                max_val = val;
            }
        }
        (min_val, max_val)
    }

    /// Sum of all cells, accumulated in f64.
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    /// Rescale linearly so the minimum maps to 0.0 and the maximum to 1.0.
    /// A constant map has no range and becomes all zeros.
    pub fn normalize(&mut self) {
        let (min_val, max_val) = self.min_max();
        let range = max_val - min_val;
        if range <= 0.0 {
            self.data.fill(0.0);
            return;
        }

        for val in self.data.iter_mut() {
            *val = (*val - min_val) / range;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(size: usize) -> Tilemap<f32> {
        let mut map = Tilemap::new(size);
        for y in 0..size {
            for x in 0..size {
                map.set(x, y, (y * size + x) as f32);
            }
        }
        map
    }

    #[test]
    fn test_wrapped_is_toroidal() {
        let map = ramp(5);
        for y in -7..12 {
            for x in -7..12 {
                let v = *map.get_wrapped(x, y);
                assert_eq!(v, *map.get_wrapped(x + 5, y));
                assert_eq!(v, *map.get_wrapped(x, y + 5));
            }
        }
        assert_eq!(*map.get_wrapped(-1, 0), *map.get(4, 0));
        assert_eq!(*map.get_wrapped(0, -6), *map.get(0, 4));
    }

    #[test]
    fn test_wrapped_set_matches_get() {
        let mut map = Tilemap::new_with(6, 0.0f32);
        map.set_wrapped(-1, 7, 3.5);
        assert_eq!(*map.get(5, 1), 3.5);
        assert_eq!(*map.get_wrapped(11, -5), 3.5);
    }

    #[test]
    fn test_clamped_saturates_per_axis() {
        let map = ramp(8);
        for y in 0..8 {
            assert_eq!(*map.get_clamped(-5, y), *map.get(0, y as usize));
            assert_eq!(*map.get_clamped(13, y), *map.get(7, y as usize));
        }
        assert_eq!(*map.get_clamped(-3, 20), *map.get(0, 7));
    }

    #[test]
    fn test_set_clamped_writes_edge() {
        let mut map = Tilemap::new_with(4, 0u8);
        map.set_clamped(9, -2, 7);
        assert_eq!(*map.get(3, 0), 7);
    }

    #[test]
    #[should_panic]
    fn test_exact_access_out_of_bounds_panics() {
        let map = Tilemap::new_with(4, 0.0f32);
        let _ = map.get(4, 0);
    }

    #[test]
    fn test_normalize_range() {
        let mut map = ramp(4);
        for (_, _, v) in map.iter_mut() {
            *v = *v * 3.0 - 7.0;
        }
        map.normalize();
        let (min_val, max_val) = map.min_max();
        assert_eq!(min_val, 0.0);
        assert_eq!(max_val, 1.0);
    }

    #[test]
    fn test_normalize_constant_is_zero() {
        let mut map = Tilemap::new_with(3, 0.42f32);
        map.normalize();
        assert!(map.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_clone_is_deep_and_faithful() {
        let original = ramp(5);
        let mut copy = original.clone();
        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(copy.get(x, y), original.get(x, y));
            }
        }
        copy.set(2, 3, -1.0);
        assert_eq!(*original.get(2, 3), 17.0);
    }

    #[test]
    fn test_iter_is_row_major() {
        let map = ramp(3);
        let coords: Vec<(usize, usize)> = map.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords[0], (0, 0));
        assert_eq!(coords[1], (1, 0));
        assert_eq!(coords[3], (0, 1));
        assert_eq!(map.sum(), (0..9).sum::<i32>() as f64);
    }
}
