/// Dense `width × depth` scalar grid used between generation stages.
///
/// Cells are stored column-major by `x`: flat index = `x * depth + y`, the same
/// addressing the world uses for tiles. Out-of-range reads return
/// `T::default()` and out-of-range writes are ignored, so random walks can
/// probe past the edge without extra checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Map<T> {
    pub data: Vec<T>,
    pub width: usize,
    pub depth: usize,
}

impl<T: Copy + Default> Map<T> {
    pub fn new(width: usize, depth: usize) -> Self {
        Self::filled(width, depth, T::default())
    }

    pub fn filled(width: usize, depth: usize, fill: T) -> Self {
        Self { data: vec![fill; width * depth], width, depth }
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.depth
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> T {
        if self.contains(x, y) {
            self.data[x as usize * self.depth + y as usize]
        } else {
            T::default()
        }
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        if self.contains(x, y) {
            self.data[x as usize * self.depth + y as usize] = value;
        }
    }

    /// Convert every cell with `f`, keeping dimensions.
    pub fn map<U: Copy + Default>(&self, f: impl Fn(T) -> U) -> Map<U> {
        Map { data: self.data.iter().map(|&v| f(v)).collect(), width: self.width, depth: self.depth }
    }

    /// Iterate `(x, y, value)` in storage order.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, T)> + '_ {
        let depth = self.depth.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| ((i / depth) as i32, (i % depth) as i32, v))
    }
}

impl Map<bool> {
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

impl Map<f32> {
    pub fn min_value(&self) -> f32 {
        self.data.iter().cloned().fold(f32::INFINITY, f32::min)
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().cloned().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Linear rescale to `[0, 1]`. A constant field is left untouched.
    pub fn normalize(&mut self) {
        let min = self.min_value();
        let max = self.max_value();
        let range = max - min;
        if range > 0.0 {
            for v in &mut self.data {
                *v = (*v - min) / range;
            }
        }
    }

    /// 3×3 box blur, repeated `iterations` times. Edge cells average only the
    /// neighbours that exist.
    pub fn smooth(&mut self, iterations: u32) {
        for _ in 0..iterations {
            let src = self.data.clone();
            for x in 0..self.width as i32 {
                for y in 0..self.depth as i32 {
                    let mut sum = 0.0;
                    let mut n = 0;
                    for dx in -1..=1 {
                        for dy in -1..=1 {
                            let (nx, ny) = (x + dx, y + dy);
                            if self.contains(nx, ny) {
                                sum += src[nx as usize * self.depth + ny as usize];
                                n += 1;
                            }
                        }
                    }
                    self.data[x as usize * self.depth + y as usize] = sum / n as f32;
                }
            }
        }
    }

    pub fn amplify(&mut self, factor: f32) {
        for v in &mut self.data {
            *v *= factor;
        }
    }
}
