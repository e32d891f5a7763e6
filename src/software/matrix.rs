use core::mem;
use heapless::Vec;

/// Keeps the previous scan around so Orbit can see the key evolutions.
/// Indexes are the layout positions, the gpio layer does the pin conversion.
pub struct Matrix {
    current: Vec<usize, 16>,
    previous: Vec<usize, 16>,
}

impl Matrix {
    pub fn new() -> Matrix {
        Matrix {
            previous: Vec::new(),
            current: Vec::new(),
        }
    }

    pub fn update(&mut self, active_indexes: Vec<u8, 16>) {
        mem::swap(&mut self.previous, &mut self.current);
        self.current = active_indexes.iter().map(|&v| v as usize).collect();
    }

    pub fn freshly_pressed(&self) -> Vec<usize, 16> {
        self.current
            .iter()
            .filter(|index| !self.previous.contains(index))
            .copied()
            .collect()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.current.contains(&index)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::new()
    }
}
