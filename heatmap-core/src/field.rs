/// Temperature history of a square plate, indexed `[layer][row][column]`.
///
/// Stored as one contiguous row-major buffer; layer `k` occupies
/// `k * size * size .. (k + 1) * size * size`.
#[derive(Clone, Debug, PartialEq)]
pub struct TemperatureField {
    layers: usize,
    size: usize,
    data: Vec<f64>,
}

impl TemperatureField {
    pub fn filled(layers: usize, size: usize, value: f64) -> Self {
        TemperatureField {
            layers,
            size,
            data: vec![value; layers * size * size],
        }
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn layer_len(&self) -> usize {
        self.size * self.size
    }

    fn index(&self, k: usize, i: usize, j: usize) -> usize {
        assert!(
            k < self.layers && i < self.size && j < self.size,
            "index ({k}, {i}, {j}) out of bounds for field ({}, {}, {})",
            self.layers,
            self.size,
            self.size
        );
        k * self.layer_len() + i * self.size + j
    }

    pub fn get(&self, k: usize, i: usize, j: usize) -> f64 {
        self.data[self.index(k, i, j)]
    }

    pub fn set(&mut self, k: usize, i: usize, j: usize, value: f64) {
        let idx = self.index(k, i, j);
        self.data[idx] = value;
    }

    /// Row-major cells of layer `k`.
    pub fn layer(&self, k: usize) -> Option<&[f64]> {
        if k >= self.layers {
            return None;
        }
        let len = self.layer_len();
        Some(&self.data[k * len..(k + 1) * len])
    }

    pub(crate) fn layer_mut(&mut self, k: usize) -> Option<&mut [f64]> {
        if k >= self.layers {
            return None;
        }
        let len = self.layer_len();
        Some(&mut self.data[k * len..(k + 1) * len])
    }

    pub fn layer_view(&self, k: usize) -> Option<LayerView<'_>> {
        self.layer(k).map(|cells| LayerView {
            size: self.size,
            cells,
        })
    }

    /// Layer `k` for reading next to layer `k + 1` for writing.
    ///
    /// Panics if `k + 1` is not a layer of this field.
    pub fn layers_mut_pair(&mut self, k: usize) -> (&[f64], &mut [f64]) {
        assert!(k + 1 < self.layers, "no layer after {k}");
        let len = self.layer_len();
        let (head, tail) = self.data.split_at_mut((k + 1) * len);
        (&head[k * len..], &mut tail[..len])
    }

    /// Writes `value` into `cell(row, column)` of every layer for which
    /// `select(row, column)` holds.
    pub(crate) fn fill_where_all_layers<F>(&mut self, value: f64, select: F)
    where
        F: Fn(usize, usize) -> bool,
    {
        let n = self.size;
        for layer in self.data.chunks_exact_mut(n * n) {
            for (i, row) in layer.chunks_exact_mut(n).enumerate() {
                for (j, cell) in row.iter_mut().enumerate() {
                    if select(i, j) {
                        *cell = value;
                    }
                }
            }
        }
    }
}

/// Read-only 2-D view of one time layer.
#[derive(Clone, Copy, Debug)]
pub struct LayerView<'a> {
    size: usize,
    cells: &'a [f64],
}

impl<'a> LayerView<'a> {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        assert!(row < self.size && column < self.size);
        self.cells[row * self.size + column]
    }

    pub fn cells(&self) -> &'a [f64] {
        self.cells
    }

    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &'a [f64]> + 'a {
        self.cells.chunks_exact(self.size)
    }

    pub fn min(&self) -> f64 {
        self.cells.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.cells.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean(&self) -> f64 {
        self.cells.iter().sum::<f64>() / self.cells.len() as f64
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.cells.to_vec()
    }
}
