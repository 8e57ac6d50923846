use crate::block::Block;
use crate::palette::Palette;

/// Edge length of a section in blocks.
pub const SECTION_SIZE: usize = 16;
/// Number of cells in a section.
pub const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

/// Cell index for local coordinates. X varies fastest, then Z, then Y.
fn cell(x: usize, y: usize, z: usize) -> usize {
    (y * SECTION_SIZE + z) * SECTION_SIZE + x
}

fn coords(index: usize) -> (usize, usize, usize) {
    (
        index % SECTION_SIZE,
        index / (SECTION_SIZE * SECTION_SIZE),
        (index / SECTION_SIZE) % SECTION_SIZE,
    )
}

/// A 16x16x16 cube of palette-compressed blocks.
///
/// Each cell holds an index into a local block palette (0 = no block) and an
/// index into a local owner palette naming the entity that last wrote it.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    palette: Palette<Block>,
    cells: Vec<u16>,
    owners: Palette<String>,
    owner_cells: Vec<u16>,
}

impl Section {
    /// An empty section.
    pub fn new() -> Self {
        Self {
            palette: Palette::new(),
            cells: vec![Palette::<Block>::EMPTY; SECTION_VOLUME],
            owners: Palette::new(),
            owner_cells: vec![Palette::<String>::EMPTY; SECTION_VOLUME],
        }
    }

    /// Block at local coordinates (each `0..16`).
    pub fn block_at(&self, x: usize, y: usize, z: usize) -> Option<&Block> {
        self.palette.get(self.cells[cell(x, y, z)])
    }

    /// Name of the entity that last wrote the cell.
    pub fn owner_at(&self, x: usize, y: usize, z: usize) -> Option<&str> {
        self.owners
            .get(self.owner_cells[cell(x, y, z)])
            .map(String::as_str)
    }

    /// Raw palette index of a cell.
    pub fn index_at(&self, x: usize, y: usize, z: usize) -> u16 {
        self.cells[cell(x, y, z)]
    }

    /// Write a block, adding it to the palette if needed.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: Block, owner: Option<&str>) {
        if self.palette.len() > SECTION_VOLUME {
            self.compact();
        }
        let i = cell(x, y, z);
        self.cells[i] = self.palette.insert(block);
        self.owner_cells[i] = match owner {
            Some(name) => self.owners.insert(name.to_string()),
            None => Palette::<String>::EMPTY,
        };
    }

    /// Empty a cell.
    pub fn clear_block(&mut self, x: usize, y: usize, z: usize) {
        let i = cell(x, y, z);
        self.cells[i] = Palette::<Block>::EMPTY;
        self.owner_cells[i] = Palette::<String>::EMPTY;
    }

    /// The block palette.
    pub fn palette(&self) -> &Palette<Block> {
        &self.palette
    }

    /// Whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == Palette::<Block>::EMPTY)
    }

    /// Number of occupied cells.
    pub fn block_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&c| c != Palette::<Block>::EMPTY)
            .count()
    }

    /// Occupied cells in scan order (X, then Z, then Y).
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize, usize), &Block)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, &index)| self.palette.get(index).map(|b| (coords(i), b)))
    }

    /// Rebuild both palettes from the cells, dropping unreferenced entries.
    pub fn compact(&mut self) {
        let mut palette = Palette::new();
        let mut owners = Palette::new();
        for (cell, owner_cell) in self.cells.iter_mut().zip(self.owner_cells.iter_mut()) {
            *cell = match self.palette.get(*cell) {
                Some(block) => palette.insert(block.clone()),
                None => Palette::<Block>::EMPTY,
            };
            *owner_cell = match self.owners.get(*owner_cell) {
                Some(owner) => owners.insert(owner.clone()),
                None => Palette::<String>::EMPTY,
            };
        }
        self.palette = palette;
        self.owners = owners;
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::new()
    }
}
