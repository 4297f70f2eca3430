use crate::prize::{Prize, PrizeCatalog};

/// Horizontal extent of an element in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub width: f64,
}

impl Rect {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Half-open so a point on a shared border belongs to exactly one cell.
    pub fn contains_x(&self, x: f64) -> bool {
        self.left <= x && x < self.right()
    }
}

/// A cell as the rendering layer laid it out.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    pub rect: Rect,
    pub label: String,
}

/// Which cell ended up under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing<'a> {
    /// Position in the rendered sequence.
    pub cell_index: usize,
    /// Position in the catalog.
    pub catalog_index: usize,
    pub prize: &'a Prize,
}

/// Reads the landed prize back from rendered geometry. Always compares the
/// pointer's left edge.
#[derive(Debug, Clone, Copy)]
pub struct PointerResolver<'a> {
    catalog: &'a PrizeCatalog,
}

impl<'a> PointerResolver<'a> {
    pub fn new(catalog: &'a PrizeCatalog) -> Self {
        Self { catalog }
    }

    /// `None` when nothing is under the pointer yet (layout not painted) or the
    /// cell shows a name the catalog does not know.
    pub fn resolve(&self, pointer: Rect, cells: &[RenderedCell]) -> Option<Landing<'a>> {
        let x = pointer.left;
        let (cell_index, cell) = cells
            .iter()
            .enumerate()
            .find(|(_, cell)| cell.rect.contains_x(x))?;
        let (catalog_index, prize) = self.catalog.by_name(&cell.label)?;
        Some(Landing {
            cell_index,
            catalog_index,
            prize,
        })
    }
}
