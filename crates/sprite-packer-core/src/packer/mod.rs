use crate::model::{Placement, Size};

pub mod tree;

/// A packer places rectangles into a bin of fixed size.
///
/// Implementations must never return a placement that overlaps another or
/// leaves the bin. `pack` returns `None` when the rectangle does not fit.
pub trait Packer<K> {
    fn can_pack(&self, size: Size) -> bool;
    fn pack(&mut self, key: K, size: Size) -> Option<Placement<K>>;
}

/// Packs `sizes` in order, returning placements keyed by input index.
/// Rectangles that don't fit are left out, so the result may be shorter than
/// the input.
pub fn pack_all<P: Packer<usize>>(packer: &mut P, sizes: &[Size]) -> Vec<Placement> {
    sizes
        .iter()
        .enumerate()
        .filter_map(|(i, s)| packer.pack(i, *s))
        .collect()
}
