use sprite_packer_core::layout::{by_group, horizontal, vertical};
use sprite_packer_core::{Layout, Size};

fn positions(items: &[Size], placed: &[sprite_packer_core::Placement]) -> Vec<(usize, u32, u32)> {
    assert!(placed.len() <= items.len());
    placed.iter().map(|p| (p.key, p.x, p.y)).collect()
}

#[test]
fn horizontal_wraps_at_max_width() {
    let items = vec![Size::new(30, 10); 4];
    let placed = horizontal(&items, Size::new(100, 100));
    assert_eq!(
        positions(&items, &placed),
        vec![(0, 0, 0), (1, 30, 0), (2, 60, 0), (3, 0, 10)]
    );
}

#[test]
fn horizontal_row_height_is_tallest_item() {
    let items = vec![Size::new(10, 5), Size::new(10, 20), Size::new(15, 5)];
    let placed = horizontal(&items, Size::new(20, 100));
    assert_eq!(
        positions(&items, &placed),
        vec![(0, 0, 0), (1, 10, 0), (2, 0, 20)]
    );
}

#[test]
fn horizontal_stops_at_max_height() {
    let items = vec![Size::new(30, 10); 5];
    let placed = horizontal(&items, Size::new(50, 15));
    assert_eq!(positions(&items, &placed), vec![(0, 0, 0)]);
}

#[test]
fn vertical_is_transposed_horizontal() {
    let items = vec![Size::new(10, 30); 4];
    let placed = vertical(&items, Size::new(100, 100));
    assert_eq!(
        positions(&items, &placed),
        vec![(0, 0, 0), (1, 0, 30), (2, 0, 60), (3, 10, 0)]
    );
    assert!(placed.iter().all(|p| (p.w, p.h) == (10, 30)));
}

#[test]
fn by_group_one_row_per_group() {
    let items = vec![Size::new(20, 10), Size::new(20, 15), Size::new(5, 5)];
    let rows = vec![vec![0, 1], vec![2]];
    let placed = by_group(&items, &rows, Size::new(100, 100));
    assert_eq!(
        positions(&items, &placed),
        vec![(0, 0, 0), (1, 20, 0), (2, 0, 15)]
    );
}

#[test]
fn by_group_drops_overflowing_members_without_reflow() {
    let items = vec![Size::new(20, 10), Size::new(20, 10), Size::new(5, 10)];
    let rows = vec![vec![0, 1, 2]];
    let placed = by_group(&items, &rows, Size::new(30, 100));
    assert_eq!(positions(&items, &placed), vec![(0, 0, 0), (2, 20, 0)]);
}

#[test]
fn by_group_stops_at_max_height() {
    let items = vec![Size::new(4, 10), Size::new(4, 10), Size::new(4, 10)];
    let rows = vec![vec![0], vec![1], vec![2]];
    let placed = by_group(&items, &rows, Size::new(10, 25));
    assert_eq!(placed.len(), 2);
}

#[test]
fn compact_uses_the_search_bin() {
    let items = vec![Size::new(8, 8); 4];
    let tight = Layout::Compact.arrange(&items, &[], Size::new(16, 16), Size::new(1024, 1024));
    assert_eq!(tight.len(), 4);
    let small = Layout::Compact.arrange(&items, &[], Size::new(16, 8), Size::new(1024, 1024));
    assert_eq!(small.len(), 2);
}
