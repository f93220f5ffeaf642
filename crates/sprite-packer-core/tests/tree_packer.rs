use rand::{Rng, SeedableRng};
use sprite_packer_core::packer::tree::TreePacker;
use sprite_packer_core::{Packer, Rect, Size, pack_all};

#[test]
fn first_fit_walks_right_before_down() {
    let mut p = TreePacker::new(100, 100);
    let a = p.pack("a", Size::new(10, 10)).expect("a");
    let b = p.pack("b", Size::new(5, 5)).expect("b");
    let c = p.pack("c", Size::new(90, 5)).expect("c");
    assert_eq!((a.x, a.y), (0, 0));
    assert_eq!((b.x, b.y), (10, 0));
    // right of `b` is only 85 wide, so the strip below it wins
    assert_eq!((c.x, c.y), (10, 5));
    assert_eq!((c.w, c.h), (90, 5));
}

#[test]
fn oversized_rectangles_are_dropped() {
    let mut p = TreePacker::new(10, 10);
    let placed = pack_all(&mut p, &[Size::new(8, 8), Size::new(8, 8), Size::new(2, 2)]);
    let keys: Vec<usize> = placed.iter().map(|pl| pl.key).collect();
    assert_eq!(keys, vec![0, 2]);
    assert_eq!(placed[1].rect(), Rect::new(8, 0, 2, 2));
}

#[test]
fn can_pack_does_not_mutate() {
    let mut p = TreePacker::new(16, 16);
    assert!(<TreePacker as Packer<u8>>::can_pack(&p, Size::new(16, 16)));
    assert!(!<TreePacker as Packer<u8>>::can_pack(&p, Size::new(17, 1)));
    assert!(p.pack(0u8, Size::new(16, 16)).is_some());
    assert!(!<TreePacker as Packer<u8>>::can_pack(&p, Size::new(1, 1)));
    assert_eq!(p.bin(), Size::new(16, 16));
}

#[test]
fn random_placements_stay_in_bin_and_disjoint() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(2024);
    for round in 0..10 {
        let bin = Size::new(rng.gen_range(32..=256), rng.gen_range(32..=256));
        let sizes: Vec<Size> = (0..150)
            .map(|_| Size::new(rng.gen_range(1..=48), rng.gen_range(1..=48)))
            .collect();
        let mut p = TreePacker::new(bin.w, bin.h);
        let placed = pack_all(&mut p, &sizes);
        let bounds = Rect::new(0, 0, bin.w, bin.h);
        for (i, a) in placed.iter().enumerate() {
            assert!(bounds.contains(&a.rect()), "round {round}: {:?} outside {:?}", a, bin);
            assert_eq!((a.w, a.h), (sizes[a.key].w, sizes[a.key].h));
            for b in &placed[i + 1..] {
                assert!(!a.rect().overlaps(&b.rect()), "{:?} overlaps {:?}", a, b);
            }
        }
        // input order is kept
        assert!(placed.windows(2).all(|w| w[0].key < w[1].key));
    }
}
