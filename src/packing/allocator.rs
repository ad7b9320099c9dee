use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt::Debug;

use log::{debug, error, warn};

use super::{Fit, Rect, SplitPacker};
use crate::error::TexpackError;

/// A rectangle waiting to be packed
#[derive(Debug, Clone)]
pub struct Block<K> {
    /// Caller-side identity, returned untouched with the placement
    pub key: K,
    pub width: u32,
    pub height: u32,
    /// Named regions relative to this block's own top-left corner
    pub nested: BTreeMap<String, Rect>,
}

impl<K> Block<K> {
    pub fn new(key: K, width: u32, height: u32) -> Self {
        Self {
            key,
            width,
            height,
            nested: BTreeMap::new(),
        }
    }

    pub fn with_nested(mut self, nested: BTreeMap<String, Rect>) -> Self {
        self.nested = nested;
        self
    }

    fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// A block after packing. All rectangles are container-relative.
#[derive(Debug, Clone)]
pub struct PlacedBlock<K> {
    pub key: K,
    pub rect: Rect,
    pub nested: BTreeMap<String, Rect>,
}

/// One fixed-size square bin and everything placed in it
#[derive(Debug)]
pub struct Container<K> {
    pub index: usize,
    packer: SplitPacker,
    pub blocks: Vec<PlacedBlock<K>>,
}

impl<K> Container<K> {
    fn new(index: usize, side_length: u32) -> Self {
        Self {
            index,
            packer: SplitPacker::new(side_length, side_length),
            blocks: Vec::new(),
        }
    }

    pub fn side_length(&self) -> u32 {
        self.packer.width()
    }

    pub fn occupancy(&self) -> f64 {
        self.packer.occupancy()
    }

    /// Place the block here, or hand it back if there is no room
    fn try_place(&mut self, block: Block<K>) -> Result<(), Block<K>> {
        match self.packer.find_and_place(block.width, block.height) {
            Fit::Placed(rect) => {
                self.blocks.push(place_block(block, rect));
                Ok(())
            }
            Fit::NotFit => Err(block),
        }
    }
}

/// A block that can never fit a container of the run's side length
#[derive(Debug, Clone)]
pub struct Rejected<K> {
    pub key: K,
    pub width: u32,
    pub height: u32,
}

/// Result of one packing run
#[derive(Debug)]
pub struct Packing<K> {
    pub side_length: u32,
    pub containers: Vec<Container<K>>,
    pub rejected: Vec<Rejected<K>>,
}

impl<K> Packing<K> {
    pub fn placed_count(&self) -> usize {
        self.containers.iter().map(|c| c.blocks.len()).sum()
    }
}

/// Distribute blocks over as few `side_length` square containers as the
/// heuristic manages.
///
/// Blocks larger than a container on either axis are rejected and reported in
/// [`Packing::rejected`]. The rest are sorted by their shorter side, largest
/// first (ties keep input order), and each one goes into the first existing
/// container with room. A new container is opened only when none has room.
pub fn pack<K: Debug>(blocks: Vec<Block<K>>, side_length: u32) -> Result<Packing<K>, TexpackError> {
    if side_length == 0 {
        return Err(TexpackError::InvalidSideLength);
    }

    let (mut blocks, rejected): (Vec<_>, Vec<_>) = blocks
        .into_iter()
        .partition(|b| b.width <= side_length && b.height <= side_length);

    let rejected: Vec<_> = rejected
        .into_iter()
        .map(|b| {
            warn!(
                "Skipping {:?}: {}x{} does not fit a {}x{} container",
                b.key, b.width, b.height, side_length, side_length
            );
            Rejected {
                key: b.key,
                width: b.width,
                height: b.height,
            }
        })
        .collect();

    blocks.sort_by_key(|b| Reverse(b.min_side()));

    let mut containers: Vec<Container<K>> = Vec::new();

    'blocks: for block in blocks {
        let mut pending = block;
        for container in &mut containers {
            match container.try_place(pending) {
                Ok(()) => {
                    log_placement(container);
                    continue 'blocks;
                }
                Err(block) => pending = block,
            }
        }

        let mut container = Container::new(containers.len(), side_length);
        if let Err(block) = container.try_place(pending) {
            error!(
                "{:?} ({}x{}) did not fit an empty {}x{} container",
                block.key, block.width, block.height, side_length, side_length
            );
            return Err(TexpackError::PlacementInvariantViolation {
                width: block.width,
                height: block.height,
                side_length,
            });
        }
        log_placement(&container);
        containers.push(container);
    }

    Ok(Packing {
        side_length,
        containers,
        rejected,
    })
}

fn log_placement<K: Debug>(container: &Container<K>) {
    if let Some(placed) = container.blocks.last() {
        debug!(
            "Placed {:?} ({}x{}) in container {} at ({}, {})",
            placed.key,
            placed.rect.width,
            placed.rect.height,
            container.index,
            placed.rect.x,
            placed.rect.y
        );
    }
}

/// Attach a placement to a block, moving its nested regions into container space
fn place_block<K>(block: Block<K>, rect: Rect) -> PlacedBlock<K> {
    let nested = block
        .nested
        .into_iter()
        .map(|(name, region)| (name, region.offset(rect.x, rect.y)))
        .collect();

    PlacedBlock {
        key: block.key,
        rect,
        nested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(sizes: &[(u32, u32)]) -> Vec<Block<usize>> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| Block::new(i, w, h))
            .collect()
    }

    fn layout(packing: &Packing<usize>) -> Vec<(usize, usize, Rect)> {
        packing
            .containers
            .iter()
            .flat_map(|c| c.blocks.iter().map(move |b| (c.index, b.key, b.rect)))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_no_containers() {
        let packing = pack(Vec::<Block<usize>>::new(), 128).unwrap();
        assert!(packing.containers.is_empty());
        assert!(packing.rejected.is_empty());
    }

    #[test]
    fn test_zero_side_length_is_an_error() {
        let result = pack(blocks(&[(1, 1)]), 0);
        assert!(matches!(result, Err(TexpackError::InvalidSideLength)));
    }

    #[test]
    fn test_oversized_block_is_rejected() {
        let packing = pack(blocks(&[(200, 50)]), 128).unwrap();

        assert_eq!(packing.placed_count(), 0);
        assert!(packing.containers.is_empty());
        assert_eq!(packing.rejected.len(), 1);
        assert_eq!(packing.rejected[0].key, 0);
        assert_eq!(packing.rejected[0].width, 200);
    }

    #[test]
    fn test_oversized_block_does_not_stop_the_batch() {
        let packing = pack(blocks(&[(10, 10), (10, 129), (20, 20)]), 128).unwrap();

        assert_eq!(packing.placed_count(), 2);
        assert_eq!(packing.rejected.len(), 1);
        assert_eq!(packing.rejected[0].key, 1);
        assert!(layout(&packing).iter().all(|&(_, key, _)| key != 1));
    }

    #[test]
    fn test_two_large_blocks_need_two_containers() {
        // 100x100 leaves two 28px strips in a 128 container, so neither the
        // second 100x100 nor a 50x50 has room beside or below the first.
        let packing = pack(blocks(&[(100, 100), (100, 100), (50, 50)]), 128).unwrap();

        assert_eq!(
            layout(&packing),
            vec![
                (0, 0, Rect::new(0, 0, 100, 100)),
                (1, 1, Rect::new(0, 0, 100, 100)),
                (2, 2, Rect::new(0, 0, 50, 50)),
            ]
        );
    }

    #[test]
    fn test_small_block_reuses_first_container() {
        let packing = pack(blocks(&[(100, 100), (100, 100), (20, 20)]), 128).unwrap();

        assert_eq!(packing.containers.len(), 2);
        assert_eq!(
            layout(&packing),
            vec![
                (0, 0, Rect::new(0, 0, 100, 100)),
                (0, 2, Rect::new(100, 0, 20, 20)),
                (1, 1, Rect::new(0, 0, 100, 100)),
            ]
        );
    }

    #[test]
    fn test_sorted_by_shorter_side_descending() {
        // Shorter sides: 5, 40, 40, 30. Ties keep input order.
        let packing = pack(blocks(&[(100, 5), (40, 60), (50, 40), (30, 30)]), 256).unwrap();
        let order: Vec<usize> = packing.containers[0].blocks.iter().map(|b| b.key).collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_first_container_with_room_wins() {
        // Containers 0 and 1 both have room for the 10x10; 0 was created first.
        let packing = pack(blocks(&[(90, 90), (90, 90), (10, 10)]), 100).unwrap();
        let small = layout(&packing)
            .into_iter()
            .find(|&(_, key, _)| key == 2)
            .unwrap();
        assert_eq!(small.0, 0);
    }

    #[test]
    fn test_nested_regions_follow_parent_placement() {
        let mut nested = BTreeMap::new();
        nested.insert("eye".to_string(), Rect::new(10, 10, 4, 4));
        let block = Block::new("face", 30, 30).with_nested(nested);

        let placed = place_block(block, Rect::new(5, 5, 30, 30));
        assert_eq!(placed.nested["eye"], Rect::new(15, 15, 4, 4));
    }

    #[test]
    fn test_nested_regions_are_container_relative_after_pack() {
        let mut nested = BTreeMap::new();
        nested.insert("eye".to_string(), Rect::new(10, 10, 4, 4));
        let input = vec![
            Block::new("wall", 100, 100),
            Block::new("face", 20, 20).with_nested(nested),
        ];

        let packing = pack(input, 128).unwrap();
        let face = &packing.containers[0].blocks[1];
        assert_eq!(face.key, "face");
        assert_eq!(face.rect, Rect::new(100, 0, 20, 20));
        assert_eq!(face.nested["eye"], Rect::new(110, 10, 4, 4));
    }

    fn varied_sizes(count: u32) -> Vec<(u32, u32)> {
        (0..count)
            .map(|i| ((i * 37) % 61 + 3, (i * 53) % 47 + 3))
            .collect()
    }

    #[test]
    fn test_placements_stay_in_bounds_and_never_overlap() {
        let side = 128;
        let packing = pack(blocks(&varied_sizes(120)), side).unwrap();
        assert_eq!(packing.placed_count(), 120);

        for container in &packing.containers {
            for (i, a) in container.blocks.iter().enumerate() {
                assert!(a.rect.right() <= u64::from(side) && a.rect.bottom() <= u64::from(side));
                for b in &container.blocks[i + 1..] {
                    assert!(
                        !a.rect.intersects(&b.rect),
                        "{:?} overlaps {:?} in container {}",
                        a.rect,
                        b.rect,
                        container.index
                    );
                }
            }
        }
    }

    #[test]
    fn test_packing_is_deterministic() {
        let first = pack(blocks(&varied_sizes(80)), 96).unwrap();
        let second = pack(blocks(&varied_sizes(80)), 96).unwrap();
        assert_eq!(layout(&first), layout(&second));
    }
}
