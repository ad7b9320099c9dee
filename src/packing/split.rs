use super::Rect;

/// Outcome of asking a packer for room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// The rectangle was placed; the tree has been updated
    Placed(Rect),
    /// No free region in this container is large enough
    NotFit,
}

impl Fit {
    pub fn placed(self) -> Option<Rect> {
        match self {
            Fit::Placed(rect) => Some(rect),
            Fit::NotFit => None,
        }
    }
}

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, Copy)]
struct Children {
    /// Strip beside the placed rectangle: same height, remaining width
    right: NodeId,
    /// Strip below the placed rectangle: full node width, remaining height
    left: NodeId,
}

#[derive(Debug, Clone)]
struct Node {
    rect: Rect,
    used: bool,
    children: Option<Children>,
}

impl Node {
    fn free(rect: Rect) -> Self {
        Self {
            rect,
            used: false,
            children: None,
        }
    }
}

/// Binary space partition packer for a single container.
///
/// Free space is a binary tree stored in an arena. Placing a rectangle into a
/// free leaf marks it used and splits the leftover area into a right strip and
/// a left (below) strip. Nodes are never resized or merged, so the tree only
/// grows over the lifetime of the packer.
#[derive(Debug, Clone)]
pub struct SplitPacker {
    width: u32,
    height: u32,
    nodes: Vec<Node>,
    used_area: u64,
}

impl SplitPacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            nodes: vec![Node::free(Rect::new(0, 0, width, height))],
            used_area: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Find the first free region that can hold `width`x`height` and claim it.
    ///
    /// The search is depth-first and visits the right subtree of a used node
    /// before its left subtree, which fills rows before starting new ones.
    /// The first region that is large enough wins.
    pub fn find_and_place(&mut self, width: u32, height: u32) -> Fit {
        match self.find_free_node(width, height) {
            Some(id) => Fit::Placed(self.split_node(id, width, height)),
            None => Fit::NotFit,
        }
    }

    fn find_free_node(&self, width: u32, height: u32) -> Option<NodeId> {
        let mut stack = vec![ROOT];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            match node.children {
                Some(children) => {
                    // Popped in reverse: right is searched first
                    stack.push(children.left);
                    stack.push(children.right);
                }
                None if !node.used && width <= node.rect.width && height <= node.rect.height => {
                    return Some(id);
                }
                None => {}
            }
        }

        None
    }

    fn split_node(&mut self, id: NodeId, width: u32, height: u32) -> Rect {
        let free = self.nodes[id].rect;

        let right = self.push_node(Rect::new(
            free.x + width,
            free.y,
            free.width - width,
            height,
        ));
        let left = self.push_node(Rect::new(
            free.x,
            free.y + height,
            free.width,
            free.height - height,
        ));

        let node = &mut self.nodes[id];
        node.used = true;
        node.children = Some(Children { right, left });

        let placed = Rect::new(free.x, free.y, width, height);
        self.used_area += placed.area();
        placed
    }

    fn push_node(&mut self, rect: Rect) -> NodeId {
        self.nodes.push(Node::free(rect));
        self.nodes.len() - 1
    }

    /// Ratio of claimed area to container area (0.0 to 1.0)
    pub fn occupancy(&self) -> f64 {
        let total_area = u64::from(self.width) * u64::from(self.height);
        if total_area == 0 {
            return 0.0;
        }
        self.used_area as f64 / total_area as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_leaves(packer: &SplitPacker) -> Vec<Rect> {
        packer
            .nodes
            .iter()
            .filter(|n| !n.used && n.children.is_none())
            .map(|n| n.rect)
            .collect()
    }

    #[test]
    fn test_single_insert() {
        let mut packer = SplitPacker::new(100, 100);
        let rect = packer.find_and_place(50, 40).placed().unwrap();

        assert_eq!(rect, Rect::new(0, 0, 50, 40));
    }

    #[test]
    fn test_split_creates_right_and_left_strips() {
        let mut packer = SplitPacker::new(100, 100);
        packer.find_and_place(30, 20);

        let root = &packer.nodes[ROOT];
        assert!(root.used);
        let children = root.children.unwrap();
        assert_eq!(packer.nodes[children.right].rect, Rect::new(30, 0, 70, 20));
        assert_eq!(packer.nodes[children.left].rect, Rect::new(0, 20, 100, 80));
    }

    #[test]
    fn test_right_strip_searched_first() {
        let mut packer = SplitPacker::new(100, 100);
        packer.find_and_place(50, 50);

        // Fits both the right strip (50x50) and the left strip (100x50)
        let second = packer.find_and_place(20, 20).placed().unwrap();
        assert_eq!((second.x, second.y), (50, 0));

        // Remaining row space is 30 wide, so a 40 wide rect drops below
        let third = packer.find_and_place(40, 20).placed().unwrap();
        assert_eq!((third.x, third.y), (0, 50));
    }

    #[test]
    fn test_first_fit_not_best_fit() {
        let mut packer = SplitPacker::new(100, 100);
        packer.find_and_place(60, 60);

        // Right strip is 40x60, left strip is 100x40. A 10x10 rect would fit
        // both; the right strip is visited first even though it is not tighter.
        let rect = packer.find_and_place(10, 10).placed().unwrap();
        assert_eq!((rect.x, rect.y), (60, 0));
    }

    #[test]
    fn test_too_large() {
        let mut packer = SplitPacker::new(100, 100);
        assert_eq!(packer.find_and_place(150, 50), Fit::NotFit);
        assert_eq!(packer.find_and_place(50, 101), Fit::NotFit);

        // A failed search leaves the tree untouched
        assert_eq!(packer.nodes.len(), 1);
        assert!(!packer.nodes[ROOT].used);
    }

    #[test]
    fn test_exact_fill() {
        let mut packer = SplitPacker::new(100, 100);
        for _ in 0..4 {
            assert!(packer.find_and_place(50, 50).placed().is_some());
        }
        assert_eq!(packer.find_and_place(1, 1), Fit::NotFit);
        assert!((packer.occupancy() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_free_leaves_partition_remaining_area() {
        let mut packer = SplitPacker::new(64, 64);
        let mut placed = Vec::new();
        for (w, h) in [(20, 30), (16, 16), (40, 10), (8, 8), (30, 12), (5, 40)] {
            if let Some(rect) = packer.find_and_place(w, h).placed() {
                placed.push(rect);
            }
        }

        let leaves = free_leaves(&packer);
        let free_area: u64 = leaves.iter().map(Rect::area).sum();
        let used_area: u64 = placed.iter().map(Rect::area).sum();
        assert_eq!(free_area + used_area, 64 * 64);

        for leaf in &leaves {
            for rect in &placed {
                assert!(!leaf.intersects(rect), "{:?} overlaps {:?}", leaf, rect);
            }
        }
    }

    #[test]
    fn test_zero_sized_container_never_fits() {
        let mut packer = SplitPacker::new(0, 0);
        assert_eq!(packer.find_and_place(1, 1), Fit::NotFit);
        assert_eq!(packer.occupancy(), 0.0);
    }
}
