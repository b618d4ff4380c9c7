// src/bsp/bsp_tree.rs

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bsp::bsp_node::NodeKind;
use crate::bsp::{BspNode, NodeId, Rect, Room, SplitAxis};

/// How the next leaf to split is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafSelection {
    /// The eligible leaf with the largest area; ties go to the earliest leaf
    /// in leaf-set order.
    #[default]
    LargestFirst,
    /// A uniformly random eligible leaf.
    Random,
}

/// Why the splitter refused to divide a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRejection {
    /// Neither dimension is at least `2 * min_split_size`.
    NoEligibleAxis,
    /// The drawn offset produced a child smaller than `min_area`.
    ChildBelowMinArea,
}

/// Counters for one `generate` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitReport {
    pub attempts: usize,
    pub splits: usize,
    pub rejected: usize,
}

/// Picks an axis and an offset for `rect` and returns the two halves,
/// top/left first. Performs at most one random draw and never retries.
pub fn plan_split<R: Rng + ?Sized>(
    rect: &Rect,
    min_split_size: i32,
    min_area: i64,
    rng: &mut R,
) -> Result<(Rect, Rect), SplitRejection> {
    // Widened so that huge split sizes simply never fit.
    let twice_min = 2 * i64::from(min_split_size);
    let can_split_h = i64::from(rect.height) >= twice_min;
    let can_split_v = i64::from(rect.width) >= twice_min;

    let axis = match (can_split_h, can_split_v) {
        (false, false) => return Err(SplitRejection::NoEligibleAxis),
        (true, true) if rect.height > rect.width => SplitAxis::Horizontal,
        (true, true) => SplitAxis::Vertical,
        (true, false) => SplitAxis::Horizontal,
        (false, true) => SplitAxis::Vertical,
    };

    let extent = axis.extent(rect);
    let offset = rng.random_range(min_split_size..=extent - min_split_size);
    let (first, second) = rect.split(axis, offset);

    if first.area() < min_area || second.area() < min_area {
        return Err(SplitRejection::ChildBelowMinArea);
    }
    Ok((first, second))
}

/// Binary space partition of a rectangular region.
///
/// Nodes live in an arena and refer to their children by [`NodeId`]; the root
/// is always `NodeId(0)`. Alongside the tree the leaf set keeps the leaves
/// still open for splitting, in creation order: a successful split removes the
/// parent and appends its two children, a rejected split just removes the
/// leaf. Selection tie-breaks therefore never depend on a tree walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTree {
    nodes: Vec<BspNode>,
    leaves: Vec<NodeId>,
}

impl PartitionTree {
    pub fn new(width: i32, height: i32) -> Self {
        let mut tree = PartitionTree {
            nodes: Vec::new(),
            leaves: Vec::new(),
        };
        tree.reset(width, height);
        tree
    }

    /// Discards the current tree and starts over from a single root leaf
    /// spanning `(0, 0, width, height)`.
    pub fn reset(&mut self, width: i32, height: i32) {
        self.nodes.clear();
        self.nodes.push(BspNode::create_leaf(Rect::new(0, 0, width, height)));
        self.leaves.clear();
        self.leaves.push(NodeId(0));
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root_bounds(&self) -> Rect {
        self.nodes[0].rect
    }

    pub fn node(&self, id: NodeId) -> &BspNode {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The leaf set. Leaves whose split was rejected are not in it.
    pub fn leaf_ids(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Every leaf of the tree, rejected ones included, in pre-order.
    pub fn final_leaf_ids(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| self.nodes[id.0].is_leaf())
            .collect()
    }

    /// `(region, room)` for every leaf of the tree, in pre-order.
    pub fn leaves(&self) -> impl Iterator<Item = (Rect, Option<Room>)> + '_ {
        self.final_leaf_ids().into_iter().map(move |id| {
            let node = &self.nodes[id.0];
            (node.rect, node.room())
        })
    }

    /// Node ids in pre-order (node, left subtree, right subtree).
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some((left, right)) = self.nodes[id.0].children() {
                stack.push(right);
                stack.push(left);
            }
        }
        order
    }

    /// Runs up to `max_iterations` split attempts with the largest-first heuristic.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        max_iterations: usize,
        min_split_size: i32,
        min_area: i64,
        rng: &mut R,
    ) -> SplitReport {
        self.generate_with(
            max_iterations,
            min_split_size,
            min_area,
            LeafSelection::LargestFirst,
            rng,
        )
    }

    /// `min_split_size` and `min_area` below 1 are treated as 1.
    pub fn generate_with<R: Rng + ?Sized>(
        &mut self,
        max_iterations: usize,
        min_split_size: i32,
        min_area: i64,
        selection: LeafSelection,
        rng: &mut R,
    ) -> SplitReport {
        let min_split_size = min_split_size.max(1);
        let min_area = min_area.max(1);
        let mut report = SplitReport::default();

        for _ in 0..max_iterations {
            let Some(leaf) = self.choose_leaf(min_area, selection, rng) else {
                debug!("No leaf with area >= {} left; stopping early", min_area);
                break;
            };
            report.attempts += 1;

            let rect = self.nodes[leaf.0].rect;
            match plan_split(&rect, min_split_size, min_area, rng) {
                Ok((first, second)) => {
                    let (left, right) = self.commit_split(leaf, first, second);
                    trace!("Split {:?} into {:?} / {:?}", rect, left, right);
                    report.splits += 1;
                }
                Err(reason) => {
                    debug!("Leaf {:?} stays terminal: {:?}", rect, reason);
                    self.leaves.retain(|&id| id != leaf);
                    report.rejected += 1;
                }
            }
        }

        report
    }

    /// Leaf selector. Only leaf-set entries with `area >= min_area` are eligible.
    pub fn choose_leaf<R: Rng + ?Sized>(
        &self,
        min_area: i64,
        selection: LeafSelection,
        rng: &mut R,
    ) -> Option<NodeId> {
        let eligible = self
            .leaves
            .iter()
            .copied()
            .filter(|&id| self.nodes[id.0].area() >= min_area);

        match selection {
            LeafSelection::LargestFirst => {
                // `max_by_key` keeps the last maximum; the first one is wanted here.
                let mut best: Option<(NodeId, i64)> = None;
                for id in eligible {
                    let area = self.nodes[id.0].area();
                    if best.map_or(true, |(_, best_area)| area > best_area) {
                        best = Some((id, area));
                    }
                }
                best.map(|(id, _)| id)
            }
            LeafSelection::Random => {
                let candidates: Vec<NodeId> = eligible.collect();
                if candidates.is_empty() {
                    None
                } else {
                    Some(candidates[rng.random_range(0..candidates.len())])
                }
            }
        }
    }

    pub(crate) fn commit_split(&mut self, leaf: NodeId, first: Rect, second: Rect) -> (NodeId, NodeId) {
        let left = NodeId(self.nodes.len());
        self.nodes.push(BspNode::create_leaf(first));
        let right = NodeId(self.nodes.len());
        self.nodes.push(BspNode::create_leaf(second));

        self.nodes[leaf.0].kind = NodeKind::Internal { left, right };
        self.leaves.retain(|&id| id != leaf);
        self.leaves.push(left);
        self.leaves.push(right);
        (left, right)
    }

    /// Assigns (or clears) the room of a leaf. Ignored for internal nodes.
    pub(crate) fn set_room(&mut self, id: NodeId, new_room: Option<Room>) {
        if let NodeKind::Leaf { room } = &mut self.nodes[id.0].kind {
            *room = new_room;
        }
    }

    /// Checks the structural invariants: every internal node is exactly tiled
    /// by its two children, every node is reachable once from the root, and
    /// the leaf set holds distinct leaves only.
    pub fn is_well_formed(&self) -> bool {
        let order = self.preorder();
        if order.len() != self.nodes.len() {
            return false;
        }
        let mut seen = vec![false; self.nodes.len()];
        for &id in &order {
            if std::mem::replace(&mut seen[id.0], true) {
                return false;
            }
            let node = &self.nodes[id.0];
            if let Some((left, right)) = node.children() {
                let (l, r) = (self.nodes[left.0].rect, self.nodes[right.0].rect);
                if l.area() + r.area() != node.rect.area()
                    || l.intersection_area(&r) != 0
                    || !node.rect.contains_rect(&l)
                    || !node.rect.contains_rect(&r)
                {
                    return false;
                }
            }
        }

        let mut from_set = self.leaves.clone();
        from_set.sort();
        from_set.dedup();
        from_set.len() == self.leaves.len()
            && self.leaves.iter().all(|&id| self.nodes[id.0].is_leaf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_reset_creates_single_root_leaf() {
        let mut tree = PartitionTree::new(10, 10);
        tree.generate(4, 2, 4, &mut rng(1));
        assert!(tree.node_count() > 1);

        tree.reset(64, 32);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.root_bounds(), Rect::new(0, 0, 64, 32));
        assert_eq!(tree.leaf_ids(), &[tree.root()]);
    }

    #[test]
    fn test_generate_zero_iterations() {
        let mut tree = PartitionTree::new(64, 64);
        let report = tree.generate(0, 8, 64, &mut rng(7));
        assert_eq!(report, SplitReport::default());
        let leaves: Vec<_> = tree.leaves().collect();
        assert_eq!(leaves, vec![(Rect::new(0, 0, 64, 64), None)]);
    }

    #[test]
    fn test_tiling_and_disjointness() {
        for seed in 0..50 {
            for (min_split, min_area) in [(1, 1), (4, 16), (8, 64), (16, 32), (3, 200)] {
                let mut tree = PartitionTree::new(97, 61);
                tree.generate(25, min_split, min_area, &mut rng(seed));
                assert!(tree.is_well_formed());

                let rects: Vec<Rect> = tree.leaves().map(|(r, _)| r).collect();
                let total: i64 = rects.iter().map(Rect::area).sum();
                assert_eq!(total, tree.root_bounds().area());
                for (i, a) in rects.iter().enumerate() {
                    for b in &rects[i + 1..] {
                        assert_eq!(a.intersection_area(b), 0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_attempts_bounded_by_budget() {
        for budget in 0..12 {
            let mut tree = PartitionTree::new(128, 128);
            let report = tree.generate(budget, 4, 16, &mut rng(budget as u64));
            assert!(report.attempts <= budget);
            assert_eq!(report.splits + report.rejected, report.attempts);
            assert_eq!(tree.leaves().count(), 1 + report.splits);
            assert_eq!(tree.leaf_ids().len(), 1 + report.splits - report.rejected);
        }
    }

    #[test]
    fn test_stops_when_no_leaf_is_large_enough() {
        let mut tree = PartitionTree::new(16, 16);
        let report = tree.generate(100, 4, 1000, &mut rng(3));
        assert_eq!(report.attempts, 0);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_rejected_leaf_leaves_the_leaf_set() {
        // 10x10 with min_split_size 6 has no eligible axis.
        let mut tree = PartitionTree::new(10, 10);
        let report = tree.generate(5, 6, 1, &mut rng(0));
        assert_eq!(report.attempts, 1);
        assert_eq!(report.rejected, 1);
        assert!(tree.leaf_ids().is_empty());
        // Still a leaf of the tree and still part of the tiling.
        assert!(tree.node(tree.root()).is_leaf());
        assert_eq!(tree.leaves().collect::<Vec<_>>(), vec![(Rect::new(0, 0, 10, 10), None)]);
        assert!(tree.is_well_formed());
    }

    #[test]
    fn test_huge_split_size_never_splits() {
        let mut tree = PartitionTree::new(64, 64);
        let report = tree.generate(8, i32::MAX, 1, &mut rng(1));
        assert_eq!(report, SplitReport { attempts: 1, splits: 0, rejected: 1 });
        assert_eq!(tree.node_count(), 1);
        assert_eq!(
            plan_split(&Rect::new(0, 0, i32::MAX, i32::MAX), i32::MAX, 1, &mut rng(1)),
            Err(SplitRejection::NoEligibleAxis)
        );
    }

    #[test]
    fn test_non_positive_parameters_are_clamped() {
        let mut tree = PartitionTree::new(20, 20);
        tree.generate(30, -4, 0, &mut rng(6));
        assert!(tree.is_well_formed());
        for (rect, _) in tree.leaves() {
            assert!(rect.width >= 1 && rect.height >= 1);
        }
    }

    #[test]
    fn test_plan_split_prefers_longer_dimension() {
        let tall = Rect::new(0, 0, 20, 40);
        let (top, bottom) = plan_split(&tall, 5, 1, &mut rng(9)).unwrap();
        assert_eq!(top.width, 20);
        assert_eq!(bottom.width, 20);
        assert_eq!(top.height + bottom.height, 40);
        assert!(top.height >= 5 && bottom.height >= 5);

        let square = Rect::new(0, 0, 30, 30);
        let (left, right) = plan_split(&square, 5, 1, &mut rng(9)).unwrap();
        assert_eq!(left.height, 30);
        assert_eq!(left.width + right.width, 30);
    }

    #[test]
    fn test_plan_split_uses_only_eligible_axis() {
        // Only the height can be cut.
        let narrow = Rect::new(0, 0, 8, 40);
        let (top, bottom) = plan_split(&narrow, 6, 1, &mut rng(2)).unwrap();
        assert_eq!(top.width, 8);
        assert_eq!(bottom.y, top.height);

        // Square regions are cut across the width.
        let (left, right) = plan_split(&Rect::new(0, 0, 12, 12), 6, 1, &mut rng(2)).unwrap();
        assert_eq!(left, Rect::new(0, 0, 6, 12));
        assert_eq!(right, Rect::new(6, 0, 6, 12));

        assert_eq!(
            plan_split(&Rect::new(0, 0, 9, 9), 5, 1, &mut rng(2)),
            Err(SplitRejection::NoEligibleAxis)
        );
    }

    #[test]
    fn test_plan_split_rejects_small_children() {
        // Every offset yields children of area 4 * 4 = 16.
        let rect = Rect::new(0, 0, 8, 4);
        assert_eq!(
            plan_split(&rect, 4, 17, &mut rng(5)),
            Err(SplitRejection::ChildBelowMinArea)
        );
    }

    #[test]
    fn test_largest_first_breaks_ties_by_leaf_order() {
        // A 40x20 region with min_split_size 20 can only split at 20,
        // giving two equal 20x20 leaves.
        let mut tree = PartitionTree::new(40, 20);
        tree.generate(1, 20, 1, &mut rng(0));
        let ids = tree.leaf_ids().to_vec();
        assert_eq!(ids.len(), 2);
        let chosen = tree.choose_leaf(1, LeafSelection::LargestFirst, &mut rng(0));
        assert_eq!(chosen, Some(ids[0]));
    }

    #[test]
    fn test_random_selection_only_picks_eligible_leaves() {
        let mut tree = PartitionTree::new(64, 64);
        tree.generate(6, 4, 16, &mut rng(11));
        let mut r = rng(12);
        for _ in 0..100 {
            let id = tree
                .choose_leaf(300, LeafSelection::Random, &mut r)
                .expect("some leaf should be eligible");
            let node = tree.node(id);
            assert!(node.is_leaf());
            assert!(tree.leaf_ids().contains(&id));
            assert!(node.area() >= 300);
        }
        assert_eq!(
            tree.choose_leaf(64 * 64 + 1, LeafSelection::Random, &mut r),
            None
        );
    }

    #[test]
    fn test_random_selection_generates_valid_tree() {
        let mut tree = PartitionTree::new(80, 50);
        let report = tree.generate_with(20, 4, 16, LeafSelection::Random, &mut rng(4));
        assert!(report.attempts <= 20);
        assert!(tree.is_well_formed());
    }

    #[test]
    fn test_same_seed_same_tree() {
        let mut a = PartitionTree::new(100, 70);
        let mut b = PartitionTree::new(100, 70);
        a.generate(15, 6, 40, &mut rng(42));
        b.generate(15, 6, 40, &mut rng(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_preorder_visits_parent_before_children() {
        let mut tree = PartitionTree::new(64, 64);
        tree.generate(6, 8, 64, &mut rng(8));
        let order = tree.preorder();
        assert_eq!(order[0], tree.root());
        let position = |id: NodeId| order.iter().position(|&o| o == id).unwrap();
        for &id in &order {
            if let Some((left, right)) = tree.node(id).children() {
                assert!(position(id) < position(left));
                assert!(position(left) < position(right));
            }
        }
    }
}
