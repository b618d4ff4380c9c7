// src/bsp/bsp_procedural.rs

use std::sync::Arc;
use std::time::Instant;

use log::{info, trace};
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*; // Import for into_par_iter

use crate::bsp::{
    ConfigError, Corridor, GeneratorConfig, NodeId, PartitionTree, Rect, Room, SplitReport,
};

/// One complete generation: the partition tree with its carved rooms and the
/// corridors joining them. Built in one go and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dungeon {
    tree: PartitionTree,
    corridors: Vec<Corridor>,
    report: SplitReport,
}

impl Dungeon {
    /// An unsplit, roomless region: what `reset` followed by zero split attempts yields.
    pub fn empty(width: i32, height: i32) -> Self {
        Dungeon {
            tree: PartitionTree::new(width, height),
            corridors: Vec::new(),
            report: SplitReport::default(),
        }
    }

    /// Partition, carve, connect. All randomness is drawn from `rng`, so a
    /// seeded source reproduces the same dungeon. The config is validated first.
    pub fn generate<R: Rng + ?Sized>(
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    /// [`generate`](Self::generate) for a config that already passed validation.
    pub(crate) fn build<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Self {
        let mut tree = PartitionTree::new(config.width, config.height);
        let report = tree.generate_with(
            config.max_iterations,
            config.min_split_size,
            config.min_area,
            config.selection,
            rng,
        );
        carve_rooms(&mut tree, config.min_room_size, config.margin, rng);
        let corridors = connect_rooms(&tree);

        Dungeon {
            tree,
            corridors,
            report,
        }
    }

    pub fn root_bounds(&self) -> Rect {
        self.tree.root_bounds()
    }

    /// `(region, room)` for every leaf of the tree, in pre-order.
    pub fn leaves(&self) -> Vec<(Rect, Option<Room>)> {
        self.tree.leaves().collect()
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.tree.leaves().filter_map(|(_, room)| room).collect()
    }

    /// Corridors in pre-order of the internal node they belong to.
    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    /// Flattened corridor legs as `(x1, y1, x2, y2)`.
    pub fn corridor_segments(&self) -> Vec<(i32, i32, i32, i32)> {
        self.corridors
            .iter()
            .flat_map(|c| c.segments())
            .map(|s| s.coords())
            .collect()
    }

    pub fn tree(&self) -> &PartitionTree {
        &self.tree
    }

    pub fn split_report(&self) -> SplitReport {
        self.report
    }
}

/// Carves at most one room per leaf of the leaf set, in leaf-set order. Leaves
/// dropped from the set after a rejected split are skipped and stay roomless,
/// as does a leaf whose usable area (its rectangle shrunk by `margin`) cannot
/// hold a `min_room_size` square. Returns the number of rooms carved.
///
/// A negative `margin` is treated as 0 and `min_room_size` below 1 as 1.
pub fn carve_rooms<R: Rng + ?Sized>(
    tree: &mut PartitionTree,
    min_room_size: i32,
    margin: i32,
    rng: &mut R,
) -> usize {
    let min_room_size = min_room_size.max(1);
    let margin = margin.max(0);
    let mut carved = 0;
    let leaves = tree.leaf_ids().to_vec();

    for id in leaves {
        let leaf = tree.node(id).rect;
        let needed = 2 * i64::from(margin) + i64::from(min_room_size);
        if i64::from(leaf.width) < needed || i64::from(leaf.height) < needed {
            tree.set_room(id, None);
            continue;
        }
        let usable = leaf.shrink(margin);

        let width = rng.random_range(min_room_size..=usable.width);
        let height = rng.random_range(min_room_size..=usable.height);
        let x = leaf.x + rng.random_range(margin..=leaf.width - margin - width);
        let y = leaf.y + rng.random_range(margin..=leaf.height - margin - height);

        let room = Room(Rect::new(x, y, width, height));
        trace!("Carved {:?} in leaf {:?}", room, leaf);
        tree.set_room(id, Some(room));
        carved += 1;
    }

    carved
}

/// Walks the tree in pre-order and, for every internal node whose subtrees
/// both contain a room, joins the first room of each with an L-shaped corridor.
pub fn connect_rooms(tree: &PartitionTree) -> Vec<Corridor> {
    let mut corridors = Vec::new();

    for id in tree.preorder() {
        let Some((left, right)) = tree.node(id).children() else {
            continue;
        };
        if let (Some(a), Some(b)) = (first_room(tree, left), first_room(tree, right)) {
            let corridor = Corridor::between(a.center(), b.center());
            trace!("Corridor {:?}", corridor);
            corridors.push(corridor);
        }
    }

    corridors
}

/// Depth-first, left before right: the first room found under `id`.
pub fn first_room(tree: &PartitionTree, id: NodeId) -> Option<Room> {
    let node = tree.node(id);
    match node.children() {
        None => node.room(),
        Some((left, right)) => first_room(tree, left).or_else(|| first_room(tree, right)),
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct GenerationStats {
    /// Seconds spent generating.
    pub generation_time: f64,
    pub split_attempts: usize,
    pub rejected_splits: usize,
    pub leaf_count: usize,
    pub room_count: usize,
    pub corridor_count: usize,
    /// Room area over region area.
    pub room_coverage: f64,
}

impl GenerationStats {
    pub fn measure(dungeon: &Dungeon, generation_time: f64) -> Self {
        let report = dungeon.split_report();
        let rooms = dungeon.rooms();
        let room_area: i64 = rooms.iter().map(|r| r.rect().area()).sum();
        let region_area = dungeon.root_bounds().area();

        GenerationStats {
            generation_time,
            split_attempts: report.attempts,
            rejected_splits: report.rejected,
            leaf_count: dungeon.tree().leaves().count(),
            room_count: rooms.len(),
            corridor_count: dungeon.corridors().len(),
            room_coverage: if region_area > 0 {
                room_area as f64 / region_area as f64
            } else {
                0.0
            },
        }
    }
}

/// Owns the current dungeon and replaces it wholesale on every regeneration.
///
/// Readers take the handle from [`current`](Self::current); a new generation is
/// built completely before it is swapped in under a single write lock, so a
/// reader only ever sees a finished dungeon.
pub struct ProceduralGenerator {
    config: GeneratorConfig,
    current: Arc<RwLock<Dungeon>>,
    stats: Option<GenerationStats>,
}

impl ProceduralGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let empty = Dungeon::empty(config.width, config.height);
        Ok(ProceduralGenerator {
            config,
            current: Arc::new(RwLock::new(empty)),
            stats: None,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Thread-safe handle to the published dungeon.
    pub fn current(&self) -> Arc<RwLock<Dungeon>> {
        Arc::clone(&self.current)
    }

    /// Stats of the last regeneration, if any.
    pub fn stats(&self) -> Option<&GenerationStats> {
        self.stats.as_ref()
    }

    /// Rebuilds the whole dungeon. With a seed the result is reproducible;
    /// without one the thread-local generator is used.
    pub fn regenerate(&mut self, seed: Option<u64>) -> &GenerationStats {
        match seed {
            Some(seed) => {
                info!("Regenerating dungeon with seed {}", seed);
                self.regenerate_with(&mut StdRng::seed_from_u64(seed))
            }
            None => self.regenerate_with(&mut rand::rng()),
        }
    }

    pub fn regenerate_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &GenerationStats {
        let start = Instant::now();
        let dungeon = Dungeon::build(&self.config, rng);
        let stats = GenerationStats::measure(&dungeon, start.elapsed().as_secs_f64());

        *self.current.write() = dungeon;

        info!(
            "Generated {} leaves, {} rooms, {} corridors ({} split attempts, {} rejected) in {:.3} ms",
            stats.leaf_count,
            stats.room_count,
            stats.corridor_count,
            stats.split_attempts,
            stats.rejected_splits,
            stats.generation_time * 1000.0,
        );
        self.stats.insert(stats)
    }

    /// Generates one independent dungeon per seed, in parallel. Each result is
    /// identical to a sequential run with the same seed.
    pub fn sample(&self, seeds: &[u64]) -> Vec<Dungeon> {
        seeds
            .into_par_iter()
            .map(|&seed| Dungeon::build(&self.config, &mut StdRng::seed_from_u64(seed)))
            .collect()
    }
}
