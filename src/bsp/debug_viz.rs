// src/bsp/debug_viz.rs

use eframe::egui;
use egui::{Color32, Rect, Stroke, Vec2};

use crate::bsp::{Dungeon, GenerationStats, NodeId, PartitionTree};

/// Debug visualization of a generated dungeon: region border, partition
/// lines coloured by depth, rooms and corridors.
pub struct DungeonDebugger {
    zoom: f32,
    pan: Vec2,
    show_grid: bool,
    show_partitions: bool,
    show_rooms: bool,
    show_corridors: bool,
    display_stats: bool,
    node_colors: Vec<Color32>,
}

impl Default for DungeonDebugger {
    fn default() -> Self {
        DungeonDebugger {
            zoom: 4.0,
            pan: Vec2::ZERO,
            show_grid: false,
            show_partitions: true,
            show_rooms: true,
            show_corridors: true,
            display_stats: true,
            node_colors: vec![
                Color32::from_rgb(46, 204, 113),  // Green
                Color32::from_rgb(52, 152, 219),  // Blue
                Color32::from_rgb(155, 89, 182),  // Purple
                Color32::from_rgb(231, 76, 60),   // Red
                Color32::from_rgb(241, 196, 15),  // Yellow
            ],
        }
    }
}

impl DungeonDebugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the toggles and the canvas for `dungeon`.
    pub fn show(&mut self, ui: &mut egui::Ui, dungeon: &Dungeon, stats: Option<&GenerationStats>) {
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.show_grid, "Grid");
            ui.checkbox(&mut self.show_partitions, "Partitions");
            ui.checkbox(&mut self.show_rooms, "Rooms");
            ui.checkbox(&mut self.show_corridors, "Corridors");
            ui.checkbox(&mut self.display_stats, "Stats");

            if ui.button("Reset View").clicked() {
                self.zoom = 4.0;
                self.pan = Vec2::ZERO;
            }

            ui.add(egui::Slider::new(&mut self.zoom, 0.5..=16.0).text("Zoom"));
        });

        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());

        if response.dragged() {
            self.pan += response.drag_delta();
        }
        if response.hovered() && ui.input().scroll_delta.y.abs() > 0.0 {
            let factor = 1.0 + ui.input().scroll_delta.y * 0.001;
            match response.hover_pos() {
                Some(pointer) => self.zoom_at(pointer.to_vec2(), response.rect, factor),
                None => self.zoom = (self.zoom * factor).clamp(0.5, 16.0),
            }
            ui.ctx().request_repaint();
        }

        let canvas = response.rect;
        let bounds = dungeon.root_bounds();
        // Center the region on the canvas before pan is applied.
        let origin = Vec2::new(bounds.width as f32, bounds.height as f32) * -0.5;

        if self.show_grid {
            self.draw_grid(&painter, canvas, origin, bounds.width, bounds.height);
        }

        let border = self.world_rect(canvas, origin, bounds.x, bounds.y, bounds.width, bounds.height);
        painter.rect_stroke(border, 0.0, Stroke::new(1.0, Color32::WHITE));

        if self.show_partitions {
            let tree = dungeon.tree();
            self.draw_partition(&painter, canvas, origin, tree, tree.root(), 0);
        }

        if self.show_rooms {
            for room in dungeon.rooms() {
                let r = room.rect();
                let screen = self.world_rect(canvas, origin, r.x, r.y, r.width, r.height);
                painter.rect_filled(screen, 0.0, Color32::from_gray(200));
            }
        }

        if self.show_corridors {
            let stroke = Stroke::new(1.5, Color32::from_rgb(230, 126, 34));
            for (x1, y1, x2, y2) in dungeon.corridor_segments() {
                let start = self.world_to_screen(Vec2::new(x1 as f32, y1 as f32) + origin, canvas);
                let end = self.world_to_screen(Vec2::new(x2 as f32, y2 as f32) + origin, canvas);
                painter.line_segment([start.to_pos2(), end.to_pos2()], stroke);
            }
        }

        if self.display_stats {
            self.draw_stats(ui, dungeon, stats);
        }
    }

    /// Convert screen coordinates to world coordinates
    fn screen_to_world(&self, screen_pos: Vec2, rect: Rect) -> Vec2 {
        let center = rect.center();
        (screen_pos - center.to_vec2() - self.pan) / self.zoom
    }

    /// Scales the zoom by `factor` while keeping the world point under
    /// `pointer` where it is on screen.
    fn zoom_at(&mut self, pointer: Vec2, canvas: Rect, factor: f32) {
        let world_before = self.screen_to_world(pointer, canvas);
        self.zoom = (self.zoom * factor).clamp(0.5, 16.0);
        self.pan = pointer - canvas.center().to_vec2() - world_before * self.zoom;
    }

    /// Convert world coordinates to screen coordinates
    fn world_to_screen(&self, world_pos: Vec2, rect: Rect) -> Vec2 {
        let center = rect.center();
        world_pos * self.zoom + self.pan + center.to_vec2()
    }

    fn world_rect(&self, canvas: Rect, origin: Vec2, x: i32, y: i32, width: i32, height: i32) -> Rect {
        let min = self.world_to_screen(Vec2::new(x as f32, y as f32) + origin, canvas);
        let max = self.world_to_screen(
            Vec2::new((x + width) as f32, (y + height) as f32) + origin,
            canvas,
        );
        Rect::from_min_max(min.to_pos2(), max.to_pos2())
    }

    fn draw_grid(&self, painter: &egui::Painter, canvas: Rect, origin: Vec2, width: i32, height: i32) {
        const GRID_SIZE: usize = 8;
        let grid_stroke = Stroke::new(1.0, Color32::from_rgba_premultiplied(100, 100, 100, 40));

        for x in (0..=width).step_by(GRID_SIZE) {
            let start = self.world_to_screen(Vec2::new(x as f32, 0.0) + origin, canvas);
            let end = self.world_to_screen(Vec2::new(x as f32, height as f32) + origin, canvas);
            painter.line_segment([start.to_pos2(), end.to_pos2()], grid_stroke);
        }
        for y in (0..=height).step_by(GRID_SIZE) {
            let start = self.world_to_screen(Vec2::new(0.0, y as f32) + origin, canvas);
            let end = self.world_to_screen(Vec2::new(width as f32, y as f32) + origin, canvas);
            painter.line_segment([start.to_pos2(), end.to_pos2()], grid_stroke);
        }
    }

    fn draw_partition(
        &self,
        painter: &egui::Painter,
        canvas: Rect,
        origin: Vec2,
        tree: &PartitionTree,
        id: NodeId,
        depth: usize,
    ) {
        let node = tree.node(id);
        let Some((left, right)) = node.children() else {
            return;
        };
        let stroke = Stroke::new(1.0, self.node_colors[depth % self.node_colors.len()]);

        let cut = tree.node(left).rect;
        let (start, end) = if cut.width < node.rect.width {
            let x = cut.right() as f32;
            (
                Vec2::new(x, node.rect.y as f32),
                Vec2::new(x, node.rect.bottom() as f32),
            )
        } else {
            let y = cut.bottom() as f32;
            (
                Vec2::new(node.rect.x as f32, y),
                Vec2::new(node.rect.right() as f32, y),
            )
        };
        let start = self.world_to_screen(start + origin, canvas);
        let end = self.world_to_screen(end + origin, canvas);
        painter.line_segment([start.to_pos2(), end.to_pos2()], stroke);

        self.draw_partition(painter, canvas, origin, tree, left, depth + 1);
        self.draw_partition(painter, canvas, origin, tree, right, depth + 1);
    }

    fn draw_stats(&self, ui: &mut egui::Ui, dungeon: &Dungeon, stats: Option<&GenerationStats>) {
        egui::Window::new("Statistics")
            .fixed_pos(ui.max_rect().left_top() + Vec2::new(8.0, 32.0))
            .resizable(false)
            .show(ui.ctx(), |ui| {
                let bounds = dungeon.root_bounds();
                ui.label(format!("Region: {}x{}", bounds.width, bounds.height));
                ui.label(format!("Tree Height: {}", tree_height(dungeon.tree(), dungeon.tree().root())));
                if let Some(stats) = stats {
                    ui.label(format!("Leaves: {}", stats.leaf_count));
                    ui.label(format!("Rooms: {}", stats.room_count));
                    ui.label(format!("Corridors: {}", stats.corridor_count));
                    ui.label(format!(
                        "Splits: {} attempted, {} rejected",
                        stats.split_attempts, stats.rejected_splits
                    ));
                    ui.label(format!("Coverage: {:.1}%", stats.room_coverage * 100.0));
                    ui.label(format!("Time: {:.3} ms", stats.generation_time * 1000.0));
                }
            });
    }
}

fn tree_height(tree: &PartitionTree, id: NodeId) -> usize {
    match tree.node(id).children() {
        None => 1,
        Some((left, right)) => 1 + tree_height(tree, left).max(tree_height(tree, right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::GeneratorConfig;
    use egui::Pos2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_coordinate_conversion() {
        let debugger = DungeonDebugger::default();
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));

        let screen_pos = Vec2::new(400.0, 300.0);
        let world_pos = debugger.screen_to_world(screen_pos, rect);
        let back_to_screen = debugger.world_to_screen(world_pos, rect);

        assert!((screen_pos - back_to_screen).length() < 0.001);
    }

    #[test]
    fn test_zoom_keeps_pointer_anchored() {
        let mut debugger = DungeonDebugger::default();
        let canvas = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let pointer = Vec2::new(120.0, 450.0);
        let anchored = debugger.screen_to_world(pointer, canvas);

        debugger.zoom_at(pointer, canvas, 1.5);
        assert!((debugger.zoom - 6.0).abs() < 0.001);
        assert!((debugger.screen_to_world(pointer, canvas) - anchored).length() < 0.001);

        // Clamped zoom still anchors the pointer.
        debugger.zoom_at(pointer, canvas, 100.0);
        assert!((debugger.zoom - 16.0).abs() < 0.001);
        assert!((debugger.screen_to_world(pointer, canvas) - anchored).length() < 0.001);
    }

    #[test]
    fn test_tree_height() {
        let single = PartitionTree::new(10, 10);
        assert_eq!(tree_height(&single, single.root()), 1);

        let config = GeneratorConfig {
            max_iterations: 1,
            ..GeneratorConfig::default()
        };
        let dungeon = Dungeon::generate(&config, &mut StdRng::seed_from_u64(0)).unwrap();
        let tree = dungeon.tree();
        assert_eq!(tree_height(tree, tree.root()), 2);
    }
}
