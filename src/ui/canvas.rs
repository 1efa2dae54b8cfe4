use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use egui::{Color32, Pos2, Rect, Stroke, Vec2};

use crate::{
    appconfig::AppSettings,
    marks::{Annotation, Point},
};

use super::ui_types::App;

pub const SEED_COLOR: Color32 = Color32::RED;
pub const SUPERPIXEL_COLOR: Color32 = Color32::BLUE;

/// Pixel under `pointer`, the image is drawn unscaled with its top-left at
/// `image_rect.min`.
pub fn canvas_coords(pointer: Pos2, image_rect: Rect) -> Option<Point> {
    let offset = pointer - image_rect.min;
    let (x, y) = (offset.x.floor(), offset.y.floor());
    if x < 0. || y < 0. || x >= image_rect.width() || y >= image_rect.height() {
        return None;
    }
    Some((x as i32, y as i32))
}

fn mark_position(origin: Pos2, (x, y): Point) -> Pos2 {
    origin + Vec2::new(x as f32, y as f32)
}

pub fn paint_annotation(
    painter: &egui::Painter,
    origin: Pos2,
    annotation: Annotation,
    settings: &AppSettings,
) {
    match annotation {
        Annotation::Dot(p) => {
            painter.circle_filled(mark_position(origin, p), settings.seed_radius, SEED_COLOR);
        }
        Annotation::Cross(p) => {
            let c = mark_position(origin, p);
            let h = settings.cross_half_size;
            let stroke = Stroke::new(1.0, SUPERPIXEL_COLOR);
            painter.line_segment([c + Vec2::new(-h, -h), c + Vec2::new(h, h)], stroke);
            painter.line_segment([c + Vec2::new(h, -h), c + Vec2::new(-h, h)], stroke);
        }
    }
}

impl App {
    pub fn handle_canvas_click(&mut self, pos: Point) {
        self.marks.click(self.mode, pos);
    }

    pub fn canvas(&mut self, ui: &mut egui::Ui) {
        let Some(texture) = &self.overlay_texture else {
            ui.centered_and_justified(|ui| {
                ui.label("Select an image to run the segmentation");
            });
            return;
        };

        let size = texture.size_vec2();
        let texture_id = texture.id();

        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let img = egui::Image::from_texture((texture_id, size))
                    .fit_to_exact_size(size)
                    .max_size(size)
                    .sense(egui::Sense::click());

                let resp = ui.add(img);
                let rect = resp.rect;

                if resp.clicked() {
                    if let Some(pos) = resp
                        .interact_pointer_pos()
                        .and_then(|p| canvas_coords(p, rect))
                    {
                        self.handle_canvas_click(pos);
                    }
                }

                self.hovered_pixel = resp.hover_pos().and_then(|p| canvas_coords(p, rect));

                let painter = ui.painter_at(rect);
                for annotation in self.marks.annotations() {
                    paint_annotation(&painter, rect.min, annotation, &self.settings);
                }
            });
    }

    pub fn canvas_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(path) = &self.image_path {
                ui.label(format!("Image: {}", path.display()));
                ui.separator();
            }

            if let Some(texture) = &self.overlay_texture {
                let [w, h] = texture.size();
                ui.label(format!("{} x {}", w, h));
                ui.separator();
            }

            match self.hovered_pixel {
                Some((x, y)) => ui.label(format!("({}, {})", x, y)),
                None => ui.label("(-, -)"),
            };
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marks::MarkingMode;

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::new(100., 50.), Vec2::new(640., 480.))
    }

    #[test]
    fn test_coords_relative_to_image() {
        assert_eq!(canvas_coords(Pos2::new(110., 70.), rect()), Some((10, 20)));
        assert_eq!(canvas_coords(Pos2::new(130.7, 90.2), rect()), Some((30, 40)));
        assert_eq!(canvas_coords(Pos2::new(100., 50.), rect()), Some((0, 0)));
        assert_eq!(canvas_coords(Pos2::new(739.9, 529.9), rect()), Some((639, 479)));
    }

    #[test]
    fn test_coords_outside_image() {
        assert_eq!(canvas_coords(Pos2::new(99.5, 70.), rect()), None);
        assert_eq!(canvas_coords(Pos2::new(110., 49.), rect()), None);
        assert_eq!(canvas_coords(Pos2::new(740., 70.), rect()), None);
        assert_eq!(canvas_coords(Pos2::new(110., 530.), rect()), None);
    }

    #[test]
    fn test_marks_drawn_at_click_point() {
        let origin = Pos2::new(100., 50.);
        assert_eq!(mark_position(origin, (10, 20)), Pos2::new(110., 70.));
        assert_eq!(
            canvas_coords(mark_position(origin, (30, 40)), rect()),
            Some((30, 40))
        );
    }

    #[test]
    fn test_click_dispatch_by_mode() {
        let mut app = App::default();

        app.handle_canvas_click((1, 1));
        assert!(app.marks.is_empty());

        app.mode = Some(MarkingMode::NewSeed);
        app.handle_canvas_click((10, 20));
        app.handle_canvas_click((30, 40));

        app.mode = Some(MarkingMode::LocateSuperpixel);
        app.handle_canvas_click((5, 5));
        app.handle_canvas_click((6, 6));

        assert_eq!(app.marks.seeds, vec![(10, 20), (30, 40)]);
        assert_eq!(app.marks.superpixel, Some((6, 6)));
    }
}
