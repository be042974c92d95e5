use egui::{Align2, Color32, FontId, Rect, Sense, Stroke};

use crate::engine::command::SessionCommand;
use crate::engine::fog;
use crate::model::session::{AppMode, GameState};
use crate::model::skill_check::CheckResult;
use crate::ui::app::{UiAction, UiState};
use crate::ui::settings::UiSettings;

pub fn draw_center_panel(
    ctx: &egui::Context,
    state: &GameState,
    ui_state: &mut UiState,
    settings: &UiSettings,
) {
    // ---------- Status bar ----------
    if ui_state.status.is_some() {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &ui_state.status {
                    ui.colored_label(Color32::LIGHT_RED, status.as_str());
                }
                if ui.small_button("✖").clicked() {
                    ui_state.status = None;
                }
            });
        });
    }

    // ---------- Map ----------
    egui::CentralPanel::default().show(ctx, |ui| {
        let game = state.mode == AppMode::Game;

        if state.map_image.is_none() {
            ui.centered_and_justified(|ui| {
                if game {
                    if ui.button("← Setup").clicked() {
                        ui_state.send(SessionCommand::SetMode(AppMode::Setup));
                    }
                } else if ui.button("Load map").clicked() {
                    ui_state.send(SessionCommand::SetUploadModalOpen(true));
                }
            });
            return;
        }

        ui.horizontal(|ui| {
            if game {
                if ui.button("← Leave game").clicked() {
                    ui_state.send(SessionCommand::SetMode(AppMode::Setup));
                }
                ui.label("Click a cell to reveal it");
            } else if state.flags.selecting_cell_for_check {
                ui.label("Pick a cell on the map for the new check");
            } else {
                ui.weak("Click a cell to add a skill check");
            }
        });
        ui.add_space(4.0);

        let texture = match ui_state.map_texture.as_ref().map(|t| &t.image) {
            Some(Ok(texture)) => texture.clone(),
            Some(Err(e)) => {
                ui.colored_label(Color32::LIGHT_RED, format!("Map image unreadable: {e}"));
                return;
            }
            None => {
                ui.spinner();
                return;
            }
        };

        let size = fit_rect(ui.available_size(), texture.size_vec2());
        let (response, painter) = ui.allocate_painter(size, Sense::click());
        let rect = response.rect;

        painter.image(
            texture.id(),
            rect,
            Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        draw_grid(&painter, rect, state, settings);
        draw_markers(&painter, rect, state, settings);

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let rel = pos - rect.min;
                let cell = fog::cell_at(rel.x, rel.y, rect.width(), rect.height(), state.map_size);
                if let Some(cell) = cell {
                    ui_state.actions.push(UiAction::CellClicked(cell));
                }
            }
        }
    });
}

/// Largest size with the image's aspect ratio that fits `available`.
fn fit_rect(available: egui::Vec2, image: egui::Vec2) -> egui::Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return available;
    }
    let scale = (available.x / image.x).min(available.y / image.y);
    image * scale
}

fn cell_rect(rect: Rect, state: &GameState, col: u32, row: u32) -> Rect {
    let w = rect.width() / state.map_size.cols as f32;
    let h = rect.height() / state.map_size.rows as f32;
    let min = rect.min + egui::vec2(col as f32 * w, row as f32 * h);
    Rect::from_min_size(min, egui::vec2(w, h))
}

fn draw_grid(painter: &egui::Painter, rect: Rect, state: &GameState, settings: &UiSettings) {
    let fog_color = settings.color("Fog");
    for row in 0..state.map_size.rows {
        for col in 0..state.map_size.cols {
            if fog::is_fogged(state, col, row) {
                painter.rect_filled(cell_rect(rect, state, col, row), 0.0, fog_color);
            }
        }
    }

    let stroke = Stroke::new(1.0, settings.color("Grid"));
    for col in 0..=state.map_size.cols {
        let x = rect.left() + rect.width() * col as f32 / state.map_size.cols as f32;
        painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], stroke);
    }
    for row in 0..=state.map_size.rows {
        let y = rect.top() + rect.height() * row as f32 / state.map_size.rows as f32;
        painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], stroke);
    }
}

fn draw_markers(painter: &egui::Painter, rect: Rect, state: &GameState, settings: &UiSettings) {
    for sc in &state.skill_checks {
        if !state.map_size.contains(sc.x, sc.y) {
            continue;
        }

        let view = fog::marker_view(state, sc);
        let cell = cell_rect(rect, state, sc.x, sc.y);
        let radius = cell.width().min(cell.height()) * 0.3;

        if let Some(result) = view.badge {
            let color = match result {
                CheckResult::Passed => settings.color("Passed"),
                CheckResult::Failed => settings.color("Failed"),
            };
            painter.rect_filled(cell.shrink(cell.width() * 0.08), 4.0, color);
            painter.text(
                cell.center(),
                Align2::CENTER_CENTER,
                result.label(),
                FontId::proportional((cell.height() * 0.22).max(8.0)),
                Color32::WHITE,
            );
        }

        if let Some(number) = view.number {
            painter.circle_filled(cell.center(), radius, settings.color("Marker"));
            painter.text(
                cell.center(),
                Align2::CENTER_CENTER,
                number.to_string(),
                FontId::proportional(radius * 1.2),
                Color32::BLACK,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_rect_keeps_aspect_ratio() {
        let size = fit_rect(egui::vec2(800.0, 400.0), egui::vec2(200.0, 200.0));
        assert_eq!(size, egui::vec2(400.0, 400.0));

        let size = fit_rect(egui::vec2(300.0, 900.0), egui::vec2(600.0, 300.0));
        assert_eq!(size, egui::vec2(300.0, 150.0));
    }

    #[test]
    fn cell_rects_tile_the_map() {
        let state = GameState::default();
        let rect = Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(100.0, 80.0));
        let first = cell_rect(rect, &state, 0, 0);
        let last = cell_rect(rect, &state, 9, 7);
        assert_eq!(first.min, rect.min);
        assert_eq!(first.size(), egui::vec2(10.0, 10.0));
        assert_eq!(last.max, rect.max);
    }
}
