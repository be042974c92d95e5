use eframe::egui;

use crate::engine::command::SessionCommand;
use crate::engine::store::SessionStore;
use crate::model::player::{MAX_HEALTH_POINTS, MAX_INITIATIVE, MAX_NAME_CHARS, MIN_INITIATIVE};
use crate::model::session::{GameState, MAX_GRID, MIN_GRID};
use crate::model::skill_check::{
    CheckResult, NewSkillCheck, MAX_DIFFICULTY, MIN_DIFFICULTY, SKILL_OPTIONS,
};
use crate::ui::app::{PlayerForm, UiAction, UiState};

pub fn draw_modals(ctx: &egui::Context, store: &SessionStore, ui_state: &mut UiState) {
    let state = store.state();
    if state.flags.upload_modal_open {
        draw_upload_modal(ctx, ui_state);
    }
    if state.flags.add_player_modal_open {
        draw_add_player_modal(ctx, ui_state);
    }
    if ui_state.skill_form.is_some() {
        draw_skill_check_modal(ctx, state, ui_state);
    }
    if ui_state.resolving.is_some() {
        draw_result_modal(ctx, store, ui_state);
    }
}

/* =========================
   Map upload
   ========================= */

fn draw_upload_modal(ctx: &egui::Context, ui_state: &mut UiState) {
    let modal = egui::Modal::new(egui::Id::new("upload_map")).show(ctx, |ui| {
        ui.set_width(320.0);
        ui.heading("Load map");
        ui.separator();

        ui.label("Grid");
        ui.horizontal(|ui| {
            ui.label("Columns");
            ui.add(egui::DragValue::new(&mut ui_state.upload.cols).range(MIN_GRID..=MAX_GRID));
            ui.label("Rows");
            ui.add(egui::DragValue::new(&mut ui_state.upload.rows).range(MIN_GRID..=MAX_GRID));
        });

        ui.add_space(8.0);
        if ui
            .add_sized([ui.available_width(), 48.0], egui::Button::new("📂 Choose image…"))
            .clicked()
        {
            ui_state.actions.push(UiAction::PickMapFile);
        }

        ui.add_space(8.0);
        ui.button("Cancel").clicked()
    });

    if modal.should_close() || modal.inner {
        ui_state.send(SessionCommand::SetUploadModalOpen(false));
    }
}

/* =========================
   Add player
   ========================= */

fn draw_add_player_modal(ctx: &egui::Context, ui_state: &mut UiState) {
    let mut submit = false;
    let mut cancel = false;

    let modal = egui::Modal::new(egui::Id::new("add_player")).show(ctx, |ui| {
        ui.set_width(300.0);
        ui.heading("Add player");
        ui.separator();

        let form = &mut ui_state.new_player;

        ui.label("Player name");
        let name = ui.add(
            egui::TextEdit::singleline(&mut form.name)
                .char_limit(MAX_NAME_CHARS)
                .hint_text(format!("At most {MAX_NAME_CHARS} characters")),
        );
        if name.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submit = true;
        }

        ui.horizontal(|ui| {
            ui.label("Health");
            ui.add(egui::DragValue::new(&mut form.health_points).range(0..=MAX_HEALTH_POINTS));
            ui.label("Initiative");
            ui.add(
                egui::DragValue::new(&mut form.initiative).range(MIN_INITIATIVE..=MAX_INITIATIVE),
            );
        });

        ui.separator();
        ui.horizontal(|ui| {
            submit |= ui
                .add_enabled(!form.name.trim().is_empty(), egui::Button::new("Add"))
                .clicked();
            cancel = ui.button("Cancel").clicked();
        });
    });

    if submit && !ui_state.new_player.name.trim().is_empty() {
        ui_state.send(SessionCommand::AddPlayer(ui_state.new_player.to_new_player()));
        ui_state.new_player = PlayerForm::default();
        ui_state.send(SessionCommand::SetAddPlayerModalOpen(false));
    } else if cancel || modal.should_close() {
        ui_state.new_player = PlayerForm::default();
        ui_state.send(SessionCommand::SetAddPlayerModalOpen(false));
    }
}

/* =========================
   Skill check placement
   ========================= */

fn draw_skill_check_modal(ctx: &egui::Context, state: &GameState, ui_state: &mut UiState) {
    let Some(form) = ui_state.skill_form.as_mut() else {
        return;
    };

    let mut submit = false;
    let mut cancel = false;

    let modal = egui::Modal::new(egui::Id::new("skill_check")).show(ctx, |ui| {
        ui.set_width(320.0);
        ui.heading(format!(
            "Check #{} at ({}, {})",
            state.skill_checks.len() + 1,
            form.cell.col + 1,
            form.cell.row + 1
        ));
        ui.separator();

        ui.label("Skill");
        egui::ComboBox::from_id_salt("skill_select")
            .width(ui.available_width())
            .selected_text(if form.skill.is_empty() {
                "Choose a skill"
            } else {
                form.skill.as_str()
            })
            .show_ui(ui, |ui| {
                for skill in SKILL_OPTIONS {
                    ui.selectable_value(&mut form.skill, skill.to_string(), skill);
                }
            });

        ui.label("Difficulty (DC)");
        ui.add(egui::DragValue::new(&mut form.difficulty).range(MIN_DIFFICULTY..=MAX_DIFFICULTY));

        ui.label("Description (optional)");
        ui.add(
            egui::TextEdit::multiline(&mut form.description)
                .desired_rows(3)
                .hint_text("What happens on success or failure?"),
        );

        ui.separator();
        ui.horizontal(|ui| {
            submit = ui
                .add_enabled(!form.skill.is_empty(), egui::Button::new("Add"))
                .clicked();
            cancel = ui.button("Cancel").clicked();
        });
    });

    if submit {
        let check = NewSkillCheck {
            x: form.cell.col,
            y: form.cell.row,
            skill: form.skill.clone(),
            difficulty: form.difficulty,
            description: Some(form.description.clone()),
        };
        ui_state.send(SessionCommand::AddSkillCheck(check));
        ui_state.skill_form = None;
    } else if cancel || modal.should_close() {
        ui_state.skill_form = None;
    }
}

/* =========================
   Skill check resolution
   ========================= */

fn draw_result_modal(ctx: &egui::Context, store: &SessionStore, ui_state: &mut UiState) {
    let Some(check) = ui_state
        .resolving
        .as_deref()
        .and_then(|id| store.skill_check(id))
    else {
        ui_state.resolving = None;
        return;
    };

    let modal = egui::Modal::new(egui::Id::new("skill_result")).show(ctx, |ui| {
        ui.set_width(320.0);
        ui.heading(format!("Check: {} (DC {})", check.skill, check.difficulty));

        if let Some(description) = &check.description {
            ui.add_space(6.0);
            ui.label(description.as_str());
        }

        ui.add_space(12.0);
        let mut verdict = None;
        ui.horizontal(|ui| {
            let passed = egui::Button::new(
                egui::RichText::new("✔ Passed").color(egui::Color32::WHITE),
            )
            .fill(egui::Color32::from_rgb(82, 196, 26));
            if ui.add(passed).clicked() {
                verdict = Some(CheckResult::Passed);
            }

            let failed = egui::Button::new(
                egui::RichText::new("✖ Failed").color(egui::Color32::WHITE),
            )
            .fill(egui::Color32::from_rgb(255, 77, 79));
            if ui.add(failed).clicked() {
                verdict = Some(CheckResult::Failed);
            }
        });
        verdict
    });

    let id = check.id.clone();
    if let Some(result) = modal.inner {
        ui_state.send(SessionCommand::UpdateSkillCheckResult { id, result });
        ui_state.resolving = None;
    } else if modal.should_close() {
        // Dismissed without a verdict; the check stays open.
        ui_state.resolving = None;
    }
}
