use eframe::egui;

use crate::engine::command::SessionCommand;
use crate::engine::dice::{DieType, MAX_DICE};
use crate::engine::store::SessionStore;
use crate::model::player::{Player, PlayerPatch, MAX_INITIATIVE, MIN_INITIATIVE};
use crate::model::session::{AppMode, GameState};
use crate::ui::app::{UiAction, UiState};

pub fn draw_left_panel(ctx: &egui::Context, store: &SessionStore, ui_state: &mut UiState) {
    let state = store.state();
    let game = state.mode == AppMode::Game;

    egui::SidePanel::left("sidebar")
        .resizable(false)
        .default_width(320.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                draw_mode_select(ui, state, ui_state);
                ui.separator();

                if game {
                    draw_dice(ui, store, ui_state);
                    ui.separator();
                }

                draw_players(ui, store, ui_state);

                if state.map_image.is_some() && !game {
                    ui.separator();
                    draw_skill_checks(ui, state, ui_state);

                    ui.separator();
                    if ui
                        .add_sized(
                            [ui.available_width(), 28.0],
                            egui::Button::new("▶ Start game"),
                        )
                        .clicked()
                    {
                        ui_state.send(SessionCommand::SetMode(AppMode::Game));
                    }
                }

                ui.separator();
                draw_session_controls(ui, state, ui_state);
            });
        });
}

fn draw_mode_select(ui: &mut egui::Ui, state: &GameState, ui_state: &mut UiState) {
    let mut mode = state.mode;

    egui::ComboBox::from_id_salt("mode_select")
        .width(ui.available_width())
        .selected_text(mode_label(mode))
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut mode, AppMode::Setup, mode_label(AppMode::Setup));
            // A game needs a map to play on.
            if state.map_image.is_some() {
                ui.selectable_value(&mut mode, AppMode::Game, mode_label(AppMode::Game));
            }
        });

    if mode != state.mode {
        ui_state.send(SessionCommand::SetMode(mode));
    }
}

fn mode_label(mode: AppMode) -> &'static str {
    match mode {
        AppMode::Setup => "Master mode",
        AppMode::Game => "Game",
    }
}

/* =========================
   Dice
   ========================= */

fn draw_dice(ui: &mut egui::Ui, store: &SessionStore, ui_state: &mut UiState) {
    let state = store.state();
    ui.heading("Checks & combat");

    let form = &mut ui_state.dice;

    let roller_name = form
        .roller_id
        .as_deref()
        .and_then(|id| store.player(id))
        .map(|p| p.name.clone());

    egui::ComboBox::from_id_salt("dice_roller")
        .width(ui.available_width())
        .selected_text(roller_name.as_deref().unwrap_or("Who rolls"))
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut form.roller_id, None, "—");
            for p in &state.players {
                ui.selectable_value(&mut form.roller_id, Some(p.id.clone()), p.name.as_str());
            }
        });

    ui.horizontal(|ui| {
        ui.label("Count");
        ui.add(egui::DragValue::new(&mut form.count).range(1..=MAX_DICE));

        egui::ComboBox::from_id_salt("dice_type")
            .width(64.0)
            .selected_text(form.die.as_str())
            .show_ui(ui, |ui| {
                for die in DieType::ALL {
                    ui.selectable_value(&mut form.die, die.to_string(), die.to_string());
                }
            });

        ui.label("Mod");
        ui.add(egui::DragValue::new(&mut form.modifier));
    });

    ui.group(|ui| {
        ui.set_width(ui.available_width());
        ui.label("Result");
        match &form.last {
            Some(roll) => {
                let who = roller_name.map(|n| format!("{n}: ")).unwrap_or_default();
                ui.heading(format!("{who}{roll}"));
                let draws: Vec<String> = roll.draws.iter().map(|d| d.to_string()).collect();
                ui.small(format!(
                    "{} × {} → [{}]",
                    roll.draws.len(),
                    roll.die,
                    draws.join(", ")
                ));
            }
            None => {
                ui.label("⚡");
            }
        }
    });

    if ui
        .add_sized([ui.available_width(), 24.0], egui::Button::new("Roll"))
        .clicked()
    {
        ui_state.actions.push(UiAction::RollDice);
    }
}

/* =========================
   Players
   ========================= */

fn draw_players(ui: &mut egui::Ui, store: &SessionStore, ui_state: &mut UiState) {
    let state = store.state();
    let game = state.mode == AppMode::Game;

    ui.horizontal(|ui| {
        ui.heading("Players");
        if ui.small_button("➕ Add").clicked() {
            ui_state.send(SessionCommand::SetAddPlayerModalOpen(true));
        }
    });

    if state.players.is_empty() {
        ui.weak("—");
    }

    for player in store.display_order() {
        draw_player_card(ui, player, game, ui_state);
    }

    if game && !state.players.is_empty() {
        let rolled = state.has_initiative_rolls();
        let label = if rolled { "Clear results" } else { "Roll initiative" };

        if ui
            .add_sized([ui.available_width(), 24.0], egui::Button::new(label))
            .clicked()
        {
            ui_state.send(if rolled {
                SessionCommand::ClearInitiativeRolls
            } else {
                SessionCommand::RollInitiativeForAll
            });
        }
    }
}

fn draw_player_card(ui: &mut egui::Ui, player: &Player, game: bool, ui_state: &mut UiState) {
    let color = player
        .color_rgb()
        .map(|[r, g, b]| egui::Color32::from_rgb(r, g, b))
        .unwrap_or(egui::Color32::GRAY);

    ui.group(|ui| {
        ui.set_width(ui.available_width());

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&player.name).strong().color(color));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("❌").clicked() {
                    ui_state.send(SessionCommand::RemovePlayer {
                        id: player.id.clone(),
                    });
                }
            });
        });

        let mut patch = PlayerPatch::default();

        ui.horizontal(|ui| {
            let mut hp = player.health_points;
            ui.label("❤");
            if ui
                .add(egui::DragValue::new(&mut hp).range(0..=player.max_health_points))
                .changed()
            {
                patch.health_points = Some(hp);
            }
            ui.weak(format!("/ {}", player.max_health_points));

            let mut init = player.initiative;
            ui.label("Init");
            if ui
                .add(
                    egui::DragValue::new(&mut init)
                        .range(MIN_INITIATIVE..=MAX_INITIATIVE)
                        .custom_formatter(|v, _| format!("{:+}", v as i32)),
                )
                .changed()
            {
                patch.initiative = Some(init);
            }

            if let Some(mut roll) = player.initiative_roll.filter(|_| game) {
                ui.label("🎲");
                if ui.add(egui::DragValue::new(&mut roll).range(1..=20)).changed() {
                    patch.initiative_roll = Some(Some(roll));
                }
            }
        })
        .response
        .on_hover_text(format!(
            "Player: {} | HP: {} | Initiative: {:+}",
            player.name, player.health_points, player.initiative
        ));

        if patch != PlayerPatch::default() {
            ui_state.send(SessionCommand::UpdatePlayer {
                id: player.id.clone(),
                patch,
            });
        }
    });
}

/* =========================
   Skill checks
   ========================= */

fn draw_skill_checks(ui: &mut egui::Ui, state: &GameState, ui_state: &mut UiState) {
    ui.horizontal(|ui| {
        ui.heading("Checks");
        if ui.small_button("➕ Add").clicked() {
            ui_state.send(SessionCommand::SetSelectingCellForCheck(true));
        }
    });

    if state.skill_checks.is_empty() {
        ui.weak("—");
        return;
    }

    for (i, sc) in state.skill_checks.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(format!("{}. {} · DC {}", i + 1, sc.skill, sc.difficulty));
            ui.weak(format!("({}, {})", sc.x + 1, sc.y + 1));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("❌").clicked() {
                    ui_state.send(SessionCommand::RemoveSkillCheck { id: sc.id.clone() });
                }
            });
        });
    }
}

/* =========================
   Session
   ========================= */

fn draw_session_controls(ui: &mut egui::Ui, state: &GameState, ui_state: &mut UiState) {
    ui.horizontal_wrapped(|ui| {
        if state.map_image.is_some()
            && state.mode == AppMode::Setup
            && ui.button("Replace map").clicked()
        {
            ui_state.send(SessionCommand::ResetMap);
        }

        if ui_state.confirm_reset {
            ui.label("Discard everything?");
            if ui.button("Yes").clicked() {
                ui_state.send(SessionCommand::ResetGame);
                ui_state.confirm_reset = false;
            }
            if ui.button("No").clicked() {
                ui_state.confirm_reset = false;
            }
        } else if ui.button("New session").clicked() {
            ui_state.confirm_reset = true;
        }

        if ui.button("⚙ Settings").clicked() {
            ui_state.show_settings = !ui_state.show_settings;
        }
    });
}
