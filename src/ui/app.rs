use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

use anyhow::Context as _;
use eframe::egui;
use tracing::{info, warn};

use crate::engine::command::{apply_command, CommandOutcome, SessionCommand};
use crate::engine::dice::{DiceRoll, DieType};
use crate::engine::fog;
use crate::engine::map_image::{decode_rgba, load_map_file, IMAGE_EXTENSIONS};
use crate::engine::roller::RandRoller;
use crate::engine::storage::{FileStorage, MemoryStorage, SnapshotStorage};
use crate::engine::store::SessionStore;
use crate::model::player::NewPlayer;
use crate::model::session::{AppMode, CellKey, DEFAULT_COLS, DEFAULT_ROWS};
use crate::model::skill_check::DEFAULT_DIFFICULTY;
use crate::ui::center_panel::draw_center_panel;
use crate::ui::left_panel::draw_left_panel;
use crate::ui::modals::draw_modals;
use crate::ui::settings::{UiSettings, COLOR_KEYS, MAX_UI_SCALE, MIN_UI_SCALE};
use crate::ui::settings_io::save_settings;

/* =========================
   UI Actions
   ========================= */

/// Something a panel asked for while drawing. Handled after the frame's
/// widgets are laid out, when the store can be borrowed mutably.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Command(SessionCommand),
    RollDice,
    CellClicked(CellKey),
    PickMapFile,
}

/* =========================
   Forms
   ========================= */

pub struct DiceForm {
    pub roller_id: Option<String>,
    pub count: u32,
    pub die: String,
    pub modifier: i32,
    pub last: Option<DiceRoll>,
}

impl Default for DiceForm {
    fn default() -> Self {
        Self {
            roller_id: None,
            count: 3,
            die: DieType::D100.to_string(),
            modifier: 2,
            last: None,
        }
    }
}

pub struct PlayerForm {
    pub name: String,
    pub health_points: i32,
    pub initiative: i32,
}

impl Default for PlayerForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            health_points: 2,
            initiative: 0,
        }
    }
}

impl PlayerForm {
    pub fn to_new_player(&self) -> NewPlayer {
        NewPlayer {
            name: self.name.trim().to_string(),
            health_points: Some(self.health_points),
            initiative: Some(self.initiative),
        }
    }
}

pub struct UploadForm {
    pub cols: u32,
    pub rows: u32,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }
}

pub struct SkillCheckForm {
    pub cell: CellKey,
    pub skill: String,
    pub difficulty: i32,
    pub description: String,
}

impl SkillCheckForm {
    pub fn at(cell: CellKey) -> Self {
        Self {
            cell,
            skill: String::new(),
            difficulty: DEFAULT_DIFFICULTY,
            description: String::new(),
        }
    }
}

/// Decoded map, keyed by a hash of its data URL.
pub struct MapTexture {
    key: u64,
    pub image: Result<egui::TextureHandle, String>,
}

/* =========================
   UI State
   ========================= */

#[derive(Default)]
pub struct UiState {
    pub actions: Vec<UiAction>,

    pub dice: DiceForm,
    pub new_player: PlayerForm,
    pub upload: UploadForm,
    pub skill_form: Option<SkillCheckForm>,

    /// Skill check waiting for a pass/fail verdict.
    pub resolving: Option<String>,

    pub map_texture: Option<MapTexture>,
    pub status: Option<String>,
    pub show_settings: bool,
    pub confirm_reset: bool,
}

impl UiState {
    pub fn send(&mut self, command: SessionCommand) {
        self.actions.push(UiAction::Command(command));
    }
}

/* =========================
   App
   ========================= */

pub struct TableApp {
    store: SessionStore,
    ui: UiState,
    settings: UiSettings,
}

impl TableApp {
    pub fn new(settings: UiSettings) -> Self {
        let storage: Box<dyn SnapshotStorage> = if settings.persist_session {
            let file = FileStorage::in_config_dir();
            info!(path = %file.path().display(), "session snapshot location");
            Box::new(file)
        } else {
            info!("session persistence disabled");
            Box::new(MemoryStorage::default())
        };

        Self {
            store: SessionStore::open(storage, Box::new(RandRoller::from_entropy())),
            ui: UiState::default(),
            settings,
        }
    }

    fn sync_map_texture(&mut self, ctx: &egui::Context) {
        let Some(url) = self.store.state().map_image.as_deref() else {
            self.ui.map_texture = None;
            return;
        };

        let mut hasher = DefaultHasher::new();
        url.hash(&mut hasher);
        let key = hasher.finish();

        if matches!(&self.ui.map_texture, Some(t) if t.key == key) {
            return;
        }

        let image = decode_rgba(url)
            .map(|rgba| {
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                ctx.load_texture("map", pixels, egui::TextureOptions::LINEAR)
            })
            .map_err(|e| e.to_string());

        if let Err(e) = &image {
            warn!(error = %e, "map image could not be decoded");
        }

        self.ui.map_texture = Some(MapTexture { key, image });
    }

    fn process_actions(&mut self) {
        for action in std::mem::take(&mut self.ui.actions) {
            match action {
                UiAction::Command(command) => self.apply(command),
                UiAction::RollDice => self.roll_dice(),
                UiAction::CellClicked(cell) => self.on_cell_clicked(cell),
                UiAction::PickMapFile => {
                    if let Err(e) = self.pick_map_file() {
                        warn!(error = %e, "map upload failed");
                        self.ui.status = Some(format!("{e:#}"));
                    }
                }
            }
        }
    }

    fn apply(&mut self, command: SessionCommand) {
        if matches!(command, SessionCommand::ResetGame | SessionCommand::ResetMap) {
            self.ui.resolving = None;
            self.ui.skill_form = None;
            self.ui.dice.roller_id = None;
        }

        if let CommandOutcome::Ignored { reason } = apply_command(&mut self.store, command) {
            self.ui.status = Some(reason);
        }
    }

    fn roll_dice(&mut self) {
        let form = &mut self.ui.dice;
        match self.store.roll_dice(&form.die, form.count, form.modifier) {
            Ok(roll) => form.last = Some(roll),
            Err(e) => self.ui.status = Some(e.to_string()),
        }
    }

    fn on_cell_clicked(&mut self, cell: CellKey) {
        match self.store.state().mode {
            AppMode::Setup => {
                if self.store.state().flags.selecting_cell_for_check {
                    self.apply(SessionCommand::SetSelectingCellForCheck(false));
                }
                if self.store.state().skill_check_at(cell.col, cell.row).is_none() {
                    self.ui.skill_form = Some(SkillCheckForm::at(cell));
                }
            }
            AppMode::Game => {
                if let Some(id) = fog::reveal_for_play(&mut self.store, cell.col, cell.row) {
                    self.ui.resolving = Some(id);
                }
            }
        }
    }

    fn pick_map_file(&mut self) -> anyhow::Result<()> {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Load map")
            .add_filter("Images", &IMAGE_EXTENSIONS[..])
            .pick_file()
        else {
            return Ok(());
        };

        self.load_map(&path)
    }

    /// The current map is only replaced once the new file decodes.
    fn load_map(&mut self, path: &Path) -> anyhow::Result<()> {
        let url = load_map_file(path)
            .with_context(|| format!("could not load map from {}", path.display()))?;

        info!(path = %path.display(), bytes = url.len(), "map loaded");
        self.apply(SessionCommand::SetMap {
            image: url,
            cols: self.ui.upload.cols,
            rows: self.ui.upload.rows,
        });
        self.apply(SessionCommand::SetUploadModalOpen(false));
        self.ui.status = None;
        Ok(())
    }

    fn draw_settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.ui.show_settings;
        let mut changed = false;

        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("UI Scale");
                changed |= ui
                    .add(egui::Slider::new(
                        &mut self.settings.ui_scale,
                        MIN_UI_SCALE..=MAX_UI_SCALE,
                    ))
                    .changed();

                changed |= ui
                    .checkbox(
                        &mut self.settings.persist_session,
                        "Remember session between launches",
                    )
                    .changed();
                ui.small("Takes effect on next launch.");

                ui.separator();
                ui.label("Map colors");
                for key in COLOR_KEYS {
                    ui.horizontal(|ui| {
                        let mut color = self.settings.color(key);
                        if ui.color_edit_button_srgba(&mut color).changed() {
                            self.settings.set_color(key, color);
                            changed = true;
                        }
                        ui.label(key);
                    });
                }

                ui.separator();
                if ui.button("Restore defaults").clicked() {
                    self.settings = UiSettings::default();
                    changed = true;
                }
            });

        self.ui.show_settings = open;
        if changed {
            save_settings(&self.settings);
        }
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for TableApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        self.sync_map_texture(ctx);

        draw_left_panel(ctx, &self.store, &mut self.ui);
        draw_center_panel(ctx, self.store.state(), &mut self.ui, &self.settings);
        draw_modals(ctx, &self.store, &mut self.ui);
        self.draw_settings_window(ctx);

        self.process_actions();
    }
}
