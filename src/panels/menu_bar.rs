use egui::{Color32, Ui};

use crate::app::SayingsApp;
use crate::command::{Command, CommandId, MENU_BACKGROUND};
use crate::text::{Justify, DEFAULT_FONT_SIZE};

const FONT_SIZES: [u32; 6] = [18, 24, 30, 36, 48, 72];

pub fn menu_bar(app: &mut SayingsApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                for id in [CommandId::New, CommandId::SaveImage] {
                    if command_button(app, ui, id) {
                        app.trigger(id);
                        ui.close_menu();
                    }
                }
                ui.separator();
                if command_button(app, ui, CommandId::Quit) {
                    app.trigger(CommandId::Quit);
                    ui.close_menu();
                }
            });

            ui.menu_button("Text", |ui| text_menu(app, ui));

            ui.menu_button("Background", |ui| {
                for entry in MENU_BACKGROUND {
                    match entry {
                        None => {
                            ui.separator();
                        }
                        Some(CommandId::GradientOverlay) => {
                            let mut enabled = app.canvas().gradient_enabled();
                            if ui
                                .checkbox(&mut enabled, CommandId::GradientOverlay.label())
                                .on_hover_text(CommandId::GradientOverlay.tooltip())
                                .clicked()
                            {
                                app.execute(Command::SetGradientOverlay(enabled));
                                ui.close_menu();
                            }
                        }
                        Some(id) => {
                            if command_button(app, ui, id) {
                                app.trigger(id);
                                ui.close_menu();
                            }
                        }
                    }
                }
            });

            ui.menu_button("Stamper", |ui| stamper_menu(app, ui));
        });
    });
}

/// A menu entry with the command's icon when one is available.
fn command_button(app: &mut SayingsApp, ui: &mut Ui, id: CommandId) -> bool {
    let texture = id.icon().and_then(|icon| app.icon_texture(ui.ctx(), icon));
    let button = match texture {
        Some(texture) => egui::Button::image_and_text(
            egui::Image::new((texture, egui::vec2(16.0, 16.0))),
            id.label(),
        ),
        None => egui::Button::new(id.label()),
    };
    ui.add(button).on_hover_text(id.tooltip()).clicked()
}

fn text_menu(app: &mut SayingsApp, ui: &mut Ui) {
    let text = app.canvas().text();
    let (current_justify, current_size) = (text.justify(), text.font_size());

    ui.menu_button("Justify", |ui| {
        for justify in Justify::ALL {
            if ui
                .radio(current_justify == justify, justify.label())
                .clicked()
            {
                app.execute(Command::SetJustify(justify));
                ui.close_menu();
            }
        }
    });

    ui.menu_button("Font Size", |ui| {
        for size in FONT_SIZES {
            if ui.radio(current_size == size, size.to_string()).clicked() {
                app.execute(Command::SetFontSize(size));
                ui.close_menu();
            }
        }
    });

    ui.separator();
    if ui.button("Restore Defaults").clicked() {
        app.execute(Command::SetFontSize(DEFAULT_FONT_SIZE));
        app.execute(Command::SetJustify(Justify::default()));
        app.execute(Command::SetTextColor(Color32::BLACK));
        ui.close_menu();
    }
}

fn stamper_menu(app: &mut SayingsApp, ui: &mut Ui) {
    let selected = app.selected_palette();
    let mut choice = None;

    if ui.radio(selected.is_none(), "No Stamp").clicked() {
        choice = Some(None);
    }
    for (index, entry) in app.palette().iter().enumerate() {
        if ui.radio(selected == Some(index), &entry.name).clicked() {
            choice = Some(Some(index));
        }
    }
    if app.palette().is_empty() {
        ui.label("No icons found");
    }

    if let Some(index) = choice {
        app.select_palette(index);
        ui.close_menu();
    }

    ui.separator();
    if ui
        .button("Remove All Stamps")
        .on_hover_text("Remove every stamp from the picture.")
        .clicked()
    {
        app.clear_stamps();
        ui.close_menu();
    }
}
