use crate::app::SayingsApp;
use crate::command::{CommandId, IconSource, TOOLBAR};
use crate::components::{ButtonFace, ToolButton};

pub fn background_toolbar(app: &mut SayingsApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("background_toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            for entry in TOOLBAR {
                let Some(id) = entry else {
                    ui.separator();
                    continue;
                };
                let face = command_face(app, ui.ctx(), id);
                if ToolButton::new(face, id.tooltip(), false).show(ui).clicked() {
                    app.trigger(id);
                }
            }
        });
    });
}

fn command_face(app: &mut SayingsApp, ctx: &egui::Context, id: CommandId) -> ButtonFace {
    match id.icon() {
        Some(IconSource::ColorSwatch) => ButtonFace::ColorSwatch,
        Some(icon) => app
            .icon_texture(ctx, icon)
            .map_or(ButtonFace::Text(id.label()), ButtonFace::Texture),
        None => ButtonFace::Text(id.label()),
    }
}

/// The stamp palette along the bottom edge. The selected icon is what a
/// press on empty canvas places.
pub fn palette_strip(app: &mut SayingsApp, ctx: &egui::Context) {
    if app.palette().is_empty() {
        return;
    }

    egui::TopBottomPanel::bottom("palette_strip").show(ctx, |ui| {
        let selected = app.selected_palette();
        let mut choice = None;

        ui.horizontal_wrapped(|ui| {
            let none = ToolButton::new(ButtonFace::Text("none"), "Pointer only: drag and resize stamps", selected.is_none());
            if none.show(ui).clicked() {
                choice = Some(None);
            }
            ui.separator();

            for (index, entry) in app.palette().iter().enumerate() {
                let button = ToolButton::new(
                    ButtonFace::Texture(entry.texture.id()),
                    entry.name.as_str(),
                    selected == Some(index),
                );
                if button.show(ui).clicked() {
                    choice = Some(Some(index));
                }
            }
        });

        if let Some(index) = choice {
            app.select_palette(index);
        }
    });
}
