use egui::color_picker::{self, Alpha};
use egui::Align2;

use crate::app::{Prompt, SayingsApp};

pub fn prompt_window(app: &mut SayingsApp, ctx: &egui::Context) {
    let Some(prompt) = app.prompt_mut() else {
        return;
    };

    let mut decision = None;
    egui::Window::new(prompt.title())
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            match prompt {
                Prompt::SaveImage { path } => {
                    ui.label("The output file name must end with .png or .jpeg.");
                    ui.text_edit_singleline(path);
                }
                Prompt::CustomBackground { path } => {
                    ui.label("Image file:");
                    ui.text_edit_singleline(path);
                }
                Prompt::Color { color } => {
                    color_picker::color_picker_color32(ui, color, Alpha::Opaque);
                }
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    decision = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    decision = Some(false);
                }
            });
        });

    if let Some(accepted) = decision {
        app.finish_prompt(accepted);
    }
}

pub fn error_window(app: &mut SayingsApp, ctx: &egui::Context) {
    let Some(message) = app.error_message().map(str::to_owned) else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new("Sorry")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(message);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        app.dismiss_error();
    }
}
