use egui::{Context, PointerButton, Pos2, Rect};

/// Pointer input already translated into canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Button pressed over the canvas
    PointerDown { pos: Pos2, button: PointerButton },
    /// Pointer moved, pressed or not. Reported outside the canvas too so a
    /// drag can carry a stamp past the edge.
    PointerMove { pos: Pos2 },
    PointerUp { pos: Pos2, button: PointerButton },
    /// Second primary press in quick succession
    DoubleClick { pos: Pos2 },
    /// The gesture was interrupted (focus loss)
    Cancel,
}

const BUTTONS: [PointerButton; 2] = [PointerButton::Primary, PointerButton::Secondary];

/// Converts raw egui input into [`InputEvent`]s for the canvas shown in `canvas_rect`.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    was_focused: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            last_pointer_pos: None,
            was_focused: true,
        }
    }

    /// Collect this frame's events. `canvas_rect` is where the canvas is drawn
    /// on screen; one screen point maps to one canvas pixel.
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let to_canvas = |pos: Pos2| Pos2::new(pos.x - canvas_rect.min.x, pos.y - canvas_rect.min.y);

        ctx.input(|input| {
            if self.was_focused && !input.focused {
                events.push(InputEvent::Cancel);
            }
            self.was_focused = input.focused;

            let Some(pos) = input.pointer.interact_pos() else {
                self.last_pointer_pos = None;
                return;
            };

            for button in BUTTONS {
                if input.pointer.button_pressed(button) && canvas_rect.contains(pos) {
                    events.push(InputEvent::PointerDown {
                        pos: to_canvas(pos),
                        button,
                    });
                }
            }

            if Some(pos) != self.last_pointer_pos {
                events.push(InputEvent::PointerMove { pos: to_canvas(pos) });
                self.last_pointer_pos = Some(pos);
            }

            for button in BUTTONS {
                if input.pointer.button_released(button) {
                    events.push(InputEvent::PointerUp {
                        pos: to_canvas(pos),
                        button,
                    });
                }
            }

            if input.pointer.button_double_clicked(PointerButton::Primary) && canvas_rect.contains(pos) {
                events.push(InputEvent::DoubleClick { pos: to_canvas(pos) });
            }
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Event, RawInput};

    fn canvas_rect() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 50.0), egui::vec2(200.0, 200.0))
    }

    fn run_frame(
        ctx: &Context,
        handler: &mut InputHandler,
        time: f64,
        focused: bool,
        events: Vec<Event>,
    ) -> Vec<InputEvent> {
        let raw = RawInput {
            time: Some(time),
            focused,
            events,
            ..Default::default()
        };
        let mut out = Vec::new();
        let _ = ctx.run(raw, |ctx| {
            out = handler.process_input(ctx, canvas_rect());
        });
        out
    }

    fn button(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Default::default(),
        }
    }

    #[test]
    fn test_press_translated_to_canvas_space() {
        let ctx = Context::default();
        let mut handler = InputHandler::new();
        let screen = Pos2::new(130.0, 70.0);

        let events = run_frame(&ctx, &mut handler, 0.0, true, vec![Event::PointerMoved(screen), button(screen, true)]);
        assert!(events.contains(&InputEvent::PointerDown {
            pos: Pos2::new(30.0, 20.0),
            button: PointerButton::Primary,
        }));
        assert!(events.contains(&InputEvent::PointerMove { pos: Pos2::new(30.0, 20.0) }));
    }

    #[test]
    fn test_press_outside_canvas_ignored() {
        let ctx = Context::default();
        let mut handler = InputHandler::new();
        let screen = Pos2::new(20.0, 20.0);

        let events = run_frame(&ctx, &mut handler, 0.0, true, vec![Event::PointerMoved(screen), button(screen, true)]);
        assert!(!events.iter().any(|e| matches!(e, InputEvent::PointerDown { .. })));
    }

    #[test]
    fn test_double_click_follows_release() {
        let ctx = Context::default();
        let mut handler = InputHandler::new();
        let screen = Pos2::new(150.0, 100.0);
        let local = Pos2::new(50.0, 50.0);

        run_frame(&ctx, &mut handler, 0.0, true, vec![Event::PointerMoved(screen)]);
        run_frame(&ctx, &mut handler, 0.05, true, vec![button(screen, true)]);
        let first = run_frame(&ctx, &mut handler, 0.1, true, vec![button(screen, false)]);
        assert!(!first.iter().any(|e| matches!(e, InputEvent::DoubleClick { .. })));

        run_frame(&ctx, &mut handler, 0.15, true, vec![button(screen, true)]);
        let second = run_frame(&ctx, &mut handler, 0.2, true, vec![button(screen, false)]);
        assert_eq!(
            &second[second.len() - 2..],
            &[
                InputEvent::PointerUp {
                    pos: local,
                    button: PointerButton::Primary,
                },
                InputEvent::DoubleClick { pos: local },
            ]
        );
    }

    #[test]
    fn test_focus_loss_cancels() {
        let ctx = Context::default();
        let mut handler = InputHandler::new();

        let focused = run_frame(&ctx, &mut handler, 0.0, true, Vec::new());
        assert!(!focused.contains(&InputEvent::Cancel));

        let lost = run_frame(&ctx, &mut handler, 0.1, false, Vec::new());
        assert_eq!(lost.first(), Some(&InputEvent::Cancel));

        let still_lost = run_frame(&ctx, &mut handler, 0.2, false, Vec::new());
        assert!(!still_lost.contains(&InputEvent::Cancel));
    }
}
