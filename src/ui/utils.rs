use egui::Response;

/// Mouse wheel over `resp` steps `val` by `increment`, never below zero.
pub fn make_scrollable(ui: &mut egui::Ui, resp: Response, val: &mut f32, increment: f32) {
    if resp.hovered() {
        let delta = ui.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::MouseWheel {
                    unit: _,
                    delta,
                    modifiers: _,
                } => Some(*delta),
                _ => None,
            })
        });
        if let Some(delta) = delta {
            *val = step(*val, increment, delta.y);
        }
    }
}

fn step(val: f32, increment: f32, delta_y: f32) -> f32 {
    if delta_y > 0. {
        val + increment
    } else if delta_y < 0. && val - increment >= 0. {
        val - increment
    } else {
        val
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step() {
        assert_eq!(step(2.0, 0.5, 1.0), 2.5);
        assert_eq!(step(2.0, 0.5, -1.0), 1.5);
        assert_eq!(step(0.25, 0.5, -1.0), 0.25);
        assert_eq!(step(2.0, 0.5, 0.0), 2.0);
    }
}
