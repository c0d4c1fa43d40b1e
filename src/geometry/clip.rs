use crate::{
    config,
    geometry::{Intersection, intersect_circle},
    render::Surface,
    types::{AttractorConfig, Vec2},
};

/// Returns the visible part of `from -> to`, or `None` when the segment lies
/// entirely outside the viewport circle.
///
/// The viewport can cut either end. The attractor only ever cuts the tail:
/// the segment stops where it first enters the attractor body.
pub fn clip_segment(
    from: Vec2,
    to: Vec2,
    viewport_radius: f64,
    attractor_size: f64,
) -> Option<(Vec2, Vec2)> {
    let (entry, exit) = match intersect_circle(from, to, viewport_radius) {
        Intersection::Secant(entry, exit) => (entry, exit),
        Intersection::None | Intersection::Tangent(_) => return None,
    };
    if exit.relative_position < 0.0 || entry.relative_position > 1.0 {
        return None;
    }

    let start = if entry.on_segment() { entry.pos } else { from };
    let end = if exit.on_segment() { exit.pos } else { to };

    let end = match intersect_circle(start, end, attractor_size) {
        Intersection::Tangent(p) | Intersection::Secant(p, _) if p.on_segment() => p.pos,
        _ => end,
    };

    Some((start, end))
}

pub fn draw_clipped<S: Surface + ?Sized>(
    surface: &mut S,
    from: Vec2,
    to: Vec2,
    attractor: &AttractorConfig,
) {
    let Some((start, end)) = clip_segment(from, to, config::VIEWPORT_RADIUS, attractor.size)
    else {
        return;
    };

    surface.begin_path();
    surface.move_to(start.x + config::RADIUS, start.y + config::RADIUS);
    surface.line_to(end.x + config::RADIUS, end.y + config::RADIUS);
    surface.stroke();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{Command, RecordingSurface};

    const EPS: f64 = 1e-9;
    const VIEWPORT: f64 = 100.0;
    const ATTRACTOR: f64 = 10.0;

    fn assert_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() < EPS,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    fn clip(from: (f64, f64), to: (f64, f64)) -> Option<(Vec2, Vec2)> {
        clip_segment(
            Vec2::new(from.0, from.1),
            Vec2::new(to.0, to.1),
            VIEWPORT,
            ATTRACTOR,
        )
    }

    mod clip_segment_fn {
        use super::*;

        #[test]
        fn segment_inside_ring_is_unchanged() {
            let (start, end) = clip((20.0, 50.0), (60.0, 50.0)).expect("visible");
            assert_close(start, Vec2::new(20.0, 50.0));
            assert_close(end, Vec2::new(60.0, 50.0));
        }

        #[test]
        fn segment_missing_viewport_is_dropped() {
            assert_eq!(clip((-200.0, 150.0), (200.0, 150.0)), None);
        }

        #[test]
        fn segment_tangent_to_viewport_is_dropped() {
            assert_eq!(clip((-200.0, 100.0), (200.0, 100.0)), None);
        }

        #[test]
        fn zero_length_segment_is_dropped() {
            assert_eq!(clip((30.0, 30.0), (30.0, 30.0)), None);
        }

        #[test]
        fn segment_outside_pointing_away_is_dropped() {
            assert_eq!(clip((120.0, 0.0), (150.0, 0.0)), None);
        }

        #[test]
        fn segment_outside_pointing_towards_is_dropped() {
            assert_eq!(clip((150.0, 0.0), (120.0, 0.0)), None);
        }

        #[test]
        fn entering_segment_starts_at_rim() {
            let (start, end) = clip((0.0, 150.0), (0.0, 50.0)).expect("visible");
            assert_close(start, Vec2::new(0.0, 100.0));
            assert_close(end, Vec2::new(0.0, 50.0));
        }

        #[test]
        fn leaving_segment_ends_at_rim() {
            let (start, end) = clip((-50.0, 0.0), (-150.0, 0.0)).expect("visible");
            assert_close(start, Vec2::new(-50.0, 0.0));
            assert_close(end, Vec2::new(-100.0, 0.0));
        }

        #[test]
        fn crossing_segment_is_clamped_at_both_ends() {
            let (start, end) = clip((-150.0, 50.0), (150.0, 50.0)).expect("visible");
            let half_chord = (VIEWPORT * VIEWPORT - 50.0 * 50.0).sqrt();
            assert_close(start, Vec2::new(-half_chord, 50.0));
            assert_close(end, Vec2::new(half_chord, 50.0));
        }

        #[test]
        fn attractor_occludes_tail() {
            let (start, end) = clip((50.0, 0.0), (-50.0, 0.0)).expect("visible");
            assert_close(start, Vec2::new(50.0, 0.0));
            assert_close(end, Vec2::new(ATTRACTOR, 0.0));
        }

        #[test]
        fn attractor_tangent_stops_segment() {
            let (_, end) = clip((-50.0, ATTRACTOR), (50.0, ATTRACTOR)).expect("visible");
            assert_close(end, Vec2::new(0.0, ATTRACTOR));
        }

        #[test]
        fn attractor_ahead_of_segment_does_not_clip() {
            let (start, end) = clip((60.0, 0.0), (30.0, 0.0)).expect("visible");
            assert_close(start, Vec2::new(60.0, 0.0));
            assert_close(end, Vec2::new(30.0, 0.0));
        }

        #[test]
        fn crossing_both_circles_stops_at_attractor_entry() {
            let (start, end) = clip((150.0, 0.0), (-150.0, 0.0)).expect("visible");
            assert_close(start, Vec2::new(VIEWPORT, 0.0));
            assert_close(end, Vec2::new(ATTRACTOR, 0.0));
        }
    }

    mod draw_clipped_fn {
        use super::*;

        #[test]
        fn emits_translated_line() {
            let mut surface = RecordingSurface::default();
            let attractor = AttractorConfig::from_size(ATTRACTOR);
            draw_clipped(
                &mut surface,
                Vec2::new(20.0, -40.0),
                Vec2::new(60.0, -40.0),
                &attractor,
            );
            assert_eq!(
                surface.commands,
                vec![
                    Command::BeginPath,
                    Command::MoveTo(20.0 + config::RADIUS, -40.0 + config::RADIUS),
                    Command::LineTo(60.0 + config::RADIUS, -40.0 + config::RADIUS),
                    Command::Stroke,
                ]
            );
        }

        #[test]
        fn invisible_segment_emits_nothing() {
            let mut surface = RecordingSurface::default();
            let attractor = AttractorConfig::default();
            draw_clipped(
                &mut surface,
                Vec2::new(1000.0, 0.0),
                Vec2::new(2000.0, 0.0),
                &attractor,
            );
            assert!(surface.commands.is_empty());
        }
    }
}
