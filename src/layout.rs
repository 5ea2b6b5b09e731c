//! The left-hand key layout and its perimeter.
//!
//! Home-row keys are chained from `d` outwards, the rest of each column sits
//! one bowl step along the column's arc, and the four thumb keys are chained
//! from the origin. Every key is measured from the top of its cap and then
//! moved down onto the switch top once the whole layout is placed.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Error, Result};
use crate::key::grid::KeyGrid;
use crate::key::{EdgeExtras, Key, KeyConfig, KEY_PITCH, SWITCH_Z_OFFSET};
use crate::math::Unit;
use crate::transform::Frame;
use crate::wall::{Direction, WallPoint};

const D_COLUMN_RADIUS: Unit = 55.;
const A_COLUMN_RADIUS: Unit = 70.;
const S_COLUMN_RADIUS: Unit = 65.;
const G_COLUMN_RADIUS: Unit = 65.;
const F_COLUMN_RADIUS: Unit = 70.;
const CAPS_COLUMN_RADIUS: Unit = 60.;

/// Step from one thumb key to the next along the thumb's x axis.
const THUMB_STEP: Unit = KEY_PITCH + 3.55;

/// Plate widening around the thumb cluster and the right-hand column.
///
/// The outer column and the top row of the grid are widened separately,
/// once the grid is assembled.
fn edge_extras(name: &str) -> EdgeExtras {
    let mut extra = EdgeExtras::NONE;
    match name {
        "thumb1" => {
            extra.bottom = 2.;
            extra.left = 2.;
        }
        "thumb2" | "thumb3" => {
            extra.top = 2.;
            extra.bottom = 2.;
        }
        "thumb4" => {
            extra.top = 2.;
            extra.right = 2.;
            extra.bottom = 2.;
        }
        "t" => extra.right = 2.,
        "g" => extra.right = 3.,
        "b" => {
            extra.right = 3.;
            extra.bottom = 3.;
        }
        _ => {}
    }
    extra
}

/// Widens the left edge of the first column and the top edge of the first
/// row.
fn widen_outer_edges(grid: KeyGrid) -> KeyGrid {
    let names = |cells: Vec<Option<&Key>>| {
        cells
            .into_iter()
            .flatten()
            .map(|k| k.name().to_string())
            .collect::<HashSet<_>>()
    };
    let first_column = names(grid.column(0).collect());
    let first_row = names(grid.row(0).collect());
    grid.map_keys(|key| {
        let mut extra = key.extra();
        if first_column.contains(key.name()) {
            extra.left = 4.;
        }
        if first_row.contains(key.name()) {
            extra.top = 2.;
        }
        key.with_extra(extra)
    })
}

/// Every key of one half of the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyLayout {
    thumbs: Vec<Key>,
    grid: KeyGrid,
}

impl KeyLayout {
    /// The origin the layout was measured from.
    pub fn default_origin() -> Frame {
        Frame::new().translate(-20., -40., 3.)
    }

    /// Places every key relative to `origin`.
    pub fn dactyl(origin: &Frame) -> Result<Self> {
        let config = |name: &str| KeyConfig::new(name).extra(edge_extras(name));
        let on_arc = |name: &str, parent: &Key, radius: Unit, up: bool| {
            Key::new(config(name).parent_key(parent).on_arc(radius, up))
        };

        let thumb1 = Key::new(
            config("thumb1")
                .parent(origin)
                .position(43.25, -17.5, 35.8)
                .rotation(18., 0., -11.),
        );
        let thumb_after = |name: &str, previous: &Key| {
            Key::new(
                config(name)
                    .parent_key(previous)
                    .position(THUMB_STEP, -1.35, 0.)
                    .rotation(0., 0., -7.),
            )
        };
        let thumb2 = thumb_after("thumb2", &thumb1);
        let thumb3 = thumb_after("thumb3", &thumb2);
        let thumb4 = thumb_after("thumb4", &thumb3);

        // Home row, chained from d.
        let d = Key::new(
            config("d")
                .parent(origin)
                .position(26.40, 50.32, 17.87)
                .rotation(0., -15., 0.),
        );
        let f = Key::new(
            config("f")
                .parent_key(&d)
                .position(19.938, -0.950, 5.249)
                .rotation(0., -5., 0.),
        );
        let g = Key::new(
            config("g")
                .parent_key(&f)
                .position(18.65, -1.310, 3.305)
                .rotation(0., -10., 0.),
        );
        let s = Key::new(
            config("s")
                .parent_key(&d)
                .position(-19.571, -0.090, 5.430)
                .rotation(0., 5., 0.),
        );
        let a = Key::new(
            config("a")
                .parent_key(&s)
                .position(-20.887, -6.170, 5.358),
        );
        let caps = Key::new(
            config("caps")
                .parent_key(&a)
                .position(-22.597, 4.000, 0.207)
                .rotation(0., 5., 0.),
        );

        let e = on_arc("e", &d, D_COLUMN_RADIUS, true);
        let c = on_arc("c", &d, D_COLUMN_RADIUS, false);
        let left_arrow = on_arc("left_arrow", &c, D_COLUMN_RADIUS, false);

        let w = on_arc("w", &s, S_COLUMN_RADIUS, true);
        let x = on_arc("x", &s, S_COLUMN_RADIUS, false);
        let slash = on_arc("slash", &x, S_COLUMN_RADIUS, false);

        let r = on_arc("r", &f, F_COLUMN_RADIUS, true);
        let v = on_arc("v", &f, F_COLUMN_RADIUS, false);
        let right_arrow = on_arc("right_arrow", &v, F_COLUMN_RADIUS, false);

        let t = on_arc("t", &g, G_COLUMN_RADIUS, true);
        let b = on_arc("b", &g, G_COLUMN_RADIUS, false);

        let q = on_arc("q", &a, A_COLUMN_RADIUS, true);
        let z = on_arc("z", &a, A_COLUMN_RADIUS, false);
        let tilde = on_arc("tilde", &z, A_COLUMN_RADIUS, false);

        let tab = on_arc("tab", &caps, CAPS_COLUMN_RADIUS, true);
        let shift = on_arc("shift", &caps, CAPS_COLUMN_RADIUS, false);

        let to_switch_top = |key: Key| key.with_origin_correction(-SWITCH_Z_OFFSET);
        let grid = widen_outer_edges(KeyGrid::new(vec![
            vec![Some(tab), Some(q), Some(w), Some(e), Some(r), Some(t)],
            vec![Some(caps), Some(a), Some(s), Some(d), Some(f), Some(g)],
            vec![Some(shift), Some(z), Some(x), Some(c), Some(v), Some(b)],
            vec![None, Some(tilde), Some(slash), Some(left_arrow), Some(right_arrow), None],
        ])?)
        .map_keys(to_switch_top);
        let thumbs = [thumb1, thumb2, thumb3, thumb4]
            .into_iter()
            .map(to_switch_top)
            .collect::<Vec<_>>();

        let layout = Self { thumbs, grid };
        debug!(keys = layout.all_keys().count(), "placed key layout");
        Ok(layout)
    }

    /// The thumb keys, inner to outer.
    pub fn thumbs(&self) -> &[Key] {
        &self.thumbs
    }

    /// The main key grid.
    pub fn grid(&self) -> &KeyGrid {
        &self.grid
    }

    /// Thumb keys first, then the grid row by row.
    pub fn all_keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.thumbs.iter().chain(self.grid.keys())
    }

    /// Looks a key up by name.
    pub fn key(&self, name: &str) -> Result<&Key> {
        self.thumbs
            .iter()
            .find(|k| k.name() == name)
            .or_else(|| self.grid.find(name))
            .ok_or_else(|| Error::UnknownKey(name.to_string()))
    }

    /// The bottom-right corner of `slash`, dropped to soften the step down
    /// to the thumb cluster.
    pub fn slash_bottom_right(&self) -> Result<Frame> {
        Ok(self.key("slash")?.bottom_right().translate_local(0., 0., -1.))
    }

    /// The bottom-right corner of `right_arrow`, dropped towards the thumb
    /// plate.
    pub fn right_arrow_bottom_right(&self) -> Result<Frame> {
        Ok(self
            .key("right_arrow")?
            .bottom_right()
            .translate_local(0., 0., -3.))
    }

    /// The clockwise perimeter, starting at the top-left corner of `tab`.
    pub fn wall_points(&self) -> Result<Vec<WallPoint>> {
        use Direction::{Down, Left, Right, Up};

        let k = |name: &str| self.key(name);
        let wp = WallPoint::new;

        let points = vec![
            wp(k("tab")?.top_left(), Up),
            wp(k("tab")?.top_right(), Up).with_extra(0., 0.3),
            wp(k("q")?.top_left(), Up).with_extra(0., 0.5),
            wp(k("q")?.top_right().rotate_local(0., 0., 30.), Up).with_extra(0., 1.),
            wp(k("w")?.top_left(), Up).with_extra(0., 0.3),
            wp(k("w")?.top_right(), Up),
            wp(k("e")?.top_left(), Up),
            wp(k("e")?.top_right(), Up),
            wp(k("r")?.top_left(), Up),
            wp(k("r")?.top_right(), Up),
            wp(k("t")?.top_right(), Up),
            wp(k("t")?.top_right(), Right),
            wp(k("t")?.bottom_right(), Right),
            wp(k("g")?.top_right(), Right),
            wp(k("g")?.bottom_right(), Right).with_extra(1., 0.5),
            wp(k("b")?.top_right(), Right).with_extra(1., 0.5),
            wp(k("b")?.bottom_right(), Right).with_extra(1., 0.5),
            // Thumb plate.
            wp(k("thumb3")?.top_left().rotate_local(0., 0., -25.), Up).with_extra(1., 0.5),
            wp(k("thumb3")?.top_right(), Up).with_extra(1., 0.5),
            wp(k("thumb4")?.top_left(), Up).with_extra(1., 0.5),
            wp(k("thumb4")?.top_right(), Up).with_extra(1., 0.5),
            wp(k("thumb4")?.top_right(), Right).with_extra(1., 0.5),
            wp(k("thumb4")?.bottom_right(), Right).with_extra(1., 0.5),
            wp(k("thumb4")?.bottom_right(), Down).with_extra(1., 0.5),
            wp(k("thumb4")?.bottom_left(), Down).with_extra(1., 0.5),
            wp(k("thumb3")?.bottom_right(), Down).with_extra(1., 0.5),
            wp(k("thumb3")?.bottom_left(), Down).with_extra(1., 0.5),
            wp(k("thumb2")?.bottom_right(), Down).with_extra(1., 0.5),
            wp(k("thumb2")?.bottom_left(), Down).with_extra(1., 0.5),
            wp(k("thumb1")?.bottom_right(), Down).with_extra(1., 0.5),
            wp(k("thumb1")?.bottom_left().rotate_local(0., 0., 15.), Down).with_extra(1., 0.5),
            wp(k("thumb1")?.bottom_left(), Left).with_extra(1., 0.5),
            // Back on the main grid.
            wp(self.slash_bottom_right()?.rotate_local(0., 0., -25.), Down),
            wp(k("tilde")?.bottom_right(), Down),
            wp(k("tilde")?.bottom_left(), Down),
            wp(k("shift")?.bottom_left(), Down).with_extra(0., 0.75),
            wp(k("shift")?.bottom_left(), Left).with_extra(0., 0.5),
            wp(k("shift")?.top_left(), Left).with_extra(0., 0.5),
            wp(k("caps")?.bottom_left(), Left),
            wp(k("caps")?.top_left(), Left),
            wp(k("tab")?.bottom_left(), Left),
            wp(k("tab")?.top_left(), Left),
        ];
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3D;
    use crate::test_utils::assert_approx_eq_vec;
    use crate::wall::{validate_wall_points, WallConfig};

    /// Key names by grid cell.
    const GRID_NAMES: [[Option<&str>; 6]; 4] = [
        [Some("tab"), Some("q"), Some("w"), Some("e"), Some("r"), Some("t")],
        [Some("caps"), Some("a"), Some("s"), Some("d"), Some("f"), Some("g")],
        [Some("shift"), Some("z"), Some("x"), Some("c"), Some("v"), Some("b")],
        [
            None,
            Some("tilde"),
            Some("slash"),
            Some("left_arrow"),
            Some("right_arrow"),
            None,
        ],
    ];

    /// Thumb key names, inner to outer.
    const THUMB_NAMES: [&str; 4] = ["thumb1", "thumb2", "thumb3", "thumb4"];

    fn layout() -> KeyLayout {
        KeyLayout::dactyl(&KeyLayout::default_origin()).unwrap()
    }

    fn has_unique_names(layout: &KeyLayout) -> bool {
        let mut seen = HashSet::new();
        layout.all_keys().all(|k| seen.insert(k.name()))
    }

    #[test]
    fn test_key_count_and_names() {
        let layout = layout();
        assert_eq!(layout.all_keys().count(), 26);
        assert!(has_unique_names(&layout));
        assert_eq!(
            layout.thumbs().iter().map(Key::name).collect::<Vec<_>>(),
            THUMB_NAMES
        );
        for (r, row) in GRID_NAMES.iter().enumerate() {
            for (c, name) in row.iter().enumerate() {
                assert_eq!(layout.grid().get(r, c).map(Key::name), *name);
            }
        }
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            layout().key("enter"),
            Err(Error::UnknownKey("enter".to_string()))
        );
    }

    #[test]
    fn test_anchor_positions() {
        let layout = layout();
        assert_approx_eq_vec(
            layout.key("d").unwrap().frame().origin(),
            Point3D::new(6.4, 10.32, 10.87),
            1e-9,
        );
        assert_approx_eq_vec(
            layout.key("thumb1").unwrap().frame().origin(),
            Point3D::new(23.25, -57.5, 28.8),
            1e-9,
        );
        // Chained through caps and an arc step, with the left and top extras.
        assert_approx_eq_vec(
            layout.key("tab").unwrap().top_left().origin(),
            Point3D::new(-70.8092, 36.8446, 13.9314),
            1e-3,
        );
    }

    #[test]
    fn test_edge_extras() {
        let layout = layout();
        let extra = |name: &str| layout.key(name).unwrap().extra();
        assert_eq!(
            extra("tab"),
            EdgeExtras {
                top: 2.,
                left: 4.,
                ..EdgeExtras::NONE
            }
        );
        assert_eq!(
            extra("shift"),
            EdgeExtras {
                left: 4.,
                ..EdgeExtras::NONE
            }
        );
        assert_eq!(
            extra("t"),
            EdgeExtras {
                top: 2.,
                right: 2.,
                ..EdgeExtras::NONE
            }
        );
        assert_eq!(
            extra("b"),
            EdgeExtras {
                right: 3.,
                bottom: 3.,
                ..EdgeExtras::NONE
            }
        );
        assert_eq!(extra("d"), EdgeExtras::NONE);
        // The hole at the start of the last row widens nothing.
        assert_eq!(extra("tilde"), EdgeExtras::NONE);
        assert_eq!(
            extra("thumb4"),
            EdgeExtras {
                top: 2.,
                right: 2.,
                bottom: 2.,
                ..EdgeExtras::NONE
            }
        );
    }

    #[test]
    fn test_key_lookup_covers_thumbs_and_grid() {
        let layout = layout();
        assert_eq!(layout.key("thumb2").unwrap().name(), "thumb2");
        assert_eq!(layout.key("slash"), Ok(layout.grid().get(3, 2).unwrap()));
    }

    #[test]
    fn test_wall_points_form_a_valid_loop() {
        let layout = layout();
        let points = layout.wall_points().unwrap();
        assert_eq!(points.len(), 42);
        assert_eq!(points[0].direction, Direction::Up);
        assert_eq!(points[0].frame, layout.key("tab").unwrap().top_left());
        validate_wall_points(&points, &WallConfig::default()).unwrap();
    }

    #[test]
    fn test_layout_follows_origin() {
        let moved = KeyLayout::dactyl(&KeyLayout::default_origin().translate(0., 0., 5.)).unwrap();
        let base = layout();
        for (a, b) in base.all_keys().zip(moved.all_keys()) {
            assert_approx_eq_vec(
                b.frame().origin() - a.frame().origin(),
                Point3D::new(0., 0., 5.),
                1e-9,
            );
        }
    }
}
