//! Assembles the printable parts from the key layout.
//!
//! Everything is built in memory. Nothing here touches the filesystem.

use std::fmt;

use tracing::{debug, instrument};

use crate::error::Result;
use crate::key::grid::{connect_grid, connect_horizontal, patch_union, Patch};
use crate::key::Key;
use crate::layout::KeyLayout;
use crate::math::{Point2D, Point3D, Unit};
use crate::shape::builders::{cuboid_from_to, frame_2d, ring_2d, square_from_to};
use crate::shape::Shape;
use crate::transform::Frame;
use crate::wall::{build_wall, WallConfig};

pub mod screw;

use screw::ScrewInsert;

/// Thickness of the bottom plate.
const BOTTOM_PLATE_THICKNESS: Unit = 1.5;

/// Keys printed on their own to check switch fit.
const TEST_KEYS: [&str; 4] = ["e", "d", "r", "t"];

/// Preview color of the key caps.
const CAP_COLOR: &str = "red";

/// What to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum GenerationMode {
    /// Case halves, bottom plates and accessories.
    #[default]
    Case,
    /// As [`GenerationMode::Case`], with key caps on the case for previews.
    CaseWithCaps,
    /// A few switch plates on their own.
    TestKeys,
    /// The test switch plates with caps.
    TestKeysWithCaps,
    /// The top surface of the plate as bare facets.
    Surface,
}

impl GenerationMode {
    fn with_caps(self) -> bool {
        matches!(self, Self::CaseWithCaps | Self::TestKeysWithCaps)
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Case => "case",
            Self::CaseWithCaps => "case-with-caps",
            Self::TestKeys => "test-keys",
            Self::TestKeysWithCaps => "test-keys-with-caps",
            Self::Surface => "surface",
        })
    }
}

/// One output file worth of geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// File stem.
    pub name: String,
    /// The root shape.
    pub shape: Shape,
}

impl Part {
    /// Names a shape.
    pub fn new(name: &str, shape: Shape) -> Self {
        Self {
            name: name.to_string(),
            shape,
        }
    }
}

/// Builds every part for `mode`.
#[instrument]
pub fn generate(mode: GenerationMode) -> Result<Vec<Part>> {
    let layout = KeyLayout::dactyl(&KeyLayout::default_origin())?;
    let parts = match mode {
        GenerationMode::TestKeys | GenerationMode::TestKeysWithCaps => {
            vec![Part::new("test_keys", test_keys(&layout, mode.with_caps())?)]
        }
        GenerationMode::Surface => vec![Part::new("surface", surface(&layout)?)],
        GenerationMode::Case | GenerationMode::CaseWithCaps => {
            let body = case_body(&layout)?;
            let bottom = bottom_plate(&layout, &body)?;
            let case = if mode.with_caps() {
                let mut shapes = vec![body];
                for key in layout.all_keys() {
                    shapes.push(key.cap()?.color(CAP_COLOR)?);
                }
                Shape::union(shapes)?
            } else {
                body
            };
            vec![
                Part::new("case_left", case.clone()),
                Part::new("case_right", case.mirror_x()),
                Part::new("bottom_left", bottom.clone()),
                Part::new("bottom_right", bottom.mirror_x()),
                Part::new("trrs", trrs()?),
                Part::new("trrs_front", trrs_front()?),
                Part::new("cover", cover()?),
                Part::new("usbc", usbc()?),
            ]
        }
    };
    debug!(parts = parts.len(), "generated parts");
    Ok(parts)
}

/// Switch plates for a handful of keys, lifted and without nubs.
pub fn test_keys(layout: &KeyLayout, with_caps: bool) -> Result<Shape> {
    let mut shapes = Vec::new();
    for name in TEST_KEYS {
        let key = layout.key(name)?.clone().with_side_nub(false).with_extra_z(4.);
        shapes.push(key.switch()?);
        if with_caps {
            shapes.push(key.cap()?.color(CAP_COLOR)?);
        }
    }
    Shape::union(shapes)
}

/// The plate between the thumb keys.
fn thumb_plate(layout: &KeyLayout) -> Vec<Patch> {
    let t = layout.thumbs();
    let mut patches = t
        .iter()
        .zip(t.iter().skip(1))
        .map(|(l, r)| connect_horizontal(l, r))
        .collect::<Vec<_>>();
    for (l, r) in t.iter().zip(t.iter().skip(1)).take(2) {
        patches.push(Patch::triangle(l.top_left(), l.top_right(), r.top_left()));
    }
    patches
}

/// Hand-placed fans closing the gaps between the grid and the thumb plate.
fn fill_patches(layout: &KeyLayout) -> Result<Vec<Patch>> {
    let k = |name: &str| layout.key(name);
    let lowered = |key: &Key, frame: fn(&Key) -> Frame| frame(key).translate_local(0., 0., -1.);
    let slash_br = layout.slash_bottom_right()?;
    let right_br = layout.right_arrow_bottom_right()?;
    let (b, thumb1, thumb2) = (k("b")?, k("thumb1")?, k("thumb2")?);

    Ok(vec![
        Patch::fan(
            thumb2.top_left(),
            vec![b.bottom_right(), b.top_right(), k("g")?.bottom_right()],
        )?,
        Patch::fan(
            thumb1.top_left(),
            vec![
                right_br.clone(),
                lowered(k("right_arrow")?, Key::bottom_left),
                lowered(k("left_arrow")?, Key::bottom_right),
                lowered(k("left_arrow")?, Key::bottom_left),
                slash_br.clone(),
                thumb1.bottom_left(),
            ],
        )?,
        Patch::fan(
            thumb1.top_right(),
            vec![
                thumb1.top_left(),
                right_br.clone(),
                b.bottom_right(),
                thumb2.top_left(),
            ],
        )?,
        Patch::fan(
            thumb2.top_right(),
            vec![thumb2.top_left(), b.bottom_right(), k("thumb3")?.top_left()],
        )?,
        Patch::fan(
            b.bottom_left(),
            vec![
                b.bottom_right(),
                right_br,
                k("right_arrow")?.top_right(),
                k("v")?.bottom_right(),
            ],
        )?,
        Patch::fan(
            k("tilde")?.bottom_right(),
            vec![k("slash")?.bottom_left(), slash_br],
        )?,
        // Bottom-left corner of the grid.
        Patch::fan(
            k("shift")?.bottom_right(),
            vec![
                k("z")?.bottom_left(),
                k("tilde")?.top_left(),
                k("tilde")?.bottom_left(),
                k("shift")?.bottom_left(),
            ],
        )?,
    ])
}

/// A point on the ground below `frame`'s origin, nudged by `(dx, dy)`.
fn on_ground(frame: &Frame, dx: Unit, dy: Unit) -> Point3D {
    let o = frame.origin();
    Point3D::new(o.x + dx, o.y + dy, 0.)
}

/// Where the screw inserts go.
pub fn screw_points(layout: &KeyLayout) -> Result<Vec<Point3D>> {
    Ok(vec![
        on_ground(&layout.key("tab")?.top_left(), 2.8, -0.5),
        on_ground(&layout.key("t")?.top_right(), -0.8, -0.5),
        on_ground(&layout.key("thumb3")?.top_left(), 0., -0.9),
        on_ground(&layout.key("thumb1")?.bottom_left(), 1.4, 2.3),
        on_ground(&layout.key("shift")?.bottom_left(), 3.2, 0.),
    ])
}

/// Openings in the back wall for the cables.
fn cable_cutouts(layout: &KeyLayout) -> Result<Vec<Shape>> {
    let half = Point3D::new(5., 10., 5.);
    let cutout = |frame: Frame, dx: Unit| {
        let o = frame.origin();
        let center = Point3D::new(o.x + dx, o.y, 12.);
        cuboid_from_to(center - half, center + half)
    };
    Ok(vec![
        cutout(layout.key("r")?.top_left(), 9.75),
        cutout(layout.key("t")?.top_left(), 10.5),
    ])
}

/// The left case: plate, wall, switch cutouts and screw bosses, minus
/// the screw holes and cable openings.
#[instrument(skip_all)]
pub fn case_body(layout: &KeyLayout) -> Result<Shape> {
    let connectors = connect_grid(layout.grid());
    let fills = fill_patches(layout)?;
    let wall = build_wall(&layout.wall_points()?, &WallConfig::default())?;

    let insert = ScrewInsert::default();
    let screws = screw_points(layout)?;

    let mut shapes = vec![
        patch_union(&thumb_plate(layout))?.commented("thumb plate"),
        patch_union(&connectors)?.commented("key connectors"),
        patch_union(&fills)?.commented("fills"),
        wall.to_shape()?.commented("wall"),
    ];
    for key in layout.all_keys() {
        shapes.push(key.switch()?);
    }
    shapes.push(Shape::union(insert.bosses(&screws))?.commented("screw inserts"));

    let mut negative = insert.holes(&screws);
    negative.extend(cable_cutouts(layout)?);

    debug!(
        connectors = connectors.len(),
        fills = fills.len(),
        wall_slices = wall.slices().len(),
        "assembled case"
    );
    Shape::union(shapes)?.subtract(vec![Shape::union(negative)?])
}

/// The flat bottom plate under `case`, with the screw holes.
pub fn bottom_plate(layout: &KeyLayout, case: &Shape) -> Result<Shape> {
    let footprint = std::iter::once(case.clone())
        .chain(layout.all_keys().map(Key::plate_block))
        .collect::<Vec<_>>();
    let holes = ScrewInsert::default().holes(&screw_points(layout)?);
    Shape::union(footprint)?
        .projection()?
        .linear_extrude(BOTTOM_PLATE_THICKNESS)?
        .subtract(vec![Shape::union(holes)?])
}

/// The top surface as single-sided facets.
pub fn surface(layout: &KeyLayout) -> Result<Shape> {
    let patches = layout
        .all_keys()
        .map(Key::top_patch)
        .chain(thumb_plate(layout))
        .chain(connect_grid(layout.grid()))
        .chain(fill_patches(layout)?)
        .collect::<Vec<_>>();
    Shape::union(
        patches
            .iter()
            .map(Patch::facet)
            .collect::<Result<Vec<_>>>()?,
    )
}

/// Mount for a TRRS jack.
pub fn trrs() -> Result<Shape> {
    const DEPTH: Unit = 13.;
    const WIDTH: Unit = 10.;
    const MID_HEIGHT: Unit = 5.75;
    const BOTTOM_PLATE_HEIGHT: Unit = 2.;
    const BACK_HEIGHT: Unit = MID_HEIGHT + 6.;
    // The clamps sit 2 off the jack's center line, not half of their 5 width.
    const CLAMP_OFFSET: Unit = 2.;

    let block = |x, y, z| Shape::cube_centered(Point3D::new(x, y, z));
    Shape::union(vec![
        block(WIDTH, 5., 2.).translate(Point3D::new(0., CLAMP_OFFSET + MID_HEIGHT + 1., 1.)),
        block(WIDTH, 2., DEPTH).translate(Point3D::new(0., -1. - BOTTOM_PLATE_HEIGHT, DEPTH / 2.)),
        block(WIDTH, 5., 2.).translate(Point3D::new(0., -(CLAMP_OFFSET + 3.), 1.)),
        block(WIDTH, 2., DEPTH).translate(Point3D::new(0., 1. + MID_HEIGHT, DEPTH / 2.)),
        block(WIDTH, BACK_HEIGHT, 2.).translate(Point3D::new(0., BACK_HEIGHT / 2. - 4., 1. + DEPTH)),
    ])
}

/// Bezel around the TRRS jack opening.
pub fn trrs_front() -> Result<Shape> {
    ring_2d(9.8 / 2., 3., 20)?.linear_extrude(1.)
}

/// Blank cover for an unused opening.
pub fn cover() -> Result<Shape> {
    square_from_to(Point2D::new(-6.5, -6.5), Point2D::new(6.5, 6.5)).linear_extrude(1.)
}

/// Adapter for a USB-C breakout.
pub fn usbc() -> Result<Shape> {
    frame_2d(Point2D::new(11.8, 7.4), 4.)?.linear_extrude(7.)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> KeyLayout {
        KeyLayout::dactyl(&KeyLayout::default_origin()).unwrap()
    }

    fn names(parts: &[Part]) -> Vec<&str> {
        parts.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_case_parts() {
        let parts = generate(GenerationMode::Case).unwrap();
        assert_eq!(
            names(&parts),
            [
                "case_left",
                "case_right",
                "bottom_left",
                "bottom_right",
                "trrs",
                "trrs_front",
                "cover",
                "usbc"
            ]
        );
        let left = &parts[0].shape;
        assert_eq!(parts[1].shape, left.clone().mirror_x());
        assert_eq!(parts[1].shape.clone().mirror_x(), *left);

        let code = left.to_code();
        assert!(code.starts_with("difference() {\n  union() {\n    /* thumb plate */\n"));
        assert_eq!(code.matches("/* switch ").count(), 26);
        assert!(!code.contains("color("));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let render = |mode| {
            generate(mode)
                .unwrap()
                .iter()
                .map(|p| p.shape.to_code())
                .collect::<Vec<_>>()
        };
        assert_eq!(render(GenerationMode::Case), render(GenerationMode::Case));
        assert_eq!(render(GenerationMode::Surface), render(GenerationMode::Surface));
    }

    #[test]
    fn test_caps_mode() {
        let parts = generate(GenerationMode::CaseWithCaps).unwrap();
        let code = parts[0].shape.to_code();
        assert_eq!(code.matches("color(").count(), 26);
        // The bottom plate does not depend on the caps.
        let plain = generate(GenerationMode::Case).unwrap();
        assert_eq!(parts[2], plain[2]);
    }

    #[test]
    fn test_test_keys_mode() {
        let parts = generate(GenerationMode::TestKeys).unwrap();
        assert_eq!(names(&parts), ["test_keys"]);
        let code = parts[0].shape.to_code();
        assert_eq!(code.matches("/* switch ").count(), TEST_KEYS.len());
        assert!(!code.contains("cylinder"));
        assert!(!code.contains("/* cap "));

        let with_caps = generate(GenerationMode::TestKeysWithCaps).unwrap();
        let code = with_caps[0].shape.to_code();
        assert_eq!(code.matches("/* cap ").count(), TEST_KEYS.len());
    }

    #[test]
    fn test_surface_mode() {
        let parts = generate(GenerationMode::Surface).unwrap();
        assert_eq!(names(&parts), ["surface"]);
        let code = parts[0].shape.to_code();
        assert!(!code.contains("hull()"));
        // 26 key tops, 5 thumb pieces, 18 + 16 + 13 connectors, 7 fills.
        assert_eq!(code.matches("polyhedron(").count(), 26 + 5 + 47 + 7);
    }

    #[test]
    fn test_bottom_plate() {
        let layout = layout();
        let body = case_body(&layout).unwrap();
        let code = bottom_plate(&layout, &body).unwrap().to_code();
        assert!(code.starts_with(
            "difference() {\n  linear_extrude(height = 1.5)\n    projection("
        ));
        assert_eq!(code.matches("cylinder(h = 7, d = 4.4, center = true, $fn = 30);").count(), 5);
    }

    #[test]
    fn test_screw_points_on_ground() {
        let points = screw_points(&layout()).unwrap();
        assert_eq!(points.len(), 5);
        assert!(points.iter().all(|p| p.z == 0.));
    }

    #[test]
    fn test_accessories() {
        assert_eq!(
            cover().unwrap().to_code(),
            r"linear_extrude(height = 1)
  /* square_from_to([-6.5, -6.5], [6.5, 6.5]) */
  translate([-6.5, -6.5])
    square(size = [13, 13]);
"
        );
        assert_eq!(
            trrs_front().unwrap().to_code(),
            r"linear_extrude(height = 1)
  difference() {
    circle(r = 7.9, $fn = 20);
    circle(r = 4.9, $fn = 20);
  }
"
        );
        assert_eq!(
            usbc().unwrap().to_code(),
            r"linear_extrude(height = 7)
  difference() {
    square(size = [19.8, 15.4], center = true);
    square(size = [11.8, 7.4], center = true);
  }
"
        );
        let trrs = trrs().unwrap().to_code();
        assert!(trrs.contains("  translate([0, 8.75, 1])\n    cube(size = [10, 5, 2], center = true);\n"));
        assert!(trrs.contains("  translate([0, -5, 1])\n    cube(size = [10, 5, 2], center = true);\n"));
        assert!(trrs.contains("  translate([0, 1.875, 14])\n    cube(size = [10, 11.75, 2], center = true);\n"));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(GenerationMode::TestKeysWithCaps.to_string(), "test-keys-with-caps");
        assert_eq!(GenerationMode::default(), GenerationMode::Case);
    }
}
