//! Validated CSG shapes on top of [`scadman`].
//!
//! A [`Shape`] wraps a [`ScadObject`] together with its dimension. Every
//! structural check (child counts, mixing 2D and 3D children, polyhedron
//! faces, color names) happens here, at construction, before the node is
//! handed to `scadman`. A shape that could be built always serializes to a
//! valid script.

use std::fmt::{self, Write};

use approx::abs_diff_eq;
use scadman::prelude::*;
use scadman::scad_sentence::Projection;

use crate::error::{Error, Result};
use crate::math::{is_approx_zero, is_finite3, Point2D, Point3D, Unit};

pub mod builders;

/// Dimension of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    /// A planar shape.
    Two,
    /// A solid.
    Three,
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Two => f.write_str("2D"),
            Self::Three => f.write_str("3D"),
        }
    }
}

/// A node of the CSG tree.
///
/// Two shapes are equal when they have the same dimension and serialize to
/// the same script.
#[derive(Clone)]
pub struct Shape {
    object: ScadObject,
    dim: Dim,
    empty: bool,
    /// The plane normal and the shape this one mirrors, if it is a mirror.
    mirror_of: Option<Box<(Point3D, Shape)>>,
}

/// Checks the number of `children` and finds their common dimension.
fn common_dim(op: &'static str, children: &[Shape], min: usize) -> Result<Dim> {
    if children.len() < min {
        return Err(Error::TooFewChildren {
            op,
            min,
            found: children.len(),
        });
    }
    let expected = children[0].dim;
    match children.iter().find(|c| c.dim != expected) {
        Some(c) => Err(Error::MixedDimensions {
            op,
            expected,
            found: c.dim,
        }),
        None => Ok(expected),
    }
}

fn objects(children: &[Shape]) -> Vec<ScadObject> {
    children.iter().map(|c| c.object.clone()).collect()
}

/// Plain color names (letters only) and `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`.
fn is_color_name(name: &str) -> bool {
    match name.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic()),
    }
}

impl Shape {
    fn new(object: ScadObject, dim: Dim) -> Self {
        Self {
            object,
            dim,
            empty: false,
            mirror_of: None,
        }
    }

    /// The dimension of the shape. The empty shape counts as a solid.
    pub fn dim(&self) -> Dim {
        self.dim
    }

    /// The shape with nothing in it, written as a childless `union()`.
    ///
    /// Combinators drop empty children, and transforming the empty shape
    /// leaves it empty.
    pub fn empty() -> Self {
        let none: [ScadObject; 0] = [];
        Self {
            empty: true,
            ..Self::new(modifier_3d(Union::new(), block_3d(&none)), Dim::Three)
        }
    }

    /// Whether this is [`Shape::empty`].
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// An axis-aligned box with one corner at the origin.
    ///
    /// # Panics
    ///
    /// Panics if any size component is not finite and positive.
    pub fn cube(size: Point3D) -> Self {
        assert!(
            is_finite3(&size) && size.iter().all(|&c| c > 0.),
            "cube size must be finite and positive"
        );
        Self::new(
            primitive_3d(Cube::build_with(|cb| {
                let _ = cb.size([size.x, size.y, size.z]);
            })),
            Dim::Three,
        )
    }

    /// An axis-aligned box centered on the origin.
    ///
    /// # Panics
    ///
    /// Panics if any size component is not finite and positive.
    pub fn cube_centered(size: Point3D) -> Self {
        assert!(
            is_finite3(&size) && size.iter().all(|&c| c > 0.),
            "cube size must be finite and positive"
        );
        Self::new(
            primitive_3d(Cube::build_with(|cb| {
                let _ = cb.size([size.x, size.y, size.z]).center(true);
            })),
            Dim::Three,
        )
    }

    /// A cylinder along the Z axis.
    ///
    /// # Arguments
    ///
    /// * `h` - The height.
    /// * `r` - The radius. Written out as the diameter `d = 2r`.
    /// * `center` - Whether the cylinder is centered on `z = 0` instead of
    ///   standing on it.
    /// * `segments` - The `$fn` resolution, if any.
    ///
    /// # Panics
    ///
    /// Panics if `h` or `r` is not finite and positive.
    pub fn cylinder(h: Unit, r: Unit, center: bool, segments: Option<u32>) -> Self {
        assert!(h.is_finite() && h > 0., "cylinder height must be finite and positive");
        assert!(r.is_finite() && r > 0., "cylinder radius must be finite and positive");
        Self::new(
            primitive_3d(Cylinder::build_with(|cb| {
                let _ = cb.h(h).d(2. * r).center(center);
                if let Some(n) = segments {
                    let _ = cb.r#fn(u64::from(n));
                }
            })),
            Dim::Three,
        )
    }

    /// A circle centered on the origin.
    ///
    /// # Panics
    ///
    /// Panics if `r` is not finite and positive.
    pub fn circle(r: Unit, segments: Option<u32>) -> Self {
        assert!(r.is_finite() && r > 0., "circle radius must be finite and positive");
        Self::new(
            primitive_2d(Circle::build_with(|cb| {
                let _ = cb.r(r);
                if let Some(n) = segments {
                    let _ = cb.r#fn(u64::from(n));
                }
            })),
            Dim::Two,
        )
    }

    /// A rectangle with one corner at the origin.
    ///
    /// # Panics
    ///
    /// Panics if any size component is not finite and positive.
    pub fn square(size: Point2D) -> Self {
        assert!(
            size.iter().all(|&c| c.is_finite() && c > 0.),
            "square size must be finite and positive"
        );
        Self::new(
            primitive_2d(Square::build_with(|sb| {
                let _ = sb.size([size.x, size.y]);
            })),
            Dim::Two,
        )
    }

    /// A rectangle centered on the origin.
    ///
    /// # Panics
    ///
    /// Panics if any size component is not finite and positive.
    pub fn square_centered(size: Point2D) -> Self {
        assert!(
            size.iter().all(|&c| c.is_finite() && c > 0.),
            "square size must be finite and positive"
        );
        Self::new(
            primitive_2d(Square::build_with(|sb| {
                let _ = sb.size([size.x, size.y]).center(true);
            })),
            Dim::Two,
        )
    }

    /// A polyhedron from literal points and faces.
    ///
    /// Face vertex order is kept exactly as given.
    ///
    /// # Arguments
    ///
    /// * `points` - The vertices.
    /// * `faces` - Each face as a list of indices into `points`.
    ///
    /// # Returns
    ///
    /// The polyhedron, or an error if a face has fewer than three vertices
    /// or refers to a missing point.
    ///
    /// # Panics
    ///
    /// Panics if any point is not finite.
    pub fn polyhedron(points: Vec<Point3D>, faces: Vec<Vec<usize>>) -> Result<Self> {
        assert!(
            points.iter().all(is_finite3),
            "polyhedron points must be finite"
        );
        for (face, indices) in faces.iter().enumerate() {
            if indices.len() < 3 {
                return Err(Error::DegenerateFace {
                    face,
                    found: indices.len(),
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i >= points.len()) {
                return Err(Error::FaceIndexOutOfRange {
                    face,
                    index,
                    count: points.len(),
                });
            }
        }
        Ok(Self::new(
            primitive_3d(Polyhedron::build_with(|pb| {
                let _ = pb.points(points).faces(faces);
            })),
            Dim::Three,
        ))
    }

    /// A single triangular facet `p0 -> p1 -> p2`.
    ///
    /// # Panics
    ///
    /// Panics if any point is not finite.
    pub fn tri(p0: Point3D, p1: Point3D, p2: Point3D) -> Self {
        assert!(
            [p0, p1, p2].iter().all(is_finite3),
            "triangle points must be finite"
        );
        Self::new(
            primitive_3d(Polyhedron::build_with(|pb| {
                let _ = pb.points(vec![p0, p1, p2]).faces(vec![vec![0, 1, 2]]);
            })),
            Dim::Three,
        )
    }

    /// A fan of facets `center -> ring[i] -> ring[i + 1]`.
    ///
    /// # Returns
    ///
    /// The fan, or an error if `ring` has fewer than two points.
    ///
    /// # Panics
    ///
    /// Panics if any point is not finite.
    pub fn tri_fan(center: Point3D, ring: &[Point3D]) -> Result<Self> {
        if ring.len() < 2 {
            return Err(Error::TooFewChildren {
                op: "tri_fan",
                min: 2,
                found: ring.len(),
            });
        }
        let points = std::iter::once(center)
            .chain(ring.iter().copied())
            .collect::<Vec<_>>();
        let faces = (1..ring.len()).map(|i| vec![0, i, i + 1]).collect();
        Self::polyhedron(points, faces)
    }

    /// Boolean union.
    ///
    /// # Arguments
    ///
    /// * `children` - At least one shape, all of the same dimension.
    ///
    /// # Returns
    ///
    /// The union. Empty children are dropped, and a single remaining child
    /// is returned unchanged.
    pub fn union(children: Vec<Shape>) -> Result<Self> {
        if children.is_empty() {
            return Err(Error::TooFewChildren {
                op: "union",
                min: 1,
                found: 0,
            });
        }
        let mut children = children
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>();
        if children.len() <= 1 {
            return Ok(children.pop().unwrap_or_else(Self::empty));
        }
        let dim = common_dim("union", &children, 2)?;
        let objects = objects(&children);
        let object = match dim {
            Dim::Three => modifier_3d(Union::new(), block_3d(&objects)),
            Dim::Two => modifier_2d(Union::new(), block_2d(&objects)),
        };
        Ok(Self::new(object, dim))
    }

    /// Union of any number of shapes, including none.
    ///
    /// # Returns
    ///
    /// [`Shape::empty`] when no non-empty shape is given, the union otherwise.
    pub fn union_all(children: impl IntoIterator<Item = Shape>) -> Result<Self> {
        let children = children
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>();
        if children.is_empty() {
            return Ok(Self::empty());
        }
        Self::union(children)
    }

    /// Boolean difference of `self` minus every shape in `others`.
    ///
    /// # Returns
    ///
    /// The difference, or `self` unchanged when `self` is empty or there is
    /// nothing non-empty to subtract.
    pub fn subtract(self, others: Vec<Shape>) -> Result<Self> {
        let others = others
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>();
        if self.is_empty() || others.is_empty() {
            return Ok(self);
        }
        let children = std::iter::once(self).chain(others).collect::<Vec<_>>();
        let dim = common_dim("difference", &children, 2)?;
        let objects = objects(&children);
        let object = match dim {
            Dim::Three => modifier_3d(Difference::new(), block_3d(&objects)),
            Dim::Two => modifier_2d(Difference::new(), block_2d(&objects)),
        };
        Ok(Self::new(object, dim))
    }

    /// Convex hull.
    ///
    /// # Arguments
    ///
    /// * `children` - At least two non-empty shapes, all of the same
    ///   dimension. Empty shapes are dropped before counting.
    pub fn hull(children: Vec<Shape>) -> Result<Self> {
        let children = children
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>();
        let dim = common_dim("hull", &children, 2)?;
        let objects = objects(&children);
        let object = match dim {
            Dim::Three => modifier_3d(Hull::new(), block_3d(&objects)),
            Dim::Two => modifier_2d(Hull::new(), block_2d(&objects)),
        };
        Ok(Self::new(object, dim))
    }

    /// Convex hull of two shapes.
    pub fn hull_pair(a: Shape, b: Shape) -> Result<Self> {
        Self::hull(vec![a, b])
    }

    /// Silhouette of a solid on the ground plane.
    ///
    /// # Returns
    ///
    /// A planar shape, or an error if `self` is already planar.
    pub fn projection(self) -> Result<Self> {
        self.expect_dim("projection", Dim::Three)?;
        Ok(Self::new(
            modifier_2d(
                Projection::build_with(|pb| {
                    let _ = pb.cut(false);
                }),
                self.object,
            ),
            Dim::Two,
        ))
    }

    /// Extrudes a planar shape upwards from `z = 0`.
    ///
    /// # Returns
    ///
    /// A solid, or an error if `self` is not planar.
    ///
    /// # Panics
    ///
    /// Panics if `height` is not finite and positive.
    pub fn linear_extrude(self, height: Unit) -> Result<Self> {
        assert!(
            height.is_finite() && height > 0.,
            "extrusion height must be finite and positive"
        );
        self.expect_dim("linear_extrude", Dim::Two)?;
        Ok(Self::new(
            modifier_3d(
                LinearExtrude::build_with(|lb| {
                    let _ = lb.height(height);
                }),
                self.object,
            ),
            Dim::Three,
        ))
    }

    fn expect_dim(&self, op: &'static str, expected: Dim) -> Result<()> {
        if self.dim == expected {
            Ok(())
        } else {
            Err(Error::WrongDimension {
                op,
                expected,
                found: self.dim,
            })
        }
    }

    /// Moves the shape by `v`. A zero move returns the shape unchanged.
    ///
    /// Planar shapes are moved with a 2D `translate`.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not finite, or if `self` is planar and `v` has a
    /// Z component.
    pub fn translate(self, v: Point3D) -> Self {
        assert!(is_finite3(&v), "translation must be finite");
        if self.is_empty() || abs_diff_eq!(v.norm(), 0.) {
            return self;
        }
        let object = match self.dim {
            Dim::Three => modifier_3d(
                Translate3D::build_with(|tb| {
                    let _ = tb.v([v.x, v.y, v.z]);
                }),
                self.object,
            ),
            Dim::Two => {
                assert!(abs_diff_eq!(v.z, 0.), "planar shapes only move in the XY plane");
                modifier_2d(
                    Translate2D::build_with(|tb| {
                        let _ = tb.v([v.x, v.y]);
                    }),
                    self.object,
                )
            }
        };
        Self::new(object, self.dim)
    }

    /// Moves the shape along Z.
    pub fn translate_z(self, dz: Unit) -> Self {
        self.translate(Point3D::new(0., 0., dz))
    }

    /// Rotates a solid by `degrees` about X, then Y, then Z.
    ///
    /// A zero rotation returns the shape unchanged.
    ///
    /// # Panics
    ///
    /// Panics if any angle is not finite, or if `self` is planar.
    pub fn rotate(self, degrees: Point3D) -> Self {
        assert!(is_finite3(&degrees), "rotation must be finite");
        if self.is_empty() || abs_diff_eq!(degrees.norm(), 0.) {
            return self;
        }
        assert!(self.dim == Dim::Three, "only solids can be rotated");
        Self::new(
            modifier_3d(
                Rotate3D::build_with(|rb| {
                    let _ = rb.deg([degrees.x, degrees.y, degrees.z]);
                }),
                self.object,
            ),
            Dim::Three,
        )
    }

    /// Mirrors the shape through the plane with normal `v`.
    ///
    /// Mirroring a mirror through the same plane gives back the shape that
    /// was mirrored.
    ///
    /// # Panics
    ///
    /// Panics if `v` is zero or not finite, or if `self` is planar and `v`
    /// has a Z component.
    pub fn mirror(self, v: Point3D) -> Self {
        assert!(
            is_finite3(&v) && !is_approx_zero(v),
            "mirror normal must be finite and non-zero"
        );
        if self.is_empty() {
            return self;
        }
        if let Some(mirrored) = &self.mirror_of {
            let (normal, shape) = mirrored.as_ref();
            if is_approx_zero(normal.normalize() - v.normalize())
                || is_approx_zero(normal.normalize() + v.normalize())
            {
                return shape.clone();
            }
        }
        let object = match self.dim {
            Dim::Three => modifier_3d(
                Mirror3D::build_with(|mb| {
                    let _ = mb.v([v.x, v.y, v.z]);
                }),
                self.object.clone(),
            ),
            Dim::Two => {
                assert!(abs_diff_eq!(v.z, 0.), "planar shapes mirror in the XY plane");
                modifier_2d(
                    Mirror2D::build_with(|mb| {
                        let _ = mb.v([v.x, v.y]);
                    }),
                    self.object.clone(),
                )
            }
        };
        Self {
            object,
            dim: self.dim,
            empty: false,
            mirror_of: Some(Box::new((v, self))),
        }
    }

    /// Mirrors the shape across the `x = 0` plane.
    pub fn mirror_x(self) -> Self {
        self.mirror(Point3D::x())
    }

    /// Tags the shape with a preview color.
    ///
    /// # Arguments
    ///
    /// * `name` - A CSS color name such as `red`, or a hex color such as
    ///   `#ff0000`.
    ///
    /// # Returns
    ///
    /// The tagged shape, or an error for any other name.
    pub fn color(self, name: &str) -> Result<Self> {
        if !is_color_name(name) {
            return Err(Error::InvalidColorName(name.to_string()));
        }
        let object = match self.dim {
            Dim::Three => modifier_3d(
                Color::build_with(|cb| {
                    let _ = cb.c(name.to_string());
                }),
                self.object,
            ),
            Dim::Two => modifier_2d(
                Color::build_with(|cb| {
                    let _ = cb.c(name.to_string());
                }),
                self.object,
            ),
        };
        Ok(Self::new(object, self.dim))
    }

    /// Attaches a `/* comment */` line above the shape.
    ///
    /// A `*/` inside `text` is written as `* /` so the comment cannot end
    /// early.
    pub fn commented(self, text: &str) -> Self {
        let text = text.replace("*/", "* /");
        Self::new(self.object.commented(&text), self.dim)
    }

    /// Serializes the tree to OpenSCAD source.
    pub fn to_code(&self) -> String {
        self.object.to_code()
    }

    /// Serializes the tree into `out`.
    pub fn write_code<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str(&self.to_code())
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.dim == other.dim && self.to_code() == other.to_code()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("dim", &self.dim)
            .field("code", &self.to_code())
            .finish()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_code(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Shape {
        Shape::cube(Point3D::new(1., 1., 1.))
    }

    fn unit_square() -> Shape {
        Shape::square(Point2D::new(1., 1.))
    }

    #[test]
    fn test_primitives() {
        assert_eq!(
            Shape::cube(Point3D::new(4., 6., 4.)).to_code(),
            "cube(size = [4, 6, 4]);\n"
        );
        assert_eq!(
            Shape::cube_centered(Point3D::new(0.1, 0.1, 0.1)).to_code(),
            "cube(size = [0.1, 0.1, 0.1], center = true);\n"
        );
        assert_eq!(
            Shape::cylinder(7., 2.2, true, Some(30)).to_code(),
            "cylinder(h = 7, d = 4.4, center = true, $fn = 30);\n"
        );
        assert_eq!(
            Shape::circle(4.9, Some(20)).to_code(),
            "circle(r = 4.9, $fn = 20);\n"
        );
        assert_eq!(
            Shape::square(Point2D::new(13., 13.)).to_code(),
            "square(size = [13, 13]);\n"
        );
        assert!(Shape::tri(Point3D::zeros(), Point3D::y(), Point3D::x())
            .to_code()
            .starts_with("polyhedron("));
    }

    #[test]
    fn test_nested_tree() {
        let post = Shape::cube_centered(Point3D::new(0.1, 0.1, 0.1));
        let slice = Shape::hull_pair(post.clone(), post.translate(Point3D::new(1., -2., 0.5)))
            .unwrap()
            .commented("segment");
        let part = Shape::union(vec![slice, unit_cube()])
            .unwrap()
            .subtract(vec![Shape::cylinder(7., 2.2, true, Some(30))])
            .unwrap()
            .rotate(Point3D::new(0., 0., 90.))
            .mirror_x();

        assert_eq!(
            part.to_code(),
            r"mirror([1, 0, 0])
  rotate(a = [0, 0, 90])
    difference() {
      union() {
        /* segment */
        hull() {
          cube(size = [0.1, 0.1, 0.1], center = true);
          translate([1, -2, 0.5])
            cube(size = [0.1, 0.1, 0.1], center = true);
        }
        cube(size = [1, 1, 1]);
      }
      cylinder(h = 7, d = 4.4, center = true, $fn = 30);
    }
"
        );
        assert_eq!(part.to_string(), part.to_code());
    }

    #[test]
    fn test_planar_translate() {
        assert_eq!(
            unit_square().translate(Point3D::new(1., -2., 0.)).to_code(),
            "translate([1, -2])\n  square(size = [1, 1]);\n"
        );
    }

    #[test]
    #[should_panic(expected = "planar shapes only move in the XY plane")]
    fn test_planar_translate_along_z_fails() {
        drop(unit_square().translate_z(1.));
    }

    #[test]
    fn test_hull_needs_two_children() {
        assert_eq!(
            Shape::hull(vec![]),
            Err(Error::TooFewChildren {
                op: "hull",
                min: 2,
                found: 0
            })
        );
        assert_eq!(
            Shape::hull(vec![unit_cube()]),
            Err(Error::TooFewChildren {
                op: "hull",
                min: 2,
                found: 1
            })
        );
        assert!(Shape::hull(vec![unit_cube(), unit_cube().translate_z(2.)]).is_ok());
    }

    #[test]
    fn test_union_needs_one_child() {
        assert_eq!(
            Shape::union(vec![]),
            Err(Error::TooFewChildren {
                op: "union",
                min: 1,
                found: 0
            })
        );
        assert_eq!(Shape::union(vec![unit_cube()]), Ok(unit_cube()));
    }

    #[test]
    fn test_mixed_dimensions_rejected() {
        assert_eq!(
            Shape::union(vec![unit_cube(), unit_square()]),
            Err(Error::MixedDimensions {
                op: "union",
                expected: Dim::Three,
                found: Dim::Two
            })
        );
        assert!(Shape::hull_pair(unit_square(), unit_cube()).is_err());
        assert!(unit_cube().subtract(vec![unit_square()]).is_err());
    }

    #[test]
    fn test_projection_and_extrude_dimensions() {
        let flat = unit_cube().projection().unwrap();
        assert_eq!(flat.dim(), Dim::Two);
        assert!(flat.to_code().starts_with("projection("));
        assert_eq!(
            flat.clone().projection(),
            Err(Error::WrongDimension {
                op: "projection",
                expected: Dim::Three,
                found: Dim::Two
            })
        );
        let solid = flat.linear_extrude(2.).unwrap();
        assert_eq!(solid.dim(), Dim::Three);
        assert!(solid.to_code().starts_with("linear_extrude(height = 2)\n  projection("));
        assert!(unit_cube().linear_extrude(2.).is_err());
    }

    #[test]
    fn test_subtract_nothing_is_identity() {
        assert_eq!(unit_cube().subtract(vec![]), Ok(unit_cube()));
        assert_eq!(unit_cube().subtract(vec![Shape::empty()]), Ok(unit_cube()));
        assert!(Shape::empty().subtract(vec![unit_cube()]).unwrap().is_empty());
    }

    #[test]
    fn test_union_all_accepts_nothing() {
        let none = Shape::union_all(Vec::new()).unwrap();
        assert!(none.is_empty());
        assert!(none.to_code().starts_with("union()"));
        assert!(Shape::union_all([Shape::empty(), Shape::empty()]).unwrap().is_empty());
        assert_eq!(Shape::union_all([Shape::empty(), unit_cube()]), Ok(unit_cube()));
        assert!(!Shape::union_all([unit_cube(), unit_cube().translate_z(2.)])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_empty_children_are_dropped() {
        assert_eq!(
            Shape::hull(vec![unit_cube(), Shape::empty()]),
            Err(Error::TooFewChildren {
                op: "hull",
                min: 2,
                found: 1
            })
        );
        assert_eq!(Shape::union(vec![Shape::empty(), unit_square()]), Ok(unit_square()));
        let moved = Shape::empty()
            .translate_z(3.)
            .rotate(Point3D::new(0., 0., 90.))
            .mirror_x();
        assert!(moved.is_empty());
    }

    #[test]
    fn test_polyhedron_validation() {
        let points = vec![Point3D::zeros(), Point3D::x(), Point3D::y()];
        assert_eq!(
            Shape::polyhedron(points.clone(), vec![vec![0, 1]]),
            Err(Error::DegenerateFace { face: 0, found: 2 })
        );
        assert_eq!(
            Shape::polyhedron(points.clone(), vec![vec![0, 1, 2], vec![0, 2, 3]]),
            Err(Error::FaceIndexOutOfRange {
                face: 1,
                index: 3,
                count: 3
            })
        );
        assert!(Shape::polyhedron(points, vec![vec![0, 1, 2]]).is_ok());
    }

    #[test]
    fn test_tri_fan_needs_two_ring_points() {
        assert!(Shape::tri_fan(Point3D::zeros(), &[Point3D::x()]).is_err());
        assert!(Shape::tri_fan(Point3D::zeros(), &[Point3D::x(), Point3D::y()]).is_ok());
    }

    #[test]
    fn test_double_mirror_is_identity() {
        let s = Shape::hull_pair(unit_cube(), unit_cube().translate(Point3D::new(3., 1., 0.)))
            .unwrap();
        assert_eq!(s.clone().mirror_x().mirror_x(), s);
        assert_eq!(s.clone().mirror_x().mirror(-Point3D::x()), s);
        assert_ne!(s.clone().mirror_x().mirror(Point3D::y()), s);
    }

    #[test]
    fn test_zero_transforms_are_skipped() {
        assert_eq!(unit_cube().translate(Point3D::zeros()), unit_cube());
        assert_eq!(unit_cube().rotate(Point3D::zeros()), unit_cube());
    }

    #[test]
    fn test_comment_cannot_close_early() {
        let code = unit_cube()
            .commented("key */ cube(size = 99);  /*")
            .to_code();
        assert_eq!(
            code,
            "/* key * / cube(size = 99);  /* */\ncube(size = [1, 1, 1]);\n"
        );
        // The only comment terminator is the one closing the comment line.
        assert_eq!(code.matches("*/").count(), 1);
        assert!(code.lines().next().unwrap().ends_with("*/"));
    }

    #[test]
    fn test_color_names_are_checked() {
        let injected = "red\"); sphere(5); color(\"x";
        assert_eq!(
            unit_cube().color(injected),
            Err(Error::InvalidColorName(injected.to_string()))
        );
        assert!(unit_cube().color("").is_err());
        assert!(unit_cube().color("#12345").is_err());
        assert!(unit_cube().color("dark red").is_err());

        let red = unit_cube().color("red").unwrap();
        assert!(red.to_code().starts_with("color("));
        assert!(red.to_code().contains("red"));
        assert!(!red.to_code().contains("sphere"));
        assert!(unit_cube().color("#ff0000").is_ok());
        assert!(unit_square().color("SteelBlue").is_ok());
    }

    #[test]
    #[should_panic]
    fn test_non_finite_translation_fails() {
        drop(unit_cube().translate(Point3D::new(f64::NAN, 0., 0.)));
    }

    #[test]
    #[should_panic]
    fn test_non_positive_cube_fails() {
        drop(Shape::cube(Point3D::new(1., 0., 1.)));
    }

    #[test]
    #[should_panic]
    fn test_infinite_cylinder_fails() {
        drop(Shape::cylinder(f64::INFINITY, 1., false, None));
    }

    #[test]
    #[should_panic(expected = "only solids can be rotated")]
    fn test_planar_rotate_fails() {
        drop(unit_square().rotate(Point3D::new(0., 0., 45.)));
    }
}
