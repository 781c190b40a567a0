//! Procedural humanoid body built from primitive shapes
//!
//! The body is an arena of nodes rooted at a single group. Groups only carry a
//! translation; segments carry a shape, a surface (material reference) and the
//! region tag used for classification. Node order is construction order, so a
//! parent always precedes its children.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::geometry::{Ray, Shape};
use crate::region::BodyRegion;

/// Index of a node in the body arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Material reference for a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    Muscle,
    Joint,
    Eye,
}

/// Physically based material parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
    pub base_color: Rgb,
    pub roughness: f32,
    pub metalness: f32,
}

/// Material definitions keyed by surface kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialPalette {
    pub muscle: MaterialDef,
    pub joint: MaterialDef,
    pub eye: MaterialDef,
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self {
            // Indian red reads as muscle
            muscle: MaterialDef {
                base_color: Rgb::from_hex(0xcd5c5c),
                roughness: 0.4,
                metalness: 0.1,
            },
            joint: MaterialDef {
                base_color: Rgb::from_hex(0xffaaaa),
                roughness: 0.5,
                metalness: 0.0,
            },
            eye: MaterialDef {
                base_color: Rgb::from_hex(0x333333),
                roughness: 1.0,
                metalness: 0.0,
            },
        }
    }
}

impl MaterialPalette {
    pub fn get(&self, surface: SurfaceKind) -> &MaterialDef {
        match surface {
            SurfaceKind::Muscle => &self.muscle,
            SurfaceKind::Joint => &self.joint,
            SurfaceKind::Eye => &self.eye,
        }
    }
}

/// Which half of a mirrored limb pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Sign applied to X offsets (+1 right, -1 left)
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Side::Left => "L",
            Side::Right => "R",
        }
    }
}

/// A pickable shape in the body
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub shape: Shape,
    pub surface: SurfaceKind,
    pub region: BodyRegion,
    /// Limb side for mirrored parts
    pub side: Option<Side>,
    /// Current emissive color; the only state that changes after construction
    pub emissive: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Segment(Segment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyNode {
    /// Human-readable label, e.g. "Arm/Upper"
    pub label: String,
    pub parent: Option<NodeId>,
    /// Offset from the parent
    pub translation: Vec3,
    pub kind: NodeKind,
}

impl BodyNode {
    pub fn segment(&self) -> Option<&Segment> {
        match &self.kind {
            NodeKind::Segment(segment) => Some(segment),
            NodeKind::Group => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }
}

/// Result of a ray test against the body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    /// Ray parameter (world units along the ray)
    pub distance: f32,
    pub point: Vec3,
}

/// The humanoid figure
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    nodes: Vec<BodyNode>,
    palette: MaterialPalette,
}

impl Body {
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> Option<&BodyNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn palette(&self) -> &MaterialPalette {
        &self.palette
    }

    /// All nodes in construction order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &BodyNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Segment nodes only
    pub fn segments(&self) -> impl Iterator<Item = (NodeId, &BodyNode, &Segment)> {
        self.nodes()
            .filter_map(|(id, node)| node.segment().map(|segment| (id, node, segment)))
    }

    pub fn segment(&self, id: NodeId) -> Option<&Segment> {
        self.node(id).and_then(BodyNode::segment)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes()
            .filter(move |(_, node)| node.parent == Some(id))
            .map(|(child, _)| child)
    }

    /// First node with exactly this label
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.nodes()
            .find(|(_, node)| node.label == label)
            .map(|(id, _)| id)
    }

    /// Every node with this label (mirrored limbs share labels)
    pub fn find_all<'a>(&'a self, label: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes()
            .filter(move |(_, node)| node.label == label)
            .map(|(id, _)| id)
    }

    /// Label qualified with the limb side, e.g. "Arm/Upper (R)"
    pub fn display_label(&self, id: NodeId) -> Option<String> {
        let node = self.node(id)?;
        Some(match node.segment().and_then(|s| s.side) {
            Some(side) => format!("{} ({})", node.label, side.suffix()),
            None => node.label.clone(),
        })
    }

    /// Position of a node in body space (sum of ancestor translations)
    pub fn world_translation(&self, id: NodeId) -> Option<Vec3> {
        let mut node = self.node(id)?;
        let mut position = node.translation;
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            position += node.translation;
        }
        Some(position)
    }

    pub fn emissive(&self, id: NodeId) -> Option<Rgb> {
        self.segment(id).map(|s| s.emissive)
    }

    /// Overwrite a segment's emissive color, returning the previous one.
    /// Groups have no material and are left untouched.
    pub fn set_emissive(&mut self, id: NodeId, color: Rgb) -> Option<Rgb> {
        match &mut self.nodes.get_mut(id.0)?.kind {
            NodeKind::Segment(segment) => Some(std::mem::replace(&mut segment.emissive, color)),
            NodeKind::Group => None,
        }
    }

    /// Closest segment along the ray, nested children included
    pub fn hit_test(&self, ray: &Ray) -> Option<Hit> {
        let mut closest: Option<Hit> = None;

        for (id, _, segment) in self.segments() {
            let Some(center) = self.world_translation(id) else {
                continue;
            };
            let Some(t) = segment.shape.intersect(center, ray) else {
                continue;
            };
            if closest.map_or(true, |c| t < c.distance) {
                closest = Some(Hit {
                    node: id,
                    distance: t,
                    point: ray.at(t),
                });
            }
        }

        closest
    }
}

/// Incremental arena construction
struct BodyBuilder {
    nodes: Vec<BodyNode>,
}

impl BodyBuilder {
    fn new(root_label: &str, root_translation: Vec3) -> Self {
        Self {
            nodes: vec![BodyNode {
                label: root_label.to_string(),
                parent: None,
                translation: root_translation,
                kind: NodeKind::Group,
            }],
        }
    }

    fn push(&mut self, node: BodyNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn group(&mut self, label: String, translation: Vec3, parent: NodeId) -> NodeId {
        self.push(BodyNode {
            label,
            parent: Some(parent),
            translation,
            kind: NodeKind::Group,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn part(
        &mut self,
        shape: Shape,
        surface: SurfaceKind,
        translation: Vec3,
        label: &str,
        region: BodyRegion,
        side: Option<Side>,
        parent: NodeId,
    ) -> NodeId {
        self.push(BodyNode {
            label: label.to_string(),
            parent: Some(parent),
            translation,
            kind: NodeKind::Segment(Segment {
                shape,
                surface,
                region,
                side,
                emissive: Rgb::BLACK,
            }),
        })
    }

    fn arm(&mut self, side: Side, parent: NodeId) {
        use SurfaceKind::{Joint, Muscle};
        let s = side.sign();
        let arm = Some(side);
        // Shoulder socket
        let group = self.group(format!("Arm_{}", side.suffix()), Vec3::new(s * 0.25, 1.4, 0.0), parent);

        self.part(Shape::sphere(0.14), Muscle, Vec3::ZERO, "Arm/Deltoid", BodyRegion::Arm, arm, group);
        self.part(
            Shape::cylinder(0.09, 0.07, 0.35),
            Muscle,
            Vec3::new(s * 0.05, -0.25, 0.0),
            "Arm/Upper",
            BodyRegion::Arm,
            arm,
            group,
        );
        self.part(Shape::sphere(0.08), Joint, Vec3::new(s * 0.05, -0.45, 0.0), "Arm/Elbow", BodyRegion::Arm, arm, group);
        self.part(
            Shape::cylinder(0.07, 0.05, 0.35),
            Muscle,
            Vec3::new(s * 0.05, -0.65, 0.0),
            "Arm/Lower",
            BodyRegion::Arm,
            arm,
            group,
        );
        self.part(
            Shape::cuboid(0.08, 0.1, 0.08),
            Joint,
            Vec3::new(s * 0.05, -0.85, 0.0),
            "Arm/Hand",
            BodyRegion::Arm,
            arm,
            group,
        );
    }

    fn leg(&mut self, side: Side, parent: NodeId) {
        use SurfaceKind::{Joint, Muscle};
        let leg = Some(side);
        // Hip socket
        let group = self.group(format!("Leg_{}", side.suffix()), Vec3::new(side.sign() * 0.12, 0.8, 0.0), parent);

        self.part(
            Shape::cylinder(0.13, 0.1, 0.5),
            Muscle,
            Vec3::new(0.0, -0.25, 0.0),
            "Leg/Thigh",
            BodyRegion::Leg,
            leg,
            group,
        );
        self.part(Shape::sphere(0.11), Joint, Vec3::new(0.0, -0.55, 0.0), "Leg/Knee", BodyRegion::Leg, leg, group);
        self.part(
            Shape::cylinder(0.1, 0.07, 0.5),
            Muscle,
            Vec3::new(0.0, -0.85, 0.0),
            "Leg/Calf",
            BodyRegion::Leg,
            leg,
            group,
        );
        self.part(
            Shape::cuboid(0.12, 0.1, 0.25),
            Joint,
            Vec3::new(0.0, -1.15, 0.05),
            "Leg/Foot",
            BodyRegion::Leg,
            leg,
            group,
        );
    }

    fn finish(self, palette: MaterialPalette) -> Body {
        Body {
            nodes: self.nodes,
            palette,
        }
    }
}

/// Build the procedural figure with the default palette
pub fn build_body() -> Body {
    build_body_with_palette(MaterialPalette::default())
}

/// Build the procedural figure.
///
/// Construction is pure and cannot fail. The root sits at y = -0.4 so the
/// feet rest near the ground plane.
pub fn build_body_with_palette(palette: MaterialPalette) -> Body {
    use SurfaceKind::{Eye, Joint, Muscle};

    let mut b = BodyBuilder::new("Body", Vec3::new(0.0, -0.4, 0.0));
    let root = NodeId(0);

    // Torso
    b.part(Shape::cuboid(0.35, 0.4, 0.2), Muscle, Vec3::new(0.0, 1.0, 0.0), "Torso/Abs", BodyRegion::Torso, None, root);
    let pec = Shape::cuboid(0.2, 0.2, 0.25);
    b.part(pec, Muscle, Vec3::new(-0.11, 1.3, 0.05), "Torso/Pecs_L", BodyRegion::Torso, None, root);
    b.part(pec, Muscle, Vec3::new(0.11, 1.3, 0.05), "Torso/Pecs_R", BodyRegion::Torso, None, root);
    b.part(Shape::cuboid(0.3, 0.6, 0.1), Muscle, Vec3::new(0.0, 1.2, -0.1), "Back/Spine", BodyRegion::Back, None, root);

    // Head and neck
    b.part(Shape::cylinder(0.06, 0.08, 0.15), Joint, Vec3::new(0.0, 1.5, 0.0), "Neck", BodyRegion::Neck, None, root);
    let head = b.part(Shape::sphere(0.18), Muscle, Vec3::new(0.0, 1.7, 0.0), "Head", BodyRegion::Head, None, root);
    let eye = Shape::sphere(0.02);
    b.part(eye, Eye, Vec3::new(-0.06, 0.05, 0.16), "Eye_L", BodyRegion::Eye, Some(Side::Left), head);
    b.part(eye, Eye, Vec3::new(0.06, 0.05, 0.16), "Eye_R", BodyRegion::Eye, Some(Side::Right), head);

    // Limbs are mirrored across X
    for side in [Side::Right, Side::Left] {
        b.arm(side, root);
    }
    for side in [Side::Right, Side::Left] {
        b.leg(side, root);
    }

    let body = b.finish(palette);
    tracing::debug!(
        nodes = body.len(),
        segments = body.segments().count(),
        "Built procedural body"
    );
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_labels_present() {
        let body = build_body();
        for label in [
            "Torso/Abs",
            "Torso/Pecs_L",
            "Torso/Pecs_R",
            "Back/Spine",
            "Neck",
            "Head",
            "Eye_L",
            "Eye_R",
        ] {
            assert_eq!(body.find_all(label).count(), 1, "{label}");
        }
        for label in [
            "Arm/Deltoid",
            "Arm/Upper",
            "Arm/Elbow",
            "Arm/Lower",
            "Arm/Hand",
            "Leg/Thigh",
            "Leg/Knee",
            "Leg/Calf",
            "Leg/Foot",
        ] {
            assert_eq!(body.find_all(label).count(), 2, "{label}");
        }
        // 8 single parts + 2 x (5 arm + 4 leg) parts
        assert_eq!(body.segments().count(), 26);
    }

    #[test]
    fn test_single_root_and_parent_order() {
        let body = build_body();
        let roots: Vec<_> = body.nodes().filter(|(_, n)| n.parent.is_none()).collect();
        assert_eq!(roots.len(), 1);
        assert!(roots[0].1.is_group());
        for (id, node) in body.nodes() {
            if let Some(parent) = node.parent {
                assert!(parent < id, "parent {parent} must precede {id}");
            }
        }
    }

    #[test]
    fn test_tags_agree_with_labels() {
        let body = build_body();
        for (_, node, segment) in body.segments() {
            assert!(!node.label.is_empty());
            assert_eq!(BodyRegion::from_label(&node.label), Some(segment.region), "{}", node.label);
        }
    }

    #[test]
    fn test_eyes_nested_under_head() {
        let body = build_body();
        let head = body.find("Head").unwrap();
        let children: Vec<_> = body.children(head).collect();
        assert_eq!(children.len(), 2);

        let eye = body.find("Eye_R").unwrap();
        let world = body.world_translation(eye).unwrap();
        assert!((world - Vec3::new(0.06, 1.7 - 0.4 + 0.05, 0.16)).length() < 1e-5);
    }

    #[test]
    fn test_limbs_are_mirrored() {
        let body = build_body();
        let hands: Vec<Vec3> = body
            .find_all("Arm/Hand")
            .map(|id| body.world_translation(id).unwrap())
            .collect();
        assert_eq!(hands.len(), 2);
        assert!((hands[0].x + hands[1].x).abs() < 1e-6);
        assert!((hands[0].x.abs() - 0.30).abs() < 1e-6);
        assert_eq!(hands[0].y, hands[1].y);

        let sides: Vec<_> = body.find_all("Leg/Foot").map(|id| body.segment(id).unwrap().side).collect();
        assert_eq!(sides, vec![Some(Side::Right), Some(Side::Left)]);
    }

    #[test]
    fn test_head_above_feet() {
        let body = build_body();
        let head = body.world_translation(body.find("Head").unwrap()).unwrap();
        let foot = body.world_translation(body.find("Leg/Foot").unwrap()).unwrap();
        assert!(head.y > 1.0);
        assert!(foot.y < 0.0);
    }

    #[test]
    fn test_ray_at_every_segment_center_hits_it() {
        let body = build_body();
        for (id, node, segment) in body.segments() {
            let center = body.world_translation(id).unwrap();
            // Aim from far in front; the first hit may be a part in front of
            // this one, but the segment itself must intersect.
            let ray = Ray::towards(center + Vec3::new(0.0, 0.0, 10.0), center).unwrap();
            assert!(segment.shape.intersect(center, &ray).is_some(), "{}", node.label);
        }
    }

    #[test]
    fn test_hit_test_prefers_nearest() {
        let body = build_body();
        let eye = body.find("Eye_R").unwrap();
        let center = body.world_translation(eye).unwrap();

        // Straight on from the front, the eye pokes out of the head
        let ray = Ray::towards(center + Vec3::new(0.0, 0.0, 5.0), center).unwrap();
        let hit = body.hit_test(&ray).unwrap();
        assert_eq!(hit.node, eye);

        // From behind, the spine sits in front of the abs
        let abs = body.world_translation(body.find("Torso/Abs").unwrap()).unwrap();
        let ray = Ray::towards(abs + Vec3::new(0.0, 0.0, -5.0), abs).unwrap();
        let hit = body.hit_test(&ray).unwrap();
        assert_eq!(body.node(hit.node).unwrap().label, "Back/Spine");
    }

    #[test]
    fn test_hit_test_miss() {
        let body = build_body();
        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::X).unwrap();
        assert!(body.hit_test(&ray).is_none());
    }

    #[test]
    fn test_set_emissive_only_on_segments() {
        let mut body = build_body();
        let head = body.find("Head").unwrap();
        assert_eq!(body.set_emissive(head, Rgb::RED), Some(Rgb::BLACK));
        assert_eq!(body.emissive(head), Some(Rgb::RED));
        assert_eq!(body.set_emissive(body.root(), Rgb::RED), None);
        assert_eq!(body.set_emissive(NodeId(999), Rgb::RED), None);
    }

    #[test]
    fn test_display_label_includes_side() {
        let body = build_body();
        let upper = body.find("Arm/Upper").unwrap();
        assert_eq!(body.display_label(upper).unwrap(), "Arm/Upper (R)");
        assert_eq!(body.display_label(body.find("Neck").unwrap()).unwrap(), "Neck");
    }
}
