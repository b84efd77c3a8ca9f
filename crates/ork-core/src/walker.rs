//! Component tree traversal
//!
//! Walks `openrocket/rocket/subcomponents/stage/subcomponents/*` depth first,
//! in document order. Each stage owns a [`StackCursor`] that body tubes
//! advance and nose cones reset; everything nested inside a tube is placed
//! against that tube's axial window and radius.
//!
//! Dispatch per level:
//! - stage: nose cones and body tubes
//! - body tube: bulkheads, couplers, centering rings, inner tubes, fin sets
//! - nose cone: couplers
//! - coupler: bulkheads

use crate::auto_ref::{self, AutoPolicy, Settled};
use crate::component::{
    BodyTubeFields, BulkheadFields, CenteringRingFields, Component, Dimension, FinSetFields,
    InnerTubeFields, NoseConeFields,
};
use crate::constants::ROOT_ELEMENT;
use crate::curve::NoseCurve;
use crate::document::DocNode;
use crate::fin::{self, FinPlacement};
use crate::import::{EmitFailure, ImportError, ImportOptions, ImportReport};
use crate::position::{self, AxialWindow, PositionFamily};
use crate::shape::{ComponentKind, RadialOffset, ResolvedShape, ShapeGeometry, Shoulder};
use crate::sink::ShapeSink;

const STAGE_LEVEL: &[ComponentKind] = &[ComponentKind::NoseCone, ComponentKind::BodyTube];
const TUBE_LEVEL: &[ComponentKind] = &[
    ComponentKind::Bulkhead,
    ComponentKind::TubeCoupler,
    ComponentKind::CenteringRing,
    ComponentKind::InnerTube,
    ComponentKind::FinSet,
];
const NOSE_LEVEL: &[ComponentKind] = &[ComponentKind::TubeCoupler];
const COUPLER_LEVEL: &[ComponentKind] = &[ComponentKind::Bulkhead];

/// Aft-most axial extent of the components stacked so far in a stage
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StackCursor {
    position: f64,
}

impl StackCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Claim the next `length` of the stack, returning the claimed window
    pub fn advance(&mut self, length: f64) -> AxialWindow {
        let window = AxialWindow::from_start(self.position, length);
        self.position = window.end;
        window
    }

    /// Restart the stack behind a component of `length` placed at 0
    pub fn reset(&mut self, length: f64) {
        self.position = length;
    }
}

/// What a nested component is placed against
#[derive(Debug, Clone, Copy)]
struct Enclosure {
    /// Radius inherited by `auto` outer radii
    radius: f64,
    /// Axial window of the enclosing component
    window: AxialWindow,
    /// Stack length couplers are positioned against
    stack_length: f64,
}

/// Resolves a document tree, emitting one record per component
pub struct ComponentTreeWalker<'a> {
    options: &'a ImportOptions,
    policy: AutoPolicy,
    sink: &'a mut dyn ShapeSink,
    report: ImportReport,
}

impl<'a> ComponentTreeWalker<'a> {
    pub fn new(options: &'a ImportOptions, sink: &'a mut dyn ShapeSink) -> Self {
        Self {
            options,
            policy: AutoPolicy::from_strict(options.strict_auto),
            sink,
            report: ImportReport::default(),
        }
    }

    /// Walk every stage of the document
    pub fn walk(mut self, root: &DocNode) -> Result<ImportReport, ImportError> {
        let rocket = if root.name == "rocket" {
            root
        } else {
            if root.name != ROOT_ELEMENT {
                tracing::debug!("Unexpected root element <{}>", root.name);
            }
            root.child("rocket").ok_or(ImportError::MissingRocket)?
        };

        let stages = rocket
            .child("subcomponents")
            .into_iter()
            .flat_map(|list| list.children_named("stage"));

        for stage in stages {
            self.walk_stage(stage)?;
        }

        Ok(self.report)
    }

    fn walk_stage(&mut self, stage: &DocNode) -> Result<(), ImportError> {
        tracing::debug!("Walking stage '{}'", stage.child_text("name").unwrap_or_default());

        let components = subcomponents(stage);
        let mut cursor = StackCursor::new();

        for (index, node) in components.iter().enumerate() {
            match self.extract(node, STAGE_LEVEL, "stage")? {
                Some(Component::NoseCone(fields)) => {
                    self.nose_cone(node, fields, components, index, &mut cursor)?
                }
                Some(Component::BodyTube(fields)) => {
                    self.body_tube(node, fields, components, &mut cursor)?
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn nose_cone(
        &mut self,
        node: &DocNode,
        f: NoseConeFields,
        siblings: &[DocNode],
        index: usize,
        cursor: &mut StackCursor,
    ) -> Result<(), ImportError> {
        let label = label(ComponentKind::NoseCone, f.name.as_deref());
        let aft_radius = match f.aft_radius {
            Dimension::Value(v) => v,
            Dimension::Auto => {
                self.settle(auto_ref::nose_aft_radius(siblings, index), &label, "aftradius")?
            }
        };

        let curve = NoseCurve::new(f.shape, aft_radius, f.length, f.shape_parameter);
        let profile = match curve.profile(
            f.length,
            self.options.profile_divisions,
            self.options.tip_radius,
        ) {
            Ok(profile) => Some(profile),
            Err(e) if self.policy == AutoPolicy::Strict => return Err(e.into()),
            Err(e) => {
                tracing::warn!("No profile for {}: {}", label, e);
                self.report.failures.push(EmitFailure {
                    component: label.clone(),
                    reason: e.to_string(),
                });
                None
            }
        };

        let shoulder = (f.shoulder.length > 0.0).then(|| Shoulder {
            x_start: f.length - f.shoulder.thickness,
            length: f.shoulder.thickness + f.shoulder.length,
            outer_radius: f.shoulder.radius,
            inner_radius: f.shoulder.radius - f.shoulder.thickness,
            capped: f.shoulder.capped,
        });

        // A nose cone without a profile still claims its length of the stack
        if let Some(profile) = profile {
            self.emit(ResolvedShape {
                kind: ComponentKind::NoseCone,
                name: f.name,
                x_start: 0.0,
                x_end: f.length,
                outer_radius: aft_radius,
                inner_radius: aft_radius - f.thickness,
                radial: RadialOffset::default(),
                geometry: ShapeGeometry::NoseCone {
                    shape: f.shape,
                    thickness: f.thickness,
                    profile,
                    shoulder,
                },
            });
        }

        cursor.reset(f.length);

        let enclosure = Enclosure {
            radius: aft_radius,
            window: AxialWindow::new(0.0, f.length),
            stack_length: cursor.position(),
        };
        for child in subcomponents(node) {
            if let Some(Component::TubeCoupler(coupler)) =
                self.extract(child, NOSE_LEVEL, "nosecone")?
            {
                self.tube_coupler(child, coupler, &enclosure)?;
            }
        }

        Ok(())
    }

    fn body_tube(
        &mut self,
        node: &DocNode,
        f: BodyTubeFields,
        siblings: &[DocNode],
        cursor: &mut StackCursor,
    ) -> Result<(), ImportError> {
        let label = label(ComponentKind::BodyTube, f.name.as_deref());
        let radius = match f.radius {
            Dimension::Value(v) => v,
            Dimension::Auto => self.settle(auto_ref::body_tube_radius(siblings), &label, "radius")?,
        };

        let window = cursor.advance(f.length);

        self.emit(ResolvedShape {
            kind: ComponentKind::BodyTube,
            name: f.name,
            x_start: window.start,
            x_end: window.end,
            outer_radius: radius,
            inner_radius: radius - f.thickness,
            radial: RadialOffset::default(),
            geometry: ShapeGeometry::Tube,
        });

        let enclosure = Enclosure {
            radius,
            window,
            stack_length: cursor.position(),
        };
        let children = subcomponents(node);

        for child in children {
            match self.extract(child, TUBE_LEVEL, "bodytube")? {
                Some(Component::Bulkhead(fields)) => self.bulkhead(fields, &enclosure),
                Some(Component::TubeCoupler(fields)) => {
                    self.tube_coupler(child, fields, &enclosure)?
                }
                Some(Component::CenteringRing(fields)) => {
                    self.centering_ring(fields, children, &enclosure)?
                }
                Some(Component::InnerTube(fields)) => self.inner_tube(fields, &enclosure)?,
                Some(Component::FinSet(fields)) => self.fin_set(fields, &enclosure)?,
                _ => {}
            }
        }

        Ok(())
    }

    fn inner_tube(&mut self, f: InnerTubeFields, enclosure: &Enclosure) -> Result<(), ImportError> {
        let label = label(ComponentKind::InnerTube, f.name.as_deref());
        let outer_radius = match f.outer_radius {
            Dimension::Value(v) => v,
            // Inner tubes have no relative to inherit from
            Dimension::Auto => self.settle(None, &label, "outerradius")?,
        };

        let x = position::resolve(
            f.position,
            enclosure.window,
            f.length,
            PositionFamily::InnerTube,
        );

        self.emit(ResolvedShape {
            kind: ComponentKind::InnerTube,
            name: f.name,
            x_start: x,
            x_end: x + f.length,
            outer_radius,
            inner_radius: outer_radius - f.thickness,
            radial: f.radial,
            geometry: ShapeGeometry::Tube,
        });
        Ok(())
    }

    fn tube_coupler(
        &mut self,
        node: &DocNode,
        f: InnerTubeFields,
        enclosure: &Enclosure,
    ) -> Result<(), ImportError> {
        let outer_radius = f.outer_radius.value().unwrap_or(enclosure.radius);
        let x = position::resolve(
            f.position,
            AxialWindow::stack(enclosure.stack_length),
            f.length,
            PositionFamily::Stack,
        );

        self.emit(ResolvedShape {
            kind: ComponentKind::TubeCoupler,
            name: f.name,
            x_start: x,
            x_end: x + f.length,
            outer_radius,
            inner_radius: outer_radius - f.thickness,
            radial: f.radial,
            geometry: ShapeGeometry::Tube,
        });

        let inside = Enclosure {
            radius: outer_radius,
            window: AxialWindow::from_start(x, f.length),
            stack_length: enclosure.stack_length,
        };
        for child in subcomponents(node) {
            if let Some(Component::Bulkhead(bulkhead)) =
                self.extract(child, COUPLER_LEVEL, "tubecoupler")?
            {
                self.bulkhead(bulkhead, &inside);
            }
        }

        Ok(())
    }

    fn bulkhead(&mut self, f: BulkheadFields, enclosure: &Enclosure) {
        let outer_radius = f.outer_radius.value().unwrap_or(enclosure.radius);
        let x = position::resolve(f.position, enclosure.window, f.length, PositionFamily::Window);

        self.emit(ResolvedShape {
            kind: ComponentKind::Bulkhead,
            name: f.name,
            x_start: x,
            x_end: x + f.length,
            outer_radius,
            inner_radius: 0.0,
            radial: f.radial,
            geometry: ShapeGeometry::Disc,
        });
    }

    fn centering_ring(
        &mut self,
        f: CenteringRingFields,
        siblings: &[DocNode],
        enclosure: &Enclosure,
    ) -> Result<(), ImportError> {
        let label = label(ComponentKind::CenteringRing, f.name.as_deref());
        let outer_radius = f.outer_radius.value().unwrap_or(enclosure.radius);
        let inner_radius = match f.inner_radius {
            Dimension::Value(v) => v,
            Dimension::Auto => {
                self.settle(auto_ref::ring_inner_radius(siblings), &label, "innerradius")?
            }
        };

        let x = position::resolve(f.position, enclosure.window, f.length, PositionFamily::Window);

        self.emit(ResolvedShape {
            kind: ComponentKind::CenteringRing,
            name: f.name,
            x_start: x,
            x_end: x + f.length,
            outer_radius,
            inner_radius,
            radial: f.radial,
            geometry: ShapeGeometry::Tube,
        });
        Ok(())
    }

    fn fin_set(&mut self, f: FinSetFields, enclosure: &Enclosure) -> Result<(), ImportError> {
        let fin_count = fin::fin_count(f.fin_count)?;
        let profile = fin::build_profile(&f.points, f.tab_height, f.tab_length, f.tab_position)?;

        let x_location = position::resolve(
            f.position,
            enclosure.window,
            profile.root_length,
            PositionFamily::Window,
        );
        let placement = FinPlacement {
            parent_radius: enclosure.radius,
            thickness: f.thickness,
            cant_deg: f.cant_deg,
            rotation_deg: f.rotation_deg,
            x_location,
        };
        let instances = placement.instances(&profile, fin_count);

        let span = profile.points.iter().map(|p| p.y).fold(0.0, f64::max);
        let depth = profile.tab.map_or(0.0, |tab| tab.height);
        let x_start = x_location + profile.root_start;

        self.emit(ResolvedShape {
            kind: ComponentKind::FinSet,
            name: f.name,
            x_start,
            x_end: x_start + profile.root_length,
            outer_radius: enclosure.radius + span,
            inner_radius: enclosure.radius - depth,
            radial: RadialOffset::default(),
            geometry: ShapeGeometry::FinSet {
                thickness: f.thickness,
                fin_count,
                cant_deg: f.cant_deg,
                rotation_deg: f.rotation_deg,
                root_length: profile.root_length,
                tab: profile.tab,
                profile: profile.points,
                instances,
            },
        });
        Ok(())
    }

    /// Extract `node` if its kind is dispatched at this level, otherwise skip it
    fn extract(
        &mut self,
        node: &DocNode,
        level: &[ComponentKind],
        parent: &str,
    ) -> Result<Option<Component>, ImportError> {
        let dispatched = ComponentKind::from_element_name(&node.name)
            .is_some_and(|kind| level.contains(&kind));

        if !dispatched {
            tracing::debug!("Skipping <{}> inside <{}>", node.name, parent);
            self.report.skipped.push(node.name.clone());
            return Ok(None);
        }

        Component::from_node(node)
    }

    fn settle(
        &mut self,
        found: Option<f64>,
        component: &str,
        field: &str,
    ) -> Result<f64, ImportError> {
        let settled = self.policy.settle(found, component, field)?;
        if settled == Settled::Defaulted {
            self.report.defaulted.push(format!("{} <{}>", component, field));
        }
        Ok(settled.value())
    }

    fn emit(&mut self, shape: ResolvedShape) {
        tracing::debug!(
            "Resolved {} at [{:.4}, {:.4}) r={:.4}",
            shape.label(),
            shape.x_start,
            shape.x_end,
            shape.outer_radius
        );

        match self.sink.emit(&shape) {
            Ok(()) => self.report.emitted += 1,
            Err(e) => {
                tracing::warn!("Failed to build {}: {}", shape.label(), e);
                self.report.failures.push(EmitFailure {
                    component: shape.label(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

fn subcomponents(node: &DocNode) -> &[DocNode] {
    node.child("subcomponents")
        .map(|list| list.children.as_slice())
        .unwrap_or_default()
}

fn label(kind: ComponentKind, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{} '{}'", kind, name),
        None => kind.to_string(),
    }
}
