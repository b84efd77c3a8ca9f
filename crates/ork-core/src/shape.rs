//! Resolved component records
//!
//! A [`ResolvedShape`] is everything a geometry backend needs to build one
//! body: absolute axial extent, radii and, for nose cones and fin sets, the
//! 2D profile plus placement transforms. Records are produced by the walker
//! and never modified afterwards.

use std::fmt;

use glam::{DAffine3, DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::curve::NoseShape;
use crate::position::TabPositionMode;

/// Component category of a resolved record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    NoseCone,
    BodyTube,
    InnerTube,
    TubeCoupler,
    Bulkhead,
    CenteringRing,
    FinSet,
}

impl ComponentKind {
    /// Element name used for this component in rocket documents
    pub fn element_name(&self) -> &'static str {
        match self {
            Self::NoseCone => "nosecone",
            Self::BodyTube => "bodytube",
            Self::InnerTube => "innertube",
            Self::TubeCoupler => "tubecoupler",
            Self::Bulkhead => "bulkhead",
            Self::CenteringRing => "centeringring",
            Self::FinSet => "freeformfinset",
        }
    }

    pub fn from_element_name(name: &str) -> Option<Self> {
        match name {
            "nosecone" => Some(Self::NoseCone),
            "bodytube" => Some(Self::BodyTube),
            "innertube" => Some(Self::InnerTube),
            "tubecoupler" => Some(Self::TubeCoupler),
            "bulkhead" => Some(Self::Bulkhead),
            "centeringring" => Some(Self::CenteringRing),
            "freeformfinset" => Some(Self::FinSet),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element_name())
    }
}

/// Off-axis placement of an internal component
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RadialOffset {
    /// Distance from the rocket axis
    pub distance: f64,
    /// Direction around the axis in degrees, 0 pointing along +Y
    pub direction_deg: f64,
}

impl RadialOffset {
    pub fn is_zero(&self) -> bool {
        self.distance == 0.0
    }

    /// Offset as a translation perpendicular to the rocket axis
    pub fn to_vector(&self) -> DVec3 {
        let angle = self.direction_deg.to_radians();
        DVec3::new(0.0, self.distance * angle.cos(), self.distance * angle.sin())
    }
}

/// Nose-cone aft shoulder tube
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shoulder {
    pub x_start: f64,
    pub length: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub capped: bool,
}

impl Shoulder {
    pub fn x_end(&self) -> f64 {
        self.x_start + self.length
    }
}

/// Fin tab rectangle along the fin root, in fin-profile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTab {
    pub mode: TabPositionMode,
    pub start: f64,
    pub length: f64,
    pub height: f64,
    /// Root length not covered by the tab (0 when the tab was clamped)
    pub remaining: f64,
}

impl ResolvedTab {
    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}

/// Type-specific geometry of a resolved record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeGeometry {
    /// Hollow cylinder between the inner and outer radius
    Tube,
    /// Solid disc of the outer radius
    Disc,
    NoseCone {
        shape: NoseShape,
        thickness: f64,
        /// Outer profile from tip to base, (axial, radial)
        profile: Vec<DVec2>,
        shoulder: Option<Shoulder>,
    },
    FinSet {
        thickness: f64,
        fin_count: usize,
        cant_deg: f64,
        rotation_deg: f64,
        root_length: f64,
        tab: Option<ResolvedTab>,
        /// Closed fin outline on the XY plane, root along the X axis
        profile: Vec<DVec2>,
        /// One placement per fin, mapping profile space to rocket space
        instances: Vec<DAffine3>,
    },
}

/// Fully resolved parameters of one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedShape {
    pub kind: ComponentKind,
    pub name: Option<String>,
    pub x_start: f64,
    pub x_end: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    #[serde(default)]
    pub radial: RadialOffset,
    pub geometry: ShapeGeometry,
}

impl ResolvedShape {
    pub fn length(&self) -> f64 {
        self.x_end - self.x_start
    }

    /// Display label: the component name, or its kind when unnamed
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} '{}'", self.kind, name),
            None => self.kind.to_string(),
        }
    }

    /// Nose-cone profile points, if this is a nose cone
    pub fn nose_profile(&self) -> Option<&[DVec2]> {
        match &self.geometry {
            ShapeGeometry::NoseCone { profile, .. } => Some(profile),
            _ => None,
        }
    }
}
