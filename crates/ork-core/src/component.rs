//! Typed component fields
//!
//! Reads the scalar fields of each supported component element into a typed
//! record. Missing fields fall back to 0 (or the mode's default), malformed
//! values and unknown tokens are errors. Dimensions that may be declared
//! `auto` stay symbolic ([`Dimension::Auto`]) until the walker resolves them
//! against the component's relatives.

use glam::DVec2;

use crate::constants::AUTO_TOKEN;
use crate::curve::NoseShape;
use crate::document::DocNode;
use crate::import::ImportError;
use crate::position::{PositionMode, PositionSpec, TabPositionMode, TabPositionSpec};
use crate::shape::{ComponentKind, RadialOffset};

/// A length that is either declared or inherited from a relative
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Auto,
    Value(f64),
}

impl Default for Dimension {
    fn default() -> Self {
        Self::Value(0.0)
    }
}

impl Dimension {
    pub fn parse(field: &str, text: &str) -> Result<Self, ImportError> {
        if text.trim().eq_ignore_ascii_case(AUTO_TOKEN) {
            Ok(Self::Auto)
        } else {
            parse_number(field, text).map(Self::Value)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Value(v) => Some(*v),
        }
    }
}

/// Parse a finite decimal number
pub fn parse_number(field: &str, text: &str) -> Result<f64, ImportError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(field, text))
}

fn invalid(field: &str, text: &str) -> ImportError {
    ImportError::InvalidNumber {
        field: field.to_string(),
        value: text.to_string(),
    }
}

/// Nose-cone aft shoulder declaration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShoulderFields {
    pub radius: f64,
    pub length: f64,
    pub thickness: f64,
    pub capped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoseConeFields {
    pub name: Option<String>,
    pub length: f64,
    pub thickness: f64,
    pub shape: NoseShape,
    pub shape_parameter: f64,
    pub aft_radius: Dimension,
    pub shoulder: ShoulderFields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyTubeFields {
    pub name: Option<String>,
    pub length: f64,
    pub thickness: f64,
    pub radius: Dimension,
}

/// Fields shared by inner tubes and tube couplers
#[derive(Debug, Clone, PartialEq)]
pub struct InnerTubeFields {
    pub name: Option<String>,
    pub length: f64,
    pub thickness: f64,
    pub outer_radius: Dimension,
    pub position: PositionSpec,
    pub radial: RadialOffset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkheadFields {
    pub name: Option<String>,
    pub length: f64,
    pub outer_radius: Dimension,
    pub position: PositionSpec,
    pub radial: RadialOffset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CenteringRingFields {
    pub name: Option<String>,
    pub length: f64,
    pub outer_radius: Dimension,
    pub inner_radius: Dimension,
    pub position: PositionSpec,
    pub radial: RadialOffset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinSetFields {
    pub name: Option<String>,
    pub fin_count: i64,
    pub thickness: f64,
    pub rotation_deg: f64,
    pub cant_deg: f64,
    pub position: PositionSpec,
    pub tab_height: f64,
    pub tab_length: f64,
    pub tab_position: TabPositionSpec,
    /// Declared root-fin outline, in document order
    pub points: Vec<DVec2>,
}

/// A supported component element with its fields extracted
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    NoseCone(NoseConeFields),
    BodyTube(BodyTubeFields),
    InnerTube(InnerTubeFields),
    TubeCoupler(InnerTubeFields),
    Bulkhead(BulkheadFields),
    CenteringRing(CenteringRingFields),
    FinSet(FinSetFields),
}

impl Component {
    /// Extract the component described by `node`.
    ///
    /// Returns `Ok(None)` for elements that are not supported components.
    pub fn from_node(node: &DocNode) -> Result<Option<Self>, ImportError> {
        let Some(kind) = ComponentKind::from_element_name(&node.name) else {
            return Ok(None);
        };
        let f = FieldReader::new(node);

        let component = match kind {
            ComponentKind::NoseCone => Self::NoseCone(NoseConeFields {
                name: f.name(),
                length: f.number("length")?,
                thickness: f.number("thickness")?,
                shape: f.shape()?,
                shape_parameter: f.number("shapeparameter")?,
                aft_radius: f.dimension("aftradius")?,
                shoulder: ShoulderFields {
                    radius: f.number("aftshoulderradius")?,
                    length: f.number("aftshoulderlength")?,
                    thickness: f.number("aftshoulderthickness")?,
                    capped: f.boolean("aftshouldercapped")?,
                },
            }),
            ComponentKind::BodyTube => Self::BodyTube(BodyTubeFields {
                name: f.name(),
                length: f.number("length")?,
                thickness: f.number("thickness")?,
                radius: f.dimension("radius")?,
            }),
            ComponentKind::InnerTube => Self::InnerTube(f.inner_tube()?),
            ComponentKind::TubeCoupler => Self::TubeCoupler(f.inner_tube()?),
            ComponentKind::Bulkhead => Self::Bulkhead(BulkheadFields {
                name: f.name(),
                length: f.number("length")?,
                outer_radius: f.dimension("outerradius")?,
                position: f.position()?,
                radial: f.radial()?,
            }),
            ComponentKind::CenteringRing => Self::CenteringRing(CenteringRingFields {
                name: f.name(),
                length: f.number("length")?,
                outer_radius: f.dimension("outerradius")?,
                inner_radius: f.dimension("innerradius")?,
                position: f.position()?,
                radial: f.radial()?,
            }),
            ComponentKind::FinSet => Self::FinSet(FinSetFields {
                name: f.name(),
                fin_count: f.integer("fincount")?,
                thickness: f.number("thickness")?,
                rotation_deg: f.number("rotation")?,
                cant_deg: f.number("cant")?,
                position: f.position()?,
                tab_height: f.number("tabheight")?,
                tab_length: f.number("tablength")?,
                tab_position: f.tab_position()?,
                points: f.fin_points()?,
            }),
        };

        Ok(Some(component))
    }
}

struct FieldReader<'a> {
    node: &'a DocNode,
}

impl<'a> FieldReader<'a> {
    fn new(node: &'a DocNode) -> Self {
        Self { node }
    }

    fn text(&self, field: &str) -> Option<&'a str> {
        self.node.child_text(field)
    }

    fn name(&self) -> Option<String> {
        self.text("name")
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    fn number(&self, field: &str) -> Result<f64, ImportError> {
        self.text(field)
            .map_or(Ok(0.0), |text| parse_number(field, text))
    }

    fn dimension(&self, field: &str) -> Result<Dimension, ImportError> {
        self.text(field)
            .map_or(Ok(Dimension::default()), |text| Dimension::parse(field, text))
    }

    fn integer(&self, field: &str) -> Result<i64, ImportError> {
        match self.text(field) {
            Some(text) => text.trim().parse::<i64>().map_err(|_| invalid(field, text)),
            None => Ok(0),
        }
    }

    fn boolean(&self, field: &str) -> Result<bool, ImportError> {
        match self.text(field).map(|t| t.trim().to_ascii_lowercase()) {
            None => Ok(false),
            Some(t) if t == "true" => Ok(true),
            Some(t) if t == "false" => Ok(false),
            Some(t) => Err(invalid(field, &t)),
        }
    }

    fn shape(&self) -> Result<NoseShape, ImportError> {
        match self.text("shape") {
            Some(token) => NoseShape::from_token(token)
                .ok_or_else(|| ImportError::UnknownShape(token.to_string())),
            None => Ok(NoseShape::default()),
        }
    }

    fn position(&self) -> Result<PositionSpec, ImportError> {
        let Some(element) = self.node.child("position") else {
            return Ok(PositionSpec::default());
        };

        let token = required_attribute(element, "type")?;
        let mode = PositionMode::from_token(token)
            .ok_or_else(|| ImportError::UnknownPositionMode(token.to_string()))?;
        Ok(PositionSpec::new(mode, parse_number("position", &element.text)?))
    }

    fn tab_position(&self) -> Result<TabPositionSpec, ImportError> {
        let Some(element) = self.node.child("tabposition") else {
            return Ok(TabPositionSpec::default());
        };

        let token = required_attribute(element, "relativeto")?;
        let mode = TabPositionMode::from_token(token)
            .ok_or_else(|| ImportError::UnknownTabPosition(token.to_string()))?;
        Ok(TabPositionSpec::new(
            mode,
            parse_number("tabposition", &element.text)?,
        ))
    }

    fn radial(&self) -> Result<RadialOffset, ImportError> {
        Ok(RadialOffset {
            distance: self.number("radialposition")?,
            direction_deg: self.number("radialdirection")?,
        })
    }

    fn inner_tube(&self) -> Result<InnerTubeFields, ImportError> {
        Ok(InnerTubeFields {
            name: self.name(),
            length: self.number("length")?,
            thickness: self.number("thickness")?,
            outer_radius: self.dimension("outerradius")?,
            position: self.position()?,
            radial: self.radial()?,
        })
    }

    fn fin_points(&self) -> Result<Vec<DVec2>, ImportError> {
        let Some(list) = self.node.child("finpoints") else {
            return Ok(Vec::new());
        };

        list.children_named("point")
            .map(|point| {
                let x = required_attribute(point, "x")?;
                let y = required_attribute(point, "y")?;
                Ok(DVec2::new(parse_number("point", x)?, parse_number("point", y)?))
            })
            .collect()
    }
}

fn required_attribute<'a>(element: &'a DocNode, attribute: &str) -> Result<&'a str, ImportError> {
    element
        .attribute(attribute)
        .ok_or_else(|| ImportError::MissingAttribute {
            element: element.name.clone(),
            attribute: attribute.to_string(),
        })
}
