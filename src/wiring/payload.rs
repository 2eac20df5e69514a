//! Payload types carried by wiring events.
//!
//! Defines the closed set of data types that can travel along a connection,
//! both as a type tag (`PayloadType`) and as a value (`Payload`).

use egui::Color32;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The type of data an outlet emits or an inlet accepts.
///
/// This is a closed set; every connection in a patch carries exactly one of
/// these. `Bang` is the trigger type: it fires with no data attached and is
/// compatible with every inlet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadType {
    /// A trigger with no data attached.
    Bang,
    /// A single scalar value.
    Float,
    /// A 3D vector (positions, directions, scales).
    Vector3,
    /// A rotation.
    Quaternion,
    /// An RGBA color.
    Color,
}

impl PayloadType {
    /// Checks whether an outlet of this type can feed an inlet of `target`.
    ///
    /// Connection rules:
    /// - Bang connects to anything (the receiving inlet is invoked with a
    ///   sentinel value; see the binder for the exact rule)
    /// - Everything else requires an exact type match
    ///
    /// There is no coercion between data-carrying types; a converter node is
    /// needed to go from, say, `Vector3` to `Float`.
    pub fn can_connect_to(&self, target: PayloadType) -> bool {
        *self == PayloadType::Bang || *self == target
    }

    /// Returns a human-readable name for the payload type.
    pub fn name(&self) -> &'static str {
        match self {
            PayloadType::Bang => "Bang",
            PayloadType::Float => "Float",
            PayloadType::Vector3 => "Vector3",
            PayloadType::Quaternion => "Quaternion",
            PayloadType::Color => "Color",
        }
    }

    /// Returns the color used to tint slots and cables of this type.
    pub fn color(&self) -> Color32 {
        match self {
            PayloadType::Bang => Color32::from_rgb(158, 158, 158), // Gray
            PayloadType::Float => Color32::from_rgb(66, 165, 245), // Blue
            PayloadType::Vector3 => Color32::from_rgb(129, 199, 132), // Green
            PayloadType::Quaternion => Color32::from_rgb(255, 183, 77), // Orange
            PayloadType::Color => Color32::from_rgb(186, 104, 200), // Purple
        }
    }

    /// All payload types, in declaration order.
    pub fn all() -> [PayloadType; 5] {
        [
            PayloadType::Bang,
            PayloadType::Float,
            PayloadType::Vector3,
            PayloadType::Quaternion,
            PayloadType::Color,
        ]
    }
}

/// An RGBA color value with floating-point channels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from RGBA channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from RGB channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Converts to an 8-bit egui color for display.
    pub fn to_color32(&self) -> Color32 {
        Color32::from_rgba_unmultiplied(
            (self.r.clamp(0.0, 1.0) * 255.0) as u8,
            (self.g.clamp(0.0, 1.0) * 255.0) as u8,
            (self.b.clamp(0.0, 1.0) * 255.0) as u8,
            (self.a.clamp(0.0, 1.0) * 255.0) as u8,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// A concrete value traveling along a connection.
///
/// The variants mirror `PayloadType` one-to-one, so dispatch is an
/// exhaustive match rather than a runtime type lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Payload {
    Bang,
    Float(f32),
    Vector3(Vec3),
    Quaternion(Quat),
    Color(Color),
}

impl Payload {
    /// Returns the type tag of this value.
    pub fn payload_type(&self) -> PayloadType {
        match self {
            Payload::Bang => PayloadType::Bang,
            Payload::Float(_) => PayloadType::Float,
            Payload::Vector3(_) => PayloadType::Vector3,
            Payload::Quaternion(_) => PayloadType::Quaternion,
            Payload::Color(_) => PayloadType::Color,
        }
    }
}
