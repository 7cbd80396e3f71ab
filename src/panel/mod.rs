//! Control panel: named folders of controls bound to live scene fields.
//!
//! A control never caches the value it edits. Each frame it reads the field
//! through [`Bindable::read`], shows a widget, and writes an edited value
//! straight back through [`Bindable::write`]. Numeric input is clamped to the
//! control's [`NumericDomain`] before it reaches the target.

mod widgets;

pub use widgets::PanelStats;

use std::f32::consts::TAU;

use thiserror::Error;

use crate::config::{Axis, DemoConfig, GeometryKind};
use crate::math::Color;
use crate::scene::{MapSlot, MaterialKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeField {
    Radius,
    Height,
    Width,
    Depth,
}

/// A live field a control can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Rotation(Axis),
    Visible,
    Color,
    Wireframe,
    Metalness,
    Roughness,
    MapEnabled(MapSlot),
    Size(SizeField),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f32),
    Toggle(bool),
    Color(Color),
}

/// Follow-up work a write requires before the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    RegenerateGeometry,
}

/// Something whose fields the panel can display and edit in place
pub trait Bindable {
    /// Current value, or `None` if the field is unavailable right now
    fn read(&self, field: Field) -> Option<Value>;

    /// Store `value` into `field`
    fn write(&mut self, field: Field, value: Value) -> Effect;
}

#[derive(Debug, Error, PartialEq)]
pub enum PanelError {
    #[error("no control is bound to {0:?}")]
    NotBound(Field),

    #[error("{field:?} does not accept {value:?}")]
    TypeMismatch { field: Field, value: Value },

    #[error("{0:?} is not available")]
    Unavailable(Field),

    #[error("{0:?} only accepts finite numbers")]
    NotFinite(Field),
}

/// Inclusive numeric range and drag granularity of a number control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericDomain {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl NumericDomain {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const ROTATION_DOMAIN: NumericDomain = NumericDomain::new(0.0, TAU, 0.01);
pub const UNIT_DOMAIN: NumericDomain = NumericDomain::new(0.0, 1.0, 0.01);
pub const RADIUS_DOMAIN: NumericDomain = NumericDomain::new(1.0, 10.0, 0.01);
pub const CYLINDER_HEIGHT_DOMAIN: NumericDomain = NumericDomain::new(5.0, 40.0, 0.01);
pub const BOX_EDGE_DOMAIN: NumericDomain = NumericDomain::new(0.1, 5.0, 0.01);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Number(NumericDomain),
    Toggle,
    Color,
    /// Enable switch for a material map, shown with its load status
    Texture(MapSlot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub label: String,
    pub field: Field,
    pub kind: ControlKind,
}

impl Control {
    pub fn number(label: impl Into<String>, field: Field, domain: NumericDomain) -> Self {
        Self {
            label: label.into(),
            field,
            kind: ControlKind::Number(domain),
        }
    }

    pub fn toggle(label: impl Into<String>, field: Field) -> Self {
        Self {
            label: label.into(),
            field,
            kind: ControlKind::Toggle,
        }
    }

    pub fn color(label: impl Into<String>, field: Field) -> Self {
        Self {
            label: label.into(),
            field,
            kind: ControlKind::Color,
        }
    }

    pub fn texture(slot: MapSlot) -> Self {
        Self {
            label: slot.label().to_string(),
            field: Field::MapEnabled(slot),
            kind: ControlKind::Texture(slot),
        }
    }

    /// Check `value` against this control's kind; numbers come back clamped
    fn accept(&self, value: Value) -> Result<Value, PanelError> {
        match (self.kind, value) {
            (ControlKind::Number(domain), Value::Number(v)) => {
                if v.is_finite() {
                    Ok(Value::Number(domain.clamp(v)))
                } else {
                    Err(PanelError::NotFinite(self.field))
                }
            }
            (ControlKind::Toggle | ControlKind::Texture(_), Value::Toggle(_)) => Ok(value),
            (ControlKind::Color, Value::Color(_)) => Ok(value),
            _ => Err(PanelError::TypeMismatch {
                field: self.field,
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub name: String,
    pub controls: Vec<Control>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            controls: Vec::new(),
        }
    }

    pub fn add(&mut self, control: Control) -> &mut Self {
        self.controls.push(control);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Control(Control),
    Folder(Folder),
}

/// Ordered set of controls and folders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlPanel {
    pub title: String,
    entries: Vec<Entry>,
}

impl ControlPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, control: Control) -> &mut Self {
        self.entries.push(Entry::Control(control));
        self
    }

    pub fn add_folder(&mut self, folder: Folder) -> &mut Self {
        self.entries.push(Entry::Folder(folder));
        self
    }

    /// Panel layout for a demo: rotation, material, visibility and size
    pub fn for_config(config: &DemoConfig) -> Self {
        let mut panel = ControlPanel::new("Controls");

        let mut rotation = Folder::new("Rotation");
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            if config.exposes(axis) {
                let label = match axis {
                    Axis::X => "x",
                    Axis::Y => "y",
                    Axis::Z => "z",
                };
                rotation.add(Control::number(label, Field::Rotation(axis), ROTATION_DOMAIN));
            }
        }
        if !rotation.controls.is_empty() {
            panel.add_folder(rotation);
        }

        let mut material = Folder::new("Material");
        material
            .add(Control::color("color", Field::Color))
            .add(Control::toggle("wireframe", Field::Wireframe));
        if config.material.kind == MaterialKind::Standard {
            material
                .add(Control::number("metalness", Field::Metalness, UNIT_DOMAIN))
                .add(Control::number("roughness", Field::Roughness, UNIT_DOMAIN));

            let textures = &config.textures;
            for (slot, source) in [
                (MapSlot::Color, &textures.color_map),
                (MapSlot::Roughness, &textures.roughness_map),
                (MapSlot::Metalness, &textures.metalness_map),
            ] {
                if source.is_some() {
                    material.add(Control::texture(slot));
                }
            }
        }
        panel.add_folder(material);

        panel.add(Control::toggle(
            format!("Show {}", config.geometry.label()),
            Field::Visible,
        ));

        let mut size = Folder::new("Size");
        match config.geometry {
            GeometryKind::Cylinder => {
                size.add(Control::number("radius", Field::Size(SizeField::Radius), RADIUS_DOMAIN))
                    .add(Control::number(
                        "height",
                        Field::Size(SizeField::Height),
                        CYLINDER_HEIGHT_DOMAIN,
                    ));
            }
            GeometryKind::Box => {
                size.add(Control::number("width", Field::Size(SizeField::Width), BOX_EDGE_DOMAIN))
                    .add(Control::number("height", Field::Size(SizeField::Height), BOX_EDGE_DOMAIN))
                    .add(Control::number("depth", Field::Size(SizeField::Depth), BOX_EDGE_DOMAIN));
            }
        }
        panel.add_folder(size);

        panel
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Every control, folders flattened in display order
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.entries.iter().flat_map(|entry| match entry {
            Entry::Control(control) => std::slice::from_ref(control).iter(),
            Entry::Folder(folder) => folder.controls.iter(),
        })
    }

    pub fn control(&self, field: Field) -> Option<&Control> {
        self.controls().find(|c| c.field == field)
    }

    pub fn folder(&self, name: &str) -> Option<&Folder> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Folder(folder) if folder.name == name => Some(folder),
            _ => None,
        })
    }

    /// Edit a bound field the way the widget would
    pub fn set(
        &self,
        target: &mut impl Bindable,
        field: Field,
        value: Value,
    ) -> Result<Effect, PanelError> {
        let control = self.control(field).ok_or(PanelError::NotBound(field))?;
        let value = control.accept(value)?;
        if target.read(field).is_none() {
            return Err(PanelError::Unavailable(field));
        }
        Ok(target.write(field, value))
    }

    /// Pull numeric fields that start outside their domain back into range
    pub fn normalize(&self, target: &mut impl Bindable) -> Vec<Effect> {
        self.controls()
            .filter_map(|control| match (control.kind, target.read(control.field)) {
                (ControlKind::Number(domain), Some(Value::Number(v))) if !domain.contains(v) => {
                    Some(target.write(control.field, Value::Number(domain.clamp(v))))
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FieldMap {
        values: HashMap<Field, Value>,
        writes: usize,
    }

    impl Bindable for FieldMap {
        fn read(&self, field: Field) -> Option<Value> {
            self.values.get(&field).copied()
        }

        fn write(&mut self, field: Field, value: Value) -> Effect {
            self.values.insert(field, value);
            self.writes += 1;
            match field {
                Field::Size(_) => Effect::RegenerateGeometry,
                _ => Effect::None,
            }
        }
    }

    fn cylinder_fields() -> FieldMap {
        let mut map = FieldMap::default();
        map.values.insert(Field::Rotation(Axis::X), Value::Number(0.0));
        map.values.insert(Field::Size(SizeField::Radius), Value::Number(5.0));
        map.values.insert(Field::Visible, Value::Toggle(true));
        map.values.insert(Field::Color, Value::Color(Color::WHITE));
        map
    }

    #[test]
    fn test_cylinder_layout() {
        let panel = ControlPanel::for_config(&DemoConfig::preset(Preset::Cylinder));

        let names: Vec<_> = panel
            .entries()
            .iter()
            .map(|e| match e {
                Entry::Folder(f) => f.name.clone(),
                Entry::Control(c) => c.label.clone(),
            })
            .collect();
        assert_eq!(names, ["Rotation", "Material", "Show Cylinder", "Size"]);

        assert_eq!(panel.folder("Rotation").unwrap().controls.len(), 2);
        assert!(panel.control(Field::Rotation(Axis::Z)).is_none());
        assert!(panel.control(Field::Metalness).is_none());
        assert_eq!(
            panel.control(Field::Size(SizeField::Radius)).unwrap().kind,
            ControlKind::Number(RADIUS_DOMAIN)
        );
        assert_eq!(
            panel.control(Field::Size(SizeField::Height)).unwrap().kind,
            ControlKind::Number(CYLINDER_HEIGHT_DOMAIN)
        );
    }

    #[test]
    fn test_textured_box_layout() {
        let panel = ControlPanel::for_config(&DemoConfig::preset(Preset::TexturedBox));
        assert!(panel.control(Field::Rotation(Axis::Z)).is_some());
        assert!(panel.control(Field::Metalness).is_some());
        assert!(panel.control(Field::Roughness).is_some());
        assert!(panel.control(Field::MapEnabled(MapSlot::Color)).is_some());
        assert!(panel.control(Field::Size(SizeField::Depth)).is_some());
        assert!(panel.control(Field::Size(SizeField::Radius)).is_none());
        assert_eq!(panel.control(Field::Visible).unwrap().label, "Show Box");
    }

    #[test]
    fn test_set_clamps_to_domain() {
        let panel = ControlPanel::for_config(&DemoConfig::preset(Preset::Cylinder));
        let mut fields = cylinder_fields();

        let effect = panel
            .set(&mut fields, Field::Size(SizeField::Radius), Value::Number(50.0))
            .unwrap();
        assert_eq!(effect, Effect::RegenerateGeometry);
        assert_eq!(fields.read(Field::Size(SizeField::Radius)), Some(Value::Number(10.0)));

        panel
            .set(&mut fields, Field::Rotation(Axis::X), Value::Number(-1.0))
            .unwrap();
        assert_eq!(fields.read(Field::Rotation(Axis::X)), Some(Value::Number(0.0)));
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let panel = ControlPanel::for_config(&DemoConfig::preset(Preset::Cylinder));
        let mut fields = cylinder_fields();

        assert_eq!(
            panel.set(&mut fields, Field::Metalness, Value::Number(0.5)),
            Err(PanelError::NotBound(Field::Metalness))
        );
        assert!(matches!(
            panel.set(&mut fields, Field::Visible, Value::Number(1.0)),
            Err(PanelError::TypeMismatch { .. })
        ));
        assert_eq!(
            panel.set(&mut fields, Field::Rotation(Axis::X), Value::Number(f32::NAN)),
            Err(PanelError::NotFinite(Field::Rotation(Axis::X)))
        );
        assert_eq!(fields.writes, 0);
    }

    #[test]
    fn test_set_unavailable_field() {
        let panel = ControlPanel::for_config(&DemoConfig::preset(Preset::Cylinder));
        let mut fields = FieldMap::default();
        assert_eq!(
            panel.set(&mut fields, Field::Wireframe, Value::Toggle(true)),
            Err(PanelError::Unavailable(Field::Wireframe))
        );
    }

    #[test]
    fn test_normalize_pulls_values_into_range() {
        let panel = ControlPanel::for_config(&DemoConfig::preset(Preset::Cylinder));
        let mut fields = cylinder_fields();
        fields
            .values
            .insert(Field::Size(SizeField::Radius), Value::Number(0.25));

        let effects = panel.normalize(&mut fields);
        assert_eq!(effects, vec![Effect::RegenerateGeometry]);
        assert_eq!(fields.read(Field::Size(SizeField::Radius)), Some(Value::Number(1.0)));

        assert!(panel.normalize(&mut fields).is_empty());
    }

    #[test]
    fn test_domain_clamp() {
        let domain = NumericDomain::new(1.0, 10.0, 0.5);
        assert_eq!(domain.clamp(0.0), 1.0);
        assert_eq!(domain.clamp(7.3), 7.3);
        assert_eq!(domain.clamp(11.0), 10.0);
        assert!(domain.contains(10.0));
        assert!(!domain.contains(10.01));
    }
}
