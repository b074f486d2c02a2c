//! Materials and textures.

use crate::format::Element;
use crate::scene::{properties, ObjectId};
use crate::util::{Color, DVec3};

/// Material slot a texture is connected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Diffuse,
    Normal,
}

impl TextureSlot {
    pub const COUNT: usize = 2;

    /// Slot named by an `OP` connection property.
    pub fn from_property(name: &str) -> Option<Self> {
        match name {
            "DiffuseColor" => Some(Self::Diffuse),
            "NormalMap" => Some(Self::Normal),
            _ => None,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Surface material.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub diffuse_color: Color,
    pub ambient_color: Color,
    pub specular_color: Color,
    pub emissive_color: Color,
    pub reflection_color: Color,
    pub diffuse_factor: f64,
    pub specular_factor: f64,
    pub emissive_factor: f64,
    pub reflection_factor: f64,
    pub shininess: f64,
    pub shininess_exponent: f64,
    textures: [Option<ObjectId>; TextureSlot::COUNT],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_color: Color::WHITE,
            ambient_color: Color::new(0.2, 0.2, 0.2),
            specular_color: Color::new(0.2, 0.2, 0.2),
            emissive_color: Color::BLACK,
            reflection_color: Color::BLACK,
            diffuse_factor: 1.0,
            specular_factor: 1.0,
            emissive_factor: 1.0,
            reflection_factor: 1.0,
            shininess: 20.0,
            shininess_exponent: 20.0,
            textures: [None; TextureSlot::COUNT],
        }
    }
}

impl Material {
    pub fn parse(element: &Element) -> Self {
        let d = Self::default();
        let color = |name: &str, default: Color| {
            let fallback = DVec3::new(f64::from(default.r), f64::from(default.g), f64::from(default.b));
            Color::from_dvec3(properties::resolve_vec3(element, name, fallback))
        };
        let factor = |name: &str, default: f64| properties::resolve_f64(element, name, default);

        Self {
            diffuse_color: color("DiffuseColor", d.diffuse_color),
            ambient_color: color("AmbientColor", d.ambient_color),
            specular_color: color("SpecularColor", d.specular_color),
            emissive_color: color("EmissiveColor", d.emissive_color),
            reflection_color: color("ReflectionColor", d.reflection_color),
            diffuse_factor: factor("DiffuseFactor", d.diffuse_factor),
            specular_factor: factor("SpecularFactor", d.specular_factor),
            emissive_factor: factor("EmissiveFactor", d.emissive_factor),
            reflection_factor: factor("ReflectionFactor", d.reflection_factor),
            shininess: factor("Shininess", d.shininess),
            shininess_exponent: factor("ShininessExponent", d.shininess_exponent),
            textures: d.textures,
        }
    }

    /// Texture bound to a slot.
    #[inline]
    pub fn texture(&self, slot: TextureSlot) -> Option<ObjectId> {
        self.textures[slot.index()]
    }

    pub(crate) fn set_texture(&mut self, slot: TextureSlot, texture: ObjectId) {
        self.textures[slot.index()] = Some(texture);
    }
}

/// Image reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Texture {
    pub file_name: String,
    pub relative_file_name: String,
}

impl Texture {
    pub fn parse(element: &Element) -> Self {
        let string = |name: &str| {
            element
                .child_property(name)
                .map(|p| p.to_str().into_owned())
                .unwrap_or_default()
        };
        Self {
            file_name: string("FileName"),
            relative_file_name: string("RelativeFilename"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::text;

    #[test]
    fn test_parse_material() {
        let doc = br#"Material: 20, "Material::Red", "" {
    Properties70:  {
        P: "DiffuseColor", "Color", "", "A",1,0,0
        P: "SpecularFactor", "Number", "", "A",0.5
        P: "Shininess", "double", "Number", "",8
    }
}
"#;
        let el = text::tokenize(doc).unwrap().children.remove(0);
        let m = Material::parse(&el);
        assert_eq!(m.diffuse_color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(m.specular_factor, 0.5);
        assert_eq!(m.shininess, 8.0);
        assert_eq!(m.ambient_color, Color::new(0.2, 0.2, 0.2));
        assert_eq!(m.emissive_factor, 1.0);
        assert_eq!(m.texture(TextureSlot::Diffuse), None);
    }

    #[test]
    fn test_default_diffuse_is_white() {
        let m = Material::parse(&Element::new("Material"));
        assert_eq!(m.diffuse_color, Color::WHITE);
    }

    #[test]
    fn test_texture_slots() {
        assert_eq!(TextureSlot::from_property("DiffuseColor"), Some(TextureSlot::Diffuse));
        assert_eq!(TextureSlot::from_property("NormalMap"), Some(TextureSlot::Normal));
        assert_eq!(TextureSlot::from_property("SpecularColor"), None);

        let mut m = Material::default();
        m.set_texture(TextureSlot::Normal, 9);
        assert_eq!(m.texture(TextureSlot::Normal), Some(9));
    }

    #[test]
    fn test_parse_texture() {
        let doc = b"Texture: 30, \"Texture::T\", \"\" {\n  FileName: \"/abs/t.png\"\n  RelativeFilename: \"t.png\"\n}\n";
        let el = text::tokenize(doc).unwrap().children.remove(0);
        let t = Texture::parse(&el);
        assert_eq!(t.file_name, "/abs/t.png");
        assert_eq!(t.relative_file_name, "t.png");
        assert_eq!(Texture::parse(&Element::new("Texture")), Texture::default());
    }
}
