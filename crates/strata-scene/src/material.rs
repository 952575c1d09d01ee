#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyTypeInfo {
    Float,
    Double,
    Str,
    Integer,
    Buffer,
}

impl From<PropertyTypeInfo> for u32 {
    fn from(value: PropertyTypeInfo) -> Self {
        match value {
            PropertyTypeInfo::Float => 0x1,
            PropertyTypeInfo::Double => 0x2,
            PropertyTypeInfo::Str => 0x3,
            PropertyTypeInfo::Integer => 0x4,
            PropertyTypeInfo::Buffer => 0x5,
        }
    }
}

/// A single typed key/value entry. The payload is kept verbatim as raw
/// bytes; `ty` declares how a reader should interpret them.
#[derive(Debug, Clone)]
pub struct MaterialProperty {
    pub key: String,
    pub semantic: u32,
    pub index: u32,
    pub ty: PropertyTypeInfo,
    pub data: Vec<u8>,
}

impl MaterialProperty {
    pub fn floats(key: impl Into<String>, values: &[f32]) -> Self {
        let mut data = Vec::with_capacity(values.len() * 4);
        for value in values {
            data.extend_from_slice(&value.to_le_bytes());
        }

        Self {
            key: key.into(),
            semantic: 0,
            index: 0,
            ty: PropertyTypeInfo::Float,
            data,
        }
    }

    pub fn string(key: impl Into<String>, value: &str) -> Self {
        // Stored the way string properties travel in material blobs: a
        // 32 bit length prefix, the bytes, and a trailing terminator.
        let mut data = Vec::with_capacity(value.len() + 5);
        data.extend_from_slice(&(value.len() as u32).to_le_bytes());
        data.extend_from_slice(value.as_bytes());
        data.push(0);

        Self {
            key: key.into(),
            semantic: 0,
            index: 0,
            ty: PropertyTypeInfo::Str,
            data,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Material {
    pub properties: Vec<MaterialProperty>,
}
