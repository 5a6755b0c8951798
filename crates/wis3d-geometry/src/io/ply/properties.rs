use super::PlyError;

/// The encoding of the PLY body.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlyFormat {
    /// Whitespace separated text.
    Ascii,
    /// Packed little endian binary.
    BinaryLittleEndian,
}

/// A scalar PLY data type.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlyDataType {
    /// `float` / `float32`
    Float32,
    /// `double` / `float64`
    Float64,
    /// `char` / `int8`
    Int8,
    /// `uchar` / `uint8`
    UInt8,
    /// `short` / `int16`
    Int16,
    /// `ushort` / `uint16`
    UInt16,
    /// `int` / `int32`
    Int32,
    /// `uint` / `uint32`
    UInt32,
}

impl PlyDataType {
    /// Parse a type name as it appears in a PLY header.
    pub fn parse(type_str: &str) -> Result<Self, PlyError> {
        match type_str {
            "float" | "float32" => Ok(PlyDataType::Float32),
            "double" | "float64" => Ok(PlyDataType::Float64),
            "char" | "int8" => Ok(PlyDataType::Int8),
            "uchar" | "uint8" => Ok(PlyDataType::UInt8),
            "short" | "int16" => Ok(PlyDataType::Int16),
            "ushort" | "uint16" => Ok(PlyDataType::UInt16),
            "int" | "int32" => Ok(PlyDataType::Int32),
            "uint" | "uint32" => Ok(PlyDataType::UInt32),
            other => Err(PlyError::UnsupportedProperty(other.to_string())),
        }
    }

    /// The size in bytes of one value.
    pub fn size(&self) -> usize {
        match self {
            PlyDataType::Float32 | PlyDataType::Int32 | PlyDataType::UInt32 => 4,
            PlyDataType::Float64 => 8,
            PlyDataType::Int16 | PlyDataType::UInt16 => 2,
            PlyDataType::Int8 | PlyDataType::UInt8 => 1,
        }
    }

    /// Whether the type is a floating point type.
    pub fn is_float(&self) -> bool {
        matches!(self, PlyDataType::Float32 | PlyDataType::Float64)
    }

    /// Decode one little endian value; `bytes` must hold exactly [`Self::size`] bytes.
    pub fn decode_le(&self, bytes: &[u8]) -> Result<f64, PlyError> {
        fn arr<const N: usize>(bytes: &[u8]) -> Result<[u8; N], PlyError> {
            let len = bytes.len();
            bytes
                .try_into()
                .map_err(|_| PlyError::MalformedBody(format!("expected {N} bytes, got {len}")))
        }
        Ok(match self {
            PlyDataType::Float32 => f32::from_le_bytes(arr(bytes)?) as f64,
            PlyDataType::Float64 => f64::from_le_bytes(arr(bytes)?),
            PlyDataType::Int8 => i8::from_le_bytes(arr(bytes)?) as f64,
            PlyDataType::UInt8 => u8::from_le_bytes(arr(bytes)?) as f64,
            PlyDataType::Int16 => i16::from_le_bytes(arr(bytes)?) as f64,
            PlyDataType::UInt16 => u16::from_le_bytes(arr(bytes)?) as f64,
            PlyDataType::Int32 => i32::from_le_bytes(arr(bytes)?) as f64,
            PlyDataType::UInt32 => u32::from_le_bytes(arr(bytes)?) as f64,
        })
    }
}

/// The shape of a property: a scalar or a length-prefixed list.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlyPropertyKind {
    /// One value of the given type.
    Scalar(PlyDataType),
    /// A count of type `count` followed by that many `item` values.
    List {
        /// Type of the length prefix
        count: PlyDataType,
        /// Type of the list items
        item: PlyDataType,
    },
}

/// A property declared in the header.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PlyPropertyDefinition {
    /// The property name, e.g. `x` or `vertex_indices`.
    pub name: String,
    /// The property type.
    pub kind: PlyPropertyKind,
}

/// An element declared in the header.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PlyElementDefinition {
    /// The element name, e.g. `vertex` or `face`.
    pub name: String,
    /// The number of rows of the element.
    pub count: usize,
    /// The properties of one row, in order.
    pub properties: Vec<PlyPropertyDefinition>,
}

/// A decoded property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PlyValue {
    /// A scalar value and its declared type.
    Scalar(f64, PlyDataType),
    /// A list of values.
    List(Vec<f64>),
}

/// One decoded element row.
#[derive(Debug, Default)]
pub struct PlyRow {
    /// Property values keyed by property name, in header order.
    pub values: Vec<(String, PlyValue)>,
}

impl PlyRow {
    fn get(&self, name: &str) -> Option<&PlyValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    fn get_float(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            PlyValue::Scalar(v, _) => Some(*v),
            PlyValue::List(_) => None,
        }
    }

    fn get_u8(&self, names: &[&str]) -> Option<u8> {
        names.iter().find_map(|name| match self.get(name)? {
            PlyValue::Scalar(v, dtype) if dtype.is_float() => {
                Some((v * 255.0).round().clamp(0.0, 255.0) as u8)
            }
            PlyValue::Scalar(v, _) => Some(v.clamp(0.0, 255.0) as u8),
            PlyValue::List(_) => None,
        })
    }

    /// The `x`, `y`, `z` values of a vertex row.
    pub fn to_point(&self) -> Option<[f64; 3]> {
        Some([self.get_float("x")?, self.get_float("y")?, self.get_float("z")?])
    }

    /// The color of a vertex row, if the row carries one.
    pub fn to_color(&self) -> Option<[u8; 3]> {
        Some([
            self.get_u8(&["red", "r", "diffuse_red"])?,
            self.get_u8(&["green", "g", "diffuse_green"])?,
            self.get_u8(&["blue", "b", "diffuse_blue"])?,
        ])
    }

    /// The normal of a vertex row, if the row carries one.
    pub fn to_normal(&self) -> Option<[f64; 3]> {
        Some([self.get_float("nx")?, self.get_float("ny")?, self.get_float("nz")?])
    }

    /// The vertex indices of a face row.
    pub fn to_indices(&self) -> Option<Vec<usize>> {
        ["vertex_indices", "vertex_index"]
            .iter()
            .find_map(|name| match self.get(name)? {
                PlyValue::List(items) => Some(items.iter().map(|&i| i as usize).collect()),
                PlyValue::Scalar(..) => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_parsing() -> Result<(), PlyError> {
        assert_eq!(PlyDataType::parse("float")?, PlyDataType::Float32);
        assert_eq!(PlyDataType::parse("uchar")?, PlyDataType::UInt8);
        assert_eq!(PlyDataType::parse("double")?, PlyDataType::Float64);
        assert!(PlyDataType::parse("invalid").is_err());
        Ok(())
    }

    #[test]
    fn test_decode_le() -> Result<(), PlyError> {
        assert_eq!(PlyDataType::Float32.decode_le(&1.5f32.to_le_bytes())?, 1.5);
        assert_eq!(PlyDataType::Int16.decode_le(&(-3i16).to_le_bytes())?, -3.0);
        assert!(PlyDataType::Int32.decode_le(&[0u8; 2]).is_err());
        Ok(())
    }

    #[test]
    fn test_row_accessors() {
        let row = PlyRow {
            values: vec![
                ("x".into(), PlyValue::Scalar(1.0, PlyDataType::Float32)),
                ("y".into(), PlyValue::Scalar(2.0, PlyDataType::Float32)),
                ("z".into(), PlyValue::Scalar(3.0, PlyDataType::Float32)),
                ("red".into(), PlyValue::Scalar(1.0, PlyDataType::Float32)),
                ("green".into(), PlyValue::Scalar(0.0, PlyDataType::Float32)),
                ("blue".into(), PlyValue::Scalar(128.0, PlyDataType::UInt8)),
            ],
        };
        assert_eq!(row.to_point(), Some([1.0, 2.0, 3.0]));
        assert_eq!(row.to_color(), Some([255, 0, 128]));
        assert_eq!(row.to_normal(), None);
    }
}
