use crate::constant_pool::ConstantPool;
use crate::error::{Error, Result};
use crate::reader::Reader;

pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ANNOTATION: u16 = 0x2000;

/// Shape of one compiled class: enough to index hierarchies and annotations
/// without materializing fields, methods, or code.
///
/// All names are binary names (`java.util.List`), converted from the
/// internal slash form the classfile stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSummary {
    pub binary_name: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub access_flags: u16,
    /// Binary names of class-level annotations, runtime-visible and
    /// runtime-invisible alike.
    pub annotations: Vec<String>,
}

impl ClassSummary {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let magic = reader.read_u4()?;
        if magic != 0xCAFEBABE {
            return Err(Error::InvalidMagic(magic));
        }

        let _minor_version = reader.read_u2()?;
        let _major_version = reader.read_u2()?;
        let cp = ConstantPool::parse(&mut reader)?;

        let access_flags = reader.read_u2()?;
        let binary_name = binary_name(cp.get_class_name(reader.read_u2()?)?);
        let super_class_idx = reader.read_u2()?;
        let super_class = if super_class_idx == 0 {
            None
        } else {
            Some(binary_name_of(&cp, super_class_idx)?)
        };

        let interfaces_count = reader.read_u2()? as usize;
        let mut interfaces = Vec::with_capacity(interfaces_count);
        for _ in 0..interfaces_count {
            let index = reader.read_u2()?;
            interfaces.push(binary_name_of(&cp, index)?);
        }

        // Fields and methods carry nothing the index wants; walk past them.
        skip_members(&mut reader)?;
        skip_members(&mut reader)?;

        let annotations = parse_class_annotations(&mut reader, &cp)?;
        reader.ensure_empty()?;

        Ok(Self {
            binary_name,
            super_class,
            interfaces,
            access_flags,
            annotations,
        })
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }

    pub fn is_annotation(&self) -> bool {
        self.access_flags & ACC_ANNOTATION != 0
    }
}

fn binary_name(internal: &str) -> String {
    internal.replace('/', ".")
}

fn binary_name_of(cp: &ConstantPool, index: u16) -> Result<String> {
    Ok(binary_name(cp.get_class_name(index)?))
}

fn skip_members(reader: &mut Reader<'_>) -> Result<()> {
    let count = reader.read_u2()? as usize;
    for _ in 0..count {
        // access_flags, name_index, descriptor_index
        reader.skip(6)?;
        skip_attributes(reader)?;
    }
    Ok(())
}

fn skip_attributes(reader: &mut Reader<'_>) -> Result<()> {
    let count = reader.read_u2()? as usize;
    for _ in 0..count {
        reader.skip(2)?;
        let length = reader.read_u4()? as usize;
        reader.skip(length)?;
    }
    Ok(())
}

fn parse_class_annotations(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<Vec<String>> {
    let attributes_count = reader.read_u2()? as usize;
    let mut annotations = Vec::new();
    for _ in 0..attributes_count {
        let name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        let info = reader.read_bytes(length)?;
        let name = cp.get_utf8(name_index)?;

        match name {
            "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                let mut sub = Reader::new(info);
                let num = sub.read_u2()? as usize;
                for _ in 0..num {
                    if let Some(annotation) = parse_annotation(&mut sub, cp)? {
                        annotations.push(annotation);
                    }
                }
                sub.ensure_empty()?;
            }
            _ => {
                // Unknown attribute: intentionally skipped.
            }
        }
    }
    Ok(annotations)
}

/// Reads one `annotation` structure, returning the annotation type's binary
/// name. Element values are walked for length only.
fn parse_annotation(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<Option<String>> {
    let type_index = reader.read_u2()?;
    let descriptor = cp.get_utf8(type_index)?;
    let name = descriptor_to_binary_name(descriptor);

    let num_element_value_pairs = reader.read_u2()? as usize;
    for _ in 0..num_element_value_pairs {
        // element_name_index
        reader.skip(2)?;
        skip_element_value(reader)?;
    }
    Ok(name)
}

/// Converts a field descriptor such as `Ljavax/inject/Named;` to the binary
/// name `javax.inject.Named`. Non-class descriptors yield `None`.
fn descriptor_to_binary_name(descriptor: &str) -> Option<String> {
    descriptor
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
        .map(binary_name)
}

fn skip_element_value(reader: &mut Reader<'_>) -> Result<()> {
    let tag = reader.read_u1()? as char;
    match tag {
        'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z' | 's' | 'c' => reader.skip(2),
        'e' => reader.skip(4),
        '@' => {
            reader.skip(2)?;
            let num = reader.read_u2()? as usize;
            for _ in 0..num {
                reader.skip(2)?;
                skip_element_value(reader)?;
            }
            Ok(())
        }
        '[' => {
            let num = reader.read_u2()? as usize;
            for _ in 0..num {
                skip_element_value(reader)?;
            }
            Ok(())
        }
        _ => Err(Error::MalformedAttribute("RuntimeVisibleAnnotations")),
    }
}
