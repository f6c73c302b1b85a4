use crate::error::{Error, Result};
use crate::reader::Reader;

/// Constant pool restricted to what class indexing resolves: Utf8 text and
/// Class references. Every other entry kind is length-walked and recorded
/// only by name so mismatch diagnostics stay precise.
#[derive(Debug)]
pub(crate) enum CpInfo {
    Utf8(String),
    Class(u16),
    Other(&'static str),
    /// Second slot of a Long or Double entry. Never directly addressable.
    Unusable,
}

impl CpInfo {
    fn kind(&self) -> &'static str {
        match self {
            CpInfo::Utf8(_) => "Utf8",
            CpInfo::Class(_) => "Class",
            CpInfo::Other(kind) => kind,
            CpInfo::Unusable => "Unusable",
        }
    }
}

pub(crate) struct ConstantPool {
    entries: Vec<CpInfo>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(CpInfo::Unusable);

        let mut index = 1;
        while index < count {
            let tag = reader.read_u1()?;
            let (info, double_width) = match tag {
                1 => {
                    let len = reader.read_u2()? as usize;
                    let bytes = reader.read_bytes(len)?;
                    (CpInfo::Utf8(decode_modified_utf8(bytes)?), false)
                }
                3 => {
                    reader.skip(4)?;
                    (CpInfo::Other("Integer"), false)
                }
                4 => {
                    reader.skip(4)?;
                    (CpInfo::Other("Float"), false)
                }
                5 => {
                    reader.skip(8)?;
                    (CpInfo::Other("Long"), true)
                }
                6 => {
                    reader.skip(8)?;
                    (CpInfo::Other("Double"), true)
                }
                7 => (CpInfo::Class(reader.read_u2()?), false),
                8 => {
                    reader.skip(2)?;
                    (CpInfo::Other("String"), false)
                }
                9 => {
                    reader.skip(4)?;
                    (CpInfo::Other("Fieldref"), false)
                }
                10 => {
                    reader.skip(4)?;
                    (CpInfo::Other("Methodref"), false)
                }
                11 => {
                    reader.skip(4)?;
                    (CpInfo::Other("InterfaceMethodref"), false)
                }
                12 => {
                    reader.skip(4)?;
                    (CpInfo::Other("NameAndType"), false)
                }
                15 => {
                    reader.skip(3)?;
                    (CpInfo::Other("MethodHandle"), false)
                }
                16 => {
                    reader.skip(2)?;
                    (CpInfo::Other("MethodType"), false)
                }
                17 => {
                    reader.skip(4)?;
                    (CpInfo::Other("Dynamic"), false)
                }
                18 => {
                    reader.skip(4)?;
                    (CpInfo::Other("InvokeDynamic"), false)
                }
                19 => {
                    reader.skip(2)?;
                    (CpInfo::Other("Module"), false)
                }
                20 => {
                    reader.skip(2)?;
                    (CpInfo::Other("Package"), false)
                }
                other => return Err(Error::InvalidConstantPoolTag(other)),
            };

            entries.push(info);
            index += 1;
            if double_width {
                entries.push(CpInfo::Unusable);
                index += 1;
            }
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&CpInfo> {
        if index == 0 {
            return Err(Error::InvalidConstantPoolIndex(index));
        }
        self.entries
            .get(index as usize)
            .ok_or(Error::InvalidConstantPoolIndex(index))
    }

    pub(crate) fn get_utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            CpInfo::Utf8(text) => Ok(text),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Utf8",
                found: other.kind(),
            }),
        }
    }

    /// Resolves a `CONSTANT_Class` entry to its internal name, e.g.
    /// `java/lang/Object`.
    pub(crate) fn get_class_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            CpInfo::Class(name_index) => self.get_utf8(*name_index),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Class",
                found: other.kind(),
            }),
        }
    }
}

/// Decodes the JVM's modified UTF-8: no embedded NUL bytes, no four-byte
/// sequences, and supplementary characters arrive as CESU-8 surrogate pairs.
fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let a = bytes[i];
        if a == 0 || a >= 0xF0 {
            return Err(Error::InvalidModifiedUtf8);
        }
        if a < 0x80 {
            out.push(a as char);
            i += 1;
        } else if a & 0xE0 == 0xC0 {
            let b = continuation(bytes, i + 1)?;
            let code = (u32::from(a) & 0x1F) << 6 | u32::from(b);
            out.push(char::from_u32(code).ok_or(Error::InvalidModifiedUtf8)?);
            i += 2;
        } else if a & 0xF0 == 0xE0 {
            let b = continuation(bytes, i + 1)?;
            let c = continuation(bytes, i + 2)?;
            let code = (u32::from(a) & 0x0F) << 12 | u32::from(b) << 6 | u32::from(c);
            if (0xD800..=0xDBFF).contains(&code) {
                // High surrogate; the low half must follow as another
                // three-byte group.
                let d = *bytes.get(i + 3).ok_or(Error::InvalidModifiedUtf8)?;
                if d & 0xF0 != 0xE0 {
                    return Err(Error::InvalidModifiedUtf8);
                }
                let e = continuation(bytes, i + 4)?;
                let f = continuation(bytes, i + 5)?;
                let low = (u32::from(d) & 0x0F) << 12 | u32::from(e) << 6 | u32::from(f);
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(Error::InvalidModifiedUtf8);
                }
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                out.push(char::from_u32(combined).ok_or(Error::InvalidModifiedUtf8)?);
                i += 6;
            } else {
                out.push(char::from_u32(code).ok_or(Error::InvalidModifiedUtf8)?);
                i += 3;
            }
        } else {
            return Err(Error::InvalidModifiedUtf8);
        }
    }
    Ok(out)
}

fn continuation(bytes: &[u8], index: usize) -> Result<u8> {
    let byte = *bytes.get(index).ok_or(Error::InvalidModifiedUtf8)?;
    if byte & 0xC0 != 0x80 {
        return Err(Error::InvalidModifiedUtf8);
    }
    Ok(byte & 0x3F)
}
