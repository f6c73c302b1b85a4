use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    UnexpectedEof,
    InvalidMagic(u32),
    InvalidConstantPoolIndex(u16),
    InvalidConstantPoolTag(u8),
    ConstantPoolTypeMismatch {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },
    InvalidModifiedUtf8,
    MalformedAttribute(&'static str),
    TrailingBytes(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedEof => write!(f, "classfile ends mid-structure"),
            Error::InvalidMagic(magic) => write!(f, "not a classfile (magic 0x{magic:08x})"),
            Error::InvalidConstantPoolIndex(index) => {
                write!(f, "constant pool index {index} out of range")
            }
            Error::InvalidConstantPoolTag(tag) => write!(f, "unknown constant pool tag {tag}"),
            Error::ConstantPoolTypeMismatch {
                index,
                expected,
                found,
            } => write!(
                f,
                "constant pool entry {index} is {found}, expected {expected}"
            ),
            Error::InvalidModifiedUtf8 => write!(f, "malformed modified UTF-8 in constant pool"),
            Error::MalformedAttribute(name) => {
                write!(f, "{name} attribute does not match its declared layout")
            }
            Error::TrailingBytes(count) => {
                write!(f, "{count} bytes of trailing garbage after the classfile")
            }
        }
    }
}

impl std::error::Error for Error {}
