const MAJOR_JAVA_8: u16 = 52;

/// Builder for minimal but well-formed classfile bytes.
///
/// Names are binary names (`com.example.Foo`); the builder converts them to
/// the internal slash form the format stores. The default class is public,
/// extends `java.lang.Object`, and has no members.
pub struct ClassBytes {
    name: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    annotations: Vec<AnnotationSpec>,
    access_flags: u16,
}

struct AnnotationSpec {
    type_name: String,
    string_elements: Vec<(String, String)>,
}

impl ClassBytes {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            super_class: Some("java.lang.Object".to_string()),
            interfaces: Vec::new(),
            annotations: Vec::new(),
            access_flags: 0x0021,
        }
    }

    pub fn extends(mut self, name: &str) -> Self {
        self.super_class = Some(name.to_string());
        self
    }

    pub fn without_super(mut self) -> Self {
        self.super_class = None;
        self
    }

    pub fn implements(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub fn annotated_with(mut self, name: &str) -> Self {
        self.annotations.push(AnnotationSpec {
            type_name: name.to_string(),
            string_elements: Vec::new(),
        });
        self
    }

    /// Adds an annotation carrying one string-valued element, e.g.
    /// `@Named("orders")`.
    pub fn annotated_with_string_element(
        mut self,
        name: &str,
        element: &str,
        value: &str,
    ) -> Self {
        self.annotations.push(AnnotationSpec {
            type_name: name.to_string(),
            string_elements: vec![(element.to_string(), value.to_string())],
        });
        self
    }

    pub fn access_flags(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut pool = PoolBuilder::default();
        let this_class = pool.class(&self.name);
        let super_class = self.super_class.as_deref().map(|name| pool.class(name));
        let interfaces: Vec<u16> = self
            .interfaces
            .iter()
            .map(|name| pool.class(name))
            .collect();

        let mut attribute = None;
        if !self.annotations.is_empty() {
            let attr_name = pool.utf8("RuntimeVisibleAnnotations");
            let mut body = Vec::new();
            push_u16(&mut body, self.annotations.len() as u16);
            for annotation in &self.annotations {
                let descriptor =
                    format!("L{};", annotation.type_name.replace('.', "/"));
                let type_index = pool.utf8(&descriptor);
                push_u16(&mut body, type_index);
                push_u16(&mut body, annotation.string_elements.len() as u16);
                for (element, value) in &annotation.string_elements {
                    let element_index = pool.utf8(element);
                    let value_index = pool.utf8(value);
                    push_u16(&mut body, element_index);
                    body.push(b's');
                    push_u16(&mut body, value_index);
                }
            }
            attribute = Some((attr_name, body));
        }

        let mut bytes = Vec::new();
        push_u32(&mut bytes, 0xCAFEBABE);
        push_u16(&mut bytes, 0);
        push_u16(&mut bytes, MAJOR_JAVA_8);
        push_u16(&mut bytes, pool.count());
        for entry in &pool.entries {
            bytes.extend_from_slice(entry);
        }
        push_u16(&mut bytes, self.access_flags);
        push_u16(&mut bytes, this_class);
        push_u16(&mut bytes, super_class.unwrap_or(0));
        push_u16(&mut bytes, interfaces.len() as u16);
        for index in interfaces {
            push_u16(&mut bytes, index);
        }
        // No fields, no methods.
        push_u16(&mut bytes, 0);
        push_u16(&mut bytes, 0);
        match attribute {
            Some((name_index, body)) => {
                push_u16(&mut bytes, 1);
                push_u16(&mut bytes, name_index);
                push_u32(&mut bytes, body.len() as u32);
                bytes.extend_from_slice(&body);
            }
            None => push_u16(&mut bytes, 0),
        }
        bytes
    }
}

/// Serialized constant pool entries. Indices are handed out as entries are
/// appended, starting at 1 per the format.
#[derive(Default)]
struct PoolBuilder {
    entries: Vec<Vec<u8>>,
}

impl PoolBuilder {
    fn utf8(&mut self, text: &str) -> u16 {
        let mut entry = vec![1u8];
        push_u16(&mut entry, text.len() as u16);
        entry.extend_from_slice(text.as_bytes());
        self.push(entry)
    }

    fn class(&mut self, binary_name: &str) -> u16 {
        let name_index = self.utf8(&binary_name.replace('.', "/"));
        let mut entry = vec![7u8];
        push_u16(&mut entry, name_index);
        self.push(entry)
    }

    fn push(&mut self, entry: Vec<u8>) -> u16 {
        self.entries.push(entry);
        self.entries.len() as u16
    }

    fn count(&self) -> u16 {
        self.entries.len() as u16 + 1
    }
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_magic_and_version() {
        let bytes = ClassBytes::new("com.example.Foo").build();
        assert_eq!(&bytes[0..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
        assert_eq!(&bytes[6..8], &MAJOR_JAVA_8.to_be_bytes());
    }

    #[test]
    fn internal_names_use_slashes() {
        let bytes = ClassBytes::new("com.example.Foo").build();
        let needle = b"com/example/Foo";
        assert!(bytes
            .windows(needle.len())
            .any(|window| window == needle));
    }
}
